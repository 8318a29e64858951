//! Session token
//!
//! The service identifies a logged-in user by the `AURSID` cookie. The value
//! is opaque; the only things the client inspects are the domain it belongs
//! to and its recorded expiry.

use std::fmt;

use chrono::{DateTime, Utc};

/// Name of the session cookie issued by the service
pub const SESSION_COOKIE: &str = "AURSID";

/// A service-issued session cookie
#[derive(Clone, PartialEq, Eq)]
pub struct SessionToken {
    domain: String,
    value: String,
    /// `None` for a browser-session cookie
    expires: Option<DateTime<Utc>>,
}

impl SessionToken {
    pub fn new(domain: impl Into<String>, value: impl Into<String>) -> Self {
        Self {
            domain: domain.into(),
            value: value.into(),
            expires: None,
        }
    }

    pub fn with_expires(mut self, expires: Option<DateTime<Utc>>) -> Self {
        self.expires = expires;
        self
    }

    pub fn domain(&self) -> &str {
        &self.domain
    }

    pub fn value(&self) -> &str {
        &self.value
    }

    pub fn expires(&self) -> Option<DateTime<Utc>> {
        self.expires
    }

    pub fn is_expired_at(&self, now: DateTime<Utc>) -> bool {
        self.expires.is_some_and(|exp| now >= exp)
    }

    pub fn is_expired(&self) -> bool {
        self.is_expired_at(Utc::now())
    }

    /// `Cookie` header value carrying this token
    pub fn cookie_header(&self) -> String {
        format!("{}={}", SESSION_COOKIE, self.value)
    }

    pub fn belongs_to(&self, domain: &str) -> bool {
        domain_equals(&self.domain, domain)
    }
}

impl fmt::Debug for SessionToken {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("SessionToken")
            .field("domain", &self.domain)
            .field("value", &"<redacted>")
            .field("expires", &self.expires)
            .finish()
    }
}

/// Host part of a `host[:port]` domain, without a leading dot. Bracketed
/// IPv6 literals lose their brackets; a bare IPv6 literal is kept whole.
pub fn host_of(domain: &str) -> &str {
    let domain = domain.trim_start_matches('.');
    if let Some(rest) = domain.strip_prefix('[') {
        return rest.split_once(']').map_or(rest, |(host, _)| host);
    }
    if domain.matches(':').count() > 1 {
        return domain;
    }
    domain.split_once(':').map_or(domain, |(host, _)| host)
}

/// Compare two host names, ignoring case, port numbers and a leading dot.
pub fn domain_equals(a: &str, b: &str) -> bool {
    host_of(a).eq_ignore_ascii_case(host_of(b))
}
