//! HTTP transport
//!
//! Login, session probing and uploads talk to the service through the
//! [`Transport`] trait. [`HttpTransport`] is the real implementation;
//! tests substitute a scripted one.

pub mod http;

#[cfg(test)]
pub(crate) mod fake;

use std::path::PathBuf;
use std::time::Duration;

use chrono::{DateTime, Utc};
use url::Url;

use crate::session::token::SESSION_COOKIE;
use crate::{Error, Result};

pub use http::HttpTransport;

/// Issues one HTTP request and returns the service's answer.
///
/// Implementations never follow redirects: a redirect is how the service
/// reports success, so the caller needs to see it.
pub trait Transport {
    fn send(&self, request: &HttpRequest) -> Result<HttpResponse>;
}

impl<T: Transport + ?Sized> Transport for &T {
    fn send(&self, request: &HttpRequest) -> Result<HttpResponse> {
        (**self).send(request)
    }
}

/// HTTP methods used against the service
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Method {
    Get,
    Post,
}

impl Method {
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Get => "GET",
            Self::Post => "POST",
        }
    }
}

/// One named part of a multipart body
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum FormField {
    Text { name: String, value: String },
    /// Content is read from `path` when the request is sent
    File { name: String, path: PathBuf },
}

impl FormField {
    pub fn name(&self) -> &str {
        match self {
            Self::Text { name, .. } | Self::File { name, .. } => name,
        }
    }
}

/// A `multipart/form-data` body
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct MultipartForm {
    fields: Vec<FormField>,
}

impl MultipartForm {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn text(mut self, name: impl Into<String>, value: impl Into<String>) -> Self {
        self.fields.push(FormField::Text {
            name: name.into(),
            value: value.into(),
        });
        self
    }

    pub fn file(mut self, name: impl Into<String>, path: impl Into<PathBuf>) -> Self {
        self.fields.push(FormField::File {
            name: name.into(),
            path: path.into(),
        });
        self
    }

    pub fn fields(&self) -> &[FormField] {
        &self.fields
    }

    /// Value of a text field
    pub fn get(&self, name: &str) -> Option<&str> {
        self.fields.iter().find_map(|f| match f {
            FormField::Text { name: n, value } if n == name => Some(value.as_str()),
            _ => None,
        })
    }
}

/// An outgoing request
#[derive(Debug, Clone)]
pub struct HttpRequest {
    pub method: Method,
    pub url: String,
    pub headers: Vec<(String, String)>,
    /// `Cookie` header value
    pub cookie: Option<String>,
    pub form: Option<MultipartForm>,
}

impl HttpRequest {
    pub fn get(url: impl Into<String>) -> Self {
        Self::new(Method::Get, url)
    }

    pub fn post(url: impl Into<String>) -> Self {
        Self::new(Method::Post, url)
    }

    fn new(method: Method, url: impl Into<String>) -> Self {
        Self {
            method,
            url: url.into(),
            headers: Vec::new(),
            cookie: None,
            form: None,
        }
    }

    pub fn header(mut self, name: impl Into<String>, value: impl Into<String>) -> Self {
        self.headers.push((name.into(), value.into()));
        self
    }

    pub fn cookie(mut self, cookie: impl Into<String>) -> Self {
        self.cookie = Some(cookie.into());
        self
    }

    pub fn form(mut self, form: MultipartForm) -> Self {
        self.form = Some(form);
        self
    }
}

/// A cookie set by the service
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SetCookie {
    pub name: String,
    pub value: String,
    pub expires: Option<DateTime<Utc>>,
    pub max_age: Option<Duration>,
}

impl SetCookie {
    pub fn new(name: impl Into<String>, value: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            value: value.into(),
            expires: None,
            max_age: None,
        }
    }

    /// Absolute expiry; `Max-Age` takes precedence over `Expires`.
    pub fn expiry(&self, now: DateTime<Utc>) -> Option<DateTime<Utc>> {
        match self.max_age {
            Some(age) => chrono::Duration::from_std(age).ok().map(|age| now + age),
            None => self.expires,
        }
    }

    /// Whether the service is telling the client to drop this cookie
    pub fn is_removal(&self, now: DateTime<Utc>) -> bool {
        self.max_age == Some(Duration::ZERO) || self.expiry(now).is_some_and(|exp| exp <= now)
    }
}

/// The parts of a response the client looks at
#[derive(Debug, Clone, Default)]
pub struct HttpResponse {
    pub status: u16,
    /// `Location` header of a redirect
    pub location: Option<String>,
    pub cookies: Vec<SetCookie>,
    pub body: String,
}

impl HttpResponse {
    pub fn is_error(&self) -> bool {
        self.status >= 400
    }

    /// Fail with [`Error::UnexpectedStatus`] on 4xx/5xx
    pub fn error_for_status(self) -> Result<Self> {
        if self.is_error() {
            return Err(Error::UnexpectedStatus {
                status: self.status,
            });
        }
        Ok(self)
    }

    /// The session cookie set by this response, if any
    pub fn session_cookie(&self) -> Option<&SetCookie> {
        self.cookies.iter().rev().find(|c| c.name == SESSION_COOKIE)
    }
}

/// Base address of the service
#[derive(Debug, Clone)]
pub struct ServiceUrl {
    base: Url,
    domain: String,
}

impl ServiceUrl {
    /// `domain` is a bare host with an optional port. `secure` selects
    /// `https`; plain `http` exists for local fixtures only.
    pub fn new(domain: &str, secure: bool) -> Result<Self> {
        let domain = domain.trim();
        let invalid = || Error::InvalidDomain(domain.to_string());

        if domain.is_empty()
            || domain.contains("://")
            || domain
                .chars()
                .any(|c| c.is_whitespace() || matches!(c, '/' | '@' | '?' | '#'))
        {
            return Err(invalid());
        }

        let scheme = if secure { "https" } else { "http" };
        let base = Url::parse(&format!("{}://{}/", scheme, domain)).map_err(|_| invalid())?;
        if base.host_str().is_none_or(str::is_empty) {
            return Err(invalid());
        }

        Ok(Self {
            base,
            domain: domain.to_string(),
        })
    }

    pub fn domain(&self) -> &str {
        &self.domain
    }

    pub fn scheme(&self) -> &str {
        self.base.scheme()
    }

    /// Absolute URL for a path on the service
    pub fn join(&self, path: &str) -> String {
        self.base
            .join(path)
            .map(String::from)
            .unwrap_or_else(|_| format!("{}{}", self.base, path.trim_start_matches('/')))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use rstest::rstest;

    #[rstest]
    #[case("aur.archlinux.org", true, "https://aur.archlinux.org/login")]
    #[case("127.0.0.1:8080", false, "http://127.0.0.1:8080/login")]
    #[case("AUR.archlinux.org", true, "https://aur.archlinux.org/login")]
    fn test_service_url(#[case] domain: &str, #[case] secure: bool, #[case] login: &str) {
        let service = ServiceUrl::new(domain, secure).unwrap();
        assert_eq!(service.join("/login"), login);
    }

    #[rstest]
    #[case("")]
    #[case("   ")]
    #[case("https://aur.archlinux.org")]
    #[case("aur.archlinux.org/packages")]
    #[case("user@aur.archlinux.org")]
    #[case("aur archlinux org")]
    #[case("aur.archlinux.org:notaport")]
    fn test_service_url_rejects(#[case] domain: &str) {
        let err = ServiceUrl::new(domain, true).unwrap_err();
        assert!(matches!(err, Error::InvalidDomain(_)));
    }

    #[test]
    fn test_service_url_keeps_domain() {
        let service = ServiceUrl::new("example.org", true).unwrap();
        assert_eq!(service.domain(), "example.org");
        assert_eq!(service.scheme(), "https");
    }

    #[test]
    fn test_form_builder() {
        let form = MultipartForm::new()
            .text("category", "13")
            .file("pfile", "/tmp/foo.src.tar.gz");
        assert_eq!(form.get("category"), Some("13"));
        assert_eq!(form.get("pfile"), None);
        assert_eq!(form.fields()[1].name(), "pfile");
    }

    #[test]
    fn test_set_cookie_removal() {
        let now = Utc::now();

        let mut cookie = SetCookie::new("AURSID", "deleted");
        cookie.max_age = Some(Duration::ZERO);
        assert!(cookie.is_removal(now));

        let mut cookie = SetCookie::new("AURSID", "deleted");
        cookie.expires = DateTime::<Utc>::from_timestamp(1, 0);
        assert!(cookie.is_removal(now));

        let mut cookie = SetCookie::new("AURSID", "fresh");
        cookie.max_age = Some(Duration::from_secs(3600));
        assert!(!cookie.is_removal(now));
        assert_eq!(cookie.expiry(now), Some(now + chrono::Duration::hours(1)));

        assert!(!SetCookie::new("AURSID", "session").is_removal(now));
    }

    #[test]
    fn test_error_for_status() {
        let response = HttpResponse {
            status: 503,
            ..Default::default()
        };
        let err = response.error_for_status().unwrap_err();
        assert!(matches!(err, Error::UnexpectedStatus { status: 503 }));

        let response = HttpResponse {
            status: 302,
            ..Default::default()
        };
        assert!(response.error_for_status().is_ok());
    }

    #[test]
    fn test_session_cookie_lookup() {
        let response = HttpResponse {
            status: 302,
            cookies: vec![
                SetCookie::new("AURLANG", "en"),
                SetCookie::new("AURSID", "abc"),
            ],
            ..Default::default()
        };
        assert_eq!(response.session_cookie().unwrap().value, "abc");
    }
}
