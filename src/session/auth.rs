//! Auth Manager
//!
//! Turns credentials or a stored cookie into an authenticated session.
//!
//! A login attempt moves through
//! `NoSession -> AttemptingCookie -> AttemptingPassword -> Authenticated | Failed`,
//! entering at the cookie or the password step depending on the caller's
//! `force_password` flag and on whether a cookie file is configured. Cookie
//! failures that the caller can recover from ([`Error::NoKey`],
//! [`Error::KeyExpired`]) are returned as-is; the caller then retries once
//! with `force_password = true`.

use chrono::Utc;
use tracing::{debug, info, warn};

use super::store::SessionStore;
use super::token::SessionToken;
use crate::transport::{HttpRequest, HttpResponse, MultipartForm, ServiceUrl, Transport};
use crate::utils::html::{extract_service_error, has_logout_action};
use crate::{Error, Result};

const LOGIN_PATH: &str = "/login";
const LOGOUT_PATH: &str = "/logout";
const PROBE_PATH: &str = "/";

/// Where a login attempt stands
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum AuthState {
    #[default]
    NoSession,
    AttemptingCookie,
    AttemptingPassword,
    Authenticated,
    Failed,
}

/// How the session was obtained
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum LoginMethod {
    Cookie,
    Password,
}

/// Username and password, either of which may be missing
#[derive(Clone, Default)]
pub struct Credentials {
    pub username: Option<String>,
    pub password: Option<String>,
}

impl std::fmt::Debug for Credentials {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Credentials")
            .field("username", &self.username)
            .field("password", &self.password.as_ref().map(|_| "<redacted>"))
            .finish()
    }
}

/// Everything one login attempt needs besides the transport
#[derive(Debug, Clone, Copy)]
pub struct LoginRequest<'a> {
    pub credentials: &'a Credentials,
    /// Cookie file, when one is configured
    pub store: Option<&'a SessionStore>,
    /// Write the session back to `store` once authenticated
    pub persist: bool,
    pub force_password: bool,
}

/// A successful login
#[derive(Debug)]
pub struct Session {
    pub token: SessionToken,
    pub method: LoginMethod,
    /// Set when the session could not be written to the cookie file; the
    /// session itself is still valid.
    pub persist_error: Option<Error>,
}

/// Runs login, probe and logout requests against the service
#[derive(Debug)]
pub struct AuthManager<'a, T: Transport> {
    transport: &'a T,
    service: &'a ServiceUrl,
}

impl<'a, T: Transport> AuthManager<'a, T> {
    pub fn new(transport: &'a T, service: &'a ServiceUrl) -> Self {
        Self { transport, service }
    }

    /// Whether `request` would go straight to password login
    pub fn uses_password(request: &LoginRequest<'_>) -> bool {
        request.force_password || request.store.is_none()
    }

    /// Run one login attempt.
    pub fn login(&self, request: &LoginRequest<'_>) -> Result<Session> {
        let (token, method) = match request.store {
            Some(store) if !request.force_password => {
                debug!(state = ?AuthState::AttemptingCookie, "login state");
                (self.login_cookie(store)?, LoginMethod::Cookie)
            }
            _ => {
                debug!(state = ?AuthState::AttemptingPassword, "login state");
                (
                    self.login_password(request.credentials)?,
                    LoginMethod::Password,
                )
            }
        };
        debug!(state = ?AuthState::Authenticated, "login state");

        let persist_error = match request.store {
            Some(store) if request.persist => store.save(&token).err().inspect(|e| {
                warn!("failed to save session cookie to {:?}: {}", store.path(), e);
            }),
            None if request.persist => {
                warn!("cookie persistence requested without a cookie file");
                None
            }
            _ => None,
        };

        Ok(Session {
            token,
            method,
            persist_error,
        })
    }

    /// Reuse the session stored in `store`.
    pub fn login_cookie(&self, store: &SessionStore) -> Result<SessionToken> {
        info!("attempting login by cookie from {:?}", store.path());

        let Some(token) = store.load(self.service.domain())? else {
            return Err(Error::NoKey);
        };

        if token.is_expired() {
            warn!("stored session cookie expired at {:?}", token.expires());
            return Err(Error::KeyExpired);
        }

        self.validate(&token)
    }

    /// Ask the service whether `token` still names a live session.
    ///
    /// Returns the token to keep using, which is the refreshed one if the
    /// service re-issued the cookie.
    pub fn validate(&self, token: &SessionToken) -> Result<SessionToken> {
        let request =
            HttpRequest::get(self.service.join(PROBE_PATH)).cookie(token.cookie_header());
        let response = self.transport.send(&request)?;
        if matches!(response.status, 401 | 403) {
            info!("service refused the session cookie (HTTP {})", response.status);
            return Err(Error::KeyRejected);
        }
        let response = response.error_for_status()?;
        let now = Utc::now();

        if let Some(cookie) = response.session_cookie()
            && cookie.is_removal(now)
        {
            info!("service expired the session cookie");
            return Err(Error::KeyExpired);
        }

        if !has_logout_action(&response.body) {
            info!("service did not accept the session cookie");
            return Err(Error::KeyRejected);
        }

        info!("session cookie accepted");
        Ok(match response.session_cookie() {
            Some(cookie) if !cookie.value.is_empty() => {
                SessionToken::new(self.service.domain(), cookie.value.clone())
                    .with_expires(cookie.expiry(now).or(token.expires()))
            }
            _ => token.clone(),
        })
    }

    /// Log in with username and password.
    pub fn login_password(&self, credentials: &Credentials) -> Result<SessionToken> {
        let (Some(username), Some(password)) = (&credentials.username, &credentials.password)
        else {
            return Err(Error::InsufficientCredentials);
        };

        info!("attempting login by password as user {}", username);

        let form = MultipartForm::new()
            .text("user", username.as_str())
            .text("passwd", password.as_str())
            .text("remember_me", "on");
        let request = HttpRequest::post(self.service.join(LOGIN_PATH)).form(form);
        let response = self.transport.send(&request)?.error_for_status()?;

        if response.location.is_none() {
            return Err(login_rejection(&response));
        }

        let now = Utc::now();
        match response.session_cookie() {
            Some(cookie) if !cookie.is_removal(now) && !cookie.value.is_empty() => {
                info!("logged in as {}", username);
                Ok(
                    SessionToken::new(self.service.domain(), cookie.value.clone())
                        .with_expires(cookie.expiry(now)),
                )
            }
            _ => Err(Error::protocol("login accepted but no session cookie was issued")),
        }
    }

    /// End `token`'s session on the service.
    pub fn logout(&self, token: &SessionToken) -> Result<()> {
        info!("logging out");
        let request =
            HttpRequest::post(self.service.join(LOGOUT_PATH)).cookie(token.cookie_header());
        let response = self.transport.send(&request)?.error_for_status()?;

        if !response
            .session_cookie()
            .is_some_and(|c| c.is_removal(Utc::now()))
        {
            debug!("logout response did not clear the session cookie");
        }
        Ok(())
    }
}

fn login_rejection(response: &HttpResponse) -> Error {
    match extract_service_error(&response.body) {
        Some(message) => {
            info!("login rejected: {}", message);
            Error::bad_credentials(message)
        }
        None => Error::protocol(format!(
            "unrecognized login response (HTTP {})",
            response.status
        )),
    }
}
