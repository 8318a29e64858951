//! Client facade
//!
//! [`Client`] is the single handle the command line works with. It carries
//! the service address, the identity, the cookie policy and, once logged in,
//! the live session.
//!
//! # Examples
//!
//! ```no_run
//! use burp::{Client, types::CategoryId};
//! use std::path::Path;
//!
//! # fn example() -> burp::Result<()> {
//! let mut client = Client::new("aur.archlinux.org", true)?;
//! client.set_username("alice");
//! client.set_password("secret");
//! client.login(true)?;
//! client.upload(Path::new("foo-1.0-1.src.tar.gz"), CategoryId::unspecified())?;
//! # Ok(())
//! # }
//! ```

use std::path::{Path, PathBuf};
use std::time::Duration;

use tracing::{debug, warn};

use crate::config::Settings;
use crate::session::{
    AuthManager, AuthState, Credentials, LoginMethod, LoginRequest, SessionStore, SessionToken,
};
use crate::transport::{HttpTransport, ServiceUrl, Transport, http::DEFAULT_TIMEOUT};
use crate::types::{CategoryId, UploadReport};
use crate::upload::UploadManager;
use crate::{Error, Result};

/// What a successful [`Client::login`] did
#[derive(Debug)]
pub struct LoginOutcome {
    pub method: LoginMethod,
    /// The session is live but could not be written to the cookie file
    pub persist_error: Option<Error>,
}

/// Handle combining identity, cookie policy and the current session
#[derive(Debug)]
pub struct Client<T: Transport = HttpTransport> {
    service: ServiceUrl,
    transport: T,
    credentials: Credentials,
    cookie_path: Option<PathBuf>,
    persist: bool,
    state: AuthState,
    token: Option<SessionToken>,
}

impl Client<HttpTransport> {
    /// Create a client for `domain`.
    ///
    /// `secure` selects HTTPS. Certificate verification is always on; plain
    /// HTTP exists for local test servers.
    pub fn new(domain: &str, secure: bool) -> Result<Self> {
        Self::with_timeout(domain, secure, DEFAULT_TIMEOUT)
    }

    pub fn with_timeout(domain: &str, secure: bool, timeout: Duration) -> Result<Self> {
        Self::with_transport(domain, secure, HttpTransport::new(timeout)?)
    }

    /// Create and configure a client from loaded settings
    pub fn from_settings(settings: &Settings) -> Result<Self> {
        let mut client = Self::with_timeout(&settings.aur.domain, true, settings.network.timeout())?;
        if let Some(user) = &settings.aur.user {
            client.set_username(user.as_str());
        }
        if let Some(password) = &settings.aur.password {
            client.set_password(password.as_str());
        }
        if let Some(cookies) = &settings.aur.cookies {
            client.set_cookie_path(cookies.as_path());
        }
        client.set_persist(settings.aur.persist);
        Ok(client)
    }
}

impl<T: Transport> Client<T> {
    /// Create a client that talks through `transport`
    pub fn with_transport(domain: &str, secure: bool, transport: T) -> Result<Self> {
        let service = ServiceUrl::new(domain, secure)?;
        debug!(
            "created new AUR client for {}://{}",
            service.scheme(),
            service.domain()
        );

        Ok(Self {
            service,
            transport,
            credentials: Credentials::default(),
            cookie_path: None,
            persist: false,
            state: AuthState::NoSession,
            token: None,
        })
    }

    // Setters are meant for configuration before login. Changing the
    // password after a failed cookie login, ahead of the password retry, is
    // the one later use.

    pub fn set_username(&mut self, username: impl Into<String>) {
        self.credentials.username = Some(username.into());
    }

    pub fn set_password(&mut self, password: impl Into<String>) {
        self.credentials.password = Some(password.into());
    }

    pub fn set_cookie_path(&mut self, path: impl Into<PathBuf>) {
        self.cookie_path = Some(path.into());
    }

    pub fn set_persist(&mut self, persist: bool) {
        self.persist = persist;
    }

    pub fn domain(&self) -> &str {
        self.service.domain()
    }

    pub fn username(&self) -> Option<&str> {
        self.credentials.username.as_deref()
    }

    pub fn has_password(&self) -> bool {
        self.credentials.password.is_some()
    }

    pub fn cookie_path(&self) -> Option<&Path> {
        self.cookie_path.as_deref()
    }

    pub fn persist(&self) -> bool {
        self.persist
    }

    pub fn state(&self) -> AuthState {
        self.state
    }

    pub fn is_authenticated(&self) -> bool {
        self.state == AuthState::Authenticated && self.token.is_some()
    }

    pub fn token(&self) -> Option<&SessionToken> {
        self.token.as_ref()
    }

    pub fn transport(&self) -> &T {
        &self.transport
    }

    /// Whether `login(force_password)` would go to password login
    pub fn will_use_password(&self, force_password: bool) -> bool {
        force_password || self.cookie_path.is_none()
    }

    /// Establish a session.
    ///
    /// With `force_password == false` and a cookie file configured, the
    /// stored session is tried; [`Error::NoKey`] and [`Error::KeyExpired`]
    /// tell the caller to call again with `force_password == true`.
    pub fn login(&mut self, force_password: bool) -> Result<LoginOutcome> {
        let store = self.cookie_path.as_ref().map(SessionStore::new);
        let request = LoginRequest {
            credentials: &self.credentials,
            store: store.as_ref(),
            persist: self.persist,
            force_password,
        };
        self.state = if AuthManager::<T>::uses_password(&request) {
            AuthState::AttemptingPassword
        } else {
            AuthState::AttemptingCookie
        };

        let auth = AuthManager::new(&self.transport, &self.service);
        match auth.login(&request) {
            Ok(session) => {
                self.state = AuthState::Authenticated;
                self.token = Some(session.token);
                Ok(LoginOutcome {
                    method: session.method,
                    persist_error: session.persist_error,
                })
            }
            Err(e) => {
                debug!("login failed: {}", e);
                self.state = AuthState::Failed;
                self.token = None;
                Err(e)
            }
        }
    }

    /// Upload one archive. Requires a prior successful login.
    pub fn upload(&self, path: &Path, category: CategoryId) -> Result<()> {
        let Some(token) = self.token.as_ref().filter(|_| self.is_authenticated()) else {
            return Err(Error::NoKey);
        };
        UploadManager::new(&self.transport, &self.service).upload(token, path, category)
    }

    /// Upload each archive in turn; a failure never stops the remaining ones.
    pub fn upload_all<P: AsRef<Path>>(&self, paths: &[P], category: CategoryId) -> UploadReport {
        let mut report = UploadReport::new();
        for path in paths {
            let path = path.as_ref();
            let result = self.upload(path, category);
            if let Err(e) = &result {
                warn!("failed to upload {}: {}", path.display(), e);
            }
            report.record(path, result);
        }
        report
    }

    /// End the session on the service and forget it locally.
    ///
    /// Without a live session, a persisted cookie is used if one exists;
    /// with nothing to end this is a no-op.
    pub fn logout(&mut self) -> Result<()> {
        let store = self.cookie_path.as_ref().map(SessionStore::new);
        let token = match &self.token {
            Some(token) => Some(token.clone()),
            None => match &store {
                Some(store) => store.load(self.service.domain())?,
                None => None,
            },
        };

        let Some(token) = token else {
            debug!("no session to log out of");
            return Ok(());
        };

        // The live session survives a failed logout request
        AuthManager::new(&self.transport, &self.service).logout(&token)?;
        self.token = None;
        self.state = AuthState::NoSession;

        if self.persist
            && let Some(store) = &store
        {
            store.clear()?;
        }
        Ok(())
    }
}

impl<T: Transport> Drop for Client<T> {
    fn drop(&mut self) {
        debug!(
            "destroying AUR client for {}://{}",
            self.service.scheme(),
            self.service.domain()
        );
    }
}
