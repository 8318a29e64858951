//! Error type definitions
//!
//! Defines the error taxonomy shared by login, upload and configuration.

use std::path::PathBuf;

use thiserror::Error;

/// Main error type for the AUR client
#[derive(Error, Debug)]
pub enum Error {
    /// Password login needs both a username and a password
    #[error("insufficient credentials provided to login")]
    InsufficientCredentials,

    /// The service rejected the username/password pair
    #[error("bad username or password")]
    BadCredentials {
        /// Text of the service's rejection, when it sent one
        message: Option<String>,
    },

    /// The session cookie exists but has expired
    #[error("required login cookie has expired")]
    KeyExpired,

    /// The session cookie was refused by the service
    #[error("login cookie not accepted")]
    KeyRejected,

    /// No session cookie is available
    #[error("no session cookie available")]
    NoKey,

    /// Network, timeout or TLS failure
    #[error("Network error: {0}")]
    Transport(#[from] reqwest::Error),

    /// The response could not be understood
    #[error("Protocol error: {0}")]
    Protocol(String),

    /// The service answered with an error status
    #[error("server responded with HTTP status {status}")]
    UnexpectedStatus { status: u16 },

    /// The service refused an upload; carries the service's own text
    #[error("{message}")]
    Upload { message: String },

    /// Configuration-related errors
    #[error("Configuration error: {0}")]
    Config(String),

    /// The domain is not a usable host name
    #[error("invalid domain: {0}")]
    InvalidDomain(String),

    /// Unknown category name
    #[error("invalid category {0}")]
    InvalidCategory(String),

    /// The upload target is not a regular file
    #[error("{}: {reason}", path.display())]
    InvalidFile { path: PathBuf, reason: String },

    /// I/O errors
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),
}

/// Result type alias for convenience
pub type Result<T> = std::result::Result<T, Error>;

impl Error {
    /// Create a bad credentials error carrying the service's message
    pub fn bad_credentials(message: impl Into<String>) -> Self {
        Self::BadCredentials {
            message: Some(message.into()),
        }
    }

    /// Create a new protocol error
    pub fn protocol(msg: impl Into<String>) -> Self {
        Self::Protocol(msg.into())
    }

    /// Create an upload error from the service's message
    pub fn upload(message: impl Into<String>) -> Self {
        Self::Upload {
            message: message.into(),
        }
    }

    /// Create a new configuration error
    pub fn config(msg: impl Into<String>) -> Self {
        Self::Config(msg.into())
    }

    /// Create an invalid file error
    pub fn invalid_file(path: impl Into<PathBuf>, reason: impl Into<String>) -> Self {
        Self::InvalidFile {
            path: path.into(),
            reason: reason.into(),
        }
    }

    /// Whether a cookie login failure should be followed by exactly one
    /// forced password login.
    pub fn is_retryable_login(&self) -> bool {
        matches!(self, Self::NoKey | Self::KeyExpired)
    }

    /// Message the service itself supplied, if any
    pub fn service_message(&self) -> Option<&str> {
        match self {
            Self::Upload { message } => Some(message),
            Self::BadCredentials { message } => message.as_deref(),
            _ => None,
        }
    }
}
