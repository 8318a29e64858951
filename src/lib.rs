//! burp - AUR upload client
//!
//! Logs in to the Arch User Repository and uploads source archives on the
//! user's behalf, tagging each with a category.
//!
//! # Architecture
//!
//! - [`session`]: the `AURSID` session token, its cookie-file persistence,
//!   and password/cookie login
//! - [`transport`]: HTTP requests to the service, including multipart bodies
//! - [`upload`]: submitting one archive and reading the service's verdict
//! - [`client`]: the [`Client`] facade tying these together
//! - [`config`] and [`cli`]: settings loading and the command-line run
//!
//! # Usage
//!
//! ```bash
//! burp -u alice -c network foo-1.0-1.src.tar.gz
//! ```
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
//! client.set_cookie_path("/home/alice/.cache/burp.cookies");
//! client.set_persist(true);
//!
//! match client.login(false) {
//!     Err(e) if e.is_retryable_login() => {
//!         client.login(true)?;
//!     }
//!     other => {
//!         other?;
//!     }
//! }
//!
//! client.upload(Path::new("foo-1.0-1.src.tar.gz"), CategoryId::unspecified())?;
//! # Ok(())
//! # }
//! ```

pub mod cli;
pub mod client;
pub mod config;
pub mod error;
pub mod session;
pub mod transport;
pub mod types;
pub mod upload;
pub mod utils;

pub use client::{Client, LoginOutcome};
pub use config::{ConfigLoader, Settings, SettingsOverrides};
pub use error::{Error, Result};
pub use session::{AuthState, LoginMethod, SessionStore, SessionToken};
pub use types::{CategoryId, UploadReport};
