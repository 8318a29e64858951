//! Session management
//!
//! This module owns everything about the `AURSID` session: the token itself,
//! its on-disk persistence, and the login/probe/logout exchanges that create,
//! validate and end it.

pub mod auth;
pub mod store;
pub mod token;

pub use auth::{AuthManager, AuthState, Credentials, LoginMethod, LoginRequest, Session};
pub use store::SessionStore;
pub use token::{SESSION_COOKIE, SessionToken};
