//! Error handling for the AUR client
//!
//! This module defines the error taxonomy returned by login, upload and
//! configuration loading.

pub mod types;

pub use types::{Error, Result};
