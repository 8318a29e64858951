//! Utility functions and helpers
//!
//! This module contains utility functions used throughout the application.

pub mod html;
pub mod path;
pub mod version;

pub use html::extract_service_error;
pub use path::expand_path;
pub use version::{VERSION, get_version};
