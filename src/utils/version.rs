//! Version information

/// Crate version, as set at build time
pub const VERSION: &str = env!("CARGO_PKG_VERSION");

/// Get the version string
pub fn get_version() -> &'static str {
    VERSION
}
