//! Command-line logic
//!
//! Contains the logic behind the `burp` binary, kept in the library so it can
//! be driven with a scripted transport in tests.

pub mod upload;

pub use upload::{
    EXIT_FAILURE, EXIT_SUCCESS, UploadArgs, login_error_message, login_with_fallback, run_upload,
    write_categories,
};
