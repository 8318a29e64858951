//! Package upload
//!
//! Submits source archives to the service, one file per request.

pub mod manager;

pub use manager::UploadManager;
