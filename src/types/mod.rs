//! Type definitions for the AUR client
//!
//! This module contains the category table and per-file upload results.

pub mod category;
pub mod report;

pub use category::{CATEGORIES, Category, CategoryId, category_names};
pub use report::{UploadOutcome, UploadReport};
