//! Per-file upload results

use std::path::{Path, PathBuf};

use crate::Error;

/// Result of uploading a single file
#[derive(Debug)]
pub struct UploadOutcome {
    /// File that was submitted
    pub path: PathBuf,
    /// `None` on success
    pub error: Option<Error>,
}

impl UploadOutcome {
    pub fn success(path: impl Into<PathBuf>) -> Self {
        Self {
            path: path.into(),
            error: None,
        }
    }

    pub fn failure(path: impl Into<PathBuf>, error: Error) -> Self {
        Self {
            path: path.into(),
            error: Some(error),
        }
    }

    pub fn is_success(&self) -> bool {
        self.error.is_none()
    }

    /// Human-readable failure text; the service's own message when it sent
    /// one.
    pub fn message(&self) -> Option<String> {
        self.error.as_ref().map(|e| {
            e.service_message()
                .map(str::to_string)
                .unwrap_or_else(|| e.to_string())
        })
    }
}

/// Results of an upload batch, in submission order
#[derive(Debug, Default)]
pub struct UploadReport {
    outcomes: Vec<UploadOutcome>,
}

impl UploadReport {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn record(&mut self, path: &Path, result: crate::Result<()>) {
        let outcome = match result {
            Ok(()) => UploadOutcome::success(path),
            Err(e) => UploadOutcome::failure(path, e),
        };
        self.outcomes.push(outcome);
    }

    pub fn outcomes(&self) -> &[UploadOutcome] {
        &self.outcomes
    }

    pub fn succeeded(&self) -> usize {
        self.outcomes.iter().filter(|o| o.is_success()).count()
    }

    pub fn failed(&self) -> usize {
        self.outcomes.len() - self.succeeded()
    }

    /// True when at least one file failed
    pub fn has_failures(&self) -> bool {
        self.outcomes.iter().any(|o| !o.is_success())
    }

    pub fn len(&self) -> usize {
        self.outcomes.len()
    }

    pub fn is_empty(&self) -> bool {
        self.outcomes.is_empty()
    }
}
