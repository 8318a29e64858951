//! Upload Manager
//!
//! Encodes one archive plus its category as a multipart POST to the submit
//! endpoint and interprets the answer. The service signals success by
//! redirecting to the package page; anything else is a failure, described
//! by the error block on the returned page.

use std::fs;
use std::path::Path;

use tracing::{debug, info};

use crate::session::SessionToken;
use crate::transport::{HttpRequest, HttpResponse, MultipartForm, ServiceUrl, Transport};
use crate::types::CategoryId;
use crate::utils::html::extract_service_error;
use crate::{Error, Result};

const SUBMIT_PATH: &str = "/submit";

/// Path fragments of the pages a successful submission redirects to
const PACKAGE_PAGES: &[&str] = &["/packages/", "/pkgbase/"];

/// Uploads archives on behalf of an authenticated session
#[derive(Debug)]
pub struct UploadManager<'a, T: Transport> {
    transport: &'a T,
    service: &'a ServiceUrl,
}

impl<'a, T: Transport> UploadManager<'a, T> {
    pub fn new(transport: &'a T, service: &'a ServiceUrl) -> Self {
        Self { transport, service }
    }

    /// Upload `path` tagged with `category`.
    ///
    /// On rejection the service's own message is returned in
    /// [`Error::Upload`].
    pub fn upload(&self, token: &SessionToken, path: &Path, category: CategoryId) -> Result<()> {
        check_regular_file(path)?;

        info!("uploading {} with category {}", path.display(), category);

        let form = MultipartForm::new()
            .text("category", category.as_str())
            .text("token", token.value())
            .text("pkgsubmit", "1")
            .file("pfile", path);
        let request = HttpRequest::post(self.service.join(SUBMIT_PATH))
            .cookie(token.cookie_header())
            .form(form);

        let response = self.transport.send(&request)?.error_for_status()?;
        interpret_response(&response)
    }
}

fn check_regular_file(path: &Path) -> Result<()> {
    let metadata =
        fs::metadata(path).map_err(|e| Error::invalid_file(path, e.to_string()))?;
    if !metadata.is_file() {
        return Err(Error::invalid_file(path, "not a regular file"));
    }
    Ok(())
}

fn interpret_response(response: &HttpResponse) -> Result<()> {
    if let Some(location) = &response.location {
        debug!("submission redirected to {}", location);
        if PACKAGE_PAGES.iter().any(|page| location.contains(page)) {
            return Ok(());
        }
    }

    match extract_service_error(&response.body) {
        Some(message) => Err(Error::upload(message)),
        None => Err(Error::protocol(format!(
            "unrecognized upload response (HTTP {})",
            response.status
        ))),
    }
}
