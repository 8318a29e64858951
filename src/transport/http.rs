//! Blocking reqwest transport

use std::time::Duration;

use chrono::{DateTime, Utc};
use reqwest::blocking::{Client, multipart};
use reqwest::header::{COOKIE, LOCATION};
use reqwest::redirect::Policy;
use tracing::{debug, info};

use super::{FormField, HttpRequest, HttpResponse, Method, MultipartForm, SetCookie, Transport};
use crate::{Result, utils::version};

/// Default per-request timeout
pub const DEFAULT_TIMEOUT: Duration = Duration::from_secs(30);

/// Transport backed by a blocking reqwest client.
///
/// Certificate verification stays on; redirects are not followed.
#[derive(Debug, Clone)]
pub struct HttpTransport {
    client: Client,
}

impl HttpTransport {
    pub fn new(timeout: Duration) -> Result<Self> {
        let client = Client::builder()
            .user_agent(format!("burp/{}", version::get_version()))
            .redirect(Policy::none())
            .timeout(timeout)
            .connect_timeout(timeout)
            .build()?;

        Ok(Self { client })
    }
}

impl Transport for HttpTransport {
    fn send(&self, request: &HttpRequest) -> Result<HttpResponse> {
        info!("creating {} request to {}", request.method.as_str(), request.url);

        let mut builder = match request.method {
            Method::Get => self.client.get(&request.url),
            Method::Post => self.client.post(&request.url),
        };

        for (name, value) in &request.headers {
            builder = builder.header(name.as_str(), value.as_str());
        }

        if let Some(cookie) = &request.cookie {
            builder = builder.header(COOKIE, cookie.as_str());
        }

        if let Some(form) = &request.form {
            builder = builder.multipart(build_form(form)?);
        }

        let response = builder.send()?;
        let status = response.status().as_u16();
        info!("server responded with status {}", status);

        let location = response
            .headers()
            .get(LOCATION)
            .and_then(|v| v.to_str().ok())
            .map(str::to_string);

        let cookies: Vec<SetCookie> = response
            .cookies()
            .map(|c| SetCookie {
                name: c.name().to_string(),
                value: c.value().to_string(),
                expires: c.expires().map(DateTime::<Utc>::from),
                max_age: c.max_age(),
            })
            .collect();
        debug!(
            "response set cookies: {:?}",
            cookies.iter().map(|c| c.name.as_str()).collect::<Vec<_>>()
        );

        let body = response.text()?;

        Ok(HttpResponse {
            status,
            location,
            cookies,
            body,
        })
    }
}

fn build_form(form: &MultipartForm) -> Result<multipart::Form> {
    let mut out = multipart::Form::new();
    for field in form.fields() {
        out = match field {
            FormField::Text { name, value } => {
                debug!("  appending form field: {}", name);
                out.text(name.clone(), value.clone())
            }
            FormField::File { name, path } => {
                debug!("  appending form file: {}={}", name, path.display());
                out.file(name.clone(), path)?
            }
        };
    }
    Ok(out)
}
