//! Scripted transport for unit tests

use std::cell::RefCell;
use std::collections::VecDeque;

use super::{HttpRequest, HttpResponse, SetCookie, Transport};
use crate::{Error, Result};

/// Replays queued responses in order and records every request.
///
/// Sending with an empty queue is a protocol error, so an unexpected call
/// shows up as a failed assertion rather than a hang.
#[derive(Debug, Default)]
pub struct FakeTransport {
    responses: RefCell<VecDeque<Result<HttpResponse>>>,
    requests: RefCell<Vec<HttpRequest>>,
}

impl FakeTransport {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn respond(self, response: HttpResponse) -> Self {
        self.responses.borrow_mut().push_back(Ok(response));
        self
    }

    pub fn fail(self, error: Error) -> Self {
        self.responses.borrow_mut().push_back(Err(error));
        self
    }

    pub fn requests(&self) -> Vec<HttpRequest> {
        self.requests.borrow().clone()
    }

    pub fn request_count(&self) -> usize {
        self.requests.borrow().len()
    }
}

impl Transport for FakeTransport {
    fn send(&self, request: &HttpRequest) -> Result<HttpResponse> {
        self.requests.borrow_mut().push(request.clone());
        self.responses
            .borrow_mut()
            .pop_front()
            .unwrap_or_else(|| Err(Error::protocol(format!("unexpected request to {}", request.url))))
    }
}

pub fn ok_page(body: &str) -> HttpResponse {
    HttpResponse {
        status: 200,
        body: body.to_string(),
        ..Default::default()
    }
}

pub fn redirect(location: &str) -> HttpResponse {
    HttpResponse {
        status: 302,
        location: Some(location.to_string()),
        ..Default::default()
    }
}

pub fn with_session_cookie(mut response: HttpResponse, value: &str) -> HttpResponse {
    let mut cookie = SetCookie::new("AURSID", value);
    cookie.max_age = Some(std::time::Duration::from_secs(30 * 24 * 3600));
    response.cookies.push(cookie);
    response
}

pub fn clearing_session_cookie(mut response: HttpResponse) -> HttpResponse {
    let mut cookie = SetCookie::new("AURSID", "deleted");
    cookie.max_age = Some(std::time::Duration::ZERO);
    response.cookies.push(cookie);
    response
}

pub const LOGGED_IN_PAGE: &str = r#"<html><body>
<div id="archdev-navbar"><ul>
<li><a href="/account/alice">My Account</a></li>
<li><form action="/logout" method="post"><input type="submit" value="Logout"></form></li>
</ul></div></body></html>"#;

pub const LOGGED_OUT_PAGE: &str = r#"<html><body>
<div id="archdev-navbar"><ul><li><a href="/login">Login</a></li></ul></div>
</body></html>"#;

pub fn error_page(message: &str) -> String {
    format!(
        r#"<html><body><div class="box"><ul class="errorlist"><li>{}</li></ul></div></body></html>"#,
        message
    )
}
