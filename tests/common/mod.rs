//! Common test utilities and helpers
//!
//! Shared fixtures for integration tests that drive a real HTTP client
//! against a local mockito server.

#![allow(dead_code)]

use std::io::Write;
use std::path::{Path, PathBuf};
use std::time::Duration;

use burp::Client;
use tempfile::TempDir;

pub const LOGGED_IN_PAGE: &str = r#"<html><body>
<div id="archdev-navbar"><ul>
<li><a href="/account/alice">My Account</a></li>
<li><form action="/logout" method="post"><input type="submit" value="Logout"></form></li>
</ul></div></body></html>"#;

pub const LOGGED_OUT_PAGE: &str = r#"<html><body>
<div id="archdev-navbar"><ul><li><a href="/login">Login</a></li></ul></div>
</body></html>"#;

/// Login page carrying the service's error list
pub fn error_page(message: &str) -> String {
    format!(
        r#"<html><body><div class="box"><ul class="errorlist"><li>{}</li></ul></div></body></html>"#,
        message
    )
}

/// `Set-Cookie` value issuing a fresh session
pub fn session_cookie(value: &str) -> String {
    format!("AURSID={}; Path=/; Max-Age=2592000; HttpOnly; SameSite=Lax", value)
}

/// `Set-Cookie` value deleting the session
pub const CLEARED_COOKIE: &str = "AURSID=deleted; Path=/; Max-Age=0; HttpOnly";

/// Client for the mockito server over plain HTTP
pub fn client_for(server: &mockito::Server) -> Client {
    Client::with_timeout(&server.host_with_port(), false, Duration::from_secs(5)).unwrap()
}

/// Client with a username, password and cookie file already set
pub fn logged_out_client(server: &mockito::Server, cookies: &Path, persist: bool) -> Client {
    let mut client = client_for(server);
    client.set_username("alice");
    client.set_password("secret");
    client.set_cookie_path(cookies);
    client.set_persist(persist);
    client
}

/// Write a small fake source archive into `dir`
pub fn archive(dir: &TempDir, name: &str) -> PathBuf {
    let path = dir.path().join(name);
    let mut file = std::fs::File::create(&path).unwrap();
    file.write_all(b"not really a tarball").unwrap();
    path
}
