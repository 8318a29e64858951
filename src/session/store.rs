//! Session Store
//!
//! Persists the session cookie between runs. The file uses the Netscape
//! cookie-jar layout that curl reads and writes, so jars written by other
//! tools keep working:
//!
//! ```text
//! #HttpOnly_aur.archlinux.org	FALSE	/	TRUE	1767225600	AURSID	<value>
//! ```
//!
//! Seven tab-separated fields: domain, include-subdomains flag, path, secure
//! flag, expiry (unix seconds, `0` for a session cookie), name, value.

use std::fs;
use std::io::{self, Write};
use std::path::{Path, PathBuf};

use chrono::{DateTime, Utc};
use tracing::{debug, info};

use super::token::{SESSION_COOKIE, SessionToken, host_of};
use crate::Result;

const HTTP_ONLY_PREFIX: &str = "#HttpOnly_";

const JAR_HEADER: &str = "# Netscape HTTP Cookie File\n\
# This file was generated by burp. Edit at your own risk.\n\n";

/// File-backed storage for the session cookie
#[derive(Debug, Clone)]
pub struct SessionStore {
    path: PathBuf,
}

impl SessionStore {
    pub fn new(path: impl Into<PathBuf>) -> Self {
        Self { path: path.into() }
    }

    pub fn path(&self) -> &Path {
        &self.path
    }

    /// Read the session cookie for `domain`.
    ///
    /// A missing file yields `Ok(None)`; any other read failure is an error.
    pub fn load(&self, domain: &str) -> Result<Option<SessionToken>> {
        let content = match fs::read_to_string(&self.path) {
            Ok(content) => content,
            Err(e) if e.kind() == io::ErrorKind::NotFound => {
                debug!("cookie file {:?} does not exist", self.path);
                return Ok(None);
            }
            Err(e) => return Err(e.into()),
        };

        let token = content
            .lines()
            .filter_map(parse_jar_line)
            .find(|(name, token)| name == SESSION_COOKIE && token.belongs_to(domain))
            .map(|(_, token)| token);

        debug!(
            "cookie file {:?}: session cookie {}",
            self.path,
            if token.is_some() { "found" } else { "not found" }
        );

        Ok(token)
    }

    /// Replace the file's content with `token`.
    pub fn save(&self, token: &SessionToken) -> Result<()> {
        let mut content = String::from(JAR_HEADER);
        content.push_str(&format_jar_line(token));
        content.push('\n');
        self.write(&content)?;
        info!("saved session cookie to {:?}", self.path);
        Ok(())
    }

    /// Drop any stored session, leaving an empty jar behind.
    pub fn clear(&self) -> Result<()> {
        if !self.path.exists() {
            return Ok(());
        }
        self.write(JAR_HEADER)?;
        debug!("cleared session cookie in {:?}", self.path);
        Ok(())
    }

    fn write(&self, content: &str) -> Result<()> {
        if let Some(parent) = self.path.parent()
            && !parent.as_os_str().is_empty()
        {
            fs::create_dir_all(parent)?;
        }

        let mut options = fs::OpenOptions::new();
        options.write(true).create(true).truncate(true);
        #[cfg(unix)]
        {
            use std::os::unix::fs::OpenOptionsExt;
            options.mode(0o600);
        }

        let mut file = options.open(&self.path)?;
        file.write_all(content.as_bytes())?;
        file.sync_all()?;
        Ok(())
    }
}

/// Parse one jar line into (cookie name, token). Comments, blank lines and
/// malformed lines yield `None`.
fn parse_jar_line(line: &str) -> Option<(String, SessionToken)> {
    let line = line.trim_end_matches(['\r', '\n']);
    let line = match line.strip_prefix(HTTP_ONLY_PREFIX) {
        Some(rest) => rest,
        None if line.starts_with('#') || line.trim().is_empty() => return None,
        None => line,
    };

    let fields: Vec<&str> = line.split('\t').collect();
    let [domain, _subdomains, _path, _secure, expires, name, value] = fields[..] else {
        return None;
    };

    let expires: i64 = expires.parse().ok()?;
    let expires = if expires == 0 {
        None
    } else {
        Some(DateTime::<Utc>::from_timestamp(expires, 0)?)
    };

    Some((
        name.to_string(),
        SessionToken::new(domain, value).with_expires(expires),
    ))
}

fn format_jar_line(token: &SessionToken) -> String {
    let host = host_of(token.domain());
    let expires = token.expires().map(|t| t.timestamp()).unwrap_or(0);
    format!(
        "{}{}\tFALSE\t/\tTRUE\t{}\t{}\t{}",
        HTTP_ONLY_PREFIX,
        host,
        expires,
        SESSION_COOKIE,
        token.value()
    )
}
