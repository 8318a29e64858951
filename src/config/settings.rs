//! Configuration settings structure
//!
//! Defines the settings handed to the client and how they are read from a
//! TOML file and from the environment.

use serde::Deserialize;
use std::fmt;
use std::path::{Path, PathBuf};
use std::time::Duration;

use crate::{Error, Result, utils::expand_path};

/// Domain of the official AUR
pub const DEFAULT_DOMAIN: &str = "aur.archlinux.org";

/// Main configuration settings
#[derive(Debug, Clone, Default, Deserialize)]
#[serde(default)]
pub struct Settings {
    /// Service and account configuration
    pub aur: AurSettings,
    /// Network configuration
    pub network: NetworkSettings,
    /// Logging configuration
    pub logging: LoggingSettings,
}

/// Service, identity and cookie policy
#[derive(Clone, Deserialize)]
#[serde(default)]
pub struct AurSettings {
    /// Host name of the service, optionally with a port
    pub domain: String,
    /// Login username
    pub user: Option<String>,
    /// Login password
    pub password: Option<String>,
    /// Cookie file
    pub cookies: Option<PathBuf>,
    /// Keep the session in the cookie file across runs
    pub persist: bool,
}

/// Network configuration
#[derive(Debug, Clone, Deserialize)]
#[serde(default)]
pub struct NetworkSettings {
    /// Per-request timeout in seconds
    pub timeout_secs: u64,
}

/// Logging configuration
#[derive(Debug, Clone, Deserialize)]
#[serde(default)]
pub struct LoggingSettings {
    /// Default log filter when `RUST_LOG` is not set
    pub level: String,
}

/// Values given on the command line; `None` leaves the setting alone
#[derive(Debug, Clone, Default)]
pub struct SettingsOverrides {
    pub domain: Option<String>,
    pub user: Option<String>,
    pub password: Option<String>,
    pub cookies: Option<PathBuf>,
    pub persist: Option<bool>,
}

impl Default for AurSettings {
    fn default() -> Self {
        Self {
            domain: DEFAULT_DOMAIN.to_string(),
            user: None,
            password: None,
            cookies: None,
            persist: false,
        }
    }
}

impl fmt::Debug for AurSettings {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("AurSettings")
            .field("domain", &self.domain)
            .field("user", &self.user)
            .field("password", &self.password.as_ref().map(|_| "<redacted>"))
            .field("cookies", &self.cookies)
            .field("persist", &self.persist)
            .finish()
    }
}

impl Default for NetworkSettings {
    fn default() -> Self {
        Self { timeout_secs: 30 }
    }
}

impl NetworkSettings {
    pub fn timeout(&self) -> Duration {
        Duration::from_secs(self.timeout_secs)
    }
}

impl Default for LoggingSettings {
    fn default() -> Self {
        Self {
            level: "warn".to_string(),
        }
    }
}

impl Settings {
    /// Create new settings with default values
    pub fn new() -> Self {
        Self::default()
    }

    /// Load settings from a TOML file
    pub fn from_file(path: &Path) -> Result<Self> {
        let content = std::fs::read_to_string(path)?;
        toml::from_str(&content)
            .map_err(|e| Error::config(format!("invalid config file {}: {}", path.display(), e)))
    }

    /// Override with `BURP_*` environment variables
    pub fn merge_with_env(self) -> Result<Self> {
        self.merge_with(|key| std::env::var(key).ok())
    }

    /// Override with variables supplied by `lookup`
    pub fn merge_with(mut self, lookup: impl Fn(&str) -> Option<String>) -> Result<Self> {
        if let Some(domain) = lookup("BURP_DOMAIN") {
            self.aur.domain = domain;
        }
        if let Some(user) = lookup("BURP_USER") {
            self.aur.user = Some(user);
        }
        if let Some(password) = lookup("BURP_PASSWORD") {
            self.aur.password = Some(password);
        }
        if let Some(cookies) = lookup("BURP_COOKIES") {
            self.aur.cookies = Some(PathBuf::from(cookies));
        }
        if let Some(persist) = lookup("BURP_PERSIST") {
            self.aur.persist = parse_bool(&persist)
                .ok_or_else(|| Error::config(format!("Invalid BURP_PERSIST: {}", persist)))?;
        }
        if let Some(timeout) = lookup("BURP_TIMEOUT") {
            self.network.timeout_secs = timeout
                .parse()
                .map_err(|e| Error::config(format!("Invalid BURP_TIMEOUT: {}", e)))?;
        }
        Ok(self)
    }

    /// Apply command-line values
    pub fn apply_overrides(mut self, overrides: SettingsOverrides) -> Self {
        if let Some(domain) = overrides.domain {
            self.aur.domain = domain;
        }
        if overrides.user.is_some() {
            self.aur.user = overrides.user;
        }
        if overrides.password.is_some() {
            self.aur.password = overrides.password;
        }
        if overrides.cookies.is_some() {
            self.aur.cookies = overrides.cookies;
        }
        if let Some(persist) = overrides.persist {
            self.aur.persist = persist;
        }
        self
    }

    /// Expand `~` and `$VAR` in the cookie path
    pub fn expand_paths(mut self) -> Result<Self> {
        if let Some(cookies) = &self.aur.cookies {
            self.aur.cookies = Some(expand_path(&cookies.to_string_lossy())?);
        }
        Ok(self)
    }

    /// Check the settings are usable together
    pub fn validate(&self) -> Result<()> {
        if self.aur.domain.trim().is_empty() {
            return Err(Error::config("domain must not be empty"));
        }
        if self.aur.persist && self.aur.cookies.is_none() {
            return Err(Error::config(
                "keeping cookies requires a cookie file (--cookies or `cookies` in the config)",
            ));
        }
        if self.network.timeout_secs == 0 {
            return Err(Error::config("timeout must be greater than zero"));
        }
        Ok(())
    }

    /// `$XDG_CONFIG_HOME/burp/burp.toml`, else `~/.config/burp/burp.toml`
    pub fn default_config_path() -> Option<PathBuf> {
        let base = std::env::var_os("XDG_CONFIG_HOME")
            .filter(|v| !v.is_empty())
            .map(PathBuf::from)
            .or_else(|| dirs::home_dir().map(|home| home.join(".config")))?;
        Some(base.join("burp").join("burp.toml"))
    }
}

fn parse_bool(value: &str) -> Option<bool> {
    match value.trim().to_ascii_lowercase().as_str() {
        "1" | "true" | "yes" | "on" => Some(true),
        "0" | "false" | "no" | "off" | "" => Some(false),
        _ => None,
    }
}
