//! Configuration loading utilities
//!
//! Provides helper functions for loading configuration from various sources
//! with proper error handling and validation.

use crate::{
    Result,
    config::{Settings, SettingsOverrides},
};
use std::path::{Path, PathBuf};
use tracing::{debug, info};

/// Configuration loader with multiple source support
#[derive(Debug)]
pub struct ConfigLoader {
    /// Default settings
    defaults: Settings,
}

impl ConfigLoader {
    /// Create new configuration loader
    pub fn new() -> Self {
        Self {
            defaults: Settings::default(),
        }
    }

    /// Load configuration with precedence order:
    /// 1. Command line arguments (highest priority)
    /// 2. Environment variables
    /// 3. Configuration file
    /// 4. Default values (lowest priority)
    ///
    /// A config file that does not exist is skipped; one that exists but
    /// cannot be read or parsed is an error.
    pub fn load(
        &self,
        config_file: Option<&Path>,
        overrides: SettingsOverrides,
    ) -> Result<Settings> {
        let mut settings = self.defaults.clone();

        if let Some(path) = config_file {
            if path.exists() {
                info!("Loading configuration from file: {:?}", path);
                settings = Settings::from_file(path)?;
            } else {
                debug!("Configuration file not found: {:?}, using defaults", path);
            }
        }

        debug!("Applying environment variable overrides");
        settings = settings
            .merge_with_env()?
            .apply_overrides(overrides)
            .expand_paths()?;

        settings.validate()?;

        debug!("Final configuration: {:?}", settings);

        Ok(settings)
    }

    /// Load configuration from the default location
    pub fn load_default(&self, overrides: SettingsOverrides) -> Result<Settings> {
        let path: Option<PathBuf> = Settings::default_config_path();
        if path.is_none() {
            tracing::warn!("unable to determine location of config file. Skipping.");
        }
        self.load(path.as_deref(), overrides)
    }

    /// Get default configuration
    pub fn defaults(&self) -> &Settings {
        &self.defaults
    }
}

impl Default for ConfigLoader {
    fn default() -> Self {
        Self::new()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::Error;
    use std::io::Write;
    use tempfile::{NamedTempFile, TempDir};

    #[test]
    fn test_load_without_file() {
        let loader = ConfigLoader::new();
        let settings = loader.load(None, SettingsOverrides::default()).unwrap();
        assert_eq!(settings.aur.domain, loader.defaults().aur.domain);
    }

    #[test]
    fn test_load_from_file() {
        let mut temp_file = NamedTempFile::new().unwrap();
        writeln!(
            temp_file,
            r#"
[aur]
user = "alice"
cookies = "/var/tmp/burp.cookies"
persist = true

[network]
timeout_secs = 10
        "#
        )
        .unwrap();

        let loader = ConfigLoader::new();
        let settings = loader
            .load(Some(temp_file.path()), SettingsOverrides::default())
            .unwrap();

        assert_eq!(settings.aur.user.as_deref(), Some("alice"));
        assert_eq!(
            settings.aur.cookies,
            Some(PathBuf::from("/var/tmp/burp.cookies"))
        );
        assert!(settings.aur.persist);
        assert_eq!(settings.network.timeout_secs, 10);
        assert_eq!(settings.aur.domain, "aur.archlinux.org");
    }

    #[test]
    fn test_missing_file_uses_defaults() {
        let dir = TempDir::new().unwrap();
        let loader = ConfigLoader::new();
        let settings = loader
            .load(
                Some(&dir.path().join("burp.toml")),
                SettingsOverrides::default(),
            )
            .unwrap();
        assert!(settings.aur.user.is_none());
    }

    #[test]
    fn test_malformed_file_is_error() {
        let mut temp_file = NamedTempFile::new().unwrap();
        writeln!(temp_file, "[aur\nuser = ").unwrap();

        let loader = ConfigLoader::new();
        let err = loader
            .load(Some(temp_file.path()), SettingsOverrides::default())
            .unwrap_err();
        assert!(matches!(err, Error::Config(_)));
    }

    #[test]
    fn test_cli_overrides_file() {
        let mut temp_file = NamedTempFile::new().unwrap();
        writeln!(temp_file, "[aur]\nuser = \"from-file\"\npassword = \"p\"").unwrap();

        let loader = ConfigLoader::new();
        let settings = loader
            .load(
                Some(temp_file.path()),
                SettingsOverrides {
                    user: Some("from-cli".to_string()),
                    ..Default::default()
                },
            )
            .unwrap();

        assert_eq!(settings.aur.user.as_deref(), Some("from-cli"));
        assert_eq!(settings.aur.password.as_deref(), Some("p"));
    }

    #[test]
    fn test_cookie_path_is_expanded() {
        let Some(home) = dirs::home_dir() else {
            return;
        };
        let mut temp_file = NamedTempFile::new().unwrap();
        writeln!(temp_file, "[aur]\ncookies = \"~/.burp-cookies\"").unwrap();

        let settings = ConfigLoader::new()
            .load(Some(temp_file.path()), SettingsOverrides::default())
            .unwrap();

        assert_eq!(settings.aur.cookies, Some(home.join(".burp-cookies")));
    }
}
