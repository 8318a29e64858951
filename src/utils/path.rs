//! Shell-style path expansion

use std::path::PathBuf;

use crate::{Error, Result};

/// Expand a leading `~` and `$VAR`/`${VAR}` references.
///
/// Unset variables are an error rather than silently expanding to nothing.
pub fn expand_path(input: &str) -> Result<PathBuf> {
    shellexpand::full(input)
        .map(|expanded| PathBuf::from(expanded.as_ref()))
        .map_err(|e| Error::config(format!("cannot expand path {:?}: {}", input, e)))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_plain_path_is_unchanged() {
        assert_eq!(
            expand_path("/var/tmp/burp.cookies").unwrap(),
            PathBuf::from("/var/tmp/burp.cookies")
        );
    }

    #[test]
    fn test_tilde_expands_to_home() {
        let Some(home) = dirs::home_dir() else {
            return;
        };
        assert_eq!(
            expand_path("~/.cache/burp/cookies").unwrap(),
            home.join(".cache/burp/cookies")
        );
    }

    #[test]
    fn test_env_var_expands() {
        let Ok(home) = std::env::var("HOME") else {
            return;
        };
        assert_eq!(
            expand_path("$HOME/cookies").unwrap(),
            PathBuf::from(format!("{}/cookies", home))
        );
    }

    #[test]
    fn test_unset_variable_is_config_error() {
        let err = expand_path("$BURP_TEST_SURELY_UNSET_VARIABLE/cookies").unwrap_err();
        assert!(matches!(err, Error::Config(_)));
    }
}
