//! attoDRY connection settings.
//!
//! Settings come from a TOML file, with `ATTODRY_`-prefixed environment
//! variables taking precedence:
//!
//! ```toml
//! variant = "attodry2100"
//! port = "COM5"
//! library_path = 'C:\Program Files (x86)\attocube\attoDRYLib\attoDRYLib.dll'
//! message_buffer_len = 500
//! refresh_settle = "500ms"
//! mock = false
//! ```
//!
//! `ATTODRY_PORT=COM7` overrides the port, `ATTODRY_MOCK=true` switches to the
//! in-process mock, and so on.

use std::path::{Path, PathBuf};
use std::time::Duration;

use anyhow::{Context, Result};
use figment::{
    providers::{Env, Format, Toml},
    Figment,
};
use serde::{Deserialize, Serialize};
use tracing::{debug, info};

use crate::device::DEFAULT_REFRESH_SETTLE;
use crate::error::AttoDryError;
use crate::variant::DeviceVariant;

/// Prefix of environment variables that override file settings.
pub const ENV_PREFIX: &str = "ATTODRY_";

/// Largest accepted text output buffer.
pub const MAX_MESSAGE_BUFFER_LEN: usize = 64 * 1024;

/// Settings for one attoDRY session.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct AttoDryConfig {
    /// Cryostat model, e.g. "attodry2100"
    pub variant: DeviceVariant,

    /// Transport identifier (e.g., "COM5")
    pub port: String,

    /// Explicit path to attoDRYLib; searched via `ATTODRY_LIB_DIR` and the OS
    /// loader when unset
    #[serde(default)]
    pub library_path: Option<PathBuf>,

    /// Buffer size for action and error messages
    #[serde(default = "default_message_buffer_len")]
    pub message_buffer_len: usize,

    /// Wait between a refresh request and reading the refreshed value
    #[serde(default = "default_refresh_settle", with = "humantime_serde")]
    pub refresh_settle: Duration,

    /// Use the in-process mock instead of the vendor library
    #[serde(default)]
    pub mock: bool,
}

fn default_message_buffer_len() -> usize {
    attodry_sys::DEFAULT_MESSAGE_BUFFER_LEN
}

fn default_refresh_settle() -> Duration {
    DEFAULT_REFRESH_SETTLE
}

impl AttoDryConfig {
    /// Settings with defaults for everything but model and port.
    pub fn new(variant: DeviceVariant, port: impl Into<String>) -> Self {
        Self {
            variant,
            port: port.into(),
            library_path: None,
            message_buffer_len: default_message_buffer_len(),
            refresh_settle: default_refresh_settle(),
            mock: false,
        }
    }

    /// Load from `path`, applying environment overrides, and validate.
    pub fn load(path: &Path) -> Result<Self> {
        if !path.exists() {
            anyhow::bail!("attoDRY config file not found: {}", path.display());
        }

        debug!("Loading attoDRY config from: {}", path.display());

        let config: Self = Figment::new()
            .merge(Toml::file(path))
            .merge(Env::prefixed(ENV_PREFIX))
            .extract()
            .with_context(|| format!("Failed to parse attoDRY config: {}", path.display()))?;
        config.validate()?;

        info!(
            variant = %config.variant,
            port = %config.port,
            mock = config.mock,
            "Loaded attoDRY config"
        );
        Ok(config)
    }

    /// Load from environment variables alone.
    pub fn from_env() -> Result<Self> {
        let config: Self = Figment::new()
            .merge(Env::prefixed(ENV_PREFIX))
            .extract()
            .context("Failed to read attoDRY config from environment")?;
        config.validate()?;
        Ok(config)
    }

    /// Parse TOML text without environment overrides.
    pub fn from_toml_str(text: &str) -> Result<Self> {
        let config: Self = Figment::new()
            .merge(Toml::string(text))
            .extract()
            .context("Failed to parse attoDRY config")?;
        config.validate()?;
        Ok(config)
    }

    /// Check values the type system cannot.
    pub fn validate(&self) -> std::result::Result<(), AttoDryError> {
        let invalid = |message: String| -> std::result::Result<(), AttoDryError> {
            Err(AttoDryError::Config { message })
        };

        if self.port.trim().is_empty() {
            return invalid("'port' cannot be empty".to_string());
        }
        if self.port.contains('\0') {
            return invalid("'port' cannot contain NUL".to_string());
        }
        if self.message_buffer_len == 0 || self.message_buffer_len > MAX_MESSAGE_BUFFER_LEN {
            return invalid(format!(
                "'message_buffer_len' must be between 1 and {}, got {}",
                MAX_MESSAGE_BUFFER_LEN, self.message_buffer_len
            ));
        }
        if let Some(path) = &self.library_path {
            if path.as_os_str().is_empty() {
                return invalid("'library_path' cannot be empty".to_string());
            }
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_defaults() {
        let config = AttoDryConfig::from_toml_str(
            r#"
            variant = "attodry2100"
            port = "COM5"
            "#,
        )
        .unwrap();
        assert_eq!(config, AttoDryConfig::new(DeviceVariant::AttoDry2100, "COM5"));
        assert_eq!(config.message_buffer_len, 500);
        assert_eq!(config.refresh_settle, Duration::from_millis(500));
        assert!(!config.mock);
        assert!(config.library_path.is_none());
    }

    #[test]
    fn test_full_config() {
        let config = AttoDryConfig::from_toml_str(
            r#"
            variant = "attoDRY800"
            port = "COM3"
            library_path = "/opt/attocube/libattoDRYLib.so"
            message_buffer_len = 1024
            refresh_settle = "2s"
            mock = true
            "#,
        )
        .unwrap();
        assert_eq!(config.variant, DeviceVariant::AttoDry800);
        assert_eq!(
            config.library_path.as_deref(),
            Some(Path::new("/opt/attocube/libattoDRYLib.so"))
        );
        assert_eq!(config.message_buffer_len, 1024);
        assert_eq!(config.refresh_settle, Duration::from_secs(2));
        assert!(config.mock);
    }

    #[test]
    fn test_rejects_bad_values() {
        assert!(AttoDryConfig::from_toml_str("variant = \"attodry1100\"\nport = \"\"").is_err());
        assert!(AttoDryConfig::from_toml_str("variant = \"attodry900\"\nport = \"COM1\"").is_err());
        assert!(AttoDryConfig::from_toml_str(
            "variant = \"attodry1100\"\nport = \"COM1\"\nmessage_buffer_len = 0"
        )
        .is_err());
        assert!(AttoDryConfig::from_toml_str("port = \"COM1\"").is_err());
    }

    #[test]
    fn test_validate_errors_are_config_errors() {
        let mut config = AttoDryConfig::new(DeviceVariant::AttoDry1100, "COM1");
        config.message_buffer_len = MAX_MESSAGE_BUFFER_LEN + 1;
        assert!(matches!(
            config.validate(),
            Err(AttoDryError::Config { .. })
        ));
    }

    #[test]
    fn test_missing_file() {
        let err = AttoDryConfig::load(Path::new("/nonexistent/attodry.toml")).unwrap_err();
        assert!(err.to_string().contains("not found"));
    }
}
