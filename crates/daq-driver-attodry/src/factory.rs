//! Build attoDRY sessions from configuration.
//!
//! # Example Configuration
//!
//! ```toml
//! [[devices]]
//! id = "cryostat"
//! type = "attodry"
//! enabled = true
//!
//! [devices.config]
//! variant = "attodry2100"
//! port = "COM5"
//! ```

use anyhow::{Context, Result};
use tracing::info;

use crate::config::AttoDryConfig;
use crate::device::AttoDry;
use crate::driver::AttoDryDriver;
use crate::mock::MockDriver;
use crate::native::NativeDriver;

/// A facade over whichever driver the configuration selected.
pub type DynAttoDry = AttoDry<Box<dyn AttoDryDriver>>;

/// Factory for attoDRY sessions.
#[derive(Debug, Clone, Copy, Default)]
pub struct AttoDryFactory;

impl AttoDryFactory {
    /// Device type key used in configuration files.
    pub fn driver_type(&self) -> &'static str {
        "attodry"
    }

    /// Human-readable driver name.
    pub fn name(&self) -> &'static str {
        "attocube attoDRY"
    }

    /// Check a `[devices.config]` table without loading anything.
    pub fn validate(&self, config: &toml::Value) -> Result<()> {
        let cfg: AttoDryConfig = config
            .clone()
            .try_into()
            .context("Invalid attoDRY config")?;
        cfg.validate()?;
        Ok(())
    }

    /// Build an unstarted session from a `[devices.config]` table.
    pub fn build(&self, config: toml::Value) -> Result<DynAttoDry> {
        let cfg: AttoDryConfig = config.try_into().context("Invalid attoDRY config")?;
        self.build_from(&cfg)
    }

    /// Build an unstarted session from parsed settings.
    ///
    /// Loads the vendor library unless `mock` is set. Call
    /// [`begin`](AttoDry::begin) and [`connect`](AttoDry::connect) on the
    /// result.
    pub fn build_from(&self, cfg: &AttoDryConfig) -> Result<DynAttoDry> {
        cfg.validate()?;

        let driver: Box<dyn AttoDryDriver> = if cfg.mock {
            info!(variant = %cfg.variant, port = %cfg.port, "Using mock attoDRY driver");
            Box::new(MockDriver::new())
        } else {
            let native = match &cfg.library_path {
                Some(path) => NativeDriver::load(path),
                None => NativeDriver::load_default(),
            }
            .context("Failed to load attoDRY library")?;
            Box::new(native)
        };

        Ok(AttoDry::new(driver, cfg.variant, cfg.port.clone())
            .with_message_buffer_len(cfg.message_buffer_len)
            .with_refresh_settle(cfg.refresh_settle))
    }
}
