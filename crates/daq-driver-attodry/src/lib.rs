//! Safe Rust driver for attocube attoDRY cryostats.
//!
//! This crate wraps the vendor's `attoDRYLib` (loaded at runtime through
//! `attodry-sys`) with a typed, session-aware facade. Every operation is a
//! single blocking call into the library; the crate adds the session state
//! machine, per-model capability checks and error reporting around it.
//!
//! # Supported Hardware
//!
//! - attoDRY1100
//! - attoDRY2100
//! - attoDRY800
//!
//! Valves, pressure gauges and some thermometers differ between models.
//! Calling an operation the configured model lacks fails with
//! [`AttoDryError::UnsupportedForVariant`] before anything is sent.
//!
//! # Architecture
//!
//! - [`AttoDry`] - Session facade: lifecycle, diagnostics, and the typed
//!   operations grouped by area (temperature, field, vacuum, heaters,
//!   instrument settings, calibration curves, data logging)
//! - [`DeviceVariant`] / [`Valve`] / [`Feature`] - Model registry and
//!   capability table
//! - [`AttoDryDriver`] - The native call surface, implemented by
//!   [`NativeDriver`] (vendor library) and [`MockDriver`] (in-process model)
//! - [`AttoDryConfig`] / [`AttoDryFactory`] - Settings and session
//!   construction
//!
//! # Example
//!
//! ```no_run
//! use daq_driver_attodry::{AttoDry, DeviceVariant, NativeDriver};
//!
//! # fn example() -> anyhow::Result<()> {
//! let driver = NativeDriver::load_default()?;
//! let mut cryostat = AttoDry::new(driver, DeviceVariant::AttoDry2100, "COM5");
//! cryostat.begin()?;
//! cryostat.connect()?;
//!
//! println!("Sample at {:.3} K", cryostat.sample_temperature()?);
//! cryostat.set_user_magnetic_field(0.5)?;
//!
//! cryostat.end()?;
//! # Ok(())
//! # }
//! ```
//!
//! # Session lifecycle
//!
//! `new` → `begin` → `connect` → operations → `disconnect` → `end`.
//! Operations before `begin` fail with [`AttoDryError::NotInitialized`],
//! between `begin` and `connect` with [`AttoDryError::NotConnected`].
//! Dropping a started session ends it.

pub mod config;
mod control;
pub mod device;
pub mod driver;
pub mod error;
pub mod factory;
pub mod mock;
pub mod native;
pub mod ops;
pub mod status;
pub mod variant;

pub use config::AttoDryConfig;
pub use device::{AttoDry, SessionState, DEFAULT_REFRESH_SETTLE};
pub use driver::{AttoDryDriver, DriverResult, NativeError};
pub use error::{AttoDryError, ErrorKind, Result};
pub use factory::{AttoDryFactory, DynAttoDry};
pub use mock::{MockDriver, MockLog, NativeArg, NativeCall};
pub use native::NativeDriver;
pub use ops::{
    Command, ConfigValue, CurveNumber, CurveTransfer, Flag, LogInterval, Reading, Setting,
    TextField,
};
pub use variant::{DeviceVariant, Feature, Valve};
