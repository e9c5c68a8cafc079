//! The attoDRY session facade.
//!
//! [`AttoDry`] binds one driver to one cryostat model and one transport. It
//! owns the session state machine and the per-model capability checks; the
//! typed operations themselves live in the `control` modules as further
//! `impl` blocks.

use std::ffi::CString;
use std::path::Path;
use std::time::Duration;

use attodry_sys::DEFAULT_MESSAGE_BUFFER_LEN;
use tracing::{debug, info, warn};

use crate::driver::{AttoDryDriver, NativeError};
use crate::error::{AttoDryError, Result};
use crate::ops::{Command, Flag, Reading, Setting, TextField};
use crate::status;
use crate::variant::{DeviceVariant, Feature};

/// Default wait between a `query*` request and reading its value.
pub const DEFAULT_REFRESH_SETTLE: Duration = Duration::from_millis(500);

/// Where a session is in its lifecycle.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SessionState {
    /// Driver not started.
    Uninitialized,
    /// Driver started, transport closed.
    Begun,
    /// Transport open; instrument operations are allowed.
    Connected,
}

/// Handle to one attoDRY.
///
/// Every operation blocks until the driver returns. There is no timeout: a
/// driver call that never returns blocks the caller forever. All methods take
/// `&mut self`, so a shared handle needs an external lock.
///
/// # Example
///
/// ```
/// use daq_driver_attodry::{AttoDry, DeviceVariant, MockDriver};
///
/// # fn main() -> daq_driver_attodry::Result<()> {
/// let mut cryostat = AttoDry::new(MockDriver::new(), DeviceVariant::AttoDry2100, "COM5");
/// cryostat.begin()?;
/// cryostat.connect()?;
/// cryostat.set_user_temperature(4.2)?;
/// assert_eq!(cryostat.user_temperature()?, 4.2);
/// cryostat.end()?;
/// # Ok(())
/// # }
/// ```
pub struct AttoDry<D: AttoDryDriver> {
    driver: D,
    variant: DeviceVariant,
    port: String,
    state: SessionState,
    message_buffer_len: usize,
    refresh_settle: Duration,
}

impl<D: AttoDryDriver> AttoDry<D> {
    /// Create an inert handle. Nothing is sent to the driver until
    /// [`begin`](Self::begin).
    pub fn new(driver: D, variant: DeviceVariant, port: impl Into<String>) -> Self {
        Self {
            driver,
            variant,
            port: port.into(),
            state: SessionState::Uninitialized,
            message_buffer_len: DEFAULT_MESSAGE_BUFFER_LEN,
            refresh_settle: DEFAULT_REFRESH_SETTLE,
        }
    }

    /// Size of the buffer handed to the driver for text outputs.
    ///
    /// Longer messages are cut off. Zero is treated as one byte.
    pub fn with_message_buffer_len(mut self, len: usize) -> Self {
        self.message_buffer_len = len.max(1);
        self
    }

    /// Wait used by [`refresh`](Self::refresh_default) between query and read.
    pub fn with_refresh_settle(mut self, settle: Duration) -> Self {
        self.refresh_settle = settle;
        self
    }

    /// Cryostat model this handle was created for.
    pub fn variant(&self) -> DeviceVariant {
        self.variant
    }

    /// Transport identifier, e.g. `COM5`.
    pub fn port(&self) -> &str {
        &self.port
    }

    /// Current lifecycle state.
    pub fn state(&self) -> SessionState {
        self.state
    }

    /// True while the transport is open.
    pub fn is_connected(&self) -> bool {
        self.state == SessionState::Connected
    }

    /// Text output buffer size in bytes.
    pub fn message_buffer_len(&self) -> usize {
        self.message_buffer_len
    }

    /// Configured settle time for blocking refreshes.
    pub fn refresh_settle(&self) -> Duration {
        self.refresh_settle
    }

    /// The underlying driver.
    pub fn driver(&self) -> &D {
        &self.driver
    }

    // =========================================================================
    // Lifecycle
    // =========================================================================

    /// Start the vendor driver for this handle's model.
    pub fn begin(&mut self) -> Result<()> {
        if self.state != SessionState::Uninitialized {
            return Err(AttoDryError::AlreadyInitialized);
        }
        debug!(variant = %self.variant, code = self.variant.code(), "Starting attoDRY driver");
        match self.driver.begin(self.variant) {
            Ok(()) => {
                self.state = SessionState::Begun;
                info!(variant = %self.variant, "attoDRY driver started");
                Ok(())
            }
            Err(NativeError::Status(code)) => Err(AttoDryError::DriverStartFailure {
                variant: self.variant,
                code,
                message: status::describe(code),
            }),
            Err(NativeError::MissingSymbol { symbol, message }) => {
                Err(AttoDryError::MissingSymbol { symbol, message })
            }
        }
    }

    /// Open the transport. Does nothing if it is already open.
    pub fn connect(&mut self) -> Result<()> {
        let port = c_string("port", &self.port)?;
        match self.state {
            SessionState::Uninitialized => return Err(AttoDryError::NotInitialized),
            SessionState::Connected => {
                debug!(port = %self.port, "attoDRY already connected");
                return Ok(());
            }
            SessionState::Begun => {}
        }
        match self.driver.connect(&port) {
            Ok(()) => {
                self.state = SessionState::Connected;
                info!(variant = %self.variant, port = %self.port, "Connected to attoDRY");
                Ok(())
            }
            Err(NativeError::Status(code)) => {
                let message = self.driver_message(code);
                Err(AttoDryError::ConnectionFailure {
                    port: self.port.clone(),
                    code,
                    message,
                })
            }
            Err(NativeError::MissingSymbol { symbol, message }) => {
                Err(AttoDryError::MissingSymbol { symbol, message })
            }
        }
    }

    /// Close the transport. Does nothing if it is not open.
    pub fn disconnect(&mut self) -> Result<()> {
        match self.state {
            SessionState::Uninitialized => Err(AttoDryError::NotInitialized),
            SessionState::Begun => Ok(()),
            SessionState::Connected => {
                self.driver
                    .disconnect()
                    .map_err(|e| self.native_error("Disconnect", e))?;
                self.state = SessionState::Begun;
                info!(port = %self.port, "Disconnected from attoDRY");
                Ok(())
            }
        }
    }

    /// Stop the vendor driver, disconnecting first if needed.
    pub fn end(&mut self) -> Result<()> {
        if self.state == SessionState::Uninitialized {
            return Err(AttoDryError::NotInitialized);
        }
        self.disconnect()?;
        self.driver
            .end()
            .map_err(|e| self.native_error("end", e))?;
        self.state = SessionState::Uninitialized;
        info!(variant = %self.variant, "attoDRY driver stopped");
        Ok(())
    }

    // =========================================================================
    // Diagnostics
    // =========================================================================

    /// Answer "cancel" to a pending instrument prompt.
    pub fn cancel(&mut self) -> Result<()> {
        self.run(Command::Cancel)
    }

    /// Answer "confirm" to a pending instrument prompt.
    pub fn confirm(&mut self) -> Result<()> {
        self.run(Command::Confirm)
    }

    /// Message describing what the instrument is doing or asking for.
    pub fn action_message(&mut self) -> Result<String> {
        self.text(TextField::ActionMessage)
    }

    /// Message describing the instrument's current error.
    pub fn error_message(&mut self) -> Result<String> {
        self.text(TextField::ErrorMessage)
    }

    /// Instrument error status; zero when no error is raised.
    pub fn error_status(&mut self) -> Result<i32> {
        self.ensure_connected()?;
        self.driver
            .read_error_status()
            .map_err(|e| self.native_error("getAttodryErrorStatus", e))
    }

    /// Acknowledge and clear the current instrument error.
    pub fn lower_error(&mut self) -> Result<()> {
        self.run(Command::LowerError)
    }

    // =========================================================================
    // Shared plumbing for the control modules
    // =========================================================================

    pub(crate) fn ensure_connected(&self) -> Result<()> {
        match self.state {
            SessionState::Connected => Ok(()),
            SessionState::Begun => Err(AttoDryError::NotConnected),
            SessionState::Uninitialized => Err(AttoDryError::NotInitialized),
        }
    }

    pub(crate) fn ensure_supported(&self, feature: Feature, operation: &'static str) -> Result<()> {
        if self.variant.supports(feature) {
            Ok(())
        } else {
            Err(AttoDryError::UnsupportedForVariant {
                operation,
                variant: self.variant,
            })
        }
    }

    pub(crate) fn run(&mut self, command: Command) -> Result<()> {
        self.ensure_connected()?;
        debug!(operation = %command, "attoDRY command");
        self.driver
            .command(command)
            .map_err(|e| self.native_error(command.name(), e))
    }

    pub(crate) fn flag(&mut self, flag: Flag) -> Result<bool> {
        self.ensure_connected()?;
        self.driver
            .read_flag(flag)
            .map_err(|e| self.native_error(flag.name(), e))
    }

    pub(crate) fn read(&mut self, reading: Reading) -> Result<f32> {
        self.ensure_connected()?;
        self.driver
            .read_float(reading)
            .map_err(|e| self.native_error(reading.name(), e))
    }

    pub(crate) fn write(&mut self, setting: Setting, value: f32) -> Result<()> {
        self.ensure_connected()?;
        if setting.writes_flash() {
            warn!(operation = %setting, value, "Writing attoDRY non-volatile memory");
        } else {
            debug!(operation = %setting, value, "attoDRY set");
        }
        self.driver
            .write_float(setting, value)
            .map_err(|e| self.native_error(setting.name(), e))
    }

    pub(crate) fn text(&mut self, field: TextField) -> Result<String> {
        self.ensure_connected()?;
        let bytes = self
            .driver
            .read_text(field, self.message_buffer_len)
            .map_err(|e| self.native_error(field.name(), e))?;
        String::from_utf8(bytes).map_err(|_| AttoDryError::InvalidText {
            field: field.name(),
        })
    }

    pub(crate) fn driver_mut(&mut self) -> &mut D {
        &mut self.driver
    }

    /// Convert a driver failure, fetching the driver's own description.
    pub(crate) fn native_error(&mut self, operation: &'static str, error: NativeError) -> AttoDryError {
        match error {
            NativeError::Status(code) => AttoDryError::DriverError {
                operation,
                code,
                message: self.driver_message(code),
            },
            NativeError::MissingSymbol { symbol, message } => {
                AttoDryError::MissingSymbol { symbol, message }
            }
        }
    }

    /// Best-effort error text for `code`.
    fn driver_message(&mut self, code: i32) -> String {
        let from_driver = self
            .driver
            .read_text(TextField::ErrorMessage, self.message_buffer_len)
            .ok()
            .and_then(|bytes| String::from_utf8(bytes).ok())
            .map(|text| text.trim().to_string())
            .filter(|text| !text.is_empty());
        from_driver.unwrap_or_else(|| status::describe(code))
    }
}

impl<D: AttoDryDriver> Drop for AttoDry<D> {
    fn drop(&mut self) {
        if self.state == SessionState::Uninitialized {
            return;
        }
        debug!(variant = %self.variant, port = %self.port, "Ending attoDRY session on drop");
        if let Err(e) = self.end() {
            warn!(variant = %self.variant, error = %e, "Error ending attoDRY session");
        }
    }
}

impl<D: AttoDryDriver> std::fmt::Debug for AttoDry<D> {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("AttoDry")
            .field("variant", &self.variant)
            .field("port", &self.port)
            .field("state", &self.state)
            .finish_non_exhaustive()
    }
}

/// Convert a string argument for the native boundary.
pub(crate) fn c_string(what: &'static str, value: &str) -> Result<CString> {
    CString::new(value).map_err(|_| AttoDryError::InvalidArgument {
        what,
        reason: format!("'{}' contains a NUL byte", value.escape_debug()),
    })
}

/// Convert a file path for the native boundary.
pub(crate) fn path_c_string(path: &Path) -> Result<CString> {
    let text = path.to_str().ok_or_else(|| AttoDryError::InvalidArgument {
        what: "path",
        reason: format!("'{}' is not valid UTF-8", path.display()),
    })?;
    c_string("path", text)
}
