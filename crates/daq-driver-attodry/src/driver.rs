//! The native capability set behind an [`AttoDry`](crate::AttoDry) facade.
//!
//! [`AttoDryDriver`] is the seam between the facade's session and capability
//! policy and the vendor library. [`NativeDriver`](crate::NativeDriver) calls
//! the real library; [`MockDriver`](crate::MockDriver) models it in-process.
//!
//! Methods return raw native statuses. Turning a status into an
//! [`AttoDryError`](crate::AttoDryError) with the driver's message is the
//! facade's job.

use std::ffi::CStr;

use thiserror::Error;

use crate::ops::{Command, CurveTransfer, Flag, LogInterval, Reading, Setting, TextField};
use crate::variant::DeviceVariant;

/// Failure reported by a driver call.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum NativeError {
    /// The entry point ran and returned a non-zero status.
    #[error("status {0}")]
    Status(i32),

    /// The entry point is not exported by the loaded library.
    #[error("symbol '{symbol}' not found: {message}")]
    MissingSymbol {
        /// Exported symbol name.
        symbol: &'static str,
        /// Loader message.
        message: String,
    },
}

/// Result of a single driver call.
pub type DriverResult<T> = std::result::Result<T, NativeError>;

/// Check a native status.
pub fn check_status(status: i32) -> DriverResult<()> {
    if status == attodry_sys::EC_OK {
        Ok(())
    } else {
        Err(NativeError::Status(status))
    }
}

/// One method per native call shape.
///
/// Implementations forward each call to exactly one entry point and never
/// retry. They do not enforce the session state machine or the per-model
/// capability table; the facade does that before calling in.
pub trait AttoDryDriver: Send {
    /// `begin(device)`: start the driver for `variant`.
    fn begin(&mut self, variant: DeviceVariant) -> DriverResult<()>;

    /// `Connect(port)`: open the transport.
    fn connect(&mut self, port: &CStr) -> DriverResult<()>;

    /// `Disconnect()`: close the transport.
    fn disconnect(&mut self) -> DriverResult<()>;

    /// `end()`: stop the driver.
    fn end(&mut self) -> DriverResult<()>;

    /// Invoke an argument-less entry point.
    fn command(&mut self, command: Command) -> DriverResult<()>;

    /// Read an integer flag; non-zero is `true`.
    fn read_flag(&mut self, flag: Flag) -> DriverResult<bool>;

    /// Read a float value.
    fn read_float(&mut self, reading: Reading) -> DriverResult<f32>;

    /// Write a float value.
    fn write_float(&mut self, setting: Setting, value: f32) -> DriverResult<()>;

    /// Read a text field into a buffer of `capacity` bytes.
    ///
    /// Returns the bytes before the first NUL.
    fn read_text(&mut self, field: TextField, capacity: usize) -> DriverResult<Vec<u8>>;

    /// `getAttodryErrorStatus`.
    fn read_error_status(&mut self) -> DriverResult<i32>;

    /// Start a calibration curve transfer to or from `path`.
    fn transfer_curve(&mut self, transfer: CurveTransfer, path: &CStr) -> DriverResult<()>;

    /// `startLogging(path, interval, append)`.
    fn start_logging(
        &mut self,
        path: &CStr,
        interval: LogInterval,
        append: bool,
    ) -> DriverResult<()>;
}

impl<D: AttoDryDriver + ?Sized> AttoDryDriver for Box<D> {
    fn begin(&mut self, variant: DeviceVariant) -> DriverResult<()> {
        (**self).begin(variant)
    }

    fn connect(&mut self, port: &CStr) -> DriverResult<()> {
        (**self).connect(port)
    }

    fn disconnect(&mut self) -> DriverResult<()> {
        (**self).disconnect()
    }

    fn end(&mut self) -> DriverResult<()> {
        (**self).end()
    }

    fn command(&mut self, command: Command) -> DriverResult<()> {
        (**self).command(command)
    }

    fn read_flag(&mut self, flag: Flag) -> DriverResult<bool> {
        (**self).read_flag(flag)
    }

    fn read_float(&mut self, reading: Reading) -> DriverResult<f32> {
        (**self).read_float(reading)
    }

    fn write_float(&mut self, setting: Setting, value: f32) -> DriverResult<()> {
        (**self).write_float(setting, value)
    }

    fn read_text(&mut self, field: TextField, capacity: usize) -> DriverResult<Vec<u8>> {
        (**self).read_text(field, capacity)
    }

    fn read_error_status(&mut self) -> DriverResult<i32> {
        (**self).read_error_status()
    }

    fn transfer_curve(&mut self, transfer: CurveTransfer, path: &CStr) -> DriverResult<()> {
        (**self).transfer_curve(transfer, path)
    }

    fn start_logging(
        &mut self,
        path: &CStr,
        interval: LogInterval,
        append: bool,
    ) -> DriverResult<()> {
        (**self).start_logging(path, interval, append)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_check_status() {
        assert_eq!(check_status(0), Ok(()));
        assert_eq!(check_status(-1), Err(NativeError::Status(-1)));
        assert_eq!(check_status(37), Err(NativeError::Status(37)));
    }
}
