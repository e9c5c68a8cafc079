//! Error types for attoDRY operations.
//!
//! Precondition failures (session state, device variant, arguments) are
//! raised before the vendor library is called. Everything the library itself
//! reports arrives as a numeric status and is surfaced together with the
//! driver's own error message.

use std::fmt;

use thiserror::Error;

use crate::variant::DeviceVariant;

/// Result type alias for attoDRY operations.
pub type Result<T> = std::result::Result<T, AttoDryError>;

/// Errors that can occur when driving an attoDRY.
#[derive(Error, Debug, Clone, PartialEq)]
pub enum AttoDryError {
    /// Operation invoked before `begin()` or after `end()`.
    #[error("attoDRY driver not started: call begin() first")]
    NotInitialized,

    /// Operation invoked while no transport is open.
    #[error("attoDRY not connected: call connect() first")]
    NotConnected,

    /// `begin()` invoked on a session that is already started.
    #[error("attoDRY driver already started")]
    AlreadyInitialized,

    /// The vendor driver could not be started.
    #[error("Failed to start attoDRY driver for {variant} (code {code}): {message}")]
    DriverStartFailure {
        variant: DeviceVariant,
        code: i32,
        message: String,
    },

    /// The transport could not be opened.
    #[error("Failed to connect to attoDRY on '{port}' (code {code}): {message}")]
    ConnectionFailure {
        port: String,
        code: i32,
        message: String,
    },

    /// Operation exists only on other cryostat models.
    #[error("'{operation}' is not supported on the {variant}")]
    UnsupportedForVariant {
        operation: &'static str,
        variant: DeviceVariant,
    },

    /// A native call returned a non-zero status.
    #[error("attoDRY error in {operation} (code {code}): {message}")]
    DriverError {
        operation: &'static str,
        code: i32,
        message: String,
    },

    /// Temperature monitor user curves are numbered 1 to 8.
    #[error("Invalid calibration curve number {0}: expected 1 to 8")]
    InvalidCurveNumber(u8),

    /// An argument cannot be passed across the native boundary.
    #[error("Invalid {what}: {reason}")]
    InvalidArgument { what: &'static str, reason: String },

    /// Text returned by the driver is not valid UTF-8.
    #[error("attoDRY returned non-UTF-8 text for {field}")]
    InvalidText { field: &'static str },

    /// The vendor library could not be loaded.
    #[error("Failed to load attoDRY library '{path}': {message}")]
    LibraryLoad { path: String, message: String },

    /// The loaded library does not export an expected entry point.
    #[error("attoDRY library does not export '{symbol}': {message}")]
    MissingSymbol {
        symbol: &'static str,
        message: String,
    },

    /// Configuration values failed validation.
    #[error("Invalid attoDRY configuration: {message}")]
    Config { message: String },
}

/// Broad classification of an [`AttoDryError`].
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ErrorKind {
    /// Call sequence violated the session state machine.
    State,
    /// Configuration, variant or library setup problem.
    Configuration,
    /// Driver failed to start.
    Initialization,
    /// Transport or library call failure.
    Communication,
    /// Fault reported by the instrument itself.
    Hardware,
    /// Argument rejected before reaching the driver.
    InvalidParameter,
}

impl fmt::Display for ErrorKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let label = match self {
            ErrorKind::State => "state",
            ErrorKind::Configuration => "configuration",
            ErrorKind::Initialization => "initialization",
            ErrorKind::Communication => "communication",
            ErrorKind::Hardware => "hardware",
            ErrorKind::InvalidParameter => "invalid_parameter",
        };
        write!(f, "{}", label)
    }
}

impl AttoDryError {
    /// Classify this error.
    pub fn kind(&self) -> ErrorKind {
        match self {
            Self::NotInitialized | Self::NotConnected | Self::AlreadyInitialized => {
                ErrorKind::State
            }
            Self::UnsupportedForVariant { .. }
            | Self::LibraryLoad { .. }
            | Self::MissingSymbol { .. }
            | Self::Config { .. } => ErrorKind::Configuration,
            Self::DriverStartFailure { .. } => ErrorKind::Initialization,
            Self::ConnectionFailure { .. } | Self::InvalidText { .. } => ErrorKind::Communication,
            Self::DriverError { code, .. } => {
                if crate::status::is_instrument_fault(*code) {
                    ErrorKind::Hardware
                } else {
                    ErrorKind::Communication
                }
            }
            Self::InvalidCurveNumber(_) | Self::InvalidArgument { .. } => {
                ErrorKind::InvalidParameter
            }
        }
    }

    /// Native status code carried by this error, if any.
    pub fn status_code(&self) -> Option<i32> {
        match self {
            Self::DriverStartFailure { code, .. }
            | Self::ConnectionFailure { code, .. }
            | Self::DriverError { code, .. } => Some(*code),
            _ => None,
        }
    }

    /// True if the error was raised before any native call was made.
    pub fn is_precondition(&self) -> bool {
        matches!(
            self.kind(),
            ErrorKind::State | ErrorKind::InvalidParameter
        ) || matches!(self, Self::UnsupportedForVariant { .. })
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_error_display() {
        let err = AttoDryError::UnsupportedForVariant {
            operation: "toggleHeliumValve",
            variant: DeviceVariant::AttoDry2100,
        };
        assert!(err.to_string().contains("toggleHeliumValve"));
        assert!(err.to_string().contains("attoDRY2100"));

        let err = AttoDryError::InvalidCurveNumber(9);
        assert!(err.to_string().contains('9'));
    }

    #[test]
    fn test_kind_classification() {
        assert_eq!(AttoDryError::NotConnected.kind(), ErrorKind::State);
        assert_eq!(
            AttoDryError::InvalidCurveNumber(0).kind(),
            ErrorKind::InvalidParameter
        );

        let quench = AttoDryError::DriverError {
            operation: "setUserMagneticField",
            code: 37,
            message: String::new(),
        };
        assert_eq!(quench.kind(), ErrorKind::Hardware);
        assert_eq!(quench.status_code(), Some(37));

        let unspecified = AttoDryError::DriverError {
            operation: "getSampleTemperature",
            code: -1,
            message: String::new(),
        };
        assert_eq!(unspecified.kind(), ErrorKind::Communication);
    }

    #[test]
    fn test_precondition_errors() {
        assert!(AttoDryError::NotInitialized.is_precondition());
        assert!(AttoDryError::UnsupportedForVariant {
            operation: "getDumpPressure",
            variant: DeviceVariant::AttoDry800,
        }
        .is_precondition());
        assert!(!AttoDryError::ConnectionFailure {
            port: "COM5".into(),
            code: -1,
            message: String::new(),
        }
        .is_precondition());
    }

    #[test]
    fn test_error_kind_display() {
        assert_eq!(ErrorKind::InvalidParameter.to_string(), "invalid_parameter");
        assert_eq!(ErrorKind::Hardware.to_string(), "hardware");
    }
}
