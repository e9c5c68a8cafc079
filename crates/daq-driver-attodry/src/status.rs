//! attoDRY status codes.
//!
//! Every native entry point returns an `int`. Zero means success, negative
//! values are unspecified failures, and the positive codes below are faults
//! reported by the instrument. Each fault comes with the recovery action the
//! attoDRY manual recommends.

use attodry_sys::EC_OK;

/// A documented instrument fault.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct VendorStatus {
    /// Numeric status returned by the driver.
    pub code: i32,
    /// What went wrong.
    pub description: &'static str,
    /// What the operator should do about it.
    pub action: &'static str,
}

const RESTART_PUMP: &str = "Turn off the attoDRY, power-cycle the pump and turn the attoDRY on \
     again. Contact attocube if it recurs.";
const CHECK_GAUGE: &str = "Check the light on top of the gauge. If it is off, check the cabling; \
     if it is red or green, power-cycle the gauge. Contact attocube if the light stays off or red.";
const RESTART_MOTOR: &str = "Restart the attoDRY. Contact attocube if the problem persists.";
const RESTART_MONITOR: &str = "Turn the attoDRY off and on. Contact attocube if this repeats.";

macro_rules! vendor_table {
    ($($code:literal => $description:literal, $action:expr;)*) => {
        /// All documented instrument faults, ordered by code.
        pub const VENDOR_STATUSES: &[VendorStatus] = &[
            $(VendorStatus { code: $code, description: $description, action: $action },)*
        ];
    };
}

vendor_table! {
    1 => "High liquid helium reservoir temperature", "Wait for it to cool.";
    2 => "High pressure", "Wait for it to drop.";
    3 => "Temperature monitor did not initialise", "Turn the attoDRY off and on.";
    4 => "Fault on temperature monitor channel A", RESTART_MONITOR;
    5 => "Fault on temperature monitor channel B", RESTART_MONITOR;
    6 => "Fault on temperature monitor channel C", RESTART_MONITOR;
    7 => "Fault on temperature monitor channel D", RESTART_MONITOR;
    8 => "Temperature monitor did not respond in time",
        "Lower the error. If it returns, restart the attoDRY; contact attocube if it persists.";
    9 => "Excessive pump link voltage", RESTART_PUMP;
    10 => "Excessive pump motor current", RESTART_PUMP;
    11 => "Excessive pump controller temperature",
        "Power-cycle as for other pump faults and make sure the pump is well ventilated.";
    12 => "Pump controller temperature sensor failure", RESTART_PUMP;
    13 => "Pump power stage failure", RESTART_PUMP;
    17 => "Critical pump EEPROM problem", RESTART_PUMP;
    19 => "Pump parameter set upload required", RESTART_PUMP;
    20 => "Pump self-test fault (invalid pump software code)", RESTART_PUMP;
    21 => "Pump serial enable input went inactive during a serial start",
        "Power-cycle as for other pump faults and check the pump cable is seated.";
    22 => "Pump output frequency below threshold for too long",
        "Power-cycle as for other pump faults. A sudden pressure rise in the pumping line causes this.";
    23 => "Pump output frequency did not reach threshold in time", RESTART_PUMP;
    24 => "Error processing pump response", "Send the command again.";
    29 => "Pump inlet pressure gauge error", CHECK_GAUGE;
    30 => "Pump outlet pressure gauge error", CHECK_GAUGE;
    31 => "Helium dump pressure gauge error", CHECK_GAUGE;
    32 => "Compressor error", "Check the compressor display.";
    33 => "VTI temperature too high, everything stopped",
        "Wait for the temperature to drop. Contact attocube if this repeats.";
    34 => "Temperature monitor returned invalid temperatures for too long",
        "Check the sensor cables and retry. After changing monitor settings, wait a few seconds first.";
    35 => "Operation needs a magnet controller and none is connected",
        "Connect, power and configure the magnet controller, then restart the attoDRY.";
    36 => "Magnet controller is not in remote mode", "Take the magnet controller out of local mode.";
    37 => "Magnet quenched", "Let the magnet cool, then try again.";
    38 => "Magnet controller power module failure", "Contact attocube.";
    39 => "Chip 1 on motor driver 1 failed", RESTART_MOTOR;
    40 => "Chip 1 on motor driver 2 failed", RESTART_MOTOR;
    41 => "Chip 1 on motor driver 3 failed", RESTART_MOTOR;
    42 => "Chip 1 on motor driver 4 failed", RESTART_MOTOR;
}

/// Look up a documented instrument fault.
pub fn lookup(code: i32) -> Option<&'static VendorStatus> {
    VENDOR_STATUSES
        .binary_search_by_key(&code, |status| status.code)
        .ok()
        .map(|index| &VENDOR_STATUSES[index])
}

/// True if `code` is a fault reported by the instrument rather than the
/// library itself.
pub fn is_instrument_fault(code: i32) -> bool {
    lookup(code).is_some()
}

/// Human-readable text for a status code.
pub fn describe(code: i32) -> String {
    if code == EC_OK {
        return "No error".to_string();
    }
    match lookup(code) {
        Some(status) => format!("{}. Action: {}", status.description, status.action),
        None if code < 0 => "Unspecified driver error".to_string(),
        None => format!("Unknown attoDRY error code {}", code),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_table_sorted_and_unique() {
        for pair in VENDOR_STATUSES.windows(2) {
            assert!(pair[0].code < pair[1].code);
        }
        assert_eq!(VENDOR_STATUSES.first().map(|s| s.code), Some(1));
        assert_eq!(VENDOR_STATUSES.last().map(|s| s.code), Some(42));
    }

    #[test]
    fn test_describe() {
        assert_eq!(describe(0), "No error");
        assert!(describe(1).starts_with("High liquid helium reservoir temperature"));
        assert!(describe(37).contains("Magnet quenched"));
        assert_eq!(describe(-1), "Unspecified driver error");
        assert_eq!(describe(-42), "Unspecified driver error");
        assert!(describe(15).contains("15"));
    }

    #[test]
    fn test_instrument_fault() {
        assert!(is_instrument_fault(2));
        assert!(!is_instrument_fault(0));
        assert!(!is_instrument_fault(-1));
        assert!(!is_instrument_fault(25));
    }
}
