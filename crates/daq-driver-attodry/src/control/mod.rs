//! Typed instrument operations, grouped by capability area.
//!
//! Each submodule adds an `impl` block to [`AttoDry`]. Operations that only
//! exist on some models check the capability table first, then validate
//! their arguments, then require an open connection, and only then call the
//! driver.

mod calibration;
mod field;
mod heater;
mod logging;
mod settings;
mod system;
mod temperature;
mod vacuum;

use crate::device::AttoDry;
use crate::driver::AttoDryDriver;
use crate::error::{AttoDryError, Result};
use crate::variant::{dispatch_reading, Feature};

impl<D: AttoDryDriver> AttoDry<D> {
    /// Read a model-specific value through the entry point of this model.
    fn read_feature(&mut self, feature: Feature, operation: &'static str) -> Result<f32> {
        self.ensure_supported(feature, operation)?;
        let reading = dispatch_reading(feature, self.variant()).ok_or(
            AttoDryError::UnsupportedForVariant {
                operation,
                variant: self.variant(),
            },
        )?;
        self.read(reading)
    }
}

#[cfg(test)]
pub(crate) mod test_support {
    use crate::device::AttoDry;
    use crate::mock::MockDriver;
    use crate::variant::DeviceVariant;

    /// A connected facade over a fresh mock, with the setup calls cleared.
    pub(crate) fn connected(variant: DeviceVariant) -> (AttoDry<MockDriver>, MockDriver) {
        let mock = MockDriver::new();
        let mut dev = AttoDry::new(mock.clone(), variant, "COM5");
        dev.begin().unwrap();
        dev.connect().unwrap();
        mock.clear_calls();
        (dev, mock)
    }
}
