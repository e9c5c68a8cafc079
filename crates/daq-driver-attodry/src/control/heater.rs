//! Heater power and PID tuning.

use crate::device::AttoDry;
use crate::driver::AttoDryDriver;
use crate::error::Result;
use crate::ops::{Command, Flag, Reading, Setting};
use crate::variant::Feature;

impl<D: AttoDryDriver> AttoDry<D> {
    /// Sample heater power (W).
    pub fn sample_heater_power(&mut self) -> Result<f32> {
        self.read(Reading::SampleHeaterPower)
    }

    /// Set the sample heater power (W).
    pub fn set_sample_heater_power(&mut self, watts: f32) -> Result<()> {
        self.write(Setting::SampleHeaterPower, watts)
    }

    /// Whether the sample heater is on.
    pub fn is_sample_heater_on(&mut self) -> Result<bool> {
        self.flag(Flag::SampleHeaterOn)
    }

    /// VTI heater power (W).
    pub fn vti_heater_power(&mut self) -> Result<f32> {
        self.read(Reading::VtiHeaterPower)
    }

    /// Set the VTI heater power (W).
    pub fn set_vti_heater_power(&mut self, watts: f32) -> Result<()> {
        self.write(Setting::VtiHeaterPower, watts)
    }

    /// Switch exchange (VTI) heater control.
    pub fn toggle_exchange_heater_control(&mut self) -> Result<()> {
        self.run(Command::ToggleExchangeHeaterControl)
    }

    /// Whether the exchange heater is on.
    pub fn is_exchange_heater_on(&mut self) -> Result<bool> {
        self.flag(Flag::ExchangeHeaterOn)
    }

    /// Reservoir heater power (W). attoDRY2100 only.
    pub fn reservoir_heater_power(&mut self) -> Result<f32> {
        self.ensure_supported(Feature::Reservoir, "getReservoirHeaterPower")?;
        self.read(Reading::ReservoirHeaterPower)
    }

    /// Proportional gain of the sample temperature loop.
    pub fn proportional_gain(&mut self) -> Result<f32> {
        self.read(Reading::ProportionalGain)
    }

    /// Set the proportional gain.
    pub fn set_proportional_gain(&mut self, gain: f32) -> Result<()> {
        self.write(Setting::ProportionalGain, gain)
    }

    /// Integral gain of the sample temperature loop.
    pub fn integral_gain(&mut self) -> Result<f32> {
        self.read(Reading::IntegralGain)
    }

    /// Set the integral gain.
    pub fn set_integral_gain(&mut self, gain: f32) -> Result<()> {
        self.write(Setting::IntegralGain, gain)
    }

    /// Derivative gain of the sample temperature loop.
    pub fn derivative_gain(&mut self) -> Result<f32> {
        self.read(Reading::DerivativeGain)
    }

    /// Set the derivative gain.
    pub fn set_derivative_gain(&mut self, gain: f32) -> Result<()> {
        self.write(Setting::DerivativeGain, gain)
    }
}

#[cfg(test)]
mod tests {
    use crate::control::test_support::connected;
    use crate::error::AttoDryError;
    use crate::ops::Reading;
    use crate::variant::DeviceVariant;

    #[test]
    fn test_pid_gains() {
        let (mut dev, mock) = connected(DeviceVariant::AttoDry1100);
        dev.set_proportional_gain(12.0).unwrap();
        dev.set_integral_gain(0.4).unwrap();
        dev.set_derivative_gain(0.05).unwrap();
        assert_eq!(dev.proportional_gain().unwrap(), 12.0);
        assert_eq!(dev.integral_gain().unwrap(), 0.4);
        assert_eq!(dev.derivative_gain().unwrap(), 0.05);
        assert_eq!(
            mock.call_names(),
            vec![
                "setProportionalGain",
                "setIntegralGain",
                "setDerivativeGain",
                "getProportionalGain",
                "getIntegralGain",
                "getDerivativeGain",
            ]
        );
    }

    #[test]
    fn test_heater_powers() {
        let (mut dev, mock) = connected(DeviceVariant::AttoDry2100);
        dev.set_sample_heater_power(0.25).unwrap();
        dev.set_vti_heater_power(1.5).unwrap();
        assert_eq!(dev.sample_heater_power().unwrap(), 0.25);
        assert_eq!(dev.vti_heater_power().unwrap(), 1.5);
        assert_eq!(mock.call_names()[1], "setVTIHeaterPower");
        assert_eq!(mock.call_names()[3], "getVtiHeaterPower");
    }

    #[test]
    fn test_exchange_heater() {
        let (mut dev, _mock) = connected(DeviceVariant::AttoDry800);
        dev.toggle_exchange_heater_control().unwrap();
        assert!(dev.is_exchange_heater_on().unwrap());
    }

    #[test]
    fn test_reservoir_heater_power_only_on_2100() {
        let (mut dev, mock) = connected(DeviceVariant::AttoDry2100);
        mock.set_reading(Reading::ReservoirHeaterPower, 0.8);
        assert_eq!(dev.reservoir_heater_power().unwrap(), 0.8);

        let (mut dev, _mock) = connected(DeviceVariant::AttoDry800);
        assert_eq!(
            dev.reservoir_heater_power(),
            Err(AttoDryError::UnsupportedForVariant {
                operation: "getReservoirHeaterPower",
                variant: DeviceVariant::AttoDry800,
            })
        );
    }
}
