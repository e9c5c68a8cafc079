//! Temperature readout and control.

use crate::device::AttoDry;
use crate::driver::AttoDryDriver;
use crate::error::Result;
use crate::ops::{Command, Flag, Reading, Setting};
use crate::variant::Feature;

impl<D: AttoDryDriver> AttoDry<D> {
    /// Sample temperature (K).
    pub fn sample_temperature(&mut self) -> Result<f32> {
        self.read(Reading::SampleTemperature)
    }

    /// User temperature set point (K).
    pub fn user_temperature(&mut self) -> Result<f32> {
        self.read(Reading::UserTemperature)
    }

    /// Set the user temperature set point (K).
    ///
    /// Takes effect once temperature control is on.
    pub fn set_user_temperature(&mut self, kelvin: f32) -> Result<()> {
        self.write(Setting::UserTemperature, kelvin)
    }

    /// 4 K stage temperature (K).
    pub fn four_kelvin_stage_temperature(&mut self) -> Result<f32> {
        self.read(Reading::FourKelvinStageTemperature)
    }

    /// 40 K stage temperature (K). attoDRY1100 only.
    pub fn forty_kelvin_stage_temperature(&mut self) -> Result<f32> {
        self.read_feature(Feature::FortyKelvinStage, "get40KStageTemperature")
    }

    /// VTI temperature (K).
    pub fn vti_temperature(&mut self) -> Result<f32> {
        self.read(Reading::VtiTemperature)
    }

    /// Helium reservoir temperature (K). attoDRY2100 only.
    pub fn reservoir_temperature(&mut self) -> Result<f32> {
        self.ensure_supported(Feature::Reservoir, "getReservoirTemperature")?;
        self.read(Reading::ReservoirTemperature)
    }

    /// Whether any temperature control loop is running.
    pub fn is_controlling_temperature(&mut self) -> Result<bool> {
        self.flag(Flag::ControllingTemperature)
    }

    /// Switch sample and exchange heater control together.
    pub fn toggle_full_temperature_control(&mut self) -> Result<()> {
        self.run(Command::ToggleFullTemperatureControl)
    }

    /// Switch sample heater control.
    pub fn toggle_sample_temperature_control(&mut self) -> Result<()> {
        self.run(Command::ToggleSampleTemperatureControl)
    }

    /// Cool down to the lowest reachable temperature.
    pub fn go_to_base_temperature(&mut self) -> Result<()> {
        self.run(Command::GoToBaseTemperature)
    }

    /// Whether a base-temperature run is in progress.
    pub fn is_going_to_base_temperature(&mut self) -> Result<bool> {
        self.flag(Flag::GoingToBaseTemperature)
    }
}

#[cfg(test)]
mod tests {
    use crate::control::test_support::connected;
    use crate::error::AttoDryError;
    use crate::ops::Reading;
    use crate::variant::DeviceVariant;
    use attodry_sys::symbols;

    #[test]
    fn test_user_temperature_round_trip() {
        let (mut dev, _mock) = connected(DeviceVariant::AttoDry800);
        dev.set_user_temperature(1.6).unwrap();
        assert_eq!(dev.user_temperature().unwrap(), 1.6);
    }

    #[test]
    fn test_readings_are_unmodified() {
        let (mut dev, mock) = connected(DeviceVariant::AttoDry1100);
        mock.set_reading(Reading::SampleTemperature, 3.875);
        mock.set_reading(Reading::FortyKelvinStageTemperature, 41.25);
        assert_eq!(dev.sample_temperature().unwrap(), 3.875);
        assert_eq!(dev.forty_kelvin_stage_temperature().unwrap(), 41.25);
    }

    #[test]
    fn test_forty_kelvin_stage_only_on_1100() {
        let (mut dev, mock) = connected(DeviceVariant::AttoDry2100);
        assert_eq!(
            dev.forty_kelvin_stage_temperature(),
            Err(AttoDryError::UnsupportedForVariant {
                operation: "get40KStageTemperature",
                variant: DeviceVariant::AttoDry2100,
            })
        );
        assert!(mock.calls().is_empty());
    }

    #[test]
    fn test_reservoir_temperature_only_on_2100() {
        let (mut dev, mock) = connected(DeviceVariant::AttoDry2100);
        mock.set_reading(Reading::ReservoirTemperature, 4.4);
        assert_eq!(dev.reservoir_temperature().unwrap(), 4.4);

        let (mut dev, _mock) = connected(DeviceVariant::AttoDry1100);
        assert!(dev.reservoir_temperature().is_err());
    }

    #[test]
    fn test_base_temperature() {
        let (mut dev, mock) = connected(DeviceVariant::AttoDry1100);
        assert!(!dev.is_going_to_base_temperature().unwrap());
        dev.go_to_base_temperature().unwrap();
        assert!(dev.is_going_to_base_temperature().unwrap());
        assert_eq!(mock.call_count(symbols::GO_TO_BASE_TEMPERATURE), 1);
    }

    #[test]
    fn test_temperature_control_toggles() {
        let (mut dev, _mock) = connected(DeviceVariant::AttoDry2100);
        dev.toggle_full_temperature_control().unwrap();
        assert!(dev.is_controlling_temperature().unwrap());
        dev.toggle_full_temperature_control().unwrap();
        assert!(!dev.is_controlling_temperature().unwrap());

        dev.toggle_sample_temperature_control().unwrap();
        assert!(dev.is_sample_heater_on().unwrap());
    }
}
