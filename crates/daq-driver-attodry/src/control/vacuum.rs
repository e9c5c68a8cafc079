//! Valves, pumping and pressure gauges.
//!
//! Valve hardware differs between every model, so each valve operation checks
//! the capability table. The pump valve exists on both the attoDRY1100 and
//! the attoDRY800 under different entry points; the facade picks the right
//! one.

use crate::device::AttoDry;
use crate::driver::AttoDryDriver;
use crate::error::{AttoDryError, Result};
use crate::ops::{Command, Flag, Reading};
use crate::variant::{Feature, Valve};

impl<D: AttoDryDriver> AttoDry<D> {
    /// Toggle `valve` open or closed.
    pub fn toggle_valve(&mut self, valve: Valve) -> Result<()> {
        self.ensure_supported(Feature::Valve(valve), valve.toggle_name())?;
        let command = valve
            .toggle_command(self.variant())
            .ok_or(AttoDryError::UnsupportedForVariant {
                operation: valve.toggle_name(),
                variant: self.variant(),
            })?;
        self.run(command)
    }

    /// Whether `valve` is open.
    pub fn valve_is_open(&mut self, valve: Valve) -> Result<bool> {
        self.ensure_supported(Feature::Valve(valve), valve.getter_name())?;
        let flag = valve
            .state_flag(self.variant())
            .ok_or(AttoDryError::UnsupportedForVariant {
                operation: valve.getter_name(),
                variant: self.variant(),
            })?;
        self.flag(flag)
    }

    /// Toggle the helium valve. attoDRY1100 only.
    pub fn toggle_helium_valve(&mut self) -> Result<()> {
        self.toggle_valve(Valve::Helium)
    }

    /// Toggle the inner volume valve. attoDRY1100 only.
    pub fn toggle_inner_volume_valve(&mut self) -> Result<()> {
        self.toggle_valve(Valve::InnerVolume)
    }

    /// Toggle the outer volume valve. attoDRY1100 only.
    pub fn toggle_outer_volume_valve(&mut self) -> Result<()> {
        self.toggle_valve(Valve::OuterVolume)
    }

    /// Toggle the pump valve. attoDRY1100 and attoDRY800.
    pub fn toggle_pump_valve(&mut self) -> Result<()> {
        self.toggle_valve(Valve::Pump)
    }

    /// Toggle the cryostat inlet valve. attoDRY2100 only.
    pub fn toggle_cryostat_in_valve(&mut self) -> Result<()> {
        self.toggle_valve(Valve::CryostatIn)
    }

    /// Toggle the cryostat outlet valve. attoDRY2100 only.
    pub fn toggle_cryostat_out_valve(&mut self) -> Result<()> {
        self.toggle_valve(Valve::CryostatOut)
    }

    /// Toggle the dump inlet valve. attoDRY2100 only.
    pub fn toggle_dump_in_valve(&mut self) -> Result<()> {
        self.toggle_valve(Valve::DumpIn)
    }

    /// Toggle the dump outlet valve. attoDRY2100 only.
    pub fn toggle_dump_out_valve(&mut self) -> Result<()> {
        self.toggle_valve(Valve::DumpOut)
    }

    /// Toggle the break-vacuum valve. attoDRY800 only.
    pub fn toggle_break_vacuum_valve(&mut self) -> Result<()> {
        self.toggle_valve(Valve::BreakVacuum)
    }

    /// Toggle the sample space valve. attoDRY800 only.
    pub fn toggle_sample_space_valve(&mut self) -> Result<()> {
        self.toggle_valve(Valve::SampleSpace)
    }

    /// Switch the pump.
    pub fn toggle_pump(&mut self) -> Result<()> {
        self.run(Command::TogglePump)
    }

    /// Whether the pump is running.
    pub fn is_pumping(&mut self) -> Result<bool> {
        self.flag(Flag::Pumping)
    }

    /// Pressure at the valve junction (mbar). attoDRY1100 and attoDRY800.
    pub fn pressure(&mut self) -> Result<f32> {
        self.read_feature(Feature::JunctionPressure, "getPressure")
    }

    /// Turbopump frequency (Hz). attoDRY1100 and attoDRY800.
    pub fn turbopump_frequency(&mut self) -> Result<f32> {
        self.read_feature(Feature::Turbopump, "getTurbopumpFrequency")
    }

    /// Cryostat inlet pressure (mbar). attoDRY2100 only.
    pub fn cryostat_in_pressure(&mut self) -> Result<f32> {
        self.read_feature(Feature::CryostatInPressure, "getCryostatInPressure")
    }

    /// Cryostat outlet pressure (mbar).
    pub fn cryostat_out_pressure(&mut self) -> Result<f32> {
        self.read(Reading::CryostatOutPressure)
    }

    /// Helium dump pressure (mbar). attoDRY2100 only.
    pub fn dump_pressure(&mut self) -> Result<f32> {
        self.read_feature(Feature::DumpPressure, "getDumpPressure")
    }
}

#[cfg(test)]
mod tests {
    use crate::control::test_support::connected;
    use crate::error::AttoDryError;
    use crate::ops::Reading;
    use crate::variant::{DeviceVariant, Valve};
    use attodry_sys::symbols;

    #[test]
    fn test_helium_valve_rejected_on_2100() {
        let (mut dev, mock) = connected(DeviceVariant::AttoDry2100);
        assert_eq!(
            dev.toggle_helium_valve(),
            Err(AttoDryError::UnsupportedForVariant {
                operation: "toggleHeliumValve",
                variant: DeviceVariant::AttoDry2100,
            })
        );
        assert!(mock.calls().is_empty());
    }

    #[test]
    fn test_every_valve_on_its_own_model() {
        for variant in DeviceVariant::ALL {
            let (mut dev, _mock) = connected(variant);
            for valve in Valve::ALL {
                let fitted = variant.valves().contains(&valve);
                assert_eq!(dev.toggle_valve(valve).is_ok(), fitted, "{valve} on {variant}");
                assert_eq!(dev.valve_is_open(valve).ok(), fitted.then_some(true));
            }
        }
    }

    #[test]
    fn test_pump_valve_per_model() {
        let (mut dev, mock) = connected(DeviceVariant::AttoDry800);
        dev.toggle_pump_valve().unwrap();
        assert_eq!(mock.call_names(), vec!["togglePump800Valve"]);

        let (mut dev, mock) = connected(DeviceVariant::AttoDry1100);
        dev.toggle_pump_valve().unwrap();
        assert_eq!(mock.call_names(), vec!["togglePumpValve"]);
    }

    #[test]
    fn test_break_vacuum_valve_state() {
        let (mut dev, mock) = connected(DeviceVariant::AttoDry800);
        dev.toggle_break_vacuum_valve().unwrap();
        assert!(dev.valve_is_open(Valve::BreakVacuum).unwrap());
        assert_eq!(mock.call_count(symbols::GET_BREAK_VAC_800_VALVE), 1);
        assert_eq!(mock.call_count(symbols::GET_TURBOPUMP_FREQUENCY), 0);
    }

    #[test]
    fn test_pressure_dispatch() {
        let (mut dev, mock) = connected(DeviceVariant::AttoDry800);
        mock.set_reading(Reading::Pressure800, 1.5e-3);
        mock.set_reading(Reading::TurbopumpFrequency800, 820.0);
        assert_eq!(dev.pressure().unwrap(), 1.5e-3);
        assert_eq!(dev.turbopump_frequency().unwrap(), 820.0);
        assert_eq!(
            mock.call_names(),
            vec!["getPressure800", "GetTurbopumpFrequ800"]
        );

        let (mut dev, mock) = connected(DeviceVariant::AttoDry1100);
        mock.set_reading(Reading::Pressure, 2.0e-2);
        assert_eq!(dev.pressure().unwrap(), 2.0e-2);
    }

    #[test]
    fn test_2100_gauges() {
        let (mut dev, mock) = connected(DeviceVariant::AttoDry2100);
        mock.set_reading(Reading::DumpPressure, 950.0);
        mock.set_reading(Reading::CryostatInPressure, 12.5);
        assert_eq!(dev.dump_pressure().unwrap(), 950.0);
        assert_eq!(dev.cryostat_in_pressure().unwrap(), 12.5);
        assert!(matches!(
            dev.pressure(),
            Err(AttoDryError::UnsupportedForVariant { operation: "getPressure", .. })
        ));
        assert!(dev.turbopump_frequency().is_err());

        let (mut dev, _mock) = connected(DeviceVariant::AttoDry800);
        assert!(dev.dump_pressure().is_err());
        assert!(dev.cryostat_out_pressure().is_ok());
    }

    #[test]
    fn test_pump() {
        let (mut dev, _mock) = connected(DeviceVariant::AttoDry2100);
        dev.toggle_pump().unwrap();
        assert!(dev.is_pumping().unwrap());
    }
}
