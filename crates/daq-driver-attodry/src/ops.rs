//! Typed names for the native entry points.
//!
//! The vendor library exports well over a hundred functions, but they fall
//! into a handful of shapes: argument-less commands, integer flag getters,
//! float getters, float setters and text getters. Each shape gets an enum
//! here whose variants map one-to-one onto exported symbols, so a driver
//! implementation only needs one method per shape.

use std::fmt;
use std::str::FromStr;
use std::time::Duration;

use attodry_sys::symbols;

use crate::error::{AttoDryError, Result};

macro_rules! native_ops {
    (
        $(#[$meta:meta])*
        pub enum $name:ident {
            $($(#[$vmeta:meta])* $variant:ident => $symbol:ident,)*
        }
    ) => {
        $(#[$meta])*
        #[allow(missing_docs)]
        #[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
        pub enum $name {
            $($(#[$vmeta])* $variant,)*
        }

        impl $name {
            /// Every variant, in declaration order.
            pub const ALL: &'static [$name] = &[$($name::$variant,)*];

            /// Exported symbol implementing this operation.
            pub fn symbol(self) -> &'static str {
                match self {
                    $($name::$variant => symbols::$symbol,)*
                }
            }

            /// Operation name without the `AttoDRY_Interface_` prefix.
            pub fn name(self) -> &'static str {
                short_name(self.symbol())
            }
        }

        impl fmt::Display for $name {
            fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
                f.write_str(self.name())
            }
        }
    };
}

const SYMBOL_PREFIX: &str = "AttoDRY_Interface_";

/// Strip the library prefix from an exported symbol name.
pub(crate) fn short_name(symbol: &'static str) -> &'static str {
    symbol.strip_prefix(SYMBOL_PREFIX).unwrap_or(symbol)
}

native_ops! {
    /// `int f(void)` entry points: procedures, toggles and refresh requests.
    pub enum Command {
        Cancel => CANCEL,
        Confirm => CONFIRM,
        LowerError => LOWER_ERROR,
        GoToBaseTemperature => GO_TO_BASE_TEMPERATURE,
        StartSampleExchange => START_SAMPLE_EXCHANGE,
        SweepFieldToZero => SWEEP_FIELD_TO_ZERO,
        StopLogging => STOP_LOGGING,

        QueryReservoirTsetColdSample => QUERY_RESERVOIR_TSET_COLD_SAMPLE,
        QueryReservoirTsetWarmMagnet => QUERY_RESERVOIR_TSET_WARM_MAGNET,
        QueryReservoirTsetWarmSample => QUERY_RESERVOIR_TSET_WARM_SAMPLE,
        QuerySampleHeaterMaximumPower => QUERY_SAMPLE_HEATER_MAXIMUM_POWER,
        QuerySampleHeaterResistance => QUERY_SAMPLE_HEATER_RESISTANCE,
        QuerySampleHeaterWireResistance => QUERY_SAMPLE_HEATER_WIRE_RESISTANCE,

        ToggleExchangeHeaterControl => TOGGLE_EXCHANGE_HEATER_CONTROL,
        ToggleFullTemperatureControl => TOGGLE_FULL_TEMPERATURE_CONTROL,
        ToggleMagneticFieldControl => TOGGLE_MAGNETIC_FIELD_CONTROL,
        TogglePersistentMode => TOGGLE_PERSISTENT_MODE,
        TogglePump => TOGGLE_PUMP,
        ToggleSampleTemperatureControl => TOGGLE_SAMPLE_TEMPERATURE_CONTROL,
        ToggleStartUpShutdown => TOGGLE_START_UP_SHUTDOWN,

        ToggleHeliumValve => TOGGLE_HELIUM_VALVE,
        ToggleInnerVolumeValve => TOGGLE_INNER_VOLUME_VALVE,
        ToggleOuterVolumeValve => TOGGLE_OUTER_VOLUME_VALVE,
        TogglePumpValve => TOGGLE_PUMP_VALVE,
        ToggleCryostatInValve => TOGGLE_CRYOSTAT_IN_VALVE,
        ToggleCryostatOutValve => TOGGLE_CRYOSTAT_OUT_VALVE,
        ToggleDumpInValve => TOGGLE_DUMP_IN_VALVE,
        ToggleDumpOutValve => TOGGLE_DUMP_OUT_VALVE,
        ToggleBreakVac800Valve => TOGGLE_BREAK_VAC_800_VALVE,
        TogglePump800Valve => TOGGLE_PUMP_800_VALVE,
        ToggleSampleSpace800Valve => TOGGLE_SAMPLE_SPACE_800_VALVE,
    }
}

native_ops! {
    /// `int f(int *out)` entry points returning a boolean.
    pub enum Flag {
        ControllingField => IS_CONTROLLING_FIELD,
        ControllingTemperature => IS_CONTROLLING_TEMPERATURE,
        DeviceConnected => IS_DEVICE_CONNECTED,
        DeviceInitialised => IS_DEVICE_INITIALISED,
        GoingToBaseTemperature => IS_GOING_TO_BASE_TEMPERATURE,
        ExchangeHeaterOn => IS_EXCHANGE_HEATER_ON,
        PersistentModeSet => IS_PERSISTENT_MODE_SET,
        Pumping => IS_PUMPING,
        SampleExchangeInProgress => IS_SAMPLE_EXCHANGE_IN_PROGRESS,
        SampleHeaterOn => IS_SAMPLE_HEATER_ON,
        SampleReadyToExchange => IS_SAMPLE_READY_TO_EXCHANGE,
        SystemRunning => IS_SYSTEM_RUNNING,
        ZeroingField => IS_ZEROING_FIELD,

        HeliumValveOpen => GET_HELIUM_VALVE,
        InnerVolumeValveOpen => GET_INNER_VOLUME_VALVE,
        OuterVolumeValveOpen => GET_OUTER_VOLUME_VALVE,
        PumpValveOpen => GET_PUMP_VALVE,
        CryostatInValveOpen => GET_CRYOSTAT_IN_VALVE,
        CryostatOutValveOpen => GET_CRYOSTAT_OUT_VALVE,
        DumpInValveOpen => GET_DUMP_IN_VALVE,
        DumpOutValveOpen => GET_DUMP_OUT_VALVE,
        BreakVac800ValveOpen => GET_BREAK_VAC_800_VALVE,
        Pump800ValveOpen => GET_PUMP_800_VALVE,
        SampleSpace800ValveOpen => GET_SAMPLE_SPACE_800_VALVE,
    }
}

native_ops! {
    /// `int f(float *out)` entry points.
    pub enum Reading {
        FourKelvinStageTemperature => GET_4K_STAGE_TEMPERATURE,
        FortyKelvinStageTemperature => GET_40K_STAGE_TEMPERATURE,
        MagneticField => GET_MAGNETIC_FIELD,
        MagneticFieldSetPoint => GET_MAGNETIC_FIELD_SET_POINT,
        SampleTemperature => GET_SAMPLE_TEMPERATURE,
        UserTemperature => GET_USER_TEMPERATURE,
        SampleHeaterPower => GET_SAMPLE_HEATER_POWER,
        SampleHeaterMaximumPower => GET_SAMPLE_HEATER_MAXIMUM_POWER,
        SampleHeaterResistance => GET_SAMPLE_HEATER_RESISTANCE,
        SampleHeaterWireResistance => GET_SAMPLE_HEATER_WIRE_RESISTANCE,
        VtiHeaterPower => GET_VTI_HEATER_POWER,
        VtiTemperature => GET_VTI_TEMPERATURE,
        DerivativeGain => GET_DERIVATIVE_GAIN,
        IntegralGain => GET_INTEGRAL_GAIN,
        ProportionalGain => GET_PROPORTIONAL_GAIN,
        ReservoirHeaterPower => GET_RESERVOIR_HEATER_POWER,
        ReservoirTemperature => GET_RESERVOIR_TEMPERATURE,
        ReservoirTsetColdSample => GET_RESERVOIR_TSET_COLD_SAMPLE,
        ReservoirTsetWarmMagnet => GET_RESERVOIR_TSET_WARM_MAGNET,
        ReservoirTsetWarmSample => GET_RESERVOIR_TSET_WARM_SAMPLE,
        CryostatInPressure => GET_CRYOSTAT_IN_PRESSURE,
        CryostatOutPressure => GET_CRYOSTAT_OUT_PRESSURE,
        DumpPressure => GET_DUMP_PRESSURE,
        Pressure => GET_PRESSURE,
        TurbopumpFrequency => GET_TURBOPUMP_FREQUENCY,
        Pressure800 => GET_PRESSURE_800,
        TurbopumpFrequency800 => GET_TURBOPUMP_FREQU_800,
    }
}

native_ops! {
    /// `int f(float value)` entry points.
    pub enum Setting {
        UserMagneticField => SET_USER_MAGNETIC_FIELD,
        UserTemperature => SET_USER_TEMPERATURE,
        SampleHeaterPower => SET_SAMPLE_HEATER_POWER,
        SampleHeaterMaximumPower => SET_SAMPLE_HEATER_MAXIMUM_POWER,
        SampleHeaterResistance => SET_SAMPLE_HEATER_RESISTANCE,
        SampleHeaterWireResistance => SET_SAMPLE_HEATER_WIRE_RESISTANCE,
        VtiHeaterPower => SET_VTI_HEATER_POWER,
        DerivativeGain => SET_DERIVATIVE_GAIN,
        IntegralGain => SET_INTEGRAL_GAIN,
        ProportionalGain => SET_PROPORTIONAL_GAIN,
        ReservoirTsetColdSample => SET_RESERVOIR_TSET_COLD_SAMPLE,
        ReservoirTsetWarmMagnet => SET_RESERVOIR_TSET_WARM_MAGNET,
        ReservoirTsetWarmSample => SET_RESERVOIR_TSET_WARM_SAMPLE,
    }
}

impl Setting {
    /// Setters that write the instrument's non-volatile memory.
    ///
    /// The memory is rated for roughly 100 000 write cycles.
    pub fn writes_flash(self) -> bool {
        matches!(
            self,
            Setting::SampleHeaterMaximumPower
                | Setting::SampleHeaterResistance
                | Setting::SampleHeaterWireResistance
        )
    }
}

native_ops! {
    /// `int f(char *buf, int len)` entry points.
    pub enum TextField {
        ActionMessage => GET_ACTION_MESSAGE,
        ErrorMessage => GET_ERROR_MESSAGE,
    }
}

/// A temperature-monitor user calibration curve slot (1 to 8).
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub struct CurveNumber(u8);

impl CurveNumber {
    /// Lowest user curve slot.
    pub const MIN: u8 = 1;
    /// Highest user curve slot.
    pub const MAX: u8 = 8;

    /// Validate a curve slot number.
    pub fn new(number: u8) -> Result<Self> {
        if (Self::MIN..=Self::MAX).contains(&number) {
            Ok(Self(number))
        } else {
            Err(AttoDryError::InvalidCurveNumber(number))
        }
    }

    /// The slot number.
    pub fn get(self) -> u8 {
        self.0
    }
}

impl TryFrom<u8> for CurveNumber {
    type Error = AttoDryError;

    fn try_from(number: u8) -> Result<Self> {
        Self::new(number)
    }
}

impl fmt::Display for CurveNumber {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

/// Calibration curve file transfers.
///
/// Downloads read a curve from the instrument into a file, uploads write a
/// file to the instrument. All four are fire-and-forget: the driver reports
/// only whether the request was accepted.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum CurveTransfer {
    /// Sample temperature sensor curve, instrument to file.
    DownloadSampleSensor,
    /// Sample temperature sensor curve, file to instrument.
    UploadSampleSensor,
    /// Temperature monitor user curve, instrument to file.
    DownloadUserCurve(CurveNumber),
    /// Temperature monitor user curve, file to instrument.
    UploadUserCurve(CurveNumber),
}

impl CurveTransfer {
    /// Exported symbol implementing this transfer.
    pub fn symbol(self) -> &'static str {
        match self {
            CurveTransfer::DownloadSampleSensor => {
                symbols::DOWNLOAD_SAMPLE_TEMPERATURE_SENSOR_CALIBRATION_CURVE
            }
            CurveTransfer::UploadSampleSensor => symbols::UPLOAD_SAMPLE_TEMPERATURE_CALIBRATION_CURVE,
            CurveTransfer::DownloadUserCurve(_) => {
                symbols::DOWNLOAD_TEMPERATURE_SENSOR_CALIBRATION_CURVE
            }
            CurveTransfer::UploadUserCurve(_) => symbols::UPLOAD_TEMPERATURE_CALIBRATION_CURVE,
        }
    }

    /// Operation name without the library prefix.
    pub fn name(self) -> &'static str {
        short_name(self.symbol())
    }

    /// User curve slot, if this transfer addresses one.
    pub fn curve(self) -> Option<CurveNumber> {
        match self {
            CurveTransfer::DownloadUserCurve(curve) | CurveTransfer::UploadUserCurve(curve) => {
                Some(curve)
            }
            _ => None,
        }
    }
}

/// Sampling interval for the instrument's data log.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
pub enum LogInterval {
    /// One sample per second.
    #[default]
    OneSecond,
    /// One sample every five seconds.
    FiveSeconds,
    /// One sample every thirty seconds.
    ThirtySeconds,
    /// One sample per minute.
    OneMinute,
    /// One sample every five minutes.
    FiveMinutes,
}

impl LogInterval {
    /// Every interval, shortest first.
    pub const ALL: [LogInterval; 5] = [
        LogInterval::OneSecond,
        LogInterval::FiveSeconds,
        LogInterval::ThirtySeconds,
        LogInterval::OneMinute,
        LogInterval::FiveMinutes,
    ];

    /// Value passed to `startLogging`.
    pub fn code(self) -> i32 {
        match self {
            LogInterval::OneSecond => 0,
            LogInterval::FiveSeconds => 1,
            LogInterval::ThirtySeconds => 2,
            LogInterval::OneMinute => 3,
            LogInterval::FiveMinutes => 4,
        }
    }

    /// Inverse of [`LogInterval::code`].
    pub fn from_code(code: i32) -> Option<Self> {
        Self::ALL.into_iter().find(|interval| interval.code() == code)
    }

    /// Interval as a duration.
    pub fn as_duration(self) -> Duration {
        match self {
            LogInterval::OneSecond => Duration::from_secs(1),
            LogInterval::FiveSeconds => Duration::from_secs(5),
            LogInterval::ThirtySeconds => Duration::from_secs(30),
            LogInterval::OneMinute => Duration::from_secs(60),
            LogInterval::FiveMinutes => Duration::from_secs(300),
        }
    }

    fn label(self) -> &'static str {
        match self {
            LogInterval::OneSecond => "1s",
            LogInterval::FiveSeconds => "5s",
            LogInterval::ThirtySeconds => "30s",
            LogInterval::OneMinute => "1min",
            LogInterval::FiveMinutes => "5min",
        }
    }
}

impl fmt::Display for LogInterval {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.label())
    }
}

impl FromStr for LogInterval {
    type Err = AttoDryError;

    fn from_str(s: &str) -> Result<Self> {
        let wanted = s.trim().to_ascii_lowercase();
        Self::ALL
            .into_iter()
            .find(|interval| interval.label() == wanted)
            .ok_or_else(|| AttoDryError::InvalidArgument {
                what: "log interval",
                reason: format!("'{}' (expected one of 1s, 5s, 30s, 1min, 5min)", s),
            })
    }
}

/// Values held in the instrument's memory that must be refreshed into
/// computer-side memory before they can be read.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum ConfigValue {
    /// Sample heater resistance (Ω).
    SampleHeaterResistance,
    /// Sample heater wire resistance (Ω).
    SampleHeaterWireResistance,
    /// Sample heater maximum power (W).
    SampleHeaterMaximumPower,
    /// Reservoir set point with a cold sample (K).
    ReservoirTsetColdSample,
    /// Reservoir set point with a warm sample (K).
    ReservoirTsetWarmSample,
    /// Reservoir set point with a warm magnet (K).
    ReservoirTsetWarmMagnet,
}

impl ConfigValue {
    /// Every refreshable value.
    pub const ALL: [ConfigValue; 6] = [
        ConfigValue::SampleHeaterResistance,
        ConfigValue::SampleHeaterWireResistance,
        ConfigValue::SampleHeaterMaximumPower,
        ConfigValue::ReservoirTsetColdSample,
        ConfigValue::ReservoirTsetWarmSample,
        ConfigValue::ReservoirTsetWarmMagnet,
    ];

    /// Request that copies the value from the instrument.
    pub fn query_command(self) -> Command {
        match self {
            ConfigValue::SampleHeaterResistance => Command::QuerySampleHeaterResistance,
            ConfigValue::SampleHeaterWireResistance => Command::QuerySampleHeaterWireResistance,
            ConfigValue::SampleHeaterMaximumPower => Command::QuerySampleHeaterMaximumPower,
            ConfigValue::ReservoirTsetColdSample => Command::QueryReservoirTsetColdSample,
            ConfigValue::ReservoirTsetWarmSample => Command::QueryReservoirTsetWarmSample,
            ConfigValue::ReservoirTsetWarmMagnet => Command::QueryReservoirTsetWarmMagnet,
        }
    }

    /// Getter returning the last refreshed value.
    pub fn reading(self) -> Reading {
        match self {
            ConfigValue::SampleHeaterResistance => Reading::SampleHeaterResistance,
            ConfigValue::SampleHeaterWireResistance => Reading::SampleHeaterWireResistance,
            ConfigValue::SampleHeaterMaximumPower => Reading::SampleHeaterMaximumPower,
            ConfigValue::ReservoirTsetColdSample => Reading::ReservoirTsetColdSample,
            ConfigValue::ReservoirTsetWarmSample => Reading::ReservoirTsetWarmSample,
            ConfigValue::ReservoirTsetWarmMagnet => Reading::ReservoirTsetWarmMagnet,
        }
    }

    /// Setter writing the value to the instrument.
    pub fn setting(self) -> Setting {
        match self {
            ConfigValue::SampleHeaterResistance => Setting::SampleHeaterResistance,
            ConfigValue::SampleHeaterWireResistance => Setting::SampleHeaterWireResistance,
            ConfigValue::SampleHeaterMaximumPower => Setting::SampleHeaterMaximumPower,
            ConfigValue::ReservoirTsetColdSample => Setting::ReservoirTsetColdSample,
            ConfigValue::ReservoirTsetWarmSample => Setting::ReservoirTsetWarmSample,
            ConfigValue::ReservoirTsetWarmMagnet => Setting::ReservoirTsetWarmMagnet,
        }
    }

    /// Reverse lookup from a refresh request.
    pub fn from_query(command: Command) -> Option<Self> {
        Self::ALL
            .into_iter()
            .find(|value| value.query_command() == command)
    }

    /// Reverse lookup from a setter.
    pub fn from_setting(setting: Setting) -> Option<Self> {
        Self::ALL.into_iter().find(|value| value.setting() == setting)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::collections::HashSet;

    #[test]
    fn test_symbols_unique() {
        let mut seen = HashSet::new();
        let all = Command::ALL
            .iter()
            .map(|c| c.symbol())
            .chain(Flag::ALL.iter().map(|f| f.symbol()))
            .chain(Reading::ALL.iter().map(|r| r.symbol()))
            .chain(Setting::ALL.iter().map(|s| s.symbol()))
            .chain(TextField::ALL.iter().map(|t| t.symbol()));
        for symbol in all {
            assert!(seen.insert(symbol), "duplicate symbol {}", symbol);
        }
    }

    #[test]
    fn test_text_fields_use_their_own_symbols() {
        assert_eq!(TextField::ActionMessage.name(), "getActionMessage");
        assert_eq!(TextField::ErrorMessage.name(), "getAttodryErrorMessage");
    }

    #[test]
    fn test_break_vacuum_valve_getter() {
        assert_eq!(Flag::BreakVac800ValveOpen.name(), "getBreakVac800Valve");
    }

    #[test]
    fn test_curve_number_range() {
        assert!(CurveNumber::new(0).is_err());
        assert_eq!(CurveNumber::new(1).map(CurveNumber::get), Ok(1));
        assert_eq!(CurveNumber::new(8).map(CurveNumber::get), Ok(8));
        assert_eq!(
            CurveNumber::try_from(9),
            Err(AttoDryError::InvalidCurveNumber(9))
        );
    }

    #[test]
    fn test_curve_transfer_symbols() {
        let curve = CurveNumber::new(3).unwrap();
        assert_eq!(
            CurveTransfer::UploadUserCurve(curve).name(),
            "uploadTemperatureCalibrationCurve"
        );
        assert_eq!(CurveTransfer::UploadUserCurve(curve).curve(), Some(curve));
        assert_eq!(CurveTransfer::DownloadSampleSensor.curve(), None);
    }

    #[test]
    fn test_log_interval_codes() {
        let codes: Vec<i32> = LogInterval::ALL.iter().map(|i| i.code()).collect();
        assert_eq!(codes, vec![0, 1, 2, 3, 4]);
        assert_eq!(LogInterval::from_code(3), Some(LogInterval::OneMinute));
        assert_eq!(LogInterval::from_code(5), None);
        assert_eq!(LogInterval::FiveMinutes.as_duration(), Duration::from_secs(300));
    }

    #[test]
    fn test_log_interval_parse() {
        assert_eq!("1s".parse::<LogInterval>().unwrap(), LogInterval::OneSecond);
        assert_eq!("30S".parse::<LogInterval>().unwrap(), LogInterval::ThirtySeconds);
        assert_eq!(" 5min ".parse::<LogInterval>().unwrap(), LogInterval::FiveMinutes);
        assert!("2s".parse::<LogInterval>().is_err());
        assert_eq!(LogInterval::OneMinute.to_string(), "1min");
    }

    #[test]
    fn test_config_value_mapping() {
        for value in ConfigValue::ALL {
            assert_eq!(ConfigValue::from_query(value.query_command()), Some(value));
            assert_eq!(ConfigValue::from_setting(value.setting()), Some(value));
            assert!(value.reading().name().starts_with("get"));
        }
        assert_eq!(ConfigValue::from_query(Command::Cancel), None);
    }

    #[test]
    fn test_flash_writes() {
        assert!(Setting::SampleHeaterResistance.writes_flash());
        assert!(!Setting::UserTemperature.writes_flash());
        assert!(!Setting::ReservoirTsetColdSample.writes_flash());
    }
}
