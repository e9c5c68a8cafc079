//! Cryostat models and which operations each one supports.

use std::fmt;
use std::str::FromStr;

use serde::{Deserialize, Serialize};

use crate::error::AttoDryError;
use crate::ops::{Command, Flag, Reading};

/// attoDRY product line.
///
/// The numeric [`code`](DeviceVariant::code) is what the driver's `begin`
/// entry point expects.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(try_from = "String", into = "String")]
pub enum DeviceVariant {
    /// attoDRY1100: closed-cycle cryostat with helium, volume and pump valves.
    AttoDry1100,
    /// attoDRY2100: closed-cycle cryostat with a helium reservoir and dump.
    AttoDry2100,
    /// attoDRY800: compact cryostat with a break-vacuum valve.
    AttoDry800,
}

impl DeviceVariant {
    /// Every variant, in native code order.
    pub const ALL: [DeviceVariant; 3] = [
        DeviceVariant::AttoDry1100,
        DeviceVariant::AttoDry2100,
        DeviceVariant::AttoDry800,
    ];

    /// Value passed to the driver's `begin`.
    pub fn code(self) -> u16 {
        match self {
            DeviceVariant::AttoDry1100 => 0,
            DeviceVariant::AttoDry2100 => 1,
            DeviceVariant::AttoDry800 => 2,
        }
    }

    /// Inverse of [`DeviceVariant::code`].
    pub fn from_code(code: u16) -> Option<Self> {
        Self::ALL.into_iter().find(|variant| variant.code() == code)
    }

    /// Product name, e.g. `attoDRY2100`.
    pub fn product_name(self) -> &'static str {
        match self {
            DeviceVariant::AttoDry1100 => "attoDRY1100",
            DeviceVariant::AttoDry2100 => "attoDRY2100",
            DeviceVariant::AttoDry800 => "attoDRY800",
        }
    }

    /// Whether this model has `feature`.
    pub fn supports(self, feature: Feature) -> bool {
        feature.variants().contains(&self)
    }

    /// Valves fitted to this model.
    pub fn valves(self) -> Vec<Valve> {
        Valve::ALL
            .into_iter()
            .filter(|valve| valve.variants().contains(&self))
            .collect()
    }
}

impl fmt::Display for DeviceVariant {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.product_name())
    }
}

impl FromStr for DeviceVariant {
    type Err = AttoDryError;

    /// Accepts `attodry1100`, `attoDRY2100`, `800` and similar.
    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let lower = s.trim().to_ascii_lowercase();
        let model = lower.strip_prefix("attodry").unwrap_or(&lower);
        match model {
            "1100" => Ok(DeviceVariant::AttoDry1100),
            "2100" => Ok(DeviceVariant::AttoDry2100),
            "800" => Ok(DeviceVariant::AttoDry800),
            _ => Err(AttoDryError::InvalidArgument {
                what: "device variant",
                reason: format!(
                    "'{}' (expected attodry1100, attodry2100 or attodry800)",
                    s
                ),
            }),
        }
    }
}

impl TryFrom<String> for DeviceVariant {
    type Error = AttoDryError;

    fn try_from(value: String) -> Result<Self, Self::Error> {
        value.parse()
    }
}

impl From<DeviceVariant> for String {
    fn from(variant: DeviceVariant) -> Self {
        variant.product_name().to_ascii_lowercase()
    }
}

/// Hardware present on only some models.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Feature {
    /// A switchable valve.
    Valve(Valve),
    /// 40 K stage thermometer.
    FortyKelvinStage,
    /// Pressure gauge at the valve junction.
    JunctionPressure,
    /// Turbopump with frequency readout.
    Turbopump,
    /// Cryostat inlet pressure gauge.
    CryostatInPressure,
    /// Helium dump pressure gauge.
    DumpPressure,
    /// Helium reservoir thermometer and heater.
    Reservoir,
}

impl Feature {
    /// Models that have this feature.
    pub fn variants(self) -> &'static [DeviceVariant] {
        use DeviceVariant::*;
        match self {
            Feature::Valve(valve) => valve.variants(),
            Feature::FortyKelvinStage => &[AttoDry1100],
            Feature::JunctionPressure | Feature::Turbopump => &[AttoDry1100, AttoDry800],
            Feature::CryostatInPressure | Feature::DumpPressure | Feature::Reservoir => {
                &[AttoDry2100]
            }
        }
    }
}

/// Valves across all attoDRY models.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Valve {
    /// Helium supply valve (1100).
    Helium,
    /// Inner volume valve (1100).
    InnerVolume,
    /// Outer volume valve (1100).
    OuterVolume,
    /// Pump valve (1100, 800).
    Pump,
    /// Cryostat inlet valve (2100).
    CryostatIn,
    /// Cryostat outlet valve (2100).
    CryostatOut,
    /// Dump inlet valve (2100).
    DumpIn,
    /// Dump outlet valve (2100).
    DumpOut,
    /// Break-vacuum valve (800).
    BreakVacuum,
    /// Sample space valve (800).
    SampleSpace,
}

impl Valve {
    /// Every valve.
    pub const ALL: [Valve; 10] = [
        Valve::Helium,
        Valve::InnerVolume,
        Valve::OuterVolume,
        Valve::Pump,
        Valve::CryostatIn,
        Valve::CryostatOut,
        Valve::DumpIn,
        Valve::DumpOut,
        Valve::BreakVacuum,
        Valve::SampleSpace,
    ];

    /// Models fitted with this valve.
    pub fn variants(self) -> &'static [DeviceVariant] {
        use DeviceVariant::*;
        match self {
            Valve::Helium | Valve::InnerVolume | Valve::OuterVolume => &[AttoDry1100],
            Valve::Pump => &[AttoDry1100, AttoDry800],
            Valve::CryostatIn | Valve::CryostatOut | Valve::DumpIn | Valve::DumpOut => {
                &[AttoDry2100]
            }
            Valve::BreakVacuum | Valve::SampleSpace => &[AttoDry800],
        }
    }

    /// Toggle entry point on `variant`, or `None` if the valve is not fitted.
    pub fn toggle_command(self, variant: DeviceVariant) -> Option<Command> {
        if !self.variants().contains(&variant) {
            return None;
        }
        Some(match self {
            Valve::Helium => Command::ToggleHeliumValve,
            Valve::InnerVolume => Command::ToggleInnerVolumeValve,
            Valve::OuterVolume => Command::ToggleOuterVolumeValve,
            Valve::Pump if variant == DeviceVariant::AttoDry800 => Command::TogglePump800Valve,
            Valve::Pump => Command::TogglePumpValve,
            Valve::CryostatIn => Command::ToggleCryostatInValve,
            Valve::CryostatOut => Command::ToggleCryostatOutValve,
            Valve::DumpIn => Command::ToggleDumpInValve,
            Valve::DumpOut => Command::ToggleDumpOutValve,
            Valve::BreakVacuum => Command::ToggleBreakVac800Valve,
            Valve::SampleSpace => Command::ToggleSampleSpace800Valve,
        })
    }

    /// State getter on `variant`, or `None` if the valve is not fitted.
    pub fn state_flag(self, variant: DeviceVariant) -> Option<Flag> {
        if !self.variants().contains(&variant) {
            return None;
        }
        Some(match self {
            Valve::Helium => Flag::HeliumValveOpen,
            Valve::InnerVolume => Flag::InnerVolumeValveOpen,
            Valve::OuterVolume => Flag::OuterVolumeValveOpen,
            Valve::Pump if variant == DeviceVariant::AttoDry800 => Flag::Pump800ValveOpen,
            Valve::Pump => Flag::PumpValveOpen,
            Valve::CryostatIn => Flag::CryostatInValveOpen,
            Valve::CryostatOut => Flag::CryostatOutValveOpen,
            Valve::DumpIn => Flag::DumpInValveOpen,
            Valve::DumpOut => Flag::DumpOutValveOpen,
            Valve::BreakVacuum => Flag::BreakVac800ValveOpen,
            Valve::SampleSpace => Flag::SampleSpace800ValveOpen,
        })
    }

    /// Name of the toggle, for error reporting when the valve is not fitted.
    pub fn toggle_name(self) -> &'static str {
        match self {
            Valve::Helium => "toggleHeliumValve",
            Valve::InnerVolume => "toggleInnerVolumeValve",
            Valve::OuterVolume => "toggleOuterVolumeValve",
            Valve::Pump => "togglePumpValve",
            Valve::CryostatIn => "toggleCryostatInValve",
            Valve::CryostatOut => "toggleCryostatOutValve",
            Valve::DumpIn => "toggleDumpInValve",
            Valve::DumpOut => "toggleDumpOutValve",
            Valve::BreakVacuum => "toggleBreakVac800Valve",
            Valve::SampleSpace => "toggleSampleSpace800Valve",
        }
    }

    /// Name of the state getter, for error reporting.
    pub fn getter_name(self) -> &'static str {
        match self {
            Valve::Helium => "getHeliumValve",
            Valve::InnerVolume => "getInnerVolumeValve",
            Valve::OuterVolume => "getOuterVolumeValve",
            Valve::Pump => "getPumpValve",
            Valve::CryostatIn => "getCryostatInValve",
            Valve::CryostatOut => "getCryostatOutValve",
            Valve::DumpIn => "getDumpInValve",
            Valve::DumpOut => "getDumpOutValve",
            Valve::BreakVacuum => "getBreakVac800Valve",
            Valve::SampleSpace => "getSampleSpace800Valve",
        }
    }
}

impl fmt::Display for Valve {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = match self {
            Valve::Helium => "helium",
            Valve::InnerVolume => "inner volume",
            Valve::OuterVolume => "outer volume",
            Valve::Pump => "pump",
            Valve::CryostatIn => "cryostat in",
            Valve::CryostatOut => "cryostat out",
            Valve::DumpIn => "dump in",
            Valve::DumpOut => "dump out",
            Valve::BreakVacuum => "break vacuum",
            Valve::SampleSpace => "sample space",
        };
        write!(f, "{} valve", name)
    }
}

/// Reading for a feature that lives under different entry points per model.
pub(crate) fn dispatch_reading(feature: Feature, variant: DeviceVariant) -> Option<Reading> {
    if !variant.supports(feature) {
        return None;
    }
    match (feature, variant) {
        (Feature::JunctionPressure, DeviceVariant::AttoDry800) => Some(Reading::Pressure800),
        (Feature::JunctionPressure, _) => Some(Reading::Pressure),
        (Feature::Turbopump, DeviceVariant::AttoDry800) => Some(Reading::TurbopumpFrequency800),
        (Feature::Turbopump, _) => Some(Reading::TurbopumpFrequency),
        (Feature::FortyKelvinStage, _) => Some(Reading::FortyKelvinStageTemperature),
        (Feature::CryostatInPressure, _) => Some(Reading::CryostatInPressure),
        (Feature::DumpPressure, _) => Some(Reading::DumpPressure),
        (Feature::Reservoir, _) | (Feature::Valve(_), _) => None,
    }
}
