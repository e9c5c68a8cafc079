//! In-process model of `attoDRYLib` for tests and dry runs.
//!
//! [`MockDriver`] answers every entry point without hardware. Setters are
//! stored and read back by the matching getters, toggles flip the matching
//! flag, and values living in instrument memory only become readable after
//! their `query*` call, like on a real attoDRY. Every call is recorded with
//! its arguments so tests can assert exactly what would have crossed the
//! native boundary.
//!
//! Clones share state, so a test can keep one handle while the facade owns
//! another.

use std::collections::HashMap;
use std::ffi::CStr;
use std::sync::Arc;

use parking_lot::Mutex;
use tracing::debug;

use crate::driver::{AttoDryDriver, DriverResult, NativeError};
use crate::ops::{
    short_name, Command, ConfigValue, CurveTransfer, Flag, LogInterval, Reading, Setting,
    TextField,
};
use crate::status;
use crate::variant::DeviceVariant;

/// Argument passed to a native entry point.
#[derive(Debug, Clone, PartialEq)]
pub enum NativeArg {
    /// `uint16`, only the device code for `begin`.
    U16(u16),
    /// `int`.
    I32(i32),
    /// `float`.
    F32(f32),
    /// `const char *`.
    Str(String),
    /// Output buffer of the given capacity.
    Buffer(usize),
}

/// A recorded native call.
#[derive(Debug, Clone, PartialEq)]
pub struct NativeCall {
    /// Exported symbol name.
    pub symbol: &'static str,
    /// Input arguments in native order. Output pointers are omitted except
    /// text buffers, which are recorded with their capacity.
    pub args: Vec<NativeArg>,
}

impl NativeCall {
    fn new(symbol: &'static str, args: Vec<NativeArg>) -> Self {
        Self { symbol, args }
    }

    /// Symbol name without the library prefix.
    pub fn name(&self) -> &'static str {
        short_name(self.symbol)
    }
}

/// Active data log.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct MockLog {
    /// Log file path.
    pub path: String,
    /// Sampling interval.
    pub interval: LogInterval,
    /// Whether an existing file is appended to.
    pub append: bool,
}

#[derive(Debug, Default)]
struct MockState {
    calls: Vec<NativeCall>,
    started: Option<DeviceVariant>,
    port: Option<String>,
    flags: HashMap<Flag, bool>,
    readings: HashMap<Reading, f32>,
    device_memory: HashMap<ConfigValue, f32>,
    failures: HashMap<&'static str, i32>,
    error_status: i32,
    error_message: Vec<u8>,
    action_message: Vec<u8>,
    logging: Option<MockLog>,
}

impl MockState {
    /// Record a call and apply any injected failure.
    fn enter(&mut self, symbol: &'static str, args: Vec<NativeArg>) -> DriverResult<()> {
        debug!(symbol = short_name(symbol), ?args, "Mock attoDRY call");
        self.calls.push(NativeCall::new(symbol, args));
        match self.failures.get(symbol) {
            Some(&code) => {
                self.error_status = code;
                if self.error_message.is_empty() {
                    self.error_message = status::describe(code).into_bytes();
                }
                Err(NativeError::Status(code))
            }
            None => Ok(()),
        }
    }

    fn set_flag(&mut self, flag: Flag, value: bool) {
        self.flags.insert(flag, value);
    }

    fn flip(&mut self, flag: Flag) {
        let entry = self.flags.entry(flag).or_insert(false);
        *entry = !*entry;
    }

    fn apply(&mut self, command: Command) {
        if let Some(flag) = toggled_flag(command) {
            self.flip(flag);
            return;
        }
        if let Some(value) = ConfigValue::from_query(command) {
            let stored = self.device_memory.get(&value).copied().unwrap_or(0.0);
            self.readings.insert(value.reading(), stored);
            return;
        }
        match command {
            Command::LowerError => {
                self.error_status = 0;
                self.error_message.clear();
            }
            Command::GoToBaseTemperature => self.set_flag(Flag::GoingToBaseTemperature, true),
            Command::StartSampleExchange => self.set_flag(Flag::SampleExchangeInProgress, true),
            Command::SweepFieldToZero => {
                self.set_flag(Flag::ZeroingField, true);
                self.readings.insert(Reading::MagneticFieldSetPoint, 0.0);
            }
            Command::StopLogging => self.logging = None,
            _ => {}
        }
    }
}

/// Flag flipped by a toggle command.
fn toggled_flag(command: Command) -> Option<Flag> {
    let flag = match command {
        Command::ToggleExchangeHeaterControl => Flag::ExchangeHeaterOn,
        Command::ToggleFullTemperatureControl => Flag::ControllingTemperature,
        Command::ToggleMagneticFieldControl => Flag::ControllingField,
        Command::TogglePersistentMode => Flag::PersistentModeSet,
        Command::TogglePump => Flag::Pumping,
        Command::ToggleSampleTemperatureControl => Flag::SampleHeaterOn,
        Command::ToggleStartUpShutdown => Flag::SystemRunning,
        Command::ToggleHeliumValve => Flag::HeliumValveOpen,
        Command::ToggleInnerVolumeValve => Flag::InnerVolumeValveOpen,
        Command::ToggleOuterVolumeValve => Flag::OuterVolumeValveOpen,
        Command::TogglePumpValve => Flag::PumpValveOpen,
        Command::ToggleCryostatInValve => Flag::CryostatInValveOpen,
        Command::ToggleCryostatOutValve => Flag::CryostatOutValveOpen,
        Command::ToggleDumpInValve => Flag::DumpInValveOpen,
        Command::ToggleDumpOutValve => Flag::DumpOutValveOpen,
        Command::ToggleBreakVac800Valve => Flag::BreakVac800ValveOpen,
        Command::TogglePump800Valve => Flag::Pump800ValveOpen,
        Command::ToggleSampleSpace800Valve => Flag::SampleSpace800ValveOpen,
        _ => return None,
    };
    Some(flag)
}

/// Getter that reads back what a setter wrote.
fn echoed_reading(setting: Setting) -> Reading {
    match setting {
        Setting::UserMagneticField => Reading::MagneticFieldSetPoint,
        Setting::UserTemperature => Reading::UserTemperature,
        Setting::SampleHeaterPower => Reading::SampleHeaterPower,
        Setting::SampleHeaterMaximumPower => Reading::SampleHeaterMaximumPower,
        Setting::SampleHeaterResistance => Reading::SampleHeaterResistance,
        Setting::SampleHeaterWireResistance => Reading::SampleHeaterWireResistance,
        Setting::VtiHeaterPower => Reading::VtiHeaterPower,
        Setting::DerivativeGain => Reading::DerivativeGain,
        Setting::IntegralGain => Reading::IntegralGain,
        Setting::ProportionalGain => Reading::ProportionalGain,
        Setting::ReservoirTsetColdSample => Reading::ReservoirTsetColdSample,
        Setting::ReservoirTsetWarmMagnet => Reading::ReservoirTsetWarmMagnet,
        Setting::ReservoirTsetWarmSample => Reading::ReservoirTsetWarmSample,
    }
}

/// Pass-through model of the vendor library.
#[derive(Debug, Clone, Default)]
pub struct MockDriver {
    state: Arc<Mutex<MockState>>,
}

impl MockDriver {
    /// Create a mock with every value zeroed and every flag cleared.
    pub fn new() -> Self {
        Self::default()
    }

    // =========================================================================
    // Inspection
    // =========================================================================

    /// Every call made so far, oldest first.
    pub fn calls(&self) -> Vec<NativeCall> {
        self.state.lock().calls.clone()
    }

    /// Short names of every call made so far, oldest first.
    pub fn call_names(&self) -> Vec<&'static str> {
        self.state.lock().calls.iter().map(NativeCall::name).collect()
    }

    /// Number of calls made to `symbol`.
    pub fn call_count(&self, symbol: &str) -> usize {
        self.state
            .lock()
            .calls
            .iter()
            .filter(|call| call.symbol == symbol)
            .count()
    }

    /// Forget recorded calls.
    pub fn clear_calls(&self) {
        self.state.lock().calls.clear();
    }

    /// Variant passed to the last successful `begin`, until `end`.
    pub fn started(&self) -> Option<DeviceVariant> {
        self.state.lock().started
    }

    /// Port of the open transport, if any.
    pub fn port(&self) -> Option<String> {
        self.state.lock().port.clone()
    }

    /// Current value of a flag.
    pub fn flag(&self, flag: Flag) -> bool {
        self.state.lock().flags.get(&flag).copied().unwrap_or(false)
    }

    /// Current computer-side value of a reading.
    pub fn reading(&self, reading: Reading) -> f32 {
        self.state
            .lock()
            .readings
            .get(&reading)
            .copied()
            .unwrap_or(0.0)
    }

    /// Value stored in instrument memory.
    pub fn device_value(&self, value: ConfigValue) -> f32 {
        self.state
            .lock()
            .device_memory
            .get(&value)
            .copied()
            .unwrap_or(0.0)
    }

    /// Active data log, if any.
    pub fn logging(&self) -> Option<MockLog> {
        self.state.lock().logging.clone()
    }

    // =========================================================================
    // Stimulus
    // =========================================================================

    /// Set a flag as if the instrument had changed state.
    pub fn set_flag(&self, flag: Flag, value: bool) {
        self.state.lock().set_flag(flag, value);
    }

    /// Set a reading as if the instrument had measured it.
    pub fn set_reading(&self, reading: Reading, value: f32) {
        self.state.lock().readings.insert(reading, value);
    }

    /// Set a value in instrument memory without refreshing it.
    pub fn set_device_value(&self, value: ConfigValue, stored: f32) {
        self.state.lock().device_memory.insert(value, stored);
    }

    /// Set the action message shown by the instrument.
    pub fn set_action_message(&self, message: impl Into<String>) {
        let message: String = message.into();
        self.set_action_message_bytes(message);
    }

    /// Set the action message as raw bytes, which need not be UTF-8.
    pub fn set_action_message_bytes(&self, message: impl Into<Vec<u8>>) {
        self.state.lock().action_message = message.into();
    }

    /// Raise an instrument error.
    pub fn set_error(&self, code: i32, message: impl Into<String>) {
        let mut state = self.state.lock();
        state.error_status = code;
        state.error_message = message.into().into_bytes();
    }

    /// Make every call to `symbol` fail with `code`.
    ///
    /// The failing call also raises the error so the error-message channel
    /// reports it, with the vendor description unless a message was set via
    /// [`MockDriver::set_error`].
    pub fn fail(&self, symbol: &'static str, code: i32) {
        self.state.lock().failures.insert(symbol, code);
    }

    /// Remove all injected failures.
    pub fn clear_failures(&self) {
        self.state.lock().failures.clear();
    }
}

impl AttoDryDriver for MockDriver {
    fn begin(&mut self, variant: DeviceVariant) -> DriverResult<()> {
        let mut state = self.state.lock();
        state.enter(
            attodry_sys::symbols::BEGIN,
            vec![NativeArg::U16(variant.code())],
        )?;
        state.started = Some(variant);
        state.set_flag(Flag::DeviceInitialised, true);
        Ok(())
    }

    fn connect(&mut self, port: &CStr) -> DriverResult<()> {
        let port = port.to_string_lossy().into_owned();
        let mut state = self.state.lock();
        state.enter(
            attodry_sys::symbols::CONNECT,
            vec![NativeArg::Str(port.clone())],
        )?;
        state.port = Some(port);
        state.set_flag(Flag::DeviceConnected, true);
        Ok(())
    }

    fn disconnect(&mut self) -> DriverResult<()> {
        let mut state = self.state.lock();
        state.enter(attodry_sys::symbols::DISCONNECT, Vec::new())?;
        state.port = None;
        state.set_flag(Flag::DeviceConnected, false);
        Ok(())
    }

    fn end(&mut self) -> DriverResult<()> {
        let mut state = self.state.lock();
        state.enter(attodry_sys::symbols::END, Vec::new())?;
        state.started = None;
        state.set_flag(Flag::DeviceInitialised, false);
        Ok(())
    }

    fn command(&mut self, command: Command) -> DriverResult<()> {
        let mut state = self.state.lock();
        state.enter(command.symbol(), Vec::new())?;
        state.apply(command);
        Ok(())
    }

    fn read_flag(&mut self, flag: Flag) -> DriverResult<bool> {
        let mut state = self.state.lock();
        state.enter(flag.symbol(), Vec::new())?;
        Ok(state.flags.get(&flag).copied().unwrap_or(false))
    }

    fn read_float(&mut self, reading: Reading) -> DriverResult<f32> {
        let mut state = self.state.lock();
        state.enter(reading.symbol(), Vec::new())?;
        Ok(state.readings.get(&reading).copied().unwrap_or(0.0))
    }

    fn write_float(&mut self, setting: Setting, value: f32) -> DriverResult<()> {
        let mut state = self.state.lock();
        state.enter(setting.symbol(), vec![NativeArg::F32(value)])?;
        match ConfigValue::from_setting(setting) {
            Some(config) => {
                state.device_memory.insert(config, value);
            }
            None => {
                state.readings.insert(echoed_reading(setting), value);
            }
        }
        Ok(())
    }

    fn read_text(&mut self, field: TextField, capacity: usize) -> DriverResult<Vec<u8>> {
        let mut state = self.state.lock();
        state.enter(field.symbol(), vec![NativeArg::Buffer(capacity)])?;
        let text = match field {
            TextField::ActionMessage => &state.action_message,
            TextField::ErrorMessage => &state.error_message,
        };
        // Leave room for the terminating NUL, as the library does.
        let mut bytes = text.clone();
        bytes.truncate(capacity.saturating_sub(1));
        Ok(bytes)
    }

    fn read_error_status(&mut self) -> DriverResult<i32> {
        let mut state = self.state.lock();
        state.enter(attodry_sys::symbols::GET_ERROR_STATUS, Vec::new())?;
        Ok(state.error_status)
    }

    fn transfer_curve(&mut self, transfer: CurveTransfer, path: &CStr) -> DriverResult<()> {
        let path = NativeArg::Str(path.to_string_lossy().into_owned());
        let args = match transfer.curve() {
            Some(curve) => vec![NativeArg::I32(i32::from(curve.get())), path],
            None => vec![path],
        };
        self.state.lock().enter(transfer.symbol(), args)
    }

    fn start_logging(
        &mut self,
        path: &CStr,
        interval: LogInterval,
        append: bool,
    ) -> DriverResult<()> {
        let path = path.to_string_lossy().into_owned();
        let mut state = self.state.lock();
        state.enter(
            attodry_sys::symbols::START_LOGGING,
            vec![
                NativeArg::Str(path.clone()),
                NativeArg::I32(interval.code()),
                NativeArg::I32(i32::from(append)),
            ],
        )?;
        state.logging = Some(MockLog {
            path,
            interval,
            append,
        });
        Ok(())
    }
}
