//! Low-level bindings for the attocube attoDRY control library.
//!
//! attocube ships `attoDRYLib` as a LabVIEW-built shared library
//! (`attoDRYLib.dll` on Windows). It exports one C function per instrument
//! operation, named `AttoDRY_Interface_<operation>`. Every function returns an
//! `int` status (`0` on success) and writes its results through caller-owned
//! pointers.
//!
//! This crate does not link against the library. The vendor installs it next
//! to a LabVIEW runtime in a machine-specific directory, so it is opened at
//! runtime with [`libloading`] and individual entry points are resolved by
//! name from [`symbols`].
//!
//! # Safety
//!
//! Everything that touches the library is `unsafe`: loading runs the
//! library's initialisers, and the function-pointer types below are only
//! correct if the installed library matches them. For a safe wrapper, use the
//! `daq-driver-attodry` crate instead.
//!
//! # Example (unsafe)
//!
//! ```no_run
//! use attodry_sys::{symbols, AttoDryLib, FloatOutFn, EC_OK};
//!
//! unsafe {
//!     let lib = AttoDryLib::open(AttoDryLib::default_path()).unwrap();
//!     let get_temperature = lib.get::<FloatOutFn>(symbols::GET_SAMPLE_TEMPERATURE).unwrap();
//!     let mut kelvin = 0.0f32;
//!     if get_temperature(&mut kelvin) == EC_OK {
//!         println!("Sample at {} K", kelvin);
//!     }
//! }
//! ```

#![allow(unsafe_code)]

use std::ffi::{OsStr, OsString};
use std::os::raw::{c_char, c_float, c_int, c_ushort};
use std::path::{Path, PathBuf};

pub use libloading::{Error, Symbol};

/// Status returned by every entry point on success.
pub const EC_OK: c_int = 0;

/// Unspecified failure. Any negative status means the same.
pub const EC_ERROR: c_int = -1;

/// Buffer length the vendor examples use for text outputs.
pub const DEFAULT_MESSAGE_BUFFER_LEN: usize = 500;

/// Environment variable naming the directory that holds the library.
pub const LIB_DIR_ENV: &str = "ATTODRY_LIB_DIR";

/// Base name of the library, without platform prefix or extension.
pub const LIB_NAME: &str = "attoDRYLib";

// Native signatures. The vendor library is 32-bit stdcall on Windows;
// `extern "system"` resolves to that there and to the C convention elsewhere.

/// `int f(void)`: commands, toggles and queries.
pub type VoidFn = unsafe extern "system" fn() -> c_int;

/// `int begin(uint16 device)`.
pub type BeginFn = unsafe extern "system" fn(c_ushort) -> c_int;

/// `int f(const char *s)`: connect and single-path curve transfers.
pub type StrFn = unsafe extern "system" fn(*const c_char) -> c_int;

/// `int f(int curve, const char *path)`: user-curve transfers.
pub type IntStrFn = unsafe extern "system" fn(c_int, *const c_char) -> c_int;

/// `int f(float *out)`: scalar getters.
pub type FloatOutFn = unsafe extern "system" fn(*mut c_float) -> c_int;

/// `int f(int *out)`: flag and valve getters.
pub type IntOutFn = unsafe extern "system" fn(*mut c_int) -> c_int;

/// `int f(float value)`: scalar setters.
pub type FloatInFn = unsafe extern "system" fn(c_float) -> c_int;

/// `int f(char *buf, int len)`: text getters.
pub type TextOutFn = unsafe extern "system" fn(*mut c_char, c_int) -> c_int;

/// `int startLogging(const char *path, int interval, int append)`.
pub type StartLoggingFn = unsafe extern "system" fn(*const c_char, c_int, c_int) -> c_int;

/// Exported symbol names.
#[allow(missing_docs)]
pub mod symbols {
    // Session
    pub const BEGIN: &str = "AttoDRY_Interface_begin";
    pub const CONNECT: &str = "AttoDRY_Interface_Connect";
    pub const DISCONNECT: &str = "AttoDRY_Interface_Disconnect";
    pub const END: &str = "AttoDRY_Interface_end";
    pub const CANCEL: &str = "AttoDRY_Interface_Cancel";
    pub const CONFIRM: &str = "AttoDRY_Interface_Confirm";

    // Diagnostics
    pub const GET_ACTION_MESSAGE: &str = "AttoDRY_Interface_getActionMessage";
    pub const GET_ERROR_MESSAGE: &str = "AttoDRY_Interface_getAttodryErrorMessage";
    pub const GET_ERROR_STATUS: &str = "AttoDRY_Interface_getAttodryErrorStatus";
    pub const LOWER_ERROR: &str = "AttoDRY_Interface_lowerError";

    // One-shot procedures
    pub const GO_TO_BASE_TEMPERATURE: &str = "AttoDRY_Interface_goToBaseTemperature";
    pub const START_SAMPLE_EXCHANGE: &str = "AttoDRY_Interface_startSampleExchange";
    pub const SWEEP_FIELD_TO_ZERO: &str = "AttoDRY_Interface_sweepFieldToZero";

    // Data logging
    pub const START_LOGGING: &str = "AttoDRY_Interface_startLogging";
    pub const STOP_LOGGING: &str = "AttoDRY_Interface_stopLogging";

    // Calibration curves
    pub const DOWNLOAD_SAMPLE_TEMPERATURE_SENSOR_CALIBRATION_CURVE: &str =
        "AttoDRY_Interface_downloadSampleTemperatureSensorCalibrationCurve";
    pub const DOWNLOAD_TEMPERATURE_SENSOR_CALIBRATION_CURVE: &str =
        "AttoDRY_Interface_downloadTemperatureSensorCalibrationCurve";
    pub const UPLOAD_SAMPLE_TEMPERATURE_CALIBRATION_CURVE: &str =
        "AttoDRY_Interface_uploadSampleTemperatureCalibrationCurve";
    pub const UPLOAD_TEMPERATURE_CALIBRATION_CURVE: &str =
        "AttoDRY_Interface_uploadTemperatureCalibrationCurve";

    // Flags
    pub const IS_CONTROLLING_FIELD: &str = "AttoDRY_Interface_isControllingField";
    pub const IS_CONTROLLING_TEMPERATURE: &str = "AttoDRY_Interface_isControllingTemperature";
    pub const IS_DEVICE_CONNECTED: &str = "AttoDRY_Interface_isDeviceConnected";
    pub const IS_DEVICE_INITIALISED: &str = "AttoDRY_Interface_isDeviceInitialised";
    pub const IS_GOING_TO_BASE_TEMPERATURE: &str = "AttoDRY_Interface_isGoingToBaseTemperature";
    pub const IS_EXCHANGE_HEATER_ON: &str = "AttoDRY_Interface_isExchangeHeaterOn";
    pub const IS_PERSISTENT_MODE_SET: &str = "AttoDRY_Interface_isPersistentModeSet";
    pub const IS_PUMPING: &str = "AttoDRY_Interface_isPumping";
    pub const IS_SAMPLE_EXCHANGE_IN_PROGRESS: &str = "AttoDRY_Interface_isSampleExchangeInProgress";
    pub const IS_SAMPLE_HEATER_ON: &str = "AttoDRY_Interface_isSampleHeaterOn";
    pub const IS_SAMPLE_READY_TO_EXCHANGE: &str = "AttoDRY_Interface_isSampleReadyToExchange";
    pub const IS_SYSTEM_RUNNING: &str = "AttoDRY_Interface_isSystemRunning";
    pub const IS_ZEROING_FIELD: &str = "AttoDRY_Interface_isZeroingField";

    // Refresh requests for device-resident values
    pub const QUERY_RESERVOIR_TSET_COLD_SAMPLE: &str = "AttoDRY_Interface_queryReservoirTsetColdSample";
    pub const QUERY_RESERVOIR_TSET_WARM_MAGNET: &str = "AttoDRY_Interface_queryReservoirTsetWarmMagnet";
    pub const QUERY_RESERVOIR_TSET_WARM_SAMPLE: &str = "AttoDRY_Interface_queryReservoirTsetWarmSample";
    pub const QUERY_SAMPLE_HEATER_MAXIMUM_POWER: &str = "AttoDRY_Interface_querySampleHeaterMaximumPower";
    pub const QUERY_SAMPLE_HEATER_RESISTANCE: &str = "AttoDRY_Interface_querySampleHeaterResistance";
    pub const QUERY_SAMPLE_HEATER_WIRE_RESISTANCE: &str =
        "AttoDRY_Interface_querySampleHeaterWireResistance";

    // Toggles
    pub const TOGGLE_EXCHANGE_HEATER_CONTROL: &str = "AttoDRY_Interface_toggleExchangeHeaterControl";
    pub const TOGGLE_FULL_TEMPERATURE_CONTROL: &str = "AttoDRY_Interface_toggleFullTemperatureControl";
    pub const TOGGLE_MAGNETIC_FIELD_CONTROL: &str = "AttoDRY_Interface_toggleMagneticFieldControl";
    pub const TOGGLE_PERSISTENT_MODE: &str = "AttoDRY_Interface_togglePersistentMode";
    pub const TOGGLE_PUMP: &str = "AttoDRY_Interface_togglePump";
    pub const TOGGLE_SAMPLE_TEMPERATURE_CONTROL: &str = "AttoDRY_Interface_toggleSampleTemperatureControl";
    pub const TOGGLE_START_UP_SHUTDOWN: &str = "AttoDRY_Interface_toggleStartUpShutdown";

    // Valves: attoDRY1100
    pub const TOGGLE_HELIUM_VALVE: &str = "AttoDRY_Interface_toggleHeliumValve";
    pub const TOGGLE_INNER_VOLUME_VALVE: &str = "AttoDRY_Interface_toggleInnerVolumeValve";
    pub const TOGGLE_OUTER_VOLUME_VALVE: &str = "AttoDRY_Interface_toggleOuterVolumeValve";
    pub const TOGGLE_PUMP_VALVE: &str = "AttoDRY_Interface_togglePumpValve";
    pub const GET_HELIUM_VALVE: &str = "AttoDRY_Interface_getHeliumValve";
    pub const GET_INNER_VOLUME_VALVE: &str = "AttoDRY_Interface_getInnerVolumeValve";
    pub const GET_OUTER_VOLUME_VALVE: &str = "AttoDRY_Interface_getOuterVolumeValve";
    pub const GET_PUMP_VALVE: &str = "AttoDRY_Interface_getPumpValve";

    // Valves: attoDRY2100
    pub const TOGGLE_CRYOSTAT_IN_VALVE: &str = "AttoDRY_Interface_toggleCryostatInValve";
    pub const TOGGLE_CRYOSTAT_OUT_VALVE: &str = "AttoDRY_Interface_toggleCryostatOutValve";
    pub const TOGGLE_DUMP_IN_VALVE: &str = "AttoDRY_Interface_toggleDumpInValve";
    pub const TOGGLE_DUMP_OUT_VALVE: &str = "AttoDRY_Interface_toggleDumpOutValve";
    pub const GET_CRYOSTAT_IN_VALVE: &str = "AttoDRY_Interface_getCryostatInValve";
    pub const GET_CRYOSTAT_OUT_VALVE: &str = "AttoDRY_Interface_getCryostatOutValve";
    pub const GET_DUMP_IN_VALVE: &str = "AttoDRY_Interface_getDumpInValve";
    pub const GET_DUMP_OUT_VALVE: &str = "AttoDRY_Interface_getDumpOutValve";

    // Valves: attoDRY800
    pub const TOGGLE_BREAK_VAC_800_VALVE: &str = "AttoDRY_Interface_toggleBreakVac800Valve";
    pub const TOGGLE_PUMP_800_VALVE: &str = "AttoDRY_Interface_togglePump800Valve";
    pub const TOGGLE_SAMPLE_SPACE_800_VALVE: &str = "AttoDRY_Interface_toggleSampleSpace800Valve";
    pub const GET_BREAK_VAC_800_VALVE: &str = "AttoDRY_Interface_getBreakVac800Valve";
    pub const GET_PUMP_800_VALVE: &str = "AttoDRY_Interface_getPump800Valve";
    pub const GET_SAMPLE_SPACE_800_VALVE: &str = "AttoDRY_Interface_getSampleSpace800Valve";

    // Scalar getters
    pub const GET_4K_STAGE_TEMPERATURE: &str = "AttoDRY_Interface_get4KStageTemperature";
    pub const GET_40K_STAGE_TEMPERATURE: &str = "AttoDRY_Interface_get40KStageTemperature";
    pub const GET_MAGNETIC_FIELD: &str = "AttoDRY_Interface_getMagneticField";
    pub const GET_MAGNETIC_FIELD_SET_POINT: &str = "AttoDRY_Interface_getMagneticFieldSetPoint";
    pub const GET_SAMPLE_TEMPERATURE: &str = "AttoDRY_Interface_getSampleTemperature";
    pub const GET_USER_TEMPERATURE: &str = "AttoDRY_Interface_getUserTemperature";
    pub const GET_SAMPLE_HEATER_POWER: &str = "AttoDRY_Interface_getSampleHeaterPower";
    pub const GET_SAMPLE_HEATER_MAXIMUM_POWER: &str = "AttoDRY_Interface_getSampleHeaterMaximumPower";
    pub const GET_SAMPLE_HEATER_RESISTANCE: &str = "AttoDRY_Interface_getSampleHeaterResistance";
    pub const GET_SAMPLE_HEATER_WIRE_RESISTANCE: &str =
        "AttoDRY_Interface_getSampleHeaterWireResistance";
    pub const GET_VTI_HEATER_POWER: &str = "AttoDRY_Interface_getVtiHeaterPower";
    pub const GET_VTI_TEMPERATURE: &str = "AttoDRY_Interface_getVtiTemperature";
    pub const GET_DERIVATIVE_GAIN: &str = "AttoDRY_Interface_getDerivativeGain";
    pub const GET_INTEGRAL_GAIN: &str = "AttoDRY_Interface_getIntegralGain";
    pub const GET_PROPORTIONAL_GAIN: &str = "AttoDRY_Interface_getProportionalGain";
    pub const GET_RESERVOIR_HEATER_POWER: &str = "AttoDRY_Interface_getReservoirHeaterPower";
    pub const GET_RESERVOIR_TEMPERATURE: &str = "AttoDRY_Interface_getReservoirTemperature";
    pub const GET_RESERVOIR_TSET_COLD_SAMPLE: &str = "AttoDRY_Interface_getReservoirTsetColdSample";
    pub const GET_RESERVOIR_TSET_WARM_MAGNET: &str = "AttoDRY_Interface_getReservoirTsetWarmMagnet";
    pub const GET_RESERVOIR_TSET_WARM_SAMPLE: &str = "AttoDRY_Interface_getReservoirTsetWarmSample";
    pub const GET_CRYOSTAT_IN_PRESSURE: &str = "AttoDRY_Interface_getCryostatInPressure";
    pub const GET_CRYOSTAT_OUT_PRESSURE: &str = "AttoDRY_Interface_getCryostatOutPressure";
    pub const GET_DUMP_PRESSURE: &str = "AttoDRY_Interface_getDumpPressure";
    pub const GET_PRESSURE: &str = "AttoDRY_Interface_getPressure";
    pub const GET_TURBOPUMP_FREQUENCY: &str = "AttoDRY_Interface_getTurbopumpFrequency";
    pub const GET_PRESSURE_800: &str = "AttoDRY_Interface_getPressure800";
    pub const GET_TURBOPUMP_FREQU_800: &str = "AttoDRY_Interface_GetTurbopumpFrequ800";

    // Scalar setters
    pub const SET_USER_MAGNETIC_FIELD: &str = "AttoDRY_Interface_setUserMagneticField";
    pub const SET_USER_TEMPERATURE: &str = "AttoDRY_Interface_setUserTemperature";
    pub const SET_SAMPLE_HEATER_POWER: &str = "AttoDRY_Interface_setSampleHeaterPower";
    pub const SET_SAMPLE_HEATER_MAXIMUM_POWER: &str = "AttoDRY_Interface_setSampleHeaterMaximumPower";
    pub const SET_SAMPLE_HEATER_RESISTANCE: &str = "AttoDRY_Interface_setSampleHeaterResistance";
    pub const SET_SAMPLE_HEATER_WIRE_RESISTANCE: &str =
        "AttoDRY_Interface_setSampleHeaterWireResistance";
    pub const SET_VTI_HEATER_POWER: &str = "AttoDRY_Interface_setVTIHeaterPower";
    pub const SET_DERIVATIVE_GAIN: &str = "AttoDRY_Interface_setDerivativeGain";
    pub const SET_INTEGRAL_GAIN: &str = "AttoDRY_Interface_setIntegralGain";
    pub const SET_PROPORTIONAL_GAIN: &str = "AttoDRY_Interface_setProportionalGain";
    pub const SET_RESERVOIR_TSET_COLD_SAMPLE: &str = "AttoDRY_Interface_setReservoirTsetColdSample";
    pub const SET_RESERVOIR_TSET_WARM_MAGNET: &str = "AttoDRY_Interface_setReservoirTsetWarmMagnet";
    pub const SET_RESERVOIR_TSET_WARM_SAMPLE: &str = "AttoDRY_Interface_setReservoirTsetWarmSample";
}

/// Platform file name of the library, e.g. `attoDRYLib.dll`.
pub fn library_file_name() -> OsString {
    libloading::library_filename(LIB_NAME)
}

/// A loaded instance of `attoDRYLib`.
///
/// The library keeps process-wide state inside LabVIEW, so loading it twice in
/// one process yields two handles onto the same driver instance.
pub struct AttoDryLib {
    library: libloading::Library,
    path: PathBuf,
}

impl AttoDryLib {
    /// Where to look for the library when no explicit path is configured.
    ///
    /// `$ATTODRY_LIB_DIR/<file name>` if the variable is set, otherwise the
    /// bare file name so the OS loader searches its usual paths.
    pub fn default_path() -> PathBuf {
        match std::env::var_os(LIB_DIR_ENV) {
            Some(dir) => Path::new(&dir).join(library_file_name()),
            None => PathBuf::from(library_file_name()),
        }
    }

    /// Load the library from `path`.
    ///
    /// # Safety
    ///
    /// Loading runs the library's initialisation routines. The file must be a
    /// genuine attoDRYLib build whose exports match the signatures in this
    /// crate.
    pub unsafe fn open(path: impl AsRef<OsStr>) -> Result<Self, Error> {
        let path = PathBuf::from(path.as_ref());
        let library = libloading::Library::new(&path)?;
        Ok(Self { library, path })
    }

    /// Path the library was loaded from.
    pub fn path(&self) -> &Path {
        &self.path
    }

    /// Resolve an exported function by name.
    ///
    /// # Safety
    ///
    /// `T` must be the correct function-pointer type for `symbol`.
    pub unsafe fn get<T>(&self, symbol: &str) -> Result<Symbol<'_, T>, Error> {
        self.library.get(symbol.as_bytes())
    }

    /// Check whether `symbol` is exported, without calling it.
    pub fn has_symbol(&self, symbol: &str) -> bool {
        // SAFETY: the pointer is resolved but never called or dereferenced.
        unsafe { self.library.get::<*const ()>(symbol.as_bytes()).is_ok() }
    }
}

impl std::fmt::Debug for AttoDryLib {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("AttoDryLib").field("path", &self.path).finish()
    }
}
