//! [`AttoDryDriver`] backed by the vendor's `attoDRYLib`.

#![allow(unsafe_code)]

use std::ffi::{CStr, OsStr};
use std::os::raw::{c_char, c_float, c_int, c_ushort};
use std::path::Path;

use attodry_sys::{
    AttoDryLib, BeginFn, FloatInFn, FloatOutFn, IntOutFn, IntStrFn, StartLoggingFn, StrFn,
    Symbol, TextOutFn, VoidFn,
};
use tracing::{debug, info, trace};

use crate::driver::{check_status, AttoDryDriver, DriverResult, NativeError};
use crate::error::{AttoDryError, Result};
use crate::ops::{Command, CurveTransfer, Flag, LogInterval, Reading, Setting, TextField};
use crate::variant::DeviceVariant;

/// Driver calling into a loaded `attoDRYLib`.
///
/// Entry points are resolved by name on every call, so a library build that
/// lacks some of them (older firmware packages omit the 800-series calls)
/// still serves everything it does export.
#[derive(Debug)]
pub struct NativeDriver {
    lib: AttoDryLib,
}

impl NativeDriver {
    /// Load the library from an explicit path.
    pub fn load(path: impl AsRef<OsStr>) -> Result<Self> {
        let path = path.as_ref();
        // SAFETY: the caller points us at the vendor library; its exports are
        // checked by name before each call and typed per attodry-sys.
        let lib = unsafe { AttoDryLib::open(path) }.map_err(|e| AttoDryError::LibraryLoad {
            path: Path::new(path).display().to_string(),
            message: e.to_string(),
        })?;
        info!(path = %lib.path().display(), "Loaded attoDRY library");
        Ok(Self { lib })
    }

    /// Load the library from `ATTODRY_LIB_DIR` or the OS search path.
    pub fn load_default() -> Result<Self> {
        Self::load(AttoDryLib::default_path())
    }

    /// Path the library was loaded from.
    pub fn path(&self) -> &Path {
        self.lib.path()
    }

    /// Entry points used by this crate that the loaded library lacks.
    pub fn missing_symbols(&self) -> Vec<&'static str> {
        let commands = Command::ALL.iter().map(|c| c.symbol());
        let flags = Flag::ALL.iter().map(|f| f.symbol());
        let readings = Reading::ALL.iter().map(|r| r.symbol());
        let settings = Setting::ALL.iter().map(|s| s.symbol());
        let texts = TextField::ALL.iter().map(|t| t.symbol());
        let session = [
            attodry_sys::symbols::BEGIN,
            attodry_sys::symbols::CONNECT,
            attodry_sys::symbols::DISCONNECT,
            attodry_sys::symbols::END,
            attodry_sys::symbols::GET_ERROR_STATUS,
            attodry_sys::symbols::START_LOGGING,
            attodry_sys::symbols::DOWNLOAD_SAMPLE_TEMPERATURE_SENSOR_CALIBRATION_CURVE,
            attodry_sys::symbols::DOWNLOAD_TEMPERATURE_SENSOR_CALIBRATION_CURVE,
            attodry_sys::symbols::UPLOAD_SAMPLE_TEMPERATURE_CALIBRATION_CURVE,
            attodry_sys::symbols::UPLOAD_TEMPERATURE_CALIBRATION_CURVE,
        ];
        commands
            .chain(flags)
            .chain(readings)
            .chain(settings)
            .chain(texts)
            .chain(session)
            .filter(|symbol| !self.lib.has_symbol(symbol))
            .collect()
    }

    /// # Safety
    ///
    /// `T` must be the function-pointer type `symbol` is exported with.
    unsafe fn resolve<T>(&self, symbol: &'static str) -> DriverResult<Symbol<'_, T>> {
        trace!(symbol, "Calling attoDRY entry point");
        self.lib
            .get::<T>(symbol)
            .map_err(|e| NativeError::MissingSymbol {
                symbol,
                message: e.to_string(),
            })
    }

    fn call_void(&self, symbol: &'static str) -> DriverResult<()> {
        // SAFETY: every symbol routed here is exported as `int f(void)`.
        let status = unsafe {
            let f = self.resolve::<VoidFn>(symbol)?;
            f()
        };
        check_status(status)
    }
}

impl AttoDryDriver for NativeDriver {
    fn begin(&mut self, variant: DeviceVariant) -> DriverResult<()> {
        let code: c_ushort = variant.code();
        // SAFETY: `begin` takes a uint16 device code.
        let status = unsafe {
            let f = self.resolve::<BeginFn>(attodry_sys::symbols::BEGIN)?;
            f(code)
        };
        check_status(status)
    }

    fn connect(&mut self, port: &CStr) -> DriverResult<()> {
        // SAFETY: `port` is NUL-terminated and outlives the call.
        let status = unsafe {
            let f = self.resolve::<StrFn>(attodry_sys::symbols::CONNECT)?;
            f(port.as_ptr())
        };
        check_status(status)
    }

    fn disconnect(&mut self) -> DriverResult<()> {
        self.call_void(attodry_sys::symbols::DISCONNECT)
    }

    fn end(&mut self) -> DriverResult<()> {
        self.call_void(attodry_sys::symbols::END)
    }

    fn command(&mut self, command: Command) -> DriverResult<()> {
        self.call_void(command.symbol())
    }

    fn read_flag(&mut self, flag: Flag) -> DriverResult<bool> {
        let mut value: c_int = 0;
        // SAFETY: flag getters write one int through the pointer.
        let status = unsafe {
            let f = self.resolve::<IntOutFn>(flag.symbol())?;
            f(&mut value)
        };
        check_status(status)?;
        Ok(value != 0)
    }

    fn read_float(&mut self, reading: Reading) -> DriverResult<f32> {
        let mut value: c_float = 0.0;
        // SAFETY: float getters write one float through the pointer.
        let status = unsafe {
            let f = self.resolve::<FloatOutFn>(reading.symbol())?;
            f(&mut value)
        };
        check_status(status)?;
        Ok(value)
    }

    fn write_float(&mut self, setting: Setting, value: f32) -> DriverResult<()> {
        // SAFETY: setters take a single float by value.
        let status = unsafe {
            let f = self.resolve::<FloatInFn>(setting.symbol())?;
            f(value)
        };
        check_status(status)
    }

    fn read_text(&mut self, field: TextField, capacity: usize) -> DriverResult<Vec<u8>> {
        let mut buffer = vec![0u8; capacity];
        let len = c_int::try_from(buffer.len()).unwrap_or(c_int::MAX);
        // SAFETY: the driver writes at most `len` bytes, which never exceeds
        // the buffer.
        let status = unsafe {
            let f = self.resolve::<TextOutFn>(field.symbol())?;
            f(buffer.as_mut_ptr().cast::<c_char>(), len)
        };
        check_status(status)?;
        let end = buffer.iter().position(|&b| b == 0).unwrap_or(buffer.len());
        buffer.truncate(end);
        debug!(field = %field, bytes = end, "Read attoDRY text");
        Ok(buffer)
    }

    fn read_error_status(&mut self) -> DriverResult<i32> {
        let mut value: c_int = 0;
        // SAFETY: writes one int through the pointer.
        let status = unsafe {
            let f = self.resolve::<IntOutFn>(attodry_sys::symbols::GET_ERROR_STATUS)?;
            f(&mut value)
        };
        check_status(status)?;
        Ok(value)
    }

    fn transfer_curve(&mut self, transfer: CurveTransfer, path: &CStr) -> DriverResult<()> {
        let symbol = transfer.symbol();
        // SAFETY: `path` is NUL-terminated and outlives the call; user-curve
        // transfers take the slot number first.
        let status = unsafe {
            match transfer.curve() {
                Some(curve) => {
                    let f = self.resolve::<IntStrFn>(symbol)?;
                    f(c_int::from(curve.get()), path.as_ptr())
                }
                None => {
                    let f = self.resolve::<StrFn>(symbol)?;
                    f(path.as_ptr())
                }
            }
        };
        check_status(status)
    }

    fn start_logging(
        &mut self,
        path: &CStr,
        interval: LogInterval,
        append: bool,
    ) -> DriverResult<()> {
        // SAFETY: `path` is NUL-terminated and outlives the call.
        let status = unsafe {
            let f = self.resolve::<StartLoggingFn>(attodry_sys::symbols::START_LOGGING)?;
            f(path.as_ptr(), interval.code(), c_int::from(append))
        };
        check_status(status)
    }
}
