//! The instrument's own data log.

use std::path::Path;

use tracing::info;

use crate::device::{path_c_string, AttoDry};
use crate::driver::AttoDryDriver;
use crate::error::Result;
use crate::ops::{Command, LogInterval};

impl<D: AttoDryDriver> AttoDry<D> {
    /// Start logging all instrument values to `path` every `interval`.
    ///
    /// With `append` set, an existing file is extended instead of replaced.
    pub fn start_logging(
        &mut self,
        path: impl AsRef<Path>,
        interval: LogInterval,
        append: bool,
    ) -> Result<()> {
        let path = path.as_ref();
        let c_path = path_c_string(path)?;
        self.ensure_connected()?;
        self.driver_mut()
            .start_logging(&c_path, interval, append)
            .map_err(|e| self.native_error("startLogging", e))?;
        info!(path = %path.display(), %interval, append, "attoDRY logging started");
        Ok(())
    }

    /// Stop the data log.
    pub fn stop_logging(&mut self) -> Result<()> {
        self.run(Command::StopLogging)?;
        info!("attoDRY logging stopped");
        Ok(())
    }
}
