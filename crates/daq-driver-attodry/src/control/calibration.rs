//! Temperature sensor calibration curve transfer.
//!
//! Transfers are started by the driver and run in the background; a
//! successful return only means the request was accepted.

use std::path::Path;

use tracing::info;

use crate::device::{path_c_string, AttoDry};
use crate::driver::AttoDryDriver;
use crate::error::Result;
use crate::ops::{CurveNumber, CurveTransfer};

impl<D: AttoDryDriver> AttoDry<D> {
    /// Save the sample temperature sensor curve to `path`.
    pub fn download_sample_temperature_sensor_curve(&mut self, path: impl AsRef<Path>) -> Result<()> {
        self.transfer_curve(CurveTransfer::DownloadSampleSensor, path.as_ref())
    }

    /// Load the sample temperature sensor curve from `path`.
    pub fn upload_sample_temperature_sensor_curve(&mut self, path: impl AsRef<Path>) -> Result<()> {
        self.transfer_curve(CurveTransfer::UploadSampleSensor, path.as_ref())
    }

    /// Save temperature monitor user curve `curve` (1 to 8) to `path`.
    pub fn download_temperature_sensor_curve(
        &mut self,
        curve: u8,
        path: impl AsRef<Path>,
    ) -> Result<()> {
        let curve = CurveNumber::new(curve)?;
        self.transfer_curve(CurveTransfer::DownloadUserCurve(curve), path.as_ref())
    }

    /// Load temperature monitor user curve `curve` (1 to 8) from `path`.
    pub fn upload_temperature_sensor_curve(
        &mut self,
        curve: u8,
        path: impl AsRef<Path>,
    ) -> Result<()> {
        let curve = CurveNumber::new(curve)?;
        self.transfer_curve(CurveTransfer::UploadUserCurve(curve), path.as_ref())
    }

    fn transfer_curve(&mut self, transfer: CurveTransfer, path: &Path) -> Result<()> {
        let c_path = path_c_string(path)?;
        self.ensure_connected()?;
        self.driver_mut()
            .transfer_curve(transfer, &c_path)
            .map_err(|e| self.native_error(transfer.name(), e))?;
        info!(
            operation = transfer.name(),
            curve = transfer.curve().map(CurveNumber::get),
            path = %path.display(),
            "attoDRY calibration curve transfer started"
        );
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use crate::control::test_support::connected;
    use crate::error::AttoDryError;
    use crate::mock::NativeArg;
    use crate::variant::DeviceVariant;
    use attodry_sys::symbols;

    #[test]
    fn test_user_curve_transfer() {
        let (mut dev, mock) = connected(DeviceVariant::AttoDry1100);
        dev.upload_temperature_sensor_curve(3, "curves/cx1050.340").unwrap();
        let calls = mock.calls();
        assert_eq!(calls.len(), 1);
        assert_eq!(calls[0].symbol, symbols::UPLOAD_TEMPERATURE_CALIBRATION_CURVE);
        assert_eq!(
            calls[0].args,
            vec![NativeArg::I32(3), NativeArg::Str("curves/cx1050.340".into())]
        );
    }

    #[test]
    fn test_sample_curve_transfer() {
        let (mut dev, mock) = connected(DeviceVariant::AttoDry2100);
        dev.download_sample_temperature_sensor_curve("sample.crv").unwrap();
        dev.upload_sample_temperature_sensor_curve("sample.crv").unwrap();
        assert_eq!(
            mock.call_names(),
            vec![
                "downloadSampleTemperatureSensorCalibrationCurve",
                "uploadSampleTemperatureCalibrationCurve",
            ]
        );
        assert_eq!(mock.calls()[0].args, vec![NativeArg::Str("sample.crv".into())]);
    }

    #[test]
    fn test_curve_number_bounds() {
        let (mut dev, mock) = connected(DeviceVariant::AttoDry800);
        assert_eq!(
            dev.download_temperature_sensor_curve(0, "c.crv"),
            Err(AttoDryError::InvalidCurveNumber(0))
        );
        assert_eq!(
            dev.upload_temperature_sensor_curve(9, "c.crv"),
            Err(AttoDryError::InvalidCurveNumber(9))
        );
        assert!(mock.calls().is_empty());

        dev.download_temperature_sensor_curve(8, "c.crv").unwrap();
        dev.download_temperature_sensor_curve(1, "c.crv").unwrap();
    }

    #[test]
    fn test_curve_checked_before_session_state() {
        let (mut dev, _mock) = connected(DeviceVariant::AttoDry800);
        dev.disconnect().unwrap();
        assert_eq!(
            dev.upload_temperature_sensor_curve(9, "c.crv"),
            Err(AttoDryError::InvalidCurveNumber(9))
        );
        assert_eq!(
            dev.upload_temperature_sensor_curve(2, "c.crv"),
            Err(AttoDryError::NotConnected)
        );
    }
}
