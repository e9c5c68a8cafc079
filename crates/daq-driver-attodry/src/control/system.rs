//! System state and sample exchange.

use crate::device::AttoDry;
use crate::driver::AttoDryDriver;
use crate::error::Result;
use crate::ops::{Command, Flag};

impl<D: AttoDryDriver> AttoDry<D> {
    /// Start up a stopped system, or shut down a running one.
    pub fn toggle_start_up_shutdown(&mut self) -> Result<()> {
        self.run(Command::ToggleStartUpShutdown)
    }

    /// Whether the system is running.
    pub fn is_system_running(&mut self) -> Result<bool> {
        self.flag(Flag::SystemRunning)
    }

    /// Whether the driver reports the instrument as initialised.
    pub fn is_device_initialised(&mut self) -> Result<bool> {
        self.flag(Flag::DeviceInitialised)
    }

    /// Whether the driver reports the instrument as connected.
    pub fn is_device_connected(&mut self) -> Result<bool> {
        self.flag(Flag::DeviceConnected)
    }

    /// Begin the sample exchange procedure.
    ///
    /// The instrument prompts through [`action_message`](Self::action_message)
    /// and waits for [`confirm`](Self::confirm) or [`cancel`](Self::cancel).
    pub fn start_sample_exchange(&mut self) -> Result<()> {
        self.run(Command::StartSampleExchange)
    }

    /// Whether a sample exchange is running.
    pub fn is_sample_exchange_in_progress(&mut self) -> Result<bool> {
        self.flag(Flag::SampleExchangeInProgress)
    }

    /// Whether the sample can be removed.
    pub fn is_sample_ready_to_exchange(&mut self) -> Result<bool> {
        self.flag(Flag::SampleReadyToExchange)
    }
}

#[cfg(test)]
mod tests {
    use crate::control::test_support::connected;
    use crate::ops::Flag;
    use crate::variant::DeviceVariant;

    #[test]
    fn test_device_flags_after_connect() {
        let (mut dev, _mock) = connected(DeviceVariant::AttoDry1100);
        assert!(dev.is_device_initialised().unwrap());
        assert!(dev.is_device_connected().unwrap());
        assert!(!dev.is_system_running().unwrap());
    }

    #[test]
    fn test_start_up_shutdown() {
        let (mut dev, _mock) = connected(DeviceVariant::AttoDry2100);
        dev.toggle_start_up_shutdown().unwrap();
        assert!(dev.is_system_running().unwrap());
        dev.toggle_start_up_shutdown().unwrap();
        assert!(!dev.is_system_running().unwrap());
    }

    #[test]
    fn test_sample_exchange() {
        let (mut dev, mock) = connected(DeviceVariant::AttoDry800);
        dev.start_sample_exchange().unwrap();
        assert!(dev.is_sample_exchange_in_progress().unwrap());
        assert!(!dev.is_sample_ready_to_exchange().unwrap());

        mock.set_flag(Flag::SampleReadyToExchange, true);
        assert!(dev.is_sample_ready_to_exchange().unwrap());
    }
}
