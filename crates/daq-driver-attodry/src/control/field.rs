//! Magnetic field control.

use crate::device::AttoDry;
use crate::driver::AttoDryDriver;
use crate::error::Result;
use crate::ops::{Command, Flag, Reading, Setting};

impl<D: AttoDryDriver> AttoDry<D> {
    /// Measured magnetic field (T).
    pub fn magnetic_field(&mut self) -> Result<f32> {
        self.read(Reading::MagneticField)
    }

    /// Current magnetic field set point (T).
    pub fn magnetic_field_set_point(&mut self) -> Result<f32> {
        self.read(Reading::MagneticFieldSetPoint)
    }

    /// Set the user magnetic field (T).
    ///
    /// The field is only driven while field control is on. In persistent mode
    /// the switch heater turns off once the set point is reached.
    pub fn set_user_magnetic_field(&mut self, tesla: f32) -> Result<()> {
        self.write(Setting::UserMagneticField, tesla)
    }

    /// Switch magnetic field control.
    pub fn toggle_magnetic_field_control(&mut self) -> Result<()> {
        self.run(Command::ToggleMagneticFieldControl)
    }

    /// Whether the field is being controlled.
    pub fn is_controlling_field(&mut self) -> Result<bool> {
        self.flag(Flag::ControllingField)
    }

    /// Switch persistent mode.
    pub fn toggle_persistent_mode(&mut self) -> Result<()> {
        self.run(Command::TogglePersistentMode)
    }

    /// Whether persistent mode is on.
    pub fn is_persistent_mode_set(&mut self) -> Result<bool> {
        self.flag(Flag::PersistentModeSet)
    }

    /// Ramp the field down to zero.
    pub fn sweep_field_to_zero(&mut self) -> Result<()> {
        self.run(Command::SweepFieldToZero)
    }

    /// Whether a sweep to zero field is running.
    pub fn is_zeroing_field(&mut self) -> Result<bool> {
        self.flag(Flag::ZeroingField)
    }
}
