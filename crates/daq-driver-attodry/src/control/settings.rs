//! Values stored in the instrument's memory.
//!
//! These values live on the attoDRY, not in the driver. A `query*` call asks
//! the instrument to send the current value into computer-side memory, and the
//! matching getter returns whatever arrived last. The query returns before the
//! value has arrived, so reading straight after it may still give the old
//! value. [`AttoDry::refresh`] does both with a wait in between.
//!
//! The heater resistance and maximum power setters write non-volatile memory,
//! which is rated for roughly 100 000 write cycles. Do not call them in loops.

use std::thread;
use std::time::Duration;

use tracing::debug;

use crate::device::AttoDry;
use crate::driver::AttoDryDriver;
use crate::error::Result;
use crate::ops::ConfigValue;

impl<D: AttoDryDriver> AttoDry<D> {
    /// Request a refresh of `value` from the instrument.
    pub fn query(&mut self, value: ConfigValue) -> Result<()> {
        self.run(value.query_command())
    }

    /// Last refreshed copy of `value`.
    pub fn config_value(&mut self, value: ConfigValue) -> Result<f32> {
        self.read(value.reading())
    }

    /// Write `value` to the instrument.
    pub fn set_config_value(&mut self, value: ConfigValue, stored: f32) -> Result<()> {
        self.write(value.setting(), stored)
    }

    /// Query `value`, wait `settle`, then read it.
    ///
    /// Blocks the calling thread for `settle`.
    pub fn refresh(&mut self, value: ConfigValue, settle: Duration) -> Result<f32> {
        self.query(value)?;
        debug!(?value, ?settle, "Waiting for attoDRY refresh");
        thread::sleep(settle);
        self.config_value(value)
    }

    /// [`refresh`](Self::refresh) with the handle's configured settle time.
    pub fn refresh_default(&mut self, value: ConfigValue) -> Result<f32> {
        let settle = self.refresh_settle();
        self.refresh(value, settle)
    }

    /// Request the sample heater resistance.
    pub fn query_sample_heater_resistance(&mut self) -> Result<()> {
        self.query(ConfigValue::SampleHeaterResistance)
    }

    /// Last refreshed sample heater resistance (Ω).
    pub fn sample_heater_resistance(&mut self) -> Result<f32> {
        self.config_value(ConfigValue::SampleHeaterResistance)
    }

    /// Store the sample heater resistance (Ω). Writes non-volatile memory.
    pub fn set_sample_heater_resistance(&mut self, ohms: f32) -> Result<()> {
        self.set_config_value(ConfigValue::SampleHeaterResistance, ohms)
    }

    /// Request the sample heater wire resistance.
    pub fn query_sample_heater_wire_resistance(&mut self) -> Result<()> {
        self.query(ConfigValue::SampleHeaterWireResistance)
    }

    /// Last refreshed sample heater wire resistance (Ω).
    pub fn sample_heater_wire_resistance(&mut self) -> Result<f32> {
        self.config_value(ConfigValue::SampleHeaterWireResistance)
    }

    /// Store the sample heater wire resistance (Ω). Writes non-volatile memory.
    pub fn set_sample_heater_wire_resistance(&mut self, ohms: f32) -> Result<()> {
        self.set_config_value(ConfigValue::SampleHeaterWireResistance, ohms)
    }

    /// Request the sample heater maximum power.
    pub fn query_sample_heater_maximum_power(&mut self) -> Result<()> {
        self.query(ConfigValue::SampleHeaterMaximumPower)
    }

    /// Last refreshed sample heater maximum power (W).
    pub fn sample_heater_maximum_power(&mut self) -> Result<f32> {
        self.config_value(ConfigValue::SampleHeaterMaximumPower)
    }

    /// Store the sample heater maximum power (W). Writes non-volatile memory.
    pub fn set_sample_heater_maximum_power(&mut self, watts: f32) -> Result<()> {
        self.set_config_value(ConfigValue::SampleHeaterMaximumPower, watts)
    }

    /// Request the reservoir set point for a cold sample.
    pub fn query_reservoir_tset_cold_sample(&mut self) -> Result<()> {
        self.query(ConfigValue::ReservoirTsetColdSample)
    }

    /// Last refreshed reservoir set point for a cold sample (K).
    pub fn reservoir_tset_cold_sample(&mut self) -> Result<f32> {
        self.config_value(ConfigValue::ReservoirTsetColdSample)
    }

    /// Store the reservoir set point for a cold sample (K).
    pub fn set_reservoir_tset_cold_sample(&mut self, kelvin: f32) -> Result<()> {
        self.set_config_value(ConfigValue::ReservoirTsetColdSample, kelvin)
    }

    /// Request the reservoir set point for a warm sample.
    pub fn query_reservoir_tset_warm_sample(&mut self) -> Result<()> {
        self.query(ConfigValue::ReservoirTsetWarmSample)
    }

    /// Last refreshed reservoir set point for a warm sample (K).
    pub fn reservoir_tset_warm_sample(&mut self) -> Result<f32> {
        self.config_value(ConfigValue::ReservoirTsetWarmSample)
    }

    /// Store the reservoir set point for a warm sample (K).
    pub fn set_reservoir_tset_warm_sample(&mut self, kelvin: f32) -> Result<()> {
        self.set_config_value(ConfigValue::ReservoirTsetWarmSample, kelvin)
    }

    /// Request the reservoir set point for a warm magnet.
    pub fn query_reservoir_tset_warm_magnet(&mut self) -> Result<()> {
        self.query(ConfigValue::ReservoirTsetWarmMagnet)
    }

    /// Last refreshed reservoir set point for a warm magnet (K).
    pub fn reservoir_tset_warm_magnet(&mut self) -> Result<f32> {
        self.config_value(ConfigValue::ReservoirTsetWarmMagnet)
    }

    /// Store the reservoir set point for a warm magnet (K).
    pub fn set_reservoir_tset_warm_magnet(&mut self, kelvin: f32) -> Result<()> {
        self.set_config_value(ConfigValue::ReservoirTsetWarmMagnet, kelvin)
    }
}
