//! attoDRY session example.
//!
//! Starts a session, reads the cryostat state and ramps the field set point.
//! Without arguments the mock driver is used; pass a config file to talk to
//! real hardware.
//!
//! # Usage
//!
//! ```bash
//! # Mock session
//! cargo run -p daq-driver-attodry --example session
//!
//! # Real cryostat (attoDRYLib must be on the library path)
//! cargo run -p daq-driver-attodry --example session -- attodry.toml
//! ```
//!
//! A minimal `attodry.toml`:
//!
//! ```toml
//! variant = "attodry2100"
//! port = "COM5"
//! ```

use std::env;
use std::path::PathBuf;

use daq_driver_attodry::{AttoDryConfig, AttoDryFactory, DeviceVariant, Valve};
use tracing_subscriber::EnvFilter;

fn main() -> anyhow::Result<()> {
    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info")),
        )
        .init();

    let config = match env::args().nth(1) {
        Some(path) => AttoDryConfig::load(&PathBuf::from(path))?,
        None => {
            let mut config = AttoDryConfig::new(DeviceVariant::AttoDry2100, "COM5");
            config.mock = true;
            config
        }
    };

    let mut dev = AttoDryFactory.build_from(&config)?;
    dev.begin()?;
    dev.connect()?;

    println!("Connected to {} on {}", dev.variant(), dev.port());
    println!("  Initialised: {}", dev.is_device_initialised()?);
    println!("  Status:      {}", dev.action_message()?);
    println!("  Sample:      {:.3} K", dev.sample_temperature()?);
    println!("  4K stage:    {:.3} K", dev.four_kelvin_stage_temperature()?);
    println!("  Field:       {:+.4} T", dev.magnetic_field()?);

    println!("\nValves:");
    for valve in dev.variant().valves() {
        println!("  {:<24} {}", valve.to_string(), open_closed(dev.valve_is_open(valve)?));
    }
    if !dev.variant().valves().contains(&Valve::Helium) {
        println!("  (no helium valve on this model)");
    }

    println!("\nRamping field set point:");
    for step in [0.1_f32, 0.25, 0.5] {
        dev.set_user_magnetic_field(step)?;
        println!("  set point {:+.3} T", dev.magnetic_field_set_point()?);
    }

    dev.sweep_field_to_zero()?;
    println!("  zeroing: {}", dev.is_zeroing_field()?);

    let status = dev.error_status()?;
    if status != 0 {
        println!("\nController reports error {status}: {}", dev.error_message()?);
    }

    dev.end()?;
    Ok(())
}

fn open_closed(open: bool) -> &'static str {
    if open {
        "open"
    } else {
        "closed"
    }
}
