//! Configuration loading from TOML files and the environment.

use std::io::Write;
use std::time::Duration;

use daq_driver_attodry::{AttoDryConfig, AttoDryFactory, DeviceVariant};
use serial_test::serial;

const ENV_KEYS: &[&str] = &[
    "ATTODRY_VARIANT",
    "ATTODRY_PORT",
    "ATTODRY_MOCK",
    "ATTODRY_REFRESH_SETTLE",
    "ATTODRY_MESSAGE_BUFFER_LEN",
];

fn clear_env() {
    for key in ENV_KEYS {
        std::env::remove_var(key);
    }
}

fn write_config(contents: &str) -> tempfile::NamedTempFile {
    let mut file = tempfile::Builder::new().suffix(".toml").tempfile().unwrap();
    file.write_all(contents.as_bytes()).unwrap();
    file
}

#[test]
#[serial]
fn loads_file() {
    clear_env();
    let file = write_config(
        r#"
        variant = "attodry1100"
        port = "COM4"
        refresh_settle = "750ms"
        "#,
    );

    let config = AttoDryConfig::load(file.path()).unwrap();
    assert_eq!(config.variant, DeviceVariant::AttoDry1100);
    assert_eq!(config.port, "COM4");
    assert_eq!(config.refresh_settle, Duration::from_millis(750));
    assert_eq!(config.message_buffer_len, 500);
}

#[test]
#[serial]
fn environment_overrides_file() {
    clear_env();
    let file = write_config(
        r#"
        variant = "attodry1100"
        port = "COM4"
        mock = false
        "#,
    );

    std::env::set_var("ATTODRY_PORT", "COM7");
    std::env::set_var("ATTODRY_VARIANT", "attodry800");
    std::env::set_var("ATTODRY_MOCK", "true");
    let config = AttoDryConfig::load(file.path());
    clear_env();

    let config = config.unwrap();
    assert_eq!(config.port, "COM7");
    assert_eq!(config.variant, DeviceVariant::AttoDry800);
    assert!(config.mock);
}

#[test]
#[serial]
fn environment_only() {
    clear_env();
    std::env::set_var("ATTODRY_VARIANT", "attodry2100");
    std::env::set_var("ATTODRY_PORT", "COM5");
    std::env::set_var("ATTODRY_MESSAGE_BUFFER_LEN", "1000");
    let config = AttoDryConfig::from_env();
    clear_env();

    let config = config.unwrap();
    assert_eq!(config.variant, DeviceVariant::AttoDry2100);
    assert_eq!(config.message_buffer_len, 1000);
}

#[test]
#[serial]
fn invalid_file_is_rejected() {
    clear_env();
    let file = write_config(
        r#"
        variant = "attodry2100"
        port = "COM5"
        message_buffer_len = 0
        "#,
    );
    let err = AttoDryConfig::load(file.path()).unwrap_err();
    assert!(err.to_string().contains("message_buffer_len"));
}

#[test]
#[serial]
fn loaded_config_builds_a_mock_session() {
    clear_env();
    let file = write_config(
        r#"
        variant = "attodry2100"
        port = "COM5"
        mock = true
        "#,
    );
    let config = AttoDryConfig::load(file.path()).unwrap();
    let mut dev = AttoDryFactory.build_from(&config).unwrap();
    dev.begin().unwrap();
    dev.connect().unwrap();
    dev.set_user_magnetic_field(0.25).unwrap();
    assert_eq!(dev.magnetic_field_set_point().unwrap(), 0.25);
    dev.end().unwrap();
}
