//! Session state machine against the mock driver.

use attodry_sys::symbols;
use daq_driver_attodry::{AttoDry, AttoDryError, DeviceVariant, MockDriver, SessionState};

fn session(variant: DeviceVariant) -> (AttoDry<MockDriver>, MockDriver) {
    let mock = MockDriver::new();
    (AttoDry::new(mock.clone(), variant, "COM5"), mock)
}

#[test]
fn full_lifecycle_for_every_variant() {
    for variant in DeviceVariant::ALL {
        let (mut dev, mock) = session(variant);
        dev.begin().unwrap();
        assert_eq!(dev.state(), SessionState::Begun);
        dev.connect().unwrap();
        assert_eq!(dev.state(), SessionState::Connected);
        dev.disconnect().unwrap();
        assert_eq!(dev.state(), SessionState::Begun);
        dev.end().unwrap();
        assert_eq!(dev.state(), SessionState::Uninitialized);

        assert_eq!(mock.call_names(), vec!["begin", "Connect", "Disconnect", "end"]);
        assert_eq!(
            mock.calls()[0].args,
            vec![daq_driver_attodry::NativeArg::U16(variant.code())]
        );
    }
}

#[test]
fn operations_before_begin_fail_not_initialized() {
    let (mut dev, mock) = session(DeviceVariant::AttoDry1100);
    assert_eq!(dev.sample_temperature(), Err(AttoDryError::NotInitialized));
    assert_eq!(dev.magnetic_field(), Err(AttoDryError::NotInitialized));
    assert_eq!(dev.is_pumping(), Err(AttoDryError::NotInitialized));
    assert_eq!(dev.set_user_temperature(4.0), Err(AttoDryError::NotInitialized));
    assert_eq!(dev.connect(), Err(AttoDryError::NotInitialized));
    assert_eq!(dev.disconnect(), Err(AttoDryError::NotInitialized));
    assert_eq!(dev.end(), Err(AttoDryError::NotInitialized));
    assert!(mock.calls().is_empty());
}

#[test]
fn operations_before_connect_fail_not_connected() {
    let (mut dev, mock) = session(DeviceVariant::AttoDry2100);
    dev.begin().unwrap();
    mock.clear_calls();

    assert_eq!(dev.sample_temperature(), Err(AttoDryError::NotConnected));
    assert_eq!(dev.error_status(), Err(AttoDryError::NotConnected));
    assert_eq!(dev.action_message(), Err(AttoDryError::NotConnected));
    assert_eq!(dev.toggle_pump(), Err(AttoDryError::NotConnected));
    assert_eq!(dev.stop_logging(), Err(AttoDryError::NotConnected));
    assert!(mock.calls().is_empty());
}

#[test]
fn end_while_connected_disconnects_exactly_once() {
    let (mut dev, mock) = session(DeviceVariant::AttoDry800);
    dev.begin().unwrap();
    dev.connect().unwrap();
    dev.end().unwrap();

    assert_eq!(mock.call_count(symbols::DISCONNECT), 1);
    assert_eq!(mock.call_count(symbols::END), 1);
    assert_eq!(mock.call_names(), vec!["begin", "Connect", "Disconnect", "end"]);
}

#[test]
fn operations_after_end_fail_not_initialized() {
    let (mut dev, _mock) = session(DeviceVariant::AttoDry1100);
    dev.begin().unwrap();
    dev.connect().unwrap();
    dev.end().unwrap();
    assert_eq!(dev.user_temperature(), Err(AttoDryError::NotInitialized));
}

#[test]
fn session_can_restart_after_end() {
    let (mut dev, mock) = session(DeviceVariant::AttoDry2100);
    dev.begin().unwrap();
    dev.end().unwrap();
    dev.begin().unwrap();
    dev.connect().unwrap();
    assert!(dev.is_connected());
    assert_eq!(mock.call_count(symbols::BEGIN), 2);
}

#[test]
fn failed_end_keeps_session_started() {
    let (mut dev, mock) = session(DeviceVariant::AttoDry2100);
    dev.begin().unwrap();
    mock.fail(symbols::END, -1);
    assert!(matches!(
        dev.end(),
        Err(AttoDryError::DriverError { operation: "end", code: -1, .. })
    ));
    assert_eq!(dev.state(), SessionState::Begun);

    mock.clear_failures();
    dev.end().unwrap();
}

#[test]
fn dropping_a_begun_session_ends_it() {
    let (mut dev, mock) = session(DeviceVariant::AttoDry1100);
    dev.begin().unwrap();
    drop(dev);
    assert_eq!(mock.call_names(), vec!["begin", "end"]);
}
