//! Per-model capability checks happen before any native call.

use daq_driver_attodry::{
    AttoDry, AttoDryError, DeviceVariant, ErrorKind, Feature, MockDriver, Valve,
};

fn connected(variant: DeviceVariant) -> (AttoDry<MockDriver>, MockDriver) {
    let mock = MockDriver::new();
    let mut dev = AttoDry::new(mock.clone(), variant, "COM5");
    dev.begin().unwrap();
    dev.connect().unwrap();
    mock.clear_calls();
    (dev, mock)
}

#[test]
fn helium_valve_on_2100_is_rejected_without_native_call() {
    let (mut dev, mock) = connected(DeviceVariant::AttoDry2100);
    let err = dev.toggle_helium_valve().unwrap_err();
    assert_eq!(
        err,
        AttoDryError::UnsupportedForVariant {
            operation: "toggleHeliumValve",
            variant: DeviceVariant::AttoDry2100,
        }
    );
    assert_eq!(err.kind(), ErrorKind::Configuration);
    assert!(mock.calls().is_empty());
}

#[test]
fn capability_checked_before_session_state() {
    let mock = MockDriver::new();
    let mut dev = AttoDry::new(mock.clone(), DeviceVariant::AttoDry800, "COM5");
    assert!(matches!(
        dev.dump_pressure(),
        Err(AttoDryError::UnsupportedForVariant { .. })
    ));
    assert_eq!(dev.pressure(), Err(AttoDryError::NotInitialized));
}

#[test]
fn named_valve_toggles_follow_the_table() {
    type Toggle = fn(&mut AttoDry<MockDriver>) -> daq_driver_attodry::Result<()>;
    let toggles: [(Valve, Toggle); 10] = [
        (Valve::Helium, AttoDry::toggle_helium_valve),
        (Valve::InnerVolume, AttoDry::toggle_inner_volume_valve),
        (Valve::OuterVolume, AttoDry::toggle_outer_volume_valve),
        (Valve::Pump, AttoDry::toggle_pump_valve),
        (Valve::CryostatIn, AttoDry::toggle_cryostat_in_valve),
        (Valve::CryostatOut, AttoDry::toggle_cryostat_out_valve),
        (Valve::DumpIn, AttoDry::toggle_dump_in_valve),
        (Valve::DumpOut, AttoDry::toggle_dump_out_valve),
        (Valve::BreakVacuum, AttoDry::toggle_break_vacuum_valve),
        (Valve::SampleSpace, AttoDry::toggle_sample_space_valve),
    ];

    for variant in DeviceVariant::ALL {
        let (mut dev, mock) = connected(variant);
        for (valve, toggle) in toggles {
            let expected = variant.supports(Feature::Valve(valve));
            let before = mock.calls().len();
            assert_eq!(toggle(&mut dev).is_ok(), expected, "{valve} on {variant}");
            let after = mock.calls().len();
            assert_eq!(after - before, usize::from(expected));
        }
    }
}

#[test]
fn model_specific_readings() {
    let cases: [(DeviceVariant, [bool; 7]); 3] = [
        // 40K, pressure, turbo, cryo-in, dump, reservoir T, reservoir P
        (DeviceVariant::AttoDry1100, [true, true, true, false, false, false, false]),
        (DeviceVariant::AttoDry2100, [false, false, false, true, true, true, true]),
        (DeviceVariant::AttoDry800, [false, true, true, false, false, false, false]),
    ];

    for (variant, expected) in cases {
        let (mut dev, _mock) = connected(variant);
        let actual = [
            dev.forty_kelvin_stage_temperature().is_ok(),
            dev.pressure().is_ok(),
            dev.turbopump_frequency().is_ok(),
            dev.cryostat_in_pressure().is_ok(),
            dev.dump_pressure().is_ok(),
            dev.reservoir_temperature().is_ok(),
            dev.reservoir_heater_power().is_ok(),
        ];
        assert_eq!(actual, expected, "{variant}");
    }
}

#[test]
fn unrestricted_operations_work_everywhere() {
    for variant in DeviceVariant::ALL {
        let (mut dev, _mock) = connected(variant);
        dev.four_kelvin_stage_temperature().unwrap();
        dev.cryostat_out_pressure().unwrap();
        dev.vti_temperature().unwrap();
        dev.reservoir_tset_cold_sample().unwrap();
        dev.set_reservoir_tset_warm_sample(20.0).unwrap();
        dev.toggle_pump().unwrap();
        dev.sweep_field_to_zero().unwrap();
    }
}
