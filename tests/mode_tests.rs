use ariston_net::{
    ConsumptionTimeInterval, ConsumptionType, DeviceAttributes, Family, SystemType, VelisModel,
    WheType, BSB_ZONE_MODES, CURRENCIES, LUX_MODES, NUOS_SPLIT_MODES, PLANT_MODES, ZONE_MODES,
};
use serde_json::json;

fn attributes(raw: serde_json::Value) -> DeviceAttributes {
    serde_json::from_value(raw).unwrap()
}

#[test]
fn mode_names_and_codes() {
    assert_eq!(LUX_MODES.code_of("BOOST"), Some(9));
    assert_eq!(LUX_MODES.name_of(5), Some("PROGRAM"));
    assert_eq!(NUOS_SPLIT_MODES.code_of("GREEN"), Some(0));
    assert_eq!(NUOS_SPLIT_MODES.name_of(7), None);
    assert_eq!(PLANT_MODES.code_of("HOLIDAY"), Some(6));
    assert_eq!(CURRENCIES.name_of(2), Some("EUR"));
}

#[test]
fn zone_modes_differ_between_families() {
    assert_eq!(ZONE_MODES.code_of("TIME_PROGRAM"), Some(3));
    assert_eq!(BSB_ZONE_MODES.code_of("TIME_PROGRAM"), Some(1));
    assert_eq!(ZONE_MODES.names(), vec!["OFF", "MANUAL_NIGHT", "MANUAL", "TIME_PROGRAM"]);
}

#[test]
fn water_heater_types_pick_a_profile() {
    let cases = [
        (1, VelisModel::Evo),
        (2, VelisModel::LydosHybrid),
        (4, VelisModel::NuosSplit),
        (5, VelisModel::Evo),
        (6, VelisModel::Evo),
        (7, VelisModel::Lux2),
        (8, VelisModel::Lux),
    ];
    for (code, model) in cases {
        let attrs = attributes(json!({ "gw": "GW", "sys": 4, "wheType": code }));
        assert_eq!(Family::for_attributes(&attrs).unwrap(), Family::Flat(model), "wheType {code}");
    }
}

#[test]
fn velis_profiles() {
    assert_eq!(VelisModel::NuosSplit.mode_key(), "opMode");
    assert_eq!(VelisModel::Lux.mode_key(), "mode");
    assert_eq!(VelisModel::NuosSplit.target_temperature_key(), "comfortTemp");
    assert_eq!(VelisModel::Evo.reduced_temperature_key(), None);
    assert_eq!(VelisModel::LydosHybrid.max_setpoint_setting(), "SeMaxSetpointTemperature");
    assert_eq!(VelisModel::Lux2.consumption_filter(), "Dhw");
    assert_eq!(
        VelisModel::NuosSplit.consumption_filter(),
        "DhwHeatingPumpElec,DhwResistorElec"
    );
}

#[test]
fn system_and_whe_codes_roundtrip() {
    for t in [SystemType::Galevo, SystemType::Velis, SystemType::Bsb] {
        assert_eq!(SystemType::from_code(t.code()), Some(t));
    }
    assert_eq!(WheType::from_code(3), None);
    assert_eq!(WheType::Lux.code(), 8);
}

#[test]
fn consumption_codes() {
    assert_eq!(ConsumptionType::from_code(21), Some(ConsumptionType::DomesticHotWaterElectricity));
    assert_eq!(ConsumptionType::from_code(3), None);
    assert_eq!(
        ConsumptionTimeInterval::from_code(3),
        Some(ConsumptionTimeInterval::LastMonth)
    );
}
