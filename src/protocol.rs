use serde_json::{json, Value};

pub const DEFAULT_BASE_URL: &str = "https://www.ariston-net.remotethermo.com/api/v2/";
pub const AUTH_HEADER: &str = "ar.authToken";
pub const DEFAULT_LANGUAGE_TAG: &str = "en-US";

pub const LOGIN_PATH: &str = "accounts/login";
pub const REMOTE_PLANTS_PATH: &str = "remote/plants";
pub const VELIS_PLANTS_PATH: &str = "velis/plants";
pub const BUS_ERRORS_PATH: &str = "busErrors";

/// Plant-data segment of the Velis endpoints.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum PlantData {
    Med,
    Se,
    Slp,
}

impl PlantData {
    pub fn as_path(&self) -> &'static str {
        match self {
            PlantData::Med => "medPlantData",
            PlantData::Se => "sePlantData",
            PlantData::Slp => "slpPlantData",
        }
    }
}

pub fn features_path(gateway: &str) -> String {
    format!("remote/plants/{gateway}/features")
}

pub fn get_items_path(gateway: &str) -> String {
    format!("remote/dataItems/{gateway}/get")
}

pub fn set_items_path(gateway: &str) -> String {
    format!("remote/dataItems/{gateway}/set")
}

pub fn velis_data_path(plant_data: PlantData, gateway: &str) -> String {
    format!("velis/{}/{gateway}", plant_data.as_path())
}

pub fn velis_action_path(plant_data: PlantData, gateway: &str, action: &str) -> String {
    format!("velis/{}/{gateway}/{action}", plant_data.as_path())
}

pub fn plant_settings_path(plant_data: PlantData, gateway: &str) -> String {
    velis_action_path(plant_data, gateway, "plantSettings")
}

pub fn bsb_data_path(gateway: &str) -> String {
    format!("remote/bsbPlantData/{gateway}")
}

pub fn bsb_action_path(gateway: &str, action: &str) -> String {
    format!("remote/bsbPlantData/{gateway}/{action}")
}

pub fn bsb_zone_path(gateway: &str, zone: u32, action: &str) -> String {
    format!("remote/bsbZones/{gateway}/{zone}/{action}")
}

pub fn consumption_sequences_path(gateway: &str) -> String {
    format!("remote/reports/{gateway}/consSequencesApi8")
}

pub fn energy_account_path(gateway: &str) -> String {
    format!("remote/reports/{gateway}/energyAccount")
}

pub fn get_consumptions_settings_path(gateway: &str) -> String {
    format!("remote/plants/{gateway}/getConsumptionsSettings")
}

pub fn set_consumptions_settings_path(gateway: &str) -> String {
    format!("remote/plants/{gateway}/consumptionsSettings")
}

pub fn time_progs_path(gateway: &str, zone: u32) -> String {
    format!("remote/timeProgs/{gateway}/ChZn{zone}")
}

pub fn holiday_path(gateway: &str) -> String {
    format!("remote/plantData/{gateway}/holiday")
}

pub fn login_body(username: &str, password: &str) -> Value {
    json!({ "usr": username, "pwd": password })
}

pub fn new_value(value: Value) -> Value {
    json!({ "new": value })
}

pub fn plant_setting(name: &str, new: Value, old: Value) -> Value {
    json!({ name: { "new": new, "old": old } })
}

/// One entry of a data-items set call.
#[derive(Debug, Clone, PartialEq)]
pub struct ItemWrite {
    pub id: String,
    pub prev_value: Value,
    pub value: Value,
    pub zone: u32,
}

pub fn set_items(items: &[ItemWrite], features: &Value) -> Value {
    let items: Vec<Value> = items
        .iter()
        .map(|item| {
            json!({
                "id": item.id,
                "prevValue": item.prev_value,
                "value": item.value,
                "zone": item.zone,
            })
        })
        .collect();
    json!({ "items": items, "features": features })
}

/// Item query covering every device property plus every thermostat property per zone.
pub fn get_items(device_properties: &[&str], thermostat_properties: &[&str], zones: &[u32]) -> Vec<Value> {
    let mut items: Vec<Value> = device_properties
        .iter()
        .map(|id| json!({ "id": id, "zn": 0 }))
        .collect();
    for zone in zones {
        items.extend(
            thermostat_properties
                .iter()
                .map(|id| json!({ "id": id, "zn": zone })),
        );
    }
    items
}

pub fn get_items_body(items: Vec<Value>, features: &Value, culture: &str) -> Value {
    json!({
        "useCache": false,
        "items": items,
        "features": features,
        "culture": culture,
    })
}

/// Paired setpoint write; `keys` names the comfort and reduced members.
pub fn paired_setpoint(
    keys: (&str, &str),
    new: (f64, f64),
    old: Option<(Option<f64>, Option<f64>)>,
) -> Value {
    let (comfort, reduced) = keys;
    let mut body = json!({ "new": { comfort: new.0, reduced: new.1 } });
    if let Some((old_comfort, old_reduced)) = old {
        body["old"] = json!({ comfort: old_comfort, reduced: old_reduced });
    }
    body
}

/// Holiday end as the cloud expects it, midnight of the given day.
pub fn holiday_body(end: Option<chrono::NaiveDate>) -> Value {
    let end = end.map(|d| d.format("%Y-%m-%dT00:00:00").to_string());
    new_value(json!(end))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn plant_setting_envelope() {
        let body = plant_setting("MedMaxSetpointTemperature", json!(70.0), json!(65.0));
        assert_eq!(body["MedMaxSetpointTemperature"]["new"], 70.0);
        assert_eq!(body["MedMaxSetpointTemperature"]["old"], 65.0);
    }

    #[test]
    fn set_items_carries_prev_value_and_features() {
        let features = json!({"zones": [{"num": 1}]});
        let body = set_items(
            &[ItemWrite {
                id: "ZoneComfortTemp".into(),
                prev_value: json!(20.0),
                value: json!(21.5),
                zone: 1,
            }],
            &features,
        );
        let item = &body["items"][0];
        assert_eq!(item["id"], "ZoneComfortTemp");
        assert_eq!(item["prevValue"], 20.0);
        assert_eq!(item["value"], 21.5);
        assert_eq!(item["zone"], 1);
        assert_eq!(body["features"], features);
    }

    #[test]
    fn get_items_expands_per_zone() {
        let items = get_items(&["PlantMode", "DhwTemp"], &["ZoneMode"], &[1, 2]);
        assert_eq!(items.len(), 4);
        assert_eq!(items[0], json!({"id": "PlantMode", "zn": 0}));
        assert_eq!(items[3], json!({"id": "ZoneMode", "zn": 2}));
    }

    #[test]
    fn paired_setpoint_with_and_without_old() {
        let body = paired_setpoint(("comf", "econ"), (21.0, 17.0), None);
        assert_eq!(body, json!({"new": {"comf": 21.0, "econ": 17.0}}));

        let body = paired_setpoint(("comfort", "reduced"), (55.0, 40.0), Some((Some(50.0), None)));
        assert_eq!(body["old"]["comfort"], 50.0);
        assert!(body["old"]["reduced"].is_null());
    }

    #[test]
    fn holiday_body_formats_midnight() {
        let date = chrono::NaiveDate::from_ymd_opt(2024, 12, 24).unwrap();
        assert_eq!(holiday_body(Some(date)), json!({"new": "2024-12-24T00:00:00"}));
        assert_eq!(holiday_body(None), json!({"new": null}));
    }

    #[test]
    fn velis_paths() {
        assert_eq!(velis_data_path(PlantData::Se, "GW1"), "velis/sePlantData/GW1");
        assert_eq!(
            plant_settings_path(PlantData::Slp, "GW1"),
            "velis/slpPlantData/GW1/plantSettings"
        );
        assert_eq!(bsb_zone_path("GW1", 2, "mode"), "remote/bsbZones/GW1/2/mode");
    }
}
