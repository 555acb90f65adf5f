//! Galevo climate systems: LiveState is a list of described items, each
//! tagged with the zone it belongs to.

use serde_json::{json, Map, Value};
use tracing::debug;

use super::Device;
use crate::protocol::{self, ItemWrite};
use crate::schema::{
    custom_feature, device_property, feature, field, thermostat_property,
};
use crate::Result;

const ITEMS: &str = "items";

/// Setpoints the cloud only accepts as a pair.
const PAIRED_ITEMS: &[(&str, &str)] = &[
    (
        thermostat_property::ZONE_COMFORT_TEMP,
        thermostat_property::ZONE_ECONOMY_TEMP,
    ),
    (
        device_property::DHW_TIMEPROG_COMFORT_TEMP,
        device_property::DHW_TIMEPROG_ECONOMY_TEMP,
    ),
];

pub(super) fn find_item<'a>(state: &'a Map<String, Value>, id: &str, zone: u32) -> Option<&'a Map<String, Value>> {
    state
        .get(ITEMS)?
        .as_array()?
        .iter()
        .filter_map(Value::as_object)
        .find(|item| is_item(item, id, zone))
}

fn is_item(item: &Map<String, Value>, id: &str, zone: u32) -> bool {
    item.get("id").and_then(Value::as_str) == Some(id)
        && item.get(field::ZONE).and_then(Value::as_u64).unwrap_or(0) == u64::from(zone)
}

/// Set an item's field in place, appending the item if the mirror lacks it.
pub(super) fn set_item_field(state: &mut Map<String, Value>, id: &str, zone: u32, name: &str, value: Value) {
    let items = state
        .entry(ITEMS)
        .or_insert_with(|| Value::Array(Vec::new()));
    if !items.is_array() {
        *items = Value::Array(Vec::new());
    }
    let Some(items) = items.as_array_mut() else {
        return;
    };

    let existing = items
        .iter_mut()
        .filter_map(Value::as_object_mut)
        .find(|item| is_item(item, id, zone));
    match existing {
        Some(item) => {
            item.insert(name.to_string(), value);
        }
        None => {
            let mut item = Map::new();
            item.insert("id".into(), json!(id));
            item.insert(field::ZONE.into(), json!(zone));
            item.insert(name.to_string(), value);
            items.push(Value::Object(item));
        }
    }
}

fn pair_of(id: &str) -> Option<(&'static str, &'static str)> {
    PAIRED_ITEMS
        .iter()
        .copied()
        .find(|(comfort, economy)| *comfort == id || *economy == id)
}

impl Device {
    pub(super) fn zones_from_features(&self) -> Vec<u32> {
        self.features
            .server_flag(feature::ZONES)
            .and_then(Value::as_array)
            .map(|zones| {
                zones
                    .iter()
                    .filter_map(|z| z.get("num").and_then(Value::as_u64))
                    .filter_map(|n| u32::try_from(n).ok())
                    .collect()
            })
            .unwrap_or_default()
    }

    pub(super) async fn fetch_item_features(&mut self) -> Result<()> {
        let path = protocol::features_path(&self.attributes.gateway);
        if let Some(Value::Object(map)) = self.session.get(&path, &[]).await? {
            self.features.set_server(map);
        }
        let has_boiler = self.features.server_flag(feature::HAS_BOILER) == Some(&Value::Bool(true));
        self.features.set_custom(custom_feature::HAS_DHW, has_boiler);
        Ok(())
    }

    pub(super) async fn fetch_item_state(&mut self) -> Result<()> {
        if !self.features.is_fetched() {
            self.fetch_item_features().await?;
        }

        let items = protocol::get_items(
            device_property::ALL,
            thermostat_property::ALL,
            &self.zones_from_features(),
        );
        let body = protocol::get_items_body(
            items,
            &self.features.server_value(),
            &self.options.language_tag,
        );
        let path = protocol::get_items_path(&self.attributes.gateway);
        let fetched = self
            .session
            .post(&path, &[("umsys", self.options.umsys.to_string())], &body)
            .await?;

        match fetched {
            Some(Value::Object(map)) => {
                self.state = map;
                self.derive_item_features();
            }
            _ => self.state = Map::new(),
        }
        Ok(())
    }

    /// Sensor presence is inferred from the first snapshot only: the cloud
    /// reports an absent sensor with value equal to its max.
    fn derive_item_features(&mut self) {
        let field_of = |id: &str, name: &str| find_item(&self.state, id, 0).and_then(|i| i.get(name)).cloned();

        let outside = field_of(device_property::OUTSIDE_TEMP, field::VALUE);
        let outside_max = field_of(device_property::OUTSIDE_TEMP, field::MAX);
        let storage = field_of(device_property::DHW_STORAGE_TEMPERATURE, field::VALUE);
        let storage_max = field_of(device_property::DHW_STORAGE_TEMPERATURE, field::MAX);
        let has_flow_temp = field_of(device_property::CH_FLOW_TEMP, field::VALUE).is_some_and(|v| !v.is_null());
        let has_quiet = field_of(device_property::IS_QUITE, field::VALUE).is_some_and(|v| !v.is_null());

        self.features
            .derive_custom_once(custom_feature::HAS_OUTSIDE_TEMP, || outside != outside_max);
        self.features.derive_custom_once(custom_feature::HAS_DHW_STORAGE_TEMP, || {
            storage.as_ref().is_some_and(|v| !v.is_null()) && storage != storage_max
        });
        self.features.set_custom(custom_feature::HAS_CH_FLOW_TEMP, has_flow_temp);
        self.features.set_custom(custom_feature::HAS_QUIET_MODE, has_quiet);
    }

    /// Send a set call for `id`, carrying the value the mirror holds right now
    /// as `prevValue`. Paired setpoints go out together.
    pub(super) async fn write_item(&mut self, id: &str, value: Value, zone: u32) -> Result<()> {
        let mut writes = vec![ItemWrite {
            id: id.to_string(),
            prev_value: self.item_value(id, zone),
            value: value.clone(),
            zone,
        }];

        if let Some((comfort, economy)) = pair_of(id) {
            let partner = if id == comfort { economy } else { comfort };
            let current = self.item_value(partner, zone);
            let resend = if current.is_null() { json!(0.0) } else { current.clone() };
            writes.push(ItemWrite {
                id: partner.to_string(),
                prev_value: current,
                value: resend,
                zone,
            });
        }

        debug!(gateway = %self.attributes.gateway, item = id, zone, "writing item");
        let body = protocol::set_items(&writes, &self.features.server_value());
        let path = protocol::set_items_path(&self.attributes.gateway);
        self.session
            .post(&path, &[("umsys", self.options.umsys.to_string())], &body)
            .await?;

        for write in writes {
            set_item_field(&mut self.state, &write.id, write.zone, field::VALUE, write.value);
        }
        Ok(())
    }

    fn item_value(&self, id: &str, zone: u32) -> Value {
        find_item(&self.state, id, zone)
            .and_then(|item| item.get(field::VALUE))
            .cloned()
            .unwrap_or(Value::Null)
    }

    pub(super) async fn write_holiday(&mut self, end: Option<chrono::NaiveDate>) -> Result<()> {
        let body = protocol::holiday_body(end);
        let path = protocol::holiday_path(&self.attributes.gateway);
        self.session.post(&path, &[], &body).await?;

        let expires_on = body["new"].clone();
        set_item_field(
            &mut self.state,
            device_property::HOLIDAY,
            0,
            field::VALUE,
            Value::Bool(!expires_on.is_null()),
        );
        set_item_field(&mut self.state, device_property::HOLIDAY, 0, field::EXPIRES_ON, expires_on);
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn state() -> Map<String, Value> {
        json!({"items": [
            {"id": "DhwTemp", "zone": 0, "value": 48.0, "min": 40.0, "max": 65.0},
            {"id": "ZoneComfortTemp", "zone": 1, "value": 21.0},
            {"id": "ZoneComfortTemp", "zone": 2, "value": 19.5}
        ]})
        .as_object()
        .cloned()
        .unwrap()
    }

    #[test]
    fn lookup_matches_id_and_zone() {
        let s = state();
        assert_eq!(find_item(&s, "ZoneComfortTemp", 2).unwrap()["value"], 19.5);
        assert!(find_item(&s, "ZoneComfortTemp", 3).is_none());
        assert!(find_item(&s, "DhwTemp", 1).is_none());
        assert!(find_item(&Map::new(), "DhwTemp", 0).is_none());
    }

    #[test]
    fn set_field_updates_in_place_or_appends() {
        let mut s = state();
        set_item_field(&mut s, "ZoneComfortTemp", 1, "value", json!(22.0));
        assert_eq!(find_item(&s, "ZoneComfortTemp", 1).unwrap()["value"], 22.0);
        assert_eq!(find_item(&s, "ZoneComfortTemp", 2).unwrap()["value"], 19.5);

        set_item_field(&mut s, "ZoneEconomyTemp", 1, "value", json!(17.0));
        assert_eq!(find_item(&s, "ZoneEconomyTemp", 1).unwrap()["value"], 17.0);
        assert_eq!(s["items"].as_array().unwrap().len(), 4);
    }

    #[test]
    fn pairs_resolve_from_either_side() {
        assert_eq!(
            pair_of("ZoneEconomyTemp"),
            Some(("ZoneComfortTemp", "ZoneEconomyTemp"))
        );
        assert_eq!(pair_of("DhwTemp"), None);
    }
}
