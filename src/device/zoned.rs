//! BSB plants: LiveState nests described values per zone under
//! `zones["<n>"]`; zone 0 addresses the top level.

use serde_json::{json, Map, Value};

use super::{as_f64, Device};
use crate::protocol;
use crate::schema::{bsb_property, bsb_zone_property, custom_feature, field};
use crate::{Error, Result};

/// Object holding the properties of `zone`.
pub(super) fn zone_map(state: &Map<String, Value>, zone: u32) -> Option<&Map<String, Value>> {
    if zone == 0 {
        return Some(state);
    }
    state
        .get(bsb_property::ZONES)?
        .get(zone.to_string())?
        .as_object()
}

/// Field of a nested property. Bare values (room temperature, flame) only
/// answer for `value`.
pub(super) fn nested_field(state: &Map<String, Value>, name: &str, field_name: &str, zone: u32) -> Option<Value> {
    let property = zone_map(state, zone)?.get(name)?;
    match property {
        Value::Object(described) => described.get(field_name).cloned(),
        bare if field_name == field::VALUE => Some(bare.clone()),
        _ => None,
    }
}

fn set_nested_value(state: &mut Map<String, Value>, name: &str, zone: u32, value: Value) {
    let target = if zone == 0 {
        state
    } else {
        let zones = state
            .entry(bsb_property::ZONES)
            .or_insert_with(|| Value::Object(Map::new()));
        if !zones.is_object() {
            *zones = Value::Object(Map::new());
        }
        let Some(zones) = zones.as_object_mut() else {
            return;
        };
        let zone_entry = zones
            .entry(zone.to_string())
            .or_insert_with(|| Value::Object(Map::new()));
        if !zone_entry.is_object() {
            *zone_entry = Value::Object(Map::new());
        }
        let Some(zone_entry) = zone_entry.as_object_mut() else {
            return;
        };
        zone_entry
    };

    match target.get_mut(name) {
        Some(Value::Object(described)) => {
            described.insert(field::VALUE.to_string(), value);
        }
        _ => {
            let mut described = Map::new();
            described.insert(field::VALUE.to_string(), value);
            target.insert(name.to_string(), Value::Object(described));
        }
    }
}

/// Mirror a paired write: the written side keeps the caller's value, the
/// partner keeps whatever it held and only gets 0 when it was never read.
fn mirror_pair(state: &mut Map<String, Value>, name: &str, value: Value, partner: &str, zone: u32) {
    set_nested_value(state, name, zone, value);
    if nested_field(state, partner, field::VALUE, zone).is_none() {
        set_nested_value(state, partner, zone, json!(0.0));
    }
}

impl Device {
    pub(super) fn zones_from_state(&self) -> Vec<u32> {
        let mut zones: Vec<u32> = self
            .state
            .get(bsb_property::ZONES)
            .and_then(Value::as_object)
            .map(|zones| zones.keys().filter_map(|k| k.parse().ok()).collect())
            .unwrap_or_default();
        zones.sort_unstable();
        zones
    }

    pub(super) async fn fetch_zoned_state(&mut self) -> Result<()> {
        let path = protocol::bsb_data_path(&self.attributes.gateway);
        self.state = match self.session.get(&path, &[]).await? {
            Some(Value::Object(map)) => map,
            _ => Map::new(),
        };
        Ok(())
    }

    pub(super) async fn fetch_zoned_features(&mut self) -> Result<()> {
        let path = protocol::features_path(&self.attributes.gateway);
        if let Some(Value::Object(map)) = self.session.get(&path, &[]).await? {
            self.features.set_server(map);
        }
        self.features.set_custom(custom_feature::HAS_DHW, true);
        self.features.set_custom(custom_feature::HAS_OUTSIDE_TEMP, true);
        Ok(())
    }

    pub(super) async fn write_zoned(&mut self, name: &str, value: Value, zone: u32) -> Result<()> {
        let gateway = self.attributes.gateway.clone();
        match (zone, name) {
            (0, bsb_property::DHW_MODE) => {
                let path = protocol::bsb_action_path(&gateway, "dhwMode");
                self.session.post(&path, &[], &protocol::new_value(value.clone())).await?;
                set_nested_value(&mut self.state, name, 0, value);
            }
            (0, bsb_property::DHW_COMF_TEMP | bsb_property::DHW_REDU_TEMP) => {
                let new = expect_number(name, &value)?;
                let (comfort, reduced, old, partner) = self.zoned_pair(
                    bsb_property::DHW_COMF_TEMP,
                    bsb_property::DHW_REDU_TEMP,
                    name,
                    new,
                    0,
                );
                let path = protocol::bsb_action_path(&gateway, "dhwTemp");
                let body = protocol::paired_setpoint(("comf", "econ"), (comfort, reduced), Some(old));
                self.session.post(&path, &[], &body).await?;
                mirror_pair(&mut self.state, name, value, partner, 0);
            }
            (z, bsb_zone_property::MODE) if z > 0 => {
                self.check_zone(z)?;
                let path = protocol::bsb_zone_path(&gateway, z, "mode");
                self.session.post(&path, &[], &protocol::new_value(value.clone())).await?;
                set_nested_value(&mut self.state, name, z, value);
            }
            (z, bsb_zone_property::CH_COMF_TEMP | bsb_zone_property::CH_RED_TEMP) if z > 0 => {
                self.check_zone(z)?;
                let new = expect_number(name, &value)?;
                let (comfort, reduced, _, partner) = self.zoned_pair(
                    bsb_zone_property::CH_COMF_TEMP,
                    bsb_zone_property::CH_RED_TEMP,
                    name,
                    new,
                    z,
                );
                let path = protocol::bsb_zone_path(&gateway, z, "temperatures");
                let body = protocol::paired_setpoint(("comf", "econ"), (comfort, reduced), None);
                self.session.post(&path, &[], &body).await?;
                mirror_pair(&mut self.state, name, value, partner, z);
            }
            _ => {
                return Err(Error::UnsupportedOperation(format!(
                    "{name} is not writable in zone {zone}"
                )));
            }
        }
        Ok(())
    }

    /// New comfort and reduced values, the ones they replace and the key of
    /// the side not being written, which is resent from the mirror (0 if
    /// never read).
    fn zoned_pair(
        &self,
        comfort_key: &'static str,
        reduced_key: &'static str,
        name: &str,
        new: f64,
        zone: u32,
    ) -> (f64, f64, (Option<f64>, Option<f64>), &'static str) {
        let read = |key: &str| nested_field(&self.state, key, field::VALUE, zone).as_ref().and_then(as_f64);
        let old_comfort = read(comfort_key);
        let old_reduced = read(reduced_key);
        if name == comfort_key {
            (new, old_reduced.unwrap_or(0.0), (old_comfort, old_reduced), reduced_key)
        } else {
            (old_comfort.unwrap_or(0.0), new, (old_comfort, old_reduced), comfort_key)
        }
    }

    /// Zones are only checked once LiveState has reported some.
    fn check_zone(&self, zone: u32) -> Result<()> {
        let known = self.zones_from_state();
        if known.is_empty() || known.contains(&zone) {
            Ok(())
        } else {
            Err(Error::InvalidZone(zone))
        }
    }
}

fn expect_number(name: &str, value: &Value) -> Result<f64> {
    as_f64(value).ok_or_else(|| Error::UnsupportedOperation(format!("{name} expects a number")))
}

#[cfg(test)]
mod tests {
    use super::*;

    fn state() -> Map<String, Value> {
        json!({
            "dhwTemp": 47.5,
            "dhwComfTemp": {"value": 55.0, "min": 35.0, "max": 65.0, "step": 0.5},
            "zones": {
                "1": {
                    "roomTemp": 20.4,
                    "mode": {"value": 2, "allowedOptions": [0, 1, 2, 3]},
                    "chComfTemp": {"value": 21.0, "min": 15.0, "max": 24.0}
                }
            }
        })
        .as_object()
        .cloned()
        .unwrap()
    }

    #[test]
    fn two_level_lookup() {
        let s = state();
        assert_eq!(nested_field(&s, "chComfTemp", "max", 1), Some(json!(24.0)));
        assert_eq!(nested_field(&s, "roomTemp", "value", 1), Some(json!(20.4)));
        assert_eq!(nested_field(&s, "roomTemp", "max", 1), None);
        assert_eq!(nested_field(&s, "dhwComfTemp", "value", 0), Some(json!(55.0)));
        assert_eq!(nested_field(&s, "chComfTemp", "value", 7), None);
        assert_eq!(nested_field(&s, "missing", "value", 1), None);
    }

    #[test]
    fn set_value_keeps_described_fields() {
        let mut s = state();
        set_nested_value(&mut s, "chComfTemp", 1, json!(22.5));
        assert_eq!(nested_field(&s, "chComfTemp", "value", 1), Some(json!(22.5)));
        assert_eq!(nested_field(&s, "chComfTemp", "min", 1), Some(json!(15.0)));
    }

    #[test]
    fn paired_mirror_keeps_values_as_sent() {
        let mut s = state();
        mirror_pair(&mut s, "chRedTemp", json!(17), "chComfTemp", 1);
        assert_eq!(nested_field(&s, "chRedTemp", "value", 1), Some(json!(17)));
        assert_eq!(nested_field(&s, "chComfTemp", "value", 1), Some(json!(21.0)));

        mirror_pair(&mut s, "dhwReduTemp", json!(40), "dhwComfTemp", 0);
        assert_eq!(nested_field(&s, "dhwComfTemp", "value", 0), Some(json!(55.0)));

        mirror_pair(&mut s, "chComfTemp", json!(20), "chRedTemp", 2);
        assert_eq!(nested_field(&s, "chRedTemp", "value", 2), Some(json!(0.0)));
    }

    #[test]
    fn set_value_creates_missing_zone() {
        let mut s = Map::new();
        set_nested_value(&mut s, "chRedTemp", 2, json!(17.0));
        assert_eq!(nested_field(&s, "chRedTemp", "value", 2), Some(json!(17.0)));
    }
}
