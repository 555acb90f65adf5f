//! Velis water heaters: LiveState is one flat object, writes go to one
//! endpoint per property.

use serde_json::{json, Map, Value};
use tracing::debug;

use super::{as_f64, Device};
use crate::protocol::{self, PlantData};
use crate::schema::{
    custom_feature, feature, med_setting, se_setting, slp_setting, velis_property as prop,
};
use crate::types::{CodeTable, WheType, EVO_MODES, LUX_MODES, LYDOS_MODES, NUOS_SPLIT_MODES};
use crate::{Error, Result};

/// Lowest target a Velis heater accepts; the cloud does not report it.
const VELIS_MIN_TEMPERATURE: f64 = 40.0;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum VelisModel {
    /// Evo, Evo 2 and Andris 2.
    Evo,
    Lux,
    /// Lux 2 adds the power-option switch.
    Lux2,
    LydosHybrid,
    NuosSplit,
}

impl VelisModel {
    pub fn for_whe_type(whe_type: WheType) -> Self {
        match whe_type {
            WheType::Evo | WheType::Andris2 | WheType::Evo2 => VelisModel::Evo,
            WheType::Lux2 => VelisModel::Lux2,
            WheType::Lux => VelisModel::Lux,
            WheType::LydosHybrid => VelisModel::LydosHybrid,
            WheType::NuosSplit => VelisModel::NuosSplit,
        }
    }

    pub fn plant_data(&self) -> PlantData {
        match self {
            VelisModel::Evo | VelisModel::Lux | VelisModel::Lux2 => PlantData::Med,
            VelisModel::LydosHybrid => PlantData::Se,
            VelisModel::NuosSplit => PlantData::Slp,
        }
    }

    pub fn modes(&self) -> CodeTable {
        match self {
            VelisModel::Evo | VelisModel::Lux2 => EVO_MODES,
            VelisModel::Lux => LUX_MODES,
            VelisModel::LydosHybrid => LYDOS_MODES,
            VelisModel::NuosSplit => NUOS_SPLIT_MODES,
        }
    }

    /// LiveState key holding the current mode.
    pub fn mode_key(&self) -> &'static str {
        match self {
            VelisModel::NuosSplit => prop::OP_MODE,
            _ => prop::MODE,
        }
    }

    fn mode_action(&self) -> &'static str {
        match self {
            VelisModel::NuosSplit => "operativeMode",
            _ => "mode",
        }
    }

    pub fn current_temperature_key(&self) -> &'static str {
        match self {
            VelisModel::NuosSplit => prop::WATER_TEMP,
            _ => prop::TEMP,
        }
    }

    pub fn target_temperature_key(&self) -> &'static str {
        match self {
            VelisModel::NuosSplit => prop::COMFORT_TEMP,
            _ => prop::REQ_TEMP,
        }
    }

    pub fn reduced_temperature_key(&self) -> Option<&'static str> {
        match self {
            VelisModel::NuosSplit => Some(prop::REDUCED_TEMP),
            _ => None,
        }
    }

    pub fn anti_legionella_setting(&self) -> &'static str {
        match self.plant_data() {
            PlantData::Med => med_setting::ANTILEGIONELLA_ON_OFF,
            PlantData::Se => se_setting::ANTILEGIONELLA_ON_OFF,
            PlantData::Slp => slp_setting::ANTILEGIONELLA_ON_OFF,
        }
    }

    pub fn max_setpoint_setting(&self) -> &'static str {
        match self.plant_data() {
            PlantData::Med => med_setting::MAX_SETPOINT_TEMPERATURE,
            PlantData::Se => se_setting::MAX_SETPOINT_TEMPERATURE,
            PlantData::Slp => slp_setting::MAX_SETPOINT_TEMPERATURE,
        }
    }

    fn max_setpoint_bounds(&self) -> (&'static str, &'static str) {
        match self.plant_data() {
            PlantData::Med => (
                med_setting::MAX_SETPOINT_TEMPERATURE_MIN,
                med_setting::MAX_SETPOINT_TEMPERATURE_MAX,
            ),
            PlantData::Se => (
                se_setting::MAX_SETPOINT_TEMPERATURE_MIN,
                se_setting::MAX_SETPOINT_TEMPERATURE_MAX,
            ),
            PlantData::Slp => (
                slp_setting::MAX_SETPOINT_TEMPERATURE_MIN,
                slp_setting::MAX_SETPOINT_TEMPERATURE_MAX,
            ),
        }
    }

    pub fn consumption_filter(&self) -> &'static str {
        match self {
            VelisModel::LydosHybrid | VelisModel::NuosSplit => "DhwHeatingPumpElec,DhwResistorElec",
            _ => "Dhw",
        }
    }

    fn has_eco_switch(&self) -> bool {
        matches!(self, VelisModel::Evo | VelisModel::Lux | VelisModel::Lux2)
    }
}

/// How a flat property reaches the cloud.
enum FlatWrite {
    New(&'static str),
    RawBool(&'static str),
    Paired,
}

fn write_route(model: VelisModel, name: &str) -> Option<FlatWrite> {
    if name == model.mode_key() {
        return Some(FlatWrite::New(model.mode_action()));
    }
    match (model, name) {
        (VelisModel::NuosSplit, prop::COMFORT_TEMP | prop::REDUCED_TEMP) => Some(FlatWrite::Paired),
        (VelisModel::NuosSplit, prop::BOOST_ON) => Some(FlatWrite::RawBool("boost")),
        (VelisModel::NuosSplit, prop::REQ_TEMP) => None,
        (_, prop::REQ_TEMP) => Some(FlatWrite::New("temperature")),
        (_, prop::ON) => Some(FlatWrite::RawBool("switch")),
        (m, prop::ECO) if m.has_eco_switch() => Some(FlatWrite::RawBool("switchEco")),
        (VelisModel::Lux2, prop::PWR_OPT) => Some(FlatWrite::RawBool("switchPowerOption")),
        _ => None,
    }
}

impl Device {
    pub(super) async fn fetch_flat_state(&mut self, model: VelisModel) -> Result<()> {
        let path = protocol::velis_data_path(model.plant_data(), &self.attributes.gateway);
        self.state = match self.session.get(&path, &[]).await? {
            Some(Value::Object(map)) => map,
            _ => Map::new(),
        };
        Ok(())
    }

    /// Features and plant settings are independent resources, fetched together.
    pub(super) async fn fetch_flat_features(&mut self, model: VelisModel) -> Result<()> {
        let gateway = self.attributes.gateway.clone();
        let features_path = protocol::features_path(&gateway);
        let settings_path = protocol::plant_settings_path(model.plant_data(), &gateway);
        let (features, settings) = tokio::try_join!(
            self.session.get(&features_path, &[]),
            self.session.get(&settings_path, &[]),
        )?;

        if let Some(Value::Object(map)) = features {
            self.features.set_server(map);
        }
        self.settings = match settings {
            Some(Value::Object(map)) => map,
            _ => Map::new(),
        };
        self.features.set_custom(custom_feature::HAS_DHW, true);
        self.features
            .set_server_flag(feature::DHW_MODE_CHANGEABLE, Value::Bool(true));
        Ok(())
    }

    pub(super) async fn write_flat(&mut self, model: VelisModel, name: &str, value: Value) -> Result<()> {
        let gateway = self.attributes.gateway.clone();
        let plant_data = model.plant_data();
        match write_route(model, name) {
            Some(FlatWrite::New(action)) => {
                let path = protocol::velis_action_path(plant_data, &gateway, action);
                self.session.post(&path, &[], &protocol::new_value(value.clone())).await?;
                self.state.insert(name.to_string(), value);
            }
            Some(FlatWrite::RawBool(action)) => {
                let flag = value
                    .as_bool()
                    .ok_or_else(|| Error::UnsupportedOperation(format!("{name} expects a boolean")))?;
                let path = protocol::velis_action_path(plant_data, &gateway, action);
                self.session.post(&path, &[], &Value::Bool(flag)).await?;
                self.state.insert(name.to_string(), Value::Bool(flag));
            }
            Some(FlatWrite::Paired) => {
                let new = as_f64(&value).ok_or_else(|| {
                    Error::UnsupportedOperation(format!("{name} expects a number"))
                })?;
                self.write_flat_setpoints(model, name, new, value).await?;
            }
            None => {
                return Err(Error::UnsupportedOperation(format!(
                    "{name} is not writable on {model:?}"
                )));
            }
        }
        Ok(())
    }

    async fn write_flat_setpoints(&mut self, model: VelisModel, name: &str, new: f64, value: Value) -> Result<()> {
        let old_comfort = self.state.get(prop::COMFORT_TEMP).and_then(as_f64);
        let old_reduced = self.state.get(prop::REDUCED_TEMP).and_then(as_f64);
        let (comfort, reduced, partner) = if name == prop::COMFORT_TEMP {
            (new, old_reduced.unwrap_or(0.0), prop::REDUCED_TEMP)
        } else {
            (old_comfort.unwrap_or(0.0), new, prop::COMFORT_TEMP)
        };

        let path = protocol::velis_action_path(model.plant_data(), &self.attributes.gateway, "temperatures");
        let body = protocol::paired_setpoint(
            ("comfort", "reduced"),
            (comfort, reduced),
            Some((old_comfort, old_reduced)),
        );
        self.session.post(&path, &[], &body).await?;

        self.state.insert(name.to_string(), value);
        self.state
            .entry(partner)
            .or_insert_with(|| json!(0.0));
        Ok(())
    }

    /// Write one plant setting; the old value is read from the mirror now.
    pub(super) async fn write_flat_setting(&mut self, model: VelisModel, name: &str, value: Value) -> Result<()> {
        let new = wire_setting(&value);
        let old = self.settings.get(name).map(wire_setting).unwrap_or(Value::Null);
        debug!(gateway = %self.attributes.gateway, setting = name, "writing plant setting");

        let path = protocol::plant_settings_path(model.plant_data(), &self.attributes.gateway);
        self.session
            .post(&path, &[], &protocol::plant_setting(name, new, old))
            .await?;
        self.settings.insert(name.to_string(), value);
        Ok(())
    }

    pub(super) fn flat_target_temperature(&self, model: VelisModel) -> Option<f64> {
        if model == VelisModel::Lux
            && self.state.get(prop::MODE).and_then(Value::as_i64) == LUX_MODES.code_of("BOOST")
        {
            return self.flat_max_setpoint_bounds(model).1;
        }
        self.state.get(model.target_temperature_key()).and_then(as_f64)
    }

    pub(super) fn flat_max_setpoint_bounds(&self, model: VelisModel) -> (Option<f64>, Option<f64>) {
        let (min, max) = model.max_setpoint_bounds();
        (
            self.settings.get(min).and_then(as_f64),
            self.settings.get(max).and_then(as_f64),
        )
    }

    pub(super) fn flat_temperature_range(&self, model: VelisModel) -> (Option<f64>, Option<f64>, Option<f64>) {
        (
            Some(VELIS_MIN_TEMPERATURE),
            self.settings.get(model.max_setpoint_setting()).and_then(as_f64),
            Some(1.0),
        )
    }
}

/// Plant settings carry booleans as 1.0 / 0.0.
fn wire_setting(value: &Value) -> Value {
    match value {
        Value::Bool(true) => json!(1.0),
        Value::Bool(false) => json!(0.0),
        other => other.clone(),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn dispatch_by_whe_type() {
        assert_eq!(VelisModel::for_whe_type(WheType::Andris2), VelisModel::Evo);
        assert_eq!(VelisModel::for_whe_type(WheType::Evo2), VelisModel::Evo);
        assert_eq!(VelisModel::for_whe_type(WheType::Lux2), VelisModel::Lux2);
        assert_eq!(VelisModel::for_whe_type(WheType::NuosSplit).plant_data(), PlantData::Slp);
        assert_eq!(VelisModel::for_whe_type(WheType::LydosHybrid).plant_data(), PlantData::Se);
    }

    #[test]
    fn routes_follow_the_model() {
        assert!(matches!(write_route(VelisModel::Evo, "mode"), Some(FlatWrite::New("mode"))));
        assert!(matches!(
            write_route(VelisModel::NuosSplit, "opMode"),
            Some(FlatWrite::New("operativeMode"))
        ));
        assert!(write_route(VelisModel::NuosSplit, "reqTemp").is_none());
        assert!(matches!(write_route(VelisModel::NuosSplit, "reducedTemp"), Some(FlatWrite::Paired)));
        assert!(matches!(
            write_route(VelisModel::Lux2, "pwrOpt"),
            Some(FlatWrite::RawBool("switchPowerOption"))
        ));
        assert!(write_route(VelisModel::Lux, "pwrOpt").is_none());
        assert!(write_route(VelisModel::LydosHybrid, "eco").is_none());
        assert!(matches!(write_route(VelisModel::LydosHybrid, "on"), Some(FlatWrite::RawBool("switch"))));
    }

    #[test]
    fn settings_send_booleans_as_numbers() {
        assert_eq!(wire_setting(&json!(true)), json!(1.0));
        assert_eq!(wire_setting(&json!(false)), json!(0.0));
        assert_eq!(wire_setting(&json!(65)), json!(65));
    }
}
