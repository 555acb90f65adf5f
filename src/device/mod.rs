//! One device contract over three wire encodings.
//!
//! [`Device`] holds the mirrors of a single plant (features, LiveState,
//! plant settings, energy data) and routes every read and write through the
//! [`Family`] picked at discovery time.

mod flat;
mod items;
mod zoned;

use std::sync::Arc;

use chrono::{DateTime, NaiveDate, Utc};
use serde_json::{json, Map, Value};
use tracing::{debug, warn};

pub use flat::VelisModel;

use crate::energy::{ConsumptionHistory, ConsumptionSequence, EnergyAccount};
use crate::features::Features;
use crate::protocol::{self, DEFAULT_LANGUAGE_TAG};
use crate::schema::{
    bsb_property, bsb_zone_property, consumption_setting, custom_feature, device_property, feature,
    field, slp_setting, thermostat_property, velis_property,
};
use crate::session::Session;
use crate::types::{
    BusError, CodeTable, ConsumptionTimeInterval, ConsumptionType, DeviceAttributes, SystemType,
    WheType, BSB_OPERATIVE_MODES, BSB_ZONE_MODES, CURRENCIES, GAS_ENERGY_UNITS, GAS_TYPES,
    PLANT_MODES, ZONE_MODES,
};
use crate::{Error, Result};

/// Wire encoding of a device's LiveState.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Family {
    /// Velis water heaters: one flat object.
    Flat(VelisModel),
    /// Galevo climate systems: items tagged with a zone.
    ItemList,
    /// BSB plants: described values nested per zone.
    Zoned,
}

impl Family {
    pub fn for_attributes(attributes: &DeviceAttributes) -> Result<Self> {
        let unsupported = || Error::UnsupportedDevice {
            system_type: attributes.system_type_code.unwrap_or(-1),
            whe_type: attributes.whe_type_code,
        };
        match attributes.system_type() {
            Some(SystemType::Galevo) => Ok(Family::ItemList),
            Some(SystemType::Bsb) => Ok(Family::Zoned),
            Some(SystemType::Velis) => attributes
                .whe_type()
                .map(|whe| Family::Flat(VelisModel::for_whe_type(whe)))
                .ok_or_else(unsupported),
            _ => Err(unsupported()),
        }
    }
}

/// Request options shared by every device of one client.
#[derive(Debug, Clone, PartialEq, Eq)]
pub(crate) struct DeviceOptions {
    pub umsys: &'static str,
    pub language_tag: String,
}

impl Default for DeviceOptions {
    fn default() -> Self {
        Self {
            umsys: "si",
            language_tag: DEFAULT_LANGUAGE_TAG.to_string(),
        }
    }
}

pub struct Device {
    session: Arc<Session>,
    attributes: DeviceAttributes,
    family: Family,
    options: DeviceOptions,
    features: Features,
    state: Map<String, Value>,
    settings: Map<String, Value>,
    consumption: ConsumptionHistory,
    consumptions_settings: Map<String, Value>,
    energy_account: EnergyAccount,
    bus_errors: Vec<BusError>,
}

pub(crate) fn as_f64(value: &Value) -> Option<f64> {
    match value {
        Value::Bool(b) => Some(if *b { 1.0 } else { 0.0 }),
        other => other.as_f64(),
    }
}

impl Device {
    pub(crate) fn new(
        session: Arc<Session>,
        attributes: DeviceAttributes,
        options: DeviceOptions,
    ) -> Result<Self> {
        let family = Family::for_attributes(&attributes)?;
        Ok(Self {
            session,
            attributes,
            family,
            options,
            features: Features::default(),
            state: Map::new(),
            settings: Map::new(),
            consumption: ConsumptionHistory::default(),
            consumptions_settings: Map::new(),
            energy_account: EnergyAccount::default(),
            bus_errors: Vec::new(),
        })
    }

    pub fn gateway(&self) -> &str {
        &self.attributes.gateway
    }

    pub fn name(&self) -> Option<&str> {
        self.attributes.name.as_deref()
    }

    pub fn serial_number(&self) -> Option<&str> {
        self.attributes.serial_number.as_deref()
    }

    pub fn firmware_version(&self) -> Option<&str> {
        self.attributes.firmware_version.as_deref()
    }

    pub fn attributes(&self) -> &DeviceAttributes {
        &self.attributes
    }

    pub fn family(&self) -> Family {
        self.family
    }

    pub fn system_type(&self) -> Option<SystemType> {
        self.attributes.system_type()
    }

    pub fn whe_type(&self) -> Option<WheType> {
        self.attributes.whe_type()
    }

    pub fn features(&self) -> &Features {
        &self.features
    }

    /// Raw LiveState mirror.
    pub fn state(&self) -> &Map<String, Value> {
        &self.state
    }

    pub fn plant_settings(&self) -> &Map<String, Value> {
        &self.settings
    }

    pub fn has_metering(&self) -> Option<bool> {
        self.features.server_flag(feature::HAS_METERING).and_then(Value::as_bool)
    }

    pub fn dhw_mode_changeable(&self) -> Option<bool> {
        self.features
            .server_flag(feature::DHW_MODE_CHANGEABLE)
            .and_then(Value::as_bool)
    }

    // Fetching

    /// Refetch the feature bag. Velis plants refresh their plant settings too.
    pub async fn get_features(&mut self) -> Result<()> {
        debug!(gateway = %self.attributes.gateway, "fetching features");
        match self.family {
            Family::Flat(model) => self.fetch_flat_features(model).await,
            Family::ItemList => self.fetch_item_features().await,
            Family::Zoned => self.fetch_zoned_features().await,
        }
    }

    pub async fn update_state(&mut self) -> Result<()> {
        debug!(gateway = %self.attributes.gateway, "updating state");
        match self.family {
            Family::Flat(model) => self.fetch_flat_state(model).await,
            Family::ItemList => self.fetch_item_state().await,
            Family::Zoned => self.fetch_zoned_state().await,
        }
    }

    // Uniform accessors

    pub fn read_property(&self, name: &str, zone: u32) -> Option<Value> {
        self.read_property_field(name, field::VALUE, zone)
    }

    /// One field (`value`, `min`, `max`, `step`, `options`, ...) of a property.
    /// Flat properties have no description, so only `value` answers there.
    pub fn read_property_field(&self, name: &str, field_name: &str, zone: u32) -> Option<Value> {
        match self.family {
            Family::Flat(_) if field_name == field::VALUE => self.state.get(name).cloned(),
            Family::Flat(_) => None,
            Family::ItemList => items::find_item(&self.state, name, zone)
                .and_then(|item| item.get(field_name))
                .cloned(),
            Family::Zoned => zoned::nested_field(&self.state, name, field_name, zone),
        }
    }

    pub fn read_f64(&self, name: &str, zone: u32) -> Option<f64> {
        self.read_property(name, zone).as_ref().and_then(as_f64)
    }

    /// Write one property and mirror it locally once the cloud accepted it.
    /// Flat devices ignore `zone`.
    pub async fn write_property(&mut self, name: &str, value: Value, zone: u32) -> Result<()> {
        match self.family {
            Family::Flat(model) => self.write_flat(model, name, value).await,
            Family::ItemList => {
                let known = self.zones_from_features();
                if zone > 0 && !known.is_empty() && !known.contains(&zone) {
                    return Err(Error::InvalidZone(zone));
                }
                self.write_item(name, value, zone).await
            }
            Family::Zoned => self.write_zoned(name, value, zone).await,
        }
    }

    pub fn is_capability_available(
        &self,
        names: &[&str],
        system_types: Option<&[SystemType]>,
        whe_types: Option<&[WheType]>,
    ) -> bool {
        self.features
            .is_capability_available(&self.attributes, names, system_types, whe_types)
    }

    // Plant settings

    pub fn read_setting(&self, name: &str) -> Option<&Value> {
        self.settings.get(name)
    }

    pub async fn write_plant_setting(&mut self, name: &str, value: Value) -> Result<()> {
        match self.family {
            Family::Flat(model) => self.write_flat_setting(model, name, value).await,
            _ => Err(Error::UnsupportedOperation("plant settings".into())),
        }
    }

    fn velis_model(&self, operation: &str) -> Result<VelisModel> {
        match self.family {
            Family::Flat(model) => Ok(model),
            _ => Err(Error::UnsupportedOperation(operation.into())),
        }
    }

    pub fn anti_legionella(&self) -> Option<bool> {
        let Family::Flat(model) = self.family else {
            return None;
        };
        self.settings
            .get(model.anti_legionella_setting())
            .and_then(as_f64)
            .map(|v| v != 0.0)
    }

    pub async fn set_anti_legionella(&mut self, enabled: bool) -> Result<()> {
        let model = self.velis_model("anti-legionella")?;
        self.write_flat_setting(model, model.anti_legionella_setting(), Value::Bool(enabled))
            .await
    }

    pub fn max_setpoint_temperature(&self) -> Option<f64> {
        let Family::Flat(model) = self.family else {
            return None;
        };
        self.settings.get(model.max_setpoint_setting()).and_then(as_f64)
    }

    /// Allowed range of the max-setpoint setting.
    pub fn max_setpoint_temperature_bounds(&self) -> (Option<f64>, Option<f64>) {
        match self.family {
            Family::Flat(model) => self.flat_max_setpoint_bounds(model),
            _ => (None, None),
        }
    }

    pub async fn set_max_setpoint_temperature(&mut self, temperature: f64) -> Result<()> {
        let model = self.velis_model("max setpoint")?;
        self.write_flat_setting(model, model.max_setpoint_setting(), json!(temperature))
            .await
    }

    pub async fn set_min_setpoint_temperature(&mut self, temperature: f64) -> Result<()> {
        match self.velis_model("min setpoint")? {
            VelisModel::NuosSplit => {
                self.write_flat_setting(
                    VelisModel::NuosSplit,
                    slp_setting::MIN_SETPOINT_TEMPERATURE,
                    json!(temperature),
                )
                .await
            }
            _ => Err(Error::UnsupportedOperation("min setpoint".into())),
        }
    }

    // Water heater view

    pub fn water_heater_current_temperature(&self) -> Option<f64> {
        match self.family {
            Family::Flat(model) => self.read_f64(model.current_temperature_key(), 0),
            Family::ItemList => {
                let storage = self.features.custom(custom_feature::HAS_DHW_STORAGE_TEMP)
                    == Some(&Value::Bool(true));
                if storage {
                    self.read_f64(device_property::DHW_STORAGE_TEMPERATURE, 0)
                } else {
                    self.read_f64(device_property::DHW_TEMP, 0)
                }
            }
            Family::Zoned => self.read_f64(bsb_property::DHW_TEMP, 0),
        }
    }

    /// Lux heaters in BOOST report the max-setpoint maximum as target.
    pub fn water_heater_target_temperature(&self) -> Option<f64> {
        match self.family {
            Family::Flat(model) => self.flat_target_temperature(model),
            Family::ItemList => self.read_f64(device_property::DHW_TEMP, 0),
            Family::Zoned => self.read_f64(bsb_property::DHW_COMF_TEMP, 0),
        }
    }

    pub fn water_heater_reduced_temperature(&self) -> Option<f64> {
        match self.family {
            Family::Flat(model) => model.reduced_temperature_key().and_then(|k| self.read_f64(k, 0)),
            Family::ItemList => None,
            Family::Zoned => self.read_f64(bsb_property::DHW_REDU_TEMP, 0),
        }
    }

    /// Minimum, maximum and step of the target temperature.
    pub fn water_heater_temperature_range(&self) -> (Option<f64>, Option<f64>, Option<f64>) {
        let described = |name: &str| {
            let get = |f: &str| self.read_property_field(name, f, 0).as_ref().and_then(as_f64);
            (get(field::MIN), get(field::MAX), get(field::STEP))
        };
        match self.family {
            Family::Flat(model) => self.flat_temperature_range(model),
            Family::ItemList => described(device_property::DHW_TEMP),
            Family::Zoned => described(bsb_property::DHW_COMF_TEMP),
        }
    }

    pub fn water_heater_mode_value(&self) -> Option<i64> {
        let value = match self.family {
            Family::Flat(model) => self.read_property(model.mode_key(), 0),
            Family::ItemList => self.read_property(device_property::DHW_MODE, 0),
            Family::Zoned => self.read_property(bsb_property::DHW_MODE, 0),
        };
        value.as_ref().and_then(as_f64).map(|v| v as i64)
    }

    /// Mode names paired with their codes, in the device's order.
    pub fn water_heater_modes(&self) -> Vec<(String, i64)> {
        let from_table = |table: CodeTable| -> Vec<(String, i64)> {
            table
                .names()
                .into_iter()
                .map(str::to_string)
                .zip(table.codes())
                .collect()
        };
        match self.family {
            Family::Flat(model) => from_table(model.modes()),
            Family::Zoned => from_table(BSB_OPERATIVE_MODES),
            Family::ItemList => self.described_options(device_property::DHW_MODE, 0),
        }
    }

    pub fn water_heater_mode_name(&self) -> Option<String> {
        let current = self.water_heater_mode_value()?;
        self.water_heater_modes()
            .into_iter()
            .find(|(_, code)| *code == current)
            .map(|(name, _)| name)
    }

    pub async fn set_water_heater_mode(&mut self, name: &str) -> Result<()> {
        let code = self
            .water_heater_modes()
            .into_iter()
            .find(|(n, _)| n == name)
            .map(|(_, code)| code)
            .ok_or_else(|| Error::InvalidMode(name.to_string()))?;
        let key = match self.family {
            Family::Flat(model) => model.mode_key(),
            Family::ItemList => device_property::DHW_MODE,
            Family::Zoned => bsb_property::DHW_MODE,
        };
        self.write_property(key, json!(code), 0).await
    }

    pub async fn set_water_heater_temperature(&mut self, temperature: f64) -> Result<()> {
        let key = match self.family {
            Family::Flat(model) => model.target_temperature_key(),
            Family::ItemList => device_property::DHW_TEMP,
            Family::Zoned => bsb_property::DHW_COMF_TEMP,
        };
        self.write_property(key, json!(temperature), 0).await
    }

    pub async fn set_water_heater_reduced_temperature(&mut self, temperature: f64) -> Result<()> {
        let key = match self.family {
            Family::Flat(model) => model.reduced_temperature_key(),
            Family::Zoned => Some(bsb_property::DHW_REDU_TEMP),
            Family::ItemList => None,
        }
        .ok_or_else(|| Error::UnsupportedOperation("reduced temperature".into()))?;
        self.write_property(key, json!(temperature), 0).await
    }

    pub async fn set_power(&mut self, on: bool) -> Result<()> {
        self.velis_model("power switch")?;
        self.write_property(velis_property::ON, Value::Bool(on), 0).await
    }

    pub async fn set_eco_mode(&mut self, eco: bool) -> Result<()> {
        self.velis_model("eco switch")?;
        self.write_property(velis_property::ECO, Value::Bool(eco), 0).await
    }

    pub async fn set_power_option(&mut self, enabled: bool) -> Result<()> {
        self.velis_model("power option")?;
        self.write_property(velis_property::PWR_OPT, Value::Bool(enabled), 0)
            .await
    }

    pub async fn set_boost(&mut self, boost: bool) -> Result<()> {
        self.velis_model("boost")?;
        self.write_property(velis_property::BOOST_ON, Value::Bool(boost), 0)
            .await
    }

    // Climate view

    /// Zones the device reports: the feature list for Galevo, LiveState for BSB.
    pub fn zone_numbers(&self) -> Vec<u32> {
        match self.family {
            Family::Flat(_) => Vec::new(),
            Family::ItemList => self.zones_from_features(),
            Family::Zoned => self.zones_from_state(),
        }
    }

    fn described_options(&self, name: &str, zone: u32) -> Vec<(String, i64)> {
        let texts = self.read_property_field(name, field::OPT_TEXTS, zone);
        let options = self.read_property_field(name, field::OPTIONS, zone);
        let texts: Vec<String> = texts
            .as_ref()
            .and_then(Value::as_array)
            .map(|t| t.iter().filter_map(Value::as_str).map(str::to_string).collect())
            .unwrap_or_default();
        let options: Vec<i64> = options
            .as_ref()
            .and_then(Value::as_array)
            .map(|o| o.iter().filter_map(Value::as_i64).collect())
            .unwrap_or_default();
        texts
            .into_iter()
            .enumerate()
            .map(|(i, text)| {
                let code = options.get(i).copied().unwrap_or(i as i64);
                (text, code)
            })
            .collect()
    }

    fn item_list(&self, operation: &str) -> Result<()> {
        match self.family {
            Family::ItemList => Ok(()),
            _ => Err(Error::UnsupportedOperation(operation.into())),
        }
    }

    pub fn plant_mode(&self) -> Option<&'static str> {
        if self.family != Family::ItemList {
            return None;
        }
        let code = self.read_f64(device_property::PLANT_MODE, 0)? as i64;
        PLANT_MODES.name_of(code)
    }

    pub async fn set_plant_mode(&mut self, name: &str) -> Result<()> {
        self.item_list("plant mode")?;
        let code = PLANT_MODES
            .code_of(name)
            .ok_or_else(|| Error::InvalidMode(name.to_string()))?;
        self.write_property(device_property::PLANT_MODE, json!(code), 0).await
    }

    fn zone_mode_table(&self) -> Option<(CodeTable, &'static str)> {
        match self.family {
            Family::ItemList => Some((ZONE_MODES, thermostat_property::ZONE_MODE)),
            Family::Zoned => Some((BSB_ZONE_MODES, bsb_zone_property::MODE)),
            Family::Flat(_) => None,
        }
    }

    pub fn zone_mode(&self, zone: u32) -> Option<&'static str> {
        let (table, key) = self.zone_mode_table()?;
        let code = self.read_f64(key, zone)? as i64;
        table.name_of(code)
    }

    pub async fn set_zone_mode(&mut self, name: &str, zone: u32) -> Result<()> {
        let (table, key) = self
            .zone_mode_table()
            .ok_or_else(|| Error::UnsupportedOperation("zone mode".into()))?;
        let code = table
            .code_of(name)
            .ok_or_else(|| Error::InvalidMode(name.to_string()))?;
        self.write_property(key, json!(code), zone).await
    }

    fn zone_setpoint_keys(&self) -> Result<(&'static str, &'static str)> {
        match self.family {
            Family::ItemList => Ok((
                thermostat_property::ZONE_COMFORT_TEMP,
                thermostat_property::ZONE_ECONOMY_TEMP,
            )),
            Family::Zoned => Ok((bsb_zone_property::CH_COMF_TEMP, bsb_zone_property::CH_RED_TEMP)),
            Family::Flat(_) => Err(Error::UnsupportedOperation("zone setpoints".into())),
        }
    }

    pub fn zone_comfort_temperature(&self, zone: u32) -> Option<f64> {
        let (comfort, _) = self.zone_setpoint_keys().ok()?;
        self.read_f64(comfort, zone)
    }

    pub fn zone_reduced_temperature(&self, zone: u32) -> Option<f64> {
        let (_, reduced) = self.zone_setpoint_keys().ok()?;
        self.read_f64(reduced, zone)
    }

    pub fn zone_measured_temperature(&self, zone: u32) -> Option<f64> {
        match self.family {
            Family::ItemList => self.read_f64(thermostat_property::ZONE_MEASURED_TEMP, zone),
            Family::Zoned => self.read_f64(bsb_zone_property::ROOM_TEMP, zone),
            Family::Flat(_) => None,
        }
    }

    pub async fn set_zone_comfort_temperature(&mut self, temperature: f64, zone: u32) -> Result<()> {
        let (comfort, _) = self.zone_setpoint_keys()?;
        self.write_property(comfort, json!(temperature), zone).await
    }

    pub async fn set_zone_reduced_temperature(&mut self, temperature: f64, zone: u32) -> Result<()> {
        let (_, reduced) = self.zone_setpoint_keys()?;
        self.write_property(reduced, json!(temperature), zone).await
    }

    pub async fn set_heating_flow_temperature(&mut self, temperature: f64, zone: u32) -> Result<()> {
        self.item_list("heating flow temperature")?;
        self.write_property(thermostat_property::HEATING_FLOW_TEMP, json!(temperature), zone)
            .await
    }

    pub async fn set_heating_flow_offset(&mut self, offset: f64, zone: u32) -> Result<()> {
        self.item_list("heating flow offset")?;
        self.write_property(thermostat_property::HEATING_FLOW_OFFSET, json!(offset), zone)
            .await
    }

    pub async fn set_automatic_thermoregulation(&mut self, enabled: bool) -> Result<()> {
        self.item_list("automatic thermoregulation")?;
        let value = if enabled { 1.0 } else { 0.0 };
        self.write_property(device_property::AUTOMATIC_THERMOREGULATION, json!(value), 0)
            .await
    }

    pub fn holiday_expires_on(&self) -> Option<String> {
        self.read_property_field(device_property::HOLIDAY, field::EXPIRES_ON, 0)
            .and_then(|v| v.as_str().map(str::to_string))
    }

    /// Start a holiday ending on `end`, or clear it with `None`.
    pub async fn set_holiday(&mut self, end: Option<NaiveDate>) -> Result<()> {
        self.item_list("holiday")?;
        self.write_holiday(end).await
    }

    /// Thermostat time program of one zone, as the cloud returns it.
    pub async fn time_program(&self, zone: u32) -> Result<Option<Value>> {
        self.item_list("time programs")?;
        let path = protocol::time_progs_path(&self.attributes.gateway, zone);
        self.session
            .get(&path, &[("umsys", self.options.umsys.to_string())])
            .await
    }

    // Energy

    fn consumption_filter(&self) -> &'static str {
        match self.family {
            Family::Flat(model) => model.consumption_filter(),
            Family::ItemList => {
                if self.features.custom(custom_feature::HAS_DHW) == Some(&Value::Bool(true)) {
                    "Ch,Dhw"
                } else {
                    "Ch"
                }
            }
            Family::Zoned => "Ch,Dhw",
        }
    }

    /// Refetch consumption sequences. Galevo plants also refresh consumption
    /// settings and the energy account alongside.
    pub async fn update_energy(&mut self) -> Result<()> {
        let gateway = self.attributes.gateway.clone();
        let sequences_path = protocol::consumption_sequences_path(&gateway);
        let query = [("usages", self.consumption_filter().to_string())];

        let sequences = if self.family == Family::ItemList {
            let settings_path = protocol::get_consumptions_settings_path(&gateway);
            let account_path = protocol::energy_account_path(&gateway);
            let empty = json!({});
            let (sequences, settings, account) = tokio::try_join!(
                self.session.get(&sequences_path, &query),
                self.session.post(&settings_path, &[], &empty),
                self.session.get(&account_path, &[]),
            )?;
            self.consumptions_settings = into_map(settings);
            self.energy_account = EnergyAccount::new(into_map(account));
            sequences
        } else {
            self.session.get(&sequences_path, &query).await?
        };

        self.record_sequences(parse_sequences(sequences), Utc::now());
        Ok(())
    }

    fn record_sequences(&mut self, fetched: Vec<ConsumptionSequence>, now: DateTime<Utc>) {
        let first_update = self
            .features
            .custom(ConsumptionType::DomesticHotWaterElectricity.feature_name())
            .is_none();
        let changed = self.consumption.record_at(fetched, now);
        if first_update {
            for kind in ConsumptionType::ALL {
                let present = self
                    .consumption
                    .sequences()
                    .iter()
                    .any(|s| s.matches(kind, ConsumptionTimeInterval::LastDay));
                self.features.set_custom(kind.feature_name(), present);
            }
        }
        if changed {
            debug!(gateway = %self.attributes.gateway, "consumption changed");
        }
    }

    pub fn consumption(&self) -> &ConsumptionHistory {
        &self.consumption
    }

    pub fn consumption_last_value(
        &self,
        kind: ConsumptionType,
        interval: ConsumptionTimeInterval,
    ) -> Option<f64> {
        self.consumption.last_value(kind, interval)
    }

    pub fn consumption_last_changed(&self) -> DateTime<Utc> {
        self.consumption.last_changed()
    }

    pub fn energy_account(&self) -> &EnergyAccount {
        &self.energy_account
    }

    pub fn consumptions_settings(&self) -> &Map<String, Value> {
        &self.consumptions_settings
    }

    fn consumption_setting_name(&self, key: &str, table: CodeTable) -> Option<&'static str> {
        let code = self.consumptions_settings.get(key)?.as_i64()?;
        table.name_of(code)
    }

    pub fn gas_type(&self) -> Option<&'static str> {
        self.consumption_setting_name(consumption_setting::GAS_TYPE, GAS_TYPES)
    }

    pub fn currency(&self) -> Option<&'static str> {
        self.consumption_setting_name(consumption_setting::CURRENCY, CURRENCIES)
    }

    pub fn gas_energy_unit(&self) -> Option<&'static str> {
        self.consumption_setting_name(consumption_setting::GAS_ENERGY_UNIT, GAS_ENERGY_UNITS)
    }

    pub fn electricity_cost(&self) -> Option<f64> {
        self.consumptions_settings
            .get(consumption_setting::ELEC_COST)
            .and_then(Value::as_f64)
    }

    pub fn gas_cost(&self) -> Option<f64> {
        self.consumptions_settings
            .get(consumption_setting::GAS_COST)
            .and_then(Value::as_f64)
    }

    /// The cloud replaces consumption settings wholesale, so the full object
    /// is sent with one key changed.
    pub async fn set_consumptions_setting(&mut self, key: &str, value: Value) -> Result<()> {
        self.item_list("consumption settings")?;
        let mut updated = self.consumptions_settings.clone();
        updated.insert(key.to_string(), value);
        let path = protocol::set_consumptions_settings_path(&self.attributes.gateway);
        self.session
            .post(&path, &[], &Value::Object(updated.clone()))
            .await?;
        self.consumptions_settings = updated;
        Ok(())
    }

    async fn set_consumption_code(&mut self, key: &str, table: CodeTable, name: &str) -> Result<()> {
        let code = table
            .code_of(name)
            .ok_or_else(|| Error::InvalidMode(name.to_string()))?;
        self.set_consumptions_setting(key, json!(code)).await
    }

    pub async fn set_gas_type(&mut self, name: &str) -> Result<()> {
        self.set_consumption_code(consumption_setting::GAS_TYPE, GAS_TYPES, name)
            .await
    }

    pub async fn set_currency(&mut self, name: &str) -> Result<()> {
        self.set_consumption_code(consumption_setting::CURRENCY, CURRENCIES, name)
            .await
    }

    pub async fn set_gas_energy_unit(&mut self, name: &str) -> Result<()> {
        self.set_consumption_code(consumption_setting::GAS_ENERGY_UNIT, GAS_ENERGY_UNITS, name)
            .await
    }

    pub async fn set_electricity_cost(&mut self, cost: f64) -> Result<()> {
        self.set_consumptions_setting(consumption_setting::ELEC_COST, json!(cost))
            .await
    }

    pub async fn set_gas_cost(&mut self, cost: f64) -> Result<()> {
        self.set_consumptions_setting(consumption_setting::GAS_COST, json!(cost))
            .await
    }

    // Bus errors

    pub async fn get_bus_errors(&mut self) -> Result<()> {
        let query = [
            ("gatewayId", self.attributes.gateway.clone()),
            ("blockingOnly", "False".to_string()),
            ("culture", DEFAULT_LANGUAGE_TAG.to_string()),
        ];
        let rows = self.session.get(protocol::BUS_ERRORS_PATH, &query).await?;
        self.bus_errors = match rows {
            Some(Value::Array(rows)) => rows
                .into_iter()
                .filter_map(|row| match serde_json::from_value(row) {
                    Ok(error) => Some(error),
                    Err(e) => {
                        warn!(gateway = %self.attributes.gateway, error = %e, "skipping bus error row");
                        None
                    }
                })
                .collect(),
            _ => Vec::new(),
        };
        Ok(())
    }

    pub fn bus_errors(&self) -> &[BusError] {
        &self.bus_errors
    }
}

impl std::fmt::Debug for Device {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Device")
            .field("gateway", &self.attributes.gateway)
            .field("family", &self.family)
            .finish_non_exhaustive()
    }
}

fn into_map(value: Option<Value>) -> Map<String, Value> {
    match value {
        Some(Value::Object(map)) => map,
        _ => Map::new(),
    }
}

fn parse_sequences(value: Option<Value>) -> Vec<ConsumptionSequence> {
    let Some(Value::Array(rows)) = value else {
        return Vec::new();
    };
    rows.into_iter()
        .filter_map(|row| serde_json::from_value(row).ok())
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;

    fn attrs(raw: Value) -> DeviceAttributes {
        serde_json::from_value(raw).unwrap()
    }

    #[test]
    fn family_dispatch() {
        assert_eq!(
            Family::for_attributes(&attrs(json!({"gw": "A", "sys": 3}))).unwrap(),
            Family::ItemList
        );
        assert_eq!(
            Family::for_attributes(&attrs(json!({"gw": "A", "sys": 5}))).unwrap(),
            Family::Zoned
        );
        assert_eq!(
            Family::for_attributes(&attrs(json!({"gw": "A", "sys": 4, "wheType": 5}))).unwrap(),
            Family::Flat(VelisModel::Evo)
        );
    }

    #[test]
    fn unknown_types_are_unsupported() {
        let err = Family::for_attributes(&attrs(json!({"gw": "A", "sys": 1}))).unwrap_err();
        assert!(matches!(err, Error::UnsupportedDevice { system_type: 1, whe_type: None }));

        let err = Family::for_attributes(&attrs(json!({"gw": "A", "sys": 4, "wheType": 3}))).unwrap_err();
        assert!(matches!(err, Error::UnsupportedDevice { system_type: 4, whe_type: Some(3) }));

        let err = Family::for_attributes(&attrs(json!({"gw": "A"}))).unwrap_err();
        assert!(matches!(err, Error::UnsupportedDevice { system_type: -1, .. }));
    }

    #[test]
    fn malformed_sequences_are_dropped() {
        let parsed = parse_sequences(Some(json!([
            {"k": 7, "p": 1, "v": [1.0, 2.0]},
            {"k": "bad"},
            {"k": 10, "p": 3}
        ])));
        assert_eq!(parsed.len(), 2);
        assert!(parsed[1].values.is_empty());
        assert!(parse_sequences(None).is_empty());
    }

    #[test]
    fn bools_read_as_numbers() {
        assert_eq!(as_f64(&json!(true)), Some(1.0));
        assert_eq!(as_f64(&json!(21.5)), Some(21.5));
        assert_eq!(as_f64(&json!("x")), None);
    }
}
