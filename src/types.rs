use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};

/// Identity of one plant as returned by discovery.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct DeviceAttributes {
    #[serde(rename = "gw")]
    pub gateway: String,
    #[serde(rename = "sys", default)]
    pub system_type_code: Option<i64>,
    #[serde(default)]
    pub name: Option<String>,
    #[serde(rename = "sn", default)]
    pub serial_number: Option<String>,
    #[serde(rename = "fwVer", default)]
    pub firmware_version: Option<String>,
    #[serde(rename = "wheType", default)]
    pub whe_type_code: Option<i64>,
    #[serde(rename = "wheModelType", default)]
    pub whe_model_type: Option<i64>,
    /// Every other attribute the cloud sent along.
    #[serde(flatten)]
    pub extra: Map<String, Value>,
}

impl DeviceAttributes {
    pub fn system_type(&self) -> Option<SystemType> {
        self.system_type_code.and_then(SystemType::from_code)
    }

    pub fn whe_type(&self) -> Option<WheType> {
        self.whe_type_code.and_then(WheType::from_code)
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum SystemType {
    Galileo1,
    Galileo2,
    Galevo,
    Velis,
    Bsb,
}

impl SystemType {
    pub fn code(&self) -> i64 {
        match self {
            SystemType::Galileo1 => 1,
            SystemType::Galileo2 => 2,
            SystemType::Galevo => 3,
            SystemType::Velis => 4,
            SystemType::Bsb => 5,
        }
    }

    pub fn from_code(code: i64) -> Option<Self> {
        match code {
            1 => Some(SystemType::Galileo1),
            2 => Some(SystemType::Galileo2),
            3 => Some(SystemType::Galevo),
            4 => Some(SystemType::Velis),
            5 => Some(SystemType::Bsb),
            _ => None,
        }
    }
}

/// Water-heater model family reported by Velis plants.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum WheType {
    Evo,
    LydosHybrid,
    NuosSplit,
    Andris2,
    Evo2,
    Lux2,
    Lux,
}

impl WheType {
    pub fn code(&self) -> i64 {
        match self {
            WheType::Evo => 1,
            WheType::LydosHybrid => 2,
            WheType::NuosSplit => 4,
            WheType::Andris2 => 5,
            WheType::Evo2 => 6,
            WheType::Lux2 => 7,
            WheType::Lux => 8,
        }
    }

    pub fn from_code(code: i64) -> Option<Self> {
        match code {
            1 => Some(WheType::Evo),
            2 => Some(WheType::LydosHybrid),
            4 => Some(WheType::NuosSplit),
            5 => Some(WheType::Andris2),
            6 => Some(WheType::Evo2),
            7 => Some(WheType::Lux2),
            8 => Some(WheType::Lux),
            _ => None,
        }
    }
}

/// A fixed enumeration of symbolic names and their wire codes.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct CodeTable(&'static [(&'static str, i64)]);

impl CodeTable {
    pub const fn new(entries: &'static [(&'static str, i64)]) -> Self {
        Self(entries)
    }

    pub fn code_of(&self, name: &str) -> Option<i64> {
        self.0.iter().find(|(n, _)| *n == name).map(|(_, c)| *c)
    }

    pub fn name_of(&self, code: i64) -> Option<&'static str> {
        self.0.iter().find(|(_, c)| *c == code).map(|(n, _)| *n)
    }

    pub fn names(&self) -> Vec<&'static str> {
        self.0.iter().map(|(n, _)| *n).collect()
    }

    pub fn codes(&self) -> Vec<i64> {
        self.0.iter().map(|(_, c)| *c).collect()
    }
}

pub const EVO_MODES: CodeTable = CodeTable::new(&[("MANUAL", 1), ("PROGRAM", 5)]);

pub const LUX_MODES: CodeTable = CodeTable::new(&[("MANUAL", 1), ("PROGRAM", 5), ("BOOST", 9)]);

pub const LYDOS_MODES: CodeTable =
    CodeTable::new(&[("IMEMORY", 1), ("GREEN", 2), ("PROGRAM", 6), ("BOOST", 7)]);

pub const NUOS_SPLIT_MODES: CodeTable =
    CodeTable::new(&[("GREEN", 0), ("COMFORT", 1), ("FAST", 2), ("IMEMORY", 3)]);

pub const BSB_OPERATIVE_MODES: CodeTable = CodeTable::new(&[("OFF", 0), ("ON", 1)]);

pub const BSB_ZONE_MODES: CodeTable = CodeTable::new(&[
    ("OFF", 0),
    ("TIME_PROGRAM", 1),
    ("MANUAL", 2),
    ("MANUAL_NIGHT", 3),
]);

pub const ZONE_MODES: CodeTable = CodeTable::new(&[
    ("OFF", 0),
    ("MANUAL_NIGHT", 1),
    ("MANUAL", 2),
    ("TIME_PROGRAM", 3),
]);

pub const PLANT_MODES: CodeTable = CodeTable::new(&[
    ("SUMMER", 0),
    ("WINTER", 1),
    ("HEATING_ONLY", 2),
    ("COOLING", 3),
    ("COOLING_ONLY", 4),
    ("OFF", 5),
    ("HOLIDAY", 6),
]);

pub const GAS_TYPES: CodeTable = CodeTable::new(&[
    ("NATURAL_GAS", 0),
    ("LPG", 1),
    ("AIR_PROPANED", 2),
    ("GPO", 3),
    ("PROPANE", 4),
]);

pub const GAS_ENERGY_UNITS: CodeTable = CodeTable::new(&[
    ("KWH", 0),
    ("GIGA_JOULE", 1),
    ("THERM", 2),
    ("MEGA_BTU", 3),
    ("SMC", 4),
    ("CUBE_METER", 5),
]);

pub const CURRENCIES: CodeTable = CodeTable::new(&[
    ("ARS", 1),
    ("EUR", 2),
    ("BYN", 3),
    ("CNY", 4),
    ("HRK", 5),
    ("CZK", 6),
    ("DKK", 7),
    ("HKD", 8),
    ("HUF", 9),
    ("IRR", 10),
    ("KZT", 11),
    ("CHF", 12),
    ("MOP", 13),
    ("PLZ", 14),
    ("RON", 15),
    ("RUB", 16),
    ("TRY", 17),
    ("UAH", 18),
    ("GBP", 19),
    ("USD", 20),
]);

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum ConsumptionType {
    CentralHeatingTotalEnergy,
    DomesticHotWaterTotalEnergy,
    CentralHeatingGas,
    DomesticHotWaterHeatingPumpElectricity,
    DomesticHotWaterResistorElectricity,
    DomesticHotWaterGas,
    CentralHeatingElectricity,
    DomesticHotWaterElectricity,
}

impl ConsumptionType {
    pub const ALL: [ConsumptionType; 8] = [
        ConsumptionType::CentralHeatingTotalEnergy,
        ConsumptionType::DomesticHotWaterTotalEnergy,
        ConsumptionType::CentralHeatingGas,
        ConsumptionType::DomesticHotWaterHeatingPumpElectricity,
        ConsumptionType::DomesticHotWaterResistorElectricity,
        ConsumptionType::DomesticHotWaterGas,
        ConsumptionType::CentralHeatingElectricity,
        ConsumptionType::DomesticHotWaterElectricity,
    ];

    pub fn code(&self) -> i64 {
        match self {
            ConsumptionType::CentralHeatingTotalEnergy => 1,
            ConsumptionType::DomesticHotWaterTotalEnergy => 2,
            ConsumptionType::CentralHeatingGas => 7,
            ConsumptionType::DomesticHotWaterHeatingPumpElectricity => 8,
            ConsumptionType::DomesticHotWaterResistorElectricity => 9,
            ConsumptionType::DomesticHotWaterGas => 10,
            ConsumptionType::CentralHeatingElectricity => 20,
            ConsumptionType::DomesticHotWaterElectricity => 21,
        }
    }

    pub fn from_code(code: i64) -> Option<Self> {
        Self::ALL.into_iter().find(|t| t.code() == code)
    }

    /// Name of the custom feature flag recording whether the device reports this series.
    pub fn feature_name(&self) -> &'static str {
        match self {
            ConsumptionType::CentralHeatingTotalEnergy => "CENTRAL_HEATING_TOTAL_ENERGY",
            ConsumptionType::DomesticHotWaterTotalEnergy => "DOMESTIC_HOT_WATER_TOTAL_ENERGY",
            ConsumptionType::CentralHeatingGas => "CENTRAL_HEATING_GAS",
            ConsumptionType::DomesticHotWaterHeatingPumpElectricity => {
                "DOMESTIC_HOT_WATER_HEATING_PUMP_ELECTRICITY"
            }
            ConsumptionType::DomesticHotWaterResistorElectricity => {
                "DOMESTIC_HOT_WATER_RESISTOR_ELECTRICITY"
            }
            ConsumptionType::DomesticHotWaterGas => "DOMESTIC_HOT_WATER_GAS",
            ConsumptionType::CentralHeatingElectricity => "CENTRAL_HEATING_ELECTRICITY",
            ConsumptionType::DomesticHotWaterElectricity => "DOMESTIC_HOT_WATER_ELECTRICITY",
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum ConsumptionTimeInterval {
    LastDay,
    LastWeek,
    LastMonth,
    LastYear,
}

impl ConsumptionTimeInterval {
    pub fn code(&self) -> i64 {
        match self {
            ConsumptionTimeInterval::LastDay => 1,
            ConsumptionTimeInterval::LastWeek => 2,
            ConsumptionTimeInterval::LastMonth => 3,
            ConsumptionTimeInterval::LastYear => 4,
        }
    }

    pub fn from_code(code: i64) -> Option<Self> {
        match code {
            1 => Some(ConsumptionTimeInterval::LastDay),
            2 => Some(ConsumptionTimeInterval::LastWeek),
            3 => Some(ConsumptionTimeInterval::LastMonth),
            4 => Some(ConsumptionTimeInterval::LastYear),
            _ => None,
        }
    }
}

/// One row of the plant's bus error log.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct BusError {
    #[serde(default)]
    pub gw: Option<String>,
    #[serde(default)]
    pub timestamp: Option<String>,
    #[serde(default)]
    pub fault: Option<i64>,
    #[serde(default)]
    pub mult: Option<i64>,
    #[serde(default)]
    pub code: Option<String>,
    #[serde(default)]
    pub pri: Option<i64>,
    #[serde(rename = "errDex", default)]
    pub description: Option<String>,
    #[serde(default)]
    pub res: Option<bool>,
    #[serde(default)]
    pub blk: Option<bool>,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn attributes_keep_unknown_keys() {
        let attrs: DeviceAttributes = serde_json::from_value(serde_json::json!({
            "gw": "F0AD4E0590BD",
            "sys": 4,
            "wheType": 8,
            "name": "Bathroom",
            "hpmpSys": true
        }))
        .unwrap();
        assert_eq!(attrs.gateway, "F0AD4E0590BD");
        assert_eq!(attrs.system_type(), Some(SystemType::Velis));
        assert_eq!(attrs.whe_type(), Some(WheType::Lux));
        assert_eq!(attrs.extra.get("hpmpSys"), Some(&Value::Bool(true)));
        assert!(attrs.serial_number.is_none());
    }

    #[test]
    fn unknown_codes_do_not_resolve() {
        assert_eq!(SystemType::from_code(9), None);
        assert_eq!(WheType::from_code(3), None);
        assert_eq!(ConsumptionType::from_code(5), None);
        assert_eq!(ConsumptionTimeInterval::from_code(0), None);
    }

    #[test]
    fn code_table_lookups() {
        assert_eq!(LUX_MODES.code_of("BOOST"), Some(9));
        assert_eq!(LUX_MODES.code_of("NIGHT"), None);
        assert_eq!(LYDOS_MODES.name_of(6), Some("PROGRAM"));
        assert_eq!(EVO_MODES.names(), vec!["MANUAL", "PROGRAM"]);
        assert_eq!(ZONE_MODES.codes(), vec![0, 1, 2, 3]);
    }

    #[test]
    fn bus_error_parses_partial_rows() {
        let row: BusError = serde_json::from_value(serde_json::json!({
            "gw": "ABC",
            "code": "501",
            "errDex": "No flame detected",
            "blk": true
        }))
        .unwrap();
        assert_eq!(row.code.as_deref(), Some("501"));
        assert_eq!(row.description.as_deref(), Some("No flame detected"));
        assert_eq!(row.blk, Some(true));
        assert!(row.fault.is_none());
    }
}
