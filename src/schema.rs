//! Wire names used by the cloud for properties, settings and features.

/// Fields of a described property (item-list entries and nested zone values).
pub mod field {
    pub const VALUE: &str = "value";
    pub const OPTIONS: &str = "options";
    pub const OPT_TEXTS: &str = "optTexts";
    pub const UNIT: &str = "unit";
    pub const MIN: &str = "min";
    pub const MAX: &str = "max";
    pub const STEP: &str = "step";
    pub const DECIMALS: &str = "decimals";
    pub const ZONE: &str = "zone";
    pub const EXPIRES_ON: &str = "expiresOn";
    pub const ALLOWED_OPTIONS: &str = "allowedOptions";
}

pub mod feature {
    pub const DHW_MODE_CHANGEABLE: &str = "dhwModeChangeable";
    pub const HAS_BOILER: &str = "hasBoiler";
    pub const HAS_METERING: &str = "hasMetering";
    pub const HYBRID_SYS: &str = "hybridSys";
    pub const BUFFER_TIME_PROG_AVAILABLE: &str = "bufferTimeProgAvailable";
    pub const PILOT_SUPPORTED: &str = "pilotSupported";
    pub const SOLAR: &str = "solar";
    pub const ZONES: &str = "zones";
}

/// Flags derived locally, never sent by the server.
pub mod custom_feature {
    pub const HAS_DHW: &str = "hasDhw";
    pub const HAS_OUTSIDE_TEMP: &str = "hasOutsideTemp";
    pub const HAS_DHW_STORAGE_TEMP: &str = "DhwStorageTemperature";
    pub const HAS_CH_FLOW_TEMP: &str = "ChFlowTemp";
    pub const HAS_QUIET_MODE: &str = "IsQuite";
}

/// Device-wide items of the item-list family (zone 0).
pub mod device_property {
    pub const PLANT_MODE: &str = "PlantMode";
    pub const IS_FLAME_ON: &str = "IsFlameOn";
    pub const IS_HEATING_PUMP_ON: &str = "IsHeatingPumpOn";
    pub const HOLIDAY: &str = "Holiday";
    pub const OUTSIDE_TEMP: &str = "OutsideTemp";
    pub const WEATHER: &str = "Weather";
    pub const HEATING_CIRCUIT_PRESSURE: &str = "HeatingCircuitPressure";
    pub const CH_FLOW_TEMP: &str = "ChFlowTemp";
    pub const CH_FLOW_SETPOINT_TEMP: &str = "ChFlowSetpointTemp";
    pub const DHW_TEMP: &str = "DhwTemp";
    pub const DHW_STORAGE_TEMPERATURE: &str = "DhwStorageTemperature";
    pub const DHW_TIMEPROG_COMFORT_TEMP: &str = "DhwTimeProgComfortTemp";
    pub const DHW_TIMEPROG_ECONOMY_TEMP: &str = "DhwTimeProgEconomyTemp";
    pub const DHW_MODE: &str = "DhwMode";
    pub const AUTOMATIC_THERMOREGULATION: &str = "AutomaticThermoregulation";
    pub const ANTILEGIONELLA_ON_OFF: &str = "AntilegionellaOnOff";
    pub const ANTILEGIONELLA_TEMP: &str = "AntilegionellaTemp";
    pub const ANTILEGIONELLA_FREQ: &str = "AntilegionellaFreq";
    pub const HYBRID_MODE: &str = "HybridMode";
    pub const BUFFER_CONTROL_MODE: &str = "BufferControlMode";
    pub const BUFFER_TIME_PROG_COMFORT_HEATING_TEMP: &str = "BufferTimeProgComfortHeatingTemp";
    pub const BUFFER_TIME_PROG_ECONOMY_HEATING_TEMP: &str = "BufferTimeProgEconomyHeatingTemp";
    pub const BUFFER_TIME_PROG_COMFORT_COOLING_TEMP: &str = "BufferTimeProgComfortCoolingTemp";
    pub const BUFFER_TIME_PROG_ECONOMY_COOLING_TEMP: &str = "BufferTimeProgEconomyCoolingTemp";
    pub const IS_QUITE: &str = "IsQuite";

    pub const ALL: &[&str] = &[
        PLANT_MODE,
        IS_FLAME_ON,
        IS_HEATING_PUMP_ON,
        HOLIDAY,
        OUTSIDE_TEMP,
        WEATHER,
        HEATING_CIRCUIT_PRESSURE,
        CH_FLOW_TEMP,
        CH_FLOW_SETPOINT_TEMP,
        DHW_TEMP,
        DHW_STORAGE_TEMPERATURE,
        DHW_TIMEPROG_COMFORT_TEMP,
        DHW_TIMEPROG_ECONOMY_TEMP,
        DHW_MODE,
        AUTOMATIC_THERMOREGULATION,
        ANTILEGIONELLA_ON_OFF,
        ANTILEGIONELLA_TEMP,
        ANTILEGIONELLA_FREQ,
        HYBRID_MODE,
        BUFFER_CONTROL_MODE,
        BUFFER_TIME_PROG_COMFORT_HEATING_TEMP,
        BUFFER_TIME_PROG_ECONOMY_HEATING_TEMP,
        BUFFER_TIME_PROG_COMFORT_COOLING_TEMP,
        BUFFER_TIME_PROG_ECONOMY_COOLING_TEMP,
        IS_QUITE,
    ];
}

/// Per-zone items of the item-list family.
pub mod thermostat_property {
    pub const ZONE_MEASURED_TEMP: &str = "ZoneMeasuredTemp";
    pub const ZONE_DESIRED_TEMP: &str = "ZoneDesiredTemp";
    pub const ZONE_COMFORT_TEMP: &str = "ZoneComfortTemp";
    pub const ZONE_MODE: &str = "ZoneMode";
    pub const ZONE_HEAT_REQUEST: &str = "ZoneHeatRequest";
    pub const ZONE_ECONOMY_TEMP: &str = "ZoneEconomyTemp";
    pub const ZONE_DEROGA: &str = "ZoneDeroga";
    pub const IS_ZONE_PILOT_ON: &str = "IsZonePilotOn";
    pub const VIRT_TEMP_OFFSET_HEAT: &str = "VirtTempOffsetHeat";
    pub const HEATING_FLOW_TEMP: &str = "HeatingFlowTemp";
    pub const HEATING_FLOW_OFFSET: &str = "HeatingFlowOffset";
    pub const COOLING_FLOW_TEMP: &str = "CoolingFlowTemp";
    pub const COOLING_FLOW_OFFSET: &str = "CoolingFlowOffset";
    pub const ZONE_NAME: &str = "ZoneName";
    pub const VIRT_TEMP_SETPOINT_HEAT: &str = "VirtTempSetpointHeat";
    pub const VIRT_TEMP_SETPOINT_COOL: &str = "VirtTempSetpointCool";
    pub const VIRT_COMFORT_TEMP: &str = "VirtComfortTemp";
    pub const VIRT_REDUCED_TEMP: &str = "VirtReducedTemp";
    pub const VIRT_TEMP_OFFSET_COOL: &str = "VirtTempOffsetCool";

    pub const ALL: &[&str] = &[
        ZONE_MEASURED_TEMP,
        ZONE_DESIRED_TEMP,
        ZONE_COMFORT_TEMP,
        ZONE_MODE,
        ZONE_HEAT_REQUEST,
        ZONE_ECONOMY_TEMP,
        ZONE_DEROGA,
        IS_ZONE_PILOT_ON,
        VIRT_TEMP_OFFSET_HEAT,
        HEATING_FLOW_TEMP,
        HEATING_FLOW_OFFSET,
        COOLING_FLOW_TEMP,
        COOLING_FLOW_OFFSET,
        ZONE_NAME,
        VIRT_TEMP_SETPOINT_HEAT,
        VIRT_TEMP_SETPOINT_COOL,
        VIRT_COMFORT_TEMP,
        VIRT_REDUCED_TEMP,
        VIRT_TEMP_OFFSET_COOL,
    ];
}

/// Flat-family (Velis) plant data keys.
pub mod velis_property {
    pub const MODE: &str = "mode";
    pub const ON: &str = "on";
    pub const PROC_REQ_TEMP: &str = "procReqTemp";
    pub const TEMP: &str = "temp";
    pub const REQ_TEMP: &str = "reqTemp";
    pub const AV_SHW: &str = "avShw";
    pub const HEAT_REQ: &str = "heatReq";
    pub const ANTI_LEG: &str = "antiLeg";
    pub const ECO: &str = "eco";
    pub const PWR_OPT: &str = "pwrOpt";
    pub const RM_TM: &str = "rmTm";
    pub const BOOST_REQ_TEMP: &str = "boostReqTemp";
    pub const WATER_TEMP: &str = "waterTemp";
    pub const COMFORT_TEMP: &str = "comfortTemp";
    pub const REDUCED_TEMP: &str = "reducedTemp";
    pub const OP_MODE: &str = "opMode";
    pub const BOOST_ON: &str = "boostOn";
    pub const HP_STATE: &str = "hpState";
}

pub mod med_setting {
    pub const ANTILEGIONELLA_ON_OFF: &str = "MedAntilegionellaOnOff";
    pub const HEATING_RATE: &str = "MedHeatingRate";
    pub const MAX_SETPOINT_TEMPERATURE: &str = "MedMaxSetpointTemperature";
    pub const MAX_SETPOINT_TEMPERATURE_MAX: &str = "MedMaxSetpointTemperatureMax";
    pub const MAX_SETPOINT_TEMPERATURE_MIN: &str = "MedMaxSetpointTemperatureMin";
}

pub mod se_setting {
    pub const ANTILEGIONELLA_ON_OFF: &str = "SeAntilegionellaOnOff";
    pub const ANTI_COOLING_ON_OFF: &str = "SeAntiCoolingOnOff";
    pub const NIGHT_MODE_ON_OFF: &str = "SeNightModeOnOff";
    pub const PERMANENT_BOOST_ON_OFF: &str = "SePermanentBoostOnOff";
    pub const MAX_SETPOINT_TEMPERATURE: &str = "SeMaxSetpointTemperature";
    pub const MAX_SETPOINT_TEMPERATURE_MAX: &str = "SeMaxSetpointTemperatureMax";
    pub const MAX_SETPOINT_TEMPERATURE_MIN: &str = "SeMaxSetpointTemperatureMin";
    pub const ANTI_COOLING_TEMPERATURE: &str = "SeAntiCoolingTemperature";
    pub const MAX_GREEN_SETPOINT_TEMPERATURE: &str = "SeMaxGreenSetpointTemperature";
    pub const HEATING_RATE: &str = "SeHeatingRate";
    pub const NIGHT_BEGIN_AS_MINUTES: &str = "SeNightBeginAsMinutes";
    pub const NIGHT_END_AS_MINUTES: &str = "SeNightEndAsMinutes";
}

pub mod slp_setting {
    pub const MAX_GREEN_TEMPERATURE: &str = "SlpMaxGreenTemperature";
    pub const MAX_SETPOINT_TEMPERATURE: &str = "SlpMaxSetpointTemperature";
    pub const MAX_SETPOINT_TEMPERATURE_MIN: &str = "SlpMaxSetpointTemperatureMin";
    pub const MAX_SETPOINT_TEMPERATURE_MAX: &str = "SlpMaxSetpointTemperatureMax";
    pub const MIN_SETPOINT_TEMPERATURE: &str = "SlpMinSetpointTemperature";
    pub const MIN_SETPOINT_TEMPERATURE_MIN: &str = "SlpMinSetpointTemperatureMin";
    pub const MIN_SETPOINT_TEMPERATURE_MAX: &str = "SlpMinSetpointTemperatureMax";
    pub const ANTILEGIONELLA_ON_OFF: &str = "SlpAntilegionellaOnOff";
    pub const PRE_HEATING_ON_OFF: &str = "SlpPreHeatingOnOff";
    pub const HEATING_RATE: &str = "SlpHeatingRate";
    pub const HC_HP_MODE: &str = "SlpHcHpMode";
}

/// Zoned-family (BSB) plant data keys.
pub mod bsb_property {
    pub const DHW_COMF_TEMP: &str = "dhwComfTemp";
    pub const DHW_ENABLED: &str = "dhwEnabled";
    pub const DHW_MODE: &str = "dhwMode";
    pub const DHW_REDU_TEMP: &str = "dhwReduTemp";
    pub const DHW_TEMP: &str = "dhwTemp";
    pub const FLAME: &str = "flame";
    pub const HAS_OUT_TEMP: &str = "hasOutTemp";
    pub const OUT_TEMP: &str = "outTemp";
    pub const ZONES: &str = "zones";
}

pub mod bsb_zone_property {
    pub const CH_COMF_TEMP: &str = "chComfTemp";
    pub const CH_RED_TEMP: &str = "chRedTemp";
    pub const COOLING_ON: &str = "coolingOn";
    pub const DESIRED_ROOM_TEMP: &str = "desiredRoomTemp";
    pub const HEATING_ON: &str = "heatingOn";
    pub const MODE: &str = "mode";
    pub const ROOM_TEMP: &str = "roomTemp";
}

pub mod consumption_setting {
    pub const CURRENCY: &str = "currency";
    pub const GAS_TYPE: &str = "gasType";
    pub const GAS_ENERGY_UNIT: &str = "gasEnergyUnit";
    pub const ELEC_COST: &str = "elecCost";
    pub const GAS_COST: &str = "gasCost";
}
