use serde_json::{Map, Value};

use crate::types::{DeviceAttributes, SystemType, WheType};

/// Capability flags of one device: the server's feature bag plus flags
/// derived locally from live state.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct Features {
    server: Map<String, Value>,
    custom: Map<String, Value>,
}

impl Features {
    /// Replace the server bag. Custom flags survive a refetch.
    pub fn set_server(&mut self, server: Map<String, Value>) {
        self.server = server;
    }

    pub fn server(&self) -> &Map<String, Value> {
        &self.server
    }

    pub fn server_value(&self) -> Value {
        Value::Object(self.server.clone())
    }

    pub fn is_fetched(&self) -> bool {
        !self.server.is_empty()
    }

    pub fn server_flag(&self, name: &str) -> Option<&Value> {
        self.server.get(name)
    }

    pub(crate) fn set_server_flag(&mut self, name: &str, value: Value) {
        self.server.insert(name.to_string(), value);
    }

    pub fn custom(&self, name: &str) -> Option<&Value> {
        self.custom.get(name)
    }

    pub(crate) fn set_custom(&mut self, name: &str, value: bool) {
        self.custom.insert(name.to_string(), Value::Bool(value));
    }

    /// Compute a custom flag only if it has never been set.
    pub(crate) fn derive_custom_once(&mut self, name: &str, derive: impl FnOnce() -> bool) {
        if !self.custom.contains_key(name) {
            let value = derive();
            self.custom.insert(name.to_string(), Value::Bool(value));
        }
    }

    /// Look a flag up in the server bag, then the custom flags, then the raw
    /// attributes. The first source that knows the name decides.
    pub fn lookup<'a>(&'a self, name: &str, attributes: &'a DeviceAttributes) -> Option<&'a Value> {
        self.server
            .get(name)
            .or_else(|| self.custom.get(name))
            .or_else(|| attributes.extra.get(name))
    }

    pub fn is_capability_available(
        &self,
        attributes: &DeviceAttributes,
        names: &[&str],
        system_types: Option<&[SystemType]>,
        whe_types: Option<&[WheType]>,
    ) -> bool {
        if let Some(allowed) = system_types {
            match attributes.system_type() {
                Some(t) if allowed.contains(&t) => {}
                _ => return false,
            }
        }
        if let Some(allowed) = whe_types {
            match attributes.whe_type() {
                Some(t) if allowed.contains(&t) => {}
                _ => return false,
            }
        }
        names
            .iter()
            .all(|name| matches!(self.lookup(name, attributes), Some(Value::Bool(true))))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    fn attributes(sys: i64, whe: Option<i64>) -> DeviceAttributes {
        let mut raw = json!({"gw": "GW", "sys": sys, "hpmpSys": true});
        if let Some(whe) = whe {
            raw["wheType"] = json!(whe);
        }
        serde_json::from_value(raw).unwrap()
    }

    fn features(server: Value) -> Features {
        let mut f = Features::default();
        if let Value::Object(map) = server {
            f.set_server(map);
        }
        f
    }

    #[test]
    fn type_restriction_beats_true_flags() {
        let f = features(json!({"hasBoiler": true}));
        let attrs = attributes(3, None);
        assert!(f.is_capability_available(&attrs, &["hasBoiler"], Some(&[SystemType::Galevo]), None));
        assert!(!f.is_capability_available(&attrs, &["hasBoiler"], Some(&[SystemType::Bsb]), None));
    }

    #[test]
    fn whe_restriction_needs_a_known_subtype() {
        let f = Features::default();
        assert!(!f.is_capability_available(&attributes(4, None), &[], None, Some(&[WheType::Lux])));
        assert!(f.is_capability_available(&attributes(4, Some(8)), &[], None, Some(&[WheType::Lux])));
    }

    #[test]
    fn any_false_or_absent_flag_fails() {
        let mut f = features(json!({"hasBoiler": true, "solar": false}));
        let attrs = attributes(3, None);
        assert!(!f.is_capability_available(&attrs, &["hasBoiler", "solar"], None, None));
        assert!(!f.is_capability_available(&attrs, &["hasBoiler", "missing"], None, None));
        f.set_custom("hasOutsideTemp", true);
        assert!(f.is_capability_available(&attrs, &["hasBoiler", "hasOutsideTemp"], None, None));
    }

    #[test]
    fn attributes_are_the_last_source() {
        let f = features(json!({"hasBoiler": true}));
        let attrs = attributes(3, None);
        assert!(f.is_capability_available(&attrs, &["hpmpSys"], None, None));
    }

    #[test]
    fn first_source_with_the_name_wins() {
        let mut f = features(json!({"hasOutsideTemp": false}));
        f.set_custom("hasOutsideTemp", true);
        assert!(!f.is_capability_available(&attributes(3, None), &["hasOutsideTemp"], None, None));
    }

    #[test]
    fn derive_once_keeps_first_answer() {
        let mut f = Features::default();
        f.derive_custom_once("hasOutsideTemp", || true);
        f.derive_custom_once("hasOutsideTemp", || false);
        assert_eq!(f.custom("hasOutsideTemp"), Some(&Value::Bool(true)));
    }

    #[test]
    fn refetch_keeps_custom_flags() {
        let mut f = features(json!({"hasBoiler": true}));
        f.set_custom("hasDhw", true);
        f.set_server(Map::new());
        assert_eq!(f.custom("hasDhw"), Some(&Value::Bool(true)));
        assert!(!f.is_fetched());
    }
}
