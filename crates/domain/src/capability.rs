//! Capabilities — named remote-device features (e.g. `switch`).

use std::fmt;

use serde::{Deserialize, Serialize};

/// A capability id as reported by the device cloud.
///
/// The variants cover every capability the bridge reads or commands;
/// anything else is preserved verbatim in [`Other`](Self::Other).
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(from = "String", into = "String")]
pub enum Capability {
    Switch,
    TemperatureMeasurement,
    ThermostatCoolingSetpoint,
    AirConditionerMode,
    AirConditionerFanMode,
    RelativeHumidityMeasurement,
    Other(String),
}

/// Capabilities a device must expose to be bridged as an air conditioner.
pub const REQUIRED_CAPABILITIES: [Capability; 3] = [
    Capability::Switch,
    Capability::TemperatureMeasurement,
    Capability::ThermostatCoolingSetpoint,
];

impl Capability {
    /// The capability id as used on the wire.
    #[must_use]
    pub fn as_str(&self) -> &str {
        match self {
            Self::Switch => "switch",
            Self::TemperatureMeasurement => "temperatureMeasurement",
            Self::ThermostatCoolingSetpoint => "thermostatCoolingSetpoint",
            Self::AirConditionerMode => "airConditionerMode",
            Self::AirConditionerFanMode => "airConditionerFanMode",
            Self::RelativeHumidityMeasurement => "relativeHumidityMeasurement",
            Self::Other(id) => id,
        }
    }
}

impl From<&str> for Capability {
    fn from(id: &str) -> Self {
        match id {
            "switch" => Self::Switch,
            "temperatureMeasurement" => Self::TemperatureMeasurement,
            "thermostatCoolingSetpoint" => Self::ThermostatCoolingSetpoint,
            "airConditionerMode" => Self::AirConditionerMode,
            "airConditionerFanMode" => Self::AirConditionerFanMode,
            "relativeHumidityMeasurement" => Self::RelativeHumidityMeasurement,
            other => Self::Other(other.to_string()),
        }
    }
}

impl From<String> for Capability {
    fn from(id: String) -> Self {
        match Self::from(id.as_str()) {
            Self::Other(_) => Self::Other(id),
            known => known,
        }
    }
}

impl From<Capability> for String {
    fn from(cap: Capability) -> Self {
        match cap {
            Capability::Other(id) => id,
            known => known.as_str().to_string(),
        }
    }
}

impl fmt::Display for Capability {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn should_parse_known_capability() {
        assert_eq!(
            Capability::from("thermostatCoolingSetpoint"),
            Capability::ThermostatCoolingSetpoint
        );
    }

    #[test]
    fn should_keep_unknown_capability_verbatim() {
        let cap = Capability::from("healthCheck");
        assert_eq!(cap, Capability::Other("healthCheck".to_string()));
        assert_eq!(cap.as_str(), "healthCheck");
    }

    #[test]
    fn should_deserialize_from_plain_string() {
        let cap: Capability = serde_json::from_str("\"airConditionerMode\"").unwrap();
        assert_eq!(cap, Capability::AirConditionerMode);
    }

    #[test]
    fn should_serialize_to_wire_id() {
        let json = serde_json::to_string(&Capability::RelativeHumidityMeasurement).unwrap();
        assert_eq!(json, "\"relativeHumidityMeasurement\"");
    }

    #[test]
    fn should_require_switch_temperature_and_setpoint() {
        assert!(REQUIRED_CAPABILITIES.contains(&Capability::Switch));
        assert!(REQUIRED_CAPABILITIES.contains(&Capability::TemperatureMeasurement));
        assert!(REQUIRED_CAPABILITIES.contains(&Capability::ThermostatCoolingSetpoint));
        assert!(!REQUIRED_CAPABILITIES.contains(&Capability::AirConditionerMode));
    }
}
