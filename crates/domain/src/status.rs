//! Device status — the nested capability-value document and its flat record.
//!
//! The device cloud reports status as
//! `components.<component>.<capability>.<attribute>.value`. The bridge only
//! reads a handful of fixed paths from the `main` component and collapses
//! them into a [`StatusRecord`], recreated wholesale on every poll.

use std::collections::HashMap;

use serde::{Deserialize, Serialize};

use crate::capability::Capability;
use crate::characteristic::{
    Active, Characteristic, CharacteristicValue, CurrentHeaterCoolerState,
    TargetHeaterCoolerState,
};
use crate::device::MAIN_COMPONENT;
use crate::error::StatusUnavailableError;
use crate::mode::AirConditionerMode;
use crate::time::Timestamp;

/// A single attribute reading.
#[derive(Debug, Clone, PartialEq, Default, Serialize, Deserialize)]
pub struct AttributeState {
    #[serde(default)]
    pub value: serde_json::Value,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub unit: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub timestamp: Option<String>,
}

/// Attributes of one capability, keyed by attribute name.
pub type CapabilityStatus = HashMap<String, AttributeState>;

/// Capabilities of one component, keyed by capability id.
pub type ComponentStatus = HashMap<String, CapabilityStatus>;

/// Full status document of a device.
#[derive(Debug, Clone, PartialEq, Default, Serialize, Deserialize)]
pub struct DeviceStatus {
    #[serde(default)]
    pub components: HashMap<String, ComponentStatus>,
}

impl DeviceStatus {
    /// The `main` component.
    ///
    /// # Errors
    ///
    /// Returns [`StatusUnavailableError::MissingComponent`] when absent.
    pub fn main_component(&self) -> Result<&ComponentStatus, StatusUnavailableError> {
        self.components
            .get(MAIN_COMPONENT)
            .ok_or_else(|| StatusUnavailableError::MissingComponent {
                component: MAIN_COMPONENT.to_string(),
            })
    }
}

/// Flat snapshot of an air conditioner.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct StatusRecord {
    /// `None` when the device has no `airConditionerMode` capability.
    pub mode: Option<AirConditionerMode>,
    pub active: bool,
    /// `None` when the device has no humidity sensor.
    pub current_humidity: Option<f64>,
    pub current_temperature: f64,
    pub target_temperature: f64,
    pub fan_mode: Option<String>,
    pub fetched_at: Timestamp,
}

impl StatusRecord {
    /// Flatten a full status document.
    ///
    /// # Errors
    ///
    /// Fails when the `main` component is missing or when a required
    /// attribute is absent or malformed.
    pub fn from_status(
        status: &DeviceStatus,
        fetched_at: Timestamp,
    ) -> Result<Self, StatusUnavailableError> {
        Self::from_component(status.main_component()?, fetched_at)
    }

    /// Flatten the `main` component of a status document.
    ///
    /// # Errors
    ///
    /// Fails when a required attribute is absent or malformed.
    pub fn from_component(
        component: &ComponentStatus,
        fetched_at: Timestamp,
    ) -> Result<Self, StatusUnavailableError> {
        let reader = ComponentReader(component);

        // anything but "on" reads as off
        let active = reader.required_str(&Capability::Switch, "switch")? == "on";

        Ok(Self {
            mode: reader
                .optional_str(&Capability::AirConditionerMode, "airConditionerMode")?
                .map(AirConditionerMode::from),
            active,
            current_humidity: reader
                .optional_f64(&Capability::RelativeHumidityMeasurement, "humidity")?,
            current_temperature: reader
                .required_f64(&Capability::TemperatureMeasurement, "temperature")?,
            target_temperature: reader
                .required_f64(&Capability::ThermostatCoolingSetpoint, "coolingSetpoint")?,
            fan_mode: reader
                .optional_str(&Capability::AirConditionerFanMode, "fanMode")?
                .map(str::to_string),
            fetched_at,
        })
    }

    /// Read a host characteristic from the record.
    ///
    /// A switched-off unit reports an inactive current state whatever its
    /// mode. Units without a mode capability are treated as plain coolers.
    ///
    /// # Errors
    ///
    /// Returns [`StatusUnavailableError::MissingAttribute`] when humidity is
    /// requested but the device did not report it.
    pub fn characteristic(
        &self,
        characteristic: Characteristic,
    ) -> Result<CharacteristicValue, StatusUnavailableError> {
        let value = match characteristic {
            Characteristic::Active => Active::from(self.active).into(),
            Characteristic::CurrentHeaterCoolerState => {
                if self.active {
                    self.mode
                        .as_ref()
                        .map_or(
                            CurrentHeaterCoolerState::Cooling,
                            AirConditionerMode::current_state,
                        )
                        .into()
                } else {
                    CurrentHeaterCoolerState::Inactive.into()
                }
            }
            Characteristic::TargetHeaterCoolerState => self
                .mode
                .as_ref()
                .map_or(TargetHeaterCoolerState::Cool, AirConditionerMode::target_state)
                .into(),
            Characteristic::CurrentTemperature => self.current_temperature.into(),
            Characteristic::CoolingThresholdTemperature
            | Characteristic::HeatingThresholdTemperature => self.target_temperature.into(),
            Characteristic::CurrentRelativeHumidity => self
                .current_humidity
                .ok_or_else(|| missing(&Capability::RelativeHumidityMeasurement, "humidity"))?
                .into(),
        };
        Ok(value)
    }
}

struct ComponentReader<'a>(&'a ComponentStatus);

impl<'a> ComponentReader<'a> {
    /// The attribute value, treating `null` the same as absent.
    fn value(&self, capability: &Capability, attribute: &str) -> Option<&'a serde_json::Value> {
        self.0
            .get(capability.as_str())
            .and_then(|attrs| attrs.get(attribute))
            .map(|state| &state.value)
            .filter(|value| !value.is_null())
    }

    fn optional_str(
        &self,
        capability: &Capability,
        attribute: &'static str,
    ) -> Result<Option<&'a str>, StatusUnavailableError> {
        self.value(capability, attribute)
            .map(|value| {
                value
                    .as_str()
                    .ok_or_else(|| unexpected(capability, attribute, value))
            })
            .transpose()
    }

    fn optional_f64(
        &self,
        capability: &Capability,
        attribute: &'static str,
    ) -> Result<Option<f64>, StatusUnavailableError> {
        self.value(capability, attribute)
            .map(|value| {
                value
                    .as_f64()
                    .ok_or_else(|| unexpected(capability, attribute, value))
            })
            .transpose()
    }

    fn required_str(
        &self,
        capability: &Capability,
        attribute: &'static str,
    ) -> Result<&'a str, StatusUnavailableError> {
        self.optional_str(capability, attribute)?
            .ok_or_else(|| missing(capability, attribute))
    }

    fn required_f64(
        &self,
        capability: &Capability,
        attribute: &'static str,
    ) -> Result<f64, StatusUnavailableError> {
        self.optional_f64(capability, attribute)?
            .ok_or_else(|| missing(capability, attribute))
    }
}

fn missing(capability: &Capability, attribute: &'static str) -> StatusUnavailableError {
    StatusUnavailableError::MissingAttribute {
        capability: capability.clone(),
        attribute,
    }
}

fn unexpected(
    capability: &Capability,
    attribute: &'static str,
    value: &serde_json::Value,
) -> StatusUnavailableError {
    StatusUnavailableError::UnexpectedValue {
        capability: capability.clone(),
        attribute,
        value: value.clone(),
    }
}
