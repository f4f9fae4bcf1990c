//! Host-side characteristic model.
//!
//! The home-automation host sees each air conditioner as a heater/cooler
//! service made of characteristics. Values follow the host's numeric
//! conventions (`Active` is 0/1, heater/cooler states are small integers).

use std::fmt;
use std::str::FromStr;

use serde::{Deserialize, Serialize};

use crate::capability::Capability;
use crate::device::Device;
use crate::error::ValidationError;

/// A characteristic of the heater/cooler service.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum Characteristic {
    Active,
    CurrentHeaterCoolerState,
    TargetHeaterCoolerState,
    CurrentTemperature,
    CoolingThresholdTemperature,
    HeatingThresholdTemperature,
    CurrentRelativeHumidity,
}

impl Characteristic {
    /// Every characteristic, in service declaration order.
    pub const ALL: [Self; 7] = [
        Self::Active,
        Self::CurrentHeaterCoolerState,
        Self::TargetHeaterCoolerState,
        Self::CurrentTemperature,
        Self::CoolingThresholdTemperature,
        Self::HeatingThresholdTemperature,
        Self::CurrentRelativeHumidity,
    ];

    #[must_use]
    pub fn as_str(self) -> &'static str {
        match self {
            Self::Active => "Active",
            Self::CurrentHeaterCoolerState => "CurrentHeaterCoolerState",
            Self::TargetHeaterCoolerState => "TargetHeaterCoolerState",
            Self::CurrentTemperature => "CurrentTemperature",
            Self::CoolingThresholdTemperature => "CoolingThresholdTemperature",
            Self::HeatingThresholdTemperature => "HeatingThresholdTemperature",
            Self::CurrentRelativeHumidity => "CurrentRelativeHumidity",
        }
    }

    /// Whether the host may write this characteristic.
    #[must_use]
    pub fn is_writable(self) -> bool {
        matches!(
            self,
            Self::Active
                | Self::TargetHeaterCoolerState
                | Self::CoolingThresholdTemperature
                | Self::HeatingThresholdTemperature
        )
    }

    /// Whether `device` exposes what this characteristic reads and writes.
    #[must_use]
    pub fn is_supported_by(self, device: &Device) -> bool {
        match self {
            Self::TargetHeaterCoolerState => device.supports(&Capability::AirConditionerMode),
            Self::CurrentRelativeHumidity => {
                device.supports(&Capability::RelativeHumidityMeasurement)
            }
            _ => true,
        }
    }

    /// Range constraints advertised to the host, if any.
    #[must_use]
    pub fn props(self) -> Option<CharacteristicProps> {
        match self {
            Self::CoolingThresholdTemperature | Self::HeatingThresholdTemperature => {
                Some(CharacteristicProps::SETPOINT)
            }
            _ => None,
        }
    }
}

impl fmt::Display for Characteristic {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Accepts the canonical name as well as `snake_case` / `kebab-case` forms.
impl FromStr for Characteristic {
    type Err = ValidationError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let wanted: String = s
            .chars()
            .filter(|c| *c != '_' && *c != '-')
            .map(|c| c.to_ascii_lowercase())
            .collect();
        Self::ALL
            .into_iter()
            .find(|c| c.as_str().eq_ignore_ascii_case(&wanted))
            .ok_or_else(|| ValidationError::UnknownCharacteristic(s.to_string()))
    }
}

/// A characteristic value as exchanged with the host.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(untagged)]
pub enum CharacteristicValue {
    Bool(bool),
    Int(i64),
    Float(f64),
}

impl CharacteristicValue {
    /// Numeric view; booleans read as 0/1.
    #[must_use]
    pub fn as_f64(self) -> f64 {
        match self {
            Self::Bool(b) => f64::from(u8::from(b)),
            #[allow(clippy::cast_precision_loss)]
            Self::Int(i) => i as f64,
            Self::Float(f) => f,
        }
    }

    /// Integer view; floats only convert when they carry no fraction.
    #[must_use]
    pub fn as_i64(self) -> Option<i64> {
        match self {
            Self::Bool(b) => Some(i64::from(b)),
            Self::Int(i) => Some(i),
            #[allow(clippy::cast_possible_truncation)]
            Self::Float(f) if f.fract() == 0.0 && f.is_finite() => Some(f as i64),
            Self::Float(_) => None,
        }
    }
}

impl From<bool> for CharacteristicValue {
    fn from(value: bool) -> Self {
        Self::Bool(value)
    }
}

impl From<i64> for CharacteristicValue {
    fn from(value: i64) -> Self {
        Self::Int(value)
    }
}

impl From<f64> for CharacteristicValue {
    fn from(value: f64) -> Self {
        Self::Float(value)
    }
}

/// Numeric range of a writable characteristic.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct CharacteristicProps {
    pub min_value: f64,
    pub max_value: f64,
    pub min_step: f64,
}

impl CharacteristicProps {
    /// Cooling/heating threshold range of the bridged air conditioners.
    pub const SETPOINT: Self = Self {
        min_value: 16.0,
        max_value: 30.0,
        min_step: 1.0,
    };

    /// Check `value` against the range and step.
    ///
    /// # Errors
    ///
    /// Returns [`ValidationError::OutOfRange`] or [`ValidationError::OffStep`].
    pub fn validate(
        &self,
        characteristic: Characteristic,
        value: f64,
    ) -> Result<(), ValidationError> {
        if !(self.min_value..=self.max_value).contains(&value) {
            return Err(ValidationError::OutOfRange {
                characteristic,
                value,
                min: self.min_value,
                max: self.max_value,
            });
        }
        let steps = (value - self.min_value) / self.min_step;
        if (steps - steps.round()).abs() > 1e-9 {
            return Err(ValidationError::OffStep {
                characteristic,
                value,
                step: self.min_step,
            });
        }
        Ok(())
    }
}

/// Host `Active` values.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Active {
    Inactive = 0,
    Active = 1,
}

impl From<bool> for Active {
    fn from(on: bool) -> Self {
        if on { Self::Active } else { Self::Inactive }
    }
}

impl From<Active> for CharacteristicValue {
    fn from(value: Active) -> Self {
        Self::Int(value as i64)
    }
}

/// Host `CurrentHeaterCoolerState` values.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum CurrentHeaterCoolerState {
    Inactive = 0,
    Idle = 1,
    Heating = 2,
    Cooling = 3,
}

impl From<CurrentHeaterCoolerState> for CharacteristicValue {
    fn from(value: CurrentHeaterCoolerState) -> Self {
        Self::Int(value as i64)
    }
}

/// Host `TargetHeaterCoolerState` values.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum TargetHeaterCoolerState {
    Auto = 0,
    Heat = 1,
    Cool = 2,
}

impl From<TargetHeaterCoolerState> for CharacteristicValue {
    fn from(value: TargetHeaterCoolerState) -> Self {
        Self::Int(value as i64)
    }
}

impl TryFrom<i64> for TargetHeaterCoolerState {
    type Error = ValidationError;

    fn try_from(value: i64) -> Result<Self, Self::Error> {
        match value {
            0 => Ok(Self::Auto),
            1 => Ok(Self::Heat),
            2 => Ok(Self::Cool),
            other => Err(ValidationError::UnknownTargetState(other)),
        }
    }
}
