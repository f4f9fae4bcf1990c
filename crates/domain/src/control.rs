//! Host writes — validation, command translation and optimistic update.

use crate::characteristic::{Characteristic, CharacteristicValue, TargetHeaterCoolerState};
use crate::command::Command;
use crate::error::ValidationError;
use crate::mode::AirConditionerMode;
use crate::status::StatusRecord;

/// A validated write of a host characteristic.
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum ControlWrite {
    Active(bool),
    TargetState(TargetHeaterCoolerState),
    Setpoint(f64),
}

impl ControlWrite {
    /// Validate `value` for `characteristic`.
    ///
    /// # Errors
    ///
    /// Returns [`ValidationError::ReadOnly`] for read-only characteristics,
    /// [`ValidationError::WrongValueType`] for values of the wrong shape, and
    /// range/step errors for setpoints.
    pub fn parse(
        characteristic: Characteristic,
        value: CharacteristicValue,
    ) -> Result<Self, ValidationError> {
        match characteristic {
            Characteristic::Active => match value.as_i64() {
                Some(0) => Ok(Self::Active(false)),
                Some(1) => Ok(Self::Active(true)),
                _ => Err(ValidationError::WrongValueType {
                    characteristic,
                    expected: "0 or 1",
                }),
            },
            Characteristic::TargetHeaterCoolerState => {
                let raw = match value {
                    CharacteristicValue::Bool(_) => None,
                    other => other.as_i64(),
                }
                .ok_or(ValidationError::WrongValueType {
                    characteristic,
                    expected: "integer",
                })?;
                Ok(Self::TargetState(TargetHeaterCoolerState::try_from(raw)?))
            }
            Characteristic::CoolingThresholdTemperature
            | Characteristic::HeatingThresholdTemperature => {
                if matches!(value, CharacteristicValue::Bool(_)) {
                    return Err(ValidationError::WrongValueType {
                        characteristic,
                        expected: "number",
                    });
                }
                let temperature = value.as_f64();
                if let Some(props) = characteristic.props() {
                    props.validate(characteristic, temperature)?;
                }
                Ok(Self::Setpoint(temperature))
            }
            Characteristic::CurrentHeaterCoolerState
            | Characteristic::CurrentTemperature
            | Characteristic::CurrentRelativeHumidity => {
                Err(ValidationError::ReadOnly(characteristic))
            }
        }
    }

    /// The remote command carrying out this write.
    #[must_use]
    pub fn command(self) -> Command {
        match self {
            Self::Active(on) => Command::switch(on),
            Self::TargetState(state) => Command::set_mode(&AirConditionerMode::from(state)),
            Self::Setpoint(temperature) => Command::set_cooling_setpoint(temperature),
        }
    }

    /// Apply the write to a cached record ahead of the remote confirmation.
    pub fn apply(self, record: &mut StatusRecord) {
        match self {
            Self::Active(on) => record.active = on,
            Self::TargetState(state) => record.mode = Some(AirConditionerMode::from(state)),
            Self::Setpoint(temperature) => record.target_temperature = temperature,
        }
    }
}
