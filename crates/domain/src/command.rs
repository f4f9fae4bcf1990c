//! Commands sent to a device and the outcome reported back.

use serde::{Deserialize, Serialize};

use crate::capability::Capability;
use crate::device::MAIN_COMPONENT;
use crate::error::CommandFailedError;
use crate::mode::AirConditionerMode;

/// Status string the device cloud reports for an accepted command.
pub const SUCCESS_STATUS: &str = "success";

/// A single positional command argument.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(untagged)]
pub enum CommandArgument {
    Integer(i64),
    Number(f64),
    Text(String),
}

impl From<i64> for CommandArgument {
    fn from(value: i64) -> Self {
        Self::Integer(value)
    }
}

/// Whole numbers are sent as integers so the cloud sees `24`, not `24.0`.
impl From<f64> for CommandArgument {
    #[allow(clippy::cast_possible_truncation)]
    fn from(value: f64) -> Self {
        if value.fract() == 0.0 && value.abs() < 1e15 {
            Self::Integer(value as i64)
        } else {
            Self::Number(value)
        }
    }
}

impl From<&str> for CommandArgument {
    fn from(value: &str) -> Self {
        Self::Text(value.to_string())
    }
}

impl From<String> for CommandArgument {
    fn from(value: String) -> Self {
        Self::Text(value)
    }
}

/// A command addressed to one capability of a device component.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Command {
    pub component: String,
    pub capability: Capability,
    pub command: String,
    #[serde(default)]
    pub arguments: Vec<CommandArgument>,
}

impl Command {
    /// A command against the [`MAIN_COMPONENT`].
    #[must_use]
    pub fn new(
        command: impl Into<String>,
        capability: Capability,
        arguments: Vec<CommandArgument>,
    ) -> Self {
        Self {
            component: MAIN_COMPONENT.to_string(),
            capability,
            command: command.into(),
            arguments,
        }
    }

    /// `switch.on` / `switch.off`.
    #[must_use]
    pub fn switch(on: bool) -> Self {
        Self::new(if on { "on" } else { "off" }, Capability::Switch, Vec::new())
    }

    /// `thermostatCoolingSetpoint.setCoolingSetpoint(temperature)`.
    #[must_use]
    pub fn set_cooling_setpoint(temperature: f64) -> Self {
        Self::new(
            "setCoolingSetpoint",
            Capability::ThermostatCoolingSetpoint,
            vec![temperature.into()],
        )
    }

    /// `airConditionerMode.setAirConditionerMode(mode)`.
    #[must_use]
    pub fn set_mode(mode: &AirConditionerMode) -> Self {
        Self::new(
            "setAirConditionerMode",
            Capability::AirConditionerMode,
            vec![mode.as_str().into()],
        )
    }
}

/// What the device cloud answered to a command.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct CommandOutcome {
    pub status: String,
}

impl CommandOutcome {
    #[must_use]
    pub fn success() -> Self {
        Self {
            status: SUCCESS_STATUS.to_string(),
        }
    }

    #[must_use]
    pub fn is_success(&self) -> bool {
        self.status == SUCCESS_STATUS
    }

    /// Turn a non-success status into an error.
    ///
    /// # Errors
    ///
    /// Returns [`CommandFailedError`] carrying the reported status.
    pub fn into_result(self) -> Result<(), CommandFailedError> {
        if self.is_success() {
            Ok(())
        } else {
            Err(CommandFailedError {
                status: self.status,
            })
        }
    }
}
