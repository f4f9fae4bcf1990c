//! Air-conditioner modes and their translation to host heater/cooler states.

use std::fmt;

use serde::{Deserialize, Serialize};

use crate::characteristic::{CurrentHeaterCoolerState, TargetHeaterCoolerState};

/// Value of the `airConditionerMode` attribute.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(from = "String", into = "String")]
pub enum AirConditionerMode {
    AiComfort,
    Cool,
    Dry,
    Wind,
    Auto,
    Heat,
    Other(String),
}

impl AirConditionerMode {
    #[must_use]
    pub fn as_str(&self) -> &str {
        match self {
            Self::AiComfort => "aIComfort",
            Self::Cool => "cool",
            Self::Dry => "dry",
            Self::Wind => "wind",
            Self::Auto => "auto",
            Self::Heat => "heat",
            Self::Other(mode) => mode,
        }
    }

    /// What the host should show as the unit's current activity.
    #[must_use]
    pub fn current_state(&self) -> CurrentHeaterCoolerState {
        match self {
            Self::AiComfort | Self::Dry => CurrentHeaterCoolerState::Idle,
            Self::Cool | Self::Wind | Self::Auto => CurrentHeaterCoolerState::Cooling,
            Self::Heat => CurrentHeaterCoolerState::Heating,
            Self::Other(_) => CurrentHeaterCoolerState::Inactive,
        }
    }

    /// What the host should show as the selected target mode.
    #[must_use]
    pub fn target_state(&self) -> TargetHeaterCoolerState {
        match self {
            Self::Auto | Self::AiComfort | Self::Other(_) => TargetHeaterCoolerState::Auto,
            Self::Heat => TargetHeaterCoolerState::Heat,
            Self::Cool | Self::Dry | Self::Wind => TargetHeaterCoolerState::Cool,
        }
    }
}

impl From<TargetHeaterCoolerState> for AirConditionerMode {
    fn from(state: TargetHeaterCoolerState) -> Self {
        match state {
            TargetHeaterCoolerState::Auto => Self::Auto,
            TargetHeaterCoolerState::Heat => Self::Heat,
            TargetHeaterCoolerState::Cool => Self::Cool,
        }
    }
}

impl From<&str> for AirConditionerMode {
    fn from(mode: &str) -> Self {
        match mode {
            "aIComfort" => Self::AiComfort,
            "cool" => Self::Cool,
            "dry" => Self::Dry,
            "wind" => Self::Wind,
            "auto" => Self::Auto,
            "heat" => Self::Heat,
            other => Self::Other(other.to_string()),
        }
    }
}

impl From<String> for AirConditionerMode {
    fn from(mode: String) -> Self {
        match Self::from(mode.as_str()) {
            Self::Other(_) => Self::Other(mode),
            known => known,
        }
    }
}

impl From<AirConditionerMode> for String {
    fn from(mode: AirConditionerMode) -> Self {
        match mode {
            AirConditionerMode::Other(mode) => mode,
            known => known.as_str().to_string(),
        }
    }
}

impl fmt::Display for AirConditionerMode {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}
