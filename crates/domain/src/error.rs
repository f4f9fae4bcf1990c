//! Common error types used across the workspace.
//!
//! Every layer defines its own typed errors and converts into
//! [`BridgeError`] via `#[from]` (or an adapter-side `into_domain()`), so the
//! host surface only ever has to map one enum.

use crate::capability::Capability;
use crate::characteristic::Characteristic;

/// Top-level error shared by the application layer and all adapters.
#[derive(Debug, thiserror::Error)]
pub enum BridgeError {
    /// Input rejected before any remote call was made.
    #[error("validation failed: {0}")]
    Validation(#[from] ValidationError),

    /// A referenced accessory or device does not exist.
    #[error(transparent)]
    NotFound(#[from] NotFoundError),

    /// The device status could not be read or flattened.
    #[error("status unavailable: {0}")]
    StatusUnavailable(#[from] StatusUnavailableError),

    /// The device cloud refused or failed a command.
    #[error(transparent)]
    CommandFailed(#[from] CommandFailedError),

    /// Network, HTTP or decoding failure talking to an external system.
    #[error("transport error")]
    Transport(#[source] Box<dyn std::error::Error + Send + Sync>),
}

/// Reasons a value or request is rejected.
#[derive(Debug, Clone, PartialEq, thiserror::Error)]
pub enum ValidationError {
    #[error("device id must be set")]
    EmptyDeviceId,

    #[error("device is missing required capabilities: {}", join(.missing))]
    MissingCapabilities { missing: Vec<Capability> },

    #[error("unknown characteristic `{0}`")]
    UnknownCharacteristic(String),

    #[error("characteristic {0} is not supported by this accessory")]
    UnsupportedCharacteristic(Characteristic),

    #[error("characteristic {0} is read-only")]
    ReadOnly(Characteristic),

    #[error("characteristic {characteristic} expects a {expected} value")]
    WrongValueType {
        characteristic: Characteristic,
        expected: &'static str,
    },

    #[error("{value} is outside {min}..={max} for {characteristic}")]
    OutOfRange {
        characteristic: Characteristic,
        value: f64,
        min: f64,
        max: f64,
    },

    #[error("{value} is not a multiple of {step} for {characteristic}")]
    OffStep {
        characteristic: Characteristic,
        value: f64,
        step: f64,
    },

    #[error("unknown target heater/cooler state {0}")]
    UnknownTargetState(i64),
}

/// A lookup by id found nothing.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
#[error("{entity} {id} not found")]
pub struct NotFoundError {
    /// Kind of thing that was looked up (e.g. `"Accessory"`).
    pub entity: &'static str,
    /// The id that was requested.
    pub id: String,
}

/// Why a status document could not be turned into a status record.
#[derive(Debug, Clone, PartialEq, thiserror::Error)]
pub enum StatusUnavailableError {
    #[error("device status has no `{component}` component")]
    MissingComponent { component: String },

    #[error("`{capability}.{attribute}` is missing from the device status")]
    MissingAttribute {
        capability: Capability,
        attribute: &'static str,
    },

    #[error("`{capability}.{attribute}` has unexpected value {value}")]
    UnexpectedValue {
        capability: Capability,
        attribute: &'static str,
        value: serde_json::Value,
    },

    #[error("no status has been fetched yet")]
    NotYetFetched,
}

/// The device cloud answered a command with something other than success.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
#[error("command failed with status {status}")]
pub struct CommandFailedError {
    /// Status string reported by the device cloud.
    pub status: String,
}

fn join(items: &[Capability]) -> String {
    items
        .iter()
        .map(Capability::as_str)
        .collect::<Vec<_>>()
        .join(", ")
}
