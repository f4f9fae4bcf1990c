//! Event — an immutable record of something that happened to an accessory.
//!
//! Events mirror the pushes a host expects when a value changes without
//! the host asking for it (a poll picked up a new value, a poll failed).

use serde::{Deserialize, Serialize};

use crate::characteristic::{Characteristic, CharacteristicValue};
use crate::id::DeviceId;
use crate::time::{Timestamp, now};

/// What happened.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "type", rename_all = "snake_case")]
pub enum EventKind {
    /// A characteristic took a new value.
    CharacteristicChanged {
        characteristic: Characteristic,
        value: CharacteristicValue,
    },
    /// A scheduled poll failed; the cache keeps its previous record.
    PollFailed { reason: String },
}

/// An event about one accessory.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Event {
    pub device_id: DeviceId,
    #[serde(flatten)]
    pub kind: EventKind,
    pub timestamp: Timestamp,
}

impl Event {
    /// Create an event stamped with the current time.
    #[must_use]
    pub fn new(device_id: DeviceId, kind: EventKind) -> Self {
        Self {
            device_id,
            kind,
            timestamp: now(),
        }
    }

    #[must_use]
    pub fn characteristic_changed(
        device_id: DeviceId,
        characteristic: Characteristic,
        value: CharacteristicValue,
    ) -> Self {
        Self::new(
            device_id,
            EventKind::CharacteristicChanged {
                characteristic,
                value,
            },
        )
    }
}
