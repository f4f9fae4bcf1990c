//! Accessory — the host-side object bound 1:1 to a [`Device`].

use serde::{Deserialize, Serialize};

use crate::device::Device;
use crate::id::{AccessoryId, DeviceId};

const UNKNOWN: &str = "unknown";

/// Static information shown by the host for an accessory.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct AccessoryInformation {
    pub name: String,
    pub manufacturer: String,
    pub model: String,
    pub serial_number: String,
}

impl AccessoryInformation {
    /// Derive accessory information from device metadata.
    #[must_use]
    pub fn from_device(device: &Device) -> Self {
        Self {
            name: device.display_name().to_string(),
            manufacturer: device
                .manufacturer_name
                .clone()
                .unwrap_or_else(|| UNKNOWN.to_string()),
            model: device
                .device_type_id
                .clone()
                .unwrap_or_else(|| UNKNOWN.to_string()),
            serial_number: device
                .presentation_id
                .clone()
                .unwrap_or_else(|| UNKNOWN.to_string()),
        }
    }
}

/// A host accessory carrying its device as context.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct PlatformAccessory {
    pub id: AccessoryId,
    pub display_name: String,
    pub information: AccessoryInformation,
    /// The device this accessory is bound to, as last listed.
    pub device: Device,
}

impl PlatformAccessory {
    /// Create a fresh accessory for `device`.
    #[must_use]
    pub fn for_device(device: Device) -> Self {
        Self {
            id: AccessoryId::for_device(&device.device_id),
            display_name: device.display_name().to_string(),
            information: AccessoryInformation::from_device(&device),
            device,
        }
    }

    /// Binding key: the device id.
    #[must_use]
    pub fn device_id(&self) -> &DeviceId {
        &self.device.device_id
    }

    /// Replace the stored device context after restoring from cache.
    ///
    /// The accessory keeps its id; name and information follow the device.
    pub fn refresh_context(&mut self, device: Device) {
        self.display_name = device.display_name().to_string();
        self.information = AccessoryInformation::from_device(&device);
        self.device = device;
    }
}
