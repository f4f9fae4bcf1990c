//! In-memory port fakes shared by the app tests.

use std::collections::HashMap;
use std::sync::Mutex;

use acbridge_domain::accessory::PlatformAccessory;
use acbridge_domain::command::{Command, CommandOutcome};
use acbridge_domain::device::Device;
use acbridge_domain::error::BridgeError;
use acbridge_domain::id::DeviceId;
use acbridge_domain::status::DeviceStatus;

use crate::ports::{AccessoryHost, DeviceCloud};

pub(crate) fn device_id(id: &str) -> DeviceId {
    DeviceId::new(id).unwrap()
}

/// An air conditioner with mode and humidity support.
pub(crate) fn ac_device(id: &str) -> Device {
    Device::builder()
        .device_id(id)
        .label(format!("AC {id}"))
        .manufacturer("Samsung Electronics")
        .capabilities([
            "switch",
            "temperatureMeasurement",
            "thermostatCoolingSetpoint",
            "airConditionerMode",
            "relativeHumidityMeasurement",
        ])
        .build()
        .unwrap()
}

/// A device the bridge must ignore.
pub(crate) fn plain_switch(id: &str) -> Device {
    Device::builder()
        .device_id(id)
        .label("Hallway light")
        .capabilities(["switch"])
        .build()
        .unwrap()
}

pub(crate) fn status(switch: &str, temperature: f64, setpoint: f64, mode: &str) -> DeviceStatus {
    serde_json::from_value(serde_json::json!({
        "components": {
            "main": {
                "switch": { "switch": { "value": switch } },
                "temperatureMeasurement": { "temperature": { "value": temperature, "unit": "C" } },
                "thermostatCoolingSetpoint": {
                    "coolingSetpoint": { "value": setpoint, "unit": "C" }
                },
                "airConditionerMode": { "airConditionerMode": { "value": mode } },
                "relativeHumidityMeasurement": { "humidity": { "value": 45, "unit": "%" } }
            }
        }
    }))
    .unwrap()
}

#[derive(Default)]
pub(crate) struct FakeCloud {
    pub devices: Mutex<Vec<Device>>,
    pub statuses: Mutex<HashMap<DeviceId, DeviceStatus>>,
    pub commands: Mutex<Vec<(DeviceId, Command)>>,
    /// Status reported for every command; `success` when unset.
    pub command_status: Mutex<Option<String>>,
}

impl FakeCloud {
    pub fn with_devices(devices: Vec<Device>) -> Self {
        Self {
            devices: Mutex::new(devices),
            ..Self::default()
        }
    }

    pub fn set_status(&self, id: &str, status: DeviceStatus) {
        self.statuses.lock().unwrap().insert(device_id(id), status);
    }

    pub fn refuse_commands(&self, status: &str) {
        *self.command_status.lock().unwrap() = Some(status.to_string());
    }

    pub fn sent_commands(&self) -> Vec<(DeviceId, Command)> {
        self.commands.lock().unwrap().clone()
    }
}

impl DeviceCloud for FakeCloud {
    async fn list_devices(&self) -> Result<Vec<Device>, BridgeError> {
        Ok(self.devices.lock().unwrap().clone())
    }

    async fn get_status(&self, device_id: &DeviceId) -> Result<DeviceStatus, BridgeError> {
        self.statuses
            .lock()
            .unwrap()
            .get(device_id)
            .cloned()
            .ok_or_else(|| BridgeError::Transport("device offline".into()))
    }

    async fn execute_command(
        &self,
        device_id: &DeviceId,
        command: &Command,
    ) -> Result<CommandOutcome, BridgeError> {
        self.commands
            .lock()
            .unwrap()
            .push((device_id.clone(), command.clone()));
        let status = self.command_status.lock().unwrap().clone();
        Ok(status.map_or_else(CommandOutcome::success, |status| CommandOutcome { status }))
    }
}

#[derive(Default)]
pub(crate) struct FakeHost {
    pub cached: Mutex<Vec<PlatformAccessory>>,
    pub registered: Mutex<Vec<PlatformAccessory>>,
    pub updated: Mutex<Vec<PlatformAccessory>>,
    pub unregistered: Mutex<Vec<PlatformAccessory>>,
    pub register_calls: Mutex<usize>,
}

impl FakeHost {
    pub fn with_cached(cached: Vec<PlatformAccessory>) -> Self {
        Self {
            cached: Mutex::new(cached),
            ..Self::default()
        }
    }
}

impl AccessoryHost for FakeHost {
    async fn cached_accessories(&self) -> Result<Vec<PlatformAccessory>, BridgeError> {
        Ok(self.cached.lock().unwrap().clone())
    }

    async fn register_accessories(
        &self,
        accessories: &[PlatformAccessory],
    ) -> Result<(), BridgeError> {
        *self.register_calls.lock().unwrap() += 1;
        self.registered
            .lock()
            .unwrap()
            .extend_from_slice(accessories);
        Ok(())
    }

    async fn update_accessories(
        &self,
        accessories: &[PlatformAccessory],
    ) -> Result<(), BridgeError> {
        self.updated.lock().unwrap().extend_from_slice(accessories);
        Ok(())
    }

    async fn unregister_accessories(
        &self,
        accessories: &[PlatformAccessory],
    ) -> Result<(), BridgeError> {
        self.unregistered
            .lock()
            .unwrap()
            .extend_from_slice(accessories);
        Ok(())
    }
}
