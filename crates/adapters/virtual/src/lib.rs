//! # acbridge-adapter-virtual
//!
//! Virtual device cloud that serves simulated devices for testing and
//! demonstration purposes.
//!
//! ## Provided devices
//!
//! | Device | Device ID | Behaviour |
//! |--------|-----------|-----------|
//! | Living Room AC | `virtual-ac-living` | Full air conditioner with humidity sensor |
//! | Bedroom AC | `virtual-ac-bedroom` | Air conditioner without humidity sensor |
//! | Hallway Switch | `virtual-switch-hallway` | Plain switch, not eligible for bridging |
//!
//! Running units drift their room temperature towards the setpoint on every
//! status read, so polling produces change events.
//!
//! ## Dependency rule
//!
//! Depends on `acbridge-app` (port traits) and `acbridge-domain` only.

mod devices;

use std::collections::BTreeMap;
use std::sync::{Mutex, PoisonError};

use acbridge_app::ports::DeviceCloud;
use acbridge_domain::command::{Command, CommandOutcome};
use acbridge_domain::device::Device;
use acbridge_domain::error::{BridgeError, NotFoundError};
use acbridge_domain::id::DeviceId;
use acbridge_domain::mode::AirConditionerMode;
use acbridge_domain::status::DeviceStatus;

use devices::{VirtualAirConditioner, VirtualDevice, VirtualSwitch};

/// In-memory device cloud with simulated devices.
pub struct VirtualCloud {
    devices: Mutex<BTreeMap<String, VirtualDevice>>,
}

impl Default for VirtualCloud {
    fn default() -> Self {
        let living = VirtualAirConditioner {
            id: "virtual-ac-living",
            label: "Living Room AC",
            with_humidity: true,
            on: true,
            mode: AirConditionerMode::Cool,
            temperature: 27.0,
            setpoint: 23.0,
            humidity: 48.0,
            fan_mode: "auto".to_string(),
        };
        let bedroom = VirtualAirConditioner {
            id: "virtual-ac-bedroom",
            label: "Bedroom AC",
            with_humidity: false,
            on: false,
            mode: AirConditionerMode::AiComfort,
            temperature: 24.5,
            setpoint: 25.0,
            humidity: 0.0,
            fan_mode: "low".to_string(),
        };
        let switch = VirtualSwitch {
            id: "virtual-switch-hallway",
            label: "Hallway Switch",
            on: false,
        };

        let mut devices = BTreeMap::new();
        devices.insert(living.id.to_string(), VirtualDevice::AirConditioner(living));
        devices.insert(bedroom.id.to_string(), VirtualDevice::AirConditioner(bedroom));
        devices.insert(switch.id.to_string(), VirtualDevice::Switch(switch));

        Self {
            devices: Mutex::new(devices),
        }
    }
}

impl VirtualCloud {
    fn not_found(device_id: &DeviceId) -> NotFoundError {
        NotFoundError {
            entity: "Device",
            id: device_id.to_string(),
        }
    }
}

impl DeviceCloud for VirtualCloud {
    async fn list_devices(&self) -> Result<Vec<Device>, BridgeError> {
        let devices = self.devices.lock().unwrap_or_else(PoisonError::into_inner);
        let listed = devices
            .values()
            .map(VirtualDevice::device)
            .collect::<Result<Vec<_>, _>>()?;
        Ok(listed)
    }

    async fn get_status(&self, device_id: &DeviceId) -> Result<DeviceStatus, BridgeError> {
        let mut devices = self.devices.lock().unwrap_or_else(PoisonError::into_inner);
        let device = devices
            .get_mut(device_id.as_str())
            .ok_or_else(|| Self::not_found(device_id))?;
        device.tick();
        Ok(device.status())
    }

    async fn execute_command(
        &self,
        device_id: &DeviceId,
        command: &Command,
    ) -> Result<CommandOutcome, BridgeError> {
        let mut devices = self.devices.lock().unwrap_or_else(PoisonError::into_inner);
        let device = devices
            .get_mut(device_id.as_str())
            .ok_or_else(|| Self::not_found(device_id))?;
        let outcome = device.handle(command);
        tracing::debug!(
            %device_id,
            capability = %command.capability,
            command = %command.command,
            status = %outcome.status,
            "virtual command handled"
        );
        Ok(outcome)
    }
}
