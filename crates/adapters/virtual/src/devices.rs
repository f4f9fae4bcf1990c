//! Simulated devices.

use std::collections::HashMap;

use serde_json::Value;

use acbridge_domain::capability::Capability;
use acbridge_domain::command::{Command, CommandArgument, CommandOutcome};
use acbridge_domain::device::{Device, MAIN_COMPONENT};
use acbridge_domain::error::ValidationError;
use acbridge_domain::mode::AirConditionerMode;
use acbridge_domain::status::{AttributeState, ComponentStatus, DeviceStatus};

const MANUFACTURER: &str = "acbridge";
const UNSUPPORTED: &str = "unsupported";
const INVALID_ARGUMENTS: &str = "invalid_arguments";

/// Step by which a running unit moves the room towards its setpoint per poll.
const DRIFT_STEP: f64 = 0.5;

pub(crate) enum VirtualDevice {
    AirConditioner(VirtualAirConditioner),
    Switch(VirtualSwitch),
}

impl VirtualDevice {
    pub fn device(&self) -> Result<Device, ValidationError> {
        match self {
            Self::AirConditioner(ac) => ac.device(),
            Self::Switch(switch) => switch.device(),
        }
    }

    pub fn status(&self) -> DeviceStatus {
        match self {
            Self::AirConditioner(ac) => ac.status(),
            Self::Switch(switch) => switch.status(),
        }
    }

    /// Advance the simulation by one poll.
    pub fn tick(&mut self) {
        if let Self::AirConditioner(ac) = self {
            ac.tick();
        }
    }

    pub fn handle(&mut self, command: &Command) -> CommandOutcome {
        match self {
            Self::AirConditioner(ac) => ac.handle(command),
            Self::Switch(switch) => switch.handle(command),
        }
    }
}

/// A room air conditioner.
pub(crate) struct VirtualAirConditioner {
    pub id: &'static str,
    pub label: &'static str,
    pub with_humidity: bool,
    pub on: bool,
    pub mode: AirConditionerMode,
    pub temperature: f64,
    pub setpoint: f64,
    pub humidity: f64,
    pub fan_mode: String,
}

impl VirtualAirConditioner {
    fn capabilities(&self) -> Vec<Capability> {
        let mut capabilities = vec![
            Capability::Switch,
            Capability::TemperatureMeasurement,
            Capability::ThermostatCoolingSetpoint,
            Capability::AirConditionerMode,
            Capability::AirConditionerFanMode,
        ];
        if self.with_humidity {
            capabilities.push(Capability::RelativeHumidityMeasurement);
        }
        capabilities
    }

    fn device(&self) -> Result<Device, ValidationError> {
        Device::builder()
            .device_id(self.id)
            .label(self.label)
            .name("Virtual Room A/C")
            .manufacturer(MANUFACTURER)
            .model("virtual-ac")
            .serial_number(self.id)
            .capabilities(self.capabilities())
            .build()
    }

    fn status(&self) -> DeviceStatus {
        let mut main = ComponentStatus::new();
        insert(&mut main, &Capability::Switch, "switch", Value::from(on_off(self.on)), None);
        insert(
            &mut main,
            &Capability::TemperatureMeasurement,
            "temperature",
            Value::from(self.temperature),
            Some("C"),
        );
        insert(
            &mut main,
            &Capability::ThermostatCoolingSetpoint,
            "coolingSetpoint",
            Value::from(self.setpoint),
            Some("C"),
        );
        insert(
            &mut main,
            &Capability::AirConditionerMode,
            "airConditionerMode",
            Value::from(self.mode.as_str()),
            None,
        );
        insert(
            &mut main,
            &Capability::AirConditionerFanMode,
            "fanMode",
            Value::from(self.fan_mode.as_str()),
            None,
        );
        if self.with_humidity {
            insert(
                &mut main,
                &Capability::RelativeHumidityMeasurement,
                "humidity",
                Value::from(self.humidity),
                Some("%"),
            );
        }
        status_of(main)
    }

    fn tick(&mut self) {
        if !self.on {
            return;
        }
        let delta = self.setpoint - self.temperature;
        let heating_allowed = matches!(
            self.mode,
            AirConditionerMode::Heat | AirConditionerMode::Auto | AirConditionerMode::AiComfort
        );
        if delta < 0.0 || heating_allowed {
            self.temperature += delta.clamp(-DRIFT_STEP, DRIFT_STEP);
        }
    }

    fn handle(&mut self, command: &Command) -> CommandOutcome {
        match (&command.capability, command.command.as_str()) {
            (Capability::Switch, "on") => self.on = true,
            (Capability::Switch, "off") => self.on = false,
            (Capability::ThermostatCoolingSetpoint, "setCoolingSetpoint") => {
                match command.arguments.first() {
                    Some(CommandArgument::Integer(value)) => {
                        #[allow(clippy::cast_precision_loss)]
                        let value = *value as f64;
                        self.setpoint = value;
                    }
                    Some(CommandArgument::Number(value)) => self.setpoint = *value,
                    _ => return failure(INVALID_ARGUMENTS),
                }
            }
            (Capability::AirConditionerMode, "setAirConditionerMode") => {
                match command.arguments.first() {
                    Some(CommandArgument::Text(mode)) => {
                        self.mode = AirConditionerMode::from(mode.as_str());
                    }
                    _ => return failure(INVALID_ARGUMENTS),
                }
            }
            (Capability::AirConditionerFanMode, "setFanMode") => match command.arguments.first() {
                Some(CommandArgument::Text(mode)) => self.fan_mode.clone_from(mode),
                _ => return failure(INVALID_ARGUMENTS),
            },
            _ => return failure(UNSUPPORTED),
        }
        CommandOutcome::success()
    }
}

/// A plain on/off switch the bridge must not pick up.
pub(crate) struct VirtualSwitch {
    pub id: &'static str,
    pub label: &'static str,
    pub on: bool,
}

impl VirtualSwitch {
    fn device(&self) -> Result<Device, ValidationError> {
        Device::builder()
            .device_id(self.id)
            .label(self.label)
            .name("Virtual Switch")
            .manufacturer(MANUFACTURER)
            .model("virtual-switch")
            .capabilities([Capability::Switch])
            .build()
    }

    fn status(&self) -> DeviceStatus {
        let mut main = ComponentStatus::new();
        insert(&mut main, &Capability::Switch, "switch", Value::from(on_off(self.on)), None);
        status_of(main)
    }

    fn handle(&mut self, command: &Command) -> CommandOutcome {
        match (&command.capability, command.command.as_str()) {
            (Capability::Switch, "on") => self.on = true,
            (Capability::Switch, "off") => self.on = false,
            _ => return failure(UNSUPPORTED),
        }
        CommandOutcome::success()
    }
}

fn on_off(on: bool) -> &'static str {
    if on { "on" } else { "off" }
}

fn failure(status: &str) -> CommandOutcome {
    CommandOutcome {
        status: status.to_string(),
    }
}

fn insert(
    component: &mut ComponentStatus,
    capability: &Capability,
    attribute: &str,
    value: Value,
    unit: Option<&str>,
) {
    component
        .entry(capability.as_str().to_string())
        .or_default()
        .insert(
            attribute.to_string(),
            AttributeState {
                value,
                unit: unit.map(str::to_string),
                timestamp: None,
            },
        );
}

fn status_of(main: ComponentStatus) -> DeviceStatus {
    DeviceStatus {
        components: HashMap::from([(MAIN_COMPONENT.to_string(), main)]),
    }
}
