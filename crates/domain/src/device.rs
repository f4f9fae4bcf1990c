//! Device — a remote device as reported by the device cloud.
//!
//! The bridge only ever reads devices: they are owned by the cloud and
//! referenced here by [`DeviceId`].

use serde::{Deserialize, Serialize};

use crate::capability::{Capability, REQUIRED_CAPABILITIES};
use crate::error::ValidationError;
use crate::id::DeviceId;

/// Name of the component holding every capability the bridge uses.
pub const MAIN_COMPONENT: &str = "main";

/// A named group of capabilities on a device.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Component {
    pub id: String,
    #[serde(default)]
    pub capabilities: Vec<Capability>,
}

/// A device listed by the device cloud.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Device {
    pub device_id: DeviceId,
    /// User-assigned display label.
    pub label: Option<String>,
    /// Factory name.
    pub name: Option<String>,
    pub manufacturer_name: Option<String>,
    /// Device type, shown to the host as the accessory model.
    pub device_type_id: Option<String>,
    /// Presentation id, shown to the host as the serial number.
    pub presentation_id: Option<String>,
    #[serde(default)]
    pub components: Vec<Component>,
}

impl Device {
    /// Create a builder for constructing a [`Device`].
    #[must_use]
    pub fn builder() -> DeviceBuilder {
        DeviceBuilder::default()
    }

    /// Label, falling back to the factory name and then the id.
    #[must_use]
    pub fn display_name(&self) -> &str {
        self.label
            .as_deref()
            .or(self.name.as_deref())
            .unwrap_or(self.device_id.as_str())
    }

    /// Every capability across all components.
    pub fn capabilities(&self) -> impl Iterator<Item = &Capability> {
        self.components.iter().flat_map(|c| c.capabilities.iter())
    }

    /// Whether any component exposes `capability`.
    #[must_use]
    pub fn supports(&self, capability: &Capability) -> bool {
        self.capabilities().any(|c| c == capability)
    }

    /// Required capabilities this device does not expose.
    #[must_use]
    pub fn missing_capabilities(&self) -> Vec<Capability> {
        REQUIRED_CAPABILITIES
            .iter()
            .filter(|required| !self.supports(required))
            .cloned()
            .collect()
    }

    /// Check that the device can be bridged as an air conditioner.
    ///
    /// # Errors
    ///
    /// Returns [`ValidationError::MissingCapabilities`] listing what is absent.
    pub fn ensure_required_capabilities(&self) -> Result<(), ValidationError> {
        let missing = self.missing_capabilities();
        if missing.is_empty() {
            Ok(())
        } else {
            Err(ValidationError::MissingCapabilities { missing })
        }
    }
}

/// Builder for [`Device`].
#[derive(Debug, Default)]
pub struct DeviceBuilder {
    device_id: Option<String>,
    label: Option<String>,
    name: Option<String>,
    manufacturer_name: Option<String>,
    device_type_id: Option<String>,
    presentation_id: Option<String>,
    components: Vec<Component>,
}

impl DeviceBuilder {
    #[must_use]
    pub fn device_id(mut self, id: impl Into<String>) -> Self {
        self.device_id = Some(id.into());
        self
    }

    #[must_use]
    pub fn label(mut self, label: impl Into<String>) -> Self {
        self.label = Some(label.into());
        self
    }

    #[must_use]
    pub fn name(mut self, name: impl Into<String>) -> Self {
        self.name = Some(name.into());
        self
    }

    #[must_use]
    pub fn manufacturer(mut self, manufacturer: impl Into<String>) -> Self {
        self.manufacturer_name = Some(manufacturer.into());
        self
    }

    #[must_use]
    pub fn model(mut self, device_type_id: impl Into<String>) -> Self {
        self.device_type_id = Some(device_type_id.into());
        self
    }

    #[must_use]
    pub fn serial_number(mut self, presentation_id: impl Into<String>) -> Self {
        self.presentation_id = Some(presentation_id.into());
        self
    }

    /// Add a component with the given capabilities.
    #[must_use]
    pub fn component<I, C>(mut self, id: impl Into<String>, capabilities: I) -> Self
    where
        I: IntoIterator<Item = C>,
        C: Into<Capability>,
    {
        self.components.push(Component {
            id: id.into(),
            capabilities: capabilities.into_iter().map(Into::into).collect(),
        });
        self
    }

    /// Shorthand for a [`MAIN_COMPONENT`] with the given capabilities.
    #[must_use]
    pub fn capabilities<I, C>(self, capabilities: I) -> Self
    where
        I: IntoIterator<Item = C>,
        C: Into<Capability>,
    {
        self.component(MAIN_COMPONENT, capabilities)
    }

    /// Build the [`Device`].
    ///
    /// # Errors
    ///
    /// Returns [`ValidationError::EmptyDeviceId`] if no id (or a blank id)
    /// was provided.
    pub fn build(self) -> Result<Device, ValidationError> {
        let device_id = DeviceId::new(self.device_id.unwrap_or_default())?;
        Ok(Device {
            device_id,
            label: self.label,
            name: self.name,
            manufacturer_name: self.manufacturer_name,
            device_type_id: self.device_type_id,
            presentation_id: self.presentation_id,
            components: self.components,
        })
    }
}
