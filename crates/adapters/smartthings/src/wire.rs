//! JSON shapes of the SmartThings REST API.

use serde::{Deserialize, Serialize};

use acbridge_domain::command::{Command, CommandOutcome};
use acbridge_domain::device::Device;
use acbridge_domain::error::ValidationError;

/// One page of `GET /devices`.
#[derive(Debug, Default, Deserialize)]
pub(crate) struct DevicePage {
    #[serde(default)]
    pub items: Vec<DeviceItem>,
    #[serde(default, rename = "_links")]
    pub links: Option<Links>,
}

impl DevicePage {
    /// Absolute URL of the next page, if any.
    pub fn next_href(&self) -> Option<&str> {
        self.links
            .as_ref()
            .and_then(|links| links.next.as_ref())
            .map(|link| link.href.as_str())
    }
}

#[derive(Debug, Default, Deserialize)]
pub(crate) struct Links {
    #[serde(default)]
    pub next: Option<Link>,
}

#[derive(Debug, Deserialize)]
pub(crate) struct Link {
    pub href: String,
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
pub(crate) struct DeviceItem {
    #[serde(default)]
    pub device_id: String,
    pub label: Option<String>,
    pub name: Option<String>,
    pub manufacturer_name: Option<String>,
    pub device_type_id: Option<String>,
    pub presentation_id: Option<String>,
    #[serde(default)]
    pub components: Vec<ComponentItem>,
}

#[derive(Debug, Deserialize)]
pub(crate) struct ComponentItem {
    pub id: String,
    #[serde(default)]
    pub capabilities: Vec<CapabilityRef>,
}

#[derive(Debug, Deserialize)]
pub(crate) struct CapabilityRef {
    pub id: String,
}

impl DeviceItem {
    pub fn into_device(self) -> Result<Device, ValidationError> {
        let mut builder = Device::builder().device_id(self.device_id);
        if let Some(label) = self.label {
            builder = builder.label(label);
        }
        if let Some(name) = self.name {
            builder = builder.name(name);
        }
        if let Some(manufacturer) = self.manufacturer_name {
            builder = builder.manufacturer(manufacturer);
        }
        if let Some(model) = self.device_type_id {
            builder = builder.model(model);
        }
        if let Some(serial) = self.presentation_id {
            builder = builder.serial_number(serial);
        }
        for component in self.components {
            builder = builder.component(
                component.id,
                component.capabilities.into_iter().map(|cap| cap.id),
            );
        }
        builder.build()
    }
}

/// Body of `POST /devices/{id}/commands`.
#[derive(Debug, Serialize)]
pub(crate) struct CommandRequest<'a> {
    pub commands: [&'a Command; 1],
}

/// Answer to a command request.
///
/// Older API revisions answer with a single `status`, current ones with one
/// result per command (`ACCEPTED`, `COMPLETED`, `FAILED`, ...).
#[derive(Debug, Default, Deserialize)]
pub(crate) struct CommandResponse {
    #[serde(default)]
    pub status: Option<String>,
    #[serde(default)]
    pub results: Vec<CommandResult>,
}

#[derive(Debug, Deserialize)]
pub(crate) struct CommandResult {
    pub status: String,
}

const ACCEPTED_RESULTS: [&str; 2] = ["ACCEPTED", "COMPLETED"];

/// Status reported when the answer carries none at all.
const NO_STATUS: &str = "missing";

impl CommandResponse {
    pub fn into_outcome(self) -> CommandOutcome {
        if let Some(status) = self.status {
            return CommandOutcome { status };
        }
        if self.results.is_empty() {
            return CommandOutcome {
                status: NO_STATUS.to_string(),
            };
        }
        match self.results.into_iter().find(|result| {
            !ACCEPTED_RESULTS
                .iter()
                .any(|ok| result.status.eq_ignore_ascii_case(ok))
        }) {
            Some(rejected) => CommandOutcome {
                status: rejected.status.to_ascii_lowercase(),
            },
            None => CommandOutcome::success(),
        }
    }
}

/// Error body returned by the API on non-2xx answers.
#[derive(Debug, Deserialize)]
pub(crate) struct ErrorBody {
    pub error: ErrorDetail,
}

#[derive(Debug, Deserialize)]
pub(crate) struct ErrorDetail {
    #[serde(default)]
    pub code: Option<String>,
    #[serde(default)]
    pub message: Option<String>,
}

/// Human readable message out of an error body, falling back to the raw text.
pub(crate) fn error_message(body: &str) -> String {
    match serde_json::from_str::<ErrorBody>(body) {
        Ok(ErrorBody { error }) => error
            .message
            .or(error.code)
            .unwrap_or_else(|| "unknown error".to_string()),
        Err(_) if body.trim().is_empty() => "empty response".to_string(),
        Err(_) => body.chars().take(200).collect(),
    }
}
