//! Device cloud port — the remote API that owns the air conditioners.
//!
//! Implementations handle transport and authentication and hand back typed
//! domain values. They do not interpret status documents or command
//! outcomes; that is the [`DeviceAdapter`](crate::device_adapter::DeviceAdapter)'s job.

use std::future::Future;

use acbridge_domain::command::{Command, CommandOutcome};
use acbridge_domain::device::Device;
use acbridge_domain::error::BridgeError;
use acbridge_domain::id::DeviceId;
use acbridge_domain::status::DeviceStatus;

/// Remote device API.
pub trait DeviceCloud {
    /// List every device visible to the account, across all pages.
    fn list_devices(&self) -> impl Future<Output = Result<Vec<Device>, BridgeError>> + Send;

    /// Fetch the full status document of one device.
    fn get_status(
        &self,
        device_id: &DeviceId,
    ) -> impl Future<Output = Result<DeviceStatus, BridgeError>> + Send;

    /// Send one command and report what the cloud answered.
    ///
    /// A refused command is an `Ok` outcome with a non-success status; only
    /// transport failures are errors.
    fn execute_command(
        &self,
        device_id: &DeviceId,
        command: &Command,
    ) -> impl Future<Output = Result<CommandOutcome, BridgeError>> + Send;
}

impl<T: DeviceCloud + Send + Sync> DeviceCloud for std::sync::Arc<T> {
    fn list_devices(&self) -> impl Future<Output = Result<Vec<Device>, BridgeError>> + Send {
        (**self).list_devices()
    }

    fn get_status(
        &self,
        device_id: &DeviceId,
    ) -> impl Future<Output = Result<DeviceStatus, BridgeError>> + Send {
        (**self).get_status(device_id)
    }

    fn execute_command(
        &self,
        device_id: &DeviceId,
        command: &Command,
    ) -> impl Future<Output = Result<CommandOutcome, BridgeError>> + Send {
        (**self).execute_command(device_id, command)
    }
}
