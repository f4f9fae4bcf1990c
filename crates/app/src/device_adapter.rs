//! Device adapter — one remote device behind a [`DeviceCloud`].
//!
//! Flattens status documents into [`StatusRecord`]s and turns non-success
//! command outcomes into [`BridgeError::CommandFailed`].

use acbridge_domain::capability::Capability;
use acbridge_domain::command::{Command, CommandArgument};
use acbridge_domain::device::Device;
use acbridge_domain::error::BridgeError;
use acbridge_domain::id::DeviceId;
use acbridge_domain::status::StatusRecord;
use acbridge_domain::time::now;

use crate::ports::DeviceCloud;

/// Wraps a single remote device handle.
///
/// The device id is guaranteed non-empty by [`DeviceId`], so a device that
/// made it into a [`Device`] can always be wrapped.
pub struct DeviceAdapter<C> {
    cloud: C,
    device: Device,
}

impl<C: DeviceCloud> DeviceAdapter<C> {
    pub fn new(cloud: C, device: Device) -> Self {
        Self { cloud, device }
    }

    pub fn device(&self) -> &Device {
        &self.device
    }

    pub fn device_id(&self) -> &DeviceId {
        &self.device.device_id
    }

    /// Fetch the status document and flatten it.
    ///
    /// # Errors
    ///
    /// Returns [`BridgeError::StatusUnavailable`] when the document lacks
    /// the `main` component or a required value, or a transport error
    /// from the cloud.
    #[tracing::instrument(skip(self), fields(device_id = %self.device.device_id))]
    pub async fn get_status(&self) -> Result<StatusRecord, BridgeError> {
        let status = self.cloud.get_status(self.device_id()).await?;
        let record = StatusRecord::from_status(&status, now())?;
        tracing::trace!(?record, "status fetched");
        Ok(record)
    }

    /// Send `command` on `capability` of the `main` component.
    ///
    /// # Errors
    ///
    /// Returns [`BridgeError::CommandFailed`] when the cloud does not report
    /// success, or a transport error.
    pub async fn execute_command(
        &self,
        command: &str,
        capability: Capability,
        arguments: Vec<CommandArgument>,
    ) -> Result<(), BridgeError> {
        self.execute(&Command::new(command, capability, arguments))
            .await
    }

    /// Send a prepared command.
    ///
    /// # Errors
    ///
    /// Same as [`execute_command`](Self::execute_command).
    #[tracing::instrument(
        skip(self, command),
        fields(
            device_id = %self.device.device_id,
            capability = %command.capability,
            command = %command.command,
        )
    )]
    pub async fn execute(&self, command: &Command) -> Result<(), BridgeError> {
        let outcome = self
            .cloud
            .execute_command(self.device_id(), command)
            .await?;
        outcome.into_result()?;
        tracing::debug!("command accepted");
        Ok(())
    }
}
