//! Platform — startup discovery and accessory lifecycle.
//!
//! On start the platform reconciles the host's cached accessories with the
//! devices the cloud currently lists, tells the host what changed, and builds
//! one [`AccessoryController`] per eligible device.

use std::collections::{HashMap, HashSet};
use std::sync::Arc;
use std::time::Duration;

use acbridge_domain::accessory::PlatformAccessory;
use acbridge_domain::device::Device;
use acbridge_domain::error::{BridgeError, ValidationError};
use acbridge_domain::id::DeviceId;

use crate::controller::{AccessoryController, DEFAULT_POLL_INTERVAL};
use crate::ports::{AccessoryHost, DeviceCloud, EventPublisher};
use crate::registry::ControllerRegistry;

/// Platform settings.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct PlatformConfig {
    pub poll_interval: Duration,
}

impl Default for PlatformConfig {
    fn default() -> Self {
        Self {
            poll_interval: DEFAULT_POLL_INTERVAL,
        }
    }
}

/// A listed device that cannot be bridged.
#[derive(Debug, Clone, PartialEq)]
pub struct Exclusion {
    pub device: Device,
    pub reason: ValidationError,
}

/// Outcome of matching cached accessories against listed devices.
#[derive(Debug, Default, Clone, PartialEq)]
pub struct Reconciliation {
    /// Cached accessories whose device is still eligible, with refreshed context.
    pub restored: Vec<PlatformAccessory>,
    /// Accessories created for devices the host has not seen before.
    pub added: Vec<PlatformAccessory>,
    /// Cached accessories with no eligible device left.
    pub removed: Vec<PlatformAccessory>,
    pub excluded: Vec<Exclusion>,
}

impl Reconciliation {
    /// Accessories that get a controller.
    pub fn active(&self) -> impl Iterator<Item = &PlatformAccessory> {
        self.restored.iter().chain(self.added.iter())
    }
}

/// Match cached accessories to devices by device id.
///
/// Devices lacking a required capability are excluded; a cached accessory
/// bound to an excluded device is removed. Duplicate listings of the same
/// device id are ignored after the first.
#[must_use]
pub fn reconcile(cached: Vec<PlatformAccessory>, devices: Vec<Device>) -> Reconciliation {
    let mut cached: HashMap<DeviceId, PlatformAccessory> = cached
        .into_iter()
        .map(|accessory| (accessory.device_id().clone(), accessory))
        .collect();
    let mut seen = HashSet::new();
    let mut result = Reconciliation::default();

    for device in devices {
        if !seen.insert(device.device_id.clone()) {
            continue;
        }
        if let Err(reason) = device.ensure_required_capabilities() {
            result.excluded.push(Exclusion { device, reason });
            continue;
        }
        match cached.remove(&device.device_id) {
            Some(mut accessory) => {
                accessory.refresh_context(device);
                result.restored.push(accessory);
            }
            None => result.added.push(PlatformAccessory::for_device(device)),
        }
    }

    result.removed = cached.into_values().collect();
    result
        .removed
        .sort_by(|a, b| a.device_id().cmp(b.device_id()));
    result
}

/// Discovers devices and owns the controllers built for them.
pub struct Platform<C, H, P> {
    cloud: Arc<C>,
    host: H,
    publisher: P,
    config: PlatformConfig,
}

impl<C, H, P> Platform<C, H, P>
where
    C: DeviceCloud + Send + Sync + 'static,
    H: AccessoryHost + Send + Sync,
    P: EventPublisher + Clone + Send + Sync + 'static,
{
    pub fn new(cloud: C, host: H, publisher: P, config: PlatformConfig) -> Self {
        Self {
            cloud: Arc::new(cloud),
            host,
            publisher,
            config,
        }
    }

    /// Run discovery and start one polling controller per eligible device.
    ///
    /// An initial refresh failure is logged and leaves that controller
    /// without a cached status until the next successful poll.
    ///
    /// # Errors
    ///
    /// Returns an error when the host cache or the device list cannot be
    /// read, or when the host rejects a registration change.
    #[tracing::instrument(skip(self))]
    pub async fn start(&self) -> Result<ControllerRegistry<Arc<C>, P>, BridgeError> {
        let cached = self.host.cached_accessories().await?;
        tracing::debug!(count = cached.len(), "loaded cached accessories");

        let devices = self.cloud.list_devices().await?;
        tracing::info!(count = devices.len(), "listed devices");

        let reconciliation = reconcile(cached, devices);
        for exclusion in &reconciliation.excluded {
            tracing::info!(
                device_id = %exclusion.device.device_id,
                name = exclusion.device.display_name(),
                reason = %exclusion.reason,
                "device excluded"
            );
        }

        if !reconciliation.added.is_empty() {
            self.host
                .register_accessories(&reconciliation.added)
                .await?;
            tracing::info!(count = reconciliation.added.len(), "registered new accessories");
        }
        if !reconciliation.restored.is_empty() {
            self.host
                .update_accessories(&reconciliation.restored)
                .await?;
            tracing::info!(count = reconciliation.restored.len(), "restored cached accessories");
        }
        if !reconciliation.removed.is_empty() {
            self.host
                .unregister_accessories(&reconciliation.removed)
                .await?;
            tracing::info!(count = reconciliation.removed.len(), "unregistered stale accessories");
        }

        let mut registry = ControllerRegistry::new();
        for accessory in reconciliation.active() {
            let controller = Arc::new(AccessoryController::new(
                accessory.clone(),
                Arc::clone(&self.cloud),
                self.publisher.clone(),
                self.config.poll_interval,
            ));
            if let Err(err) = controller.refresh().await {
                tracing::warn!(device_id = %accessory.device_id(), %err, "initial refresh failed");
            }
            let task = controller.spawn_polling();
            registry.insert(accessory.device_id().clone(), controller, Some(task));
        }

        tracing::info!(
            accessories = registry.len(),
            poll_interval_secs = self.config.poll_interval.as_secs(),
            "platform started"
        );
        Ok(registry)
    }
}
