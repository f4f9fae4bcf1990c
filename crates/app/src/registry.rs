//! Controller registry — routes host requests to accessory controllers.

use std::collections::BTreeMap;
use std::sync::{Arc, Mutex, PoisonError};

use tokio::task::JoinHandle;

use acbridge_domain::error::NotFoundError;
use acbridge_domain::id::DeviceId;

use crate::controller::AccessoryController;

/// Running controllers keyed by device id, plus their polling tasks.
pub struct ControllerRegistry<C, P> {
    controllers: BTreeMap<DeviceId, Arc<AccessoryController<C, P>>>,
    tasks: Mutex<Vec<JoinHandle<()>>>,
}

impl<C, P> ControllerRegistry<C, P> {
    #[must_use]
    pub fn new() -> Self {
        Self {
            controllers: BTreeMap::new(),
            tasks: Mutex::new(Vec::new()),
        }
    }

    /// Add a controller and the task polling it.
    pub fn insert(
        &mut self,
        device_id: DeviceId,
        controller: Arc<AccessoryController<C, P>>,
        task: Option<JoinHandle<()>>,
    ) {
        self.controllers.insert(device_id, controller);
        if let Some(task) = task {
            self.tasks
                .get_mut()
                .unwrap_or_else(PoisonError::into_inner)
                .push(task);
        }
    }

    /// Look up the controller of a device.
    ///
    /// # Errors
    ///
    /// Returns [`NotFoundError`] when no accessory is bound to `device_id`.
    pub fn get(
        &self,
        device_id: &DeviceId,
    ) -> Result<&Arc<AccessoryController<C, P>>, NotFoundError> {
        self.controllers.get(device_id).ok_or_else(|| NotFoundError {
            entity: "Accessory",
            id: device_id.to_string(),
        })
    }

    /// Controllers in device id order.
    pub fn iter(&self) -> impl Iterator<Item = &Arc<AccessoryController<C, P>>> {
        self.controllers.values()
    }

    #[must_use]
    pub fn len(&self) -> usize {
        self.controllers.len()
    }

    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.controllers.is_empty()
    }

    /// Abort every polling task. Controllers stay readable.
    pub fn shutdown(&self) {
        let mut tasks = self.tasks.lock().unwrap_or_else(PoisonError::into_inner);
        let count = tasks.len();
        for task in tasks.drain(..) {
            task.abort();
        }
        if count > 0 {
            tracing::debug!(count, "polling tasks aborted");
        }
    }
}

impl<C, P> Default for ControllerRegistry<C, P> {
    fn default() -> Self {
        Self::new()
    }
}

impl<C, P> Drop for ControllerRegistry<C, P> {
    fn drop(&mut self) {
        self.shutdown();
    }
}
