//! Accessory host port — the home-automation host's accessory registry.
//!
//! The host keeps accessories across restarts. On startup the platform asks
//! for that cache, then tells the host which accessories are new, which were
//! restored (with refreshed context) and which are gone.

use std::future::Future;

use acbridge_domain::accessory::PlatformAccessory;
use acbridge_domain::error::BridgeError;

/// Host-side accessory registration and cache.
pub trait AccessoryHost {
    /// Accessories the host restored from its cache.
    fn cached_accessories(
        &self,
    ) -> impl Future<Output = Result<Vec<PlatformAccessory>, BridgeError>> + Send;

    /// Register newly created accessories in one batch.
    fn register_accessories(
        &self,
        accessories: &[PlatformAccessory],
    ) -> impl Future<Output = Result<(), BridgeError>> + Send;

    /// Persist refreshed context of restored accessories.
    fn update_accessories(
        &self,
        accessories: &[PlatformAccessory],
    ) -> impl Future<Output = Result<(), BridgeError>> + Send;

    /// Remove accessories whose device is no longer eligible.
    fn unregister_accessories(
        &self,
        accessories: &[PlatformAccessory],
    ) -> impl Future<Output = Result<(), BridgeError>> + Send;
}

impl<T: AccessoryHost + Send + Sync> AccessoryHost for std::sync::Arc<T> {
    fn cached_accessories(
        &self,
    ) -> impl Future<Output = Result<Vec<PlatformAccessory>, BridgeError>> + Send {
        (**self).cached_accessories()
    }

    fn register_accessories(
        &self,
        accessories: &[PlatformAccessory],
    ) -> impl Future<Output = Result<(), BridgeError>> + Send {
        (**self).register_accessories(accessories)
    }

    fn update_accessories(
        &self,
        accessories: &[PlatformAccessory],
    ) -> impl Future<Output = Result<(), BridgeError>> + Send {
        (**self).update_accessories(accessories)
    }

    fn unregister_accessories(
        &self,
        accessories: &[PlatformAccessory],
    ) -> impl Future<Output = Result<(), BridgeError>> + Send {
        (**self).unregister_accessories(accessories)
    }
}
