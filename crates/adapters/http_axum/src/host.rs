//! In-memory accessory host with an optional JSON cache file.
//!
//! Stands in for the home-automation host's accessory registry. When a cache
//! path is configured every registration change is written to disk, so the
//! next start restores accessories instead of registering them again.

use std::collections::BTreeMap;
use std::path::{Path, PathBuf};
use std::sync::{Mutex, PoisonError};

use acbridge_app::ports::AccessoryHost;
use acbridge_domain::accessory::PlatformAccessory;
use acbridge_domain::error::BridgeError;
use acbridge_domain::id::DeviceId;

/// Errors reading or writing the accessory cache.
#[derive(Debug, thiserror::Error)]
pub enum HostError {
    #[error("accessory cache I/O failed for {path}")]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("accessory cache is not valid JSON")]
    Json(#[from] serde_json::Error),
}

impl HostError {
    pub fn into_domain(self) -> BridgeError {
        BridgeError::Transport(Box::new(self))
    }
}

impl From<HostError> for BridgeError {
    fn from(err: HostError) -> Self {
        err.into_domain()
    }
}

/// Accessory registry kept in memory.
#[derive(Debug, Default)]
pub struct InMemoryAccessoryHost {
    accessories: Mutex<BTreeMap<DeviceId, PlatformAccessory>>,
    cache_path: Option<PathBuf>,
    /// Serializes registration changes so file and memory commit in order.
    writer: tokio::sync::Mutex<()>,
}

impl InMemoryAccessoryHost {
    /// A host without persistence.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// A host persisted to `path`, loading what is already there.
    ///
    /// A missing file is an empty cache.
    ///
    /// # Errors
    ///
    /// Returns [`HostError`] if the file exists but cannot be read or parsed.
    pub fn with_cache_file(path: impl Into<PathBuf>) -> Result<Self, HostError> {
        let path = path.into();
        let cached = load(&path)?;
        tracing::debug!(path = %path.display(), count = cached.len(), "accessory cache loaded");
        let accessories = cached
            .into_iter()
            .map(|accessory| (accessory.device_id().clone(), accessory))
            .collect();
        Ok(Self {
            accessories: Mutex::new(accessories),
            cache_path: Some(path),
            writer: tokio::sync::Mutex::default(),
        })
    }

    /// Registered accessories in device id order.
    pub fn accessories(&self) -> Vec<PlatformAccessory> {
        self.accessories
            .lock()
            .unwrap_or_else(PoisonError::into_inner)
            .values()
            .cloned()
            .collect()
    }

    /// Apply `change` to a copy of the registry, persist the copy, then
    /// commit it. A failed write leaves memory and disk unchanged.
    async fn modify(
        &self,
        change: impl FnOnce(&mut BTreeMap<DeviceId, PlatformAccessory>),
    ) -> Result<(), HostError> {
        let _writer = self.writer.lock().await;
        let mut next = self
            .accessories
            .lock()
            .unwrap_or_else(PoisonError::into_inner)
            .clone();
        change(&mut next);
        if let Some(path) = &self.cache_path {
            let snapshot: Vec<&PlatformAccessory> = next.values().collect();
            let json = serde_json::to_vec_pretty(&snapshot)?;
            tokio::fs::write(path, json)
                .await
                .map_err(|source| HostError::Io {
                    path: path.clone(),
                    source,
                })?;
        }
        *self.accessories.lock().unwrap_or_else(PoisonError::into_inner) = next;
        Ok(())
    }
}

fn load(path: &Path) -> Result<Vec<PlatformAccessory>, HostError> {
    match std::fs::read(path) {
        Ok(bytes) => Ok(serde_json::from_slice(&bytes)?),
        Err(err) if err.kind() == std::io::ErrorKind::NotFound => Ok(Vec::new()),
        Err(source) => Err(HostError::Io {
            path: path.to_path_buf(),
            source,
        }),
    }
}

impl AccessoryHost for InMemoryAccessoryHost {
    async fn cached_accessories(&self) -> Result<Vec<PlatformAccessory>, BridgeError> {
        Ok(self.accessories())
    }

    async fn register_accessories(
        &self,
        accessories: &[PlatformAccessory],
    ) -> Result<(), BridgeError> {
        self.modify(|registered| {
            for accessory in accessories {
                registered.insert(accessory.device_id().clone(), accessory.clone());
            }
        })
        .await?;
        Ok(())
    }

    async fn update_accessories(
        &self,
        accessories: &[PlatformAccessory],
    ) -> Result<(), BridgeError> {
        self.register_accessories(accessories).await
    }

    async fn unregister_accessories(
        &self,
        accessories: &[PlatformAccessory],
    ) -> Result<(), BridgeError> {
        self.modify(|registered| {
            for accessory in accessories {
                registered.remove(accessory.device_id());
            }
        })
        .await?;
        Ok(())
    }
}
