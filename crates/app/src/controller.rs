//! Accessory controller — host characteristic callbacks bound to one device.
//!
//! The controller keeps the last flattened [`StatusRecord`]. Reads are
//! served from that cache without touching the network. Writes are validated,
//! applied to the cache optimistically, then sent to the device; a refused
//! write is rolled back by re-polling. A background task refreshes the cache
//! on a fixed interval and publishes every characteristic that changed.

use std::sync::{Arc, PoisonError, RwLock};
use std::time::Duration;

use tokio::task::JoinHandle;
use tokio::time::MissedTickBehavior;

use acbridge_domain::accessory::PlatformAccessory;
use acbridge_domain::characteristic::{Characteristic, CharacteristicValue};
use acbridge_domain::control::ControlWrite;
use acbridge_domain::error::{BridgeError, StatusUnavailableError, ValidationError};
use acbridge_domain::event::{Event, EventKind};
use acbridge_domain::id::DeviceId;
use acbridge_domain::status::StatusRecord;
use acbridge_domain::time::{is_older_than, now};

use crate::device_adapter::DeviceAdapter;
use crate::ports::{DeviceCloud, EventPublisher};

/// Polling interval used when none is configured.
pub const DEFAULT_POLL_INTERVAL: Duration = Duration::from_secs(15);

/// Binds the host characteristics of one accessory to its device.
pub struct AccessoryController<C, P> {
    accessory: PlatformAccessory,
    adapter: DeviceAdapter<C>,
    publisher: P,
    poll_interval: Duration,
    cache: RwLock<Option<StatusRecord>>,
}

impl<C, P> AccessoryController<C, P>
where
    C: DeviceCloud + Send + Sync,
    P: EventPublisher + Send + Sync,
{
    pub fn new(
        accessory: PlatformAccessory,
        cloud: C,
        publisher: P,
        poll_interval: Duration,
    ) -> Self {
        let adapter = DeviceAdapter::new(cloud, accessory.device.clone());
        Self {
            accessory,
            adapter,
            publisher,
            poll_interval,
            cache: RwLock::new(None),
        }
    }

    pub fn accessory(&self) -> &PlatformAccessory {
        &self.accessory
    }

    pub fn device_id(&self) -> &DeviceId {
        self.adapter.device_id()
    }

    pub fn poll_interval(&self) -> Duration {
        self.poll_interval
    }

    /// Characteristics exposed for this accessory's device.
    pub fn characteristics(&self) -> Vec<Characteristic> {
        Characteristic::ALL
            .into_iter()
            .filter(|ch| self.supports(*ch))
            .collect()
    }

    pub fn supports(&self, characteristic: Characteristic) -> bool {
        characteristic.is_supported_by(self.adapter.device())
    }

    /// Snapshot of the cached record, if any poll succeeded yet.
    pub fn status(&self) -> Option<StatusRecord> {
        self.cache
            .read()
            .unwrap_or_else(PoisonError::into_inner)
            .clone()
    }

    /// Whether the cache is empty or older than twice the poll interval.
    pub fn is_stale(&self) -> bool {
        let cache = self.cache.read().unwrap_or_else(PoisonError::into_inner);
        cache.as_ref().is_none_or(|record| {
            is_older_than(record.fetched_at, self.poll_interval.saturating_mul(2), now())
        })
    }

    /// Read a characteristic from the cache.
    ///
    /// # Errors
    ///
    /// Returns a validation error for characteristics this accessory does
    /// not expose, and [`BridgeError::StatusUnavailable`] before the first
    /// successful poll.
    pub fn get(&self, characteristic: Characteristic) -> Result<CharacteristicValue, BridgeError> {
        self.ensure_supported(characteristic)?;
        let cache = self.cache.read().unwrap_or_else(PoisonError::into_inner);
        let record = cache
            .as_ref()
            .ok_or(StatusUnavailableError::NotYetFetched)?;
        Ok(record.characteristic(characteristic)?)
    }

    /// Write a characteristic.
    ///
    /// The cache reflects the new value immediately. If the device refuses
    /// the command or cannot be reached, the cache is re-polled (or put back
    /// as it was when the re-poll fails too) and the original error is
    /// returned.
    ///
    /// # Errors
    ///
    /// Returns a validation error before any remote call for unsupported,
    /// read-only or out-of-range writes, otherwise the command error.
    #[tracing::instrument(skip(self), fields(device_id = %self.device_id()))]
    pub async fn set(
        &self,
        characteristic: Characteristic,
        value: CharacteristicValue,
    ) -> Result<(), BridgeError> {
        self.ensure_supported(characteristic)?;
        let write = ControlWrite::parse(characteristic, value)?;

        let previous = {
            let mut cache = self.cache.write().unwrap_or_else(PoisonError::into_inner);
            let previous = cache.clone();
            if let Some(record) = cache.as_mut() {
                write.apply(record);
            }
            previous
        };

        if let Err(err) = self.adapter.execute(&write.command()).await {
            tracing::warn!(%err, "command failed, reverting cached status");
            if let Err(refresh_err) = self.refresh().await {
                tracing::warn!(%refresh_err, "could not re-poll after failed command");
                *self.cache.write().unwrap_or_else(PoisonError::into_inner) = previous;
            }
            return Err(err);
        }
        Ok(())
    }

    /// Poll the device now and replace the cache.
    ///
    /// Publishes a [`EventKind::CharacteristicChanged`] event for every
    /// exposed characteristic whose value differs from the previous record.
    ///
    /// # Errors
    ///
    /// Returns the fetch error; the cache is left untouched in that case.
    #[tracing::instrument(skip(self), fields(device_id = %self.device_id()))]
    pub async fn refresh(&self) -> Result<StatusRecord, BridgeError> {
        let record = self.adapter.get_status().await?;
        let previous = self
            .cache
            .write()
            .unwrap_or_else(PoisonError::into_inner)
            .replace(record.clone());

        for characteristic in self.characteristics() {
            let Ok(value) = record.characteristic(characteristic) else {
                continue;
            };
            let before = previous
                .as_ref()
                .and_then(|prev| prev.characteristic(characteristic).ok());
            if before == Some(value) {
                continue;
            }
            let event =
                Event::characteristic_changed(self.device_id().clone(), characteristic, value);
            if let Err(err) = self.publisher.publish(event).await {
                tracing::warn!(%err, %characteristic, "failed to publish change");
            }
        }
        Ok(record)
    }

    /// One scheduled poll; failures are logged and reported as events.
    pub async fn poll_once(&self) {
        match self.refresh().await {
            Ok(_) => tracing::debug!(device_id = %self.device_id(), "poll succeeded"),
            Err(err) => {
                tracing::warn!(
                    device_id = %self.device_id(),
                    %err,
                    "poll failed, keeping cached status"
                );
                let event = Event::new(
                    self.device_id().clone(),
                    EventKind::PollFailed {
                        reason: err.to_string(),
                    },
                );
                if let Err(err) = self.publisher.publish(event).await {
                    tracing::warn!(%err, "failed to publish poll failure");
                }
            }
        }
    }

    fn ensure_supported(&self, characteristic: Characteristic) -> Result<(), ValidationError> {
        if self.supports(characteristic) {
            Ok(())
        } else {
            Err(ValidationError::UnsupportedCharacteristic(characteristic))
        }
    }
}

impl<C, P> AccessoryController<C, P>
where
    C: DeviceCloud + Send + Sync + 'static,
    P: EventPublisher + Send + Sync + 'static,
{
    /// Start the polling timer.
    ///
    /// The first poll happens one interval from now; callers refresh once
    /// themselves at startup. Missed ticks are delayed, not bursted.
    pub fn spawn_polling(self: &Arc<Self>) -> JoinHandle<()> {
        let controller = Arc::clone(self);
        tokio::spawn(async move {
            let mut ticker = tokio::time::interval(controller.poll_interval);
            ticker.set_missed_tick_behavior(MissedTickBehavior::Delay);
            // the first tick completes immediately
            ticker.tick().await;
            loop {
                ticker.tick().await;
                controller.poll_once().await;
            }
        })
    }
}
