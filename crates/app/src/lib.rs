//! # acbridge-app
//!
//! Application layer — use-cases and **port definitions** (traits).
//!
//! ## Responsibilities
//! - Define **port traits** that adapters implement:
//!   - `DeviceCloud` — list devices, read status documents, send commands
//!   - `AccessoryHost` — the host's accessory cache and registration calls
//!   - `EventPublisher` — push characteristic changes to the host
//! - Provide the use-cases built on top of them:
//!   - `DeviceAdapter` — one remote device, flattened status, checked commands
//!   - `AccessoryController` — cached characteristics, optimistic writes, polling
//!   - `Platform` — startup discovery, cache restore, controller registry
//! - Provide **in-process infrastructure** (event bus) that doesn't need IO
//!
//! ## Dependency rule
//! Depends on `acbridge-domain` only (plus `tokio` for channels, timers and tasks).
//! Never imports adapter crates. Adapters depend on *this* crate, not the reverse.

pub mod controller;
pub mod device_adapter;
pub mod event_bus;
pub mod platform;
pub mod ports;
pub mod registry;

#[cfg(test)]
pub(crate) mod testing;
