//! # acbridge-adapter-smartthings
//!
//! SmartThings adapter — implements the [`DeviceCloud`](acbridge_app::ports::DeviceCloud)
//! port over the SmartThings REST API.
//!
//! ## Endpoints
//! - `GET {base}/devices` — device list, paginated through `_links.next.href`
//! - `GET {base}/devices/{id}/status` — full status document
//! - `POST {base}/devices/{id}/commands` — `{"commands": [...]}`
//!
//! Every request carries `Authorization: Bearer <token>`.
//!
//! ## Dependency rule
//! Depends on `acbridge-domain` and `acbridge-app` (for the port trait).

pub mod client;
pub mod config;
pub mod error;
mod wire;

pub use client::SmartThingsClient;
pub use config::SmartThingsConfig;
pub use error::SmartThingsError;
