//! # acbridge-adapter-http-axum
//!
//! HTTP host adapter built on [axum](https://docs.rs/axum).
//!
//! ## Responsibilities
//! - Provide an in-memory [`AccessoryHost`](acbridge_app::ports::AccessoryHost)
//!   with an optional JSON cache file ([`host::InMemoryAccessoryHost`])
//! - Serve a **JSON API** that drives characteristic reads and writes
//!   through the accessory controllers (`/api/accessories/...`)
//! - Stream characteristic changes and poll failures as **SSE**
//!   (`/api/events/stream`)
//! - Map [`BridgeError`](acbridge_domain::error::BridgeError) into HTTP
//!   status codes
//!
//! ## Dependency rule
//! Depends on `acbridge-app` (for port traits and controllers) and
//! `acbridge-domain` (for domain types used in request/response mapping).
//! Never leaks axum types into the domain.

pub mod api;
pub mod error;
pub mod host;
pub mod router;
pub mod state;
