//! # acbridge-domain
//!
//! Pure domain model for the acbridge air-conditioner bridge.
//!
//! ## Responsibilities
//! - Foundational types: typed identifiers, error conventions, timestamps
//! - Describe **Devices** as reported by the device cloud (components and
//!   their **Capabilities**)
//! - Describe the nested **status document** and flatten it into a
//!   [`StatusRecord`](status::StatusRecord)
//! - Define the host-side **characteristic** model (active, heater/cooler
//!   states, temperatures, humidity) and the translation of device modes
//!   into host enum values and back
//! - Define **Commands** sent to the device cloud and the success check
//!   applied to their outcome
//!
//! ## Dependency rule
//! This crate has **no internal dependencies**.
//! It must never import anything from `app`, adapters, or external IO crates.
//! All IO boundaries are expressed as traits in the `app` crate (ports).

pub mod error;
pub mod id;
pub mod time;

pub mod accessory;
pub mod capability;
pub mod characteristic;
pub mod command;
pub mod control;
pub mod device;
pub mod event;
pub mod mode;
pub mod status;
