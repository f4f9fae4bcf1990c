//! Port definitions — traits that adapters implement.
//!
//! Ports are the boundaries between the application core and the outside world.
//! They are defined here (in `app`) so that both the use-case layer and the
//! adapter layer can depend on them without creating circular dependencies.

pub mod accessory_host;
pub mod device_cloud;
pub mod event_bus;

pub use accessory_host::AccessoryHost;
pub use device_cloud::DeviceCloud;
pub use event_bus::EventPublisher;
