//! Shared application state for axum handlers.

use std::sync::Arc;

use acbridge_app::event_bus::InProcessEventBus;
use acbridge_app::registry::ControllerRegistry;

/// Application state shared across all axum handlers.
///
/// Generic over the controllers' cloud and publisher types to avoid dynamic
/// dispatch. `Clone` is implemented manually so the underlying types
/// themselves do not need to be `Clone`; only the `Arc` wrappers are cloned.
pub struct AppState<C, P> {
    /// Running accessory controllers keyed by device id.
    pub registry: Arc<ControllerRegistry<C, P>>,
    /// Event bus the controllers publish to, for the SSE stream.
    pub event_bus: InProcessEventBus,
}

impl<C, P> Clone for AppState<C, P> {
    fn clone(&self) -> Self {
        Self {
            registry: Arc::clone(&self.registry),
            event_bus: self.event_bus.clone(),
        }
    }
}

impl<C, P> AppState<C, P> {
    /// Create a new application state.
    pub fn new(registry: ControllerRegistry<C, P>, event_bus: InProcessEventBus) -> Self {
        Self::from_arc(Arc::new(registry), event_bus)
    }

    /// Create a new application state from a registry already shared with
    /// the caller (which keeps it to shut polling down).
    pub fn from_arc(registry: Arc<ControllerRegistry<C, P>>, event_bus: InProcessEventBus) -> Self {
        Self {
            registry,
            event_bus,
        }
    }
}
