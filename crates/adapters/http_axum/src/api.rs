//! JSON REST API handler modules.

#[allow(clippy::missing_errors_doc)]
pub mod accessories;
pub mod sse;

use axum::Router;
use axum::routing::{get, post};

use acbridge_app::ports::{DeviceCloud, EventPublisher};

use crate::state::AppState;

/// Build the `/api` sub-router.
pub fn routes<C, P>() -> Router<AppState<C, P>>
where
    C: DeviceCloud + Send + Sync + 'static,
    P: EventPublisher + Send + Sync + 'static,
{
    Router::new()
        // Accessories
        .route("/accessories", get(accessories::list::<C, P>))
        .route("/accessories/{device_id}", get(accessories::get::<C, P>))
        .route(
            "/accessories/{device_id}/status",
            get(accessories::status::<C, P>),
        )
        .route(
            "/accessories/{device_id}/refresh",
            post(accessories::refresh::<C, P>),
        )
        .route(
            "/accessories/{device_id}/characteristics/{name}",
            get(accessories::read_characteristic::<C, P>)
                .put(accessories::write_characteristic::<C, P>),
        )
        // Events
        .route("/events/stream", get(sse::stream::<C, P>))
}
