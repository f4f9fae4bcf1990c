//! Server-Sent Events (SSE) stream of accessory events.

use axum::extract::State;
use axum::response::sse::{Event, KeepAlive, Sse};
use tokio_stream::StreamExt;
use tokio_stream::wrappers::BroadcastStream;
use tokio_stream::wrappers::errors::BroadcastStreamRecvError;

use acbridge_domain::event::{Event as DomainEvent, EventKind};

use crate::state::AppState;

/// `GET /api/events/stream` — SSE stream of characteristic changes and
/// poll failures.
///
/// Subscribes to the event bus and sends JSON-encoded events as SSE `data:`
/// frames, with the event kind as the SSE event name. The stream continues
/// until the client disconnects or the event bus is closed.
pub async fn stream<C, P>(
    State(state): State<AppState<C, P>>,
) -> Sse<impl tokio_stream::Stream<Item = Result<Event, std::convert::Infallible>>>
where
    C: Send + Sync + 'static,
    P: Send + Sync + 'static,
{
    let event_rx = state.event_bus.subscribe();
    let event_stream = BroadcastStream::new(event_rx).filter_map(|result| match result {
        Ok(event) => match Event::default().event(event_name(&event)).json_data(&event) {
            Ok(frame) => Some(Ok(frame)),
            Err(err) => {
                tracing::warn!(%err, "failed to serialize event for SSE stream");
                None
            }
        },
        Err(BroadcastStreamRecvError::Lagged(n)) => {
            tracing::warn!(skipped = n, "SSE subscriber lagged, some events were dropped");
            None
        }
    });

    Sse::new(event_stream).keep_alive(KeepAlive::default())
}

fn event_name(event: &DomainEvent) -> &'static str {
    match event.kind {
        EventKind::CharacteristicChanged { .. } => "characteristic_changed",
        EventKind::PollFailed { .. } => "poll_failed",
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use acbridge_app::event_bus::InProcessEventBus;
    use acbridge_app::ports::EventPublisher;
    use acbridge_app::registry::ControllerRegistry;
    use acbridge_domain::characteristic::{Characteristic, CharacteristicValue};
    use acbridge_domain::id::DeviceId;

    #[tokio::test]
    async fn should_subscribe_to_event_bus_when_stream_created() {
        let event_bus = InProcessEventBus::new(16);
        let state: AppState<(), ()> = AppState::new(ControllerRegistry::new(), event_bus.clone());

        let mut rx = event_bus.subscribe();
        let _sse_response = stream(State(state)).await;

        let event = DomainEvent::characteristic_changed(
            DeviceId::new("ac-1").unwrap(),
            Characteristic::Active,
            CharacteristicValue::Int(1),
        );
        event_bus.publish(event.clone()).await.unwrap();

        let received = rx.recv().await.unwrap();
        assert_eq!(received, event);
        assert_eq!(event_name(&received), "characteristic_changed");
    }

    #[test]
    fn should_name_poll_failures() {
        let event = DomainEvent::new(
            DeviceId::new("ac-1").unwrap(),
            EventKind::PollFailed {
                reason: "offline".to_string(),
            },
        );
        assert_eq!(event_name(&event), "poll_failed");
    }
}
