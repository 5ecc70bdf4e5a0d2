//! # Outbound Event Publisher
//!
//! Fire-and-forget publication of [`RfqEvent`]s for the realtime and
//! notification subsystems.
//!
//! The port is deliberately synchronous and infallible from the caller's
//! point of view: services publish after their state change has been
//! persisted and never block a request on delivery. Implementations that
//! do real I/O hand the event off to a background task and log failures.

use crate::domain::events::rfq_events::RfqEvent;
use parking_lot::RwLock;
use std::fmt;

/// Outbound topic-and-payload publisher.
pub trait EventPublisher: Send + Sync + fmt::Debug {
    /// Publishes an event. Must not block on delivery.
    fn publish(&self, event: RfqEvent);
}

/// [`EventPublisher`] that emits events to the tracing log.
///
/// The default wiring when no message broker is configured.
#[derive(Debug, Clone, Copy, Default)]
pub struct TracingEventPublisher;

impl EventPublisher for TracingEventPublisher {
    fn publish(&self, event: RfqEvent) {
        tracing::info!(
            topic = event.topic(),
            rfq_id = %event.rfq_id(),
            "domain event published"
        );
    }
}

/// [`EventPublisher`] that records events for inspection in tests.
#[derive(Debug, Default)]
pub struct RecordingEventPublisher {
    events: RwLock<Vec<RfqEvent>>,
}

impl RecordingEventPublisher {
    /// Creates an empty recorder.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Returns a snapshot of the published events.
    #[must_use]
    pub fn events(&self) -> Vec<RfqEvent> {
        self.events.read().clone()
    }

    /// Returns the topics published so far, in order.
    #[must_use]
    pub fn topics(&self) -> Vec<&'static str> {
        self.events.read().iter().map(RfqEvent::topic).collect()
    }
}

impl EventPublisher for RecordingEventPublisher {
    fn publish(&self, event: RfqEvent) {
        self.events.write().push(event);
    }
}

/// [`EventPublisher`] over a NATS subject per topic.
///
/// Publication happens on a spawned task; a broker outage degrades to a
/// warning, never to a failed request.
#[cfg(feature = "nats")]
#[derive(Debug, Clone)]
pub struct NatsEventPublisher {
    client: async_nats::Client,
}

#[cfg(feature = "nats")]
impl NatsEventPublisher {
    /// Creates a publisher over an established NATS connection.
    #[must_use]
    pub fn new(client: async_nats::Client) -> Self {
        Self { client }
    }
}

#[cfg(feature = "nats")]
impl EventPublisher for NatsEventPublisher {
    fn publish(&self, event: RfqEvent) {
        let client = self.client.clone();
        let topic = event.topic();
        let rfq_id = event.rfq_id();

        let payload = match serde_json::to_vec(&event) {
            Ok(payload) => payload,
            Err(error) => {
                tracing::warn!(topic, %rfq_id, %error, "failed to encode domain event");
                return;
            }
        };

        tokio::spawn(async move {
            if let Err(error) = client.publish(topic.to_string(), payload.into()).await {
                tracing::warn!(topic, %rfq_id, %error, "failed to publish domain event");
            }
        });
    }
}
