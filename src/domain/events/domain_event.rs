//! # Domain Event Trait
//!
//! Base trait and common metadata for all domain events.

use crate::domain::value_objects::{EventId, RfqId, Timestamp};
use serde::{Deserialize, Serialize};
use std::fmt;

/// Trait for all domain events.
///
/// Domain events are immutable records of something that happened in the
/// RFQ core. They are handed to the outbound event publisher after the
/// state change has been persisted; delivery is fire-and-forget.
pub trait DomainEvent: Send + Sync + fmt::Debug {
    /// Returns the unique identifier for this event.
    fn event_id(&self) -> EventId;

    /// Returns the RFQ this event relates to.
    fn rfq_id(&self) -> RfqId;

    /// Returns when this event occurred.
    fn timestamp(&self) -> Timestamp;

    /// Returns the stable topic this event is published under.
    fn topic(&self) -> &'static str;
}

/// Common metadata embedded in every concrete event.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct EventMetadata {
    /// Unique identifier for this event.
    pub event_id: EventId,
    /// The RFQ this event relates to.
    pub rfq_id: RfqId,
    /// When this event occurred.
    pub timestamp: Timestamp,
}

impl EventMetadata {
    /// Creates metadata for an RFQ with a generated event id.
    #[must_use]
    pub fn for_rfq(rfq_id: RfqId) -> Self {
        Self {
            event_id: EventId::new_v4(),
            rfq_id,
            timestamp: Timestamp::now(),
        }
    }
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use super::*;

    #[test]
    fn metadata_carries_the_rfq() {
        let rfq_id = RfqId::new_v4();
        let metadata = EventMetadata::for_rfq(rfq_id);
        assert_eq!(metadata.rfq_id, rfq_id);
    }

    #[test]
    fn metadata_serde_roundtrip() {
        let metadata = EventMetadata::for_rfq(RfqId::new_v4());
        let json = serde_json::to_string(&metadata).unwrap();
        let back: EventMetadata = serde_json::from_str(&json).unwrap();
        assert_eq!(metadata, back);
    }
}
