//! # RFQ Events
//!
//! Domain events for the RFQ distribution-and-quoting lifecycle.
//!
//! ```text
//! RfqCreated → RfqDistributed* → QuoteSubmitted* → RfqStatusChanged → RfqDeleted
//! ```
//!
//! Events are emitted after the corresponding state change has been
//! persisted and are consumed by the realtime/notification subsystem for
//! UI updates. Delivery is best-effort; no operation blocks on it.

use crate::domain::events::domain_event::{DomainEvent, EventMetadata};
use crate::domain::value_objects::{
    DistributionType, EventId, Price, RfqId, RfqStatus, SellerId, Timestamp, UserId,
};
use serde::{Deserialize, Serialize};

/// Event emitted when a new RFQ is created.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct RfqCreated {
    /// Event metadata.
    pub metadata: EventMetadata,
    /// Who created the record (buyer or admin).
    pub created_by: UserId,
    /// Headline of the requirement.
    pub title: String,
    /// Initial lifecycle status.
    pub status: RfqStatus,
    /// Seller visibility policy.
    pub distribution_type: DistributionType,
}

impl RfqCreated {
    /// Creates a new `RfqCreated` event.
    #[must_use]
    pub fn new(
        rfq_id: RfqId,
        created_by: UserId,
        title: impl Into<String>,
        status: RfqStatus,
        distribution_type: DistributionType,
    ) -> Self {
        Self {
            metadata: EventMetadata::for_rfq(rfq_id),
            created_by,
            title: title.into(),
            status,
            distribution_type,
        }
    }
}

/// Event emitted when an admin grows an RFQ's seller allow-list.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct RfqDistributed {
    /// Event metadata.
    pub metadata: EventMetadata,
    /// Sellers newly added by this distribution (already-present ids are
    /// not repeated).
    pub added_seller_ids: Vec<SellerId>,
    /// Size of the allow-list after the union.
    pub target_count: usize,
}

impl RfqDistributed {
    /// Creates a new `RfqDistributed` event.
    #[must_use]
    pub fn new(rfq_id: RfqId, added_seller_ids: Vec<SellerId>, target_count: usize) -> Self {
        Self {
            metadata: EventMetadata::for_rfq(rfq_id),
            added_seller_ids,
            target_count,
        }
    }
}

/// Event emitted when a seller submits (or replaces) a quote.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct QuoteSubmitted {
    /// Event metadata.
    pub metadata: EventMetadata,
    /// The quoting seller.
    pub seller_id: SellerId,
    /// The quoted price.
    pub quote_price: Price,
    /// True when this submission replaced an earlier quote by the same
    /// seller.
    pub resubmission: bool,
}

impl QuoteSubmitted {
    /// Creates a new `QuoteSubmitted` event.
    #[must_use]
    pub fn new(rfq_id: RfqId, seller_id: SellerId, quote_price: Price, resubmission: bool) -> Self {
        Self {
            metadata: EventMetadata::for_rfq(rfq_id),
            seller_id,
            quote_price,
            resubmission,
        }
    }
}

/// Event emitted when an RFQ moves through its state machine.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct RfqStatusChanged {
    /// Event metadata.
    pub metadata: EventMetadata,
    /// Status before the transition.
    pub from: RfqStatus,
    /// Status after the transition.
    pub to: RfqStatus,
}

impl RfqStatusChanged {
    /// Creates a new `RfqStatusChanged` event.
    #[must_use]
    pub fn new(rfq_id: RfqId, from: RfqStatus, to: RfqStatus) -> Self {
        Self {
            metadata: EventMetadata::for_rfq(rfq_id),
            from,
            to,
        }
    }
}

/// Event emitted when an RFQ is hard-deleted.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct RfqDeleted {
    /// Event metadata.
    pub metadata: EventMetadata,
}

impl RfqDeleted {
    /// Creates a new `RfqDeleted` event.
    #[must_use]
    pub fn new(rfq_id: RfqId) -> Self {
        Self {
            metadata: EventMetadata::for_rfq(rfq_id),
        }
    }
}

macro_rules! impl_domain_event {
    ($event:ty, $topic:literal) => {
        impl DomainEvent for $event {
            fn event_id(&self) -> EventId {
                self.metadata.event_id
            }

            fn rfq_id(&self) -> RfqId {
                self.metadata.rfq_id
            }

            fn timestamp(&self) -> Timestamp {
                self.metadata.timestamp
            }

            fn topic(&self) -> &'static str {
                $topic
            }
        }
    };
}

impl_domain_event!(RfqCreated, "rfq.created");
impl_domain_event!(RfqDistributed, "rfq.distributed");
impl_domain_event!(QuoteSubmitted, "rfq.quote-submitted");
impl_domain_event!(RfqStatusChanged, "rfq.status-changed");
impl_domain_event!(RfqDeleted, "rfq.deleted");

/// Envelope over every concrete RFQ event.
///
/// This is what crosses the outbound publisher port: a serializable value
/// with a stable topic, free of any transport dependency.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "type", rename_all = "kebab-case")]
pub enum RfqEvent {
    /// A new RFQ exists.
    Created(RfqCreated),
    /// The seller allow-list grew.
    Distributed(RfqDistributed),
    /// A quote was submitted or replaced.
    QuoteSubmitted(QuoteSubmitted),
    /// The lifecycle status changed.
    StatusChanged(RfqStatusChanged),
    /// The RFQ was hard-deleted.
    Deleted(RfqDeleted),
}

impl RfqEvent {
    /// Returns the stable topic for this event.
    #[must_use]
    pub fn topic(&self) -> &'static str {
        match self {
            Self::Created(e) => e.topic(),
            Self::Distributed(e) => e.topic(),
            Self::QuoteSubmitted(e) => e.topic(),
            Self::StatusChanged(e) => e.topic(),
            Self::Deleted(e) => e.topic(),
        }
    }

    /// Returns the RFQ this event relates to.
    #[must_use]
    pub fn rfq_id(&self) -> RfqId {
        match self {
            Self::Created(e) => e.rfq_id(),
            Self::Distributed(e) => e.rfq_id(),
            Self::QuoteSubmitted(e) => e.rfq_id(),
            Self::StatusChanged(e) => e.rfq_id(),
            Self::Deleted(e) => e.rfq_id(),
        }
    }
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use super::*;
    use rust_decimal::Decimal;

    #[test]
    fn topics_are_stable() {
        let rfq_id = RfqId::new_v4();
        assert_eq!(
            RfqEvent::Created(RfqCreated::new(
                rfq_id,
                UserId::new("u1"),
                "t",
                RfqStatus::Draft,
                DistributionType::All,
            ))
            .topic(),
            "rfq.created"
        );
        assert_eq!(
            RfqEvent::Distributed(RfqDistributed::new(rfq_id, vec![], 0)).topic(),
            "rfq.distributed"
        );
        assert_eq!(
            RfqEvent::Deleted(RfqDeleted::new(rfq_id)).topic(),
            "rfq.deleted"
        );
    }

    #[test]
    fn envelope_exposes_rfq_id() {
        let rfq_id = RfqId::new_v4();
        let event = RfqEvent::StatusChanged(RfqStatusChanged::new(
            rfq_id,
            RfqStatus::Draft,
            RfqStatus::Published,
        ));
        assert_eq!(event.rfq_id(), rfq_id);
    }

    #[test]
    fn quote_submitted_serde_roundtrip() {
        let event = RfqEvent::QuoteSubmitted(QuoteSubmitted::new(
            RfqId::new_v4(),
            SellerId::new("s1"),
            Price::new(Decimal::new(100, 0)).unwrap(),
            true,
        ));

        let json = serde_json::to_string(&event).unwrap();
        assert!(json.contains("quote-submitted"));
        let back: RfqEvent = serde_json::from_str(&json).unwrap();
        assert_eq!(event, back);
    }
}
