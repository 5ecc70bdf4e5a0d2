//! # Domain Events
//!
//! Immutable records of state changes in the RFQ core, published
//! fire-and-forget for the realtime/notification subsystem.

pub mod domain_event;
pub mod rfq_events;

pub use domain_event::{DomainEvent, EventMetadata};
pub use rfq_events::{
    QuoteSubmitted, RfqCreated, RfqDeleted, RfqDistributed, RfqEvent, RfqStatusChanged,
};
