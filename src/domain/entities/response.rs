//! # Quote Response Entity
//!
//! A seller's priced offer against an RFQ.
//!
//! Responses live entirely inside their owning [`Rfq`](super::rfq::Rfq)
//! aggregate: they are created on first submission, replaced wholesale on
//! resubmission, and deleted with the aggregate. At most one response
//! exists per seller.

use crate::domain::value_objects::{Price, Quantity, ResponseStatus, SellerId, Timestamp};
use serde::{Deserialize, Serialize};
use std::fmt;

/// A seller's quote response, keyed by seller identity within one RFQ.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct QuoteResponse {
    /// The seller who submitted this response.
    seller_ref: SellerId,
    /// Quoted unit price.
    quote_price: Price,
    /// Quantity the seller is offering.
    quote_quantity: Quantity,
    /// Promised delivery time in days.
    delivery_time_days: u32,
    /// Free-text note from the seller.
    message: Option<String>,
    /// Response lifecycle status.
    status: ResponseStatus,
    /// When this response was (last) submitted.
    submitted_at: Timestamp,
}

impl QuoteResponse {
    /// Creates a freshly submitted response.
    ///
    /// Status is `Submitted` and `submitted_at` is the current moment;
    /// resubmission by the same seller replaces the whole record, so the
    /// timestamp always reflects the latest submission.
    #[must_use]
    pub fn submitted(
        seller_ref: SellerId,
        quote_price: Price,
        quote_quantity: Quantity,
        delivery_time_days: u32,
        message: Option<String>,
    ) -> Self {
        Self {
            seller_ref,
            quote_price,
            quote_quantity,
            delivery_time_days,
            message,
            status: ResponseStatus::Submitted,
            submitted_at: Timestamp::now(),
        }
    }

    /// Reconstructs a response from stored parts.
    #[must_use]
    pub fn from_parts(
        seller_ref: SellerId,
        quote_price: Price,
        quote_quantity: Quantity,
        delivery_time_days: u32,
        message: Option<String>,
        status: ResponseStatus,
        submitted_at: Timestamp,
    ) -> Self {
        Self {
            seller_ref,
            quote_price,
            quote_quantity,
            delivery_time_days,
            message,
            status,
            submitted_at,
        }
    }

    /// Returns the submitting seller.
    #[inline]
    #[must_use]
    pub fn seller_ref(&self) -> &SellerId {
        &self.seller_ref
    }

    /// Returns the quoted price.
    #[inline]
    #[must_use]
    pub fn quote_price(&self) -> Price {
        self.quote_price
    }

    /// Returns the offered quantity.
    #[inline]
    #[must_use]
    pub fn quote_quantity(&self) -> Quantity {
        self.quote_quantity
    }

    /// Returns the promised delivery time in days.
    #[inline]
    #[must_use]
    pub fn delivery_time_days(&self) -> u32 {
        self.delivery_time_days
    }

    /// Returns the seller's note, if any.
    #[inline]
    #[must_use]
    pub fn message(&self) -> Option<&str> {
        self.message.as_deref()
    }

    /// Returns the response status.
    #[inline]
    #[must_use]
    pub fn status(&self) -> ResponseStatus {
        self.status
    }

    /// Returns when this response was last submitted.
    #[inline]
    #[must_use]
    pub fn submitted_at(&self) -> Timestamp {
        self.submitted_at
    }
}

impl fmt::Display for QuoteResponse {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "Response({} x{} @ {} [{}])",
            self.seller_ref, self.quote_quantity, self.quote_price, self.status
        )
    }
}
