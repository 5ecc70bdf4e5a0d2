//! # Domain Errors
//!
//! Error types for business rule violations.

use crate::domain::value_objects::RfqStatus;
use thiserror::Error;

/// Error raised by domain entities and services.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum DomainError {
    /// A required field is missing or malformed.
    #[error("validation error: {0}")]
    Validation(String),

    /// Quantity constraint violated.
    #[error("invalid quantity: {0}")]
    InvalidQuantity(String),

    /// Price constraint violated.
    #[error("invalid price: {0}")]
    InvalidPrice(String),

    /// Attempted status change not permitted by the state machine.
    #[error("invalid status transition: {from} -> {to}")]
    InvalidStateTransition {
        /// Current status.
        from: RfqStatus,
        /// Requested status.
        to: RfqStatus,
    },

    /// A referenced seller is not known to the identity system.
    #[error("unknown seller: {0}")]
    UnknownSeller(String),
}

impl DomainError {
    /// Creates a validation error.
    #[must_use]
    pub fn validation(message: impl Into<String>) -> Self {
        Self::Validation(message.into())
    }

    /// Creates an unknown-seller error naming the offending id.
    #[must_use]
    pub fn unknown_seller(id: impl Into<String>) -> Self {
        Self::UnknownSeller(id.into())
    }

    /// Returns true for state-transition violations.
    #[must_use]
    pub fn is_invalid_transition(&self) -> bool {
        matches!(self, Self::InvalidStateTransition { .. })
    }
}

/// Result type for domain operations.
pub type DomainResult<T> = Result<T, DomainError>;
