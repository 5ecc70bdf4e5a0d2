//! # Application Errors
//!
//! Error taxonomy of the RFQ core, as seen by callers:
//!
//! - [`ApplicationError::NotFound`] - unknown rfq/product/category reference
//! - [`ApplicationError::Forbidden`] - role, ownership, or eligibility failure
//! - [`ApplicationError::Validation`] - missing/invalid field, unknown seller
//!   in a batch, quantity below one
//! - [`ApplicationError::Conflict`] - rejected status transition or lost
//!   optimistic write
//! - [`ApplicationError::Internal`] - storage or collaborator failure
//!
//! Every failure is detected before any write; a failed call never leaves a
//! partial RFQ or partial response behind. Each variant maps to a stable
//! machine-readable code via [`ApplicationError::code`].

use crate::domain::errors::DomainError;
use crate::infrastructure::collaborators::catalog::CatalogError;
use crate::infrastructure::collaborators::identity::IdentityError;
use crate::infrastructure::persistence::traits::RepositoryError;
use thiserror::Error;

/// Application layer error.
#[derive(Debug, Error)]
pub enum ApplicationError {
    /// Input validation failed.
    #[error("validation error: {0}")]
    Validation(String),

    /// A referenced resource does not exist.
    #[error("{resource} not found: {id}")]
    NotFound {
        /// Kind of resource.
        resource: &'static str,
        /// The missing identifier.
        id: String,
    },

    /// The caller may not perform this operation.
    #[error("forbidden: {0}")]
    Forbidden(String),

    /// The operation conflicts with the record's current state.
    #[error("conflict: {0}")]
    Conflict(String),

    /// Storage or collaborator failure.
    #[error("internal error: {0}")]
    Internal(String),
}

impl ApplicationError {
    /// Creates a validation error.
    #[must_use]
    pub fn validation(message: impl Into<String>) -> Self {
        Self::Validation(message.into())
    }

    /// Creates a not-found error.
    #[must_use]
    pub fn not_found(resource: &'static str, id: impl Into<String>) -> Self {
        Self::NotFound {
            resource,
            id: id.into(),
        }
    }

    /// Creates a forbidden error.
    #[must_use]
    pub fn forbidden(message: impl Into<String>) -> Self {
        Self::Forbidden(message.into())
    }

    /// Creates a conflict error.
    #[must_use]
    pub fn conflict(message: impl Into<String>) -> Self {
        Self::Conflict(message.into())
    }

    /// Creates an internal error.
    #[must_use]
    pub fn internal(message: impl Into<String>) -> Self {
        Self::Internal(message.into())
    }

    /// Returns the stable machine-readable code for this error.
    #[must_use]
    pub fn code(&self) -> &'static str {
        match self {
            Self::Validation(_) => "validation_error",
            Self::NotFound { .. } => "not_found",
            Self::Forbidden(_) => "forbidden",
            Self::Conflict(_) => "conflict",
            Self::Internal(_) => "internal_error",
        }
    }

    /// Returns true if this is a not-found error.
    #[must_use]
    pub fn is_not_found(&self) -> bool {
        matches!(self, Self::NotFound { .. })
    }

    /// Returns true if this is a forbidden error.
    #[must_use]
    pub fn is_forbidden(&self) -> bool {
        matches!(self, Self::Forbidden(_))
    }

    /// Returns true if this is a validation error.
    #[must_use]
    pub fn is_validation(&self) -> bool {
        matches!(self, Self::Validation(_))
    }

    /// Returns true if this is a conflict error.
    #[must_use]
    pub fn is_conflict(&self) -> bool {
        matches!(self, Self::Conflict(_))
    }
}

impl From<DomainError> for ApplicationError {
    fn from(err: DomainError) -> Self {
        match err {
            DomainError::Validation(_)
            | DomainError::InvalidQuantity(_)
            | DomainError::InvalidPrice(_)
            | DomainError::UnknownSeller(_) => Self::Validation(err.to_string()),
            DomainError::InvalidStateTransition { .. } => Self::Conflict(err.to_string()),
        }
    }
}

impl From<RepositoryError> for ApplicationError {
    fn from(err: RepositoryError) -> Self {
        match err {
            RepositoryError::NotFound(id) => Self::not_found("rfq", id.to_string()),
            RepositoryError::VersionConflict { .. } => Self::Conflict(err.to_string()),
            RepositoryError::Duplicate(_)
            | RepositoryError::Connection(_)
            | RepositoryError::Query(_)
            | RepositoryError::Serialization(_) => Self::Internal(err.to_string()),
        }
    }
}

impl From<CatalogError> for ApplicationError {
    fn from(err: CatalogError) -> Self {
        Self::Internal(err.to_string())
    }
}

impl From<IdentityError> for ApplicationError {
    fn from(err: IdentityError) -> Self {
        Self::Internal(err.to_string())
    }
}

/// Result type for application operations.
pub type ApplicationResult<T> = Result<T, ApplicationError>;
