//! # Repository Traits
//!
//! Port definitions for RFQ persistence.
//!
//! The repository is the only mutable shared resource in the system, so
//! its contract carries the concurrency guarantees of the engine:
//!
//! - [`RfqRepository::add_target_sellers`] is an atomic set-union. Two
//!   admins distributing different seller subsets concurrently must both
//!   land; a read-modify-write of the whole list would lose one.
//! - [`RfqRepository::upsert_response`] is an atomic keyed upsert. Two
//!   concurrent submissions by the same seller must leave exactly one
//!   response, equal to one of the two payloads in full.
//! - [`RfqRepository::update`] is a whole-record write guarded by the
//!   aggregate's version counter.

use crate::domain::entities::response::QuoteResponse;
use crate::domain::entities::rfq::Rfq;
use crate::domain::value_objects::{CategoryId, ProductId, RfqId, RfqStatus, SellerId, UserId};
use async_trait::async_trait;
use std::fmt;
use thiserror::Error;

/// Error type for repository operations.
#[derive(Debug, Error)]
pub enum RepositoryError {
    /// Entity not found.
    #[error("rfq not found: {0}")]
    NotFound(RfqId),

    /// Duplicate entity.
    #[error("rfq already exists: {0}")]
    Duplicate(RfqId),

    /// Optimistic locking conflict.
    #[error("version conflict on rfq {id}: expected {expected}, found {actual}")]
    VersionConflict {
        /// Entity identifier.
        id: RfqId,
        /// Version the writer based its change on.
        expected: u64,
        /// Version found in storage.
        actual: u64,
    },

    /// Connection error.
    #[error("connection error: {0}")]
    Connection(String),

    /// Query error.
    #[error("query error: {0}")]
    Query(String),

    /// Serialization error.
    #[error("serialization error: {0}")]
    Serialization(String),
}

impl RepositoryError {
    /// Creates a connection error.
    #[must_use]
    pub fn connection(msg: impl Into<String>) -> Self {
        Self::Connection(msg.into())
    }

    /// Creates a query error.
    #[must_use]
    pub fn query(msg: impl Into<String>) -> Self {
        Self::Query(msg.into())
    }

    /// Creates a serialization error.
    #[must_use]
    pub fn serialization(msg: impl Into<String>) -> Self {
        Self::Serialization(msg.into())
    }

    /// Returns true if this is a not-found error.
    #[must_use]
    pub fn is_not_found(&self) -> bool {
        matches!(self, Self::NotFound(_))
    }

    /// Returns true if this is a version conflict.
    #[must_use]
    pub fn is_version_conflict(&self) -> bool {
        matches!(self, Self::VersionConflict { .. })
    }
}

/// Result type for repository operations.
pub type RepositoryResult<T> = Result<T, RepositoryError>;

/// Storage-level filter for RFQ listings.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct RfqFilter {
    /// Match on lifecycle status.
    pub status: Option<RfqStatus>,
    /// Match on owning buyer.
    pub buyer_ref: Option<UserId>,
    /// Match on creating admin.
    pub admin_ref: Option<UserId>,
    /// Match on product reference.
    pub product_ref: Option<ProductId>,
    /// Match on category reference.
    pub category_ref: Option<CategoryId>,
}

impl RfqFilter {
    /// Filter matching every record.
    #[must_use]
    pub fn any() -> Self {
        Self::default()
    }

    /// Restricts to a lifecycle status.
    #[must_use]
    pub fn with_status(mut self, status: RfqStatus) -> Self {
        self.status = Some(status);
        self
    }

    /// Restricts to an owning buyer.
    #[must_use]
    pub fn with_buyer(mut self, buyer_ref: UserId) -> Self {
        self.buyer_ref = Some(buyer_ref);
        self
    }

    /// Restricts to a creating admin.
    #[must_use]
    pub fn with_admin(mut self, admin_ref: UserId) -> Self {
        self.admin_ref = Some(admin_ref);
        self
    }

    /// Restricts to a product reference.
    #[must_use]
    pub fn with_product(mut self, product_ref: ProductId) -> Self {
        self.product_ref = Some(product_ref);
        self
    }

    /// Restricts to a category reference.
    #[must_use]
    pub fn with_category(mut self, category_ref: CategoryId) -> Self {
        self.category_ref = Some(category_ref);
        self
    }

    /// Returns true if `rfq` matches every set predicate.
    #[must_use]
    pub fn matches(&self, rfq: &Rfq) -> bool {
        if let Some(status) = self.status {
            if rfq.status() != status {
                return false;
            }
        }
        if let Some(buyer) = &self.buyer_ref {
            if rfq.buyer_ref() != Some(buyer) {
                return false;
            }
        }
        if let Some(admin) = &self.admin_ref {
            if rfq.admin_ref() != Some(admin) {
                return false;
            }
        }
        if let Some(product) = &self.product_ref {
            if rfq.product_ref() != Some(product) {
                return false;
            }
        }
        if let Some(category) = &self.category_ref {
            if rfq.category_ref() != Some(category) {
                return false;
            }
        }
        true
    }
}

/// Repository for RFQ aggregates.
///
/// # Examples
///
/// ```ignore
/// use marketplace_rfq::infrastructure::persistence::traits::RfqRepository;
///
/// async fn published_count(repo: &impl RfqRepository) -> usize {
///     repo.find_published().await.unwrap().len()
/// }
/// ```
#[async_trait]
pub trait RfqRepository: Send + Sync + fmt::Debug {
    /// Inserts a new RFQ.
    ///
    /// # Errors
    ///
    /// Returns `RepositoryError::Duplicate` if the id already exists.
    async fn insert(&self, rfq: &Rfq) -> RepositoryResult<()>;

    /// Gets an RFQ by id.
    ///
    /// Returns `None` if the RFQ does not exist.
    async fn get(&self, id: &RfqId) -> RepositoryResult<Option<Rfq>>;

    /// Replaces a whole RFQ record.
    ///
    /// `expected_version` is the version the caller loaded the aggregate
    /// at, before applying its mutations; the write only succeeds while
    /// the stored record still carries that version.
    ///
    /// # Errors
    ///
    /// Returns `RepositoryError::NotFound` if the RFQ is absent and
    /// `RepositoryError::VersionConflict` if a concurrent writer got
    /// there first.
    async fn update(&self, rfq: &Rfq, expected_version: u64) -> RepositoryResult<()>;

    /// Hard-deletes an RFQ. Responses are embedded and die with it.
    ///
    /// Returns `Ok(true)` if a record was removed.
    async fn delete(&self, id: &RfqId) -> RepositoryResult<bool>;

    /// Finds RFQs matching a filter.
    async fn find(&self, filter: &RfqFilter) -> RepositoryResult<Vec<Rfq>>;

    /// Finds all published RFQs (the seller-feed base set).
    async fn find_published(&self) -> RepositoryResult<Vec<Rfq>>;

    /// Atomically unions seller ids into an RFQ's allow-list and returns
    /// the updated record.
    ///
    /// # Errors
    ///
    /// Returns `RepositoryError::NotFound` if the RFQ is absent.
    async fn add_target_sellers(
        &self,
        id: &RfqId,
        seller_ids: &[SellerId],
    ) -> RepositoryResult<Rfq>;

    /// Atomically upserts a response keyed by seller and returns the
    /// updated record.
    ///
    /// # Errors
    ///
    /// Returns `RepositoryError::NotFound` if the RFQ is absent.
    async fn upsert_response(
        &self,
        id: &RfqId,
        response: QuoteResponse,
    ) -> RepositoryResult<Rfq>;

    /// Counts all RFQs.
    async fn count(&self) -> RepositoryResult<u64>;
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use super::*;
    use crate::domain::entities::rfq::RfqBuilder;
    use crate::domain::value_objects::Quantity;

    mod repository_error {
        use super::*;

        #[test]
        fn predicates() {
            let id = RfqId::new_v4();
            assert!(RepositoryError::NotFound(id).is_not_found());
            assert!(
                RepositoryError::VersionConflict {
                    id,
                    expected: 2,
                    actual: 3
                }
                .is_version_conflict()
            );
            assert!(!RepositoryError::query("boom").is_not_found());
        }

        #[test]
        fn version_conflict_message() {
            let id = RfqId::new_v4();
            let err = RepositoryError::VersionConflict {
                id,
                expected: 1,
                actual: 4,
            };
            let msg = err.to_string();
            assert!(msg.contains("expected 1"));
            assert!(msg.contains("found 4"));
        }
    }

    mod filter {
        use super::*;

        fn sample() -> Rfq {
            RfqBuilder::new("t", "d", Quantity::new(1), "pcs")
                .buyer_ref(UserId::new("b1"))
                .category_ref(CategoryId::new("metals"))
                .try_build()
                .unwrap()
        }

        #[test]
        fn empty_filter_matches_everything() {
            assert!(RfqFilter::any().matches(&sample()));
        }

        #[test]
        fn status_filter() {
            let rfq = sample();
            assert!(RfqFilter::any().with_status(RfqStatus::Draft).matches(&rfq));
            assert!(!RfqFilter::any().with_status(RfqStatus::Published).matches(&rfq));
        }

        #[test]
        fn buyer_filter() {
            let rfq = sample();
            assert!(RfqFilter::any().with_buyer(UserId::new("b1")).matches(&rfq));
            assert!(!RfqFilter::any().with_buyer(UserId::new("b2")).matches(&rfq));
        }

        #[test]
        fn conjunction_of_predicates() {
            let rfq = sample();
            let filter = RfqFilter::any()
                .with_status(RfqStatus::Draft)
                .with_category(CategoryId::new("metals"));
            assert!(filter.matches(&rfq));

            let filter = filter.with_product(ProductId::new("p1"));
            assert!(!filter.matches(&rfq));
        }
    }
}
