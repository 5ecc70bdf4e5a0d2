//! # In-Memory RFQ Repository
//!
//! In-memory implementation of [`RfqRepository`] for tests and local runs.
//!
//! Storage is a `DashMap`, so the two hot operations,
//! [`add_target_sellers`](RfqRepository::add_target_sellers) and
//! [`upsert_response`](RfqRepository::upsert_response), mutate the record
//! under the map's per-key entry lock. The whole find-and-replace happens
//! in one critical section, which gives these calls the atomic-upsert
//! semantics the port requires without a global lock.

use crate::domain::entities::response::QuoteResponse;
use crate::domain::entities::rfq::Rfq;
use crate::domain::value_objects::{RfqId, SellerId};
use crate::infrastructure::persistence::traits::{
    RepositoryError, RepositoryResult, RfqFilter, RfqRepository,
};
use async_trait::async_trait;
use dashmap::DashMap;
use dashmap::mapref::entry::Entry;
use std::sync::Arc;

/// In-memory implementation of [`RfqRepository`].
#[derive(Debug, Clone, Default)]
pub struct InMemoryRfqRepository {
    storage: Arc<DashMap<RfqId, Rfq>>,
}

impl InMemoryRfqRepository {
    /// Creates a new empty repository.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Returns the number of stored RFQs.
    #[must_use]
    pub fn len(&self) -> usize {
        self.storage.len()
    }

    /// Returns true if the repository is empty.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.storage.is_empty()
    }

    /// Clears all RFQs.
    pub fn clear(&self) {
        self.storage.clear();
    }
}

#[async_trait]
impl RfqRepository for InMemoryRfqRepository {
    async fn insert(&self, rfq: &Rfq) -> RepositoryResult<()> {
        match self.storage.entry(rfq.id()) {
            Entry::Occupied(_) => Err(RepositoryError::Duplicate(rfq.id())),
            Entry::Vacant(slot) => {
                slot.insert(rfq.clone());
                Ok(())
            }
        }
    }

    async fn get(&self, id: &RfqId) -> RepositoryResult<Option<Rfq>> {
        Ok(self.storage.get(id).map(|entry| entry.value().clone()))
    }

    async fn update(&self, rfq: &Rfq, expected_version: u64) -> RepositoryResult<()> {
        let mut entry = self
            .storage
            .get_mut(&rfq.id())
            .ok_or(RepositoryError::NotFound(rfq.id()))?;

        let actual = entry.value().version();
        if actual != expected_version {
            return Err(RepositoryError::VersionConflict {
                id: rfq.id(),
                expected: expected_version,
                actual,
            });
        }

        *entry.value_mut() = rfq.clone();
        Ok(())
    }

    async fn delete(&self, id: &RfqId) -> RepositoryResult<bool> {
        Ok(self.storage.remove(id).is_some())
    }

    async fn find(&self, filter: &RfqFilter) -> RepositoryResult<Vec<Rfq>> {
        let mut found: Vec<Rfq> = self
            .storage
            .iter()
            .filter(|entry| filter.matches(entry.value()))
            .map(|entry| entry.value().clone())
            .collect();
        // newest first, matching the listing order of the HTTP surface
        found.sort_by(|a, b| b.created_at().cmp(&a.created_at()));
        Ok(found)
    }

    async fn find_published(&self) -> RepositoryResult<Vec<Rfq>> {
        let filter = RfqFilter::any().with_status(crate::domain::value_objects::RfqStatus::Published);
        self.find(&filter).await
    }

    async fn add_target_sellers(
        &self,
        id: &RfqId,
        seller_ids: &[SellerId],
    ) -> RepositoryResult<Rfq> {
        let mut entry = self
            .storage
            .get_mut(id)
            .ok_or(RepositoryError::NotFound(*id))?;

        entry.value_mut().add_target_sellers(seller_ids);
        Ok(entry.value().clone())
    }

    async fn upsert_response(
        &self,
        id: &RfqId,
        response: QuoteResponse,
    ) -> RepositoryResult<Rfq> {
        let mut entry = self
            .storage
            .get_mut(id)
            .ok_or(RepositoryError::NotFound(*id))?;

        entry.value_mut().upsert_response(response);
        Ok(entry.value().clone())
    }

    async fn count(&self) -> RepositoryResult<u64> {
        Ok(self.storage.len() as u64)
    }
}
