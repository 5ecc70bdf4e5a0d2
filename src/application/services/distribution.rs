//! # Distribution Service
//!
//! Admin-triggered, idempotent growth of an RFQ's seller allow-list.
//!
//! Distribution is meaningful for any distribution type but only changes
//! seller-visible behavior when the RFQ uses `Specific` distribution: the
//! allow-list is populated unconditionally, while the eligibility
//! algorithm consults it for `Specific` only. This is a documented quirk
//! of the marketplace, not an oversight; callers distributing under
//! `All`/`Category` grow the list with no eligibility effect.

use crate::application::error::{ApplicationError, ApplicationResult};
use crate::application::services::{ensure_role, ensure_sellers_known};
use crate::domain::entities::rfq::Rfq;
use crate::domain::events::rfq_events::{RfqDistributed, RfqEvent};
use crate::domain::services::authorization::RfqAction;
use crate::domain::value_objects::{RfqId, SellerId};
use crate::infrastructure::collaborators::identity::{Principal, SellerDirectory};
use crate::infrastructure::collaborators::notifier::EventPublisher;
use crate::infrastructure::persistence::traits::RfqRepository;
use std::sync::Arc;

/// Grows RFQ allow-lists by set union.
#[derive(Debug, Clone)]
pub struct DistributionService {
    repository: Arc<dyn RfqRepository>,
    directory: Arc<dyn SellerDirectory>,
    publisher: Arc<dyn EventPublisher>,
}

impl DistributionService {
    /// Creates the service.
    #[must_use]
    pub fn new(
        repository: Arc<dyn RfqRepository>,
        directory: Arc<dyn SellerDirectory>,
        publisher: Arc<dyn EventPublisher>,
    ) -> Self {
        Self {
            repository,
            directory,
            publisher,
        }
    }

    /// Unions `seller_ids` into the RFQ's allow-list.
    ///
    /// The write is an atomic set union, so concurrent distributions to
    /// different subsets both land. Calling twice with the same ids leaves
    /// the same final set.
    ///
    /// # Errors
    ///
    /// `Forbidden` for non-admins, `NotFound` if the rfq is absent,
    /// `Validation` if any id is unknown to the identity system (the
    /// whole batch is rejected).
    pub async fn distribute(
        &self,
        principal: &Principal,
        rfq_id: &RfqId,
        seller_ids: Vec<SellerId>,
    ) -> ApplicationResult<Rfq> {
        ensure_role(principal, RfqAction::Distribute)?;

        let current = self
            .repository
            .get(rfq_id)
            .await?
            .ok_or_else(|| ApplicationError::not_found("rfq", rfq_id.to_string()))?;

        ensure_sellers_known(self.directory.as_ref(), &seller_ids).await?;

        let added: Vec<SellerId> = seller_ids
            .iter()
            .filter(|id| !current.targets_seller(id))
            .cloned()
            .collect();

        let updated = self
            .repository
            .add_target_sellers(rfq_id, &seller_ids)
            .await?;

        tracing::info!(
            rfq_id = %rfq_id,
            actor = %principal,
            added = added.len(),
            targets = updated.target_seller_ids().len(),
            "rfq distributed"
        );
        self.publisher.publish(RfqEvent::Distributed(RfqDistributed::new(
            *rfq_id,
            added,
            updated.target_seller_ids().len(),
        )));

        Ok(updated)
    }
}
