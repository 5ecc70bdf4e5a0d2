//! # Seller Feed Service
//!
//! The discovery feed: published RFQs the calling seller is eligible for.
//!
//! Category membership is computed by the catalog at call time, so the
//! feed is dynamic: a seller who lists a product in a matching category
//! starts seeing `Category`-distributed RFQs without any RFQ mutation.
//! Closed and cancelled records are excluded simply because the feed only
//! returns published ones; distribution type never gates them separately.

use crate::application::error::ApplicationResult;
use crate::application::services::ensure_role;
use crate::domain::entities::rfq::Rfq;
use crate::domain::services::authorization::RfqAction;
use crate::domain::services::eligibility::EligibilityResolver;
use crate::domain::value_objects::RfqStatus;
use crate::infrastructure::collaborators::catalog::Catalog;
use crate::infrastructure::collaborators::identity::Principal;
use crate::infrastructure::persistence::traits::RfqRepository;
use std::sync::Arc;

/// Builds seller discovery feeds.
#[derive(Debug, Clone)]
pub struct SellerFeedService {
    repository: Arc<dyn RfqRepository>,
    catalog: Arc<dyn Catalog>,
}

impl SellerFeedService {
    /// Creates the service.
    #[must_use]
    pub fn new(repository: Arc<dyn RfqRepository>, catalog: Arc<dyn Catalog>) -> Self {
        Self {
            repository,
            catalog,
        }
    }

    /// Lists the published RFQs visible to the caller.
    ///
    /// Sellers get the eligibility-filtered feed; admins see every
    /// published record. The optional `status` filter narrows a feed that
    /// is published-only by construction, so any other status yields an
    /// empty list.
    ///
    /// # Errors
    ///
    /// `Forbidden` for buyers, `Internal` on storage or catalog failure.
    pub async fn list_visible(
        &self,
        principal: &Principal,
        status: Option<RfqStatus>,
    ) -> ApplicationResult<Vec<Rfq>> {
        ensure_role(principal, RfqAction::ListVisible)?;

        if let Some(status) = status {
            if status != RfqStatus::Published {
                return Ok(Vec::new());
            }
        }

        let published = self.repository.find_published().await?;
        if principal.role.is_admin() {
            return Ok(published);
        }

        let seller_id = principal.seller_id();
        let seller_categories = self.catalog.categories_of_seller(&seller_id).await?;

        Ok(published
            .into_iter()
            .filter(|rfq| EligibilityResolver::is_eligible(rfq, &seller_id, &seller_categories))
            .collect())
    }
}
