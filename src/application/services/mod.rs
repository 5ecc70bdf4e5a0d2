//! # Application Services
//!
//! Use-case orchestration over the domain layer:
//!
//! - [`rfq_lifecycle::RfqLifecycleService`]: create / update / delete /
//!   detail view / listings
//! - [`distribution::DistributionService`]: admin-curated allow-list growth
//! - [`quote_ledger::QuoteLedgerService`]: quote submission with
//!   upsert-by-seller semantics
//! - [`seller_feed::SellerFeedService`]: the published-and-eligible feed
//!
//! Every operation consults the authorization gate first, runs all
//! validation before any write, and publishes its domain event only after
//! the state change has been persisted.

pub mod distribution;
pub mod quote_ledger;
pub mod rfq_lifecycle;
pub mod seller_feed;

pub use distribution::DistributionService;
pub use quote_ledger::{QuoteLedgerService, QuotePayload};
pub use rfq_lifecycle::{NewRfq, RfqDetails, RfqLifecycleService, RfqPatch};
pub use seller_feed::SellerFeedService;

use crate::application::error::{ApplicationError, ApplicationResult};
use crate::domain::services::authorization::{AuthorizationGate, RfqAction};
use crate::domain::value_objects::SellerId;
use crate::infrastructure::collaborators::identity::{Principal, SellerDirectory};

/// Role gate shared by every operation.
pub(crate) fn ensure_role(principal: &Principal, action: RfqAction) -> ApplicationResult<()> {
    if AuthorizationGate::allows(principal.role, action) {
        Ok(())
    } else {
        Err(ApplicationError::forbidden(format!(
            "role {} may not {action}",
            principal.role
        )))
    }
}

/// Batch seller validation: the whole call fails on the first id the
/// identity system does not know, and nothing is applied.
pub(crate) async fn ensure_sellers_known(
    directory: &dyn SellerDirectory,
    seller_ids: &[SellerId],
) -> ApplicationResult<()> {
    for id in seller_ids {
        if !directory.seller_exists(id).await? {
            return Err(ApplicationError::validation(format!(
                "unknown seller: {id}"
            )));
        }
    }
    Ok(())
}
