//! # Quote Ledger Service
//!
//! Seller quote submission with upsert-by-seller semantics.
//!
//! This is the concurrency hotspot of the engine: the write path re-runs
//! eligibility (a seller can attempt to quote any RFQ id they learned
//! out-of-band, not just ones from their feed) and then delegates the
//! find-and-replace to the repository's atomic keyed upsert, so two
//! concurrent submissions by the same seller can never leave two entries
//! or a half-merged one.

use crate::application::error::{ApplicationError, ApplicationResult};
use crate::application::services::ensure_role;
use crate::domain::entities::response::QuoteResponse;
use crate::domain::events::rfq_events::{QuoteSubmitted, RfqEvent};
use crate::domain::services::authorization::RfqAction;
use crate::domain::services::eligibility::EligibilityResolver;
use crate::domain::value_objects::{Price, Quantity, RfqId};
use crate::infrastructure::collaborators::catalog::Catalog;
use crate::infrastructure::collaborators::identity::Principal;
use crate::infrastructure::collaborators::notifier::EventPublisher;
use crate::infrastructure::persistence::traits::RfqRepository;
use rust_decimal::Decimal;
use std::sync::Arc;

/// A seller's quote submission.
#[derive(Debug, Clone)]
pub struct QuotePayload {
    /// Offered unit price.
    pub quote_price: Decimal,
    /// Offered quantity; defaults to the RFQ's requested quantity.
    pub quote_quantity: Option<Quantity>,
    /// Promised delivery time in days.
    pub delivery_time_days: u32,
    /// Free-text note.
    pub message: Option<String>,
}

/// Records seller quotes against RFQs.
#[derive(Debug, Clone)]
pub struct QuoteLedgerService {
    repository: Arc<dyn RfqRepository>,
    catalog: Arc<dyn Catalog>,
    publisher: Arc<dyn EventPublisher>,
}

impl QuoteLedgerService {
    /// Creates the service.
    #[must_use]
    pub fn new(
        repository: Arc<dyn RfqRepository>,
        catalog: Arc<dyn Catalog>,
        publisher: Arc<dyn EventPublisher>,
    ) -> Self {
        Self {
            repository,
            catalog,
            publisher,
        }
    }

    /// Submits (or replaces) the calling seller's quote on an RFQ.
    ///
    /// Eligibility is enforced here at write time, independent of the
    /// read-time feed. The stored response is built fresh from the
    /// payload (a resubmission replaces the prior entry wholesale, in
    /// place) and the written response is returned.
    ///
    /// # Errors
    ///
    /// `Forbidden` for non-sellers, ineligible sellers, or an RFQ that is
    /// not open for quoting; `NotFound` for a missing rfq; `Validation`
    /// for a negative price.
    pub async fn submit_quote(
        &self,
        principal: &Principal,
        rfq_id: &RfqId,
        payload: QuotePayload,
    ) -> ApplicationResult<QuoteResponse> {
        ensure_role(principal, RfqAction::SubmitQuote)?;
        let seller_id = principal.seller_id();

        let rfq = self
            .repository
            .get(rfq_id)
            .await?
            .ok_or_else(|| ApplicationError::not_found("rfq", rfq_id.to_string()))?;

        if !rfq.status().is_published() {
            return Err(ApplicationError::forbidden(format!(
                "rfq is not open for quoting (status: {})",
                rfq.status()
            )));
        }

        let seller_categories = self.catalog.categories_of_seller(&seller_id).await?;
        if !EligibilityResolver::is_eligible(&rfq, &seller_id, &seller_categories) {
            return Err(ApplicationError::forbidden(
                "seller is not eligible for this rfq",
            ));
        }

        let quote_price = Price::new(payload.quote_price).map_err(ApplicationError::from)?;
        let quote_quantity = payload.quote_quantity.unwrap_or_else(|| rfq.quantity());
        let resubmission = rfq.response_of(&seller_id).is_some();

        let response = QuoteResponse::submitted(
            seller_id.clone(),
            quote_price,
            quote_quantity,
            payload.delivery_time_days,
            payload.message,
        );

        let updated = self
            .repository
            .upsert_response(rfq_id, response)
            .await?;

        let written = updated
            .response_of(&seller_id)
            .cloned()
            .ok_or_else(|| ApplicationError::internal("upserted response missing from record"))?;

        tracing::info!(
            rfq_id = %rfq_id,
            seller = %seller_id,
            resubmission,
            "quote submitted"
        );
        self.publisher.publish(RfqEvent::QuoteSubmitted(QuoteSubmitted::new(
            *rfq_id,
            seller_id,
            quote_price,
            resubmission,
        )));

        Ok(written)
    }
}
