//! # RFQ Lifecycle Service
//!
//! Create, update, delete, detail view, and listings for RFQ records,
//! with ownership checks and the enforced status state machine.

use crate::application::error::{ApplicationError, ApplicationResult};
use crate::application::services::{ensure_role, ensure_sellers_known};
use crate::domain::entities::rfq::{Rfq, RfqBuilder};
use crate::domain::events::rfq_events::{RfqCreated, RfqDeleted, RfqEvent, RfqStatusChanged};
use crate::domain::services::authorization::RfqAction;
use crate::domain::value_objects::{
    Attachment, CategoryId, DistributionType, ProductId, Quantity, RfqId, RfqStatus, SellerId,
    Specifications, Timestamp, UserId,
};
use crate::infrastructure::collaborators::catalog::{Catalog, CategorySummary, ProductSummary};
use crate::infrastructure::collaborators::identity::{Principal, SellerDirectory, UserSummary};
use crate::infrastructure::collaborators::notifier::EventPublisher;
use crate::infrastructure::persistence::traits::{RfqFilter, RfqRepository};
use std::sync::Arc;

/// Fields for creating an RFQ.
#[derive(Debug, Clone)]
pub struct NewRfq {
    /// Headline of the requirement.
    pub title: String,
    /// Detailed description.
    pub description: String,
    /// Requested quantity.
    pub quantity: Quantity,
    /// Unit of measure.
    pub unit: String,
    /// Optional catalog product reference.
    pub product_ref: Option<ProductId>,
    /// Optional catalog category reference.
    pub category_ref: Option<CategoryId>,
    /// Owning buyer; only honored when an admin creates on a buyer's
    /// behalf (buyer callers always own what they create).
    pub buyer_ref: Option<UserId>,
    /// Initial status; defaults to draft.
    pub status: Option<RfqStatus>,
    /// Seller visibility policy.
    pub distribution_type: DistributionType,
    /// Explicit seller allow-list.
    pub target_seller_ids: Vec<SellerId>,
    /// Advisory expiry date.
    pub expiry_date: Option<Timestamp>,
    /// Specification attributes.
    pub specifications: Specifications,
    /// File references.
    pub attachments: Vec<Attachment>,
}

/// Partial update; only supplied fields are applied.
#[derive(Debug, Clone, Default)]
pub struct RfqPatch {
    /// New title.
    pub title: Option<String>,
    /// New description.
    pub description: Option<String>,
    /// New quantity.
    pub quantity: Option<Quantity>,
    /// New unit of measure.
    pub unit: Option<String>,
    /// New product reference.
    pub product_ref: Option<ProductId>,
    /// New category reference.
    pub category_ref: Option<CategoryId>,
    /// New status; runs through the state machine.
    pub status: Option<RfqStatus>,
    /// New distribution policy.
    pub distribution_type: Option<DistributionType>,
    /// Replacement allow-list; re-validated against the seller directory.
    pub target_seller_ids: Option<Vec<SellerId>>,
    /// New advisory expiry date.
    pub expiry_date: Option<Timestamp>,
    /// Replacement specification attributes.
    pub specifications: Option<Specifications>,
    /// Replacement attachments.
    pub attachments: Option<Vec<Attachment>>,
}

/// Admin detail view: the record plus its references resolved to display
/// summaries by the catalog and identity collaborators.
#[derive(Debug, Clone)]
pub struct RfqDetails {
    /// The RFQ record.
    pub rfq: Rfq,
    /// Resolved product reference.
    pub product: Option<ProductSummary>,
    /// Resolved category reference.
    pub category: Option<CategorySummary>,
    /// Resolved owning buyer.
    pub buyer: Option<UserSummary>,
    /// Resolved creating admin.
    pub admin: Option<UserSummary>,
    /// Resolved allow-list entries.
    pub target_sellers: Vec<UserSummary>,
}

/// Lifecycle operations over RFQ records.
#[derive(Debug, Clone)]
pub struct RfqLifecycleService {
    repository: Arc<dyn RfqRepository>,
    catalog: Arc<dyn Catalog>,
    directory: Arc<dyn SellerDirectory>,
    publisher: Arc<dyn EventPublisher>,
}

impl RfqLifecycleService {
    /// Creates the service.
    #[must_use]
    pub fn new(
        repository: Arc<dyn RfqRepository>,
        catalog: Arc<dyn Catalog>,
        directory: Arc<dyn SellerDirectory>,
        publisher: Arc<dyn EventPublisher>,
    ) -> Self {
        Self {
            repository,
            catalog,
            directory,
            publisher,
        }
    }

    async fn ensure_product_exists(&self, id: &ProductId) -> ApplicationResult<()> {
        if self.catalog.product_exists(id).await? {
            Ok(())
        } else {
            Err(ApplicationError::not_found("product", id.as_str()))
        }
    }

    async fn ensure_category_exists(&self, id: &CategoryId) -> ApplicationResult<()> {
        if self.catalog.category_exists(id).await? {
            Ok(())
        } else {
            Err(ApplicationError::not_found("category", id.as_str()))
        }
    }

    fn ensure_owner(principal: &Principal, rfq: &Rfq) -> ApplicationResult<()> {
        if principal.role.is_admin() {
            return Ok(());
        }
        if rfq.buyer_ref() == Some(&principal.id) {
            return Ok(());
        }
        Err(ApplicationError::forbidden(
            "only the owning buyer or an admin may modify this rfq",
        ))
    }

    /// Creates an RFQ.
    ///
    /// Buyer callers own the record (`buyer_ref` is forced to the actor);
    /// admin callers are recorded as `admin_ref` and may supply a buyer.
    /// Product/category references must exist and every supplied target
    /// seller must be known; otherwise the whole call fails and nothing is
    /// persisted.
    ///
    /// # Errors
    ///
    /// `Forbidden` for sellers, `NotFound` for a bad product/category
    /// reference, `Validation` for field errors or an unknown seller id.
    pub async fn create(&self, principal: &Principal, new_rfq: NewRfq) -> ApplicationResult<Rfq> {
        ensure_role(principal, RfqAction::Create)?;

        if let Some(product) = &new_rfq.product_ref {
            self.ensure_product_exists(product).await?;
        }
        if let Some(category) = &new_rfq.category_ref {
            self.ensure_category_exists(category).await?;
        }
        ensure_sellers_known(self.directory.as_ref(), &new_rfq.target_seller_ids).await?;

        let (buyer_ref, admin_ref) = if principal.role.is_admin() {
            (new_rfq.buyer_ref, Some(principal.id.clone()))
        } else {
            (Some(principal.id.clone()), None)
        };

        let mut builder = RfqBuilder::new(
            new_rfq.title,
            new_rfq.description,
            new_rfq.quantity,
            new_rfq.unit,
        )
        .status(new_rfq.status.unwrap_or(RfqStatus::Draft))
        .distribution_type(new_rfq.distribution_type)
        .target_seller_ids(new_rfq.target_seller_ids)
        .specifications(new_rfq.specifications)
        .attachments(new_rfq.attachments);

        if let Some(product) = new_rfq.product_ref {
            builder = builder.product_ref(product);
        }
        if let Some(category) = new_rfq.category_ref {
            builder = builder.category_ref(category);
        }
        if let Some(buyer) = buyer_ref {
            builder = builder.buyer_ref(buyer);
        }
        if let Some(admin) = admin_ref {
            builder = builder.admin_ref(admin);
        }
        if let Some(expiry) = new_rfq.expiry_date {
            builder = builder.expiry_date(expiry);
        }

        let rfq = builder.try_build()?;
        self.repository.insert(&rfq).await?;

        tracing::info!(rfq_id = %rfq.id(), actor = %principal, "rfq created");
        self.publisher.publish(RfqEvent::Created(RfqCreated::new(
            rfq.id(),
            principal.id.clone(),
            rfq.title(),
            rfq.status(),
            rfq.distribution_type(),
        )));

        Ok(rfq)
    }

    /// Applies a partial update.
    ///
    /// All reference and seller validation runs before anything is
    /// persisted; status changes go through the state machine.
    ///
    /// # Errors
    ///
    /// `Forbidden` unless the caller is an admin or the owning buyer,
    /// `NotFound` for a missing rfq or bad reference, `Validation` for
    /// field errors, `Conflict` for an illegal status transition or a
    /// concurrent write.
    pub async fn update(
        &self,
        principal: &Principal,
        rfq_id: &RfqId,
        patch: RfqPatch,
    ) -> ApplicationResult<Rfq> {
        ensure_role(principal, RfqAction::Update)?;

        let mut rfq = self
            .repository
            .get(rfq_id)
            .await?
            .ok_or_else(|| ApplicationError::not_found("rfq", rfq_id.to_string()))?;
        Self::ensure_owner(principal, &rfq)?;

        if let Some(product) = &patch.product_ref {
            self.ensure_product_exists(product).await?;
        }
        if let Some(category) = &patch.category_ref {
            self.ensure_category_exists(category).await?;
        }
        if let Some(sellers) = &patch.target_seller_ids {
            ensure_sellers_known(self.directory.as_ref(), sellers).await?;
        }

        let expected_version = rfq.version();

        if let Some(title) = patch.title {
            rfq.set_title(title)?;
        }
        if let Some(description) = patch.description {
            rfq.set_description(description)?;
        }
        if let Some(quantity) = patch.quantity {
            rfq.set_quantity(quantity)?;
        }
        if let Some(unit) = patch.unit {
            rfq.set_unit(unit)?;
        }
        if let Some(product) = patch.product_ref {
            rfq.set_product_ref(Some(product));
        }
        if let Some(category) = patch.category_ref {
            rfq.set_category_ref(Some(category));
        }
        if let Some(distribution_type) = patch.distribution_type {
            rfq.set_distribution_type(distribution_type);
        }
        if let Some(sellers) = patch.target_seller_ids {
            rfq.set_target_sellers(sellers);
        }
        if let Some(expiry) = patch.expiry_date {
            rfq.set_expiry_date(Some(expiry));
        }
        if let Some(specifications) = patch.specifications {
            rfq.set_specifications(specifications);
        }
        if let Some(attachments) = patch.attachments {
            rfq.set_attachments(attachments);
        }

        let mut status_change = None;
        if let Some(status) = patch.status {
            let from = rfq.status();
            if rfq.transition_status(status)? {
                status_change = Some((from, status));
            }
        }

        self.repository.update(&rfq, expected_version).await?;

        tracing::info!(rfq_id = %rfq.id(), actor = %principal, "rfq updated");
        if let Some((from, to)) = status_change {
            self.publisher.publish(RfqEvent::StatusChanged(RfqStatusChanged::new(
                rfq.id(),
                from,
                to,
            )));
        }

        Ok(rfq)
    }

    /// Hard-deletes an RFQ; embedded responses are deleted with it.
    ///
    /// # Errors
    ///
    /// `Forbidden` unless the caller is an admin or the owning buyer,
    /// `NotFound` if the rfq is absent.
    pub async fn delete(&self, principal: &Principal, rfq_id: &RfqId) -> ApplicationResult<()> {
        ensure_role(principal, RfqAction::Delete)?;

        let rfq = self
            .repository
            .get(rfq_id)
            .await?
            .ok_or_else(|| ApplicationError::not_found("rfq", rfq_id.to_string()))?;
        Self::ensure_owner(principal, &rfq)?;

        if !self.repository.delete(rfq_id).await? {
            return Err(ApplicationError::not_found("rfq", rfq_id.to_string()));
        }

        tracing::info!(rfq_id = %rfq_id, actor = %principal, "rfq deleted");
        self.publisher
            .publish(RfqEvent::Deleted(RfqDeleted::new(*rfq_id)));
        Ok(())
    }

    /// Returns the fully populated admin view of one RFQ.
    ///
    /// # Errors
    ///
    /// `Forbidden` for non-admins, `NotFound` if the rfq is absent.
    pub async fn get_details(
        &self,
        principal: &Principal,
        rfq_id: &RfqId,
    ) -> ApplicationResult<RfqDetails> {
        ensure_role(principal, RfqAction::ViewDetails)?;

        let rfq = self
            .repository
            .get(rfq_id)
            .await?
            .ok_or_else(|| ApplicationError::not_found("rfq", rfq_id.to_string()))?;

        let product = match rfq.product_ref() {
            Some(id) => self.catalog.product_summary(id).await?,
            None => None,
        };
        let category = match rfq.category_ref() {
            Some(id) => self.catalog.category_summary(id).await?,
            None => None,
        };
        let buyer = match rfq.buyer_ref() {
            Some(id) => self.directory.user_summary(id).await?,
            None => None,
        };
        let admin = match rfq.admin_ref() {
            Some(id) => self.directory.user_summary(id).await?,
            None => None,
        };

        let lookups = rfq.target_seller_ids().iter().map(|seller| {
            let directory = Arc::clone(&self.directory);
            let user_id = UserId::new(seller.as_str());
            async move {
                let summary = directory.user_summary(&user_id).await?;
                // unknown entries degrade to their raw id
                Ok::<_, ApplicationError>(summary.unwrap_or_else(|| UserSummary {
                    name: user_id.as_str().to_string(),
                    id: user_id,
                }))
            }
        });
        let target_sellers = futures::future::try_join_all(lookups).await?;

        Ok(RfqDetails {
            rfq,
            product,
            category,
            buyer,
            admin,
            target_sellers,
        })
    }

    /// Admin-only listing with optional filters.
    ///
    /// # Errors
    ///
    /// `Forbidden` for non-admins, `Internal` on storage failure.
    pub async fn list(
        &self,
        principal: &Principal,
        filter: RfqFilter,
    ) -> ApplicationResult<Vec<Rfq>> {
        ensure_role(principal, RfqAction::ListAll)?;
        Ok(self.repository.find(&filter).await?)
    }

    /// Lists the caller's own records: the RFQs a buyer owns, or the ones
    /// an admin created.
    ///
    /// # Errors
    ///
    /// `Forbidden` for sellers, `Internal` on storage failure.
    pub async fn list_own(
        &self,
        principal: &Principal,
        status: Option<RfqStatus>,
    ) -> ApplicationResult<Vec<Rfq>> {
        ensure_role(principal, RfqAction::ListOwn)?;

        let mut filter = if principal.role.is_admin() {
            RfqFilter::any().with_admin(principal.id.clone())
        } else {
            RfqFilter::any().with_buyer(principal.id.clone())
        };
        if let Some(status) = status {
            filter = filter.with_status(status);
        }

        Ok(self.repository.find(&filter).await?)
    }
}
