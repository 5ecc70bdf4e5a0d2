//! # RFQ Aggregate Root
//!
//! The RFQ (Request-for-Quote) aggregate manages a buyer's sourcing
//! requirement: who may see it, which sellers have been targeted, and the
//! quote responses collected from them.
//!
//! # State Machine
//!
//! ```text
//! Draft → Published → Closed
//!             └─────→ Cancelled
//! ```
//!
//! Transitions are enforced; `Closed` and `Cancelled` are terminal.
//!
//! # Invariants
//!
//! - `target_seller_ids` has set semantics: no duplicates, regardless of
//!   distribution type.
//! - `responses` holds at most one entry per seller; resubmission replaces
//!   the existing entry in place.
//! - Every mutation bumps the optimistic-locking version and `updated_at`.
//!
//! # Examples
//!
//! ```
//! use marketplace_rfq::domain::entities::rfq::RfqBuilder;
//! use marketplace_rfq::domain::value_objects::{DistributionType, Quantity, RfqStatus, UserId};
//!
//! let rfq = RfqBuilder::new("Steel beams", "IPE 200, EN 10025", Quantity::new(40), "pcs")
//!     .buyer_ref(UserId::new("buyer-1"))
//!     .distribution_type(DistributionType::All)
//!     .try_build()
//!     .unwrap();
//!
//! assert_eq!(rfq.status(), RfqStatus::Draft);
//! assert!(rfq.responses().is_empty());
//! ```

use crate::domain::entities::response::QuoteResponse;
use crate::domain::errors::{DomainError, DomainResult};
use crate::domain::value_objects::{
    Attachment, CategoryId, DistributionType, ProductId, Quantity, RfqId, RfqStatus, SellerId,
    Specifications, Timestamp, UserId,
};
use serde::{Deserialize, Serialize};
use std::fmt;

/// RFQ aggregate root.
///
/// Central entity of the distribution-and-quoting engine. All mutation goes
/// through methods that uphold the aggregate invariants; the storage layer
/// only ever persists whole, consistent snapshots.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Rfq {
    /// Unique identifier, immutable.
    id: RfqId,
    /// Short headline of the requirement.
    title: String,
    /// Detailed description.
    description: String,
    /// Optional reference to a catalog product.
    product_ref: Option<ProductId>,
    /// Optional reference to a catalog category; drives `Category`
    /// distribution.
    category_ref: Option<CategoryId>,
    /// Requested quantity.
    quantity: Quantity,
    /// Unit of measure for the quantity.
    unit: String,
    /// The buyer who owns this record, when buyer-created.
    buyer_ref: Option<UserId>,
    /// The admin who created this record, when admin-created.
    admin_ref: Option<UserId>,
    /// Lifecycle status.
    status: RfqStatus,
    /// Seller visibility policy.
    distribution_type: DistributionType,
    /// Explicit seller allow-list. Set semantics; only consulted by
    /// `Specific` distribution but populated for any type.
    target_seller_ids: Vec<SellerId>,
    /// Quote responses, at most one per seller.
    responses: Vec<QuoteResponse>,
    /// Advisory expiry date. Stored but never enforced.
    expiry_date: Option<Timestamp>,
    /// Ordered specification attributes.
    specifications: Specifications,
    /// File references.
    attachments: Vec<Attachment>,
    /// Version for optimistic locking.
    version: u64,
    /// Creation time.
    created_at: Timestamp,
    /// Last mutation time.
    updated_at: Timestamp,
}

impl Rfq {
    fn validate_text(field: &'static str, value: &str) -> DomainResult<()> {
        if value.trim().is_empty() {
            return Err(DomainError::validation(format!("{field} must not be empty")));
        }
        Ok(())
    }

    fn validate_quantity(quantity: Quantity) -> DomainResult<()> {
        if !quantity.is_positive() {
            return Err(DomainError::InvalidQuantity(
                "quantity must be at least 1".to_string(),
            ));
        }
        Ok(())
    }

    fn validate_initial_status(status: RfqStatus) -> DomainResult<()> {
        match status {
            RfqStatus::Draft | RfqStatus::Published => Ok(()),
            RfqStatus::Closed | RfqStatus::Cancelled => Err(DomainError::validation(format!(
                "an RFQ cannot be created in the {status} status"
            ))),
        }
    }

    /// Returns a builder for constructing an RFQ.
    #[must_use]
    pub fn builder(
        title: impl Into<String>,
        description: impl Into<String>,
        quantity: Quantity,
        unit: impl Into<String>,
    ) -> RfqBuilder {
        RfqBuilder::new(title, description, quantity, unit)
    }

    /// Reconstructs an RFQ from stored parts.
    ///
    /// Bypasses validation; only for trusted storage.
    #[must_use]
    #[allow(clippy::too_many_arguments)]
    pub fn from_parts(
        id: RfqId,
        title: String,
        description: String,
        product_ref: Option<ProductId>,
        category_ref: Option<CategoryId>,
        quantity: Quantity,
        unit: String,
        buyer_ref: Option<UserId>,
        admin_ref: Option<UserId>,
        status: RfqStatus,
        distribution_type: DistributionType,
        target_seller_ids: Vec<SellerId>,
        responses: Vec<QuoteResponse>,
        expiry_date: Option<Timestamp>,
        specifications: Specifications,
        attachments: Vec<Attachment>,
        version: u64,
        created_at: Timestamp,
        updated_at: Timestamp,
    ) -> Self {
        Self {
            id,
            title,
            description,
            product_ref,
            category_ref,
            quantity,
            unit,
            buyer_ref,
            admin_ref,
            status,
            distribution_type,
            target_seller_ids,
            responses,
            expiry_date,
            specifications,
            attachments,
            version,
            created_at,
            updated_at,
        }
    }

    fn touch(&mut self) {
        self.updated_at = Timestamp::now();
        self.version = self.version.saturating_add(1);
    }

    // ========== Accessors ==========

    /// Returns the RFQ ID.
    #[inline]
    #[must_use]
    pub fn id(&self) -> RfqId {
        self.id
    }

    /// Returns the title.
    #[inline]
    #[must_use]
    pub fn title(&self) -> &str {
        &self.title
    }

    /// Returns the description.
    #[inline]
    #[must_use]
    pub fn description(&self) -> &str {
        &self.description
    }

    /// Returns the product reference, if any.
    #[inline]
    #[must_use]
    pub fn product_ref(&self) -> Option<&ProductId> {
        self.product_ref.as_ref()
    }

    /// Returns the category reference, if any.
    #[inline]
    #[must_use]
    pub fn category_ref(&self) -> Option<&CategoryId> {
        self.category_ref.as_ref()
    }

    /// Returns the requested quantity.
    #[inline]
    #[must_use]
    pub fn quantity(&self) -> Quantity {
        self.quantity
    }

    /// Returns the unit of measure.
    #[inline]
    #[must_use]
    pub fn unit(&self) -> &str {
        &self.unit
    }

    /// Returns the owning buyer, if buyer-owned.
    #[inline]
    #[must_use]
    pub fn buyer_ref(&self) -> Option<&UserId> {
        self.buyer_ref.as_ref()
    }

    /// Returns the creating admin, if admin-created.
    #[inline]
    #[must_use]
    pub fn admin_ref(&self) -> Option<&UserId> {
        self.admin_ref.as_ref()
    }

    /// Returns the lifecycle status.
    #[inline]
    #[must_use]
    pub fn status(&self) -> RfqStatus {
        self.status
    }

    /// Returns the distribution type.
    #[inline]
    #[must_use]
    pub fn distribution_type(&self) -> DistributionType {
        self.distribution_type
    }

    /// Returns the explicit seller allow-list.
    #[inline]
    #[must_use]
    pub fn target_seller_ids(&self) -> &[SellerId] {
        &self.target_seller_ids
    }

    /// Returns the collected quote responses.
    #[inline]
    #[must_use]
    pub fn responses(&self) -> &[QuoteResponse] {
        &self.responses
    }

    /// Returns the advisory expiry date, if any.
    #[inline]
    #[must_use]
    pub fn expiry_date(&self) -> Option<Timestamp> {
        self.expiry_date
    }

    /// Returns the specification attributes.
    #[inline]
    #[must_use]
    pub fn specifications(&self) -> &Specifications {
        &self.specifications
    }

    /// Returns the attachments.
    #[inline]
    #[must_use]
    pub fn attachments(&self) -> &[Attachment] {
        &self.attachments
    }

    /// Returns the optimistic-locking version.
    #[inline]
    #[must_use]
    pub fn version(&self) -> u64 {
        self.version
    }

    /// Returns the creation time.
    #[inline]
    #[must_use]
    pub fn created_at(&self) -> Timestamp {
        self.created_at
    }

    /// Returns the last mutation time.
    #[inline]
    #[must_use]
    pub fn updated_at(&self) -> Timestamp {
        self.updated_at
    }

    /// Returns true if a given seller is on the explicit allow-list.
    #[must_use]
    pub fn targets_seller(&self, seller_id: &SellerId) -> bool {
        self.target_seller_ids.contains(seller_id)
    }

    /// Returns the response submitted by a given seller, if any.
    #[must_use]
    pub fn response_of(&self, seller_id: &SellerId) -> Option<&QuoteResponse> {
        self.responses.iter().find(|r| r.seller_ref() == seller_id)
    }

    // ========== Mutators ==========

    /// Sets the title.
    ///
    /// # Errors
    ///
    /// Returns `DomainError::Validation` if the title is empty.
    pub fn set_title(&mut self, title: impl Into<String>) -> DomainResult<()> {
        let title = title.into();
        Self::validate_text("title", &title)?;
        self.title = title;
        self.touch();
        Ok(())
    }

    /// Sets the description.
    ///
    /// # Errors
    ///
    /// Returns `DomainError::Validation` if the description is empty.
    pub fn set_description(&mut self, description: impl Into<String>) -> DomainResult<()> {
        let description = description.into();
        Self::validate_text("description", &description)?;
        self.description = description;
        self.touch();
        Ok(())
    }

    /// Sets the requested quantity.
    ///
    /// # Errors
    ///
    /// Returns `DomainError::InvalidQuantity` if the quantity is zero.
    pub fn set_quantity(&mut self, quantity: Quantity) -> DomainResult<()> {
        Self::validate_quantity(quantity)?;
        self.quantity = quantity;
        self.touch();
        Ok(())
    }

    /// Sets the unit of measure.
    ///
    /// # Errors
    ///
    /// Returns `DomainError::Validation` if the unit is empty.
    pub fn set_unit(&mut self, unit: impl Into<String>) -> DomainResult<()> {
        let unit = unit.into();
        Self::validate_text("unit", &unit)?;
        self.unit = unit;
        self.touch();
        Ok(())
    }

    /// Sets or clears the product reference.
    pub fn set_product_ref(&mut self, product_ref: Option<ProductId>) {
        self.product_ref = product_ref;
        self.touch();
    }

    /// Sets or clears the category reference.
    pub fn set_category_ref(&mut self, category_ref: Option<CategoryId>) {
        self.category_ref = category_ref;
        self.touch();
    }

    /// Changes the distribution type.
    ///
    /// Only an update may change the distribution intent; distribution
    /// itself never does.
    pub fn set_distribution_type(&mut self, distribution_type: DistributionType) {
        self.distribution_type = distribution_type;
        self.touch();
    }

    /// Replaces the explicit seller allow-list, deduplicating while
    /// preserving first-occurrence order.
    pub fn set_target_sellers(&mut self, seller_ids: Vec<SellerId>) {
        let mut deduped: Vec<SellerId> = Vec::with_capacity(seller_ids.len());
        for id in seller_ids {
            if !deduped.contains(&id) {
                deduped.push(id);
            }
        }
        self.target_seller_ids = deduped;
        self.touch();
    }

    /// Sets or clears the advisory expiry date.
    pub fn set_expiry_date(&mut self, expiry_date: Option<Timestamp>) {
        self.expiry_date = expiry_date;
        self.touch();
    }

    /// Replaces the specification attributes.
    pub fn set_specifications(&mut self, specifications: Specifications) {
        self.specifications = specifications;
        self.touch();
    }

    /// Replaces the attachments.
    pub fn set_attachments(&mut self, attachments: Vec<Attachment>) {
        self.attachments = attachments;
        self.touch();
    }

    /// Moves the RFQ to a new lifecycle status.
    ///
    /// Restating the current status is a no-op and returns `Ok(false)`.
    ///
    /// # Errors
    ///
    /// Returns `DomainError::InvalidStateTransition` if the state machine
    /// forbids the change.
    pub fn transition_status(&mut self, target: RfqStatus) -> DomainResult<bool> {
        if self.status == target {
            return Ok(false);
        }
        if !self.status.can_transition_to(target) {
            return Err(DomainError::InvalidStateTransition {
                from: self.status,
                to: target,
            });
        }
        self.status = target;
        self.touch();
        Ok(true)
    }

    /// Unions seller ids into the allow-list.
    ///
    /// Existing entries are preserved, duplicates silently dropped.
    /// Returns the number of sellers actually added; the version is only
    /// bumped when the set grew.
    pub fn add_target_sellers(&mut self, seller_ids: &[SellerId]) -> usize {
        let mut added = 0;
        for id in seller_ids {
            if !self.target_seller_ids.contains(id) {
                self.target_seller_ids.push(id.clone());
                added += 1;
            }
        }
        if added > 0 {
            self.touch();
        }
        added
    }

    /// Upserts a quote response keyed by seller.
    ///
    /// An existing response from the same seller is replaced in place,
    /// keeping its position; otherwise the response is appended. Returns
    /// true when an existing entry was replaced.
    pub fn upsert_response(&mut self, response: QuoteResponse) -> bool {
        let replaced = if let Some(existing) = self
            .responses
            .iter_mut()
            .find(|r| r.seller_ref() == response.seller_ref())
        {
            *existing = response;
            true
        } else {
            self.responses.push(response);
            false
        };
        self.touch();
        replaced
    }
}

impl fmt::Display for Rfq {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "RFQ({} \"{}\" {} {} [{}/{}])",
            self.id, self.title, self.quantity, self.unit, self.status, self.distribution_type
        )
    }
}

/// Builder for constructing [`Rfq`] instances.
///
/// # Examples
///
/// ```
/// use marketplace_rfq::domain::entities::rfq::RfqBuilder;
/// use marketplace_rfq::domain::value_objects::{DistributionType, Quantity, SellerId};
///
/// let rfq = RfqBuilder::new("Pallets", "EPAL 1200x800", Quantity::new(200), "pcs")
///     .distribution_type(DistributionType::Specific)
///     .target_seller_ids(vec![SellerId::new("s1"), SellerId::new("s1")])
///     .try_build()
///     .unwrap();
///
/// // duplicates collapse at construction
/// assert_eq!(rfq.target_seller_ids().len(), 1);
/// ```
#[derive(Debug, Clone)]
pub struct RfqBuilder {
    title: String,
    description: String,
    quantity: Quantity,
    unit: String,
    product_ref: Option<ProductId>,
    category_ref: Option<CategoryId>,
    buyer_ref: Option<UserId>,
    admin_ref: Option<UserId>,
    status: RfqStatus,
    distribution_type: DistributionType,
    target_seller_ids: Vec<SellerId>,
    expiry_date: Option<Timestamp>,
    specifications: Specifications,
    attachments: Vec<Attachment>,
}

impl RfqBuilder {
    /// Creates a new builder with required fields.
    ///
    /// Defaults: status `Draft`, distribution `All`, no references, empty
    /// allow-list.
    #[must_use]
    pub fn new(
        title: impl Into<String>,
        description: impl Into<String>,
        quantity: Quantity,
        unit: impl Into<String>,
    ) -> Self {
        Self {
            title: title.into(),
            description: description.into(),
            quantity,
            unit: unit.into(),
            product_ref: None,
            category_ref: None,
            buyer_ref: None,
            admin_ref: None,
            status: RfqStatus::Draft,
            distribution_type: DistributionType::All,
            target_seller_ids: Vec::new(),
            expiry_date: None,
            specifications: Specifications::new(),
            attachments: Vec::new(),
        }
    }

    /// Sets the product reference.
    #[must_use]
    pub fn product_ref(mut self, product_ref: ProductId) -> Self {
        self.product_ref = Some(product_ref);
        self
    }

    /// Sets the category reference.
    #[must_use]
    pub fn category_ref(mut self, category_ref: CategoryId) -> Self {
        self.category_ref = Some(category_ref);
        self
    }

    /// Sets the owning buyer.
    #[must_use]
    pub fn buyer_ref(mut self, buyer_ref: UserId) -> Self {
        self.buyer_ref = Some(buyer_ref);
        self
    }

    /// Sets the creating admin.
    #[must_use]
    pub fn admin_ref(mut self, admin_ref: UserId) -> Self {
        self.admin_ref = Some(admin_ref);
        self
    }

    /// Sets the initial status (`Draft` or `Published`).
    #[must_use]
    pub fn status(mut self, status: RfqStatus) -> Self {
        self.status = status;
        self
    }

    /// Sets the distribution type.
    #[must_use]
    pub fn distribution_type(mut self, distribution_type: DistributionType) -> Self {
        self.distribution_type = distribution_type;
        self
    }

    /// Sets the explicit seller allow-list.
    #[must_use]
    pub fn target_seller_ids(mut self, seller_ids: Vec<SellerId>) -> Self {
        self.target_seller_ids = seller_ids;
        self
    }

    /// Sets the advisory expiry date.
    #[must_use]
    pub fn expiry_date(mut self, expiry_date: Timestamp) -> Self {
        self.expiry_date = Some(expiry_date);
        self
    }

    /// Sets the specification attributes.
    #[must_use]
    pub fn specifications(mut self, specifications: Specifications) -> Self {
        self.specifications = specifications;
        self
    }

    /// Sets the attachments.
    #[must_use]
    pub fn attachments(mut self, attachments: Vec<Attachment>) -> Self {
        self.attachments = attachments;
        self
    }

    /// Builds the RFQ with validation.
    ///
    /// # Errors
    ///
    /// Returns `DomainError::Validation` for empty title/description/unit
    /// or a terminal initial status, and `DomainError::InvalidQuantity`
    /// for a zero quantity.
    pub fn try_build(self) -> DomainResult<Rfq> {
        Rfq::validate_text("title", &self.title)?;
        Rfq::validate_text("description", &self.description)?;
        Rfq::validate_text("unit", &self.unit)?;
        Rfq::validate_quantity(self.quantity)?;
        Rfq::validate_initial_status(self.status)?;

        let mut deduped: Vec<SellerId> = Vec::with_capacity(self.target_seller_ids.len());
        for id in self.target_seller_ids {
            if !deduped.contains(&id) {
                deduped.push(id);
            }
        }

        let now = Timestamp::now();
        Ok(Rfq {
            id: RfqId::new_v4(),
            title: self.title,
            description: self.description,
            product_ref: self.product_ref,
            category_ref: self.category_ref,
            quantity: self.quantity,
            unit: self.unit,
            buyer_ref: self.buyer_ref,
            admin_ref: self.admin_ref,
            status: self.status,
            distribution_type: self.distribution_type,
            target_seller_ids: deduped,
            responses: Vec::new(),
            expiry_date: self.expiry_date,
            specifications: self.specifications,
            attachments: self.attachments,
            version: 1,
            created_at: now,
            updated_at: now,
        })
    }
}
