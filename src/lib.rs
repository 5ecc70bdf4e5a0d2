//! # marketplace-rfq
//!
//! B2B marketplace RFQ distribution-and-quoting engine.
//!
//! Buyers (or admins on their behalf) publish Requests-for-Quote; admins
//! curate which sellers see which RFQs; eligible sellers submit price
//! quotes with upsert-by-seller semantics. The crate is organized in four
//! layers:
//!
//! - [`domain`]: the [`Rfq`](domain::entities::rfq::Rfq) aggregate with
//!   its enforced status state machine, the three-policy
//!   [`EligibilityResolver`](domain::services::eligibility::EligibilityResolver),
//!   the [`AuthorizationGate`](domain::services::authorization::AuthorizationGate)
//!   capability matrix, and domain events
//! - [`application`]: use-case services (lifecycle, distribution, quote
//!   ledger, seller feed) and the caller-facing error taxonomy
//! - [`infrastructure`]: the RFQ store (in-memory and PostgreSQL) and
//!   ports onto the external identity, catalog, and notification systems
//! - [`api`]: the axum REST surface
//!
//! # Example
//!
//! ```
//! use marketplace_rfq::application::services::{NewRfq, RfqLifecycleService};
//! use marketplace_rfq::domain::value_objects::{DistributionType, Quantity, Role, Specifications};
//! use marketplace_rfq::infrastructure::collaborators::catalog::InMemoryCatalog;
//! use marketplace_rfq::infrastructure::collaborators::identity::{
//!     InMemoryIdentityDirectory, Principal,
//! };
//! use marketplace_rfq::infrastructure::collaborators::notifier::TracingEventPublisher;
//! use marketplace_rfq::infrastructure::persistence::in_memory::InMemoryRfqRepository;
//! use std::sync::Arc;
//!
//! # #[tokio::main(flavor = "current_thread")]
//! # async fn main() {
//! let lifecycle = RfqLifecycleService::new(
//!     Arc::new(InMemoryRfqRepository::new()),
//!     Arc::new(InMemoryCatalog::new()),
//!     Arc::new(InMemoryIdentityDirectory::new()),
//!     Arc::new(TracingEventPublisher),
//! );
//!
//! let rfq = lifecycle
//!     .create(
//!         &Principal::new("buyer-1", Role::Buyer),
//!         NewRfq {
//!             title: "Steel beams".into(),
//!             description: "IPE 200, EN 10025".into(),
//!             quantity: Quantity::new(40),
//!             unit: "pcs".into(),
//!             product_ref: None,
//!             category_ref: None,
//!             buyer_ref: None,
//!             status: None,
//!             distribution_type: DistributionType::All,
//!             target_seller_ids: Vec::new(),
//!             expiry_date: None,
//!             specifications: Specifications::new(),
//!             attachments: Vec::new(),
//!         },
//!     )
//!     .await
//!     .unwrap();
//!
//! assert_eq!(rfq.title(), "Steel beams");
//! # }
//! ```

pub mod api;
pub mod application;
pub mod config;
pub mod domain;
pub mod infrastructure;
