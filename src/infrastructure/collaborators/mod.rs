//! # External Collaborators
//!
//! Ports onto the systems this core consumes but does not implement:
//! identity (principals, seller directory), the product catalog, and the
//! outbound notification publisher. Each port ships with an in-memory
//! implementation for tests plus a production adapter.

pub mod catalog;
pub mod identity;
pub mod notifier;

pub use catalog::{Catalog, CatalogError, CategorySummary, HttpCatalogClient, InMemoryCatalog,
    ProductSummary};
pub use identity::{
    Claims, HttpIdentityClient, IdentityError, InMemoryIdentityDirectory, JwtPrincipalResolver,
    Principal, PrincipalResolver, SellerDirectory, UserSummary,
};
#[cfg(feature = "nats")]
pub use notifier::NatsEventPublisher;
pub use notifier::{EventPublisher, RecordingEventPublisher, TracingEventPublisher};
