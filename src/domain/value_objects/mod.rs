//! # Value Objects
//!
//! Immutable types with validation and domain semantics.
//!
//! ## Identity Types
//!
//! - [`RfqId`], [`EventId`]: UUID-based identifiers
//! - [`UserId`], [`SellerId`], [`ProductId`], [`CategoryId`]: opaque
//!   string identifiers owned by the external identity/catalog systems
//!
//! ## Numeric Types
//!
//! - [`Price`]: non-negative decimal quote price
//! - [`Quantity`]: integer quantity
//!
//! ## Domain Enums
//!
//! - [`RfqStatus`]: RFQ lifecycle states
//! - [`DistributionType`]: seller visibility policy
//! - [`ResponseStatus`]: quote response lifecycle
//! - [`Role`]: principal roles
//!
//! ## Composite Values
//!
//! - [`Specifications`]: ordered unique-key attribute dictionary
//! - [`Attachment`]: file reference
//! - [`Timestamp`]: UTC timestamp wrapper

pub mod attachment;
pub mod enums;
pub mod ids;
pub mod price;
pub mod quantity;
pub mod specifications;
pub mod timestamp;

pub use attachment::Attachment;
pub use enums::{DistributionType, ParseEnumError, ResponseStatus, RfqStatus, Role};
pub use ids::{CategoryId, EventId, ProductId, RfqId, SellerId, UserId};
pub use price::Price;
pub use quantity::Quantity;
pub use specifications::Specifications;
pub use timestamp::Timestamp;
