//! # Domain Entities
//!
//! - [`rfq::Rfq`]: the RFQ aggregate root
//! - [`response::QuoteResponse`]: a seller's quote, owned by its RFQ

pub mod response;
pub mod rfq;

pub use response::QuoteResponse;
pub use rfq::{Rfq, RfqBuilder};
