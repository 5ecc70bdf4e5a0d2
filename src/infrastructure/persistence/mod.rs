//! # Persistence
//!
//! The RFQ store: port definition plus in-memory and PostgreSQL
//! implementations. The repository is the only mutable shared resource in
//! the engine; see [`traits`] for the concurrency contract.

pub mod in_memory;
pub mod postgres;
pub mod traits;

pub use in_memory::InMemoryRfqRepository;
pub use postgres::PostgresRfqRepository;
pub use traits::{RepositoryError, RepositoryResult, RfqFilter, RfqRepository};
