//! # PostgreSQL Persistence
//!
//! Durable RFQ storage on PostgreSQL via sqlx.

pub mod rfq_repository;

pub use rfq_repository::PostgresRfqRepository;
