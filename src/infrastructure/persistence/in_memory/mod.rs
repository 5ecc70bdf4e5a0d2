//! # In-Memory Repositories
//!
//! In-memory persistence for tests and local runs, with the same
//! atomicity guarantees as the durable backends.

pub mod rfq_repository;

pub use rfq_repository::InMemoryRfqRepository;
