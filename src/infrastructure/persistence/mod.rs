//! PostgreSQL repository implementations.
//!
//! Concrete implementations of domain repository traits using SQLx.
//!
//! # Repositories
//!
//! - [`PgMappingRepository`] - URL mapping storage and hit counting

pub mod pg_mapping_repository;

pub use pg_mapping_repository::PgMappingRepository;
