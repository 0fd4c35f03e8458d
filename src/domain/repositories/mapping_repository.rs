//! Repository trait for code to URL mappings.

use crate::domain::entities::{InsertOutcome, NewMapping, UrlMapping};
use crate::error::AppError;
use async_trait::async_trait;

/// Repository interface for URL mappings.
///
/// Storage guarantees uniqueness of both `code` and `url`; implementations
/// report a lost race through [`InsertOutcome`] instead of an error.
///
/// # Implementations
///
/// - [`crate::infrastructure::persistence::PgMappingRepository`] - PostgreSQL implementation
/// - Test mocks available with `cfg(test)`
#[cfg_attr(test, mockall::automock)]
#[async_trait]
pub trait MappingRepository: Send + Sync {
    /// Finds the code assigned to an exact URL.
    ///
    /// # Errors
    ///
    /// Returns [`AppError::Storage`] on database errors.
    async fn find_by_url(&self, url: &str) -> Result<Option<String>, AppError>;

    /// Returns whether a code is already assigned.
    ///
    /// # Errors
    ///
    /// Returns [`AppError::Storage`] on database errors.
    async fn exists(&self, code: &str) -> Result<bool, AppError>;

    /// Inserts a new mapping with zero hits, or returns the code already
    /// stored for the same URL.
    ///
    /// # Returns
    ///
    /// - `InsertOutcome::Created` when the row was written
    /// - `InsertOutcome::Existing` when the URL is already mapped
    /// - `InsertOutcome::CodeTaken` when the code belongs to another URL
    ///
    /// # Errors
    ///
    /// Returns [`AppError::Storage`] if the write fails for any other reason.
    async fn insert(&self, new_mapping: NewMapping) -> Result<InsertOutcome, AppError>;

    /// Finds a mapping by its code.
    ///
    /// # Errors
    ///
    /// Returns [`AppError::Storage`] on database errors.
    async fn find_by_code(&self, code: &str) -> Result<Option<UrlMapping>, AppError>;

    /// Atomically adds one hit to a mapping.
    ///
    /// Returns `Ok(false)` if no mapping has this code.
    ///
    /// # Errors
    ///
    /// Returns [`AppError::Storage`] on database errors.
    async fn increment_hits(&self, code: &str) -> Result<bool, AppError>;

    /// Checks that the backing store is reachable.
    ///
    /// # Errors
    ///
    /// Returns [`AppError::Storage`] if the store cannot be queried.
    async fn ping(&self) -> Result<(), AppError>;
}
