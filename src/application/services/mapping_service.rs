//! Short code allocation and redirect resolution service.

use std::sync::Arc;

use serde_json::json;
use tokio::sync::mpsc::{self, error::TrySendError};
use tracing::{debug, error, info, warn};

use crate::domain::entities::{InsertOutcome, NewMapping, UrlMapping};
use crate::domain::hit_event::HitEvent;
use crate::domain::repositories::MappingRepository;
use crate::error::AppError;
use crate::utils::code_generator::{CodeGenerator, is_reserved_code};
use crate::utils::url_validator::validate_url;

/// Candidate codes tried before giving up with [`AppError::Capacity`].
pub const DEFAULT_MAX_ATTEMPTS: usize = 50;

/// Service for creating and resolving short codes.
///
/// Holds the mapping store, the shared code generator, and the sending half
/// of the hit queue. Cloning the surrounding `Arc` is the intended way to
/// share it between request handlers.
pub struct MappingService {
    repository: Arc<dyn MappingRepository>,
    generator: Arc<dyn CodeGenerator>,
    hit_sender: mpsc::Sender<HitEvent>,
    max_attempts: usize,
}

impl MappingService {
    /// Creates a new mapping service with the default retry budget.
    pub fn new(
        repository: Arc<dyn MappingRepository>,
        generator: Arc<dyn CodeGenerator>,
        hit_sender: mpsc::Sender<HitEvent>,
    ) -> Self {
        Self {
            repository,
            generator,
            hit_sender,
            max_attempts: DEFAULT_MAX_ATTEMPTS,
        }
    }

    /// Overrides the number of candidate codes tried per creation.
    pub fn with_max_attempts(mut self, max_attempts: usize) -> Self {
        self.max_attempts = max_attempts.max(1);
        self
    }

    /// Returns the code mapped to `url`, creating the mapping on first use.
    ///
    /// Repeated calls with the same URL return the same code. Two concurrent
    /// first calls for the same URL also agree: the loser of the insert race
    /// gets [`InsertOutcome::Existing`] and returns the winner's code.
    ///
    /// # Errors
    ///
    /// - [`AppError::InvalidInput`] if the URL fails validation
    /// - [`AppError::Capacity`] if every candidate code collided
    /// - [`AppError::Storage`] on database errors
    pub async fn get_or_create_code(&self, url: &str, author: &str) -> Result<String, AppError> {
        let url = validate_url(url).map_err(|e| {
            AppError::invalid_input(e.to_string(), json!({ "url": url.trim() }))
        })?;

        let existing = self
            .repository
            .find_by_url(url)
            .await
            .inspect_err(|e| error!(url, error = %e, "find_by_url failed"))?;

        if let Some(code) = existing {
            debug!(url, code = %code, "URL already mapped");
            return Ok(code);
        }

        for attempt in 1..=self.max_attempts {
            let candidate = self.generator.generate();

            if is_reserved_code(&candidate) || self.code_taken(&candidate).await? {
                debug!(attempt, code = %candidate, "code collision, retrying");
                continue;
            }

            let new_mapping = NewMapping::now(candidate, url, author);

            let outcome = self
                .repository
                .insert(new_mapping)
                .await
                .inspect_err(|e| error!(url, error = %e, "insert failed"))?;

            match outcome {
                InsertOutcome::Created(code) => {
                    metrics::counter!("shorten_mappings_created_total").increment(1);
                    info!(url, code = %code, author, "mapping created");
                    return Ok(code);
                }
                InsertOutcome::Existing(code) => {
                    debug!(url, code = %code, "URL mapped concurrently");
                    return Ok(code);
                }
                InsertOutcome::CodeTaken => {
                    debug!(attempt, "code claimed concurrently, retrying");
                }
            }
        }

        warn!(
            url,
            attempts = self.max_attempts,
            "code generation retry budget exhausted"
        );

        Err(AppError::capacity(
            "Failed to generate unique code",
            json!({ "attempts": self.max_attempts }),
        ))
    }

    /// Resolves a code to its destination URL and schedules a hit.
    ///
    /// The hit is queued without waiting; a full queue drops it.
    ///
    /// # Errors
    ///
    /// - [`AppError::NotFound`] if the code has no mapping
    /// - [`AppError::Storage`] on database errors
    pub async fn resolve_redirect(&self, code: &str) -> Result<String, AppError> {
        let mapping = self.get_mapping(code).await?;

        self.record_hit(code);
        metrics::counter!("shorten_redirects_total").increment(1);

        Ok(mapping.url)
    }

    /// Retrieves the full mapping for a code.
    ///
    /// # Errors
    ///
    /// Returns [`AppError::NotFound`] if no mapping has this code.
    /// Returns [`AppError::Storage`] on database errors.
    pub async fn get_mapping(&self, code: &str) -> Result<UrlMapping, AppError> {
        self.repository
            .find_by_code(code)
            .await
            .inspect_err(|e| error!(code, error = %e, "find_by_code failed"))?
            .ok_or_else(|| {
                debug!(code, "code not found");
                AppError::not_found("Short code not found", json!({ "code": code }))
            })
    }

    /// Checks the backing store.
    ///
    /// # Errors
    ///
    /// Returns [`AppError::Storage`] if the store is unreachable.
    pub async fn ping(&self) -> Result<(), AppError> {
        self.repository.ping().await
    }

    /// Sending half of the hit queue, exposed for health reporting.
    pub fn hit_queue(&self) -> &mpsc::Sender<HitEvent> {
        &self.hit_sender
    }

    /// Builds the public short URL for a code.
    ///
    /// Always uses HTTPS protocol.
    pub fn short_url(host: &str, code: &str) -> String {
        format!("https://{}/{}", host.trim_end_matches('/'), code)
    }

    async fn code_taken(&self, code: &str) -> Result<bool, AppError> {
        self.repository
            .exists(code)
            .await
            .inspect_err(|e| error!(code, error = %e, "exists check failed"))
    }

    fn record_hit(&self, code: &str) {
        match self.hit_sender.try_send(HitEvent::new(code)) {
            Ok(()) => {}
            Err(TrySendError::Full(event)) => {
                metrics::counter!("shorten_hits_dropped_total").increment(1);
                warn!(code = %event.code, "hit queue full, hit dropped");
            }
            Err(TrySendError::Closed(event)) => {
                metrics::counter!("shorten_hits_dropped_total").increment(1);
                warn!(code = %event.code, "hit queue closed, hit dropped");
            }
        }
    }
}
