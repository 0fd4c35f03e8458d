//! Background worker applying hit-count increments.

use std::sync::Arc;

use tokio::sync::mpsc;
use tracing::{debug, info, warn};

use crate::domain::hit_event::HitEvent;
use crate::domain::repositories::MappingRepository;

/// Consumes hit events until every sender has been dropped.
///
/// Each event becomes one atomic increment in the store. Failures are
/// logged and discarded: hit counts are best-effort and never retried.
pub async fn run_hit_worker<R>(mut rx: mpsc::Receiver<HitEvent>, repository: Arc<R>)
where
    R: MappingRepository + ?Sized,
{
    while let Some(event) = rx.recv().await {
        match repository.increment_hits(&event.code).await {
            Ok(true) => {
                metrics::counter!("shorten_hits_recorded_total").increment(1);
                debug!(code = %event.code, "hit recorded");
            }
            Ok(false) => {
                warn!(code = %event.code, "hit for unknown code discarded");
            }
            Err(e) => {
                metrics::counter!("shorten_hits_failed_total").increment(1);
                warn!(code = %event.code, error = %e, "failed to record hit");
            }
        }
    }

    info!("Hit worker stopped: channel closed");
}
