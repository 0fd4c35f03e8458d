//! Hit event model for asynchronous hit counting.

/// A pending hit-count increment for one code.
///
/// Sent from the redirect path to the background worker through a bounded
/// channel, so the redirect response never waits on the database write.
/// Delivery is at-most-once: a full queue drops the event.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct HitEvent {
    pub code: String,
}

impl HitEvent {
    pub fn new(code: impl Into<String>) -> Self {
        Self { code: code.into() }
    }
}
