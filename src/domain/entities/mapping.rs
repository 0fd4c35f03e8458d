//! Mapping entity: the association between a short code and a URL.

use chrono::{DateTime, Utc};

/// A stored code to URL mapping with its metadata.
///
/// Everything except `hits` is immutable once the row exists.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct UrlMapping {
    pub code: String,
    pub url: String,
    pub created_at: DateTime<Utc>,
    /// Network address of the client that created the mapping.
    pub author: String,
    pub hits: u64,
}

impl UrlMapping {
    /// Creates a new UrlMapping instance.
    pub fn new(
        code: String,
        url: String,
        created_at: DateTime<Utc>,
        author: String,
        hits: u64,
    ) -> Self {
        Self {
            code,
            url,
            created_at,
            author,
            hits,
        }
    }
}

/// Input data for creating a new mapping. Hits always start at zero.
#[derive(Debug, Clone)]
pub struct NewMapping {
    pub code: String,
    pub url: String,
    pub created_at: DateTime<Utc>,
    pub author: String,
}

impl NewMapping {
    /// Builds a mapping stamped with the current time.
    pub fn now(code: impl Into<String>, url: impl Into<String>, author: impl Into<String>) -> Self {
        Self {
            code: code.into(),
            url: url.into(),
            created_at: Utc::now(),
            author: author.into(),
        }
    }

    /// Converts the creation input into the stored entity with zero hits.
    pub fn into_mapping(self) -> UrlMapping {
        UrlMapping::new(self.code, self.url, self.created_at, self.author, 0)
    }
}

/// Result of an atomic insert-or-return-existing write.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum InsertOutcome {
    /// The mapping was written with the proposed code.
    Created(String),
    /// The URL was already mapped (possibly by a concurrent request); carries its code.
    Existing(String),
    /// The proposed code was claimed by another URL between the check and the write.
    CodeTaken,
}
