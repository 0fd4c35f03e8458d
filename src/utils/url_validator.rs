//! Acceptance policy for submitted URLs.
//!
//! A URL is accepted when, after trimming surrounding whitespace, it:
//!
//! 1. is non-empty and no longer than [`MAX_URL_LENGTH`] bytes
//! 2. starts with `http://` or `https://` (scheme is case-insensitive)
//! 3. contains no whitespace or control characters
//! 4. parses as an absolute URL with a non-empty host
//! 5. carries no credentials (`user:pass@host`)
//!
//! Any port the parser accepts is allowed, and IDN hosts are accepted. The
//! trimmed input is returned unchanged so that lookups stay exact-match.

use url::Url;

/// Longest URL accepted, matching the common browser limit.
pub const MAX_URL_LENGTH: usize = 2083;

/// Reasons a URL is rejected.
#[derive(Debug, PartialEq, Eq, thiserror::Error)]
pub enum UrlValidationError {
    #[error("URL must not be empty")]
    Empty,

    #[error("URL is longer than {MAX_URL_LENGTH} bytes")]
    TooLong,

    #[error("Only http:// and https:// URLs are allowed")]
    UnsupportedScheme,

    #[error("URL must not contain whitespace or control characters")]
    IllegalCharacter,

    #[error("Invalid URL format: {0}")]
    InvalidFormat(String),

    #[error("URL must include a host")]
    MissingHost,

    #[error("URL must not contain credentials")]
    Credentials,
}

/// Validates a submitted URL and returns the trimmed form to store.
///
/// # Errors
///
/// Returns the first [`UrlValidationError`] rule the input breaks.
///
/// # Examples
///
/// ```
/// use shorten::utils::url_validator::{validate_url, UrlValidationError};
///
/// assert_eq!(
///     validate_url("  https://example.com/path ").unwrap(),
///     "https://example.com/path"
/// );
/// assert_eq!(
///     validate_url("ftp://example.com"),
///     Err(UrlValidationError::UnsupportedScheme)
/// );
/// ```
pub fn validate_url(input: &str) -> Result<&str, UrlValidationError> {
    let candidate = input.trim();

    if candidate.is_empty() {
        return Err(UrlValidationError::Empty);
    }

    if candidate.len() > MAX_URL_LENGTH {
        return Err(UrlValidationError::TooLong);
    }

    if !has_http_prefix(candidate) {
        return Err(UrlValidationError::UnsupportedScheme);
    }

    if candidate
        .chars()
        .any(|c| c.is_whitespace() || c.is_control())
    {
        return Err(UrlValidationError::IllegalCharacter);
    }

    let parsed =
        Url::parse(candidate).map_err(|e| UrlValidationError::InvalidFormat(e.to_string()))?;

    match parsed.scheme() {
        "http" | "https" => {}
        _ => return Err(UrlValidationError::UnsupportedScheme),
    }

    if parsed.host_str().is_none_or(str::is_empty) {
        return Err(UrlValidationError::MissingHost);
    }

    if !parsed.username().is_empty() || parsed.password().is_some() {
        return Err(UrlValidationError::Credentials);
    }

    Ok(candidate)
}

fn has_http_prefix(s: &str) -> bool {
    ["http://", "https://"].iter().any(|prefix| {
        s.get(..prefix.len())
            .is_some_and(|head| head.eq_ignore_ascii_case(prefix))
    })
}
