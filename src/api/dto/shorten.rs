//! DTOs for the shortening endpoint.

use serde::{Deserialize, Serialize};
use std::borrow::Cow;
use validator::{Validate, ValidationError};

use crate::utils::url_validator::MAX_URL_LENGTH;

/// Request to shorten a URL.
///
/// Only the size is checked here; the URL policy itself is enforced by the
/// service so that the form page and the API agree.
#[derive(Debug, Deserialize, Validate)]
pub struct ShortenRequest {
    #[validate(custom(function = "validate_url_size"))]
    pub url: String,
}

/// Measures the URL the way the service stores it: trimmed, in bytes.
fn validate_url_size(url: &str) -> Result<(), ValidationError> {
    let len = url.trim().len();

    if len == 0 || len > MAX_URL_LENGTH {
        return Err(ValidationError::new("length").with_message(Cow::Owned(format!(
            "URL must be 1-{MAX_URL_LENGTH} bytes"
        ))));
    }

    Ok(())
}

/// The code mapped to a URL and the public short link.
#[derive(Debug, Serialize)]
pub struct ShortenResponse {
    pub url: String,
    pub code: String,
    pub short_url: String,
}
