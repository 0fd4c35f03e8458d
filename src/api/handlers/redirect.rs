//! Handler for short URL redirect.

use axum::{
    extract::{Path, State},
    http::{StatusCode, header},
    response::{IntoResponse, Response},
};

use crate::error::AppError;
use crate::state::AppState;
use crate::utils::code_generator::is_valid_code;

/// Where unknown codes are sent.
const FALLBACK_LOCATION: &str = "/";

/// Redirects a short code to its original URL.
///
/// # Endpoint
///
/// `GET /{code}`
///
/// # Behavior
///
/// - Known code: 301 Moved Permanently to the stored URL; a hit is queued
/// - Unknown or malformed code: 302 Found to `/`
/// - Storage failure: 500 Internal Server Error
pub async fn redirect_handler(Path(code): Path<String>, State(state): State<AppState>) -> Response {
    if !is_valid_code(&code) {
        return fallback();
    }

    match state.mapping_service.resolve_redirect(&code).await {
        Ok(url) => (StatusCode::MOVED_PERMANENTLY, [(header::LOCATION, url)]).into_response(),
        Err(AppError::NotFound { .. }) => fallback(),
        Err(e) => e.into_response(),
    }
}

fn fallback() -> Response {
    (StatusCode::FOUND, [(header::LOCATION, FALLBACK_LOCATION)]).into_response()
}
