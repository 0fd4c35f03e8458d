//! Handler for the shortening endpoint.

use axum::{
    Json,
    extract::{ConnectInfo, State},
    http::HeaderMap,
};
use std::net::SocketAddr;
use validator::Validate;

use crate::api::dto::shorten::{ShortenRequest, ShortenResponse};
use crate::error::AppError;
use crate::state::AppState;
use crate::utils::client_addr::client_addr;

/// Returns the short code for a URL, creating it on first submission.
///
/// # Endpoint
///
/// `POST /api/shorten`
///
/// # Request Body
///
/// ```json
/// { "url": "https://example.com/very/long/path" }
/// ```
///
/// # Response
///
/// ```json
/// {
///   "url": "https://example.com/very/long/path",
///   "code": "AbXyZq",
///   "short_url": "https://s.example.com/AbXyZq"
/// }
/// ```
///
/// # Errors
///
/// - 400 Bad Request if the URL is rejected
/// - 503 Service Unavailable if no free code could be found
/// - 500 Internal Server Error on storage failure
pub async fn shorten_handler(
    State(state): State<AppState>,
    ConnectInfo(peer): ConnectInfo<SocketAddr>,
    headers: HeaderMap,
    Json(payload): Json<ShortenRequest>,
) -> Result<Json<ShortenResponse>, AppError> {
    payload.validate()?;

    let author = client_addr(&headers, peer, state.behind_proxy);

    let code = state
        .mapping_service
        .get_or_create_code(&payload.url, &author)
        .await?;

    Ok(Json(ShortenResponse {
        url: payload.url.trim().to_string(),
        short_url: state.short_url(&code),
        code,
    }))
}
