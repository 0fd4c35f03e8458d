//! Home page route configuration.

use crate::state::AppState;
use crate::web::handlers::{home_handler, submit_handler};
use axum::{Router, routing::get};

/// Public page routes.
///
/// # Endpoints
///
/// - `GET /` - Form page, or plain-text short URL when `?url=` is given
/// - `POST /` - Form submission
pub fn routes() -> Router<AppState> {
    Router::new().route("/", get(home_handler).post(submit_handler))
}
