//! Home page handlers.

use askama::Template;
use askama_web::WebTemplate;
use axum::{
    Form,
    extract::{ConnectInfo, Query, State},
    http::HeaderMap,
    response::{IntoResponse, Response},
};
use serde::Deserialize;
use std::net::SocketAddr;

use crate::state::AppState;
use crate::utils::client_addr::client_addr;

/// Template for the home page.
///
/// Renders `templates/index.html` with the submission form and, after a
/// submission, either the short link or an inline error message.
#[derive(Template, WebTemplate)]
#[template(path = "index.html")]
pub struct IndexTemplate {
    pub host: String,
    pub mail: Option<String>,
    pub url: String,
    pub short_url: Option<String>,
    pub error: Option<String>,
}

impl IndexTemplate {
    fn empty(state: &AppState) -> Self {
        Self {
            host: state.public_host.clone(),
            mail: state.contact_mail.clone(),
            url: String::new(),
            short_url: None,
            error: None,
        }
    }
}

#[derive(Debug, Deserialize)]
pub struct HomeQuery {
    pub url: Option<String>,
}

#[derive(Debug, Deserialize)]
pub struct ShortenForm {
    #[serde(default)]
    pub url: String,
}

/// Renders the home page.
///
/// # Endpoint
///
/// `GET /`
///
/// With a non-empty `?url=` query parameter the page is skipped and the
/// short URL is returned as plain text, which makes the service scriptable
/// with nothing more than `curl`.
pub async fn home_handler(
    State(state): State<AppState>,
    ConnectInfo(peer): ConnectInfo<SocketAddr>,
    headers: HeaderMap,
    Query(query): Query<HomeQuery>,
) -> Response {
    let Some(url) = query.url.filter(|u| !u.trim().is_empty()) else {
        return IndexTemplate::empty(&state).into_response();
    };

    let author = client_addr(&headers, peer, state.behind_proxy);

    match state.mapping_service.get_or_create_code(&url, &author).await {
        Ok(code) => state.short_url(&code).into_response(),
        Err(e) => (e.status(), e.to_error_info().message).into_response(),
    }
}

/// Handles the form submission.
///
/// # Endpoint
///
/// `POST /`
///
/// Re-renders the page with the short link, or with the error message and
/// the submitted URL kept in the input field.
pub async fn submit_handler(
    State(state): State<AppState>,
    ConnectInfo(peer): ConnectInfo<SocketAddr>,
    headers: HeaderMap,
    Form(form): Form<ShortenForm>,
) -> Response {
    let author = client_addr(&headers, peer, state.behind_proxy);
    let mut page = IndexTemplate::empty(&state);

    match state
        .mapping_service
        .get_or_create_code(&form.url, &author)
        .await
    {
        Ok(code) => {
            page.short_url = Some(state.short_url(&code));
            page.into_response()
        }
        Err(e) => {
            page.url = form.url.trim().to_string();
            page.error = Some(e.to_error_info().message);
            (e.status(), page).into_response()
        }
    }
}
