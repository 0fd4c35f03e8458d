//! Shared application state injected into every handler.

use std::sync::Arc;

use crate::application::services::MappingService;

/// State shared by all request handlers.
#[derive(Clone)]
pub struct AppState {
    pub mapping_service: Arc<MappingService>,
    /// Host that short URLs are built with, e.g. `s.example.com`.
    pub public_host: String,
    /// Contact address shown on the home page.
    pub contact_mail: Option<String>,
    /// Trust `X-Forwarded-For` when recording the author address.
    pub behind_proxy: bool,
}

impl AppState {
    pub fn new(mapping_service: Arc<MappingService>, public_host: impl Into<String>) -> Self {
        Self {
            mapping_service,
            public_host: public_host.into(),
            contact_mail: None,
            behind_proxy: false,
        }
    }

    pub fn with_contact_mail(mut self, contact_mail: Option<String>) -> Self {
        self.contact_mail = contact_mail;
        self
    }

    pub fn with_behind_proxy(mut self, behind_proxy: bool) -> Self {
        self.behind_proxy = behind_proxy;
        self
    }

    /// Builds the public short URL for a code.
    pub fn short_url(&self, code: &str) -> String {
        MappingService::short_url(&self.public_host, code)
    }
}
