//! JSON API and redirect layer.
//!
//! Translates HTTP requests into [`crate::application::services::MappingService`]
//! calls and formats the responses.
//!
//! # Modules
//!
//! - [`dto`] - Request/response serialization types
//! - [`handlers`] - HTTP request handlers
//! - [`middleware`] - Request tracing
//! - [`routes`] - API route configuration

pub mod dto;
pub mod handlers;
pub mod middleware;
pub mod routes;
