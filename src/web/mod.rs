//! Browser-facing home page.
//!
//! A single form for submitting URLs, rendered server-side with Askama.
//!
//! # Modules
//!
//! - [`handlers`] - Template rendering handlers
//! - [`routes`] - Page route configuration

pub mod handlers;
pub mod routes;
