//! HTML template rendering handlers.

mod home;

pub use home::{HomeQuery, IndexTemplate, ShortenForm, home_handler, submit_handler};
