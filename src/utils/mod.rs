//! Utility functions for code generation, URL validation, and request handling.
//!
//! - [`code_generator`] - Short code generation
//! - [`url_validator`] - URL acceptance policy
//! - [`client_addr`] - Requester address extraction

pub mod client_addr;
pub mod code_generator;
pub mod url_validator;
