//! Core domain entities.
//!
//! The shortener has a single entity, [`UrlMapping`]. Creation input is
//! carried separately by [`NewMapping`], and the result of the atomic
//! insert by [`InsertOutcome`].

pub mod mapping;

pub use mapping::{InsertOutcome, NewMapping, UrlMapping};
