//! Domain layer containing business entities and contracts.
//!
//! # Architecture
//!
//! - [`entities`] - Core business data structures
//! - [`repositories`] - Data access trait definitions
//! - [`hit_event`] - Hit counting event model
//! - [`hit_worker`] - Asynchronous hit processing worker
//!
//! # Hit Processing Flow
//!
//! 1. A redirect is resolved by [`crate::application::services::MappingService`]
//! 2. A [`hit_event::HitEvent`] is pushed onto a bounded channel (non-blocking)
//! 3. [`hit_worker::run_hit_worker`] applies an atomic increment
//! 4. Failures are logged and dropped

pub mod entities;
pub mod hit_event;
pub mod hit_worker;
pub mod repositories;
