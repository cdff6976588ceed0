//! Domain layer containing entities, strategies and store contracts.
//!
//! # Architecture
//!
//! - [`entities`] - Link entries and usage documents
//! - [`repositories`] - The [`repositories::KeyValueStore`] contract
//! - [`strategy`] - Closed set of selection strategies and request context
//! - [`rotation_tables`] - Injected time-slot, region and seed tables
//! - [`clock`] / [`random`] - Injectable time and randomness
//!
//! # Design Principles
//!
//! - Domain layer has no dependencies on infrastructure or presentation layers
//! - Persistence goes through the store trait, implemented by the
//!   infrastructure layer
//! - Time and randomness are injected so selection runs are reproducible

pub mod clock;
pub mod entities;
pub mod random;
pub mod repositories;
pub mod rotation_tables;
pub mod strategy;
