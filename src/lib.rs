//! # Link Rotator
//!
//! Distributes visitors across a pool of contact links (WhatsApp deep links
//! and the like) using configurable selection strategies, with per-link
//! daily quotas and shared usage accounting in Redis.
//!
//! ## Architecture
//!
//! This crate follows Clean Architecture principles with clear layer separation:
//!
//! - **Domain Layer** ([`domain`]) - Link entries, strategies, rotation tables, store trait
//! - **Application Layer** ([`application`]) - Registry, selection engine, rotation and stats services
//! - **Infrastructure Layer** ([`infrastructure`]) - Redis and in-memory store adapters
//! - **API Layer** ([`api`]) - REST API handlers, DTOs, and middleware
//!
//! ## Features
//!
//! - Five strategies: `weighted_random`, `round_robin`, `least_used`,
//!   `time_based`, `specialization`
//! - Daily quotas and per-link usage statistics
//! - Stock symbol interest appended to the rendered link
//! - Timezone gate in front of the static site
//! - Admin key authentication, rate limiting and observability
//!
//! ## Quick Start
//!
//! ```bash
//! export ADMIN_KEY="change-me"
//! export REDIS_URL="redis://localhost:6379"  # Optional, in-memory otherwise
//!
//! cargo run
//! ```
//!
//! ## Configuration
//!
//! Service configuration is loaded from environment variables via [`config::Config`].
//! See [`config`] module for available options.

pub mod api;
pub mod application;
pub mod domain;
pub mod error;
pub mod infrastructure;
pub mod state;
pub mod utils;

pub mod config;
pub mod server;

pub mod routes;

pub use error::AppError;
pub use state::AppState;

/// Commonly used types for external consumers.
///
/// Re-exports frequently used types to simplify imports for library users
/// and integration tests.
pub mod prelude {
    pub use crate::application::services::{
        LinkRegistry, RotationService, SettingsService, StatsService,
    };
    pub use crate::domain::entities::{LinkEntry, LinkEntryPatch, NewLinkEntry};
    pub use crate::domain::strategy::{SelectionContext, Strategy};
    pub use crate::error::AppError;
    pub use crate::state::{AppState, StateOptions};
}
