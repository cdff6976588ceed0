//! Application layer services implementing business logic.
//!
//! Services consume the [`KeyValueStore`](crate::domain::repositories::KeyValueStore)
//! trait and the injected clock and random source, and provide a clean API
//! for HTTP handlers and the admin CLI.
//!
//! # Available Services
//!
//! - [`services::LinkRegistry`] - Link entry collection and availability
//! - [`services::UsageStore`] - Usage counters and the round-robin cursor
//! - [`services::SelectionEngine`] - Strategy dispatch
//! - [`services::RotationService`] - Composed rotation entry point
//! - [`services::StatsService`] - Usage report and accounts overview
//! - [`services::SettingsService`] - Geo gate and analytics switches
//! - [`services::AuthService`] - Admin key authentication

pub mod services;
