//! Business logic services for the application layer.

pub mod auth_service;
pub mod link_registry;
pub mod rotation_service;
pub mod selection_engine;
pub mod settings_service;
pub mod stats_service;
pub mod usage_store;

pub use auth_service::AuthService;
pub use link_registry::LinkRegistry;
pub use rotation_service::{LinkSelection, RotationService};
pub use selection_engine::SelectionEngine;
pub use settings_service::{AnalyticsSettings, SettingsService};
pub use stats_service::{AccountsOverview, StatsReport, StatsService};
pub use usage_store::UsageStore;
