//! Shared application state and service wiring.

use std::sync::Arc;

use crate::application::services::{
    AuthService, LinkRegistry, RotationService, SelectionEngine, SettingsService, StatsService,
    UsageStore,
};
use crate::config::{Config, DEFAULT_FALLBACK_URL, DEFAULT_GEO_REDIRECT_URL, DEFAULT_TRACKING_ID};
use crate::domain::clock::Clock;
use crate::domain::random::RandomSource;
use crate::domain::repositories::KeyValueStore;
use crate::domain::rotation_tables::RotationTables;
use crate::domain::strategy::Strategy;

/// Runtime options that are not part of the rotation tables.
#[derive(Debug, Clone)]
pub struct StateOptions {
    pub admin_key: String,
    pub default_strategy: Strategy,
    pub fallback_url: String,
    pub geo_redirect_url: String,
    pub analytics_tracking_id: String,
}

impl Default for StateOptions {
    fn default() -> Self {
        Self {
            admin_key: String::new(),
            default_strategy: Strategy::default(),
            fallback_url: DEFAULT_FALLBACK_URL.to_string(),
            geo_redirect_url: DEFAULT_GEO_REDIRECT_URL.to_string(),
            analytics_tracking_id: DEFAULT_TRACKING_ID.to_string(),
        }
    }
}

impl From<&Config> for StateOptions {
    fn from(config: &Config) -> Self {
        Self {
            admin_key: config.admin_key.clone(),
            default_strategy: config.strategy(),
            fallback_url: config.fallback_url.clone(),
            geo_redirect_url: config.geo_redirect_url.clone(),
            analytics_tracking_id: config.analytics_tracking_id.clone(),
        }
    }
}

#[derive(Clone)]
pub struct AppState {
    pub rotation: Arc<RotationService>,
    pub registry: Arc<LinkRegistry>,
    pub stats: Arc<StatsService>,
    pub settings: Arc<SettingsService>,
    pub auth: Arc<AuthService>,
    pub store: Arc<dyn KeyValueStore>,
    pub geo_redirect_url: Arc<str>,
}

impl AppState {
    /// Wires every service over one store, clock and random source.
    pub fn new(
        store: Arc<dyn KeyValueStore>,
        clock: Arc<dyn Clock>,
        random: Arc<dyn RandomSource>,
        tables: RotationTables,
        options: StateOptions,
    ) -> Self {
        let tables = Arc::new(tables);

        let usage = Arc::new(UsageStore::new(store.clone(), clock.clone()));
        let registry = Arc::new(LinkRegistry::new(
            store.clone(),
            usage.clone(),
            clock.clone(),
            tables.seed_links.clone(),
        ));
        let engine = Arc::new(SelectionEngine::new(
            tables.clone(),
            usage.clone(),
            random,
        ));
        let rotation = Arc::new(RotationService::new(
            registry.clone(),
            engine,
            usage.clone(),
            clock.clone(),
            options.default_strategy,
            options.fallback_url,
        ));
        let stats = Arc::new(StatsService::new(
            registry.clone(),
            usage,
            clock,
            tables,
            options.default_strategy,
        ));
        let settings = Arc::new(SettingsService::new(
            store.clone(),
            options.analytics_tracking_id,
        ));
        let auth = Arc::new(AuthService::new(options.admin_key));

        Self {
            rotation,
            registry,
            stats,
            settings,
            auth,
            store,
            geo_redirect_url: options.geo_redirect_url.into(),
        }
    }
}
