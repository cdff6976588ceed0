//! Runtime switches kept in the store: geo gate and analytics.

use std::sync::Arc;

use serde::Serialize;
use tracing::{debug, info, warn};

use crate::domain::repositories::KeyValueStore;
use crate::error::AppError;
use crate::utils::timezone::is_us_timezone;

/// Store key of the geo gate switch (`"on"` enables it).
pub const GEO_GATE_KEY: &str = "UTC";
pub const GA_ENABLED_KEY: &str = "GA_ENABLED";
pub const GA_TRACKING_ID_KEY: &str = "GA_TRACKING_ID";

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct AnalyticsSettings {
    pub enabled: bool,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub tracking_id: Option<String>,
}

/// Reads and writes the operator switches.
///
/// Reads never fail; a store error reads as the switch being off.
pub struct SettingsService {
    store: Arc<dyn KeyValueStore>,
    default_tracking_id: String,
}

impl SettingsService {
    pub fn new(store: Arc<dyn KeyValueStore>, default_tracking_id: impl Into<String>) -> Self {
        Self {
            store,
            default_tracking_id: default_tracking_id.into(),
        }
    }

    pub async fn geo_gate_enabled(&self) -> bool {
        match self.store.get(GEO_GATE_KEY).await {
            Ok(value) => value.is_some_and(|v| v.trim().eq_ignore_ascii_case("on")),
            Err(e) => {
                warn!(error = %e, "Failed to read geo gate switch, treating as off");
                false
            }
        }
    }

    /// # Errors
    ///
    /// Returns [`AppError::StoreUnavailable`] if the switch cannot be written.
    pub async fn set_geo_gate(&self, enabled: bool) -> Result<(), AppError> {
        let value = if enabled { "on" } else { "off" };
        self.store.put(GEO_GATE_KEY, value).await?;
        info!(enabled, "Geo gate switched");
        Ok(())
    }

    /// Decides whether a visitor with `timezone` may see the site.
    ///
    /// Everyone is admitted while the gate is off. With the gate on, only US
    /// timezones pass; an unknown timezone is turned away.
    pub async fn admits(&self, timezone: Option<&str>) -> bool {
        if !self.geo_gate_enabled().await {
            return true;
        }

        let admitted = is_us_timezone(timezone);
        debug!(timezone = timezone.unwrap_or("unknown"), admitted, "Geo gate decision");
        admitted
    }

    pub async fn analytics(&self) -> AnalyticsSettings {
        let enabled = match self.store.get(GA_ENABLED_KEY).await {
            Ok(value) => value.as_deref() == Some("true"),
            Err(e) => {
                warn!(error = %e, "Failed to read analytics settings");
                return AnalyticsSettings {
                    enabled: false,
                    tracking_id: None,
                };
            }
        };

        let tracking_id = self
            .store
            .get(GA_TRACKING_ID_KEY)
            .await
            .ok()
            .flatten()
            .filter(|id| !id.trim().is_empty())
            .unwrap_or_else(|| self.default_tracking_id.clone());

        AnalyticsSettings {
            enabled,
            tracking_id: Some(tracking_id),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::repositories::{MockKeyValueStore, StoreError};
    use crate::infrastructure::store::MemoryStore;

    fn settings(store: Arc<dyn KeyValueStore>) -> SettingsService {
        SettingsService::new(store, "AW-0000")
    }

    #[tokio::test]
    async fn test_gate_off_admits_everyone() {
        let service = settings(Arc::new(MemoryStore::new()));

        assert!(!service.geo_gate_enabled().await);
        assert!(service.admits(None).await);
        assert!(service.admits(Some("Europe/Berlin")).await);
    }

    #[tokio::test]
    async fn test_gate_on_admits_only_us() {
        let service = settings(Arc::new(MemoryStore::with_entries([(GEO_GATE_KEY, " ON ")])));

        assert!(service.geo_gate_enabled().await);
        assert!(service.admits(Some("America/Denver")).await);
        assert!(!service.admits(Some("Europe/Berlin")).await);
        assert!(!service.admits(None).await);
    }

    #[tokio::test]
    async fn test_set_geo_gate_round_trip() {
        let service = settings(Arc::new(MemoryStore::new()));

        service.set_geo_gate(true).await.unwrap();
        assert!(service.geo_gate_enabled().await);

        service.set_geo_gate(false).await.unwrap();
        assert!(!service.geo_gate_enabled().await);
    }

    #[tokio::test]
    async fn test_gate_store_failure_admits() {
        let mut mock_store = MockKeyValueStore::new();
        mock_store
            .expect_get()
            .returning(|_| Err(StoreError::Unavailable("down".to_string())));
        let service = settings(Arc::new(mock_store));

        assert!(service.admits(Some("Asia/Tokyo")).await);
        assert_eq!(
            service.analytics().await,
            AnalyticsSettings {
                enabled: false,
                tracking_id: None
            }
        );
    }

    #[tokio::test]
    async fn test_analytics_defaults_tracking_id() {
        let service = settings(Arc::new(MemoryStore::with_entries([(GA_ENABLED_KEY, "true")])));

        let analytics = service.analytics().await;

        assert!(analytics.enabled);
        assert_eq!(analytics.tracking_id.as_deref(), Some("AW-0000"));
    }

    #[tokio::test]
    async fn test_analytics_uses_stored_tracking_id() {
        let service = settings(Arc::new(MemoryStore::with_entries([
            (GA_ENABLED_KEY, "false"),
            (GA_TRACKING_ID_KEY, "G-123"),
        ])));

        let analytics = service.analytics().await;

        assert!(!analytics.enabled);
        assert_eq!(analytics.tracking_id.as_deref(), Some("G-123"));
    }
}
