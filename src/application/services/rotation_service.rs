//! Composed link rotation: availability, selection, accounting.

use std::sync::Arc;

use chrono::{DateTime, Utc};
use serde_json::json;
use tracing::{debug, info, warn};

use crate::application::services::{LinkRegistry, SelectionEngine, UsageStore};
use crate::domain::clock::Clock;
use crate::domain::entities::LinkEntry;
use crate::domain::strategy::{SelectionContext, Strategy};
use crate::error::AppError;
use crate::utils::link_renderer::{normalize_stock_symbol, render_target};

/// Outcome of a successful rotation.
#[derive(Debug, Clone)]
pub struct LinkSelection {
    pub entry: LinkEntry,
    /// Target rendered for the visitor.
    pub url: String,
    /// Strategy that actually ran, after name resolution.
    pub strategy: Strategy,
    pub timestamp: DateTime<Utc>,
}

/// Entry point for link rotation.
///
/// Wires [`LinkRegistry`], [`SelectionEngine`] and [`UsageStore`] together and
/// owns the fallback link handed out when rotation cannot produce one.
pub struct RotationService {
    registry: Arc<LinkRegistry>,
    engine: Arc<SelectionEngine>,
    usage: Arc<UsageStore>,
    clock: Arc<dyn Clock>,
    default_strategy: Strategy,
    fallback_url: String,
}

impl RotationService {
    pub fn new(
        registry: Arc<LinkRegistry>,
        engine: Arc<SelectionEngine>,
        usage: Arc<UsageStore>,
        clock: Arc<dyn Clock>,
        default_strategy: Strategy,
        fallback_url: impl Into<String>,
    ) -> Self {
        Self {
            registry,
            engine,
            usage,
            clock,
            default_strategy,
            fallback_url: fallback_url.into(),
        }
    }

    pub fn default_strategy(&self) -> Strategy {
        self.default_strategy
    }

    /// Selects one available link and records its use.
    ///
    /// `strategy_name` of `None` uses the configured default; unrecognized
    /// names resolve to [`Strategy::WeightedRandom`]. The context hour is
    /// filled from the clock when the caller leaves it empty.
    ///
    /// Usage recording is best-effort and never fails the selection.
    ///
    /// # Errors
    ///
    /// Returns [`AppError::NoAvailableLinks`] if no entry is enabled and under
    /// its daily quota.
    pub async fn get_link(
        &self,
        strategy_name: Option<&str>,
        mut ctx: SelectionContext,
    ) -> Result<LinkSelection, AppError> {
        let strategy = strategy_name
            .filter(|name| !name.trim().is_empty())
            .map_or(self.default_strategy, Strategy::resolve);

        let entries = self.registry.available_now().await;
        if entries.is_empty() {
            return Err(AppError::no_available_links(
                "No available links",
                json!({ "strategy": strategy.as_str() }),
            ));
        }

        if ctx.hour_of_day_utc.is_none() {
            ctx.hour_of_day_utc = Some(self.clock.hour());
        }
        let symbol = ctx.stock_symbol.as_deref().and_then(normalize_stock_symbol);

        let entry = self.engine.select(&entries, strategy, &ctx).await?;

        self.usage.record(&entry.id, symbol.as_deref()).await;
        metrics::counter!("link_selections_total", "strategy" => strategy.as_str()).increment(1);

        info!(
            link_id = %entry.id,
            strategy = %strategy,
            region = ctx.region.as_deref().unwrap_or("-"),
            "Link rotated"
        );

        Ok(LinkSelection {
            url: render_target(&entry.target, symbol.as_deref()),
            entry,
            strategy,
            timestamp: self.clock.now(),
        })
    }

    /// Fallback link for a visitor, rendered with their stock symbol.
    pub fn fallback_url_for(&self, stock_symbol: Option<&str>) -> String {
        metrics::counter!("link_selection_fallbacks_total").increment(1);
        let symbol = stock_symbol.and_then(normalize_stock_symbol);
        render_target(&self.fallback_url, symbol.as_deref())
    }

    /// Records a click reported by the client for a known entry.
    ///
    /// If the registry cannot be read the id is not verified and the click is
    /// dropped with a warning.
    ///
    /// # Errors
    ///
    /// Returns [`AppError::InvalidInput`] if `id` is blank or names no entry.
    pub async fn record_external_click(
        &self,
        id: &str,
        stock_symbol: Option<&str>,
    ) -> Result<(), AppError> {
        let id = id.trim();
        if id.is_empty() {
            return Err(AppError::invalid_input(
                "Link ID required",
                json!({ "field": "linkId" }),
            ));
        }

        let links = match self.registry.try_list().await {
            Ok(links) => links,
            Err(e) => {
                warn!(link_id = id, error = %e, "Cannot verify clicked link, dropping click");
                return Ok(());
            }
        };

        if !links.iter().any(|link| link.id == id) {
            return Err(AppError::invalid_input(
                "Unknown link ID",
                json!({ "linkId": id }),
            ));
        }

        let symbol = stock_symbol.and_then(normalize_stock_symbol);
        self.usage.record(id, symbol.as_deref()).await;

        debug!(link_id = id, "External click recorded");
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::clock::FixedClock;
    use crate::domain::entities::{NewLinkEntry, SeedLink};
    use crate::domain::random::FixedRandom;
    use crate::domain::repositories::{KeyValueStore, MockKeyValueStore, StoreError};
    use crate::domain::rotation_tables::{RotationTables, TimeSlot};
    use crate::infrastructure::store::MemoryStore;
    use chrono::TimeZone;

    const FALLBACK: &str = "https://wa.me/?text=Hello, I need support";

    fn seed(id: &str, weight: u32) -> SeedLink {
        SeedLink {
            id: id.to_string(),
            link: NewLinkEntry::new(format!("https://wa.me/{id}?text=Hi")).with_weight(weight),
        }
    }

    fn service_with(
        store: Arc<dyn KeyValueStore>,
        tables: RotationTables,
        fraction: f64,
    ) -> (RotationService, Arc<UsageStore>) {
        let clock = Arc::new(FixedClock::new(
            Utc.with_ymd_and_hms(2026, 3, 2, 3, 15, 0).unwrap(),
        ));
        let usage = Arc::new(UsageStore::new(store.clone(), clock.clone()));
        let registry = Arc::new(LinkRegistry::new(
            store,
            usage.clone(),
            clock.clone(),
            tables.seed_links.clone(),
        ));
        let engine = Arc::new(SelectionEngine::new(
            Arc::new(tables),
            usage.clone(),
            Arc::new(FixedRandom::new(fraction)),
        ));
        (
            RotationService::new(
                registry,
                engine,
                usage.clone(),
                clock,
                Strategy::WeightedRandom,
                FALLBACK,
            ),
            usage,
        )
    }

    fn service(seeds: Vec<SeedLink>, fraction: f64) -> (RotationService, Arc<UsageStore>) {
        service_with(
            Arc::new(MemoryStore::new()),
            RotationTables::default().with_seed_links(seeds),
            fraction,
        )
    }

    #[tokio::test]
    async fn test_get_link_selects_records_and_renders() {
        let (service, usage) = service(vec![seed("a", 1), seed("b", 3)], 0.5);

        let selection = service
            .get_link(None, SelectionContext::default().with_stock_symbol("nvda"))
            .await
            .unwrap();

        assert_eq!(selection.entry.id, "b");
        assert_eq!(selection.strategy, Strategy::WeightedRandom);
        assert!(selection.url.starts_with("https://wa.me/b?"));
        assert!(selection.url.contains("NVDA"));

        let stats = usage.load_stats().await.unwrap();
        assert_eq!(stats.total["b"], 1);
        assert_eq!(stats.stocks["NVDA"], 1);
    }

    #[tokio::test]
    async fn test_unknown_strategy_name_reports_weighted_random() {
        let (service, _) = service(vec![seed("a", 1)], 0.0);

        let selection = service
            .get_link(Some("random"), SelectionContext::default())
            .await
            .unwrap();

        assert_eq!(selection.strategy, Strategy::WeightedRandom);
    }

    #[tokio::test]
    async fn test_time_based_uses_clock_hour() {
        let tables = RotationTables::default()
            .with_time_slots(vec![TimeSlot::new(0, 6, &["4"], "night")])
            .with_seed_links(vec![seed("1", 5), seed("2", 5), seed("4", 1)]);
        let (service, _) = service_with(Arc::new(MemoryStore::new()), tables, 0.0);

        let selection = service
            .get_link(Some("time_based"), SelectionContext::default())
            .await
            .unwrap();

        assert_eq!(selection.entry.id, "4");
        assert_eq!(selection.strategy, Strategy::TimeBased);
    }

    #[tokio::test]
    async fn test_no_available_links() {
        let (service, _) = service(Vec::new(), 0.0);

        let result = service.get_link(None, SelectionContext::default()).await;

        assert!(matches!(result, Err(AppError::NoAvailableLinks { .. })));
    }

    #[tokio::test]
    async fn test_store_outage_degrades_to_no_available_links() {
        let mut mock_store = MockKeyValueStore::new();
        mock_store
            .expect_get()
            .returning(|_| Err(StoreError::Unavailable("down".to_string())));
        let (service, _) =
            service_with(Arc::new(mock_store), RotationTables::default(), 0.0);

        let result = service.get_link(None, SelectionContext::default()).await;

        assert!(matches!(result, Err(AppError::NoAvailableLinks { .. })));
    }

    fn read_only_store() -> MockKeyValueStore {
        let mut mock_store = MockKeyValueStore::new();
        mock_store.expect_get().returning(|_| Ok(None));
        mock_store
            .expect_put()
            .returning(|_, _| Err(StoreError::Unavailable("read-only".to_string())));
        mock_store
    }

    #[tokio::test]
    async fn test_write_failures_never_block_selection() {
        let tables = RotationTables::default().with_seed_links(vec![seed("a", 1), seed("b", 3)]);

        let expected = [
            (Strategy::WeightedRandom, "b"),
            (Strategy::RoundRobin, "a"),
            (Strategy::LeastUsed, "a"),
        ];

        for (strategy, id) in expected {
            let (service, _) = service_with(Arc::new(read_only_store()), tables.clone(), 0.5);

            let selection = service
                .get_link(Some(strategy.as_str()), SelectionContext::default())
                .await
                .unwrap();

            assert_eq!(selection.entry.id, id, "strategy {}", strategy);
            assert_eq!(selection.strategy, strategy);
        }
    }

    #[tokio::test]
    async fn test_fallback_url_includes_symbol() {
        let (service, _) = service(Vec::new(), 0.0);

        assert_eq!(service.fallback_url_for(None), FALLBACK);
        assert!(service.fallback_url_for(Some("TSLA")).contains("TSLA"));
        assert_eq!(service.fallback_url_for(Some("<bad>")), FALLBACK);
    }

    #[tokio::test]
    async fn test_record_external_click() {
        let (service, usage) = service(vec![seed("a", 1)], 0.0);

        service.record_external_click("a", Some("aapl")).await.unwrap();

        let stats = usage.load_stats().await.unwrap();
        assert_eq!(stats.total["a"], 1);
        assert_eq!(stats.stocks["AAPL"], 1);
    }

    #[tokio::test]
    async fn test_record_external_click_rejects_blank_and_unknown_ids() {
        let (service, usage) = service(vec![seed("a", 1)], 0.0);

        assert!(matches!(
            service.record_external_click("  ", None).await,
            Err(AppError::InvalidInput { .. })
        ));
        assert!(matches!(
            service.record_external_click("zzz", None).await,
            Err(AppError::InvalidInput { .. })
        ));
        assert_eq!(usage.get_counts().await.total_for("zzz"), 0);
    }
}
