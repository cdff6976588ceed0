//! Usage statistics and accounts overview.

use std::collections::HashMap;
use std::sync::Arc;

use chrono::{DateTime, Utc};
use serde::{Serialize, Serializer};
use tracing::warn;

use crate::application::services::{LinkRegistry, UsageStore};
use crate::domain::clock::Clock;
use crate::domain::entities::{LinkEntry, UsageStats};
use crate::domain::rotation_tables::{RotationTables, TimeSlot};
use crate::domain::strategy::Strategy;

/// Selections left today for a quota-limited entry.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum RemainingQuota {
    Limited(u64),
    Unlimited,
}

impl Serialize for RemainingQuota {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        match self {
            RemainingQuota::Limited(n) => serializer.serialize_u64(*n),
            RemainingQuota::Unlimited => serializer.serialize_str("Unlimited"),
        }
    }
}

/// One entry with its usage figures.
#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct LinkUsage {
    #[serde(flatten)]
    pub entry: LinkEntry,
    pub total_clicks: u64,
    pub today_clicks: u64,
    /// Share of all recorded selections, formatted like `"12.50%"`.
    pub percentage: String,
    pub remaining_today: RemainingQuota,
}

#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct StatsReport {
    pub links: Vec<LinkUsage>,
    pub popular_symbols: HashMap<String, u64>,
    /// Raw lifetime totals, including ids of deleted entries.
    pub link_stats: HashMap<String, u64>,
    pub last_updated: Option<DateTime<Utc>>,
    pub default_strategy: Strategy,
    pub today: String,
}

#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct AccountsOverview {
    pub links: Vec<LinkEntry>,
    pub available: Vec<LinkEntry>,
    pub total: usize,
    pub available_count: usize,
    pub time_slots: Vec<TimeSlot>,
}

/// Read-only reporting over the registry and usage counters.
///
/// Reports never fail: an unreadable store yields empty figures.
pub struct StatsService {
    registry: Arc<LinkRegistry>,
    usage: Arc<UsageStore>,
    clock: Arc<dyn Clock>,
    tables: Arc<RotationTables>,
    default_strategy: Strategy,
}

impl StatsService {
    pub fn new(
        registry: Arc<LinkRegistry>,
        usage: Arc<UsageStore>,
        clock: Arc<dyn Clock>,
        tables: Arc<RotationTables>,
        default_strategy: Strategy,
    ) -> Self {
        Self {
            registry,
            usage,
            clock,
            tables,
            default_strategy,
        }
    }

    /// Per-entry usage with share of total and remaining daily quota.
    pub async fn report(&self) -> StatsReport {
        let links = self.registry.list().await;
        let stats = match self.usage.load_stats().await {
            Ok(stats) => stats,
            Err(e) => {
                warn!(error = %e, "Failed to load usage stats for report");
                UsageStats::default()
            }
        };

        let today = self.clock.today();
        let counts = stats.counts_for(&today);
        let grand_total: u64 = stats.total.values().sum();

        let links = links
            .into_iter()
            .map(|entry| {
                let total_clicks = counts.total_for(&entry.id);
                let today_clicks = counts.today_for(&entry.id);
                let remaining_today = match entry.max_daily_quota {
                    Some(quota) => {
                        RemainingQuota::Limited(u64::from(quota).saturating_sub(today_clicks))
                    }
                    None => RemainingQuota::Unlimited,
                };

                LinkUsage {
                    percentage: format_share(total_clicks, grand_total),
                    entry,
                    total_clicks,
                    today_clicks,
                    remaining_today,
                }
            })
            .collect();

        StatsReport {
            links,
            popular_symbols: stats.stocks,
            link_stats: stats.total,
            last_updated: stats.last_updated,
            default_strategy: self.default_strategy,
            today,
        }
    }

    /// All entries, those currently available, and the configured time slots.
    pub async fn overview(&self) -> AccountsOverview {
        let links = self.registry.list().await;
        let available = self.registry.available_now().await;

        AccountsOverview {
            total: links.len(),
            available_count: available.len(),
            links,
            available,
            time_slots: self.tables.time_slots.clone(),
        }
    }
}

fn format_share(part: u64, whole: u64) -> String {
    if whole == 0 {
        return "0%".to_string();
    }
    format!("{:.2}%", part as f64 / whole as f64 * 100.0)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::application::services::usage_store::USAGE_STATS_KEY;
    use crate::domain::clock::FixedClock;
    use crate::domain::entities::{NewLinkEntry, SeedLink};
    use crate::domain::repositories::KeyValueStore;
    use crate::infrastructure::store::MemoryStore;
    use chrono::TimeZone;
    use serde_json::json;

    async fn service() -> StatsService {
        let store = Arc::new(MemoryStore::new());
        let clock = Arc::new(FixedClock::new(
            Utc.with_ymd_and_hms(2026, 4, 1, 12, 0, 0).unwrap(),
        ));
        let usage = Arc::new(UsageStore::new(store.clone(), clock.clone()));
        let seeds = vec![
            SeedLink {
                id: "a".to_string(),
                link: NewLinkEntry::new("https://wa.me/a").with_quota(10),
            },
            SeedLink {
                id: "b".to_string(),
                link: NewLinkEntry::new("https://wa.me/b"),
            },
            SeedLink {
                id: "c".to_string(),
                link: NewLinkEntry::new("https://wa.me/c").disabled(),
            },
        ];
        let registry = Arc::new(LinkRegistry::new(
            store.clone(),
            usage.clone(),
            clock.clone(),
            seeds,
        ));

        let stats = json!({
            "total": { "a": 3, "b": 1, "gone": 4 },
            "daily": { "2026-04-01": { "a": 2 } },
            "stocks": { "NVDA": 2 }
        });
        store
            .put(USAGE_STATS_KEY, &stats.to_string())
            .await
            .unwrap();

        StatsService::new(
            registry,
            usage,
            clock,
            Arc::new(RotationTables::default()),
            Strategy::RoundRobin,
        )
    }

    #[tokio::test]
    async fn test_report_figures() {
        let report = service().await.report().await;

        assert_eq!(report.today, "2026-04-01");
        assert_eq!(report.links.len(), 3);

        let a = &report.links[0];
        assert_eq!(a.total_clicks, 3);
        assert_eq!(a.today_clicks, 2);
        assert_eq!(a.percentage, "37.50%");
        assert_eq!(a.remaining_today, RemainingQuota::Limited(8));

        let b = &report.links[1];
        assert_eq!(b.percentage, "12.50%");
        assert_eq!(b.remaining_today, RemainingQuota::Unlimited);

        assert_eq!(report.link_stats["gone"], 4);
        assert_eq!(report.popular_symbols["NVDA"], 2);
    }

    #[tokio::test]
    async fn test_report_serialization() {
        let report = service().await.report().await;
        let value = serde_json::to_value(&report).unwrap();

        assert_eq!(value["defaultStrategy"], "round_robin");
        assert_eq!(value["links"][0]["id"], "a");
        assert_eq!(value["links"][0]["remainingToday"], 8);
        assert_eq!(value["links"][1]["remainingToday"], "Unlimited");
        assert_eq!(value["links"][2]["percentage"], "0.00%");
    }

    #[tokio::test]
    async fn test_overview_counts_available() {
        let overview = service().await.overview().await;

        assert_eq!(overview.total, 3);
        assert_eq!(overview.available_count, 2);
        assert_eq!(overview.time_slots.len(), 6);
    }

    #[test]
    fn test_format_share() {
        assert_eq!(format_share(0, 0), "0%");
        assert_eq!(format_share(1, 3), "33.33%");
        assert_eq!(format_share(5, 5), "100.00%");
    }
}
