//! Usage accounting over the shared key-value store.

use std::sync::Arc;

use serde_json::json;
use tracing::{debug, warn};

use crate::domain::clock::Clock;
use crate::domain::entities::{UsageCounts, UsageStats};
use crate::domain::repositories::{KeyValueStore, StoreResult};
use crate::error::AppError;

/// Store key of the usage statistics document.
pub const USAGE_STATS_KEY: &str = "usage_stats";

/// Store key of the round-robin cursor.
pub const ROUND_ROBIN_KEY: &str = "round_robin_index";

/// Owns the usage statistics document and the round-robin cursor.
///
/// # Consistency
///
/// Every [`record`](Self::record) is a read-modify-write of the whole
/// document with no compare-and-swap. Two concurrent calls may both read the
/// same version and the later write wins, losing one increment. Counters are
/// therefore best-effort; they never block link selection.
pub struct UsageStore {
    store: Arc<dyn KeyValueStore>,
    clock: Arc<dyn Clock>,
}

impl UsageStore {
    pub fn new(store: Arc<dyn KeyValueStore>, clock: Arc<dyn Clock>) -> Self {
        Self { store, clock }
    }

    /// Loads the stats document, treating an absent key as empty.
    ///
    /// An unparseable document is logged and read as empty so that accounting
    /// can resume on the next write.
    ///
    /// # Errors
    ///
    /// Returns [`AppError::StoreUnavailable`] if the store cannot be read.
    pub async fn load_stats(&self) -> Result<UsageStats, AppError> {
        let Some(raw) = self.store.get(USAGE_STATS_KEY).await? else {
            return Ok(UsageStats::default());
        };

        match serde_json::from_str(&raw) {
            Ok(stats) => Ok(stats),
            Err(e) => {
                warn!(error = %e, "Usage stats document is corrupt, starting from empty");
                Ok(UsageStats::default())
            }
        }
    }

    /// Snapshot of lifetime and today's counters.
    ///
    /// # Errors
    ///
    /// Returns [`AppError::StoreUnavailable`] if the store cannot be read.
    pub async fn try_get_counts(&self) -> Result<UsageCounts, AppError> {
        let stats = self.load_stats().await?;
        Ok(stats.counts_for(&self.clock.today()))
    }

    /// Snapshot of lifetime and today's counters, empty if the store is down.
    pub async fn get_counts(&self) -> UsageCounts {
        match self.try_get_counts().await {
            Ok(counts) => counts,
            Err(e) => {
                warn!(error = %e, "Failed to read usage counts, treating as zero");
                UsageCounts::default()
            }
        }
    }

    /// Records one selection of `id`, optionally crediting a stock symbol.
    ///
    /// Failures are logged and swallowed.
    pub async fn record(&self, id: &str, symbol: Option<&str>) {
        if let Err(e) = self.try_record(id, symbol).await {
            metrics::counter!("usage_record_failures_total").increment(1);
            warn!(link_id = id, error = %e, "Failed to record link usage");
        }
    }

    async fn try_record(&self, id: &str, symbol: Option<&str>) -> Result<(), AppError> {
        let mut stats = self.load_stats().await?;
        let now = self.clock.now();
        stats.increment(id, &self.clock.today(), symbol, now);

        let raw = serde_json::to_string(&stats).map_err(|e| {
            AppError::internal(
                "Failed to serialize usage stats",
                json!({ "reason": e.to_string() }),
            )
        })?;
        self.store.put(USAGE_STATS_KEY, &raw).await?;

        debug!(link_id = id, total = stats.total[id], "Recorded link usage");
        Ok(())
    }

    /// Reads the persisted round-robin cursor, 0 when absent or unparseable.
    ///
    /// # Errors
    ///
    /// Returns the store error if the cursor cannot be read.
    pub async fn round_robin_cursor(&self) -> StoreResult<usize> {
        let raw = self.store.get(ROUND_ROBIN_KEY).await?;
        Ok(raw
            .and_then(|v| {
                v.trim()
                    .parse()
                    .inspect_err(|_| warn!(value = %v, "Ignoring unparseable round-robin cursor"))
                    .ok()
            })
            .unwrap_or(0))
    }

    /// Persists the round-robin cursor.
    ///
    /// # Errors
    ///
    /// Returns the store error if the cursor cannot be written.
    pub async fn set_round_robin_cursor(&self, cursor: usize) -> StoreResult<()> {
        self.store.put(ROUND_ROBIN_KEY, &cursor.to_string()).await
    }
}
