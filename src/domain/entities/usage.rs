//! Usage accounting documents.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use std::collections::{BTreeMap, HashMap};

/// Persisted usage statistics document.
///
/// Counters are keyed by entry id (and by UTC date for `daily`). They only
/// ever grow and may reference ids that have since been deleted.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct UsageStats {
    #[serde(default)]
    pub total: HashMap<String, u64>,
    #[serde(default)]
    pub daily: BTreeMap<String, HashMap<String, u64>>,
    #[serde(default)]
    pub stocks: HashMap<String, u64>,
    #[serde(default)]
    pub last_updated: Option<DateTime<Utc>>,
}

impl UsageStats {
    /// Adds one selection of `id` on `day`, optionally crediting a symbol.
    pub fn increment(
        &mut self,
        id: &str,
        day: &str,
        symbol: Option<&str>,
        now: DateTime<Utc>,
    ) {
        *self.total.entry(id.to_string()).or_insert(0) += 1;
        *self
            .daily
            .entry(day.to_string())
            .or_default()
            .entry(id.to_string())
            .or_insert(0) += 1;
        if let Some(symbol) = symbol {
            *self.stocks.entry(symbol.to_string()).or_insert(0) += 1;
        }
        self.last_updated = Some(now);
    }

    /// Projects the document onto the counters relevant for `day`.
    pub fn counts_for(&self, day: &str) -> UsageCounts {
        UsageCounts {
            total: self.total.clone(),
            today: self.daily.get(day).cloned().unwrap_or_default(),
        }
    }
}

/// Snapshot of lifetime and same-day counters.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
pub struct UsageCounts {
    pub total: HashMap<String, u64>,
    #[serde(rename = "dailyTotalForToday")]
    pub today: HashMap<String, u64>,
}

impl UsageCounts {
    /// Lifetime selections of `id`; unknown ids read as zero.
    pub fn total_for(&self, id: &str) -> u64 {
        self.total.get(id).copied().unwrap_or(0)
    }

    /// Selections of `id` on the snapshot's day; unknown ids read as zero.
    pub fn today_for(&self, id: &str) -> u64 {
        self.today.get(id).copied().unwrap_or(0)
    }
}
