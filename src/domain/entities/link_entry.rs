//! Link entry entity: one candidate outbound contact link.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

fn default_weight() -> u32 {
    1
}

fn default_enabled() -> bool {
    true
}

/// A candidate outbound link with its rotation settings.
///
/// Persisted as one element of the link collection document. Field aliases
/// accept documents written with the older `name`/`url`/`maxDailyClicks`
/// keys.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct LinkEntry {
    pub id: String,
    #[serde(alias = "url")]
    pub target: String,
    #[serde(default, alias = "name", skip_serializing_if = "Option::is_none")]
    pub label: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub description: Option<String>,
    #[serde(default = "default_weight")]
    pub weight: u32,
    #[serde(default = "default_enabled")]
    pub enabled: bool,
    #[serde(
        default,
        alias = "maxDailyClicks",
        skip_serializing_if = "Option::is_none"
    )]
    pub max_daily_quota: Option<u32>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub region: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub specialization: Option<String>,
    pub created_at: DateTime<Utc>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub updated_at: Option<DateTime<Utc>>,
}

impl LinkEntry {
    /// Weight used by selection; stored zeros count as 1.
    pub fn effective_weight(&self) -> u32 {
        self.weight.max(1)
    }

    /// Returns true if the entry has used up its quota for the day.
    pub fn is_quota_exhausted(&self, today_count: u64) -> bool {
        self.max_daily_quota
            .is_some_and(|quota| today_count >= u64::from(quota))
    }
}

/// Input data for creating a new link entry.
///
/// Missing `weight` is coerced to 1 and missing `enabled` to `true`.
#[derive(Debug, Clone, Default, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct NewLinkEntry {
    #[serde(alias = "url")]
    pub target: String,
    #[serde(default, alias = "name")]
    pub label: Option<String>,
    #[serde(default)]
    pub description: Option<String>,
    #[serde(default)]
    pub weight: Option<u32>,
    #[serde(default)]
    pub enabled: Option<bool>,
    #[serde(default, alias = "maxDailyClicks")]
    pub max_daily_quota: Option<u32>,
    #[serde(default)]
    pub region: Option<String>,
    #[serde(default)]
    pub specialization: Option<String>,
}

impl NewLinkEntry {
    /// Creates input for an entry pointing at `target` with default settings.
    pub fn new(target: impl Into<String>) -> Self {
        Self {
            target: target.into(),
            ..Self::default()
        }
    }

    pub fn with_weight(mut self, weight: u32) -> Self {
        self.weight = Some(weight);
        self
    }

    pub fn with_label(mut self, label: impl Into<String>) -> Self {
        self.label = Some(label.into());
        self
    }

    pub fn with_quota(mut self, quota: u32) -> Self {
        self.max_daily_quota = Some(quota);
        self
    }

    pub fn with_specialization(mut self, specialization: impl Into<String>) -> Self {
        self.specialization = Some(specialization.into());
        self
    }

    pub fn disabled(mut self) -> Self {
        self.enabled = Some(false);
        self
    }

    /// Materializes the entry with an assigned id and creation time.
    pub fn into_entry(self, id: String, now: DateTime<Utc>) -> LinkEntry {
        LinkEntry {
            id,
            target: self.target.trim().to_string(),
            label: self.label,
            description: self.description,
            weight: self.weight.unwrap_or(1),
            enabled: self.enabled.unwrap_or(true),
            max_daily_quota: self.max_daily_quota,
            region: self.region,
            specialization: self.specialization,
            created_at: now,
            updated_at: Some(now),
        }
    }
}

/// A configured entry with a fixed id, persisted when the collection is empty.
#[derive(Debug, Clone, Deserialize)]
pub struct SeedLink {
    pub id: String,
    #[serde(flatten)]
    pub link: NewLinkEntry,
}

/// Partial update for an existing entry.
///
/// `None` fields are left unchanged. For clearable fields, `Some(None)`
/// clears the value and `Some(Some(v))` sets it. The id is not part of the
/// patch and therefore cannot be changed.
#[derive(Debug, Clone, Default)]
pub struct LinkEntryPatch {
    pub target: Option<String>,
    pub label: Option<Option<String>>,
    pub description: Option<Option<String>>,
    pub weight: Option<u32>,
    pub enabled: Option<bool>,
    pub max_daily_quota: Option<Option<u32>>,
    pub region: Option<Option<String>>,
    pub specialization: Option<Option<String>>,
}

impl LinkEntryPatch {
    /// Applies the supplied fields to `entry` and refreshes `updated_at`.
    pub fn apply(self, entry: &mut LinkEntry, now: DateTime<Utc>) {
        if let Some(target) = self.target {
            entry.target = target.trim().to_string();
        }
        if let Some(label) = self.label {
            entry.label = label;
        }
        if let Some(description) = self.description {
            entry.description = description;
        }
        if let Some(weight) = self.weight {
            entry.weight = weight;
        }
        if let Some(enabled) = self.enabled {
            entry.enabled = enabled;
        }
        if let Some(quota) = self.max_daily_quota {
            entry.max_daily_quota = quota;
        }
        if let Some(region) = self.region {
            entry.region = region;
        }
        if let Some(specialization) = self.specialization {
            entry.specialization = specialization;
        }
        entry.updated_at = Some(now);
    }
}
