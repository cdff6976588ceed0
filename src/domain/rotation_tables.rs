//! Static rotation tables: time slots, region mapping and seed links.

use anyhow::{Result, bail};
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;

use crate::domain::entities::{NewLinkEntry, SeedLink};

/// An hour range `[start, end)` naming the entry ids allowed within it.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct TimeSlot {
    pub start: u32,
    pub end: u32,
    #[serde(alias = "accounts")]
    pub link_ids: Vec<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub description: Option<String>,
}

impl TimeSlot {
    pub fn new(start: u32, end: u32, link_ids: &[&str], description: &str) -> Self {
        Self {
            start,
            end,
            link_ids: link_ids.iter().map(|id| id.to_string()).collect(),
            description: Some(description.to_string()),
        }
    }

    /// Returns true if `hour` falls inside `[start, end)`.
    pub fn contains(&self, hour: u32) -> bool {
        hour >= self.start && hour < self.end
    }

    pub fn allows(&self, id: &str) -> bool {
        self.link_ids.iter().any(|allowed| allowed == id)
    }
}

/// Configuration consumed by the context-aware strategies and the registry.
#[derive(Debug, Clone, Deserialize)]
pub struct RotationTables {
    #[serde(default = "default_time_slots")]
    pub time_slots: Vec<TimeSlot>,
    #[serde(default = "default_region_specializations")]
    pub region_specializations: BTreeMap<String, Vec<String>>,
    #[serde(default)]
    pub seed_links: Vec<SeedLink>,
}

impl Default for RotationTables {
    fn default() -> Self {
        Self {
            time_slots: default_time_slots(),
            region_specializations: default_region_specializations(),
            seed_links: Vec::new(),
        }
    }
}

fn default_time_slots() -> Vec<TimeSlot> {
    vec![
        TimeSlot::new(0, 6, &["4"], "Night shift - senior advisor only"),
        TimeSlot::new(6, 9, &["1", "2"], "Pre-market US stocks"),
        TimeSlot::new(9, 16, &["1", "2", "4"], "US market hours"),
        TimeSlot::new(16, 18, &["3", "5"], "Post-US market, EU active"),
        TimeSlot::new(18, 22, &["3", "4", "5"], "EU and Asia overlap"),
        TimeSlot::new(22, 24, &["4"], "Asia market focus"),
    ]
}

fn default_region_specializations() -> BTreeMap<String, Vec<String>> {
    BTreeMap::from([
        (
            "US".to_string(),
            vec!["US_STOCKS".to_string(), "TECH_STOCKS".to_string()],
        ),
        (
            "EU".to_string(),
            vec![
                "MARKET_ANALYSIS".to_string(),
                "INVESTMENT_ADVICE".to_string(),
            ],
        ),
        ("ASIA".to_string(), vec!["PREMIUM_ANALYSIS".to_string()]),
    ])
}

impl RotationTables {
    /// Parses tables from a JSON document; omitted sections take defaults.
    pub fn from_json(raw: &str) -> Result<Self> {
        Ok(serde_json::from_str(raw)?)
    }

    pub fn with_time_slots(mut self, time_slots: Vec<TimeSlot>) -> Self {
        self.time_slots = time_slots;
        self
    }

    pub fn with_seed_links(mut self, seed_links: Vec<SeedLink>) -> Self {
        self.seed_links = seed_links;
        self
    }

    /// First slot containing `hour`; overlapping slots resolve in table order.
    pub fn slot_for_hour(&self, hour: u32) -> Option<&TimeSlot> {
        self.time_slots.iter().find(|slot| slot.contains(hour))
    }

    /// Specializations preferred for `region`, matched case-insensitively.
    pub fn specializations_for(&self, region: &str) -> Option<&[String]> {
        let region = region.trim();
        self.region_specializations
            .iter()
            .find(|(key, _)| key.eq_ignore_ascii_case(region))
            .map(|(_, specs)| specs.as_slice())
    }

    /// Hours of the day not covered by any slot.
    pub fn uncovered_hours(&self) -> Vec<u32> {
        (0..24)
            .filter(|hour| self.slot_for_hour(*hour).is_none())
            .collect()
    }

    /// Slot ids that no seed link carries, sorted and deduplicated.
    ///
    /// Generated ids are random, so a slot id only matches an entry when a
    /// seed link declares it. The default slots name `1` to `5`; without a
    /// seed list those ids stay unmatched and `time_based` uses the full set.
    pub fn unseeded_slot_ids(&self) -> Vec<String> {
        let mut ids: Vec<String> = self
            .time_slots
            .iter()
            .flat_map(|slot| slot.link_ids.iter())
            .filter(|id| !self.seed_links.iter().any(|seed| &seed.id == *id))
            .cloned()
            .collect();
        ids.sort();
        ids.dedup();
        ids
    }

    /// Validates slot bounds and seed link ids.
    ///
    /// # Errors
    ///
    /// Returns an error if a slot has `start >= end` or `end > 24`, or if a
    /// seed link has a blank id, a blank target, or a zero weight.
    pub fn validate(&self) -> Result<()> {
        for slot in &self.time_slots {
            if slot.start >= slot.end || slot.end > 24 {
                bail!(
                    "Time slot [{}, {}) must satisfy start < end <= 24",
                    slot.start,
                    slot.end
                );
            }
        }

        for seed in &self.seed_links {
            if seed.id.trim().is_empty() {
                bail!("Seed link ids must not be blank");
            }
            let NewLinkEntry { target, weight, .. } = &seed.link;
            if target.trim().is_empty() {
                bail!("Seed link '{}' has an empty target", seed.id);
            }
            if *weight == Some(0) {
                bail!("Seed link '{}' must have a weight of at least 1", seed.id);
            }
        }

        Ok(())
    }
}
