//! Strategy dispatch over an available set of link entries.

use std::sync::Arc;

use serde_json::json;
use tracing::{debug, warn};

use crate::application::services::UsageStore;
use crate::domain::entities::{LinkEntry, UsageCounts};
use crate::domain::random::RandomSource;
use crate::domain::rotation_tables::RotationTables;
use crate::domain::strategy::{SelectionContext, Strategy};
use crate::error::AppError;

/// Executes the selection algorithm named by a [`Strategy`].
///
/// The engine holds no selection state of its own. The only persisted state
/// it touches is the round-robin cursor and, for [`Strategy::LeastUsed`]
/// without pre-fetched counts, the usage document.
pub struct SelectionEngine {
    tables: Arc<RotationTables>,
    usage: Arc<UsageStore>,
    random: Arc<dyn RandomSource>,
}

impl SelectionEngine {
    pub fn new(
        tables: Arc<RotationTables>,
        usage: Arc<UsageStore>,
        random: Arc<dyn RandomSource>,
    ) -> Self {
        Self {
            tables,
            usage,
            random,
        }
    }

    pub fn tables(&self) -> &RotationTables {
        &self.tables
    }

    /// Picks exactly one entry from `entries`.
    ///
    /// # Errors
    ///
    /// Returns [`AppError::NoAvailableLinks`] if `entries` is empty. Every
    /// other failure degrades to a weighted random pick.
    pub async fn select(
        &self,
        entries: &[LinkEntry],
        strategy: Strategy,
        ctx: &SelectionContext,
    ) -> Result<LinkEntry, AppError> {
        if entries.is_empty() {
            return Err(AppError::no_available_links(
                "No links available for selection",
                json!({ "strategy": strategy.as_str() }),
            ));
        }

        let chosen = match strategy {
            Strategy::WeightedRandom => self.weighted_random(entries),
            Strategy::RoundRobin => self.round_robin(entries).await,
            Strategy::LeastUsed => self.least_used(entries, ctx).await,
            Strategy::TimeBased => self.time_based(entries, ctx),
            Strategy::Specialization => self.specialization(entries, ctx),
        };

        debug!(strategy = %strategy, link_id = %chosen.id, candidates = entries.len(), "Link selected");
        Ok(chosen.clone())
    }

    /// Draws `r` in `[0, Σweight)` and walks the list subtracting weights
    /// until the remainder drops to zero or below.
    fn weighted_random<'a>(&self, entries: &'a [LinkEntry]) -> &'a LinkEntry {
        let total_weight: f64 = entries.iter().map(|e| f64::from(e.effective_weight())).sum();
        let mut remainder = self.random.uniform(total_weight);

        for entry in entries {
            remainder -= f64::from(entry.effective_weight());
            if remainder <= 0.0 {
                return entry;
            }
        }

        // Floating point can leave a positive remainder after the last entry.
        &entries[entries.len() - 1]
    }

    /// Advances the persisted cursor positionally over the current list.
    ///
    /// The cursor is not tied to entry identity; if the available set changes
    /// between calls, entries may be skipped or repeated. If the cursor cannot
    /// be read or written, the first entry is returned.
    async fn round_robin<'a>(&self, entries: &'a [LinkEntry]) -> &'a LinkEntry {
        let cursor = match self.usage.round_robin_cursor().await {
            Ok(cursor) => cursor,
            Err(e) => {
                warn!(error = %e, "Failed to read round-robin cursor, using first entry");
                return &entries[0];
            }
        };

        let next = cursor.wrapping_add(1) % entries.len();

        if let Err(e) = self.usage.set_round_robin_cursor(next).await {
            warn!(
                error = %e,
                cursor = next,
                "Failed to persist round-robin cursor, using first entry"
            );
            return &entries[0];
        }

        &entries[next]
    }

    /// Entry with the smallest lifetime count; ties go to the earliest entry.
    async fn least_used<'a>(
        &self,
        entries: &'a [LinkEntry],
        ctx: &SelectionContext,
    ) -> &'a LinkEntry {
        let fetched;
        let counts: &UsageCounts = match &ctx.usage {
            Some(counts) => counts,
            None => match self.usage.try_get_counts().await {
                Ok(counts) => {
                    fetched = counts;
                    &fetched
                }
                Err(e) => {
                    warn!(error = %e, "Usage counts unavailable, falling back to weighted_random");
                    return self.weighted_random(entries);
                }
            },
        };

        // min_by_key returns the last minimum, so scan manually to keep the first.
        let mut best = &entries[0];
        let mut best_count = counts.total_for(&best.id);
        for entry in &entries[1..] {
            let count = counts.total_for(&entry.id);
            if count < best_count {
                best = entry;
                best_count = count;
            }
        }
        best
    }

    fn time_based<'a>(&self, entries: &'a [LinkEntry], ctx: &SelectionContext) -> &'a LinkEntry {
        let Some(hour) = ctx.hour_of_day_utc else {
            return self.weighted_random(entries);
        };

        let Some(slot) = self.tables.slot_for_hour(hour) else {
            debug!(hour, "No time slot covers this hour, using full set");
            return self.weighted_random(entries);
        };

        let in_slot: Vec<LinkEntry> = entries
            .iter()
            .filter(|entry| slot.allows(&entry.id))
            .cloned()
            .collect();

        self.pick_from_subset(entries, &in_slot)
    }

    fn specialization<'a>(
        &self,
        entries: &'a [LinkEntry],
        ctx: &SelectionContext,
    ) -> &'a LinkEntry {
        let allowed = ctx
            .region
            .as_deref()
            .and_then(|region| self.tables.specializations_for(region))
            .unwrap_or_default();

        let matching: Vec<LinkEntry> = entries
            .iter()
            .filter(|entry| {
                entry
                    .specialization
                    .as_ref()
                    .is_some_and(|spec| allowed.contains(spec))
            })
            .cloned()
            .collect();

        self.pick_from_subset(entries, &matching)
    }

    /// Weighted pick from `subset` mapped back into `entries`, or from the
    /// full set when the subset is empty.
    fn pick_from_subset<'a>(&self, entries: &'a [LinkEntry], subset: &[LinkEntry]) -> &'a LinkEntry {
        if subset.is_empty() {
            return self.weighted_random(entries);
        }

        let picked = self.weighted_random(subset);
        entries
            .iter()
            .find(|entry| entry.id == picked.id)
            .unwrap_or(&entries[0])
    }
}
