//! Selection strategies and the per-request selection context.

use serde::{Serialize, Serializer};
use std::fmt;

use crate::domain::entities::UsageCounts;

/// Named algorithm for picking one entry from the available set.
///
/// Parsing is total: any unrecognized name resolves to
/// [`Strategy::WeightedRandom`].
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
pub enum Strategy {
    #[default]
    WeightedRandom,
    RoundRobin,
    LeastUsed,
    TimeBased,
    Specialization,
}

impl Strategy {
    pub const ALL: [Strategy; 5] = [
        Strategy::WeightedRandom,
        Strategy::RoundRobin,
        Strategy::LeastUsed,
        Strategy::TimeBased,
        Strategy::Specialization,
    ];

    /// Resolves a strategy name, returning `None` for unrecognized names.
    pub fn from_name(name: &str) -> Option<Self> {
        Self::ALL
            .into_iter()
            .find(|s| s.as_str().eq_ignore_ascii_case(name.trim()))
    }

    /// Resolves a strategy name, falling back to the default for unknown names.
    pub fn resolve(name: &str) -> Self {
        Self::from_name(name).unwrap_or_else(|| {
            tracing::debug!(strategy = name, "Unknown strategy, using weighted_random");
            Self::default()
        })
    }

    pub fn as_str(&self) -> &'static str {
        match self {
            Strategy::WeightedRandom => "weighted_random",
            Strategy::RoundRobin => "round_robin",
            Strategy::LeastUsed => "least_used",
            Strategy::TimeBased => "time_based",
            Strategy::Specialization => "specialization",
        }
    }
}

impl fmt::Display for Strategy {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl Serialize for Strategy {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        serializer.serialize_str(self.as_str())
    }
}

/// Optional request context consumed by context-aware strategies.
#[derive(Debug, Clone, Default)]
pub struct SelectionContext {
    /// Visitor region code, used by [`Strategy::Specialization`].
    pub region: Option<String>,
    /// Current UTC hour, used by [`Strategy::TimeBased`].
    pub hour_of_day_utc: Option<u32>,
    /// Pre-fetched usage counters, used by [`Strategy::LeastUsed`].
    pub usage: Option<UsageCounts>,
    /// Stock symbol the visitor asked about; rendered into the target.
    pub stock_symbol: Option<String>,
}

impl SelectionContext {
    pub fn with_region(mut self, region: impl Into<String>) -> Self {
        self.region = Some(region.into());
        self
    }

    pub fn with_hour(mut self, hour: u32) -> Self {
        self.hour_of_day_utc = Some(hour);
        self
    }

    pub fn with_usage(mut self, usage: UsageCounts) -> Self {
        self.usage = Some(usage);
        self
    }

    pub fn with_stock_symbol(mut self, symbol: impl Into<String>) -> Self {
        self.stock_symbol = Some(symbol.into());
        self
    }
}
