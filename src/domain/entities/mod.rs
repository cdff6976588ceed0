//! Core domain entities.
//!
//! # Entity Types
//!
//! - [`LinkEntry`] - A candidate outbound link and its rotation settings
//! - [`UsageStats`] - The persisted usage accounting document
//! - [`UsageCounts`] - Lifetime and same-day counters snapshot
//!
//! Creation and mutation use dedicated input types: [`NewLinkEntry`] for
//! creation, [`SeedLink`] for configured entries with fixed ids, and
//! [`LinkEntryPatch`] for partial updates.

pub mod link_entry;
pub mod usage;

pub use link_entry::{LinkEntry, LinkEntryPatch, NewLinkEntry, SeedLink};
pub use usage::{UsageCounts, UsageStats};
