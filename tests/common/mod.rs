#![allow(dead_code)]

use chrono::{DateTime, TimeZone, Utc};
use std::sync::Arc;
use link_rotator::domain::clock::FixedClock;
use link_rotator::domain::entities::{NewLinkEntry, SeedLink};
use link_rotator::domain::random::FixedRandom;
use link_rotator::domain::repositories::KeyValueStore;
use link_rotator::domain::rotation_tables::RotationTables;
use link_rotator::infrastructure::store::MemoryStore;
use link_rotator::state::{AppState, StateOptions};

pub const ADMIN_KEY: &str = "test-admin-key";
pub const FALLBACK_URL: &str = "https://wa.me/10000000000?text=Hello";
pub const GEO_REDIRECT_URL: &str = "https://example.org/elsewhere";

/// 2026-03-02 14:05 UTC, inside the default 09-16 slot (`1`, `2`, `4`).
pub fn fixed_now() -> DateTime<Utc> {
    Utc.with_ymd_and_hms(2026, 3, 2, 14, 5, 0).unwrap()
}

/// `1` (weight 1, US_STOCKS), `2` (weight 3, EU), `3` (disabled).
pub fn seed_links() -> Vec<SeedLink> {
    vec![
        SeedLink {
            id: "1".to_string(),
            link: NewLinkEntry::new("https://wa.me/15550000001?text=Hello")
                .with_label("Desk 1")
                .with_specialization("US_STOCKS"),
        },
        SeedLink {
            id: "2".to_string(),
            link: NewLinkEntry::new("https://wa.me/15550000002?text=Hi")
                .with_label("Desk 2")
                .with_weight(3)
                .with_specialization("MARKET_ANALYSIS"),
        },
        SeedLink {
            id: "3".to_string(),
            link: NewLinkEntry::new("https://wa.me/15550000003")
                .with_label("Desk 3")
                .disabled(),
        },
    ]
}

pub fn test_options() -> StateOptions {
    StateOptions {
        admin_key: ADMIN_KEY.to_string(),
        fallback_url: FALLBACK_URL.to_string(),
        geo_redirect_url: GEO_REDIRECT_URL.to_string(),
        ..StateOptions::default()
    }
}

/// State over a fresh in-memory store, fixed clock and a random source that
/// always draws the middle of the weight range.
pub fn create_test_state() -> AppState {
    create_test_state_with_store(Arc::new(MemoryStore::new()))
}

pub fn create_test_state_with_store(store: Arc<dyn KeyValueStore>) -> AppState {
    AppState::new(
        store,
        Arc::new(FixedClock::new(fixed_now())),
        Arc::new(FixedRandom::new(0.5)),
        RotationTables::default().with_seed_links(seed_links()),
        test_options(),
    )
}

pub fn bearer() -> String {
    format!("Bearer {}", ADMIN_KEY)
}
