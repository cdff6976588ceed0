//! Handlers for usage statistics and the accounts overview.

use axum::{Json, extract::State};

use crate::application::services::{AccountsOverview, StatsReport};
use crate::state::AppState;

/// Per-link usage report.
///
/// # Endpoint
///
/// `GET /api/whatsapp/stats`
///
/// # Response
///
/// ```json
/// {
///   "links": [
///     {
///       "id": "1", "target": "https://wa.me/...", "weight": 2, "enabled": true,
///       "totalClicks": 12, "todayClicks": 3,
///       "percentage": "37.50%", "remainingToday": "Unlimited"
///     }
///   ],
///   "popularSymbols": { "NVDA": 4 },
///   "linkStats": { "1": 12, "2": 20 },
///   "lastUpdated": "2026-03-02T14:05:00Z",
///   "defaultStrategy": "weighted_random",
///   "today": "2026-03-02"
/// }
/// ```
pub async fn stats_handler(State(state): State<AppState>) -> Json<StatsReport> {
    Json(state.stats.report().await)
}

/// All links, those available right now, and the time slot table.
///
/// # Endpoint
///
/// `GET /api/whatsapp/accounts`
pub async fn accounts_handler(State(state): State<AppState>) -> Json<AccountsOverview> {
    Json(state.stats.overview().await)
}
