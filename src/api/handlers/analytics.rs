//! Handler for client analytics settings.

use axum::{Json, extract::State};

use crate::application::services::AnalyticsSettings;
use crate::state::AppState;

/// Whether the site should load analytics, and with which tracking id.
///
/// # Endpoint
///
/// `GET /api/analytics`
///
/// # Response
///
/// ```json
/// { "enabled": true, "trackingId": "AW-17577400618" }
/// ```
///
/// Reports `{ "enabled": false }` when the store cannot be read.
pub async fn analytics_handler(State(state): State<AppState>) -> Json<AnalyticsSettings> {
    Json(state.settings.analytics().await)
}
