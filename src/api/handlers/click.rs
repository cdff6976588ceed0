//! Handler for client-reported clicks.

use axum::{Json, extract::State};

use crate::api::dto::click::{ClickRequest, ClickResponse};
use crate::error::AppError;
use crate::state::AppState;

/// Records a click on a previously served link.
///
/// # Endpoint
///
/// `POST /api/whatsapp/click`
///
/// # Request Body
///
/// ```json
/// { "linkId": "Xk3p9QaZ1bYt", "stockSymbol": "NVDA" }
/// ```
///
/// # Errors
///
/// Returns 400 Bad Request if the id is blank or unknown. A stock symbol
/// that cannot be normalized is ignored.
pub async fn click_handler(
    State(state): State<AppState>,
    Json(payload): Json<ClickRequest>,
) -> Result<Json<ClickResponse>, AppError> {
    state
        .rotation
        .record_external_click(&payload.link_id, payload.stock_symbol.as_deref())
        .await?;

    Ok(Json(ClickResponse {
        success: true,
        message: "Click recorded",
    }))
}
