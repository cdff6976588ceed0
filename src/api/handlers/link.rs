//! Handler for the public link rotation endpoint.

use axum::{
    Json,
    extract::{Query, State},
    http::StatusCode,
    response::{IntoResponse, Response},
};
use validator::Validate;

use crate::api::dto::link::{FallbackResponse, LinkQuery, LinkResponse, UnavailableResponse};
use crate::domain::strategy::SelectionContext;
use crate::error::AppError;
use crate::state::AppState;
use crate::utils::link_renderer::normalize_stock_symbol;

/// Picks a link for the visitor.
///
/// # Endpoint
///
/// `GET /api/whatsapp/link?strategy=&region=&stock=`
///
/// # Response Codes
///
/// - **200 OK**: A link was selected
/// - **200 OK** with `strategy: "fallback"`: Rotation failed; `url` is the fallback link
/// - **400 Bad Request**: Region longer than 32 characters
/// - **503 Service Unavailable**: No link is enabled and under quota
///
/// # Response
///
/// ```json
/// {
///   "url": "https://wa.me/15551234567?text=Hello+I%27m+particularly+interested+in+NVDA.",
///   "link": { "id": "Xk3p9QaZ1bYt", "label": "Desk 1", "specialization": "US_STOCKS" },
///   "strategy": "weighted_random",
///   "stockSymbol": "NVDA",
///   "timestamp": "2026-03-02T14:05:00Z"
/// }
/// ```
pub async fn link_handler(
    State(state): State<AppState>,
    Query(query): Query<LinkQuery>,
) -> Result<Response, AppError> {
    query.validate()?;

    let stock_symbol = query.stock.as_deref().and_then(normalize_stock_symbol);

    let mut ctx = SelectionContext::default();
    if let Some(region) = query.region.as_deref().map(str::trim).filter(|r| !r.is_empty()) {
        ctx = ctx.with_region(region);
    }
    if let Some(symbol) = &stock_symbol {
        ctx = ctx.with_stock_symbol(symbol.clone());
    }

    match state
        .rotation
        .get_link(query.strategy.as_deref(), ctx)
        .await
    {
        Ok(selection) => Ok(Json(LinkResponse::new(selection, stock_symbol)).into_response()),
        Err(AppError::NoAvailableLinks { message, .. }) => {
            let body = UnavailableResponse {
                error: message,
                fallback_url: state.rotation.fallback_url_for(stock_symbol.as_deref()),
            };
            Ok((StatusCode::SERVICE_UNAVAILABLE, Json(body)).into_response())
        }
        Err(e) => {
            tracing::error!(error = %e, "Link rotation failed, serving fallback");
            let body = FallbackResponse {
                url: state.rotation.fallback_url_for(stock_symbol.as_deref()),
                link: None,
                strategy: "fallback",
                error: e.to_string(),
            };
            Ok(Json(body).into_response())
        }
    }
}
