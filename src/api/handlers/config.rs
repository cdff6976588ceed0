//! Handlers for admin link configuration.
//!
//! All routes here sit behind [`crate::api::middleware::auth`].

use axum::{Json, extract::State, http::StatusCode};
use validator::Validate;

use crate::api::dto::config::{
    CreateLinkRequest, DeleteLinkRequest, LinkListResponse, LinkMutationResponse,
    UpdateLinkRequest,
};
use crate::error::AppError;
use crate::state::AppState;

/// Lists every configured link.
///
/// # Endpoint
///
/// `GET /api/whatsapp/config`
///
/// # Errors
///
/// Returns 503 if the link collection cannot be read.
pub async fn list_links_handler(
    State(state): State<AppState>,
) -> Result<Json<LinkListResponse>, AppError> {
    let links = state.registry.try_list().await?;
    Ok(Json(LinkListResponse { links }))
}

/// Adds a link.
///
/// # Endpoint
///
/// `POST /api/whatsapp/config`
///
/// # Request Body
///
/// ```json
/// {
///   "target": "https://wa.me/15551234567?text=Hello",
///   "label": "Desk 1",
///   "weight": 2,
///   "maxDailyQuota": 200,
///   "specialization": "US_STOCKS"
/// }
/// ```
///
/// # Errors
///
/// Returns 400 Bad Request if validation fails.
/// Returns 503 if the collection cannot be written.
pub async fn create_link_handler(
    State(state): State<AppState>,
    Json(payload): Json<CreateLinkRequest>,
) -> Result<(StatusCode, Json<LinkMutationResponse>), AppError> {
    payload.validate()?;

    let link = state.registry.add(payload.into()).await?;

    Ok((
        StatusCode::CREATED,
        Json(LinkMutationResponse {
            success: true,
            link: Some(link),
        }),
    ))
}

/// Partially updates a link.
///
/// # Endpoint
///
/// `PUT /api/whatsapp/config`
///
/// # Request Body
///
/// `id` plus any subset of the link attributes; `null` clears an optional one.
///
/// ```json
/// { "id": "Xk3p9QaZ1bYt", "enabled": false, "maxDailyQuota": null }
/// ```
///
/// # Errors
///
/// Returns 404 Not Found if no link has this id.
/// Returns 400 Bad Request if validation fails.
pub async fn update_link_handler(
    State(state): State<AppState>,
    Json(payload): Json<UpdateLinkRequest>,
) -> Result<Json<LinkMutationResponse>, AppError> {
    payload.validate()?;

    let (id, patch) = payload.into_parts();
    let link = state.registry.update(&id, patch).await?;

    Ok(Json(LinkMutationResponse {
        success: true,
        link: Some(link),
    }))
}

/// Deletes a link. Its usage history is kept.
///
/// # Endpoint
///
/// `DELETE /api/whatsapp/config`
///
/// # Request Body
///
/// ```json
/// { "id": "Xk3p9QaZ1bYt" }
/// ```
///
/// # Errors
///
/// Returns 404 Not Found if no link has this id, including when it was
/// already deleted.
pub async fn delete_link_handler(
    State(state): State<AppState>,
    Json(payload): Json<DeleteLinkRequest>,
) -> Result<Json<LinkMutationResponse>, AppError> {
    payload.validate()?;

    state.registry.delete(&payload.id).await?;

    Ok(Json(LinkMutationResponse {
        success: true,
        link: None,
    }))
}
