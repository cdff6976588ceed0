//! Admin key check for the link configuration routes.

use axum::{
    extract::{FromRequestParts, Request, State},
    middleware::Next,
    response::Response,
};
use axum_auth::AuthBearer;

use crate::{error::AppError, state::AppState};

/// Guards admin routes with the configured `ADMIN_KEY`.
///
/// The key is read from `Authorization: Bearer <admin key>` and checked by
/// [`AuthService`](crate::application::services::AuthService), which compares
/// HMAC digests in constant time. A missing header, a non-Bearer scheme or a
/// wrong key yields `401 Unauthorized` with `WWW-Authenticate: Bearer`.
/// Only the `/whatsapp/config` routes are layered with it.
pub async fn layer(
    State(st): State<AppState>,
    req: Request,
    next: Next,
) -> Result<Response, AppError> {
    let (mut parts, body) = req.into_parts();

    let AuthBearer(token) = AuthBearer::from_request_parts(&mut parts, &())
        .await
        .map_err(|_| {
            AppError::unauthorized(
                "Unauthorized",
                serde_json::json!({"reason": "Authorization header is missing or invalid"}),
            )
        })?;

    let req = Request::from_parts(parts, body);

    st.auth.authenticate(&token)?;

    Ok(next.run(req).await)
}
