//! Timezone gate in front of the static site.

use axum::{
    extract::{Request, State},
    http::{StatusCode, header},
    middleware::Next,
    response::{IntoResponse, Response},
};

use crate::state::AppState;
use crate::utils::timezone::visitor_timezone;

/// Redirects non-US visitors away from the site while the gate is on.
///
/// The visitor timezone comes from `CF-Timezone`, `Timezone` or
/// `X-Timezone`, else is inferred from `Accept-Language`. Rejected visitors
/// get `302 Found` to the configured geo redirect URL. `/api/*` is never
/// gated.
pub async fn layer(State(st): State<AppState>, req: Request, next: Next) -> Response {
    if req.uri().path().starts_with("/api/") {
        return next.run(req).await;
    }

    let timezone = visitor_timezone(req.headers());

    if st.settings.admits(timezone.as_deref()).await {
        next.run(req).await
    } else {
        tracing::info!(
            timezone = timezone.as_deref().unwrap_or("unknown"),
            path = %req.uri().path(),
            "Visitor turned away by geo gate"
        );
        (
            StatusCode::FOUND,
            [(header::LOCATION, st.geo_redirect_url.to_string())],
        )
            .into_response()
    }
}
