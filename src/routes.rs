//! Top-level router configuration combining API and site routes.
//!
//! # Route Structure
//!
//! - `/api/*`       - REST API; `/api/whatsapp/config` requires the admin key
//! - `GET /health`  - Health check: store, link collection (public)
//! - everything else - Static site from `SITE_DIR`, behind the geo gate
//!
//! # Middleware
//!
//! - **Tracing** - Structured request/response logging
//! - **CORS** - Any origin, `GET, POST, PUT, DELETE, OPTIONS`
//! - **Rate limiting** - Per-IP token bucket, stricter for admin routes
//! - **Geo gate** - Timezone check in front of the site
//! - **Path normalization** - Trailing slash handling

use axum::http::Method;
use axum::routing::get;
use axum::{Router, middleware};
use tower::Layer;
use tower_http::cors::{Any, CorsLayer};
use tower_http::normalize_path::{NormalizePath, NormalizePathLayer};
use tower_http::services::ServeDir;

use crate::api;
use crate::api::handlers::health_handler;
use crate::api::middleware::{geo_gate, rate_limit, tracing};
use crate::state::AppState;

/// Constructs the application router with all routes and middleware.
///
/// # Arguments
///
/// - `state` - shared application state injected into all handlers
/// - `behind_proxy` - when `true`, rate limiting reads client IP from
///   `X-Forwarded-For` / `X-Real-IP` headers instead of the peer socket address;
///   enable only when the service runs behind a trusted reverse proxy
/// - `site_dir` - directory of the static site; without it only the API and
///   health check are served
pub fn app_router(
    state: AppState,
    behind_proxy: bool,
    site_dir: Option<&str>,
) -> NormalizePath<Router> {
    let public_api = rate_limit::apply(api::routes::public_routes(), rate_limit::PUBLIC, behind_proxy);
    let admin_api = rate_limit::apply(
        api::routes::admin_routes(state.clone()),
        rate_limit::ADMIN,
        behind_proxy,
    );

    let mut router = Router::new()
        .route("/health", get(health_handler))
        .nest("/api", Router::new().merge(public_api).merge(admin_api));

    if let Some(dir) = site_dir {
        let site = Router::new()
            .fallback_service(ServeDir::new(dir))
            .layer(middleware::from_fn_with_state(state.clone(), geo_gate::layer));
        router = router.merge(site);
    }

    let router = router
        .with_state(state)
        .layer(cors_layer())
        .layer(tracing::layer());

    NormalizePathLayer::trim_trailing_slash().layer(router)
}

fn cors_layer() -> CorsLayer {
    CorsLayer::new()
        .allow_origin(Any)
        .allow_methods([
            Method::GET,
            Method::POST,
            Method::PUT,
            Method::DELETE,
            Method::OPTIONS,
        ])
        .allow_headers(Any)
}
