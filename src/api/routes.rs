//! API route configuration.
//!
//! Public rotation endpoints are open; link configuration requires the
//! admin key via [`crate::api::middleware::auth`].

use axum::{Router, middleware, routing::get};

use crate::api::handlers::{
    accounts_handler, analytics_handler, click_handler, create_link_handler, delete_link_handler,
    list_links_handler, link_handler, stats_handler, update_link_handler,
};
use crate::api::middleware::auth;
use crate::state::AppState;

/// Public API routes.
///
/// # Endpoints
///
/// - `GET  /whatsapp/link`     - Select a link (`?strategy=&region=&stock=`)
/// - `POST /whatsapp/click`    - Record a click on a served link
/// - `GET  /whatsapp/stats`    - Usage report
/// - `GET  /whatsapp/accounts` - All links, available links and time slots
/// - `GET  /analytics`         - Client analytics settings
pub fn public_routes() -> Router<AppState> {
    Router::new()
        .route("/whatsapp/link", get(link_handler))
        .route("/whatsapp/click", axum::routing::post(click_handler))
        .route("/whatsapp/stats", get(stats_handler))
        .route("/whatsapp/accounts", get(accounts_handler))
        .route("/analytics", get(analytics_handler))
}

/// Admin API routes, protected by Bearer token authentication.
///
/// # Endpoints
///
/// - `GET    /whatsapp/config` - List links
/// - `POST   /whatsapp/config` - Add a link
/// - `PUT    /whatsapp/config` - Update a link (`{id, ...patch}`)
/// - `DELETE /whatsapp/config` - Delete a link (`{id}`)
pub fn admin_routes(state: AppState) -> Router<AppState> {
    Router::new()
        .route(
            "/whatsapp/config",
            get(list_links_handler)
                .post(create_link_handler)
                .put(update_link_handler)
                .delete(delete_link_handler),
        )
        .route_layer(middleware::from_fn_with_state(state, auth::layer))
}

/// Public and admin routes without rate limiting, ready to serve.
///
/// Used by integration tests and anywhere the peer address is not known.
pub fn router(state: AppState) -> Router {
    Router::new()
        .merge(public_routes())
        .merge(admin_routes(state.clone()))
        .with_state(state)
}
