//! Rate limiting middleware using token bucket algorithm.

use std::sync::Arc;

use axum::Router;
use tower_governor::{
    GovernorLayer,
    governor::GovernorConfigBuilder,
    key_extractor::{PeerIpKeyExtractor, SmartIpKeyExtractor},
};

use crate::state::AppState;

/// Token bucket parameters for one group of routes.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Limits {
    pub per_second: u64,
    pub burst_size: u32,
}

/// Limits for public endpoints: 2 requests per second, burst of 100.
///
/// Sized for the site's own polling of `/whatsapp/link` plus click reports.
pub const PUBLIC: Limits = Limits {
    per_second: 2,
    burst_size: 100,
};

/// Limits for admin endpoints: 1 request per second, burst of 10.
pub const ADMIN: Limits = Limits {
    per_second: 1,
    burst_size: 10,
};

/// Wraps `router` in a per-client-IP rate limiter.
///
/// Requests exceeding the limit receive `429 Too Many Requests`.
///
/// # Key Extraction
///
/// With `behind_proxy` the client IP is read from `X-Forwarded-For`,
/// `X-Real-IP` or `Forwarded`, falling back to the peer address. Otherwise
/// the peer socket address is used, which needs the router to be served with
/// `into_make_service_with_connect_info::<SocketAddr>()`.
///
/// An unusable configuration (zero rate or burst) leaves the router unlimited.
///
/// # Example
///
/// ```rust,ignore
/// let api = rate_limit::apply(api::routes::public_routes(), rate_limit::PUBLIC, false);
/// ```
pub fn apply(router: Router<AppState>, limits: Limits, behind_proxy: bool) -> Router<AppState> {
    if behind_proxy {
        let config = GovernorConfigBuilder::default()
            .key_extractor(SmartIpKeyExtractor)
            .per_second(limits.per_second)
            .burst_size(limits.burst_size)
            .finish();

        match config {
            Some(config) => router.layer(GovernorLayer::new(Arc::new(config))),
            None => unlimited(router, limits),
        }
    } else {
        let config = GovernorConfigBuilder::default()
            .key_extractor(PeerIpKeyExtractor)
            .per_second(limits.per_second)
            .burst_size(limits.burst_size)
            .finish();

        match config {
            Some(config) => router.layer(GovernorLayer::new(Arc::new(config))),
            None => unlimited(router, limits),
        }
    }
}

fn unlimited(router: Router<AppState>, limits: Limits) -> Router<AppState> {
    tracing::warn!(
        per_second = limits.per_second,
        burst_size = limits.burst_size,
        "Invalid rate limit configuration, limiter disabled"
    );
    router
}
