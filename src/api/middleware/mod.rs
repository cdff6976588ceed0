//! HTTP middleware for request processing and protection.
//!
//! Provides authentication, rate limiting, geo gating and observability
//! middleware.

pub mod auth;
pub mod geo_gate;
pub mod rate_limit;
pub mod tracing;
