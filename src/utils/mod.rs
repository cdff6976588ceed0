//! Utility functions for identifiers, link rendering, and request handling.
//!
//! - [`id_generator`] - Random link entry identifiers
//! - [`link_renderer`] - Stock symbol interest in target URLs
//! - [`timezone`] - Visitor timezone detection and US check

pub mod id_generator;
pub mod link_renderer;
pub mod timezone;
