//! HTTP request handlers for API endpoints.
//!
//! Each handler module corresponds to a logical grouping of endpoints.

pub mod analytics;
pub mod click;
pub mod config;
pub mod health;
pub mod link;
pub mod stats;

pub use analytics::analytics_handler;
pub use click::click_handler;
pub use config::{
    create_link_handler, delete_link_handler, list_links_handler, update_link_handler,
};
pub use health::health_handler;
pub use link::link_handler;
pub use stats::{accounts_handler, stats_handler};
