//! Key-value store adapters.
//!
//! Two implementations of [`crate::domain::repositories::KeyValueStore`]:
//! - [`RedisStore`] - Shared Redis instance (production)
//! - [`MemoryStore`] - Process-local map (single instance, tests)

mod memory_store;
mod redis_store;

pub use memory_store::MemoryStore;
pub use redis_store::RedisStore;
