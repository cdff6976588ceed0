//! Key-value store abstraction backing every persisted document.

use async_trait::async_trait;

/// Errors raised by a key-value store adapter.
#[derive(Debug, thiserror::Error)]
pub enum StoreError {
    /// The backend could not be reached or rejected the operation.
    #[error("store unavailable: {0}")]
    Unavailable(String),
}

/// Result type for store operations.
pub type StoreResult<T> = Result<T, StoreError>;

/// Minimal get/put interface over a shared key-value store.
///
/// The store is assumed to be eventually consistent with atomic single-key
/// puts and no multi-key transactions or compare-and-swap. Every persisted
/// document (link collection, usage stats, round-robin cursor, feature
/// flags) lives under its own key and is rewritten as a whole.
///
/// # Implementations
///
/// - [`crate::infrastructure::store::RedisStore`] - shared Redis instance
/// - [`crate::infrastructure::store::MemoryStore`] - in-process map
/// - Test mocks available with `cfg(test)`
#[cfg_attr(test, mockall::automock)]
#[async_trait]
pub trait KeyValueStore: Send + Sync {
    /// Reads the value stored under `key`.
    ///
    /// An absent key is `Ok(None)`, never an error.
    ///
    /// # Errors
    ///
    /// Returns [`StoreError::Unavailable`] on transient backend failures.
    async fn get(&self, key: &str) -> StoreResult<Option<String>>;

    /// Replaces the value stored under `key`.
    ///
    /// # Errors
    ///
    /// Returns [`StoreError::Unavailable`] on transient backend failures.
    async fn put(&self, key: &str, value: &str) -> StoreResult<()>;

    /// Checks whether the backend is reachable.
    async fn health_check(&self) -> bool;
}
