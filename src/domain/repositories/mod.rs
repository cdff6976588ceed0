//! Store trait definitions for the domain layer.
//!
//! The rotation core persists everything through a single [`KeyValueStore`]
//! interface. Adapters live in `crate::infrastructure::store`; a mock is
//! generated via `mockall` for failure-injection tests.

pub mod key_value_store;

pub use key_value_store::{KeyValueStore, StoreError, StoreResult};

#[cfg(test)]
pub use key_value_store::MockKeyValueStore;
