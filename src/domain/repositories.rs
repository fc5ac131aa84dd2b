//! Repository trait definitions
//!
//! These traits define the contract for data access.
//! Implementations live in the infrastructure layer.

use async_trait::async_trait;
use serde_json::Value;

use super::DomainError;

/// Key under which the book collection is persisted
pub const BOOKS_KEY: &str = "books";

/// Key under which the returned-history collection is persisted
pub const RETURNED_HISTORY_KEY: &str = "returnedHistory";

/// Value handed back for a key that was never written
pub fn empty_default() -> Value {
    Value::Array(Vec::new())
}

/// Durable key/value storage for JSON values.
///
/// Every `save` fully overwrites the previous value for the key; there is no
/// partial update primitive. Failures are returned to the caller, never
/// swallowed.
#[async_trait]
pub trait Store: Send + Sync {
    /// Persist `value` under `key`, replacing whatever was there
    async fn save(&self, key: &str, value: &Value) -> Result<(), DomainError>;

    /// Load the value saved under `key`, or [`empty_default`] if it was never written
    async fn load(&self, key: &str) -> Result<Value, DomainError>;

    /// Delete `key`. Removing an absent key is not an error.
    async fn remove(&self, key: &str) -> Result<(), DomainError>;
}
