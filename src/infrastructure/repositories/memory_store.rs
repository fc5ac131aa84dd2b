//! In-memory implementation of Store

use async_trait::async_trait;
use dashmap::DashMap;
use serde_json::Value;

use crate::domain::{DomainError, Store, empty_default};

/// Non-durable store. Values are kept as JSON text so a load always hands
/// back a fresh copy, the same as the sqlite store.
#[derive(Default)]
pub struct InMemoryStore {
    entries: DashMap<String, String>,
}

impl InMemoryStore {
    pub fn new() -> Self {
        Self::default()
    }

    /// Put raw text under `key` without validation
    pub fn insert_raw(&self, key: &str, text: impl Into<String>) {
        self.entries.insert(key.to_string(), text.into());
    }
}

#[async_trait]
impl Store for InMemoryStore {
    async fn save(&self, key: &str, value: &Value) -> Result<(), DomainError> {
        let json = serde_json::to_string(value)?;
        self.entries.insert(key.to_string(), json);
        Ok(())
    }

    async fn load(&self, key: &str) -> Result<Value, DomainError> {
        match self.entries.get(key) {
            Some(text) => serde_json::from_str(text.value()).map_err(|e| {
                tracing::error!("Error parsing '{}': {}", key, e);
                DomainError::from(e)
            }),
            None => Ok(empty_default()),
        }
    }

    async fn remove(&self, key: &str) -> Result<(), DomainError> {
        self.entries.remove(key);
        Ok(())
    }
}
