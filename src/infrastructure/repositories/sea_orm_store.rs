//! SeaORM implementation of Store

use async_trait::async_trait;
use sea_orm::sea_query::OnConflict;
use sea_orm::{DatabaseConnection, EntityTrait, Set};
use serde_json::Value;

use crate::domain::{DomainError, Store, empty_default};
use crate::models::kv_entry::{ActiveModel, Column, Entity as KvEntity};

/// SQLite-backed store: one `kv_store` row per key, value kept as JSON text
pub struct SeaOrmStore {
    db: DatabaseConnection,
}

impl SeaOrmStore {
    pub fn new(db: DatabaseConnection) -> Self {
        Self { db }
    }
}

#[async_trait]
impl Store for SeaOrmStore {
    async fn save(&self, key: &str, value: &Value) -> Result<(), DomainError> {
        let json = serde_json::to_string(value).map_err(|e| {
            tracing::error!("Error serializing '{}': {}", key, e);
            DomainError::from(e)
        })?;

        let entry = ActiveModel {
            key: Set(key.to_string()),
            value: Set(json),
            updated_at: Set(chrono::Utc::now().to_rfc3339()),
        };

        KvEntity::insert(entry)
            .on_conflict(
                OnConflict::column(Column::Key)
                    .update_columns([Column::Value, Column::UpdatedAt])
                    .to_owned(),
            )
            .exec_without_returning(&self.db)
            .await
            .map_err(|e| {
                tracing::error!("Error saving '{}': {}", key, e);
                DomainError::from(e)
            })?;

        tracing::debug!("Saved '{}'", key);
        Ok(())
    }

    async fn load(&self, key: &str) -> Result<Value, DomainError> {
        let entry = KvEntity::find_by_id(key.to_string())
            .one(&self.db)
            .await
            .map_err(|e| {
                tracing::error!("Error loading '{}': {}", key, e);
                DomainError::from(e)
            })?;

        match entry {
            Some(entry) => serde_json::from_str(&entry.value).map_err(|e| {
                tracing::error!("Error parsing '{}': {}", key, e);
                DomainError::from(e)
            }),
            None => {
                tracing::debug!("'{}' never written, using empty default", key);
                Ok(empty_default())
            }
        }
    }

    async fn remove(&self, key: &str) -> Result<(), DomainError> {
        KvEntity::delete_by_id(key.to_string())
            .exec(&self.db)
            .await
            .map_err(|e| {
                tracing::error!("Error removing '{}': {}", key, e);
                DomainError::from(e)
            })?;
        Ok(())
    }
}
