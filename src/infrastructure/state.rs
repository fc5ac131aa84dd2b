//! Application state containing the database and the catalog service

use sea_orm::DatabaseConnection;
use std::sync::Arc;

use crate::config::Config;
use crate::infrastructure::SeaOrmStore;
use crate::services::CatalogService;

/// Application state shared by every entry point
#[derive(Clone)]
pub struct AppState {
    /// Database connection
    db: DatabaseConnection,
    /// Catalog operations
    pub catalog: Arc<CatalogService>,
}

impl AppState {
    /// Create a new AppState on top of an initialized database
    pub fn new(db: DatabaseConnection, config: &Config) -> Self {
        let catalog = Arc::new(
            CatalogService::new(Arc::new(SeaOrmStore::new(db.clone())))
                .with_returned_at_format(config.returned_at_format.clone()),
        );

        Self { db, catalog }
    }

    /// Get the database connection
    pub fn db(&self) -> &DatabaseConnection {
        &self.db
    }
}
