//! Services Layer
//!
//! This module contains pure business logic with no FFI or storage engine
//! specifics. Services can be called directly from tests or through the FFI.

pub mod catalog_service;

// Re-export for convenience
pub use catalog_service::{CatalogService, CatalogSummary};
