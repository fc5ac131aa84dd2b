//! Store implementations

pub mod memory_store;
pub mod sea_orm_store;

pub use memory_store::InMemoryStore;
pub use sea_orm_store::SeaOrmStore;
