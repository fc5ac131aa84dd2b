//! Domain layer - Pure business abstractions
//!
//! This layer contains NO framework dependencies beyond error conversions.
//! Only trait definitions and domain error types.

pub mod errors;
pub mod repositories;

pub use errors::DomainError;
pub use repositories::*;
