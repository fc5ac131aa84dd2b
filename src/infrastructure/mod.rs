//! Infrastructure layer - Framework implementations
//!
//! This layer contains:
//! - Store implementations (repositories)
//! - Application state (state)

pub mod repositories;
pub mod state;

pub use repositories::*;
pub use state::AppState;
