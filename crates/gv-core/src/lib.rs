//! gv-core: shared types, IDs, errors, configuration, and grading rules.
//!
//! This crate is the foundational dependency for the other gv-* crates. It
//! owns the typed identifiers, the closed [`Role`] set, the unified error
//! type, the JSON application configuration, and the score arithmetic used
//! by the professor views.

pub mod config;
pub mod error;
pub mod grading;
pub mod ids;
pub mod role;

// Re-export the most commonly used items at the crate root.
pub use error::{Error, Result};
pub use ids::*;
pub use role::Role;
