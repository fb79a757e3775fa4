//! Domain types and DTOs
//!
//! Attribute records produced by extraction, scenes produced by the composer,
//! and the request/response shapes of the HTTP layer.

pub mod attributes;
pub mod generation;
pub mod scene;

// Re-export commonly used types
pub use attributes::*;
pub use scene::*;

// Request/response DTOs are accessed via crate::domain::generation::
