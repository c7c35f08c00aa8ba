//! Common types and utilities shared by the document layer and the
//! templating engine.

// Submodule declarations
pub mod error;
pub mod style;
pub mod xml;

// Re-exports for convenience
pub use error::{Error, Result};
pub use style::RGBColor;
