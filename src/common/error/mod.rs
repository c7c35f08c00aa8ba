//! Unified error types for Longan.
//!
//! This module provides a unified error type that encompasses errors from
//! package parsing, document editing and replacement-source ingestion,
//! presenting a consistent API to users.

// Submodule declarations
pub mod conversions;
pub mod types;

// Re-exports
pub use types::{Error, Result};
