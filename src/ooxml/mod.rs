//! Office Open XML (OOXML) support for Word documents.
//!
//! The module is organized into two layers:
//!
//! 1. **OPC Layer** (`opc`): ZIP members, content types and relationships
//! 2. **Word Layer** (`docx`): the main document body as paragraphs and runs
//!
//! # Example
//!
//! ```rust,no_run
//! use longan::ooxml::docx::Document;
//!
//! let bytes = std::fs::read("report.docx")?;
//! let doc = Document::load(&bytes)?;
//! for i in 0..doc.paragraph_count() {
//!     println!("{}: {}", i, doc.paragraph_text(i)?);
//! }
//! # Ok::<(), Box<dyn std::error::Error>>(())
//! ```
pub mod docx;
pub mod error;
pub mod opc;

pub use error::{OoxmlError, Result};
