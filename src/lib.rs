//! Longan - value-substituted variants of Word documents
//!
//! A template is a `.docx` whose paragraphs carry labeled numbers such as
//! `LHS: 10` or `Score = 3.5`. Longan finds those values, then writes one
//! copy of the document per set of replacement values, keeping the
//! formatting of every paragraph it can.
//!
//! # Features
//!
//! - **Document model**: paragraphs and formatted runs over the raw
//!   WordprocessingML, with untouched content written back byte for byte
//! - **Occurrence scanning**: the first labeled value per term and paragraph
//! - **Replacement tables**: from value lists, CSV or TSV
//! - **Variant generation**: independent deep copies, optionally in parallel
//!
//! # Example
//!
//! ```no_run
//! use longan::ooxml::docx::Document;
//! use longan::template::{ReplacementTable, TermSet, VariantGenerator, scan};
//!
//! # fn main() -> Result<(), Box<dyn std::error::Error>> {
//! let template = Document::open("exam.docx")?;
//! let report = scan(&template, &TermSet::parse("LHS\nRHS"))?;
//!
//! for term in report.not_found() {
//!     println!("{} not found", term);
//! }
//!
//! let mut table = ReplacementTable::new();
//! table.insert_values("LHS", ["12", "14", "16"]);
//! table.insert_values("RHS", ["3"]);
//!
//! let generator = VariantGenerator::default();
//! for variant in generator.run(&template, &report, &table)?.variants {
//!     std::fs::write(generator.options().file_name(variant.index), &variant.bytes)?;
//! }
//! # Ok(())
//! # }
//! ```

pub mod common;
pub mod ooxml;
pub mod template;

pub use common::{Error, Result};
pub use ooxml::docx::Document;
pub use template::{GeneratorOptions, ReplacementTable, ScanReport, TermSet, VariantGenerator, generate, scan};
