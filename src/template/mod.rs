//! Term-value templating over Word documents.
//!
//! A template is an ordinary .docx whose paragraphs contain labeled numeric
//! values such as `LHS: 10` or `Score = 3.5`. Scanning records where each
//! label's value sits; generation then produces one document per row of a
//! [`ReplacementTable`], rewriting each recorded value.
//!
//! # Example
//!
//! ```rust,no_run
//! use longan::ooxml::docx::Document;
//! use longan::template::{ReplacementTable, TabularConfig, TermSet, generate, scan};
//!
//! let template = Document::open("exam.docx")?;
//! let terms = TermSet::parse("LHS\nRHS");
//! let report = scan(&template, &terms)?;
//!
//! let csv = std::fs::read("values.csv")?;
//! let import = ReplacementTable::from_tabular(&csv, report.found(), &TabularConfig::csv())?;
//!
//! for (i, bytes) in generate(&template, &report, &import.table)?.into_iter().enumerate() {
//!     std::fs::write(format!("exam_{}.docx", i + 1), bytes)?;
//! }
//! # Ok::<(), Box<dyn std::error::Error>>(())
//! ```
mod generator;
mod notice;
mod options;
mod replacement;
mod scanner;
mod tabular;
mod term;


pub use generator::{Generation, Variant, VariantGenerator, generate};
pub use notice::Notice;
pub use options::{CloneStrategy, GeneratorOptions, VARIANT_NUMBER_PLACEHOLDER};
pub use replacement::{ReplacementTable, TabularImport};
pub use scanner::{Occurrence, ScanReport, TermPattern, scan};
pub use tabular::{Table, TabularConfig, TabularParser, parse_table};
pub use term::TermSet;
