/// Word (.docx) document support.
///
/// This module reads WordprocessingML packages (.docx, .docm, .dotx),
/// exposes the body as paragraphs and formatted runs, and writes the
/// package back with edited paragraphs.
///
/// # Architecture
///
/// The module is organized around these key types:
/// - `Package`: The overall .docx file package
/// - `Document`: The paragraph sequence and the editing API
/// - `Paragraph`: A paragraph with runs
/// - `Run`: A text run with formatting
/// - `DocumentPart`: The core document.xml part
///
/// # Example
///
/// ```rust,no_run
/// use longan::ooxml::docx::Document;
///
/// let doc = Document::open("document.docx")?;
///
/// for para in doc.paragraphs() {
///     println!("Paragraph: {}", para.text()?);
///     for run in para.runs()? {
///         println!("  Run: {} (bold: {:?})", run.text()?, run.bold()?);
///     }
/// }
/// # Ok::<(), Box<dyn std::error::Error>>(())
/// ```
pub mod document;
pub mod format;
pub mod package;
pub mod paragraph;
pub mod parts;

#[cfg(test)]
pub(crate) mod fixture;

pub use document::Document;
pub use format::UnderlineStyle;
pub use package::Package;
pub use paragraph::{Paragraph, Run, RunProperties};
