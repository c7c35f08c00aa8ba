/// Part implementations for Word documents.
///
/// Only the main document part is modelled; every other part of the
/// package travels through as opaque bytes.
pub mod document_part;

pub use document_part::DocumentPart;
