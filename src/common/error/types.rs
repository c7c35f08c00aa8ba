//! Unified error types for Longan.
use thiserror::Error;

/// Main error type for Longan operations.
#[derive(Error, Debug)]
pub enum Error {
    /// IO error
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    /// The input bytes are not a valid document
    #[error("Parse error: {0}")]
    ParseError(String),

    /// XML parsing error
    #[error("XML error: {0}")]
    XmlError(String),

    /// ZIP archive error
    #[error("ZIP error: {0}")]
    ZipError(String),

    /// Invalid content type
    #[error("Invalid content type: expected {expected}, got {got}")]
    InvalidContentType { expected: String, got: String },

    /// Package part not found
    #[error("Component not found: {0}")]
    ComponentNotFound(String),

    /// Paragraph index past the end of the document
    #[error("Paragraph {index} out of range (document has {count} paragraphs)")]
    ParagraphOutOfRange { index: usize, count: usize },

    /// Malformed tabular replacement source
    #[error("Tabular parse error on line {line}: {message}")]
    TabularParse { line: usize, message: String },

    /// Generic error
    #[error("{0}")]
    Other(String),
}

impl Error {
    /// Whether this error means the input was not a usable document.
    ///
    /// These failures abort a request; content-level anomalies are reported
    /// as [`Notice`](crate::template::Notice)s instead.
    pub fn is_parse_error(&self) -> bool {
        matches!(
            self,
            Error::ParseError(_)
                | Error::XmlError(_)
                | Error::ZipError(_)
                | Error::InvalidContentType { .. }
                | Error::ComponentNotFound(_)
        )
    }
}

/// Result type for Longan operations.
pub type Result<T> = std::result::Result<T, Error>;
