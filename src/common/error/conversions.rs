//! Error conversion implementations.
//!
//! This module contains From trait implementations to convert from internal
//! error types to the unified Error type.

use super::types::Error;
use crate::ooxml::error::OoxmlError;
use crate::ooxml::opc::error::OpcError;

impl From<OpcError> for Error {
    fn from(err: OpcError) -> Self {
        Error::from_opc_error(err)
    }
}

impl From<OoxmlError> for Error {
    fn from(err: OoxmlError) -> Self {
        match err {
            OoxmlError::Io(e) => Error::Io(e),
            OoxmlError::Xml(s) => Error::XmlError(s),
            OoxmlError::PartNotFound(s) => Error::ComponentNotFound(s),
            OoxmlError::InvalidContentType { expected, got } => {
                Error::InvalidContentType { expected, got }
            },
            OoxmlError::InvalidFormat(s) => Error::ParseError(s),
            OoxmlError::Opc(e) => Error::from_opc_error(e),
            OoxmlError::ParagraphOutOfRange { index, count } => {
                Error::ParagraphOutOfRange { index, count }
            },
            OoxmlError::Other(s) => Error::Other(s),
        }
    }
}

impl Error {
    pub(crate) fn from_opc_error(err: OpcError) -> Self {
        match err {
            OpcError::IoError(e) => Error::Io(e),
            OpcError::ZipError(s) => Error::ZipError(s),
            OpcError::XmlError(s) => Error::XmlError(s),
            OpcError::PartNotFound(s) => Error::ComponentNotFound(s),
            OpcError::InvalidRelationship(s) => Error::ParseError(s),
        }
    }
}

impl From<quick_xml::Error> for Error {
    fn from(err: quick_xml::Error) -> Self {
        Error::XmlError(err.to_string())
    }
}

impl From<zip::result::ZipError> for Error {
    fn from(err: zip::result::ZipError) -> Self {
        Error::ZipError(err.to_string())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_structural_failures_are_parse_errors() {
        let err: Error = OoxmlError::InvalidFormat("not a docx".to_string()).into();
        assert!(err.is_parse_error());

        let err: Error = OpcError::ZipError("bad central directory".to_string()).into();
        assert!(err.is_parse_error());

        let err: Error = OoxmlError::ParagraphOutOfRange { index: 4, count: 2 }.into();
        assert!(!err.is_parse_error());
        assert_eq!(
            err.to_string(),
            "Paragraph 4 out of range (document has 2 paragraphs)"
        );
    }

    #[test]
    fn test_tabular_error_is_not_structural() {
        let err = Error::TabularParse {
            line: 3,
            message: "unterminated quote".to_string(),
        };
        assert!(!err.is_parse_error());
        assert_eq!(
            err.to_string(),
            "Tabular parse error on line 3: unterminated quote"
        );
    }
}
