//! Informational outcomes of scanning and generation.
use std::fmt;

/// A content-level anomaly that degrades the result without failing it.
///
/// Structural failures are [`Error`](crate::common::Error)s and abort the
/// request; notices are collected alongside a (possibly reduced) result.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Notice {
    /// A term has no labeled value anywhere in the document.
    NoOccurrencesFound { term: String },
    /// No term with occurrences has replacement values, so no variants exist.
    NoReplacementValues,
    /// The recorded value was no longer in its paragraph when substituting.
    StaleMatchSkip {
        variant: usize,
        term: String,
        paragraph: usize,
        old_value: String,
    },
    /// A tabular source has no column headed with this term.
    ColumnNotFound { term: String },
}

impl Notice {
    /// The term this notice is about, if any.
    pub fn term(&self) -> Option<&str> {
        match self {
            Notice::NoOccurrencesFound { term }
            | Notice::StaleMatchSkip { term, .. }
            | Notice::ColumnNotFound { term } => Some(term),
            Notice::NoReplacementValues => None,
        }
    }
}

impl fmt::Display for Notice {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Notice::NoOccurrencesFound { term } => write!(f, "'{}' not found", term),
            Notice::NoReplacementValues => write!(f, "no replacement values, no documents generated"),
            Notice::StaleMatchSkip {
                variant,
                term,
                paragraph,
                old_value,
            } => write!(
                f,
                "variant {}: '{}' with value {} no longer present in paragraph {}, skipped",
                variant + 1,
                term,
                old_value,
                paragraph + 1
            ),
            Notice::ColumnNotFound { term } => write!(f, "no column named '{}'", term),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_display_is_one_based() {
        let notice = Notice::StaleMatchSkip {
            variant: 0,
            term: "LHS".to_string(),
            paragraph: 4,
            old_value: "10".to_string(),
        };
        assert_eq!(
            notice.to_string(),
            "variant 1: 'LHS' with value 10 no longer present in paragraph 5, skipped"
        );
        assert_eq!(notice.term(), Some("LHS"));
        assert_eq!(Notice::NoReplacementValues.term(), None);
    }
}
