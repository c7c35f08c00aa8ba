//! Occurrence scanning: find labeled numeric values in paragraphs.

use crate::common::{Error, Result};
use crate::ooxml::docx::Document;
use crate::template::notice::Notice;
use crate::template::term::TermSet;
use log::{debug, info};
use memchr::memmem;
use regex::Regex;
use std::ops::Range;

/// One labeled value found by a scan.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct Occurrence {
    /// The term that labels the value
    pub term: String,
    /// 0-based index of the paragraph in the document body
    pub paragraph: usize,
    /// The numeric value exactly as written
    pub value: String,
}

/// Matcher for `<term> [:|=] <number>` in paragraph text.
///
/// The term is matched literally. Whitespace may surround the optional
/// separator. The number is one or more digits, optionally followed by a
/// decimal point and more digits.
#[derive(Debug, Clone)]
pub struct TermPattern {
    term: String,
    finder: memmem::Finder<'static>,
    regex: Regex,
}

impl TermPattern {
    /// Compile the pattern for `term`.
    pub fn new(term: &str) -> Result<Self> {
        let pattern = format!(r"{}\s*[:=]?\s*(\d+(?:\.\d+)?)", regex::escape(term));
        let regex = Regex::new(&pattern)
            .map_err(|e| Error::Other(format!("Failed to compile pattern for '{}': {}", term, e)))?;
        Ok(Self {
            term: term.to_string(),
            finder: memmem::Finder::new(term.as_bytes()).into_owned(),
            regex,
        })
    }

    #[inline]
    pub fn term(&self) -> &str {
        &self.term
    }

    /// Whether the term text appears in `text` at all.
    #[inline]
    pub fn mentioned_in(&self, text: &str) -> bool {
        self.finder.find(text.as_bytes()).is_some()
    }

    /// The value of the first labeled match in `text`.
    pub fn first_value<'t>(&self, text: &'t str) -> Option<&'t str> {
        if !self.mentioned_in(text) {
            return None;
        }
        self.regex
            .captures(text)
            .and_then(|caps| caps.get(1))
            .map(|m| m.as_str())
    }

    /// Byte spans of every labeled match in `text` whose value is exactly `value`.
    ///
    /// A value only matches as a whole number: `10` is not found in `LHS: 100`.
    pub fn value_spans(&self, text: &str, value: &str) -> Vec<Range<usize>> {
        if !self.mentioned_in(text) {
            return Vec::new();
        }
        self.regex
            .captures_iter(text)
            .filter(|caps| caps.get(1).is_some_and(|m| m.as_str() == value))
            .filter_map(|caps| caps.get(0).map(|m| m.range()))
            .collect()
    }
}

/// Result of scanning a document: occurrences per term, in term order.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ScanReport {
    entries: Vec<(String, Vec<Occurrence>)>,
}

impl ScanReport {
    /// Occurrences of `term`, by ascending paragraph index.
    ///
    /// Empty for terms that were not found or not scanned.
    pub fn occurrences(&self, term: &str) -> &[Occurrence] {
        self.entries
            .iter()
            .find(|(t, _)| t == term)
            .map(|(_, occurrences)| occurrences.as_slice())
            .unwrap_or_default()
    }

    /// Whether `term` has at least one occurrence.
    pub fn is_found(&self, term: &str) -> bool {
        !self.occurrences(term).is_empty()
    }

    /// Scanned terms, in term-set order.
    pub fn terms(&self) -> impl Iterator<Item = &str> {
        self.entries.iter().map(|(t, _)| t.as_str())
    }

    /// Each scanned term with its occurrences.
    pub fn iter(&self) -> impl Iterator<Item = (&str, &[Occurrence])> {
        self.entries.iter().map(|(t, o)| (t.as_str(), o.as_slice()))
    }

    /// Terms with at least one occurrence.
    pub fn found(&self) -> impl Iterator<Item = &str> {
        self.iter().filter(|(_, o)| !o.is_empty()).map(|(t, _)| t)
    }

    /// Terms without any occurrence.
    pub fn not_found(&self) -> impl Iterator<Item = &str> {
        self.iter().filter(|(_, o)| o.is_empty()).map(|(t, _)| t)
    }

    /// A [`Notice::NoOccurrencesFound`] for each term that was not found.
    pub fn notices(&self) -> Vec<Notice> {
        self.not_found()
            .map(|term| Notice::NoOccurrencesFound {
                term: term.to_string(),
            })
            .collect()
    }

    /// Total occurrences over all terms.
    pub fn total_occurrences(&self) -> usize {
        self.entries.iter().map(|(_, o)| o.len()).sum()
    }
}

/// Scan `doc` for the labeled values of every term.
///
/// Each paragraph yields at most one occurrence per term: the first
/// labeled value after the term. A term present without a value records
/// nothing for that paragraph.
///
/// # Example
///
/// ```rust,no_run
/// use longan::ooxml::docx::Document;
/// use longan::template::{TermSet, scan};
///
/// let doc = Document::open("report.docx")?;
/// let report = scan(&doc, &TermSet::parse("LHS\nRHS"))?;
/// for (term, occurrences) in report.iter() {
///     println!("{term}: {} found", occurrences.len());
/// }
/// # Ok::<(), Box<dyn std::error::Error>>(())
/// ```
pub fn scan(doc: &Document, terms: &TermSet) -> Result<ScanReport> {
    let patterns = terms.iter().map(TermPattern::new).collect::<Result<Vec<_>>>()?;
    let mut entries: Vec<(String, Vec<Occurrence>)> =
        terms.iter().map(|t| (t.to_string(), Vec::new())).collect();

    for (index, paragraph) in doc.paragraphs().iter().enumerate() {
        let text = paragraph.text()?;
        for (pattern, (_, occurrences)) in patterns.iter().zip(entries.iter_mut()) {
            if let Some(value) = pattern.first_value(&text) {
                debug!("'{}' = {} in paragraph {}", pattern.term(), value, index);
                occurrences.push(Occurrence {
                    term: pattern.term().to_string(),
                    paragraph: index,
                    value: value.to_string(),
                });
            }
        }
    }

    let report = ScanReport { entries };
    info!(
        "Scanned {} paragraphs for {} terms: {} occurrences",
        doc.paragraph_count(),
        terms.len(),
        report.total_occurrences()
    );
    Ok(report)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_first_value_separators() {
        let pattern = TermPattern::new("LHS").unwrap();
        assert_eq!(pattern.first_value("LHS: 10"), Some("10"));
        assert_eq!(pattern.first_value("LHS=3.25"), Some("3.25"));
        assert_eq!(pattern.first_value("LHS  12 and LHS: 13"), Some("12"));
        assert_eq!(pattern.first_value("the LHS is unknown"), None);
        assert_eq!(pattern.first_value("RHS: 10"), None);
    }

    #[test]
    fn test_number_shape() {
        let pattern = TermPattern::new("v").unwrap();
        assert_eq!(pattern.first_value("v: 1.5.6"), Some("1.5"));
        assert_eq!(pattern.first_value("v: 7."), Some("7"));
    }

    #[test]
    fn test_term_is_literal() {
        let pattern = TermPattern::new("a.b (x)").unwrap();
        assert_eq!(pattern.first_value("a.b (x): 4"), Some("4"));
        assert_eq!(pattern.first_value("aXb (x): 4"), None);
    }

    #[test]
    fn test_value_spans_are_exact() {
        let pattern = TermPattern::new("LHS").unwrap();
        assert!(pattern.value_spans("LHS: 100", "10").is_empty());

        let text = "LHS: 100; LHS = 10, again LHS10";
        let spans = pattern.value_spans(text, "10");
        let matched: Vec<_> = spans.into_iter().map(|span| &text[span]).collect();
        assert_eq!(matched, ["LHS = 10", "LHS10"]);
    }

    #[test]
    fn test_report_accessors() {
        let report = ScanReport {
            entries: vec![
                (
                    "LHS".to_string(),
                    vec![Occurrence {
                        term: "LHS".to_string(),
                        paragraph: 2,
                        value: "10".to_string(),
                    }],
                ),
                ("XYZ".to_string(), Vec::new()),
            ],
        };
        assert!(report.is_found("LHS"));
        assert!(!report.is_found("XYZ"));
        assert!(report.occurrences("other").is_empty());
        assert_eq!(report.found().collect::<Vec<_>>(), ["LHS"]);
        assert_eq!(report.not_found().collect::<Vec<_>>(), ["XYZ"]);
        assert_eq!(
            report.notices(),
            [Notice::NoOccurrencesFound {
                term: "XYZ".to_string()
            }]
        );
        assert_eq!(report.total_occurrences(), 1);
    }
}
