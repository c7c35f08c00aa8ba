//! Replacement tables: the new values each term takes, one per variant.

use crate::common::Result;
use crate::template::notice::Notice;
use crate::template::tabular::{TabularConfig, parse_table};
use log::{debug, warn};

/// Replacement values per term.
///
/// Variant `i` uses the `i`-th value of each term that has one. Terms keep
/// insertion order; a term may have an empty list.
///
/// # Example
///
/// ```rust
/// use longan::template::ReplacementTable;
///
/// let mut table = ReplacementTable::new();
/// table.insert_text("LHS", "1\n2\n\n3\n");
/// table.insert_values("RHS", ["9"]);
/// assert_eq!(table.variant_count(), 3);
/// assert_eq!(table.value_at("RHS", 1), None);
/// ```
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ReplacementTable {
    entries: Vec<(String, Vec<String>)>,
}

/// A table read from a tabular source, with the terms it had no column for.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct TabularImport {
    pub table: ReplacementTable,
    /// One [`Notice::ColumnNotFound`] per missing term
    pub notices: Vec<Notice>,
}

impl ReplacementTable {
    pub fn new() -> Self {
        Self::default()
    }

    /// Set the values of `term`, replacing any previous list.
    ///
    /// Values are trimmed and empty ones dropped.
    pub fn insert_values<I, S>(&mut self, term: &str, values: I)
    where
        I: IntoIterator<Item = S>,
        S: AsRef<str>,
    {
        let values: Vec<String> = values
            .into_iter()
            .map(|v| v.as_ref().trim().to_string())
            .filter(|v| !v.is_empty())
            .collect();

        match self.entries.iter_mut().find(|(t, _)| t == term) {
            Some((_, existing)) => *existing = values,
            None => self.entries.push((term.to_string(), values)),
        }
    }

    /// Set the values of `term` from free text, one value per line.
    pub fn insert_text(&mut self, term: &str, text: &str) {
        self.insert_values(term, text.lines());
    }

    /// Build a table from a tabular file.
    ///
    /// For every term the first column whose trimmed header equals it
    /// supplies the values, top to bottom, skipping empty cells. Terms with
    /// no such column get a [`Notice::ColumnNotFound`] and no entry. On a
    /// parse error nothing is imported.
    pub fn from_tabular<I, S>(data: &[u8], terms: I, config: &TabularConfig) -> Result<TabularImport>
    where
        I: IntoIterator<Item = S>,
        S: AsRef<str>,
    {
        let source = parse_table(data, config)?;

        let mut import = TabularImport::default();
        for term in terms {
            let term = term.as_ref();
            match source.column_index(term) {
                Some(column) => {
                    import.table.insert_values(term, source.column(column));
                    debug!(
                        "Column '{}' supplies {} values",
                        term,
                        import.table.values(term).len()
                    );
                },
                None => {
                    warn!("No column named '{}' in tabular source", term);
                    import.notices.push(Notice::ColumnNotFound {
                        term: term.to_string(),
                    });
                },
            }
        }
        Ok(import)
    }

    /// Build a table from pasted tabular text; see [`from_tabular`](Self::from_tabular).
    pub fn from_tabular_text<I, S>(text: &str, terms: I, config: &TabularConfig) -> Result<TabularImport>
    where
        I: IntoIterator<Item = S>,
        S: AsRef<str>,
    {
        Self::from_tabular(text.as_bytes(), terms, config)
    }

    /// Number of variants the table describes: the longest value list.
    pub fn variant_count(&self) -> usize {
        self.entries.iter().map(|(_, v)| v.len()).max().unwrap_or(0)
    }

    /// Values of `term`; empty if the term has none.
    pub fn values(&self, term: &str) -> &[String] {
        self.entries
            .iter()
            .find(|(t, _)| t == term)
            .map(|(_, v)| v.as_slice())
            .unwrap_or_default()
    }

    /// The value `term` takes in variant `index`.
    pub fn value_at(&self, term: &str, index: usize) -> Option<&str> {
        self.values(term).get(index).map(String::as_str)
    }

    /// Terms in insertion order.
    pub fn terms(&self) -> impl Iterator<Item = &str> {
        self.entries.iter().map(|(t, _)| t.as_str())
    }

    /// Number of terms, including those without values.
    #[inline]
    pub fn len(&self) -> usize {
        self.entries.len()
    }

    /// Whether no term has any value.
    pub fn is_empty(&self) -> bool {
        self.variant_count() == 0
    }
}
