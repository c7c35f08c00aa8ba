//! Term sets: the labels whose numeric values get scanned and replaced.

/// An ordered set of distinct terms.
///
/// Terms keep the order they were first seen in. Two terms are the same
/// only if they are byte-for-byte equal after trimming; there is no case
/// folding.
///
/// # Example
///
/// ```rust
/// use longan::template::TermSet;
///
/// let terms = TermSet::parse("LHS\n\n  RHS \nLHS\n");
/// assert_eq!(terms.as_slice(), ["LHS", "RHS"]);
/// ```
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct TermSet {
    terms: Vec<String>,
}

impl TermSet {
    /// Create an empty term set.
    pub fn new() -> Self {
        Self::default()
    }

    /// Build a term set from free text, one term per line.
    ///
    /// Lines are trimmed and blank lines are ignored.
    pub fn parse(text: &str) -> Self {
        text.lines().collect()
    }

    /// Add a term. Returns `false` if it was blank or already present.
    pub fn insert(&mut self, term: &str) -> bool {
        let term = term.trim();
        if term.is_empty() || self.contains(term) {
            return false;
        }
        self.terms.push(term.to_string());
        true
    }

    /// Whether `term` is in the set.
    #[inline]
    pub fn contains(&self, term: &str) -> bool {
        self.terms.iter().any(|t| t == term)
    }

    #[inline]
    pub fn len(&self) -> usize {
        self.terms.len()
    }

    #[inline]
    pub fn is_empty(&self) -> bool {
        self.terms.is_empty()
    }

    /// Terms in insertion order.
    #[inline]
    pub fn iter(&self) -> impl Iterator<Item = &str> {
        self.terms.iter().map(String::as_str)
    }

    #[inline]
    pub fn as_slice(&self) -> &[String] {
        &self.terms
    }
}

impl<S: AsRef<str>> FromIterator<S> for TermSet {
    fn from_iter<I: IntoIterator<Item = S>>(iter: I) -> Self {
        let mut set = TermSet::new();
        for term in iter {
            set.insert(term.as_ref());
        }
        set
    }
}

impl<S: AsRef<str>> Extend<S> for TermSet {
    fn extend<I: IntoIterator<Item = S>>(&mut self, iter: I) {
        for term in iter {
            self.insert(term.as_ref());
        }
    }
}

impl<'a> IntoIterator for &'a TermSet {
    type Item = &'a String;
    type IntoIter = std::slice::Iter<'a, String>;

    fn into_iter(self) -> Self::IntoIter {
        self.terms.iter()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parse_trims_and_dedupes() {
        let terms = TermSet::parse("  LHS\r\nRHS\n\n   \nLHS\nlhs\n");
        assert_eq!(terms.as_slice(), ["LHS", "RHS", "lhs"]);
        assert_eq!(terms.len(), 3);
    }

    #[test]
    fn test_insert() {
        let mut terms = TermSet::new();
        assert!(terms.insert("Score"));
        assert!(!terms.insert(" Score "));
        assert!(!terms.insert("   "));
        assert!(terms.contains("Score"));
        assert!(!terms.is_empty());
    }

    #[test]
    fn test_from_iterator_keeps_first_order() {
        let terms: TermSet = ["b", "a", "b", "c", "a"].into_iter().collect();
        assert_eq!(terms.iter().collect::<Vec<_>>(), ["b", "a", "c"]);
    }
}
