//! Variant generation: substitute replacement values into copies of a template.

use crate::common::Result;
use crate::ooxml::docx::Document;
use crate::template::notice::Notice;
use crate::template::options::{CloneStrategy, GeneratorOptions};
use crate::template::replacement::ReplacementTable;
use crate::template::scanner::{Occurrence, ScanReport, TermPattern};
use log::{debug, info, warn};
use rayon::prelude::*;

/// One generated document.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Variant {
    /// 0-based variant index
    pub index: usize,
    /// The serialized .docx
    pub bytes: Vec<u8>,
    /// Number of occurrences substituted
    pub applied: usize,
    /// Stale matches skipped while building this variant
    pub notices: Vec<Notice>,
}

/// The outcome of a generation request.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Generation {
    /// Variants in index order
    pub variants: Vec<Variant>,
    /// Request-level notices
    pub notices: Vec<Notice>,
}

impl Generation {
    #[inline]
    pub fn len(&self) -> usize {
        self.variants.len()
    }

    #[inline]
    pub fn is_empty(&self) -> bool {
        self.variants.is_empty()
    }

    /// Request-level notices followed by the notices of every variant.
    pub fn all_notices(&self) -> impl Iterator<Item = &Notice> {
        self.notices
            .iter()
            .chain(self.variants.iter().flat_map(|v| v.notices.iter()))
    }

    /// The output documents, in index order.
    pub fn into_bytes(self) -> Vec<Vec<u8>> {
        self.variants.into_iter().map(|v| v.bytes).collect()
    }
}

/// Substitution work for one term.
struct TermPlan<'a> {
    pattern: TermPattern,
    occurrences: &'a [Occurrence],
    values: &'a [String],
}

/// Generates one document per replacement index.
///
/// # Example
///
/// ```rust,no_run
/// use longan::ooxml::docx::Document;
/// use longan::template::{GeneratorOptions, ReplacementTable, TermSet, VariantGenerator, scan};
///
/// let template = Document::open("report.docx")?;
/// let report = scan(&template, &TermSet::parse("LHS"))?;
///
/// let mut table = ReplacementTable::new();
/// table.insert_values("LHS", ["1", "2", "3"]);
///
/// let generator = VariantGenerator::new(GeneratorOptions::new().with_parallel(true));
/// let generation = generator.run(&template, &report, &table)?;
/// for variant in &generation.variants {
///     std::fs::write(generator.options().file_name(variant.index), &variant.bytes)?;
/// }
/// # Ok::<(), Box<dyn std::error::Error>>(())
/// ```
#[derive(Debug, Clone, Default)]
pub struct VariantGenerator {
    options: GeneratorOptions,
}

impl VariantGenerator {
    pub fn new(options: GeneratorOptions) -> Self {
        Self { options }
    }

    #[inline]
    pub fn options(&self) -> &GeneratorOptions {
        &self.options
    }

    /// Number of variants a request produces.
    ///
    /// Only terms that were found in the document count; values for a term
    /// with no occurrence could never be applied.
    pub fn variant_count(report: &ScanReport, table: &ReplacementTable) -> usize {
        table
            .terms()
            .filter(|term| report.is_found(term))
            .map(|term| table.values(term).len())
            .max()
            .unwrap_or(0)
    }

    /// Generate every variant of `base`.
    ///
    /// `base` is never modified. Fails only if a variant cannot be cloned or
    /// serialized; stale matches are reported as notices.
    pub fn run(&self, base: &Document, report: &ScanReport, table: &ReplacementTable) -> Result<Generation> {
        let count = Self::variant_count(report, table);
        if count == 0 {
            info!("No replacement values for any found term; nothing to generate");
            return Ok(Generation {
                variants: Vec::new(),
                notices: vec![Notice::NoReplacementValues],
            });
        }

        let plans = Self::plan(report, table)?;

        let variants = if self.options.parallel {
            (0..count)
                .into_par_iter()
                .map(|index| self.build_variant(base, &plans, index))
                .collect::<Result<Vec<_>>>()?
        } else {
            (0..count)
                .map(|index| self.build_variant(base, &plans, index))
                .collect::<Result<Vec<_>>>()?
        };

        let generation = Generation {
            variants,
            notices: Vec::new(),
        };
        info!(
            "Generated {} variants ({} substitutions, {} skipped)",
            generation.len(),
            generation.variants.iter().map(|v| v.applied).sum::<usize>(),
            generation.all_notices().count()
        );
        Ok(generation)
    }

    /// Terms in report order that have both occurrences and values.
    fn plan<'a>(report: &'a ScanReport, table: &'a ReplacementTable) -> Result<Vec<TermPlan<'a>>> {
        report
            .iter()
            .filter(|(term, occurrences)| !occurrences.is_empty() && !table.values(term).is_empty())
            .map(|(term, occurrences)| {
                Ok(TermPlan {
                    pattern: TermPattern::new(term)?,
                    occurrences,
                    values: table.values(term),
                })
            })
            .collect()
    }

    fn build_variant(&self, base: &Document, plans: &[TermPlan<'_>], index: usize) -> Result<Variant> {
        let mut doc = match self.options.clone_strategy {
            CloneStrategy::Deep => base.clone(),
            CloneStrategy::RoundTrip => base.round_trip_clone()?,
        };

        let mut applied = 0;
        let mut notices = Vec::new();

        for plan in plans {
            let Some(new_value) = plan.values.get(index) else {
                continue;
            };
            for occurrence in plan.occurrences {
                if substitute(&mut doc, &plan.pattern, occurrence, new_value)? {
                    debug!(
                        "Variant {}: '{}' {} -> {} in paragraph {}",
                        index, occurrence.term, occurrence.value, new_value, occurrence.paragraph
                    );
                    applied += 1;
                } else {
                    warn!(
                        "Variant {}: '{}' with value {} not found in paragraph {}, skipped",
                        index, occurrence.term, occurrence.value, occurrence.paragraph
                    );
                    notices.push(Notice::StaleMatchSkip {
                        variant: index,
                        term: occurrence.term.clone(),
                        paragraph: occurrence.paragraph,
                        old_value: occurrence.value.clone(),
                    });
                }
            }
        }

        let bytes = doc.to_bytes()?;
        debug!("Variant {}: {} substitutions, {} bytes", index, applied, bytes.len());

        Ok(Variant {
            index,
            bytes,
            applied,
            notices,
        })
    }
}

/// Rewrite every `term [:|=] old_value` span of the paragraph as `term: new_value`.
///
/// Returns `false` if no such span is in the paragraph any more. A paragraph
/// that was a single run keeps that run's formatting; any other paragraph
/// becomes one unformatted run.
fn substitute(doc: &mut Document, pattern: &TermPattern, occurrence: &Occurrence, new_value: &str) -> Result<bool> {
    if occurrence.paragraph >= doc.paragraph_count() {
        return Ok(false);
    }

    let text = doc.paragraph_text(occurrence.paragraph)?;
    let spans = pattern.value_spans(&text, &occurrence.value);
    if spans.is_empty() {
        return Ok(false);
    }

    let mut new_text = String::with_capacity(text.len() + spans.len() * new_value.len());
    let mut last = 0;
    for span in spans {
        new_text.push_str(&text[last..span.start]);
        new_text.push_str(pattern.term());
        new_text.push_str(": ");
        new_text.push_str(new_value);
        last = span.end;
    }
    new_text.push_str(&text[last..]);

    if new_text == text {
        return Ok(true);
    }

    let runs = doc.runs(occurrence.paragraph)?;
    if let [run] = runs.as_slice() {
        let props = run.properties()?;
        doc.set_paragraph_text_with_format(occurrence.paragraph, &new_text, &props)?;
    } else {
        doc.set_paragraph_text(occurrence.paragraph, &new_text)?;
    }
    Ok(true)
}

/// Generate the variant documents with default options.
///
/// Returns one .docx per variant index, or nothing when no found term has
/// replacement values.
pub fn generate(base: &Document, report: &ScanReport, table: &ReplacementTable) -> Result<Vec<Vec<u8>>> {
    VariantGenerator::default()
        .run(base, report, table)
        .map(Generation::into_bytes)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::ooxml::docx::fixture;
    use crate::template::term::TermSet;

    fn template(body: &[String]) -> Document {
        Document::load(&fixture::docx(body)).unwrap()
    }

    #[test]
    fn test_substitute_normalizes_label() {
        let mut doc = template(&[fixture::paragraph("Before LHS=10 after")]);
        let pattern = TermPattern::new("LHS").unwrap();
        let occurrence = Occurrence {
            term: "LHS".to_string(),
            paragraph: 0,
            value: "10".to_string(),
        };

        assert!(substitute(&mut doc, &pattern, &occurrence, "42").unwrap());
        assert_eq!(doc.paragraph_text(0).unwrap(), "Before LHS: 42 after");
        // The old value is gone, so a second attempt is stale
        assert!(!substitute(&mut doc, &pattern, &occurrence, "43").unwrap());
    }

    #[test]
    fn test_substitute_rewrites_every_matching_span() {
        let mut doc = template(&[fixture::bold_paragraph("LHS: 10, later LHS=10 but not LHS: 100")]);
        let pattern = TermPattern::new("LHS").unwrap();
        let occurrence = Occurrence {
            term: "LHS".to_string(),
            paragraph: 0,
            value: "10".to_string(),
        };

        assert!(substitute(&mut doc, &pattern, &occurrence, "42").unwrap());
        assert_eq!(doc.paragraph_text(0).unwrap(), "LHS: 42, later LHS: 42 but not LHS: 100");
        assert_eq!(doc.runs(0).unwrap()[0].bold().unwrap(), Some(true));
    }

    #[test]
    fn test_substitute_out_of_range_is_stale() {
        let mut doc = template(&[fixture::paragraph("LHS: 1")]);
        let pattern = TermPattern::new("LHS").unwrap();
        let occurrence = Occurrence {
            term: "LHS".to_string(),
            paragraph: 5,
            value: "1".to_string(),
        };
        assert!(!substitute(&mut doc, &pattern, &occurrence, "2").unwrap());
    }

    #[test]
    fn test_same_value_keeps_paragraph() {
        let mut doc = template(&[fixture::runs_paragraph(&[
            fixture::run("LHS: ", ""),
            fixture::run("10", "<w:i/>"),
        ])]);
        let pattern = TermPattern::new("LHS").unwrap();
        let occurrence = Occurrence {
            term: "LHS".to_string(),
            paragraph: 0,
            value: "10".to_string(),
        };
        assert!(substitute(&mut doc, &pattern, &occurrence, "10").unwrap());
        assert_eq!(doc.runs(0).unwrap().len(), 2);
    }

    #[test]
    fn test_variant_count_ignores_unfound_terms() {
        let doc = template(&[fixture::paragraph("LHS: 1")]);
        let report = crate::template::scan(&doc, &TermSet::parse("LHS\nXYZ")).unwrap();

        let mut table = ReplacementTable::new();
        table.insert_values("LHS", ["2"]);
        table.insert_values("XYZ", ["1", "2", "3", "4"]);
        assert_eq!(VariantGenerator::variant_count(&report, &table), 1);
    }

    #[test]
    fn test_generation_helpers() {
        let doc = template(&[fixture::paragraph("LHS: 1"), fixture::paragraph("LHS: 1")]);
        let report = crate::template::scan(&doc, &TermSet::parse("LHS")).unwrap();
        let mut table = ReplacementTable::new();
        table.insert_values("LHS", ["2", "3"]);

        let generation = VariantGenerator::default().run(&doc, &report, &table).unwrap();
        assert_eq!(generation.len(), 2);
        assert!(generation.all_notices().next().is_none());
        assert_eq!(
            generation.variants.iter().map(|v| (v.index, v.applied)).collect::<Vec<_>>(),
            [(0, 2), (1, 2)]
        );
        assert_eq!(generation.into_bytes().len(), 2);
    }
}
