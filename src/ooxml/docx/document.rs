/// Document - the main API for working with Word document content.
use crate::ooxml::docx::package::Package;
use crate::ooxml::docx::paragraph::{Paragraph, Run, RunProperties};
use crate::ooxml::docx::parts::DocumentPart;
use crate::ooxml::error::{OoxmlError, Result};
use smallvec::SmallVec;
use std::path::Path;
use std::sync::Arc;

/// A Word document as an ordered sequence of paragraphs.
///
/// `Document` is an owned value: cloning it deep-copies every paragraph,
/// so edits on a clone never show through to the original or to other
/// clones. The package members that are never edited are shared read-only.
///
/// # Examples
///
/// ```rust,no_run
/// use longan::ooxml::docx::Document;
///
/// let template = Document::open("report.docx")?;
/// let mut copy = template.clone();
/// copy.set_paragraph_text(0, "LHS: 42")?;
/// copy.save("report_1.docx")?;
/// # Ok::<(), Box<dyn std::error::Error>>(())
/// ```
#[derive(Debug, Clone)]
pub struct Document {
    package: Arc<Package>,
    part: DocumentPart,
}

impl Document {
    /// Parse a document from the bytes of a .docx file.
    pub fn load(bytes: &[u8]) -> Result<Self> {
        let package = Package::from_bytes(bytes)?;
        Self::from_package(package)
    }

    /// Open a document from a file path.
    pub fn open<P: AsRef<Path>>(path: P) -> Result<Self> {
        let package = Package::open(path)?;
        Self::from_package(package)
    }

    /// Build the document model over an already opened package.
    pub fn from_package(package: Package) -> Result<Self> {
        let part = DocumentPart::from_xml(package.main_part_xml().to_vec())?;
        Ok(Self {
            package: Arc::new(package),
            part,
        })
    }

    /// The package this document was loaded from.
    #[inline]
    pub fn package(&self) -> &Package {
        &self.package
    }

    /// Serialize to the bytes of a .docx file.
    pub fn to_bytes(&self) -> Result<Vec<u8>> {
        self.package.write_with_main(&self.part.to_xml())
    }

    /// Serialize and write to `path`.
    pub fn save<P: AsRef<Path>>(&self, path: P) -> Result<()> {
        std::fs::write(path, self.to_bytes()?)?;
        Ok(())
    }

    /// Clone by serializing and loading the result again.
    ///
    /// Observably equivalent to [`Clone::clone`], at the cost of a full
    /// write and parse.
    pub fn round_trip_clone(&self) -> Result<Self> {
        Self::load(&self.to_bytes()?)
    }

    /// Get the number of paragraphs in the document body.
    #[inline]
    pub fn paragraph_count(&self) -> usize {
        self.part.paragraph_count()
    }

    /// Body paragraphs in document order.
    #[inline]
    pub fn paragraphs(&self) -> &[Paragraph] {
        self.part.paragraphs()
    }

    /// The paragraph at `index`.
    pub fn paragraph(&self, index: usize) -> Result<&Paragraph> {
        let count = self.paragraph_count();
        self.part
            .paragraph(index)
            .ok_or(OoxmlError::ParagraphOutOfRange { index, count })
    }

    fn paragraph_mut(&mut self, index: usize) -> Result<&mut Paragraph> {
        let count = self.paragraph_count();
        self.part
            .paragraph_mut(index)
            .ok_or(OoxmlError::ParagraphOutOfRange { index, count })
    }

    /// Text of the paragraph at `index`.
    pub fn paragraph_text(&self, index: usize) -> Result<String> {
        self.paragraph(index)?.text()
    }

    /// Runs of the paragraph at `index`.
    pub fn runs(&self, index: usize) -> Result<SmallVec<[Run; 8]>> {
        self.paragraph(index)?.runs()
    }

    /// Replace the content of the paragraph at `index` with one unformatted run.
    pub fn set_paragraph_text(&mut self, index: usize, text: &str) -> Result<()> {
        self.paragraph_mut(index)?.set_text(text)
    }

    /// Replace the content of the paragraph at `index` with one run formatted with `props`.
    pub fn set_paragraph_text_with_format(
        &mut self,
        index: usize,
        text: &str,
        props: &RunProperties,
    ) -> Result<()> {
        self.paragraph_mut(index)?.set_text_with_properties(text, props)
    }

    /// All paragraph text, one paragraph per line.
    pub fn text(&self) -> Result<String> {
        self.part.extract_text()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::ooxml::docx::fixture;

    fn sample() -> Document {
        Document::load(&fixture::docx(&[
            fixture::bold_paragraph("Score: 10"),
            fixture::paragraph("no values here"),
            fixture::runs_paragraph(&[fixture::run("LHS ", ""), fixture::run("= 3.5", "<w:i/>")]),
        ]))
        .unwrap()
    }

    #[test]
    fn test_read_access() {
        let doc = sample();
        assert_eq!(doc.paragraph_count(), 3);
        assert_eq!(doc.paragraph_text(0).unwrap(), "Score: 10");
        assert_eq!(doc.paragraph_text(2).unwrap(), "LHS = 3.5");
        assert_eq!(doc.runs(0).unwrap()[0].bold().unwrap(), Some(true));
        assert_eq!(doc.runs(2).unwrap().len(), 2);
        assert_eq!(doc.text().unwrap(), "Score: 10\nno values here\nLHS = 3.5");
    }

    #[test]
    fn test_out_of_range() {
        let mut doc = sample();
        assert!(matches!(
            doc.paragraph_text(3),
            Err(OoxmlError::ParagraphOutOfRange { index: 3, count: 3 })
        ));
        assert!(doc.set_paragraph_text(7, "x").is_err());
    }

    #[test]
    fn test_clone_isolation() {
        let doc = sample();
        let mut copy = doc.clone();
        copy.set_paragraph_text(0, "Score: 42").unwrap();

        assert_eq!(doc.paragraph_text(0).unwrap(), "Score: 10");
        assert_eq!(copy.paragraph_text(0).unwrap(), "Score: 42");
        assert_eq!(doc.runs(0).unwrap()[0].bold().unwrap(), Some(true));
    }

    #[test]
    fn test_round_trip_clone_identity() {
        let doc = sample();
        let copy = doc.round_trip_clone().unwrap();
        assert_eq!(copy.paragraph_count(), doc.paragraph_count());
        for i in 0..doc.paragraph_count() {
            assert_eq!(copy.paragraph_text(i).unwrap(), doc.paragraph_text(i).unwrap());
            let before: Vec<_> = doc.runs(i).unwrap().iter().map(|r| r.properties().unwrap()).collect();
            let after: Vec<_> = copy.runs(i).unwrap().iter().map(|r| r.properties().unwrap()).collect();
            assert_eq!(before, after);
        }
    }

    #[test]
    fn test_unmodified_save_keeps_main_part() {
        let doc = sample();
        let reloaded = Package::from_bytes(&doc.to_bytes().unwrap()).unwrap();
        assert_eq!(reloaded.main_part_xml(), doc.package().main_part_xml());
    }

    #[test]
    fn test_save_to_file() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("out.docx");

        let mut doc = sample();
        doc.set_paragraph_text_with_format(
            1,
            "Score: 1",
            &RunProperties {
                italic: Some(true),
                ..Default::default()
            },
        )
        .unwrap();
        doc.save(&path).unwrap();

        let reopened = Document::open(&path).unwrap();
        assert_eq!(reopened.paragraph_text(1).unwrap(), "Score: 1");
        assert_eq!(reopened.runs(1).unwrap()[0].italic().unwrap(), Some(true));
    }
}
