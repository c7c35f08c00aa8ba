/// DocumentPart - the main document.xml part of a Word document.
use crate::ooxml::docx::paragraph::{Paragraph, is_wml};
use crate::ooxml::error::{OoxmlError, Result};
use quick_xml::Reader;
use quick_xml::events::Event;
use std::ops::Range;
use std::sync::Arc;

/// A piece of the main part, in document order.
#[derive(Debug, Clone, PartialEq, Eq)]
enum Segment {
    /// Untouched bytes of the source XML
    Raw(Range<usize>),
    /// Index into `DocumentPart::paragraphs`
    Paragraph(usize),
}

/// The main document part of a Word document.
///
/// This corresponds to the `/word/document.xml` part in the package. The
/// direct `<w:p>` children of `<w:body>` are parsed into owned
/// [`Paragraph`] values; everything else (tables, section properties,
/// content outside the body) stays as raw bytes of the source, which is
/// shared between clones and never modified.
#[derive(Debug, Clone)]
pub struct DocumentPart {
    /// The source XML, as loaded
    source: Arc<[u8]>,
    segments: Vec<Segment>,
    paragraphs: Vec<Paragraph>,
}

impl DocumentPart {
    /// Parse the XML of a main document part.
    ///
    /// Fails with [`OoxmlError::Xml`] on malformed XML and with
    /// [`OoxmlError::InvalidFormat`] when there is no `<w:body>` or the
    /// part ends with elements still open.
    pub fn from_xml(xml: Vec<u8>) -> Result<Self> {
        let source: Arc<[u8]> = Arc::from(xml);
        let mut reader = Reader::from_reader(&source[..]);

        let mut segments = Vec::new();
        let mut paragraphs = Vec::new();

        // Number of open elements before the current event
        let mut depth = 0usize;
        // Depth of the children of <w:body>, once inside it
        let mut body_children: Option<usize> = None;
        let mut seen_body = false;
        // Start offset of the paragraph being captured
        let mut paragraph_start: Option<usize> = None;
        let mut raw_start = 0usize;
        let mut buf = Vec::with_capacity(4096);

        loop {
            let start = reader.buffer_position() as usize;
            match reader.read_event_into(&mut buf) {
                Ok(Event::Start(e)) => {
                    let name = e.name();
                    if body_children == Some(depth) && paragraph_start.is_none() && is_wml(name.as_ref(), b"p") {
                        paragraph_start = Some(start);
                    } else if body_children.is_none() && depth == 1 && is_wml(name.as_ref(), b"body") {
                        body_children = Some(depth + 1);
                        seen_body = true;
                    }
                    depth += 1;
                },
                Ok(Event::Empty(e)) => {
                    if body_children == Some(depth) && paragraph_start.is_none() && is_wml(e.name().as_ref(), b"p") {
                        let end = reader.buffer_position() as usize;
                        push_paragraph(&source, start..end, &mut raw_start, &mut segments, &mut paragraphs);
                    } else if depth == 1 && is_wml(e.name().as_ref(), b"body") {
                        seen_body = true;
                    }
                },
                Ok(Event::End(_)) => {
                    depth = depth.saturating_sub(1);
                    if body_children == Some(depth)
                        && let Some(begin) = paragraph_start.take()
                    {
                        let end = reader.buffer_position() as usize;
                        push_paragraph(&source, begin..end, &mut raw_start, &mut segments, &mut paragraphs);
                    } else if body_children == Some(depth + 1) {
                        // </w:body>
                        body_children = None;
                    }
                },
                Ok(Event::Eof) => break,
                Err(e) => return Err(OoxmlError::Xml(e.to_string())),
                _ => {},
            }
            buf.clear();
        }

        if !seen_body {
            return Err(OoxmlError::InvalidFormat(
                "main document part has no w:body element".to_string(),
            ));
        }
        if depth != 0 || paragraph_start.is_some() || body_children.is_some() {
            return Err(OoxmlError::InvalidFormat(
                "main document part ends with unclosed elements".to_string(),
            ));
        }

        if raw_start < source.len() {
            segments.push(Segment::Raw(raw_start..source.len()));
        }

        Ok(Self {
            source,
            segments,
            paragraphs,
        })
    }

    /// Number of body paragraphs.
    #[inline]
    pub fn paragraph_count(&self) -> usize {
        self.paragraphs.len()
    }

    /// Body paragraphs in document order.
    #[inline]
    pub fn paragraphs(&self) -> &[Paragraph] {
        &self.paragraphs
    }

    /// The paragraph at `index`, if any.
    #[inline]
    pub fn paragraph(&self, index: usize) -> Option<&Paragraph> {
        self.paragraphs.get(index)
    }

    /// Mutable access to the paragraph at `index`.
    #[inline]
    pub fn paragraph_mut(&mut self, index: usize) -> Option<&mut Paragraph> {
        self.paragraphs.get_mut(index)
    }

    /// Extract all paragraph text, one paragraph per line.
    pub fn extract_text(&self) -> Result<String> {
        let mut result = String::with_capacity(self.source.len() / 8);
        for (i, para) in self.paragraphs.iter().enumerate() {
            if i > 0 {
                result.push('\n');
            }
            result.push_str(&para.text()?);
        }
        Ok(result)
    }

    /// Serialize the part, with current paragraph content.
    pub fn to_xml(&self) -> Vec<u8> {
        let capacity = self.source.len()
            + self
                .paragraphs
                .iter()
                .map(|p| p.xml_bytes().len())
                .sum::<usize>();
        let mut xml = Vec::with_capacity(capacity);

        for segment in &self.segments {
            match segment {
                Segment::Raw(range) => xml.extend_from_slice(&self.source[range.clone()]),
                Segment::Paragraph(index) => xml.extend_from_slice(self.paragraphs[*index].xml_bytes()),
            }
        }
        xml
    }
}

/// Close the raw segment before `range` and record the paragraph it spans.
fn push_paragraph(
    source: &[u8],
    range: Range<usize>,
    raw_start: &mut usize,
    segments: &mut Vec<Segment>,
    paragraphs: &mut Vec<Paragraph>,
) {
    if *raw_start < range.start {
        segments.push(Segment::Raw(*raw_start..range.start));
    }
    segments.push(Segment::Paragraph(paragraphs.len()));
    paragraphs.push(Paragraph::new(source[range.clone()].to_vec()));
    *raw_start = range.end;
}
