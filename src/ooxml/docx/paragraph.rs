/// Paragraph and Run structures for Word documents.
use crate::common::RGBColor;
use crate::common::xml::{escape_xml, resolve_entity, unescape_xml};
use crate::ooxml::docx::format::UnderlineStyle;
use crate::ooxml::error::{OoxmlError, Result};
use quick_xml::Reader;
use quick_xml::events::{BytesStart, Event};
use smallvec::SmallVec;

/// Whether a qualified name is the WordprocessingML element `local`.
///
/// Like the rest of the crate this expects the main namespace to be bound to
/// `w` (what Word writes) or to be the default namespace. Math (`m:r`,
/// `m:t`) and DrawingML (`a:r`, `a:t`) elements never match.
#[inline]
pub(crate) fn is_wml(qname: &[u8], local: &[u8]) -> bool {
    qname == local || (qname.len() == local.len() + 2 && qname.starts_with(b"w:") && &qname[2..] == local)
}

/// Namespace prefix of a qualified name, including the colon (`"w:"`), or `""`.
fn prefix_of(qname: &[u8]) -> String {
    match memchr::memchr(b':', qname) {
        Some(idx) => String::from_utf8_lossy(&qname[..=idx]).into_owned(),
        None => String::new(),
    }
}

/// Element kinds that matter when walking paragraph content.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum Node {
    Run,
    Text,
    Deleted,
    Other,
}

impl Node {
    fn classify(qname: &[u8]) -> Self {
        if is_wml(qname, b"r") {
            Node::Run
        } else if is_wml(qname, b"t") {
            Node::Text
        } else if is_wml(qname, b"del") || is_wml(qname, b"moveFrom") {
            Node::Deleted
        } else {
            Node::Other
        }
    }
}

/// Extract the visible text of every top-level run in `xml`.
///
/// Only `<w:t>` elements that are direct children of a run count; runs nested
/// inside another run (text boxes in drawings) and runs under `<w:del>` or
/// `<w:moveFrom>` are skipped. `<w:tab/>` becomes
/// `\t`, `<w:br/>` and `<w:cr/>` become `\n`.
fn extract_run_text(xml: &[u8]) -> Result<String> {
    let mut reader = Reader::from_reader(xml);

    let mut result = String::with_capacity(xml.len() / 4);
    let mut stack: SmallVec<[Node; 16]> = SmallVec::new();
    let mut runs_open = 0usize;
    let mut buf = Vec::with_capacity(1024);

    let in_text = |stack: &[Node], runs_open: usize| {
        runs_open == 1 && stack.ends_with(&[Node::Run, Node::Text]) && !stack.contains(&Node::Deleted)
    };

    loop {
        match reader.read_event_into(&mut buf) {
            Ok(Event::Start(e)) => {
                let node = Node::classify(e.name().as_ref());
                if node == Node::Run {
                    runs_open += 1;
                }
                stack.push(node);
            },
            Ok(Event::Empty(e)) => {
                if runs_open == 1 && stack.last() == Some(&Node::Run) && !stack.contains(&Node::Deleted) {
                    let name = e.name();
                    if is_wml(name.as_ref(), b"tab") {
                        result.push('\t');
                    } else if is_wml(name.as_ref(), b"br") || is_wml(name.as_ref(), b"cr") {
                        result.push('\n');
                    }
                }
            },
            Ok(Event::Text(e)) if in_text(&stack, runs_open) => {
                let text = std::str::from_utf8(e.as_ref())
                    .map_err(|_| OoxmlError::Xml("Invalid UTF-8 in run text".to_string()))?;
                result.push_str(&unescape_xml(text));
            },
            Ok(Event::GeneralRef(e)) if in_text(&stack, runs_open) => {
                if let Some(c) = std::str::from_utf8(e.as_ref()).ok().and_then(resolve_entity) {
                    result.push(c);
                }
            },
            Ok(Event::End(_)) => {
                if stack.pop() == Some(Node::Run) {
                    runs_open -= 1;
                }
            },
            Ok(Event::Eof) => break,
            Err(e) => return Err(OoxmlError::Xml(e.to_string())),
            _ => {},
        }
        buf.clear();
    }

    Ok(result)
}

/// Write one `<w:r>` holding `text`, with `\t` and `\n` as tab and break elements.
fn write_run(prefix: &str, text: &str, props: &RunProperties, xml: &mut String) {
    fn flush(prefix: &str, segment: &mut String, xml: &mut String) {
        if segment.is_empty() {
            return;
        }
        xml.push('<');
        xml.push_str(prefix);
        xml.push_str("t xml:space=\"preserve\">");
        xml.push_str(&escape_xml(segment));
        xml.push_str("</");
        xml.push_str(prefix);
        xml.push_str("t>");
        segment.clear();
    }

    xml.push('<');
    xml.push_str(prefix);
    xml.push_str("r>");
    props.write_xml(prefix, xml);

    let mut segment = String::with_capacity(text.len());
    let mut chars = text.chars().peekable();
    while let Some(c) = chars.next() {
        match c {
            '\t' => {
                flush(prefix, &mut segment, xml);
                xml.push('<');
                xml.push_str(prefix);
                xml.push_str("tab/>");
            },
            '\r' if chars.peek() == Some(&'\n') => {},
            '\n' | '\r' => {
                flush(prefix, &mut segment, xml);
                xml.push('<');
                xml.push_str(prefix);
                xml.push_str("br/>");
            },
            _ => segment.push(c),
        }
    }
    flush(prefix, &mut segment, xml);

    xml.push_str("</");
    xml.push_str(prefix);
    xml.push_str("r>");
}

/// The parts of a paragraph that survive a text reset.
struct Shell<'a> {
    /// Opening `<w:p ...>` tag, always a start tag
    open: Vec<u8>,
    /// `<w:pPr>` element, if any
    properties: Option<&'a [u8]>,
    /// Closing `</w:p>` tag
    close: Vec<u8>,
    /// Namespace prefix of the paragraph element
    prefix: String,
}

/// A paragraph in a Word document.
///
/// Represents a `<w:p>` element. Paragraphs contain runs which in turn
/// contain the actual text and formatting. The paragraph keeps its raw XML
/// so that untouched content serializes back byte for byte.
///
/// # Example
///
/// ```rust
/// use longan::ooxml::docx::Paragraph;
///
/// let para = Paragraph::new(br#"<w:p><w:r><w:rPr><w:b/></w:rPr><w:t>LHS: 12.5</w:t></w:r></w:p>"#.to_vec());
/// assert_eq!(para.text()?, "LHS: 12.5");
/// assert_eq!(para.runs()?[0].bold()?, Some(true));
/// # Ok::<(), longan::ooxml::OoxmlError>(())
/// ```
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Paragraph {
    /// The raw XML bytes for this paragraph
    xml_bytes: Vec<u8>,
}

impl Paragraph {
    /// Create a new Paragraph from XML bytes.
    ///
    /// # Arguments
    ///
    /// * `xml_bytes` - The XML content of the `<w:p>` element
    pub fn new(xml_bytes: Vec<u8>) -> Self {
        Self { xml_bytes }
    }

    /// The raw XML of the `<w:p>` element.
    #[inline]
    pub fn xml_bytes(&self) -> &[u8] {
        &self.xml_bytes
    }

    /// Get the text content of this paragraph.
    ///
    /// Concatenates the text of all runs in the paragraph, including runs
    /// inside hyperlinks and tracked insertions.
    pub fn text(&self) -> Result<String> {
        extract_run_text(&self.xml_bytes)
    }

    /// Get the runs in this paragraph.
    ///
    /// Returns the `<w:r>` elements that contribute to [`text`](Self::text):
    /// top-level runs, in document order, excluding tracked deletions and
    /// runs nested inside another run.
    pub fn runs(&self) -> Result<SmallVec<[Run; 8]>> {
        let mut reader = Reader::from_reader(&self.xml_bytes[..]);

        let mut runs = SmallVec::new();
        let mut stack: SmallVec<[Node; 16]> = SmallVec::new();
        // Byte offset and stack depth of the run being captured
        let mut open_run: Option<(usize, usize)> = None;
        let mut buf = Vec::with_capacity(1024);

        loop {
            let start = reader.buffer_position() as usize;
            match reader.read_event_into(&mut buf) {
                Ok(Event::Start(e)) => {
                    let node = Node::classify(e.name().as_ref());
                    if node == Node::Run && open_run.is_none() && !stack.contains(&Node::Deleted) {
                        open_run = Some((start, stack.len()));
                    }
                    stack.push(node);
                },
                Ok(Event::Empty(e)) => {
                    if open_run.is_none()
                        && Node::classify(e.name().as_ref()) == Node::Run
                        && !stack.contains(&Node::Deleted)
                    {
                        let end = reader.buffer_position() as usize;
                        runs.push(Run::new(self.xml_bytes[start..end].to_vec()));
                    }
                },
                Ok(Event::End(_)) => {
                    stack.pop();
                    if let Some((begin, depth)) = open_run
                        && stack.len() == depth
                    {
                        let end = reader.buffer_position() as usize;
                        runs.push(Run::new(self.xml_bytes[begin..end].to_vec()));
                        open_run = None;
                    }
                },
                Ok(Event::Eof) => break,
                Err(e) => return Err(OoxmlError::Xml(e.to_string())),
                _ => {},
            }
            buf.clear();
        }

        Ok(runs)
    }

    /// Replace all content with a single unformatted run holding `text`.
    ///
    /// The paragraph's own attributes and its `<w:pPr>` are kept; every other
    /// child (runs, hyperlinks, bookmarks, fields) is dropped.
    pub fn set_text(&mut self, text: &str) -> Result<()> {
        self.set_text_with_properties(text, &RunProperties::default())
    }

    /// Replace all content with a single run holding `text`, formatted with `props`.
    pub fn set_text_with_properties(&mut self, text: &str, props: &RunProperties) -> Result<()> {
        let shell = self.shell()?;

        let mut run_xml = String::with_capacity(text.len() + 64);
        write_run(&shell.prefix, text, props, &mut run_xml);

        let properties = shell.properties.unwrap_or_default();
        let mut xml_bytes = Vec::with_capacity(
            shell.open.len() + properties.len() + run_xml.len() + shell.close.len(),
        );
        xml_bytes.extend_from_slice(&shell.open);
        xml_bytes.extend_from_slice(properties);
        xml_bytes.extend_from_slice(run_xml.as_bytes());
        xml_bytes.extend_from_slice(&shell.close);

        self.xml_bytes = xml_bytes;
        Ok(())
    }

    /// Split the paragraph into the pieces kept by [`set_text`](Self::set_text).
    fn shell(&self) -> Result<Shell<'_>> {
        let mut reader = Reader::from_reader(&self.xml_bytes[..]);

        let mut depth = 0usize;
        let mut open = None;
        let mut close = None;
        let mut prefix = String::new();
        let mut properties_start = None;
        let mut properties = None;
        let mut buf = Vec::with_capacity(512);

        loop {
            let start = reader.buffer_position() as usize;
            match reader.read_event_into(&mut buf) {
                Ok(Event::Start(e)) => {
                    let end = reader.buffer_position() as usize;
                    if depth == 0 {
                        prefix = prefix_of(e.name().as_ref());
                        open = Some(self.xml_bytes[start..end].to_vec());
                    } else if depth == 1 && is_wml(e.name().as_ref(), b"pPr") {
                        properties_start = Some(start);
                    }
                    depth += 1;
                },
                Ok(Event::Empty(e)) => {
                    let end = reader.buffer_position() as usize;
                    if depth == 0 {
                        // <w:p/>: reopen as a start tag and synthesize the end tag
                        let tag = &self.xml_bytes[start..end];
                        let mut opening = tag[..tag.len().saturating_sub(2)].to_vec();
                        opening.push(b'>');

                        let name = e.name();
                        let mut closing = Vec::with_capacity(name.as_ref().len() + 3);
                        closing.extend_from_slice(b"</");
                        closing.extend_from_slice(name.as_ref());
                        closing.push(b'>');

                        prefix = prefix_of(name.as_ref());
                        open = Some(opening);
                        close = Some(closing);
                        break;
                    } else if depth == 1 && is_wml(e.name().as_ref(), b"pPr") {
                        properties = Some(&self.xml_bytes[start..end]);
                    }
                },
                Ok(Event::End(e)) => {
                    let end = reader.buffer_position() as usize;
                    depth = depth.saturating_sub(1);
                    if depth == 1
                        && is_wml(e.name().as_ref(), b"pPr")
                        && let Some(begin) = properties_start.take()
                    {
                        properties = Some(&self.xml_bytes[begin..end]);
                    } else if depth == 0 {
                        close = Some(self.xml_bytes[start..end].to_vec());
                        break;
                    }
                },
                Ok(Event::Eof) => break,
                Err(e) => return Err(OoxmlError::Xml(e.to_string())),
                _ => {},
            }
            buf.clear();
        }

        match (open, close) {
            (Some(open), Some(close)) => Ok(Shell {
                open,
                properties,
                close,
                prefix,
            }),
            _ => Err(OoxmlError::InvalidFormat(
                "paragraph XML is not a single closed element".to_string(),
            )),
        }
    }
}

/// Formatting properties of a run.
///
/// Every field is optional: `None` means the run does not set the property
/// and inherits it from its style, which is different from an explicit
/// `Some(false)` / [`UnderlineStyle::None`].
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct RunProperties {
    /// Whether the run is bold
    pub bold: Option<bool>,
    /// Whether the run is italic
    pub italic: Option<bool>,
    /// Underline style
    pub underline: Option<UnderlineStyle>,
    /// Font size in half-points (e.g., 24 = 12pt)
    pub font_size: Option<u32>,
    /// Font color; Word's `auto` reads as `None`
    pub color: Option<RGBColor>,
    /// Character style id (`w:rStyle`)
    pub style: Option<String>,
}

impl RunProperties {
    /// Whether no property is set.
    pub fn is_empty(&self) -> bool {
        self.bold.is_none()
            && self.italic.is_none()
            && self.underline.is_none()
            && self.font_size.is_none()
            && self.color.is_none()
            && self.style.is_none()
    }

    /// Font size in points.
    #[inline]
    pub fn font_size_pt(&self) -> Option<f32> {
        self.font_size.map(|half_points| half_points as f32 / 2.0)
    }

    /// Record one child of `<w:rPr>`.
    fn apply(&mut self, e: &BytesStart<'_>) -> Result<()> {
        let name = e.name();
        let local = name.as_ref();
        if !(is_wml(local, b"b")
            || is_wml(local, b"i")
            || is_wml(local, b"u")
            || is_wml(local, b"sz")
            || is_wml(local, b"color")
            || is_wml(local, b"rStyle"))
        {
            return Ok(());
        }

        let mut val = None;
        for attr in e.attributes().flatten() {
            if attr.key.local_name().as_ref() == b"val" {
                val = Some(
                    attr.unescape_value()
                        .map_err(|e| OoxmlError::Xml(e.to_string()))?
                        .into_owned(),
                );
                break;
            }
        }

        match e.local_name().as_ref() {
            b"b" => self.bold = Some(on_off(val.as_deref())),
            b"i" => self.italic = Some(on_off(val.as_deref())),
            b"u" => {
                self.underline = Some(
                    val.as_deref()
                        .map(|v| UnderlineStyle::from_val(v.as_bytes()))
                        .unwrap_or(UnderlineStyle::Single),
                );
            },
            b"sz" => self.font_size = val.and_then(|v| v.trim().parse::<u32>().ok()),
            b"color" => self.color = val.as_deref().and_then(RGBColor::from_hex),
            b"rStyle" => self.style = val.filter(|v| !v.is_empty()),
            _ => {},
        }
        Ok(())
    }

    /// Write `<w:rPr>` in schema order. Writes nothing when empty.
    pub(crate) fn write_xml(&self, prefix: &str, xml: &mut String) {
        if self.is_empty() {
            return;
        }

        xml.push('<');
        xml.push_str(prefix);
        xml.push_str("rPr>");

        let mut element = |name: &str, val: Option<&str>| {
            xml.push('<');
            xml.push_str(prefix);
            xml.push_str(name);
            if let Some(val) = val {
                xml.push(' ');
                xml.push_str(prefix);
                xml.push_str("val=\"");
                xml.push_str(&escape_xml(val));
                xml.push('"');
            }
            xml.push_str("/>");
        };

        if let Some(style) = &self.style {
            element("rStyle", Some(style));
        }
        if let Some(bold) = self.bold {
            element("b", (!bold).then_some("0"));
        }
        if let Some(italic) = self.italic {
            element("i", (!italic).then_some("0"));
        }
        if let Some(color) = self.color {
            element("color", Some(&color.to_hex()));
        }
        if let Some(size) = self.font_size {
            let mut buffer = itoa::Buffer::new();
            element("sz", Some(buffer.format(size)));
        }
        if let Some(underline) = self.underline {
            element("u", Some(underline.as_str()));
        }

        xml.push_str("</");
        xml.push_str(prefix);
        xml.push_str("rPr>");
    }
}

/// Parse an `ST_OnOff` value; an absent value means "on".
fn on_off(val: Option<&str>) -> bool {
    !matches!(val, Some("0" | "false" | "off"))
}

/// A run within a paragraph.
///
/// Represents a `<w:r>` element. A run is a region of text with a single
/// set of formatting properties.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Run {
    /// The raw XML bytes for this run
    xml_bytes: Vec<u8>,
}

impl Run {
    /// Create a new Run from XML bytes.
    pub fn new(xml_bytes: Vec<u8>) -> Self {
        Self { xml_bytes }
    }

    /// The raw XML of the `<w:r>` element.
    #[inline]
    pub fn xml_bytes(&self) -> &[u8] {
        &self.xml_bytes
    }

    /// Get the text content of this run.
    ///
    /// Extracts text from `<w:t>` elements and converts special characters:
    /// - `<w:tab/>` → tab character
    /// - `<w:br/>` → newline character
    pub fn text(&self) -> Result<String> {
        extract_run_text(&self.xml_bytes)
    }

    /// Check if this run is bold.
    ///
    /// Returns `Some(true)` if bold is explicitly enabled,
    /// `Some(false)` if explicitly disabled,
    /// `None` if not specified (inherits from style).
    pub fn bold(&self) -> Result<Option<bool>> {
        Ok(self.properties()?.bold)
    }

    /// Check if this run is italic, with the same tri-state as [`bold`](Self::bold).
    pub fn italic(&self) -> Result<Option<bool>> {
        Ok(self.properties()?.italic)
    }

    /// Get the underline style, `None` if not specified.
    pub fn underline(&self) -> Result<Option<UnderlineStyle>> {
        Ok(self.properties()?.underline)
    }

    /// Get the font size for this run in half-points.
    pub fn font_size(&self) -> Result<Option<u32>> {
        Ok(self.properties()?.font_size)
    }

    /// Get the explicit font color of this run.
    pub fn color(&self) -> Result<Option<RGBColor>> {
        Ok(self.properties()?.color)
    }

    /// Get the character style id of this run.
    pub fn style(&self) -> Result<Option<String>> {
        Ok(self.properties()?.style)
    }

    /// Get all formatting properties in a single pass.
    ///
    /// Only direct children of the run's own `<w:rPr>` are read; the
    /// previous formatting recorded in `<w:rPrChange>` is ignored.
    pub fn properties(&self) -> Result<RunProperties> {
        let mut reader = Reader::from_reader(&self.xml_bytes[..]);

        let mut props = RunProperties::default();
        let mut depth = 0usize;
        let mut in_r_pr = false;
        let mut buf = Vec::with_capacity(512);

        loop {
            match reader.read_event_into(&mut buf) {
                Ok(Event::Start(e)) => {
                    if depth == 1 && is_wml(e.name().as_ref(), b"rPr") {
                        in_r_pr = true;
                    } else if in_r_pr && depth == 2 {
                        props.apply(&e)?;
                    }
                    depth += 1;
                },
                Ok(Event::Empty(e)) => {
                    if in_r_pr && depth == 2 {
                        props.apply(&e)?;
                    }
                },
                Ok(Event::End(e)) => {
                    depth = depth.saturating_sub(1);
                    if depth == 1 && is_wml(e.name().as_ref(), b"rPr") {
                        in_r_pr = false;
                    }
                },
                Ok(Event::Eof) => break,
                Err(e) => return Err(OoxmlError::Xml(e.to_string())),
                _ => {},
            }
            buf.clear();
        }

        Ok(props)
    }

    /// Get text and properties of the run.
    pub fn text_and_properties(&self) -> Result<(String, RunProperties)> {
        Ok((self.text()?, self.properties()?))
    }
}
