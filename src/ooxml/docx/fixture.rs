//! Minimal in-memory .docx packages for tests.

use crate::common::xml::escape_xml;
use crate::ooxml::opc::PhysPkgWriter;
use crate::ooxml::opc::constants::content_type::WML_DOCUMENT_MAIN;

pub(crate) const CONTENT_TYPES: &str = concat!(
    r#"<?xml version="1.0" encoding="UTF-8" standalone="yes"?>"#,
    r#"<Types xmlns="http://schemas.openxmlformats.org/package/2006/content-types">"#,
    r#"<Default Extension="rels" ContentType="application/vnd.openxmlformats-package.relationships+xml"/>"#,
    r#"<Default Extension="xml" ContentType="application/xml"/>"#,
    r#"<Override PartName="/word/document.xml" ContentType="application/vnd.openxmlformats-officedocument.wordprocessingml.document.main+xml"/>"#,
    r#"</Types>"#,
);

const PACKAGE_RELS: &str = concat!(
    r#"<?xml version="1.0" encoding="UTF-8" standalone="yes"?>"#,
    r#"<Relationships xmlns="http://schemas.openxmlformats.org/package/2006/relationships">"#,
    r#"<Relationship Id="rId1" Type="http://schemas.openxmlformats.org/officeDocument/2006/relationships/officeDocument" Target="word/document.xml"/>"#,
    r#"</Relationships>"#,
);

const STYLES: &str = concat!(
    r#"<?xml version="1.0" encoding="UTF-8" standalone="yes"?>"#,
    r#"<w:styles xmlns:w="http://schemas.openxmlformats.org/wordprocessingml/2006/main"/>"#,
);

/// A run with optional `<w:rPr>` content.
pub(crate) fn run(text: &str, r_pr: &str) -> String {
    let props = if r_pr.is_empty() {
        String::new()
    } else {
        format!("<w:rPr>{r_pr}</w:rPr>")
    };
    format!(r#"<w:r>{props}<w:t xml:space="preserve">{}</w:t></w:r>"#, escape_xml(text))
}

/// A paragraph holding one unformatted run.
pub(crate) fn paragraph(text: &str) -> String {
    runs_paragraph(&[run(text, "")])
}

/// A paragraph holding one bold run.
pub(crate) fn bold_paragraph(text: &str) -> String {
    runs_paragraph(&[run(text, "<w:b/>")])
}

/// A paragraph made of the given runs.
pub(crate) fn runs_paragraph(runs: &[String]) -> String {
    format!("<w:p>{}</w:p>", runs.concat())
}

/// `word/document.xml` with the given body content and a section.
pub(crate) fn document_xml(body: &[String]) -> String {
    format!(
        concat!(
            r#"<?xml version="1.0" encoding="UTF-8" standalone="yes"?>"#,
            "\n",
            r#"<w:document xmlns:w="http://schemas.openxmlformats.org/wordprocessingml/2006/main"><w:body>"#,
            "{}",
            r#"<w:sectPr><w:pgSz w:w="12240" w:h="15840"/></w:sectPr></w:body></w:document>"#,
        ),
        body.concat()
    )
}

/// A complete package around `body`.
pub(crate) fn docx(body: &[String]) -> Vec<u8> {
    package(CONTENT_TYPES, &document_xml(body))
}

/// A complete package whose main part is exactly `document`.
pub(crate) fn docx_with_main(document: &str) -> Vec<u8> {
    package(CONTENT_TYPES, document)
}

/// A package whose main part is declared with `content_type`.
pub(crate) fn package_with_content_type(content_type: &str) -> Vec<u8> {
    let content_types = CONTENT_TYPES.replace(WML_DOCUMENT_MAIN, content_type);
    package(&content_types, &document_xml(&[paragraph("x")]))
}

fn package(content_types: &str, document: &str) -> Vec<u8> {
    let mut writer = PhysPkgWriter::new();
    writer.write("[Content_Types].xml", content_types.as_bytes()).unwrap();
    writer.write("_rels/.rels", PACKAGE_RELS.as_bytes()).unwrap();
    writer.write("word/document.xml", document.as_bytes()).unwrap();
    writer.write_stored("word/styles.xml", STYLES.as_bytes()).unwrap();
    writer.finish().unwrap()
}
