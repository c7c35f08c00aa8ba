//! Read-only views over the package's bookkeeping parts.
//!
//! This module provides content type mapping and relationship parsing,
//! enough to find and validate the main document part.

use crate::ooxml::opc::constants::{relationship_type, target_mode};
use crate::ooxml::opc::error::{OpcError, Result};
use quick_xml::Reader;
use quick_xml::events::Event;
use smallvec::SmallVec;
use std::collections::HashMap;

/// Serialized relationship as read from a .rels file.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SerializedRelationship {
    /// Relationship ID (e.g., "rId1")
    pub r_id: String,

    /// Relationship type URI
    pub reltype: String,

    /// Target reference (relative URI or external URL)
    pub target_ref: String,

    /// Target mode (Internal or External)
    pub target_mode: String,
}

impl SerializedRelationship {
    /// Check if this is an external relationship.
    #[inline]
    pub fn is_external(&self) -> bool {
        self.target_mode == target_mode::EXTERNAL
    }

    /// Whether this relationship points at the package's main document.
    #[inline]
    pub fn is_office_document(&self) -> bool {
        self.reltype == relationship_type::OFFICE_DOCUMENT
            || self.reltype == relationship_type::OFFICE_DOCUMENT_STRICT
    }

    /// ZIP member name of a package-level relationship target.
    ///
    /// Package relationships resolve against the root, so `word/document.xml`,
    /// `/word/document.xml` and `./word/document.xml` are the same member.
    pub fn target_membername(&self) -> Result<String> {
        if self.is_external() {
            return Err(OpcError::InvalidRelationship(format!(
                "{} targets an external resource",
                self.r_id
            )));
        }
        let target = self.target_ref.trim_start_matches("./").trim_start_matches('/');
        if target.is_empty() {
            return Err(OpcError::InvalidRelationship(format!(
                "{} has an empty target",
                self.r_id
            )));
        }
        Ok(target.to_string())
    }
}

/// Parse relationships XML into SerializedRelationship structs.
pub fn parse_rels_xml(rels_xml: &[u8]) -> Result<SmallVec<[SerializedRelationship; 8]>> {
    let mut srels = SmallVec::new();
    let mut reader = Reader::from_reader(rels_xml);
    reader.config_mut().trim_text(true);

    let mut buf = Vec::new();

    loop {
        match reader.read_event_into(&mut buf) {
            Ok(Event::Empty(ref e)) | Ok(Event::Start(ref e)) => {
                if e.local_name().as_ref() == b"Relationship" {
                    let mut r_id = None;
                    let mut reltype = None;
                    let mut target_ref = None;
                    let mut target_mode = target_mode::INTERNAL.to_string();

                    for attr in e.attributes() {
                        let attr = attr?;
                        match attr.key.as_ref() {
                            b"Id" => r_id = Some(attr.unescape_value()?.to_string()),
                            b"Type" => reltype = Some(attr.unescape_value()?.to_string()),
                            b"Target" => target_ref = Some(attr.unescape_value()?.to_string()),
                            b"TargetMode" => target_mode = attr.unescape_value()?.to_string(),
                            _ => {},
                        }
                    }

                    if let (Some(id), Some(rt), Some(tr)) = (r_id, reltype, target_ref) {
                        srels.push(SerializedRelationship {
                            r_id: id,
                            reltype: rt,
                            target_ref: tr,
                            target_mode,
                        });
                    }
                }
            },
            Ok(Event::Eof) => break,
            Err(e) => return Err(OpcError::XmlError(format!("Rels parse error: {}", e))),
            _ => {},
        }
        buf.clear();
    }

    Ok(srels)
}

/// Content type map for looking up content types by part name or extension.
///
/// Implements the OPC content type discovery algorithm using Default and Override elements
/// from [Content_Types].xml.
#[derive(Debug, Default)]
pub struct ContentTypeMap {
    /// Maps lowercase file extensions to default content types
    defaults: HashMap<String, String>,

    /// Maps lowercase partnames (with leading `/`) to override content types
    overrides: HashMap<String, String>,
}

impl ContentTypeMap {
    /// Parse content types from [Content_Types].xml.
    pub fn from_xml(xml: &[u8]) -> Result<Self> {
        let mut map = Self::default();
        let mut reader = Reader::from_reader(xml);
        reader.config_mut().trim_text(true);

        let mut buf = Vec::new();

        loop {
            match reader.read_event_into(&mut buf) {
                Ok(Event::Empty(ref e)) | Ok(Event::Start(ref e)) => {
                    match e.local_name().as_ref() {
                        b"Default" => {
                            // <Default Extension="xml" ContentType="application/xml"/>
                            let mut extension = None;
                            let mut content_type = None;

                            for attr in e.attributes() {
                                let attr = attr?;
                                match attr.key.as_ref() {
                                    b"Extension" => {
                                        extension = Some(attr.unescape_value()?.to_string());
                                    },
                                    b"ContentType" => {
                                        content_type = Some(attr.unescape_value()?.to_string());
                                    },
                                    _ => {},
                                }
                            }

                            if let (Some(ext), Some(ct)) = (extension, content_type) {
                                map.defaults.insert(ext.to_lowercase(), ct);
                            }
                        },
                        b"Override" => {
                            // <Override PartName="/word/document.xml" ContentType="..."/>
                            let mut partname = None;
                            let mut content_type = None;

                            for attr in e.attributes() {
                                let attr = attr?;
                                match attr.key.as_ref() {
                                    b"PartName" => {
                                        partname = Some(attr.unescape_value()?.to_string());
                                    },
                                    b"ContentType" => {
                                        content_type = Some(attr.unescape_value()?.to_string());
                                    },
                                    _ => {},
                                }
                            }

                            if let (Some(pn), Some(ct)) = (partname, content_type) {
                                map.overrides.insert(pn.to_lowercase(), ct);
                            }
                        },
                        _ => {},
                    }
                },
                Ok(Event::Eof) => break,
                Err(e) => {
                    return Err(OpcError::XmlError(format!(
                        "Content types parse error: {}",
                        e
                    )));
                },
                _ => {},
            }
            buf.clear();
        }

        Ok(map)
    }

    /// Get the content type for a ZIP member name.
    ///
    /// Part names compare case-insensitively. Checks for an override first,
    /// then falls back to the default for the member's extension.
    pub fn get(&self, membername: &str) -> Option<&str> {
        let partname = format!("/{}", membername.trim_start_matches('/')).to_lowercase();
        if let Some(ct) = self.overrides.get(&partname) {
            return Some(ct);
        }

        let ext = partname.rsplit_once('.').map(|(_, ext)| ext)?;
        if ext.contains('/') {
            return None;
        }
        self.defaults.get(ext).map(String::as_str)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    const CONTENT_TYPES: &[u8] = br#"<?xml version="1.0" encoding="UTF-8" standalone="yes"?>
<Types xmlns="http://schemas.openxmlformats.org/package/2006/content-types">
  <Default Extension="rels" ContentType="application/vnd.openxmlformats-package.relationships+xml"/>
  <Default Extension="XML" ContentType="application/xml"/>
  <Override PartName="/word/document.xml" ContentType="application/vnd.openxmlformats-officedocument.wordprocessingml.document.main+xml"/>
</Types>"#;

    #[test]
    fn test_content_type_lookup() {
        let map = ContentTypeMap::from_xml(CONTENT_TYPES).unwrap();
        assert_eq!(
            map.get("word/document.xml"),
            Some("application/vnd.openxmlformats-officedocument.wordprocessingml.document.main+xml")
        );
        assert_eq!(map.get("Word/Document.xml").map(|s| s.ends_with("main+xml")), Some(true));
        assert_eq!(map.get("word/styles.xml"), Some("application/xml"));
        assert_eq!(map.get("word/media/image1.png"), None);
        assert_eq!(map.get("word/noext"), None);
    }

    #[test]
    fn test_parse_rels() {
        let xml = br#"<?xml version="1.0" encoding="UTF-8"?>
<Relationships xmlns="http://schemas.openxmlformats.org/package/2006/relationships">
  <Relationship Id="rId2" Type="http://schemas.openxmlformats.org/package/2006/relationships/metadata/core-properties" Target="docProps/core.xml"/>
  <Relationship Id="rId1" Type="http://schemas.openxmlformats.org/officeDocument/2006/relationships/officeDocument" Target="/word/document.xml"/>
  <Relationship Id="rId9" Type="http://example.com/link" Target="https://example.com" TargetMode="External"/>
</Relationships>"#;

        let rels = parse_rels_xml(xml).unwrap();
        assert_eq!(rels.len(), 3);

        let main = rels.iter().find(|r| r.is_office_document()).unwrap();
        assert_eq!(main.r_id, "rId1");
        assert_eq!(main.target_membername().unwrap(), "word/document.xml");

        assert!(rels[2].is_external());
        assert!(rels[2].target_membername().is_err());
    }
}
