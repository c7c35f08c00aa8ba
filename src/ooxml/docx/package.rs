/// Package implementation for Word documents.
use crate::ooxml::error::{OoxmlError, Result};
use crate::ooxml::opc::constants::content_type as ct;
use crate::ooxml::opc::constants::{CONTENT_TYPES_MEMBER, PACKAGE_RELS_MEMBER};
use crate::ooxml::opc::pkgreader::parse_rels_xml;
use crate::ooxml::opc::{ContentTypeMap, PackageEntry, PhysPkgReader, PhysPkgWriter};
use std::fmt;
use std::path::Path;

/// A Word (.docx) package.
///
/// Holds every ZIP member of the source file, decompressed, plus the
/// location of the main document part. The package is never modified;
/// [`write_with_main`](Self::write_with_main) emits a copy in which only the
/// main part is replaced.
///
/// # Examples
///
/// ```rust,no_run
/// use longan::ooxml::docx::Package;
///
/// let pkg = Package::open("document.docx")?;
/// println!("{} ({})", pkg.main_part_name(), pkg.main_content_type());
/// # Ok::<(), Box<dyn std::error::Error>>(())
/// ```
pub struct Package {
    entries: Vec<PackageEntry>,
    /// Index of the main document part in `entries`
    main: usize,
    content_type: String,
}

impl Package {
    /// Open a .docx package from a file path.
    pub fn open<P: AsRef<Path>>(path: P) -> Result<Self> {
        let data = std::fs::read(path)?;
        Self::from_bytes(&data)
    }

    /// Read a .docx package from memory.
    ///
    /// The main part is the target of the package's `officeDocument`
    /// relationship, and its content type must be one of the
    /// WordprocessingML main types (document, template, macro-enabled).
    pub fn from_bytes(data: &[u8]) -> Result<Self> {
        let entries = PhysPkgReader::read_entries(data)?;

        let content_types = find_entry(&entries, CONTENT_TYPES_MEMBER)
            .ok_or_else(|| OoxmlError::PartNotFound(CONTENT_TYPES_MEMBER.to_string()))?;
        let content_types = ContentTypeMap::from_xml(&entries[content_types].data)?;

        let rels = find_entry(&entries, PACKAGE_RELS_MEMBER)
            .ok_or_else(|| OoxmlError::PartNotFound(PACKAGE_RELS_MEMBER.to_string()))?;
        let rels = parse_rels_xml(&entries[rels].data)?;

        let main_rel = rels
            .iter()
            .find(|rel| rel.is_office_document() && !rel.is_external())
            .ok_or_else(|| OoxmlError::PartNotFound("officeDocument relationship".to_string()))?;
        let main_name = main_rel.target_membername()?;

        let main = find_entry(&entries, &main_name)
            .ok_or_else(|| OoxmlError::PartNotFound(format!("main document part: {}", main_name)))?;

        let content_type = content_types.get(&entries[main].name).unwrap_or_default();
        if !ct::WML_MAIN_PARTS.contains(&content_type) {
            return Err(OoxmlError::InvalidContentType {
                expected: ct::WML_DOCUMENT_MAIN.to_string(),
                got: content_type.to_string(),
            });
        }
        let content_type = content_type.to_string();

        Ok(Self {
            entries,
            main,
            content_type,
        })
    }

    /// ZIP member name of the main document part (usually `word/document.xml`).
    #[inline]
    pub fn main_part_name(&self) -> &str {
        &self.entries[self.main].name
    }

    /// Content type of the main document part.
    #[inline]
    pub fn main_content_type(&self) -> &str {
        &self.content_type
    }

    /// XML of the main document part as loaded.
    #[inline]
    pub fn main_part_xml(&self) -> &[u8] {
        &self.entries[self.main].data
    }

    /// All members, in archive order.
    #[inline]
    pub fn entries(&self) -> &[PackageEntry] {
        &self.entries
    }

    /// Write the package with `main_xml` in place of the main document part.
    ///
    /// Member order and compression are kept. The output is deterministic:
    /// the same inputs always give the same bytes.
    pub fn write_with_main(&self, main_xml: &[u8]) -> Result<Vec<u8>> {
        let mut writer = PhysPkgWriter::new();
        for (i, entry) in self.entries.iter().enumerate() {
            let blob = if i == self.main { main_xml } else { &entry.data };
            writer.write_entry(entry, blob)?;
        }
        Ok(writer.finish()?)
    }
}

impl fmt::Debug for Package {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Package")
            .field("main_part", &self.main_part_name())
            .field("content_type", &self.content_type)
            .field("entries", &self.entries.len())
            .finish()
    }
}

/// Index of the member called `name`, preferring an exact match.
fn find_entry(entries: &[PackageEntry], name: &str) -> Option<usize> {
    entries
        .iter()
        .position(|e| !e.is_dir && e.name == name)
        .or_else(|| {
            entries
                .iter()
                .position(|e| !e.is_dir && e.name.eq_ignore_ascii_case(name))
        })
}
