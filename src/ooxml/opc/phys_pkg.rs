//! Provides a general interface to a physical OPC package (ZIP file).
//!
//! The reader loads every member eagerly: variant generation re-emits the
//! whole package many times, so the members are decompressed once and kept
//! as owned blobs.

use crate::ooxml::opc::error::{OpcError, Result};
use std::io::{Cursor, Read, Write};
use zip::write::SimpleFileOptions;
use zip::{CompressionMethod, ZipArchive, ZipWriter};

/// One member of the physical package.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PackageEntry {
    /// Member name inside the ZIP archive (e.g., `word/document.xml`)
    pub name: String,
    /// Decompressed content
    pub data: Vec<u8>,
    /// How the member was stored in the source archive
    pub compression: CompressionMethod,
    /// Whether the member is a directory record
    pub is_dir: bool,
}

/// Physical package reader over an in-memory ZIP archive.
pub struct PhysPkgReader;

impl PhysPkgReader {
    /// Read every member of a ZIP archive, in central-directory order.
    ///
    /// # Errors
    ///
    /// Returns `OpcError::ZipError` if the bytes are not a readable ZIP archive
    /// or a member cannot be decompressed.
    pub fn read_entries(data: &[u8]) -> Result<Vec<PackageEntry>> {
        let mut archive = ZipArchive::new(Cursor::new(data))?;
        let mut entries = Vec::with_capacity(archive.len());

        for i in 0..archive.len() {
            let mut file = archive.by_index(i)?;
            // The declared size comes from the archive and is not trusted
            let capacity = (file.size() as usize).min(data.len().saturating_mul(4));
            let mut content = Vec::with_capacity(capacity);
            file.read_to_end(&mut content)
                .map_err(|e| OpcError::ZipError(format!("{}: {}", file.name(), e)))?;

            entries.push(PackageEntry {
                name: file.name().to_string(),
                data: content,
                compression: file.compression(),
                is_dir: file.is_dir(),
            });
        }

        Ok(entries)
    }
}

/// Physical package writer for creating OPC packages.
///
/// All members get the same fixed modification time so that equal content
/// always serializes to equal bytes.
pub struct PhysPkgWriter {
    /// The underlying ZIP archive writer
    archive: ZipWriter<Cursor<Vec<u8>>>,
}

impl PhysPkgWriter {
    /// Create a new package writer that writes to memory.
    pub fn new() -> Self {
        Self {
            archive: ZipWriter::new(Cursor::new(Vec::new())),
        }
    }

    fn options(method: CompressionMethod) -> SimpleFileOptions {
        SimpleFileOptions::default()
            .compression_method(method)
            .last_modified_time(zip::DateTime::default())
    }

    /// Write a part to the package with Deflate compression.
    pub fn write(&mut self, name: &str, blob: &[u8]) -> Result<()> {
        self.write_with(name, blob, CompressionMethod::Deflated)
    }

    /// Write a part to the package without compression (stored).
    pub fn write_stored(&mut self, name: &str, blob: &[u8]) -> Result<()> {
        self.write_with(name, blob, CompressionMethod::Stored)
    }

    fn write_with(&mut self, name: &str, blob: &[u8], method: CompressionMethod) -> Result<()> {
        self.archive.start_file(name, Self::options(method))?;
        self.archive.write_all(blob)?;
        Ok(())
    }

    /// Write an entry back with the compression it was read with.
    ///
    /// Methods other than stored are re-encoded as Deflate.
    pub fn write_entry(&mut self, entry: &PackageEntry, blob: &[u8]) -> Result<()> {
        if entry.is_dir {
            self.archive
                .add_directory(entry.name.as_str(), Self::options(CompressionMethod::Stored))?;
            return Ok(());
        }

        match entry.compression {
            CompressionMethod::Stored => self.write_stored(&entry.name, blob),
            _ => self.write(&entry.name, blob),
        }
    }

    /// Finish writing and return the package bytes.
    pub fn finish(self) -> Result<Vec<u8>> {
        self.archive
            .finish()
            .map(Cursor::into_inner)
            .map_err(|e| OpcError::ZipError(e.to_string()))
    }
}

impl Default for PhysPkgWriter {
    fn default() -> Self {
        Self::new()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_round_trip() {
        let mut writer = PhysPkgWriter::new();
        writer.write("test.txt", b"Hello, World!").unwrap();
        let zip_data = writer.finish().unwrap();

        let entries = PhysPkgReader::read_entries(&zip_data).unwrap();
        assert_eq!(entries.len(), 1);
        assert_eq!(entries[0].name, "test.txt");
        assert_eq!(entries[0].data, b"Hello, World!");
        assert_eq!(entries[0].compression, CompressionMethod::Deflated);
    }

    #[test]
    fn test_entry_order_and_compression_preserved() {
        let mut writer = PhysPkgWriter::new();
        writer.write("[Content_Types].xml", b"<Types/>").unwrap();
        writer.write_stored("_rels/.rels", b"<Relationships/>").unwrap();
        writer.write("word/document.xml", b"<document/>").unwrap();
        let first = writer.finish().unwrap();

        let entries = PhysPkgReader::read_entries(&first).unwrap();
        let names: Vec<_> = entries.iter().map(|e| e.name.as_str()).collect();
        assert_eq!(names, ["[Content_Types].xml", "_rels/.rels", "word/document.xml"]);
        assert_eq!(entries[1].compression, CompressionMethod::Stored);

        let mut writer = PhysPkgWriter::new();
        for entry in &entries {
            writer.write_entry(entry, &entry.data).unwrap();
        }
        let second = writer.finish().unwrap();
        assert_eq!(first, second);
    }

    #[test]
    fn test_corrupt_member_is_zip_error() {
        let text = "The quick brown fox jumps over the lazy dog. ".repeat(64);
        let mut writer = PhysPkgWriter::new();
        writer.write("word/document.xml", text.as_bytes()).unwrap();
        let mut zip_data = writer.finish().unwrap();

        // Compressed data follows the 30-byte local header, the name and the extra field
        let name_len = u16::from_le_bytes([zip_data[26], zip_data[27]]) as usize;
        let extra_len = u16::from_le_bytes([zip_data[28], zip_data[29]]) as usize;
        let offset = 30 + name_len + extra_len;
        for byte in &mut zip_data[offset..offset + 20] {
            *byte ^= 0xA5;
        }

        let result = PhysPkgReader::read_entries(&zip_data);
        assert!(matches!(result, Err(OpcError::ZipError(_))), "{:?}", result);
    }

    #[test]
    fn test_not_a_zip() {
        let result = PhysPkgReader::read_entries(b"definitely not a zip archive");
        assert!(matches!(result, Err(OpcError::ZipError(_))));
    }
}
