//! Configuration options for variant generation.
use crate::common::{Error, Result};
use serde::Deserialize;
use std::path::Path;

/// Placeholder replaced by the 1-based variant number in file names.
pub const VARIANT_NUMBER_PLACEHOLDER: &str = "{n}";

/// How each variant gets its own copy of the template.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum CloneStrategy {
    /// Copy the in-memory document
    #[default]
    Deep,
    /// Serialize the template and parse the bytes again
    RoundTrip,
}

/// Configuration options for variant generation.
///
/// Can be built in code or loaded from YAML:
///
/// ```yaml
/// clone_strategy: round_trip
/// parallel: true
/// file_name_pattern: "report_{n}.docx"
/// ```
#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct GeneratorOptions {
    /// How the template is copied for each variant
    pub clone_strategy: CloneStrategy,
    /// Build variants on the rayon thread pool (output order is unchanged)
    pub parallel: bool,
    /// Output file name; `{n}` is the 1-based variant number
    pub file_name_pattern: String,
}

impl Default for GeneratorOptions {
    fn default() -> Self {
        Self {
            clone_strategy: CloneStrategy::Deep,
            parallel: false,
            file_name_pattern: "document_{n}.docx".to_string(),
        }
    }
}

impl GeneratorOptions {
    /// Create new generator options with default settings.
    pub fn new() -> Self {
        Self::default()
    }

    /// Set the clone strategy.
    pub fn with_clone_strategy(mut self, strategy: CloneStrategy) -> Self {
        self.clone_strategy = strategy;
        self
    }

    /// Enable or disable parallel generation.
    pub fn with_parallel(mut self, parallel: bool) -> Self {
        self.parallel = parallel;
        self
    }

    /// Set the output file name pattern.
    pub fn with_file_name_pattern(mut self, pattern: impl Into<String>) -> Self {
        self.file_name_pattern = pattern.into();
        self
    }

    /// Parse options from YAML. Missing keys keep their defaults.
    pub fn from_yaml(yaml: &str) -> Result<Self> {
        if yaml.trim().is_empty() {
            return Ok(Self::default());
        }
        serde_saphyr::from_str(yaml)
            .map_err(|e| Error::Other(format!("Failed to parse generator options: {}", e)))
    }

    /// Load options from a YAML file.
    pub fn load<P: AsRef<Path>>(path: P) -> Result<Self> {
        let yaml = std::fs::read_to_string(path)?;
        Self::from_yaml(&yaml)
    }

    /// File name of variant `index` (0-based).
    pub fn file_name(&self, index: usize) -> String {
        let mut number = itoa::Buffer::new();
        self.file_name_pattern
            .replace(VARIANT_NUMBER_PLACEHOLDER, number.format(index + 1))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_defaults() {
        let options = GeneratorOptions::new();
        assert_eq!(options.clone_strategy, CloneStrategy::Deep);
        assert!(!options.parallel);
        assert_eq!(options.file_name(0), "document_1.docx");
        assert_eq!(options.file_name(11), "document_12.docx");
    }

    #[test]
    fn test_builder() {
        let options = GeneratorOptions::new()
            .with_clone_strategy(CloneStrategy::RoundTrip)
            .with_parallel(true)
            .with_file_name_pattern("v{n}-of-set.docx");
        assert_eq!(options.clone_strategy, CloneStrategy::RoundTrip);
        assert!(options.parallel);
        assert_eq!(options.file_name(2), "v3-of-set.docx");
    }

    #[test]
    fn test_from_yaml() {
        let options = GeneratorOptions::from_yaml("clone_strategy: round_trip\nparallel: true\n").unwrap();
        assert_eq!(options.clone_strategy, CloneStrategy::RoundTrip);
        assert!(options.parallel);
        assert_eq!(options.file_name_pattern, "document_{n}.docx");

        assert_eq!(GeneratorOptions::from_yaml("").unwrap(), GeneratorOptions::default());
        assert!(GeneratorOptions::from_yaml("parallel: maybe\n").is_err());
        assert!(GeneratorOptions::from_yaml("unknown_key: 1\n").is_err());
    }

    #[test]
    fn test_load_file() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("longan.yaml");
        std::fs::write(&path, "file_name_pattern: \"out_{n}.docx\"\n").unwrap();

        let options = GeneratorOptions::load(&path).unwrap();
        assert_eq!(options.file_name(0), "out_1.docx");
    }
}
