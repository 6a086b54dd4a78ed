//! Configuration Store Loader
//!
//! Fetches the manufacturer document (falling back to the default
//! document only when the manufacturer one is absent) and parses it.

use std::io;
use std::path::{Path, PathBuf};

use tracing::debug;

use crate::error::{ConfigError, Result};
use crate::manufacturer::ManufacturerConfig;

/// Name of the fallback document
pub const DEFAULT_DOCUMENT: &str = "default";

/// Document extension
const DOCUMENT_EXTENSION: &str = "json";

/// Source of configuration document bytes
pub trait DocumentSource {
    /// Fetch a document by file name
    ///
    /// `Ok(None)` means the document does not exist; any other failure to
    /// read it is an error.
    fn fetch(&self, document_name: &str) -> io::Result<Option<Vec<u8>>>;

    /// Names of all documents the source can enumerate
    fn document_names(&self) -> Vec<String> {
        Vec::new()
    }
}

impl<F> DocumentSource for F
where
    F: Fn(&str) -> Option<Vec<u8>>,
{
    fn fetch(&self, document_name: &str) -> io::Result<Option<Vec<u8>>> {
        Ok(self(document_name))
    }
}

/// Documents compiled into the binary
#[derive(Debug, Clone, Copy, Default)]
pub struct BundledSource;

impl BundledSource {
    const DOCUMENTS: &'static [(&'static str, &'static [u8])] = &[
        ("default.json", include_bytes!("../assets/default.json")),
        ("xiaomi.json", include_bytes!("../assets/xiaomi.json")),
        ("honor.json", include_bytes!("../assets/honor.json")),
        ("huawei.json", include_bytes!("../assets/huawei.json")),
        ("vivo.json", include_bytes!("../assets/vivo.json")),
    ];
}

impl DocumentSource for BundledSource {
    fn fetch(&self, document_name: &str) -> io::Result<Option<Vec<u8>>> {
        Ok(Self::DOCUMENTS
            .iter()
            .find(|(name, _)| *name == document_name)
            .map(|(_, bytes)| bytes.to_vec()))
    }

    fn document_names(&self) -> Vec<String> {
        Self::DOCUMENTS.iter().map(|(name, _)| name.to_string()).collect()
    }
}

/// Documents stored as `<root>/<name>.json`
#[derive(Debug, Clone)]
pub struct DirectorySource {
    root: PathBuf,
}

impl DirectorySource {
    /// Create a source reading from a directory
    pub fn new(root: impl Into<PathBuf>) -> Self {
        Self { root: root.into() }
    }

    /// Directory the documents are read from
    pub fn root(&self) -> &Path {
        &self.root
    }
}

impl DocumentSource for DirectorySource {
    fn fetch(&self, document_name: &str) -> io::Result<Option<Vec<u8>>> {
        let path = self.root.join(document_name);
        match std::fs::read(&path) {
            Ok(bytes) => Ok(Some(bytes)),
            Err(e) if e.kind() == io::ErrorKind::NotFound => Ok(None),
            Err(e) => Err(io::Error::new(e.kind(), format!("{}: {}", path.display(), e))),
        }
    }

    fn document_names(&self) -> Vec<String> {
        let Ok(entries) = std::fs::read_dir(&self.root) else {
            return Vec::new();
        };

        let mut names: Vec<String> = entries
            .flatten()
            .map(|entry| entry.path())
            .filter(|path| path.extension().is_some_and(|ext| ext == DOCUMENT_EXTENSION))
            .filter_map(|path| path.file_name().map(|n| n.to_string_lossy().into_owned()))
            .collect();
        names.sort();
        names
    }
}

/// Configuration loader
pub struct ConfigLoader;

impl ConfigLoader {
    /// Normalize a manufacturer identifier (e.g., "Xiaomi " -> "xiaomi")
    pub fn normalize(manufacturer_id: &str) -> String {
        manufacturer_id.trim().to_lowercase()
    }

    /// Document file name for a manufacturer
    pub fn document_name(manufacturer_id: &str) -> String {
        format!("{}.{}", Self::normalize(manufacturer_id), DOCUMENT_EXTENSION)
    }

    /// Load the configuration for a manufacturer
    ///
    /// Only an absent manufacturer document falls back to the default
    /// document; a malformed or unreadable one is reported as-is.
    pub fn load(manufacturer_id: &str, source: &dyn DocumentSource) -> Result<ManufacturerConfig> {
        let normalized = Self::normalize(manufacturer_id);

        if !normalized.is_empty() {
            let name = Self::document_name(&normalized);
            if let Some(bytes) = source.fetch(&name)? {
                debug!("Loaded configuration document {}", name);
                return ManufacturerConfig::from_slice(&name, &bytes);
            }
            debug!("No document for '{}', trying {}", normalized, DEFAULT_DOCUMENT);
        }

        let name = Self::document_name(DEFAULT_DOCUMENT);
        match source.fetch(&name)? {
            Some(bytes) => ManufacturerConfig::from_slice(&name, &bytes),
            None => Err(ConfigError::NotFound {
                manufacturer: manufacturer_id.to_string(),
            }),
        }
    }

    /// Load a single named document without fallback
    pub fn load_document(document_name: &str, source: &dyn DocumentSource) -> Result<ManufacturerConfig> {
        let bytes = source.fetch(document_name)?.ok_or_else(|| ConfigError::NotFound {
            manufacturer: document_name.trim_end_matches(".json").to_string(),
        })?;
        ManufacturerConfig::from_slice(document_name, &bytes)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::catalog::CapabilityId;
    use std::collections::HashMap;

    const DEFAULT_DOC: &str = r#"{
        "comment": "default",
        "default_settings": [
            {
                "id": "battery_optimization",
                "title": "Battery",
                "description": "Ignore battery optimizations",
                "intent": { "action": "android.settings.REQUEST_IGNORE_BATTERY_OPTIMIZATIONS" }
            }
        ]
    }"#;

    const ACME_DOC: &str = r#"{
        "comment": "acme",
        "default_settings": [
            {
                "id": "alert_window",
                "title": "Overlay",
                "description": "Draw over other apps",
                "intent": { "permission": "android.permission.SYSTEM_ALERT_WINDOW" }
            }
        ]
    }"#;

    fn source(docs: &[(&str, &str)]) -> impl Fn(&str) -> Option<Vec<u8>> {
        let docs: HashMap<String, Vec<u8>> = docs
            .iter()
            .map(|(name, body)| (name.to_string(), body.as_bytes().to_vec()))
            .collect();
        move |name: &str| docs.get(name).cloned()
    }

    #[test]
    fn test_manufacturer_document_preferred() {
        let src = source(&[("acme.json", ACME_DOC), ("default.json", DEFAULT_DOC)]);
        let config = ConfigLoader::load("ACME", &src).unwrap();
        assert_eq!(config.default_settings[0].id, CapabilityId::AlertWindow);
    }

    #[test]
    fn test_falls_back_to_default_when_absent() {
        let src = source(&[("default.json", DEFAULT_DOC)]);
        let config = ConfigLoader::load("acme", &src).unwrap();
        assert_eq!(config.default_settings[0].id, CapabilityId::BatteryOptimization);
    }

    #[test]
    fn test_both_absent_is_not_found() {
        let src = source(&[]);
        let err = ConfigLoader::load("acme", &src).unwrap_err();
        assert!(matches!(err, ConfigError::NotFound { ref manufacturer } if manufacturer == "acme"));
    }

    #[test]
    fn test_malformed_manufacturer_document_not_masked() {
        let src = source(&[("acme.json", "{ not json"), ("default.json", DEFAULT_DOC)]);
        let err = ConfigLoader::load("acme", &src).unwrap_err();
        assert!(matches!(err, ConfigError::Malformed { ref document, .. } if document == "acme.json"));
    }

    #[test]
    fn test_empty_manufacturer_uses_default() {
        let src = source(&[("default.json", DEFAULT_DOC)]);
        assert!(ConfigLoader::load("  ", &src).is_ok());
    }

    #[test]
    fn test_bundled_documents_are_valid() {
        let bundled = BundledSource;
        let names = bundled.document_names();
        assert!(names.contains(&"default.json".to_string()));

        for name in names {
            let config = ConfigLoader::load_document(&name, &bundled);
            assert!(config.is_ok(), "{} failed: {:?}", name, config.err());
        }
    }

    #[test]
    fn test_directory_source() {
        let dir = tempfile::tempdir().unwrap();
        std::fs::write(dir.path().join("default.json"), DEFAULT_DOC).unwrap();
        std::fs::write(dir.path().join("notes.txt"), "ignored").unwrap();

        let src = DirectorySource::new(dir.path());
        assert_eq!(src.document_names(), vec!["default.json".to_string()]);
        assert!(src.fetch("acme.json").unwrap().is_none());

        let config = ConfigLoader::load("acme", &src).unwrap();
        assert_eq!(config.comment, "default");
    }

    #[test]
    fn test_unreadable_manufacturer_document_not_masked() {
        let dir = tempfile::tempdir().unwrap();
        std::fs::write(dir.path().join("default.json"), DEFAULT_DOC).unwrap();
        std::fs::create_dir(dir.path().join("acme.json")).unwrap();

        let src = DirectorySource::new(dir.path());
        assert!(src.fetch("acme.json").is_err());

        let err = ConfigLoader::load("acme", &src).unwrap_err();
        assert!(matches!(err, ConfigError::Io(_)));
        assert!(!err.is_missing_personalization());
    }
}
