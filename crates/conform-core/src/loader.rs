//! Document loading for schema declarations, engine configuration and
//! message catalogs
//!
//! All three are plain JSON or YAML documents; the format is chosen from the
//! file extension.
//!
//! Copyright (c) 2025 Conform Team
//! Licensed under the Apache-2.0 license

use crate::error::{Error, Result};
use serde::de::DeserializeOwned;
use std::path::Path;

/// Supported document formats
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Format {
    /// YAML format (.yaml, .yml)
    Yaml,
    /// JSON format (.json)
    Json,
}

impl Format {
    /// Detect format from file extension
    pub fn from_path(path: &Path) -> Result<Self> {
        match path
            .extension()
            .and_then(|ext| ext.to_str())
            .map(|ext| ext.to_lowercase())
            .as_deref()
        {
            Some("yaml") | Some("yml") => Ok(Format::Yaml),
            Some("json") => Ok(Format::Json),
            _ => Err(Error::UnsupportedFormat {
                path: path.to_path_buf(),
            }),
        }
    }

    /// Get file extensions for this format
    pub fn extensions(&self) -> &'static [&'static str] {
        match self {
            Format::Yaml => &["yaml", "yml"],
            Format::Json => &["json"],
        }
    }
}

/// Read and deserialize a document, detecting its format from the extension
pub fn read_document<T: DeserializeOwned>(path: &Path) -> Result<T> {
    let format = Format::from_path(path)?;
    let content = std::fs::read_to_string(path).map_err(|source| Error::Io {
        path: path.to_path_buf(),
        source,
    })?;

    tracing::debug!(path = %path.display(), ?format, bytes = content.len(), "Read document");
    parse_document(&content, format, path)
}

/// Deserialize document content with an explicit format; `path` is only
/// used for error context
pub fn parse_document<T: DeserializeOwned>(content: &str, format: Format, path: &Path) -> Result<T> {
    match format {
        Format::Yaml => serde_yaml::from_str(content).map_err(|source| Error::Yaml {
            path: path.to_path_buf(),
            source,
        }),
        Format::Json => serde_json::from_str(content).map_err(|source| Error::Json {
            path: path.to_path_buf(),
            source,
        }),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::collections::BTreeMap;
    use std::io::Write;
    use tempfile::Builder;

    #[test]
    fn test_format_from_path() {
        assert_eq!(Format::from_path(Path::new("a.json")).unwrap(), Format::Json);
        assert_eq!(Format::from_path(Path::new("a.YML")).unwrap(), Format::Yaml);
        assert_eq!(Format::from_path(Path::new("a.yaml")).unwrap(), Format::Yaml);
        assert!(matches!(
            Format::from_path(Path::new("a.toml")),
            Err(Error::UnsupportedFormat { .. })
        ));
        assert!(Format::from_path(Path::new("noext")).is_err());
    }

    #[test]
    fn test_read_yaml_document() {
        let mut file = Builder::new().suffix(".yaml").tempfile().unwrap();
        writeln!(file, "locale: pt-BR").unwrap();

        let doc: BTreeMap<String, String> = read_document(file.path()).unwrap();
        assert_eq!(doc.get("locale").map(String::as_str), Some("pt-BR"));
    }

    #[test]
    fn test_malformed_json_is_reported_with_path() {
        let mut file = Builder::new().suffix(".json").tempfile().unwrap();
        write!(file, "{{ not json").unwrap();

        let err = read_document::<BTreeMap<String, String>>(file.path()).unwrap_err();
        match err {
            Error::Json { path, .. } => assert_eq!(path, file.path()),
            other => panic!("expected JSON error, got {:?}", other),
        }
    }

    #[test]
    fn test_missing_file() {
        let err = read_document::<BTreeMap<String, String>>(Path::new("/nonexistent/conform.json")).unwrap_err();
        assert!(matches!(err, Error::Io { .. }));
    }
}
