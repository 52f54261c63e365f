//! Configuration management for the CLI
//!
//! This module handles loading and merging configuration from:
//! - Default values
//! - Configuration files (YAML/JSON)
//! - Environment variables
//! - Command-line arguments

use crate::error::{Error, Result};
use conform_core::EngineConfig;
use serde::{Deserialize, Serialize};
use std::path::{Path, PathBuf};

/// Main configuration structure
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(default)]
pub struct Config {
    /// Settings handed to the validation engine
    pub engine: EngineConfig,

    /// Message catalog overlaid on the built-in messages
    pub messages: Option<PathBuf>,

    /// Output settings
    pub output: OutputConfig,
}

/// Output configuration
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct OutputConfig {
    /// Use colored output by default
    pub color: bool,
}

impl Default for OutputConfig {
    fn default() -> Self {
        Self { color: true }
    }
}

impl Config {
    /// Load configuration from a file
    pub fn from_file(path: &Path) -> Result<Self> {
        if !path.exists() {
            return Err(Error::FileNotFound {
                path: path.to_path_buf(),
            });
        }

        conform_core::loader::read_document(path)
            .map_err(|e| Error::config(format!("{}: {}", path.display(), e)))
    }

    /// Load configuration from default locations
    pub fn load() -> Result<Self> {
        for path in Self::default_config_paths() {
            if path.exists() {
                match Self::from_file(&path) {
                    Ok(config) => {
                        tracing::debug!(path = %path.display(), "Loaded configuration");
                        return Ok(config);
                    }
                    Err(e) => {
                        tracing::warn!(path = %path.display(), "Failed to load config: {}", e);
                    }
                }
            }
        }

        Ok(Self::default())
    }

    /// Load configuration from a specific file or default locations, then
    /// apply environment overrides
    pub fn load_with_file(file: Option<&Path>) -> Result<Self> {
        let mut config = match file {
            Some(path) => Self::from_file(path)?,
            None => Self::load()?,
        };
        config.engine.merge_with_env();
        Ok(config)
    }

    /// Get default configuration file paths to check
    fn default_config_paths() -> Vec<PathBuf> {
        let mut paths = vec![
            PathBuf::from("conform.yaml"),
            PathBuf::from("conform.json"),
            PathBuf::from(".conform.yaml"),
            PathBuf::from(".conform.json"),
        ];

        if let Some(config_dir) = dirs::config_dir() {
            let conform_dir = config_dir.join("conform");
            paths.push(conform_dir.join("config.yaml"));
            paths.push(conform_dir.join("config.json"));
        }

        paths
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use conform_core::{InputType, ValidationMode};
    use std::io::Write;

    #[test]
    fn test_defaults() {
        let config = Config::default();
        assert_eq!(config.engine, EngineConfig::default());
        assert!(config.messages.is_none());
        assert!(config.output.color);
    }

    #[test]
    fn test_from_yaml_file() {
        let mut file = tempfile::Builder::new().suffix(".yaml").tempfile().unwrap();
        writeln!(
            file,
            "engine:\n  validation-mode: fail-fast\n  input-type: json\nmessages: messages/custom.json\noutput:\n  color: false"
        )
        .unwrap();

        let config = Config::from_file(file.path()).unwrap();
        assert_eq!(config.engine.validation_mode, ValidationMode::FailFast);
        assert_eq!(config.engine.input_type, InputType::Json);
        assert_eq!(config.engine.locale, "en");
        assert_eq!(config.messages, Some(PathBuf::from("messages/custom.json")));
        assert!(!config.output.color);
    }

    #[test]
    fn test_missing_and_malformed_files() {
        assert!(matches!(
            Config::from_file(Path::new("/nonexistent/conform.yaml")),
            Err(Error::FileNotFound { .. })
        ));

        let mut file = tempfile::Builder::new().suffix(".json").tempfile().unwrap();
        write!(file, r#"{{"engine": {{"validation-mode": "eventually"}}}}"#).unwrap();
        assert!(matches!(Config::from_file(file.path()), Err(Error::Config(_))));
    }

    #[test]
    fn test_default_paths_prefer_working_directory() {
        let paths = Config::default_config_paths();
        assert_eq!(paths[0], PathBuf::from("conform.yaml"));
        assert!(paths.iter().all(|p| p.extension().is_some()));
    }
}
