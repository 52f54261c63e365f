//! Error types for the Conform core library
//!
//! Only fatal conditions live here: a malformed schema, configuration or
//! message catalog, and raw input that cannot be normalized. A payload that
//! fails a field rule is never an `Error`; it is reported through
//! [`crate::validation::ValidationOutcome`].
//!
//! Copyright (c) 2025 Conform Team
//! Licensed under the Apache-2.0 license

use std::path::PathBuf;
use thiserror::Error;

/// Main error type for Conform operations
#[derive(Error, Debug)]
pub enum Error {
    /// A schema declares a type tag outside the supported set
    #[error("Unknown type '{tag}' declared for field '{field}'")]
    UnknownType { field: String, tag: String },

    /// A schema declaration is structurally invalid
    #[error("Invalid schema for field '{field}': {message}")]
    InvalidSchema { field: String, message: String },

    /// Configuration could not be read or understood
    #[error("Configuration error: {message}")]
    Configuration { message: String },

    /// No message catalog exists for the requested locale
    #[error("No message catalog available for locale '{locale}'")]
    UnknownLocale { locale: String },

    /// Raw input cannot be turned into structured data under the declared input type
    #[error("Input shape error ({input_type}): {message}")]
    InputShape { input_type: String, message: String },

    /// Schema nesting went deeper than the configured bound
    #[error("Schema nesting exceeds the maximum depth of {max_depth}")]
    DepthLimitExceeded { max_depth: usize },

    /// Unsupported file format
    #[error("Unsupported file format for '{}'. Expected .yaml, .yml, or .json", path.display())]
    UnsupportedFormat { path: PathBuf },

    /// File I/O errors
    #[error("Failed to read file '{}': {source}", path.display())]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    /// JSON parsing errors
    #[error("Failed to parse JSON from '{}': {source}", path.display())]
    Json {
        path: PathBuf,
        #[source]
        source: serde_json::Error,
    },

    /// YAML parsing errors
    #[error("Failed to parse YAML from '{}': {source}", path.display())]
    Yaml {
        path: PathBuf,
        #[source]
        source: serde_yaml::Error,
    },
}

/// Convenience type alias for Results using our Error type
pub type Result<T> = std::result::Result<T, Error>;

impl Error {
    /// Create a configuration error
    pub fn configuration(message: impl Into<String>) -> Self {
        Self::Configuration {
            message: message.into(),
        }
    }

    /// Create an invalid schema error
    pub fn invalid_schema(field: impl Into<String>, message: impl Into<String>) -> Self {
        Self::InvalidSchema {
            field: field.into(),
            message: message.into(),
        }
    }

    /// Create an input shape error
    pub fn input_shape(input_type: impl Into<String>, message: impl Into<String>) -> Self {
        Self::InputShape {
            input_type: input_type.into(),
            message: message.into(),
        }
    }

    /// Whether this error comes from a malformed schema, config or catalog
    pub fn is_configuration(&self) -> bool {
        !matches!(self, Self::InputShape { .. })
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_error_display() {
        let err = Error::UnknownType {
            field: "age".to_string(),
            tag: "Integer".to_string(),
        };
        assert_eq!(err.to_string(), "Unknown type 'Integer' declared for field 'age'");

        let err = Error::DepthLimitExceeded { max_depth: 4 };
        assert_eq!(err.to_string(), "Schema nesting exceeds the maximum depth of 4");
    }

    #[test]
    fn test_configuration_classification() {
        assert!(Error::configuration("bad").is_configuration());
        assert!(Error::invalid_schema("f", "bad").is_configuration());
        assert!(!Error::input_shape("json", "not an object").is_configuration());
    }
}
