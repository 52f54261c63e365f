//! Engine configuration
//!
//! Settings come from, in increasing precedence:
//! - Default values
//! - A configuration file (YAML/JSON)
//! - Environment variables (`CONFORM_VALIDATION_MODE`, `CONFORM_LOCALE`,
//!   `CONFORM_INPUT_TYPE`)
//!
//! Copyright (c) 2025 Conform Team
//! Licensed under the Apache-2.0 license

use crate::error::{Error, Result};
use crate::input::InputType;
use crate::loader::{self, Format};
use crate::validation::ValidationMode;
use serde::{Deserialize, Serialize};
use std::path::Path;

/// Environment variable overriding [`EngineConfig::validation_mode`]
pub const ENV_VALIDATION_MODE: &str = "CONFORM_VALIDATION_MODE";
/// Environment variable overriding [`EngineConfig::locale`]
pub const ENV_LOCALE: &str = "CONFORM_LOCALE";
/// Environment variable overriding [`EngineConfig::input_type`]
pub const ENV_INPUT_TYPE: &str = "CONFORM_INPUT_TYPE";

/// Default bound on schema nesting
pub const DEFAULT_MAX_DEPTH: usize = 32;

/// Settings an [`Engine`](crate::validation::Engine) is built from
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default, rename_all = "kebab-case", deny_unknown_fields)]
pub struct EngineConfig {
    /// Shape raw input must arrive in
    pub input_type: InputType,

    /// Fail-fast or collect-all reporting
    pub validation_mode: ValidationMode,

    /// Locale of the built-in message catalog
    pub locale: String,

    /// Deepest schema nesting a payload may reach
    pub max_depth: usize,
}

impl Default for EngineConfig {
    fn default() -> Self {
        Self {
            input_type: InputType::Array,
            validation_mode: ValidationMode::CollectAll,
            locale: "en".to_string(),
            max_depth: DEFAULT_MAX_DEPTH,
        }
    }
}

impl EngineConfig {
    /// Load configuration from a YAML or JSON file
    pub fn from_file(path: &Path) -> Result<Self> {
        let config: Self = loader::read_document(path).map_err(|e| match e {
            Error::UnsupportedFormat { .. } => e,
            other => Error::configuration(other.to_string()),
        })?;
        config.check()?;
        Ok(config)
    }

    /// Parse configuration text in the given format
    pub fn from_str_with_format(content: &str, format: Format) -> Result<Self> {
        let config: Self = loader::parse_document(content, format, Path::new("<inline>"))
            .map_err(|e| Error::configuration(e.to_string()))?;
        config.check()?;
        Ok(config)
    }

    /// Apply overrides from the process environment
    pub fn merge_with_env(&mut self) {
        self.merge_with_lookup(|name| std::env::var(name).ok());
    }

    /// Apply overrides from `lookup`; values that do not parse are ignored
    pub fn merge_with_lookup<F>(&mut self, lookup: F)
    where
        F: Fn(&str) -> Option<String>,
    {
        if let Some(value) = lookup(ENV_VALIDATION_MODE) {
            match value.parse() {
                Ok(mode) => self.validation_mode = mode,
                Err(e) => tracing::warn!(variable = ENV_VALIDATION_MODE, %value, "Ignoring override: {}", e),
            }
        }

        if let Some(value) = lookup(ENV_LOCALE) {
            if value.trim().is_empty() {
                tracing::warn!(variable = ENV_LOCALE, "Ignoring empty override");
            } else {
                self.locale = value;
            }
        }

        if let Some(value) = lookup(ENV_INPUT_TYPE) {
            match value.parse() {
                Ok(input_type) => self.input_type = input_type,
                Err(e) => tracing::warn!(variable = ENV_INPUT_TYPE, %value, "Ignoring override: {}", e),
            }
        }
    }

    /// Builder-style setter for the validation mode
    pub fn with_mode(mut self, mode: ValidationMode) -> Self {
        self.validation_mode = mode;
        self
    }

    /// Builder-style setter for the locale
    pub fn with_locale(mut self, locale: impl Into<String>) -> Self {
        self.locale = locale.into();
        self
    }

    /// Builder-style setter for the input type
    pub fn with_input_type(mut self, input_type: InputType) -> Self {
        self.input_type = input_type;
        self
    }

    fn check(&self) -> Result<()> {
        if self.max_depth == 0 {
            return Err(Error::configuration("max-depth must be at least 1"));
        }
        if self.locale.trim().is_empty() {
            return Err(Error::configuration("locale must not be empty"));
        }
        Ok(())
    }
}
