//! Field-level validation of structured payloads against a [`Schema`]
//!
//! The [`Engine`] walks the schema in declaration order. Per field it runs the
//! presence and emptiness rules from [`common`], then hands the value to the
//! validator family for its declared type:
//!
//! - **Text** ([`text`]): String, Email, Name, Url, Enum, Phone, CPF, CNPJ, UUID
//! - **Numeric** ([`number`]): Int, Decimal, Bool
//! - **Schema** ([`nested`]): a nested object or a list of objects
//!
//! Two modes control how much is reported:
//!
//! - **CollectAll**: every failing field gets an entry
//! - **FailFast**: validation stops at the first failure
//!
//! [`Schema`]: crate::schema::Schema
//!
//! Copyright (c) 2025 Conform Team
//! Licensed under the Apache-2.0 license

pub mod common;
pub mod engine;
pub mod nested;
pub mod number;
pub mod outcome;
pub mod text;

use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

pub use engine::Engine;
pub use outcome::{ErrorMap, FieldError, ValidationOutcome};

/// Result of a single rule: `Err` holds the translated message
pub type RuleResult = std::result::Result<(), String>;

/// How many failures a validation pass reports
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum ValidationMode {
    /// Stop at the first failing field (or list item)
    FailFast,
    /// Check every field and report all failures
    #[default]
    CollectAll,
}

impl ValidationMode {
    pub fn is_fail_fast(&self) -> bool {
        matches!(self, ValidationMode::FailFast)
    }

    pub fn as_str(&self) -> &'static str {
        match self {
            ValidationMode::FailFast => "fail-fast",
            ValidationMode::CollectAll => "collect-all",
        }
    }
}

impl fmt::Display for ValidationMode {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for ValidationMode {
    type Err = crate::error::Error;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_lowercase().replace('_', "-").as_str() {
            "fail-fast" | "failfast" => Ok(ValidationMode::FailFast),
            "collect-all" | "collectall" => Ok(ValidationMode::CollectAll),
            other => Err(crate::error::Error::configuration(format!(
                "unknown validation mode '{}', expected 'fail-fast' or 'collect-all'",
                other
            ))),
        }
    }
}
