//! Validation outcome and error report types
//!
//! Copyright (c) 2025 Conform Team
//! Licensed under the Apache-2.0 license

use serde::ser::SerializeMap;
use serde::{Serialize, Serializer};
use std::collections::BTreeMap;
use std::fmt;
use thiserror::Error;

/// Error recorded for one field
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(untagged)]
pub enum FieldError {
    /// A rule failed; the translated message
    Message(String),
    /// The field is a nested object with failing fields
    Nested(ErrorMap),
    /// The field is a list of objects; errors keyed by item position
    Items(BTreeMap<usize, FieldError>),
}

impl FieldError {
    pub fn message(text: impl Into<String>) -> Self {
        Self::Message(text.into())
    }

    /// The message text, when this is a leaf error
    pub fn as_message(&self) -> Option<&str> {
        match self {
            Self::Message(text) => Some(text),
            _ => None,
        }
    }

    fn flatten_into(&self, path: String, out: &mut Vec<(String, String)>) {
        match self {
            Self::Message(text) => out.push((path, text.clone())),
            Self::Nested(map) => {
                for (name, error) in map.iter() {
                    error.flatten_into(format!("{}.{}", path, name), out);
                }
            }
            Self::Items(items) => {
                for (index, error) in items {
                    error.flatten_into(format!("{}.{}", path, index), out);
                }
            }
        }
    }
}

/// Field name to error, in the order errors were recorded
#[derive(Debug, Clone, PartialEq, Default, Error)]
pub struct ErrorMap {
    entries: Vec<(String, FieldError)>,
}

impl ErrorMap {
    pub fn new() -> Self {
        Self::default()
    }

    /// Record an error; a second error for the same field replaces the first in place
    pub fn insert(&mut self, field: impl Into<String>, error: FieldError) {
        let field = field.into();
        match self.entries.iter_mut().find(|(existing, _)| *existing == field) {
            Some((_, slot)) => *slot = error,
            None => self.entries.push((field, error)),
        }
    }

    pub fn get(&self, field: &str) -> Option<&FieldError> {
        self.entries
            .iter()
            .find(|(existing, _)| existing == field)
            .map(|(_, error)| error)
    }

    pub fn contains(&self, field: &str) -> bool {
        self.get(field).is_some()
    }

    pub fn iter(&self) -> impl Iterator<Item = (&str, &FieldError)> {
        self.entries.iter().map(|(field, error)| (field.as_str(), error))
    }

    pub fn fields(&self) -> impl Iterator<Item = &str> {
        self.entries.iter().map(|(field, _)| field.as_str())
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    /// Every leaf message with its dotted path, e.g. `products.1.stock`
    pub fn flatten(&self) -> Vec<(String, String)> {
        let mut out = Vec::new();
        for (field, error) in &self.entries {
            error.flatten_into(field.clone(), &mut out);
        }
        out
    }
}

impl fmt::Display for ErrorMap {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let flat = self.flatten();
        write!(f, "{} field error(s):", flat.len())?;
        for (path, message) in flat {
            write!(f, "\n  - {}: {}", path, message)?;
        }
        Ok(())
    }
}

impl Serialize for ErrorMap {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        let mut map = serializer.serialize_map(Some(self.entries.len()))?;
        for (field, error) in &self.entries {
            map.serialize_entry(field, error)?;
        }
        map.end()
    }
}

/// Result of one validation pass
#[derive(Debug, Clone, PartialEq)]
pub enum ValidationOutcome {
    Valid,
    Invalid(ErrorMap),
}

impl ValidationOutcome {
    /// `Valid` for an empty map, `Invalid` otherwise
    pub fn from_errors(errors: ErrorMap) -> Self {
        if errors.is_empty() {
            Self::Valid
        } else {
            Self::Invalid(errors)
        }
    }

    pub fn is_valid(&self) -> bool {
        matches!(self, Self::Valid)
    }

    pub fn errors(&self) -> Option<&ErrorMap> {
        match self {
            Self::Valid => None,
            Self::Invalid(errors) => Some(errors),
        }
    }

    /// Convert to result - Ok if valid, Err with the report otherwise
    pub fn into_result(self) -> Result<(), ErrorMap> {
        match self {
            Self::Valid => Ok(()),
            Self::Invalid(errors) => Err(errors),
        }
    }
}

/// `true` when valid, `{"error": {...}}` otherwise
impl Serialize for ValidationOutcome {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        match self {
            Self::Valid => serializer.serialize_bool(true),
            Self::Invalid(errors) => {
                let mut map = serializer.serialize_map(Some(1))?;
                map.serialize_entry("error", errors)?;
                map.end()
            }
        }
    }
}

impl fmt::Display for ValidationOutcome {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Valid => write!(f, "valid"),
            Self::Invalid(errors) => write!(f, "invalid: {}", errors),
        }
    }
}
