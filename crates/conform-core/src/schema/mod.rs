//! Declarative schema model
//!
//! A [`Schema`] is an ordered list of field names paired with a
//! [`FieldRule`]. Declaration order does not change whether a payload is
//! valid, but it is the order in which errors are collected.
//!
//! Schemas are usually built in code:
//!
//! ```rust
//! use conform_core::schema::{FieldRule, ScalarType, Schema};
//!
//! let product = Schema::new()
//!     .field("name", FieldRule::scalar(ScalarType::String).required().not_empty().max_length(20))
//!     .field("stock", FieldRule::scalar(ScalarType::Int).required().min_value(1));
//!
//! let order = Schema::new()
//!     .field("products", FieldRule::array_of(product).required().not_empty());
//!
//! assert_eq!(order.len(), 1);
//! ```
//!
//! or loaded from a JSON/YAML declaration, see [`raw`].
//!
//! Copyright (c) 2025 Conform Team
//! Licensed under the Apache-2.0 license

pub mod raw;

use crate::error::{Error, Result};
use serde::ser::{SerializeMap, SerializeSeq};
use serde::{Serialize, Serializer};
use serde_json::Value;
use std::fmt;
use std::path::Path;

/// Scalar type tags understood by the engine
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum ScalarType {
    String,
    Email,
    Name,
    Url,
    Enum,
    Phone,
    Cpf,
    Cnpj,
    Uuid,
    Int,
    Decimal,
    Bool,
}

/// Validator family a scalar type is routed to
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum TypeFamily {
    /// Pattern and format checks with optional character-length bounds
    Text,
    /// Numeric format checks with optional range and digit-length bounds
    Numeric,
}

impl ScalarType {
    /// Every supported scalar type, in declaration order
    pub const ALL: [ScalarType; 12] = [
        ScalarType::String,
        ScalarType::Email,
        ScalarType::Name,
        ScalarType::Url,
        ScalarType::Enum,
        ScalarType::Phone,
        ScalarType::Cpf,
        ScalarType::Cnpj,
        ScalarType::Uuid,
        ScalarType::Int,
        ScalarType::Decimal,
        ScalarType::Bool,
    ];

    /// The tag used for this type in schema declarations
    pub fn tag(&self) -> &'static str {
        match self {
            ScalarType::String => "String",
            ScalarType::Email => "Email",
            ScalarType::Name => "Name",
            ScalarType::Url => "Url",
            ScalarType::Enum => "Enum",
            ScalarType::Phone => "Phone",
            ScalarType::Cpf => "CPF",
            ScalarType::Cnpj => "CNPJ",
            ScalarType::Uuid => "UUID",
            ScalarType::Int => "Int",
            ScalarType::Decimal => "Decimal",
            ScalarType::Bool => "Bool",
        }
    }

    /// Look up a type by its declaration tag (exact match)
    pub fn from_tag(tag: &str) -> Option<Self> {
        Self::ALL.iter().copied().find(|t| t.tag() == tag)
    }

    /// Parse a tag declared for `field`, failing with [`Error::UnknownType`]
    pub fn parse(field: &str, tag: &str) -> Result<Self> {
        Self::from_tag(tag).ok_or_else(|| Error::UnknownType {
            field: field.to_string(),
            tag: tag.to_string(),
        })
    }

    /// The validator family handling this type
    pub fn family(&self) -> TypeFamily {
        match self {
            ScalarType::Int | ScalarType::Decimal | ScalarType::Bool => TypeFamily::Numeric,
            _ => TypeFamily::Text,
        }
    }
}

impl fmt::Display for ScalarType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.tag())
    }
}

/// Declared type of a field
#[derive(Debug, Clone, PartialEq)]
pub enum FieldType {
    /// A scalar checked by the text or numeric validators
    Scalar(ScalarType),
    /// A single nested object matching the schema
    Object(Schema),
    /// A list whose every item matches the schema
    ArrayOf(Schema),
}

/// Rule set for a single field
#[derive(Debug, Clone, PartialEq, Default)]
pub struct FieldRule {
    /// Declared type; `None` means only presence and emptiness are checked
    pub field_type: Option<FieldType>,
    /// The key must exist in the data
    pub required: bool,
    /// `Some(true)` rejects empty values; unset behaves like `Some(false)`
    pub not_empty: Option<bool>,
    /// Allowed literals for `Enum`
    pub options: Vec<Value>,
    pub min_length: Option<usize>,
    pub max_length: Option<usize>,
    pub min_value: Option<i64>,
    pub max_value: Option<i64>,
}

impl FieldRule {
    /// A rule with no type: only `required`/`not_empty` apply
    pub fn new() -> Self {
        Self::default()
    }

    pub fn scalar(scalar: ScalarType) -> Self {
        Self {
            field_type: Some(FieldType::Scalar(scalar)),
            ..Self::default()
        }
    }

    pub fn object(schema: Schema) -> Self {
        Self {
            field_type: Some(FieldType::Object(schema)),
            ..Self::default()
        }
    }

    pub fn array_of(schema: Schema) -> Self {
        Self {
            field_type: Some(FieldType::ArrayOf(schema)),
            ..Self::default()
        }
    }

    /// Enum rule with its allowed options
    pub fn one_of<I, V>(options: I) -> Self
    where
        I: IntoIterator<Item = V>,
        V: Into<Value>,
    {
        Self::scalar(ScalarType::Enum).options(options)
    }

    pub fn required(mut self) -> Self {
        self.required = true;
        self
    }

    pub fn not_empty(mut self) -> Self {
        self.not_empty = Some(true);
        self
    }

    /// Explicitly allow empty values (`not_empty: false`)
    pub fn allow_empty(mut self) -> Self {
        self.not_empty = Some(false);
        self
    }

    pub fn options<I, V>(mut self, options: I) -> Self
    where
        I: IntoIterator<Item = V>,
        V: Into<Value>,
    {
        self.options = options.into_iter().map(Into::into).collect();
        self
    }

    pub fn min_length(mut self, min: usize) -> Self {
        self.min_length = Some(min);
        self
    }

    pub fn max_length(mut self, max: usize) -> Self {
        self.max_length = Some(max);
        self
    }

    pub fn min_value(mut self, min: i64) -> Self {
        self.min_value = Some(min);
        self
    }

    pub fn max_value(mut self, max: i64) -> Self {
        self.max_value = Some(max);
        self
    }

    /// Whether `not_empty` was set to exactly `true`
    pub fn rejects_empty(&self) -> bool {
        self.not_empty == Some(true)
    }

    /// The scalar type, when the declared type is a scalar
    pub fn scalar_type(&self) -> Option<ScalarType> {
        match &self.field_type {
            Some(FieldType::Scalar(scalar)) => Some(*scalar),
            _ => None,
        }
    }
}

/// Ordered mapping from field name to [`FieldRule`]
#[derive(Debug, Clone, PartialEq, Default)]
pub struct Schema {
    fields: Vec<(String, FieldRule)>,
}

impl Schema {
    pub fn new() -> Self {
        Self::default()
    }

    /// Add a field, replacing any earlier rule with the same name in place
    pub fn field(mut self, name: impl Into<String>, rule: FieldRule) -> Self {
        self.insert(name, rule);
        self
    }

    /// Insert a field rule, keeping the original position on replacement
    pub fn insert(&mut self, name: impl Into<String>, rule: FieldRule) {
        let name = name.into();
        match self.fields.iter_mut().find(|(existing, _)| *existing == name) {
            Some((_, slot)) => *slot = rule,
            None => self.fields.push((name, rule)),
        }
    }

    pub fn get(&self, name: &str) -> Option<&FieldRule> {
        self.fields
            .iter()
            .find(|(existing, _)| existing == name)
            .map(|(_, rule)| rule)
    }

    pub fn contains(&self, name: &str) -> bool {
        self.get(name).is_some()
    }

    /// Fields in declaration order
    pub fn iter(&self) -> impl Iterator<Item = (&str, &FieldRule)> {
        self.fields.iter().map(|(name, rule)| (name.as_str(), rule))
    }

    pub fn names(&self) -> impl Iterator<Item = &str> {
        self.fields.iter().map(|(name, _)| name.as_str())
    }

    pub fn len(&self) -> usize {
        self.fields.len()
    }

    pub fn is_empty(&self) -> bool {
        self.fields.is_empty()
    }

    /// Deepest chain of nested schemas below this one (0 for a flat schema)
    pub fn depth(&self) -> usize {
        self.fields
            .iter()
            .filter_map(|(_, rule)| match &rule.field_type {
                Some(FieldType::Object(inner)) | Some(FieldType::ArrayOf(inner)) => {
                    Some(inner.depth() + 1)
                }
                _ => None,
            })
            .max()
            .unwrap_or(0)
    }

    /// Check declaration-level consistency: every `Enum` carries options and
    /// no lower bound exceeds its upper bound
    pub fn check(&self) -> Result<()> {
        self.check_at("")
    }

    fn check_at(&self, prefix: &str) -> Result<()> {
        for (name, rule) in &self.fields {
            let path = if prefix.is_empty() {
                name.clone()
            } else {
                format!("{}.{}", prefix, name)
            };

            if let (Some(min), Some(max)) = (rule.min_length, rule.max_length) {
                if min > max {
                    return Err(Error::invalid_schema(
                        &path,
                        format!("min_length {} is greater than max_length {}", min, max),
                    ));
                }
            }
            if let (Some(min), Some(max)) = (rule.min_value, rule.max_value) {
                if min > max {
                    return Err(Error::invalid_schema(
                        &path,
                        format!("min_value {} is greater than max_value {}", min, max),
                    ));
                }
            }

            match &rule.field_type {
                Some(FieldType::Scalar(ScalarType::Enum)) if rule.options.is_empty() => {
                    return Err(Error::invalid_schema(&path, "Enum requires a non-empty options list"));
                }
                Some(FieldType::Object(inner)) | Some(FieldType::ArrayOf(inner)) => {
                    inner.check_at(&path)?;
                }
                _ => {}
            }
        }
        Ok(())
    }

    /// Load a schema declaration from a `.json`, `.yaml` or `.yml` file
    pub fn from_file(path: &Path) -> Result<Self> {
        let raw: raw::RawSchema = crate::loader::read_document(path)?;
        let schema = raw.into_schema()?;
        schema.check()?;
        Ok(schema)
    }
}

impl<'a> IntoIterator for &'a Schema {
    type Item = (&'a str, &'a FieldRule);
    type IntoIter = Box<dyn Iterator<Item = (&'a str, &'a FieldRule)> + 'a>;

    fn into_iter(self) -> Self::IntoIter {
        Box::new(self.iter())
    }
}

impl FromIterator<(String, FieldRule)> for Schema {
    fn from_iter<I: IntoIterator<Item = (String, FieldRule)>>(iter: I) -> Self {
        let mut schema = Schema::new();
        for (name, rule) in iter {
            schema.insert(name, rule);
        }
        schema
    }
}

impl Serialize for Schema {
    fn serialize<S: Serializer>(&self, serializer: S) -> std::result::Result<S::Ok, S::Error> {
        let mut map = serializer.serialize_map(Some(self.fields.len()))?;
        for (name, rule) in &self.fields {
            map.serialize_entry(name, rule)?;
        }
        map.end()
    }
}

impl Serialize for FieldType {
    fn serialize<S: Serializer>(&self, serializer: S) -> std::result::Result<S::Ok, S::Error> {
        match self {
            FieldType::Scalar(scalar) => serializer.serialize_str(scalar.tag()),
            FieldType::Object(schema) => schema.serialize(serializer),
            FieldType::ArrayOf(schema) => {
                let mut seq = serializer.serialize_seq(Some(1))?;
                seq.serialize_element(schema)?;
                seq.end()
            }
        }
    }
}

impl Serialize for FieldRule {
    fn serialize<S: Serializer>(&self, serializer: S) -> std::result::Result<S::Ok, S::Error> {
        let mut map = serializer.serialize_map(None)?;
        if let Some(field_type) = &self.field_type {
            map.serialize_entry("type", field_type)?;
        }
        if self.required {
            map.serialize_entry("required", &true)?;
        }
        if let Some(not_empty) = self.not_empty {
            map.serialize_entry("not_empty", &not_empty)?;
        }
        if !self.options.is_empty() {
            map.serialize_entry("options", &self.options)?;
        }
        if let Some(min) = self.min_length {
            map.serialize_entry("min_length", &min)?;
        }
        if let Some(max) = self.max_length {
            map.serialize_entry("max_length", &max)?;
        }
        if let Some(min) = self.min_value {
            map.serialize_entry("min_value", &min)?;
        }
        if let Some(max) = self.max_value {
            map.serialize_entry("max_value", &max)?;
        }
        map.end()
    }
}
