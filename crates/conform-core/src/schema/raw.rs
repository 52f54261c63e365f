//! Schema declarations as data
//!
//! A declaration is a mapping of field name to rule, where `type` is one of:
//!
//! - a tag string (`"Int"`, `"CPF"`, ...),
//! - a mapping, which is itself a schema for a single nested object,
//! - a one-element list holding a mapping, for a list of objects.
//!
//! ```yaml
//! products:
//!   type:
//!     - name: { type: String, required: true, max_length: 20 }
//!       stock: { type: Int, min_value: 1 }
//!   required: true
//!   not_empty: true
//! ```
//!
//! Parsing keeps the field order of the source document. The raw form is
//! converted into a typed [`Schema`] by [`RawSchema::into_schema`], which is
//! where unknown tags and malformed `type` shapes are rejected.

use super::{FieldRule, FieldType, ScalarType, Schema};
use crate::error::{Error, Result};
use serde::de::{self, Deserializer, MapAccess, SeqAccess, Visitor};
use serde::Deserialize;
use serde_json::Value;
use std::fmt;

/// A schema declaration exactly as written, before type tags are resolved
#[derive(Debug, Clone, Default)]
pub struct RawSchema {
    pub fields: Vec<(String, RawFieldRule)>,
}

/// One field's declaration as written
#[derive(Debug, Clone, Default, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct RawFieldRule {
    #[serde(rename = "type", default)]
    pub field_type: Option<RawType>,
    #[serde(default)]
    pub required: bool,
    #[serde(default)]
    pub not_empty: Option<bool>,
    #[serde(default)]
    pub options: Option<Vec<Value>>,
    #[serde(default)]
    pub min_length: Option<usize>,
    #[serde(default)]
    pub max_length: Option<usize>,
    #[serde(default)]
    pub min_value: Option<i64>,
    #[serde(default)]
    pub max_value: Option<i64>,
}

/// The three accepted shapes of `type`, plus any other scalar for error reporting
#[derive(Debug, Clone)]
pub enum RawType {
    Tag(String),
    Nested(RawSchema),
    List(Vec<RawSchema>),
    Other(Value),
}

/// Dispatches on the shape of `type`, so an error inside a nested
/// declaration surfaces as itself
impl<'de> Deserialize<'de> for RawType {
    fn deserialize<D: Deserializer<'de>>(deserializer: D) -> std::result::Result<Self, D::Error> {
        struct RawTypeVisitor;

        impl<'de> Visitor<'de> for RawTypeVisitor {
            type Value = RawType;

            fn expecting(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
                f.write_str("a type tag, a schema mapping or a list holding a schema")
            }

            fn visit_str<E: de::Error>(self, tag: &str) -> std::result::Result<RawType, E> {
                Ok(RawType::Tag(tag.to_string()))
            }

            fn visit_string<E: de::Error>(self, tag: String) -> std::result::Result<RawType, E> {
                Ok(RawType::Tag(tag))
            }

            fn visit_map<A: MapAccess<'de>>(self, access: A) -> std::result::Result<RawType, A::Error> {
                RawSchemaVisitor.visit_map(access).map(RawType::Nested)
            }

            fn visit_seq<A: SeqAccess<'de>>(self, mut access: A) -> std::result::Result<RawType, A::Error> {
                let mut items = Vec::with_capacity(access.size_hint().unwrap_or(1));
                while let Some(item) = access.next_element::<RawSchema>()? {
                    items.push(item);
                }
                Ok(RawType::List(items))
            }

            fn visit_bool<E: de::Error>(self, v: bool) -> std::result::Result<RawType, E> {
                Ok(RawType::Other(Value::Bool(v)))
            }

            fn visit_i64<E: de::Error>(self, v: i64) -> std::result::Result<RawType, E> {
                Ok(RawType::Other(Value::from(v)))
            }

            fn visit_u64<E: de::Error>(self, v: u64) -> std::result::Result<RawType, E> {
                Ok(RawType::Other(Value::from(v)))
            }

            fn visit_f64<E: de::Error>(self, v: f64) -> std::result::Result<RawType, E> {
                Ok(RawType::Other(Value::from(v)))
            }

            fn visit_unit<E: de::Error>(self) -> std::result::Result<RawType, E> {
                Ok(RawType::Other(Value::Null))
            }
        }

        deserializer.deserialize_any(RawTypeVisitor)
    }
}

struct RawSchemaVisitor;

impl<'de> Visitor<'de> for RawSchemaVisitor {
    type Value = RawSchema;

    fn expecting(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str("a mapping of field names to field rules")
    }

    fn visit_map<A: MapAccess<'de>>(self, mut access: A) -> std::result::Result<RawSchema, A::Error> {
        let mut fields: Vec<(String, RawFieldRule)> = Vec::with_capacity(access.size_hint().unwrap_or(0));
        while let Some((name, rule)) = access.next_entry::<String, RawFieldRule>()? {
            if fields.iter().any(|(existing, _)| *existing == name) {
                return Err(de::Error::custom(format!("duplicate field '{}'", name)));
            }
            fields.push((name, rule));
        }
        Ok(RawSchema { fields })
    }
}

impl<'de> Deserialize<'de> for RawSchema {
    fn deserialize<D: Deserializer<'de>>(deserializer: D) -> std::result::Result<Self, D::Error> {
        deserializer.deserialize_map(RawSchemaVisitor)
    }
}

impl RawSchema {
    /// Resolve every type tag and nested declaration into a typed [`Schema`]
    pub fn into_schema(self) -> Result<Schema> {
        self.resolve("")
    }

    fn resolve(self, prefix: &str) -> Result<Schema> {
        let mut schema = Schema::new();
        for (name, raw) in self.fields {
            let path = if prefix.is_empty() {
                name.clone()
            } else {
                format!("{}.{}", prefix, name)
            };
            let rule = raw.resolve(&path)?;
            schema.insert(name, rule);
        }
        Ok(schema)
    }
}

impl RawFieldRule {
    fn resolve(self, path: &str) -> Result<FieldRule> {
        let field_type = match self.field_type {
            None => None,
            Some(RawType::Tag(tag)) => Some(FieldType::Scalar(ScalarType::parse(path, &tag)?)),
            Some(RawType::Nested(inner)) => Some(FieldType::Object(inner.resolve(path)?)),
            Some(RawType::List(mut items)) => {
                if items.len() != 1 {
                    return Err(Error::invalid_schema(
                        path,
                        format!("a list type must hold exactly one schema, found {}", items.len()),
                    ));
                }
                let inner = items.remove(0);
                Some(FieldType::ArrayOf(inner.resolve(path)?))
            }
            Some(RawType::Other(value)) => {
                return Err(Error::invalid_schema(
                    path,
                    format!(
                        "type must be a tag, a schema mapping or a one-element list holding a schema, found {}",
                        value
                    ),
                ));
            }
        };

        Ok(FieldRule {
            field_type,
            required: self.required,
            not_empty: self.not_empty,
            options: self.options.unwrap_or_default(),
            min_length: self.min_length,
            max_length: self.max_length,
            min_value: self.min_value,
            max_value: self.max_value,
        })
    }
}

impl<'de> Deserialize<'de> for Schema {
    fn deserialize<D: Deserializer<'de>>(deserializer: D) -> std::result::Result<Self, D::Error> {
        let raw = RawSchema::deserialize(deserializer)?;
        let schema = raw.into_schema().map_err(de::Error::custom)?;
        schema.check().map_err(de::Error::custom)?;
        Ok(schema)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    const PRODUCTS_YAML: &str = r#"
products:
  type:
    - category: { type: Enum, required: true, not_empty: true, options: [SMARTPHONES, SHOES, CLOTHES] }
      name: { type: String, required: true, not_empty: true, max_length: 20 }
      stock: { type: Int, required: true, not_empty: true, min_value: 1 }
  required: true
  not_empty: true
"#;

    #[test]
    fn test_parse_array_of_schema_from_yaml() {
        let schema: Schema = serde_yaml::from_str(PRODUCTS_YAML).unwrap();
        let rule = schema.get("products").unwrap();
        assert!(rule.required);
        assert!(rule.rejects_empty());

        match &rule.field_type {
            Some(FieldType::ArrayOf(item)) => {
                let names: Vec<_> = item.names().collect();
                assert_eq!(names, vec!["category", "name", "stock"]);
                assert_eq!(item.get("stock").unwrap().min_value, Some(1));
                assert_eq!(item.get("category").unwrap().options.len(), 3);
            }
            other => panic!("expected array of schema, got {:?}", other),
        }
    }

    #[test]
    fn test_parse_nested_object_from_json() {
        let json = r#"{
            "zeta": {"type": "String"},
            "address": {"type": {"street": {"type": "String", "required": true}, "zip": {"type": "Int"}}},
            "alpha": {"required": true}
        }"#;
        let schema: Schema = serde_json::from_str(json).unwrap();
        let names: Vec<_> = schema.names().collect();
        assert_eq!(names, vec!["zeta", "address", "alpha"]);
        assert!(matches!(schema.get("address").unwrap().field_type, Some(FieldType::Object(_))));
        assert!(schema.get("alpha").unwrap().field_type.is_none());
    }

    #[test]
    fn test_unknown_tag_reports_path() {
        let raw: RawSchema = serde_json::from_str(r#"{"order": {"type": {"total": {"type": "Money"}}}}"#).unwrap();
        let err = raw.into_schema().unwrap_err();
        assert!(matches!(err, Error::UnknownType { ref field, ref tag } if field == "order.total" && tag == "Money"));
    }

    #[test]
    fn test_list_type_needs_exactly_one_schema() {
        let raw: RawSchema =
            serde_json::from_str(r#"{"items": {"type": [{"a": {"type": "Int"}}, {"b": {"type": "Int"}}]}}"#).unwrap();
        assert!(matches!(raw.into_schema(), Err(Error::InvalidSchema { .. })));

        let raw: RawSchema = serde_json::from_str(r#"{"items": {"type": 42}}"#).unwrap();
        assert!(matches!(raw.into_schema(), Err(Error::InvalidSchema { .. })));
    }

    #[test]
    fn test_unknown_rule_key_is_rejected() {
        let result: std::result::Result<RawSchema, _> = serde_json::from_str(r#"{"name": {"requird": true}}"#);
        assert!(result.is_err());
    }

    #[test]
    fn test_nested_declaration_errors_surface() {
        let yaml = "address:\n  type:\n    city: { type: String, requird: true }\n";
        let err = serde_yaml::from_str::<RawSchema>(yaml).unwrap_err();
        assert!(err.to_string().contains("requird"), "{}", err);

        let json = r#"{"items": {"type": [{"sku": {"type": "String", "max_lenght": 3}}]}}"#;
        let err = serde_json::from_str::<RawSchema>(json).unwrap_err();
        assert!(err.to_string().contains("max_lenght"), "{}", err);
    }

    #[test]
    fn test_nested_declaration_keeps_field_order() {
        let yaml = "order:\n  type:\n    zeta: { type: Int }\n    alpha: { type: String }\n";
        let schema = serde_yaml::from_str::<RawSchema>(yaml).unwrap().into_schema().unwrap();
        match &schema.get("order").unwrap().field_type {
            Some(FieldType::Object(inner)) => assert_eq!(inner.names().collect::<Vec<_>>(), vec!["zeta", "alpha"]),
            other => panic!("expected nested schema, got {:?}", other),
        }
    }

    #[test]
    fn test_duplicate_field_is_rejected() {
        let result: std::result::Result<RawSchema, _> =
            serde_json::from_str(r#"{"name": {"type": "String"}, "name": {"type": "Int"}}"#);
        assert!(result.is_err());
    }

    #[test]
    fn test_serialized_schema_parses_back() {
        let schema: Schema = serde_yaml::from_str(PRODUCTS_YAML).unwrap();
        let json = serde_json::to_string(&schema).unwrap();
        let reparsed: Schema = serde_json::from_str(&json).unwrap();
        assert_eq!(schema.get("products").unwrap().required, reparsed.get("products").unwrap().required);
        assert_eq!(schema.depth(), reparsed.depth());
    }
}
