//! Rules applied to every field regardless of its type, plus the strict-mode
//! scan for undeclared keys

use super::RuleResult;
use crate::messages::Translator;
use crate::schema::{FieldRule, Schema};
use serde_json::{Map, Value};

/// `null`, `""`, `[]`, `{}` and `false` are empty; `0` and `"0"` are not
pub fn is_empty(value: &Value) -> bool {
    match value {
        Value::Null => true,
        Value::Bool(b) => !b,
        Value::String(s) => s.is_empty(),
        Value::Array(items) => items.is_empty(),
        Value::Object(map) => map.is_empty(),
        Value::Number(_) => false,
    }
}

/// Presence check: only whether the key exists, never what it holds
pub fn check_required(value: Option<&Value>, rule: &FieldRule, translator: &dyn Translator) -> RuleResult {
    if value.is_none() && rule.required {
        return Err(translator.message("common", "required"));
    }
    Ok(())
}

/// Emptiness check for a present value
pub fn check_not_empty(value: &Value, rule: &FieldRule, translator: &dyn Translator) -> RuleResult {
    if rule.rejects_empty() && is_empty(value) {
        return Err(translator.message("common", "not_empty"));
    }
    Ok(())
}

/// Keys present in `data` but not declared in `schema`, in data order
pub fn undeclared_keys<'a>(data: &'a Map<String, Value>, schema: &Schema) -> Vec<&'a str> {
    data.keys()
        .map(String::as_str)
        .filter(|key| !schema.contains(key))
        .collect()
}
