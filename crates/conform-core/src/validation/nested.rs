//! Schema delegate: fields whose type is itself a schema
//!
//! A single nested object is validated by a recursive engine pass and its
//! errors are kept as a nested map. A list of objects is validated item by
//! item and failures are keyed by item position. Strict mode is passed down
//! unchanged.
//!
//! Values arriving as text (for example a form field holding JSON) are
//! decoded before their shape is checked.
//!
//! Copyright (c) 2025 Conform Team
//! Licensed under the Apache-2.0 license

use super::common::is_empty;
use super::engine::Engine;
use super::outcome::{FieldError, ValidationOutcome};
use crate::error::Result;
use crate::schema::{FieldRule, Schema};
use serde_json::Value;
use std::borrow::Cow;
use std::collections::BTreeMap;

/// Decode a JSON-bearing string; any other value is used as-is
fn decode(value: &Value) -> Cow<'_, Value> {
    match value {
        Value::String(text) => match serde_json::from_str::<Value>(text) {
            Ok(decoded) => Cow::Owned(decoded),
            Err(_) => Cow::Borrowed(value),
        },
        other => Cow::Borrowed(other),
    }
}

/// Items of a true list: a JSON array, or a mapping whose keys are exactly
/// `"0"` to `"n-1"`
pub fn as_list(value: &Value) -> Option<Vec<&Value>> {
    match value {
        Value::Array(items) => Some(items.iter().collect()),
        Value::Object(map) => {
            let mut indexed = Vec::with_capacity(map.len());
            for (key, item) in map {
                let index: usize = key.parse().ok()?;
                if index.to_string() != *key {
                    return None;
                }
                indexed.push((index, item));
            }
            indexed.sort_by_key(|(index, _)| *index);
            let contiguous = indexed
                .iter()
                .enumerate()
                .all(|(position, (index, _))| position == *index);
            contiguous.then(|| indexed.into_iter().map(|(_, item)| item).collect())
        }
        _ => None,
    }
}

/// Decoded value, or `None` when it is empty and emptiness is allowed
fn decoded_or_skip<'v>(
    engine: &Engine,
    value: &'v Value,
    rule: &FieldRule,
) -> std::result::Result<Option<Cow<'v, Value>>, FieldError> {
    let decoded = decode(value);
    if is_empty(&decoded) {
        if rule.rejects_empty() {
            return Err(FieldError::Message(engine.translator().message("common", "not_empty")));
        }
        return Ok(None);
    }
    Ok(Some(decoded))
}

/// Validate a single nested object
pub(crate) fn validate_object(
    engine: &Engine,
    value: &Value,
    schema: &Schema,
    rule: &FieldRule,
    strict: bool,
    depth: usize,
) -> Result<Option<FieldError>> {
    let decoded = match decoded_or_skip(engine, value, rule) {
        Ok(Some(decoded)) => decoded,
        Ok(None) => return Ok(None),
        Err(error) => return Ok(Some(error)),
    };

    let Some(map) = decoded.as_object() else {
        return Ok(Some(FieldError::Message(
            engine.translator().message("schema", "object_required"),
        )));
    };

    match engine.validate_at(map, schema, strict, depth + 1)? {
        ValidationOutcome::Valid => Ok(None),
        ValidationOutcome::Invalid(errors) => Ok(Some(FieldError::Nested(errors))),
    }
}

/// Validate a list whose every item must match `schema`
pub(crate) fn validate_array(
    engine: &Engine,
    value: &Value,
    schema: &Schema,
    rule: &FieldRule,
    strict: bool,
    depth: usize,
) -> Result<Option<FieldError>> {
    let decoded = match decoded_or_skip(engine, value, rule) {
        Ok(Some(decoded)) => decoded,
        Ok(None) => return Ok(None),
        Err(error) => return Ok(Some(error)),
    };

    let Some(items) = as_list(&decoded) else {
        return Ok(Some(FieldError::Message(
            engine.translator().message("schema", "array_required"),
        )));
    };

    let mut failures = BTreeMap::new();
    for (index, item) in items.into_iter().enumerate() {
        let failure = match item.as_object() {
            None => Some(FieldError::Message(
                engine.translator().message("schema", "object_required"),
            )),
            Some(map) => match engine.validate_at(map, schema, strict, depth + 1)? {
                ValidationOutcome::Valid => None,
                ValidationOutcome::Invalid(errors) => Some(FieldError::Nested(errors)),
            },
        };

        if let Some(failure) = failure {
            tracing::trace!(index, "List item failed validation");
            failures.insert(index, failure);
            if engine.mode().is_fail_fast() {
                break;
            }
        }
    }

    if failures.is_empty() {
        Ok(None)
    } else {
        Ok(Some(FieldError::Items(failures)))
    }
}
