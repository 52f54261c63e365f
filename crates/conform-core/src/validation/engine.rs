//! The validation engine
//!
//! One pass walks a schema and a data object in lockstep:
//!
//! 1. Under strict mode, every data key the schema does not declare is an error
//! 2. Per schema field, in declaration order:
//!    - a missing `required` key is an error; a missing optional key is skipped
//!    - a `not_empty` failure is terminal for the field
//!    - an empty value is skipped unless emptiness is rejected
//!    - the value is routed to the validator for its declared type
//!
//! Under [`ValidationMode::FailFast`] the pass returns at the first recorded
//! error. An [`Engine`] holds only immutable settings, so one instance can be
//! shared across threads.
//!
//! Copyright (c) 2025 Conform Team
//! Licensed under the Apache-2.0 license

use super::common::{check_not_empty, check_required, is_empty, undeclared_keys};
use super::nested;
use super::outcome::{ErrorMap, FieldError, ValidationOutcome};
use super::{number, text, RuleResult, ValidationMode};
use crate::config::{EngineConfig, DEFAULT_MAX_DEPTH};
use crate::error::{Error, Result};
use crate::input::{normalize, InputType, RawInput};
use crate::messages::{MessageCatalog, Translator};
use crate::schema::{FieldRule, FieldType, ScalarType, Schema, TypeFamily};
use serde_json::{Map, Value};
use std::fmt;
use std::sync::Arc;

/// Validates data objects against schemas
#[derive(Clone)]
pub struct Engine {
    mode: ValidationMode,
    input_type: InputType,
    max_depth: usize,
    translator: Arc<dyn Translator>,
}

impl fmt::Debug for Engine {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Engine")
            .field("mode", &self.mode)
            .field("input_type", &self.input_type)
            .field("max_depth", &self.max_depth)
            .finish_non_exhaustive()
    }
}

/// Whether the pass should keep going after recording an error
enum Flow {
    Continue,
    Stop,
}

impl Engine {
    /// Create an engine from configuration, loading the built-in catalog for
    /// `config.locale`
    pub fn new(config: &EngineConfig) -> Result<Self> {
        let catalog = MessageCatalog::for_locale(&config.locale)?;
        tracing::debug!(
            mode = %config.validation_mode,
            input_type = %config.input_type,
            locale = %config.locale,
            "Creating validation engine"
        );

        Ok(Self {
            mode: config.validation_mode,
            input_type: config.input_type,
            max_depth: config.max_depth,
            translator: Arc::new(catalog),
        })
    }

    /// Create an engine with an explicit translator and default settings otherwise
    pub fn with_translator(mode: ValidationMode, translator: impl Translator + 'static) -> Self {
        Self {
            mode,
            input_type: InputType::default(),
            max_depth: DEFAULT_MAX_DEPTH,
            translator: Arc::new(translator),
        }
    }

    pub fn with_input_type(mut self, input_type: InputType) -> Self {
        self.input_type = input_type;
        self
    }

    pub fn with_max_depth(mut self, max_depth: usize) -> Self {
        self.max_depth = max_depth;
        self
    }

    pub fn mode(&self) -> ValidationMode {
        self.mode
    }

    pub fn input_type(&self) -> InputType {
        self.input_type
    }

    pub fn max_depth(&self) -> usize {
        self.max_depth
    }

    pub fn translator(&self) -> &dyn Translator {
        self.translator.as_ref()
    }

    /// Validate `data` against `schema`
    ///
    /// Field failures are reported through the returned outcome. `Err` is
    /// reserved for fatal conditions: an inconsistent schema (for example an
    /// `Enum` without options) or nesting deeper than the configured bound.
    #[tracing::instrument(level = "debug", skip_all, fields(mode = %self.mode, strict))]
    pub fn validate(&self, data: &Map<String, Value>, schema: &Schema, strict: bool) -> Result<ValidationOutcome> {
        schema.check()?;
        let outcome = self.validate_at(data, schema, strict, 0)?;
        match &outcome {
            ValidationOutcome::Valid => tracing::debug!("Validation passed"),
            ValidationOutcome::Invalid(errors) => tracing::debug!(fields = errors.len(), "Validation failed"),
        }
        Ok(outcome)
    }

    /// Normalize raw input under the configured input type, then validate it
    pub fn check(&self, raw: impl Into<RawInput>, schema: &Schema, strict: bool) -> Result<ValidationOutcome> {
        let data = normalize(raw.into(), self.input_type)?;
        self.validate(&data, schema, strict)
    }

    pub(crate) fn validate_at(
        &self,
        data: &Map<String, Value>,
        schema: &Schema,
        strict: bool,
        depth: usize,
    ) -> Result<ValidationOutcome> {
        if depth > self.max_depth {
            return Err(Error::DepthLimitExceeded {
                max_depth: self.max_depth,
            });
        }

        let mut errors = ErrorMap::new();

        if strict {
            for key in undeclared_keys(data, schema) {
                let message = self.translator.message("common", "strict_mode");
                if let Flow::Stop = self.record(&mut errors, key, FieldError::Message(message)) {
                    return Ok(ValidationOutcome::from_errors(errors));
                }
            }
        }

        for (name, rule) in schema {
            if let Some(error) = self.check_field(data.get(name), rule, strict, depth)? {
                if let Flow::Stop = self.record(&mut errors, name, error) {
                    break;
                }
            }
        }

        Ok(ValidationOutcome::from_errors(errors))
    }

    fn record(&self, errors: &mut ErrorMap, field: &str, error: FieldError) -> Flow {
        tracing::trace!(field, "Field failed validation");
        errors.insert(field, error);
        if self.mode.is_fail_fast() {
            Flow::Stop
        } else {
            Flow::Continue
        }
    }

    /// All rules for one field; `Ok(None)` when it passes
    fn check_field(
        &self,
        value: Option<&Value>,
        rule: &FieldRule,
        strict: bool,
        depth: usize,
    ) -> Result<Option<FieldError>> {
        let translator = self.translator();

        if let Err(message) = check_required(value, rule, translator) {
            return Ok(Some(FieldError::Message(message)));
        }
        let Some(value) = value else {
            return Ok(None);
        };

        if let Err(message) = check_not_empty(value, rule, translator) {
            return Ok(Some(FieldError::Message(message)));
        }
        if is_empty(value) {
            return Ok(None);
        }

        match &rule.field_type {
            None => Ok(None),
            Some(FieldType::Scalar(scalar)) => Ok(self.check_scalar(value, *scalar, rule).err().map(FieldError::Message)),
            Some(FieldType::Object(schema)) => nested::validate_object(self, value, schema, rule, strict, depth),
            Some(FieldType::ArrayOf(schema)) => nested::validate_array(self, value, schema, rule, strict, depth),
        }
    }

    fn check_scalar(&self, value: &Value, scalar: ScalarType, rule: &FieldRule) -> RuleResult {
        match scalar.family() {
            TypeFamily::Text => text::validate(value, scalar, rule, self.translator()),
            TypeFamily::Numeric => number::validate(value, scalar, rule, self.translator()),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::messages::Placeholders;
    use serde_json::json;

    fn engine(mode: ValidationMode) -> Engine {
        let config = EngineConfig::default().with_mode(mode);
        Engine::new(&config).unwrap()
    }

    fn object(value: Value) -> Map<String, Value> {
        match value {
            Value::Object(map) => map,
            other => panic!("expected an object, got {}", other),
        }
    }

    fn person_schema() -> Schema {
        Schema::new()
            .field("name", FieldRule::scalar(ScalarType::Name).required().not_empty())
            .field("email", FieldRule::scalar(ScalarType::Email).required())
            .field("age", FieldRule::scalar(ScalarType::Int).min_value(18))
    }

    #[test]
    fn test_valid_payload() {
        let data = object(json!({"name": "Ana Souza", "email": "ana@example.com", "age": 30}));
        let outcome = engine(ValidationMode::CollectAll).validate(&data, &person_schema(), false).unwrap();
        assert!(outcome.is_valid());
    }

    #[test]
    fn test_collect_all_reports_in_schema_order() {
        let data = object(json!({"name": "Ana", "age": 12}));
        let outcome = engine(ValidationMode::CollectAll).validate(&data, &person_schema(), false).unwrap();

        let errors = outcome.errors().unwrap();
        assert_eq!(errors.fields().collect::<Vec<_>>(), vec!["name", "email", "age"]);
        assert_eq!(errors.get("name").and_then(FieldError::as_message), Some("Must include first and last name."));
        assert_eq!(errors.get("email").and_then(FieldError::as_message), Some("Is required."));
        assert_eq!(
            errors.get("age").and_then(FieldError::as_message),
            Some("Must be greater than or equal to 18.")
        );
    }

    #[test]
    fn test_fail_fast_stops_at_first_error() {
        let data = object(json!({"name": "Ana", "age": 12}));
        let outcome = engine(ValidationMode::FailFast).validate(&data, &person_schema(), false).unwrap();

        let errors = outcome.errors().unwrap();
        assert_eq!(errors.len(), 1);
        assert!(errors.contains("name"));
    }

    #[test]
    fn test_strict_mode_checked_first() {
        let data = object(json!({"name": "Ana Souza", "email": "ana@example.com", "role": "admin"}));

        let loose = engine(ValidationMode::CollectAll).validate(&data, &person_schema(), false).unwrap();
        assert!(loose.is_valid());

        let strict = engine(ValidationMode::CollectAll).validate(&data, &person_schema(), true).unwrap();
        let errors = strict.errors().unwrap();
        assert_eq!(errors.get("role").and_then(FieldError::as_message), Some("Not allowed in strict mode."));

        let data = object(json!({"role": "admin"}));
        let fail_fast = engine(ValidationMode::FailFast).validate(&data, &person_schema(), true).unwrap();
        assert_eq!(fail_fast.errors().unwrap().fields().collect::<Vec<_>>(), vec!["role"]);
    }

    #[test]
    fn test_required_is_presence_only() {
        let schema = Schema::new().field("note", FieldRule::scalar(ScalarType::String).required());

        let outcome = engine(ValidationMode::CollectAll)
            .validate(&object(json!({"note": null})), &schema, false)
            .unwrap();
        assert!(outcome.is_valid());

        let outcome = engine(ValidationMode::CollectAll)
            .validate(&object(json!({})), &schema, false)
            .unwrap();
        assert!(!outcome.is_valid());
    }

    #[test]
    fn test_not_empty_is_terminal() {
        let schema = Schema::new().field("email", FieldRule::scalar(ScalarType::Email).not_empty());
        let outcome = engine(ValidationMode::CollectAll)
            .validate(&object(json!({"email": ""})), &schema, false)
            .unwrap();
        assert_eq!(
            outcome.errors().unwrap().get("email").and_then(FieldError::as_message),
            Some("Field cannot be empty.")
        );
    }

    #[test]
    fn test_empty_values_skip_type_checks() {
        let schema = Schema::new()
            .field("email", FieldRule::scalar(ScalarType::Email))
            .field("active", FieldRule::scalar(ScalarType::Bool).allow_empty())
            .field("tags", FieldRule::array_of(Schema::new().field("id", FieldRule::new().required())));
        let data = object(json!({"email": "", "active": false, "tags": []}));
        let outcome = engine(ValidationMode::CollectAll).validate(&data, &schema, false).unwrap();
        assert!(outcome.is_valid());
    }

    #[test]
    fn test_zero_is_not_empty() {
        let schema = Schema::new().field("email", FieldRule::scalar(ScalarType::Email).not_empty());
        let outcome = engine(ValidationMode::CollectAll)
            .validate(&object(json!({"email": 0})), &schema, false)
            .unwrap();
        assert_eq!(
            outcome.errors().unwrap().get("email").and_then(FieldError::as_message),
            Some("Must be a valid email address.")
        );
    }

    #[test]
    fn test_nested_object_errors() {
        let address = Schema::new().field("city", FieldRule::scalar(ScalarType::String).required());
        let schema = Schema::new().field("address", FieldRule::object(address));
        let engine = engine(ValidationMode::CollectAll);

        let outcome = engine
            .validate(&object(json!({"address": {"zip": "01000"}})), &schema, false)
            .unwrap();
        let expected = json!({"error": {"address": {"city": "Is required."}}});
        assert_eq!(serde_json::to_value(&outcome).unwrap(), expected);

        let outcome = engine
            .validate(&object(json!({"address": "Main street"})), &schema, false)
            .unwrap();
        assert_eq!(
            outcome.errors().unwrap().get("address").and_then(FieldError::as_message),
            Some("Must be an object matching the schema.")
        );
    }

    #[test]
    fn test_strict_mode_propagates_to_nested_objects() {
        let address = Schema::new().field("city", FieldRule::scalar(ScalarType::String));
        let schema = Schema::new().field("address", FieldRule::object(address));
        let data = object(json!({"address": {"city": "Recife", "zip": "50000"}}));
        let engine = engine(ValidationMode::CollectAll);

        assert!(engine.validate(&data, &schema, false).unwrap().is_valid());

        let outcome = engine.validate(&data, &schema, true).unwrap();
        assert_eq!(
            serde_json::to_value(&outcome).unwrap(),
            json!({"error": {"address": {"zip": "Not allowed in strict mode."}}})
        );
    }

    #[test]
    fn test_strict_mode_propagates_to_list_items() {
        let item = Schema::new().field("sku", FieldRule::scalar(ScalarType::String));
        let schema = Schema::new().field("items", FieldRule::array_of(item));
        let data = object(json!({"items": [{"sku": "A1", "extra": true}, {"sku": "B2"}]}));
        let engine = engine(ValidationMode::CollectAll);

        assert!(engine.validate(&data, &schema, false).unwrap().is_valid());

        let outcome = engine.validate(&data, &schema, true).unwrap();
        assert_eq!(
            serde_json::to_value(&outcome).unwrap(),
            json!({"error": {"items": {"0": {"extra": "Not allowed in strict mode."}}}})
        );
    }

    #[test]
    fn test_inconsistent_schema_is_fatal() {
        let data = object(json!({"status": "OPEN"}));
        let engine = engine(ValidationMode::CollectAll);

        let schema = Schema::new().field("status", FieldRule::scalar(ScalarType::Enum));
        assert!(matches!(
            engine.validate(&data, &schema, false),
            Err(Error::InvalidSchema { ref field, .. }) if field == "status"
        ));

        let nested = Schema::new().field(
            "order",
            FieldRule::object(Schema::new().field("qty", FieldRule::scalar(ScalarType::Int).min_value(5).max_value(1))),
        );
        assert!(matches!(
            engine.validate(&object(json!({})), &nested, false),
            Err(Error::InvalidSchema { ref field, .. }) if field == "order.qty"
        ));

        let fixed = Schema::new().field("status", FieldRule::one_of(["OPEN", "CLOSED"]));
        assert!(engine.validate(&data, &fixed, false).unwrap().is_valid());
    }

    #[test]
    fn test_array_errors_keyed_by_index() {
        let item = Schema::new()
            .field("sku", FieldRule::scalar(ScalarType::String).required())
            .field("qty", FieldRule::scalar(ScalarType::Int).required());
        let schema = Schema::new().field("items", FieldRule::array_of(item).required());
        let data = object(json!({
            "items": [
                {"sku": "A1", "qty": 1},
                {"sku": "B2"},
                "loose",
                {"qty": "x"}
            ]
        }));

        let outcome = engine(ValidationMode::CollectAll).validate(&data, &schema, false).unwrap();
        assert_eq!(
            serde_json::to_value(&outcome).unwrap(),
            json!({"error": {"items": {
                "1": {"qty": "Is required."},
                "2": "Must be an object matching the schema.",
                "3": {"sku": "Is required.", "qty": "Must be an integer."}
            }}})
        );

        let outcome = engine(ValidationMode::FailFast).validate(&data, &schema, false).unwrap();
        assert_eq!(
            serde_json::to_value(&outcome).unwrap(),
            json!({"error": {"items": {"1": {"qty": "Is required."}}}})
        );
    }

    #[test]
    fn test_array_shape_errors() {
        let schema = Schema::new().field("items", FieldRule::array_of(Schema::new()));
        let engine = engine(ValidationMode::CollectAll);

        for bad in [json!({"items": {"a": {}}}), json!({"items": 5}), json!({"items": {"1": {}}})] {
            let outcome = engine.validate(&object(bad.clone()), &schema, false).unwrap();
            assert_eq!(
                outcome.errors().unwrap().get("items").and_then(FieldError::as_message),
                Some("Must be an array of items."),
                "{}",
                bad
            );
        }

        let indexed = object(json!({"items": {"0": {}, "1": {}}}));
        assert!(engine.validate(&indexed, &schema, false).unwrap().is_valid());

        let encoded = object(json!({"items": "[{}, {}]"}));
        assert!(engine.validate(&encoded, &schema, false).unwrap().is_valid());
    }

    #[test]
    fn test_encoded_empty_array_respects_not_empty() {
        let schema = Schema::new().field("items", FieldRule::array_of(Schema::new()).not_empty());
        let outcome = engine(ValidationMode::CollectAll)
            .validate(&object(json!({"items": "[]"})), &schema, false)
            .unwrap();
        assert_eq!(
            outcome.errors().unwrap().get("items").and_then(FieldError::as_message),
            Some("Field cannot be empty.")
        );
    }

    #[test]
    fn test_untyped_field_checks_presence_only() {
        let schema = Schema::new().field("anything", FieldRule::new().required());
        let engine = engine(ValidationMode::CollectAll);
        assert!(engine.validate(&object(json!({"anything": [1, "two"]})), &schema, false).unwrap().is_valid());
        assert!(!engine.validate(&object(json!({})), &schema, false).unwrap().is_valid());
    }

    #[test]
    fn test_depth_limit() {
        let mut schema = Schema::new().field("leaf", FieldRule::scalar(ScalarType::String));
        let mut data = json!({"leaf": "x"});
        for _ in 0..5 {
            schema = Schema::new().field("child", FieldRule::object(schema));
            data = json!({ "child": data });
        }
        let data = object(data);

        let shallow = engine(ValidationMode::CollectAll).with_max_depth(3);
        assert!(matches!(
            shallow.validate(&data, &schema, false),
            Err(Error::DepthLimitExceeded { max_depth: 3 })
        ));

        let deep = engine(ValidationMode::CollectAll).with_max_depth(5);
        assert!(deep.validate(&data, &schema, false).unwrap().is_valid());
    }

    #[test]
    fn test_idempotent() {
        let data = object(json!({"name": "Ana", "extra": true}));
        let engine = engine(ValidationMode::CollectAll);
        let first = engine.validate(&data, &person_schema(), true).unwrap();
        let second = engine.validate(&data, &person_schema(), true).unwrap();
        assert_eq!(first, second);
    }

    #[test]
    fn test_closure_translator() {
        let translator = |category: &str, key: &str, _: &Placeholders| format!("{}.{}", category, key);
        let engine = Engine::with_translator(ValidationMode::CollectAll, translator);
        let outcome = engine.validate(&object(json!({"x": 1})), &person_schema(), true).unwrap();

        let errors = outcome.errors().unwrap();
        assert_eq!(errors.get("x").and_then(FieldError::as_message), Some("common.strict_mode"));
        assert_eq!(errors.get("name").and_then(FieldError::as_message), Some("common.required"));
    }

    #[test]
    fn test_check_normalizes_input() {
        let config = EngineConfig::default().with_input_type(InputType::Json);
        let engine = Engine::new(&config).unwrap();
        let schema = Schema::new().field("age", FieldRule::scalar(ScalarType::Int));

        assert!(engine.check(r#"{"age": 4}"#, &schema, false).unwrap().is_valid());
        assert!(!engine.check(r#"{"age": "four"}"#, &schema, false).unwrap().is_valid());
        assert!(matches!(
            engine.check("{broken", &schema, false),
            Err(Error::InputShape { .. })
        ));
    }

    #[test]
    fn test_unknown_locale_is_fatal() {
        let config = EngineConfig::default().with_locale("xx-YY");
        assert!(matches!(Engine::new(&config), Err(Error::UnknownLocale { .. })));
    }

    #[test]
    fn test_engine_is_shareable() {
        fn assert_send_sync<T: Send + Sync>() {}
        assert_send_sync::<Engine>();
    }
}
