//! Numeric family validators: Int, Decimal and Bool
//!
//! Only `Int` carries extra bounds. Range bounds (`min_value`/`max_value`)
//! are checked before digit-length bounds (`min_length`/`max_length`), and
//! the first failing check is the one reported.
//!
//! `Int` accepts a native integer of any sign, but a string only when it is
//! made of decimal digits. `"-5"` is therefore rejected while `-5` passes.
//! Callers that need signed digit strings must normalize them first.
//!
//! Copyright (c) 2025 Conform Team
//! Licensed under the Apache-2.0 license

use super::RuleResult;
use crate::messages::{placeholders, Translator};
use crate::schema::{FieldRule, ScalarType};
use regex::Regex;
use serde_json::Value;
use std::sync::OnceLock;

static DECIMAL_REGEX: OnceLock<Regex> = OnceLock::new();

const BOOL_TOKENS: [&str; 4] = ["1", "0", "true", "false"];

fn decimal_regex() -> &'static Regex {
    DECIMAL_REGEX.get_or_init(|| Regex::new(r"^-?\d+(\.\d+)?$").expect("decimal pattern is valid"))
}

/// Validate `value` as the numeric type `scalar`, then the `Int` bounds
pub fn validate(value: &Value, scalar: ScalarType, rule: &FieldRule, translator: &dyn Translator) -> RuleResult {
    match scalar {
        ScalarType::Int => {
            validate_integer(value, translator)?;
            validate_range(value, rule.min_value, rule.max_value, translator)?;
            validate_digit_length(value, rule.min_length, rule.max_length, translator)
        }
        ScalarType::Decimal => validate_decimal(value, translator),
        ScalarType::Bool => validate_boolean(value, translator),
        _ => Ok(()),
    }
}

fn is_digit_string(text: &str) -> bool {
    !text.is_empty() && text.bytes().all(|b| b.is_ascii_digit())
}

fn validate_integer(value: &Value, translator: &dyn Translator) -> RuleResult {
    let accepted = match value {
        Value::Number(n) => n.is_i64() || n.is_u64(),
        Value::String(text) => is_digit_string(text),
        _ => false,
    };

    if accepted {
        Ok(())
    } else {
        Err(translator.message("number", "integer"))
    }
}

fn validate_decimal(value: &Value, translator: &dyn Translator) -> RuleResult {
    let accepted = match value {
        // serde_json numbers are always finite
        Value::Number(_) => true,
        Value::String(text) => decimal_regex().is_match(text),
        _ => false,
    };

    if accepted {
        Ok(())
    } else {
        Err(translator.message("number", "decimal"))
    }
}

fn validate_boolean(value: &Value, translator: &dyn Translator) -> RuleResult {
    let accepted = match value {
        Value::Bool(_) => true,
        Value::Number(n) => matches!(n.as_u64(), Some(0) | Some(1)),
        Value::String(text) => BOOL_TOKENS.contains(&text.as_str()),
        _ => false,
    };

    if accepted {
        Ok(())
    } else {
        Err(translator.message("number", "boolean"))
    }
}

/// Integer value of an accepted `Int`; digit strings too long for `i128`
/// saturate, which still compares correctly against `i64` bounds
fn integer_value(value: &Value) -> Option<i128> {
    match value {
        Value::Number(n) => n
            .as_i64()
            .map(i128::from)
            .or_else(|| n.as_u64().map(i128::from)),
        Value::String(text) if is_digit_string(text) => Some(text.parse::<i128>().unwrap_or(i128::MAX)),
        _ => None,
    }
}

fn validate_range(
    value: &Value,
    min_value: Option<i64>,
    max_value: Option<i64>,
    translator: &dyn Translator,
) -> RuleResult {
    let Some(number) = integer_value(value) else {
        return Ok(());
    };

    if let Some(min) = min_value {
        if number < i128::from(min) {
            return Err(translator.translate("number", "min_value", &placeholders([("min", min)])));
        }
    }
    if let Some(max) = max_value {
        if number > i128::from(max) {
            return Err(translator.translate("number", "max_value", &placeholders([("max", max)])));
        }
    }
    Ok(())
}

/// Length of the decimal string form, sign included
fn validate_digit_length(
    value: &Value,
    min_length: Option<usize>,
    max_length: Option<usize>,
    translator: &dyn Translator,
) -> RuleResult {
    let length = match value {
        Value::String(text) => text.chars().count(),
        other => other.to_string().len(),
    };

    if let Some(min) = min_length {
        if length < min {
            return Err(translator.translate("number", "min_length", &placeholders([("min", min)])));
        }
    }
    if let Some(max) = max_length {
        if length > max {
            return Err(translator.translate("number", "max_length", &placeholders([("max", max)])));
        }
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::messages::MessageCatalog;
    use serde_json::json;

    fn check(scalar: ScalarType, rule: &FieldRule, value: Value) -> RuleResult {
        let catalog = MessageCatalog::for_locale("en").unwrap();
        validate(&value, scalar, rule, &catalog)
    }

    fn int(value: Value) -> RuleResult {
        check(ScalarType::Int, &FieldRule::scalar(ScalarType::Int), value)
    }

    #[test]
    fn test_integer_forms() {
        assert!(int(json!(25)).is_ok());
        assert!(int(json!("25")).is_ok());
        assert!(int(json!(0)).is_ok());
        assert!(int(json!(u64::MAX)).is_ok());

        assert_eq!(int(json!("not-a-number")), Err("Must be an integer.".to_string()));
        assert!(int(json!(1.5)).is_err());
        assert!(int(json!("1.5")).is_err());
        assert!(int(json!("+5")).is_err());
        assert!(int(json!(true)).is_err());
    }

    #[test]
    fn test_negative_integer_asymmetry() {
        assert!(int(json!(-123)).is_ok());
        assert_eq!(int(json!("-123")), Err("Must be an integer.".to_string()));
    }

    #[test]
    fn test_range() {
        let rule = FieldRule::scalar(ScalarType::Int).min_value(1).max_value(100);
        assert!(check(ScalarType::Int, &rule, json!(1)).is_ok());
        assert!(check(ScalarType::Int, &rule, json!("100")).is_ok());
        assert_eq!(
            check(ScalarType::Int, &rule, json!(0)),
            Err("Must be greater than or equal to 1.".to_string())
        );
        assert_eq!(
            check(ScalarType::Int, &rule, json!("101")),
            Err("Must be less than or equal to 100.".to_string())
        );
        assert!(check(ScalarType::Int, &rule, json!("99999999999999999999999999999999999999999")).is_err());
    }

    #[test]
    fn test_digit_length() {
        let rule = FieldRule::scalar(ScalarType::Int).min_length(2).max_length(4);
        assert!(check(ScalarType::Int, &rule, json!(12)).is_ok());
        assert!(check(ScalarType::Int, &rule, json!("0012")).is_ok());
        assert_eq!(
            check(ScalarType::Int, &rule, json!(7)),
            Err("Must have at least 2 digits.".to_string())
        );
        assert_eq!(
            check(ScalarType::Int, &rule, json!(12345)),
            Err("Must have at most 4 digits.".to_string())
        );
        // the sign counts towards the length
        assert!(check(ScalarType::Int, &rule, json!(-1)).is_ok());
    }

    #[test]
    fn test_range_is_checked_before_length() {
        let rule = FieldRule::scalar(ScalarType::Int).min_value(10).min_length(3);
        assert_eq!(
            check(ScalarType::Int, &rule, json!(5)),
            Err("Must be greater than or equal to 10.".to_string())
        );
        assert_eq!(
            check(ScalarType::Int, &rule, json!(50)),
            Err("Must have at least 3 digits.".to_string())
        );
    }

    #[test]
    fn test_decimal() {
        let rule = FieldRule::scalar(ScalarType::Decimal);
        for ok in [json!(1), json!(-2.5), json!(1e-7), json!(1e300), json!("3.14"), json!("-10"), json!("0.0")] {
            assert!(check(ScalarType::Decimal, &rule, ok.clone()).is_ok(), "{}", ok);
        }
        for bad in [json!("1."), json!(".5"), json!("1,5"), json!("1e3"), json!(" 1"), json!(true), json!("abc")] {
            assert_eq!(
                check(ScalarType::Decimal, &rule, bad.clone()),
                Err("Must be a decimal number.".to_string()),
                "{}",
                bad
            );
        }
    }

    #[test]
    fn test_decimal_ignores_bounds() {
        let rule = FieldRule::scalar(ScalarType::Decimal).min_value(100).max_length(1);
        assert!(check(ScalarType::Decimal, &rule, json!("2.75")).is_ok());
    }

    #[test]
    fn test_boolean_tokens() {
        let rule = FieldRule::scalar(ScalarType::Bool);
        for ok in [json!(true), json!(false), json!(1), json!(0), json!("1"), json!("0"), json!("true"), json!("false")] {
            assert!(check(ScalarType::Bool, &rule, ok.clone()).is_ok(), "{}", ok);
        }
        for bad in [json!(2), json!(1.0), json!("yes"), json!("TRUE"), json!(-1), json!(null)] {
            assert_eq!(
                check(ScalarType::Bool, &rule, bad.clone()),
                Err("Must be a boolean.".to_string()),
                "{}",
                bad
            );
        }
    }
}
