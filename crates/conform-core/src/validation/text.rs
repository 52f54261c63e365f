//! Text family validators: String, Email, Name, Url, Enum, Phone, CPF, CNPJ
//! and UUID
//!
//! Each validator checks the format first; character-length bounds are
//! applied afterwards to every text type except `Enum`.
//!
//! Copyright (c) 2025 Conform Team
//! Licensed under the Apache-2.0 license

use super::RuleResult;
use crate::messages::{placeholders, Translator};
use crate::schema::{FieldRule, ScalarType};
use regex::Regex;
use serde_json::Value;
use std::sync::OnceLock;

static EMAIL_REGEX: OnceLock<Regex> = OnceLock::new();
static NAME_REGEX: OnceLock<Regex> = OnceLock::new();
static PHONE_REGEX: OnceLock<Regex> = OnceLock::new();
static UUID_REGEX: OnceLock<Regex> = OnceLock::new();

const CNPJ_WEIGHTS_FIRST: [u32; 12] = [5, 4, 3, 2, 9, 8, 7, 6, 5, 4, 3, 2];
const CNPJ_WEIGHTS_SECOND: [u32; 13] = [6, 5, 4, 3, 2, 9, 8, 7, 6, 5, 4, 3, 2];

fn email_regex() -> &'static Regex {
    EMAIL_REGEX.get_or_init(|| {
        Regex::new(
            r"^[A-Za-z0-9.!#$%&'*+/=?^_`{|}~-]+@[A-Za-z0-9](?:[A-Za-z0-9-]{0,61}[A-Za-z0-9])?(?:\.[A-Za-z0-9](?:[A-Za-z0-9-]{0,61}[A-Za-z0-9])?)+$",
        )
        .expect("email pattern is valid")
    })
}

fn name_regex() -> &'static Regex {
    NAME_REGEX.get_or_init(|| Regex::new(r"^[a-zA-ZÀ-ÖØ-öø-ÿ\s]+$").expect("name pattern is valid"))
}

fn phone_regex() -> &'static Regex {
    // Optional country code, then a valid area code, then 8 or 9 subscriber digits
    PHONE_REGEX.get_or_init(|| {
        Regex::new(
            r"^(?:55)?(?:1[1-9]|2[12478]|3[1234578]|4[13578]|5[13578]|6[1235678]|7[134579]|8[1345678]|9[1-9])[0-9]{8,9}$",
        )
        .expect("phone pattern is valid")
    })
}

fn uuid_regex() -> &'static Regex {
    UUID_REGEX.get_or_init(|| {
        Regex::new(r"(?i)^[0-9a-f]{8}-[0-9a-f]{4}-4[0-9a-f]{3}-[89ab][0-9a-f]{3}-[0-9a-f]{12}$")
            .expect("uuid pattern is valid")
    })
}

/// Validate `value` as the text type `scalar`, then its length bounds
pub fn validate(value: &Value, scalar: ScalarType, rule: &FieldRule, translator: &dyn Translator) -> RuleResult {
    match scalar {
        ScalarType::String => validate_string(value, translator)?,
        ScalarType::Email => validate_email(value, translator)?,
        ScalarType::Name => validate_name(value, translator)?,
        ScalarType::Url => validate_url(value, translator)?,
        ScalarType::Enum => return validate_enum(value, &rule.options, translator),
        ScalarType::Phone => validate_phone(value, translator)?,
        ScalarType::Cpf => validate_cpf(value, translator)?,
        ScalarType::Cnpj => validate_cnpj(value, translator)?,
        ScalarType::Uuid => validate_uuid(value, translator)?,
        ScalarType::Int | ScalarType::Decimal | ScalarType::Bool => return Ok(()),
    }

    validate_length(value, rule.min_length, rule.max_length, translator)
}

fn validate_string(value: &Value, translator: &dyn Translator) -> RuleResult {
    if !value.is_string() {
        return Err(translator.message("text", "string"));
    }
    Ok(())
}

fn validate_email(value: &Value, translator: &dyn Translator) -> RuleResult {
    match value.as_str() {
        Some(email) if is_email(email) => Ok(()),
        _ => Err(translator.message("text", "email")),
    }
}

fn is_email(email: &str) -> bool {
    let Some((local, _domain)) = email.rsplit_once('@') else {
        return false;
    };
    email.len() <= 254
        && local.len() <= 64
        && !local.starts_with('.')
        && !local.ends_with('.')
        && !local.contains("..")
        && email_regex().is_match(email)
}

fn validate_url(value: &Value, translator: &dyn Translator) -> RuleResult {
    let valid = value
        .as_str()
        .and_then(|text| url::Url::parse(text).ok())
        .map(|parsed| parsed.host_str().is_some_and(|host| !host.is_empty()))
        .unwrap_or(false);

    if valid {
        Ok(())
    } else {
        Err(translator.message("text", "url"))
    }
}

fn validate_name(value: &Value, translator: &dyn Translator) -> RuleResult {
    let Some(name) = value.as_str() else {
        return Err(translator.message("text", "name"));
    };

    if !name_regex().is_match(name) {
        return Err(translator.message("text", "name_letters_only"));
    }

    if name.split(' ').filter(|part| !part.is_empty()).count() < 2 {
        return Err(translator.message("text", "name_full_required"));
    }

    Ok(())
}

fn validate_enum(value: &Value, options: &[Value], translator: &dyn Translator) -> RuleResult {
    if options.contains(value) {
        return Ok(());
    }

    let shown = match value {
        Value::String(text) => text.clone(),
        other => other.to_string(),
    };
    Err(translator.translate("text", "enum_invalid", &placeholders([("value", shown)])))
}

fn validate_phone(value: &Value, translator: &dyn Translator) -> RuleResult {
    let Some(phone) = value.as_str() else {
        return Err(translator.message("text", "phone_format"));
    };

    if !phone_regex().is_match(&digits_only(phone)) {
        return Err(translator.message("text", "phone_invalid"));
    }
    Ok(())
}

fn validate_cpf(value: &Value, translator: &dyn Translator) -> RuleResult {
    let Some(cpf) = value.as_str() else {
        return Err(translator.message("text", "cpf_format"));
    };

    if is_cpf(&digit_values(cpf)) {
        Ok(())
    } else {
        Err(translator.message("text", "cpf_invalid"))
    }
}

fn validate_cnpj(value: &Value, translator: &dyn Translator) -> RuleResult {
    let Some(cnpj) = value.as_str() else {
        return Err(translator.message("text", "cnpj_format"));
    };

    if is_cnpj(&digit_values(cnpj)) {
        Ok(())
    } else {
        Err(translator.message("text", "cnpj_invalid"))
    }
}

fn validate_uuid(value: &Value, translator: &dyn Translator) -> RuleResult {
    let Some(uuid) = value.as_str() else {
        return Err(translator.message("text", "uuid_format"));
    };

    if !uuid_regex().is_match(uuid) {
        return Err(translator.message("text", "uuid_invalid"));
    }
    Ok(())
}

/// Character-count bounds; non-string values have already been rejected
fn validate_length(
    value: &Value,
    min_length: Option<usize>,
    max_length: Option<usize>,
    translator: &dyn Translator,
) -> RuleResult {
    let Some(text) = value.as_str() else {
        return Ok(());
    };
    let length = text.chars().count();

    if let Some(min) = min_length {
        if length < min {
            return Err(translator.translate("text", "min_length", &placeholders([("min", min)])));
        }
    }
    if let Some(max) = max_length {
        if length > max {
            return Err(translator.translate("text", "max_length", &placeholders([("max", max)])));
        }
    }
    Ok(())
}

fn digits_only(text: &str) -> String {
    text.chars().filter(char::is_ascii_digit).collect()
}

fn digit_values(text: &str) -> Vec<u32> {
    text.chars().filter_map(|c| c.to_digit(10)).collect()
}

fn all_same(digits: &[u32]) -> bool {
    digits.windows(2).all(|pair| pair[0] == pair[1])
}

/// Weighted sum over the leading digits with weights counting down to 2
fn cpf_check_digit(digits: &[u32]) -> u32 {
    let top = digits.len() as u32 + 1;
    let sum: u32 = digits
        .iter()
        .enumerate()
        .map(|(i, d)| d * (top - i as u32))
        .sum();
    let digit = (sum * 10) % 11;
    if digit == 10 {
        0
    } else {
        digit
    }
}

fn is_cpf(digits: &[u32]) -> bool {
    if digits.len() != 11 || all_same(digits) {
        return false;
    }
    cpf_check_digit(&digits[..9]) == digits[9] && cpf_check_digit(&digits[..10]) == digits[10]
}

fn cnpj_check_digit(digits: &[u32], weights: &[u32]) -> u32 {
    let sum: u32 = digits.iter().zip(weights).map(|(d, w)| d * w).sum();
    let remainder = sum % 11;
    if remainder < 2 {
        0
    } else {
        11 - remainder
    }
}

fn is_cnpj(digits: &[u32]) -> bool {
    if digits.len() != 14 || all_same(digits) {
        return false;
    }
    cnpj_check_digit(&digits[..12], &CNPJ_WEIGHTS_FIRST) == digits[12]
        && cnpj_check_digit(&digits[..13], &CNPJ_WEIGHTS_SECOND) == digits[13]
}
