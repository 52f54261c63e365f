//! Raw input normalization
//!
//! The engine only ever sees a JSON object. Callers hand it either data that
//! is already structured or a text payload, and the configured
//! [`InputType`] decides which of the two is acceptable.

use crate::error::{Error, Result};
use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};
use std::fmt;
use std::str::FromStr;

/// Shape the engine expects raw input to arrive in
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum InputType {
    /// Already-structured key/value data
    #[default]
    Array,
    /// A JSON text that decodes to an object
    Json,
}

impl InputType {
    pub fn as_str(&self) -> &'static str {
        match self {
            InputType::Array => "array",
            InputType::Json => "json",
        }
    }
}

impl fmt::Display for InputType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for InputType {
    type Err = Error;

    fn from_str(s: &str) -> Result<Self> {
        match s.to_lowercase().as_str() {
            "array" => Ok(InputType::Array),
            "json" => Ok(InputType::Json),
            other => Err(Error::configuration(format!(
                "unknown input type '{}', expected 'array' or 'json'",
                other
            ))),
        }
    }
}

/// Input as received from a caller
#[derive(Debug, Clone, PartialEq)]
pub enum RawInput {
    Structured(Value),
    Text(String),
}

impl From<Value> for RawInput {
    fn from(value: Value) -> Self {
        RawInput::Structured(value)
    }
}

impl From<String> for RawInput {
    fn from(text: String) -> Self {
        RawInput::Text(text)
    }
}

impl From<&str> for RawInput {
    fn from(text: &str) -> Self {
        RawInput::Text(text.to_string())
    }
}

/// Turn raw input into the object the engine validates
pub fn normalize(raw: RawInput, input_type: InputType) -> Result<Map<String, Value>> {
    match (input_type, raw) {
        (InputType::Array, RawInput::Structured(Value::Object(map))) => Ok(map),
        (InputType::Array, RawInput::Structured(other)) => Err(Error::input_shape(
            input_type.as_str(),
            format!("expected an object, found {}", kind(&other)),
        )),
        (InputType::Array, RawInput::Text(_)) => Err(Error::input_shape(
            input_type.as_str(),
            "expected structured data, found text",
        )),
        (InputType::Json, RawInput::Text(text)) => {
            let decoded: Value = serde_json::from_str(&text)
                .map_err(|e| Error::input_shape(input_type.as_str(), format!("invalid JSON: {}", e)))?;
            match decoded {
                Value::Object(map) => Ok(map),
                other => Err(Error::input_shape(
                    input_type.as_str(),
                    format!("JSON text must decode to an object, found {}", kind(&other)),
                )),
            }
        }
        (InputType::Json, RawInput::Structured(_)) => Err(Error::input_shape(
            input_type.as_str(),
            "expected JSON text, found structured data",
        )),
    }
}

fn kind(value: &Value) -> &'static str {
    match value {
        Value::Null => "null",
        Value::Bool(_) => "a boolean",
        Value::Number(_) => "a number",
        Value::String(_) => "a string",
        Value::Array(_) => "an array",
        Value::Object(_) => "an object",
    }
}
