//! Conform Core - schema-driven validation of structured payloads
//!
//! This crate checks API-style payloads (nested objects, lists of objects and
//! scalars) against a declarative [`Schema`] before they reach business logic.
//!
//! ## Features
//!
//! - **Typed Schemas**: a closed set of scalar types plus nested objects and
//!   lists of objects, declared in code or loaded from YAML/JSON
//! - **Strict Mode**: reject keys the schema does not declare
//! - **Validation Modes**: stop at the first error or collect every error
//! - **Localized Messages**: every message comes from a [`Translator`];
//!   built-in `en` and `pt-BR` catalogs are included
//! - **Structured Reports**: errors mirror the payload shape and serialize to
//!   `{"error": {...}}`
//!
//! ## Quick Start
//!
//! ```rust
//! use conform_core::{Engine, EngineConfig, FieldRule, ScalarType, Schema};
//! use serde_json::json;
//!
//! let schema = Schema::new()
//!     .field("name", FieldRule::scalar(ScalarType::Name).required())
//!     .field("email", FieldRule::scalar(ScalarType::Email).required().not_empty());
//!
//! let engine = Engine::new(&EngineConfig::default()).unwrap();
//! let data = json!({"name": "Ana Souza", "email": "not-an-email"});
//!
//! let outcome = engine.validate(data.as_object().unwrap(), &schema, true).unwrap();
//! assert!(!outcome.is_valid());
//! assert_eq!(
//!     serde_json::to_value(&outcome).unwrap(),
//!     json!({"error": {"email": "Must be a valid email address."}})
//! );
//! ```
//!
//! ## Scalar Types
//!
//! - **Text**: String, Email, Name, Url, Enum, Phone, CPF, CNPJ, UUID
//! - **Numeric**: Int, Decimal, Bool
//!
//! Copyright (c) 2025 Conform Team
//! Licensed under the Apache-2.0 license

pub mod config;
pub mod error;
pub mod input;
pub mod loader;
pub mod messages;
pub mod schema;
pub mod validation;

// Re-export commonly used types for convenience
pub use config::EngineConfig;
pub use error::{Error, Result};
pub use input::{normalize, InputType, RawInput};
pub use loader::Format;
pub use messages::{placeholders, MessageCatalog, Placeholders, Translator};
pub use schema::{FieldRule, FieldType, ScalarType, Schema, TypeFamily};
pub use validation::{Engine, ErrorMap, FieldError, ValidationMode, ValidationOutcome};
