//! User-facing message lookup
//!
//! Validators never build message text themselves. They ask a [`Translator`]
//! for a `(category, key)` pair plus placeholder values, and the translator
//! returns the rendered string. [`MessageCatalog`] is the file-backed
//! implementation with built-in `en` and `pt-BR` message sets; any
//! `Fn(&str, &str, &Placeholders) -> String` closure works as well.
//!
//! Copyright (c) 2025 Conform Team
//! Licensed under the Apache-2.0 license

use crate::error::{Error, Result};
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;
use std::path::Path;

/// Placeholder values substituted into `{name}` tokens
pub type Placeholders = BTreeMap<String, String>;

/// Build a placeholder map from `(name, value)` pairs
pub fn placeholders<I, K, V>(pairs: I) -> Placeholders
where
    I: IntoIterator<Item = (K, V)>,
    K: Into<String>,
    V: ToString,
{
    pairs
        .into_iter()
        .map(|(k, v)| (k.into(), v.to_string()))
        .collect()
}

/// Maps a message category and key to a localized string
pub trait Translator: Send + Sync {
    fn translate(&self, category: &str, key: &str, placeholders: &Placeholders) -> String;

    /// Translate a message that takes no placeholders
    fn message(&self, category: &str, key: &str) -> String {
        self.translate(category, key, &Placeholders::new())
    }
}

impl<F> Translator for F
where
    F: Fn(&str, &str, &Placeholders) -> String + Send + Sync,
{
    fn translate(&self, category: &str, key: &str, placeholders: &Placeholders) -> String {
        self(category, key, placeholders)
    }
}

/// Replace every `{name}` token that has a value in `placeholders`
///
/// The template is scanned once, so substituted values are never expanded
/// again. Tokens without a value are kept as written.
pub fn render(template: &str, placeholders: &Placeholders) -> String {
    let mut message = String::with_capacity(template.len());
    let mut rest = template;

    while let Some(open) = rest.find('{') {
        message.push_str(&rest[..open]);
        let after = &rest[open + 1..];
        let value = after
            .find('}')
            .and_then(|close| placeholders.get(&after[..close]).map(|value| (close, value)));

        match value {
            Some((close, value)) => {
                message.push_str(value);
                rest = &after[close + 1..];
            }
            None => {
                message.push('{');
                rest = after;
            }
        }
    }

    message.push_str(rest);
    message
}

const EN: &str = include_str!("../../locales/en.json");
const PT_BR: &str = include_str!("../../locales/pt-BR.json");

/// Locales with a built-in message set
pub const BUILTIN_LOCALES: &[&str] = &["en", "pt-BR"];

/// A message set: category -> key -> template
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct MessageCatalog {
    messages: BTreeMap<String, BTreeMap<String, String>>,
}

impl MessageCatalog {
    /// The built-in message set for `locale` (matched case-insensitively)
    pub fn for_locale(locale: &str) -> Result<Self> {
        let source = match locale.to_lowercase().replace('_', "-").as_str() {
            "en" | "en-us" => EN,
            "pt-br" | "pt" => PT_BR,
            _ => {
                return Err(Error::UnknownLocale {
                    locale: locale.to_string(),
                })
            }
        };

        serde_json::from_str(source).map_err(|e| {
            Error::configuration(format!("built-in catalog for '{}' is malformed: {}", locale, e))
        })
    }

    /// Load an external message set from a JSON or YAML file
    pub fn from_file(path: &Path) -> Result<Self> {
        crate::loader::read_document(path)
    }

    /// Overlay `other` on top of this catalog; its templates win
    pub fn merge(&mut self, other: MessageCatalog) {
        for (category, keys) in other.messages {
            self.messages.entry(category).or_default().extend(keys);
        }
    }

    /// Add or replace a single template
    pub fn insert(&mut self, category: impl Into<String>, key: impl Into<String>, template: impl Into<String>) {
        self.messages
            .entry(category.into())
            .or_default()
            .insert(key.into(), template.into());
    }

    pub fn template(&self, category: &str, key: &str) -> Option<&str> {
        self.messages
            .get(category)
            .and_then(|keys| keys.get(key))
            .map(String::as_str)
    }
}

impl Translator for MessageCatalog {
    fn translate(&self, category: &str, key: &str, placeholders: &Placeholders) -> String {
        match self.template(category, key) {
            Some(template) => render(template, placeholders),
            None => {
                tracing::warn!(category, key, "Missing translation");
                format!("Missing translation: {}.{}", category, key)
            }
        }
    }
}
