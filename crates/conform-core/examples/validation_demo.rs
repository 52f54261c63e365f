//! Validation demonstration example
//!
//! Loads the bundled product schemas and validates a few payloads in both
//! validation modes.
//!
//! Copyright (c) 2025 Conform Team
//! Licensed under the Apache-2.0 license

use conform_core::{Engine, EngineConfig, Schema, ValidationMode};
use serde_json::json;
use std::path::Path;

fn main() -> Result<(), Box<dyn std::error::Error>> {
    println!("=== Conform Validation Demo ===\n");

    let schema_path = Path::new(env!("CARGO_MANIFEST_DIR")).join("../../schemas/products.yaml");
    let schema = Schema::from_file(&schema_path)?;

    let payload = json!({
        "products": [
            {"category": "SMARTPHONES", "name": "Phone X", "stock": 10},
            {"category": "BOOKS", "name": "Runner"},
            {"category": "SHOES", "name": "Trail", "stock": 0}
        ],
        "coupon": "WELCOME"
    });
    let data = payload.as_object().ok_or("payload must be an object")?;

    for mode in [ValidationMode::CollectAll, ValidationMode::FailFast] {
        let engine = Engine::new(&EngineConfig::default().with_mode(mode))?;

        println!("--- {} (strict) ---", mode);
        let outcome = engine.validate(data, &schema, true)?;
        match outcome.errors() {
            None => println!("✅ Valid!"),
            Some(errors) => {
                for (path, message) in errors.flatten() {
                    println!("❌ {}: {}", path, message);
                }
            }
        }
        println!("{}\n", serde_json::to_string_pretty(&outcome)?);
    }

    Ok(())
}
