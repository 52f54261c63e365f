//! Check command handler: validate one payload against one schema

use crate::cli::CheckArgs;
use crate::config::Config;
use crate::error::{Error, ErrorContext, Result};
use crate::logging::{redaction, timing::Timer};
use crate::output::OutputWriter;
use conform_core::{Engine, EngineConfig, InputType, MessageCatalog, RawInput, Schema, ValidationOutcome};
use serde_json::Value;
use std::io::{self, Read};
use std::path::Path;
use tracing::{debug, info, instrument, trace, warn};

/// Handle the check command
#[instrument(skip_all, fields(payload = %args.payload.display(), schema = %args.schema.display(), strict = args.strict))]
pub fn handle_check(args: CheckArgs, config: &Config, output: &mut OutputWriter) -> Result<()> {
    let timer = Timer::with_details("check_command", &args.payload.display().to_string());
    output.info(&format!("Checking {} against {}", args.payload.display(), args.schema.display()))?;

    let outcome = run_check(&args, config)?;
    debug!(elapsed_ms = timer.elapsed().as_millis() as u64, "Check finished");

    output.outcome(&outcome, &payload_label(&args.payload))?;

    match outcome.errors() {
        None => {
            info!("Payload is valid");
            Ok(())
        }
        Some(errors) => {
            let count = errors.flatten().len();
            warn!(count, "Payload failed validation");
            Err(Error::ValidationFailed { count })
        }
    }
}

/// Load the schema and payload, then validate
fn run_check(args: &CheckArgs, config: &Config) -> Result<ValidationOutcome> {
    let engine_config = effective_config(args, config);
    let engine = build_engine(&engine_config, args.messages.as_deref().or(config.messages.as_deref()))?;

    let schema = load_schema(&args.schema)?;
    let raw = read_payload(&args.payload, engine_config.input_type)?;

    let _timer = Timer::new("validation");
    Ok(engine.check(raw, &schema, args.strict)?)
}

/// Configuration with command-line overrides applied
fn effective_config(args: &CheckArgs, config: &Config) -> EngineConfig {
    let mut engine_config = config.engine.clone();
    if let Some(mode) = args.mode {
        engine_config.validation_mode = mode.into();
    }
    if let Some(locale) = &args.locale {
        engine_config.locale = locale.clone();
    }
    if let Some(input_type) = args.input_type {
        engine_config.input_type = input_type.into();
    }
    debug!(config = ?engine_config, "Effective engine configuration");
    engine_config
}

/// Engine for `config`, with an optional catalog file overlaid on the
/// built-in messages
fn build_engine(config: &EngineConfig, messages: Option<&Path>) -> Result<Engine> {
    let Some(path) = messages else {
        return Ok(Engine::new(config)?);
    };

    let mut catalog = MessageCatalog::for_locale(&config.locale)?;
    catalog.merge(MessageCatalog::from_file(path)?);
    debug!(path = %path.display(), "Loaded message overrides");

    Ok(Engine::with_translator(config.validation_mode, catalog)
        .with_input_type(config.input_type)
        .with_max_depth(config.max_depth))
}

fn load_schema(path: &Path) -> Result<Schema> {
    if !path.exists() {
        return Err(Error::FileNotFound {
            path: path.to_path_buf(),
        });
    }
    let schema = Schema::from_file(path)?;
    debug!(fields = schema.len(), depth = schema.depth(), "Loaded schema");
    Ok(schema)
}

/// Read the payload in the shape the configured input type expects
fn read_payload(path: &Path, input_type: InputType) -> Result<RawInput> {
    let content = read_source(path)?;
    debug!(bytes = content.len(), %input_type, "Read payload");

    match input_type {
        InputType::Json => Ok(RawInput::Text(content)),
        InputType::Array => {
            let value = parse_structured(path, &content)?;
            if tracing::enabled!(tracing::Level::TRACE) {
                let mut logged = value.clone();
                redaction::redact_json_value(&mut logged);
                trace!(payload = %logged, "Parsed payload");
            }
            Ok(RawInput::Structured(value))
        }
    }
}

fn read_source(path: &Path) -> Result<String> {
    if is_stdin(path) {
        let mut content = String::new();
        io::stdin().read_to_string(&mut content).context("Reading payload from stdin")?;
        return Ok(content);
    }

    if !path.exists() {
        return Err(Error::FileNotFound {
            path: path.to_path_buf(),
        });
    }
    std::fs::read_to_string(path).with_context(|| format!("Reading payload {}", path.display()))
}

/// Parse by extension; stdin and unknown extensions are read as YAML, which
/// also accepts JSON
fn parse_structured(path: &Path, content: &str) -> Result<Value> {
    let extension = path
        .extension()
        .and_then(|ext| ext.to_str())
        .map(|ext| ext.to_lowercase());

    match extension.as_deref() {
        Some("json") => serde_json::from_str(content).map_err(|_| Error::InvalidFormat {
            path: path.to_path_buf(),
            expected: "JSON".to_string(),
        }),
        _ => serde_yaml::from_str(content).map_err(|_| Error::InvalidFormat {
            path: path.to_path_buf(),
            expected: "JSON or YAML".to_string(),
        }),
    }
}

fn is_stdin(path: &Path) -> bool {
    path.as_os_str() == "-"
}

fn payload_label(path: &Path) -> String {
    if is_stdin(path) {
        "<stdin>".to_string()
    } else {
        path.display().to_string()
    }
}
