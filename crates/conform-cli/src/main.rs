//! Conform CLI - validate structured payloads against declarative schemas
//!
//! This is the main entry point for the `conform` binary, providing
//! commands for checking payloads and describing schema declarations.

mod cli;
mod config;
mod error;
mod handlers;
mod logging;
mod output;

use cli::{Cli, Commands};
use colored::control;
use config::Config;
use error::Result;
use logging::{timing::Timer, LoggingConfig};
use output::OutputWriter;
use std::process;
use tracing::instrument;

fn main() {
    let cli = Cli::parse_args();

    control::set_override(cli.use_color());

    if let Err(e) = init_logging(&cli) {
        eprintln!("Failed to initialize logging: {}", e);
    }

    match run(cli) {
        Ok(()) => process::exit(0),
        Err(e) => {
            if e.should_report() {
                eprintln!("{}", error::format_error(&e, control::SHOULD_COLORIZE.should_colorize()));
            }
            process::exit(e.exit_code());
        }
    }
}

/// Main application logic
#[instrument(skip(cli), fields(command = ?cli.command))]
fn run(cli: Cli) -> Result<()> {
    let _timer = Timer::new("cli_execution");

    let config = {
        let _config_timer = Timer::new("config_loading");
        tracing::info!("Loading configuration");
        Config::load_with_file(cli.config.as_deref())?
    };

    let mut output = OutputWriter::new(cli.output, cli.use_color() && config.output.color, cli.quiet);

    tracing::info!(verbosity = cli.verbosity_level(), "Executing command");

    match cli.command {
        Commands::Check(args) => handlers::handle_check(args, &config, &mut output),
        Commands::Schema(args) => handlers::handle_schema(args, &mut output),
        Commands::Completions(args) => handlers::handle_completions(args),
    }
}

/// Initialize the logging system
fn init_logging(cli: &Cli) -> Result<()> {
    let mut logging_config = LoggingConfig::from_verbosity(cli.verbosity_level());
    logging_config.merge_with_env();

    if cli.quiet {
        logging_config.level = "error".to_string();
        logging_config.console = false;
    }

    logging::init_logging(logging_config)
}

#[cfg(test)]
mod tests {
    use super::*;
    use clap::Parser;

    #[test]
    fn test_cli_parsing() {
        let cli = Cli::parse_from(["conform", "-vv", "check", "order.json", "--schema", "products.yaml"]);
        assert_eq!(cli.verbosity_level(), 2);
        assert!(matches!(cli.command, Commands::Check(_)));

        let cli = Cli::parse_from(["conform", "--quiet", "schema", "products.yaml"]);
        assert_eq!(cli.verbosity_level(), 0);
        assert!(cli.quiet);
    }

    #[test]
    fn test_run_reports_validation_failure() {
        let dir = tempfile::TempDir::new().unwrap();
        let schema = dir.path().join("schema.yaml");
        let payload = dir.path().join("payload.json");
        let config = dir.path().join("conform.yaml");
        std::fs::write(&schema, "name: { type: String, required: true }\n").unwrap();
        std::fs::write(&payload, "{}").unwrap();
        std::fs::write(&config, "engine:\n  validation-mode: fail-fast\n").unwrap();

        let args: Vec<std::ffi::OsString> = vec![
            "conform".into(),
            "--quiet".into(),
            "--output".into(),
            "json".into(),
            "--config".into(),
            config.into_os_string(),
            "check".into(),
            payload.into_os_string(),
            "--schema".into(),
            schema.into_os_string(),
        ];
        let cli = Cli::parse_from(args);

        let err = run(cli).unwrap_err();
        assert_eq!(err.exit_code(), 1);
        assert!(!err.should_report());
    }
}
