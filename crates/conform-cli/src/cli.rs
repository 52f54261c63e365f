//! Command-line interface argument parsing and definitions
//!
//! This module defines the CLI structure using clap's derive API,
//! providing a type-safe and well-documented command interface.

use clap::{Parser, Subcommand, ValueEnum};
use conform_core::{InputType, ValidationMode};
use std::io::IsTerminal;
use std::path::PathBuf;

/// Conform CLI - validate structured payloads against declarative schemas
///
/// Checks JSON or YAML payloads against a schema file and reports every
/// failing field, or only the first one in fail-fast mode.
#[derive(Parser, Debug)]
#[command(
    name = "conform",
    version,
    author,
    about,
    long_about = None,
    propagate_version = true,
    arg_required_else_help = true
)]
pub struct Cli {
    /// Enable verbose output (can be used multiple times for increased verbosity)
    #[arg(short, long, action = clap::ArgAction::Count, global = true)]
    pub verbose: u8,

    /// Suppress all non-essential output
    #[arg(short, long, global = true, conflicts_with = "verbose")]
    pub quiet: bool,

    /// Path to configuration file
    #[arg(short, long, global = true, env = "CONFORM_CONFIG")]
    pub config: Option<PathBuf>,

    /// Output format for results
    #[arg(short, long, value_enum, global = true, default_value = "human")]
    pub output: OutputFormat,

    /// Disable colored output
    #[arg(long, global = true)]
    pub no_color: bool,

    /// The subcommand to run
    #[command(subcommand)]
    pub command: Commands,
}

/// Available subcommands
#[derive(Subcommand, Debug)]
pub enum Commands {
    /// Validate a payload against a schema
    Check(CheckArgs),

    /// Load a schema file, verify it and describe its fields
    Schema(SchemaArgs),

    /// Generate shell completions for the specified shell
    Completions(CompletionsArgs),
}

/// Arguments for the check command
#[derive(Parser, Debug)]
pub struct CheckArgs {
    /// Path to the payload file (JSON or YAML), or '-' to read stdin
    #[arg(value_name = "PAYLOAD")]
    pub payload: PathBuf,

    /// Path to the schema declaration (JSON or YAML)
    #[arg(short, long, value_name = "SCHEMA")]
    pub schema: PathBuf,

    /// Reject payload keys the schema does not declare
    #[arg(long)]
    pub strict: bool,

    /// Stop at the first error or collect all of them
    #[arg(short, long, value_enum)]
    pub mode: Option<ModeArg>,

    /// Locale of the built-in messages (en, pt-BR)
    #[arg(short, long)]
    pub locale: Option<String>,

    /// How the payload is handed to the engine
    #[arg(long, value_enum)]
    pub input_type: Option<InputTypeArg>,

    /// Message catalog file overriding built-in messages
    #[arg(long, value_name = "CATALOG")]
    pub messages: Option<PathBuf>,
}

/// Arguments for the schema command
#[derive(Parser, Debug)]
pub struct SchemaArgs {
    /// Path to the schema declaration (JSON or YAML)
    #[arg(value_name = "SCHEMA")]
    pub schema: PathBuf,
}

/// Arguments for generating shell completions
#[derive(Parser, Debug)]
pub struct CompletionsArgs {
    /// Shell to generate completions for
    #[arg(value_enum)]
    pub shell: Shell,
}

/// Output format options
#[derive(Copy, Clone, Debug, PartialEq, Eq, ValueEnum)]
pub enum OutputFormat {
    /// Human-readable formatted output
    Human,
    /// JSON output
    Json,
    /// YAML output
    Yaml,
    /// Pretty-printed JSON output
    JsonPretty,
}

/// Validation mode as accepted on the command line
#[derive(Copy, Clone, Debug, PartialEq, Eq, ValueEnum)]
pub enum ModeArg {
    /// Stop at the first failing field
    FailFast,
    /// Report every failing field
    CollectAll,
}

/// Input type as accepted on the command line
#[derive(Copy, Clone, Debug, PartialEq, Eq, ValueEnum)]
pub enum InputTypeArg {
    /// Parse the payload file (JSON or YAML) before validation
    Array,
    /// Hand the payload text to the engine as JSON
    Json,
}

/// Supported shells for completion generation
#[derive(Copy, Clone, Debug, PartialEq, Eq, ValueEnum)]
pub enum Shell {
    /// Bash shell
    Bash,
    /// Zsh shell
    Zsh,
    /// Fish shell
    Fish,
    /// PowerShell
    PowerShell,
    /// Elvish shell
    Elvish,
}

impl Cli {
    /// Parse command-line arguments
    pub fn parse_args() -> Self {
        Self::parse()
    }

    /// Get the effective verbosity level (considering quiet flag)
    pub fn verbosity_level(&self) -> u8 {
        if self.quiet {
            0
        } else {
            self.verbose
        }
    }

    /// Check if colored output should be used
    pub fn use_color(&self) -> bool {
        !self.no_color && std::io::stdout().is_terminal()
    }
}

impl From<ModeArg> for ValidationMode {
    fn from(mode: ModeArg) -> Self {
        match mode {
            ModeArg::FailFast => ValidationMode::FailFast,
            ModeArg::CollectAll => ValidationMode::CollectAll,
        }
    }
}

impl From<InputTypeArg> for InputType {
    fn from(input_type: InputTypeArg) -> Self {
        match input_type {
            InputTypeArg::Array => InputType::Array,
            InputTypeArg::Json => InputType::Json,
        }
    }
}

impl Shell {
    /// Convert to clap_complete shell type
    pub fn to_clap_shell(self) -> clap_complete::Shell {
        match self {
            Shell::Bash => clap_complete::Shell::Bash,
            Shell::Zsh => clap_complete::Shell::Zsh,
            Shell::Fish => clap_complete::Shell::Fish,
            Shell::PowerShell => clap_complete::Shell::PowerShell,
            Shell::Elvish => clap_complete::Shell::Elvish,
        }
    }
}
