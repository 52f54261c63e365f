//! Command handlers for CLI subcommands
//!
//! This module contains the implementation logic for each CLI subcommand.

mod check;
mod completions;
mod schema;

pub use check::handle_check;
pub use completions::handle_completions;
pub use schema::handle_schema;
