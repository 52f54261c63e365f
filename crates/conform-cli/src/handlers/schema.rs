//! Schema command handler

use crate::cli::{OutputFormat, SchemaArgs};
use crate::error::{Error, Result};
use crate::output::{describe_schema, OutputWriter};
use conform_core::Schema;
use tracing::{debug, instrument};

/// Handle the schema command: load a declaration and describe its fields
#[instrument(skip_all, fields(schema = %args.schema.display()))]
pub fn handle_schema(args: SchemaArgs, output: &mut OutputWriter) -> Result<()> {
    if !args.schema.exists() {
        return Err(Error::FileNotFound { path: args.schema });
    }

    let schema = Schema::from_file(&args.schema)?;
    debug!(fields = schema.len(), depth = schema.depth(), "Schema loaded");

    if output.format() != OutputFormat::Human {
        return output.data(&schema);
    }

    output.section(&format!("Schema {}", args.schema.display()))?;

    let rows = describe_schema(&schema)
        .into_iter()
        .map(|row| {
            vec![
                row.path,
                row.type_name,
                yes_no(row.required),
                yes_no(row.not_empty),
                row.constraints,
            ]
        })
        .collect();
    output.table(&["Field", "Type", "Required", "Not empty", "Constraints"], rows)?;

    output.success(&format!("{} top-level field(s), nesting depth {}", schema.len(), schema.depth()))
}

fn yes_no(flag: bool) -> String {
    if flag { "yes" } else { "no" }.to_string()
}
