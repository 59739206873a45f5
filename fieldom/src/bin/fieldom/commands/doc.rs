use std::io::Read;
use std::path::{Path, PathBuf};

use anyhow::{Context, Result, bail};
use clap::Subcommand;
use fieldom::{Field, FieldError};
use serde_json::Value;

use crate::commands::schema::load_schema;
use crate::context::ProjectContext;
use crate::examples::ExampleGroup;
use crate::output::OutputManager;

pub const EXAMPLES: &[ExampleGroup] = &[ExampleGroup {
    title: "Validate",
    commands: &[
        "fieldom doc clean --schema schemas/blog.json post.json   # Print the cleaned document",
        "cat post.json | fieldom doc clean --schema blog.json -    # Read the document from stdin",
        "fieldom --output compact doc clean -s blog.json post.json",
    ],
}];

#[derive(Subcommand)]
pub enum DocCommands {
    /// Validate a JSON document against a schema and print its serialized form
    #[command(name = "clean")]
    Clean {
        /// JSON schema file
        #[arg(long, short)]
        schema: PathBuf,

        /// JSON document, or '-' for stdin
        document: PathBuf,
    },
}

pub fn handle_doc_commands(command: DocCommands, output: &OutputManager) -> Result<()> {
    let ctx = ProjectContext::find()?;

    match command {
        DocCommands::Clean { schema, document } => handle_clean(&ctx, &schema, &document, output),
    }
}

fn handle_clean(ctx: &ProjectContext, schema: &Path, document: &Path, output: &OutputManager) -> Result<()> {
    let field = load_schema(ctx, schema)?;
    if !field.is_composite() {
        bail!("{} is not an object schema", schema.display());
    }
    let raw = read_document(document)?;

    match clean_document(&field, raw) {
        Ok(cleaned) => output.mapping(&cleaned),
        Err(err) => {
            let path = err.path();
            if path.is_empty() {
                output.error(&format!("Document rejected: {}", err.root_cause()));
            } else {
                output.error(&format!("Field '{path}' rejected: {}", err.root_cause()));
            }
            bail!("Document failed validation");
        }
    }
}

/// Wraps `raw` against the schema, validates every field and returns the wire form.
///
/// A JSON array is treated as a list of documents.
fn clean_document(field: &Field, raw: Value) -> Result<Value, FieldError> {
    let cleaned = field.clean(raw)?;
    field.serialize(&cleaned)
}

fn read_document(path: &Path) -> Result<Value> {
    let content = if path == Path::new("-") {
        let mut buffer = String::new();
        std::io::stdin()
            .read_to_string(&mut buffer)
            .context("Failed to read document from stdin")?;
        buffer
    } else {
        std::fs::read_to_string(path).with_context(|| format!("Failed to read {}", path.display()))?
    };
    serde_json::from_str(&content).with_context(|| format!("Failed to parse {} as JSON", path.display()))
}
