use std::path::{Path, PathBuf};

use anyhow::{Context, Result, bail};
use clap::Subcommand;
use comfy_table::{Cell, Table};
use fieldom::{Field, construct_field};
use regex::Regex;
use serde::Serialize;
use serde_json::{Map, Value};
use walkdir::WalkDir;

use crate::context::ProjectContext;
use crate::examples::ExampleGroup;
use crate::output::{OutputManager, TableDisplay};

pub const EXAMPLES: &[ExampleGroup] = &[
    ExampleGroup {
        title: "Inspect",
        commands: &[
            "fieldom schema show schemas/blog.json               # Canonical mapping",
            "fieldom schema fields schemas/blog.json             # Every field with its path",
            "fieldom schema fields schemas/blog.json --match '^author\\.'",
        ],
    },
    ExampleGroup {
        title: "Merge",
        commands: &[
            "fieldom schema merge base.json extra.json           # Existing definitions win",
            "fieldom schema merge --all                          # Every *.json in schemas_dir",
        ],
    },
];

#[derive(Subcommand)]
pub enum SchemaCommands {
    /// Print the canonical mapping of a schema file
    #[command(name = "show")]
    Show {
        /// JSON schema file
        file: PathBuf,
    },

    /// List every field of a schema with its dotted path
    #[command(name = "fields")]
    Fields {
        /// JSON schema file
        file: PathBuf,

        /// Only list paths matching this regular expression
        #[arg(long = "match", value_name = "REGEX")]
        pattern: Option<String>,
    },

    /// Merge schema files in order; definitions already present are kept
    #[command(name = "merge")]
    Merge {
        /// JSON schema files, merged left to right
        files: Vec<PathBuf>,

        /// Merge every *.json file under the configured schemas directory
        #[arg(long, conflicts_with = "files")]
        all: bool,
    },
}

pub fn handle_schema_commands(command: SchemaCommands, output: &OutputManager) -> Result<()> {
    let ctx = ProjectContext::find()?;
    output.verbose(&format!("project root: {}", ctx.project_root.display()));

    match command {
        SchemaCommands::Show { file } => handle_show(&ctx, &file, output),
        SchemaCommands::Fields { file, pattern } => handle_fields(&ctx, &file, pattern.as_deref(), output),
        SchemaCommands::Merge { files, all } => handle_merge(&ctx, files, all, output),
    }
}

fn handle_show(ctx: &ProjectContext, file: &Path, output: &OutputManager) -> Result<()> {
    let field = load_schema(ctx, file)?;
    output.mapping(&Value::Object(field.to_dict()))
}

/// One row of `schema fields`.
#[derive(Debug, Serialize)]
struct FieldRow {
    path: String,
    #[serde(rename = "type")]
    kind: String,
    multi: bool,
    required: bool,
}

#[derive(Debug, Serialize)]
#[serde(transparent)]
struct FieldListing {
    rows: Vec<FieldRow>,
}

impl TableDisplay for FieldListing {
    fn to_table(&self, output: &OutputManager) -> Table {
        let flag = |set: bool| Cell::new(if set { "yes" } else { "" });
        let mut table = output.table(&["Path", "Type", "Multi", "Required"]);
        for row in &self.rows {
            table.add_row(vec![
                Cell::new(&row.path),
                output.type_cell(&row.kind),
                flag(row.multi),
                flag(row.required),
            ]);
        }
        table
    }

    fn to_compact(&self) -> String {
        self.rows
            .iter()
            .map(|row| format!("{}:{}", row.path, row.kind))
            .collect::<Vec<_>>()
            .join(" ")
    }
}

fn list_fields(field: &Field, pattern: Option<&Regex>) -> FieldListing {
    let rows = field
        .walk()
        .filter(|(path, _)| pattern.is_none_or(|re| re.is_match(path)))
        .map(|(path, field)| FieldRow {
            path,
            kind: field.name().to_string(),
            multi: field.is_multi(),
            required: field.is_required(),
        })
        .collect();
    FieldListing { rows }
}

fn handle_fields(ctx: &ProjectContext, file: &Path, pattern: Option<&str>, output: &OutputManager) -> Result<()> {
    let pattern = pattern
        .map(|p| Regex::new(p).with_context(|| format!("Invalid --match pattern '{p}'")))
        .transpose()?;
    let field = load_schema(ctx, file)?;
    if !field.is_composite() {
        bail!("{} describes a single `{}` field, not an object schema", file.display(), field.name());
    }

    let listing = list_fields(&field, pattern.as_ref());
    if output.is_decorated() {
        output.heading(&file.display().to_string());
    }
    output.display(&listing)?;
    if output.is_decorated() {
        output.info(&format!("{} field(s)", listing.rows.len()));
    }
    Ok(())
}

fn handle_merge(ctx: &ProjectContext, files: Vec<PathBuf>, all: bool, output: &OutputManager) -> Result<()> {
    let paths = if all { discover_schemas(&ctx.schemas_dir)? } else { files };
    let merged = merge_files(ctx, &paths, output)?;
    output.mapping(&Value::Object(merged.to_dict()))
}

fn merge_files(ctx: &ProjectContext, paths: &[PathBuf], output: &OutputManager) -> Result<Field> {
    let Some((first, rest)) = paths.split_first() else {
        bail!("No schema files to merge");
    };

    let mut merged = load_schema(ctx, first)?;
    if !merged.is_composite() {
        bail!("{} is not an object schema and cannot be merged into", first.display());
    }
    output.verbose(&format!("base schema {}", first.display()));

    for path in rest {
        let next = load_schema(ctx, path)?;
        if !next.is_composite() {
            output.warning(&format!("Skipping {}: not an object schema", path.display()));
            continue;
        }
        output.verbose(&format!("merging {}", path.display()));
        merged.merge(&next);
    }
    Ok(merged)
}

/// Every `*.json` file under `dir`, sorted by path. Hidden entries are skipped.
pub fn discover_schemas(dir: &Path) -> Result<Vec<PathBuf>> {
    if !dir.is_dir() {
        bail!("Schemas directory {} does not exist. Run 'fieldom init' first.", dir.display());
    }

    let mut found = Vec::new();
    for entry in WalkDir::new(dir).follow_links(true).sort_by_file_name().into_iter().filter_map(|e| e.ok()) {
        let path = entry.path();
        if path.extension().is_none_or(|ext| ext != "json") {
            continue;
        }
        let relative = path.strip_prefix(dir).unwrap_or(path);
        if relative
            .components()
            .any(|c| c.as_os_str().to_string_lossy().starts_with('.'))
        {
            continue;
        }
        found.push(path.to_path_buf());
    }
    Ok(found)
}

/// Reads and resolves a JSON schema file using the project's settings.
pub fn load_schema(ctx: &ProjectContext, path: &Path) -> Result<Field> {
    let content = std::fs::read_to_string(path).with_context(|| format!("Failed to read {}", path.display()))?;
    let spec: Value =
        serde_json::from_str(&content).with_context(|| format!("Failed to parse {} as JSON", path.display()))?;
    schema_from_value(spec, ctx.default_timezone()).with_context(|| format!("Invalid schema in {}", path.display()))
}

/// Resolves a schema description.
///
/// A top-level mapping that does not look like a field specification is
/// read as a bare properties map.
pub fn schema_from_value(spec: Value, default_timezone: Option<&str>) -> Result<Field> {
    let mut spec = match spec {
        Value::Object(map) if !is_field_spec(&map) => {
            let mut wrapper = Map::new();
            wrapper.insert("properties".to_string(), Value::Object(map));
            Value::Object(wrapper)
        }
        other => other,
    };
    if let Some(timezone) = default_timezone {
        inject_timezone(&mut spec, timezone);
    }
    Ok(construct_field(spec)?)
}

/// A string `type`, or no `type` with a `properties` mapping that is not
/// itself a single field specification.
fn is_field_spec(map: &Map<String, Value>) -> bool {
    match map.get("type") {
        Some(Value::String(_)) => true,
        Some(_) => false,
        None => match map.get("properties") {
            Some(Value::Object(properties)) => !properties.get("type").is_some_and(Value::is_string),
            _ => false,
        },
    }
}

fn inject_timezone(spec: &mut Value, timezone: &str) {
    let Value::Object(map) = spec else {
        return;
    };
    if map.get("type").and_then(Value::as_str) == Some("date") && !map.contains_key("default_timezone") {
        map.insert("default_timezone".to_string(), Value::String(timezone.to_string()));
    }
    for key in ["properties", "fields"] {
        if let Some(Value::Object(children)) = map.get_mut(key) {
            for child in children.values_mut() {
                inject_timezone(child, timezone);
            }
        }
    }
}
