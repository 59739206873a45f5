use anyhow::Result;
use clap::ValueEnum;
use colored::Colorize;
use comfy_table::{Attribute, Cell, Table, presets};
use serde::Serialize;
use serde_json::Value;

use crate::theme::{self, Tone};

/// How command results are rendered.
#[derive(Clone, Debug, ValueEnum, Default, PartialEq)]
pub enum OutputFormat {
    /// Tables and pretty-printed mappings
    #[default]
    Table,
    /// Pretty-printed JSON only
    Json,
    /// One line per result
    Compact,
}

#[derive(Clone, Debug, Default)]
pub struct GlobalOptions {
    pub output_format: OutputFormat,
    pub quiet: bool,
    pub verbose: bool,
    pub no_color: bool,
}

/// Results that have a table and a one-line rendering besides JSON.
pub trait TableDisplay {
    fn to_table(&self, output: &OutputManager) -> Table;
    fn to_compact(&self) -> String;
}

pub struct OutputManager {
    pub options: GlobalOptions,
}

impl OutputManager {
    pub fn new(options: GlobalOptions) -> Self {
        Self { options }
    }

    pub fn display<T>(&self, data: &T) -> Result<()>
    where
        T: Serialize + TableDisplay,
    {
        if self.options.quiet {
            return Ok(());
        }
        let rendered = match self.options.output_format {
            OutputFormat::Json => serde_json::to_string_pretty(data)?,
            OutputFormat::Table => data.to_table(self).to_string(),
            OutputFormat::Compact => data.to_compact(),
        };
        println!("{rendered}");
        Ok(())
    }

    /// Prints a mapping or serialized document. Compact output is a single line.
    pub fn mapping(&self, value: &Value) -> Result<()> {
        if self.options.quiet {
            return Ok(());
        }
        let rendered = match self.options.output_format {
            OutputFormat::Compact => serde_json::to_string(value)?,
            OutputFormat::Json | OutputFormat::Table => serde_json::to_string_pretty(value)?,
        };
        println!("{rendered}");
        Ok(())
    }

    /// Headings and counts are only printed around table output.
    pub fn is_decorated(&self) -> bool {
        !self.options.quiet && self.options.output_format == OutputFormat::Table
    }

    fn shows(&self, tone: Tone) -> bool {
        match tone {
            Tone::Failed => true,
            Tone::Trace => self.options.verbose && !self.options.quiet,
            _ => !self.options.quiet,
        }
    }

    fn status(&self, tone: Tone, message: &str) {
        if !self.shows(tone) {
            return;
        }
        let line = format!("{} {}", tone.paint(tone.mark()), tone.paint(message));
        if tone.to_stderr() {
            eprintln!("{line}");
        } else {
            println!("{line}");
        }
    }

    pub fn success(&self, message: &str) {
        self.status(Tone::Done, message);
    }

    pub fn error(&self, message: &str) {
        self.status(Tone::Failed, message);
    }

    pub fn warning(&self, message: &str) {
        self.status(Tone::Caution, message);
    }

    pub fn info(&self, message: &str) {
        self.status(Tone::Note, message);
    }

    /// Only shown with `--verbose`.
    pub fn verbose(&self, message: &str) {
        self.status(Tone::Trace, message);
    }

    pub fn heading(&self, text: &str) {
        if !self.options.quiet {
            println!("{}", text.bold().underline());
        }
    }

    pub fn key_value(&self, key: &str, value: &str) {
        if !self.options.quiet {
            println!("{}: {value}", theme::label(key));
        }
    }

    /// A table with a bold header row.
    pub fn table(&self, headers: &[&str]) -> Table {
        let mut table = Table::new();
        table.load_preset(if self.options.no_color {
            presets::ASCII_FULL
        } else {
            presets::UTF8_FULL_CONDENSED
        });
        table.set_header(headers.iter().map(|header| Cell::new(header).add_attribute(Attribute::Bold)));
        table
    }

    /// Cell showing a field type, colored by kind unless color is off.
    pub fn type_cell(&self, type_name: &str) -> Cell {
        let cell = Cell::new(type_name);
        match theme::type_color(type_name) {
            Some(color) if !self.options.no_color => cell.fg(color),
            _ => cell,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[derive(Serialize)]
    struct Counts {
        kind: String,
        fields: usize,
    }

    impl TableDisplay for Counts {
        fn to_table(&self, output: &OutputManager) -> Table {
            let mut table = output.table(&["Type", "Fields"]);
            table.add_row(vec![output.type_cell(&self.kind), Cell::new(self.fields)]);
            table
        }

        fn to_compact(&self) -> String {
            format!("{}={}", self.kind, self.fields)
        }
    }

    fn counts() -> Counts {
        Counts {
            kind: "nested".to_string(),
            fields: 3,
        }
    }

    fn manager(output_format: OutputFormat, quiet: bool) -> OutputManager {
        OutputManager::new(GlobalOptions {
            output_format,
            quiet,
            no_color: true,
            ..Default::default()
        })
    }

    #[test]
    fn test_only_table_output_is_decorated() {
        assert!(manager(OutputFormat::Table, false).is_decorated());
        assert!(!manager(OutputFormat::Json, false).is_decorated());
        assert!(!manager(OutputFormat::Table, true).is_decorated());
    }

    #[test]
    fn test_quiet_shows_failures_only() {
        let quiet = manager(OutputFormat::Table, true);
        assert!(quiet.shows(Tone::Failed));
        assert!(!quiet.shows(Tone::Done));
        assert!(!quiet.shows(Tone::Trace));
        assert!(quiet.display(&counts()).is_ok());
        assert!(quiet.mapping(&serde_json::json!({"type": "text"})).is_ok());
    }

    #[test]
    fn test_traces_need_verbose() {
        let mut output = manager(OutputFormat::Table, false);
        assert!(!output.shows(Tone::Trace));
        output.options.verbose = true;
        assert!(output.shows(Tone::Trace));
    }

    #[test]
    fn test_table_has_header_and_row() {
        let output = manager(OutputFormat::Table, false);
        let rendered = counts().to_table(&output).to_string();
        assert!(rendered.contains("Fields"));
        assert!(rendered.contains("nested"));
        assert_eq!(counts().to_compact(), "nested=3");
    }
}
