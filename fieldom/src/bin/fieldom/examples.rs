use std::fmt::Write;

use colored::Colorize;

use crate::commands::{doc, init, schema};

/// Titled block of sample invocations shown in a command's long help.
#[derive(Clone, Copy)]
pub struct ExampleGroup {
    pub title: &'static str,
    pub commands: &'static [&'static str],
}

/// Example groups keyed by subcommand name.
pub fn command_examples() -> [(&'static str, &'static [ExampleGroup]); 3] {
    [("init", init::EXAMPLES), ("schema", schema::EXAMPLES), ("doc", doc::EXAMPLES)]
}

pub fn render(groups: &[ExampleGroup]) -> String {
    let mut buffer = format!("{}\n", "Examples:".bold());
    for group in groups {
        let _ = writeln!(buffer, "  {}", group.title.bold());
        for command in group.commands {
            let _ = writeln!(buffer, "    {command}");
        }
    }
    buffer
}
