mod commands;
mod context;
mod examples;
mod output;
mod theme;

use anyhow::Result;
use clap::{CommandFactory, FromArgMatches, Parser, Subcommand};
use env_logger::Env;

use commands::{
    doc::{DocCommands, handle_doc_commands},
    init::{InitArgs, handle_init},
    schema::{SchemaCommands, handle_schema_commands},
};
use output::{GlobalOptions, OutputFormat, OutputManager};

const ENVIRONMENT: &str = "\
Environment:
  RUST_LOG  Log filter, e.g. 'fieldom=debug' to trace dispatch and merge decisions
  NO_COLOR  Disable colored output when set";

#[derive(Parser)]
#[command(name = "fieldom", version)]
#[command(about = "Inspect, merge and validate typed field schemas", after_long_help = ENVIRONMENT)]
#[command(subcommand_required = true, arg_required_else_help = true)]
struct Cli {
    /// Output format
    #[arg(long, value_enum, default_value = "table", global = true)]
    output: OutputFormat,

    /// Suppress output (only errors will be shown)
    #[arg(short = 'q', long, global = true)]
    quiet: bool,

    /// Show progress details and debug logs
    #[arg(short = 'v', long, global = true)]
    verbose: bool,

    /// Disable colored output
    #[arg(long, global = true)]
    no_color: bool,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Initialize fieldom in the current directory
    Init(InitArgs),

    /// Show, list and merge schema files
    #[command(subcommand)]
    Schema(SchemaCommands),

    /// Validate documents against a schema
    #[command(subcommand)]
    Doc(DocCommands),
}

fn parse() -> Cli {
    let mut command = Cli::command();
    for (name, groups) in examples::command_examples() {
        command = command.mut_subcommand(name, |sub| sub.after_long_help(examples::render(groups)));
    }
    Cli::from_arg_matches(&command.get_matches()).unwrap_or_else(|err| err.exit())
}

fn main() {
    let cli = parse();

    let filter = if cli.verbose { "fieldom=debug" } else { "warn" };
    env_logger::Builder::from_env(Env::default().default_filter_or(filter)).init();
    if cli.no_color {
        colored::control::set_override(false);
    }

    let output = OutputManager::new(GlobalOptions {
        output_format: cli.output,
        quiet: cli.quiet,
        verbose: cli.verbose,
        no_color: cli.no_color,
    });

    if let Err(err) = run(cli.command, &output) {
        output.error(&format!("{err:#}"));
        std::process::exit(1);
    }
}

fn run(command: Commands, output: &OutputManager) -> Result<()> {
    match command {
        Commands::Init(args) => handle_init(args, output),
        Commands::Schema(command) => handle_schema_commands(command, output),
        Commands::Doc(command) => handle_doc_commands(command, output),
    }
}
