use std::path::Path;

use anyhow::{Context, Result};
use clap::Args;
use fieldom::DateOptions;

use crate::context::{FieldomConfig, FieldomSettings, ProjectContext};
use crate::examples::ExampleGroup;
use crate::output::OutputManager;

pub const EXAMPLES: &[ExampleGroup] = &[ExampleGroup {
    title: "Initialize",
    commands: &[
        "fieldom init                                   # Create .fieldom/config.toml here",
        "fieldom init --schemas-dir mappings            # Keep schema files in ./mappings",
        "fieldom init --default-timezone Europe/Prague  # Attach a zone to naive dates",
        "fieldom init --force                           # Overwrite an existing config",
    ],
}];

#[derive(Args)]
pub struct InitArgs {
    /// Directory holding schema files, relative to the project root
    #[arg(long, default_value = "schemas")]
    pub schemas_dir: String,

    /// Timezone injected into date fields that do not declare one
    #[arg(long, default_value = "UTC")]
    pub default_timezone: String,

    /// Overwrite an existing configuration
    #[arg(long)]
    pub force: bool,
}

pub fn handle_init(args: InitArgs, output: &OutputManager) -> Result<()> {
    let root = std::env::current_dir().context("Failed to get current directory")?;
    init_project(&root, &args, output)
}

fn init_project(root: &Path, args: &InitArgs, output: &OutputManager) -> Result<()> {
    let ctx = ProjectContext::from_root(root.to_path_buf())?;

    if ctx.is_initialized() && !args.force {
        output.warning("fieldom is already initialized in this directory.");
        output.info("Use 'fieldom init --force' to overwrite the configuration.");
        return Ok(());
    }

    DateOptions::with_timezone(&args.default_timezone)
        .with_context(|| format!("Invalid --default-timezone '{}'", args.default_timezone))?;

    let config = FieldomConfig {
        fieldom: FieldomSettings {
            schemas_dir: args.schemas_dir.clone(),
            default_timezone: Some(args.default_timezone.clone()),
        },
    };
    let content = toml::to_string_pretty(&config).context("Failed to serialize config")?;

    std::fs::create_dir_all(&ctx.fieldom_dir)
        .with_context(|| format!("Failed to create {}", ctx.fieldom_dir.display()))?;
    std::fs::write(&ctx.config_path, content)
        .with_context(|| format!("Failed to write {}", ctx.config_path.display()))?;

    let schemas_dir = root.join(&args.schemas_dir);
    std::fs::create_dir_all(&schemas_dir).with_context(|| format!("Failed to create {}", schemas_dir.display()))?;

    output.success("Initialized fieldom");
    output.key_value("config", &ctx.config_path.display().to_string());
    output.key_value("schemas", &schemas_dir.display().to_string());
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::output::GlobalOptions;

    fn quiet() -> OutputManager {
        OutputManager::new(GlobalOptions {
            quiet: true,
            ..Default::default()
        })
    }

    fn args(timezone: &str, force: bool) -> InitArgs {
        InitArgs {
            schemas_dir: "mappings".to_string(),
            default_timezone: timezone.to_string(),
            force,
        }
    }

    #[test]
    fn test_init_writes_config_and_schema_dir() {
        let dir = tempfile::tempdir().unwrap();
        init_project(dir.path(), &args("Europe/Prague", false), &quiet()).unwrap();

        let ctx = ProjectContext::from_root(dir.path().to_path_buf()).unwrap();
        assert!(ctx.is_initialized());
        assert_eq!(ctx.default_timezone(), Some("Europe/Prague"));
        assert!(dir.path().join("mappings").is_dir());
    }

    #[test]
    fn test_init_keeps_existing_config_without_force() {
        let dir = tempfile::tempdir().unwrap();
        init_project(dir.path(), &args("UTC", false), &quiet()).unwrap();
        init_project(dir.path(), &args("Asia/Tokyo", false), &quiet()).unwrap();

        let ctx = ProjectContext::from_root(dir.path().to_path_buf()).unwrap();
        assert_eq!(ctx.default_timezone(), Some("UTC"));

        init_project(dir.path(), &args("Asia/Tokyo", true), &quiet()).unwrap();
        let ctx = ProjectContext::from_root(dir.path().to_path_buf()).unwrap();
        assert_eq!(ctx.default_timezone(), Some("Asia/Tokyo"));
    }

    #[test]
    fn test_init_rejects_unknown_timezone() {
        let dir = tempfile::tempdir().unwrap();
        assert!(init_project(dir.path(), &args("Nowhere/Land", false), &quiet()).is_err());
        assert!(!dir.path().join(".fieldom").exists());
    }
}
