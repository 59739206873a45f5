use anyhow::{Context, Result};
use serde::{Deserialize, Serialize};
use std::path::{Path, PathBuf};

/// Directory name that marks a fieldom project root.
pub const FIELDOM_DIR: &str = ".fieldom";

/// Project context for fieldom commands
pub struct ProjectContext {
    /// Directory holding `.fieldom`, or the working directory when none was found
    pub project_root: PathBuf,
    /// Path to .fieldom directory
    pub fieldom_dir: PathBuf,
    /// Path to config file
    pub config_path: PathBuf,
    /// Directory scanned by `schema merge --all`
    pub schemas_dir: PathBuf,
    /// Loaded configuration
    pub config: Option<FieldomConfig>,
}

/// Configuration stored in .fieldom/config.toml
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct FieldomConfig {
    #[serde(default)]
    pub fieldom: FieldomSettings,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct FieldomSettings {
    #[serde(default = "default_schemas_dir")]
    pub schemas_dir: String,
    /// Injected into date fields declared without a `default_timezone`.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub default_timezone: Option<String>,
}

impl Default for FieldomSettings {
    fn default() -> Self {
        Self {
            schemas_dir: default_schemas_dir(),
            default_timezone: None,
        }
    }
}

fn default_schemas_dir() -> String {
    "schemas".to_string()
}

impl ProjectContext {
    /// Find and load project context from current directory or ancestors
    pub fn find() -> Result<Self> {
        let current_dir = std::env::current_dir().context("Failed to get current directory")?;
        Self::find_from(&current_dir)
    }

    /// Find project context starting from the given directory.
    ///
    /// Falls back to `start` with default settings when no ancestor holds a
    /// `.fieldom` directory.
    pub fn find_from(start: &Path) -> Result<Self> {
        let project_root = Self::find_project_root(start).unwrap_or_else(|| start.to_path_buf());
        Self::from_root(project_root)
    }

    /// Create context from a known project root
    pub fn from_root(project_root: PathBuf) -> Result<Self> {
        let fieldom_dir = project_root.join(FIELDOM_DIR);
        let config_path = fieldom_dir.join("config.toml");

        let config = if config_path.exists() {
            let content = std::fs::read_to_string(&config_path).context("Failed to read config.toml")?;
            let config: FieldomConfig = toml::from_str(&content).context("Failed to parse config.toml")?;
            log::debug!("loaded {}", config_path.display());
            Some(config)
        } else {
            None
        };

        let schemas_dir = match config {
            Some(ref cfg) => project_root.join(&cfg.fieldom.schemas_dir),
            None => project_root.join(default_schemas_dir()),
        };

        Ok(Self {
            project_root,
            fieldom_dir,
            config_path,
            schemas_dir,
            config,
        })
    }

    fn find_project_root(start: &Path) -> Option<PathBuf> {
        let mut current = start.to_path_buf();
        loop {
            if current.join(FIELDOM_DIR).is_dir() {
                return Some(current);
            }
            if !current.pop() {
                return None;
            }
        }
    }

    /// Check if fieldom is initialized in this project
    pub fn is_initialized(&self) -> bool {
        self.fieldom_dir.exists() && self.config_path.exists()
    }

    /// Timezone injected into date fields, if configured.
    pub fn default_timezone(&self) -> Option<&str> {
        self.config.as_ref()?.fieldom.default_timezone.as_deref()
    }
}
