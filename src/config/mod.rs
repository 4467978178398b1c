//! Configuration management
//!
//! YAML configuration with:
//! - Environment variable overrides (prefixed with `BUSINESSPROCESS_`)
//! - Multiple configuration file locations
//! - Default values for all settings

use anyhow::{Context, Result};
use serde::{Deserialize, Serialize};
use std::path::{Path, PathBuf};

use crate::models::StateName;

/// Environment variable holding an explicit configuration file path
pub const CONFIG_PATH_ENV: &str = "BUSINESSPROCESS_CONFIG";

const LOG_LEVELS: [&str; 5] = ["trace", "debug", "info", "warn", "error"];

/// Main configuration
#[derive(Debug, Clone, Default, Deserialize, Serialize)]
pub struct AppConfig {
    #[serde(default)]
    pub logging: LoggingConfig,
    #[serde(default)]
    pub tree: TreeConfig,
}

/// Logging configuration
#[derive(Debug, Clone, Deserialize, Serialize)]
pub struct LoggingConfig {
    /// Level or `EnvFilter` directive list
    #[serde(default = "default_log_level")]
    pub level: String,
    #[serde(default)]
    pub format: LogFormat,
    #[serde(default)]
    pub target: LogTarget,
    /// Directory for log files (used when target is "file" or "both")
    #[serde(default = "default_log_dir")]
    pub log_dir: PathBuf,
    #[serde(default = "default_log_prefix")]
    pub log_prefix: String,
    #[serde(default = "default_log_rotation")]
    pub daily_rotation: bool,
}

#[derive(Debug, Clone, Copy, Deserialize, Serialize, Default, PartialEq, Eq)]
#[serde(rename_all = "lowercase")]
pub enum LogFormat {
    #[default]
    Pretty,
    Json,
    Compact,
}

/// Log output target
#[derive(Debug, Clone, Copy, Deserialize, Serialize, Default, PartialEq, Eq)]
#[serde(rename_all = "lowercase")]
pub enum LogTarget {
    #[default]
    Console,
    File,
    /// Log to both console and file
    Both,
}

fn default_log_level() -> String {
    "info".to_string()
}

fn default_log_dir() -> PathBuf {
    PathBuf::from("logs")
}

fn default_log_prefix() -> String {
    "businessprocess".to_string()
}

fn default_log_rotation() -> bool {
    true
}

impl Default for LoggingConfig {
    fn default() -> Self {
        Self {
            level: default_log_level(),
            format: LogFormat::default(),
            target: LogTarget::default(),
            log_dir: default_log_dir(),
            log_prefix: default_log_prefix(),
            daily_rotation: default_log_rotation(),
        }
    }
}

impl LogFormat {
    fn parse_lenient(value: &str) -> Self {
        match value.to_lowercase().as_str() {
            "json" => LogFormat::Json,
            "compact" => LogFormat::Compact,
            _ => LogFormat::Pretty,
        }
    }
}

/// Process tree settings
#[derive(Debug, Clone, Deserialize, Serialize)]
pub struct TreeConfig {
    /// Identity label of the tree
    #[serde(default = "default_tree_name")]
    pub name: String,
    /// Reject definition edits
    #[serde(default)]
    pub locked: bool,
    /// States that are not counted as problems in state summaries
    #[serde(default = "default_acceptable_states")]
    pub acceptable_states: Vec<StateName>,
}

fn default_tree_name() -> String {
    "businessprocess".to_string()
}

fn default_acceptable_states() -> Vec<StateName> {
    StateName::ACCEPTABLE.to_vec()
}

impl Default for TreeConfig {
    fn default() -> Self {
        Self {
            name: default_tree_name(),
            locked: false,
            acceptable_states: default_acceptable_states(),
        }
    }
}

impl AppConfig {
    /// Load configuration from file and environment variables
    ///
    /// Configuration is loaded in the following order (later overrides earlier):
    /// 1. Default values
    /// 2. Configuration file (YAML)
    /// 3. Environment variables (prefixed with BUSINESSPROCESS_)
    pub fn load() -> Result<Self> {
        let _ = dotenvy::dotenv();

        let config_path = std::env::var(CONFIG_PATH_ENV)
            .map(PathBuf::from)
            .ok()
            .or_else(Self::find_config_file);

        let mut config = match config_path {
            Some(ref path) if path.exists() => Self::from_file(path)?,
            _ => AppConfig::default(),
        };

        config.apply_env_overrides();
        config.validate()?;

        Ok(config)
    }

    /// Parse a YAML configuration file, without overrides
    pub fn from_file(path: &Path) -> Result<Self> {
        let contents = std::fs::read_to_string(path)
            .with_context(|| format!("Failed to read config file: {:?}", path))?;
        Self::from_yaml(&contents)
            .with_context(|| format!("Failed to parse config file: {:?}", path))
    }

    pub fn from_yaml(contents: &str) -> Result<Self> {
        Ok(serde_norway::from_str(contents)?)
    }

    /// Find the configuration file in standard locations
    fn find_config_file() -> Option<PathBuf> {
        let paths = [
            PathBuf::from("businessprocess.yaml"),
            PathBuf::from("config/businessprocess.yaml"),
            PathBuf::from("/etc/businessprocess/config.yaml"),
            dirs::config_dir()
                .map(|p| p.join("businessprocess/config.yaml"))
                .unwrap_or_default(),
        ];

        paths.into_iter().find(|p| p.exists())
    }

    fn apply_env_overrides(&mut self) {
        self.apply_overrides(|key| std::env::var(key).ok());
    }

    /// Apply overrides from a variable lookup
    pub fn apply_overrides<F>(&mut self, lookup: F)
    where
        F: Fn(&str) -> Option<String>,
    {
        if let Some(level) = lookup("BUSINESSPROCESS_LOG_LEVEL") {
            self.logging.level = level;
        }
        if let Some(format) = lookup("BUSINESSPROCESS_LOG_FORMAT") {
            self.logging.format = LogFormat::parse_lenient(&format);
        }
        if let Some(name) = lookup("BUSINESSPROCESS_TREE_NAME") {
            self.tree.name = name;
        }
        if let Some(locked) = lookup("BUSINESSPROCESS_TREE_LOCKED") {
            self.tree.locked = locked.to_lowercase() == "true" || locked == "1";
        }
    }

    /// Validate configuration
    pub fn validate(&self) -> Result<()> {
        if self.tree.name.trim().is_empty() {
            anyhow::bail!("Tree name cannot be empty");
        }

        let level = self.logging.level.trim();
        let is_directive = level.contains('=') || level.contains(',');
        if !is_directive && !LOG_LEVELS.contains(&level.to_lowercase().as_str()) {
            anyhow::bail!(
                "Invalid log level: {}. Must be one of {}",
                level,
                LOG_LEVELS.join(", ")
            );
        }

        if self.tree.acceptable_states.is_empty() {
            anyhow::bail!("At least one acceptable state is required");
        }

        Ok(())
    }
}
