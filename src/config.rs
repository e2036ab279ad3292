use serde::{Deserialize, Serialize};
use std::fs;
use std::path::Path;
use std::time::Duration;

use crate::error::{FinishError, Result};

/// Name of the project-local configuration file.
pub const CONFIG_FILE_NAME: &str = "gitflow.toml";

/// Represents the complete configuration for gitflow-finish.
///
/// Contains the gitflow branch naming scheme, the external tool settings and
/// behavior options.
#[derive(Debug, Deserialize, Serialize, Clone, PartialEq, Default)]
pub struct Config {
    #[serde(default)]
    pub gitflow: GitFlowConfig,

    #[serde(default)]
    pub tools: ToolsConfig,

    #[serde(default)]
    pub behavior: BehaviorConfig,
}

fn default_production_branch() -> String {
    "master".to_string()
}

fn default_development_branch() -> String {
    "develop".to_string()
}

fn default_release_branch_prefix() -> String {
    "release/".to_string()
}

/// Branch and tag naming scheme of the gitflow model.
///
/// Immutable for the duration of a run; the finisher only ever borrows it.
#[derive(Debug, Deserialize, Serialize, Clone, PartialEq, Eq)]
pub struct GitFlowConfig {
    #[serde(default = "default_production_branch")]
    pub production_branch: String,

    #[serde(default = "default_development_branch")]
    pub development_branch: String,

    #[serde(default = "default_release_branch_prefix")]
    pub release_branch_prefix: String,

    #[serde(default)]
    pub version_tag_prefix: String,
}

impl Default for GitFlowConfig {
    fn default() -> Self {
        GitFlowConfig {
            production_branch: default_production_branch(),
            development_branch: default_development_branch(),
            release_branch_prefix: default_release_branch_prefix(),
            version_tag_prefix: String::new(),
        }
    }
}

impl GitFlowConfig {
    /// Full branch name for a release version (`release/1.0.0`).
    pub fn release_branch(&self, version: &str) -> String {
        format!("{}{}", self.release_branch_prefix, version)
    }

    /// Tag name for a release version (`v1.0.0` with prefix `v`).
    pub fn version_tag(&self, version: &str) -> String {
        format!("{}{}", self.version_tag_prefix, version)
    }

    /// Checks the naming scheme for values that would make a run meaningless.
    pub fn validate(&self) -> Result<()> {
        if self.production_branch.trim().is_empty() {
            return Err(FinishError::config("production_branch must not be empty"));
        }
        if self.development_branch.trim().is_empty() {
            return Err(FinishError::config("development_branch must not be empty"));
        }
        if self.production_branch == self.development_branch {
            return Err(FinishError::config(format!(
                "production_branch and development_branch are both '{}'",
                self.production_branch
            )));
        }
        if self.release_branch_prefix.trim().is_empty() {
            return Err(FinishError::config(
                "release_branch_prefix must not be empty",
            ));
        }
        Ok(())
    }
}

fn default_git() -> String {
    "git".to_string()
}

fn default_mvn() -> String {
    "mvn".to_string()
}

fn default_versions_plugin() -> String {
    "org.codehaus.mojo:versions-maven-plugin:2.1".to_string()
}

/// External tool executables.
#[derive(Debug, Deserialize, Serialize, Clone, PartialEq, Eq)]
pub struct ToolsConfig {
    #[serde(default = "default_git")]
    pub git: String,

    #[serde(default = "default_mvn")]
    pub mvn: String,

    /// Plugin coordinate whose `set` goal rewrites project versions.
    #[serde(default = "default_versions_plugin")]
    pub versions_plugin: String,
}

impl Default for ToolsConfig {
    fn default() -> Self {
        ToolsConfig {
            git: default_git(),
            mvn: default_mvn(),
            versions_plugin: default_versions_plugin(),
        }
    }
}

/// Configuration for behavior customization.
#[derive(Debug, Deserialize, Serialize, Clone, PartialEq, Eq, Default)]
pub struct BehaviorConfig {
    /// Overall deadline in seconds, checked before each step starts.
    #[serde(default)]
    pub deadline_secs: Option<u64>,
}

impl BehaviorConfig {
    pub fn deadline(&self) -> Option<Duration> {
        self.deadline_secs.map(Duration::from_secs)
    }
}

impl Config {
    pub fn validate(&self) -> Result<()> {
        self.gitflow.validate()?;

        for (name, value) in [
            ("tools.git", &self.tools.git),
            ("tools.mvn", &self.tools.mvn),
            ("tools.versions_plugin", &self.tools.versions_plugin),
        ] {
            if value.trim().is_empty() {
                return Err(FinishError::config(format!("{} must not be empty", name)));
            }
        }

        Ok(())
    }
}

/// Loads configuration from file or returns defaults.
///
/// Attempts to load configuration in the following order:
/// 1. Custom path provided as parameter
/// 2. `gitflow.toml` in the project directory
/// 3. `.gitflow.toml` in the user config directory
/// 4. Default configuration if no file found
///
/// # Returns
/// * `Ok(Config)` - Loaded or default configuration
/// * `Err` - If a file exists but cannot be read or parsed
pub fn load_config(config_path: Option<&Path>, project_dir: &Path) -> Result<Config> {
    let local = project_dir.join(CONFIG_FILE_NAME);

    let config_str = if let Some(path) = config_path {
        fs::read_to_string(path)?
    } else if local.exists() {
        fs::read_to_string(&local)?
    } else if let Some(config_dir) = dirs::config_dir() {
        let user_path = config_dir.join(format!(".{}", CONFIG_FILE_NAME));
        if user_path.exists() {
            fs::read_to_string(user_path)?
        } else {
            return Ok(Config::default());
        }
    } else {
        return Ok(Config::default());
    };

    parse_config(&config_str)
}

/// Parses configuration from TOML text.
pub fn parse_config(config_str: &str) -> Result<Config> {
    toml::from_str(config_str)
        .map_err(|e| FinishError::config(format!("Invalid configuration: {}", e)))
}
