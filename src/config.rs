//! Configuration for ticket-desk
//!
//! Settings are layered: built-in defaults, then the user's `config.yaml`
//! in the platform config directory, then `.ticket-desk/config.yaml` of the
//! project, then `TICKET_DESK__*` environment variables
//! (`TICKET_DESK__LOCKING__TIMEOUT_MS=250`).

use crate::core::Priority;
use crate::error::Result;
use config::{Environment, File, FileFormat};
use directories::ProjectDirs;
use serde::{Deserialize, Serialize};
use std::path::{Path, PathBuf};
use std::time::Duration;

/// Name of the per-project data directory
pub const DESK_DIR: &str = ".ticket-desk";

const CONFIG_FILE: &str = "config.yaml";
const ENV_PREFIX: &str = "TICKET_DESK";

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct Config {
    pub project: ProjectConfig,
    pub locking: LockingConfig,
    pub output: OutputConfig,
    pub defaults: DefaultsConfig,
}

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct ProjectConfig {
    pub name: Option<String>,
    pub description: Option<String>,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct LockingConfig {
    /// How long to wait for a held lock before giving up
    pub timeout_ms: u64,
}

impl Default for LockingConfig {
    fn default() -> Self {
        Self { timeout_ms: 5000 }
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct OutputConfig {
    pub json: bool,
    pub color: bool,
}

impl Default for OutputConfig {
    fn default() -> Self {
        Self {
            json: false,
            color: true,
        }
    }
}

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct DefaultsConfig {
    pub priority: Priority,
}

impl Config {
    /// Load the layered configuration for a project
    ///
    /// `project_root` is the directory containing `.ticket-desk`; pass `None`
    /// to skip the project layer.
    pub fn load(project_root: Option<&Path>) -> Result<Self> {
        let mut builder =
            config::Config::builder().add_source(config::Config::try_from(&Self::default())?);

        if let Some(path) = user_config_path() {
            builder = builder.add_source(yaml_file(&path));
        }
        if let Some(root) = project_root {
            builder = builder.add_source(yaml_file(&project_config_path(root)));
        }

        let settings = builder
            .add_source(
                Environment::with_prefix(ENV_PREFIX)
                    .prefix_separator("__")
                    .separator("__")
                    .try_parsing(true),
            )
            .build()?;

        Ok(settings.try_deserialize()?)
    }

    /// Load the configuration, falling back to defaults when it is unreadable
    pub fn load_or_default(project_root: Option<&Path>) -> Self {
        Self::load(project_root).unwrap_or_else(|e| {
            tracing::warn!("Ignoring unreadable configuration: {e}");
            Self::default()
        })
    }

    /// Write the configuration as YAML
    pub fn save(&self, path: &Path) -> Result<()> {
        if let Some(parent) = path.parent() {
            std::fs::create_dir_all(parent)?;
        }
        std::fs::write(path, serde_yaml::to_string(self)?)?;
        Ok(())
    }

    pub const fn lock_timeout(&self) -> Duration {
        Duration::from_millis(self.locking.timeout_ms)
    }
}

/// Path of the project configuration file under `project_root`
pub fn project_config_path(project_root: &Path) -> PathBuf {
    project_root.join(DESK_DIR).join(CONFIG_FILE)
}

/// Path of the user configuration file, if the platform has a config directory
pub fn user_config_path() -> Option<PathBuf> {
    ProjectDirs::from("", "", "ticket-desk").map(|dirs| dirs.config_dir().join(CONFIG_FILE))
}

fn yaml_file(path: &Path) -> File<config::FileSourceFile, FileFormat> {
    File::from(path).format(FileFormat::Yaml).required(false)
}

#[cfg(test)]
mod tests {
    use super::*;
    use serial_test::serial;
    use tempfile::TempDir;

    #[test]
    #[serial]
    fn test_defaults_without_files() {
        let temp_dir = TempDir::new().unwrap();
        let config = Config::load(Some(temp_dir.path())).unwrap();

        assert_eq!(config.locking.timeout_ms, 5000);
        assert_eq!(config.defaults.priority, Priority::Medium);
        assert!(config.output.color);
        assert_eq!(config.lock_timeout(), Duration::from_secs(5));
    }

    #[test]
    #[serial]
    fn test_project_file_overrides_defaults() {
        let temp_dir = TempDir::new().unwrap();
        let mut config = Config::default();
        config.project.name = Some("Support".to_string());
        config.defaults.priority = Priority::High;
        config.save(&project_config_path(temp_dir.path())).unwrap();

        let loaded = Config::load(Some(temp_dir.path())).unwrap();
        assert_eq!(loaded.project.name.as_deref(), Some("Support"));
        assert_eq!(loaded.defaults.priority, Priority::High);
        assert_eq!(loaded.locking.timeout_ms, 5000);
    }

    #[test]
    #[serial]
    fn test_environment_overrides_file() {
        let temp_dir = TempDir::new().unwrap();
        Config::default()
            .save(&project_config_path(temp_dir.path()))
            .unwrap();

        // SAFETY: serialized with every other test that reads the environment
        unsafe { std::env::set_var("TICKET_DESK__LOCKING__TIMEOUT_MS", "250") };
        let loaded = Config::load(Some(temp_dir.path()));
        unsafe { std::env::remove_var("TICKET_DESK__LOCKING__TIMEOUT_MS") };

        assert_eq!(loaded.unwrap().lock_timeout(), Duration::from_millis(250));
    }

    #[test]
    #[serial]
    fn test_malformed_file_falls_back_to_defaults() {
        let temp_dir = TempDir::new().unwrap();
        let path = project_config_path(temp_dir.path());
        std::fs::create_dir_all(path.parent().unwrap()).unwrap();
        std::fs::write(&path, "locking:\n  timeout_ms: soon\n").unwrap();

        assert!(Config::load(Some(temp_dir.path())).is_err());
        assert_eq!(Config::load_or_default(Some(temp_dir.path())), Config::default());
    }
}
