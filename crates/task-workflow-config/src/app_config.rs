//! Application configuration
//!
//! Configuration loaded from .task-workflow.toml, with environment
//! overrides for the policy and store locations.

use anyhow::{Context, Result};
use serde::{Deserialize, Serialize};
use std::env;
use std::path::PathBuf;
use task_workflow::PermissionMatrix;

pub const POLICY_ENV: &str = "TASK_WORKFLOW_POLICY";
pub const STORE_ENV: &str = "TASK_WORKFLOW_STORE";

/// Application configuration loaded from .task-workflow.toml
#[derive(Debug, Serialize, Deserialize, Clone, PartialEq, Eq)]
pub struct AppConfig {
    /// Permission policy to use instead of the built-in review workflow
    #[serde(default)]
    pub policy_file: Option<PathBuf>,

    /// JSON task store location
    #[serde(default)]
    pub store_file: Option<PathBuf>,

    /// Default log filter when RUST_LOG is not set (e.g. "info", "task_store=debug")
    #[serde(default = "default_log_level")]
    pub log_level: String,
}

fn default_log_level() -> String {
    "warn".to_string()
}

impl Default for AppConfig {
    fn default() -> Self {
        Self {
            policy_file: None,
            store_file: None,
            log_level: default_log_level(),
        }
    }
}

/// Where the loaded config came from
///
/// Config is read before logging is set up, so the outcome is returned
/// and reported with `log()` once a logger is installed.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ConfigSource {
    File(PathBuf),
    /// The file exists but could not be parsed; defaults are in use
    Invalid { path: PathBuf, error: String },
    Defaults,
}

impl ConfigSource {
    pub fn log(&self) {
        match self {
            ConfigSource::File(path) => log::info!("Loaded app config from {}", path.display()),
            ConfigSource::Invalid { path, error } => log::warn!(
                "Failed to parse {}, using default app config: {}",
                path.display(),
                error
            ),
            ConfigSource::Defaults => log::debug!("Using default app config"),
        }
    }
}

impl AppConfig {
    /// Load config from CWD first, then home directory, or use defaults
    ///
    /// Environment overrides are applied on top in either case.
    pub fn load() -> (Self, ConfigSource) {
        let (config, source) = match crate::load_config_file() {
            Some((path, content)) => Self::parse(path, &content),
            None => (Self::default(), ConfigSource::Defaults),
        };
        (config.with_overrides(|key| env::var(key).ok()), source)
    }

    /// Parse config file content, falling back to defaults if it is malformed
    pub fn parse(path: PathBuf, content: &str) -> (Self, ConfigSource) {
        match toml::from_str(content) {
            Ok(config) => (config, ConfigSource::File(path)),
            Err(e) => (
                Self::default(),
                ConfigSource::Invalid {
                    path,
                    error: e.to_string(),
                },
            ),
        }
    }

    /// Replace file locations with non-empty values returned by `lookup`
    pub fn with_overrides(mut self, lookup: impl Fn(&str) -> Option<String>) -> Self {
        let lookup = |key: &str| lookup(key).filter(|value| !value.trim().is_empty());

        if let Some(policy) = lookup(POLICY_ENV) {
            log::debug!("{} overrides policy file: {}", POLICY_ENV, policy);
            self.policy_file = Some(PathBuf::from(policy));
        }
        if let Some(store) = lookup(STORE_ENV) {
            log::debug!("{} overrides store file: {}", STORE_ENV, store);
            self.store_file = Some(PathBuf::from(store));
        }
        self
    }

    /// Permission matrix to enforce
    ///
    /// An explicitly configured policy file must load. Otherwise a
    /// `policy.toml` in the config directory is used when present, and the
    /// built-in review workflow when not.
    pub fn load_policy(&self) -> Result<PermissionMatrix> {
        if let Some(path) = &self.policy_file {
            return PermissionMatrix::from_policy_file(path)
                .with_context(|| format!("Failed to load policy from {}", path.display()));
        }

        match crate::paths::default_policy_path() {
            Some(path) if path.exists() => PermissionMatrix::from_policy_file(&path)
                .with_context(|| format!("Failed to load policy from {}", path.display())),
            _ => {
                log::debug!("Using built-in permission policy");
                Ok(PermissionMatrix::builtin().clone())
            }
        }
    }

    /// Task store location, falling back to the platform data directory
    pub fn store_path(&self) -> Result<PathBuf> {
        match &self.store_file {
            Some(path) => Ok(path.clone()),
            None => crate::paths::default_store_path(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::collections::HashMap;
    use std::io::Write;
    use task_workflow::{ActionKind, Role, TaskStatus};

    #[test]
    fn test_default_config() {
        let config = AppConfig::default();
        assert!(config.policy_file.is_none());
        assert!(config.store_file.is_none());
        assert_eq!(config.log_level, "warn");
    }

    #[test]
    fn test_config_deserialize() {
        let toml = r#"
            policy_file = "/etc/task-workflow/policy.toml"
            store_file = "tasks.json"
            log_level = "debug"
        "#;
        let config: AppConfig = toml::from_str(toml).unwrap();
        assert_eq!(
            config.policy_file,
            Some(PathBuf::from("/etc/task-workflow/policy.toml"))
        );
        assert_eq!(config.store_file, Some(PathBuf::from("tasks.json")));
        assert_eq!(config.log_level, "debug");
    }

    #[test]
    fn test_config_deserialize_partial() {
        let toml = r#"
            store_file = "/tmp/tasks.json"
        "#;
        let config: AppConfig = toml::from_str(toml).unwrap();
        assert_eq!(config.store_file, Some(PathBuf::from("/tmp/tasks.json")));
        // Other fields should use defaults
        assert!(config.policy_file.is_none());
        assert_eq!(config.log_level, "warn");
    }

    #[test]
    fn test_malformed_file_reported() {
        let (config, source) =
            AppConfig::parse(PathBuf::from(".task-workflow.toml"), "log_level = [broken");
        assert_eq!(config, AppConfig::default());
        match source {
            ConfigSource::Invalid { path, error } => {
                assert_eq!(path, PathBuf::from(".task-workflow.toml"));
                assert!(!error.is_empty());
            }
            other => panic!("expected invalid config, got {:?}", other),
        }
    }

    #[test]
    fn test_wrong_field_type_reported() {
        let (_, source) = AppConfig::parse(PathBuf::from("cfg.toml"), "log_level = 3");
        assert!(matches!(source, ConfigSource::Invalid { .. }));
    }

    #[test]
    fn test_valid_file_source() {
        let (config, source) =
            AppConfig::parse(PathBuf::from("cfg.toml"), "log_level = \"debug\"");
        assert_eq!(config.log_level, "debug");
        assert_eq!(source, ConfigSource::File(PathBuf::from("cfg.toml")));
    }

    #[test]
    fn test_env_overrides() {
        let vars: HashMap<&str, &str> = [(POLICY_ENV, "custom.toml"), (STORE_ENV, "  ")].into();
        let config = AppConfig {
            store_file: Some(PathBuf::from("from-file.json")),
            ..AppConfig::default()
        }
        .with_overrides(|key| vars.get(key).map(|v| v.to_string()));

        assert_eq!(config.policy_file, Some(PathBuf::from("custom.toml")));
        // Blank values do not override
        assert_eq!(config.store_file, Some(PathBuf::from("from-file.json")));
    }

    #[test]
    fn test_store_path_prefers_configured_file() {
        let config = AppConfig {
            store_file: Some(PathBuf::from("here.json")),
            ..AppConfig::default()
        };
        assert_eq!(config.store_path().unwrap(), PathBuf::from("here.json"));
    }

    #[test]
    fn test_load_policy_from_file() {
        let restrictive = task_workflow::DEFAULT_POLICY.replace(
            "annotator = [\"complete\"]",
            "annotator = [\"disable\"]",
        );
        let mut file = tempfile::NamedTempFile::new().unwrap();
        file.write_all(restrictive.as_bytes()).unwrap();

        let config = AppConfig {
            policy_file: Some(file.path().to_path_buf()),
            ..AppConfig::default()
        };
        let matrix = config.load_policy().unwrap();
        let actions = matrix.permitted_actions(TaskStatus::InProgress, Role::Annotator);
        assert_eq!(actions.as_slice(), &[ActionKind::Disable]);
    }

    #[test]
    fn test_load_policy_missing_file_is_error() {
        let config = AppConfig {
            policy_file: Some(PathBuf::from("/nonexistent/policy.toml")),
            ..AppConfig::default()
        };
        let err = config.load_policy().unwrap_err();
        assert!(err.to_string().contains("/nonexistent/policy.toml"));
    }
}
