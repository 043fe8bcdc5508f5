//! Configuration and data directory paths
//!
//! Uses XDG directories via `dirs` crate.
//!
//! Platform-specific locations:
//! - Linux: `~/.config/task-workflow/`, `~/.local/share/task-workflow/`
//! - macOS: `~/Library/Application Support/task-workflow/` for both
//! - Windows: `%APPDATA%\task-workflow\`

use anyhow::{Context, Result};
use std::path::PathBuf;

const APP_NAME: &str = "task-workflow";
const POLICY_FILE: &str = "policy.toml";
const STORE_FILE: &str = "tasks.json";

fn ensure_app_dir(base: Option<PathBuf>, kind: &str) -> Result<PathBuf> {
    let dir = base
        .with_context(|| format!("Could not determine {} directory", kind))?
        .join(APP_NAME);
    std::fs::create_dir_all(&dir)
        .with_context(|| format!("Failed to create {}", dir.display()))?;
    Ok(dir)
}

/// Application config directory, created if needed
pub fn config_dir() -> Result<PathBuf> {
    ensure_app_dir(dirs::config_dir(), "config")
}

/// Application data directory, created if needed
pub fn data_dir() -> Result<PathBuf> {
    ensure_app_dir(dirs::data_dir(), "data")
}

/// Default location of the JSON task store
pub fn default_store_path() -> Result<PathBuf> {
    Ok(data_dir()?.join(STORE_FILE))
}

/// Policy file picked up automatically when present; nothing is created
pub fn default_policy_path() -> Option<PathBuf> {
    dirs::config_dir().map(|base| base.join(APP_NAME).join(POLICY_FILE))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_ensure_app_dir() {
        let base = tempfile::tempdir().unwrap();
        let dir = ensure_app_dir(Some(base.path().to_path_buf()), "test").unwrap();
        assert!(dir.exists());
        assert!(dir.ends_with(APP_NAME));
    }

    #[test]
    fn test_missing_base_dir() {
        let err = ensure_app_dir(None, "data").unwrap_err();
        assert_eq!(err.to_string(), "Could not determine data directory");
    }

    #[test]
    fn test_file_names() {
        if let Some(policy) = default_policy_path() {
            assert!(policy.ends_with("task-workflow/policy.toml"));
        }
    }
}
