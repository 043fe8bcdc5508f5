use std::{
    env,
    path::{Path, PathBuf},
};

pub const CONFIG_FILE: &str = ".task-workflow.toml";

/// Config file locations in lookup order: CWD, then $HOME
pub fn config_file_candidates() -> Vec<PathBuf> {
    let mut candidates = vec![PathBuf::from(CONFIG_FILE)];
    if let Some(home) = env::var_os("HOME") {
        candidates.push(PathBuf::from(home).join(CONFIG_FILE));
    }
    candidates
}

/// First readable .task-workflow.toml and its content
pub fn load_config_file() -> Option<(PathBuf, String)> {
    read_first(&config_file_candidates())
}

fn read_first(candidates: &[PathBuf]) -> Option<(PathBuf, String)> {
    candidates.iter().find_map(|path| read(path))
}

fn read(path: &Path) -> Option<(PathBuf, String)> {
    match std::fs::read_to_string(path) {
        Ok(content) => {
            log::debug!("Loaded config from {}", path.display());
            Some((path.to_path_buf(), content))
        }
        Err(e) => {
            log::trace!("No config at {}: {}", path.display(), e);
            None
        }
    }
}
