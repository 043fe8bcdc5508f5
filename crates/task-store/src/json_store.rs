//! JSON file backed task store
//!
//! The whole store (tasks and activity log) is one pretty-printed JSON
//! document, rewritten after every mutation. Updates are serialized through
//! an async mutex that is held across the file write, so a version check
//! and the write it guards cannot interleave with another update.

use crate::error::StoreError;
use crate::state::StoreState;
use crate::store::TaskStore;
use crate::types::{HistoryEntry, StatusUpdate, TaskId, TaskRecord};
use async_trait::async_trait;
use std::path::{Path, PathBuf};
use tokio::sync::Mutex;

#[derive(Debug)]
pub struct JsonFileTaskStore {
    path: PathBuf,
    state: Mutex<StoreState>,
}

impl JsonFileTaskStore {
    /// Open the store at `path`, starting empty if the file does not exist yet
    pub async fn open(path: impl AsRef<Path>) -> Result<Self, StoreError> {
        let path = path.as_ref().to_path_buf();
        let state = match tokio::fs::read(&path).await {
            Ok(bytes) => {
                let state: StoreState = serde_json::from_slice(&bytes)?;
                log::info!(
                    "Loaded {} tasks from {}",
                    state.tasks.len(),
                    path.display()
                );
                state
            }
            Err(e) if e.kind() == std::io::ErrorKind::NotFound => {
                log::debug!("No task store at {}, starting fresh", path.display());
                StoreState::default()
            }
            Err(e) => return Err(e.into()),
        };

        Ok(Self {
            path,
            state: Mutex::new(state),
        })
    }

    pub fn path(&self) -> &Path {
        &self.path
    }

    /// Write `state` to disk; the caller commits it in memory only on success
    async fn persist(&self, state: &StoreState) -> Result<(), StoreError> {
        if let Some(parent) = self.path.parent() {
            if !parent.as_os_str().is_empty() {
                tokio::fs::create_dir_all(parent).await?;
            }
        }
        let content = serde_json::to_vec_pretty(state)?;
        tokio::fs::write(&self.path, content).await?;
        log::debug!("Saved task store to {}", self.path.display());
        Ok(())
    }
}

#[async_trait]
impl TaskStore for JsonFileTaskStore {
    async fn insert_task(&self, task: TaskRecord) -> Result<(), StoreError> {
        let mut state = self.state.lock().await;
        let mut next = state.clone();
        next.insert(task)?;
        self.persist(&next).await?;
        *state = next;
        Ok(())
    }

    async fn fetch_task(&self, task_id: &TaskId) -> Result<TaskRecord, StoreError> {
        self.state.lock().await.get(task_id).cloned()
    }

    async fn list_tasks(&self) -> Result<Vec<TaskRecord>, StoreError> {
        Ok(self.state.lock().await.tasks.values().cloned().collect())
    }

    async fn update_status(&self, update: StatusUpdate) -> Result<TaskRecord, StoreError> {
        let mut state = self.state.lock().await;
        let mut next = state.clone();
        let updated = next.apply(&update)?;
        self.persist(&next).await?;
        *state = next;
        Ok(updated)
    }

    async fn history(&self, task_id: &TaskId) -> Result<Vec<HistoryEntry>, StoreError> {
        self.state.lock().await.history_for(task_id)
    }
}
