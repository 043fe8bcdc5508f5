//! Store contents shared by the in-memory and file-backed stores

use crate::error::StoreError;
use crate::types::{HistoryEntry, StatusUpdate, TaskId, TaskRecord};
use chrono::Utc;
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub(crate) struct StoreState {
    #[serde(default)]
    pub tasks: BTreeMap<TaskId, TaskRecord>,
    #[serde(default)]
    pub history: Vec<HistoryEntry>,
}

impl StoreState {
    pub fn insert(&mut self, task: TaskRecord) -> Result<(), StoreError> {
        if self.tasks.contains_key(&task.id) {
            return Err(StoreError::AlreadyExists(task.id));
        }
        log::info!("Inserted task {} ({:?})", task.id, task.status);
        self.tasks.insert(task.id.clone(), task);
        Ok(())
    }

    pub fn get(&self, task_id: &TaskId) -> Result<&TaskRecord, StoreError> {
        self.tasks
            .get(task_id)
            .ok_or_else(|| StoreError::NotFound(task_id.clone()))
    }

    /// Compare the version, then write; callers hold the lock across both
    pub fn apply(&mut self, update: &StatusUpdate) -> Result<TaskRecord, StoreError> {
        let task = self
            .tasks
            .get_mut(&update.task_id)
            .ok_or_else(|| StoreError::NotFound(update.task_id.clone()))?;

        if let Some(expected) = update.expected_version {
            if task.version != expected {
                log::warn!(
                    "Rejected status update on {}: expected version {}, found {}",
                    update.task_id,
                    expected,
                    task.version
                );
                return Err(StoreError::VersionConflict {
                    task_id: update.task_id.clone(),
                    expected,
                    actual: task.version,
                });
            }
        }

        let now = Utc::now();
        let previous = task.status;
        task.apply_status(update.status, now);
        let updated = task.clone();

        self.history.push(HistoryEntry::for_update(update, now));
        log::info!(
            "Task {} moved {} -> {} by {} ({})",
            update.task_id,
            previous,
            update.status,
            update.actor.user_id,
            update.actor.role
        );
        Ok(updated)
    }

    pub fn history_for(&self, task_id: &TaskId) -> Result<Vec<HistoryEntry>, StoreError> {
        self.get(task_id)?;
        Ok(self
            .history
            .iter()
            .filter(|entry| &entry.task_id == task_id)
            .cloned()
            .collect())
    }
}
