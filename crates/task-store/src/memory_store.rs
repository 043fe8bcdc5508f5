//! In-memory task store

use crate::error::StoreError;
use crate::state::StoreState;
use crate::store::TaskStore;
use crate::types::{HistoryEntry, StatusUpdate, TaskId, TaskRecord};
use async_trait::async_trait;
use std::sync::{Arc, Mutex, MutexGuard};

/// Task store held in process memory
///
/// Clones share the same tasks. The mutex is never held across an await.
#[derive(Debug, Clone, Default)]
pub struct InMemoryTaskStore {
    state: Arc<Mutex<StoreState>>,
}

impl InMemoryTaskStore {
    pub fn new() -> Self {
        Self::default()
    }

    /// Store pre-populated with `tasks`
    pub fn with_tasks(tasks: impl IntoIterator<Item = TaskRecord>) -> Result<Self, StoreError> {
        let store = Self::new();
        {
            let mut state = store.lock();
            for task in tasks {
                state.insert(task)?;
            }
        }
        Ok(store)
    }

    fn lock(&self) -> MutexGuard<'_, StoreState> {
        // a poisoned lock still holds consistent data: every mutation is applied in one step
        self.state.lock().unwrap_or_else(|poisoned| poisoned.into_inner())
    }
}

#[async_trait]
impl TaskStore for InMemoryTaskStore {
    async fn insert_task(&self, task: TaskRecord) -> Result<(), StoreError> {
        self.lock().insert(task)
    }

    async fn fetch_task(&self, task_id: &TaskId) -> Result<TaskRecord, StoreError> {
        self.lock().get(task_id).cloned()
    }

    async fn list_tasks(&self) -> Result<Vec<TaskRecord>, StoreError> {
        Ok(self.lock().tasks.values().cloned().collect())
    }

    async fn update_status(&self, update: StatusUpdate) -> Result<TaskRecord, StoreError> {
        self.lock().apply(&update)
    }

    async fn history(&self, task_id: &TaskId) -> Result<Vec<HistoryEntry>, StoreError> {
        self.lock().history_for(task_id)
    }
}
