//! Task store trait
//!
//! The seam between the review workflow and wherever tasks are persisted.
//! Implementations must make the version check and the write of
//! `update_status` one atomic step per task, so that two role actions
//! racing on the same task cannot both succeed.

use crate::error::StoreError;
use crate::types::{HistoryEntry, StatusUpdate, TaskId, TaskRecord};
use async_trait::async_trait;

/// Persistence for annotation task status
///
/// # Thread Safety
///
/// Implementations must be `Send + Sync` so a single store can serve
/// concurrent request handlers.
#[async_trait]
pub trait TaskStore: Send + Sync {
    /// Add a new task; fails if the id is taken
    async fn insert_task(&self, task: TaskRecord) -> Result<(), StoreError>;

    async fn fetch_task(&self, task_id: &TaskId) -> Result<TaskRecord, StoreError>;

    /// All tasks, ordered by id
    async fn list_tasks(&self) -> Result<Vec<TaskRecord>, StoreError>;

    /// Move a task to `update.status`
    ///
    /// If `update.expected_version` is set and no longer matches, fails with
    /// `StoreError::VersionConflict` and leaves the task untouched. On
    /// success a history entry is recorded and the updated task returned.
    async fn update_status(&self, update: StatusUpdate) -> Result<TaskRecord, StoreError>;

    /// Activity log for a task, oldest first
    async fn history(&self, task_id: &TaskId) -> Result<Vec<HistoryEntry>, StoreError>;
}
