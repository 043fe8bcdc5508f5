//! Permission-checked task store (decorator pattern)
//!
//! Wraps any `TaskStore` and refuses status updates the permission matrix
//! does not allow for the acting role. Reads pass straight through.
//!
//! Every forwarded update is pinned to the task version the permission
//! check was made against. If another update lands in between, the inner
//! store rejects the write with `VersionConflict` instead of applying a
//! transition that was validated against a status the task no longer has.

use crate::error::StoreError;
use crate::store::TaskStore;
use crate::types::{Actor, HistoryEntry, StatusUpdate, TaskId, TaskRecord};
use async_trait::async_trait;
use std::sync::Arc;
use task_workflow::{ActionKind, PermissionMatrix};

#[derive(Debug, Clone)]
pub struct WorkflowGuard<S: TaskStore> {
    inner: S,
    matrix: Arc<PermissionMatrix>,
}

impl<S: TaskStore> WorkflowGuard<S> {
    pub fn new(inner: S, matrix: Arc<PermissionMatrix>) -> Self {
        Self { inner, matrix }
    }

    /// Guard using the built-in review workflow
    pub fn with_builtin_policy(inner: S) -> Self {
        Self::new(inner, Arc::new(PermissionMatrix::builtin().clone()))
    }

    pub fn inner(&self) -> &S {
        &self.inner
    }

    pub fn matrix(&self) -> &PermissionMatrix {
        &self.matrix
    }

    /// Current task and the actions `actor` is offered on it
    pub async fn available_actions(
        &self,
        task_id: &TaskId,
        actor: &Actor,
    ) -> Result<(TaskRecord, Vec<ActionKind>), StoreError> {
        let task = self.inner.fetch_task(task_id).await?;
        let actions = self
            .matrix
            .permitted_actions(task.status, actor.role)
            .as_slice()
            .to_vec();
        Ok((task, actions))
    }

    /// Perform `action` on a task as `actor`
    ///
    /// Sentinel actions and actions outside the actor's cell are rejected
    /// before anything is written.
    pub async fn apply_action(
        &self,
        task_id: &TaskId,
        actor: Actor,
        action: ActionKind,
        expected_version: Option<u64>,
    ) -> Result<TaskRecord, StoreError> {
        let task = self.inner.fetch_task(task_id).await?;
        check_version(&task, expected_version)?;

        let target = self
            .matrix
            .resolve(task.status, actor.role, action)
            .inspect_err(|err| log::warn!("Refused {} on task {}: {}", action, task_id, err))?;

        let update = StatusUpdate::new(task_id.clone(), actor, target)
            .with_expected_version(task.version);
        self.inner.update_status(update).await
    }
}

fn check_version(task: &TaskRecord, expected: Option<u64>) -> Result<(), StoreError> {
    match expected {
        Some(expected) if expected != task.version => Err(StoreError::VersionConflict {
            task_id: task.id.clone(),
            expected,
            actual: task.version,
        }),
        _ => Ok(()),
    }
}

#[async_trait]
impl<S: TaskStore> TaskStore for WorkflowGuard<S> {
    async fn insert_task(&self, task: TaskRecord) -> Result<(), StoreError> {
        self.inner.insert_task(task).await
    }

    async fn fetch_task(&self, task_id: &TaskId) -> Result<TaskRecord, StoreError> {
        self.inner.fetch_task(task_id).await
    }

    async fn list_tasks(&self) -> Result<Vec<TaskRecord>, StoreError> {
        self.inner.list_tasks().await
    }

    /// Only forwarded if some permitted action of the actor leads to `update.status`
    async fn update_status(&self, update: StatusUpdate) -> Result<TaskRecord, StoreError> {
        let task = self.inner.fetch_task(&update.task_id).await?;
        check_version(&task, update.expected_version)?;

        let action = self
            .matrix
            .action_for_target(task.status, update.actor.role, update.status)
            .inspect_err(|err| log::warn!("Refused update on task {}: {}", update.task_id, err))?;
        log::debug!(
            "Task {}: {} -> {} via {}",
            update.task_id,
            task.status,
            update.status,
            action
        );

        let pinned = update.with_expected_version(task.version);
        self.inner.update_status(pinned).await
    }

    async fn history(&self, task_id: &TaskId) -> Result<Vec<HistoryEntry>, StoreError> {
        self.inner.history(task_id).await
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::memory_store::InMemoryTaskStore;
    use task_workflow::{Role, TaskStatus, WorkflowError};

    fn guard_with_task(status: TaskStatus) -> WorkflowGuard<InMemoryTaskStore> {
        let mut task = TaskRecord::new("t1", "p1", 10);
        if status != TaskStatus::NotStarted {
            task.status = status;
        }
        let store = InMemoryTaskStore::with_tasks([task]).unwrap();
        WorkflowGuard::with_builtin_policy(store)
    }

    fn t1() -> TaskId {
        TaskId::new("t1")
    }

    #[tokio::test]
    async fn test_permitted_action_applies_target() {
        let guard = guard_with_task(TaskStatus::Rejected);
        let task = guard
            .apply_action(&t1(), Actor::new("ann", Role::Annotator), ActionKind::StartFixing, None)
            .await
            .unwrap();
        assert_eq!(task.status, TaskStatus::Fixing);
        assert_eq!(task.audit_status, Some(TaskStatus::Fixing));
    }

    #[tokio::test]
    async fn test_not_permitted_action_refused() {
        let guard = guard_with_task(TaskStatus::Rejected);
        let err = guard
            .apply_action(&t1(), Actor::new("ann", Role::Annotator), ActionKind::Accept, None)
            .await
            .unwrap_err();
        assert!(matches!(
            err,
            StoreError::Workflow(WorkflowError::ActionNotPermitted { .. })
        ));
        let task = guard.fetch_task(&t1()).await.unwrap();
        assert_eq!(task.status, TaskStatus::Rejected);
        assert!(guard.history(&t1()).await.unwrap().is_empty());
    }

    #[tokio::test]
    async fn test_sentinels_never_dispatched() {
        let guard = guard_with_task(TaskStatus::NotStarted);
        for action in [ActionKind::Disable, ActionKind::Cancel] {
            let err = guard
                .apply_action(&t1(), Actor::new("qa", Role::Qa), action, None)
                .await
                .unwrap_err();
            assert!(matches!(
                err,
                StoreError::Workflow(WorkflowError::SentinelAction(_))
            ));
        }
        assert_eq!(guard.fetch_task(&t1()).await.unwrap().version, 0);
    }

    #[tokio::test]
    async fn test_raw_status_update_checked() {
        let guard = guard_with_task(TaskStatus::Fixed);

        let update = StatusUpdate::new("t1", Actor::new("qa", Role::Qa), TaskStatus::QaVerified);
        let task = guard.update_status(update).await.unwrap();
        assert_eq!(task.status, TaskStatus::QaVerified);

        let update = StatusUpdate::new("t1", Actor::new("ann", Role::Annotator), TaskStatus::Completed);
        let err = guard.update_status(update).await.unwrap_err();
        assert!(matches!(
            err,
            StoreError::Workflow(WorkflowError::TransitionNotPermitted { .. })
        ));
    }

    #[tokio::test]
    async fn test_stale_expected_version() {
        let guard = guard_with_task(TaskStatus::Completed);
        let err = guard
            .apply_action(&t1(), Actor::new("aud", Role::Auditor), ActionKind::Accept, Some(7))
            .await
            .unwrap_err();
        assert!(err.is_retryable());
    }

    #[tokio::test]
    async fn test_second_role_action_sees_new_status() {
        let guard = guard_with_task(TaskStatus::Completed);
        guard
            .apply_action(&t1(), Actor::new("aud", Role::Auditor), ActionKind::Accept, Some(0))
            .await
            .unwrap();

        // An auditor that loaded the task at version 0 tries to reject it
        let err = guard
            .apply_action(&t1(), Actor::new("aud2", Role::Auditor), ActionKind::Reject, Some(0))
            .await
            .unwrap_err();
        assert!(matches!(err, StoreError::VersionConflict { .. }));

        let task = guard.fetch_task(&t1()).await.unwrap();
        assert_eq!(task.status, TaskStatus::Accepted);
    }

    #[tokio::test]
    async fn test_available_actions() {
        let guard = guard_with_task(TaskStatus::QaVerified);
        let (task, actions) = guard
            .available_actions(&t1(), &Actor::new("aud", Role::Auditor))
            .await
            .unwrap();
        assert_eq!(task.status, TaskStatus::QaVerified);
        assert_eq!(actions, vec![ActionKind::Accept, ActionKind::Reject]);
    }
}
