//! Store errors
//!
//! Every variant is recoverable from the caller's point of view: the UI
//! shows `user_message()` and keeps the workflow view alive.

use crate::types::TaskId;
use task_workflow::WorkflowError;
use thiserror::Error;

#[derive(Debug, Error)]
pub enum StoreError {
    #[error("task {0} not found")]
    NotFound(TaskId),

    #[error("task {0} already exists")]
    AlreadyExists(TaskId),

    /// Another update landed between read and write
    #[error("task {task_id} was modified concurrently (expected version {expected}, found {actual})")]
    VersionConflict {
        task_id: TaskId,
        expected: u64,
        actual: u64,
    },

    #[error(transparent)]
    Workflow(#[from] WorkflowError),

    #[error("store I/O failed: {0}")]
    Io(#[from] std::io::Error),

    #[error("store data is malformed: {0}")]
    Serialization(#[from] serde_json::Error),
}

impl StoreError {
    /// Whether reloading the task and trying again can succeed
    pub fn is_retryable(&self) -> bool {
        matches!(self, StoreError::VersionConflict { .. } | StoreError::Io(_))
    }

    /// Short text for the user; never fatal to the workflow view
    pub fn user_message(&self) -> String {
        match self {
            StoreError::NotFound(id) => format!("Task {} no longer exists", id),
            StoreError::AlreadyExists(id) => format!("Task {} already exists", id),
            StoreError::VersionConflict { .. } | StoreError::Io(_) => {
                "Status update failed, please retry".to_string()
            }
            StoreError::Workflow(err) => format!("Status change not allowed: {}", err),
            StoreError::Serialization(_) => "Task data could not be read".to_string(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use task_workflow::{ActionKind, Role, TaskStatus};

    #[test]
    fn test_conflict_is_retryable() {
        let err = StoreError::VersionConflict {
            task_id: TaskId::new("t1"),
            expected: 1,
            actual: 2,
        };
        assert!(err.is_retryable());
        assert_eq!(err.user_message(), "Status update failed, please retry");
    }

    #[test]
    fn test_workflow_error_not_retryable() {
        let err = StoreError::from(WorkflowError::ActionNotPermitted {
            action: ActionKind::Accept,
            status: TaskStatus::Fixing,
            role: Role::Annotator,
        });
        assert!(!err.is_retryable());
        assert!(err.user_message().starts_with("Status change not allowed"));
    }
}
