//! Error types for workflow lookups and policy loading

use crate::{ActionKind, Role, TaskStatus};
use std::path::PathBuf;
use thiserror::Error;

/// Errors returned by registry lookups and the permission matrix
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum WorkflowError {
    /// Status code is not one of the declared statuses (includes the reserved 3..=5 gap)
    #[error("invalid task status code: {code}")]
    InvalidStatus { code: i64 },

    /// Role ordinal is outside 0..=4
    #[error("invalid role ordinal: {ordinal}")]
    InvalidRole { ordinal: i64 },

    #[error("unknown task status: {0}")]
    UnknownStatus(String),

    #[error("unknown role: {0}")]
    UnknownRole(String),

    #[error("unknown action: {0}")]
    UnknownAction(String),

    /// `disable` and `cancel` never cause a status transition
    #[error("action '{0}' does not transition a task")]
    SentinelAction(ActionKind),

    #[error("action '{action}' is not permitted for role {role} in status {status}")]
    ActionNotPermitted {
        action: ActionKind,
        status: TaskStatus,
        role: Role,
    },

    /// No permitted action moves the task from `status` to `target`
    #[error("role {role} cannot move a task from {status} to {target}")]
    TransitionNotPermitted {
        status: TaskStatus,
        target: TaskStatus,
        role: Role,
    },
}

/// Errors found while loading a declarative policy file
#[derive(Debug, Error)]
pub enum PolicyError {
    #[error("failed to read policy file {path:?}: {source}")]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("failed to parse policy: {0}")]
    Parse(#[from] toml::de::Error),

    #[error("unknown status '{0}' in policy")]
    UnknownStatus(String),

    /// Codes 3, 4 and 5 have no status; a policy row for them is rejected
    #[error("status code {0} is reserved and cannot carry permissions")]
    ReservedStatus(i64),

    #[error("status {0} has more than one row")]
    DuplicateStatus(TaskStatus),

    #[error("unknown role '{role}' under status {status}")]
    UnknownRole { status: TaskStatus, role: String },

    #[error("unknown action '{action}' for {status}/{role}")]
    UnknownAction {
        status: TaskStatus,
        role: Role,
        action: String,
    },

    #[error("role {role} listed twice under status {status}")]
    DuplicateRole { status: TaskStatus, role: Role },

    #[error("policy has no row for status {0}")]
    MissingStatus(TaskStatus),

    #[error("policy has no cell for {status}/{role}")]
    MissingCell { status: TaskStatus, role: Role },

    #[error("action '{action}' listed twice for {status}/{role}")]
    DuplicateAction {
        status: TaskStatus,
        role: Role,
        action: ActionKind,
    },

    #[error("'disable' must be the only entry for {status}/{role}")]
    DisableNotAlone { status: TaskStatus, role: Role },

    #[error("'cancel' cannot be granted in a policy cell ({status}/{role})")]
    CancelInCell { status: TaskStatus, role: Role },
}

pub type Result<T, E = WorkflowError> = std::result::Result<T, E>;
