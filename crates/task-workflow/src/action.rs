//! Action catalog
//!
//! Every action a role may be offered on a task, with the button metadata
//! the UI renders and the status each action moves the task to.
//!
//! Two entries are sentinels rather than transitions:
//! - `disable` renders a disabled "Change status" control
//! - `cancel` closes the status dialog without touching the task

use crate::error::{Result, WorkflowError};
use crate::TaskStatus;
use serde::{Deserialize, Serialize};
use std::str::FromStr;
use strum::{Display, EnumIter, IntoEnumIterator, IntoStaticStr};

/// Action offered to a role on a task
#[derive(
    Debug,
    Clone,
    Copy,
    PartialEq,
    Eq,
    Hash,
    PartialOrd,
    Ord,
    Serialize,
    Deserialize,
    Display,
    EnumIter,
    IntoStaticStr,
)]
#[serde(rename_all = "camelCase")]
#[strum(serialize_all = "camelCase")]
pub enum ActionKind {
    Complete,
    Accept,
    Reject,
    InProgress,
    StartFixing,
    Fix,
    QaApprove,
    QaReject,
    QaInReview,
    Disable,
    Cancel,
}

/// Where an action leads
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ActionTarget {
    /// Moves the task to this status
    Status(TaskStatus),
    /// Dismisses the dialog, no status change
    NoTransition,
    /// Nothing is permitted, the control is rendered disabled
    Disabled,
}

/// Serializable snapshot of a catalog entry
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct ActionInfo {
    pub key: &'static str,
    pub text: &'static str,
    pub color_hex: &'static str,
    pub hover_color_hex: Option<&'static str>,
    pub target_status_code: Option<i64>,
}

impl ActionKind {
    /// Look up an action by its camelCase key (`qaApprove`)
    pub fn from_key(key: &str) -> Result<Self> {
        Self::iter()
            .find(|action| action.key() == key)
            .ok_or_else(|| WorkflowError::UnknownAction(key.to_string()))
    }

    pub fn key(self) -> &'static str {
        self.into()
    }

    pub fn text(self) -> &'static str {
        match self {
            Self::Complete => "Complete",
            Self::Accept => "Accept",
            Self::Reject => "Reject",
            Self::InProgress => "In Progress",
            Self::StartFixing => "Start Fixing",
            Self::Fix => "Fix",
            Self::QaApprove => "QA Approve",
            Self::QaReject => "QA Reject",
            Self::QaInReview => "QA In Review",
            Self::Disable => "Change status",
            Self::Cancel => "Cancel",
        }
    }

    pub fn color_hex(self) -> &'static str {
        match self {
            Self::Complete => "#6BC371",
            Self::Accept => "#589BFC",
            Self::Reject => "#EF5050",
            Self::InProgress => "#FFA31A",
            Self::StartFixing => "#FE6173",
            Self::Fix => "#1D62FE",
            Self::QaApprove => "#24CEDF",
            Self::QaReject => "#C93053",
            Self::QaInReview => "#FF8A4A",
            Self::Disable => "#EF5050",
            Self::Cancel => "#000000",
        }
    }

    /// Hover color; sentinels have none
    pub fn hover_color_hex(self) -> Option<&'static str> {
        match self {
            Self::Complete => Some("#80d986"),
            Self::Accept => Some("#71aafc"),
            Self::Reject => Some("#f76262"),
            Self::InProgress => Some("#fcad37"),
            Self::StartFixing => Some("#fa7281"),
            Self::Fix => Some("#3f79fc"),
            Self::QaApprove => Some("#37d8e8"),
            Self::QaReject => Some("#db4a6c"),
            Self::QaInReview => Some("#f79a67"),
            Self::Disable | Self::Cancel => None,
        }
    }

    pub fn target(self) -> ActionTarget {
        match self {
            Self::Complete => ActionTarget::Status(TaskStatus::Completed),
            Self::Accept => ActionTarget::Status(TaskStatus::Accepted),
            Self::Reject => ActionTarget::Status(TaskStatus::Rejected),
            Self::InProgress => ActionTarget::Status(TaskStatus::InProgress),
            Self::StartFixing => ActionTarget::Status(TaskStatus::Fixing),
            Self::Fix => ActionTarget::Status(TaskStatus::Fixed),
            Self::QaApprove => ActionTarget::Status(TaskStatus::QaVerified),
            Self::QaReject => ActionTarget::Status(TaskStatus::QaRejected),
            Self::QaInReview => ActionTarget::Status(TaskStatus::QaInReview),
            Self::Disable => ActionTarget::Disabled,
            Self::Cancel => ActionTarget::NoTransition,
        }
    }

    pub fn target_status(self) -> Option<TaskStatus> {
        match self.target() {
            ActionTarget::Status(status) => Some(status),
            ActionTarget::NoTransition | ActionTarget::Disabled => None,
        }
    }

    /// `disable` and `cancel` must never reach the persistence layer
    pub fn is_sentinel(self) -> bool {
        self.target_status().is_none()
    }

    pub fn info(self) -> ActionInfo {
        ActionInfo {
            key: self.key(),
            text: self.text(),
            color_hex: self.color_hex(),
            hover_color_hex: self.hover_color_hex(),
            target_status_code: self.target_status().map(TaskStatus::code),
        }
    }
}

impl FromStr for ActionKind {
    type Err = WorkflowError;

    fn from_str(s: &str) -> Result<Self> {
        Self::from_key(s.trim())
    }
}
