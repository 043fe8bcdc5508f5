//! Task status registry
//!
//! The fixed set of workflow statuses a task can be in, with their
//! integer codes and display metadata. Codes 3, 4 and 5 are a reserved
//! gap: no status owns them and every lookup against them fails.

use crate::error::{Result, WorkflowError};
use serde::{Deserialize, Serialize};
use std::str::FromStr;
use strum::{Display, EnumIter, IntoEnumIterator, IntoStaticStr};

/// Reserved status codes with no assigned status
pub const RESERVED_STATUS_CODES: std::ops::RangeInclusive<i64> = 3..=5;

/// Workflow status of an annotation task
///
/// Serialized as its integer code, which is how task records persist it.
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
#[serde(try_from = "i64", into = "i64")]
#[strum(serialize_all = "snake_case")]
pub enum TaskStatus {
    NotStarted = 0,
    InProgress = 1,
    Completed = 2,
    Accepted = 6,
    Rejected = 7,
    Fixed = 8,
    Fixing = 9,
    QaInReview = 10,
    QaRejected = 11,
    QaVerified = 12,
}

/// Display metadata for a status code
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub struct StatusInfo {
    pub code: i64,
    pub key: &'static str,
    pub label: &'static str,
    pub color_hex: &'static str,
}

impl TaskStatus {
    /// Resolve a raw status code
    pub fn from_code(code: i64) -> Result<Self> {
        Self::iter()
            .find(|status| status.code() == code)
            .ok_or(WorkflowError::InvalidStatus { code })
    }

    /// Whether `code` falls into the reserved gap between Completed and Accepted
    pub fn is_reserved_code(code: i64) -> bool {
        RESERVED_STATUS_CODES.contains(&code)
    }

    /// Integer code as stored on task records
    pub fn code(self) -> i64 {
        self as i64
    }

    /// snake_case key used in policy files
    pub fn key(self) -> &'static str {
        self.into()
    }

    pub fn label(self) -> &'static str {
        match self {
            Self::NotStarted => "Not Started",
            Self::InProgress => "In Progress",
            Self::Completed => "Completed",
            Self::Accepted => "Accepted",
            Self::Rejected => "Rejected",
            Self::Fixed => "Fixed",
            Self::Fixing => "Fixing",
            Self::QaInReview => "QA InReview",
            Self::QaRejected => "QA Rejected",
            Self::QaVerified => "QA Verified",
        }
    }

    pub fn color_hex(self) -> &'static str {
        match self {
            Self::NotStarted => "#7166F9",
            Self::InProgress => "#FFA31A",
            Self::Completed => "#6BC371",
            Self::Accepted => "#589BFC",
            Self::Rejected => "#EF5050",
            Self::Fixed => "#1D62FE",
            Self::Fixing => "#FE6173",
            Self::QaInReview => "#FF8A4A",
            Self::QaRejected => "#C93053",
            Self::QaVerified => "#24CEDF",
        }
    }

    /// Statuses from Accepted onwards are audit outcomes rather than annotation progress
    pub fn is_audit_status(self) -> bool {
        self >= Self::Accepted
    }

    pub fn info(self) -> StatusInfo {
        StatusInfo {
            code: self.code(),
            key: self.key(),
            label: self.label(),
            color_hex: self.color_hex(),
        }
    }

    /// Display name and color for a raw status code
    pub fn describe(code: i64) -> Result<StatusInfo> {
        Self::from_code(code).map(Self::info)
    }
}

impl TryFrom<i64> for TaskStatus {
    type Error = WorkflowError;

    fn try_from(code: i64) -> Result<Self> {
        Self::from_code(code)
    }
}

impl From<TaskStatus> for i64 {
    fn from(status: TaskStatus) -> Self {
        status.code()
    }
}

/// Accepts either the snake_case key (`qa_in_review`) or the integer code (`10`)
impl FromStr for TaskStatus {
    type Err = WorkflowError;

    fn from_str(s: &str) -> Result<Self> {
        let s = s.trim();
        if let Ok(code) = s.parse::<i64>() {
            return Self::from_code(code);
        }
        let normalized = s.to_ascii_lowercase().replace('-', "_");
        Self::iter()
            .find(|status| status.key() == normalized)
            .ok_or_else(|| WorkflowError::UnknownStatus(s.to_string()))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_declared_codes() {
        let codes: Vec<i64> = TaskStatus::iter().map(TaskStatus::code).collect();
        assert_eq!(codes, vec![0, 1, 2, 6, 7, 8, 9, 10, 11, 12]);
    }

    #[test]
    fn test_reserved_gap_is_invalid() {
        for code in RESERVED_STATUS_CODES {
            assert!(TaskStatus::is_reserved_code(code));
            assert_eq!(
                TaskStatus::from_code(code),
                Err(WorkflowError::InvalidStatus { code })
            );
            assert!(TaskStatus::describe(code).is_err());
        }
    }

    #[test]
    fn test_out_of_range_codes() {
        for code in [-1, 13, 100, i64::MAX] {
            assert!(!TaskStatus::is_reserved_code(code));
            assert_eq!(
                TaskStatus::from_code(code),
                Err(WorkflowError::InvalidStatus { code })
            );
        }
    }

    #[test]
    fn test_describe() {
        let info = TaskStatus::describe(10).unwrap();
        assert_eq!(info.label, "QA InReview");
        assert_eq!(info.color_hex, "#FF8A4A");
        assert_eq!(info.key, "qa_in_review");

        let info = TaskStatus::describe(0).unwrap();
        assert_eq!(info.label, "Not Started");
        assert_eq!(info.color_hex, "#7166F9");
    }

    #[test]
    fn test_audit_split() {
        assert!(!TaskStatus::NotStarted.is_audit_status());
        assert!(!TaskStatus::Completed.is_audit_status());
        assert!(TaskStatus::Accepted.is_audit_status());
        assert!(TaskStatus::QaVerified.is_audit_status());
    }

    #[test]
    fn test_from_str() {
        assert_eq!("qa_verified".parse::<TaskStatus>(), Ok(TaskStatus::QaVerified));
        assert_eq!("in-progress".parse::<TaskStatus>(), Ok(TaskStatus::InProgress));
        assert_eq!("7".parse::<TaskStatus>(), Ok(TaskStatus::Rejected));
        assert_eq!(
            "4".parse::<TaskStatus>(),
            Err(WorkflowError::InvalidStatus { code: 4 })
        );
        assert!(matches!(
            "shipped".parse::<TaskStatus>(),
            Err(WorkflowError::UnknownStatus(_))
        ));
    }

    #[test]
    fn test_serde_uses_codes() {
        let json = serde_json::to_string(&TaskStatus::Fixing).unwrap();
        assert_eq!(json, "9");
        let parsed: TaskStatus = serde_json::from_str("12").unwrap();
        assert_eq!(parsed, TaskStatus::QaVerified);
        assert!(serde_json::from_str::<TaskStatus>("5").is_err());
    }

    #[test]
    fn test_display_uses_key() {
        assert_eq!(TaskStatus::QaRejected.to_string(), "qa_rejected");
    }
}
