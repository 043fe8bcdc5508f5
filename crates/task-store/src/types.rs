//! Task records and status update requests
//!
//! These mirror the fields of a persisted annotation task that a status
//! change reads or writes. Everything else about a task (frames, labels,
//! video metadata) lives outside this crate.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use task_workflow::{Role, TaskStatus};

/// Identifier of a persisted task
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(transparent)]
pub struct TaskId(String);

impl TaskId {
    pub fn new(id: impl Into<String>) -> Self {
        TaskId(id.into())
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl std::fmt::Display for TaskId {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(&self.0)
    }
}

impl From<&str> for TaskId {
    fn from(id: &str) -> Self {
        TaskId::new(id)
    }
}

impl From<String> for TaskId {
    fn from(id: String) -> Self {
        TaskId(id)
    }
}

/// The user performing a status change
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Actor {
    pub user_id: String,
    pub role: Role,
}

impl Actor {
    pub fn new(user_id: impl Into<String>, role: Role) -> Self {
        Self {
            user_id: user_id.into(),
            role,
        }
    }
}

/// Persisted task state relevant to the review workflow
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct TaskRecord {
    pub id: TaskId,
    pub project_id: String,

    /// Current workflow status
    pub status: TaskStatus,

    /// Last annotation-progress status (below Accepted)
    pub task_status: TaskStatus,

    /// Last audit outcome (Accepted and later), if any
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub audit_status: Option<TaskStatus>,

    pub frame_count: u32,

    /// Frames a user has annotated so far
    ///
    /// Kept current by the annotation tool; status changes only read it.
    #[serde(default)]
    pub annotated_frames: u32,

    #[serde(default)]
    pub completed_frames: u32,

    /// 0..=100
    #[serde(default)]
    pub progress: f64,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub completed_at: Option<DateTime<Utc>>,

    pub updated_at: DateTime<Utc>,

    /// Bumped on every applied status change
    #[serde(default)]
    pub version: u64,
}

impl TaskRecord {
    /// A fresh task that nobody has started
    pub fn new(id: impl Into<TaskId>, project_id: impl Into<String>, frame_count: u32) -> Self {
        Self {
            id: id.into(),
            project_id: project_id.into(),
            status: TaskStatus::NotStarted,
            task_status: TaskStatus::NotStarted,
            audit_status: None,
            frame_count,
            annotated_frames: 0,
            completed_frames: 0,
            progress: 0.0,
            completed_at: None,
            updated_at: Utc::now(),
            version: 0,
        }
    }

    /// Record frames already annotated, e.g. for a task imported mid-way
    ///
    /// Clamped to `frame_count`; progress follows.
    pub fn with_annotated_frames(mut self, annotated_frames: u32) -> Self {
        self.annotated_frames = annotated_frames.min(self.frame_count);
        self.progress = progress_percent(self.annotated_frames, self.frame_count);
        self
    }

    /// Apply a status change with its bookkeeping
    ///
    /// Completed marks every frame done; moving back to In Progress
    /// recomputes progress from the annotated frames.
    pub fn apply_status(&mut self, status: TaskStatus, now: DateTime<Utc>) {
        self.status = status;

        if status.is_audit_status() {
            self.audit_status = Some(status);
        } else {
            self.task_status = status;
        }

        match status {
            TaskStatus::Completed => {
                self.completed_at = Some(now);
                self.completed_frames = self.frame_count;
                self.progress = 100.0;
            }
            TaskStatus::InProgress => {
                self.completed_at = None;
                self.completed_frames = self.annotated_frames.min(self.frame_count);
                self.progress = progress_percent(self.completed_frames, self.frame_count);
            }
            _ => {}
        }

        self.updated_at = now;
        self.version += 1;
    }
}

fn progress_percent(done: u32, total: u32) -> f64 {
    if total == 0 {
        0.0
    } else {
        f64::from(done) / f64::from(total) * 100.0
    }
}

/// Request to move a task to a new status
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct StatusUpdate {
    pub task_id: TaskId,
    pub actor: Actor,
    pub status: TaskStatus,

    /// Only apply if the stored version still matches
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub expected_version: Option<u64>,
}

impl StatusUpdate {
    pub fn new(task_id: impl Into<TaskId>, actor: Actor, status: TaskStatus) -> Self {
        Self {
            task_id: task_id.into(),
            actor,
            status,
            expected_version: None,
        }
    }

    pub fn with_expected_version(mut self, version: u64) -> Self {
        self.expected_version = Some(version);
        self
    }
}

/// Activity log entry written for every applied status change
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct HistoryEntry {
    pub task_id: TaskId,
    pub user_id: String,
    pub description: String,
    pub status: TaskStatus,
    pub recorded_at: DateTime<Utc>,
}

impl HistoryEntry {
    pub fn for_update(update: &StatusUpdate, recorded_at: DateTime<Utc>) -> Self {
        Self {
            task_id: update.task_id.clone(),
            user_id: update.actor.user_id.clone(),
            description: format!("set status to {}", update.status.code()),
            status: update.status,
            recorded_at,
        }
    }
}
