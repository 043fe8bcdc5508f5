//! Task persistence with permission-checked status updates
//!
//! This crate provides a trait-based task store with a permission guard.
//! The guard follows the decorator pattern, so the review workflow's
//! authorization composes with any storage backend.
//!
//! # Architecture
//!
//! ```text
//! ┌─────────────────────────────────────────────────┐
//! │                TaskStore trait                   │
//! │  - fetch_task() / list_tasks()                   │
//! │  - update_status()  (version guarded)            │
//! │  - history()                                     │
//! └─────────────────────────────────────────────────┘
//!                        │
//!        ┌───────────────┼────────────────────┐
//!        ▼               ▼                    ▼
//! ┌──────────────┐ ┌──────────────────┐ ┌─────────────────┐
//! │ InMemory     │ │ JsonFile         │ │ WorkflowGuard   │
//! │ TaskStore    │ │ TaskStore        │◄│ (decorator)     │
//! └──────────────┘ └──────────────────┘ └─────────────────┘
//! ```
//!
//! # Example
//!
//! ```rust
//! use task_store::{Actor, InMemoryTaskStore, TaskRecord, TaskStore, WorkflowGuard};
//! use task_workflow::{ActionKind, Role, TaskStatus};
//!
//! # async fn example() -> Result<(), task_store::StoreError> {
//! let store = InMemoryTaskStore::with_tasks([TaskRecord::new("t1", "project", 120)])?;
//! let guard = WorkflowGuard::with_builtin_policy(store);
//!
//! let task = guard
//!     .apply_action(&"t1".into(), Actor::new("u1", Role::Annotator), ActionKind::Complete, Some(0))
//!     .await?;
//! assert_eq!(task.status, TaskStatus::Completed);
//! # Ok(())
//! # }
//! ```

pub mod error;
pub mod guarded;
pub mod json_store;
pub mod memory_store;
mod state;
pub mod store;
pub mod types;

pub use error::StoreError;
pub use guarded::WorkflowGuard;
pub use json_store::JsonFileTaskStore;
pub use memory_store::InMemoryTaskStore;
pub use store::TaskStore;
pub use types::{Actor, HistoryEntry, StatusUpdate, TaskId, TaskRecord};
