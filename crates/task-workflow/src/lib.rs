//! Review workflow for annotation tasks
//!
//! This crate provides:
//! - The task status registry (codes, labels, colors)
//! - The role model
//! - The action catalog, including the `disable` and `cancel` sentinels
//! - The permission matrix answering "which actions may this role take on a
//!   task in this status", backed by a declarative TOML policy
//! - A state machine view over the matrix for auditing
//!
//! # Example
//!
//! ```
//! use task_workflow::{ActionKind, PermissionMatrix, Role, TaskStatus};
//!
//! let matrix = PermissionMatrix::builtin();
//! let actions = matrix.permitted_actions(TaskStatus::Rejected, Role::Annotator);
//! assert_eq!(actions.as_slice(), &[ActionKind::StartFixing]);
//!
//! // Raw codes from a client go through the checked lookup
//! assert!(matrix.permitted_actions_for_codes(3, 2).is_err());
//! ```

pub mod action;
pub mod error;
pub mod matrix;
pub mod policy;
pub mod role;
pub mod status;
pub mod transition;

pub use action::{ActionInfo, ActionKind, ActionTarget};
pub use error::{PolicyError, WorkflowError};
pub use matrix::{ActionSet, PermissionMatrix};
pub use policy::DEFAULT_POLICY;
pub use role::Role;
pub use status::{StatusInfo, TaskStatus, RESERVED_STATUS_CODES};
pub use transition::Transition;
