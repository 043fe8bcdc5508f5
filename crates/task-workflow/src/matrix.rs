//! Permission matrix
//!
//! Maps every (status, role) pair to the ordered list of actions that role
//! is offered on a task in that status. The matrix is the single place the
//! review workflow's authorization lives; it is read-only once built and
//! can be shared freely between threads.
//!
//! Order within a cell is display order. The first entry that is not
//! `disable` is the primary button.

use crate::action::ActionKind;
use crate::error::{PolicyError, Result, WorkflowError};
use crate::{Role, TaskStatus};
use std::collections::BTreeMap;
use std::sync::OnceLock;
use strum::IntoEnumIterator;

/// Ordered actions permitted for one (status, role) cell
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ActionSet<'a> {
    actions: &'a [ActionKind],
}

impl<'a> ActionSet<'a> {
    pub fn as_slice(&self) -> &'a [ActionKind] {
        self.actions
    }

    pub fn iter(&self) -> impl Iterator<Item = ActionKind> + 'a {
        self.actions.iter().copied()
    }

    /// Actions that actually move the task (sentinels filtered out)
    pub fn dispatchable(&self) -> impl Iterator<Item = ActionKind> + 'a {
        self.iter().filter(|action| !action.is_sentinel())
    }

    /// Default button: first entry that is not `disable`
    pub fn primary(&self) -> Option<ActionKind> {
        self.iter().find(|action| *action != ActionKind::Disable)
    }

    /// No action available: render a disabled control, not an error
    pub fn is_disabled(&self) -> bool {
        self.dispatchable().next().is_none()
    }

    pub fn contains(&self, action: ActionKind) -> bool {
        self.actions.contains(&action)
    }

    pub fn len(&self) -> usize {
        self.actions.len()
    }

    pub fn is_empty(&self) -> bool {
        self.actions.is_empty()
    }
}

/// Lookup table from (status, role) to permitted actions
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PermissionMatrix {
    cells: BTreeMap<(TaskStatus, Role), Vec<ActionKind>>,
}

impl PermissionMatrix {
    /// Build a matrix from explicit cells, requiring one cell per (status, role)
    pub(crate) fn from_cells(
        cells: BTreeMap<(TaskStatus, Role), Vec<ActionKind>>,
    ) -> Result<Self, PolicyError> {
        for status in TaskStatus::iter() {
            for role in Role::iter() {
                if !cells.contains_key(&(status, role)) {
                    return Err(PolicyError::MissingCell { status, role });
                }
            }
        }
        Ok(Self { cells })
    }

    /// The review workflow as shipped with the product
    pub fn builtin() -> &'static PermissionMatrix {
        static BUILTIN: OnceLock<PermissionMatrix> = OnceLock::new();
        BUILTIN.get_or_init(builtin_matrix)
    }

    /// Permitted actions for a typed (status, role) pair
    pub fn permitted_actions(&self, status: TaskStatus, role: Role) -> ActionSet<'_> {
        // complete by construction, see from_cells
        let actions = self
            .cells
            .get(&(status, role))
            .map(Vec::as_slice)
            .unwrap_or_default();
        ActionSet { actions }
    }

    /// Permitted actions for raw codes as submitted by a client
    ///
    /// Fails with `InvalidStatus` for the reserved codes 3..=5 and anything
    /// outside 0..=12, and with `InvalidRole` for ordinals outside 0..=4.
    /// An empty or `disable`-only result is a valid answer, not an error.
    pub fn permitted_actions_for_codes(
        &self,
        status_code: i64,
        role_ordinal: i64,
    ) -> Result<ActionSet<'_>> {
        let status = TaskStatus::from_code(status_code).inspect_err(|_| {
            if TaskStatus::is_reserved_code(status_code) {
                log::warn!("Lookup against reserved status code {}", status_code);
            }
        })?;
        let role = Role::from_ordinal(role_ordinal)?;
        Ok(self.permitted_actions(status, role))
    }

    /// Target status of `action` if `role` may perform it on a task in `status`
    pub fn resolve(&self, status: TaskStatus, role: Role, action: ActionKind) -> Result<TaskStatus> {
        let Some(target) = action.target_status() else {
            return Err(WorkflowError::SentinelAction(action));
        };
        if !self.permitted_actions(status, role).contains(action) {
            return Err(WorkflowError::ActionNotPermitted {
                action,
                status,
                role,
            });
        }
        Ok(target)
    }

    /// First permitted action moving a task from `status` to `target`
    pub fn action_for_target(
        &self,
        status: TaskStatus,
        role: Role,
        target: TaskStatus,
    ) -> Result<ActionKind> {
        self.permitted_actions(status, role)
            .dispatchable()
            .find(|action| action.target_status() == Some(target))
            .ok_or(WorkflowError::TransitionNotPermitted {
                status,
                target,
                role,
            })
    }

    /// All cells in status, then role order
    pub fn cells(&self) -> impl Iterator<Item = (TaskStatus, Role, ActionSet<'_>)> + '_ {
        self.cells.iter().map(|(&(status, role), actions)| {
            (
                status,
                role,
                ActionSet {
                    actions: actions.as_slice(),
                },
            )
        })
    }
}

impl Default for PermissionMatrix {
    fn default() -> Self {
        builtin_matrix()
    }
}

fn builtin_matrix() -> PermissionMatrix {
    use ActionKind::{
        Accept, Complete, Disable, Fix, InProgress, QaApprove, QaInReview, QaReject, Reject,
        StartFixing,
    };
    use Role::{Admin, Annotator, Auditor, Qa, TeamAdmin};

    let rows: [(TaskStatus, [(Role, &[ActionKind]); 5]); 10] = [
        (
            TaskStatus::NotStarted,
            [
                (Annotator, &[Complete]),
                (Auditor, &[Complete]),
                (Admin, &[Complete]),
                (TeamAdmin, &[Complete]),
                (Qa, &[Disable]),
            ],
        ),
        (
            TaskStatus::InProgress,
            [
                (Annotator, &[Complete]),
                (Auditor, &[Complete]),
                (Admin, &[Complete, QaApprove, QaReject, Accept]),
                (TeamAdmin, &[Complete, QaApprove, QaReject, Accept]),
                (Qa, &[Disable]),
            ],
        ),
        (
            TaskStatus::Completed,
            [
                (Annotator, &[InProgress]),
                (Auditor, &[Accept, Reject]),
                (Admin, &[Accept, Reject, InProgress, QaApprove, QaInReview, QaReject]),
                (TeamAdmin, &[Accept, Reject, InProgress, QaApprove, QaInReview, QaReject]),
                (Qa, &[QaInReview]),
            ],
        ),
        (
            TaskStatus::Accepted,
            [
                (Annotator, &[Disable]),
                (Auditor, &[Complete, Reject]),
                (Admin, &[Complete, Reject]),
                (TeamAdmin, &[Complete, Reject]),
                (Qa, &[Disable]),
            ],
        ),
        (
            TaskStatus::Rejected,
            [
                (Annotator, &[StartFixing]),
                (Auditor, &[Complete, Accept]),
                (Admin, &[Complete, Accept, StartFixing, Fix]),
                (TeamAdmin, &[Complete, Accept, StartFixing, Fix]),
                (Qa, &[StartFixing]),
            ],
        ),
        (
            TaskStatus::Fixed,
            [
                (Annotator, &[Disable]),
                (Auditor, &[Accept, Reject]),
                (Admin, &[Complete, Accept, Reject]),
                (TeamAdmin, &[Complete, Accept, Reject]),
                (Qa, &[QaApprove, QaReject]),
            ],
        ),
        (
            TaskStatus::Fixing,
            [
                (Annotator, &[Fix]),
                (Auditor, &[Complete]),
                (Admin, &[Complete, Accept, Reject, Fix]),
                (TeamAdmin, &[Complete, Accept, Reject, Fix]),
                (Qa, &[QaApprove, QaReject]),
            ],
        ),
        (
            TaskStatus::QaInReview,
            [
                (Annotator, &[Disable]),
                (Auditor, &[Complete]),
                (Admin, &[Accept, Reject, QaApprove, QaReject]),
                (TeamAdmin, &[Accept, Reject, QaApprove, QaReject]),
                (Qa, &[QaApprove, QaReject]),
            ],
        ),
        (
            TaskStatus::QaRejected,
            [
                (Annotator, &[StartFixing]),
                (Auditor, &[Complete]),
                (Admin, &[InProgress, QaInReview, QaApprove, Accept, Reject]),
                (TeamAdmin, &[InProgress, QaInReview, QaApprove, Accept, Reject]),
                (Qa, &[QaApprove, QaInReview]),
            ],
        ),
        (
            TaskStatus::QaVerified,
            [
                (Annotator, &[Disable]),
                (Auditor, &[Accept, Reject]),
                (Admin, &[Accept, Reject, InProgress, QaApprove, QaInReview, QaReject]),
                (TeamAdmin, &[Accept, Reject, InProgress, QaApprove, QaInReview, QaReject]),
                (Qa, &[QaInReview, QaReject]),
            ],
        ),
    ];

    let cells = rows
        .into_iter()
        .flat_map(|(status, cells)| {
            cells
                .into_iter()
                .map(move |(role, actions)| ((status, role), actions.to_vec()))
        })
        .collect();

    PermissionMatrix { cells }
}
