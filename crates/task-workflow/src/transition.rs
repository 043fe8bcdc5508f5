//! State machine view of the permission matrix
//!
//! Statuses are states and dispatchable actions are labelled edges. The
//! graph has cycles and no absorbing state; these helpers make that
//! auditable.

use crate::action::ActionKind;
use crate::matrix::PermissionMatrix;
use crate::{Role, TaskStatus};
use serde::Serialize;
use std::collections::{BTreeSet, VecDeque};
use strum::IntoEnumIterator;

/// One labelled edge of the workflow graph
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub struct Transition {
    pub from: TaskStatus,
    pub role: Role,
    pub action: ActionKind,
    pub to: TaskStatus,
}

impl PermissionMatrix {
    /// Every edge the matrix allows, sentinels excluded
    pub fn transitions(&self) -> impl Iterator<Item = Transition> + '_ {
        self.cells().flat_map(|(from, role, actions)| {
            actions.dispatchable().filter_map(move |action| {
                action.target_status().map(|to| Transition {
                    from,
                    role,
                    action,
                    to,
                })
            })
        })
    }

    /// Statuses one action away from `status`, over all roles
    pub fn successors(&self, status: TaskStatus) -> BTreeSet<TaskStatus> {
        Role::iter()
            .flat_map(|role| self.permitted_actions(status, role).dispatchable())
            .filter_map(ActionKind::target_status)
            .collect()
    }

    /// Statuses reachable from `status` in one or more steps
    pub fn reachable_from(&self, status: TaskStatus) -> BTreeSet<TaskStatus> {
        let mut visited = BTreeSet::new();
        let mut queue: VecDeque<TaskStatus> = self.successors(status).into_iter().collect();

        while let Some(next) = queue.pop_front() {
            if visited.insert(next) {
                queue.extend(self.successors(next));
            }
        }

        visited
    }

    /// Whether a task can leave `status` and come back to it
    pub fn lies_on_cycle(&self, status: TaskStatus) -> bool {
        self.reachable_from(status).contains(&status)
    }

    /// Statuses no action ever leads to
    pub fn unreachable_statuses(&self) -> BTreeSet<TaskStatus> {
        let targets: BTreeSet<TaskStatus> = self.transitions().map(|t| t.to).collect();
        TaskStatus::iter().filter(|s| !targets.contains(s)).collect()
    }
}
