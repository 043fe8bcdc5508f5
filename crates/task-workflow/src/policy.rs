//! Declarative policy files
//!
//! A policy file spells out the permission matrix in TOML so it can be
//! audited and changed without touching code:
//!
//! ```toml
//! [in_progress]
//! annotator = ["complete"]
//! admin = ["complete", "qaApprove", "qaReject", "accept"]
//! # ... one array per role
//! ```
//!
//! Status tables are keyed by status key (or code), role arrays by role
//! key, and entries are action keys. Every status needs a table and every
//! role an array; the reserved codes 3..=5 are rejected.

use crate::action::ActionKind;
use crate::error::{PolicyError, WorkflowError};
use crate::matrix::PermissionMatrix;
use crate::{Role, TaskStatus};
use std::collections::{BTreeMap, HashSet};
use std::fmt::Write as _;
use std::path::Path;
use strum::IntoEnumIterator;

/// Raw shape of a policy document before validation
type RawPolicy = BTreeMap<String, BTreeMap<String, Vec<String>>>;

/// The policy file matching `PermissionMatrix::builtin()`
pub const DEFAULT_POLICY: &str = include_str!("../policy/default.toml");

impl PermissionMatrix {
    /// Parse and validate a policy document
    pub fn from_toml_str(content: &str) -> Result<Self, PolicyError> {
        let raw: RawPolicy = toml::from_str(content)?;

        let mut cells = BTreeMap::new();
        let mut seen_statuses = HashSet::new();

        for (status_key, roles) in &raw {
            let status = parse_status(status_key)?;
            if !seen_statuses.insert(status) {
                return Err(PolicyError::DuplicateStatus(status));
            }

            for (role_key, entries) in roles {
                let role = role_key
                    .parse::<Role>()
                    .map_err(|_| PolicyError::UnknownRole {
                        status,
                        role: role_key.clone(),
                    })?;
                if cells.contains_key(&(status, role)) {
                    return Err(PolicyError::DuplicateRole { status, role });
                }
                let actions = parse_cell(status, role, entries)?;
                cells.insert((status, role), actions);
            }
        }

        if let Some(missing) = TaskStatus::iter().find(|s| !seen_statuses.contains(s)) {
            return Err(PolicyError::MissingStatus(missing));
        }

        let matrix = Self::from_cells(cells)?;
        log::debug!("Loaded policy with {} cells", matrix.cells().count());
        Ok(matrix)
    }

    /// Read, parse and validate a policy file
    pub fn from_policy_file(path: impl AsRef<Path>) -> Result<Self, PolicyError> {
        let path = path.as_ref();
        let content = std::fs::read_to_string(path).map_err(|source| PolicyError::Io {
            path: path.to_path_buf(),
            source,
        })?;
        let matrix = Self::from_toml_str(&content)?;
        log::info!("Loaded permission policy from {}", path.display());
        Ok(matrix)
    }

    /// Render the matrix in policy file format, statuses in code order
    pub fn to_toml_string(&self) -> String {
        let mut out = String::new();
        let mut current = None;

        for (status, role, actions) in self.cells() {
            if current != Some(status) {
                if current.is_some() {
                    out.push('\n');
                }
                let _ = writeln!(out, "# {}", status.label());
                let _ = writeln!(out, "[{}]", status.key());
                current = Some(status);
            }
            let entries: Vec<String> = actions
                .iter()
                .map(|action| format!("\"{}\"", action.key()))
                .collect();
            let _ = writeln!(out, "{} = [{}]", role.key(), entries.join(", "));
        }

        out
    }
}

fn parse_status(key: &str) -> Result<TaskStatus, PolicyError> {
    key.parse::<TaskStatus>().map_err(|err| match err {
        WorkflowError::InvalidStatus { code } if TaskStatus::is_reserved_code(code) => {
            PolicyError::ReservedStatus(code)
        }
        _ => PolicyError::UnknownStatus(key.to_string()),
    })
}

fn parse_cell(
    status: TaskStatus,
    role: Role,
    entries: &[String],
) -> Result<Vec<ActionKind>, PolicyError> {
    let mut actions = Vec::with_capacity(entries.len());

    for entry in entries {
        let action = ActionKind::from_key(entry).map_err(|_| PolicyError::UnknownAction {
            status,
            role,
            action: entry.clone(),
        })?;
        if action == ActionKind::Cancel {
            return Err(PolicyError::CancelInCell { status, role });
        }
        if actions.contains(&action) {
            return Err(PolicyError::DuplicateAction {
                status,
                role,
                action,
            });
        }
        actions.push(action);
    }

    if actions.contains(&ActionKind::Disable) && actions.len() > 1 {
        return Err(PolicyError::DisableNotAlone { status, role });
    }

    Ok(actions)
}
