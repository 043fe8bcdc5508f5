//! Read-only views of the status registry, action catalog and permission matrix

use crate::output::{table, Output};
use anyhow::{Context, Result};
use serde::Serialize;
use std::path::Path;
use strum::IntoEnumIterator;
use task_workflow::{ActionKind, ActionSet, PermissionMatrix, Role, TaskStatus};

pub fn statuses(out: Output) -> Result<String> {
    let infos: Vec<_> = TaskStatus::iter().map(TaskStatus::info).collect();
    out.render(&infos, || {
        let rows: Vec<Vec<String>> = infos
            .iter()
            .map(|info| {
                vec![
                    info.code.to_string(),
                    info.key.to_string(),
                    info.label.to_string(),
                    info.color_hex.to_string(),
                ]
            })
            .collect();
        table(&rows)
    })
}

pub fn catalog(out: Output) -> Result<String> {
    let infos: Vec<_> = ActionKind::iter().map(ActionKind::info).collect();
    out.render(&infos, || {
        let rows: Vec<Vec<String>> = ActionKind::iter()
            .map(|action| {
                let target = match action.target_status() {
                    Some(status) => format!("-> {}", status.label()),
                    None if action == ActionKind::Disable => "(disabled control)".to_string(),
                    None => "(no change)".to_string(),
                };
                vec![
                    action.key().to_string(),
                    action.text().to_string(),
                    target,
                    action.color_hex().to_string(),
                    action.hover_color_hex().unwrap_or("-").to_string(),
                ]
            })
            .collect();
        table(&rows)
    })
}

#[derive(Serialize)]
struct CellView {
    status: TaskStatus,
    role: Role,
    actions: Vec<ActionKind>,
    primary: Option<ActionKind>,
    disabled: bool,
}

impl CellView {
    fn new(status: TaskStatus, role: Role, set: ActionSet<'_>) -> Self {
        Self {
            status,
            role,
            actions: set.as_slice().to_vec(),
            primary: set.primary(),
            disabled: set.is_disabled(),
        }
    }
}

/// `status` and `role` accept keys or raw codes; raw codes are checked
/// the way a client-submitted lookup is
pub fn actions(matrix: &PermissionMatrix, status: &str, role: &str, out: Output) -> Result<String> {
    let (status, role, set) = match (status.trim().parse::<i64>(), role.trim().parse::<i64>()) {
        (Ok(code), Ok(ordinal)) => {
            let set = matrix.permitted_actions_for_codes(code, ordinal)?;
            (TaskStatus::from_code(code)?, Role::from_ordinal(ordinal)?, set)
        }
        _ => {
            let status: TaskStatus = status.parse()?;
            let role: Role = role.parse()?;
            (status, role, matrix.permitted_actions(status, role))
        }
    };

    let cell = CellView::new(status, role, set);
    out.render(&cell, || {
        if cell.actions.is_empty() {
            return format!("{} / {}: no actions", status.label(), role.label());
        }
        if cell.disabled {
            return format!("{} / {}: status control disabled", status.label(), role.label());
        }
        let mut lines = vec![format!("{} / {}:", status.label(), role.label())];
        for action in set.iter() {
            let marker = if Some(action) == cell.primary { "*" } else { " " };
            let target = action
                .target_status()
                .map(|s| format!("-> {}", s.label()))
                .unwrap_or_default();
            lines.push(format!("{} {:<14} {:<16} {}", marker, action.key(), action.text(), target));
        }
        lines.join("\n")
    })
}

pub fn matrix(matrix: &PermissionMatrix, as_toml: bool, out: Output) -> Result<String> {
    if as_toml {
        return Ok(matrix.to_toml_string());
    }

    let cells: Vec<CellView> = matrix
        .cells()
        .map(|(status, role, set)| CellView::new(status, role, set))
        .collect();
    out.render(&cells, || {
        let mut rows = vec![{
            let mut header = vec!["status".to_string()];
            header.extend(Role::iter().map(|r| r.label().to_string()));
            header
        }];
        for status in TaskStatus::iter() {
            let mut row = vec![status.label().to_string()];
            row.extend(Role::iter().map(|role| {
                let keys: Vec<&str> = matrix
                    .permitted_actions(status, role)
                    .iter()
                    .map(ActionKind::key)
                    .collect();
                keys.join(",")
            }));
            rows.push(row);
        }
        table(&rows)
    })
}

#[derive(Serialize)]
struct ValidationReport {
    file: String,
    cells: usize,
    transitions: usize,
    unreachable: Vec<TaskStatus>,
}

/// Load `file` as a policy; any structural problem is an error
pub fn validate(file: &Path, out: Output) -> Result<String> {
    let matrix = PermissionMatrix::from_policy_file(file)
        .with_context(|| format!("Invalid policy file {}", file.display()))?;

    let report = ValidationReport {
        file: file.display().to_string(),
        cells: matrix.cells().count(),
        transitions: matrix.transitions().count(),
        unreachable: matrix.unreachable_statuses().into_iter().collect(),
    };
    out.render(&report, || {
        let mut text = format!(
            "{}: ok ({} cells, {} transitions)",
            report.file, report.cells, report.transitions
        );
        if !report.unreachable.is_empty() {
            let labels: Vec<&str> = report.unreachable.iter().map(|s| s.label()).collect();
            text.push_str(&format!("\nno action leads to: {}", labels.join(", ")));
        }
        text
    })
}

#[derive(Serialize)]
struct Reachability {
    from: TaskStatus,
    on_cycle: bool,
    reachable: Vec<TaskStatus>,
}

pub fn reachable(matrix: &PermissionMatrix, status: TaskStatus, out: Output) -> Result<String> {
    let report = Reachability {
        from: status,
        on_cycle: matrix.lies_on_cycle(status),
        reachable: matrix.reachable_from(status).into_iter().collect(),
    };
    out.render(&report, || {
        let labels: Vec<&str> = report.reachable.iter().map(|s| s.label()).collect();
        let mut text = format!("From {}: {}", status.label(), labels.join(", "));
        if report.on_cycle {
            text.push_str(&format!("\n{} can be re-entered", status.label()));
        }
        text
    })
}
