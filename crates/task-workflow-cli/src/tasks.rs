//! `task` subcommands against the JSON task store

use crate::cli::{ActorArgs, TaskCommand};
use crate::output::{table, Output};
use anyhow::Result;
use serde::Serialize;
use task_store::{
    Actor, JsonFileTaskStore, StatusUpdate, TaskId, TaskRecord, TaskStore, WorkflowGuard,
};
use task_workflow::ActionKind;

type Guard = WorkflowGuard<JsonFileTaskStore>;

pub async fn run(guard: &Guard, command: TaskCommand, out: Output) -> Result<String> {
    match command {
        TaskCommand::Add {
            id,
            project,
            frames,
            annotated,
        } => {
            let task = TaskRecord::new(id, project, frames).with_annotated_frames(annotated);
            guard.insert_task(task.clone()).await?;
            out.render(&task, || format!("Added {}", summary(&task)))
        }
        TaskCommand::Show { id, role } => {
            let id = TaskId::new(id);
            match role {
                Some(role) => {
                    let actor = Actor::new("cli", role);
                    let (task, actions) = guard.available_actions(&id, &actor).await?;
                    show_with_actions(&task, &actions, out)
                }
                None => {
                    let task = guard.fetch_task(&id).await?;
                    out.render(&task, || detail(&task))
                }
            }
        }
        TaskCommand::List => {
            let tasks = guard.list_tasks().await?;
            out.render(&tasks, || {
                if tasks.is_empty() {
                    return "No tasks".to_string();
                }
                let rows: Vec<Vec<String>> = tasks
                    .iter()
                    .map(|t| {
                        vec![
                            t.id.to_string(),
                            t.project_id.clone(),
                            t.status.label().to_string(),
                            format!("v{}", t.version),
                        ]
                    })
                    .collect();
                table(&rows)
            })
        }
        TaskCommand::History { id } => {
            let entries = guard.history(&TaskId::new(id)).await?;
            out.render(&entries, || {
                let rows: Vec<Vec<String>> = entries
                    .iter()
                    .map(|e| {
                        vec![
                            e.recorded_at.to_rfc3339(),
                            e.user_id.clone(),
                            e.description.clone(),
                            e.status.label().to_string(),
                        ]
                    })
                    .collect();
                table(&rows)
            })
        }
        TaskCommand::SetStatus { id, status, actor } => {
            let ActorArgs {
                role,
                user,
                expected_version,
            } = actor;
            let mut update = StatusUpdate::new(id, Actor::new(user, role), status);
            if let Some(version) = expected_version {
                update = update.with_expected_version(version);
            }
            let task = guard.update_status(update).await?;
            out.render(&task, || format!("Updated {}", summary(&task)))
        }
        TaskCommand::Apply { id, action, actor } => {
            let ActorArgs {
                role,
                user,
                expected_version,
            } = actor;
            let task = guard
                .apply_action(
                    &TaskId::new(id),
                    Actor::new(user, role),
                    action,
                    expected_version,
                )
                .await?;
            out.render(&task, || {
                format!("{}: {}", action.text(), summary(&task))
            })
        }
    }
}

fn summary(task: &TaskRecord) -> String {
    format!(
        "{} [{}] {} (v{})",
        task.id,
        task.project_id,
        task.status.label(),
        task.version
    )
}

fn detail(task: &TaskRecord) -> String {
    let mut lines = vec![
        format!("Task:      {}", task.id),
        format!("Project:   {}", task.project_id),
        format!("Status:    {} ({})", task.status.label(), task.status.code()),
        format!("Progress:  {:.0}% ({}/{} frames)", task.progress, task.completed_frames, task.frame_count),
        format!("Version:   {}", task.version),
    ];
    if let Some(audit) = task.audit_status {
        lines.push(format!("Audit:     {}", audit.label()));
    }
    if let Some(completed_at) = task.completed_at {
        lines.push(format!("Completed: {}", completed_at.to_rfc3339()));
    }
    lines.join("\n")
}

#[derive(Serialize)]
struct TaskWithActions<'a> {
    task: &'a TaskRecord,
    actions: &'a [ActionKind],
}

fn show_with_actions(task: &TaskRecord, actions: &[ActionKind], out: Output) -> Result<String> {
    let view = TaskWithActions { task, actions };
    out.render(&view, || {
        let offered: Vec<&str> = actions
            .iter()
            .filter(|a| !a.is_sentinel())
            .map(|a| a.text())
            .collect();
        let offered = if offered.is_empty() {
            "none".to_string()
        } else {
            offered.join(", ")
        };
        format!("{}\nActions:   {}", detail(task), offered)
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use task_store::StoreError;
    use task_workflow::{Role, TaskStatus, WorkflowError};

    async fn guard_in(dir: &tempfile::TempDir) -> Guard {
        let store = JsonFileTaskStore::open(dir.path().join("tasks.json"))
            .await
            .unwrap();
        WorkflowGuard::with_builtin_policy(store)
    }

    fn actor(role: Role) -> ActorArgs {
        ActorArgs {
            role,
            user: "tester".to_string(),
            expected_version: None,
        }
    }

    #[tokio::test]
    async fn test_review_round_trip() {
        let dir = tempfile::tempdir().unwrap();
        let guard = guard_in(&dir).await;
        let out = Output::default();

        run(
            &guard,
            TaskCommand::Add {
                id: "t1".to_string(),
                project: "p1".to_string(),
                frames: 4,
                annotated: 0,
            },
            out,
        )
        .await
        .unwrap();

        let text = run(
            &guard,
            TaskCommand::Apply {
                id: "t1".to_string(),
                action: ActionKind::Complete,
                actor: actor(Role::Annotator),
            },
            out,
        )
        .await
        .unwrap();
        assert_eq!(text, "Complete: t1 [p1] Completed (v1)");

        let text = run(
            &guard,
            TaskCommand::SetStatus {
                id: "t1".to_string(),
                status: TaskStatus::Rejected,
                actor: actor(Role::Auditor),
            },
            out,
        )
        .await
        .unwrap();
        assert_eq!(text, "Updated t1 [p1] Rejected (v2)");

        let history = guard.history(&TaskId::new("t1")).await.unwrap();
        let descriptions: Vec<&str> = history.iter().map(|h| h.description.as_str()).collect();
        assert_eq!(descriptions, vec!["set status to 2", "set status to 7"]);
    }

    #[tokio::test]
    async fn test_reopened_task_shows_annotated_progress() {
        let dir = tempfile::tempdir().unwrap();
        let guard = guard_in(&dir).await;
        let out = Output::default();

        run(
            &guard,
            TaskCommand::Add {
                id: "t1".to_string(),
                project: "p1".to_string(),
                frames: 4,
                annotated: 2,
            },
            out,
        )
        .await
        .unwrap();

        for action in [ActionKind::Complete, ActionKind::InProgress] {
            run(
                &guard,
                TaskCommand::Apply {
                    id: "t1".to_string(),
                    action,
                    actor: actor(Role::Annotator),
                },
                out,
            )
            .await
            .unwrap();
        }

        let task = guard.fetch_task(&TaskId::new("t1")).await.unwrap();
        assert_eq!(task.status, TaskStatus::InProgress);
        assert_eq!(task.completed_frames, 2);
        assert_eq!(task.progress, 50.0);

        let text = run(
            &guard,
            TaskCommand::Show {
                id: "t1".to_string(),
                role: None,
            },
            out,
        )
        .await
        .unwrap();
        assert!(text.contains("Progress:  50% (2/4 frames)"));
    }

    #[tokio::test]
    async fn test_refused_action_surfaces_store_error() {
        let dir = tempfile::tempdir().unwrap();
        let guard = guard_in(&dir).await;
        guard
            .insert_task(TaskRecord::new("t1", "p1", 4))
            .await
            .unwrap();

        let err = run(
            &guard,
            TaskCommand::Apply {
                id: "t1".to_string(),
                action: ActionKind::Accept,
                actor: actor(Role::Annotator),
            },
            Output::default(),
        )
        .await
        .unwrap_err();

        let store_err = err.downcast_ref::<StoreError>().unwrap();
        assert!(matches!(
            store_err,
            StoreError::Workflow(WorkflowError::ActionNotPermitted { .. })
        ));
    }

    #[tokio::test]
    async fn test_show_offers_role_actions() {
        let dir = tempfile::tempdir().unwrap();
        let guard = guard_in(&dir).await;
        guard
            .insert_task(TaskRecord::new("t1", "p1", 4))
            .await
            .unwrap();

        let text = run(
            &guard,
            TaskCommand::Show {
                id: "t1".to_string(),
                role: Some(Role::Qa),
            },
            Output::default(),
        )
        .await
        .unwrap();
        assert!(text.ends_with("Actions:   none"));
    }

    #[tokio::test]
    async fn test_list_empty() {
        let dir = tempfile::tempdir().unwrap();
        let guard = guard_in(&dir).await;
        let text = run(&guard, TaskCommand::List, Output::default())
            .await
            .unwrap();
        assert_eq!(text, "No tasks");
    }
}
