//! Command line arguments

use clap::{Args, Parser, Subcommand};
use std::path::PathBuf;
use task_workflow::{ActionKind, Role, TaskStatus};

#[derive(Parser, Debug)]
#[command(
    name = "task-workflow",
    version,
    about = "Annotation task review workflow: statuses, permissions and task updates"
)]
pub struct Cli {
    /// Permission policy file (overrides config and TASK_WORKFLOW_POLICY)
    #[arg(long, global = true, value_name = "FILE")]
    pub policy: Option<PathBuf>,

    /// JSON task store (overrides config and TASK_WORKFLOW_STORE)
    #[arg(long, global = true, value_name = "FILE")]
    pub store: Option<PathBuf>,

    /// Print machine-readable JSON instead of text
    #[arg(long, global = true)]
    pub json: bool,

    #[command(subcommand)]
    pub command: Command,
}

#[derive(Subcommand, Debug)]
pub enum Command {
    /// List every task status with its code, label and color
    Statuses,

    /// List every action with its button text and target status
    Catalog,

    /// Actions a role is offered on a task in a status
    Actions {
        /// Status key (e.g. `qa_in_review`) or code
        status: String,
        /// Role key (e.g. `team_admin`) or ordinal
        role: String,
    },

    /// Print the active permission matrix
    Matrix {
        /// Render as a policy file
        #[arg(long)]
        toml: bool,
    },

    /// Check that a policy file is complete and well formed
    Validate {
        #[arg(value_name = "FILE")]
        file: PathBuf,
    },

    /// Statuses reachable from a status through permitted actions
    Reachable { status: TaskStatus },

    /// Inspect and update stored tasks
    #[command(subcommand)]
    Task(TaskCommand),

    /// Rebalance tasks into training, validation and testing partitions
    Split(SplitArgs),
}

#[derive(Subcommand, Debug)]
pub enum TaskCommand {
    /// Create a task that nobody has started
    Add {
        id: String,
        #[arg(long)]
        project: String,
        #[arg(long, default_value_t = 0)]
        frames: u32,
        /// Frames already annotated (capped at --frames)
        #[arg(long, default_value_t = 0)]
        annotated: u32,
    },

    /// Show a task, and the actions a role is offered on it
    Show {
        id: String,
        #[arg(long)]
        role: Option<Role>,
    },

    List,

    /// Activity log of a task
    History { id: String },

    /// Move a task to a status, if one of the role's actions leads there
    SetStatus {
        id: String,
        status: TaskStatus,
        #[command(flatten)]
        actor: ActorArgs,
    },

    /// Perform an action on a task
    Apply {
        id: String,
        action: ActionKind,
        #[command(flatten)]
        actor: ActorArgs,
    },
}

#[derive(Args, Debug)]
pub struct ActorArgs {
    #[arg(long)]
    pub role: Role,

    #[arg(long, default_value = "cli")]
    pub user: String,

    /// Refuse the update unless the task is still at this version
    #[arg(long, value_name = "VERSION")]
    pub expected_version: Option<u64>,
}

#[derive(Args, Debug)]
pub struct SplitArgs {
    /// JSON array of `{ "id", "object_count", "frame_count" }`
    #[arg(value_name = "CANDIDATES")]
    pub candidates: PathBuf,

    /// Training, validation and testing percentages (default 70 20 10)
    #[arg(
        long,
        num_args = 3,
        value_names = ["TRAINING", "VALIDATION", "TESTING"],
        conflicts_with = "slider"
    )]
    pub percentages: Option<Vec<u8>>,

    /// Range slider thumbs: training ends at MIN, validation at MAX
    #[arg(long, num_args = 2, value_names = ["MIN", "MAX"])]
    pub slider: Option<Vec<u8>>,
}

#[cfg(test)]
mod tests {
    use super::*;
    use clap::CommandFactory;

    #[test]
    fn test_cli_definition() {
        Cli::command().debug_assert();
    }

    #[test]
    fn test_parse_apply() {
        let cli = Cli::try_parse_from([
            "task-workflow",
            "--json",
            "task",
            "apply",
            "t1",
            "qaApprove",
            "--role",
            "qa",
            "--expected-version",
            "3",
        ])
        .unwrap();

        assert!(cli.json);
        match cli.command {
            Command::Task(TaskCommand::Apply { id, action, actor }) => {
                assert_eq!(id, "t1");
                assert_eq!(action, ActionKind::QaApprove);
                assert_eq!(actor.role, Role::Qa);
                assert_eq!(actor.user, "cli");
                assert_eq!(actor.expected_version, Some(3));
            }
            other => panic!("unexpected command: {:?}", other),
        }
    }

    #[test]
    fn test_parse_status_by_code_and_key() {
        let cli = Cli::try_parse_from(["task-workflow", "reachable", "10"]).unwrap();
        assert!(matches!(
            cli.command,
            Command::Reachable {
                status: TaskStatus::QaInReview
            }
        ));

        let cli = Cli::try_parse_from([
            "task-workflow",
            "task",
            "set-status",
            "t1",
            "qa-verified",
            "--role",
            "team-admin",
        ])
        .unwrap();
        assert!(matches!(
            cli.command,
            Command::Task(TaskCommand::SetStatus {
                status: TaskStatus::QaVerified,
                ..
            })
        ));
    }

    #[test]
    fn test_reserved_status_rejected_at_parse() {
        assert!(Cli::try_parse_from(["task-workflow", "reachable", "4"]).is_err());
    }

    #[test]
    fn test_split_inputs_conflict() {
        let err = Cli::try_parse_from([
            "task-workflow",
            "split",
            "tasks.json",
            "--percentages",
            "70",
            "20",
            "10",
            "--slider",
            "70",
            "90",
        ])
        .unwrap_err();
        assert_eq!(err.kind(), clap::error::ErrorKind::ArgumentConflict);
    }

    #[test]
    fn test_global_flags_after_subcommand() {
        let cli = Cli::try_parse_from(["task-workflow", "task", "list", "--store", "x.json"]).unwrap();
        assert_eq!(cli.store, Some(PathBuf::from("x.json")));
    }
}
