use anyhow::{Context, Result};
use clap::Parser;
use std::process::ExitCode;
use std::sync::Arc;
use task_store::{JsonFileTaskStore, StoreError, WorkflowGuard};
use task_workflow_config::AppConfig;

mod cli;
mod logger;
mod output;
mod split;
mod tasks;
mod workflow;

use cli::{Cli, Command};
use output::Output;

#[tokio::main]
async fn main() -> ExitCode {
    let args = Cli::parse();

    // .env must be in place before the config reads its overrides
    let dotenv = dotenvy::dotenv();
    let (mut config, source) = AppConfig::load();
    logger::init(&config.log_level);
    source.log();

    if let Ok(path) = dotenv {
        log::debug!("Loaded environment from {}", path.display());
    }
    if let Some(policy) = args.policy.clone() {
        config.policy_file = Some(policy);
    }
    if let Some(store) = args.store.clone() {
        config.store_file = Some(store);
    }
    log::debug!("Effective config: {:?}", config);

    match run(args, &config).await {
        Ok(text) => {
            if !text.is_empty() {
                println!("{}", text);
            }
            ExitCode::SUCCESS
        }
        Err(err) => {
            log::debug!("Command failed: {:?}", err);
            match err.downcast_ref::<StoreError>() {
                Some(store_err) => eprintln!("Error: {}", store_err.user_message()),
                None => eprintln!("Error: {:#}", err),
            }
            ExitCode::FAILURE
        }
    }
}

async fn run(args: Cli, config: &AppConfig) -> Result<String> {
    let out = Output::new(args.json);

    match args.command {
        Command::Statuses => workflow::statuses(out),
        Command::Catalog => workflow::catalog(out),
        Command::Actions { status, role } => {
            workflow::actions(&config.load_policy()?, &status, &role, out)
        }
        Command::Matrix { toml } => workflow::matrix(&config.load_policy()?, toml, out),
        Command::Validate { file } => workflow::validate(&file, out),
        Command::Reachable { status } => workflow::reachable(&config.load_policy()?, status, out),
        Command::Task(command) => {
            let matrix = Arc::new(config.load_policy()?);
            let path = config.store_path()?;
            let store = JsonFileTaskStore::open(&path)
                .await
                .with_context(|| format!("Failed to open task store {}", path.display()))?;
            let guard = WorkflowGuard::new(store, matrix);
            tasks::run(&guard, command, out).await
        }
        Command::Split(split_args) => split::run(&split_args, out),
    }
}
