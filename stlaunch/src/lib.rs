//! stlaunch CLI library — shared by the `stlaunch` and `stlaunch-cloud` binaries.

mod cli;
mod commands;

use anyhow::Result;
use clap::Parser;
use cli::{Cli, Commands, EnvAction};

/// Parse args and dispatch. Returns the process exit code.
pub fn run_cli() -> Result<i32> {
    let cli = Cli::parse();
    // `<workdir>/.env` may carry STLAUNCH_LOG_* and PORT; load it before
    // the tracing config is cached.
    if let Some(ref command) = cli.command {
        commands::bootstrap::load_workdir_env(command.bootstrap_args());
    }
    stlaunch_core::observability::init_tracing();

    match cli.command {
        None => commands::bootstrap::cmd_local(&Default::default()),
        Some(Commands::Local(args)) => commands::bootstrap::cmd_local(&args),
        Some(Commands::Cloud { args, port_env }) => {
            commands::bootstrap::cmd_cloud(&args, port_env.as_deref())
        }
        Some(Commands::Prepare(args)) => commands::bootstrap::cmd_prepare(&args),
        Some(Commands::Status { args, cloud, json }) => {
            commands::status::cmd_status(&args, cloud, json)
        }
        Some(Commands::Env {
            action: EnvAction::Clean {
                args,
                dry_run,
                force,
            },
        }) => commands::env::cmd_clean(&args, dry_run, force),
    }
}

/// Flagless cloud entry point: bootstrap with defaults, bind to $PORT.
pub fn run_cloud() -> Result<i32> {
    stlaunch_core::observability::init_tracing();
    commands::bootstrap::cmd_cloud(&Default::default(), None)
}
