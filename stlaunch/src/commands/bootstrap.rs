//! `stlaunch local | cloud | prepare`: run the bootstrap sequence.

use anyhow::{Context, Result};
use std::path::PathBuf;

use stlaunch_core::config::{self, CloudConfig, InstallConfig, InterpreterConfig, PathsConfig};
use stlaunch_env::interpreter::candidates_with_override;
use stlaunch_env::process::SystemRunner;
use stlaunch_env::{BootstrapSettings, Bootstrapper, LaunchConfig};

use crate::cli::BootstrapArgs;

/// Apply `<workdir>/.env` (or `./.env`) without overriding set variables.
pub fn load_workdir_env(args: &BootstrapArgs) {
    match args.workdir {
        Some(ref dir) => {
            let applied = config::load_dotenv_from_dir(dir);
            if applied > 0 {
                tracing::debug!(applied, dir = %dir.display(), "loaded variables from .env");
            }
        }
        None => config::load_dotenv(),
    }
}

/// Resolve settings. Priority: CLI > STLAUNCH_* env (incl. `.env`) > defaults.
pub fn build_settings(args: &BootstrapArgs, launch: LaunchConfig) -> Result<BootstrapSettings> {
    load_workdir_env(args);
    let workdir = match args.workdir {
        Some(ref dir) => dir.clone(),
        None => std::env::current_dir().context("determine working directory")?,
    };
    if !workdir.is_dir() {
        anyhow::bail!("working directory {} does not exist", workdir.display());
    }

    Ok(apply_overrides(
        args,
        workdir,
        PathsConfig::from_env(),
        InstallConfig::from_env(),
        InterpreterConfig::from_env(),
        launch,
    ))
}

fn apply_overrides(
    args: &BootstrapArgs,
    workdir: PathBuf,
    mut paths: PathsConfig,
    mut install: InstallConfig,
    interpreter: InterpreterConfig,
    launch: LaunchConfig,
) -> BootstrapSettings {
    if let Some(ref p) = args.env_dir {
        paths.env_dir = p.clone();
    }
    if let Some(ref p) = args.manifest {
        paths.manifest = p.clone();
    }
    if let Some(ref p) = args.app {
        paths.app = p.clone();
    }
    if let Some(ref p) = args.data_dir {
        paths.data_dir = p.clone();
    }
    if args.no_upgrade_pip {
        install.upgrade_installer = false;
    }
    if args.reinstall {
        install.force = true;
    }
    let explicit = args.python.as_deref().or(interpreter.explicit.as_deref());

    let mut settings = BootstrapSettings::new(workdir, launch);
    settings.paths = paths;
    settings.install = install;
    settings.candidates = candidates_with_override(explicit);
    settings
}

/// Cloud launch flags; fails before any bootstrap work when the port is missing.
pub fn cloud_launch_config(args: &BootstrapArgs, port_env: Option<&str>) -> Result<LaunchConfig> {
    load_workdir_env(args);
    let var = port_env
        .map(str::to_string)
        .unwrap_or_else(|| CloudConfig::from_env().port_var);
    let get = |k: &str| std::env::var(k).ok();
    Ok(LaunchConfig::cloud_from_lookup(&get, &var)?)
}

fn run(settings: BootstrapSettings) -> Result<i32> {
    let runner = SystemRunner;
    let code = Bootstrapper::new(&runner, settings).run()?;
    if code != 0 {
        tracing::warn!(exit_code = code, "application exited with a non-zero status");
    }
    Ok(code)
}

pub fn cmd_local(args: &BootstrapArgs) -> Result<i32> {
    run(build_settings(args, LaunchConfig::local())?)
}

pub fn cmd_cloud(args: &BootstrapArgs, port_env: Option<&str>) -> Result<i32> {
    let launch = cloud_launch_config(args, port_env)?;
    run(build_settings(args, launch)?)
}

pub fn cmd_prepare(args: &BootstrapArgs) -> Result<i32> {
    let runner = SystemRunner;
    let settings = build_settings(args, LaunchConfig::local())?;
    let prepared = Bootstrapper::new(&runner, settings).prepare()?;
    eprintln!(
        "✓ Environment ready: {} ({})",
        prepared.env.root.display(),
        if prepared.env_created { "created" } else { "reused" }
    );
    Ok(0)
}
