//! Dependency reconciliation: install the manifest into the activated venv.
//!
//! pip runs with inherited stdio, so its own output is the diagnostic the
//! operator sees. A digest stamp in the venv makes reruns with an unchanged
//! manifest skip pip entirely.

use std::path::Path;

use serde::Serialize;
use stlaunch_core::config::InstallConfig;

use crate::env::{ActivatedEnv, EnvLayout};
use crate::error::{describe_exit, BootstrapError};
use crate::info_log;
use crate::manifest::Manifest;
use crate::process::{CommandSpec, ProcessRunner};

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum InstallOutcome {
    /// pip ran and succeeded
    Installed,
    /// Stamp matched the manifest; pip was not invoked
    UpToDate,
    /// Manifest has no entries; pip was not invoked
    Empty,
}

/// `python -m pip install --upgrade pip`
pub fn upgrade_pip_command(env: &ActivatedEnv) -> CommandSpec {
    env.module("pip").args(["install", "--upgrade", "pip"])
}

/// `python -m pip install -r <manifest>`
pub fn install_command(env: &ActivatedEnv, manifest: &Path) -> CommandSpec {
    env.module("pip").args(["install", "-r"]).arg(manifest)
}

/// Whether the venv's stamp matches `manifest`.
pub fn is_satisfied(layout: &EnvLayout, manifest: &Manifest) -> bool {
    layout.read_stamp().as_deref() == Some(manifest.digest())
}

fn run_step<R: ProcessRunner + ?Sized>(
    runner: &R,
    step: &str,
    cmd: &CommandSpec,
) -> Result<(), BootstrapError> {
    let code = runner
        .status(cmd)
        .map_err(|e| BootstrapError::DependencyInstall {
            step: step.to_string(),
            detail: format!("could not run `{}`: {}", cmd.display(), e),
        })?;
    if code != Some(0) {
        return Err(BootstrapError::DependencyInstall {
            step: step.to_string(),
            detail: format!("`{}` {}", cmd.display(), describe_exit(code)),
        });
    }
    Ok(())
}

/// Install `manifest` into `env`, once, for the whole list.
pub fn reconcile<R: ProcessRunner + ?Sized>(
    runner: &R,
    env: &ActivatedEnv,
    manifest: &Manifest,
    cfg: &InstallConfig,
    workdir: &Path,
) -> Result<InstallOutcome, BootstrapError> {
    let layout = EnvLayout::new(&env.root);

    if manifest.is_empty() {
        tracing::debug!(manifest = %manifest.path().display(), "manifest has no entries");
        return Ok(InstallOutcome::Empty);
    }
    if !cfg.force && is_satisfied(&layout, manifest) {
        tracing::debug!(digest = %manifest.digest(), "manifest unchanged since last install");
        return Ok(InstallOutcome::UpToDate);
    }

    if cfg.upgrade_installer {
        info_log!("Upgrading pip");
        run_step(runner, "pip upgrade", &upgrade_pip_command(env).current_dir(workdir))?;
    }

    let names: Vec<&str> = manifest.requirements().map(|r| r.name.as_str()).collect();
    info_log!(
        "Installing {} package(s) from {}: {}",
        names.len(),
        manifest.path().display(),
        names.join(", ")
    );
    run_step(
        runner,
        "dependency install",
        &install_command(env, manifest.path()).current_dir(workdir),
    )?;

    if let Err(e) = std::fs::write(layout.stamp_path(), format!("{}\n", manifest.digest())) {
        tracing::warn!(error = %e, stamp = %layout.stamp_path().display(), "could not record install stamp; next run will reinstall");
    }
    Ok(InstallOutcome::Installed)
}
