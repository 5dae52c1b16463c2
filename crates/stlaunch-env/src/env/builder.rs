//! Build the isolated Python venv and resolve the paths inside it.

use std::ffi::OsString;
use std::path::{Path, PathBuf};

use serde::Serialize;

use crate::error::{describe_exit, BootstrapError};
use crate::info_log;
use crate::interpreter::Interpreter;
use crate::process::{CommandSpec, ProcessRunner};

/// File inside the venv recording the digest of the last installed manifest.
pub const INSTALL_STAMP: &str = ".stlaunch-manifest.sha256";

/// On-disk layout of a venv rooted at `root`.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct EnvLayout {
    root: PathBuf,
}

impl EnvLayout {
    pub fn new(root: impl Into<PathBuf>) -> Self {
        Self { root: root.into() }
    }

    pub fn root(&self) -> &Path {
        &self.root
    }

    /// Interpreter inside the venv, if present (`bin/python` or `Scripts/python.exe`).
    pub fn interpreter(&self) -> Option<PathBuf> {
        [
            self.root.join("bin").join("python"),
            self.root.join("bin").join("python3"),
            self.root.join("Scripts").join("python.exe"),
        ]
        .into_iter()
        .find(|p| p.exists())
    }

    pub fn is_provisioned(&self) -> bool {
        self.interpreter().is_some()
    }

    pub fn stamp_path(&self) -> PathBuf {
        self.root.join(INSTALL_STAMP)
    }

    /// Digest recorded by the last successful install.
    pub fn read_stamp(&self) -> Option<String> {
        std::fs::read_to_string(self.stamp_path())
            .ok()
            .map(|s| s.trim().to_string())
            .filter(|s| !s.is_empty())
    }
}

/// Ensure a venv exists at `layout`; create it with `interpreter` when absent.
///
/// Reuse is keyed on the venv's interpreter, not on the directory: a directory
/// without one has `python -m venv` run over it. Returns `true` when the venv
/// was created during this call. A failed `python -m venv` leaves the
/// directory as-is for inspection.
pub fn ensure_environment<R: ProcessRunner + ?Sized>(
    runner: &R,
    interpreter: &Interpreter,
    layout: &EnvLayout,
    workdir: &Path,
) -> Result<bool, BootstrapError> {
    let root = layout.root();
    if root.exists() && !root.is_dir() {
        return Err(BootstrapError::EnvironmentConstruction {
            path: root.to_path_buf(),
            detail: "path exists and is not a directory".to_string(),
        });
    }
    if layout.is_provisioned() {
        tracing::debug!(env = %root.display(), "reusing existing virtual environment");
        return Ok(false);
    }

    if root.is_dir() {
        tracing::debug!(env = %root.display(), "directory has no interpreter; rebuilding venv in place");
    }
    info_log!("Creating virtual environment at {}", root.display());
    let cmd = CommandSpec::new(&interpreter.path)
        .arg("-m")
        .arg("venv")
        .arg(root)
        .current_dir(workdir);
    let out = runner
        .output(&cmd)
        .map_err(|e| BootstrapError::EnvironmentConstruction {
            path: root.to_path_buf(),
            detail: format!("could not run `{}`: {}", cmd.display(), e),
        })?;
    if !out.success() {
        let diag = out.diagnostic();
        return Err(BootstrapError::EnvironmentConstruction {
            path: root.to_path_buf(),
            detail: if diag.is_empty() {
                format!("`{}` {}", cmd.display(), describe_exit(out.code))
            } else {
                diag
            },
        });
    }
    if !layout.is_provisioned() {
        return Err(BootstrapError::EnvironmentConstruction {
            path: root.to_path_buf(),
            detail: "venv completed but no interpreter was created".to_string(),
        });
    }
    Ok(true)
}

/// A venv made current for child processes: its interpreter runs pip and
/// streamlit, with `VIRTUAL_ENV` set and its bin dir first on `PATH`.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct ActivatedEnv {
    pub root: PathBuf,
    pub bin_dir: PathBuf,
    pub python: PathBuf,
    #[serde(skip)]
    search_path: OsString,
}

impl ActivatedEnv {
    /// `python -m <module>` inside the venv.
    pub fn module(&self, module: &str) -> CommandSpec {
        CommandSpec::new(&self.python)
            .arg("-m")
            .arg(module)
            .env("VIRTUAL_ENV", &self.root)
            .env("PATH", &self.search_path)
            .env_remove("PYTHONHOME")
    }

    /// `PATH` value handed to child processes.
    pub fn search_path(&self) -> &OsString {
        &self.search_path
    }
}

/// Activate an existing venv. `base_path` is the caller's `PATH`, which is
/// kept after the venv's bin dir.
pub fn activate(layout: &EnvLayout, base_path: Option<&OsString>) -> Result<ActivatedEnv, BootstrapError> {
    let python = layout
        .interpreter()
        .ok_or_else(|| BootstrapError::EnvironmentConstruction {
            path: layout.root().to_path_buf(),
            detail: "no interpreter inside the virtual environment".to_string(),
        })?;
    let bin_dir = python
        .parent()
        .map(Path::to_path_buf)
        .unwrap_or_else(|| layout.root().to_path_buf());

    let mut entries = vec![bin_dir.clone()];
    if let Some(base) = base_path {
        entries.extend(std::env::split_paths(base).filter(|p| p != &bin_dir));
    }
    let search_path = std::env::join_paths(entries)
        .map_err(|e| BootstrapError::EnvironmentConstruction {
            path: layout.root().to_path_buf(),
            detail: format!("cannot build PATH: {}", e),
        })?;

    Ok(ActivatedEnv {
        root: layout.root().to_path_buf(),
        bin_dir,
        python,
        search_path,
    })
}
