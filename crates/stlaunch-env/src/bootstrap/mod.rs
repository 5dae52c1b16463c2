//! The bootstrap sequence.
//!
//! `START → INTERPRETER_RESOLVED → ENV_READY → ENV_ACTIVE → DEPS_SATISFIED →
//! DATA_DIR_READY → LAUNCHED`. Any failure ends the run; nothing is retried.

use std::ffi::OsString;
use std::fmt;
use std::path::{Path, PathBuf};

use serde::Serialize;
use stlaunch_core::config::{InstallConfig, PathsConfig};

use crate::data_dir::ensure_data_dir;
use crate::deps::{self, InstallOutcome};
use crate::env::{activate, ensure_environment, ActivatedEnv, EnvLayout};
use crate::error::BootstrapError;
use crate::info_log;
use crate::interpreter::{self, Interpreter};
use crate::launch::{self, LaunchConfig};
use crate::manifest::Manifest;
use crate::process::ProcessRunner;


#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum Stage {
    Start,
    InterpreterResolved,
    EnvReady,
    EnvActive,
    DepsSatisfied,
    DataDirReady,
    Launched,
    Failed,
}

impl fmt::Display for Stage {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let s = match self {
            Stage::Start => "START",
            Stage::InterpreterResolved => "INTERPRETER_RESOLVED",
            Stage::EnvReady => "ENV_READY",
            Stage::EnvActive => "ENV_ACTIVE",
            Stage::DepsSatisfied => "DEPS_SATISFIED",
            Stage::DataDirReady => "DATA_DIR_READY",
            Stage::Launched => "LAUNCHED",
            Stage::Failed => "FAILED",
        };
        f.write_str(s)
    }
}

/// Everything one run needs, resolved up front.
#[derive(Debug, Clone)]
pub struct BootstrapSettings {
    /// Directory the relative paths in `paths` resolve against
    pub workdir: PathBuf,
    pub paths: PathsConfig,
    pub install: InstallConfig,
    /// Interpreter names probed in order
    pub candidates: Vec<String>,
    pub launch: LaunchConfig,
}

impl BootstrapSettings {
    pub fn new(workdir: impl Into<PathBuf>, launch: LaunchConfig) -> Self {
        Self {
            workdir: workdir.into(),
            paths: PathsConfig::default(),
            install: InstallConfig::default(),
            candidates: interpreter::default_candidates(),
            launch,
        }
    }

    fn resolve(&self, p: &Path) -> PathBuf {
        if p.is_absolute() {
            p.to_path_buf()
        } else {
            self.workdir.join(p)
        }
    }

    pub fn env_dir(&self) -> PathBuf {
        self.resolve(&self.paths.env_dir)
    }

    pub fn manifest_path(&self) -> PathBuf {
        self.resolve(&self.paths.manifest)
    }

    pub fn data_dir(&self) -> PathBuf {
        self.resolve(&self.paths.data_dir)
    }
}

/// State after steps 1–5: ready to launch.
#[derive(Debug, Clone, Serialize)]
pub struct Prepared {
    pub interpreter: Interpreter,
    pub env: ActivatedEnv,
    pub env_created: bool,
    pub install: InstallOutcome,
    pub data_dir_created: bool,
}

/// Read-only view of the bootstrap artifacts.
#[derive(Debug, Clone, Serialize)]
pub struct StatusReport {
    pub interpreter: Option<Interpreter>,
    /// Probe failures when no interpreter resolved
    pub interpreter_error: Option<String>,
    pub env_dir: PathBuf,
    pub env_ready: bool,
    pub manifest: PathBuf,
    pub manifest_found: bool,
    pub packages: Vec<String>,
    pub deps_satisfied: bool,
    pub data_dir: PathBuf,
    pub data_dir_ready: bool,
    pub launch_args: Vec<String>,
}

struct StageTracker {
    current: Stage,
}

impl StageTracker {
    fn advance(&mut self, next: Stage) {
        tracing::debug!(from = %self.current, to = %next, "bootstrap stage");
        self.current = next;
    }

    fn fail(&mut self, err: BootstrapError) -> BootstrapError {
        tracing::error!(stage = %self.current, error = %err, "bootstrap failed");
        self.current = Stage::Failed;
        err
    }
}

pub struct Bootstrapper<'r, R: ProcessRunner + ?Sized> {
    runner: &'r R,
    settings: BootstrapSettings,
    base_path: Option<OsString>,
}

impl<'r, R: ProcessRunner + ?Sized> Bootstrapper<'r, R> {
    /// `PATH` for child processes is taken from the current process.
    pub fn new(runner: &'r R, settings: BootstrapSettings) -> Self {
        Self::with_base_path(runner, settings, std::env::var_os("PATH"))
    }

    pub fn with_base_path(runner: &'r R, settings: BootstrapSettings, base_path: Option<OsString>) -> Self {
        Self {
            runner,
            settings,
            base_path,
        }
    }

    pub fn settings(&self) -> &BootstrapSettings {
        &self.settings
    }

    /// Steps 1–5. On success the venv exists with the manifest installed
    /// and the data directory exists.
    pub fn prepare(&self) -> Result<Prepared, BootstrapError> {
        let mut stage = StageTracker {
            current: Stage::Start,
        };
        self.prepare_tracked(&mut stage).map_err(|e| stage.fail(e))
    }

    fn prepare_tracked(&self, stage: &mut StageTracker) -> Result<Prepared, BootstrapError> {
        let s = &self.settings;

        let interpreter = interpreter::discover(self.runner, &s.candidates)?;
        info_log!("Using {} ({})", interpreter.name, interpreter.version);
        stage.advance(Stage::InterpreterResolved);

        let layout = EnvLayout::new(s.env_dir());
        let env_created = ensure_environment(self.runner, &interpreter, &layout, &s.workdir)?;
        stage.advance(Stage::EnvReady);

        let env = activate(&layout, self.base_path.as_ref())?;
        tracing::debug!(python = %env.python.display(), "environment activated");
        stage.advance(Stage::EnvActive);

        let manifest = Manifest::load(&s.manifest_path())?;
        let install = deps::reconcile(self.runner, &env, &manifest, &s.install, &s.workdir)?;
        match install {
            InstallOutcome::UpToDate => info_log!("Dependencies already satisfied"),
            InstallOutcome::Empty => info_log!("No dependencies listed in {}", manifest.path().display()),
            InstallOutcome::Installed => {}
        }
        stage.advance(Stage::DepsSatisfied);

        let data_dir_created = ensure_data_dir(&s.data_dir())?;
        stage.advance(Stage::DataDirReady);

        Ok(Prepared {
            interpreter,
            env,
            env_created,
            install,
            data_dir_created,
        })
    }

    /// Prepare, then launch the app in the foreground; returns its exit code.
    pub fn run(&self) -> Result<i32, BootstrapError> {
        let prepared = self.prepare()?;
        let s = &self.settings;
        let code = launch::launch(self.runner, &prepared.env, &s.paths.app, &s.launch, &s.workdir)?;
        tracing::debug!(stage = %Stage::Launched, exit_code = code, "application exited");
        Ok(code)
    }

    /// Inspect the artifacts without creating or installing anything.
    pub fn status(&self) -> StatusReport {
        let s = &self.settings;
        let (interpreter, interpreter_error) = match interpreter::discover(self.runner, &s.candidates) {
            Ok(i) => (Some(i), None),
            Err(e) => (None, Some(e.to_string())),
        };
        let layout = EnvLayout::new(s.env_dir());
        let manifest_path = s.manifest_path();
        let manifest = Manifest::load(&manifest_path).ok();
        let env_ready = layout.is_provisioned();
        let deps_satisfied = env_ready
            && manifest
                .as_ref()
                .is_some_and(|m| m.is_empty() || deps::is_satisfied(&layout, m));
        let data_dir = s.data_dir();

        StatusReport {
            interpreter,
            interpreter_error,
            env_ready,
            env_dir: layout.root().to_path_buf(),
            manifest_found: manifest.is_some(),
            packages: manifest
                .as_ref()
                .map(|m| m.requirements().map(|r| r.name.clone()).collect())
                .unwrap_or_default(),
            manifest: manifest_path,
            deps_satisfied,
            data_dir_ready: data_dir.is_dir(),
            data_dir,
            launch_args: s.launch.to_args(),
        }
    }
}
