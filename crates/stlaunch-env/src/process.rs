//! ProcessRunner: the seam between the bootstrap sequence and the OS.
//!
//! Every external command (interpreter probe, `venv`, pip, streamlit) is
//! described as a [`CommandSpec`] and handed to a runner. [`SystemRunner`]
//! spawns real processes; tests substitute a recording fake.

use std::ffi::{OsStr, OsString};
use std::path::PathBuf;
use std::process::{Command, Stdio};

/// A command to run: program, arguments, working directory and env overrides.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CommandSpec {
    pub program: PathBuf,
    pub args: Vec<OsString>,
    pub cwd: Option<PathBuf>,
    pub env: Vec<(OsString, OsString)>,
    pub env_remove: Vec<OsString>,
}

impl CommandSpec {
    pub fn new(program: impl Into<PathBuf>) -> Self {
        Self {
            program: program.into(),
            args: Vec::new(),
            cwd: None,
            env: Vec::new(),
            env_remove: Vec::new(),
        }
    }

    pub fn arg(mut self, arg: impl Into<OsString>) -> Self {
        self.args.push(arg.into());
        self
    }

    pub fn args<I, S>(mut self, args: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<OsString>,
    {
        self.args.extend(args.into_iter().map(Into::into));
        self
    }

    pub fn current_dir(mut self, dir: impl Into<PathBuf>) -> Self {
        self.cwd = Some(dir.into());
        self
    }

    pub fn env(mut self, key: impl Into<OsString>, value: impl Into<OsString>) -> Self {
        self.env.push((key.into(), value.into()));
        self
    }

    pub fn env_remove(mut self, key: impl Into<OsString>) -> Self {
        self.env_remove.push(key.into());
        self
    }

    /// Value of an env override set on this command, if any.
    pub fn env_value(&self, key: &str) -> Option<&OsStr> {
        self.env
            .iter()
            .rev()
            .find(|(k, _)| k == key)
            .map(|(_, v)| v.as_os_str())
    }

    /// Arguments as lossy UTF-8, for logging and assertions.
    pub fn args_lossy(&self) -> Vec<String> {
        self.args
            .iter()
            .map(|a| a.to_string_lossy().into_owned())
            .collect()
    }

    /// Shell-like rendering: `python -m pip install -r requirements.txt`.
    pub fn display(&self) -> String {
        let mut out = self.program.to_string_lossy().into_owned();
        for arg in &self.args {
            out.push(' ');
            out.push_str(&arg.to_string_lossy());
        }
        out
    }

    fn to_command(&self) -> Command {
        let mut cmd = Command::new(&self.program);
        cmd.args(&self.args);
        if let Some(ref dir) = self.cwd {
            cmd.current_dir(dir);
        }
        for key in &self.env_remove {
            cmd.env_remove(key);
        }
        for (k, v) in &self.env {
            cmd.env(k, v);
        }
        cmd
    }
}

/// Result of a captured run.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Finished {
    /// `None` when the process was terminated by a signal
    pub code: Option<i32>,
    pub stdout: String,
    pub stderr: String,
}

impl Finished {
    pub fn success(&self) -> bool {
        self.code == Some(0)
    }

    /// First non-empty of stderr / stdout, trimmed.
    pub fn diagnostic(&self) -> String {
        let stderr = self.stderr.trim();
        if !stderr.is_empty() {
            return stderr.to_string();
        }
        self.stdout.trim().to_string()
    }
}

/// Runs external commands for the bootstrap sequence.
pub trait ProcessRunner {
    /// Locate `program` on the search path.
    fn locate(&self, program: &str) -> Option<PathBuf> {
        which::which(program).ok()
    }

    /// Run to completion with stdout/stderr captured.
    fn output(&self, spec: &CommandSpec) -> std::io::Result<Finished>;

    /// Run to completion with stdio inherited; returns the exit code
    /// (`None` when terminated by a signal).
    fn status(&self, spec: &CommandSpec) -> std::io::Result<Option<i32>>;
}

/// Spawns real child processes.
#[derive(Debug, Clone, Copy, Default)]
pub struct SystemRunner;

impl ProcessRunner for SystemRunner {
    fn output(&self, spec: &CommandSpec) -> std::io::Result<Finished> {
        tracing::debug!(command = %spec.display(), "running (captured)");
        let out = spec.to_command().stdin(Stdio::null()).output()?;
        Ok(Finished {
            code: out.status.code(),
            stdout: String::from_utf8_lossy(&out.stdout).into_owned(),
            stderr: String::from_utf8_lossy(&out.stderr).into_owned(),
        })
    }

    fn status(&self, spec: &CommandSpec) -> std::io::Result<Option<i32>> {
        tracing::debug!(command = %spec.display(), "running (inherited stdio)");
        let status = spec.to_command().status()?;
        Ok(status.code())
    }
}
