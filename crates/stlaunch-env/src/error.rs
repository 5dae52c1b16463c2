use std::path::PathBuf;

use thiserror::Error;

/// One candidate that did not resolve during interpreter discovery.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ProbeFailure {
    pub candidate: String,
    pub reason: String,
}

impl std::fmt::Display for ProbeFailure {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{} ({})", self.candidate, self.reason)
    }
}

fn join_failures(tried: &[ProbeFailure]) -> String {
    tried
        .iter()
        .map(ToString::to_string)
        .collect::<Vec<_>>()
        .join(", ")
}

/// Errors returned by the bootstrap sequence. Every variant is fatal.
#[derive(Debug, Error)]
pub enum BootstrapError {
    #[error(
        "no usable Python interpreter found (tried: {}). Install Python 3 and make sure it is on PATH, or set STLAUNCH_PYTHON",
        join_failures(.tried)
    )]
    MissingInterpreter { tried: Vec<ProbeFailure> },

    #[error("failed to create virtual environment at {}: {detail}", .path.display())]
    EnvironmentConstruction { path: PathBuf, detail: String },

    #[error("dependency manifest not found at {}", .0.display())]
    ManifestNotFound(PathBuf),

    #[error("{step} failed: {detail}")]
    DependencyInstall { step: String, detail: String },

    #[error("cannot prepare data directory {}: {detail}", .path.display())]
    DataDirectory { path: PathBuf, detail: String },

    #[error("cloud launch requires the {var} environment variable (the port supplied by the hosting platform)")]
    MissingPort { var: String },

    #[error("{var}={value:?} is not a valid TCP port")]
    InvalidPort { var: String, value: String },

    #[error("failed to start `{command}`")]
    Launch {
        command: String,
        #[source]
        source: std::io::Error,
    },

    #[error("{context}")]
    Io {
        context: String,
        #[source]
        source: std::io::Error,
    },
}

impl BootstrapError {
    pub(crate) fn io(context: impl Into<String>, source: std::io::Error) -> Self {
        Self::Io {
            context: context.into(),
            source,
        }
    }
}

/// Describe a non-success exit for error messages.
pub(crate) fn describe_exit(code: Option<i32>) -> String {
    match code {
        Some(c) => format!("exited with status {}", c),
        None => "terminated by signal".to_string(),
    }
}
