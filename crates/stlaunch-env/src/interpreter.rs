//! Interpreter discovery: ordered candidate probes, first success wins.

use std::path::PathBuf;

use serde::Serialize;

use crate::error::{describe_exit, BootstrapError, ProbeFailure};
use crate::process::{CommandSpec, ProcessRunner};

/// A resolved system interpreter, used only to build the venv.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct Interpreter {
    /// Candidate name that resolved (e.g. `python3`)
    pub name: String,
    /// Location on the search path
    pub path: PathBuf,
    /// Output of `--version`
    pub version: String,
}

/// Platform candidates, probed in order.
pub fn default_candidates() -> Vec<String> {
    if cfg!(windows) {
        vec!["python".to_string(), "py".to_string()]
    } else {
        vec!["python3".to_string(), "python".to_string()]
    }
}

/// Candidate list with an optional explicit interpreter probed first.
pub fn candidates_with_override(explicit: Option<&str>) -> Vec<String> {
    let mut out = Vec::new();
    if let Some(e) = explicit.map(str::trim).filter(|e| !e.is_empty()) {
        out.push(e.to_string());
    }
    for c in default_candidates() {
        if !out.contains(&c) {
            out.push(c);
        }
    }
    out
}

/// Probe each candidate with `--version`; return the first that answers.
///
/// Fails with [`BootstrapError::MissingInterpreter`] listing every attempt in
/// probe order. No filesystem changes are made.
pub fn discover<R: ProcessRunner + ?Sized>(
    runner: &R,
    candidates: &[String],
) -> Result<Interpreter, BootstrapError> {
    let mut tried = Vec::with_capacity(candidates.len());
    for name in candidates {
        let Some(path) = runner.locate(name) else {
            tracing::debug!(candidate = %name, "not found on PATH");
            tried.push(ProbeFailure {
                candidate: name.clone(),
                reason: "not found on PATH".to_string(),
            });
            continue;
        };
        let probe = CommandSpec::new(&path).arg("--version");
        match runner.output(&probe) {
            Ok(out) if out.success() => {
                let version = out.diagnostic();
                tracing::debug!(candidate = %name, path = %path.display(), %version, "interpreter resolved");
                return Ok(Interpreter {
                    name: name.clone(),
                    path,
                    version,
                });
            }
            Ok(out) => tried.push(ProbeFailure {
                candidate: name.clone(),
                reason: describe_exit(out.code),
            }),
            Err(e) => tried.push(ProbeFailure {
                candidate: name.clone(),
                reason: e.to_string(),
            }),
        }
    }
    Err(BootstrapError::MissingInterpreter { tried })
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::process::Finished;
    use std::cell::RefCell;
    use std::collections::HashMap;

    /// Answers `locate` from a table; `--version` succeeds unless listed in `broken`.
    #[derive(Default)]
    struct ProbeRunner {
        on_path: HashMap<String, PathBuf>,
        broken: Vec<PathBuf>,
        probed: RefCell<Vec<PathBuf>>,
    }

    impl ProcessRunner for ProbeRunner {
        fn locate(&self, program: &str) -> Option<PathBuf> {
            self.on_path.get(program).cloned()
        }

        fn output(&self, spec: &CommandSpec) -> std::io::Result<Finished> {
            self.probed.borrow_mut().push(spec.program.clone());
            if self.broken.contains(&spec.program) {
                Ok(Finished {
                    code: Some(9009),
                    ..Default::default()
                })
            } else {
                Ok(Finished {
                    code: Some(0),
                    stdout: "Python 3.11.4\n".into(),
                    stderr: String::new(),
                })
            }
        }

        fn status(&self, _spec: &CommandSpec) -> std::io::Result<Option<i32>> {
            unreachable!("discovery never streams")
        }
    }

    fn names(v: &[&str]) -> Vec<String> {
        v.iter().map(|s| s.to_string()).collect()
    }

    #[test]
    fn test_first_candidate_wins() {
        let mut runner = ProbeRunner::default();
        runner.on_path.insert("python3".into(), "/usr/bin/python3".into());
        runner.on_path.insert("python".into(), "/usr/bin/python".into());
        let interp = discover(&runner, &names(&["python3", "python"])).unwrap();
        assert_eq!(interp.name, "python3");
        assert_eq!(interp.path, PathBuf::from("/usr/bin/python3"));
        assert_eq!(interp.version, "Python 3.11.4");
        assert_eq!(runner.probed.borrow().len(), 1);
    }

    #[test]
    fn test_falls_back_to_second_candidate() {
        let mut runner = ProbeRunner::default();
        runner.on_path.insert("python".into(), "/usr/bin/python".into());
        let interp = discover(&runner, &names(&["python3", "python"])).unwrap();
        assert_eq!(interp.name, "python");
    }

    #[test]
    fn test_broken_candidate_is_skipped() {
        let mut runner = ProbeRunner::default();
        runner.on_path.insert("python".into(), "C:/alias/python.exe".into());
        runner.on_path.insert("py".into(), "C:/Windows/py.exe".into());
        runner.broken.push("C:/alias/python.exe".into());
        let interp = discover(&runner, &names(&["python", "py"])).unwrap();
        assert_eq!(interp.name, "py");
    }

    #[test]
    fn test_no_candidate_reports_all_attempts_in_order() {
        let mut runner = ProbeRunner::default();
        runner.on_path.insert("python".into(), "/opt/python".into());
        runner.broken.push("/opt/python".into());
        let err = discover(&runner, &names(&["python3", "python"])).unwrap_err();
        match err {
            BootstrapError::MissingInterpreter { tried } => {
                assert_eq!(tried.len(), 2);
                assert_eq!(tried[0].candidate, "python3");
                assert_eq!(tried[0].reason, "not found on PATH");
                assert_eq!(tried[1].candidate, "python");
                assert_eq!(tried[1].reason, "exited with status 9009");
            }
            other => panic!("unexpected error: {other}"),
        }
    }

    #[test]
    fn test_override_is_probed_first_without_duplicates() {
        let c = candidates_with_override(Some("python3"));
        assert_eq!(c[0], "python3");
        assert_eq!(c.iter().filter(|n| *n == "python3").count(), 1);

        let c = candidates_with_override(Some("/opt/py311/bin/python"));
        assert_eq!(c[0], "/opt/py311/bin/python");
        assert_eq!(c.len(), default_candidates().len() + 1);

        assert_eq!(candidates_with_override(Some("  ")), default_candidates());
    }
}
