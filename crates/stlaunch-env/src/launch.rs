//! Launch profiles and the final `streamlit run` hand-off.

use std::path::Path;

use serde::Serialize;

use crate::env::ActivatedEnv;
use crate::error::BootstrapError;
use crate::process::{CommandSpec, ProcessRunner};

/// Ordered option → value mapping, rendered as `--<name> <value>`.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
pub struct LaunchConfig {
    options: Vec<(String, String)>,
}

impl LaunchConfig {
    /// Local development: framework defaults, no overriding flags.
    pub fn local() -> Self {
        Self::default()
    }

    /// Cloud platform: bind to `port`, headless, CORS enforcement off.
    pub fn cloud(port: u16) -> Self {
        Self::default()
            .with("server.port", port.to_string())
            .with("server.headless", "true")
            .with("server.enableCORS", "false")
    }

    /// Cloud profile with the port read from `port_var` through `get`.
    pub fn cloud_from_lookup<G>(get: &G, port_var: &str) -> Result<Self, BootstrapError>
    where
        G: Fn(&str) -> Option<String>,
    {
        let raw = get(port_var).ok_or_else(|| BootstrapError::MissingPort {
            var: port_var.to_string(),
        })?;
        Ok(Self::cloud(parse_port(port_var, &raw)?))
    }

    /// Set `name`, replacing an earlier value in place.
    pub fn with(mut self, name: impl Into<String>, value: impl Into<String>) -> Self {
        let name = name.into();
        let value = value.into();
        match self.options.iter_mut().find(|(n, _)| *n == name) {
            Some(slot) => slot.1 = value,
            None => self.options.push((name, value)),
        }
        self
    }

    pub fn get(&self, name: &str) -> Option<&str> {
        self.options
            .iter()
            .find(|(n, _)| n == name)
            .map(|(_, v)| v.as_str())
    }

    pub fn is_empty(&self) -> bool {
        self.options.is_empty()
    }

    pub fn to_args(&self) -> Vec<String> {
        self.options
            .iter()
            .flat_map(|(n, v)| [format!("--{}", n), v.clone()])
            .collect()
    }
}

/// Parse a platform-supplied port. Blank is treated as missing.
pub fn parse_port(var: &str, raw: &str) -> Result<u16, BootstrapError> {
    let trimmed = raw.trim();
    if trimmed.is_empty() {
        return Err(BootstrapError::MissingPort {
            var: var.to_string(),
        });
    }
    match trimmed.parse::<u16>() {
        Ok(port) if port > 0 => Ok(port),
        _ => Err(BootstrapError::InvalidPort {
            var: var.to_string(),
            value: raw.to_string(),
        }),
    }
}

/// `python -m streamlit run <app> [flags]` inside the venv.
pub fn launch_command(env: &ActivatedEnv, app: &Path, config: &LaunchConfig) -> CommandSpec {
    env.module("streamlit")
        .arg("run")
        .arg(app)
        .args(config.to_args())
}

/// Run the app in the foreground and return its exit code.
/// Signal termination maps to 1.
pub fn launch<R: ProcessRunner + ?Sized>(
    runner: &R,
    env: &ActivatedEnv,
    app: &Path,
    config: &LaunchConfig,
    workdir: &Path,
) -> Result<i32, BootstrapError> {
    if !workdir.join(app).exists() {
        tracing::warn!(app = %app.display(), "application script not found; streamlit will report the error");
    }
    let cmd = launch_command(env, app, config).current_dir(workdir);
    tracing::info!(command = %cmd.display(), "launching");
    let code = runner.status(&cmd).map_err(|source| BootstrapError::Launch {
        command: cmd.display(),
        source,
    })?;
    Ok(code.unwrap_or(1))
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::collections::HashMap;

    #[test]
    fn test_cloud_flags() {
        let cfg = LaunchConfig::cloud(8080);
        assert_eq!(
            cfg.to_args(),
            vec![
                "--server.port",
                "8080",
                "--server.headless",
                "true",
                "--server.enableCORS",
                "false"
            ]
        );
        assert_eq!(cfg.get("server.port"), Some("8080"));
    }

    #[test]
    fn test_local_has_no_flags() {
        assert!(LaunchConfig::local().is_empty());
        assert!(LaunchConfig::local().to_args().is_empty());
    }

    #[test]
    fn test_with_replaces_in_place() {
        let cfg = LaunchConfig::cloud(80).with("server.port", "81");
        assert_eq!(cfg.to_args()[..2], ["--server.port", "81"]);
        assert_eq!(cfg.to_args().len(), 6);
    }

    #[test]
    fn test_cloud_from_lookup() {
        let vars: HashMap<&str, &str> = [("PORT", "33507")].into();
        let get = |k: &str| vars.get(k).map(|v| v.to_string());
        let cfg = LaunchConfig::cloud_from_lookup(&get, "PORT").unwrap();
        assert_eq!(cfg.get("server.port"), Some("33507"));

        let err = LaunchConfig::cloud_from_lookup(&get, "APP_PORT").unwrap_err();
        assert!(matches!(err, BootstrapError::MissingPort { ref var } if var == "APP_PORT"));
    }

    #[test]
    fn test_parse_port_rejects_bad_values() {
        assert_eq!(parse_port("PORT", " 8501 ").unwrap(), 8501);
        assert!(matches!(
            parse_port("PORT", "   "),
            Err(BootstrapError::MissingPort { .. })
        ));
        for bad in ["http", "0", "70000", "-1"] {
            assert!(matches!(
                parse_port("PORT", bad),
                Err(BootstrapError::InvalidPort { .. })
            ));
        }
    }
}
