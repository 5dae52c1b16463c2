//! Config structs grouped by concern
//!
//! Each struct loads from the process environment via `from_env()`; the
//! `from_lookup` constructors take any key → value source.

use super::env_keys::{cloud, install, interpreter, observability as obv_keys, paths};
use super::loader::{load_dotenv, lookup_with, parse_bool};
use std::path::PathBuf;

fn process_env(key: &str) -> Option<String> {
    std::env::var(key).ok()
}

/// Locations of the bootstrap artifacts, relative to the working directory
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PathsConfig {
    pub env_dir: PathBuf,
    pub manifest: PathBuf,
    pub app: PathBuf,
    pub data_dir: PathBuf,
}

impl Default for PathsConfig {
    fn default() -> Self {
        Self {
            env_dir: PathBuf::from("venv"),
            manifest: PathBuf::from("requirements.txt"),
            app: PathBuf::from("app.py"),
            data_dir: PathBuf::from("data"),
        }
    }
}

impl PathsConfig {
    pub fn from_env() -> Self {
        load_dotenv();
        Self::from_lookup(&process_env)
    }

    pub fn from_lookup<G>(get: &G) -> Self
    where
        G: Fn(&str) -> Option<String>,
    {
        let defaults = Self::default();
        Self {
            env_dir: lookup_with(get, paths::STLAUNCH_ENV_DIR, paths::ENV_DIR_ALIASES)
                .map(PathBuf::from)
                .unwrap_or(defaults.env_dir),
            manifest: lookup_with(get, paths::STLAUNCH_MANIFEST, paths::MANIFEST_ALIASES)
                .map(PathBuf::from)
                .unwrap_or(defaults.manifest),
            app: lookup_with(get, paths::STLAUNCH_APP, &[])
                .map(PathBuf::from)
                .unwrap_or(defaults.app),
            data_dir: lookup_with(get, paths::STLAUNCH_DATA_DIR, &[])
                .map(PathBuf::from)
                .unwrap_or(defaults.data_dir),
        }
    }
}

/// Dependency installation switches
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct InstallConfig {
    /// Run `pip install --upgrade pip` before the manifest
    pub upgrade_installer: bool,
    /// Ignore the install stamp
    pub force: bool,
}

impl Default for InstallConfig {
    fn default() -> Self {
        Self {
            upgrade_installer: true,
            force: false,
        }
    }
}

impl InstallConfig {
    pub fn from_env() -> Self {
        load_dotenv();
        Self::from_lookup(&process_env)
    }

    pub fn from_lookup<G>(get: &G) -> Self
    where
        G: Fn(&str) -> Option<String>,
    {
        Self {
            upgrade_installer: parse_bool(
                lookup_with(get, install::STLAUNCH_UPGRADE_PIP, &[]).as_deref(),
                true,
            ),
            force: parse_bool(
                lookup_with(get, install::STLAUNCH_FORCE_INSTALL, &[]).as_deref(),
                false,
            ),
        }
    }
}

/// Interpreter discovery override
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct InterpreterConfig {
    pub explicit: Option<String>,
}

impl InterpreterConfig {
    pub fn from_env() -> Self {
        load_dotenv();
        Self::from_lookup(&process_env)
    }

    pub fn from_lookup<G>(get: &G) -> Self
    where
        G: Fn(&str) -> Option<String>,
    {
        Self {
            explicit: lookup_with(get, interpreter::STLAUNCH_PYTHON, &[]),
        }
    }
}

/// Cloud profile: which variable carries the platform-assigned port
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CloudConfig {
    pub port_var: String,
}

impl Default for CloudConfig {
    fn default() -> Self {
        Self {
            port_var: cloud::DEFAULT_PORT_VAR.to_string(),
        }
    }
}

impl CloudConfig {
    pub fn from_env() -> Self {
        load_dotenv();
        Self::from_lookup(&process_env)
    }

    pub fn from_lookup<G>(get: &G) -> Self
    where
        G: Fn(&str) -> Option<String>,
    {
        Self {
            port_var: lookup_with(get, cloud::STLAUNCH_PORT_ENV, &[])
                .unwrap_or_else(|| cloud::DEFAULT_PORT_VAR.to_string()),
        }
    }
}

/// Observability: quiet, log_level, log_json
#[derive(Debug, Clone)]
pub struct ObservabilityConfig {
    pub quiet: bool,
    pub log_level: String,
    pub log_json: bool,
}

impl ObservabilityConfig {
    pub fn from_env() -> &'static Self {
        use std::sync::OnceLock;
        static CACHE: OnceLock<ObservabilityConfig> = OnceLock::new();
        CACHE.get_or_init(|| {
            load_dotenv();
            Self::from_lookup(&process_env)
        })
    }

    pub fn from_lookup<G>(get: &G) -> Self
    where
        G: Fn(&str) -> Option<String>,
    {
        Self {
            quiet: parse_bool(
                lookup_with(get, obv_keys::STLAUNCH_QUIET, &[]).as_deref(),
                false,
            ),
            log_level: lookup_with(get, obv_keys::STLAUNCH_LOG_LEVEL, &[])
                .unwrap_or_else(|| "stlaunch=info,stlaunch_env=info".to_string()),
            log_json: parse_bool(
                lookup_with(get, obv_keys::STLAUNCH_LOG_JSON, &[]).as_deref(),
                false,
            ),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::collections::HashMap;

    fn lookup(vars: &[(&'static str, &'static str)]) -> impl Fn(&str) -> Option<String> {
        let map: HashMap<&'static str, &'static str> = vars.iter().copied().collect();
        move |k: &str| map.get(k).map(|v| v.to_string())
    }

    #[test]
    fn test_paths_defaults() {
        let cfg = PathsConfig::from_lookup(&lookup(&[]));
        assert_eq!(cfg, PathsConfig::default());
        assert_eq!(cfg.env_dir, PathBuf::from("venv"));
        assert_eq!(cfg.data_dir, PathBuf::from("data"));
    }

    #[test]
    fn test_paths_overrides_and_alias() {
        let cfg = PathsConfig::from_lookup(&lookup(&[
            ("STLAUNCH_VENV", ".venv"),
            ("STLAUNCH_APP", "dashboard.py"),
        ]));
        assert_eq!(cfg.env_dir, PathBuf::from(".venv"));
        assert_eq!(cfg.app, PathBuf::from("dashboard.py"));
        assert_eq!(cfg.manifest, PathBuf::from("requirements.txt"));
    }

    #[test]
    fn test_install_config() {
        assert_eq!(InstallConfig::from_lookup(&lookup(&[])), InstallConfig::default());
        let cfg = InstallConfig::from_lookup(&lookup(&[
            ("STLAUNCH_UPGRADE_PIP", "0"),
            ("STLAUNCH_FORCE_INSTALL", "true"),
        ]));
        assert!(!cfg.upgrade_installer);
        assert!(cfg.force);
    }

    #[test]
    fn test_cloud_port_var() {
        assert_eq!(CloudConfig::from_lookup(&lookup(&[])).port_var, "PORT");
        let cfg = CloudConfig::from_lookup(&lookup(&[("STLAUNCH_PORT_ENV", "APP_PORT")]));
        assert_eq!(cfg.port_var, "APP_PORT");
    }

    #[test]
    fn test_observability_defaults() {
        let cfg = ObservabilityConfig::from_lookup(&lookup(&[]));
        assert!(!cfg.quiet);
        assert!(!cfg.log_json);
        assert!(cfg.log_level.starts_with("stlaunch=info"));
    }
}
