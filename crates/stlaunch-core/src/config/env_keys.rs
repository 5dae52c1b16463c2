//! Environment variable key constants and aliases.
//!
//! Primary variables use the `STLAUNCH_*` prefix; a few aliases follow the
//! names operators already export for Python tooling.

/// Filesystem layout around the working directory
pub mod paths {
    pub const STLAUNCH_ENV_DIR: &str = "STLAUNCH_ENV_DIR";
    pub const ENV_DIR_ALIASES: &[&str] = &["STLAUNCH_VENV"];

    pub const STLAUNCH_MANIFEST: &str = "STLAUNCH_MANIFEST";
    pub const MANIFEST_ALIASES: &[&str] = &["STLAUNCH_REQUIREMENTS"];

    pub const STLAUNCH_APP: &str = "STLAUNCH_APP";

    pub const STLAUNCH_DATA_DIR: &str = "STLAUNCH_DATA_DIR";
}

/// Dependency installation
pub mod install {
    /// Upgrade pip before installing the manifest. Default on.
    pub const STLAUNCH_UPGRADE_PIP: &str = "STLAUNCH_UPGRADE_PIP";
    /// Ignore the install stamp and always run pip.
    pub const STLAUNCH_FORCE_INSTALL: &str = "STLAUNCH_FORCE_INSTALL";
}

/// Interpreter discovery
pub mod interpreter {
    /// Explicit interpreter, probed before the platform candidates.
    pub const STLAUNCH_PYTHON: &str = "STLAUNCH_PYTHON";
}

/// Cloud launch profile
pub mod cloud {
    /// Name of the variable the hosting platform uses for the listening port.
    pub const STLAUNCH_PORT_ENV: &str = "STLAUNCH_PORT_ENV";
    pub const DEFAULT_PORT_VAR: &str = "PORT";
}

/// Observability and logging
pub mod observability {
    pub const STLAUNCH_QUIET: &str = "STLAUNCH_QUIET";

    pub const STLAUNCH_LOG_LEVEL: &str = "STLAUNCH_LOG_LEVEL";

    pub const STLAUNCH_LOG_JSON: &str = "STLAUNCH_LOG_JSON";
}
