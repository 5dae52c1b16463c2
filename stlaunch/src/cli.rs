use clap::{Args, Parser, Subcommand};
use std::path::PathBuf;

/// stlaunch - prepare a Python venv and launch a Streamlit app
#[derive(Parser, Debug)]
#[command(name = "stlaunch")]
#[command(author, version, about, long_about = None)]
pub struct Cli {
    /// Defaults to `local` when omitted
    #[command(subcommand)]
    pub command: Option<Commands>,
}

#[derive(Subcommand, Debug)]
pub enum Commands {
    /// Bootstrap and run the app with Streamlit's own defaults (port, prompts)
    Local(BootstrapArgs),

    /// Bootstrap and run headless on the port supplied by the hosting platform
    ///
    /// Reads the port from $PORT (or the variable named by --port-env /
    /// STLAUNCH_PORT_ENV) and passes --server.port, --server.headless true
    /// and --server.enableCORS false to Streamlit.
    Cloud {
        #[command(flatten)]
        args: BootstrapArgs,

        /// Environment variable holding the port (default: PORT)
        #[arg(long, value_name = "VAR")]
        port_env: Option<String>,
    },

    /// Bootstrap only: create the venv, install dependencies, create the data dir
    Prepare(BootstrapArgs),

    /// Show interpreter, venv, dependency and data-dir state without changing anything
    Status {
        #[command(flatten)]
        args: BootstrapArgs,

        /// Show the cloud launch flags instead of the local ones
        #[arg(long)]
        cloud: bool,

        /// Output as JSON
        #[arg(long)]
        json: bool,
    },

    /// Manage the virtual environment
    Env {
        #[command(subcommand)]
        action: EnvAction,
    },
}

impl Commands {
    /// The shared path args; every subcommand carries them.
    pub fn bootstrap_args(&self) -> &BootstrapArgs {
        match self {
            Commands::Local(args) | Commands::Prepare(args) => args,
            Commands::Cloud { args, .. } | Commands::Status { args, .. } => args,
            Commands::Env {
                action: EnvAction::Clean { args, .. },
            } => args,
        }
    }
}

#[derive(Subcommand, Debug)]
pub enum EnvAction {
    /// Remove the virtual environment
    Clean {
        #[command(flatten)]
        args: BootstrapArgs,

        /// Dry run — show what would be removed without deleting
        #[arg(long)]
        dry_run: bool,

        /// Force removal without confirmation
        #[arg(long, short)]
        force: bool,
    },
}

/// Path and install overrides shared by every subcommand.
/// Unset flags fall back to STLAUNCH_* variables, then to the defaults.
#[derive(Args, Debug, Clone, Default)]
pub struct BootstrapArgs {
    /// Working directory the other paths are relative to
    #[arg(long, value_name = "DIR", env = "STLAUNCH_WORKDIR")]
    pub workdir: Option<PathBuf>,

    /// Virtual environment directory (default: venv)
    #[arg(long, value_name = "DIR")]
    pub env_dir: Option<PathBuf>,

    /// Dependency manifest (default: requirements.txt)
    #[arg(long, value_name = "FILE")]
    pub manifest: Option<PathBuf>,

    /// Streamlit entry point (default: app.py)
    #[arg(long, value_name = "FILE")]
    pub app: Option<PathBuf>,

    /// Data directory to provision (default: data)
    #[arg(long, value_name = "DIR")]
    pub data_dir: Option<PathBuf>,

    /// Interpreter to probe before the platform defaults
    #[arg(long, value_name = "PYTHON")]
    pub python: Option<String>,

    /// Skip `pip install --upgrade pip`
    #[arg(long)]
    pub no_upgrade_pip: bool,

    /// Run pip even when the manifest is unchanged since the last install
    #[arg(long)]
    pub reinstall: bool,
}
