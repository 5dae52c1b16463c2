//! Python environment bootstrap for Streamlit apps.
//!
//! Discovery → venv → activation → pip → data dir → launch, each step behind
//! the [`process::ProcessRunner`] seam so the sequence can run against a fake.

pub mod bootstrap;
pub mod data_dir;
pub mod deps;
pub mod env;
pub mod error;
pub mod interpreter;
pub mod launch;
pub mod log;
pub mod manifest;
pub mod process;

pub use bootstrap::{BootstrapSettings, Bootstrapper, Prepared, Stage, StatusReport};
pub use error::BootstrapError;
pub use launch::LaunchConfig;
