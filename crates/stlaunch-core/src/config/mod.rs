//! stlaunch configuration layer
//!
//! Every environment variable read happens here; callers work with the
//! structured configs instead of calling `std::env::var` directly.
//!
//! - `loader`: `.env` loading, alias-aware `lookup_with` and `parse_bool`
//! - `schema`: `PathsConfig`, `InstallConfig`, `InterpreterConfig`, `CloudConfig`, `ObservabilityConfig`
//! - `env_keys`: key constants and legacy aliases

pub mod env_keys;
pub mod loader;
pub mod schema;

pub use loader::{load_dotenv, load_dotenv_from_dir};
pub use schema::{CloudConfig, InstallConfig, InterpreterConfig, ObservabilityConfig, PathsConfig};
