//! Isolated environment: venv provisioning and activation.
//!
//! `builder` creates the venv when absent and turns an existing one into an
//! [`builder::ActivatedEnv`]. Later steps receive only that value; no process
//! state is changed.

pub mod builder;

pub use builder::{activate, ensure_environment, ActivatedEnv, EnvLayout};
