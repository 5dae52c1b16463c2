pub mod bootstrap;
pub mod env;
pub mod status;
