//! Small helpers shared by the delivery engine and server crates.
mod helpers;
mod secret;

pub use helpers::{parse_env_var, EnvVarError};
pub use secret::Secret;
