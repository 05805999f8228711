use std::{env, str::FromStr};

use thiserror::Error;

#[derive(Debug, Clone, Error, PartialEq, Eq)]
pub enum EnvVarError {
    #[error("{name} contains invalid unicode")]
    NotUnicode { name: String },
    #[error("{value} is not a valid value for {name}. {reason}")]
    InvalidValue { name: String, value: String, reason: String },
}

/// Reads the environment variable `name` and parses it into a `T`.
///
/// Returns `Ok(None)` when the variable is not set (or is blank), so that callers can pick their own default.
pub fn parse_env_var<T>(name: &str) -> Result<Option<T>, EnvVarError>
where
    T: FromStr,
    T::Err: std::fmt::Display,
{
    let value = match env::var(name) {
        Ok(v) if v.trim().is_empty() => return Ok(None),
        Ok(v) => v,
        Err(env::VarError::NotPresent) => return Ok(None),
        Err(env::VarError::NotUnicode(_)) => return Err(EnvVarError::NotUnicode { name: name.to_string() }),
    };
    value.trim().parse::<T>().map(Some).map_err(|e| EnvVarError::InvalidValue {
        name: name.to_string(),
        value,
        reason: e.to_string(),
    })
}
