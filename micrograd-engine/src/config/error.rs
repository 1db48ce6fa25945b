//! Failures of the demo driver's setup: a bad env value, or numbers the
//! chosen precision cannot hold.

use thiserror::Error;

/// Why the driver refused its inputs.
///
/// `Parse` and `EnvVar` come out of [`from_env`](super::from_env);
/// `Validation` comes out of [`Config::validate`](super::Config::validate).
#[derive(Debug, Clone, Error)]
pub enum ConfigError {
    /// `x1`, `x2` or the seed is NaN or infinite, or overflows `f32` while
    /// `MICROGRAD_PRECISION` is `f32` (for example a seed of `1e300`).
    #[error("config validation: {0}")]
    Validation(String),

    /// A `MICROGRAD_*` variable is set but is not valid Unicode.
    #[error("env var {key}: {message}")]
    EnvVar {
        key: String,
        message: String,
    },

    /// A `MICROGRAD_*` variable is not a float literal, or `MICROGRAD_PRECISION`
    /// names something other than `f32` or `f64`.
    #[error("env var {key}={value:?}: {message}")]
    Parse {
        key: String,
        /// As read, before trimming.
        value: String,
        /// The parser's own error text.
        message: String,
    },
}

impl ConfigError {
    /// The reason without the key or value.
    #[must_use]
    pub fn message(&self) -> &str {
        match self {
            ConfigError::Validation(m) => m,
            ConfigError::EnvVar { message, .. } => message,
            ConfigError::Parse { message, .. } => message,
        }
    }
}

/// A precision name other than `f32` or `f64`.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
#[error("unknown precision {0:?}, expected \"f32\" or \"f64\"")]
pub struct UnknownPrecision(pub String);
