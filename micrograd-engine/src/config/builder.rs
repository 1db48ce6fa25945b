//! Reads the `MICROGRAD_*` variables into a [`Config`].

use log::debug;

use super::constants::{ENV_PRECISION, ENV_PREFIX, ENV_SEED_GRADIENT, ENV_X1, ENV_X2};
use super::{Config, ConfigError, Precision};

/// `X1` becomes `MICROGRAD_X1`.
#[must_use]
pub fn env_key(suffix: &str) -> String {
    format!("{ENV_PREFIX}{suffix}")
}

/// Raw value of `key`; `None` when unset.
pub fn env_string(key: &str) -> Result<Option<String>, ConfigError> {
    std::env::var(key).map(Some).or_else(|err| match err {
        std::env::VarError::NotPresent => Ok(None),
        std::env::VarError::NotUnicode(_) => Err(ConfigError::EnvVar {
            key: key.to_string(),
            message: err.to_string(),
        }),
    })
}

/// Parses `key` after trimming surrounding whitespace; `None` when unset.
///
/// `MICROGRAD_X1=abc` gives [`ConfigError::Parse`] carrying the float parser's message.
pub fn env_parsed<T>(key: &str) -> Result<Option<T>, ConfigError>
where
    T: std::str::FromStr,
    T::Err: std::fmt::Display,
{
    let Some(raw) = env_string(key)? else {
        return Ok(None);
    };
    raw.trim()
        .parse::<T>()
        .map(Some)
        .map_err(|err| ConfigError::Parse {
            key: key.to_string(),
            message: err.to_string(),
            value: raw,
        })
}

/// Unset variables keep their [`Config::default`] value. Range checks are left
/// to [`Config::validate`].
pub fn from_env() -> Result<Config, ConfigError> {
    let default = Config::default();

    let x1 = env_parsed::<f64>(&env_key(ENV_X1))?.unwrap_or(default.x1);
    let x2 = env_parsed::<f64>(&env_key(ENV_X2))?.unwrap_or(default.x2);
    let seed_gradient =
        env_parsed::<f64>(&env_key(ENV_SEED_GRADIENT))?.unwrap_or(default.seed_gradient);
    let precision =
        env_parsed::<Precision>(&env_key(ENV_PRECISION))?.unwrap_or(default.precision);

    let config = Config {
        x1,
        x2,
        seed_gradient,
        precision,
    };
    debug!("config from env: {config:?}");
    Ok(config)
}
