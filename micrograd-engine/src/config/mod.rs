//! Configuration for the demo driver: input values, upstream seed, precision.
//!
//! Load from environment via [`from_env`] and validate with [`Config::validate`].
//! Default values and env key names are centralized in the `constants` submodule.

mod builder;
mod constants;
mod error;

use std::fmt;
use std::str::FromStr;

use constants::{DEFAULT_SEED_GRADIENT, DEFAULT_X1, DEFAULT_X2};

pub use builder::{env_key, env_parsed, env_string, from_env};
pub use error::{ConfigError, UnknownPrecision};

/// Floating point type the demo expression is built over.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub enum Precision {
    /// Single precision, as in the classic demo.
    #[default]
    F32,
    /// Double precision.
    F64,
}

impl FromStr for Precision {
    type Err = UnknownPrecision;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_ascii_lowercase().as_str() {
            "f32" => Ok(Precision::F32),
            "f64" => Ok(Precision::F64),
            _ => Err(UnknownPrecision(s.to_string())),
        }
    }
}

impl fmt::Display for Precision {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Precision::F32 => f.write_str("f32"),
            Precision::F64 => f.write_str("f64"),
        }
    }
}

/// Settings for one demo run.
///
/// Use [`from_env`] to build from environment variables and [`Config::validate`] before use.
#[derive(Clone, Debug)]
pub struct Config {
    /// Value of the first leaf.
    pub x1: f64,
    /// Value of the second leaf.
    pub x2: f64,
    /// Upstream gradient seeded at the root before backprop.
    pub seed_gradient: f64,
    /// Numeric type to evaluate in.
    pub precision: Precision,
}

impl Default for Config {
    fn default() -> Self {
        Self {
            x1: DEFAULT_X1,
            x2: DEFAULT_X2,
            seed_gradient: DEFAULT_SEED_GRADIENT,
            precision: Precision::default(),
        }
    }
}

impl Config {
    /// Validates configuration. Returns `Ok(())` if valid, or a [`ConfigError`].
    ///
    /// All numbers must be finite, and must stay finite when narrowed to `f32`.
    pub fn validate(&self) -> Result<(), ConfigError> {
        for (name, value) in [
            ("x1", self.x1),
            ("x2", self.x2),
            ("seed_gradient", self.seed_gradient),
        ] {
            if !value.is_finite() {
                return Err(ConfigError::Validation(format!(
                    "{name} must be finite (got {value})"
                )));
            }
            if self.precision == Precision::F32 && !(value as f32).is_finite() {
                return Err(ConfigError::Validation(format!(
                    "{name} ({value}) overflows f32"
                )));
            }
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::constants::{ENV_PRECISION, ENV_X1, ENV_X2};
    use super::*;

    #[test]
    fn default_config_is_valid() {
        let cfg = Config::default();
        assert!(cfg.validate().is_ok());
        assert_eq!(cfg.x1, 2.0);
        assert_eq!(cfg.x2, 4.0);
        assert_eq!(cfg.seed_gradient, 1.0);
        assert_eq!(cfg.precision, Precision::F32);
    }

    #[test]
    fn validate_rejects_non_finite_values() {
        let nan = Config {
            x1: f64::NAN,
            ..Config::default()
        };
        assert!(matches!(nan.validate(), Err(ConfigError::Validation(_))));
        let inf = Config {
            seed_gradient: f64::INFINITY,
            ..Config::default()
        };
        assert!(inf.validate().is_err());
    }

    #[test]
    fn validate_rejects_f32_overflow_only_in_f32() {
        let cfg = Config {
            x2: 1e300,
            ..Config::default()
        };
        assert!(cfg.validate().is_err());
        let wide = Config {
            precision: Precision::F64,
            ..cfg
        };
        assert!(wide.validate().is_ok());
    }

    #[test]
    fn validate_names_the_field_that_overflows_f32() {
        let cfg = Config {
            seed_gradient: 1e300,
            ..Config::default()
        };
        match cfg.validate() {
            Err(ConfigError::Validation(message)) => {
                assert!(message.starts_with("seed_gradient"));
                assert!(message.contains("overflows f32"));
            }
            other => panic!("expected validation error, got {other:?}"),
        }
    }

    #[test]
    fn precision_parses_names() {
        assert_eq!("f32".parse::<Precision>(), Ok(Precision::F32));
        assert_eq!("F64".parse::<Precision>(), Ok(Precision::F64));
        assert_eq!(
            "double".parse::<Precision>(),
            Err(UnknownPrecision("double".to_string()))
        );
        assert_eq!(
            "f16".parse::<Precision>(),
            Err(UnknownPrecision("f16".to_string()))
        );
        assert_eq!(Precision::F64.to_string(), "f64");
    }

    /// Lock so env tests don't run in parallel and pollute each other.
    static CONFIG_ENV_LOCK: std::sync::OnceLock<std::sync::Mutex<()>> = std::sync::OnceLock::new();

    fn env_lock() -> std::sync::MutexGuard<'static, ()> {
        CONFIG_ENV_LOCK
            .get_or_init(|| std::sync::Mutex::new(()))
            .lock()
            .unwrap_or_else(std::sync::PoisonError::into_inner)
    }

    #[test]
    fn from_env_falls_back_to_defaults() {
        let _g = env_lock();
        std::env::remove_var(env_key(ENV_X1));
        std::env::remove_var(env_key(ENV_X2));
        std::env::remove_var(env_key(ENV_PRECISION));
        let cfg = from_env().unwrap();
        assert!(cfg.validate().is_ok());
        assert_eq!(cfg.x1, DEFAULT_X1);
        assert_eq!(cfg.precision, Precision::F32);
    }

    #[test]
    fn from_env_overrides_with_env_vars() {
        let _g = env_lock();
        let key_x1 = env_key(ENV_X1);
        let key_precision = env_key(ENV_PRECISION);
        std::env::set_var(&key_x1, "-1.5");
        std::env::set_var(&key_precision, "f64");
        let cfg = from_env().unwrap();
        std::env::remove_var(key_x1);
        std::env::remove_var(key_precision);
        assert_eq!(cfg.x1, -1.5);
        assert_eq!(cfg.precision, Precision::F64);
    }

    #[test]
    fn from_env_returns_error_on_invalid_parse() {
        let _g = env_lock();
        let key = env_key(ENV_X2);
        std::env::set_var(&key, "not_a_number");
        let res = from_env();
        std::env::remove_var(key);
        assert!(matches!(res, Err(ConfigError::Parse { .. })));
    }

    #[test]
    fn from_env_rejects_unknown_precision() {
        let _g = env_lock();
        let key = env_key(ENV_PRECISION);
        std::env::set_var(&key, "f16");
        let res = from_env();
        std::env::remove_var(key);
        match res {
            Err(ConfigError::Parse { value, message, .. }) => {
                assert_eq!(value, "f16");
                assert!(message.contains("unknown precision"));
            }
            other => panic!("expected parse error, got {other:?}"),
        }
    }

    #[test]
    fn config_error_validation_display() {
        let e = ConfigError::Validation("x1 must be finite".to_string());
        assert!(e.to_string().contains("config validation"));
        assert!(e.to_string().contains("x1"));
        assert_eq!(e.message(), "x1 must be finite");
    }

    #[test]
    fn config_error_parse_display() {
        let e = ConfigError::Parse {
            key: "MICROGRAD_X1".to_string(),
            value: "abc".to_string(),
            message: "invalid float literal".to_string(),
        };
        assert!(e.to_string().contains("MICROGRAD_X1"));
        assert!(e.to_string().contains("abc"));
        assert_eq!(e.message(), "invalid float literal");
    }

    #[test]
    fn env_string_unset_returns_none() {
        let key = "MICROGRAD_UNLIKELY_KEY_12345";
        assert_eq!(env_string(key).unwrap(), None);
    }

    #[test]
    fn env_parsed_unset_returns_none() {
        let key = "MICROGRAD_UNLIKELY_KEY_67890";
        assert_eq!(env_parsed::<f64>(key).unwrap(), None);
    }

    #[test]
    fn env_parsed_trims_whitespace() {
        let _g = env_lock();
        let key = env_key(ENV_X1);
        std::env::set_var(&key, " 3.25 ");
        let res = env_parsed::<f64>(&key);
        std::env::remove_var(key);
        assert_eq!(res.unwrap(), Some(3.25));
    }
}
