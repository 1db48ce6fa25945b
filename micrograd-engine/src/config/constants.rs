//! Central place for all configuration constants.
//!
//! Default values and environment variable key names used by the config builder.

/// Environment variable prefix (e.g. `MICROGRAD_X1`).
pub(crate) const ENV_PREFIX: &str = "MICROGRAD_";

// --- Env key suffixes (full key = ENV_PREFIX + suffix) ---

pub(crate) const ENV_X1: &str = "X1";
pub(crate) const ENV_X2: &str = "X2";
pub(crate) const ENV_SEED_GRADIENT: &str = "SEED_GRADIENT";
pub(crate) const ENV_PRECISION: &str = "PRECISION";

// --- Default values ---

pub(crate) const DEFAULT_X1: f64 = 2.0;
pub(crate) const DEFAULT_X2: f64 = 4.0;
pub(crate) const DEFAULT_SEED_GRADIENT: f64 = 1.0;
