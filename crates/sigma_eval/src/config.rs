//! Engine limits and tolerances.
//!
//! | Variable | Field |
//! |----------|-------|
//! | `SIGMA_EPSILON` | [`EngineConfig::epsilon`] |
//! | `SIGMA_NTHPRIME_LIMIT` | [`EngineConfig::nth_prime_limit`] |
//! | `SIGMA_FACTORIAL_LIMIT` | [`EngineConfig::factorial_limit`] |
//! | `SIGMA_FACTOR_ITERATIONS` | [`EngineConfig::factor_iterations`] |

use std::str::FromStr;

use sigma_gen::ops::MAX_POWER_BITS;

/// Default tolerance for inexact comparisons and `float2rational`.
pub const DEFAULT_EPSILON: f64 = 1e-12;

/// Configuration shared by every context.
///
/// `EngineConfig::default()` gives the built-in limits; `from_env` applies
/// `SIGMA_*` overrides on top of them.
#[derive(Debug, Clone, PartialEq)]
pub struct EngineConfig {
    /// Tolerance used by zero tests and `float2rational`.
    pub epsilon: f64,
    /// Largest `n` accepted by `nthprime`.
    pub nth_prime_limit: u64,
    /// Largest `n` accepted by `factorial`, and largest `k` in `perm`.
    pub factorial_limit: u64,
    /// Largest bit length an exact power may produce.
    pub max_power_bits: u64,
    /// Factorizations kept in the process-wide memo before it is flushed.
    pub factor_cache_capacity: usize,
    /// Pollard-Brent steps one factorization may spend before giving up.
    pub factor_iterations: u64,
}

impl Default for EngineConfig {
    fn default() -> Self {
        Self {
            epsilon: DEFAULT_EPSILON,
            nth_prime_limit: 1_000_000,
            factorial_limit: 100_000,
            max_power_bits: MAX_POWER_BITS,
            factor_cache_capacity: 4096,
            factor_iterations: 1_000_000,
        }
    }
}

impl EngineConfig {
    /// Defaults overridden by `SIGMA_EPSILON`, `SIGMA_NTHPRIME_LIMIT`,
    /// `SIGMA_FACTORIAL_LIMIT` and `SIGMA_FACTOR_ITERATIONS` when they are set
    /// and parse.
    pub fn from_env() -> Self {
        Self::from_lookup(|key| std::env::var(key).ok())
    }

    /// Same as `from_env`, reading variables through `lookup`.
    pub fn from_lookup(lookup: impl Fn(&str) -> Option<String>) -> Self {
        let mut config = Self::default();
        if let Some(eps) = read(&lookup, "SIGMA_EPSILON") {
            config = config.with_epsilon(eps);
        }
        if let Some(limit) = read(&lookup, "SIGMA_NTHPRIME_LIMIT") {
            config.nth_prime_limit = limit;
        }
        if let Some(limit) = read(&lookup, "SIGMA_FACTORIAL_LIMIT") {
            config.factorial_limit = limit;
        }
        if let Some(budget) = read(&lookup, "SIGMA_FACTOR_ITERATIONS") {
            config.factor_iterations = budget;
        }
        config
    }

    /// Set the tolerance. Anything not finite and positive falls back to
    /// `DEFAULT_EPSILON`.
    #[must_use]
    pub fn with_epsilon(mut self, epsilon: f64) -> Self {
        self.epsilon = sanitize_epsilon(epsilon);
        self
    }
}

pub(crate) fn sanitize_epsilon(epsilon: f64) -> f64 {
    if epsilon.is_finite() && epsilon > 0.0 {
        epsilon
    } else {
        DEFAULT_EPSILON
    }
}

fn read<T: FromStr>(lookup: &impl Fn(&str) -> Option<String>, key: &str) -> Option<T> {
    let raw = lookup(key)?;
    match raw.trim().parse() {
        Ok(value) => Some(value),
        Err(_) => {
            tracing::warn!(key, value = %raw, "ignoring unparsable configuration value");
            None
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn env_overrides_apply() {
        let config = EngineConfig::from_lookup(|key| match key {
            "SIGMA_EPSILON" => Some("1e-6".to_owned()),
            "SIGMA_NTHPRIME_LIMIT" => Some(" 1000 ".to_owned()),
            "SIGMA_FACTOR_ITERATIONS" => Some("250".to_owned()),
            _ => None,
        });
        assert_eq!(config.epsilon, 1e-6);
        assert_eq!(config.nth_prime_limit, 1000);
        assert_eq!(config.factor_iterations, 250);
        assert_eq!(config.factorial_limit, EngineConfig::default().factorial_limit);
    }

    #[test]
    fn bad_values_are_ignored() {
        let config = EngineConfig::from_lookup(|key| match key {
            "SIGMA_FACTORIAL_LIMIT" => Some("lots".to_owned()),
            "SIGMA_EPSILON" => Some("-1".to_owned()),
            _ => None,
        });
        assert_eq!(config, EngineConfig::default());
    }

    #[test]
    fn epsilon_is_sanitized() {
        assert_eq!(EngineConfig::default().with_epsilon(f64::NAN).epsilon, DEFAULT_EPSILON);
        assert_eq!(EngineConfig::default().with_epsilon(0.5).epsilon, 0.5);
    }
}
