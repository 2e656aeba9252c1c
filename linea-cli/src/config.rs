//! Driver settings from the environment

use std::env;
use linea_core::Dimension;
use linea_plugin::{EvalContext, DEFAULT_PRECISION};
use thiserror::Error;

pub const DIMENSION_VAR: &str = "LINEA_DIMENSION";
pub const PRECISION_VAR: &str = "LINEA_PRECISION";

#[derive(Debug, Error, PartialEq)]
pub enum ConfigError {
    #[error("LINEA_DIMENSION must be 2 or 3, got '{0}'")]
    InvalidDimension(String),
    #[error("LINEA_PRECISION must be a non-negative integer, got '{0}'")]
    InvalidPrecision(String),
}

/// Defaults applied to every request
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Settings {
    pub dimension: Dimension,
    pub precision: usize,
}

impl Default for Settings {
    fn default() -> Self {
        Self {
            dimension: Dimension::default(),
            precision: DEFAULT_PRECISION,
        }
    }
}

impl Settings {
    /// Read settings from the process environment
    pub fn from_env() -> Result<Self, ConfigError> {
        Self::from_lookup(|key| env::var(key).ok())
    }

    /// Read settings through `lookup`; unset keys keep their defaults
    pub fn from_lookup<F>(lookup: F) -> Result<Self, ConfigError>
    where
        F: Fn(&str) -> Option<String>,
    {
        let mut settings = Self::default();

        if let Some(raw) = lookup(DIMENSION_VAR) {
            settings.dimension = raw
                .parse()
                .map_err(|_| ConfigError::InvalidDimension(raw))?;
        }

        if let Some(raw) = lookup(PRECISION_VAR) {
            settings.precision = raw
                .trim()
                .parse()
                .map_err(|_| ConfigError::InvalidPrecision(raw))?;
        }

        Ok(settings)
    }

    pub fn context(&self) -> EvalContext {
        EvalContext::new()
            .with_dimension(self.dimension)
            .with_precision(self.precision)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::collections::HashMap;

    fn lookup(pairs: &[(&str, &str)]) -> impl Fn(&str) -> Option<String> {
        let map: HashMap<String, String> = pairs
            .iter()
            .map(|(k, v)| (k.to_string(), v.to_string()))
            .collect();
        move |key| map.get(key).cloned()
    }

    #[test]
    fn test_defaults() {
        let settings = Settings::from_lookup(lookup(&[])).unwrap();
        assert_eq!(settings, Settings::default());
        assert_eq!(settings.dimension, Dimension::Three);
        assert_eq!(settings.precision, 4);
    }

    #[test]
    fn test_overrides() {
        let settings = Settings::from_lookup(lookup(&[(DIMENSION_VAR, "2d"), (PRECISION_VAR, "6")])).unwrap();
        assert_eq!(settings.dimension, Dimension::Two);
        assert_eq!(settings.context().precision, 6);
    }

    #[test]
    fn test_invalid_values() {
        assert_eq!(
            Settings::from_lookup(lookup(&[(DIMENSION_VAR, "4")])),
            Err(ConfigError::InvalidDimension("4".to_string()))
        );
        assert!(matches!(
            Settings::from_lookup(lookup(&[(PRECISION_VAR, "-1")])),
            Err(ConfigError::InvalidPrecision(_))
        ));
    }
}
