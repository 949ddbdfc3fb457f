#![allow(clippy::type_complexity)]

use serde::Deserialize;
use thiserror::Error;

pub mod core;

/// Errors surfaced while building or shipping a partitioner.
///
/// Empty inputs and low candidate diversity are not errors; they just
/// produce a partitioner with fewer buckets.
#[derive(Debug, Error)]
pub enum Error {
    #[error("invalid argument: {0}")]
    InvalidArgument(String),

    #[error("upstream failure: {0}")]
    Upstream(String),

    #[error("failed to encode partitioner: {0}")]
    Encode(#[from] rmp_serde::encode::Error),

    #[error("failed to decode partitioner: {0}")]
    Decode(#[from] rmp_serde::decode::Error),
}

pub type Result<T> = std::result::Result<T, Error>;

/// Sampling and selection knobs. Every field has a usable default; embedders
/// can layer a TOML fragment on top with [`Config::from_toml`].
#[derive(Clone, Debug, Deserialize)]
#[serde(default)]
pub struct Config {
    /// Bucket count for the hash fallback of default-partitioner selection.
    /// When unset, the widest input's partition count is used instead.
    pub default_parallelism: Option<usize>,
    /// Hard cap on the number of keys sampled back to the coordinator.
    pub sample_size_cap: u64,
    /// Keys sampled per requested bucket, before the cap.
    pub sample_size_multiplier: usize,
    /// Per-partition over-sampling factor, hedging against imbalance.
    pub over_sample_factor: f64,
}

impl Default for Config {
    fn default() -> Self {
        Self {
            default_parallelism: None,
            sample_size_cap: 1_000_000,
            sample_size_multiplier: 20,
            over_sample_factor: 3.0,
        }
    }
}

impl Config {
    pub fn from_toml(raw: &str) -> Result<Config> {
        let config: Config =
            toml::from_str(raw).map_err(|e| Error::InvalidArgument(e.to_string()))?;
        config.validate()?;
        Ok(config)
    }

    pub fn validate(&self) -> Result<()> {
        if self.default_parallelism == Some(0) {
            return Err(Error::InvalidArgument(
                "default_parallelism must be at least 1".to_string(),
            ));
        }
        if self.sample_size_multiplier == 0 {
            return Err(Error::InvalidArgument(
                "sample_size_multiplier must be at least 1".to_string(),
            ));
        }
        if !self.over_sample_factor.is_finite() || self.over_sample_factor < 1.0 {
            return Err(Error::InvalidArgument(format!(
                "over_sample_factor must be a finite value >= 1, got {}",
                self.over_sample_factor
            )));
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn config_defaults() {
        let config = Config::default();
        assert_eq!(config.default_parallelism, None);
        assert_eq!(config.sample_size_cap, 1_000_000);
        assert_eq!(config.sample_size_multiplier, 20);
        assert_eq!(config.over_sample_factor, 3.0);
        assert!(config.validate().is_ok());
    }

    #[test]
    fn config_from_partial_toml() {
        let config = Config::from_toml("sample_size_multiplier = 100\n").unwrap();
        assert_eq!(config.sample_size_multiplier, 100);
        // untouched fields keep their defaults
        assert_eq!(config.sample_size_cap, 1_000_000);
        assert_eq!(config.over_sample_factor, 3.0);
    }

    #[test]
    fn config_rejects_nonsense() {
        assert!(Config::from_toml("default_parallelism = 0\n").is_err());
        assert!(Config::from_toml("sample_size_multiplier = 0\n").is_err());
        assert!(Config::from_toml("over_sample_factor = 0.5\n").is_err());
        assert!(Config::from_toml("over_sample_factor = inf\n").is_err());
        assert!(Config::from_toml("not toml at all [").is_err());
    }
}
