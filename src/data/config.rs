//! SimConfig loading from RON.

use bevy::prelude::*;
use std::fs;
use std::path::{Path, PathBuf};

use crate::shared::SimConfig;

pub const CONFIG_PATH: &str = "assets/sim_config.ron";

/// Where to read tunables from. `None` keeps whatever `SimConfig` already holds.
#[derive(Resource, Debug, Clone, PartialEq, Eq)]
pub struct ConfigFile(pub Option<PathBuf>);

impl Default for ConfigFile {
    fn default() -> Self {
        Self(Some(PathBuf::from(CONFIG_PATH)))
    }
}

#[derive(Debug, thiserror::Error)]
pub enum ConfigError {
    #[error("could not read config: {0}")]
    Io(#[from] std::io::Error),
    #[error("could not parse config: {0}")]
    Parse(#[from] ron::error::SpannedError),
}

/// Parse a config document. Missing fields keep their defaults.
pub fn parse_config(text: &str) -> Result<SimConfig, ConfigError> {
    Ok(ron::from_str(text)?)
}

pub fn load_config(path: impl AsRef<Path>) -> Result<SimConfig, ConfigError> {
    let text = fs::read_to_string(path)?;
    parse_config(&text)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_partial_config_keeps_defaults() {
        let config = parse_config("(max_thieves: 5, rng_seed: Some(42))").unwrap();
        assert_eq!(config.max_thieves, 5);
        assert_eq!(config.rng_seed, Some(42));
        assert_eq!(config.soil_price, SimConfig::default().soil_price);
        assert_eq!(config.steal_delay_ticks, 5);
    }

    #[test]
    fn test_empty_struct_is_default() {
        assert_eq!(parse_config("()").unwrap(), SimConfig::default());
    }

    #[test]
    fn test_malformed_config_is_parse_error() {
        let err = parse_config("(max_thieves: \"lots\")").unwrap_err();
        assert!(matches!(err, ConfigError::Parse(_)));
    }

    #[test]
    fn test_missing_file_is_io_error() {
        let err = load_config("definitely/not/here.ron").unwrap_err();
        match err {
            ConfigError::Io(io) => assert_eq!(io.kind(), std::io::ErrorKind::NotFound),
            other => panic!("expected io error, got {other:?}"),
        }
    }
}
