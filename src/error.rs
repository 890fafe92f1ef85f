use std::io;
use std::path::PathBuf;

use thiserror::Error;

use crate::scene::Scene;

#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("{name} must not be negative (got {value})")]
    Negative { name: &'static str, value: f64 },

    #[error("{name} must be a positive finite number (got {value})")]
    NotPositive { name: &'static str, value: f64 },

    #[error("failed to read config file {}: {source}", path.display())]
    Io {
        path: PathBuf,
        #[source]
        source: io::Error,
    },

    #[error("invalid config: {0}")]
    Parse(#[from] toml::de::Error),
}

#[derive(Clone, Copy, Debug, Error, PartialEq, Eq)]
pub enum SceneError {
    #[error("cannot switch from {from:?} to {to:?}")]
    InvalidTransition { from: Scene, to: Scene },
}

pub type ConfigResult<T> = Result<T, ConfigError>;
