//! Error types for tai_gokart_launch

use thiserror::Error;

#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum ResolveError {
    #[error("Package '{0}' not found. Ensure the package is installed and sourced.")]
    PackageNotFound(String),
}

#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum ConfigError {
    #[error("Node launch config field '{0}' must not be empty")]
    EmptyField(&'static str),

    #[error("Parameter file path must name at least one file below the share directory")]
    EmptyParamPath,

    #[error("Invalid parameter file path segment '{0}' (expected a relative name without '.' or '..')")]
    InvalidParamSegment(String),
}

#[derive(Error, Debug)]
pub enum ParamError {
    #[error("IO error: {0}")]
    IoError(#[from] std::io::Error),

    #[error("YAML parse error: {0}")]
    YamlError(#[from] serde_yaml::Error),
}

#[derive(Error, Debug)]
pub enum GenerationError {
    #[error("Resolution error: {0}")]
    Resolve(#[from] ResolveError),

    #[error("IO error: {0}")]
    IoError(#[from] std::io::Error),

    #[error("JSON error: {0}")]
    JsonError(#[from] serde_json::Error),
}

pub type Result<T> = std::result::Result<T, ResolveError>;
