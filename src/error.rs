use std::path::PathBuf;

use spot_separation::{ConfigError, ImageError};
use thiserror::Error;

/// Failure reading artwork or writing separation output.
#[derive(Debug, Error)]
pub enum ExportError {
    #[error("PNG decode error: {0}")]
    PngDecode(String),

    #[error("Unsupported PNG layout: {0}")]
    UnsupportedPng(String),

    #[error("PNG encode error: {0}")]
    PngEncode(String),

    #[error("Invalid image: {0}")]
    Image(#[from] ImageError),

    #[error("Report serialization error: {0}")]
    Report(#[from] serde_json::Error),

    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),
}

/// Failure loading a configuration file the user pointed at explicitly.
#[derive(Debug, Error)]
pub enum ConfigFileError {
    #[error("Failed to read config {path}: {source}")]
    Read {
        path: PathBuf,
        source: std::io::Error,
    },

    #[error("Failed to parse config {path}: {source}")]
    Parse {
        path: PathBuf,
        source: serde_yaml::Error,
    },

    #[error("Config file {0} already exists (use --force to overwrite)")]
    Exists(PathBuf),

    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),
}

/// Fatal failure of a `separate` run.
#[derive(Debug, Error)]
pub enum SeparateError {
    #[error("Invalid separation settings: {0}")]
    Config(#[from] ConfigError),

    #[error(transparent)]
    Export(#[from] ExportError),
}
