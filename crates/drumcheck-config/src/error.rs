//! Error types for configuration operations.

use std::path::PathBuf;

use drumcheck_analysis::AnalysisError;
use thiserror::Error;

/// Errors from loading, saving or validating an [`AnalysisProfile`](crate::AnalysisProfile).
#[derive(Debug, Error)]
pub enum ConfigError {
    /// Profile file could not be read
    #[error("cannot read profile '{path}': {source}")]
    ReadFile {
        /// Profile path.
        path: PathBuf,
        /// I/O cause.
        #[source]
        source: std::io::Error,
    },

    /// Profile file could not be written
    #[error("cannot write profile '{path}': {source}")]
    WriteFile {
        /// Profile path.
        path: PathBuf,
        /// I/O cause.
        #[source]
        source: std::io::Error,
    },

    /// Config directory could not be created
    #[error("cannot create directory '{path}': {source}")]
    CreateDir {
        /// Directory path.
        path: PathBuf,
        /// I/O cause.
        #[source]
        source: std::io::Error,
    },

    /// Profile is not valid TOML or has wrongly typed fields
    #[error("malformed profile: {0}")]
    TomlParse(#[from] toml::de::Error),

    /// Profile could not be rendered as TOML
    #[error("cannot render profile: {0}")]
    TomlSerialize(#[from] toml::ser::Error),

    /// A profile field holds an unusable value
    #[error("invalid value for '{field}': {reason}")]
    InvalidField {
        /// Name of the offending field.
        field: &'static str,
        /// Description of why the value is invalid.
        reason: String,
    },

    /// A threshold was rejected by the analysis core
    #[error("invalid threshold: {0}")]
    Analysis(#[from] AnalysisError),
}

impl ConfigError {
    /// [`ConfigError::ReadFile`] for `path`.
    pub fn read_file(path: impl Into<PathBuf>, source: std::io::Error) -> Self {
        ConfigError::ReadFile {
            path: path.into(),
            source,
        }
    }

    /// [`ConfigError::WriteFile`] for `path`.
    pub fn write_file(path: impl Into<PathBuf>, source: std::io::Error) -> Self {
        ConfigError::WriteFile {
            path: path.into(),
            source,
        }
    }

    /// [`ConfigError::CreateDir`] for `path`.
    pub fn create_dir(path: impl Into<PathBuf>, source: std::io::Error) -> Self {
        ConfigError::CreateDir {
            path: path.into(),
            source,
        }
    }

    pub(crate) fn invalid(field: &'static str, reason: impl Into<String>) -> Self {
        ConfigError::InvalidField {
            field,
            reason: reason.into(),
        }
    }
}
