use std::path::PathBuf;

use thiserror::Error;

/// Failure of a statistics aggregation.
///
/// Which upstream call broke is deliberately not part of the variant; the
/// cause is kept as the error source for logs only.
#[derive(Error, Debug)]
pub enum AnalysisError {
    #[error("'{0}' is not a valid GitHub username")]
    InvalidUsername(String),
    #[error("failed to fetch contribution statistics")]
    FetchFailed(#[source] anyhow::Error),
}

#[derive(Error, Debug)]
pub enum SessionError {
    #[error("could not access session file {path}: {source}")]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },
    #[error("session file {path} is corrupt: {source}")]
    Corrupt {
        path: PathBuf,
        #[source]
        source: serde_json::Error,
    },
    #[error("no platform configuration directory available")]
    NoConfigDir,
}

#[derive(Error, Debug, PartialEq)]
pub enum ConfigError {
    #[error("API URL must start with http:// or https://, got '{0}'")]
    InvalidApiUrl(String),
    #[error("request timeout must be greater than zero")]
    ZeroTimeout,
    #[error("{var} is not a valid number: '{value}'")]
    InvalidNumber { var: &'static str, value: String },
}
