use std::path::PathBuf;

use thiserror::Error;

/// Top-level error type for the netlens library.
///
/// Line-level parse failures never show up here; scanners report them as
/// skipped lines. Only acquiring the input (or the config) can fail a run.
#[derive(Error, Debug)]
pub enum NetlensError {
    /// Input log could not be opened or read.
    #[error("cannot read '{}': {source}", path.display())]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },
    /// Output artifact could not be written.
    #[error("cannot write '{}': {source}", path.display())]
    Write {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },
    /// Invalid or unreadable configuration file.
    #[error("config: {0}")]
    Config(String),
    /// Serialization failure.
    #[error("serialize: {0}")]
    Serialize(String),
    /// Other error cases.
    #[error("other: {0}")]
    Other(String),
}

impl From<toml::de::Error> for NetlensError {
    fn from(err: toml::de::Error) -> Self {
        NetlensError::Config(err.to_string())
    }
}

#[cfg(feature = "json")]
impl From<serde_json::Error> for NetlensError {
    fn from(err: serde_json::Error) -> Self {
        NetlensError::Serialize(err.to_string())
    }
}
