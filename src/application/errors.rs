//! Application layer errors

use std::path::PathBuf;
use thiserror::Error;

/// Errors surfaced by the messaging-session collaborator
#[derive(Error, Debug)]
pub enum SessionError {
    #[error("network error: {0}")]
    Network(String),

    #[error("media upload rejected: {0}")]
    Upload(String),

    #[error("media download failed: {0}")]
    Download(String),

    #[error("group lookup failed: {0}")]
    Lookup(String),

    #[error("event sink rejected: {0}")]
    Sink(String),
}

/// Identity resolution errors
#[derive(Error, Debug)]
pub enum IdentityError {
    #[error("invalid identity {raw:?}: {reason}")]
    Parse { raw: String, reason: String },

    #[error("invalid identity {raw:?}: no user part")]
    MissingUser { raw: String },
}

/// Message composition errors
#[derive(Error, Debug)]
pub enum ComposeError {
    #[error("failed to read {}: {source}", path.display())]
    Read {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error(transparent)]
    Session(#[from] SessionError),
}

/// Inbound event projection errors
#[derive(Error, Debug)]
pub enum EventError {
    #[error("event carries no file")]
    MissingFile,

    #[error(transparent)]
    Session(#[from] SessionError),
}

/// Configuration errors
#[derive(Error, Debug)]
pub enum ConfigError {
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    #[error("parse error: {0}")]
    Parse(#[from] serde_yaml::Error),
}
