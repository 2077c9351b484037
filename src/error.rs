//! Builder error types.

use thiserror::Error;

#[derive(Debug, Error)]
pub enum BuilderError {
    #[error("io error: {0}")]
    Io(#[from] std::io::Error),

    #[error("json error: {0}")]
    Json(#[from] serde_json::Error),

    #[error("invalid value for `{key}`: {reason}")]
    InvalidProperty { key: String, reason: String },

    #[error("unknown region: {0}")]
    UnknownRegion(String),

    #[error("unknown command: {0}")]
    UnknownCommand(String),

    #[error("usage: {0}")]
    Usage(&'static str),
}

pub type Result<T> = std::result::Result<T, BuilderError>;
