use compact_str::CompactString;
use thiserror::Error;

use crate::client::ClientError;

pub type Result<T> = std::result::Result<T, AppError>;

#[derive(Debug, Error)]
pub enum AppError {
    #[error("Failure reading configuration file: {0}")]
    ConfigError(CompactString),
    #[error("Invalid configuration: {0}")]
    InvalidConfig(String),
    #[error(transparent)]
    Client(#[from] ClientError),
    #[error("{0}")]
    GeneralError(CompactString),
}

impl From<serde_json::Error> for AppError {
    fn from(e: serde_json::Error) -> Self {
        AppError::GeneralError(format!("Failed to render output: {e}").into())
    }
}
