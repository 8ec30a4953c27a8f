use thiserror::Error;

use crate::common::error::SwatflowError::GenericError;

#[derive(Debug, Error)]
pub enum SwatflowError {
    #[error(transparent)]
    IoError(#[from] std::io::Error),
    #[error("Deserialization error: {0}")]
    DeserializationError(String),
    #[error("Command `{command}` failed with exit code {code}\nStderr: {stderr}\nStdout: {stdout}")]
    CommandError {
        command: String,
        code: i32,
        stderr: String,
        stdout: String,
    },
    #[error("Invalid workflow state: {0}")]
    StateError(String),
    #[error("Error: {0}")]
    GenericError(String),
}

impl From<anyhow::Error> for SwatflowError {
    fn from(error: anyhow::Error) -> Self {
        Self::GenericError(format!("{error:?}"))
    }
}

impl From<toml::de::Error> for SwatflowError {
    fn from(error: toml::de::Error) -> Self {
        Self::DeserializationError(error.to_string())
    }
}

pub fn error<T>(message: String) -> crate::Result<T> {
    Err(GenericError(message))
}
