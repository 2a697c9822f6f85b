//! Control plane error types

use std::time::Duration;
use thiserror::Error;

#[derive(Error, Debug)]
pub enum ControlPlaneError {
    #[error(
        "kubectl not found. Please install kubectl or point KUBECTL_BINARY at the binary to use"
    )]
    KubectlNotFound,

    #[error("kubectl command failed: {0}")]
    CommandFailed(String),

    #[error("kubectl command timed out after {0:?}")]
    Timeout(Duration),

    #[error("JSON parse error: {0}")]
    JsonError(#[from] serde_json::Error),

    #[error("IO error: {0}")]
    IoError(#[from] std::io::Error),
}

pub type Result<T> = std::result::Result<T, ControlPlaneError>;
