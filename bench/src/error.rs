use thiserror::Error;
use tokio::io;

/// Outcome of a single remote call that did not succeed.
///
/// Timeouts are expected under load and only counted, everything else stops
/// the worker that issued the call.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum OperationError {
    #[error("Operation timed out")]
    Timeout,
    #[error("{0}")]
    Other(String),
}

#[derive(Debug, Error)]
pub enum HammerError {
    #[error("IO error: {0}")]
    IoError(#[from] io::Error),
    #[error("Cannot load configuration: {0}")]
    CannotLoadConfiguration(String),
    #[error("Invalid configuration: {0}")]
    InvalidConfiguration(String),
    #[error("Cannot serialize settings: {0}")]
    CannotSerializeSettings(#[from] toml::ser::Error),
    #[error("Invalid server URL: {0}")]
    InvalidServerUrl(String),
    #[error("Cannot open session: {0}")]
    CannotOpenSession(String),
    #[error("Operation '{operation}' failed: {source}")]
    OperationFailed {
        operation: String,
        source: OperationError,
    },
    #[error("Time-series log is still held by the sampler")]
    LogStillShared,
    #[error("Worker task aborted: {0}")]
    WorkerAborted(#[from] tokio::task::JoinError),
    #[error("Run stopped before reaching {target} inserts ({completed} completed)")]
    RunIncomplete { target: u64, completed: u64 },
}

impl HammerError {
    pub fn operation_failed(operation: &str, source: OperationError) -> Self {
        HammerError::OperationFailed {
            operation: operation.to_owned(),
            source,
        }
    }

    /// Stable variant name used when listing failures.
    pub fn kind(&self) -> &'static str {
        match self {
            HammerError::IoError(_) => "IoError",
            HammerError::CannotLoadConfiguration(_) => "CannotLoadConfiguration",
            HammerError::InvalidConfiguration(_) => "InvalidConfiguration",
            HammerError::CannotSerializeSettings(_) => "CannotSerializeSettings",
            HammerError::InvalidServerUrl(_) => "InvalidServerUrl",
            HammerError::CannotOpenSession(_) => "CannotOpenSession",
            HammerError::OperationFailed { .. } => "OperationFailed",
            HammerError::LogStillShared => "LogStillShared",
            HammerError::WorkerAborted(_) => "WorkerAborted",
            HammerError::RunIncomplete { .. } => "RunIncomplete",
        }
    }
}
