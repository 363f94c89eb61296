//! Backend command-execution port.

use async_trait::async_trait;
use serde_json::Value;
use std::sync::Arc;
use thiserror::Error;

/// Result type for backend invocations.
pub type BackendResult<T> = Result<T, BackendError>;

/// Channel executing named backend procedures.
///
/// Application-level failures are reported through the `status` field of
/// the returned result; `Err` is reserved for calls that did not complete.
#[cfg_attr(test, mockall::automock)]
#[async_trait]
pub trait BackendInvoker: Send + Sync {
    /// Invokes `procedure` with JSON parameters and returns the JSON result.
    async fn call(&self, procedure: &str, params: Value) -> BackendResult<Value>;
}

/// Errors raised when a backend call fails to complete.
#[derive(Debug, Clone, Error)]
pub enum BackendError {
    /// The channel to the backend failed.
    #[error("backend transport error: {0}")]
    Transport(Arc<dyn std::error::Error + Send + Sync>),

    /// Parameters or results could not be encoded or decoded.
    #[error("backend serialization error: {0}")]
    Serialization(Arc<dyn std::error::Error + Send + Sync>),

    /// The backend does not implement the procedure.
    #[error("unknown backend procedure: {0}")]
    UnknownProcedure(String),
}

impl BackendError {
    /// Wraps a transport failure.
    pub fn transport(err: impl std::error::Error + Send + Sync + 'static) -> Self {
        Self::Transport(Arc::new(err))
    }

    /// Wraps an encoding or decoding failure.
    pub fn serialization(err: impl std::error::Error + Send + Sync + 'static) -> Self {
        Self::Serialization(Arc::new(err))
    }
}
