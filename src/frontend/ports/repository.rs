//! Registry ports for controllers, subsystems and pagination cursors.

use crate::frontend::domain::{
    NvmeController, NvmeSubsystem, PageToken, ResourceName, SubsystemKey,
};
use async_trait::async_trait;
use std::sync::Arc;
use thiserror::Error;

/// Result type for registry operations.
pub type RepositoryResult<T> = Result<T, RepositoryError>;

/// Keyed store of controller resources.
#[async_trait]
pub trait ControllerRepository: Send + Sync {
    /// Finds a controller by resource name.
    async fn find(&self, name: &ResourceName) -> RepositoryResult<Option<NvmeController>>;

    /// Inserts or replaces the controller stored under `name`.
    async fn store(&self, name: &ResourceName, controller: &NvmeController)
    -> RepositoryResult<()>;

    /// Removes the controller stored under `name`.
    ///
    /// Returns whether an entry was removed.
    async fn remove(&self, name: &ResourceName) -> RepositoryResult<bool>;
}

/// Read-only view of the subsystem registry.
#[async_trait]
pub trait SubsystemRepository: Send + Sync {
    /// Finds a subsystem by key.
    async fn find(&self, key: &SubsystemKey) -> RepositoryResult<Option<NvmeSubsystem>>;
}

/// Cursor table mapping page tokens to resume offsets.
#[async_trait]
pub trait PageTokenRepository: Send + Sync {
    /// Records the offset at which `token` resumes.
    async fn record(&self, token: &PageToken, offset: usize) -> RepositoryResult<()>;

    /// Returns the offset recorded for `token`.
    async fn offset_for(&self, token: &PageToken) -> RepositoryResult<Option<usize>>;
}

/// Errors returned by registry implementations.
#[derive(Debug, Clone, Error)]
pub enum RepositoryError {
    /// Storage-layer failure.
    #[error("registry storage error: {0}")]
    Storage(Arc<dyn std::error::Error + Send + Sync>),
}

impl RepositoryError {
    /// Wraps a storage-layer failure.
    pub fn storage(err: impl std::error::Error + Send + Sync + 'static) -> Self {
        Self::Storage(Arc::new(err))
    }
}
