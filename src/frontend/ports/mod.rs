//! Port contracts for NVMe controller lifecycle orchestration.

mod backend;
pub mod procedures;
mod repository;

#[cfg(test)]
pub use backend::MockBackendInvoker;
pub use backend::{BackendError, BackendInvoker, BackendResult};
pub use repository::{
    ControllerRepository, PageTokenRepository, RepositoryError, RepositoryResult,
    SubsystemRepository,
};
