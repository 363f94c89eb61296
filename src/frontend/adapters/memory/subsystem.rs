//! In-memory subsystem registry.

use crate::frontend::{
    domain::{NvmeSubsystem, SubsystemKey},
    ports::{RepositoryError, RepositoryResult, SubsystemRepository},
};
use async_trait::async_trait;
use std::collections::HashMap;
use std::sync::{Arc, RwLock};

/// In-memory stand-in for the external subsystem registry.
///
/// The controller frontend only reads subsystems; [`Self::insert`] and
/// [`Self::remove`] exist so callers and tests can shape the registry.
#[derive(Debug, Clone, Default)]
pub struct InMemorySubsystemRegistry {
    subsystems: Arc<RwLock<HashMap<SubsystemKey, NvmeSubsystem>>>,
}

impl InMemorySubsystemRegistry {
    /// Creates an empty registry.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Adds or replaces a subsystem.
    ///
    /// # Errors
    ///
    /// Returns [`RepositoryError::Storage`] when lock acquisition fails.
    pub fn insert(&self, subsystem: NvmeSubsystem) -> RepositoryResult<()> {
        let mut subsystems = self
            .subsystems
            .write()
            .map_err(|err| RepositoryError::storage(std::io::Error::other(err.to_string())))?;
        subsystems.insert(subsystem.key().clone(), subsystem);
        Ok(())
    }

    /// Removes a subsystem, leaving any controllers that reference it dangling.
    ///
    /// # Errors
    ///
    /// Returns [`RepositoryError::Storage`] when lock acquisition fails.
    pub fn remove(&self, key: &SubsystemKey) -> RepositoryResult<Option<NvmeSubsystem>> {
        let mut subsystems = self
            .subsystems
            .write()
            .map_err(|err| RepositoryError::storage(std::io::Error::other(err.to_string())))?;
        Ok(subsystems.remove(key))
    }
}

#[async_trait]
impl SubsystemRepository for InMemorySubsystemRegistry {
    async fn find(&self, key: &SubsystemKey) -> RepositoryResult<Option<NvmeSubsystem>> {
        let subsystems = self
            .subsystems
            .read()
            .map_err(|err| RepositoryError::storage(std::io::Error::other(err.to_string())))?;
        Ok(subsystems.get(key).cloned())
    }
}
