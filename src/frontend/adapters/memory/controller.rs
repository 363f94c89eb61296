//! In-memory controller registry.

use crate::frontend::{
    domain::{NvmeController, ResourceName},
    ports::{ControllerRepository, RepositoryError, RepositoryResult},
};
use async_trait::async_trait;
use std::collections::BTreeMap;
use std::sync::{Arc, RwLock};

/// Thread-safe in-memory controller registry.
#[derive(Debug, Clone, Default)]
pub struct InMemoryControllerRegistry {
    controllers: Arc<RwLock<BTreeMap<ResourceName, NvmeController>>>,
}

impl InMemoryControllerRegistry {
    /// Creates an empty registry.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Returns the number of registered controllers.
    ///
    /// # Errors
    ///
    /// Returns [`RepositoryError::Storage`] when lock acquisition fails.
    pub fn len(&self) -> RepositoryResult<usize> {
        Ok(self.controllers.read().map_err(poisoned)?.len())
    }

    /// Returns whether no controller is registered.
    ///
    /// # Errors
    ///
    /// Returns [`RepositoryError::Storage`] when lock acquisition fails.
    pub fn is_empty(&self) -> RepositoryResult<bool> {
        Ok(self.len()? == 0)
    }
}

fn poisoned(err: impl ToString) -> RepositoryError {
    RepositoryError::storage(std::io::Error::other(err.to_string()))
}

#[async_trait]
impl ControllerRepository for InMemoryControllerRegistry {
    async fn find(&self, name: &ResourceName) -> RepositoryResult<Option<NvmeController>> {
        let controllers = self.controllers.read().map_err(poisoned)?;
        Ok(controllers.get(name).cloned())
    }

    async fn store(
        &self,
        name: &ResourceName,
        controller: &NvmeController,
    ) -> RepositoryResult<()> {
        let mut controllers = self.controllers.write().map_err(poisoned)?;
        controllers.insert(name.clone(), controller.clone());
        Ok(())
    }

    async fn remove(&self, name: &ResourceName) -> RepositoryResult<bool> {
        let mut controllers = self.controllers.write().map_err(poisoned)?;
        Ok(controllers.remove(name).is_some())
    }
}
