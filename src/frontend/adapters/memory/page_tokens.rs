//! In-memory pagination cursor table.

use crate::frontend::{
    domain::PageToken,
    ports::{PageTokenRepository, RepositoryError, RepositoryResult},
};
use async_trait::async_trait;
use std::collections::HashMap;
use std::sync::{Arc, RwLock};

/// Thread-safe map from page tokens to resume offsets.
///
/// Tokens are never consumed: a recorded token resolves to the same offset
/// for the life of the table, so a client may re-read a page. The table
/// grows by one entry per non-final page served.
#[derive(Debug, Clone, Default)]
pub struct InMemoryPageTokens {
    offsets: Arc<RwLock<HashMap<PageToken, usize>>>,
}

impl InMemoryPageTokens {
    /// Creates an empty cursor table.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }
}

#[async_trait]
impl PageTokenRepository for InMemoryPageTokens {
    async fn record(&self, token: &PageToken, offset: usize) -> RepositoryResult<()> {
        let mut offsets = self
            .offsets
            .write()
            .map_err(|err| RepositoryError::storage(std::io::Error::other(err.to_string())))?;
        offsets.insert(token.clone(), offset);
        Ok(())
    }

    async fn offset_for(&self, token: &PageToken) -> RepositoryResult<Option<usize>> {
        let offsets = self
            .offsets
            .read()
            .map_err(|err| RepositoryError::storage(std::io::Error::other(err.to_string())))?;
        Ok(offsets.get(token).copied())
    }
}
