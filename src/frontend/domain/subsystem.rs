//! NVMe subsystem as seen by the controller frontend.

use super::SubsystemKey;
use serde::{Deserialize, Serialize};

/// NVMe subsystem owned by the external subsystem registry.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct NvmeSubsystem {
    key: SubsystemKey,
    nqn: String,
}

impl NvmeSubsystem {
    /// Creates a subsystem entry.
    #[must_use]
    pub fn new(key: SubsystemKey, nqn: impl Into<String>) -> Self {
        Self {
            key,
            nqn: nqn.into(),
        }
    }

    /// Returns the registry key.
    #[must_use]
    pub const fn key(&self) -> &SubsystemKey {
        &self.key
    }

    /// Returns the NVMe qualified name passed to the backend.
    #[must_use]
    pub fn nqn(&self) -> &str {
        &self.nqn
    }
}
