//! Update masks for partial controller updates.

use super::{FrontendDomainError, NvmeControllerSpec};
use serde::{Deserialize, Serialize};

const WILDCARD: &str = "*";

/// Paths accepted by [`FieldMask::validate`].
const CONTROLLER_PATHS: &[&str] = &[
    "name",
    "spec",
    "spec.subsystem_id",
    "spec.pcie_id",
    "spec.pcie_id.port_id",
    "spec.pcie_id.physical_function",
    "spec.pcie_id.virtual_function",
    "spec.nvme_controller_id",
    "spec.max_nsq",
    "spec.max_ncq",
    "spec.sqes",
    "status",
    "status.active",
];

/// Set of field paths an update applies to.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct FieldMask {
    paths: Vec<String>,
}

impl FieldMask {
    /// Creates a mask from paths.
    #[must_use]
    pub fn new<I, S>(paths: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        Self {
            paths: paths.into_iter().map(Into::into).collect(),
        }
    }

    /// Mask replacing every field.
    #[must_use]
    pub fn wildcard() -> Self {
        Self::new([WILDCARD])
    }

    /// Returns whether the mask replaces the whole resource.
    #[must_use]
    pub fn is_full_replace(&self) -> bool {
        self.paths.is_empty() || self.paths.iter().any(|path| path == WILDCARD)
    }

    /// Checks every path against the controller shape.
    ///
    /// # Errors
    ///
    /// Returns [`FrontendDomainError::WildcardFieldMaskNotAlone`] when `*` is
    /// combined with other paths, or
    /// [`FrontendDomainError::InvalidFieldMaskPath`] for unknown paths.
    pub fn validate(&self) -> Result<(), FrontendDomainError> {
        if self.paths.len() > 1 && self.paths.iter().any(|path| path == WILDCARD) {
            return Err(FrontendDomainError::WildcardFieldMaskNotAlone);
        }

        match self
            .paths
            .iter()
            .find(|path| path.as_str() != WILDCARD && !CONTROLLER_PATHS.contains(&path.as_str()))
        {
            Some(path) => Err(FrontendDomainError::InvalidFieldMaskPath(path.clone())),
            None => Ok(()),
        }
    }

    /// Applies the masked fields of `incoming` onto `stored`.
    ///
    /// A full-replace mask yields `incoming` unchanged. Output-only paths
    /// (`name`, `status`) do not touch the spec.
    #[must_use]
    pub fn merge(&self, stored: &NvmeControllerSpec, incoming: &NvmeControllerSpec) -> NvmeControllerSpec {
        if self.is_full_replace() {
            return incoming.clone();
        }

        let mut merged = stored.clone();
        for path in &self.paths {
            match path.as_str() {
                "spec" => merged = incoming.clone(),
                "spec.subsystem_id" => merged.subsystem_id.clone_from(&incoming.subsystem_id),
                "spec.pcie_id" => merged.pcie_id = incoming.pcie_id,
                "spec.pcie_id.port_id" => merged.pcie_id.port_id = incoming.pcie_id.port_id,
                "spec.pcie_id.physical_function" => {
                    merged.pcie_id.physical_function = incoming.pcie_id.physical_function;
                }
                "spec.pcie_id.virtual_function" => {
                    merged.pcie_id.virtual_function = incoming.pcie_id.virtual_function;
                }
                "spec.nvme_controller_id" => {
                    merged.nvme_controller_id = incoming.nvme_controller_id;
                }
                "spec.max_nsq" => merged.max_nsq = incoming.max_nsq,
                "spec.max_ncq" => merged.max_ncq = incoming.max_ncq,
                "spec.sqes" => merged.sqes = incoming.sqes,
                _ => {}
            }
        }
        merged
    }
}
