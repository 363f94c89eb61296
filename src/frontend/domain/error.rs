//! Error types for NVMe frontend domain validation.

use thiserror::Error;

/// Errors returned while validating frontend requests and domain values.
#[derive(Debug, Clone, Error, PartialEq, Eq)]
pub enum FrontendDomainError {
    /// A field marked as required by the API was left empty.
    #[error("missing required field: {0}")]
    MissingRequiredField(&'static str),

    /// The controller spec does not reference a subsystem.
    #[error("invalid input subsystem parameters")]
    EmptySubsystemReference,

    /// A client-supplied resource ID is not user settable.
    #[error("invalid resource ID '{id}': {reason}")]
    InvalidResourceId {
        /// Rejected identifier.
        id: String,
        /// Human-readable rejection reason.
        reason: String,
    },

    /// A resource name does not follow the resource-name format.
    #[error("invalid resource name '{name}': {reason}")]
    InvalidResourceName {
        /// Rejected name.
        name: String,
        /// Human-readable rejection reason.
        reason: String,
    },

    /// An update mask names a path the controller does not have.
    #[error("invalid field path in update mask: {0}")]
    InvalidFieldMaskPath(String),

    /// The wildcard path was combined with other paths.
    #[error("update mask wildcard '*' must be the only path")]
    WildcardFieldMaskNotAlone,

    /// Negative page sizes are rejected.
    #[error("negative page size is not allowed: {0}")]
    NegativePageSize(i32),

    /// Controllers cannot move between subsystems.
    #[error("controller {name} cannot move from subsystem {from} to {to}")]
    SubsystemReparent {
        /// Controller resource name.
        name: String,
        /// Subsystem the controller belongs to.
        from: String,
        /// Subsystem requested by the update.
        to: String,
    },
}

impl FrontendDomainError {
    pub(crate) fn invalid_resource_id(id: &str, reason: impl Into<String>) -> Self {
        Self::InvalidResourceId {
            id: id.to_owned(),
            reason: reason.into(),
        }
    }

    pub(crate) fn invalid_resource_name(name: &str, reason: impl Into<String>) -> Self {
        Self::InvalidResourceName {
            name: name.to_owned(),
            reason: reason.into(),
        }
    }
}
