//! Domain model for NVMe controller lifecycle management.
//!
//! Controllers are API resources keyed by resource name and owned by an NVMe
//! subsystem. The domain layer validates identifiers, update masks and page
//! windows; backend and storage concerns stay outside this boundary.

mod controller;
mod error;
mod field_mask;
mod ids;
mod pagination;
mod subsystem;

pub use controller::{
    NvmeController, NvmeControllerSpec, NvmeControllerStatus, PcieEndpoint, VolumeStats,
};
pub use error::FrontendDomainError;
pub use field_mask::FieldMask;
pub use ids::{PageToken, ResourceId, ResourceName, SubsystemKey};
pub use pagination::PageWindow;
pub use subsystem::NvmeSubsystem;
