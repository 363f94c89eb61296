//! Request and response payloads for controller lifecycle operations.

use crate::frontend::domain::{FieldMask, FrontendDomainError, NvmeController};

fn require(value: &str, field: &'static str) -> Result<(), FrontendDomainError> {
    if value.is_empty() {
        return Err(FrontendDomainError::MissingRequiredField(field));
    }
    Ok(())
}

/// Request payload for creating a controller.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CreateNvmeControllerRequest {
    /// Desired controller; its `name` is ignored.
    pub nvme_controller: NvmeController,
    /// Client-chosen resource ID; a system ID is generated when absent.
    pub nvme_controller_id: Option<String>,
}

impl CreateNvmeControllerRequest {
    /// Creates a request with a system-generated ID.
    #[must_use]
    pub const fn new(nvme_controller: NvmeController) -> Self {
        Self {
            nvme_controller,
            nvme_controller_id: None,
        }
    }

    /// Requests a specific resource ID.
    #[must_use]
    pub fn with_id(mut self, nvme_controller_id: impl Into<String>) -> Self {
        self.nvme_controller_id = Some(nvme_controller_id.into());
        self
    }
}

/// Request payload for deleting a controller.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct DeleteNvmeControllerRequest {
    /// Resource name of the controller.
    pub name: String,
    /// Succeed without effect when the controller does not exist.
    pub allow_missing: bool,
}

impl DeleteNvmeControllerRequest {
    /// Creates a request that fails for missing controllers.
    #[must_use]
    pub fn new(name: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            allow_missing: false,
        }
    }

    /// Tolerates a missing controller.
    #[must_use]
    pub const fn allowing_missing(mut self) -> Self {
        self.allow_missing = true;
        self
    }

    pub(crate) fn validate_required(&self) -> Result<(), FrontendDomainError> {
        require(&self.name, "name")
    }
}

/// Request payload for updating a controller.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct UpdateNvmeControllerRequest {
    /// Controller carrying the new values, keyed by its `name`.
    pub nvme_controller: NvmeController,
    /// Fields to update; empty or `*` replaces the whole spec.
    pub update_mask: FieldMask,
    /// Accepted for API compatibility; missing controllers are not created.
    pub allow_missing: bool,
}

impl UpdateNvmeControllerRequest {
    /// Creates a whole-spec update.
    #[must_use]
    pub fn new(nvme_controller: NvmeController) -> Self {
        Self {
            nvme_controller,
            update_mask: FieldMask::default(),
            allow_missing: false,
        }
    }

    /// Restricts the update to `update_mask`.
    #[must_use]
    pub fn with_mask(mut self, update_mask: FieldMask) -> Self {
        self.update_mask = update_mask;
        self
    }

    pub(crate) fn validate_required(&self) -> Result<(), FrontendDomainError> {
        require(&self.nvme_controller.name, "nvme_controller.name")
    }
}

/// Request payload for listing the controllers of a subsystem.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ListNvmeControllersRequest {
    /// Key of the subsystem to list.
    pub parent: String,
    /// Requested page size; zero selects the default.
    pub page_size: i32,
    /// Token from a previous response; empty for the first page.
    pub page_token: String,
}

impl ListNvmeControllersRequest {
    /// Creates a first-page request with the default page size.
    #[must_use]
    pub fn new(parent: impl Into<String>) -> Self {
        Self {
            parent: parent.into(),
            ..Self::default()
        }
    }

    /// Sets the page size.
    #[must_use]
    pub const fn with_page_size(mut self, page_size: i32) -> Self {
        self.page_size = page_size;
        self
    }

    /// Continues from a previous page.
    #[must_use]
    pub fn with_page_token(mut self, page_token: impl Into<String>) -> Self {
        self.page_token = page_token.into();
        self
    }

    pub(crate) fn validate_required(&self) -> Result<(), FrontendDomainError> {
        require(&self.parent, "parent")
    }
}

/// One page of controllers.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ListNvmeControllersResponse {
    /// Controllers ordered by controller id.
    pub nvme_controllers: Vec<NvmeController>,
    /// Token for the next page; empty on the last page.
    pub next_page_token: String,
}

/// Request payload for fetching a controller.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct GetNvmeControllerRequest {
    /// Resource name of the controller.
    pub name: String,
}

impl GetNvmeControllerRequest {
    /// Creates a request.
    #[must_use]
    pub fn new(name: impl Into<String>) -> Self {
        Self { name: name.into() }
    }

    pub(crate) fn validate_required(&self) -> Result<(), FrontendDomainError> {
        require(&self.name, "name")
    }
}

/// Request payload for sampling controller statistics.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct NvmeControllerStatsRequest {
    /// Resource name of the controller.
    pub id: String,
}

impl NvmeControllerStatsRequest {
    /// Creates a request.
    #[must_use]
    pub fn new(id: impl Into<String>) -> Self {
        Self { id: id.into() }
    }

    pub(crate) fn validate_required(&self) -> Result<(), FrontendDomainError> {
        require(&self.id, "id")
    }
}
