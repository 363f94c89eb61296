//! Application services for NVMe controller lifecycle operations.

mod lifecycle;
mod requests;

pub use lifecycle::{
    ControllerAction, ErrorCode, NvmeControllerService, NvmeControllerServiceError,
    NvmeControllerServiceResult,
};
pub use requests::{
    CreateNvmeControllerRequest, DeleteNvmeControllerRequest, GetNvmeControllerRequest,
    ListNvmeControllersRequest, ListNvmeControllersResponse, NvmeControllerStatsRequest,
    UpdateNvmeControllerRequest,
};
