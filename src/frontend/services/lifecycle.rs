//! Service layer for NVMe controller lifecycle orchestration.

use super::requests::{
    CreateNvmeControllerRequest, DeleteNvmeControllerRequest, GetNvmeControllerRequest,
    ListNvmeControllersRequest, ListNvmeControllersResponse, NvmeControllerStatsRequest,
    UpdateNvmeControllerRequest,
};
use crate::frontend::{
    config::FrontendConfig,
    domain::{
        FrontendDomainError, NvmeController, NvmeControllerSpec, NvmeControllerStatus,
        NvmeSubsystem, PageToken, PageWindow, ResourceId, ResourceName, SubsystemKey,
        VolumeStats,
    },
    ports::{
        BackendError, BackendInvoker, ControllerRepository, PageTokenRepository,
        RepositoryError, SubsystemRepository,
        procedures::{
            BackendStatus, ControllerInfoParams, ControllerListParams, ControllerStatsParams,
            ControllerStatsResult, CreateControllerParams, FORCE_REMOVE, RemoveControllerParams,
            invoke,
        },
    },
};
use std::fmt;
use std::sync::Arc;
use thiserror::Error;
use tokio::sync::Mutex;
use tracing::{debug, info, warn};

/// API status code reported for a failed operation.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum ErrorCode {
    /// The request was malformed or the backend rejected it.
    InvalidArgument,
    /// A referenced resource does not exist.
    NotFound,
    /// The backend could not be reached.
    Unavailable,
    /// Local storage failed.
    Internal,
}

/// Operation named in backend rejection messages.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum ControllerAction {
    /// Create.
    Create,
    /// Update.
    Update,
    /// Delete.
    Delete,
    /// List.
    List,
    /// Get.
    Get,
    /// Stats.
    Stats,
}

impl ControllerAction {
    /// Returns the verb used in messages.
    #[must_use]
    pub const fn as_str(self) -> &'static str {
        match self {
            Self::Create => "create",
            Self::Update => "update",
            Self::Delete => "delete",
            Self::List => "list",
            Self::Get => "get",
            Self::Stats => "stats",
        }
    }
}

impl fmt::Display for ControllerAction {
    fn fmt(&self, formatter: &mut fmt::Formatter<'_>) -> fmt::Result {
        formatter.write_str(self.as_str())
    }
}

/// Service-level errors for controller lifecycle operations.
#[derive(Debug, Error)]
pub enum NvmeControllerServiceError {
    /// Request validation failed.
    #[error(transparent)]
    Domain(#[from] FrontendDomainError),
    /// No controller is registered under the name.
    #[error("unable to find controller {0}")]
    ControllerNotFound(String),
    /// The referenced subsystem does not exist.
    #[error("unable to find subsystem {0}")]
    SubsystemNotFound(String),
    /// The page token was never issued.
    #[error("unable to find pagination token {0}")]
    PageTokenNotFound(String),
    /// The backend completed the call with a non-zero status.
    #[error("could not {action} controller {resource}: backend status {status}")]
    BackendStatus {
        /// Operation that failed.
        action: ControllerAction,
        /// Controller name, or subsystem key for list.
        resource: String,
        /// Status reported by the backend.
        status: i64,
    },
    /// The backend call did not complete.
    #[error(transparent)]
    Backend(#[from] BackendError),
    /// Registry access failed.
    #[error(transparent)]
    Repository(#[from] RepositoryError),
}

impl NvmeControllerServiceError {
    /// Returns the API status code for this error.
    #[must_use]
    pub const fn code(&self) -> ErrorCode {
        match self {
            Self::Domain(_) | Self::BackendStatus { .. } => ErrorCode::InvalidArgument,
            Self::ControllerNotFound(_)
            | Self::SubsystemNotFound(_)
            | Self::PageTokenNotFound(_) => ErrorCode::NotFound,
            Self::Backend(_) => ErrorCode::Unavailable,
            Self::Repository(_) => ErrorCode::Internal,
        }
    }
}

/// Result type for controller lifecycle operations.
pub type NvmeControllerServiceResult<T> = Result<T, NvmeControllerServiceError>;

/// NVMe controller lifecycle orchestration service.
///
/// Every operation holds a single service-wide lock from request validation
/// until the registry reflects the backend outcome, so the registry and the
/// backend never observe interleaved operations. Clones share the lock.
pub struct NvmeControllerService<C, S, P, B>
where
    C: ControllerRepository,
    S: SubsystemRepository,
    P: PageTokenRepository,
    B: BackendInvoker + ?Sized,
{
    controllers: Arc<C>,
    subsystems: Arc<S>,
    page_tokens: Arc<P>,
    backend: Arc<B>,
    config: FrontendConfig,
    operation_lock: Arc<Mutex<()>>,
}

impl<C, S, P, B> Clone for NvmeControllerService<C, S, P, B>
where
    C: ControllerRepository,
    S: SubsystemRepository,
    P: PageTokenRepository,
    B: BackendInvoker + ?Sized,
{
    fn clone(&self) -> Self {
        Self {
            controllers: Arc::clone(&self.controllers),
            subsystems: Arc::clone(&self.subsystems),
            page_tokens: Arc::clone(&self.page_tokens),
            backend: Arc::clone(&self.backend),
            config: self.config.clone(),
            operation_lock: Arc::clone(&self.operation_lock),
        }
    }
}

#[expect(
    clippy::cast_possible_truncation,
    reason = "API integers are 32-bit; wider backend values are truncated"
)]
const fn api_int(value: i64) -> i32 {
    value as i32
}

fn volume_stats(result: &ControllerStatsResult) -> VolumeStats {
    VolumeStats {
        read_bytes_count: api_int(result.num_read_bytes),
        read_ops_count: api_int(result.num_read_cmds),
        write_bytes_count: api_int(result.num_write_bytes),
        write_ops_count: api_int(result.num_write_cmds),
        read_latency_ticks: api_int(result.total_read_latency_in_us),
        write_latency_ticks: api_int(result.total_write_latency_in_us),
    }
}

fn create_params(subsystem: &NvmeSubsystem, spec: &NvmeControllerSpec) -> CreateControllerParams {
    CreateControllerParams {
        subnqn: subsystem.nqn().to_owned(),
        pcie_domain_id: i64::from(spec.pcie_id.port_id),
        pf_id: i64::from(spec.pcie_id.physical_function),
        vf_id: i64::from(spec.pcie_id.virtual_function),
        ctrlr_id: i64::from(spec.nvme_controller_id),
        max_nsq: i64::from(spec.max_nsq),
        max_ncq: i64::from(spec.max_ncq),
        mqes: i64::from(spec.sqes),
    }
}

fn ensure_success(
    result: &impl BackendStatus,
    action: ControllerAction,
    resource: &str,
) -> NvmeControllerServiceResult<()> {
    if result.is_success() {
        return Ok(());
    }
    let error = NvmeControllerServiceError::BackendStatus {
        action,
        resource: resource.to_owned(),
        status: result.status(),
    };
    warn!(%error, "backend rejected controller operation");
    Err(error)
}

fn log_transport_error(err: &BackendError) {
    warn!(error = %err, "backend call failed");
}

impl<C, S, P, B> NvmeControllerService<C, S, P, B>
where
    C: ControllerRepository,
    S: SubsystemRepository,
    P: PageTokenRepository,
    B: BackendInvoker + ?Sized,
{
    /// Creates a service with the default configuration.
    #[must_use]
    pub fn new(controllers: Arc<C>, subsystems: Arc<S>, page_tokens: Arc<P>, backend: Arc<B>) -> Self {
        Self {
            controllers,
            subsystems,
            page_tokens,
            backend,
            config: FrontendConfig::default(),
            operation_lock: Arc::new(Mutex::new(())),
        }
    }

    /// Replaces the configuration.
    #[must_use]
    pub fn with_config(mut self, config: FrontendConfig) -> Self {
        self.config = config;
        self
    }

    /// Returns the active configuration.
    #[must_use]
    pub const fn config(&self) -> &FrontendConfig {
        &self.config
    }

    async fn resolve_subsystem(&self, reference: &str) -> NvmeControllerServiceResult<NvmeSubsystem> {
        let key = SubsystemKey::new(reference)?;
        self.subsystems.find(&key).await?.ok_or_else(|| {
            warn!(subsystem = %key, "subsystem not found");
            NvmeControllerServiceError::SubsystemNotFound(key.to_string())
        })
    }

    async fn find_controller_or_error(
        &self,
        name: &ResourceName,
    ) -> NvmeControllerServiceResult<NvmeController> {
        self.controllers.find(name).await?.ok_or_else(|| {
            warn!(controller = %name, "controller not found");
            NvmeControllerServiceError::ControllerNotFound(name.to_string())
        })
    }

    async fn resolve_page(
        &self,
        page_size: i32,
        page_token: &str,
    ) -> NvmeControllerServiceResult<PageWindow> {
        let size = PageWindow::resolve_size(
            page_size,
            self.config.default_page_size,
            self.config.max_page_size,
        )?;
        if page_token.is_empty() {
            return Ok(PageWindow::new(0, size));
        }

        let offset = self
            .page_tokens
            .offset_for(&PageToken::from_client(page_token))
            .await?
            .ok_or_else(|| NvmeControllerServiceError::PageTokenNotFound(page_token.to_owned()))?;
        debug!(offset, page_token, "resuming list from pagination token");
        Ok(PageWindow::new(offset, size))
    }

    /// Creates a controller on the backend and registers it.
    ///
    /// A repeated create resolving to an existing name returns the stored
    /// controller without contacting the backend.
    ///
    /// # Errors
    ///
    /// Returns [`NvmeControllerServiceError::Domain`] for an empty subsystem
    /// reference or an invalid ID,
    /// [`NvmeControllerServiceError::SubsystemNotFound`] when the subsystem
    /// does not exist, [`NvmeControllerServiceError::BackendStatus`] when the
    /// backend rejects the call, and backend or registry errors.
    pub async fn create(
        &self,
        request: CreateNvmeControllerRequest,
    ) -> NvmeControllerServiceResult<NvmeController> {
        let _guard = self.operation_lock.lock().await;
        debug!(?request, "create controller request received");
        let CreateNvmeControllerRequest {
            nvme_controller,
            nvme_controller_id,
        } = request;

        if nvme_controller.spec.subsystem_id.trim().is_empty() {
            return Err(FrontendDomainError::EmptySubsystemReference.into());
        }

        let resource_id = match nvme_controller_id.filter(|id| !id.is_empty()) {
            Some(requested) => {
                let validated = ResourceId::user_settable(requested)?;
                if !nvme_controller.name.is_empty() {
                    debug!(
                        id = %validated,
                        ignored_name = %nvme_controller.name,
                        "client provided a resource ID, ignoring the name field"
                    );
                }
                validated
            }
            None => ResourceId::system_generated(),
        };
        let name = ResourceName::from_id(&self.config.resource_prefix, &resource_id);

        if let Some(existing) = self.controllers.find(&name).await? {
            info!(controller = %name, "controller already exists");
            return Ok(existing);
        }

        let subsystem = self.resolve_subsystem(&nvme_controller.spec.subsystem_id).await?;
        let result = invoke(&*self.backend, &create_params(&subsystem, &nvme_controller.spec))
            .await
            .inspect_err(log_transport_error)?;
        debug!(?result, "received create reply from backend");
        ensure_success(&result, ControllerAction::Create, name.as_str())?;

        let mut response = nvme_controller;
        response.name = name.to_string();
        response.spec.nvme_controller_id = api_int(result.ctrlr_id);
        response.status = NvmeControllerStatus::active();
        self.controllers.store(&name, &response).await?;
        info!(
            controller = %name,
            nvme_controller_id = response.spec.nvme_controller_id,
            "created controller"
        );
        Ok(response)
    }

    /// Removes a controller from the backend and the registry.
    ///
    /// # Errors
    ///
    /// Returns [`NvmeControllerServiceError::ControllerNotFound`] when the
    /// controller does not exist and `allow_missing` is unset,
    /// [`NvmeControllerServiceError::SubsystemNotFound`] when its subsystem
    /// is gone, [`NvmeControllerServiceError::BackendStatus`] when the
    /// backend rejects the removal, and validation, backend or registry
    /// errors.
    pub async fn delete(
        &self,
        request: DeleteNvmeControllerRequest,
    ) -> NvmeControllerServiceResult<()> {
        let _guard = self.operation_lock.lock().await;
        debug!(?request, "delete controller request received");
        request.validate_required()?;
        let name = ResourceName::parse(request.name)?;

        let Some(controller) = self.controllers.find(&name).await? else {
            if request.allow_missing {
                debug!(controller = %name, "controller already absent");
                return Ok(());
            }
            warn!(controller = %name, "controller not found");
            return Err(NvmeControllerServiceError::ControllerNotFound(name.to_string()));
        };

        let subsystem = self.resolve_subsystem(&controller.spec.subsystem_id).await?;
        let params = RemoveControllerParams {
            subnqn: subsystem.nqn().to_owned(),
            ctrlr_id: i64::from(controller.spec.nvme_controller_id),
            force: FORCE_REMOVE,
        };
        let result = invoke(&*self.backend, &params)
            .await
            .inspect_err(log_transport_error)?;
        debug!(?result, "received remove reply from backend");
        ensure_success(&result, ControllerAction::Delete, name.as_str())?;

        self.controllers.remove(&name).await?;
        info!(controller = %name, "deleted controller");
        Ok(())
    }

    /// Reapplies a controller configuration on the backend.
    ///
    /// Fields named by the update mask are copied from the request onto the
    /// stored spec; an empty mask or `*` replaces the whole spec. A request
    /// controller id of zero keeps the stored id. Missing controllers are
    /// never created, whatever `allow_missing` says.
    ///
    /// # Errors
    ///
    /// Returns [`NvmeControllerServiceError::ControllerNotFound`] when the
    /// controller does not exist,
    /// [`NvmeControllerServiceError::Domain`] for invalid names, masks or an
    /// attempt to change subsystem,
    /// [`NvmeControllerServiceError::SubsystemNotFound`] when the merged spec
    /// names no subsystem or one that does not exist,
    /// [`NvmeControllerServiceError::BackendStatus`] when the backend rejects
    /// the call, and backend or registry errors.
    pub async fn update(
        &self,
        request: UpdateNvmeControllerRequest,
    ) -> NvmeControllerServiceResult<NvmeController> {
        let _guard = self.operation_lock.lock().await;
        debug!(?request, "update controller request received");
        request.validate_required()?;
        let UpdateNvmeControllerRequest {
            nvme_controller,
            update_mask,
            allow_missing,
        } = request;
        let name = ResourceName::parse(nvme_controller.name)?;

        let Some(stored) = self.controllers.find(&name).await? else {
            if allow_missing {
                warn!(
                    controller = %name,
                    "allow_missing update requested; missing controllers are not created"
                );
            }
            return Err(NvmeControllerServiceError::ControllerNotFound(name.to_string()));
        };

        update_mask.validate()?;
        let mut spec = update_mask.merge(&stored.spec, &nvme_controller.spec);
        if spec.nvme_controller_id == 0 {
            spec.nvme_controller_id = stored.spec.nvme_controller_id;
        }

        if spec.subsystem_id.trim().is_empty() {
            warn!(controller = %name, "update names no subsystem");
            return Err(NvmeControllerServiceError::SubsystemNotFound(
                spec.subsystem_id.clone(),
            ));
        }
        let subsystem = self.resolve_subsystem(&spec.subsystem_id).await?;
        if subsystem.key().as_str() != stored.spec.subsystem_id.trim() {
            return Err(FrontendDomainError::SubsystemReparent {
                name: name.to_string(),
                from: stored.spec.subsystem_id,
                to: subsystem.key().to_string(),
            }
            .into());
        }

        let result = invoke(&*self.backend, &create_params(&subsystem, &spec))
            .await
            .inspect_err(log_transport_error)?;
        debug!(?result, "received update reply from backend");
        ensure_success(&result, ControllerAction::Update, name.as_str())?;

        spec.nvme_controller_id = api_int(result.ctrlr_id);
        let response = NvmeController {
            name: name.to_string(),
            spec,
            status: NvmeControllerStatus::active(),
        };
        self.controllers.store(&name, &response).await?;
        info!(
            controller = %name,
            nvme_controller_id = response.spec.nvme_controller_id,
            "updated controller"
        );
        Ok(response)
    }

    /// Lists the controllers attached to a subsystem, one page at a time.
    ///
    /// Controllers are ordered by controller id across pages.
    ///
    /// # Errors
    ///
    /// Returns [`NvmeControllerServiceError::Domain`] for a missing parent or
    /// negative page size, [`NvmeControllerServiceError::PageTokenNotFound`]
    /// for unknown tokens, [`NvmeControllerServiceError::SubsystemNotFound`]
    /// when the parent does not exist,
    /// [`NvmeControllerServiceError::BackendStatus`] when the backend rejects
    /// the call, and backend or registry errors.
    pub async fn list(
        &self,
        request: ListNvmeControllersRequest,
    ) -> NvmeControllerServiceResult<ListNvmeControllersResponse> {
        let _guard = self.operation_lock.lock().await;
        debug!(?request, "list controllers request received");
        request.validate_required()?;

        let window = self
            .resolve_page(request.page_size, &request.page_token)
            .await?;
        let subsystem = self.resolve_subsystem(&request.parent).await?;
        let params = ControllerListParams {
            subnqn: subsystem.nqn().to_owned(),
        };
        let result = invoke(&*self.backend, &params)
            .await
            .inspect_err(log_transport_error)?;
        debug!(?result, "received controller list from backend");
        ensure_success(&result, ControllerAction::List, &request.parent)?;

        let mut controllers: Vec<NvmeController> = result
            .ctrlr_id_list
            .iter()
            .map(|entry| NvmeController::from_controller_id(api_int(entry.ctrlr_id)))
            .collect();
        controllers.sort_by_key(|controller| controller.spec.nvme_controller_id);

        debug!(
            total = controllers.len(),
            offset = window.offset,
            size = window.size,
            "limiting controller list to page"
        );
        let (nvme_controllers, has_more) = window.apply(controllers);
        let next_page_token = if has_more {
            let token = PageToken::new();
            self.page_tokens.record(&token, window.next_offset()).await?;
            token.into_inner()
        } else {
            String::new()
        };

        Ok(ListNvmeControllersResponse {
            nvme_controllers,
            next_page_token,
        })
    }

    /// Confirms a controller with the backend and returns it.
    ///
    /// # Errors
    ///
    /// Returns [`NvmeControllerServiceError::ControllerNotFound`] when the
    /// controller does not exist,
    /// [`NvmeControllerServiceError::SubsystemNotFound`] when its subsystem
    /// is gone, [`NvmeControllerServiceError::BackendStatus`] when the
    /// backend rejects the call, and validation, backend or registry errors.
    pub async fn get(
        &self,
        request: GetNvmeControllerRequest,
    ) -> NvmeControllerServiceResult<NvmeController> {
        let _guard = self.operation_lock.lock().await;
        debug!(?request, "get controller request received");
        request.validate_required()?;
        let name = ResourceName::parse(request.name)?;
        let controller = self.find_controller_or_error(&name).await?;
        let subsystem = self.resolve_subsystem(&controller.spec.subsystem_id).await?;

        let params = ControllerInfoParams {
            subnqn: subsystem.nqn().to_owned(),
            ctrlr_id: i64::from(controller.spec.nvme_controller_id),
        };
        let result = invoke(&*self.backend, &params)
            .await
            .inspect_err(log_transport_error)?;
        debug!(?result, "received controller info from backend");
        ensure_success(&result, ControllerAction::Get, name.as_str())?;

        Ok(NvmeController {
            name: name.to_string(),
            spec: NvmeControllerSpec::default()
                .with_controller_id(controller.spec.nvme_controller_id),
            status: NvmeControllerStatus::active(),
        })
    }

    /// Samples the I/O counters of a controller.
    ///
    /// Backend counters wider than 32 bits are truncated.
    ///
    /// # Errors
    ///
    /// Returns [`NvmeControllerServiceError::ControllerNotFound`] when the
    /// controller does not exist,
    /// [`NvmeControllerServiceError::SubsystemNotFound`] when its subsystem
    /// is gone, [`NvmeControllerServiceError::BackendStatus`] when the
    /// backend rejects the call, and validation, backend or registry errors.
    pub async fn stats(
        &self,
        request: NvmeControllerStatsRequest,
    ) -> NvmeControllerServiceResult<VolumeStats> {
        let _guard = self.operation_lock.lock().await;
        debug!(?request, "controller stats request received");
        request.validate_required()?;
        let name = ResourceName::parse(request.id)?;
        let controller = self.find_controller_or_error(&name).await?;
        let subsystem = self.resolve_subsystem(&controller.spec.subsystem_id).await?;

        let params = ControllerStatsParams {
            subnqn: subsystem.nqn().to_owned(),
            ctrlr_id: i64::from(controller.spec.nvme_controller_id),
        };
        let result = invoke(&*self.backend, &params)
            .await
            .inspect_err(log_transport_error)?;
        debug!(?result, "received controller stats from backend");
        ensure_success(&result, ControllerAction::Stats, name.as_str())?;

        Ok(volume_stats(&result))
    }
}
