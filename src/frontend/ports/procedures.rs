//! Typed Marvell NVMe backend procedures.
//!
//! Each parameter struct names its procedure and result type through
//! [`BackendProcedure`]; [`invoke`] handles the JSON encoding on either side
//! of a [`BackendInvoker`] call.

use super::{BackendError, BackendInvoker, BackendResult};
use serde::{Deserialize, Serialize, de::DeserializeOwned};

/// Forced removal flag understood by the remove procedure.
pub const FORCE_REMOVE: i64 = 1;

/// Creates a controller, or updates one when `ctrlr_id` already exists.
pub const CREATE_CONTROLLER: &str = "mrvl_nvm_subsys_create_ctrlr";
/// Removes a controller from its subsystem.
pub const REMOVE_CONTROLLER: &str = "mrvl_nvm_subsys_remove_ctrlr";
/// Lists controller ids attached to a subsystem.
pub const LIST_CONTROLLERS: &str = "mrvl_nvm_subsys_get_ctrlr_list";
/// Describes a single controller.
pub const CONTROLLER_INFO: &str = "mrvl_nvm_ctrlr_get_info";
/// Samples controller I/O counters.
pub const CONTROLLER_STATS: &str = "mrvl_nvm_get_ctrlr_stats";

/// Backend procedure with a typed parameter and result shape.
pub trait BackendProcedure: Serialize + Send + Sync {
    /// Procedure name on the backend.
    const NAME: &'static str;

    /// Decoded result.
    type Output: DeserializeOwned + BackendStatus;
}

/// Application-level status embedded in every backend result.
pub trait BackendStatus {
    /// Raw status code; zero means success.
    fn status(&self) -> i64;

    /// Returns whether the backend reported success.
    fn is_success(&self) -> bool {
        self.status() == 0
    }
}

/// Invokes a typed procedure on `backend`.
///
/// # Errors
///
/// Returns [`BackendError::Serialization`] when parameters or the result
/// cannot be converted, and propagates invoker errors unchanged.
pub async fn invoke<B, P>(backend: &B, params: &P) -> BackendResult<P::Output>
where
    B: BackendInvoker + ?Sized,
    P: BackendProcedure,
{
    let encoded = serde_json::to_value(params).map_err(BackendError::serialization)?;
    let reply = backend.call(P::NAME, encoded).await?;
    serde_json::from_value(reply).map_err(BackendError::serialization)
}

/// Parameters of `mrvl_nvm_subsys_create_ctrlr`.
///
/// The backend treats a repeated call for an existing `ctrlr_id` as an
/// in-place update.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct CreateControllerParams {
    /// Subsystem NQN.
    pub subnqn: String,
    /// PCIe domain.
    pub pcie_domain_id: i64,
    /// Physical function.
    pub pf_id: i64,
    /// Virtual function.
    pub vf_id: i64,
    /// Requested controller id; zero lets the backend choose.
    pub ctrlr_id: i64,
    /// Maximum submission queues.
    pub max_nsq: i64,
    /// Maximum completion queues.
    pub max_ncq: i64,
    /// Maximum queue entries.
    pub mqes: i64,
}

impl BackendProcedure for CreateControllerParams {
    const NAME: &'static str = CREATE_CONTROLLER;
    type Output = CreateControllerResult;
}

/// Result of `mrvl_nvm_subsys_create_ctrlr`.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct CreateControllerResult {
    /// Status code.
    pub status: i64,
    /// Controller id assigned by the backend.
    pub ctrlr_id: i64,
}

/// Parameters of `mrvl_nvm_subsys_remove_ctrlr`.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct RemoveControllerParams {
    /// Subsystem NQN.
    pub subnqn: String,
    /// Controller to remove.
    pub ctrlr_id: i64,
    /// Non-zero removes the controller even while in use.
    pub force: i64,
}

impl BackendProcedure for RemoveControllerParams {
    const NAME: &'static str = REMOVE_CONTROLLER;
    type Output = RemoveControllerResult;
}

/// Result of `mrvl_nvm_subsys_remove_ctrlr`.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct RemoveControllerResult {
    /// Status code.
    pub status: i64,
}

/// Parameters of `mrvl_nvm_subsys_get_ctrlr_list`.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct ControllerListParams {
    /// Subsystem NQN.
    pub subnqn: String,
}

impl BackendProcedure for ControllerListParams {
    const NAME: &'static str = LIST_CONTROLLERS;
    type Output = ControllerListResult;
}

/// Entry of the controller id list.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct ControllerListEntry {
    /// Controller id.
    pub ctrlr_id: i64,
}

/// Result of `mrvl_nvm_subsys_get_ctrlr_list`.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct ControllerListResult {
    /// Status code.
    pub status: i64,
    /// Controllers attached to the subsystem.
    pub ctrlr_id_list: Vec<ControllerListEntry>,
}

/// Parameters of `mrvl_nvm_ctrlr_get_info`.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct ControllerInfoParams {
    /// Subsystem NQN.
    pub subnqn: String,
    /// Controller to describe.
    pub ctrlr_id: i64,
}

impl BackendProcedure for ControllerInfoParams {
    const NAME: &'static str = CONTROLLER_INFO;
    type Output = ControllerInfoResult;
}

/// Result of `mrvl_nvm_ctrlr_get_info`.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct ControllerInfoResult {
    /// Status code.
    pub status: i64,
    /// Controller id.
    pub ctrlr_id: i64,
    /// PCIe domain.
    pub pcie_domain_id: i64,
    /// Physical function.
    pub pf_id: i64,
    /// Virtual function.
    pub vf_id: i64,
    /// Maximum submission queues.
    pub max_nsq: i64,
    /// Maximum completion queues.
    pub max_ncq: i64,
    /// Maximum queue entries.
    pub mqes: i64,
}

/// Parameters of `mrvl_nvm_get_ctrlr_stats`.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct ControllerStatsParams {
    /// Subsystem NQN.
    pub subnqn: String,
    /// Controller to sample.
    pub ctrlr_id: i64,
}

impl BackendProcedure for ControllerStatsParams {
    const NAME: &'static str = CONTROLLER_STATS;
    type Output = ControllerStatsResult;
}

/// Result of `mrvl_nvm_get_ctrlr_stats`.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct ControllerStatsResult {
    /// Status code.
    pub status: i64,
    /// Bytes read.
    pub num_read_bytes: i64,
    /// Read commands.
    pub num_read_cmds: i64,
    /// Bytes written.
    pub num_write_bytes: i64,
    /// Write commands.
    pub num_write_cmds: i64,
    /// Admin commands.
    pub num_admin_cmds: i64,
    /// Failed commands.
    pub num_errors: i64,
    /// Cumulative read latency in microseconds.
    pub total_read_latency_in_us: i64,
    /// Cumulative write latency in microseconds.
    pub total_write_latency_in_us: i64,
}

impl BackendStatus for CreateControllerResult {
    fn status(&self) -> i64 {
        self.status
    }
}

impl BackendStatus for RemoveControllerResult {
    fn status(&self) -> i64 {
        self.status
    }
}

impl BackendStatus for ControllerListResult {
    fn status(&self) -> i64 {
        self.status
    }
}

impl BackendStatus for ControllerInfoResult {
    fn status(&self) -> i64 {
        self.status
    }
}

impl BackendStatus for ControllerStatsResult {
    fn status(&self) -> i64 {
        self.status
    }
}
