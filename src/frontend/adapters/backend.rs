//! In-memory Marvell backend adapter.

use crate::frontend::ports::{
    BackendError, BackendInvoker, BackendResult,
    procedures::{
        CONTROLLER_INFO, CONTROLLER_STATS, CREATE_CONTROLLER, ControllerInfoParams,
        ControllerInfoResult, ControllerListEntry, ControllerListParams, ControllerListResult,
        ControllerStatsParams, ControllerStatsResult, CreateControllerParams,
        CreateControllerResult, LIST_CONTROLLERS, REMOVE_CONTROLLER, RemoveControllerParams,
        RemoveControllerResult,
    },
};
use async_trait::async_trait;
use serde::{Serialize, de::DeserializeOwned};
use serde_json::Value;
use std::collections::{BTreeMap, HashMap};
use std::sync::{Arc, Mutex, MutexGuard};

/// Status returned for a controller the backend does not know (`-ENOENT`).
pub const STATUS_NO_SUCH_CONTROLLER: i64 = -2;

/// In-memory emulation of the Marvell NVMe procedures.
///
/// Controllers are tracked per subsystem NQN. Ids are allocated per
/// subsystem starting from 1, and a create call naming an existing id
/// updates that controller in place. Tests can inject status failures and
/// transport outages and inspect the calls made.
#[derive(Debug, Clone, Default)]
pub struct InMemoryMarvellBackend {
    state: Arc<Mutex<BackendState>>,
}

#[derive(Debug, Default)]
struct BackendState {
    subsystems: HashMap<String, BTreeMap<i64, EmulatedController>>,
    injected_statuses: HashMap<String, i64>,
    offline: bool,
    calls: Vec<String>,
}

#[derive(Debug, Clone, Default)]
struct EmulatedController {
    config: CreateControllerParams,
    stats: ControllerStatsResult,
}

impl InMemoryMarvellBackend {
    /// Creates a backend with no controllers.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    fn lock(&self) -> BackendResult<MutexGuard<'_, BackendState>> {
        self.state
            .lock()
            .map_err(|err| BackendError::transport(std::io::Error::other(err.to_string())))
    }

    /// Makes the next call to `procedure` report `status`.
    ///
    /// # Errors
    ///
    /// Returns a transport error when lock acquisition fails.
    pub fn fail_next(&self, procedure: &str, status: i64) -> BackendResult<()> {
        self.lock()?
            .injected_statuses
            .insert(procedure.to_owned(), status);
        Ok(())
    }

    /// Simulates losing or regaining the channel to the backend.
    ///
    /// # Errors
    ///
    /// Returns a transport error when lock acquisition fails.
    pub fn set_offline(&self, offline: bool) -> BackendResult<()> {
        self.lock()?.offline = offline;
        Ok(())
    }

    /// Attaches controllers with fixed ids to a subsystem.
    ///
    /// # Errors
    ///
    /// Returns a transport error when lock acquisition fails.
    pub fn seed_controllers(
        &self,
        subnqn: &str,
        ctrlr_ids: impl IntoIterator<Item = i64>,
    ) -> BackendResult<()> {
        let mut state = self.lock()?;
        let controllers = state.subsystems.entry(subnqn.to_owned()).or_default();
        for ctrlr_id in ctrlr_ids {
            controllers.insert(
                ctrlr_id,
                EmulatedController {
                    config: CreateControllerParams {
                        subnqn: subnqn.to_owned(),
                        ctrlr_id,
                        ..CreateControllerParams::default()
                    },
                    stats: ControllerStatsResult::default(),
                },
            );
        }
        Ok(())
    }

    /// Replaces the counters reported for a controller.
    ///
    /// Returns whether the controller exists.
    ///
    /// # Errors
    ///
    /// Returns a transport error when lock acquisition fails.
    pub fn set_stats(
        &self,
        subnqn: &str,
        ctrlr_id: i64,
        stats: ControllerStatsResult,
    ) -> BackendResult<bool> {
        let mut state = self.lock()?;
        let Some(controller) = state
            .subsystems
            .get_mut(subnqn)
            .and_then(|controllers| controllers.get_mut(&ctrlr_id))
        else {
            return Ok(false);
        };
        controller.stats = stats;
        Ok(true)
    }

    /// Returns the ids attached to a subsystem in ascending order.
    ///
    /// # Errors
    ///
    /// Returns a transport error when lock acquisition fails.
    pub fn controller_ids(&self, subnqn: &str) -> BackendResult<Vec<i64>> {
        Ok(self
            .lock()?
            .subsystems
            .get(subnqn)
            .map(|controllers| controllers.keys().copied().collect())
            .unwrap_or_default())
    }

    /// Returns the procedures called so far, oldest first.
    ///
    /// # Errors
    ///
    /// Returns a transport error when lock acquisition fails.
    pub fn calls(&self) -> BackendResult<Vec<String>> {
        Ok(self.lock()?.calls.clone())
    }

    /// Returns how often `procedure` was called.
    ///
    /// # Errors
    ///
    /// Returns a transport error when lock acquisition fails.
    pub fn call_count(&self, procedure: &str) -> BackendResult<usize> {
        Ok(self
            .lock()?
            .calls
            .iter()
            .filter(|called| called.as_str() == procedure)
            .count())
    }
}

impl BackendState {
    fn create(&mut self, params: CreateControllerParams) -> CreateControllerResult {
        let controllers = self.subsystems.entry(params.subnqn.clone()).or_default();
        let ctrlr_id = if params.ctrlr_id == 0 {
            controllers
                .keys()
                .next_back()
                .map_or(1, |highest| highest.saturating_add(1))
        } else {
            params.ctrlr_id
        };

        let entry = controllers.entry(ctrlr_id).or_default();
        entry.config = CreateControllerParams { ctrlr_id, ..params };
        CreateControllerResult {
            status: 0,
            ctrlr_id,
        }
    }

    fn remove(&mut self, params: &RemoveControllerParams) -> RemoveControllerResult {
        let removed = self
            .subsystems
            .get_mut(&params.subnqn)
            .and_then(|controllers| controllers.remove(&params.ctrlr_id));
        RemoveControllerResult {
            status: if removed.is_some() {
                0
            } else {
                STATUS_NO_SUCH_CONTROLLER
            },
        }
    }

    fn list(&self, params: &ControllerListParams) -> ControllerListResult {
        let ctrlr_id_list = self
            .subsystems
            .get(&params.subnqn)
            .map(|controllers| {
                controllers
                    .keys()
                    .map(|&ctrlr_id| ControllerListEntry { ctrlr_id })
                    .collect()
            })
            .unwrap_or_default();
        ControllerListResult {
            status: 0,
            ctrlr_id_list,
        }
    }

    fn find(&self, subnqn: &str, ctrlr_id: i64) -> Option<&EmulatedController> {
        self.subsystems
            .get(subnqn)
            .and_then(|controllers| controllers.get(&ctrlr_id))
    }

    fn info(&self, params: &ControllerInfoParams) -> ControllerInfoResult {
        self.find(&params.subnqn, params.ctrlr_id).map_or_else(
            || ControllerInfoResult {
                status: STATUS_NO_SUCH_CONTROLLER,
                ..ControllerInfoResult::default()
            },
            |controller| ControllerInfoResult {
                status: 0,
                ctrlr_id: controller.config.ctrlr_id,
                pcie_domain_id: controller.config.pcie_domain_id,
                pf_id: controller.config.pf_id,
                vf_id: controller.config.vf_id,
                max_nsq: controller.config.max_nsq,
                max_ncq: controller.config.max_ncq,
                mqes: controller.config.mqes,
            },
        )
    }

    fn stats(&self, params: &ControllerStatsParams) -> ControllerStatsResult {
        self.find(&params.subnqn, params.ctrlr_id).map_or_else(
            || ControllerStatsResult {
                status: STATUS_NO_SUCH_CONTROLLER,
                ..ControllerStatsResult::default()
            },
            |controller| ControllerStatsResult {
                status: 0,
                ..controller.stats.clone()
            },
        )
    }
}

fn decode<T: DeserializeOwned>(params: Value) -> BackendResult<T> {
    serde_json::from_value(params).map_err(BackendError::serialization)
}

fn encode<T: Serialize>(result: &T) -> BackendResult<Value> {
    serde_json::to_value(result).map_err(BackendError::serialization)
}

#[async_trait]
impl BackendInvoker for InMemoryMarvellBackend {
    async fn call(&self, procedure: &str, params: Value) -> BackendResult<Value> {
        let mut state = self.lock()?;
        state.calls.push(procedure.to_owned());

        if state.offline {
            return Err(BackendError::transport(std::io::Error::new(
                std::io::ErrorKind::ConnectionRefused,
                "backend channel is offline",
            )));
        }

        if let Some(status) = state.injected_statuses.remove(procedure) {
            return Ok(serde_json::json!({ "status": status }));
        }

        match procedure {
            CREATE_CONTROLLER => encode(&state.create(decode(params)?)),
            REMOVE_CONTROLLER => encode(&state.remove(&decode(params)?)),
            LIST_CONTROLLERS => encode(&state.list(&decode(params)?)),
            CONTROLLER_INFO => encode(&state.info(&decode(params)?)),
            CONTROLLER_STATS => encode(&state.stats(&decode(params)?)),
            other => Err(BackendError::UnknownProcedure(other.to_owned())),
        }
    }
}
