//! NVMe controller resource as exposed through the frontend API.

use serde::{Deserialize, Serialize};

/// PCIe placement of an NVMe controller.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct PcieEndpoint {
    /// PCIe domain (port) the function hangs off.
    pub port_id: i32,
    /// Physical function number.
    pub physical_function: i32,
    /// Virtual function number, zero for a physical function.
    pub virtual_function: i32,
}

impl PcieEndpoint {
    /// Creates a PCIe endpoint description.
    #[must_use]
    pub const fn new(port_id: i32, physical_function: i32, virtual_function: i32) -> Self {
        Self {
            port_id,
            physical_function,
            virtual_function,
        }
    }
}

/// Desired configuration of an NVMe controller.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct NvmeControllerSpec {
    /// Key of the owning NVMe subsystem.
    pub subsystem_id: String,
    /// PCIe placement.
    pub pcie_id: PcieEndpoint,
    /// Controller identifier, assigned by the backend.
    pub nvme_controller_id: i32,
    /// Maximum number of submission queues.
    pub max_nsq: i32,
    /// Maximum number of completion queues.
    pub max_ncq: i32,
    /// Submission queue depth.
    pub sqes: i32,
}

impl NvmeControllerSpec {
    /// Creates a spec owned by `subsystem_id` with default placement.
    #[must_use]
    pub fn new(subsystem_id: impl Into<String>) -> Self {
        Self {
            subsystem_id: subsystem_id.into(),
            ..Self::default()
        }
    }

    /// Sets the PCIe placement.
    #[must_use]
    pub const fn with_pcie_id(mut self, pcie_id: PcieEndpoint) -> Self {
        self.pcie_id = pcie_id;
        self
    }

    /// Sets the requested controller identifier.
    #[must_use]
    pub const fn with_controller_id(mut self, nvme_controller_id: i32) -> Self {
        self.nvme_controller_id = nvme_controller_id;
        self
    }

    /// Sets queue counts and depth.
    #[must_use]
    pub const fn with_queues(mut self, max_nsq: i32, max_ncq: i32, sqes: i32) -> Self {
        self.max_nsq = max_nsq;
        self.max_ncq = max_ncq;
        self.sqes = sqes;
        self
    }
}

/// Observed state of an NVMe controller.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct NvmeControllerStatus {
    /// Whether the backend reports the controller as live.
    pub active: bool,
}

impl NvmeControllerStatus {
    /// Status of a controller confirmed by the backend.
    #[must_use]
    pub const fn active() -> Self {
        Self { active: true }
    }
}

/// NVMe controller resource.
///
/// List results carry only `spec.nvme_controller_id`; every other field is
/// left at its default.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct NvmeController {
    /// Resource name; empty on list results.
    pub name: String,
    /// Desired configuration.
    pub spec: NvmeControllerSpec,
    /// Observed state.
    pub status: NvmeControllerStatus,
}

impl NvmeController {
    /// Creates a controller payload from a spec.
    #[must_use]
    pub fn new(spec: NvmeControllerSpec) -> Self {
        Self {
            name: String::new(),
            spec,
            status: NvmeControllerStatus::default(),
        }
    }

    /// Sets the resource name.
    #[must_use]
    pub fn with_name(mut self, name: impl Into<String>) -> Self {
        self.name = name.into();
        self
    }

    /// Builds the minimal representation used in list results.
    #[must_use]
    pub fn from_controller_id(nvme_controller_id: i32) -> Self {
        Self::new(NvmeControllerSpec::default().with_controller_id(nvme_controller_id))
    }
}

/// I/O counters of a controller.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct VolumeStats {
    /// Bytes read.
    pub read_bytes_count: i32,
    /// Read commands completed.
    pub read_ops_count: i32,
    /// Bytes written.
    pub write_bytes_count: i32,
    /// Write commands completed.
    pub write_ops_count: i32,
    /// Cumulative read latency.
    pub read_latency_ticks: i32,
    /// Cumulative write latency.
    pub write_latency_ticks: i32,
}
