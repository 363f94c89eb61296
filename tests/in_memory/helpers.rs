//! Shared test helpers for in-memory controller frontend tests.

use std::sync::Arc;

use marvell_bridge::frontend::{
    adapters::{
        InMemoryMarvellBackend,
        memory::{InMemoryControllerRegistry, InMemoryPageTokens, InMemorySubsystemRegistry},
    },
    config::FrontendConfig,
    domain::{NvmeController, NvmeControllerSpec, NvmeSubsystem, PcieEndpoint, SubsystemKey},
    services::{CreateNvmeControllerRequest, NvmeControllerService},
};
use rstest::fixture;

/// NQN of the subsystem every test context starts with.
pub const SUBSYSTEM_NQN: &str = "nqn.2022-09.io.spdk:opi0";

/// Key of the subsystem every test context starts with.
pub const SUBSYSTEM_KEY: &str = "subsys0";

/// Service wired to in-memory adapters.
pub type TestService = NvmeControllerService<
    InMemoryControllerRegistry,
    InMemorySubsystemRegistry,
    InMemoryPageTokens,
    InMemoryMarvellBackend,
>;

/// Service together with handles on its collaborators.
pub struct TestContext {
    /// Controller registry shared with the service.
    pub controllers: Arc<InMemoryControllerRegistry>,
    /// Subsystem registry shared with the service.
    pub subsystems: Arc<InMemorySubsystemRegistry>,
    /// Emulated backend shared with the service.
    pub backend: Arc<InMemoryMarvellBackend>,
    /// Service under test.
    pub service: TestService,
}

impl TestContext {
    /// Returns the number of registered controllers.
    pub fn registered_count(&self) -> usize {
        self.controllers
            .len()
            .expect("registry size should be readable")
    }
}

/// Builds a context with the given configuration and one subsystem.
pub fn context_with(config: FrontendConfig) -> TestContext {
    let controllers = Arc::new(InMemoryControllerRegistry::new());
    let subsystems = Arc::new(InMemorySubsystemRegistry::new());
    subsystems
        .insert(NvmeSubsystem::new(
            SubsystemKey::new(SUBSYSTEM_KEY).expect("valid subsystem key"),
            SUBSYSTEM_NQN,
        ))
        .expect("subsystem insert should succeed");
    let backend = Arc::new(InMemoryMarvellBackend::new());
    let service = NvmeControllerService::new(
        controllers.clone(),
        subsystems.clone(),
        Arc::new(InMemoryPageTokens::new()),
        backend.clone(),
    )
    .with_config(config);

    TestContext {
        controllers,
        subsystems,
        backend,
        service,
    }
}

/// Provides a context with the default configuration.
#[fixture]
pub fn context() -> TestContext {
    context_with(FrontendConfig::default())
}

/// Returns a spec on the default subsystem at PCIe function 1.
pub fn controller_spec() -> NvmeControllerSpec {
    NvmeControllerSpec::new(SUBSYSTEM_KEY)
        .with_pcie_id(PcieEndpoint::new(0, 1, 0))
        .with_queues(4, 4, 32)
}

/// Returns a create request for `id` on the default subsystem.
pub fn create_request(id: &str) -> CreateNvmeControllerRequest {
    CreateNvmeControllerRequest::new(NvmeController::new(controller_spec())).with_id(id)
}

/// Returns the canonical name of `id` under the default prefix.
pub fn canonical_name(id: &str) -> String {
    format!("//storage.opiproject.org/volumes/{id}")
}
