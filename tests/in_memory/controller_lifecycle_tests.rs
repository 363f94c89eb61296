//! In-memory integration tests for controller lifecycle operations.

use super::helpers::{
    SUBSYSTEM_KEY, SUBSYSTEM_NQN, TestContext, canonical_name, context, context_with,
    controller_spec, create_request,
};
use marvell_bridge::frontend::{
    config::FrontendConfig,
    domain::{FieldMask, NvmeController, NvmeControllerSpec, ResourceName, SubsystemKey},
    ports::{
        ControllerRepository,
        procedures::{
            CONTROLLER_INFO, CONTROLLER_STATS, CREATE_CONTROLLER, ControllerStatsResult,
            REMOVE_CONTROLLER,
        },
    },
    services::{
        CreateNvmeControllerRequest, DeleteNvmeControllerRequest, ErrorCode,
        GetNvmeControllerRequest, NvmeControllerServiceError, NvmeControllerStatsRequest,
        UpdateNvmeControllerRequest,
    },
};
use rstest::rstest;

#[rstest]
#[tokio::test(flavor = "multi_thread")]
async fn create_get_and_delete_controller(context: TestContext) {
    let created = context
        .service
        .create(create_request("ctrl0"))
        .await
        .expect("create should succeed");
    assert_eq!(created.name, canonical_name("ctrl0"));
    assert_eq!(created.spec.nvme_controller_id, 1);
    assert!(created.status.active);

    let fetched = context
        .service
        .get(GetNvmeControllerRequest::new(canonical_name("ctrl0")))
        .await
        .expect("get should succeed");
    assert_eq!(fetched.spec.nvme_controller_id, 1);
    assert!(fetched.status.active);

    context
        .service
        .delete(DeleteNvmeControllerRequest::new(canonical_name("ctrl0")))
        .await
        .expect("delete should succeed");
    assert_eq!(context.registered_count(), 0);
    assert!(
        context
            .backend
            .controller_ids(SUBSYSTEM_NQN)
            .expect("ids")
            .is_empty()
    );
}

#[rstest]
#[tokio::test(flavor = "multi_thread")]
async fn create_without_id_generates_unique_names(context: TestContext) {
    let request = || CreateNvmeControllerRequest::new(NvmeController::new(controller_spec()));

    let first = context
        .service
        .create(request())
        .await
        .expect("create should succeed");
    let second = context
        .service
        .create(request())
        .await
        .expect("create should succeed");

    assert_ne!(first.name, second.name);
    assert_eq!(context.registered_count(), 2);
    assert_eq!(
        context.backend.controller_ids(SUBSYSTEM_NQN).expect("ids"),
        vec![1, 2]
    );
}

#[rstest]
#[tokio::test(flavor = "multi_thread")]
async fn repeated_create_reaches_backend_once(context: TestContext) {
    let first = context
        .service
        .create(create_request("ctrl0"))
        .await
        .expect("create should succeed");
    let second = context
        .service
        .create(create_request("ctrl0"))
        .await
        .expect("create should succeed");

    assert_eq!(first, second);
    assert_eq!(
        context
            .backend
            .call_count(CREATE_CONTROLLER)
            .expect("call count"),
        1
    );
}

#[rstest]
#[tokio::test(flavor = "multi_thread")]
async fn custom_prefix_shapes_canonical_names() {
    let context = context_with(
        FrontendConfig::default().with_resource_prefix("//storage.example.com/controllers/"),
    );

    let created = context
        .service
        .create(create_request("ctrl0"))
        .await
        .expect("create should succeed");

    assert_eq!(created.name, "//storage.example.com/controllers/ctrl0");
}

#[rstest]
#[case(CREATE_CONTROLLER)]
#[case(REMOVE_CONTROLLER)]
#[case(CONTROLLER_INFO)]
#[case(CONTROLLER_STATS)]
#[tokio::test(flavor = "multi_thread")]
async fn backend_rejection_leaves_registry_unchanged(#[case] procedure: &str) {
    let context = context_with(FrontendConfig::default());
    if procedure != CREATE_CONTROLLER {
        context
            .service
            .create(create_request("ctrl0"))
            .await
            .expect("create should succeed");
    }
    let before = context.registered_count();
    context
        .backend
        .fail_next(procedure, -22)
        .expect("injection should succeed");

    let result = match procedure {
        CREATE_CONTROLLER => context
            .service
            .create(create_request("ctrl0"))
            .await
            .map(drop),
        REMOVE_CONTROLLER => {
            context
                .service
                .delete(DeleteNvmeControllerRequest::new(canonical_name("ctrl0")))
                .await
        }
        CONTROLLER_INFO => context
            .service
            .get(GetNvmeControllerRequest::new(canonical_name("ctrl0")))
            .await
            .map(drop),
        _ => context
            .service
            .stats(NvmeControllerStatsRequest::new(canonical_name("ctrl0")))
            .await
            .map(drop),
    };

    let error = result.expect_err("operation should fail");
    assert_eq!(error.code(), ErrorCode::InvalidArgument);
    assert!(matches!(
        error,
        NvmeControllerServiceError::BackendStatus { status: -22, .. }
    ));
    assert_eq!(context.registered_count(), before);
}

#[rstest]
#[tokio::test(flavor = "multi_thread")]
async fn offline_backend_is_unavailable(context: TestContext) {
    context.backend.set_offline(true).expect("toggle should succeed");

    let error = context
        .service
        .create(create_request("ctrl0"))
        .await
        .expect_err("create should fail");

    assert_eq!(error.code(), ErrorCode::Unavailable);
    assert_eq!(context.registered_count(), 0);
}

#[rstest]
#[tokio::test(flavor = "multi_thread")]
async fn delete_of_absent_controller_depends_on_allow_missing(context: TestContext) {
    let strict = context
        .service
        .delete(DeleteNvmeControllerRequest::new(canonical_name("ghost")))
        .await;
    let tolerant = context
        .service
        .delete(DeleteNvmeControllerRequest::new(canonical_name("ghost")).allowing_missing())
        .await;

    assert!(matches!(
        strict,
        Err(NvmeControllerServiceError::ControllerNotFound(_))
    ));
    assert!(tolerant.is_ok());
    assert!(context.backend.calls().expect("calls").is_empty());
}

#[rstest]
#[tokio::test(flavor = "multi_thread")]
async fn operations_on_dangling_subsystem_are_not_found(context: TestContext) {
    context
        .service
        .create(create_request("ctrl0"))
        .await
        .expect("create should succeed");
    context
        .subsystems
        .remove(&SubsystemKey::new(SUBSYSTEM_KEY).expect("valid key"))
        .expect("remove should succeed");

    let get = context
        .service
        .get(GetNvmeControllerRequest::new(canonical_name("ctrl0")))
        .await
        .expect_err("get should fail");
    let stats = context
        .service
        .stats(NvmeControllerStatsRequest::new(canonical_name("ctrl0")))
        .await
        .expect_err("stats should fail");
    let update = context
        .service
        .update(UpdateNvmeControllerRequest::new(
            NvmeController::new(controller_spec()).with_name(canonical_name("ctrl0")),
        ))
        .await
        .expect_err("update should fail");

    for error in [get, stats, update] {
        assert!(matches!(
            error,
            NvmeControllerServiceError::SubsystemNotFound(_)
        ));
        assert_eq!(error.code(), ErrorCode::NotFound);
    }
    assert_eq!(context.registered_count(), 1);
}

#[rstest]
#[tokio::test(flavor = "multi_thread")]
async fn update_applies_masked_fields_on_backend(context: TestContext) {
    context
        .service
        .create(create_request("ctrl0"))
        .await
        .expect("create should succeed");

    let payload = NvmeController::new(NvmeControllerSpec::new(SUBSYSTEM_KEY).with_queues(8, 8, 64))
        .with_name(canonical_name("ctrl0"));
    let updated = context
        .service
        .update(
            UpdateNvmeControllerRequest::new(payload)
                .with_mask(FieldMask::new(["spec.max_nsq", "spec.max_ncq"])),
        )
        .await
        .expect("update should succeed");

    assert_eq!(updated.spec.nvme_controller_id, 1);
    assert_eq!(updated.spec.max_nsq, 8);
    assert_eq!(updated.spec.sqes, 32);
    assert_eq!(updated.spec.pcie_id, controller_spec().pcie_id);
    assert_eq!(
        context.backend.controller_ids(SUBSYSTEM_NQN).expect("ids"),
        vec![1]
    );
    assert_eq!(
        context
            .backend
            .call_count(CREATE_CONTROLLER)
            .expect("call count"),
        2
    );
}

#[rstest]
#[tokio::test(flavor = "multi_thread")]
async fn update_rejected_by_backend_keeps_stored_controller(context: TestContext) {
    let created = context
        .service
        .create(create_request("ctrl0"))
        .await
        .expect("create should succeed");
    let name = ResourceName::parse(canonical_name("ctrl0")).expect("valid name");
    context
        .backend
        .fail_next(CREATE_CONTROLLER, -22)
        .expect("injection should succeed");

    let payload = NvmeController::new(NvmeControllerSpec::new(SUBSYSTEM_KEY).with_queues(8, 4, 32))
        .with_name(canonical_name("ctrl0"));
    let error = context
        .service
        .update(
            UpdateNvmeControllerRequest::new(payload)
                .with_mask(FieldMask::new(["spec.max_nsq"])),
        )
        .await
        .expect_err("update should fail");

    assert_eq!(error.code(), ErrorCode::InvalidArgument);
    assert!(matches!(
        error,
        NvmeControllerServiceError::BackendStatus { status: -22, .. }
    ));
    let stored = context
        .controllers
        .find(&name)
        .await
        .expect("lookup should succeed");
    assert_eq!(stored, Some(created));
    assert_eq!(context.registered_count(), 1);
}

#[rstest]
#[tokio::test(flavor = "multi_thread")]
async fn update_rejects_unknown_mask_paths(context: TestContext) {
    context
        .service
        .create(create_request("ctrl0"))
        .await
        .expect("create should succeed");

    let error = context
        .service
        .update(
            UpdateNvmeControllerRequest::new(
                NvmeController::new(controller_spec()).with_name(canonical_name("ctrl0")),
            )
            .with_mask(FieldMask::new(["spec.queue_depth"])),
        )
        .await
        .expect_err("update should fail");

    assert_eq!(error.code(), ErrorCode::InvalidArgument);
    assert_eq!(
        context
            .backend
            .call_count(CREATE_CONTROLLER)
            .expect("call count"),
        1
    );
}

#[rstest]
#[tokio::test(flavor = "multi_thread")]
async fn stats_report_backend_counters(context: TestContext) {
    let created = context
        .service
        .create(create_request("ctrl0"))
        .await
        .expect("create should succeed");
    context
        .backend
        .set_stats(
            SUBSYSTEM_NQN,
            i64::from(created.spec.nvme_controller_id),
            ControllerStatsResult {
                num_read_bytes: 1024,
                num_read_cmds: 4,
                num_write_bytes: 512,
                num_write_cmds: 2,
                ..ControllerStatsResult::default()
            },
        )
        .expect("set_stats should succeed");

    let stats = context
        .service
        .stats(NvmeControllerStatsRequest::new(canonical_name("ctrl0")))
        .await
        .expect("stats should succeed");

    assert_eq!(stats.read_bytes_count, 1024);
    assert_eq!(stats.read_ops_count, 4);
    assert_eq!(stats.write_bytes_count, 512);
    assert_eq!(stats.write_ops_count, 2);
}

#[rstest]
#[tokio::test(flavor = "multi_thread")]
async fn concurrent_creates_of_one_name_register_one_controller(context: TestContext) {
    let handles: Vec<_> = (0..8)
        .map(|_| {
            let service = context.service.clone();
            tokio::spawn(async move { service.create(create_request("ctrl0")).await })
        })
        .collect();

    for handle in handles {
        handle
            .await
            .expect("task should join")
            .expect("create should succeed");
    }

    assert_eq!(context.registered_count(), 1);
    assert_eq!(
        context
            .backend
            .call_count(CREATE_CONTROLLER)
            .expect("call count"),
        1
    );
}
