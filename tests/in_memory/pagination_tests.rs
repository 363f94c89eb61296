//! In-memory integration tests for paginated controller listing.

use super::helpers::{SUBSYSTEM_KEY, SUBSYSTEM_NQN, TestContext, context, context_with};
use marvell_bridge::frontend::{
    config::FrontendConfig,
    ports::procedures::LIST_CONTROLLERS,
    services::{
        ErrorCode, ListNvmeControllersRequest, ListNvmeControllersResponse,
        NvmeControllerServiceError,
    },
};
use rstest::rstest;

async fn collect_all_pages(context: &TestContext, page_size: i32) -> (Vec<i32>, usize) {
    let mut ids = Vec::new();
    let mut pages = 0;
    let mut token = String::new();
    loop {
        let page = context
            .service
            .list(
                ListNvmeControllersRequest::new(SUBSYSTEM_KEY)
                    .with_page_size(page_size)
                    .with_page_token(token.clone()),
            )
            .await
            .expect("list should succeed");
        pages += 1;
        ids.extend(
            page.nvme_controllers
                .iter()
                .map(|controller| controller.spec.nvme_controller_id),
        );
        if page.next_page_token.is_empty() {
            return (ids, pages);
        }
        token = page.next_page_token;
    }
}

#[rstest]
#[case(1, 7)]
#[case(3, 3)]
#[case(7, 1)]
#[case(0, 1)]
#[case(100, 1)]
#[tokio::test(flavor = "multi_thread")]
async fn token_chain_enumerates_every_controller_once(
    #[case] page_size: i32,
    #[case] expected_pages: usize,
) {
    let context = context_with(FrontendConfig::default());
    context
        .backend
        .seed_controllers(SUBSYSTEM_NQN, [12, 3, 7, 1, 30, 4, 9])
        .expect("seed should succeed");

    let (ids, pages) = collect_all_pages(&context, page_size).await;

    assert_eq!(ids, vec![1, 3, 4, 7, 9, 12, 30]);
    assert_eq!(pages, expected_pages);
}

#[rstest]
#[tokio::test(flavor = "multi_thread")]
async fn page_size_is_clamped_to_configured_maximum() {
    let context = context_with(FrontendConfig::default().with_page_sizes(2, 3));
    context
        .backend
        .seed_controllers(SUBSYSTEM_NQN, 1..=5)
        .expect("seed should succeed");

    let defaulted = context
        .service
        .list(ListNvmeControllersRequest::new(SUBSYSTEM_KEY))
        .await
        .expect("list should succeed");
    let clamped = context
        .service
        .list(ListNvmeControllersRequest::new(SUBSYSTEM_KEY).with_page_size(50))
        .await
        .expect("list should succeed");

    assert_eq!(defaulted.nvme_controllers.len(), 2);
    assert_eq!(clamped.nvme_controllers.len(), 3);
    assert!(!clamped.next_page_token.is_empty());
}

#[rstest]
#[tokio::test(flavor = "multi_thread")]
async fn replayed_token_serves_the_same_page(context: TestContext) {
    context
        .backend
        .seed_controllers(SUBSYSTEM_NQN, 1..=5)
        .expect("seed should succeed");
    let first = context
        .service
        .list(ListNvmeControllersRequest::new(SUBSYSTEM_KEY).with_page_size(2))
        .await
        .expect("list should succeed");
    let request = ListNvmeControllersRequest::new(SUBSYSTEM_KEY)
        .with_page_size(2)
        .with_page_token(first.next_page_token.clone());

    let once = context
        .service
        .list(request.clone())
        .await
        .expect("list should succeed");
    let again = context
        .service
        .list(request)
        .await
        .expect("replayed token should resolve");

    let ids = |page: &ListNvmeControllersResponse| {
        page.nvme_controllers
            .iter()
            .map(|controller| controller.spec.nvme_controller_id)
            .collect::<Vec<_>>()
    };
    assert_eq!(ids(&once), vec![3, 4]);
    assert_eq!(ids(&again), ids(&once));
}

#[rstest]
#[tokio::test(flavor = "multi_thread")]
async fn empty_subsystem_lists_nothing(context: TestContext) {
    let page = context
        .service
        .list(ListNvmeControllersRequest::new(SUBSYSTEM_KEY))
        .await
        .expect("list should succeed");

    assert!(page.nvme_controllers.is_empty());
    assert!(page.next_page_token.is_empty());
}

#[rstest]
#[tokio::test(flavor = "multi_thread")]
async fn unknown_parent_is_not_found(context: TestContext) {
    let error = context
        .service
        .list(ListNvmeControllersRequest::new("subsys9"))
        .await
        .expect_err("list should fail");

    assert!(matches!(
        error,
        NvmeControllerServiceError::SubsystemNotFound(_)
    ));
    assert_eq!(
        context
            .backend
            .call_count(LIST_CONTROLLERS)
            .expect("call count"),
        0
    );
}

#[rstest]
#[tokio::test(flavor = "multi_thread")]
async fn forged_token_is_not_found(context: TestContext) {
    let error = context
        .service
        .list(ListNvmeControllersRequest::new(SUBSYSTEM_KEY).with_page_token("not-a-token"))
        .await
        .expect_err("list should fail");

    assert_eq!(error.code(), ErrorCode::NotFound);
}

#[rstest]
#[tokio::test(flavor = "multi_thread")]
async fn missing_parent_is_invalid(context: TestContext) {
    let error = context
        .service
        .list(ListNvmeControllersRequest::new(""))
        .await
        .expect_err("list should fail");

    assert_eq!(error.code(), ErrorCode::InvalidArgument);
}
