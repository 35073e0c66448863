//! Failure and race handling tests for sitesearch.
//!
//! A failed search renders nothing and leaves the previous list and
//! summary in place. A late response for an older search is dropped.

use std::sync::Arc;

use pretty_assertions::assert_eq;

use e2e_tests::{document_hit, msearch_response, search_response, TestEngine, ROW_HEIGHT};
use sitesearch_box::{InputAction, InputOutcome, LifecycleState, MemoryMeta, SearchBox, SearchBoxError};
use sitesearch_client::{ClientError, ElasticBackend, ElasticConfig};
use sitesearch_render::MemoryContainer;

#[tokio::test]
async fn test_document_query_failure_keeps_previous_results() {
    let engine = TestEngine::start().await;
    engine
        .mount_documents("good", search_response(1, vec![document_hit("g", "Good", "/good/")]))
        .await;
    engine
        .mount_sections("good", msearch_response(vec![vec![]]), 1)
        .await;
    engine.mount_document_failure("bad", 503).await;

    let mut search = engine.search_box(480.0);
    search.on_focus("").await.unwrap();
    search.on_keyup("good").await.unwrap();

    let err = search.on_keyup("bad").await.unwrap_err();

    match err {
        SearchBoxError::QueryFailed(ClientError::Status { status, body }) => {
            assert_eq!(status, 503);
            assert_eq!(body, "engine unavailable");
        }
        other => panic!("Expected status failure, got {:?}", other),
    }
    assert_eq!(search.meta().text, "1 result found");
    assert_eq!(search.container().painted.len(), 1);
    assert_eq!(search.lifecycle(), LifecycleState::Idle);
}

#[tokio::test]
async fn test_section_batch_failure_renders_nothing() {
    let engine = TestEngine::start().await;
    engine
        .mount_documents("docs", search_response(1, vec![document_hit("d", "Docs", "/docs/")]))
        .await;
    engine.mount_section_failure(500).await;

    let mut search = engine.search_box(480.0);
    search.on_focus("").await.unwrap();
    let err = search.on_keyup("docs").await.unwrap_err();

    assert!(matches!(
        err,
        SearchBoxError::QueryFailed(ClientError::Status { status: 500, .. })
    ));
    assert!(search.container().painted.is_empty());
    assert_eq!(search.meta().text, "Type to start searching");
}

#[tokio::test]
async fn test_failed_text_is_not_retried_until_it_changes() {
    let engine = TestEngine::start().await;
    engine.mount_document_failure("flaky", 500).await;

    let mut search = engine.search_box(480.0);
    search.on_focus("").await.unwrap();
    assert!(search.on_keyup("flaky").await.is_err());
    assert_eq!(search.on_keyup("flaky").await.unwrap(), InputOutcome::Unchanged);

    assert_eq!(engine.requests_to("_search").await, 1);
}

#[tokio::test]
async fn test_unreachable_engine_is_a_query_failure() {
    let config = ElasticConfig::new("http://127.0.0.1:1", "site");
    let mut search: SearchBox<ElasticBackend, MemoryContainer, MemoryMeta> =
        SearchBox::builder(move || ElasticBackend::new(config.clone()).map(Arc::new))
            .container(MemoryContainer::new(480.0, ROW_HEIGHT))
            .meta(MemoryMeta::default())
            .build()
            .unwrap();

    search.on_focus("").await.unwrap();
    let err = search.on_keyup("anything").await.unwrap_err();

    assert!(matches!(err, SearchBoxError::QueryFailed(ClientError::Http(_))));
}

#[tokio::test]
async fn test_late_response_for_older_search_is_dropped() {
    let engine = TestEngine::start().await;
    engine
        .mount_documents(
            "alpha",
            search_response(
                2,
                vec![document_hit("a1", "Alpha one", "/a1/"), document_hit("a2", "Alpha two", "/a2/")],
            ),
        )
        .await;
    engine
        .mount_sections("alpha", msearch_response(vec![vec![], vec![]]), 1)
        .await;
    engine
        .mount_documents("beta", search_response(1, vec![document_hit("b", "Beta", "/b/")]))
        .await;
    engine
        .mount_sections("beta", msearch_response(vec![vec![]]), 1)
        .await;

    let mut search = engine.search_box(480.0);
    search.on_focus("").await.unwrap();

    let InputAction::Search(older) = search.accept_input("alpha").unwrap() else {
        panic!("Expected a search for alpha");
    };
    let InputAction::Search(newer) = search.accept_input("beta").unwrap() else {
        panic!("Expected a search for beta");
    };
    assert_eq!(search.lifecycle(), LifecycleState::Querying);

    // Both searches are in flight at once; the newer one completes first
    let (older, newer) = tokio::join!(older.run(), newer.run());
    let outcome = search.complete(newer).unwrap();
    assert!(matches!(outcome, InputOutcome::Rendered { generation: 2, total: 1, .. }));

    assert_eq!(
        search.complete(older).unwrap(),
        InputOutcome::Stale { generation: 1 }
    );
    assert_eq!(search.meta().text, "1 result found");
    assert_eq!(search.container().painted.len(), 1);
    assert_eq!(search.container().painted[0].document_id(), "b");
}

#[tokio::test]
async fn test_detached_container_is_an_invalid_binding() {
    let engine = TestEngine::start().await;
    let mut search = engine.search_box(480.0);
    search.on_focus("").await.unwrap();

    search.container_mut().connected = false;

    assert!(matches!(
        search.on_keyup("x").await,
        Err(SearchBoxError::InvalidBinding(_))
    ));
    assert_eq!(engine.requests_to("_search").await, 0);
}
