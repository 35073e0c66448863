//! End-to-end search pipeline tests for sitesearch.
//!
//! Drives the search box over the HTTP backend against a fake engine:
//! document query, scoped section batch, aggregation and painting.

use pretty_assertions::assert_eq;

use e2e_tests::{
    document_hit, highlighted_document_hit, msearch_response, search_response, section_hit,
    TestEngine,
};
use sitesearch_box::{InputOutcome, LifecycleState};
use sitesearch_types::{DocumentUnit, Fragment, RenderUnit, SectionUnit};

#[tokio::test]
async fn test_full_pipeline_renders_documents_then_sections() {
    let engine = TestEngine::start().await;
    engine
        .mount_documents(
            "install",
            search_response(
                2,
                vec![
                    highlighted_document_hit("guide", "Guide", "/guide/", &[], &["How to <em>install</em>"]),
                    document_hit("faq", "FAQ", "/faq/"),
                ],
            ),
        )
        .await;
    engine
        .mount_sections(
            "install",
            msearch_response(vec![
                vec![
                    section_hit("Guide", "/guide/#top", "Intro", Some("Read this, then <em>install</em>")),
                    section_hit("Setup", "/guide/#setup", "Run the installer now", None),
                ],
                vec![],
            ]),
            1,
        )
        .await;

    let mut search = engine.search_box(480.0);
    assert_eq!(search.on_focus("").await.unwrap(), InputOutcome::Initialized);

    let outcome = search.on_keyup("install").await.unwrap();

    assert_eq!(
        outcome,
        InputOutcome::Rendered {
            generation: 1,
            total: 2,
            painted: 4,
            pending: 0,
        }
    );
    let expected = vec![
        RenderUnit::Document(DocumentUnit {
            document_id: "guide".to_string(),
            title: Fragment::Plain("Guide".to_string()),
            teaser: Some("Read this, then <em>install</em>".to_string()),
            location: "/guide/".to_string(),
        }),
        RenderUnit::Section(SectionUnit {
            document_id: "guide".to_string(),
            title: Fragment::Plain("Guide".to_string()),
            body: Fragment::Highlighted("Read this, then <em>install</em>".to_string()),
            location: "/guide/#top".to_string(),
        }),
        RenderUnit::Section(SectionUnit {
            document_id: "guide".to_string(),
            title: Fragment::Plain("Setup".to_string()),
            body: Fragment::Plain("Run the installer now".to_string()),
            location: "/guide/#setup".to_string(),
        }),
        RenderUnit::Document(DocumentUnit {
            document_id: "faq".to_string(),
            title: Fragment::Plain("FAQ".to_string()),
            teaser: None,
            location: "/faq/".to_string(),
        }),
    ];
    assert_eq!(search.container().painted, expected);
    assert_eq!(search.meta().text, "2 results found");
}

#[tokio::test]
async fn test_section_queries_are_scoped_and_sized() {
    let engine = TestEngine::start().await;
    engine
        .mount_documents(
            "borrow",
            search_response(
                2,
                vec![
                    highlighted_document_hit(
                        "book",
                        "Book",
                        "/book/",
                        &["<em>Borrow</em>ing"],
                        &["the <em>borrow</em> checker", "<em>borrow</em>ed"],
                    ),
                    document_hit("ref", "Reference", "/ref/"),
                ],
            ),
        )
        .await;
    engine
        .mount_sections("borrow", msearch_response(vec![vec![], vec![]]), 1)
        .await;

    let mut search = engine.search_box(480.0);
    search.on_focus("").await.unwrap();
    search.on_keyup("borrow").await.unwrap();

    let requests = engine.server.received_requests().await.unwrap();
    let batch = requests
        .iter()
        .find(|r| r.url.path().ends_with("_msearch"))
        .expect("section batch was sent");
    let body = String::from_utf8(batch.body.clone()).unwrap();
    let lines: Vec<&str> = body.lines().collect();

    assert_eq!(lines.len(), 4);
    assert_eq!(lines[0], "{}");
    assert!(lines[1].contains(r#""id":"book""#));
    assert!(lines[1].contains(r#""size":3"#));
    assert!(lines[3].contains(r#""id":"ref""#));
    assert!(!lines[3].contains(r#""size""#));
}

#[tokio::test]
async fn test_zero_hits_skip_section_batch() {
    let engine = TestEngine::start().await;
    engine
        .mount_documents("nothing", search_response(0, vec![]))
        .await;
    engine
        .mount_sections("nothing", msearch_response(vec![]), 0)
        .await;

    let mut search = engine.search_box(480.0);
    search.on_focus("").await.unwrap();
    let outcome = search.on_keyup("nothing").await.unwrap();

    assert!(matches!(outcome, InputOutcome::Rendered { total: 0, painted: 0, .. }));
    assert_eq!(search.meta().text, "No results found");
    assert_eq!(engine.requests_to("_msearch").await, 0);
}

#[tokio::test]
async fn test_repeated_keyup_sends_one_query() {
    let engine = TestEngine::start().await;
    engine
        .mount_documents("rust", search_response(1, vec![document_hit("r", "Rust", "/rust/")]))
        .await;
    engine
        .mount_sections("rust", msearch_response(vec![vec![]]), 1)
        .await;

    let mut search = engine.search_box(480.0);
    search.on_focus("").await.unwrap();
    search.on_keyup("rust").await.unwrap();
    assert_eq!(search.on_keyup("rust").await.unwrap(), InputOutcome::Unchanged);
    assert_eq!(search.on_focus("rust").await.unwrap(), InputOutcome::Unchanged);

    assert_eq!(engine.requests_to("_search").await, 1);
    assert_eq!(search.meta().text, "1 result found");
}

#[tokio::test]
async fn test_focus_before_init_sends_nothing() {
    let engine = TestEngine::start().await;

    let mut search = engine.search_box(480.0);
    assert_eq!(search.lifecycle(), LifecycleState::Uninitialized);
    search.on_focus("already typed").await.unwrap();

    assert_eq!(search.lifecycle(), LifecycleState::Idle);
    assert_eq!(engine.requests_to("_search").await, 0);
    assert_eq!(search.meta().text, "Type to start searching");
}

#[tokio::test]
async fn test_scroll_paints_in_batches() {
    let engine = TestEngine::start().await;
    let hits = (0..14)
        .map(|i| document_hit(&format!("d{}", i), &format!("Page {}", i), &format!("/p{}/", i)))
        .collect();
    engine
        .mount_documents("page", search_response(14, hits))
        .await;
    engine
        .mount_sections("page", msearch_response(vec![vec![]; 14]), 1)
        .await;

    // With no visible height only the slack's worth of rows is painted eagerly
    let mut search = engine.search_box(0.0);
    search.on_focus("").await.unwrap();
    let outcome = search.on_keyup("page").await.unwrap();
    assert!(matches!(outcome, InputOutcome::Rendered { painted: 2, pending: 12, .. }));
    assert_eq!(search.on_scroll().unwrap(), 0);

    search.container_mut().scroll_to_bottom();
    assert_eq!(search.on_scroll().unwrap(), 10);
    assert_eq!(search.state().pending.len(), 2);

    search.container_mut().scroll_to_bottom();
    assert_eq!(search.on_scroll().unwrap(), 2);
    let titles: Vec<_> = search
        .container()
        .painted
        .iter()
        .map(|u| u.title().as_str().to_string())
        .collect();
    assert_eq!(titles.len(), 14);
    assert_eq!(titles.first().map(String::as_str), Some("Page 0"));
    assert_eq!(titles.last().map(String::as_str), Some("Page 13"));
}

#[tokio::test]
async fn test_clearing_input_restores_placeholder() {
    let engine = TestEngine::start().await;
    engine
        .mount_documents("docs", search_response(1, vec![document_hit("d", "Docs", "/docs/")]))
        .await;
    engine
        .mount_sections("docs", msearch_response(vec![vec![]]), 1)
        .await;

    let mut search = engine.search_box(480.0);
    search.on_focus("").await.unwrap();
    search.on_keyup("docs").await.unwrap();
    assert_eq!(search.container().painted.len(), 1);

    assert_eq!(search.on_keyup("").await.unwrap(), InputOutcome::Cleared);

    assert!(search.container().painted.is_empty());
    assert_eq!(search.meta().text, "Type to start searching");
    assert_eq!(engine.requests_to("_search").await, 1);
}
