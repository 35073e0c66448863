//! End-to-end test infrastructure for sitesearch.
//!
//! Provides a fake search engine on a local HTTP server and helpers to
//! drive a search box over the real HTTP backend.

use std::sync::Arc;

use serde_json::{json, Value};
use wiremock::matchers::{body_string_contains, method, path};
use wiremock::{Mock, MockServer, ResponseTemplate};

use sitesearch_box::{MemoryMeta, SearchBox};
use sitesearch_client::{ElasticBackend, ElasticConfig};
use sitesearch_render::MemoryContainer;

/// Index name every harness serves.
pub const TEST_INDEX: &str = "site";

/// Row height used by harness containers.
pub const ROW_HEIGHT: f64 = 16.0;

/// Search box type driven by the end-to-end tests.
pub type TestSearchBox = SearchBox<ElasticBackend, MemoryContainer, MemoryMeta>;

/// Fake engine for end-to-end tests.
pub struct TestEngine {
    pub server: MockServer,
}

impl TestEngine {
    /// Start the fake engine on a random local port.
    pub async fn start() -> Self {
        Self {
            server: MockServer::start().await,
        }
    }

    pub fn config(&self) -> ElasticConfig {
        ElasticConfig::new(self.server.uri(), TEST_INDEX)
    }

    /// Build a search box whose container shows `client_height` units.
    pub fn search_box(&self, client_height: f64) -> TestSearchBox {
        let config = self.config();
        SearchBox::builder(move || ElasticBackend::new(config.clone()).map(Arc::new))
            .container(MemoryContainer::new(client_height, ROW_HEIGHT))
            .meta(MemoryMeta::default())
            .build()
            .expect("Failed to build search box")
    }

    /// Answer stage-1 queries containing `text` with `body`.
    pub async fn mount_documents(&self, text: &str, body: Value) {
        Mock::given(method("POST"))
            .and(path(format!("/{}/_search", TEST_INDEX)))
            .and(body_string_contains(text))
            .respond_with(ResponseTemplate::new(200).set_body_json(body))
            .mount(&self.server)
            .await;
    }

    /// Answer stage-1 queries containing `text` with an error status.
    pub async fn mount_document_failure(&self, text: &str, status: u16) {
        Mock::given(method("POST"))
            .and(path(format!("/{}/_search", TEST_INDEX)))
            .and(body_string_contains(text))
            .respond_with(ResponseTemplate::new(status).set_body_string("engine unavailable"))
            .mount(&self.server)
            .await;
    }

    /// Answer section batches containing `text` with `body`.
    ///
    /// `expected` is verified when the engine is dropped.
    pub async fn mount_sections(&self, text: &str, body: Value, expected: u64) {
        Mock::given(method("POST"))
            .and(path(format!("/{}/_msearch", TEST_INDEX)))
            .and(body_string_contains(text))
            .respond_with(ResponseTemplate::new(200).set_body_json(body))
            .expect(expected)
            .mount(&self.server)
            .await;
    }

    /// Fail every section batch with the given status.
    pub async fn mount_section_failure(&self, status: u16) {
        Mock::given(method("POST"))
            .and(path(format!("/{}/_msearch", TEST_INDEX)))
            .respond_with(ResponseTemplate::new(status))
            .mount(&self.server)
            .await;
    }

    /// Requests received so far whose path ends with `api`.
    pub async fn requests_to(&self, api: &str) -> usize {
        self.server
            .received_requests()
            .await
            .unwrap_or_default()
            .iter()
            .filter(|request| request.url.path().ends_with(api))
            .count()
    }
}

/// A stage-1 hit in engine wire format.
pub fn document_hit(id: &str, title: &str, location: &str) -> Value {
    json!({
        "_id": id,
        "_source": {"title": title, "location": location}
    })
}

/// A stage-1 hit carrying highlight fragments.
pub fn highlighted_document_hit(
    id: &str,
    title: &str,
    location: &str,
    title_fragments: &[&str],
    text_fragments: &[&str],
) -> Value {
    json!({
        "_id": id,
        "_source": {"title": title, "location": location},
        "highlight": {"title": title_fragments, "text": text_fragments}
    })
}

/// A stage-2 hit in engine wire format.
pub fn section_hit(title: &str, location: &str, text: &str, highlighted_text: Option<&str>) -> Value {
    let mut hit = json!({
        "_id": format!("{}-section", location),
        "_source": {"title": title, "location": location, "text": text}
    });
    if let Some(fragment) = highlighted_text {
        hit["highlight"] = json!({"text": [fragment]});
    }
    hit
}

/// A `_search` response body.
pub fn search_response(total: u64, hits: Vec<Value>) -> Value {
    json!({
        "hits": {
            "total": {"value": total, "relation": "eq"},
            "hits": hits
        }
    })
}

/// An `_msearch` response body with one hit list per query.
pub fn msearch_response(batches: Vec<Vec<Value>>) -> Value {
    let responses: Vec<Value> = batches
        .into_iter()
        .map(|hits| json!({"hits": {"hits": hits}}))
        .collect();
    json!({ "responses": responses })
}
