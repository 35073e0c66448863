//! HTTP backend speaking the Elasticsearch search and multi-search APIs.

use std::time::Duration;

use async_trait::async_trait;
use reqwest::header::CONTENT_TYPE;
use reqwest::{Client, RequestBuilder, Response};
use secrecy::{ExposeSecret, SecretString};
use serde::Deserialize;
use tracing::{debug, warn};

use sitesearch_types::{DocumentHit, DocumentResults, SectionHit, Settings};

use crate::backend::SearchBackend;
use crate::error::ClientError;
use crate::query::SearchQuery;

/// Configuration for the HTTP backend.
#[derive(Debug, Clone)]
pub struct ElasticConfig {
    /// Engine base URL (e.g., "http://localhost:9200")
    pub endpoint: String,

    /// Index holding documents and sections
    pub index: String,

    /// Optional API key sent as `Authorization: ApiKey ...`
    pub api_key: Option<SecretString>,

    /// Request timeout
    pub timeout: Duration,
}

impl ElasticConfig {
    /// Create config for an endpoint and index with default timeout.
    pub fn new(endpoint: impl Into<String>, index: impl Into<String>) -> Self {
        Self {
            endpoint: endpoint.into(),
            index: index.into(),
            api_key: None,
            timeout: Duration::from_secs(10),
        }
    }

    /// Create config from loaded settings.
    pub fn from_settings(settings: &Settings) -> Self {
        Self {
            endpoint: settings.endpoint_url().to_string(),
            index: settings.index.clone(),
            api_key: settings.api_key.clone().map(SecretString::from),
            timeout: Duration::from_secs(settings.timeout_secs),
        }
    }

    pub fn with_api_key(mut self, key: impl Into<String>) -> Self {
        self.api_key = Some(SecretString::from(key.into()));
        self
    }

    fn url(&self, api: &str) -> String {
        format!("{}/{}/{}", self.endpoint.trim_end_matches('/'), self.index, api)
    }
}

/// Search backend over HTTP.
pub struct ElasticBackend {
    client: Client,
    config: ElasticConfig,
}

impl ElasticBackend {
    /// Create a new backend. No request is sent until the first search.
    pub fn new(config: ElasticConfig) -> Result<Self, ClientError> {
        if config.index.trim().is_empty() {
            return Err(ClientError::Config("index must not be empty".to_string()));
        }

        let client = Client::builder()
            .timeout(config.timeout)
            .build()
            .map_err(|e| ClientError::Config(e.to_string()))?;

        Ok(Self { client, config })
    }

    pub fn config(&self) -> &ElasticConfig {
        &self.config
    }

    fn authorize(&self, request: RequestBuilder) -> RequestBuilder {
        match &self.config.api_key {
            Some(key) => request.header(
                "Authorization",
                format!("ApiKey {}", key.expose_secret()),
            ),
            None => request,
        }
    }

    /// Read a response body, mapping non-success statuses to errors.
    async fn read_body(response: Response) -> Result<String, ClientError> {
        let status = response.status();
        if !status.is_success() {
            let body = response.text().await.unwrap_or_default();
            return Err(ClientError::Status {
                status: status.as_u16(),
                body,
            });
        }
        Ok(response.text().await?)
    }
}

/// `hits.total` is a bare number on old engines and an object on new ones.
#[derive(Deserialize)]
#[serde(untagged)]
enum Total {
    Count(u64),
    Object { value: u64 },
}

impl Total {
    fn value(&self) -> u64 {
        match self {
            Total::Count(n) => *n,
            Total::Object { value } => *value,
        }
    }
}

#[derive(Deserialize)]
struct HitsEnvelope {
    #[serde(default)]
    total: Option<Total>,
    #[serde(default)]
    hits: Vec<RawHit>,
}

#[derive(Deserialize)]
struct RawHit {
    #[serde(rename = "_id")]
    id: String,
    #[serde(rename = "_source", default)]
    source: RawSource,
    #[serde(default)]
    highlight: RawHighlight,
}

#[derive(Default, Deserialize)]
struct RawSource {
    #[serde(default)]
    title: String,
    #[serde(default)]
    location: String,
    #[serde(default)]
    text: String,
}

#[derive(Default, Deserialize)]
struct RawHighlight {
    #[serde(default)]
    title: Vec<String>,
    #[serde(default)]
    text: Vec<String>,
}

impl RawHighlight {
    fn fragment_count(&self) -> usize {
        self.title.len() + self.text.len()
    }
}

#[derive(Deserialize)]
struct SearchResponse {
    hits: HitsEnvelope,
}

#[derive(Deserialize)]
struct MultiSearchResponse {
    responses: Vec<MultiSearchItem>,
}

#[derive(Deserialize)]
struct MultiSearchItem {
    #[serde(default)]
    hits: Option<HitsEnvelope>,
    #[serde(default)]
    error: Option<serde_json::Value>,
}

fn to_document_hit(raw: RawHit) -> DocumentHit {
    let fragments = raw.highlight.fragment_count();
    let mut highlight = raw.highlight;
    DocumentHit {
        id: raw.id,
        title: raw.source.title,
        location: raw.source.location,
        highlighted_title: first_fragment(&mut highlight.title),
        highlighted_text: first_fragment(&mut highlight.text),
        highlight_fragments: fragments,
    }
}

fn to_section_hit(document_id: &str, raw: RawHit) -> SectionHit {
    let mut highlight = raw.highlight;
    SectionHit {
        document_id: document_id.to_string(),
        title: raw.source.title,
        location: raw.source.location,
        text: raw.source.text,
        highlighted_title: first_fragment(&mut highlight.title),
        highlighted_text: first_fragment(&mut highlight.text),
    }
}

fn first_fragment(fragments: &mut Vec<String>) -> Option<String> {
    if fragments.is_empty() {
        None
    } else {
        Some(fragments.swap_remove(0))
    }
}

/// Encode queries as a multi-search NDJSON body.
fn encode_msearch(queries: &[SearchQuery]) -> Result<String, ClientError> {
    let mut body = String::new();
    for query in queries {
        body.push_str("{}\n");
        body.push_str(&serde_json::to_string(query)?);
        body.push('\n');
    }
    Ok(body)
}

#[async_trait]
impl SearchBackend for ElasticBackend {
    async fn search(&self, query: &SearchQuery) -> Result<DocumentResults, ClientError> {
        let url = self.config.url("_search");
        debug!(url = %url, "Sending document query");

        let response = self
            .authorize(self.client.post(&url))
            .json(query)
            .send()
            .await?;

        let body = Self::read_body(response).await?;
        let parsed: SearchResponse = serde_json::from_str(&body)?;

        let total = parsed.hits.total.as_ref().map(Total::value);
        let hits: Vec<DocumentHit> = parsed.hits.hits.into_iter().map(to_document_hit).collect();
        let total = total.unwrap_or(hits.len() as u64);

        debug!(hits = hits.len(), total, "Document query complete");
        Ok(DocumentResults { hits, total })
    }

    async fn batch_search(
        &self,
        queries: &[SearchQuery],
    ) -> Result<Vec<Vec<SectionHit>>, ClientError> {
        if queries.is_empty() {
            return Ok(Vec::new());
        }

        let url = self.config.url("_msearch");
        let body = encode_msearch(queries)?;
        debug!(url = %url, queries = queries.len(), "Sending section batch");

        let response = self
            .authorize(self.client.post(&url))
            .header(CONTENT_TYPE, "application/x-ndjson")
            .body(body)
            .send()
            .await?;

        let body = Self::read_body(response).await?;
        let parsed: MultiSearchResponse = serde_json::from_str(&body)?;

        if parsed.responses.len() != queries.len() {
            return Err(ClientError::Decode(format!(
                "expected {} batch responses, got {}",
                queries.len(),
                parsed.responses.len()
            )));
        }

        let mut batches = Vec::with_capacity(queries.len());
        for (query, item) in queries.iter().zip(parsed.responses) {
            if let Some(error) = item.error {
                warn!(error = %error, "Section query failed inside batch");
                return Err(ClientError::Engine(error.to_string()));
            }
            let document_id = query.scoped_document_id().unwrap_or_default();
            let hits = item
                .hits
                .map(|envelope| envelope.hits)
                .unwrap_or_default()
                .into_iter()
                .map(|raw| to_section_hit(document_id, raw))
                .collect();
            batches.push(hits);
        }

        Ok(batches)
    }
}
