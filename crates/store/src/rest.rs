//! PostgREST table client
//!
//! Speaks the REST dialect served under `<project-url>/rest/v1/`.

use std::time::Duration;

use async_trait::async_trait;
use reqwest::header::{HeaderMap, HeaderValue, AUTHORIZATION};
use reqwest::{Client, Response, Url};
use savegame_shared::{RemoteConfig, RemoteError, SaveError};
use serde_json::Value;

use crate::query::Query;
use crate::table::TableClient;

const REST_PATH: &str = "rest/v1";
const UPSERT_PREFER: &str = "resolution=merge-duplicates,return=representation";

/// Table client bound to one project URL and key
#[derive(Debug, Clone)]
pub struct RestTableClient {
    http: Client,
    base_url: Url,
}

impl RestTableClient {
    /// Build a client from credentials.
    ///
    /// Fails only on an unusable URL or key; nothing is sent yet.
    pub fn new(config: &RemoteConfig) -> Result<Self, SaveError> {
        let mut builder = Client::builder().default_headers(auth_headers(&config.anon_key)?);
        if let Some(secs) = config.timeout_secs {
            builder = builder.timeout(Duration::from_secs(secs));
        }
        let http = builder
            .build()
            .map_err(|e| SaveError::Config(format!("Failed to build HTTP client: {}", e)))?;

        Self::with_client(&config.url, http)
    }

    /// Use a preconfigured HTTP client. It must already send the auth headers.
    pub fn with_client(url: &str, http: Client) -> Result<Self, SaveError> {
        let base_url = Url::parse(url.trim_end_matches('/'))
            .map_err(|e| SaveError::Config(format!("Invalid remote URL '{}': {}", url, e)))?;

        if base_url.cannot_be_a_base() {
            return Err(SaveError::Config(format!(
                "Remote URL '{}' cannot be used as a base URL",
                url
            )));
        }

        Ok(Self { http, base_url })
    }

    /// Endpoint for a table
    pub fn table_url(&self, table: &str) -> Url {
        let mut url = self.base_url.clone();
        if let Ok(mut segments) = url.path_segments_mut() {
            segments.pop_if_empty();
            for segment in REST_PATH.split('/') {
                segments.push(segment);
            }
            segments.push(table);
        }
        url
    }
}

#[async_trait]
impl TableClient for RestTableClient {
    async fn upsert(
        &self,
        table: &str,
        row: Value,
        on_conflict: &str,
    ) -> Result<Vec<Value>, RemoteError> {
        let response = self
            .http
            .post(self.table_url(table))
            .query(&[("on_conflict", on_conflict)])
            .header("Prefer", UPSERT_PREFER)
            .json(&row)
            .send()
            .await
            .map_err(transport_error)?;

        tracing::debug!(table, status = %response.status(), "Upsert answered");
        read_rows(response).await
    }

    async fn select(&self, query: &Query) -> Result<Vec<Value>, RemoteError> {
        let response = self
            .http
            .get(self.table_url(query.table()))
            .query(&query.to_params())
            .send()
            .await
            .map_err(transport_error)?;

        tracing::debug!(table = query.table(), status = %response.status(), "Select answered");
        read_rows(response).await
    }
}

/// `apikey` and `Authorization` headers for an anonymous key
pub fn auth_headers(anon_key: &str) -> Result<HeaderMap, SaveError> {
    let invalid = |_| SaveError::Config("Anon key contains invalid characters".to_string());

    let mut headers = HeaderMap::new();
    headers.insert("apikey", HeaderValue::from_str(anon_key).map_err(invalid)?);
    headers.insert(
        AUTHORIZATION,
        HeaderValue::from_str(&format!("Bearer {}", anon_key)).map_err(invalid)?,
    );
    Ok(headers)
}

fn transport_error(err: reqwest::Error) -> RemoteError {
    RemoteError::Transport(err.to_string())
}

async fn read_rows(response: Response) -> Result<Vec<Value>, RemoteError> {
    let status = response.status();
    let body = response.text().await.map_err(transport_error)?;

    if !status.is_success() {
        return Err(RemoteError::Api {
            status: status.as_u16(),
            message: api_message(&body),
        });
    }

    parse_rows(&body)
}

/// Rows from a success body. An empty body (`return=minimal`) has none.
fn parse_rows(body: &str) -> Result<Vec<Value>, RemoteError> {
    if body.trim().is_empty() {
        return Ok(Vec::new());
    }

    match serde_json::from_str(body) {
        Ok(Value::Array(rows)) => Ok(rows),
        Ok(Value::Null) => Ok(Vec::new()),
        Ok(row) => Ok(vec![row]),
        Err(e) => Err(RemoteError::Decode(e.to_string())),
    }
}

/// PostgREST puts a human-readable `message` in its error bodies
fn api_message(body: &str) -> String {
    serde_json::from_str::<Value>(body)
        .ok()
        .and_then(|v| v.get("message").and_then(Value::as_str).map(str::to_string))
        .unwrap_or_else(|| body.trim().to_string())
}
