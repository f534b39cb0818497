//! HTTP transport and the façade client.
//!
//! [`NebClient`] is the single entry point: resource modules attach one
//! method per API operation to it. The transport itself is deliberately
//! thin: one POST per operation, no retries, no caching, no in-flight
//! deduplication. Authentication material is applied as headers at build
//! time and never inspected afterwards.

use std::time::Duration;

use reqwest::header::{HeaderMap, HeaderName, HeaderValue, AUTHORIZATION, CONTENT_TYPE};
use serde::de::DeserializeOwned;
use serde::Deserialize;
use serde_json::json;
use tracing::debug;

use crate::error::{GraphqlError, NebClientError};
use crate::operation::Operation;
use crate::page::ItemList;

/// The public endpoint of the nebulon ON cloud control plane.
pub const DEFAULT_ENDPOINT: &str = "https://ucapi.nebcloud.nebuloninc.com/query";

const DEFAULT_TIMEOUT: Duration = Duration::from_secs(60);

/// The GraphQL response envelope.
#[derive(Debug, Deserialize)]
struct Envelope {
    #[serde(default)]
    data: Option<serde_json::Map<String, serde_json::Value>>,
    #[serde(default)]
    errors: Vec<GraphqlError>,
}

/// Builder for [`NebClient`].
#[derive(Debug, Clone)]
pub struct NebClientBuilder {
    endpoint: String,
    headers: HeaderMap,
    timeout: Duration,
    client_name: String,
    client_version: String,
}

impl NebClientBuilder {
    /// Create a builder targeting the default cloud endpoint.
    #[must_use]
    pub fn new() -> Self {
        let mut headers = HeaderMap::new();
        headers.insert(CONTENT_TYPE, HeaderValue::from_static("application/json"));
        Self {
            endpoint: DEFAULT_ENDPOINT.to_string(),
            headers,
            timeout: DEFAULT_TIMEOUT,
            client_name: env!("CARGO_PKG_NAME").to_string(),
            client_version: env!("CARGO_PKG_VERSION").to_string(),
        }
    }

    /// Override the API endpoint (for testing or on-premises deployments).
    #[must_use]
    pub fn with_endpoint(mut self, endpoint: impl Into<String>) -> Self {
        self.endpoint = endpoint.into();
        self
    }

    /// Add a header applied to every request.
    #[must_use]
    pub fn with_header(mut self, name: HeaderName, value: HeaderValue) -> Self {
        self.headers.insert(name, value);
        self
    }

    /// Attach a bearer session token.
    #[must_use]
    pub fn with_session_token(mut self, token: impl AsRef<str>) -> Self {
        let value = format!("Bearer {}", token.as_ref());
        if let Ok(header) = HeaderValue::from_str(&value) {
            self.headers.insert(AUTHORIZATION, header);
        }
        self
    }

    /// Set the request timeout.
    #[must_use]
    pub const fn with_timeout(mut self, timeout: Duration) -> Self {
        self.timeout = timeout;
        self
    }

    /// Advertise a custom application name and version in the audit log.
    #[must_use]
    pub fn with_client_info(
        mut self,
        name: impl Into<String>,
        version: impl Into<String>,
    ) -> Self {
        self.client_name = name.into();
        self.client_version = version.into();
        self
    }

    /// Build the client.
    pub fn build(mut self) -> Result<NebClient, NebClientError> {
        let app = format!("{}/{}", self.client_name, self.client_version);
        if let Ok(header) = HeaderValue::from_str(&app) {
            self.headers
                .insert(HeaderName::from_static("nebulon-client-app"), header);
        }
        let platform = format!("{}/{}", std::env::consts::OS, std::env::consts::ARCH);
        if let Ok(header) = HeaderValue::from_str(&platform) {
            self.headers
                .insert(HeaderName::from_static("nebulon-client-platform"), header);
        }

        let http = reqwest::Client::builder()
            .default_headers(self.headers)
            .timeout(self.timeout)
            .build()?;

        Ok(NebClient {
            endpoint: self.endpoint,
            http,
        })
    }
}

impl Default for NebClientBuilder {
    fn default() -> Self {
        Self::new()
    }
}

/// Client for the nebulon ON GraphQL API.
///
/// Cheap to clone and safe to share across tasks; every call is an
/// independent request/response exchange with no retained state.
#[derive(Debug, Clone)]
pub struct NebClient {
    endpoint: String,
    http: reqwest::Client,
}

impl NebClient {
    /// Start building a client.
    #[must_use]
    pub fn builder() -> NebClientBuilder {
        NebClientBuilder::new()
    }

    /// Execute an operation and materialize the reply under its name.
    pub(crate) async fn call<T: DeserializeOwned>(
        &self,
        operation: Operation,
    ) -> Result<T, NebClientError> {
        let name = operation.name();
        let value = self.execute(&operation).await?;
        serde_json::from_value(value).map_err(|err| {
            NebClientError::protocol(format!("{name}: reply did not match schema: {err}"))
        })
    }

    /// Execute a list operation and check the wrapper invariant.
    pub(crate) async fn call_list<T: DeserializeOwned>(
        &self,
        operation: Operation,
    ) -> Result<ItemList<T>, NebClientError> {
        let name = operation.name();
        let list: ItemList<T> = self.call(operation).await?;
        list.checked(name)
    }

    async fn execute(
        &self,
        operation: &Operation,
    ) -> Result<serde_json::Value, NebClientError> {
        let name = operation.name();
        let document = operation.render();
        let variables = operation.variables();
        debug!(operation = name, "dispatching GraphQL request");

        let body = json!({
            "query": document,
            "variables": variables,
        });

        let response = self.http.post(&self.endpoint).json(&body).send().await?;
        let status = response.status();
        let bytes = response.bytes().await?;

        if !status.is_success() {
            return Err(NebClientError::HttpStatus {
                status,
                body: truncate_body(&bytes),
            });
        }

        let envelope: Envelope = serde_json::from_slice(&bytes)?;
        if !envelope.errors.is_empty() {
            return Err(NebClientError::Graphql {
                errors: envelope.errors,
            });
        }

        let mut data = envelope
            .data
            .ok_or_else(|| NebClientError::protocol(format!("{name}: reply carries no data")))?;
        data.remove(name)
            .ok_or_else(|| NebClientError::protocol(format!("{name}: reply is missing the operation result")))
    }
}

fn truncate_body(bytes: &[u8]) -> String {
    const MAX_LEN: usize = 4096;
    let mut body = String::from_utf8_lossy(bytes).to_string();
    if body.len() > MAX_LEN {
        let mut cut = MAX_LEN;
        while !body.is_char_boundary(cut) {
            cut -= 1;
        }
        body.truncate(cut);
        body.push('…');
    }
    body
}
