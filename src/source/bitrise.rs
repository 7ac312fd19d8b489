//! source::bitrise
//!
//! Bitrise stack-info API client.
//!
//! # API
//!
//! `GET <endpoint>` returns a JSON object:
//!
//! ```json
//! {
//!   "available_stacks": ["osx-xcode-14.1.x", "osx-xcode-13.2.x", "linux-docker-android-20.04"],
//!   "project_types_with_default_stacks": { ... },
//!   "running_builds_on_private_cloud": false
//! }
//! ```
//!
//! Only `available_stacks` is read. The endpoint needs no authentication.
//!
//! # Retries
//!
//! None. A request either succeeds or the run fails; retrying is up to the
//! CI job that invokes the tool.

use std::time::Duration;

use async_trait::async_trait;
use reqwest::header::{HeaderMap, HeaderValue, ACCEPT};
use reqwest::{Client, StatusCode};
use serde::Deserialize;
use tracing::debug;

use super::traits::{SourceError, StackSource};

/// Default stack-info endpoint.
pub const DEFAULT_ENDPOINT: &str = "https://app.bitrise.io/app/6c06d3a40422d10f/all_stack_info";

/// User-Agent header value for API requests.
const USER_AGENT_VALUE: &str = concat!("stackwatch/", env!("CARGO_PKG_VERSION"));

/// Response shape of the stack-info endpoint.
#[derive(Debug, Deserialize)]
struct StackInfoResponse {
    available_stacks: Vec<String>,
}

/// Stack source backed by the Bitrise stack-info endpoint.
#[derive(Debug, Clone)]
pub struct BitriseStackSource {
    /// HTTP client for making requests
    client: Client,
    /// Full URL of the stack-info endpoint
    endpoint: String,
}

impl BitriseStackSource {
    /// Create a source for `endpoint`.
    ///
    /// `timeout` bounds the whole request; `None` uses reqwest's default
    /// (no timeout).
    pub fn new(endpoint: impl Into<String>, timeout: Option<Duration>) -> Result<Self, SourceError> {
        let mut headers = HeaderMap::new();
        headers.insert(ACCEPT, HeaderValue::from_static("application/json"));

        let mut builder = Client::builder()
            .user_agent(USER_AGENT_VALUE)
            .default_headers(headers);
        if let Some(timeout) = timeout {
            builder = builder.timeout(timeout);
        }

        let client = builder
            .build()
            .map_err(|e| SourceError::Network(format!("failed to build HTTP client: {}", e)))?;

        Ok(Self {
            client,
            endpoint: endpoint.into(),
        })
    }

    /// The endpoint this source queries.
    pub fn endpoint(&self) -> &str {
        &self.endpoint
    }
}

#[async_trait]
impl StackSource for BitriseStackSource {
    fn name(&self) -> &'static str {
        "bitrise"
    }

    async fn available_stacks(&self) -> Result<Vec<String>, SourceError> {
        debug!(endpoint = %self.endpoint, "fetching stack info");

        let response = self
            .client
            .get(&self.endpoint)
            .send()
            .await
            .map_err(|e| SourceError::Network(e.to_string()))?;

        let status = response.status();
        if !status.is_success() {
            let body = response.text().await.unwrap_or_default();
            return Err(status_error(status, body));
        }

        let info: StackInfoResponse = response
            .json()
            .await
            .map_err(|e| SourceError::Decode(e.to_string()))?;

        debug!(count = info.available_stacks.len(), "received stack list");
        Ok(info.available_stacks)
    }
}

fn status_error(status: StatusCode, body: String) -> SourceError {
    let body = body.trim();
    let message = if body.is_empty() {
        status
            .canonical_reason()
            .unwrap_or("unknown error")
            .to_string()
    } else {
        body.chars().take(200).collect()
    };

    SourceError::Status {
        status: status.as_u16(),
        message,
    }
}
