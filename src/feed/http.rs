//! JSON-over-HTTP feed source.
//!
//! Pages are JSON documents of the form
//! `{"entries": [...], "next": "<uri>" | null}`. Entries are deleted with
//! `DELETE <edit link>` and retagged with `PUT <edit link>` and a
//! `{"tags": [...]}` body.

use super::{EntryMutator, FeedSource};
use crate::models::{Entry, FeedPage, RequestFailure};
use crate::{Error, Result};
use secrecy::{ExposeSecret, SecretString};
use serde::Serialize;
use std::time::Duration;
use tracing::instrument;

/// HTTP client configuration for feed requests.
#[derive(Debug, Clone, Copy)]
pub struct HttpFeedConfig {
    /// Request timeout in milliseconds (0 to disable).
    pub timeout_ms: u64,
    /// Connect timeout in milliseconds (0 to disable).
    pub connect_timeout_ms: u64,
}

impl Default for HttpFeedConfig {
    fn default() -> Self {
        Self {
            timeout_ms: 30_000,
            connect_timeout_ms: 5_000,
        }
    }
}

/// Feed source backed by a JSON feed service.
pub struct HttpFeedSource {
    /// Bearer token sent with every request.
    token: Option<SecretString>,
    /// HTTP client.
    client: reqwest::blocking::Client,
}

#[derive(Serialize)]
struct TagUpdate<'a> {
    tags: &'a [String],
}

impl HttpFeedSource {
    /// Creates a source with default timeouts and no token.
    #[must_use]
    pub fn new() -> Self {
        Self::with_config(HttpFeedConfig::default())
    }

    /// Creates a source with the given timeouts.
    #[must_use]
    pub fn with_config(config: HttpFeedConfig) -> Self {
        Self {
            token: None,
            client: build_http_client(config),
        }
    }

    /// Sets the bearer token.
    #[must_use]
    pub fn with_token(mut self, token: SecretString) -> Self {
        self.token = Some(token);
        self
    }

    fn request(&self, method: reqwest::Method, uri: &str) -> reqwest::blocking::RequestBuilder {
        let mut req = self.client.request(method, uri);
        if let Some(ref token) = self.token {
            req = req.bearer_auth(token.expose_secret());
        }
        req
    }

    /// Converts a response into an error if its status is not a success.
    fn check(response: reqwest::blocking::Response) -> Result<reqwest::blocking::Response> {
        let status = response.status();
        if status.is_success() {
            return Ok(response);
        }

        let reason = status.canonical_reason().unwrap_or("Unknown").to_string();
        let body = response.text().unwrap_or_default();
        Err(RequestFailure::new(Some(status.as_u16()), reason, body).into())
    }
}

impl Default for HttpFeedSource {
    fn default() -> Self {
        Self::new()
    }
}

impl FeedSource for HttpFeedSource {
    #[instrument(skip(self))]
    fn fetch(&self, uri: &str) -> Result<Option<FeedPage>> {
        let response = self
            .request(reqwest::Method::GET, uri)
            .send()
            .map_err(transport_error)?;

        if response.status() == reqwest::StatusCode::NO_CONTENT {
            return Ok(None);
        }

        let response = Self::check(response)?;
        let page: FeedPage = response.json().map_err(|e| Error::OperationFailed {
            operation: "parse_feed_page".to_string(),
            cause: e.to_string(),
        })?;

        tracing::debug!(
            entries = page.entries.len(),
            has_next = page.next.is_some(),
            "Fetched page"
        );
        Ok(Some(page))
    }
}

impl EntryMutator for HttpFeedSource {
    #[instrument(skip(self, entry), fields(entry_id = %entry.id))]
    fn delete(&self, entry: &Entry) -> Result<()> {
        let response = self
            .request(reqwest::Method::DELETE, entry.mutation_target())
            .send()
            .map_err(transport_error)?;
        Self::check(response)?;
        Ok(())
    }

    #[instrument(skip(self, entry, tags), fields(entry_id = %entry.id))]
    fn set_tags(&self, entry: &Entry, tags: &[String]) -> Result<()> {
        let response = self
            .request(reqwest::Method::PUT, entry.mutation_target())
            .json(&TagUpdate { tags })
            .send()
            .map_err(transport_error)?;
        Self::check(response)?;
        Ok(())
    }
}

#[allow(clippy::needless_pass_by_value)]
fn transport_error(e: reqwest::Error) -> Error {
    RequestFailure::transport(e.to_string()).into()
}

/// Builds a blocking HTTP client with optional timeouts.
fn build_http_client(config: HttpFeedConfig) -> reqwest::blocking::Client {
    let mut builder = reqwest::blocking::Client::builder();
    if config.timeout_ms > 0 {
        builder = builder.timeout(Duration::from_millis(config.timeout_ms));
    }
    if config.connect_timeout_ms > 0 {
        builder = builder.connect_timeout(Duration::from_millis(config.connect_timeout_ms));
    }

    builder.build().unwrap_or_else(|err| {
        tracing::warn!("Failed to build feed HTTP client: {err}");
        reqwest::blocking::Client::new()
    })
}
