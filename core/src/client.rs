//! Stateless HTTP request builder and response parser for the character
//! catalog.
//!
//! # Design
//! `CatalogClient` holds only a `base_url` and optional credentials and
//! carries no mutable state between calls. Listing characters is split into
//! `build_list_characters`, which produces an `HttpRequest`, and
//! `parse_list_characters`, which consumes an `HttpResponse`. The round-trip
//! in between belongs to the caller: a `Transport` in Rust, or the native
//! host behind the C ABI.

use std::time::{SystemTime, UNIX_EPOCH};

use tracing::{debug, instrument, warn};

use crate::auth::Credentials;
use crate::config::ClientConfig;
use crate::error::ApiError;
use crate::http::{HttpMethod, HttpRequest, HttpResponse};
use crate::transport::Transport;
use crate::types::{CatalogRecord, CharacterDataWrapper};

pub const CHARACTERS_PATH: &str = "/v1/public/characters";

/// Synchronous, stateless client for the character catalog.
#[derive(Debug, Clone)]
pub struct CatalogClient {
    base_url: String,
    credentials: Option<Credentials>,
}

impl CatalogClient {
    pub fn new(base_url: &str) -> Self {
        Self {
            base_url: base_url.trim_end_matches('/').to_string(),
            credentials: None,
        }
    }

    pub fn with_credentials(mut self, credentials: Credentials) -> Self {
        self.credentials = Some(credentials);
        self
    }

    pub fn from_config(config: &ClientConfig) -> Result<Self, ApiError> {
        config
            .validate()
            .map_err(|e| ApiError::InvalidConfig(e.to_string()))?;
        let client = Self::new(&config.base_url);
        Ok(match config.credentials() {
            Some(credentials) => client.with_credentials(credentials),
            None => client,
        })
    }

    pub fn base_url(&self) -> &str {
        &self.base_url
    }

    /// Build the character-list request, signed with `ts` when credentials
    /// are configured.
    pub fn build_list_characters(&self, ts: &str) -> HttpRequest {
        let query = match &self.credentials {
            Some(credentials) => credentials.query(ts),
            None => Vec::new(),
        };
        HttpRequest {
            method: HttpMethod::Get,
            url: format!("{}{CHARACTERS_PATH}", self.base_url),
            query,
            headers: vec![("accept".to_string(), "application/json".to_string())],
        }
    }

    pub fn parse_list_characters(
        &self,
        response: HttpResponse,
    ) -> Result<CharacterDataWrapper, ApiError> {
        check_status(&response)?;
        Ok(serde_json::from_str(&response.body)?)
    }
}

/// Pull the ordered character list out of a decoded response.
///
/// An absent or non-object `data`, an absent or `null` `results`, or a
/// `results` that is not an array is a missing-data failure. An array whose elements do not
/// decode is a deserialization failure.
pub fn extract_results(wrapper: CharacterDataWrapper) -> Result<Vec<CatalogRecord>, ApiError> {
    let results = wrapper
        .data
        .and_then(|data| data.results)
        .ok_or(ApiError::MissingResults)?;
    if !results.is_array() {
        return Err(ApiError::MissingResults);
    }
    Ok(serde_json::from_value(results)?)
}

/// Issue one character-list request through `transport` and decode it.
#[instrument(skip_all, fields(base_url = %client.base_url()))]
pub async fn fetch_character_list<T>(
    client: &CatalogClient,
    transport: &T,
) -> Result<Vec<CatalogRecord>, ApiError>
where
    T: Transport + ?Sized,
{
    let request = client.build_list_characters(&timestamp());
    debug!(method = request.method.as_str(), url = %request.url, "requesting character list");
    let response = transport.execute(request).await?;
    let wrapper = client.parse_list_characters(response)?;
    if let Some(attribution) = &wrapper.attribution_text {
        debug!(%attribution, "catalog attribution");
    }
    let records = extract_results(wrapper)?;
    debug!(count = records.len(), "decoded character list");
    Ok(records)
}

/// Seconds since the epoch, used as the request's `ts`.
pub fn timestamp() -> String {
    SystemTime::now()
        .duration_since(UNIX_EPOCH)
        .map(|d| d.as_secs())
        .unwrap_or_default()
        .to_string()
}

/// Map a non-2xx status to `ApiError::HttpError`.
///
/// Error bodies of the form `{"code": ..., "status"|"message": "..."}` are
/// reduced to their message.
fn check_status(response: &HttpResponse) -> Result<(), ApiError> {
    if response.is_success() {
        return Ok(());
    }
    let body = api_error_message(&response.body).unwrap_or_else(|| response.body.clone());
    warn!(status = response.status, %body, "catalog returned an error status");
    Err(ApiError::HttpError {
        status: response.status,
        body,
    })
}

fn api_error_message(body: &str) -> Option<String> {
    let value: serde_json::Value = serde_json::from_str(body).ok()?;
    value
        .get("message")
        .or_else(|| value.get("status"))
        .and_then(|m| m.as_str())
        .map(str::to_string)
}
