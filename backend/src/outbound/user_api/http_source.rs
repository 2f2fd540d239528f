//! Reqwest-backed user record source.
//!
//! This adapter owns transport details only: URL construction, timeout and
//! HTTP error mapping, and JSON decoding into [`UserRecord`].

use std::time::Duration;

use async_trait::async_trait;
use reqwest::{Client, StatusCode, Url};
use tracing::debug;

use crate::domain::ports::{UserRecordSource, UserRecordSourceError};
use crate::domain::{RecordKey, TRACE_ID_HEADER, TraceId, UserRecord};

const DEFAULT_USER_AGENT: &str = "user-console/0.1";

/// User record source issuing `GET {base_url}/users/{id}`.
#[derive(Debug, Clone)]
pub struct HttpUserRecordSource {
    client: Client,
    base_url: Url,
}

impl HttpUserRecordSource {
    /// Build an adapter using a reqwest client with an explicit request timeout.
    ///
    /// # Errors
    ///
    /// Returns an error when the reqwest client cannot be constructed.
    pub fn new(base_url: Url, timeout: Duration) -> Result<Self, reqwest::Error> {
        let client = Client::builder()
            .timeout(timeout)
            .user_agent(DEFAULT_USER_AGENT)
            .build()?;
        Ok(Self { client, base_url })
    }

    fn record_url(&self, key: &RecordKey) -> Result<Url, UserRecordSourceError> {
        user_url(&self.base_url, key)
    }
}

#[async_trait]
impl UserRecordSource for HttpUserRecordSource {
    async fn get_user_by_id(&self, key: &RecordKey) -> Result<UserRecord, UserRecordSourceError> {
        let url = self.record_url(key)?;
        debug!(%url, "requesting user record");
        let mut request = self
            .client
            .get(url)
            .header(reqwest::header::ACCEPT, "application/json");
        if let Some(trace_id) = TraceId::current() {
            request = request.header(TRACE_ID_HEADER, trace_id.to_string());
        }
        let response = request.send().await.map_err(map_transport_error)?;

        let status = response.status();
        let body = response.bytes().await.map_err(map_transport_error)?;
        if !status.is_success() {
            return Err(map_status_error(key, status, body.as_ref()));
        }
        parse_record(body.as_ref())
    }
}

fn user_url(base_url: &Url, key: &RecordKey) -> Result<Url, UserRecordSourceError> {
    let mut url = base_url.clone();
    url.path_segments_mut()
        .map_err(|()| {
            UserRecordSourceError::transport(format!("base url {base_url} cannot carry a path"))
        })?
        .pop_if_empty()
        .extend(["users", key.as_str()]);
    Ok(url)
}

fn parse_record(body: &[u8]) -> Result<UserRecord, UserRecordSourceError> {
    serde_json::from_slice(body).map_err(|error| UserRecordSourceError::decode(error.to_string()))
}

fn map_transport_error(error: reqwest::Error) -> UserRecordSourceError {
    if error.is_timeout() {
        UserRecordSourceError::transport(format!("timed out: {error}"))
    } else {
        UserRecordSourceError::transport(error.to_string())
    }
}

fn map_status_error(key: &RecordKey, status: StatusCode, body: &[u8]) -> UserRecordSourceError {
    if status == StatusCode::NOT_FOUND {
        return UserRecordSourceError::not_found(key.as_str());
    }
    let preview = body_preview(body);
    let message = if preview.is_empty() {
        status
            .canonical_reason()
            .unwrap_or("no response body")
            .to_owned()
    } else {
        preview
    };
    UserRecordSourceError::status(status.as_u16(), message)
}

fn body_preview(body: &[u8]) -> String {
    const PREVIEW_CHAR_LIMIT: usize = 160;

    let compact = String::from_utf8_lossy(body)
        .split_whitespace()
        .collect::<Vec<_>>()
        .join(" ");
    let preview = compact.chars().take(PREVIEW_CHAR_LIMIT).collect::<String>();
    if compact.chars().count() > PREVIEW_CHAR_LIMIT {
        format!("{preview}...")
    } else {
        preview
    }
}
