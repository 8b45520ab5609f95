//! Reqwest-backed client for the Registro FSE REST API.
//!
//! This adapter owns transport details only: URL building, bearer headers,
//! timeout and HTTP error mapping, and JSON decoding of the response
//! envelope.

use std::time::Duration;

use reqwest::{Client, Method, RequestBuilder, StatusCode, Url};
use serde::Serialize;
use serde::de::DeserializeOwned;
use tracing::debug;

use super::dto::{error_message, unwrap_envelope};
use crate::domain::AuthToken;
use crate::domain::ports::RemoteApiError;

const USER_AGENT: &str = concat!("registro-fse/", env!("CARGO_PKG_VERSION"));

/// Failures while building an [`ApiClient`].
#[derive(Debug, thiserror::Error)]
pub enum ApiClientError {
    /// The base URL does not parse or cannot carry a path.
    #[error("invalid API base URL {url}: {message}")]
    InvalidBaseUrl {
        /// Rejected URL.
        url: String,
        /// Parser message.
        message: String,
    },
    /// The HTTP client could not be constructed.
    #[error("could not build HTTP client: {0}")]
    Client(#[from] reqwest::Error),
}

/// HTTP client bound to one API base URL.
#[derive(Debug, Clone)]
pub struct ApiClient {
    client: Client,
    base: Url,
}

impl ApiClient {
    /// Build a client for `base_url` with a per-request `timeout`.
    ///
    /// # Errors
    ///
    /// Returns an error when the URL is invalid or the reqwest client cannot
    /// be constructed.
    pub fn new(base_url: &str, timeout: Duration) -> Result<Self, ApiClientError> {
        let base = Url::parse(base_url.trim()).map_err(|error| ApiClientError::InvalidBaseUrl {
            url: base_url.to_owned(),
            message: error.to_string(),
        })?;
        if base.cannot_be_a_base() {
            return Err(ApiClientError::InvalidBaseUrl {
                url: base_url.to_owned(),
                message: "URL cannot carry a path".to_owned(),
            });
        }
        let client = Client::builder()
            .timeout(timeout)
            .user_agent(USER_AGENT)
            .build()?;
        Ok(Self { client, base })
    }

    /// Base URL every request is resolved against.
    pub fn base_url(&self) -> &Url {
        &self.base
    }

    pub(super) fn endpoint(&self, segments: &[&str]) -> Result<Url, RemoteApiError> {
        let mut url = self.base.clone();
        url.path_segments_mut()
            .map_err(|()| RemoteApiError::transport("API base URL cannot carry a path"))?
            .pop_if_empty()
            .extend(segments);
        Ok(url)
    }

    fn request(
        &self,
        method: Method,
        segments: &[&str],
        token: Option<&AuthToken>,
    ) -> Result<RequestBuilder, RemoteApiError> {
        let url = self.endpoint(segments)?;
        debug!(%method, %url, "api request");
        let request = self
            .client
            .request(method, url)
            .header(reqwest::header::ACCEPT, "application/json");
        Ok(match token {
            Some(token) => request.bearer_auth(token.as_str()),
            None => request,
        })
    }

    /// `GET` and decode the enveloped payload.
    pub(super) async fn get<T>(
        &self,
        token: &AuthToken,
        segments: &[&str],
    ) -> Result<T, RemoteApiError>
    where
        T: DeserializeOwned,
    {
        let request = self.request(Method::GET, segments, Some(token))?;
        decode_data(&execute(request).await?)
    }

    /// Send `body` as JSON with `method` and decode the enveloped payload.
    pub(super) async fn send_json<B, T>(
        &self,
        method: Method,
        token: Option<&AuthToken>,
        segments: &[&str],
        body: &B,
    ) -> Result<T, RemoteApiError>
    where
        B: Serialize + Sync + ?Sized,
        T: DeserializeOwned,
    {
        let request = self.request(method, segments, token)?.json(body);
        decode_data(&execute(request).await?)
    }

    /// Send `body` and return the raw response bytes.
    pub(super) async fn send_json_raw<B>(
        &self,
        method: Method,
        segments: &[&str],
        body: &B,
    ) -> Result<Vec<u8>, RemoteApiError>
    where
        B: Serialize + Sync + ?Sized,
    {
        let request = self.request(method, segments, None)?.json(body);
        execute(request).await
    }

    /// `DELETE`, ignoring whatever the API sends back.
    pub(super) async fn remove(
        &self,
        token: &AuthToken,
        segments: &[&str],
    ) -> Result<(), RemoteApiError> {
        let request = self.request(Method::DELETE, segments, Some(token))?;
        execute(request).await.map(drop)
    }
}

async fn execute(request: RequestBuilder) -> Result<Vec<u8>, RemoteApiError> {
    let response = request.send().await.map_err(map_transport_error)?;
    let status = response.status();
    let body = response.bytes().await.map_err(map_transport_error)?;
    if !status.is_success() {
        return Err(map_status_error(status, body.as_ref()));
    }
    Ok(body.to_vec())
}

fn decode_data<T>(body: &[u8]) -> Result<T, RemoteApiError>
where
    T: DeserializeOwned,
{
    let value: serde_json::Value = serde_json::from_slice(body).map_err(|error| {
        RemoteApiError::decode(format!("invalid JSON payload: {error}"))
    })?;
    serde_json::from_value(unwrap_envelope(value))
        .map_err(|error| RemoteApiError::decode(format!("unexpected payload shape: {error}")))
}

fn map_transport_error(error: reqwest::Error) -> RemoteApiError {
    if error.is_timeout() {
        RemoteApiError::timeout(error.to_string())
    } else {
        RemoteApiError::transport(error.to_string())
    }
}

fn map_status_error(status: StatusCode, body: &[u8]) -> RemoteApiError {
    let message = error_message(body).unwrap_or_else(|| {
        debug!(status = status.as_u16(), body = %body_preview(body), "error body without message");
        String::new()
    });

    match status {
        StatusCode::UNAUTHORIZED => RemoteApiError::unauthorized(message),
        StatusCode::FORBIDDEN => RemoteApiError::forbidden(message),
        StatusCode::NOT_FOUND => RemoteApiError::not_found(message),
        StatusCode::REQUEST_TIMEOUT | StatusCode::GATEWAY_TIMEOUT => {
            RemoteApiError::timeout(format!("status {}", status.as_u16()))
        }
        _ => RemoteApiError::rejected(status.as_u16(), message),
    }
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
