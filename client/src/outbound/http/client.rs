//! Shared reqwest plumbing: base URL, bearer token, timeout and the mapping
//! of HTTP failures into port errors.

use std::time::Duration;

use reqwest::{Client, Method, RequestBuilder, StatusCode, Url};
use serde::Deserialize;
use serde::de::DeserializeOwned;
use serde_json::Value;
use tracing::{debug, warn};

use crate::domain::AccessToken;
use crate::domain::ports::{
    AuthApiError, CatalogsApiError, DepartmentsApiError, DocumentsApiError, HolidaysApiError,
    UsersApiError,
};

const PREVIEW_CHAR_LIMIT: usize = 160;

/// Failure of one HTTP exchange, before it is attributed to a port.
#[derive(Debug, Clone, PartialEq, Eq)]
pub(super) enum HttpFailure {
    Rejected { status: u16, message: String },
    Unauthorized { message: String },
    Transport { message: String },
    Timeout { message: String },
    Decode { message: String },
}

macro_rules! impl_from_http_failure {
    ($($port:ty),+ $(,)?) => {
        $(
            impl From<HttpFailure> for $port {
                fn from(value: HttpFailure) -> Self {
                    match value {
                        HttpFailure::Rejected { status, message } => Self::rejected(status, message),
                        HttpFailure::Unauthorized { message } => Self::unauthorized(message),
                        HttpFailure::Transport { message } => Self::transport(message),
                        HttpFailure::Timeout { message } => Self::timeout(message),
                        HttpFailure::Decode { message } => Self::decode(message),
                    }
                }
            }
        )+
    };
}

impl_from_http_failure!(
    AuthApiError,
    CatalogsApiError,
    DepartmentsApiError,
    DocumentsApiError,
    HolidaysApiError,
    UsersApiError,
);

/// REST client for the backend. Implements every driven port.
///
/// Cloning is cheap; the underlying connection pool is shared.
#[derive(Clone)]
pub struct RestClient {
    client: Client,
    base_url: Url,
    token: Option<AccessToken>,
}

impl RestClient {
    /// Build a client with an explicit request timeout.
    ///
    /// # Errors
    ///
    /// Returns an error when the reqwest client cannot be constructed.
    pub fn new(mut base_url: Url, timeout: Duration) -> Result<Self, reqwest::Error> {
        if !base_url.path().ends_with('/') {
            let path = format!("{}/", base_url.path());
            base_url.set_path(&path);
        }
        let client = Client::builder().timeout(timeout).build()?;
        Ok(Self {
            client,
            base_url,
            token: None,
        })
    }

    /// Send `token` as a bearer credential on every request.
    pub fn with_token(mut self, token: AccessToken) -> Self {
        self.token = Some(token);
        self
    }

    pub fn base_url(&self) -> &Url {
        &self.base_url
    }

    pub(super) fn endpoint(&self, path: &str) -> Result<Url, HttpFailure> {
        self.base_url
            .join(path.trim_start_matches('/'))
            .map_err(|error| HttpFailure::Transport {
                message: format!("invalid endpoint {path}: {error}"),
            })
    }

    pub(super) fn request(&self, method: Method, path: &str) -> Result<RequestBuilder, HttpFailure> {
        let url = self.endpoint(path)?;
        let builder = self.client.request(method, url);
        Ok(match &self.token {
            Some(token) => builder.bearer_auth(token.expose()),
            None => builder,
        })
    }

    /// Send the request and return the body of a successful response.
    pub(super) async fn execute(&self, request: RequestBuilder) -> Result<Vec<u8>, HttpFailure> {
        let response = request.send().await.map_err(map_transport_error)?;
        let status = response.status();
        let url = response.url().clone();
        let body = response.bytes().await.map_err(map_transport_error)?;
        if status.is_success() {
            debug!(%url, status = status.as_u16(), bytes = body.len(), "backend responded");
            return Ok(body.to_vec());
        }
        let failure = map_status_error(status, body.as_ref());
        warn!(%url, status = status.as_u16(), ?failure, "backend rejected request");
        Err(failure)
    }
}

pub(super) fn decode<T: DeserializeOwned>(body: &[u8], what: &str) -> Result<T, HttpFailure> {
    serde_json::from_slice(body).map_err(|error| HttpFailure::Decode {
        message: format!("invalid {what} payload: {error}"),
    })
}

fn map_transport_error(error: reqwest::Error) -> HttpFailure {
    if error.is_timeout() {
        HttpFailure::Timeout {
            message: error.to_string(),
        }
    } else {
        HttpFailure::Transport {
            message: error.to_string(),
        }
    }
}

pub(super) fn map_status_error(status: StatusCode, body: &[u8]) -> HttpFailure {
    let message = backend_message(status, body);
    match status {
        StatusCode::UNAUTHORIZED => HttpFailure::Unauthorized { message },
        StatusCode::REQUEST_TIMEOUT | StatusCode::GATEWAY_TIMEOUT => HttpFailure::Timeout { message },
        _ => HttpFailure::Rejected {
            status: status.as_u16(),
            message,
        },
    }
}

#[derive(Deserialize)]
struct ErrorBody {
    #[serde(default)]
    message: Option<Value>,
}

/// Message to show for a rejection: the body's `message`, or the first
/// entry when it is a list of validation messages.
pub(super) fn backend_message(status: StatusCode, body: &[u8]) -> String {
    let extracted = serde_json::from_slice::<ErrorBody>(body)
        .ok()
        .and_then(|parsed| parsed.message)
        .and_then(|message| match message {
            Value::String(text) => Some(text),
            Value::Array(items) => items.into_iter().next().map(|first| match first {
                Value::String(text) => text,
                other => other.to_string(),
            }),
            _ => None,
        })
        .filter(|message| !message.trim().is_empty());
    if let Some(message) = extracted {
        return message;
    }

    let preview = body_preview(body);
    if preview.is_empty() {
        format!("status {}", status.as_u16())
    } else {
        format!("status {}: {preview}", status.as_u16())
    }
}

fn body_preview(body: &[u8]) -> String {
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
