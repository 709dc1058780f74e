use reqwest::Method;
use serde::de::DeserializeOwned;
use serde_json::Value;
use std::sync::Arc;
use tracing::{debug, error, warn};

use crate::errors::ApiError;
use crate::http::base_url::ApiAddress;
use crate::http::transport::{FormPart, HttpRequest, HttpResponse, HttpTransport, RequestBody, ReqwestTransport};
use crate::models::Envelope;

/// Longest slice of a response body quoted in an error message.
const SNIPPET_CHARS: usize = 100;

/// Per-call settings for [`ApiClient::request`].
#[derive(Debug, Clone, PartialEq)]
pub struct RequestOptions {
    pub method: Method,
    pub query: Vec<(String, String)>,
    pub body: RequestBody,
    /// Replaces the default header set when present.
    pub headers: Option<Vec<(String, String)>>,
}

impl Default for RequestOptions {
    fn default() -> Self {
        Self {
            method: Method::GET,
            query: Vec::new(),
            body: RequestBody::Empty,
            headers: None,
        }
    }
}

impl RequestOptions {
    pub fn get() -> Self {
        Self::default()
    }

    pub fn post() -> Self {
        Self {
            method: Method::POST,
            ..Self::default()
        }
    }

    pub fn put() -> Self {
        Self {
            method: Method::PUT,
            ..Self::default()
        }
    }

    pub fn delete() -> Self {
        Self {
            method: Method::DELETE,
            ..Self::default()
        }
    }

    pub fn query(mut self, name: &str, value: impl Into<String>) -> Self {
        self.query.push((name.to_string(), value.into()));
        self
    }

    pub fn json(mut self, value: Value) -> Self {
        self.body = RequestBody::Json(value);
        self
    }

    /// Multipart bodies clear the default headers so the transport can set a
    /// boundary-aware content type.
    pub fn multipart(mut self, parts: Vec<FormPart>) -> Self {
        self.body = RequestBody::Multipart(parts);
        self.headers = Some(Vec::new());
        self
    }
}

pub fn default_headers() -> Vec<(String, String)> {
    vec![("Content-Type".to_string(), "application/json".to_string())]
}

/// Client for the review service's JSON API.
#[derive(Clone)]
pub struct ApiClient {
    transport: Arc<dyn HttpTransport>,
    base_url: String,
}

impl std::fmt::Debug for ApiClient {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("ApiClient")
            .field("base_url", &self.base_url)
            .finish_non_exhaustive()
    }
}

impl ApiClient {
    pub fn new(transport: Arc<dyn HttpTransport>, base_url: impl Into<String>) -> Self {
        let base_url: String = base_url.into();
        Self {
            transport,
            base_url: base_url.trim_end_matches('/').to_string(),
        }
    }

    /// Client using `reqwest` for a resolved address.
    pub fn from_address(address: &ApiAddress) -> Self {
        let transport = ReqwestTransport::new(address.origin.clone());
        Self::new(Arc::new(transport), address.base_url.clone())
    }

    pub fn base_url(&self) -> &str {
        &self.base_url
    }

    /// Joins the base address with an endpoint, adding the leading `/` when
    /// the endpoint lacks one.
    pub fn url_for(&self, endpoint: &str) -> String {
        if endpoint.starts_with('/') {
            format!("{}{}", self.base_url, endpoint)
        } else {
            format!("{}/{}", self.base_url, endpoint)
        }
    }

    /// Sends one request and returns the decoded envelope as-is.
    ///
    /// The envelope's `code` is not inspected here. Every fault is logged with
    /// the request context before it is returned.
    pub async fn request(&self, endpoint: &str, options: RequestOptions) -> Result<Envelope, ApiError> {
        let request = HttpRequest {
            method: options.method,
            url: self.url_for(endpoint),
            query: options.query,
            headers: options.headers.unwrap_or_else(default_headers),
            body: options.body,
        };

        let url = request.url.clone();
        let method = request.method.clone();
        let query = request.query.clone();
        let headers = request.headers.clone();
        let body_kind = request.body.kind();

        match self.exchange(request).await {
            Ok(envelope) => {
                debug!(method = %method, url = %url, code = envelope.code, "request completed");
                Ok(envelope)
            }
            Err(err) => {
                error!(
                    url = %url,
                    method = %method,
                    query = ?query,
                    headers = ?headers,
                    body = body_kind,
                    error = %err,
                    "API request failed"
                );
                Err(err)
            }
        }
    }

    /// Calls an endpoint and returns its payload, treating any envelope code
    /// other than 200 as a failure.
    pub async fn fetch<T: DeserializeOwned>(&self, endpoint: &str, options: RequestOptions) -> Result<T, ApiError> {
        let envelope = self.request(endpoint, options).await?;
        let envelope = check_code(endpoint, envelope)?;
        let data = envelope.data.ok_or_else(|| ApiError::MissingData {
            endpoint: endpoint.to_string(),
        })?;
        serde_json::from_value(data).map_err(|source| ApiError::Decode {
            endpoint: endpoint.to_string(),
            source,
        })
    }

    /// Like [`ApiClient::fetch`] for endpoints whose payload is irrelevant.
    pub async fn execute(&self, endpoint: &str, options: RequestOptions) -> Result<(), ApiError> {
        let envelope = self.request(endpoint, options).await?;
        check_code(endpoint, envelope).map(|_| ())
    }

    async fn exchange(&self, request: HttpRequest) -> Result<Envelope, ApiError> {
        let url = request.url.clone();
        let response = self
            .transport
            .send(request)
            .await
            .map_err(|source| ApiError::Transport { url, source })?;

        if !response.is_success() {
            return Err(failure_from_response(&response));
        }

        let text = response.body.unwrap_or_default();
        serde_json::from_str::<Envelope>(&text).map_err(|_| ApiError::MalformedResponse {
            snippet: snippet(&text),
        })
    }
}

fn check_code(endpoint: &str, envelope: Envelope) -> Result<Envelope, ApiError> {
    if envelope.is_success() {
        return Ok(envelope);
    }
    let message = envelope.failure_message();
    warn!(endpoint = %endpoint, code = envelope.code, message = %message, "service reported failure");
    Err(ApiError::Application {
        code: envelope.code,
        message,
    })
}

fn failure_from_response(response: &HttpResponse) -> ApiError {
    let status = response.status;
    let generic = || format!("request failed ({status})");

    let message = match response.body.as_deref().map(str::trim).filter(|t| !t.is_empty()) {
        None => generic(),
        Some(text) => match serde_json::from_str::<Value>(text) {
            Ok(value) => ["detail", "message"]
                .iter()
                .find_map(|key| value.get(*key).and_then(message_text))
                .unwrap_or_else(generic),
            Err(_) => format!("server error ({status}): {}", snippet(text)),
        },
    };

    ApiError::Http { status, message }
}

/// Text of an error field; empty, null and false values carry no message.
fn message_text(value: &Value) -> Option<String> {
    match value {
        Value::String(text) if !text.is_empty() => Some(text.clone()),
        Value::String(_) | Value::Null | Value::Bool(false) => None,
        other => Some(other.to_string()),
    }
}

fn snippet(text: &str) -> String {
    text.chars().take(SNIPPET_CHARS).collect()
}
