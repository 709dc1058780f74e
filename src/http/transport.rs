//! Outbound HTTP abstraction
//!
//! The API client never talks to `reqwest` directly; it hands a fully
//! described [`HttpRequest`] to an [`HttpTransport`]. Tests swap in recording
//! transports, the binary uses [`ReqwestTransport`].

use async_trait::async_trait;
use reqwest::Method;
use thiserror::Error;
use tracing::debug;

#[derive(Debug, Clone, PartialEq)]
pub struct HttpRequest {
    pub method: Method,
    pub url: String,
    pub query: Vec<(String, String)>,
    pub headers: Vec<(String, String)>,
    pub body: RequestBody,
}

impl HttpRequest {
    pub fn header(&self, name: &str) -> Option<&str> {
        self.headers
            .iter()
            .find(|(key, _)| key.eq_ignore_ascii_case(name))
            .map(|(_, value)| value.as_str())
    }

    pub fn query_value(&self, name: &str) -> Option<&str> {
        self.query
            .iter()
            .find(|(key, _)| key == name)
            .map(|(_, value)| value.as_str())
    }
}

#[derive(Debug, Clone, PartialEq)]
pub enum RequestBody {
    Empty,
    Json(serde_json::Value),
    Multipart(Vec<FormPart>),
}

impl RequestBody {
    /// Short description used in fault logs; payload contents are not logged.
    pub fn kind(&self) -> &'static str {
        match self {
            RequestBody::Empty => "empty",
            RequestBody::Json(_) => "json",
            RequestBody::Multipart(_) => "multipart",
        }
    }
}

#[derive(Debug, Clone, PartialEq)]
pub enum FormPart {
    Text {
        name: String,
        value: String,
    },
    File {
        name: String,
        file_name: String,
        bytes: Vec<u8>,
    },
}

#[derive(Debug, Clone, PartialEq)]
pub struct HttpResponse {
    pub status: u16,
    /// Response text, `None` when the body could not be read.
    pub body: Option<String>,
}

impl HttpResponse {
    pub fn is_success(&self) -> bool {
        (200..300).contains(&self.status)
    }
}

#[derive(Debug, Error, Clone)]
pub enum TransportError {
    #[error("network error: {message}")]
    Network { message: String },
    #[error("relative URL {url} needs a deployment origin")]
    MissingOrigin { url: String },
    #[error("could not encode request body: {message}")]
    Encode { message: String },
}

/// Sends a request and returns the raw status and body.
#[async_trait]
pub trait HttpTransport: Send + Sync {
    async fn send(&self, request: HttpRequest) -> Result<HttpResponse, TransportError>;
}

/// Transport backed by a shared `reqwest::Client`.
///
/// Relative URLs (empty base address) are resolved against `origin`.
#[derive(Debug, Clone)]
pub struct ReqwestTransport {
    client: reqwest::Client,
    origin: Option<String>,
}

impl ReqwestTransport {
    pub fn new(origin: Option<String>) -> Self {
        Self {
            client: reqwest::Client::new(),
            origin: origin.map(|o| o.trim_end_matches('/').to_string()),
        }
    }

    fn absolute_url(&self, url: &str) -> Result<String, TransportError> {
        if !url.starts_with('/') {
            return Ok(url.to_string());
        }
        match &self.origin {
            Some(origin) => Ok(format!("{origin}{url}")),
            None => Err(TransportError::MissingOrigin {
                url: url.to_string(),
            }),
        }
    }
}

#[async_trait]
impl HttpTransport for ReqwestTransport {
    async fn send(&self, request: HttpRequest) -> Result<HttpResponse, TransportError> {
        let url = self.absolute_url(&request.url)?;
        debug!(method = %request.method, url = %url, body = request.body.kind(), "sending request");

        let mut builder = self.client.request(request.method.clone(), &url);
        if !request.query.is_empty() {
            builder = builder.query(&request.query);
        }
        for (name, value) in &request.headers {
            builder = builder.header(name.as_str(), value.as_str());
        }

        builder = match request.body {
            RequestBody::Empty => builder,
            RequestBody::Json(value) => {
                let bytes = serde_json::to_vec(&value).map_err(|e| TransportError::Encode {
                    message: e.to_string(),
                })?;
                builder.body(bytes)
            }
            RequestBody::Multipart(parts) => {
                let mut form = reqwest::multipart::Form::new();
                for part in parts {
                    form = match part {
                        FormPart::Text { name, value } => form.text(name, value),
                        FormPart::File {
                            name,
                            file_name,
                            bytes,
                        } => form.part(name, reqwest::multipart::Part::bytes(bytes).file_name(file_name)),
                    };
                }
                builder.multipart(form)
            }
        };

        let response = builder.send().await.map_err(|e| TransportError::Network {
            message: e.to_string(),
        })?;
        let status = response.status().as_u16();
        let body = response.text().await.ok();

        Ok(HttpResponse { status, body })
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn relative_urls_need_an_origin() {
        let transport = ReqwestTransport::new(None);
        assert!(matches!(
            transport.absolute_url("/api/projects"),
            Err(TransportError::MissingOrigin { .. })
        ));

        let transport = ReqwestTransport::new(Some("https://review.example.vercel.app/".into()));
        assert_eq!(
            transport.absolute_url("/api/projects").unwrap(),
            "https://review.example.vercel.app/api/projects"
        );
        assert_eq!(
            transport.absolute_url("http://localhost:8000/api/projects").unwrap(),
            "http://localhost:8000/api/projects"
        );
    }

    #[test]
    fn header_lookup_ignores_case() {
        let request = HttpRequest {
            method: Method::GET,
            url: "/api/projects".into(),
            query: vec![("use_ai".into(), "true".into())],
            headers: vec![("Content-Type".into(), "application/json".into())],
            body: RequestBody::Empty,
        };
        assert_eq!(request.header("content-type"), Some("application/json"));
        assert_eq!(request.query_value("use_ai"), Some("true"));
        assert_eq!(request.query_value("format"), None);
    }
}
