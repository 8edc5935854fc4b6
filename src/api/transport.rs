use std::path::PathBuf;
use std::time::Duration;

use reqwest::blocking::{Client, RequestBuilder, multipart};
use reqwest::header::ACCEPT;
use thiserror::Error;

use crate::config::ApiSettings;

#[derive(Debug, Copy, Clone, PartialEq, Eq)]
pub enum Method {
    Get,
    Post,
    Put,
    Delete,
}

/// Multipart payload: plain text fields plus at most one file part.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct Multipart {
    pub fields: Vec<(String, String)>,
    pub file: Option<(String, PathBuf)>,
}

#[derive(Debug, Clone, PartialEq)]
pub enum Body {
    Empty,
    Json(serde_json::Value),
    Multipart(Multipart),
}

/// A request as the gateway builds it, before it hits the wire.
#[derive(Debug, Clone, PartialEq)]
pub struct ApiRequest {
    pub method: Method,
    /// Path relative to the configured base URL, e.g. `tracks/7`.
    pub path: String,
    pub bearer: Option<String>,
    pub body: Body,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ApiResponse {
    pub status: u16,
    pub body: String,
}

/// No HTTP response was obtained (DNS, refused connection, timeout, I/O).
#[derive(Debug, Error)]
#[error("{0}")]
pub struct TransportError(pub String);

/// Uniform request/response interface beneath the gateway.
pub trait Transport: Send {
    fn send(&self, request: &ApiRequest) -> Result<ApiResponse, TransportError>;
}

/// `reqwest`-backed transport used by the application.
pub struct HttpTransport {
    client: Client,
    base_url: String,
    timeout: Duration,
    upload_timeout: Duration,
}

impl HttpTransport {
    pub fn new(settings: &ApiSettings) -> Result<Self, reqwest::Error> {
        let client = Client::builder()
            .user_agent(concat!("lectern/", env!("CARGO_PKG_VERSION")))
            .build()?;
        Ok(Self {
            client,
            base_url: settings.base_url.trim_end_matches('/').to_string(),
            timeout: Duration::from_secs(settings.timeout_secs.max(1)),
            upload_timeout: Duration::from_secs(settings.upload_timeout_secs.max(1)),
        })
    }

    fn url(&self, path: &str) -> String {
        format!("{}/{}", self.base_url, path.trim_start_matches('/'))
    }

    fn builder(&self, method: Method, url: &str) -> RequestBuilder {
        match method {
            Method::Get => self.client.get(url),
            Method::Post => self.client.post(url),
            Method::Put => self.client.put(url),
            Method::Delete => self.client.delete(url),
        }
    }
}

fn build_form(body: &Multipart) -> std::io::Result<multipart::Form> {
    let mut form = multipart::Form::new();
    for (name, value) in &body.fields {
        form = form.text(name.clone(), value.clone());
    }
    if let Some((name, path)) = &body.file {
        form = form.file(name.clone(), path)?;
    }
    Ok(form)
}

impl Transport for HttpTransport {
    fn send(&self, request: &ApiRequest) -> Result<ApiResponse, TransportError> {
        let url = self.url(&request.path);
        let mut builder = self.builder(request.method, &url).header(ACCEPT, "application/json");
        if let Some(token) = &request.bearer {
            builder = builder.bearer_auth(token);
        }

        builder = match &request.body {
            Body::Empty => builder.timeout(self.timeout),
            Body::Json(value) => builder.json(value).timeout(self.timeout),
            Body::Multipart(parts) => {
                let form = build_form(parts)
                    .map_err(|e| TransportError(format!("failed to read upload file: {e}")))?;
                builder.multipart(form).timeout(self.upload_timeout)
            }
        };

        let resp = builder
            .send()
            .map_err(|e| TransportError(format!("request {url} failed: {e}")))?;
        let status = resp.status().as_u16();
        let body = resp
            .text()
            .map_err(|e| TransportError(format!("read {url} response body: {e}")))?;
        Ok(ApiResponse { status, body })
    }
}
