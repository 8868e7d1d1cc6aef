//! HTTP transport types and the `Transport` seam.
//!
//! # Design
//! Requests and responses are plain data. `ApiClient` builds an
//! `HttpRequest`, hands it to a `Transport`, and parses whatever
//! `HttpResponse` comes back, so the client itself never touches a socket.
//! Tests swap in a scripted transport; production code uses
//! [`UreqTransport`].
//!
//! A transport reports only failures that prevented a response from
//! arriving. 4xx/5xx statuses are returned as data for the client to
//! interpret.

use std::fmt;

use crate::error::TransportError;

/// HTTP method for a request.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum HttpMethod {
    Get,
    Post,
    Put,
    Patch,
    Delete,
}

impl HttpMethod {
    pub fn as_str(self) -> &'static str {
        match self {
            HttpMethod::Get => "GET",
            HttpMethod::Post => "POST",
            HttpMethod::Put => "PUT",
            HttpMethod::Patch => "PATCH",
            HttpMethod::Delete => "DELETE",
        }
    }
}

impl fmt::Display for HttpMethod {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// An HTTP request described as plain data.
///
/// `url` is absolute: the base URL captured when the request was built,
/// followed by the endpoint.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct HttpRequest {
    pub method: HttpMethod,
    pub url: String,
    pub headers: Vec<(String, String)>,
    pub body: Option<String>,
}

impl HttpRequest {
    /// Case-insensitive header lookup.
    pub fn header(&self, name: &str) -> Option<&str> {
        self.headers
            .iter()
            .find(|(key, _)| key.eq_ignore_ascii_case(name))
            .map(|(_, value)| value.as_str())
    }
}

/// An HTTP response described as plain data.
#[derive(Debug, Clone)]
pub struct HttpResponse {
    pub status: u16,
    pub headers: Vec<(String, String)>,
    pub body: String,
}

impl HttpResponse {
    pub fn is_success(&self) -> bool {
        (200..300).contains(&self.status)
    }
}

/// Executes one request. No retries, no timeout, no deduplication.
pub trait Transport: Send + Sync {
    fn execute(&self, request: HttpRequest) -> Result<HttpResponse, TransportError>;
}

/// Blocking transport backed by a `ureq` agent.
///
/// Status-code-as-error is disabled so 4xx/5xx responses come back as
/// data rather than `Err`.
#[derive(Debug, Clone)]
pub struct UreqTransport {
    agent: ureq::Agent,
}

impl UreqTransport {
    pub fn new() -> Self {
        let agent = ureq::Agent::config_builder()
            .http_status_as_error(false)
            .build()
            .new_agent();
        Self { agent }
    }
}

impl Default for UreqTransport {
    fn default() -> Self {
        Self::new()
    }
}

fn with_headers<B>(
    mut builder: ureq::RequestBuilder<B>,
    headers: &[(String, String)],
) -> ureq::RequestBuilder<B> {
    for (key, value) in headers {
        builder = builder.header(key.as_str(), value.as_str());
    }
    builder
}

impl Transport for UreqTransport {
    fn execute(&self, request: HttpRequest) -> Result<HttpResponse, TransportError> {
        let HttpRequest {
            method,
            url,
            headers,
            body,
        } = request;
        let agent = &self.agent;

        let sent = match (method, body) {
            (HttpMethod::Get, _) => with_headers(agent.get(&url), &headers).call(),
            (HttpMethod::Delete, _) => with_headers(agent.delete(&url), &headers).call(),
            (HttpMethod::Post, Some(body)) => {
                with_headers(agent.post(&url), &headers).send(body.as_bytes())
            }
            (HttpMethod::Post, None) => with_headers(agent.post(&url), &headers).send_empty(),
            (HttpMethod::Put, Some(body)) => {
                with_headers(agent.put(&url), &headers).send(body.as_bytes())
            }
            (HttpMethod::Put, None) => with_headers(agent.put(&url), &headers).send_empty(),
            (HttpMethod::Patch, Some(body)) => {
                with_headers(agent.patch(&url), &headers).send(body.as_bytes())
            }
            (HttpMethod::Patch, None) => with_headers(agent.patch(&url), &headers).send_empty(),
        };
        let mut response = sent.map_err(|e| TransportError(e.to_string()))?;

        let status = response.status().as_u16();
        let headers = response
            .headers()
            .iter()
            .filter_map(|(name, value)| {
                value
                    .to_str()
                    .ok()
                    .map(|v| (name.as_str().to_string(), v.to_string()))
            })
            .collect();
        let body = response
            .body_mut()
            .read_to_string()
            .map_err(|e| TransportError(e.to_string()))?;

        Ok(HttpResponse {
            status,
            headers,
            body,
        })
    }
}
