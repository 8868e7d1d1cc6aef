//! The shared HTTP access layer.
//!
//! # Design
//! `ApiClient` owns the only mutable configuration in the crate: the base
//! URL and the default header map (which holds the bearer token). Clones
//! share both through an `Arc`, so every service built from one client sees
//! the same configuration without a process-wide singleton.
//!
//! Each call is split into `build_request` (snapshots the configuration and
//! produces an `HttpRequest`) and `parse_response` (normalizes an
//! `HttpResponse` or transport failure). Changing the configuration after a
//! request was built never affects that request.

use std::collections::BTreeMap;
use std::fmt;
use std::sync::{Arc, PoisonError, RwLock, RwLockReadGuard, RwLockWriteGuard};

use serde::de::DeserializeOwned;
use serde::Serialize;
use serde_json::Value;
use tracing::debug;

use crate::error::{ApiError, TransportError};
use crate::http::{HttpMethod, HttpRequest, HttpResponse, Transport};
use crate::types::ApiResponse;

/// Base URL used when `API_BASE_URL` is not set.
pub const DEFAULT_BASE_URL: &str = "http://localhost:3001/api";

/// Environment variable consulted by [`ClientConfig::from_env`].
pub const BASE_URL_ENV: &str = "API_BASE_URL";

const AUTHORIZATION: &str = "Authorization";

/// Runtime-tunable configuration of an [`ApiClient`].
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ClientConfig {
    pub base_url: String,
    pub default_headers: BTreeMap<String, String>,
}

impl Default for ClientConfig {
    fn default() -> Self {
        Self::with_base_url(DEFAULT_BASE_URL)
    }
}

impl ClientConfig {
    pub fn with_base_url(base_url: &str) -> Self {
        let mut default_headers = BTreeMap::new();
        default_headers.insert("Content-Type".to_string(), "application/json".to_string());
        Self {
            base_url: base_url.to_string(),
            default_headers,
        }
    }

    /// Reads `API_BASE_URL`, falling back to [`DEFAULT_BASE_URL`].
    pub fn from_env() -> Self {
        Self::from_env_value(std::env::var(BASE_URL_ENV).ok())
    }

    /// Config for a raw `API_BASE_URL` value. Unset or blank means the default.
    pub fn from_env_value(value: Option<String>) -> Self {
        match value.as_deref().map(str::trim) {
            Some(url) if !url.is_empty() => Self::with_base_url(url),
            _ => Self::default(),
        }
    }
}

/// Shared HTTP client. Cheap to clone; clones share configuration and transport.
#[derive(Clone)]
pub struct ApiClient {
    config: Arc<RwLock<ClientConfig>>,
    transport: Arc<dyn Transport>,
}

impl fmt::Debug for ApiClient {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("ApiClient")
            .field("config", &*self.read_config())
            .finish_non_exhaustive()
    }
}

impl ApiClient {
    pub fn new(config: ClientConfig, transport: impl Transport + 'static) -> Self {
        Self {
            config: Arc::new(RwLock::new(config)),
            transport: Arc::new(transport),
        }
    }

    /// Client configured from the environment.
    pub fn from_env(transport: impl Transport + 'static) -> Self {
        Self::new(ClientConfig::from_env(), transport)
    }

    fn read_config(&self) -> RwLockReadGuard<'_, ClientConfig> {
        self.config.read().unwrap_or_else(PoisonError::into_inner)
    }

    fn write_config(&self) -> RwLockWriteGuard<'_, ClientConfig> {
        self.config.write().unwrap_or_else(PoisonError::into_inner)
    }

    /// Snapshot of the current configuration.
    pub fn config(&self) -> ClientConfig {
        self.read_config().clone()
    }

    pub fn base_url(&self) -> String {
        self.read_config().base_url.clone()
    }

    /// Redirects every request built from now on to `url`.
    pub fn set_base_url(&self, url: &str) {
        self.write_config().base_url = url.to_string();
    }

    pub fn set_auth_token(&self, token: &str) {
        self.set_header(AUTHORIZATION, &format!("Bearer {token}"));
    }

    pub fn remove_auth_token(&self) {
        self.write_config().default_headers.remove(AUTHORIZATION);
    }

    /// The bearer token currently attached to outgoing requests, if any.
    pub fn auth_token(&self) -> Option<String> {
        self.read_config()
            .default_headers
            .get(AUTHORIZATION)
            .and_then(|value| value.strip_prefix("Bearer "))
            .map(str::to_string)
    }

    pub fn set_header(&self, key: &str, value: &str) {
        self.write_config()
            .default_headers
            .insert(key.to_string(), value.to_string());
    }

    /// Build a request against the current configuration.
    ///
    /// GET requests never carry a body, even if one is supplied. Per-call
    /// `headers` replace default headers of the same name.
    pub fn build_request<B: Serialize + ?Sized>(
        &self,
        method: HttpMethod,
        endpoint: &str,
        body: Option<&B>,
        headers: &[(&str, &str)],
    ) -> Result<HttpRequest, ApiError> {
        let (base_url, mut merged) = {
            let config = self.read_config();
            let merged: Vec<(String, String)> = config
                .default_headers
                .iter()
                .map(|(k, v)| (k.clone(), v.clone()))
                .collect();
            (config.base_url.clone(), merged)
        };

        for (key, value) in headers {
            merged.retain(|(existing, _)| !existing.eq_ignore_ascii_case(key));
            merged.push((key.to_string(), value.to_string()));
        }

        let body = match body {
            Some(body) if method != HttpMethod::Get => Some(
                serde_json::to_string(body).map_err(|e| ApiError::Serialization(e.to_string()))?,
            ),
            _ => None,
        };

        Ok(HttpRequest {
            method,
            url: format!("{}{endpoint}", base_url.trim_end_matches('/')),
            headers: merged,
            body,
        })
    }

    /// Normalize a transport outcome into the response envelope.
    pub fn parse_response<T: DeserializeOwned>(
        &self,
        outcome: Result<HttpResponse, TransportError>,
    ) -> Result<ApiResponse<T>, ApiError> {
        let response = check_status(outcome)?;
        serde_json::from_str(&response.body)
            .map_err(|e| ApiError::Deserialization(e.to_string()))
    }

    /// Like [`parse_response`](Self::parse_response) but ignores the body.
    pub fn parse_empty(&self, outcome: Result<HttpResponse, TransportError>) -> Result<(), ApiError> {
        check_status(outcome).map(|_| ())
    }

    fn dispatch(&self, request: HttpRequest) -> Result<HttpResponse, TransportError> {
        debug!(method = %request.method, url = %request.url, "dispatching request");
        self.transport.execute(request)
    }

    /// Build, send and parse one request. `headers` apply to this call only.
    pub fn request<T, B>(
        &self,
        method: HttpMethod,
        endpoint: &str,
        body: Option<&B>,
        headers: &[(&str, &str)],
    ) -> Result<ApiResponse<T>, ApiError>
    where
        T: DeserializeOwned,
        B: Serialize + ?Sized,
    {
        let request = self.build_request(method, endpoint, body, headers)?;
        self.parse_response(self.dispatch(request))
    }

    pub fn get<T: DeserializeOwned>(&self, endpoint: &str) -> Result<ApiResponse<T>, ApiError> {
        self.request(HttpMethod::Get, endpoint, None::<&()>, &[])
    }

    pub fn post<T, B>(&self, endpoint: &str, body: &B) -> Result<ApiResponse<T>, ApiError>
    where
        T: DeserializeOwned,
        B: Serialize + ?Sized,
    {
        self.request(HttpMethod::Post, endpoint, Some(body), &[])
    }

    pub fn put<T, B>(&self, endpoint: &str, body: &B) -> Result<ApiResponse<T>, ApiError>
    where
        T: DeserializeOwned,
        B: Serialize + ?Sized,
    {
        self.request(HttpMethod::Put, endpoint, Some(body), &[])
    }

    pub fn patch<T, B>(&self, endpoint: &str, body: &B) -> Result<ApiResponse<T>, ApiError>
    where
        T: DeserializeOwned,
        B: Serialize + ?Sized,
    {
        self.request(HttpMethod::Patch, endpoint, Some(body), &[])
    }

    pub fn patch_empty<T: DeserializeOwned>(&self, endpoint: &str) -> Result<ApiResponse<T>, ApiError> {
        self.request(HttpMethod::Patch, endpoint, None::<&()>, &[])
    }

    /// Send a request whose response body is irrelevant.
    pub fn send_empty(&self, method: HttpMethod, endpoint: &str) -> Result<(), ApiError> {
        let request = self.build_request(method, endpoint, None::<&()>, &[])?;
        self.parse_empty(self.dispatch(request))
    }

    pub fn delete(&self, endpoint: &str) -> Result<(), ApiError> {
        self.send_empty(HttpMethod::Delete, endpoint)
    }
}

/// Map transport failures and non-2xx statuses to `ApiError`.
fn check_status(outcome: Result<HttpResponse, TransportError>) -> Result<HttpResponse, ApiError> {
    let response = outcome?;
    if response.is_success() {
        return Ok(response);
    }
    let details: Value = serde_json::from_str(&response.body).unwrap_or(Value::Null);
    let message = details
        .get("message")
        .and_then(Value::as_str)
        .map(str::to_string)
        .unwrap_or_else(|| format!("Request failed with status code {}", response.status));
    Err(ApiError::Http {
        status: response.status,
        message,
        details,
    })
}
