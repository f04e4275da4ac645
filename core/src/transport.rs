//! The transport seam and the shipped ureq-backed implementation.
//!
//! # Design
//! The dispatcher depends only on `Transport`: execute one `HttpRequest`,
//! return the `HttpResponse` as data, and say which responses count as
//! success. Status codes are never turned into errors here; that decision
//! belongs to `is_success`, which the dispatcher consults.

use std::sync::Arc;

use async_trait::async_trait;
use tracing::trace;

use crate::config::ClientConfig;
use crate::error::{TransportError, TransportErrorKind};
use crate::http::{HttpMethod, HttpRequest, HttpResponse};

/// Executes HTTP requests on behalf of the dispatcher.
#[async_trait]
pub trait Transport: Send + Sync {
    /// Perform exactly one round-trip. Non-2xx responses are data, not errors.
    async fn execute(&self, request: HttpRequest) -> Result<HttpResponse, TransportError>;

    /// Whether the response counts as success. Defaults to any 2xx status.
    fn is_success(&self, response: &HttpResponse) -> bool {
        response.is_success()
    }
}

#[async_trait]
impl<T: Transport + ?Sized> Transport for Arc<T> {
    async fn execute(&self, request: HttpRequest) -> Result<HttpResponse, TransportError> {
        (**self).execute(request).await
    }

    fn is_success(&self, response: &HttpResponse) -> bool {
        (**self).is_success(response)
    }
}

/// Blocking ureq agent driven from `spawn_blocking`.
#[derive(Clone)]
pub struct UreqTransport {
    agent: ureq::Agent,
}

impl UreqTransport {
    pub fn new(config: &ClientConfig) -> Self {
        let agent = ureq::Agent::config_builder()
            .http_status_as_error(false)
            .timeout_global(config.timeout())
            .build()
            .new_agent();
        Self { agent }
    }
}

impl Default for UreqTransport {
    fn default() -> Self {
        Self::new(&ClientConfig::default())
    }
}

#[async_trait]
impl Transport for UreqTransport {
    async fn execute(&self, request: HttpRequest) -> Result<HttpResponse, TransportError> {
        let agent = self.agent.clone();
        tokio::task::spawn_blocking(move || execute_blocking(&agent, request))
            .await
            .map_err(|e| TransportError::new(TransportErrorKind::Other, e.to_string()))?
    }
}

fn with_headers<B>(mut builder: ureq::RequestBuilder<B>, headers: &[(String, String)]) -> ureq::RequestBuilder<B> {
    for (name, value) in headers {
        builder = builder.header(name.as_str(), value.as_str());
    }
    builder
}

fn execute_blocking(agent: &ureq::Agent, request: HttpRequest) -> Result<HttpResponse, TransportError> {
    trace!(method = %request.method, url = %request.url, "executing request");
    let HttpRequest {
        method,
        url,
        headers,
        body,
    } = request;

    let result = match (method, body) {
        (HttpMethod::Get, None) => with_headers(agent.get(&url), &headers).call(),
        (HttpMethod::Get, Some(body)) => with_headers(agent.get(&url), &headers)
            .force_send_body()
            .send(body.as_bytes()),
        (HttpMethod::Delete, None) => with_headers(agent.delete(&url), &headers).call(),
        (HttpMethod::Delete, Some(body)) => with_headers(agent.delete(&url), &headers)
            .force_send_body()
            .send(body.as_bytes()),
        (HttpMethod::Post, Some(body)) => with_headers(agent.post(&url), &headers).send(body.as_bytes()),
        (HttpMethod::Post, None) => with_headers(agent.post(&url), &headers).send_empty(),
        (HttpMethod::Put, Some(body)) => with_headers(agent.put(&url), &headers).send(body.as_bytes()),
        (HttpMethod::Put, None) => with_headers(agent.put(&url), &headers).send_empty(),
    };

    let mut response = result.map_err(transport_error)?;
    let status = response.status().as_u16();
    let headers = response
        .headers()
        .iter()
        .filter_map(|(name, value)| {
            value
                .to_str()
                .ok()
                .map(|value| (name.as_str().to_string(), value.to_string()))
        })
        .collect();
    let body = response.body_mut().read_to_vec().map_err(transport_error)?;

    Ok(HttpResponse { status, headers, body })
}

fn transport_error(err: ureq::Error) -> TransportError {
    let kind = match &err {
        ureq::Error::Timeout(_) => TransportErrorKind::Timeout,
        ureq::Error::HostNotFound | ureq::Error::ConnectionFailed => TransportErrorKind::Connect,
        ureq::Error::Io(io) if io.kind() == std::io::ErrorKind::ConnectionRefused => TransportErrorKind::Connect,
        ureq::Error::Io(_) => TransportErrorKind::Io,
        _ => TransportErrorKind::Other,
    };
    TransportError::new(kind, err.to_string())
}
