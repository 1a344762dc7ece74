//! The network seam.
//!
//! # Design
//! The executor never touches sockets. It hands an [`HttpRequest`] to a
//! [`Transport`] and gets an [`HttpResponse`] back, with any status code as
//! plain data. Timeouts, TLS and redirects belong to the transport.
//! [`ReqwestTransport`] is the bundled implementation; tests substitute
//! their own.

use std::future::Future;
use std::time::Duration;

use tracing::debug;

use crate::error::TransportError;
use crate::http::{HttpMethod, HttpRequest, HttpResponse};

/// Sends one request and returns whatever response the server produced.
///
/// Implementations must return non-2xx responses as `Ok`; `Err` is reserved
/// for failures where no response exists at all.
pub trait Transport {
    fn send(&self, request: HttpRequest) -> impl Future<Output = Result<HttpResponse, TransportError>> + Send;
}

/// Builder for [`ReqwestTransport`].
#[derive(Debug, Default, Clone)]
pub struct ReqwestTransportBuilder {
    timeout: Option<Duration>,
    user_agent: Option<String>,
}

impl ReqwestTransportBuilder {
    /// Total time allowed per request. Unset means reqwest's default (none).
    pub fn timeout(mut self, timeout: Duration) -> Self {
        self.timeout = Some(timeout);
        self
    }

    pub fn user_agent(mut self, user_agent: impl Into<String>) -> Self {
        self.user_agent = Some(user_agent.into());
        self
    }

    pub fn build(self) -> ReqwestTransport {
        ReqwestTransport {
            timeout: self.timeout,
            user_agent: self.user_agent,
        }
    }
}

/// [`Transport`] backed by `reqwest`.
///
/// A new `reqwest::Client` is built for every call and dropped when the call
/// returns, so no connection outlives its request.
#[derive(Debug, Default, Clone)]
pub struct ReqwestTransport {
    timeout: Option<Duration>,
    user_agent: Option<String>,
}

impl ReqwestTransport {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn builder() -> ReqwestTransportBuilder {
        ReqwestTransportBuilder::default()
    }

    fn client(&self) -> Result<reqwest::Client, TransportError> {
        let mut builder = reqwest::Client::builder().pool_max_idle_per_host(0);
        if let Some(timeout) = self.timeout {
            builder = builder.timeout(timeout);
        }
        if let Some(user_agent) = &self.user_agent {
            builder = builder.user_agent(user_agent.as_str());
        }
        Ok(builder.build()?)
    }
}

impl Transport for ReqwestTransport {
    fn send(&self, request: HttpRequest) -> impl Future<Output = Result<HttpResponse, TransportError>> + Send {
        async move {
            let client = self.client()?;
            let method = match request.method {
                HttpMethod::Get => reqwest::Method::GET,
                HttpMethod::Post => reqwest::Method::POST,
            };

            let mut builder = client.request(method, request.url.as_str());
            for (name, value) in &request.headers {
                builder = builder.header(name.as_str(), value.as_str());
            }
            if let Some(body) = request.body {
                builder = builder.body(body);
            }

            debug!(method = %request.method, url = %request.url, "sending request");
            let response = builder.send().await?;

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
            let body = response.text().await?;
            debug!(status, bytes = body.len(), "response received");

            Ok(HttpResponse {
                status,
                headers,
                body,
            })
        }
    }
}
