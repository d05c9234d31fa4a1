//! Executes built requests over the network.
//!
//! # Design
//! `Transport` is the only I/O seam in the crate. `UreqTransport` wraps one
//! `ureq::Agent`, so every call made through it shares the agent's
//! connection pool and TLS settings. Status codes are returned as data:
//! only failures that produce no response at all become `Unreachable`; a
//! response whose body cannot be read is `Deserialization`.

use crate::config::SessionConfig;
use crate::error::ApiError;
use crate::http::{HttpMethod, HttpRequest, HttpResponse};

/// Performs one HTTP round-trip.
pub trait Transport {
    fn execute(&self, request: &HttpRequest) -> Result<HttpResponse, ApiError>;
}

/// Blocking transport backed by a shared `ureq::Agent`.
#[derive(Debug, Clone)]
pub struct UreqTransport {
    agent: ureq::Agent,
}

impl UreqTransport {
    pub fn new(config: &SessionConfig) -> Self {
        let tls = ureq::tls::TlsConfig::builder()
            .disable_verification(config.accept_invalid_certs)
            .build();
        let agent = ureq::Agent::config_builder()
            .http_status_as_error(false)
            .tls_config(tls)
            .timeout_global(config.timeout)
            .build()
            .new_agent();
        Self { agent }
    }
}

impl Transport for UreqTransport {
    fn execute(&self, request: &HttpRequest) -> Result<HttpResponse, ApiError> {
        let unreachable = |e: ureq::Error| ApiError::Unreachable {
            url: request.url.clone(),
            reason: e.to_string(),
        };

        let result = match request.method {
            HttpMethod::Get => {
                let mut builder = self.agent.get(&request.url);
                for (name, value) in &request.headers {
                    builder = builder.header(name.as_str(), value.as_str());
                }
                builder.call()
            }
            HttpMethod::Post => {
                let mut builder = self.agent.post(&request.url);
                for (name, value) in &request.headers {
                    builder = builder.header(name.as_str(), value.as_str());
                }
                match &request.body {
                    Some(body) => builder.send(body.as_bytes()),
                    None => builder.send_empty(),
                }
            }
        };
        let mut response = result.map_err(unreachable)?;

        // The reply arrived; a body that cannot be read as text is malformed.
        let status = response.status().as_u16();
        let body = response.body_mut().read_to_string().map_err(|e| {
            ApiError::Deserialization(format!("unreadable body from {}: {e}", request.url))
        })?;

        Ok(HttpResponse { status, body })
    }
}
