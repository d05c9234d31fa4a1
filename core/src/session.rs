//! One long-lived client session against a Thaw server.
//!
//! # Design
//! `Session` pairs a `ThawClient` (request building, reply parsing) with a
//! `Transport` (I/O). It is constructed once and passed to whoever issues
//! requests. Each endpoint method builds its request, runs it, and hands
//! back the decoded JSON; transport failures come back as
//! `ApiError::Unreachable` after being logged.

use serde::Serialize;
use serde_json::Value;
use tracing::{debug, info, warn};

use crate::client::ThawClient;
use crate::config::SessionConfig;
use crate::error::ApiError;
use crate::http::{HttpMethod, HttpRequest};
use crate::transport::{Transport, UreqTransport};

#[derive(Debug, Clone)]
pub struct Session<T = UreqTransport> {
    client: ThawClient,
    transport: T,
}

impl Session<UreqTransport> {
    /// Build a session over a fresh `ureq` agent configured from `config`.
    pub fn connect(config: &SessionConfig) -> Self {
        if config.accept_invalid_certs {
            warn!(base_url = %config.base_url, "TLS certificate verification disabled");
        }
        Self::with_transport(ThawClient::new(&config.base_url), UreqTransport::new(config))
    }
}

impl<T: Transport> Session<T> {
    pub fn with_transport(client: ThawClient, transport: T) -> Self {
        Self { client, transport }
    }

    pub fn client(&self) -> &ThawClient {
        &self.client
    }

    pub fn transport(&self) -> &T {
        &self.transport
    }

    /// POST `payload` as JSON to an absolute `url` and decode the reply.
    pub fn post_json<P: Serialize + ?Sized>(&self, url: &str, payload: &P) -> Result<Value, ApiError> {
        let request = self.client.build_post_json(url, payload)?;
        self.send(request)
    }

    /// GET an absolute `url` and decode the reply.
    pub fn get(&self, url: &str) -> Result<Value, ApiError> {
        let request = self.client.build_get(url);
        self.send(request)
    }

    pub fn create_account(&self, user_name: &str, password: &str) -> Result<Value, ApiError> {
        self.send(self.client.build_create_account(user_name, password)?)
    }

    pub fn connect_to_server(&self, user_name: &str, password: &str) -> Result<Value, ApiError> {
        self.send(self.client.build_connect_to_server(user_name, password)?)
    }

    pub fn add_channel(&self, new_channel_name: &str, creator_name: &str) -> Result<Value, ApiError> {
        self.send(self.client.build_add_channel(new_channel_name, creator_name)?)
    }

    pub fn delete_channel(&self, channel_name: &str, user_name: &str) -> Result<Value, ApiError> {
        self.send(self.client.build_delete_channel(channel_name, user_name)?)
    }

    pub fn connect_to_channel(
        &self,
        old_channel_name: &str,
        channel_name: &str,
        user_name: &str,
    ) -> Result<Value, ApiError> {
        self.send(
            self.client
                .build_connect_to_channel(old_channel_name, channel_name, user_name)?,
        )
    }

    pub fn send_message(
        &self,
        user_name: &str,
        channel_name: &str,
        message: &str,
    ) -> Result<Value, ApiError> {
        self.send(self.client.build_send_message(user_name, channel_name, message)?)
    }

    pub fn list_messages_for_channel(
        &self,
        channel_name: &str,
        count: Option<u32>,
    ) -> Result<Value, ApiError> {
        self.send(self.client.build_list_messages_for_channel(channel_name, count)?)
    }

    pub fn list_channels(&self) -> Result<Value, ApiError> {
        self.send(self.client.build_list_channels())
    }

    pub fn list_users_for_channel(&self, channel_name: &str) -> Result<Value, ApiError> {
        self.send(self.client.build_list_users_for_channel(channel_name)?)
    }

    pub fn disconnect_from_server(
        &self,
        current_channel_name: &str,
        user_name: &str,
    ) -> Result<Value, ApiError> {
        self.send(
            self.client
                .build_disconnect_from_server(current_channel_name, user_name)?,
        )
    }

    fn send(&self, request: HttpRequest) -> Result<Value, ApiError> {
        match (request.method, request.body.as_deref()) {
            (HttpMethod::Post, Some(body)) => info!(url = %request.url, data = %body, "POST"),
            _ => info!(url = %request.url, "{}", request.method.as_str()),
        }

        let response = match self.transport.execute(&request) {
            Ok(response) => response,
            Err(e) => {
                if e.is_unreachable() {
                    warn!(url = %request.url, error = %e, "Can't reach target {}", request.url);
                }
                return Err(e);
            }
        };
        debug!(url = %request.url, status = response.status, "response received");
        self.client.parse_json(response)
    }
}
