//! Stateless HTTP request builder and response parser for the Thaw API.
//!
//! # Design
//! `ThawClient` holds only a `base_url`. Every endpoint has a `build_*`
//! method producing an `HttpRequest`; every reply goes through
//! `parse_json`. Nothing here touches the network, so the endpoint contract
//! (method, path, payload keys) is checked without a server.

use serde::Serialize;
use serde_json::Value;

use crate::error::ApiError;
use crate::http::{HttpMethod, HttpRequest, HttpResponse};
use crate::types::{
    AddChannel, ChannelRef, ConnectToChannel, Credentials, DeleteChannel, Disconnect,
    ListMessages, SendMessage, DEFAULT_MESSAGE_COUNT,
};

/// Relative endpoint paths.
pub mod paths {
    pub const CREATE_ACCOUNT: &str = "/api/createAccount";
    pub const CONNECT_TO_SERVER: &str = "/api/connectToServer";
    pub const ADD_CHANNEL: &str = "/api/private/addChannel";
    pub const DELETE_CHANNEL: &str = "/api/private/deleteChannel";
    pub const CONNECT_TO_CHANNEL: &str = "/api/private/connectToChannel";
    pub const SEND_MESSAGE: &str = "/api/private/sendMessage";
    pub const LIST_MESSAGES_FOR_CHANNEL: &str = "/api/private/getListMessageForChannel";
    pub const LIST_CHANNELS: &str = "/api/private/getListChannel";
    pub const LIST_USERS_FOR_CHANNEL: &str = "/api/private/getListUserForChannel";
    pub const DISCONNECT_FROM_SERVER: &str = "/api/private/disconnectFromServer";
}

/// Request builder and reply parser bound to one server.
#[derive(Debug, Clone)]
pub struct ThawClient {
    base_url: String,
}

impl ThawClient {
    pub fn new(base_url: &str) -> Self {
        Self {
            base_url: base_url.trim_end_matches('/').to_string(),
        }
    }

    pub fn base_url(&self) -> &str {
        &self.base_url
    }

    /// Absolute URL for a relative endpoint path.
    pub fn url(&self, path: &str) -> String {
        format!("{}{path}", self.base_url)
    }

    /// Build a POST carrying `payload` as its JSON body.
    ///
    /// The payload is serialized here and only here; the transport sends the
    /// resulting string untouched.
    pub fn build_post_json<T: Serialize + ?Sized>(
        &self,
        url: &str,
        payload: &T,
    ) -> Result<HttpRequest, ApiError> {
        let body =
            serde_json::to_string(payload).map_err(|e| ApiError::Serialization(e.to_string()))?;
        Ok(HttpRequest {
            method: HttpMethod::Post,
            url: url.to_string(),
            headers: vec![
                ("content-type".to_string(), "application/json".to_string()),
                ("accept".to_string(), "text/plain".to_string()),
            ],
            body: Some(body),
        })
    }

    pub fn build_get(&self, url: &str) -> HttpRequest {
        HttpRequest {
            method: HttpMethod::Get,
            url: url.to_string(),
            headers: Vec::new(),
            body: None,
        }
    }

    pub fn build_create_account(
        &self,
        user_name: &str,
        password: &str,
    ) -> Result<HttpRequest, ApiError> {
        let payload = Credentials {
            user_name: user_name.to_string(),
            password: password.to_string(),
        };
        self.build_post_json(&self.url(paths::CREATE_ACCOUNT), &payload)
    }

    pub fn build_connect_to_server(
        &self,
        user_name: &str,
        password: &str,
    ) -> Result<HttpRequest, ApiError> {
        let payload = Credentials {
            user_name: user_name.to_string(),
            password: password.to_string(),
        };
        self.build_post_json(&self.url(paths::CONNECT_TO_SERVER), &payload)
    }

    pub fn build_add_channel(
        &self,
        new_channel_name: &str,
        creator_name: &str,
    ) -> Result<HttpRequest, ApiError> {
        let payload = AddChannel {
            new_channel_name: new_channel_name.to_string(),
            creator_name: creator_name.to_string(),
        };
        self.build_post_json(&self.url(paths::ADD_CHANNEL), &payload)
    }

    pub fn build_delete_channel(
        &self,
        channel_name: &str,
        user_name: &str,
    ) -> Result<HttpRequest, ApiError> {
        let payload = DeleteChannel {
            channel_name: channel_name.to_string(),
            user_name: user_name.to_string(),
        };
        self.build_post_json(&self.url(paths::DELETE_CHANNEL), &payload)
    }

    pub fn build_connect_to_channel(
        &self,
        old_channel_name: &str,
        channel_name: &str,
        user_name: &str,
    ) -> Result<HttpRequest, ApiError> {
        let payload = ConnectToChannel {
            old_channel_name: old_channel_name.to_string(),
            channel_name: channel_name.to_string(),
            user_name: user_name.to_string(),
        };
        self.build_post_json(&self.url(paths::CONNECT_TO_CHANNEL), &payload)
    }

    pub fn build_send_message(
        &self,
        user_name: &str,
        channel_name: &str,
        message: &str,
    ) -> Result<HttpRequest, ApiError> {
        let payload = SendMessage {
            username: user_name.to_string(),
            channel_name: channel_name.to_string(),
            message: message.to_string(),
        };
        self.build_post_json(&self.url(paths::SEND_MESSAGE), &payload)
    }

    /// `count` falls back to `DEFAULT_MESSAGE_COUNT` when `None`.
    pub fn build_list_messages_for_channel(
        &self,
        channel_name: &str,
        count: Option<u32>,
    ) -> Result<HttpRequest, ApiError> {
        let payload = ListMessages {
            channel_name: channel_name.to_string(),
            number_of_message: count.unwrap_or(DEFAULT_MESSAGE_COUNT),
        };
        self.build_post_json(&self.url(paths::LIST_MESSAGES_FOR_CHANNEL), &payload)
    }

    pub fn build_list_channels(&self) -> HttpRequest {
        self.build_get(&self.url(paths::LIST_CHANNELS))
    }

    pub fn build_list_users_for_channel(&self, channel_name: &str) -> Result<HttpRequest, ApiError> {
        let payload = ChannelRef {
            channel_name: channel_name.to_string(),
        };
        self.build_post_json(&self.url(paths::LIST_USERS_FOR_CHANNEL), &payload)
    }

    pub fn build_disconnect_from_server(
        &self,
        current_channel_name: &str,
        user_name: &str,
    ) -> Result<HttpRequest, ApiError> {
        let payload = Disconnect {
            current_channel_name: current_channel_name.to_string(),
            user_name: user_name.to_string(),
        };
        self.build_post_json(&self.url(paths::DISCONNECT_FROM_SERVER), &payload)
    }

    /// Decode a reply body as JSON, whatever its status.
    ///
    /// An empty body decodes to `Value::Null`.
    pub fn parse_json(&self, response: HttpResponse) -> Result<Value, ApiError> {
        if response.body.trim().is_empty() {
            return Ok(Value::Null);
        }
        serde_json::from_str(&response.body).map_err(|e| ApiError::Deserialization(e.to_string()))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    const BASE_URL: &str = "https://localhost:8080";

    fn client() -> ThawClient {
        ThawClient::new(BASE_URL)
    }

    fn body_of(req: &HttpRequest) -> Value {
        serde_json::from_str(req.body.as_deref().unwrap()).unwrap()
    }

    /// Assert method, path and the exact key set of the JSON body.
    fn assert_post_contract(req: &HttpRequest, path: &str, keys: &[&str]) {
        assert_eq!(req.method, HttpMethod::Post);
        assert_eq!(req.url, format!("{BASE_URL}{path}"));
        let body = body_of(req);
        let mut actual: Vec<&str> = body.as_object().unwrap().keys().map(String::as_str).collect();
        actual.sort_unstable();
        let mut expected = keys.to_vec();
        expected.sort_unstable();
        assert_eq!(actual, expected, "payload keys for {path}");
    }

    #[test]
    fn post_json_sets_content_type_and_accept() {
        let req = client()
            .build_post_json("http://h/x", &serde_json::json!({"a": 1}))
            .unwrap();
        assert_eq!(req.header("Content-Type"), Some("application/json"));
        assert_eq!(req.header("accept"), Some("text/plain"));
        assert_eq!(req.body.as_deref(), Some(r#"{"a":1}"#));
    }

    #[test]
    fn get_has_no_body_and_no_content_type() {
        let req = client().build_list_channels();
        assert_eq!(req.method, HttpMethod::Get);
        assert_eq!(req.url, "https://localhost:8080/api/private/getListChannel");
        assert!(req.body.is_none());
        assert!(req.header("content-type").is_none());
    }

    #[test]
    fn create_account_contract() {
        let req = client().build_create_account("superUser", "password").unwrap();
        assert_post_contract(&req, "/api/createAccount", &["userName", "password"]);
        assert_eq!(body_of(&req)["userName"], "superUser");
        assert_eq!(body_of(&req)["password"], "password");
    }

    #[test]
    fn connect_to_server_contract() {
        let req = client().build_connect_to_server("bob", "pw").unwrap();
        assert_post_contract(&req, "/api/connectToServer", &["userName", "password"]);
    }

    #[test]
    fn add_channel_contract() {
        let req = client().build_add_channel("Another", "superUser").unwrap();
        assert_post_contract(
            &req,
            "/api/private/addChannel",
            &["newChannelName", "creatorName"],
        );
        assert_eq!(body_of(&req)["newChannelName"], "Another");
    }

    #[test]
    fn delete_channel_contract() {
        let req = client().build_delete_channel("MonChannel", "superUser").unwrap();
        assert_post_contract(&req, "/api/private/deleteChannel", &["channelName", "userName"]);
    }

    #[test]
    fn connect_to_channel_contract() {
        let req = client()
            .build_connect_to_channel("general", "Another", "superUser")
            .unwrap();
        assert_post_contract(
            &req,
            "/api/private/connectToChannel",
            &["oldChannelName", "channelName", "userName"],
        );
        let body = body_of(&req);
        assert_eq!(body["oldChannelName"], "general");
        assert_eq!(body["channelName"], "Another");
    }

    #[test]
    fn send_message_uses_lowercase_username_key() {
        let req = client()
            .build_send_message("superUser", "Another", "Message 2")
            .unwrap();
        assert_post_contract(
            &req,
            "/api/private/sendMessage",
            &["username", "channelName", "message"],
        );
        assert_eq!(body_of(&req)["username"], "superUser");
    }

    #[test]
    fn list_messages_defaults_to_ten() {
        let req = client().build_list_messages_for_channel("Another", None).unwrap();
        assert_post_contract(
            &req,
            "/api/private/getListMessageForChannel",
            &["channelName", "numberOfMessage"],
        );
        assert_eq!(body_of(&req)["numberOfMessage"], 10);
    }

    #[test]
    fn list_messages_explicit_count() {
        let req = client().build_list_messages_for_channel("Another", Some(3)).unwrap();
        assert_eq!(body_of(&req)["numberOfMessage"], 3);
    }

    #[test]
    fn list_users_for_channel_contract() {
        let req = client().build_list_users_for_channel("general").unwrap();
        assert_post_contract(&req, "/api/private/getListUserForChannel", &["channelName"]);
    }

    #[test]
    fn disconnect_from_server_contract() {
        let req = client()
            .build_disconnect_from_server("Another", "superUser")
            .unwrap();
        assert_post_contract(
            &req,
            "/api/private/disconnectFromServer",
            &["currentChannelName", "userName"],
        );
    }

    #[test]
    fn trailing_slash_is_stripped() {
        let client = ThawClient::new("https://localhost:8080/");
        assert_eq!(
            client.url(paths::CREATE_ACCOUNT),
            "https://localhost:8080/api/createAccount"
        );
    }

    #[test]
    fn parse_json_returns_body_regardless_of_status() {
        let response = HttpResponse {
            status: 401,
            body: r#""User 'superUser' already exists""#.to_string(),
        };
        let value = client().parse_json(response).unwrap();
        assert_eq!(value, Value::String("User 'superUser' already exists".into()));
    }

    #[test]
    fn parse_json_null_and_empty_are_values() {
        let null = HttpResponse {
            status: 200,
            body: "null".to_string(),
        };
        assert_eq!(client().parse_json(null).unwrap(), Value::Null);

        let empty = HttpResponse {
            status: 200,
            body: String::new(),
        };
        assert_eq!(client().parse_json(empty).unwrap(), Value::Null);
    }

    #[test]
    fn parse_json_bad_body() {
        let response = HttpResponse {
            status: 200,
            body: "<html>oops</html>".to_string(),
        };
        let err = client().parse_json(response).unwrap_err();
        assert!(matches!(err, ApiError::Deserialization(_)));
    }
}
