//! In-memory Thaw chat server.
//!
//! Serves the same routes and reply shapes as a real Thaw deployment so the
//! client can be exercised end to end without one. Every reply is a JSON
//! document: status messages are JSON strings, listings are arrays.

use std::{
    sync::Arc,
    time::{SystemTime, UNIX_EPOCH},
};

use axum::{
    extract::{rejection::JsonRejection, State},
    http::StatusCode,
    routing::{get, post},
    Json, Router,
};
use serde::{Deserialize, Serialize};
use serde_json::Value;
use tokio::{net::TcpListener, sync::RwLock};
use tracing::{info, warn};

/// Channel every user joins on login.
pub const GENERAL: &str = "general";
const MAX_CHANNEL_NAME: usize = 50;
const MAX_MESSAGE_CHARS: usize = 512;

#[derive(Clone, Debug, Serialize, Deserialize, PartialEq, Eq)]
pub struct Sender {
    pub name: String,
}

#[derive(Clone, Debug, Serialize, Deserialize, PartialEq, Eq)]
pub struct Message {
    pub sender: Sender,
    pub date: i64,
    pub content: String,
}

#[derive(Debug)]
struct Account {
    name: String,
    password: String,
}

#[derive(Debug)]
struct Channel {
    name: String,
    /// `None` for the built-in `general` channel, which nobody may delete.
    creator: Option<String>,
    users: Vec<String>,
    messages: Vec<Message>,
}

impl Channel {
    fn new(name: &str, creator: Option<&str>) -> Self {
        Self {
            name: name.to_string(),
            creator: creator.map(str::to_string),
            users: Vec::new(),
            messages: Vec::new(),
        }
    }

    fn has_user(&self, user: &str) -> bool {
        self.users.iter().any(|u| u == user)
    }

    fn remove_user(&mut self, user: &str) {
        self.users.retain(|u| u != user);
    }
}

#[derive(Debug)]
pub struct Store {
    accounts: Vec<Account>,
    connected: Vec<String>,
    channels: Vec<Channel>,
}

impl Store {
    fn channel(&self, name: &str) -> Option<&Channel> {
        self.channels.iter().find(|c| c.name == name)
    }

    fn channel_mut(&mut self, name: &str) -> Option<&mut Channel> {
        self.channels.iter_mut().find(|c| c.name == name)
    }

    fn is_connected(&self, user: &str) -> bool {
        self.connected.iter().any(|u| u == user)
    }
}

impl Default for Store {
    fn default() -> Self {
        Self {
            accounts: Vec::new(),
            connected: Vec::new(),
            channels: vec![Channel::new(GENERAL, None)],
        }
    }
}

pub type Db = Arc<RwLock<Store>>;

type Reply = (StatusCode, Json<Value>);
type Body<T> = Result<Json<T>, JsonRejection>;

pub fn app() -> Router {
    let db: Db = Arc::new(RwLock::new(Store::default()));
    Router::new()
        .route("/api/createAccount", post(create_account))
        .route("/api/connectToServer", post(connect_to_server))
        .route("/api/private/disconnectFromServer", post(disconnect_from_server))
        .route("/api/private/addChannel", post(add_channel))
        .route("/api/private/deleteChannel", post(delete_channel))
        .route("/api/private/connectToChannel", post(connect_to_channel))
        .route("/api/private/sendMessage", post(send_message))
        .route(
            "/api/private/getListMessageForChannel",
            post(list_messages_for_channel),
        )
        .route("/api/private/getListUserForChannel", post(list_users_for_channel))
        .route("/api/private/getListChannel", get(list_channels))
        .with_state(db)
}

pub async fn run(listener: TcpListener) -> Result<(), std::io::Error> {
    axum::serve(listener, app()).await
}

fn answer<T: Serialize>(code: StatusCode, body: T) -> Reply {
    let body = serde_json::to_value(body).unwrap_or(Value::Null);
    if code.is_success() {
        info!(code = code.as_u16(), answer = %body, "reply");
    } else {
        warn!(code = code.as_u16(), answer = %body, "reply");
    }
    (code, Json(body))
}

fn bad_request(message: impl Into<String>) -> Reply {
    answer(StatusCode::BAD_REQUEST, message.into())
}

fn wrong_format() -> Reply {
    bad_request("Wrong Json format")
}

fn wrong_input() -> Reply {
    bad_request("Wrong JSON input")
}

/// Non-empty string field, or `None`.
fn field(value: &Option<String>) -> Option<&str> {
    value.as_deref().filter(|s| !s.is_empty())
}

/// ASCII word characters, `|` and space; at most `MAX_CHANNEL_NAME` long.
fn valid_channel_name(name: &str) -> bool {
    !name.is_empty()
        && name.len() <= MAX_CHANNEL_NAME
        && name
            .chars()
            .all(|c| c.is_ascii_alphanumeric() || matches!(c, '_' | '|' | ' '))
}

fn sanitize(message: &str) -> String {
    message
        .trim()
        .replace('<', "&lt;")
        .replace('>', "&gt;")
        .chars()
        .take(MAX_MESSAGE_CHARS)
        .collect()
}

fn now_millis() -> i64 {
    SystemTime::now()
        .duration_since(UNIX_EPOCH)
        .map(|d| d.as_millis() as i64)
        .unwrap_or(1)
}

#[derive(Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CredentialsInput {
    pub user_name: Option<String>,
    pub password: Option<String>,
}

async fn create_account(State(db): State<Db>, body: Body<CredentialsInput>) -> Reply {
    info!("In createAccount request");
    let Ok(Json(input)) = body else {
        return wrong_format();
    };
    let (Some(name), Some(password)) = (field(&input.user_name), field(&input.password)) else {
        return wrong_input();
    };
    let mut store = db.write().await;
    if store.accounts.iter().any(|a| a.name == name) {
        return answer(
            StatusCode::UNAUTHORIZED,
            format!("User '{name}' already exists"),
        );
    }
    store.accounts.push(Account {
        name: name.to_string(),
        password: password.to_string(),
    });
    answer(StatusCode::OK, format!("Account '{name}' created"))
}

async fn connect_to_server(State(db): State<Db>, body: Body<CredentialsInput>) -> Reply {
    info!("In connectToServer request");
    let Ok(Json(input)) = body else {
        return wrong_format();
    };
    let (Some(name), Some(password)) = (field(&input.user_name), field(&input.password)) else {
        return wrong_input();
    };
    let mut store = db.write().await;
    let authorized = store
        .accounts
        .iter()
        .any(|a| a.name == name && a.password == password);
    if !authorized {
        return bad_request(format!("HumanUser: '{name}' authentication failed"));
    }
    if !store.is_connected(name) {
        store.connected.push(name.to_string());
    }
    let Some(general) = store.channel_mut(GENERAL) else {
        return bad_request(format!("Channel '{GENERAL}' does not exist"));
    };
    if !general.has_user(name) {
        general.users.push(name.to_string());
    }
    answer(
        StatusCode::OK,
        format!("HumanUser: '{name}' authentication success, connected to '{GENERAL}' channel"),
    )
}

#[derive(Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct DisconnectInput {
    pub current_channel_name: Option<String>,
    pub user_name: Option<String>,
}

async fn disconnect_from_server(State(db): State<Db>, body: Body<DisconnectInput>) -> Reply {
    info!("In disconnectFromServer request");
    let Ok(Json(input)) = body else {
        return wrong_input();
    };
    let (Some(channel_name), Some(user)) =
        (field(&input.current_channel_name), field(&input.user_name))
    else {
        return bad_request("There is no channel defined or the userName is incorrect");
    };
    let mut store = db.write().await;
    if store.channel(channel_name).is_none() {
        return bad_request(format!("Channel '{channel_name}' does not exist"));
    }
    if !store.is_connected(user) {
        return bad_request("Session for user does not exist");
    }
    store.connected.retain(|u| u != user);
    if let Some(channel) = store.channel_mut(channel_name) {
        channel.remove_user(user);
    }
    info!("User '{user}' disconnected from server");
    answer(StatusCode::OK, "Going back to login page")
}

#[derive(Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct AddChannelInput {
    pub new_channel_name: Option<String>,
    pub creator_name: Option<String>,
}

async fn add_channel(State(db): State<Db>, body: Body<AddChannelInput>) -> Reply {
    info!("In addChannel request");
    let Ok(Json(input)) = body else {
        return wrong_format();
    };
    let (Some(name), Some(creator)) = (field(&input.new_channel_name), field(&input.creator_name))
    else {
        return wrong_input();
    };
    let mut store = db.write().await;
    if store.channel(name).is_some() {
        return bad_request(format!("Channel {name} already exists"));
    }
    if !valid_channel_name(name) {
        return bad_request(
            "The channelName exceed 50 characters or got not alphanumerics characters",
        );
    }
    store.channels.push(Channel::new(name, Some(creator)));
    answer(StatusCode::OK, format!("Channel {name} successfully created"))
}

#[derive(Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct DeleteChannelInput {
    pub channel_name: Option<String>,
    pub user_name: Option<String>,
}

async fn delete_channel(State(db): State<Db>, body: Body<DeleteChannelInput>) -> Reply {
    info!("In deleteChannel request");
    let Ok(Json(input)) = body else {
        return wrong_format();
    };
    let (Some(name), Some(user)) = (field(&input.channel_name), field(&input.user_name)) else {
        return wrong_input();
    };
    let mut store = db.write().await;
    let Some(channel) = store.channel(name) else {
        return bad_request(format!("Channel '{name}' does not exist"));
    };
    if channel.creator.as_deref() != Some(user) {
        return answer(
            StatusCode::FORBIDDEN,
            "You do not have the right to delete this channel",
        );
    }
    if !channel.users.is_empty() {
        return bad_request(format!(
            "Channel '{name}' failed to delete, users are still connected"
        ));
    }
    store.channels.retain(|c| c.name != name);
    answer(StatusCode::OK, format!("Channel '{name}' successfully deleted"))
}

#[derive(Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ConnectToChannelInput {
    pub old_channel_name: Option<String>,
    pub channel_name: Option<String>,
    pub user_name: Option<String>,
}

async fn connect_to_channel(State(db): State<Db>, body: Body<ConnectToChannelInput>) -> Reply {
    info!("In connectToChannel request");
    let Ok(Json(input)) = body else {
        return wrong_format();
    };
    let (Some(old), Some(target), Some(user)) = (
        field(&input.old_channel_name),
        field(&input.channel_name),
        field(&input.user_name),
    ) else {
        return wrong_input();
    };
    let mut store = db.write().await;
    let Some(channel) = store.channel(target) else {
        return bad_request(format!("Channel :{target} does not exist"));
    };
    if channel.has_user(user) {
        return bad_request(format!("HumanUser :{user} is already connected"));
    }
    let Some(old_channel) = store.channel_mut(old) else {
        return bad_request(format!("OldChannel {old} does not exist"));
    };
    old_channel.remove_user(user);
    if let Some(channel) = store.channel_mut(target) {
        channel.users.push(user.to_string());
    }
    answer(
        StatusCode::OK,
        format!("HumanUser :{user} successfully quit channel :'{old}' and connected to channel :'{target}'"),
    )
}

#[derive(Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct SendMessageInput {
    pub username: Option<String>,
    pub channel_name: Option<String>,
    pub message: Option<String>,
}

async fn send_message(State(db): State<Db>, body: Body<SendMessageInput>) -> Reply {
    info!("In sendMessage request");
    let Ok(Json(input)) = body else {
        return wrong_format();
    };
    let (Some(user), Some(channel_name), Some(message)) = (
        field(&input.username),
        field(&input.channel_name),
        field(&input.message),
    ) else {
        return wrong_input();
    };
    let mut store = db.write().await;
    let Some(channel) = store.channel_mut(channel_name) else {
        return bad_request(format!("Channel: '{channel_name}' doesn't exist"));
    };
    if !channel.has_user(user) {
        return bad_request(format!("HumanUser: '{user}' is not connected to chan"));
    }
    let content = sanitize(message);
    channel.messages.push(Message {
        sender: Sender {
            name: user.to_string(),
        },
        date: now_millis(),
        content: content.clone(),
    });
    answer(
        StatusCode::OK,
        format!("Message: {content} sent correctly to channel '{channel_name}'"),
    )
}

#[derive(Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ListMessagesInput {
    pub channel_name: Option<String>,
    pub number_of_message: Option<i64>,
}

async fn list_messages_for_channel(State(db): State<Db>, body: Body<ListMessagesInput>) -> Reply {
    info!("In getListMessageForChannel request");
    let Ok(Json(input)) = body else {
        return wrong_format();
    };
    let Some(channel_name) = field(&input.channel_name) else {
        return bad_request("No channelName given");
    };
    let wanted = match input.number_of_message {
        Some(n) if n >= 1 => n as usize,
        _ => return bad_request("Number Of Message must be > 0 !"),
    };
    let store = db.read().await;
    let Some(channel) = store.channel(channel_name) else {
        return bad_request(format!("Channel: {channel_name} doesn't exist"));
    };
    let start = channel.messages.len().saturating_sub(wanted);
    answer(StatusCode::OK, &channel.messages[start..])
}

#[derive(Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ChannelInput {
    pub channel_name: Option<String>,
}

async fn list_users_for_channel(State(db): State<Db>, body: Body<ChannelInput>) -> Reply {
    info!("In getListUserForChannel request");
    let Ok(Json(input)) = body else {
        return wrong_format();
    };
    let Some(channel_name) = field(&input.channel_name) else {
        return bad_request("No channelName given");
    };
    let store = db.read().await;
    match store.channel(channel_name) {
        Some(channel) => answer(StatusCode::OK, &channel.users),
        None => bad_request(format!("Channel:{channel_name} doesn't exist")),
    }
}

async fn list_channels(State(db): State<Db>) -> Reply {
    info!("In getListChannels request");
    let store = db.read().await;
    let names: Vec<&str> = store.channels.iter().map(|c| c.name.as_str()).collect();
    answer(StatusCode::OK, names)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn message_serializes_with_nested_sender() {
        let message = Message {
            sender: Sender {
                name: "Alice".to_string(),
            },
            date: 1_000_000,
            content: "Hi".to_string(),
        };
        let json = serde_json::to_value(&message).unwrap();
        assert_eq!(json["sender"]["name"], "Alice");
        assert_eq!(json["date"], 1_000_000);
        assert_eq!(json["content"], "Hi");
    }

    #[test]
    fn store_starts_with_general() {
        let store = Store::default();
        assert!(store.channel(GENERAL).is_some());
        assert!(store.channel(GENERAL).unwrap().creator.is_none());
    }

    #[test]
    fn channel_names_are_short_word_characters() {
        assert!(valid_channel_name("MonChannel"));
        assert!(valid_channel_name("chan42"));
        assert!(valid_channel_name("has space"));
        assert!(valid_channel_name("snake_case|pipe"));
        assert!(valid_channel_name(&"a".repeat(50)));
        assert!(!valid_channel_name("semi;colon"));
        assert!(!valid_channel_name("café"));
        assert!(!valid_channel_name(""));
        assert!(!valid_channel_name(&"a".repeat(51)));
    }

    #[test]
    fn sanitize_escapes_trims_and_truncates() {
        assert_eq!(sanitize("  <b>hi</b> "), "&lt;b&gt;hi&lt;/b&gt;");
        assert_eq!(sanitize(&"x".repeat(600)).len(), MAX_MESSAGE_CHARS);
    }

    #[test]
    fn empty_fields_count_as_missing() {
        assert_eq!(field(&Some(String::new())), None);
        assert_eq!(field(&None), None);
        assert_eq!(field(&Some("a".to_string())), Some("a"));
    }

    #[test]
    fn credentials_input_accepts_missing_keys() {
        let input: CredentialsInput = serde_json::from_str(r#"{"userName":"bob"}"#).unwrap();
        assert_eq!(input.user_name.as_deref(), Some("bob"));
        assert!(input.password.is_none());
    }
}
