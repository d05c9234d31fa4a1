//! Wire payloads for the Thaw API.
//!
//! Field names follow the server's JSON keys, which are not uniform
//! (`sendMessage` uses `username`, every other endpoint `userName`).

use serde::{Deserialize, Serialize};

/// Number of messages requested when the caller does not give a count.
pub const DEFAULT_MESSAGE_COUNT: u32 = 10;

/// Body of `createAccount` and `connectToServer`.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
#[serde(rename_all = "camelCase")]
pub struct Credentials {
    pub user_name: String,
    pub password: String,
}

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
#[serde(rename_all = "camelCase")]
pub struct AddChannel {
    pub new_channel_name: String,
    pub creator_name: String,
}

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
#[serde(rename_all = "camelCase")]
pub struct DeleteChannel {
    pub channel_name: String,
    pub user_name: String,
}

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
#[serde(rename_all = "camelCase")]
pub struct ConnectToChannel {
    pub old_channel_name: String,
    pub channel_name: String,
    pub user_name: String,
}

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
#[serde(rename_all = "camelCase")]
pub struct SendMessage {
    pub username: String,
    pub channel_name: String,
    pub message: String,
}

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
#[serde(rename_all = "camelCase")]
pub struct ListMessages {
    pub channel_name: String,
    pub number_of_message: u32,
}

/// Body of `getListUserForChannel`.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
#[serde(rename_all = "camelCase")]
pub struct ChannelRef {
    pub channel_name: String,
}

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
#[serde(rename_all = "camelCase")]
pub struct Disconnect {
    pub current_channel_name: String,
    pub user_name: String,
}

/// A chat message as returned by `getListMessageForChannel`.
///
/// Extra fields the server attaches (to the sender in particular) are
/// ignored.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
pub struct Message {
    /// Milliseconds since the Unix epoch.
    pub date: i64,
    pub sender: Sender,
    pub content: String,
}

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
pub struct Sender {
    pub name: String,
}
