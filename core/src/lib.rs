//! Blocking client for the Thaw chat-server REST API.
//!
//! # Overview
//! Sends JSON POST requests, or bodiless GET requests, to a Thaw server
//! over one reused HTTP session and returns the decoded JSON replies.
//!
//! # Design
//! - `ThawClient` is stateless: it builds `HttpRequest` values and parses
//!   `HttpResponse` values, so each endpoint contract is testable offline.
//! - `Transport` is the I/O seam; `UreqTransport` is the real one.
//! - `Session` ties the two together and is passed explicitly to callers.
//! - Transport failures are `ApiError::Unreachable`; a JSON `null` reply is
//!   `Ok(Value::Null)`.

pub mod client;
pub mod config;
pub mod error;
pub mod http;
pub mod pretty;
pub mod session;
pub mod transport;
pub mod types;

pub use client::{paths, ThawClient};
pub use config::{SessionConfig, DEFAULT_BASE_URL};
pub use error::ApiError;
pub use http::{HttpMethod, HttpRequest, HttpResponse};
pub use pretty::{format_messages, format_timestamp};
pub use session::Session;
pub use transport::{Transport, UreqTransport};
pub use types::{Message, Sender, DEFAULT_MESSAGE_COUNT};
