//! The fixed demonstration sequence run by `thaw-demo`.

use std::io::Write;

use anyhow::Result;
use serde_json::Value;
use thaw_client::{format_messages, ApiError, Session, Transport};
use tracing::info;

const SEPARATOR: &str = "########";
const USER: &str = "superUser";
const PASSWORD: &str = "password";

/// Print one reply. A transport failure prints `None` and lets the run go
/// on; any other error stops it.
fn show<W: Write>(out: &mut W, reply: Result<Value, ApiError>) -> Result<()> {
    match reply {
        Ok(value) => writeln!(out, "{value}")?,
        Err(e) if e.is_unreachable() => writeln!(out, "None")?,
        Err(e) => return Err(e.into()),
    }
    Ok(())
}

fn separator<W: Write>(out: &mut W) -> Result<()> {
    writeln!(out, "{SEPARATOR}\n")?;
    Ok(())
}

/// Run every endpoint once, in order, writing each reply to `out`.
pub fn run<T: Transport, W: Write>(session: &Session<T>, out: &mut W) -> Result<()> {
    info!(base_url = session.client().base_url(), "starting demo sequence");

    separator(out)?;
    show(out, session.create_account(USER, PASSWORD))?;

    separator(out)?;
    show(out, session.connect_to_server(USER, PASSWORD))?;

    // Second login; only the separator is printed.
    writeln!(out, "{SEPARATOR}")?;
    session.connect_to_server(USER, PASSWORD).or_else(ignore_unreachable)?;

    separator(out)?;
    show(out, session.add_channel("Another", USER))?;

    separator(out)?;
    show(out, session.add_channel("MonChannel", USER))?;

    separator(out)?;
    show(out, session.list_channels())?;

    separator(out)?;
    show(out, session.connect_to_channel("general", "Another", USER))?;

    separator(out)?;
    show(out, session.delete_channel("MonChannel", USER))?;

    for content in ["Message 2", "Message 3", "Message 4"] {
        separator(out)?;
        show(out, session.send_message(USER, "Another", content))?;
    }

    separator(out)?;
    match session.list_messages_for_channel("Another", Some(10)) {
        Ok(messages) => write!(out, "{}", format_messages(&messages)?)?,
        Err(e) if e.is_unreachable() => writeln!(out, "None")?,
        Err(e) => return Err(e.into()),
    }

    separator(out)?;
    show(out, session.list_channels())?;

    separator(out)?;
    show(out, session.disconnect_from_server("Another", USER))?;

    separator(out)?;
    show(out, session.list_channels())?;

    separator(out)?;
    info!("demo sequence finished");
    Ok(())
}

fn ignore_unreachable(e: ApiError) -> Result<Value, ApiError> {
    if e.is_unreachable() {
        Ok(Value::Null)
    } else {
        Err(e)
    }
}
