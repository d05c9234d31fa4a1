//! Human-readable rendering of `getListMessageForChannel` replies.

use chrono::TimeZone;
use serde_json::Value;

use crate::error::ApiError;
use crate::types::Message;

/// Format a timestamp (milliseconds since epoch) as local `YYYY-MM-DD HH:MM:SS`.
///
/// Dates chrono cannot represent are a `Deserialization` error.
pub fn format_timestamp(ms: i64) -> Result<String, ApiError> {
    let datetime = chrono::Local
        .timestamp_millis_opt(ms)
        .single()
        .ok_or_else(|| ApiError::Deserialization(format!("date out of range: {ms}")))?;
    Ok(datetime.format("%Y-%m-%d %H:%M:%S").to_string())
}

/// Render a list of messages, two lines each, in input order:
///
/// ```text
/// 1970-01-01 00:16:40 Alice :
/// Hi
/// ```
pub fn format_messages(messages: &Value) -> Result<String, ApiError> {
    let messages: Vec<Message> = serde_json::from_value(messages.clone())
        .map_err(|e| ApiError::Deserialization(e.to_string()))?;

    let mut out = String::new();
    for message in &messages {
        out.push_str(&format!(
            "{} {} :\n{}\n",
            format_timestamp(message.date)?,
            message.sender.name,
            message.content
        ));
    }
    Ok(out)
}

#[cfg(test)]
mod tests {
    use serde_json::json;

    use super::*;

    fn local(ms: i64) -> String {
        chrono::Local
            .timestamp_millis_opt(ms)
            .single()
            .unwrap()
            .format("%Y-%m-%d %H:%M:%S")
            .to_string()
    }

    #[test]
    fn two_messages_render_in_order() {
        let input = json!([
            {"date": 1000000, "sender": {"name": "Alice"}, "content": "Hi"},
            {"date": 2000000, "sender": {"name": "Bob"}, "content": "Yo"}
        ]);
        let text = format_messages(&input).unwrap();
        let expected = format!(
            "{} Alice :\nHi\n{} Bob :\nYo\n",
            local(1_000_000),
            local(2_000_000)
        );
        assert_eq!(text, expected);
    }

    #[test]
    fn timestamp_has_second_precision() {
        let formatted = format_timestamp(1_000_000).unwrap();
        assert_eq!(formatted.len(), "1970-01-01 00:16:40".len());
        assert_eq!(formatted, local(1_000_000));
    }

    #[test]
    fn extra_sender_fields_are_ignored() {
        let input = json!([
            {"date": 1, "sender": {"name": "superUser", "passwordHash": "x"}, "content": "Message 2"}
        ]);
        let text = format_messages(&input).unwrap();
        assert!(text.ends_with(" superUser :\nMessage 2\n"));
    }

    #[test]
    fn empty_list_renders_nothing() {
        assert_eq!(format_messages(&json!([])).unwrap(), "");
    }

    #[test]
    fn missing_sender_is_an_error() {
        let input = json!([{"date": 1, "content": "orphan"}]);
        let err = format_messages(&input).unwrap_err();
        assert!(matches!(err, ApiError::Deserialization(_)));
    }

    #[test]
    fn out_of_range_dates_are_errors() {
        for date in [i64::MAX, i64::MIN] {
            let input = json!([{"date": date, "sender": {"name": "A"}, "content": "x"}]);
            let err = format_messages(&input).unwrap_err();
            assert!(matches!(err, ApiError::Deserialization(_)), "date {date}");
        }
        assert!(format_timestamp(i64::MAX).is_err());
    }

    #[test]
    fn pre_epoch_dates_format() {
        assert_eq!(format_timestamp(-1_000).unwrap(), local(-1_000));
    }

    #[test]
    fn non_list_is_an_error() {
        let err = format_messages(&json!("Channel: nope doesn't exist")).unwrap_err();
        assert!(matches!(err, ApiError::Deserialization(_)));
    }
}
