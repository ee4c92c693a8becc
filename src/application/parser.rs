//! Interpretation of API payloads and user-supplied inputs.
//!
//! Turns raw `data` payloads into domain records and decides what counts as
//! end-of-data.

use chrono::{DateTime, NaiveDate};
use serde_json::Value;

use crate::domain::{ApiResponse, AppError, Conversation, Message, Result};

/// Which end of a date window an input describes.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum DateBound {
    Start,
    End,
}

/// Records of a conversation page, or `None` when the page signals end-of-data
/// (`data` missing, not a list, or empty).
#[must_use]
pub fn page_records(response: ApiResponse) -> Option<Vec<Value>> {
    match response.data {
        Some(Value::Array(items)) if !items.is_empty() => Some(items),
        _ => None,
    }
}

/// Convert page records into conversations, keeping their order.
#[must_use]
pub fn parse_conversations(records: Vec<Value>) -> Vec<Conversation> {
    records.into_iter().map(Conversation::from_value).collect()
}

/// Messages of a message-list response, or `None` when `data` is not a list.
///
/// An empty list is a valid (empty) result.
#[must_use]
pub fn parse_messages(response: ApiResponse) -> Option<Vec<Message>> {
    match response.data {
        Some(Value::Array(items)) => Some(items.into_iter().map(Message::from_value).collect()),
        _ => None,
    }
}

/// Parse a previously saved conversation list (the JSON produced by `--output`).
///
/// # Errors
/// Returns error if the text is not a JSON array.
pub fn parse_conversations_json(content: &str) -> Result<Vec<Conversation>> {
    let value: Value = serde_json::from_str(content).map_err(AppError::json_parse)?;

    match value {
        Value::Array(items) => Ok(parse_conversations(items)),
        _ => Err(AppError::InvalidData {
            message: "Expected a JSON array of conversations".into(),
        }),
    }
}

/// Normalize a date filter argument to RFC 3339.
///
/// Accepts full RFC 3339 timestamps or `YYYY-MM-DD`; bare dates cover the whole
/// day in UTC.
///
/// # Errors
/// Returns error if the input matches neither form.
pub fn parse_date_bound(input: &str, bound: DateBound) -> Result<String> {
    let input = input.trim();

    if let Ok(dt) = DateTime::parse_from_rfc3339(input) {
        return Ok(dt.to_rfc3339());
    }

    let date = NaiveDate::parse_from_str(input, "%Y-%m-%d").map_err(|_| AppError::Config {
        message: format!("Invalid date: {input}. Use YYYY-MM-DD or an RFC 3339 timestamp"),
    })?;

    let time = match bound {
        DateBound::Start => "00:00:00",
        DateBound::End => "23:59:59",
    };
    Ok(format!("{}T{time}Z", date.format("%Y-%m-%d")))
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn test_page_records_end_of_data() {
        assert!(page_records(ApiResponse::default()).is_none());
        assert!(page_records(ApiResponse::with_data(json!([]))).is_none());
        assert!(page_records(ApiResponse::with_data(json!({ "session_id": "a" }))).is_none());
        assert!(page_records(ApiResponse::with_data(json!("text"))).is_none());
    }

    #[test]
    fn test_page_records_non_empty() {
        let records = page_records(ApiResponse::with_data(json!([{ "session_id": "a" }])));
        assert_eq!(records.map(|r| r.len()), Some(1));
    }

    #[test]
    fn test_parse_messages_empty_list_is_valid() {
        assert_eq!(
            parse_messages(ApiResponse::with_data(json!([]))),
            Some(Vec::new())
        );
        assert_eq!(parse_messages(ApiResponse::default()), None);
        assert_eq!(parse_messages(ApiResponse::with_data(json!({}))), None);
    }

    #[test]
    fn test_parse_conversations_json() {
        let convs =
            parse_conversations_json(r#"[{"session_id":"a"},{"session_id":"b","state":"x"}]"#)
                .unwrap();
        let ids: Vec<&str> = convs.iter().map(|c| c.session_id.as_str()).collect();
        assert_eq!(ids, vec!["a", "b"]);

        assert!(parse_conversations_json(r#"{"session_id":"a"}"#).is_err());
        assert!(parse_conversations_json("not json").is_err());
    }

    #[test]
    fn test_parse_date_bound() {
        assert_eq!(
            parse_date_bound("2024-03-01", DateBound::Start).unwrap(),
            "2024-03-01T00:00:00Z"
        );
        assert_eq!(
            parse_date_bound("2024-03-01", DateBound::End).unwrap(),
            "2024-03-01T23:59:59Z"
        );
        assert_eq!(
            parse_date_bound("2024-03-01T10:00:00+02:00", DateBound::Start).unwrap(),
            "2024-03-01T10:00:00+02:00"
        );
        assert!(parse_date_bound("03/01/2024", DateBound::Start).is_err());
    }
}
