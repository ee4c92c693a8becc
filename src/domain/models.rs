//! Domain models for Crisp conversation data.
//!
//! Records keep the few fields the exporter interprets as typed fields next to
//! the raw JSON the API returned, so serializing a record reproduces what the
//! API sent.

use serde::{Deserialize, Deserializer, Serialize, Serializer};
use serde_json::Value;

/// Column labels of the spreadsheet header, in column order.
pub const EXPORT_HEADER: [&str; 4] = ["session_id", "sender", "text", "timestamp"];

/// Response envelope shared by the conversation and message endpoints.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct ApiResponse {
    /// Payload; a list for well-formed responses.
    pub data: Option<Value>,
}

impl ApiResponse {
    /// Takes the `data` member of a decoded body; non-object bodies carry no data.
    #[must_use]
    pub fn from_body(body: Value) -> Self {
        let data = match body {
            Value::Object(mut map) => map.remove("data").filter(|v| !v.is_null()),
            _ => None,
        };
        Self { data }
    }

    /// Envelope around a list payload.
    #[must_use]
    pub fn with_data(data: Value) -> Self {
        Self { data: Some(data) }
    }
}

/// Optional date window forwarded to the conversation listing.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct DateFilter {
    /// RFC 3339 lower bound.
    pub start: Option<String>,
    /// RFC 3339 upper bound.
    pub end: Option<String>,
}

impl DateFilter {
    /// Query parameters for the bounds that are set.
    #[must_use]
    pub fn query_pairs(&self) -> Vec<(&'static str, &str)> {
        let mut pairs = Vec::new();
        if let Some(start) = &self.start {
            pairs.push(("filter_date_start", start.as_str()));
        }
        if let Some(end) = &self.end {
            pairs.push(("filter_date_end", end.as_str()));
        }
        pairs
    }
}

/// One chat session record.
///
/// Only `session_id` is interpreted; the record is kept as the API sent it and
/// serializes back to exactly that value.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct Conversation {
    /// Session identifier, empty when the record has none.
    pub session_id: String,
    raw: Value,
}

impl Conversation {
    /// Builds a conversation from a raw list element.
    ///
    /// Elements that are not objects yield a record with an empty `session_id`.
    #[must_use]
    pub fn from_value(value: Value) -> Self {
        let session_id = match value.get("session_id") {
            Some(Value::String(s)) => s.clone(),
            Some(Value::Number(n)) => n.to_string(),
            _ => {
                tracing::debug!("Conversation record without a usable session_id");
                String::new()
            }
        };
        Self {
            session_id,
            raw: value,
        }
    }

    /// The record exactly as received.
    #[must_use]
    pub const fn raw(&self) -> &Value {
        &self.raw
    }

    /// Reads a string field from the `meta` object (nickname, email, ...).
    #[must_use]
    pub fn meta_str(&self, key: &str) -> Option<&str> {
        self.raw.get("meta")?.get(key)?.as_str()
    }

    /// Conversation state (`pending`, `unresolved`, `resolved`).
    #[must_use]
    pub fn state(&self) -> Option<&str> {
        self.raw.get("state")?.as_str()
    }

    /// Last update time in milliseconds since the epoch.
    #[must_use]
    pub fn updated_at(&self) -> Option<i64> {
        self.raw.get("updated_at").and_then(value_as_millis)
    }

    /// Preview of the last message.
    #[must_use]
    pub fn last_message(&self) -> Option<&str> {
        self.raw.get("last_message")?.as_str()
    }
}

impl Serialize for Conversation {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        self.raw.serialize(serializer)
    }
}

impl<'de> Deserialize<'de> for Conversation {
    fn deserialize<D: Deserializer<'de>>(deserializer: D) -> Result<Self, D::Error> {
        Value::deserialize(deserializer).map(Self::from_value)
    }
}

/// One chat turn inside a conversation.
///
/// Typed fields are read leniently from the raw record, which is what gets
/// serialized.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct Message {
    /// Sender label (`user` or `operator`).
    pub from: Value,
    /// Body; a string for text messages, an object for files and media.
    pub content: Value,
    /// Milliseconds since the Unix epoch; integer, float or numeric string.
    pub timestamp: Option<i64>,
    raw: Value,
}

impl Message {
    /// Builds a message from a raw list element, never failing.
    #[must_use]
    pub fn from_value(value: Value) -> Self {
        let field = |name: &str| value.get(name).cloned().unwrap_or(Value::Null);
        Self {
            from: field("from"),
            content: field("content"),
            timestamp: value.get("timestamp").and_then(value_as_millis),
            raw: value,
        }
    }

    /// The record exactly as received.
    #[must_use]
    pub const fn raw(&self) -> &Value {
        &self.raw
    }

    /// Sender as cell text.
    #[must_use]
    pub fn sender_text(&self) -> String {
        cell_text(&self.from)
    }

    /// Content as cell text.
    #[must_use]
    pub fn content_text(&self) -> String {
        cell_text(&self.content)
    }
}

impl Serialize for Message {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        self.raw.serialize(serializer)
    }
}

impl<'de> Deserialize<'de> for Message {
    fn deserialize<D: Deserializer<'de>>(deserializer: D) -> Result<Self, D::Error> {
        Value::deserialize(deserializer).map(Self::from_value)
    }
}

/// A conversation identifier paired with its fetched messages.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ConversationMessageGroup {
    pub session_id: String,
    pub messages: Vec<Message>,
}

impl ConversationMessageGroup {
    #[must_use]
    pub const fn new(session_id: String, messages: Vec<Message>) -> Self {
        Self {
            session_id,
            messages,
        }
    }
}

/// One flattened, export-ready record for exactly one message.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct ExportRow {
    pub session_id: String,
    pub sender: String,
    pub text: String,
    #[serde(rename = "timestamp")]
    pub formatted_timestamp: String,
}

impl ExportRow {
    /// Cell values in `EXPORT_HEADER` order.
    #[must_use]
    pub fn cells(&self) -> [&str; 4] {
        [
            self.session_id.as_str(),
            self.sender.as_str(),
            self.text.as_str(),
            self.formatted_timestamp.as_str(),
        ]
    }
}

/// Summary counts for a fetch/export run.
#[derive(Debug, Clone, Default, Serialize)]
pub struct ExportStats {
    /// Conversations aggregated.
    pub conversation_count: usize,
    /// Conversations that returned no messages.
    pub empty_conversations: usize,
    /// Messages across all groups (equals the row count).
    pub message_count: usize,
}

impl ExportStats {
    /// Computes counts from fetched groups.
    #[must_use]
    pub fn from_groups(groups: &[ConversationMessageGroup]) -> Self {
        Self {
            conversation_count: groups.len(),
            empty_conversations: groups.iter().filter(|g| g.messages.is_empty()).count(),
            message_count: groups.iter().map(|g| g.messages.len()).sum(),
        }
    }
}

/// Renders a raw JSON value as spreadsheet cell text.
fn cell_text(value: &Value) -> String {
    match value {
        Value::Null => String::new(),
        Value::String(s) => s.clone(),
        other => other.to_string(),
    }
}

#[allow(clippy::cast_possible_truncation)]
fn value_as_millis(value: &Value) -> Option<i64> {
    match value {
        Value::Number(n) => n.as_i64().or_else(|| n.as_f64().map(|f| f as i64)),
        Value::String(s) => s.trim().parse().ok(),
        _ => None,
    }
}
