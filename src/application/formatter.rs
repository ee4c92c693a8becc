//! Console formatting for fetched Crisp data.
//!
//! Supports a summary table view and raw JSON.

use colored::Colorize;
use comfy_table::{presets::UTF8_FULL, Table};

use crate::domain::{Conversation, ConversationMessageGroup, ExportStats};

use super::flattener::format_timestamp;

/// Output format options.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub enum OutputFormat {
    /// Compact table listing.
    #[default]
    Table,
    /// Pretty JSON, the same text `--copy` places on the clipboard.
    Json,
}

impl std::str::FromStr for OutputFormat {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_lowercase().as_str() {
            "table" => Ok(Self::Table),
            "json" => Ok(Self::Json),
            _ => Err(format!("Unknown format: {s}. Use: table, json")),
        }
    }
}

/// Formats a table listing of conversations.
pub fn format_conversations_table(conversations: &[Conversation]) -> String {
    let mut table = Table::new();
    table.load_preset(UTF8_FULL);
    table.set_header(vec!["#", "Session", "State", "Visitor", "Updated", "Last message"]);

    for (index, conv) in conversations.iter().enumerate() {
        let visitor = conv
            .meta_str("nickname")
            .or_else(|| conv.meta_str("email"))
            .unwrap_or("-");
        let updated = conv
            .updated_at()
            .and_then(format_timestamp)
            .unwrap_or_else(|| "-".to_string());

        table.add_row(vec![
            (index + 1).to_string(),
            conv.session_id.clone(),
            conv.state().unwrap_or("-").to_string(),
            truncate(visitor, 24),
            updated,
            truncate(conv.last_message().unwrap_or("-"), 40),
        ]);
    }

    table.to_string()
}

/// Formats a table of message groups (one line per conversation).
pub fn format_groups_table(groups: &[ConversationMessageGroup]) -> String {
    let mut table = Table::new();
    table.load_preset(UTF8_FULL);
    table.set_header(vec!["#", "Session", "Messages", "First", "Last"]);

    for (index, group) in groups.iter().enumerate() {
        let stamp = |millis: Option<i64>| {
            millis
                .and_then(format_timestamp)
                .unwrap_or_else(|| "-".to_string())
        };
        let first = stamp(group.messages.first().and_then(|m| m.timestamp));
        let last = stamp(group.messages.last().and_then(|m| m.timestamp));

        table.add_row(vec![
            (index + 1).to_string(),
            group.session_id.clone(),
            group.messages.len().to_string(),
            first,
            last,
        ]);
    }

    table.to_string()
}

/// Formats run statistics for display.
pub fn format_stats(stats: &ExportStats) -> String {
    format!(
        "{}\n  Conversations: {}\n  Without messages: {}\n  Messages: {}",
        "📊 Statistics".bold(),
        stats.conversation_count.to_string().cyan(),
        stats.empty_conversations.to_string().yellow(),
        stats.message_count.to_string().green(),
    )
}

/// Truncates to `max_len` characters (first line only) with an ellipsis.
fn truncate(s: &str, max_len: usize) -> String {
    let s = s.lines().next().unwrap_or(s);
    if s.chars().count() <= max_len {
        s.to_string()
    } else {
        let cut: String = s.chars().take(max_len.saturating_sub(3)).collect();
        format!("{cut}...")
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::Message;
    use serde_json::json;

    #[test]
    fn test_truncate() {
        assert_eq!(truncate("hello", 10), "hello");
        assert_eq!(truncate("hello world!", 8), "hello...");
        assert_eq!(truncate("héllo wörld", 8), "héllo...");
        assert_eq!(truncate("first\nsecond", 20), "first");
    }

    #[test]
    fn test_output_format_from_str() {
        assert_eq!("table".parse::<OutputFormat>(), Ok(OutputFormat::Table));
        assert_eq!("JSON".parse::<OutputFormat>(), Ok(OutputFormat::Json));
        assert!("markdown".parse::<OutputFormat>().is_err());
    }

    #[test]
    fn test_conversations_table_contents() {
        let convs = vec![Conversation::from_value(json!({
            "session_id": "session_1",
            "state": "resolved",
            "meta": { "email": "jane@example.com" },
            "last_message": "Thanks!"
        }))];

        let table = format_conversations_table(&convs);

        assert!(table.contains("session_1"));
        assert!(table.contains("resolved"));
        assert!(table.contains("jane@example.com"));
        assert!(table.contains("Thanks!"));
    }

    #[test]
    fn test_groups_table_counts() {
        let groups = vec![ConversationMessageGroup::new(
            "session_1".into(),
            vec![
                Message::from_value(json!({ "from": "user" })),
                Message::from_value(json!({ "from": "operator" })),
            ],
        )];

        let table = format_groups_table(&groups);

        assert!(table.contains("session_1"));
        assert!(table.contains('2'));
    }
}
