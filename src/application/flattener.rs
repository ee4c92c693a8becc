//! Flattening of message groups into spreadsheet rows.
//!
//! Timestamps are rendered in the local time zone of the running process
//! (`chrono::Local`, which honours `TZ` on Unix), so the same export run in two
//! zones yields different timestamp cells. The `_in` variants take an explicit
//! zone.

use std::fmt::Display;

use chrono::{DateTime, Local, TimeZone};

use crate::domain::{ConversationMessageGroup, ExportRow};

/// `YYYY-MM-DD HH:MM:SS`, 24-hour, zero padded.
pub const TIMESTAMP_FORMAT: &str = "%Y-%m-%d %H:%M:%S";

/// One row per message, in group order then message order, local time zone.
#[must_use]
pub fn flatten(groups: &[ConversationMessageGroup]) -> Vec<ExportRow> {
    flatten_in(groups, &Local)
}

/// One row per message with timestamps rendered in `tz`.
#[must_use]
pub fn flatten_in<Tz>(groups: &[ConversationMessageGroup], tz: &Tz) -> Vec<ExportRow>
where
    Tz: TimeZone,
    Tz::Offset: Display,
{
    groups
        .iter()
        .flat_map(|group| {
            group.messages.iter().map(move |message| ExportRow {
                session_id: group.session_id.clone(),
                sender: message.sender_text(),
                text: message.content_text(),
                formatted_timestamp: message
                    .timestamp
                    .and_then(|ms| format_timestamp_in(ms, tz))
                    .unwrap_or_default(),
            })
        })
        .collect()
}

/// Formats epoch milliseconds in the local time zone.
///
/// Returns `None` if the value is outside chrono's representable range.
#[must_use]
pub fn format_timestamp(millis: i64) -> Option<String> {
    format_timestamp_in(millis, &Local)
}

/// Formats epoch milliseconds in `tz`.
#[must_use]
pub fn format_timestamp_in<Tz>(millis: i64, tz: &Tz) -> Option<String>
where
    Tz: TimeZone,
    Tz::Offset: Display,
{
    let utc = DateTime::from_timestamp_millis(millis)?;
    Some(utc.with_timezone(tz).format(TIMESTAMP_FORMAT).to_string())
}
