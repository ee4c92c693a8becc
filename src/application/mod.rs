//! Application layer - use cases and orchestration.
//!
//! The export pipeline runs strictly in sequence: aggregate conversation pages,
//! fetch each conversation's messages, flatten to rows, export.

pub mod aggregator;
pub mod exporter;
pub mod flattener;
pub mod formatter;
pub mod message_fetcher;
pub mod parser;
pub mod progress;

#[cfg(test)]
mod test_support;

pub use aggregator::fetch_all_conversations;
pub use exporter::{export_to_spreadsheet, to_clipboard_text, SHEET_NAME};
pub use flattener::flatten;
pub use formatter::{format_conversations_table, format_groups_table, format_stats, OutputFormat};
pub use message_fetcher::fetch_messages_for;
pub use parser::{parse_conversations_json, parse_date_bound, DateBound};
pub use progress::FetchProgress;
