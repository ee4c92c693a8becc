//! Conversation aggregation across pages.
//!
//! Pages are requested one at a time, starting at 1, until a page comes back
//! empty or without a usable `data` list. Page size never implies continuation:
//! a full page is always followed by a request for the next one.

use crate::domain::{Conversation, Credentials, DateFilter, Result};
use crate::infrastructure::ConversationSource;

use super::parser::{page_records, parse_conversations};
use super::progress::FetchProgress;

/// Fetches every conversation page and concatenates the records in order.
///
/// # Errors
/// Returns the first failed page request; nothing accumulated so far is returned.
pub async fn fetch_all_conversations<S>(
    source: &S,
    credentials: &Credentials,
    filter: &DateFilter,
    mut progress: impl FnMut(FetchProgress),
) -> Result<Vec<Conversation>>
where
    S: ConversationSource + ?Sized,
{
    let mut conversations = Vec::new();
    let mut page: u32 = 1;

    loop {
        progress(FetchProgress::ConversationPage { page });

        let response = source.list_conversations(credentials, page, filter).await?;

        let Some(records) = page_records(response) else {
            tracing::debug!(page, "No more data or invalid format");
            break;
        };

        tracing::debug!(page, records = records.len(), "Fetched conversation page");
        conversations.extend(parse_conversations(records));
        page += 1;
    }

    tracing::info!(
        pages = page,
        conversations = conversations.len(),
        "Conversation aggregation finished"
    );

    Ok(conversations)
}
