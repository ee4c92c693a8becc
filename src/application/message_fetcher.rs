//! Per-conversation message retrieval.

use crate::domain::{AppError, Conversation, ConversationMessageGroup, Credentials, Result};
use crate::infrastructure::ConversationSource;

use super::parser::parse_messages;
use super::progress::FetchProgress;

/// Fetches the messages of each conversation, one request at a time, in input order.
///
/// A response without a usable `data` list yields an empty group.
///
/// # Errors
/// Returns a usage error for an empty input, otherwise the first failed request;
/// groups collected before the failure are discarded.
pub async fn fetch_messages_for<S>(
    source: &S,
    conversations: &[Conversation],
    credentials: &Credentials,
    mut progress: impl FnMut(FetchProgress),
) -> Result<Vec<ConversationMessageGroup>>
where
    S: ConversationSource + ?Sized,
{
    if conversations.is_empty() {
        return Err(AppError::usage("Please load conversations first"));
    }

    let total = conversations.len();
    let mut groups = Vec::with_capacity(total);

    for (index, conversation) in conversations.iter().enumerate() {
        progress(FetchProgress::Messages {
            current: index + 1,
            total,
        });

        let session_id = conversation.session_id.as_str();
        let response = source.list_messages(credentials, session_id).await?;

        let messages = parse_messages(response).unwrap_or_else(|| {
            tracing::debug!(session_id, "No message list in response, using empty list");
            Vec::new()
        });

        groups.push(ConversationMessageGroup::new(
            conversation.session_id.clone(),
            messages,
        ));
    }

    tracing::info!(
        groups = groups.len(),
        messages = groups.iter().map(|g| g.messages.len()).sum::<usize>(),
        "Message fetch finished"
    );

    Ok(groups)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::application::test_support::{credentials, Reply, ScriptedSource};
    use serde_json::json;

    fn conversations(ids: &[&str]) -> Vec<Conversation> {
        ids.iter()
            .map(|id| Conversation::from_value(json!({ "session_id": id })))
            .collect()
    }

    #[tokio::test]
    async fn test_one_request_per_conversation_in_order() {
        let source = ScriptedSource::default()
            .with_messages("c1", Reply::Data(json!([{ "from": "user", "content": "x" }])))
            .with_messages("c3", Reply::Data(json!([{ "from": "operator" }, { "from": "user" }])));
        let convs = conversations(&["c1", "c2", "c3"]);

        let groups = fetch_messages_for(&source, &convs, &credentials(), |_| {})
            .await
            .unwrap();

        assert_eq!(source.message_calls(), vec!["c1", "c2", "c3"]);
        let shape: Vec<(&str, usize)> = groups
            .iter()
            .map(|g| (g.session_id.as_str(), g.messages.len()))
            .collect();
        assert_eq!(shape, vec![("c1", 1), ("c2", 0), ("c3", 2)]);
    }

    #[tokio::test]
    async fn test_unusable_data_becomes_empty_group() {
        let source = ScriptedSource::default()
            .with_messages("a", Reply::NoData)
            .with_messages("b", Reply::Data(json!({ "unexpected": true })));

        let groups = fetch_messages_for(&source, &conversations(&["a", "b"]), &credentials(), |_| {})
            .await
            .unwrap();

        assert_eq!(groups.len(), 2);
        assert!(groups.iter().all(|g| g.messages.is_empty()));
    }

    #[tokio::test]
    async fn test_failure_aborts_without_skipping() {
        let source = ScriptedSource::default().with_messages(
            "b",
            Reply::Fail {
                status: 403,
                reason: "not_allowed",
            },
        );

        let err = fetch_messages_for(
            &source,
            &conversations(&["a", "b", "c"]),
            &credentials(),
            |_| {},
        )
        .await
        .unwrap_err();

        assert!(err.is_fetch());
        assert_eq!(source.message_calls(), vec!["a", "b"]);
    }

    #[tokio::test]
    async fn test_empty_input_is_usage_error() {
        let source = ScriptedSource::default();

        let err = fetch_messages_for(&source, &[], &credentials(), |_| {})
            .await
            .unwrap_err();

        assert!(matches!(err, AppError::Usage { .. }));
        assert!(source.message_calls().is_empty());
    }

    #[tokio::test]
    async fn test_reports_progress_per_conversation() {
        let source = ScriptedSource::default();
        let mut events = Vec::new();

        fetch_messages_for(&source, &conversations(&["a", "b"]), &credentials(), |p| {
            events.push(p.to_string());
        })
        .await
        .unwrap();

        assert_eq!(
            events,
            vec!["Loading messages 1 of 2...", "Loading messages 2 of 2..."]
        );
    }
}
