//! Scripted `ConversationSource` for pipeline tests.

use std::collections::HashMap;
use std::sync::Mutex;

use async_trait::async_trait;
use serde_json::{json, Value};

use crate::domain::{ApiResponse, AppError, Credentials, DateFilter, Result};
use crate::infrastructure::ConversationSource;

/// Canned reply for one request.
#[derive(Debug, Clone)]
pub enum Reply {
    Data(Value),
    NoData,
    Fail { status: u16, reason: &'static str },
}

impl Reply {
    fn into_result(self) -> Result<ApiResponse> {
        match self {
            Self::Data(data) => Ok(ApiResponse::with_data(data)),
            Self::NoData => Ok(ApiResponse::default()),
            Self::Fail { status, reason } => {
                Err(AppError::upstream(status, Some(reason.to_string()), None))
            }
        }
    }
}

/// Replays conversation pages in order and per-session message replies,
/// recording every request.
#[derive(Default)]
pub struct ScriptedSource {
    pages: Vec<Reply>,
    messages: HashMap<String, Reply>,
    pub page_calls: Mutex<Vec<u32>>,
    pub message_calls: Mutex<Vec<String>>,
}

impl ScriptedSource {
    pub fn with_pages(pages: Vec<Reply>) -> Self {
        Self {
            pages,
            ..Self::default()
        }
    }

    pub fn with_messages(mut self, session_id: &str, reply: Reply) -> Self {
        self.messages.insert(session_id.to_string(), reply);
        self
    }

    pub fn page_calls(&self) -> Vec<u32> {
        self.page_calls.lock().unwrap().clone()
    }

    pub fn message_calls(&self) -> Vec<String> {
        self.message_calls.lock().unwrap().clone()
    }
}

#[async_trait]
impl ConversationSource for ScriptedSource {
    async fn list_conversations(
        &self,
        _credentials: &Credentials,
        page: u32,
        _filter: &DateFilter,
    ) -> Result<ApiResponse> {
        self.page_calls.lock().unwrap().push(page);
        let index = usize::try_from(page - 1).unwrap();
        self.pages
            .get(index)
            .cloned()
            .unwrap_or(Reply::NoData)
            .into_result()
    }

    async fn list_messages(
        &self,
        _credentials: &Credentials,
        session_id: &str,
    ) -> Result<ApiResponse> {
        self.message_calls
            .lock()
            .unwrap()
            .push(session_id.to_string());
        self.messages
            .get(session_id)
            .cloned()
            .unwrap_or_else(|| Reply::Data(json!([])))
            .into_result()
    }
}

pub fn credentials() -> Credentials {
    Credentials::new(Some("id"), Some("key"), Some("site")).unwrap()
}

/// A page of conversations with the given session ids.
pub fn conversation_page(ids: &[&str]) -> Reply {
    Reply::Data(Value::Array(
        ids.iter().map(|id| json!({ "session_id": id })).collect(),
    ))
}
