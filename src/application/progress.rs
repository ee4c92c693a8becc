//! Progress events emitted between remote requests.

use std::fmt;

/// A step of a long-running fetch, reported before its request is issued.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum FetchProgress {
    /// About to request conversation page `page` (1-based).
    ConversationPage { page: u32 },
    /// About to request messages for conversation `current` of `total`.
    Messages { current: usize, total: usize },
}

impl fmt::Display for FetchProgress {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::ConversationPage { page } => {
                write!(f, "Loading conversations, page {page}...")
            }
            Self::Messages { current, total } => {
                write!(f, "Loading messages {current} of {total}...")
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_progress_text() {
        assert_eq!(
            FetchProgress::ConversationPage { page: 3 }.to_string(),
            "Loading conversations, page 3..."
        );
        assert_eq!(
            FetchProgress::Messages {
                current: 7,
                total: 40
            }
            .to_string(),
            "Loading messages 7 of 40..."
        );
    }
}
