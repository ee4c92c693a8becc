//! System clipboard access.

use anyhow::{Context, Result};
use arboard::Clipboard;

use crate::domain::AppError;

/// Maximum clipboard payload (10MB).
const MAX_CLIPBOARD_SIZE: usize = 10 * 1024 * 1024;

/// Clipboard operations, so copying can be exercised without a display server.
trait ClipboardProvider {
    fn set_text(&mut self, text: &str) -> Result<()>;
}

struct SystemClipboard {
    clipboard: Clipboard,
}

impl SystemClipboard {
    fn new() -> Result<Self> {
        let clipboard = Clipboard::new().context("Failed to initialize clipboard")?;
        Ok(Self { clipboard })
    }
}

impl ClipboardProvider for SystemClipboard {
    fn set_text(&mut self, text: &str) -> Result<()> {
        self.clipboard
            .set_text(text)
            .context("Failed to set clipboard contents")?;
        Ok(())
    }
}

fn validate_clipboard_text(text: &str) -> Result<()> {
    if text.is_empty() {
        anyhow::bail!("Cannot copy empty text to clipboard");
    }

    if text.len() > MAX_CLIPBOARD_SIZE {
        anyhow::bail!(
            "Text too large for clipboard ({} bytes, max {}); use --output instead",
            text.len(),
            MAX_CLIPBOARD_SIZE
        );
    }

    Ok(())
}

fn copy_with_provider(text: &str, provider: &mut dyn ClipboardProvider) -> Result<()> {
    validate_clipboard_text(text)?;
    provider.set_text(text)
}

/// Copy text to the system clipboard.
///
/// On X11 and Wayland the process owns the selection, so without a clipboard
/// manager the text is gone once the command exits.
///
/// # Errors
/// Returns error if the text is empty or too large, or the clipboard is unavailable
/// (for example in a headless session).
pub fn copy_to_clipboard(text: &str) -> crate::domain::Result<()> {
    validate_clipboard_text(text).map_err(|e| AppError::clipboard(&e))?;

    let mut clipboard = SystemClipboard::new().map_err(|e| AppError::clipboard(&e))?;
    copy_with_provider(text, &mut clipboard).map_err(|e| AppError::clipboard(&e))?;

    tracing::debug!(bytes = text.len(), "Copied to clipboard");
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    struct MockClipboard {
        text: Option<String>,
        should_fail: bool,
    }

    impl MockClipboard {
        const fn new() -> Self {
            Self {
                text: None,
                should_fail: false,
            }
        }
    }

    impl ClipboardProvider for MockClipboard {
        fn set_text(&mut self, text: &str) -> Result<()> {
            if self.should_fail {
                anyhow::bail!("Mock clipboard error");
            }
            self.text = Some(text.to_string());
            Ok(())
        }
    }

    #[test]
    fn test_copy_json_with_mock() {
        let mut mock = MockClipboard::new();
        let text = "[\n  {\n    \"session_id\": \"a\"\n  }\n]";

        copy_with_provider(text, &mut mock).unwrap();
        assert_eq!(mock.text.as_deref(), Some(text));
    }

    #[test]
    fn test_provider_failure_propagates() {
        let mut mock = MockClipboard {
            text: None,
            should_fail: true,
        };

        let err = copy_with_provider("data", &mut mock).unwrap_err();
        assert!(err.to_string().contains("Mock clipboard error"));
    }

    #[test]
    fn test_empty_text_rejected_before_clipboard_access() {
        let err = copy_to_clipboard("").unwrap_err();
        assert!(matches!(err, AppError::Clipboard { .. }));
        assert!(err.to_string().contains("empty"));
    }

    #[test]
    fn test_oversized_text_rejected() {
        let mut mock = MockClipboard::new();
        let text = "a".repeat(MAX_CLIPBOARD_SIZE + 1);

        let err = copy_with_provider(&text, &mut mock).unwrap_err();
        assert!(err.to_string().contains("too large"));
        assert!(mock.text.is_none());
    }
}
