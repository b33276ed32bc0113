// SPDX-FileCopyrightText: 2026 Blufio Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! Post text generation with a hard length limit and a fixed fallback.

use std::sync::Arc;

use postsmith_core::traits::CompletionAdapter;
use postsmith_core::types::{CompletionRequest, MAX_POST_CHARS, char_len};
use tracing::{debug, error};

use crate::recording;

/// System prompt sent with every completion request.
pub const SYSTEM_PROMPT: &str = "You are a tweet generator. Your responses MUST be 280 characters or less. Never exceed this limit. Do not include quotes or formatting - just the tweet text.";

/// Text used when the completion call fails.
pub const FALLBACK_TEXT: &str = "This is AI Agent";

/// User prompt for an instruction.
pub fn user_prompt(instruction: &str) -> String {
    format!("Write a tweet about: {instruction}. Remember: must be 280 characters or less.")
}

/// Trim, cut to [`MAX_POST_CHARS`] characters, and trim again.
pub fn normalize(raw: &str) -> String {
    let trimmed = raw.trim();
    if char_len(trimmed) <= MAX_POST_CHARS {
        return trimmed.to_string();
    }
    trimmed
        .chars()
        .take(MAX_POST_CHARS)
        .collect::<String>()
        .trim()
        .to_string()
}

/// Generates post text from an instruction. Never fails.
#[derive(Clone)]
pub struct TextGenerator {
    completion: Arc<dyn CompletionAdapter>,
}

impl TextGenerator {
    pub fn new(completion: Arc<dyn CompletionAdapter>) -> Self {
        Self { completion }
    }

    /// One completion call; any failure yields [`FALLBACK_TEXT`].
    pub async fn generate(&self, instruction: &str) -> String {
        let request = CompletionRequest {
            system: SYSTEM_PROMPT.to_string(),
            user: user_prompt(instruction),
        };

        match self.completion.complete(request).await {
            Ok(raw) => {
                let text = normalize(&raw);
                debug!(chars = char_len(&text), "post text generated");
                text
            }
            Err(e) => {
                error!(error = %e, adapter = self.completion.name(), "error generating post text");
                recording::record_fallback();
                FALLBACK_TEXT.to_string()
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use postsmith_core::PostsmithError;
    use postsmith_test_utils::MockCompletion;

    #[test]
    fn normalize_trims_whitespace() {
        assert_eq!(normalize("  hello world \n"), "hello world");
    }

    #[test]
    fn normalize_truncates_to_exact_limit() {
        let long = "a".repeat(300);
        let text = normalize(&long);
        assert_eq!(char_len(&text), MAX_POST_CHARS);
        // Idempotent.
        assert_eq!(normalize(&text), text);
    }

    #[test]
    fn normalize_counts_characters_not_bytes() {
        let emoji = "🚀".repeat(281);
        assert_eq!(char_len(&normalize(&emoji)), 280);
    }

    #[test]
    fn normalize_trims_after_truncation() {
        let text = format!("{} tail", "b".repeat(279));
        // Char 280 is the space; it is cut off by the second trim.
        assert_eq!(normalize(&text), "b".repeat(279));
    }

    #[tokio::test]
    async fn generate_uses_fixed_prompts() {
        let mock = MockCompletion::with_responses(vec!["We launched! 🚀".into()]);
        let generator = TextGenerator::new(Arc::new(mock.clone()));

        let text = generator.generate("launch day").await;
        assert_eq!(text, "We launched! 🚀");

        let requests = mock.requests().await;
        assert_eq!(requests.len(), 1);
        assert_eq!(requests[0].system, SYSTEM_PROMPT);
        assert_eq!(
            requests[0].user,
            "Write a tweet about: launch day. Remember: must be 280 characters or less."
        );
    }

    #[tokio::test]
    async fn failure_returns_fallback() {
        let mock = MockCompletion::failing(PostsmithError::generation("HTTP 500"));
        let generator = TextGenerator::new(Arc::new(mock.clone()));

        assert_eq!(generator.generate("anything").await, FALLBACK_TEXT);
        assert_eq!(mock.call_count().await, 1);
    }

    #[tokio::test]
    async fn empty_completion_is_not_replaced() {
        let mock = MockCompletion::with_responses(vec!["   ".into()]);
        let generator = TextGenerator::new(Arc::new(mock));
        assert_eq!(generator.generate("x").await, "");
    }
}
