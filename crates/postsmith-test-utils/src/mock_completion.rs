// SPDX-FileCopyrightText: 2026 Blufio Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! Mock completion adapter for deterministic testing.
//!
//! `MockCompletion` implements `CompletionAdapter` with pre-configured
//! replies, enabling fast, CI-runnable tests without external API calls.

use std::collections::VecDeque;
use std::sync::Arc;

use async_trait::async_trait;
use tokio::sync::Mutex;

use postsmith_core::traits::{CompletionAdapter, PluginAdapter};
use postsmith_core::types::{AdapterType, CompletionRequest, HealthStatus};
use postsmith_core::PostsmithError;

/// A mock completion API that returns pre-configured replies.
///
/// Replies are popped from a FIFO queue. When the queue is empty,
/// a default "mock response" text is returned.
#[derive(Clone, Default)]
pub struct MockCompletion {
    replies: Arc<Mutex<VecDeque<Result<String, PostsmithError>>>>,
    requests: Arc<Mutex<Vec<CompletionRequest>>>,
}

impl MockCompletion {
    /// Create a new mock with an empty reply queue.
    pub fn new() -> Self {
        Self::default()
    }

    /// Create a mock pre-loaded with the given successful replies.
    pub fn with_responses(responses: Vec<String>) -> Self {
        Self {
            replies: Arc::new(Mutex::new(responses.into_iter().map(Ok).collect())),
            requests: Arc::default(),
        }
    }

    /// Create a mock whose next call fails with the given error.
    pub fn failing(error: PostsmithError) -> Self {
        Self {
            replies: Arc::new(Mutex::new(VecDeque::from([Err(error)]))),
            requests: Arc::default(),
        }
    }

    /// Add a reply to the end of the queue.
    pub async fn push(&self, reply: Result<String, PostsmithError>) {
        self.replies.lock().await.push_back(reply);
    }

    /// Requests received so far, in order.
    pub async fn requests(&self) -> Vec<CompletionRequest> {
        self.requests.lock().await.clone()
    }

    /// Number of `complete` calls received.
    pub async fn call_count(&self) -> usize {
        self.requests.lock().await.len()
    }
}

#[async_trait]
impl PluginAdapter for MockCompletion {
    fn name(&self) -> &str {
        "mock-completion"
    }

    fn version(&self) -> semver::Version {
        semver::Version::new(0, 1, 0)
    }

    fn adapter_type(&self) -> AdapterType {
        AdapterType::Completion
    }

    async fn health_check(&self) -> Result<HealthStatus, PostsmithError> {
        Ok(HealthStatus::Healthy)
    }
}

#[async_trait]
impl CompletionAdapter for MockCompletion {
    async fn complete(&self, request: CompletionRequest) -> Result<String, PostsmithError> {
        self.requests.lock().await.push(request);
        self.replies
            .lock()
            .await
            .pop_front()
            .unwrap_or_else(|| Ok("mock response".to_string()))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn request() -> CompletionRequest {
        CompletionRequest {
            system: "sys".into(),
            user: "user".into(),
        }
    }

    #[tokio::test]
    async fn default_response_when_queue_empty() {
        let mock = MockCompletion::new();
        assert_eq!(mock.complete(request()).await.unwrap(), "mock response");
    }

    #[tokio::test]
    async fn queued_responses_returned_in_order() {
        let mock = MockCompletion::with_responses(vec!["first".into(), "second".into()]);
        assert_eq!(mock.complete(request()).await.unwrap(), "first");
        assert_eq!(mock.complete(request()).await.unwrap(), "second");
        assert_eq!(mock.call_count().await, 2);
    }

    #[tokio::test]
    async fn failing_mock_errors_once() {
        let mock = MockCompletion::failing(PostsmithError::generation("boom"));
        assert!(mock.complete(request()).await.is_err());
        assert!(mock.complete(request()).await.is_ok());
    }
}
