// SPDX-FileCopyrightText: 2026 Blufio Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! Completion adapter trait for language-model text generation.

use async_trait::async_trait;

use crate::error::PostsmithError;
use crate::traits::adapter::PluginAdapter;
use crate::types::CompletionRequest;

/// Adapter for a chat completion API.
#[async_trait]
pub trait CompletionAdapter: PluginAdapter {
    /// Sends one completion request and returns the raw (untrimmed) text.
    async fn complete(&self, request: CompletionRequest) -> Result<String, PostsmithError>;
}
