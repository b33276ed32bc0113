// SPDX-FileCopyrightText: 2026 Blufio Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! Domain types shared by adapters, the publish pipeline, and the gateway.

use serde::{Deserialize, Serialize};
use strum::{Display, EnumString};

/// Maximum length of a post, in characters.
pub const MAX_POST_CHARS: usize = 280;

/// Minimum length of generated post text accepted for publishing.
pub const MIN_POST_CHARS: usize = 5;

/// Largest image the platform accepts through simple media upload.
pub const MAX_IMAGE_BYTES: usize = 5 * 1024 * 1024;

/// Health status reported by adapter health checks.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum HealthStatus {
    /// Adapter is fully operational.
    Healthy,
    /// Adapter is operational but experiencing issues.
    Degraded(String),
    /// Adapter is not operational.
    Unhealthy(String),
}

/// Identifies the kind of external collaborator an adapter wraps.
#[derive(
    Debug, Clone, Copy, PartialEq, Eq, Hash, Display, EnumString, Serialize, Deserialize,
)]
pub enum AdapterType {
    Completion,
    Image,
    Social,
}

/// A caller's request to generate and publish a post.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PublishRequest {
    /// Free-text description of the desired post.
    pub instruction: String,
    /// Whether an accompanying image should be generated and attached.
    pub include_image: bool,
}

/// A single completion call: fixed system prompt plus user prompt.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CompletionRequest {
    pub system: String,
    pub user: String,
}

/// A single image generation call.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ImageRequest {
    pub prompt: String,
}

/// Generated post text, already trimmed and truncated.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct GeneratedPost {
    pub text: String,
}

/// Pointer into the image API's hosted storage. Downloaded once, then dropped.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct GeneratedImage {
    pub url: String,
}

/// Raw image bytes ready to be uploaded as media.
#[derive(Clone, PartialEq, Eq)]
pub struct MediaPayload {
    pub bytes: Vec<u8>,
    pub mime_type: String,
}

impl std::fmt::Debug for MediaPayload {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("MediaPayload")
            .field("bytes", &self.bytes.len())
            .field("mime_type", &self.mime_type)
            .finish()
    }
}

/// Opaque identifier returned by the platform after a media upload.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct MediaHandle(pub String);

/// The authenticated account, as returned by the "my account" lookup.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct AccountIdentity {
    pub id: String,
    pub username: String,
    pub name: String,
}

/// Public profile fields projected for display.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct AccountProfile {
    pub username: String,
    pub name: String,
    #[serde(default)]
    pub profile_image: Option<String>,
    #[serde(default)]
    pub description: Option<String>,
    #[serde(default)]
    pub followers: Option<u64>,
    #[serde(default)]
    pub following: Option<u64>,
    #[serde(default)]
    pub tweets: Option<u64>,
}

/// Identifier of a created post.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct PostId(pub String);

/// Outcome of a successful publish.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct PublishResult {
    pub id: String,
    pub url: String,
}

/// Counts characters the way the platform limit is expressed (Unicode scalar values).
pub fn char_len(text: &str) -> usize {
    text.chars().count()
}
