// SPDX-FileCopyrightText: 2026 Blufio Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! Social adapter trait for the posting platform (identity, media, posts).

use async_trait::async_trait;

use crate::error::PostsmithError;
use crate::traits::adapter::PluginAdapter;
use crate::types::{AccountIdentity, AccountProfile, MediaHandle, MediaPayload, PostId};

/// Adapter for a social network's posting API.
///
/// Implementations report platform failures as [`PostsmithError::Upstream`]
/// so callers can inspect status codes and rate-limit headers.
#[async_trait]
pub trait SocialAdapter: PluginAdapter {
    /// Looks up the authenticated account.
    async fn me(&self) -> Result<AccountIdentity, PostsmithError>;

    /// Looks up the authenticated account's public profile and metrics.
    async fn profile(&self) -> Result<AccountProfile, PostsmithError>;

    /// Uploads binary media and returns the platform's media handle.
    async fn upload_media(&self, media: MediaPayload) -> Result<MediaHandle, PostsmithError>;

    /// Creates a post, optionally referencing uploaded media.
    async fn create_post(
        &self,
        text: &str,
        media: Option<&MediaHandle>,
    ) -> Result<PostId, PostsmithError>;
}
