// SPDX-FileCopyrightText: 2026 Blufio Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! Core library for postsmith.
//!
//! This crate provides the adapter trait definitions, the workspace error type,
//! and the domain types that flow through the publish pipeline. Every
//! collaborator client implements traits defined here.

pub mod error;
pub mod traits;
pub mod types;

// Re-export key items at crate root for ergonomic imports.
pub use error::{PostsmithError, UpstreamError};
pub use types::{
    AccountIdentity, AccountProfile, AdapterType, CompletionRequest, GeneratedImage,
    GeneratedPost, HealthStatus, ImageRequest, MediaHandle, MediaPayload, PostId,
    PublishRequest, PublishResult, MAX_IMAGE_BYTES, MAX_POST_CHARS, MIN_POST_CHARS,
};

pub use traits::{CompletionAdapter, ImageAdapter, PluginAdapter, SocialAdapter};
