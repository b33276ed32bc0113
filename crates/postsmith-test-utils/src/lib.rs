// SPDX-FileCopyrightText: 2026 Blufio Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! Test utilities for postsmith.
//!
//! Provides mock adapters for fast, deterministic, CI-runnable tests without
//! external services.
//!
//! # Components
//!
//! - [`MockCompletion`] - Mock completion API with pre-configured replies
//! - [`MockImage`] - Mock image API with scripted failures
//! - [`MockSocial`] - Mock social platform recording posts and uploads

pub mod mock_completion;
pub mod mock_image;
pub mod mock_social;

pub use mock_completion::MockCompletion;
pub use mock_image::{MOCK_IMAGE_URL, MockImage};
pub use mock_social::{MockSocial, RecordedPost, rate_limited, upstream_error};
