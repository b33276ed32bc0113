// SPDX-FileCopyrightText: 2026 Blufio Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! Adapter trait definitions for the external collaborators.
//!
//! All adapters extend the [`PluginAdapter`] base trait and use
//! `#[async_trait]` for dynamic dispatch compatibility.

pub mod adapter;
pub mod completion;
pub mod image;
pub mod social;

pub use adapter::PluginAdapter;
pub use completion::CompletionAdapter;
pub use image::ImageAdapter;
pub use social::SocialAdapter;
