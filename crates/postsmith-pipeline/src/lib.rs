// SPDX-FileCopyrightText: 2026 Blufio Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! The generate-and-publish pipeline.
//!
//! - [`RateGate`]: process-wide fixed-window admission counter
//! - [`TextGenerator`]: completion call with a length limit and fallback text
//! - [`ImageGenerator`]: image call derived from the post text
//! - [`Publisher`]: media upload, post creation, bounded 429 retry
//! - [`PublishWorkflow`]: the state machine sequencing the above

pub mod image;
pub mod publisher;
pub mod rate_gate;
pub mod recording;
pub mod text;
pub mod workflow;

pub use image::ImageGenerator;
pub use publisher::Publisher;
pub use rate_gate::RateGate;
pub use text::TextGenerator;
pub use workflow::{PublishOutcome, PublishWorkflow, WorkflowFailure, WorkflowStage};
