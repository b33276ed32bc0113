// SPDX-FileCopyrightText: 2026 Blufio Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! Linear publish workflow: Idle -> Generating -> ImagePending -> Publishing -> Done.
//!
//! Any step may move the run to Failed. The failure records the stage it
//! happened in so callers can map it to a response; image generation
//! failures are distinguishable from posting failures that way.

use std::time::Instant;

use postsmith_core::PostsmithError;
use postsmith_core::types::{GeneratedImage, MIN_POST_CHARS, PublishRequest, PublishResult, char_len};
use thiserror::Error;
use tracing::{debug, info};

use crate::image::ImageGenerator;
use crate::publisher::Publisher;
use crate::recording;
use crate::text::TextGenerator;

/// Message returned when generated text is below the minimum length.
pub const TOO_SHORT_MESSAGE: &str = "Generated tweet is too short or empty.";

/// Message returned when the request carries no usable instruction.
pub const MISSING_INSTRUCTION_MESSAGE: &str = "Missing instruction in request body";

/// States in the publish workflow.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum WorkflowStage {
    /// Request accepted, nothing done yet.
    Idle,
    /// Calling the completion API.
    Generating,
    /// Calling the image API (image requests only).
    ImagePending,
    /// Uploading media and creating the post.
    Publishing,
    /// Post created.
    Done,
    /// A step failed; see [`WorkflowFailure::stage`].
    Failed,
}

impl std::fmt::Display for WorkflowStage {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            WorkflowStage::Idle => write!(f, "idle"),
            WorkflowStage::Generating => write!(f, "generating"),
            WorkflowStage::ImagePending => write!(f, "image_pending"),
            WorkflowStage::Publishing => write!(f, "publishing"),
            WorkflowStage::Done => write!(f, "done"),
            WorkflowStage::Failed => write!(f, "failed"),
        }
    }
}

/// A failed run: the stage that failed and why.
#[derive(Debug, Error)]
#[error("{stage} failed: {error}")]
pub struct WorkflowFailure {
    pub stage: WorkflowStage,
    #[source]
    pub error: PostsmithError,
}

/// A successful run.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PublishOutcome {
    /// The exact text that was posted.
    pub text: String,
    pub result: PublishResult,
    pub image_attached: bool,
}

/// Sequences text generation, optional image generation, and publishing.
#[derive(Clone)]
pub struct PublishWorkflow {
    text: TextGenerator,
    image: ImageGenerator,
    publisher: Publisher,
}

impl PublishWorkflow {
    pub fn new(text: TextGenerator, image: ImageGenerator, publisher: Publisher) -> Self {
        Self {
            text,
            image,
            publisher,
        }
    }

    /// Run one request to completion, recording outcome and duration.
    pub async fn run(&self, request: PublishRequest) -> Result<PublishOutcome, WorkflowFailure> {
        let started = Instant::now();
        let outcome = self.drive(request).await;
        recording::record_duration(started.elapsed().as_secs_f64());

        match &outcome {
            Ok(done) => {
                recording::record_publish("success");
                info!(post_id = %done.result.id, image = done.image_attached, "publish workflow done");
            }
            Err(failure) => {
                recording::record_publish(failure.error.kind());
                info!(stage = %failure.stage, kind = failure.error.kind(), "publish workflow failed");
            }
        }
        outcome
    }

    async fn drive(&self, request: PublishRequest) -> Result<PublishOutcome, WorkflowFailure> {
        let mut stage = WorkflowStage::Idle;
        let instruction = request.instruction.trim();
        if instruction.is_empty() {
            return Err(fail(
                stage,
                PostsmithError::Validation(MISSING_INSTRUCTION_MESSAGE.to_string()),
            ));
        }

        stage = advance(stage, WorkflowStage::Generating);
        let text = self.text.generate(instruction).await;
        if char_len(&text) < MIN_POST_CHARS {
            return Err(fail(
                stage,
                PostsmithError::Validation(TOO_SHORT_MESSAGE.to_string()),
            ));
        }

        let mut image: Option<GeneratedImage> = None;
        if request.include_image {
            stage = advance(stage, WorkflowStage::ImagePending);
            image = Some(self.image.generate(&text).await.map_err(|e| fail(stage, e))?);
        }

        stage = advance(stage, WorkflowStage::Publishing);
        let result = self
            .publisher
            .publish(&text, image.as_ref())
            .await
            .map_err(|e| fail(stage, e))?;

        advance(stage, WorkflowStage::Done);
        Ok(PublishOutcome {
            text,
            result,
            image_attached: image.is_some(),
        })
    }
}

fn advance(from: WorkflowStage, to: WorkflowStage) -> WorkflowStage {
    debug!(from = %from, to = %to, "workflow transition");
    to
}

fn fail(stage: WorkflowStage, error: PostsmithError) -> WorkflowFailure {
    debug!(from = %stage, to = %WorkflowStage::Failed, error = %error, "workflow transition");
    WorkflowFailure { stage, error }
}
