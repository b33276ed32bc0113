// SPDX-FileCopyrightText: 2026 Blufio Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! HTTP request handlers.
//!
//! Error payloads follow the established client contract: validation
//! failures are `400 {error}`, image generation failures are `500 {error}`,
//! and every other publish failure is `500 {code, message}`.

use axum::{
    Json,
    body::Bytes,
    extract::State,
    http::StatusCode,
    response::{IntoResponse, Response},
};
use postsmith_core::types::{HealthStatus, PublishRequest, PublishResult};
use postsmith_core::PostsmithError;
use postsmith_pipeline::{WorkflowFailure, WorkflowStage};
use serde::{Deserialize, Serialize};

use crate::server::GatewayState;

/// Returned when the body is not valid JSON.
pub const INVALID_JSON_MESSAGE: &str = "Invalid JSON in request body";

/// Returned when image generation fails.
pub const IMAGE_FAILED_MESSAGE: &str = "Failed to generate image. Please try again.";

/// Returned when the profile lookup fails.
pub const PROFILE_FAILED_MESSAGE: &str = "Failed to fetch Twitter account information";

/// Success message for image posts.
pub const IMAGE_POSTED_MESSAGE: &str = "Tweet posted successfully!";

/// Request body for both publish routes. Only `instruction` is read.
#[derive(Debug, Deserialize)]
pub struct InstructionBody {
    #[serde(default)]
    pub instruction: Option<serde_json::Value>,
}

/// Success body for the publish routes.
#[derive(Debug, Serialize, Deserialize)]
pub struct PublishResponse {
    pub message: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub tweet: Option<PublishResult>,
}

/// `{error}` payload.
#[derive(Debug, Serialize, Deserialize)]
pub struct ErrorResponse {
    pub error: String,
}

/// `{code, message}` payload.
#[derive(Debug, Serialize, Deserialize)]
pub struct CodedErrorResponse {
    pub code: u16,
    pub message: String,
}

/// Response body for GET /health.
#[derive(Debug, Serialize)]
pub struct HealthResponse {
    /// `ok` when every adapter is healthy, `degraded` otherwise.
    pub status: String,
    pub version: String,
    pub uptime_secs: u64,
    pub adapters: Vec<AdapterHealth>,
}

/// One adapter's health entry.
#[derive(Debug, Serialize)]
pub struct AdapterHealth {
    pub name: String,
    #[serde(rename = "type")]
    pub adapter_type: String,
    pub version: String,
    pub status: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub detail: Option<String>,
}

/// Read `instruction` from a raw body. Non-string or missing values read as empty.
fn parse_instruction(body: &[u8]) -> Result<String, Response> {
    let parsed: InstructionBody = serde_json::from_slice(body).map_err(|e| {
        tracing::warn!(error = %e, "error parsing request body");
        error_response(StatusCode::BAD_REQUEST, INVALID_JSON_MESSAGE)
    })?;
    Ok(match parsed.instruction {
        Some(serde_json::Value::String(s)) => s,
        _ => String::new(),
    })
}

fn error_response(status: StatusCode, message: &str) -> Response {
    (
        status,
        Json(ErrorResponse {
            error: message.to_string(),
        }),
    )
        .into_response()
}

fn coded_error_response(error: &PostsmithError) -> Response {
    let status = StatusCode::INTERNAL_SERVER_ERROR;
    (
        status,
        Json(CodedErrorResponse {
            code: status.as_u16(),
            message: error.to_string(),
        }),
    )
        .into_response()
}

fn failure_response(failure: &WorkflowFailure) -> Response {
    match (&failure.error, failure.stage) {
        (PostsmithError::Validation(message), _) => error_response(StatusCode::BAD_REQUEST, message),
        (_, WorkflowStage::ImagePending) => {
            error_response(StatusCode::INTERNAL_SERVER_ERROR, IMAGE_FAILED_MESSAGE)
        }
        (error, _) => coded_error_response(error),
    }
}

async fn run_publish(state: &GatewayState, body: &[u8], include_image: bool) -> Response {
    let instruction = match parse_instruction(body) {
        Ok(instruction) => instruction,
        Err(response) => return response,
    };

    let request = PublishRequest {
        instruction,
        include_image,
    };
    match state.workflow.run(request).await {
        Ok(outcome) if include_image => Json(PublishResponse {
            message: IMAGE_POSTED_MESSAGE.to_string(),
            tweet: Some(outcome.result),
        })
        .into_response(),
        Ok(outcome) => Json(PublishResponse {
            message: format!("Tweet posted with ID {}", outcome.result.id),
            tweet: None,
        })
        .into_response(),
        Err(failure) => {
            tracing::warn!(error = %failure, "publish request failed");
            failure_response(&failure)
        }
    }
}

/// POST /api/twitter/post
pub async fn post_text(State(state): State<GatewayState>, body: Bytes) -> Response {
    run_publish(&state, &body, false).await
}

/// POST /api/twitter/post-image
pub async fn post_image(State(state): State<GatewayState>, body: Bytes) -> Response {
    run_publish(&state, &body, true).await
}

/// GET /api/twitter/me
///
/// One lookup, no retry, no caching.
pub async fn get_profile(State(state): State<GatewayState>) -> Response {
    match state.social.profile().await {
        Ok(profile) => Json(profile).into_response(),
        Err(e) => {
            tracing::error!(error = %e, "error fetching account info");
            error_response(StatusCode::INTERNAL_SERVER_ERROR, PROFILE_FAILED_MESSAGE)
        }
    }
}

/// GET /health
pub async fn get_health(State(state): State<GatewayState>) -> Json<HealthResponse> {
    let mut adapters = Vec::with_capacity(state.health.adapters.len());
    for adapter in &state.health.adapters {
        let (status, detail) = match adapter.health_check().await {
            Ok(HealthStatus::Healthy) => ("healthy", None),
            Ok(HealthStatus::Degraded(reason)) => ("degraded", Some(reason)),
            Ok(HealthStatus::Unhealthy(reason)) => ("unhealthy", Some(reason)),
            Err(e) => ("unhealthy", Some(e.to_string())),
        };
        adapters.push(AdapterHealth {
            name: adapter.name().to_string(),
            adapter_type: adapter.adapter_type().to_string(),
            version: adapter.version().to_string(),
            status: status.to_string(),
            detail,
        });
    }

    let all_healthy = adapters.iter().all(|a| a.status == "healthy");
    Json(HealthResponse {
        status: if all_healthy { "ok" } else { "degraded" }.to_string(),
        version: env!("CARGO_PKG_VERSION").to_string(),
        uptime_secs: state.health.start_time.elapsed().as_secs(),
        adapters,
    })
}

/// GET /metrics
pub async fn get_metrics(State(state): State<GatewayState>) -> Response {
    match &state.health.prometheus_render {
        Some(render) => (
            StatusCode::OK,
            [("content-type", "text/plain; version=0.0.4")],
            render(),
        )
            .into_response(),
        None => StatusCode::NOT_FOUND.into_response(),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn parse_instruction_reads_string() {
        assert_eq!(
            parse_instruction(br#"{"instruction": "launch day"}"#).unwrap(),
            "launch day"
        );
    }

    #[test]
    fn parse_instruction_ignores_other_fields() {
        let body = br#"{"instruction": "x", "includeImage": true, "extra": 1}"#;
        assert_eq!(parse_instruction(body).unwrap(), "x");
    }

    #[test]
    fn missing_or_non_string_instruction_reads_empty() {
        assert_eq!(parse_instruction(b"{}").unwrap(), "");
        assert_eq!(parse_instruction(br#"{"instruction": 5}"#).unwrap(), "");
        assert_eq!(parse_instruction(br#"{"instruction": null}"#).unwrap(), "");
    }

    #[test]
    fn invalid_json_is_bad_request() {
        let response = parse_instruction(b"{not json").unwrap_err();
        assert_eq!(response.status(), StatusCode::BAD_REQUEST);
    }

    #[test]
    fn image_stage_failure_hides_upstream_message() {
        let failure = WorkflowFailure {
            stage: WorkflowStage::ImagePending,
            error: PostsmithError::generation("content policy violation"),
        };
        assert_eq!(
            failure_response(&failure).status(),
            StatusCode::INTERNAL_SERVER_ERROR
        );
    }

    #[test]
    fn validation_failure_is_bad_request() {
        let failure = WorkflowFailure {
            stage: WorkflowStage::Generating,
            error: PostsmithError::Validation("Generated tweet is too short or empty.".into()),
        };
        assert_eq!(failure_response(&failure).status(), StatusCode::BAD_REQUEST);
    }

    #[test]
    fn text_success_omits_tweet_field() {
        let body = PublishResponse {
            message: "Tweet posted with ID 1".into(),
            tweet: None,
        };
        let json = serde_json::to_value(&body).unwrap();
        assert!(json.get("tweet").is_none());
    }

    #[test]
    fn health_response_serializes() {
        let resp = HealthResponse {
            status: "ok".to_string(),
            version: "0.1.0".to_string(),
            uptime_secs: 42,
            adapters: vec![AdapterHealth {
                name: "openai".into(),
                adapter_type: "completion".into(),
                version: "0.1.0".into(),
                status: "healthy".into(),
                detail: None,
            }],
        };
        let json = serde_json::to_string(&resp).unwrap();
        assert!(json.contains("\"status\":\"ok\""));
        assert!(json.contains("\"uptime_secs\":42"));
        assert!(json.contains("\"type\":\"completion\""));
        assert!(json.contains("\"version\":\"0.1.0\""));
        assert!(!json.contains("detail"));
    }
}
