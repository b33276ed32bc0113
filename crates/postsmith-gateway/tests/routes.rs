// SPDX-FileCopyrightText: 2026 Blufio Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! Router-level tests driven through `tower::ServiceExt::oneshot`.

use std::sync::Arc;
use std::time::Duration;

use axum::Router;
use axum::body::Body;
use axum::http::{Request, StatusCode};
use postsmith_config::model::PublishConfig;
use postsmith_core::PostsmithError;
use postsmith_core::traits::PluginAdapter;
use postsmith_gateway::{AuthGuard, GatewayState, HealthState, router};
use postsmith_pipeline::{ImageGenerator, PublishWorkflow, Publisher, RateGate, TextGenerator};
use postsmith_test_utils::{MockCompletion, MockImage, MockSocial};
use tower::ServiceExt;

struct Harness {
    completion: MockCompletion,
    images: MockImage,
    social: MockSocial,
    gate: Arc<RateGate>,
    auth: AuthGuard,
    prometheus_render: Option<Arc<dyn Fn() -> String + Send + Sync>>,
}

impl Harness {
    fn new(reply: &str) -> Self {
        Self {
            completion: MockCompletion::with_responses(vec![reply.to_string()]),
            images: MockImage::new(),
            social: MockSocial::new(),
            gate: Arc::new(RateGate::new(50, Duration::from_secs(900))),
            auth: AuthGuard::default(),
            prometheus_render: None,
        }
    }

    fn app(&self) -> Router {
        let images = Arc::new(self.images.clone());
        let social = Arc::new(self.social.clone());
        let workflow = PublishWorkflow::new(
            TextGenerator::new(Arc::new(self.completion.clone())),
            ImageGenerator::new(images.clone()),
            Publisher::new(
                social.clone(),
                images,
                self.gate.clone(),
                PublishConfig::default(),
                "https://twitter.com",
            ),
        );
        router(GatewayState {
            workflow,
            social: social.clone(),
            auth: self.auth.clone(),
            health: HealthState {
                start_time: std::time::Instant::now(),
                prometheus_render: self.prometheus_render.clone(),
                adapters: vec![social as Arc<dyn PluginAdapter>],
            },
        })
    }
}

fn post(uri: &str, body: &str) -> Request<Body> {
    Request::builder()
        .method("POST")
        .uri(uri)
        .header("content-type", "application/json")
        .body(Body::from(body.to_string()))
        .unwrap()
}

fn get(uri: &str) -> Request<Body> {
    Request::builder().uri(uri).body(Body::empty()).unwrap()
}

async fn json_body(response: axum::response::Response) -> serde_json::Value {
    let bytes = axum::body::to_bytes(response.into_body(), usize::MAX)
        .await
        .unwrap();
    serde_json::from_slice(&bytes).unwrap()
}

#[tokio::test(start_paused = true)]
async fn text_post_returns_message_without_tweet() {
    let harness = Harness::new("We launched! 🚀");
    let response = harness
        .app()
        .oneshot(post("/api/twitter/post", r#"{"instruction":"launch day"}"#))
        .await
        .unwrap();

    assert_eq!(response.status(), StatusCode::OK);
    let body = json_body(response).await;
    assert_eq!(body["message"], "Tweet posted with ID 1000");
    assert!(body.get("tweet").is_none());
    assert_eq!(harness.social.posts().await[0].text, "We launched! 🚀");
}

#[tokio::test(start_paused = true)]
async fn image_post_returns_tweet_link() {
    let harness = Harness::new("Sunrise over the bay");
    let response = harness
        .app()
        .oneshot(post("/api/twitter/post-image", r#"{"instruction":"sunrise"}"#))
        .await
        .unwrap();

    assert_eq!(response.status(), StatusCode::OK);
    let body = json_body(response).await;
    assert_eq!(body["message"], "Tweet posted successfully!");
    assert_eq!(body["tweet"]["id"], "1000");
    assert_eq!(body["tweet"]["url"], "https://twitter.com/42/status/1000");
}

#[tokio::test]
async fn invalid_json_is_400() {
    let harness = Harness::new("unused reply");
    let response = harness
        .app()
        .oneshot(post("/api/twitter/post", "{nope"))
        .await
        .unwrap();

    assert_eq!(response.status(), StatusCode::BAD_REQUEST);
    assert_eq!(json_body(response).await["error"], "Invalid JSON in request body");
    assert_eq!(harness.completion.call_count().await, 0);
}

#[tokio::test]
async fn blank_instruction_is_400() {
    let harness = Harness::new("unused reply");
    let response = harness
        .app()
        .oneshot(post("/api/twitter/post", r#"{"instruction":"   "}"#))
        .await
        .unwrap();

    assert_eq!(response.status(), StatusCode::BAD_REQUEST);
    assert_eq!(
        json_body(response).await["error"],
        "Missing instruction in request body"
    );
}

#[tokio::test]
async fn short_generation_is_400() {
    let harness = Harness::new("hey");
    let response = harness
        .app()
        .oneshot(post("/api/twitter/post", r#"{"instruction":"x"}"#))
        .await
        .unwrap();

    assert_eq!(response.status(), StatusCode::BAD_REQUEST);
    assert_eq!(
        json_body(response).await["error"],
        "Generated tweet is too short or empty."
    );
    assert_eq!(harness.social.total_calls().await, 0);
}

#[tokio::test]
async fn image_failure_is_500_and_never_posts() {
    let mut harness = Harness::new("A long enough post");
    harness.images = MockImage::failing(PostsmithError::generation("content policy"));
    let response = harness
        .app()
        .oneshot(post("/api/twitter/post-image", r#"{"instruction":"art"}"#))
        .await
        .unwrap();

    assert_eq!(response.status(), StatusCode::INTERNAL_SERVER_ERROR);
    assert_eq!(
        json_body(response).await["error"],
        "Failed to generate image. Please try again."
    );
    assert_eq!(harness.social.total_calls().await, 0);
}

#[tokio::test]
async fn gate_denial_is_500_with_coded_message() {
    let mut harness = Harness::new("A long enough post");
    harness.gate = Arc::new(RateGate::new(1, Duration::from_secs(900)));
    assert!(harness.gate.try_acquire());

    let response = harness
        .app()
        .oneshot(post("/api/twitter/post", r#"{"instruction":"x"}"#))
        .await
        .unwrap();

    assert_eq!(response.status(), StatusCode::INTERNAL_SERVER_ERROR);
    let body = json_body(response).await;
    assert_eq!(body["code"], 500);
    assert!(
        body["message"]
            .as_str()
            .unwrap()
            .starts_with("Rate limit exceeded. Please try again in")
    );
    assert_eq!(harness.social.total_calls().await, 0);
}

#[tokio::test]
async fn publish_failure_is_500_with_coded_message() {
    let harness = Harness::new("A long enough post");
    harness
        .social
        .fail_posts([postsmith_test_utils::upstream_error(403, "Forbidden")])
        .await;

    let response = harness
        .app()
        .oneshot(post("/api/twitter/post", r#"{"instruction":"x"}"#))
        .await
        .unwrap();

    assert_eq!(response.status(), StatusCode::INTERNAL_SERVER_ERROR);
    let body = json_body(response).await;
    assert_eq!(body["code"], 500);
    assert_eq!(body["message"], "Failed to post tweet: Forbidden");
}

#[tokio::test]
async fn profile_returns_projected_fields() {
    let harness = Harness::new("unused reply");
    let response = harness.app().oneshot(get("/api/twitter/me")).await.unwrap();

    assert_eq!(response.status(), StatusCode::OK);
    let body = json_body(response).await;
    assert_eq!(body["username"], "postsmith");
    assert!(body.get("profileImage").is_some());
    assert_eq!(harness.social.profile_calls().await, 1);
}

#[tokio::test]
async fn profile_failure_is_500() {
    let harness = Harness::new("unused reply");
    harness
        .social
        .fail_me(postsmith_test_utils::upstream_error(401, "Unauthorized"))
        .await;

    let response = harness.app().oneshot(get("/api/twitter/me")).await.unwrap();
    assert_eq!(response.status(), StatusCode::INTERNAL_SERVER_ERROR);
    assert_eq!(
        json_body(response).await["error"],
        "Failed to fetch Twitter account information"
    );
}

#[tokio::test]
async fn bearer_guard_rejects_missing_token() {
    let mut harness = Harness::new("A long enough post");
    harness.auth = AuthGuard {
        bearer_token: Some("s3cret".into()),
    };

    let response = harness
        .app()
        .oneshot(post("/api/twitter/post", r#"{"instruction":"x"}"#))
        .await
        .unwrap();

    assert_eq!(response.status(), StatusCode::UNAUTHORIZED);
    assert_eq!(json_body(response).await["error"], "Unauthorized");
    assert_eq!(harness.completion.call_count().await, 0);
}

#[tokio::test(start_paused = true)]
async fn bearer_guard_accepts_matching_token() {
    let mut harness = Harness::new("A long enough post");
    harness.auth = AuthGuard {
        bearer_token: Some("s3cret".into()),
    };

    let mut request = post("/api/twitter/post", r#"{"instruction":"x"}"#);
    request
        .headers_mut()
        .insert("authorization", "Bearer s3cret".parse().unwrap());
    let response = harness.app().oneshot(request).await.unwrap();
    assert_eq!(response.status(), StatusCode::OK);
}

#[tokio::test]
async fn health_is_public_even_with_guard() {
    let mut harness = Harness::new("unused reply");
    harness.auth = AuthGuard {
        bearer_token: Some("s3cret".into()),
    };

    let response = harness.app().oneshot(get("/health")).await.unwrap();
    assert_eq!(response.status(), StatusCode::OK);
    let body = json_body(response).await;
    assert_eq!(body["status"], "ok");
    assert_eq!(body["adapters"][0]["name"], "mock-social");
    assert_eq!(body["adapters"][0]["version"], "0.1.0");
}

#[tokio::test]
async fn metrics_404_when_disabled() {
    let harness = Harness::new("unused reply");
    let response = harness.app().oneshot(get("/metrics")).await.unwrap();
    assert_eq!(response.status(), StatusCode::NOT_FOUND);
}

#[tokio::test]
async fn metrics_renders_when_enabled() {
    let mut harness = Harness::new("unused reply");
    harness.prometheus_render = Some(Arc::new(|| "postsmith_publish_total 1\n".to_string()));

    let response = harness.app().oneshot(get("/metrics")).await.unwrap();
    assert_eq!(response.status(), StatusCode::OK);
    let bytes = axum::body::to_bytes(response.into_body(), usize::MAX)
        .await
        .unwrap();
    assert!(String::from_utf8_lossy(&bytes).contains("postsmith_publish_total"));
}
