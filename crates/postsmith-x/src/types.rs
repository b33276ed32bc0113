// SPDX-FileCopyrightText: 2026 Blufio Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! X API v2 and v1.1 media upload request/response types.

use serde::{Deserialize, Serialize};

/// `user.fields` requested from `GET /2/users/me`.
pub const USER_FIELDS: &str = "profile_image_url,description,public_metrics";

// --- Users ---

#[derive(Debug, Clone, Deserialize)]
pub struct UserResponse {
    pub data: UserData,
}

#[derive(Debug, Clone, Deserialize)]
pub struct UserData {
    pub id: String,
    pub name: String,
    pub username: String,
    #[serde(default)]
    pub profile_image_url: Option<String>,
    #[serde(default)]
    pub description: Option<String>,
    #[serde(default)]
    pub public_metrics: Option<PublicMetrics>,
}

#[derive(Debug, Clone, Default, Deserialize)]
pub struct PublicMetrics {
    #[serde(default)]
    pub followers_count: u64,
    #[serde(default)]
    pub following_count: u64,
    #[serde(default)]
    pub tweet_count: u64,
    #[serde(default)]
    pub listed_count: u64,
}

// --- Tweets ---

/// Body of `POST /2/tweets`.
#[derive(Debug, Clone, Serialize)]
pub struct CreateTweetRequest {
    pub text: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub media: Option<TweetMedia>,
}

#[derive(Debug, Clone, Serialize)]
pub struct TweetMedia {
    pub media_ids: Vec<String>,
}

#[derive(Debug, Clone, Deserialize)]
pub struct CreateTweetResponse {
    pub data: CreatedTweet,
}

#[derive(Debug, Clone, Deserialize)]
pub struct CreatedTweet {
    pub id: String,
    #[serde(default)]
    pub text: String,
}

// --- Media ---

/// Response of `POST /1.1/media/upload.json`.
#[derive(Debug, Clone, Deserialize)]
pub struct MediaUploadResponse {
    pub media_id_string: String,
    #[serde(default)]
    pub size: Option<u64>,
}

// --- Errors ---

/// Error body in either the v2 problem shape (`title`, `detail`, `status`)
/// or the v1.1 shape (`errors: [{code, message}]`).
#[derive(Debug, Clone, Default, Deserialize)]
pub struct ApiErrorBody {
    #[serde(default)]
    pub title: Option<String>,
    #[serde(default)]
    pub detail: Option<String>,
    #[serde(default)]
    pub status: Option<u16>,
    #[serde(default)]
    pub errors: Vec<ApiErrorItem>,
}

#[derive(Debug, Clone, Default, Deserialize)]
pub struct ApiErrorItem {
    #[serde(default)]
    pub code: Option<u32>,
    #[serde(default)]
    pub message: Option<String>,
}

impl ApiErrorBody {
    /// Most specific human-readable message available.
    pub fn message(&self) -> Option<String> {
        self.detail
            .clone()
            .or_else(|| self.errors.iter().find_map(|e| e.message.clone()))
            .or_else(|| self.title.clone())
    }

    /// Platform error code: the first v1.1 code, else the v2 `status` field.
    pub fn code(&self) -> Option<u16> {
        self.errors
            .iter()
            .find_map(|e| e.code)
            .and_then(|c| u16::try_from(c).ok())
            .or(self.status)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn tweet_without_media_omits_field() {
        let body = CreateTweetRequest {
            text: "hello".into(),
            media: None,
        };
        let json = serde_json::to_value(&body).unwrap();
        assert_eq!(json, serde_json::json!({"text": "hello"}));
    }

    #[test]
    fn tweet_with_media_lists_ids() {
        let body = CreateTweetRequest {
            text: "hello".into(),
            media: Some(TweetMedia {
                media_ids: vec!["1455952740635586573".into()],
            }),
        };
        let json = serde_json::to_value(&body).unwrap();
        assert_eq!(json["media"]["media_ids"][0], "1455952740635586573");
    }

    #[test]
    fn v2_problem_error_parses() {
        let body: ApiErrorBody = serde_json::from_str(
            r#"{"title":"Too Many Requests","detail":"Too Many Requests","type":"about:blank","status":429}"#,
        )
        .unwrap();
        assert_eq!(body.code(), Some(429));
        assert_eq!(body.message().as_deref(), Some("Too Many Requests"));
    }

    #[test]
    fn v1_error_parses() {
        let body: ApiErrorBody =
            serde_json::from_str(r#"{"errors":[{"code":324,"message":"Invalid media id"}]}"#)
                .unwrap();
        assert_eq!(body.code(), Some(324));
        assert_eq!(body.message().as_deref(), Some("Invalid media id"));
    }

    #[test]
    fn user_without_metrics_parses() {
        let user: UserResponse = serde_json::from_str(
            r#"{"data":{"id":"1","name":"Post Smith","username":"postsmith"}}"#,
        )
        .unwrap();
        assert!(user.data.public_metrics.is_none());
    }
}
