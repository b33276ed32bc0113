// SPDX-FileCopyrightText: 2026 Blufio Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! Optional bearer-token guard for the `/api/*` routes.
//!
//! Disabled by default. In bearer mode every request must carry
//! `Authorization: Bearer <token>`; anything else gets 401.

use axum::{
    Json,
    extract::{Request, State},
    http::StatusCode,
    middleware::Next,
    response::{IntoResponse, Response},
};
use postsmith_config::model::{AuthConfig, AuthMode};

use crate::handlers::ErrorResponse;

/// Authentication state shared with the middleware.
#[derive(Clone, Default)]
pub struct AuthGuard {
    /// Expected bearer token. `None` disables the guard.
    pub bearer_token: Option<String>,
}

impl AuthGuard {
    /// Build the guard from config. Validation guarantees a token in bearer mode.
    pub fn from_config(config: &AuthConfig) -> Self {
        match config.mode {
            AuthMode::Disabled => Self::default(),
            AuthMode::Bearer => Self {
                bearer_token: config.bearer_token.clone(),
            },
        }
    }

    pub fn is_enabled(&self) -> bool {
        self.bearer_token.is_some()
    }
}

impl std::fmt::Debug for AuthGuard {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("AuthGuard")
            .field(
                "bearer_token",
                &self.bearer_token.as_ref().map(|_| "[redacted]"),
            )
            .finish()
    }
}

/// Middleware that checks the bearer token when the guard is enabled.
pub async fn auth_middleware(
    State(auth): State<AuthGuard>,
    request: Request,
    next: Next,
) -> Response {
    let Some(expected) = auth.bearer_token.as_deref() else {
        return next.run(request).await;
    };

    let presented = request
        .headers()
        .get("authorization")
        .and_then(|v| v.to_str().ok())
        .and_then(|v| v.strip_prefix("Bearer "));

    if presented == Some(expected) {
        return next.run(request).await;
    }

    tracing::warn!(
        path = %request.uri().path(),
        token_present = presented.is_some(),
        "unauthorized request rejected"
    );
    (
        StatusCode::UNAUTHORIZED,
        Json(ErrorResponse {
            error: "Unauthorized".to_string(),
        }),
    )
        .into_response()
}
