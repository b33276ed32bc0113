// SPDX-FileCopyrightText: 2026 Blufio Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! HTTP gateway for postsmith.
//!
//! Exposes the publish workflow and the profile lookup under `/api/twitter/*`,
//! plus unauthenticated `/health` and `/metrics`.

pub mod auth;
pub mod handlers;
pub mod server;

pub use auth::AuthGuard;
pub use server::{GatewayState, HealthState, ServerConfig, router, start_server};
