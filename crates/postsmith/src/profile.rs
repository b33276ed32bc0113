// SPDX-FileCopyrightText: 2026 Blufio Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! `postsmith profile` command implementation.
//!
//! Shows the account card from a local cache when it is under an hour old,
//! otherwise fetches it from the running server and rewrites the cache.

use std::io::IsTerminal;
use std::path::{Path, PathBuf};

use async_trait::async_trait;
use chrono::{DateTime, Duration, Utc};
use postsmith_config::PostsmithConfig;
use postsmith_core::{AccountProfile, PostsmithError};
use serde::{Deserialize, Serialize};
use tracing::{debug, warn};

use crate::client::{ClientError, GatewayClient};

/// How long a cached profile is shown without refetching, in seconds.
pub const FRESHNESS_SECS: i64 = 60 * 60;

/// Cache file name under `<cache dir>/postsmith/`.
pub const CACHE_FILE: &str = "profile.json";

/// A profile stamped with the time it was fetched.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CachedProfile {
    pub profile: AccountProfile,
    pub last_updated: DateTime<Utc>,
}

impl CachedProfile {
    pub fn is_fresh(&self, now: DateTime<Utc>) -> bool {
        now.signed_duration_since(self.last_updated) < Duration::seconds(FRESHNESS_SECS)
    }
}

/// Source of fresh profiles.
#[async_trait]
pub trait ProfileFetcher: Send + Sync {
    async fn fetch(&self) -> Result<AccountProfile, ClientError>;
}

#[async_trait]
impl ProfileFetcher for GatewayClient {
    async fn fetch(&self) -> Result<AccountProfile, ClientError> {
        self.profile().await
    }
}

/// JSON file holding the last fetched profile.
#[derive(Debug, Clone)]
pub struct ProfileCache {
    path: PathBuf,
}

impl ProfileCache {
    pub fn new(path: impl Into<PathBuf>) -> Self {
        Self { path: path.into() }
    }

    /// `<user cache dir>/postsmith/profile.json`.
    pub fn default_location() -> Result<Self, PostsmithError> {
        let dir = dirs::cache_dir()
            .ok_or_else(|| PostsmithError::Internal("no user cache directory".to_string()))?;
        Ok(Self::new(dir.join("postsmith").join(CACHE_FILE)))
    }

    pub fn path(&self) -> &Path {
        &self.path
    }

    /// Read the cache. Missing or unreadable files read as empty.
    pub fn load(&self) -> Option<CachedProfile> {
        let content = std::fs::read_to_string(&self.path).ok()?;
        match serde_json::from_str(&content) {
            Ok(cached) => Some(cached),
            Err(e) => {
                warn!(path = %self.path.display(), error = %e, "ignoring corrupt profile cache");
                None
            }
        }
    }

    pub fn store(&self, cached: &CachedProfile) -> Result<(), PostsmithError> {
        if let Some(parent) = self.path.parent() {
            std::fs::create_dir_all(parent).map_err(|e| {
                PostsmithError::Internal(format!("failed to create {}: {e}", parent.display()))
            })?;
        }
        let json = serde_json::to_string_pretty(cached)
            .map_err(|e| PostsmithError::Internal(format!("failed to encode profile: {e}")))?;
        std::fs::write(&self.path, json).map_err(|e| {
            PostsmithError::Internal(format!("failed to write {}: {e}", self.path.display()))
        })
    }
}

/// Where a displayed profile came from.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ProfileSource {
    Cache,
    Network,
}

/// Return the cached profile when fresh, otherwise fetch and overwrite the cache.
///
/// `refresh` skips the cache read. Fetch failures are returned even when a
/// stale entry exists.
pub async fn resolve_profile(
    cache: &ProfileCache,
    fetcher: &dyn ProfileFetcher,
    refresh: bool,
    now: DateTime<Utc>,
) -> Result<(CachedProfile, ProfileSource), PostsmithError> {
    if !refresh
        && let Some(cached) = cache.load()
        && cached.is_fresh(now)
    {
        debug!(last_updated = %cached.last_updated, "profile served from cache");
        return Ok((cached, ProfileSource::Cache));
    }

    let profile = fetcher.fetch().await?;
    let cached = CachedProfile {
        profile,
        last_updated: now,
    };
    cache.store(&cached)?;
    debug!(path = %cache.path().display(), "profile cache updated");
    Ok((cached, ProfileSource::Network))
}

fn mask_text(value: &str) -> String {
    "*".repeat(value.chars().count().clamp(3, 8))
}

/// Copy of `profile` with every displayed field masked.
pub fn masked(profile: &AccountProfile) -> AccountProfile {
    AccountProfile {
        username: mask_text(&profile.username),
        name: mask_text(&profile.name),
        profile_image: None,
        description: profile.description.as_deref().map(mask_text),
        followers: None,
        following: None,
        tweets: None,
    }
}

fn format_count(value: Option<u64>, private: bool) -> String {
    match value {
        _ if private => "***".to_string(),
        Some(n) => n.to_string(),
        None => "-".to_string(),
    }
}

fn print_card(cached: &CachedProfile, source: ProfileSource, private: bool, use_color: bool) {
    let profile = if private {
        masked(&cached.profile)
    } else {
        cached.profile.clone()
    };

    println!();
    if use_color {
        use colored::Colorize;
        println!("  {} {}", profile.name.bold(), format!("@{}", profile.username).cyan());
    } else {
        println!("  {} @{}", profile.name, profile.username);
    }
    println!("  {}", "-".repeat(35));
    if let Some(description) = &profile.description {
        println!("    {description}");
    }
    if let Some(image) = &profile.profile_image {
        println!("    Avatar:    {image}");
    }
    println!("    Followers: {}", format_count(cached.profile.followers, private));
    println!("    Following: {}", format_count(cached.profile.following, private));
    println!("    Tweets:    {}", format_count(cached.profile.tweets, private));

    let source = match source {
        ProfileSource::Cache => "cache",
        ProfileSource::Network => "live",
    };
    println!(
        "    Updated:   {} ({source})",
        cached.last_updated.format("%Y-%m-%d %H:%M:%S UTC")
    );
    println!();
}

/// Run the `postsmith profile` command.
pub async fn run_profile(
    config: &PostsmithConfig,
    server_url: Option<&str>,
    refresh: bool,
    private: bool,
    json: bool,
) -> Result<(), PostsmithError> {
    let client = GatewayClient::from_config(config, server_url)?;
    let cache = ProfileCache::default_location()?;
    let (cached, source) = resolve_profile(&cache, &client, refresh, Utc::now()).await?;

    if json {
        let shown = if private {
            CachedProfile {
                profile: masked(&cached.profile),
                last_updated: cached.last_updated,
            }
        } else {
            cached
        };
        println!(
            "{}",
            serde_json::to_string_pretty(&shown).unwrap_or_else(|_| "{}".to_string())
        );
    } else {
        print_card(&cached, source, private, std::io::stdout().is_terminal());
    }
    Ok(())
}
