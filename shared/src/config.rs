/// Runtime configuration for the site backend.
///
/// Read once at startup and handed to the components that need it.
use std::time::Duration;

use chrono::{DateTime, Utc};
use tracing::warn;

use crate::errors::ConfigError;

pub const DEFAULT_GITHUB_API_URL: &str = "https://api.github.com";
pub const DEFAULT_LAUNCH_AT: &str = "2026-02-07T00:00:00Z";

/// A retired asset name whose counts are credited to its successors.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct LegacyRename {
    pub legacy: String,
    pub successors: Vec<String>,
}

impl LegacyRename {
    pub fn new(legacy: &str, successors: &[&str]) -> Self {
        Self {
            legacy: legacy.to_string(),
            successors: successors.iter().map(|s| s.to_string()).collect(),
        }
    }
}

/// The universal macOS image was split into per-architecture images.
pub fn default_renames() -> Vec<LegacyRename> {
    vec![LegacyRename::new(
        "VidGrab.dmg",
        &["VidGrab-arm64.dmg", "VidGrab-intel.dmg"],
    )]
}

/// Connection settings for the release-hosting API.
#[derive(Debug, Clone)]
pub struct GithubConfig {
    pub api_url: String,
    pub owner: String,
    pub repo: String,
    pub token: Option<String>,
    pub timeout: Duration,
}

impl GithubConfig {
    pub fn repo_url(&self) -> String {
        format!("https://github.com/{}/{}", self.owner, self.repo)
    }

    /// Public releases page, used by consumers as a fallback link.
    pub fn releases_url(&self) -> String {
        format!("{}/releases", self.repo_url())
    }
}

impl Default for GithubConfig {
    fn default() -> Self {
        Self {
            api_url: DEFAULT_GITHUB_API_URL.to_string(),
            owner: "ellaboevans".to_string(),
            repo: "vidgrab".to_string(),
            token: None,
            timeout: Duration::from_secs(10),
        }
    }
}

/// Pagination and rename rules for the download-counts sweep.
#[derive(Debug, Clone)]
pub struct AggregatorConfig {
    pub page_size: usize,
    pub page_cap: u32,
    pub renames: Vec<LegacyRename>,
}

impl Default for AggregatorConfig {
    fn default() -> Self {
        Self {
            page_size: 100,
            page_cap: 20,
            renames: default_renames(),
        }
    }
}

/// Full backend configuration.
#[derive(Debug, Clone)]
pub struct SiteConfig {
    pub host: String,
    pub port: u16,
    pub github: GithubConfig,
    pub aggregator: AggregatorConfig,
    pub cache_max_age_secs: u64,
    pub coming_soon: bool,
    pub launch_at: DateTime<Utc>,
}

impl SiteConfig {
    /// Build the configuration from process environment (after `.env` is loaded).
    pub fn from_env() -> Result<Self, ConfigError> {
        Self::from_lookup(|key| std::env::var(key).ok())
    }

    /// Build the configuration from an arbitrary key lookup.
    pub fn from_lookup<F>(lookup: F) -> Result<Self, ConfigError>
    where
        F: Fn(&str) -> Option<String>,
    {
        let defaults = GithubConfig::default();

        let token = lookup("GITHUB_TOKEN").filter(|t| !t.trim().is_empty());
        let timeout_secs = parse_or(&lookup, "UPSTREAM_TIMEOUT_SECS", 10u64);

        let github = GithubConfig {
            api_url: lookup("GITHUB_API_URL")
                .map(|u| u.trim_end_matches('/').to_string())
                .unwrap_or(defaults.api_url),
            owner: lookup("GITHUB_OWNER").unwrap_or(defaults.owner),
            repo: lookup("GITHUB_REPO").unwrap_or(defaults.repo),
            token,
            timeout: Duration::from_secs(timeout_secs),
        };

        let launch_raw = lookup("LAUNCH_AT").unwrap_or_else(|| DEFAULT_LAUNCH_AT.to_string());
        let launch_at = DateTime::parse_from_rfc3339(launch_raw.trim())
            .map_err(|e| ConfigError::Invalid {
                key: "LAUNCH_AT",
                reason: e.to_string(),
            })?
            .with_timezone(&Utc);

        Ok(Self {
            host: lookup("API_HOST").unwrap_or_else(|| "0.0.0.0".to_string()),
            port: parse_or(&lookup, "API_PORT", 8080u16),
            github,
            aggregator: AggregatorConfig::default(),
            cache_max_age_secs: parse_or(&lookup, "CACHE_MAX_AGE_SECS", 3600u64),
            coming_soon: lookup("COMING_SOON")
                .map(|v| v.trim().eq_ignore_ascii_case("true"))
                .unwrap_or(false),
            launch_at,
        })
    }

    pub fn bind_addr(&self) -> String {
        format!("{}:{}", self.host, self.port)
    }
}

fn parse_or<F, T>(lookup: &F, key: &str, default: T) -> T
where
    F: Fn(&str) -> Option<String>,
    T: std::str::FromStr + Copy,
{
    match lookup(key) {
        Some(raw) => raw.trim().parse().unwrap_or_else(|_| {
            warn!("Ignoring invalid {}={:?}", key, raw);
            default
        }),
        None => default,
    }
}
