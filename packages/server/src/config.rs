use std::env;
use std::time::Duration;

use anyhow::{Context, Result};
use dotenvy::dotenv;

use crate::server::AppOptions;

/// Upstream CMS calls fail as timeouts after this long.
pub const DEFAULT_UPSTREAM_TIMEOUT_SECS: u64 = 7;

/// Application configuration loaded from environment variables
#[derive(Debug, Clone)]
pub struct Config {
    pub port: u16,
    pub cms_graphql_url: url::Url,
    pub cms_auth_token: Option<String>,
    pub upstream_timeout: Duration,
    pub allowed_origins: Vec<String>,
    pub rate_limit_per_second: Option<u64>,
}

impl Config {
    /// Load configuration from environment variables
    pub fn from_env() -> Result<Self> {
        // Load .env file if present (development)
        let _ = dotenv();

        let cms_graphql_url = env::var("CMS_GRAPHQL_URL").context("CMS_GRAPHQL_URL must be set")?;

        Ok(Self {
            port: env::var("PORT")
                .unwrap_or_else(|_| "8080".to_string())
                .parse()
                .context("PORT must be a valid number")?,
            cms_graphql_url: url::Url::parse(&cms_graphql_url)
                .context("CMS_GRAPHQL_URL must be a valid URL")?,
            cms_auth_token: env::var("CMS_AUTH_TOKEN").ok().filter(|t| !t.is_empty()),
            upstream_timeout: Duration::from_secs(
                env::var("UPSTREAM_TIMEOUT_SECS")
                    .ok()
                    .map(|s| s.parse())
                    .transpose()
                    .context("UPSTREAM_TIMEOUT_SECS must be a whole number of seconds")?
                    .unwrap_or(DEFAULT_UPSTREAM_TIMEOUT_SECS),
            ),
            allowed_origins: env::var("ALLOWED_ORIGINS")
                .map(|s| parse_origins(&s))
                .unwrap_or_default(),
            rate_limit_per_second: env::var("RATE_LIMIT_PER_SECOND")
                .ok()
                .map(|s| s.parse())
                .transpose()
                .context("RATE_LIMIT_PER_SECOND must be a valid number")?,
        })
    }

    pub fn app_options(&self) -> AppOptions {
        AppOptions {
            allowed_origins: self.allowed_origins.clone(),
            rate_limit_per_second: self.rate_limit_per_second,
        }
    }
}

/// Comma-separated origin list; blank entries are ignored.
fn parse_origins(raw: &str) -> Vec<String> {
    raw.split(',')
        .map(str::trim)
        .filter(|s| !s.is_empty())
        .map(str::to_string)
        .collect()
}
