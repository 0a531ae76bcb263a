// src/config.rs
use std::time::Duration;
use tokio::sync::Semaphore;
use tokio::time::Instant;

use crate::utils::AppError;

pub const DEFAULT_ROOT_URL: &str = "https://find-and-update.company-information.service.gov.uk";
pub const DEFAULT_MAX_CONCURRENCY: usize = 8;
pub const DEFAULT_FETCH_TIMEOUT_SECS: u64 = 30;
const DEFAULT_USER_AGENT: &str = concat!("officer_search/", env!("CARGO_PKG_VERSION"));

/// Settings for talking to the officer registry.
#[derive(Debug, Clone)]
pub struct RegistryConfig {
    /// Site root, no trailing slash. Relative hrefs are appended to it.
    pub root_url: String,
    /// Upper bound on detail pages fetched at the same time.
    pub max_concurrency: usize,
    /// Deadline for a single page fetch.
    pub fetch_timeout: Duration,
    /// Overall deadline for one search call, if any.
    pub search_timeout: Option<Duration>,
    pub user_agent: String,
}

impl Default for RegistryConfig {
    fn default() -> Self {
        Self {
            root_url: DEFAULT_ROOT_URL.to_string(),
            max_concurrency: DEFAULT_MAX_CONCURRENCY,
            fetch_timeout: Duration::from_secs(DEFAULT_FETCH_TIMEOUT_SECS),
            search_timeout: None,
            user_agent: DEFAULT_USER_AGENT.to_string(),
        }
    }
}

impl RegistryConfig {
    /// Defaults overridden by `REGISTRY_*` environment variables.
    pub fn from_env() -> Result<Self, AppError> {
        Self::default().with_lookup(|key| std::env::var(key).ok())
    }

    fn with_lookup<F>(mut self, lookup: F) -> Result<Self, AppError>
    where
        F: Fn(&str) -> Option<String>,
    {
        if let Some(root) = lookup("REGISTRY_ROOT_URL") {
            tracing::debug!("Using REGISTRY_ROOT_URL={}", root);
            self.root_url = root;
        }
        if let Some(raw) = lookup("REGISTRY_MAX_CONCURRENCY") {
            self.max_concurrency = parse_number("REGISTRY_MAX_CONCURRENCY", &raw)?;
        }
        if let Some(raw) = lookup("REGISTRY_FETCH_TIMEOUT_SECS") {
            self.fetch_timeout = Duration::from_secs(parse_number("REGISTRY_FETCH_TIMEOUT_SECS", &raw)?);
        }
        if let Some(raw) = lookup("REGISTRY_SEARCH_TIMEOUT_SECS") {
            self.search_timeout = Some(Duration::from_secs(parse_number("REGISTRY_SEARCH_TIMEOUT_SECS", &raw)?));
        }
        if let Some(agent) = lookup("REGISTRY_USER_AGENT") {
            self.user_agent = agent;
        }
        Ok(self)
    }

    /// Checks invariants and normalizes the root URL.
    pub fn validate(mut self) -> Result<Self, AppError> {
        let trimmed = self.root_url.trim().trim_end_matches('/').to_string();
        let parsed = reqwest::Url::parse(&trimmed)
            .map_err(|e| AppError::Config(format!("Invalid root URL '{}': {}", self.root_url, e)))?;
        if parsed.scheme() != "http" && parsed.scheme() != "https" {
            return Err(AppError::Config(format!("Root URL must be http(s): {}", self.root_url)));
        }
        self.root_url = trimmed;

        if self.max_concurrency == 0 {
            return Err(AppError::Config("Concurrency must be at least 1".to_string()));
        }
        if self.max_concurrency > Semaphore::MAX_PERMITS {
            return Err(AppError::Config(format!(
                "Concurrency must be at most {}, got {}",
                Semaphore::MAX_PERMITS,
                self.max_concurrency
            )));
        }
        check_timeout("Fetch", self.fetch_timeout)?;
        if let Some(timeout) = self.search_timeout {
            check_timeout("Search", timeout)?;
        }
        Ok(self)
    }
}

/// A timeout must be non-zero and small enough to become a deadline.
fn check_timeout(name: &str, timeout: Duration) -> Result<(), AppError> {
    if timeout.is_zero() {
        return Err(AppError::Config(format!("{} timeout must be greater than zero", name)));
    }
    if Instant::now().checked_add(timeout).is_none() {
        return Err(AppError::Config(format!("{} timeout is too large: {}s", name, timeout.as_secs())));
    }
    Ok(())
}

fn parse_number<T: std::str::FromStr>(key: &str, raw: &str) -> Result<T, AppError> {
    raw.trim()
        .parse()
        .map_err(|_| AppError::Config(format!("{} is not a valid number: '{}'", key, raw)))
}
