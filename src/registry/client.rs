// src/registry/client.rs
use async_trait::async_trait;
use reqwest::header;

use crate::config::RegistryConfig;
use crate::utils::error::FetchError;

/// Anything that can turn a URL into a page body.
#[async_trait]
pub trait DocumentSource: Send + Sync {
    async fn fetch(&self, url: &str) -> Result<String, FetchError>;
}

/// Fetches registry pages over HTTP. No retries: one failed request is one error.
pub struct HttpSource {
    client: reqwest::Client,
}

impl HttpSource {
    pub fn new(config: &RegistryConfig) -> Result<Self, FetchError> {
        Ok(Self {
            client: build_registry_client(config)?,
        })
    }
}

/// Creates a reqwest client configured for registry interaction.
fn build_registry_client(config: &RegistryConfig) -> Result<reqwest::Client, reqwest::Error> {
    reqwest::Client::builder()
        .user_agent(config.user_agent.as_str())
        .timeout(config.fetch_timeout)
        .build()
}

#[async_trait]
impl DocumentSource for HttpSource {
    async fn fetch(&self, url: &str) -> Result<String, FetchError> {
        tracing::debug!("Downloading page from: {}", url);

        let response = self
            .client
            .get(url)
            .header(header::ACCEPT, "text/html,application/xhtml+xml,*/*")
            .send()
            .await
            .map_err(|e| {
                if e.is_timeout() {
                    FetchError::Timeout(url.to_string())
                } else {
                    FetchError::Network(e)
                }
            })?;

        // Check if the request was successful (status code 2xx)
        let status = response.status();
        if !status.is_success() {
            tracing::error!("HTTP error status: {} for URL: {}", status, url);
            if status == reqwest::StatusCode::TOO_MANY_REQUESTS {
                tracing::warn!("Received 429 Too Many Requests from the registry.");
                return Err(FetchError::RateLimited);
            }
            if status == reqwest::StatusCode::NOT_FOUND {
                return Err(FetchError::NotFound(url.to_string()));
            }
            return Err(FetchError::Http(status));
        }

        let body = response.text().await?;
        tracing::debug!("Successfully downloaded {} bytes from {}", body.len(), url);

        Ok(body)
    }
}
