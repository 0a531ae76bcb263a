// src/search/uk_registry.rs
use async_trait::async_trait;
use scraper::Html;
use std::sync::Arc;
use tokio::sync::{OwnedSemaphorePermit, Semaphore};
use tokio::task::JoinSet;
use tokio::time::Instant;
use tracing::Instrument;

use crate::config::RegistryConfig;
use crate::extractors::field;
use crate::extractors::patterns::{self, ExtractionPatterns};
use crate::extractors::OfficerExtractor;
use crate::registry::client::DocumentSource;
use crate::registry::models::OfficerRecord;
use crate::search::Searcher;
use crate::utils::error::{FetchError, SearchError};

pub const SOURCE_NAME: &str = "uk_registry";

/// Searches the UK officer register and extracts every matching officer's appointments.
///
/// Detail pages are fetched concurrently, at most `max_concurrency` at a time.
/// A detail page that fails or times out drops that officer from the results;
/// only a failure to fetch the search page itself fails the search.
#[derive(Clone)]
pub struct UkRegistrySearch {
    source: Arc<dyn DocumentSource>,
    patterns: Arc<ExtractionPatterns>,
    config: Arc<RegistryConfig>,
}

impl UkRegistrySearch {
    pub fn new(config: RegistryConfig, source: Arc<dyn DocumentSource>, patterns: ExtractionPatterns) -> Self {
        Self {
            source,
            patterns: Arc::new(patterns),
            config: Arc::new(config),
        }
    }

    pub fn search_url(&self, query: &str) -> Result<String, FetchError> {
        let base = format!("{}{}", self.config.root_url, patterns::SEARCH_PATH);
        reqwest::Url::parse_with_params(&base, &[("q", query)])
            .map(String::from)
            .map_err(|e| FetchError::InvalidUrl(format!("{}: {}", base, e)))
    }

    /// Officer shells (id and detail URL) in the order the results page lists them.
    pub fn discover(&self, body: &str) -> Vec<OfficerRecord> {
        let document = Html::parse_document(body);
        let items = field::find_all(document.root_element(), &self.patterns.officer_result);
        let mut shells = Vec::with_capacity(items.len());

        for item in items {
            let Some(link) = field::find(item, &self.patterns.link) else {
                tracing::warn!(html = %item.html(), "Skipping officer result without a link");
                continue;
            };
            let href = link.value().attr("href").unwrap_or_default();
            let detail_url = format!("{}{}", self.config.root_url, href);
            let Some(id) = self.patterns.officer_id(&detail_url).map(str::to_string) else {
                tracing::warn!(url = %detail_url, "Failed to extract officer id");
                continue;
            };
            shells.push(OfficerRecord::shell(id, detail_url));
        }

        shells
    }

    /// Fetches `url`, giving up at the fetch timeout or the search deadline, whichever is first.
    /// A timeout too large to express as an instant imposes no deadline.
    async fn fetch_before(&self, url: &str, search_deadline: Option<Instant>) -> Result<String, FetchError> {
        let deadline = match (Instant::now().checked_add(self.config.fetch_timeout), search_deadline) {
            (Some(fetch), Some(search)) => Some(fetch.min(search)),
            (fetch, search) => fetch.or(search),
        };
        match deadline {
            Some(limit) => tokio::time::timeout_at(limit, self.source.fetch(url))
                .await
                .map_err(|_| FetchError::Timeout(url.to_string()))?,
            None => self.source.fetch(url).await,
        }
    }

    async fn extract_officer(
        self,
        shell: OfficerRecord,
        semaphore: Arc<Semaphore>,
        search_deadline: Option<Instant>,
    ) -> Option<OfficerRecord> {
        let Some(permit) = acquire_before(semaphore, search_deadline).await else {
            tracing::error!("Search deadline passed while waiting to fetch; dropping officer");
            return None;
        };

        let body = match self.fetch_before(&shell.detail_url, search_deadline).await {
            Ok(body) => body,
            Err(e) => {
                tracing::error!(error = %e, "Failed to fetch officer page; dropping officer");
                return None;
            }
        };
        drop(permit);

        Some(OfficerExtractor::new(&self.patterns, &self.config.root_url).extract_page(&body, shell))
    }
}

async fn acquire_before(semaphore: Arc<Semaphore>, deadline: Option<Instant>) -> Option<OwnedSemaphorePermit> {
    match deadline {
        Some(limit) => tokio::time::timeout_at(limit, semaphore.acquire_owned())
            .await
            .ok()?
            .ok(),
        None => semaphore.acquire_owned().await.ok(),
    }
}

#[async_trait]
impl Searcher for UkRegistrySearch {
    type Record = OfficerRecord;

    fn source_name(&self) -> &'static str {
        SOURCE_NAME
    }

    async fn search(&self, query: &str) -> Result<Vec<OfficerRecord>, SearchError> {
        tracing::info!("Searching UK companies registry for officers: {:?}", query);
        let search_deadline = self.config.search_timeout.and_then(|t| Instant::now().checked_add(t));

        let url = self.search_url(query)?;
        let body = self.fetch_before(&url, search_deadline).await.map_err(|e| {
            tracing::error!(url = %url, "Failed to fetch search results: {}", e);
            e
        })?;

        let shells = self.discover(&body);
        let discovered = shells.len();
        tracing::info!("{} officer links found", discovered);

        // One task per officer, tagged with its slot in discovery order.
        // Dropping the set aborts whatever is still running.
        let permits = self.config.max_concurrency.clamp(1, Semaphore::MAX_PERMITS);
        let semaphore = Arc::new(Semaphore::new(permits));
        let mut tasks = JoinSet::new();
        for (slot, shell) in shells.into_iter().enumerate() {
            let span = tracing::info_span!("officer", id = %shell.id, url = %shell.detail_url);
            let task = self.clone().extract_officer(shell, Arc::clone(&semaphore), search_deadline);
            tasks.spawn(async move { (slot, task.await) }.instrument(span));
        }

        let mut slots: Vec<Option<OfficerRecord>> = (0..discovered).map(|_| None).collect();
        while let Some(joined) = tasks.join_next().await {
            match joined {
                Ok((slot, record)) => {
                    if let Some(entry) = slots.get_mut(slot) {
                        *entry = record;
                    }
                }
                Err(e) => tracing::error!("Officer extraction task failed: {}", e),
            }
        }
        let results: Vec<OfficerRecord> = slots.into_iter().flatten().collect();

        tracing::info!("All searches completed: {} of {} officers extracted", results.len(), discovered);
        Ok(results)
    }
}
