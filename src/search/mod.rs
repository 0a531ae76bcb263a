// src/search/mod.rs
pub mod uk_registry;

use async_trait::async_trait;
use serde::Serialize;

use crate::storage::StorageManager;
use crate::utils::error::SearchError;
use crate::utils::AppError;

pub use uk_registry::UkRegistrySearch;

/// A registry that can be searched by free text and dumped under its own name.
#[async_trait]
pub trait Searcher: Send + Sync {
    type Record: Serialize + Send;

    /// Tag used to name dump files.
    fn source_name(&self) -> &'static str;

    async fn search(&self, query: &str) -> Result<Vec<Self::Record>, SearchError>;
}

/// Runs a search and writes its results and metadata to `storage`.
pub async fn search_and_dump<S: Searcher>(
    searcher: &S,
    query: &str,
    storage: &StorageManager,
) -> Result<Vec<S::Record>, AppError> {
    let records = searcher.search(query).await?;
    let source = searcher.source_name();

    storage.save_results(source, &records)?;
    storage.save_metadata(source, query, records.len())?;

    Ok(records)
}
