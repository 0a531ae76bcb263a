// src/storage/mod.rs
use serde::Serialize;
use std::fs;
use std::path::{Path, PathBuf};
use crate::utils::error::StorageError;

pub struct StorageManager {
    base_dir: PathBuf,
}

impl StorageManager {
    /// Creates a new StorageManager with the specified base directory
    pub fn new<P: AsRef<Path>>(base_dir: P) -> Result<Self, StorageError> {
        let base_path = base_dir.as_ref().to_path_buf();

        // Create the base directory if it doesn't exist
        if !base_path.exists() {
            fs::create_dir_all(&base_path)
                .map_err(StorageError::IoError)?;
        }

        Ok(Self { base_dir: base_path })
    }

    /// Saves the search results of one source as a pretty JSON array: `<base_dir>/<source>.json`
    pub fn save_results<T: Serialize>(&self, source: &str, records: &[T]) -> Result<PathBuf, StorageError> {
        let file_path = self.base_dir.join(format!("{}.json", source));

        let data = serde_json::to_string_pretty(records)
            .map_err(|e| StorageError::SerializationError(e.to_string()))?;

        fs::write(&file_path, data)
            .map_err(StorageError::IoError)?;

        tracing::info!(source, path = %file_path.display(), "Dump successful");

        Ok(file_path)
    }

    /// Saves metadata about a search run: `<base_dir>/<source>_meta.json`
    pub fn save_metadata(&self, source: &str, query: &str, record_count: usize) -> Result<PathBuf, StorageError> {
        let file_path = self.base_dir.join(format!("{}_meta.json", source));

        let metadata = serde_json::json!({
            "source": source,
            "query": query,
            "record_count": record_count,
            "extraction_timestamp": chrono::Utc::now().to_rfc3339(),
        });

        let metadata_str = serde_json::to_string_pretty(&metadata)
            .map_err(|e| StorageError::SerializationError(e.to_string()))?;

        fs::write(&file_path, metadata_str)
            .map_err(StorageError::IoError)?;

        tracing::info!("Saved metadata to {}", file_path.display());

        Ok(file_path)
    }
}
