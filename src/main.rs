// src/main.rs
mod config;
mod extractors;
mod registry;
mod search;
mod storage;
mod utils;

#[cfg(test)]
mod fixtures;

use std::sync::Arc;
use std::time::Duration;

use clap::Parser;
use config::RegistryConfig;
use extractors::ExtractionPatterns;
use registry::HttpSource;
use search::{Searcher, UkRegistrySearch};
use storage::StorageManager;
use utils::error::StorageError;
use utils::AppError;

/// Command Line Interface for the UK company officer search
#[derive(Parser, Debug)]
#[command(author, version, about, long_about = None)]
struct Args {
    /// Query terms, e.g. an officer's name
    #[arg(short, long)]
    query: String,

    /// Output directory for result dumps
    #[arg(short, long, default_value = "./dumps")]
    output_dir: String,

    /// Maximum number of officer pages fetched at the same time
    #[arg(long)]
    concurrency: Option<usize>,

    /// Timeout for each page fetch, in seconds
    #[arg(long)]
    fetch_timeout_secs: Option<u64>,

    /// Overall deadline for the whole search, in seconds
    #[arg(long)]
    search_timeout_secs: Option<u64>,

    /// Registry root URL (overrides REGISTRY_ROOT_URL)
    #[arg(long)]
    root_url: Option<String>,

    /// Do not write dump files
    #[arg(long)]
    no_dump: bool,

    /// Print the results as JSON on stdout
    #[arg(long)]
    print: bool,
}

impl Args {
    /// Applies command-line overrides on top of the environment configuration.
    fn apply(&self, mut config: RegistryConfig) -> RegistryConfig {
        if let Some(root) = &self.root_url {
            config.root_url = root.clone();
        }
        if let Some(n) = self.concurrency {
            config.max_concurrency = n;
        }
        if let Some(secs) = self.fetch_timeout_secs {
            config.fetch_timeout = Duration::from_secs(secs);
        }
        if let Some(secs) = self.search_timeout_secs {
            config.search_timeout = Some(Duration::from_secs(secs));
        }
        config
    }
}

#[tokio::main]
async fn main() -> Result<(), AppError> {
    // 1. Setup Logging (reads RUST_LOG env var)
    utils::logging::setup_logging();

    // 2. Parse CLI Arguments and layer configuration
    let args = Args::parse();
    tracing::info!("Starting search for args: {:?}", args);
    let config = args.apply(RegistryConfig::from_env()?).validate()?;
    tracing::debug!("Using configuration: {:?}", config);

    // 3. Build the search engine
    let source = HttpSource::new(&config)
        .map_err(|e| AppError::Config(format!("Could not build HTTP client: {}", e)))?;
    let engine = UkRegistrySearch::new(config, Arc::new(source), ExtractionPatterns::new()?);

    // 4. Search, and dump unless asked not to
    let results = if args.no_dump {
        engine.search(&args.query).await?
    } else {
        let storage = StorageManager::new(&args.output_dir)?;
        search::search_and_dump(&engine, &args.query, &storage).await?
    };

    // 5. Report
    for officer in &results {
        tracing::info!(
            id = %officer.id,
            appointments = officer.appointments.len(),
            missing_fields = officer.diagnostics.len(),
            "{}",
            if officer.name.is_empty() { "(name not found)" } else { officer.name.as_str() }
        );
    }
    tracing::info!("Search finished. {} officers found for {:?}", results.len(), args.query);

    if args.print {
        let json = serde_json::to_string_pretty(&results)
            .map_err(|e| StorageError::SerializationError(e.to_string()))?;
        println!("{}", json);
    }

    Ok(())
}
