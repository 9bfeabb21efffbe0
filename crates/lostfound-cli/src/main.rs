//! lostfound: check and store item photos, browse a seeded catalog.
//!
//! Upload rules and storage come from the environment (`.env` is honoured):
//! ALLOWED_EXTENSIONS, MAX_FILE_SIZE_MB, UPLOAD_SUBDIRECTORY, LOCAL_STORAGE_PATH.

use std::path::PathBuf;
use std::process::ExitCode;
use std::sync::Arc;

use anyhow::Context;
use clap::{Parser, Subcommand};
use lostfound_cli::{check, init_tracing, load_seed, read_candidate, CheckVerdict};
use lostfound_core::constants::RECENT_ITEMS_LIMIT;
use lostfound_core::models::ItemQuery;
use lostfound_core::Config;
use lostfound_db::CatalogService;
use lostfound_processing::{UploadError, UploadPipeline, UploadValidator};
use lostfound_storage::create_storage;
use serde::Serialize;

#[derive(Parser)]
#[command(name = "lostfound", about = "Lost & found photo and catalog tool")]
struct Cli {
    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Validate a photo without storing it
    Check {
        /// Path to the image file
        file: PathBuf,
    },
    /// Validate a photo and store it under a fresh path
    Store {
        /// Path to the image file
        file: PathBuf,
    },
    /// Search a catalog loaded from a JSON seed file
    Items {
        /// Seed file with categories, items and reports
        #[arg(long)]
        seed: PathBuf,
        /// Keyword matched against title, description and location
        #[arg(long)]
        q: Option<String>,
        /// Category UUID
        #[arg(long)]
        category: Option<String>,
        /// unclaimed or claimed
        #[arg(long)]
        status: Option<String>,
        /// newest (default) or oldest
        #[arg(long)]
        order: Option<String>,
        /// Page number, 1-based
        #[arg(long)]
        page: Option<String>,
    },
    /// Show the most recently listed items of a seeded catalog
    Recent {
        #[arg(long)]
        seed: PathBuf,
    },
}

fn print_json(value: &impl Serialize) -> anyhow::Result<()> {
    let out = serde_json::to_string_pretty(value).context("Serialize output")?;
    println!("{}", out);
    Ok(())
}

#[tokio::main]
async fn main() -> anyhow::Result<ExitCode> {
    init_tracing();

    let cli = Cli::parse();
    let config = Config::from_env().context("Failed to load configuration")?;

    match cli.command {
        Commands::Check { file } => {
            let validator = UploadValidator::new(config.upload.clone());
            let candidate = read_candidate(&file, config.upload()).await?;
            let verdict = check(&validator, &candidate);
            print_json(&verdict)?;
            if !verdict.accepted {
                return Ok(ExitCode::FAILURE);
            }
        }
        Commands::Store { file } => {
            let storage = create_storage(&config)
                .await
                .context("Failed to initialize storage")?;
            let pipeline = UploadPipeline::new(UploadValidator::new(config.upload.clone()), storage);

            let candidate = read_candidate(&file, config.upload()).await?;
            let file_name = candidate.original_name().to_string();
            let size_bytes = candidate.size_bytes();

            match pipeline.accept(candidate).await {
                Ok(accepted) => print_json(&accepted)?,
                Err(UploadError::Rejected(failure)) => {
                    print_json(&CheckVerdict {
                        file: file_name,
                        accepted: false,
                        size_bytes,
                        format: None,
                        errors: vec![failure.to_string()],
                    })?;
                    return Ok(ExitCode::FAILURE);
                }
                Err(e) => return Err(e).context("Failed to store upload"),
            }
        }
        Commands::Items {
            seed,
            q,
            category,
            status,
            order,
            page,
        } => {
            let catalog = CatalogService::with_store(Arc::new(load_seed(&seed)?))
                .with_items_per_page(config.items_per_page);
            let query = ItemQuery::from_params(
                q.as_deref(),
                category.as_deref(),
                status.as_deref(),
                order.as_deref(),
                page.as_deref(),
            )?;
            print_json(&catalog.search(&query).await?)?;
        }
        Commands::Recent { seed } => {
            let catalog = CatalogService::with_store(Arc::new(load_seed(&seed)?));
            print_json(&catalog.recent(RECENT_ITEMS_LIMIT).await?)?;
        }
    }

    Ok(ExitCode::SUCCESS)
}
