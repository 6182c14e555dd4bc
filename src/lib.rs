pub mod catalog;
pub mod cli;
pub mod config;
pub mod dashboard;
pub mod ledger;
pub mod models;
pub mod stats;
pub mod storage;

pub use config::{AppConfig, Workspace};
pub use dashboard::Dashboard;
pub use ledger::Ledger;
pub use models::{LedgerEntry, MovieId};
pub use stats::{compute_stats, WatchStats};
pub use storage::LocalStore;

use anyhow::{Context, Result};
use std::collections::HashSet;
use std::sync::Arc;

use catalog::{CatalogError, TmdbCatalog};
use cli::{Cli, Command};
use ledger::ConfirmedTransition;

#[tokio::main]
pub async fn run(cli: Cli) -> Result<()> {
    // Initialize logging (reads RUST_LOG env var)
    env_logger::Builder::from_default_env()
        .filter_level(log::LevelFilter::Info)
        .init();

    log::info!("cinetrack starting up...");

    let data_dir = match cli.data_dir.clone() {
        Some(dir) => dir,
        None => config::default_data_dir()?,
    };
    std::fs::create_dir_all(&data_dir)
        .with_context(|| format!("Failed to create data directory {}", data_dir.display()))?;

    let config_path = data_dir.join("config.json");
    let first_run = !config_path.exists();
    let mut config = AppConfig::load(&config_path)?;
    if first_run {
        config.persist(&config_path)?;
        log::info!("Wrote default config to {}", config_path.display());
    }
    if cli.p2p {
        config.workspace = Workspace::PeerToPeer;
    }
    if let Some(key) = cli.api_key.clone() {
        config.api_key = Some(key);
    }
    if config.api_key.is_none() {
        config.api_key = std::env::var("TMDB_API_KEY").ok();
    }

    let store = Arc::new(LocalStore::new(data_dir)?);
    let ledger = Ledger::new(Arc::clone(&store), config.workspace);
    let dashboard = Dashboard::attach(&store, config.workspace);
    log::info!("Using ledger key '{}'", ledger.storage_key());

    let catalog = |config: &AppConfig| -> Result<TmdbCatalog> {
        let api_key = config
            .api_key
            .clone()
            .context("No TMDB API key configured (config.json, TMDB_API_KEY, or --api-key)")?;
        Ok(TmdbCatalog::new(api_key, config.language.clone()))
    };

    match cli.command {
        Command::Search { query, check_first } => {
            let catalog = catalog(&config)?;
            let query = query.join(" ");

            cli::print_stats(&dashboard.snapshot());
            println!();

            let results = catalog.search(&query).await?;
            let genres = match catalog.genres().await {
                Ok(map) => map,
                Err(e) => {
                    log::warn!("Failed to load genres: {}", e);
                    Default::default()
                }
            };
            let countries = match catalog.countries().await {
                Ok(list) => list,
                Err(e) => {
                    log::warn!("Failed to load countries: {}", e);
                    Vec::new()
                }
            };

            let checked = ledger.load_checked_map();
            let pending: HashSet<MovieId> = ledger
                .entries()
                .iter()
                .filter(|e| !e.confirmed)
                .map(|e| e.movie_id)
                .collect();

            if results.is_empty() {
                println!("No results.");
            } else {
                println!("{} results\n", results.len());
            }
            for movie in &results {
                cli::print_movie(
                    movie,
                    &genres,
                    &countries,
                    checked.contains(&movie.id),
                    pending.contains(&movie.id),
                );
            }

            if check_first {
                if let Some(first) = results.first() {
                    ledger.toggle_confirmed(first.id, &first.title, true)?;
                    println!("Marked '{}' as watched", first.title);
                    cli::print_stats(&dashboard.snapshot());
                }
            }
        }
        Command::Check { id, off } => {
            let checked = !off;
            let title = match ledger.entries().iter().find(|e| e.movie_id == id) {
                Some(entry) => entry.title.clone(),
                None => catalog(&config)?.movie(id).await?.title,
            };

            let outcome = ledger.toggle_confirmed(id, &title, checked)?;
            match outcome.transition {
                ConfirmedTransition::Inserted => println!("Marked '{}' as watched", title),
                ConfirmedTransition::ConfirmedRemoved | ConfirmedTransition::EntryRemoved => {
                    println!("Unmarked '{}'", title)
                }
            }
            cli::print_stats(&dashboard.snapshot());
        }
        Command::Sub { id } => {
            let has_pending = ledger
                .entries()
                .iter()
                .any(|e| e.movie_id == id && !e.confirmed);
            let title = if has_pending {
                None
            } else {
                match catalog(&config)?.movie(id).await {
                    Ok(details) => Some(details.title),
                    Err(CatalogError::NotFound) => None,
                    Err(e) => return Err(e.into()),
                }
            };

            let outcome = ledger.toggle_subtitled(id, |_| title.clone())?;
            if outcome.pending {
                println!("Flagged movie {} for subtitles", id);
            } else {
                println!("Cleared the subtitle flag for movie {}", id);
            }
            cli::print_stats(&dashboard.snapshot());
        }
        Command::Stats => {
            cli::print_stats(&dashboard.snapshot());
        }
        Command::List => {
            cli::print_entries(&ledger.entries());
        }
    }

    Ok(())
}
