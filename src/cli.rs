use clap::{Parser, Subcommand};
use std::collections::HashMap;
use std::path::PathBuf;

use crate::catalog::poster_url;
use crate::models::{Country, LedgerEntry, MovieSummary};
use crate::stats::WatchStats;

#[derive(Parser)]
#[command(name = env!("CARGO_PKG_NAME"))]
#[command(version = env!("CARGO_PKG_VERSION"))]
#[command(about = env!("CARGO_PKG_DESCRIPTION"))]
pub struct Cli {
    /// Work against the peer-to-peer watchlist instead of the main one
    #[arg(long, global = true)]
    pub p2p: bool,

    /// TMDB API key (overrides the config file and TMDB_API_KEY)
    #[arg(long, global = true)]
    pub api_key: Option<String>,

    /// Directory holding the ledgers and config
    #[arg(long, global = true)]
    pub data_dir: Option<PathBuf>,

    #[clap(subcommand)]
    pub command: Command,
}

#[derive(Subcommand, Clone)]
pub enum Command {
    /// Search the catalog by title, or by exact id when the query is all
    /// digits
    Search {
        /// Title words or a movie id
        query: Vec<String>,

        /// Mark the first result as watched right away
        #[arg(long)]
        check_first: bool,
    },
    /// Toggle the watched mark for a movie
    Check {
        /// Movie id
        id: u64,

        /// Leave the row unchecked for the rest of the session
        #[arg(long)]
        off: bool,
    },
    /// Toggle the subtitled flag for a movie
    Sub {
        /// Movie id
        id: u64,
    },
    /// Show the dashboard counters
    Stats,
    /// Print the ledger, newest first
    List,
}

pub fn print_stats(stats: &WatchStats) {
    println!(
        "Today: {}   Yesterday: {}   Week: {}   Month: {}   Last month: {}   Total: {}",
        stats.today, stats.yesterday, stats.week, stats.month, stats.last_month, stats.total
    );
}

pub fn print_movie(
    movie: &MovieSummary,
    genres: &HashMap<u64, String>,
    countries: &[Country],
    checked: bool,
    pending: bool,
) {
    let mark = if checked { "[x]" } else { "[ ]" };
    let leg = if pending { "  LEG" } else { "" };
    println!("{} {} (id {}){}", mark, movie.title, movie.id, leg);

    let release = movie
        .release_date
        .as_deref()
        .filter(|d| !d.is_empty())
        .map(format_release_date)
        .unwrap_or_else(|| "unknown".to_string());
    let genre_names: Vec<String> = movie
        .genre_ids
        .iter()
        .filter_map(|id| genres.get(id).cloned())
        .collect();
    if genre_names.is_empty() {
        println!("    Release: {}", release);
    } else {
        println!("    Release: {}   Genres: {}", release, genre_names.join(", "));
    }

    if let Some(codes) = &movie.origin_country {
        if !codes.is_empty() {
            println!("    Origin: {}", country_names(codes, countries));
        }
    }
    if let Some(poster) = &movie.poster_path {
        println!("    Poster: {}", poster_url(poster));
    }
    if let Some(overview) = movie.overview.as_deref().filter(|o| !o.is_empty()) {
        println!("    {}", overview);
    }
    println!();
}

pub fn print_entries(entries: &[LedgerEntry]) {
    if entries.is_empty() {
        println!("Ledger is empty.");
        return;
    }
    for entry in entries {
        let tag = if entry.confirmed { "DUB" } else { "LEG" };
        println!(
            "{}  {:>9}  {}  {}",
            tag, entry.movie_id, entry.updated_at, entry.title
        );
    }
}

/// Catalog dates arrive as `YYYY-MM-DD`; rows display `DD/MM/YYYY`.
fn format_release_date(raw: &str) -> String {
    match chrono::NaiveDate::parse_from_str(raw, "%Y-%m-%d") {
        Ok(date) => date.format("%d/%m/%Y").to_string(),
        Err(_) => raw.to_string(),
    }
}

fn country_names(codes: &[String], countries: &[Country]) -> String {
    codes
        .iter()
        .map(|code| {
            countries
                .iter()
                .find(|c| &c.iso_3166_1 == code)
                .map(|c| c.english_name.clone())
                .unwrap_or_else(|| code.clone())
        })
        .collect::<Vec<_>>()
        .join("; ")
}
