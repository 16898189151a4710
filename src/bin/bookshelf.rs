//! CLI binary for bookshelf.

use std::path::PathBuf;

use bookshelf::{AppError, BookshelfConfig, SearchOptions, run_search};
use bookshelf_search::{CoverSize, SearchType};
use clap::Parser;
use tracing_subscriber::EnvFilter;

/// Search the Open Library catalog from the terminal.
#[derive(Parser)]
#[command(name = "bookshelf", version, about)]
struct Cli {
    /// Search terms.
    #[arg(required = true)]
    query: Vec<String>,

    /// Field to search in.
    #[arg(long, default_value = "title", value_parser = ["title", "author", "subject", "isbn", "publisher", "any"])]
    by: String,

    /// Maximum number of results to show.
    #[arg(short, long)]
    limit: Option<usize>,

    /// Resolve a verified cover URL for each result.
    #[arg(long)]
    covers: bool,

    /// Cover size (S, M or L).
    #[arg(long, value_parser = ["S", "M", "L", "s", "m", "l"])]
    size: Option<String>,

    /// Print results as JSON.
    #[arg(long)]
    json: bool,

    /// Path to TOML configuration file.
    #[arg(short, long)]
    config: Option<PathBuf>,
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    // stdout carries the results; diagnostics go to stderr.
    tracing_subscriber::fmt()
        .with_writer(std::io::stderr)
        .with_env_filter(
            EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| EnvFilter::new("bookshelf=info,bookshelf_search=info")),
        )
        .init();

    let cli = Cli::parse();

    let mut config = BookshelfConfig::load(cli.config.as_deref())?;
    if let Some(limit) = cli.limit {
        config.catalog.max_results = limit;
    }

    let options = SearchOptions {
        query: cli.query.join(" "),
        search_type: SearchType::parse(&cli.by),
        covers: cli.covers,
        cover_size: cli
            .size
            .as_deref()
            .map(parse_size)
            .unwrap_or(config.display.cover_size),
        json: cli.json,
        show_progress: config.display.show_progress && !cli.json,
    };

    match run_search(&options, &config.catalog).await {
        Ok(output) => {
            print!("{output}");
            if cli.json {
                println!();
            }
            Ok(())
        }
        Err(err @ AppError::Catalog(_)) => {
            tracing::warn!(error = %err, "search failed");
            eprintln!("{}", err.user_message());
            std::process::exit(1);
        }
        Err(err) => Err(err.into()),
    }
}

fn parse_size(raw: &str) -> CoverSize {
    match raw.to_ascii_uppercase().as_str() {
        "S" => CoverSize::S,
        "L" => CoverSize::L,
        _ => CoverSize::M,
    }
}
