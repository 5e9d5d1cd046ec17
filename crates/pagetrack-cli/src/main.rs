//! pagetrack - terminal pager over a paginated item cache.
//!
//! Pages through a JSON array or a text file using `PageTracker`, with the
//! chosen page size remembered between runs.

mod command;
mod render;
mod source;

use anyhow::{Context, Result};
use clap::Parser;
use command::{Command, HELP};
use pagetrack::{
    DynPreferenceStore, GoToPageOptions, JsonFileStore, MemoryStore, PageTracker,
    PaginationOptions, SliceFetcher, SqliteStore, StoreConfig,
};
use std::path::PathBuf;
use std::sync::Arc;
use tokio::io::{AsyncBufReadExt, BufReader};
use tracing::{info, warn, Level};
use tracing_subscriber::FmtSubscriber;

#[derive(Parser, Debug)]
#[command(name = "pagetrack")]
#[command(about = "Page through a JSON array or text file")]
struct Args {
    /// File to page through (JSON array, or one item per line)
    file: PathBuf,

    /// Page to show first (1-based)
    #[arg(short, long, default_value = "1")]
    page: usize,

    /// Items per page (defaults to the remembered choice)
    #[arg(long)]
    per_page: Option<usize>,

    /// Pages returned by each fetch
    #[arg(long, default_value = "1")]
    prefetch_pages: usize,

    /// Number of page links in the footer
    #[arg(long)]
    pages_to_show: Option<usize>,

    /// Pagination options as a JSON file (flags override it)
    #[arg(long)]
    config: Option<PathBuf>,

    /// Remember the page size in this JSON file
    #[arg(long, conflicts_with = "sqlite")]
    prefs: Option<PathBuf>,

    /// Remember the page size in this SQLite database
    #[arg(long)]
    sqlite: Option<PathBuf>,

    /// Don't remember page size changes
    #[arg(long)]
    no_persist: bool,

    /// Read navigation commands from stdin
    #[arg(short, long)]
    interactive: bool,

    /// Print the page as JSON
    #[arg(long)]
    json: bool,

    /// Enable debug logging
    #[arg(short, long)]
    debug: bool,
}

#[tokio::main]
async fn main() -> Result<()> {
    let args = Args::parse();

    // Logs go to stderr so page output stays clean
    let log_level = if args.debug { Level::DEBUG } else { Level::INFO };
    FmtSubscriber::builder()
        .with_max_level(log_level)
        .with_target(false)
        .with_thread_ids(false)
        .with_writer(std::io::stderr)
        .compact()
        .init();

    let items = source::load_items(&args.file)?;
    info!("Paging {} items from {}", items.len(), args.file.display());

    let options = build_options(&args)?;
    let store = open_store(&args)?;
    let fetcher = SliceFetcher::new(items).with_prefetch_pages(args.prefetch_pages);

    let tracker = PageTracker::builder()
        .options(options)
        .fetcher(fetcher)
        .store(store)
        .build()
        .await?;

    if args.page > 1 {
        tracker
            .go_to_page(args.page - 1, GoToPageOptions::default())
            .await?;
    }

    print_page(&tracker, args.json)?;

    if args.interactive {
        run_interactive(&tracker, args.json).await?;
    }

    Ok(())
}

fn build_options(args: &Args) -> Result<PaginationOptions> {
    let mut options = match &args.config {
        Some(path) => PaginationOptions::from_json_file(path)
            .with_context(|| format!("Failed to load options from {}", path.display()))?,
        None => PaginationOptions::default(),
    };

    if let Some(per_page) = args.per_page {
        options.items_per_page = Some(per_page);
    }
    if let Some(pages_to_show) = args.pages_to_show {
        options.pages_to_show = pages_to_show;
    }
    if args.no_persist {
        options.persist_items_per_page = false;
    }

    Ok(options)
}

fn open_store(args: &Args) -> Result<DynPreferenceStore> {
    if let Some(path) = &args.sqlite {
        return Ok(Arc::new(SqliteStore::new(path)?));
    }
    if let Some(path) = &args.prefs {
        return Ok(Arc::new(JsonFileStore::new(path)));
    }

    match dirs::config_dir() {
        Some(dir) => Ok(Arc::new(JsonFileStore::new(
            dir.join("pagetrack").join(StoreConfig::JSON_FILENAME),
        ))),
        None => {
            warn!("No config directory; page size will not be remembered");
            Ok(Arc::new(MemoryStore::new()))
        }
    }
}

fn print_page(tracker: &PageTracker<String>, json: bool) -> Result<()> {
    let snapshot = tracker.snapshot();
    if json {
        println!("{}", serde_json::to_string_pretty(&snapshot)?);
    } else {
        print!("{}", render::render_page(&snapshot));
    }
    Ok(())
}

async fn run_interactive(tracker: &PageTracker<String>, json: bool) -> Result<()> {
    let mut lines = BufReader::new(tokio::io::stdin()).lines();
    eprintln!("{}", HELP);

    while let Some(line) = lines.next_line().await? {
        if line.trim().is_empty() {
            continue;
        }

        let command = match Command::parse(&line) {
            Ok(command) => command,
            Err(e) => {
                eprintln!("{}", e);
                continue;
            }
        };

        match command {
            Command::Quit => break,
            Command::Help => eprintln!("{}", HELP),
            other => match other.apply(tracker).await {
                Ok(()) => print_page(tracker, json)?,
                Err(e) => eprintln!("{}", e),
            },
        }
    }

    Ok(())
}
