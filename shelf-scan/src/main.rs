//! shelf-scan - personal book catalog
//!
//! Turns a scanned barcode into a stored book record: normalize the code,
//! look the ISBN up in Open Library, fall back to manual entry when the
//! catalog has nothing, and upsert the result into the local database.

use anyhow::Result;
use clap::{Args, Parser, Subcommand};
use shelf_common::config::{RootFolderInitializer, RootFolderResolver, TomlConfig};
use shelf_common::{BookStore, SortOrder};
use shelf_scan::models::{ManualEntryForm, ReadingAction};
use shelf_scan::render::format_record;
use shelf_scan::{OpenLibraryClient, ReconcileError, ReconciliationOrchestrator, ScanOutcome};
use std::io::{BufRead, IsTerminal, Write};
use std::path::PathBuf;
use std::sync::Arc;
use tracing::{error, info};
use tracing_subscriber::EnvFilter;

#[derive(Debug, Parser)]
#[command(name = "shelf-scan", version, about = "Scan books into a local catalog")]
struct Cli {
    /// Folder holding shelf.db (overrides SHELF_ROOT_FOLDER and the config file)
    #[arg(long, global = true)]
    root_folder: Option<PathBuf>,

    /// Path to the TOML config file
    #[arg(long, global = true)]
    config: Option<PathBuf>,

    #[command(subcommand)]
    command: Command,
}

#[derive(Debug, Subcommand)]
enum Command {
    /// Resolve a scanned barcode and save the book
    Scan {
        /// Raw scanned code (EAN-13, EAN-8, UPC-A, UPC-E or ISBN text)
        code: String,
        #[command(flatten)]
        manual: ManualFields,
    },
    /// Save a book from manual details, skipping the catalog
    Add {
        isbn: String,
        #[command(flatten)]
        manual: ManualFields,
    },
    /// List stored books
    List {
        /// Sort key: title or author
        #[arg(long, default_value = "title")]
        order_by: String,
    },
    /// Cycle reading status (pending → reading → finished)
    Status { id: i64 },
    /// Advance reading progress by 10%
    Progress { id: i64 },
    /// Add one star to the rating
    Rate { id: i64 },
    /// Print every stored record as JSON
    Dump,
}

/// Manual-entry fields supplied on the command line
#[derive(Debug, Clone, Default, Args)]
struct ManualFields {
    #[arg(long)]
    title: Option<String>,
    #[arg(long)]
    author: Option<String>,
    #[arg(long)]
    publisher: Option<String>,
    /// Publication year
    #[arg(long)]
    year: Option<String>,
}

impl ManualFields {
    fn is_empty(&self) -> bool {
        self.title.is_none() && self.author.is_none() && self.publisher.is_none() && self.year.is_none()
    }

    fn into_form(self, isbn: String) -> ManualEntryForm {
        ManualEntryForm {
            isbn,
            title: self.title.unwrap_or_default(),
            author: self.author.unwrap_or_default(),
            publisher: self.publisher.unwrap_or_default(),
            published_year: self.year.unwrap_or_default(),
        }
    }
}

#[tokio::main]
async fn main() -> Result<()> {
    let cli = Cli::parse();
    let config = TomlConfig::load_or_default(cli.config.as_deref());

    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| EnvFilter::new(&config.logging.level)),
        )
        .with_writer(std::io::stderr)
        .init();

    info!(
        "Starting shelf-scan v{} [{}] built {} ({})",
        env!("CARGO_PKG_VERSION"),
        env!("GIT_HASH"),
        env!("BUILD_TIMESTAMP"),
        env!("BUILD_PROFILE")
    );

    let root_folder = RootFolderResolver::new()
        .with_cli_arg(cli.root_folder.clone())
        .with_toml_config(&config)
        .resolve();

    let initializer = RootFolderInitializer::new(root_folder);
    initializer.ensure_directory_exists()?;

    let db_path = initializer.database_path();
    info!("Database: {}", db_path.display());

    let store = BookStore::open(&db_path).await?;
    let resolver = Arc::new(OpenLibraryClient::new(&config.catalog)?);
    let mut orchestrator = ReconciliationOrchestrator::new(&store, resolver);

    let result = run(cli.command, &store, &mut orchestrator).await;
    drop(orchestrator);
    store.close().await;
    result
}

async fn run(
    command: Command,
    store: &BookStore,
    orchestrator: &mut ReconciliationOrchestrator<'_>,
) -> Result<()> {
    match command {
        Command::Scan { code, manual } => {
            let outcome = orchestrator.handle_scan(&code).await.map_err(report)?;
            finish_outcome(orchestrator, outcome, manual).await
        }
        Command::Add { isbn, manual } => {
            let outcome = orchestrator.begin_manual_entry(&isbn).map_err(report)?;
            finish_outcome(orchestrator, outcome, manual).await
        }
        Command::List { order_by } => {
            let records = store.list(SortOrder::from_param(&order_by)).await?;
            if records.is_empty() {
                println!("No books yet.");
            }
            for record in &records {
                println!("{}", format_record(record));
            }
            Ok(())
        }
        Command::Status { id } => reading_action(orchestrator, id, ReadingAction::CycleStatus).await,
        Command::Progress { id } => {
            reading_action(orchestrator, id, ReadingAction::AdvanceProgress).await
        }
        Command::Rate { id } => {
            reading_action(orchestrator, id, ReadingAction::IncrementRating).await
        }
        Command::Dump => {
            let records = store.list(SortOrder::Title).await?;
            println!("{}", serde_json::to_string_pretty(&records)?);
            Ok(())
        }
    }
}

/// Print the outcome, completing a manual entry if one was requested
async fn finish_outcome(
    orchestrator: &mut ReconciliationOrchestrator<'_>,
    outcome: ScanOutcome,
    manual: ManualFields,
) -> Result<()> {
    println!("{}", outcome.message());

    let form = match outcome {
        ScanOutcome::NeedsManualEntry { form, .. } => form,
        ScanOutcome::Saved { id, .. } => {
            println!("Record id: {}", id);
            return Ok(());
        }
        ScanOutcome::InvalidCode { .. } => return Ok(()),
    };

    let filled = if !manual.is_empty() {
        manual.into_form(form.isbn)
    } else if std::io::stdin().is_terminal() {
        prompt_manual_fields(form)?
    } else {
        orchestrator.cancel_manual();
        println!("No manual details given; nothing saved.");
        return Ok(());
    };

    let saved = orchestrator.submit_manual(filled).await.map_err(report)?;
    println!("{}", saved.message());
    if let ScanOutcome::Saved { id, .. } = saved {
        println!("Record id: {}", id);
    }
    Ok(())
}

async fn reading_action(
    orchestrator: &mut ReconciliationOrchestrator<'_>,
    id: i64,
    action: ReadingAction,
) -> Result<()> {
    match orchestrator.apply_reading_action(id, action).await.map_err(report)? {
        Some(record) => println!("{}", format_record(&record)),
        None => println!("No book with id {}.", id),
    }
    Ok(())
}

fn prompt_manual_fields(mut form: ManualEntryForm) -> std::io::Result<ManualEntryForm> {
    println!("Manual entry for ISBN {} (leave blank to skip a field)", form.isbn);

    let stdin = std::io::stdin();
    let read_field = |label: &str| -> std::io::Result<String> {
        print!("{}: ", label);
        std::io::stdout().flush()?;
        let mut line = String::new();
        stdin.lock().read_line(&mut line)?;
        Ok(line.trim_end().to_string())
    };

    form.title = read_field("Title")?;
    form.author = read_field("Author")?;
    form.publisher = read_field("Publisher")?;
    form.published_year = read_field("Year")?;

    Ok(form)
}

/// Log the full error and hand back the user-facing message
fn report(e: ReconcileError) -> anyhow::Error {
    error!("{}", e);
    anyhow::anyhow!(e.user_message())
}
