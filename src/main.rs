//! Gleaner main entry point
//!
//! This is the command-line interface for the Gleaner crawler and
//! knowledge store.

use anyhow::{Context, Result};
use clap::{Parser, Subcommand};
use gleaner::config::{load_config_with_hash, Config};
use gleaner::output::{print_statistics, print_store_statistics};
use gleaner::url::UrlFilter;
use gleaner::{AugmentationComposer, FrontierManager, KnowledgeStore};
use std::path::PathBuf;
use tracing_subscriber::EnvFilter;

/// Gleaner: a polite crawler feeding a searchable knowledge store
///
/// Gleaner crawls websites breadth-first while respecting robots.txt and
/// request delays, stores page text in a deduplicated knowledge store, and
/// composes context-augmented prompts from the best-matching documents.
#[derive(Parser, Debug)]
#[command(name = "gleaner")]
#[command(version)]
#[command(about = "A polite crawler feeding a searchable knowledge store", long_about = None)]
struct Cli {
    /// Path to TOML configuration file
    #[arg(value_name = "CONFIG")]
    config: PathBuf,

    /// Increase logging verbosity (-v, -vv, -vvv)
    #[arg(short, long, action = clap::ArgAction::Count, global = true)]
    verbose: u8,

    /// Suppress non-error output
    #[arg(short, long, conflicts_with = "verbose", global = true)]
    quiet: bool,

    #[command(subcommand)]
    command: Command,
}

#[derive(Subcommand, Debug)]
enum Command {
    /// Crawl from seed URLs and add the pages to the knowledge store
    Crawl {
        /// Seed URLs (depth 0)
        #[arg(value_name = "SEED", required = true)]
        seeds: Vec<String>,
    },

    /// Compose an augmented prompt for a query
    Query {
        /// Query text
        #[arg(value_name = "TEXT")]
        text: String,

        /// Number of documents to retrieve (defaults to retrieval.top-k)
        #[arg(long)]
        top_k: Option<usize>,

        /// Print the full result as JSON
        #[arg(long)]
        json: bool,
    },

    /// Show knowledge store statistics
    Stats,

    /// Validate the configuration and show the effective settings
    Check,
}

#[tokio::main]
async fn main() -> Result<()> {
    let cli = Cli::parse();

    // Setup logging based on verbosity
    setup_logging(cli.verbose, cli.quiet);

    tracing::info!("Loading configuration from: {}", cli.config.display());
    let (config, config_hash) = load_config_with_hash(&cli.config)
        .with_context(|| format!("Failed to load configuration {}", cli.config.display()))?;
    tracing::info!("Configuration loaded successfully (hash: {})", config_hash);

    match cli.command {
        Command::Crawl { seeds } => handle_crawl(config, &config_hash, seeds).await,
        Command::Query { text, top_k, json } => handle_query(&config, &text, top_k, json),
        Command::Stats => handle_stats(&config),
        Command::Check => handle_check(&config, &config_hash),
    }
}

/// Sets up the logging/tracing subscriber based on verbosity level
fn setup_logging(verbose: u8, quiet: bool) {
    let filter = if quiet {
        // Only show errors
        EnvFilter::new("error")
    } else {
        match verbose {
            0 => EnvFilter::new("gleaner=info,warn"),
            1 => EnvFilter::new("gleaner=debug,info"),
            2 => EnvFilter::new("gleaner=trace,debug"),
            _ => EnvFilter::new("trace"),
        }
    };

    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_target(false)
        .with_thread_ids(false)
        .with_file(false)
        .init();
}

/// Crawls the seeds, stores the results and saves the snapshot
async fn handle_crawl(config: Config, config_hash: &str, seeds: Vec<String>) -> Result<()> {
    let filter = config.build_filter()?;
    let mut store = KnowledgeStore::open(&config.store).with_context(|| {
        format!(
            "Failed to open knowledge store {}",
            config.store.path.display()
        )
    })?;
    tracing::info!("Knowledge store holds {} documents", store.len());

    let mut frontier = FrontierManager::new(config.crawler.clone())?;
    frontier.set_document_metadata("config_hash", config_hash);

    let stop = frontier.stop_handle();
    tokio::spawn(async move {
        if tokio::signal::ctrl_c().await.is_ok() {
            tracing::warn!("Interrupt received, stopping after the current page");
            stop.stop();
        }
    });

    let stats = frontier
        .crawl_and_store(
            &seeds,
            &mut store,
            filter.as_deref().map(|f| f as &dyn UrlFilter),
            config.retrieval.min_content_length,
        )
        .await;

    store
        .save()
        .with_context(|| format!("Failed to save {}", store.location().display()))?;

    print_statistics(&stats);
    Ok(())
}

/// Retrieves context for a query and prints the augmented prompt
fn handle_query(config: &Config, text: &str, top_k: Option<usize>, json: bool) -> Result<()> {
    let store = KnowledgeStore::open(&config.store)?;
    let top_k = top_k.unwrap_or(config.retrieval.top_k);

    let result = AugmentationComposer::new(&store).generate(text, top_k);

    if json {
        println!("{}", serde_json::to_string_pretty(&result)?);
    } else {
        println!("Retrieved {} documents", result.num_retrieved);
        for doc in &result.retrieved_documents {
            let source = doc
                .metadata
                .get("url")
                .and_then(|v| v.as_str())
                .unwrap_or("(no url)");
            println!("  - {} {}", doc.id, source);
        }
        println!("\n{}", result.augmented_prompt);
    }

    Ok(())
}

/// Shows statistics for the configured knowledge store
fn handle_stats(config: &Config) -> Result<()> {
    println!("Store: {}\n", config.store.path.display());

    let store = KnowledgeStore::open(&config.store)?;
    print_store_statistics(&store.statistics());

    Ok(())
}

/// Validates configuration and prints the effective settings
fn handle_check(config: &Config, config_hash: &str) -> Result<()> {
    config.build_filter()?;

    println!("=== Gleaner Configuration ===\n");

    println!("Crawler:");
    println!("  User agent: {}", config.crawler.user_agent);
    println!("  Delay: {}s", config.crawler.delay_seconds);
    println!("  Politeness scope: {:?}", config.crawler.politeness_scope);
    println!("  Max depth: {}", config.crawler.max_depth);
    println!("  Max pages: {}", config.crawler.max_pages);
    println!("  Respect robots.txt: {}", config.crawler.respect_robots_txt);
    println!("  Timeout: {}s", config.crawler.timeout_seconds);
    println!(
        "  Max robots crawl delay: {}s",
        config.crawler.max_crawl_delay_seconds
    );

    println!("\nStore:");
    println!("  Path: {}", config.store.path.display());
    println!("  Format: {:?}", config.store.format);

    println!("\nRetrieval:");
    println!("  Top k: {}", config.retrieval.top_k);
    println!(
        "  Min content length: {}",
        config.retrieval.min_content_length
    );

    println!(
        "\nFilter: {} domains, {} patterns",
        config.filter.allowed_domains.len(),
        config.filter.patterns.len()
    );

    println!("\n✓ Configuration is valid (hash: {})", config_hash);
    Ok(())
}
