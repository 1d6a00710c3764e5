//! poya-crawler - Poya catalog scraper CLI
//!
//! Fetches a query's catalog, scrapes per-product spec tables with a
//! bounded WebDriver pool, and writes the merged table to CSV.

use anyhow::Result;
use clap::{Parser, Subcommand};
use poya_crawler::commands::{ListCommand, ScrapeCommand};
use poya_crawler::config::Config;
use std::path::PathBuf;
use tracing::Level;
use tracing_subscriber::EnvFilter;

#[derive(Parser)]
#[command(
    name = "poya-crawler",
    version,
    about = "Poya catalog scraper with per-product spec extraction",
    long_about = "Fetches a search query's full product catalog from poyabuy.com.tw and enriches \
                  each product with the specification table from its detail page."
)]
struct Cli {
    /// Proxy URL (e.g., socks5://host:port)
    #[arg(long, global = true, env = "POYA_PROXY")]
    proxy: Option<String>,

    /// Delay between catalog page requests in milliseconds
    #[arg(long, global = true, env = "POYA_DELAY")]
    delay: Option<u64>,

    /// Path to config file
    #[arg(short, long, global = true)]
    config: Option<PathBuf>,

    /// Enable verbose logging
    #[arg(short, long, global = true)]
    verbose: bool,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Scrape the full catalog and export product specs to CSV
    #[command(alias = "s")]
    Scrape {
        /// Search query
        query: String,

        /// Concurrent browser sessions
        #[arg(short, long, env = "POYA_WORKERS")]
        workers: Option<usize>,

        /// Output directory (created if absent)
        #[arg(short, long)]
        output_dir: Option<PathBuf>,

        /// Output filename (.csv appended when missing)
        #[arg(short, long)]
        filename: Option<String>,

        /// Path to the WebDriver binary
        #[arg(long)]
        driver_path: Option<PathBuf>,

        /// Attach to an already-running WebDriver
        #[arg(long, env = "POYA_WEBDRIVER")]
        webdriver_url: Option<String>,
    },

    /// Fetch and print the product list without opening a browser
    #[command(alias = "l")]
    List {
        /// Search query
        query: String,
    },
}

#[tokio::main]
async fn main() -> Result<()> {
    let cli = Cli::parse();

    // Initialize logging
    let filter = if cli.verbose {
        EnvFilter::new(Level::DEBUG.to_string())
    } else {
        EnvFilter::from_default_env().add_directive(Level::WARN.into())
    };

    tracing_subscriber::fmt().with_env_filter(filter).with_target(false).init();

    // Load config with layered overrides
    let mut config = Config::load(cli.config.as_deref())?.with_env();

    // Apply CLI overrides
    if let Some(proxy) = cli.proxy {
        config.proxy = Some(proxy);
    }
    if let Some(delay) = cli.delay {
        config.delay_ms = delay;
    }

    match cli.command {
        Commands::Scrape { query, workers, output_dir, filename, driver_path, webdriver_url } => {
            if let Some(workers) = workers {
                config.max_workers = workers;
            }
            if let Some(dir) = output_dir {
                config.output_dir = dir;
            }
            if let Some(name) = filename {
                config.filename = Some(name);
            }
            if let Some(path) = driver_path {
                config.driver_path = Some(path);
            }
            if let Some(url) = webdriver_url {
                config.webdriver_url = Some(url);
            }

            let cmd = ScrapeCommand::new(config);
            let output = cmd.execute(&query).await?;
            println!("{}", output);
        }

        Commands::List { query } => {
            let cmd = ListCommand::new(config);
            let output = cmd.execute(&query).await?;
            println!("{}", output);
        }
    }

    Ok(())
}
