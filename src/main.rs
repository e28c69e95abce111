//! kb-harvester main entry point
//!
//! This is the command-line interface for the kb-harvester content scraper.

use anyhow::{bail, Context};
use clap::{Parser, Subcommand, ValueEnum};
use kb_harvester::config::{load_config_with_hash, validate, Config, RendererBackend};
use kb_harvester::output::{print_crawl_report, write_crawl_summary, write_export, KnowledgeBaseExport};
use kb_harvester::pipeline::{Harvester, UrlMode};
use std::path::PathBuf;
use tracing_subscriber::EnvFilter;

/// kb-harvester: technical knowledge extraction
///
/// Scrapes blog posts, guides and PDF books into a knowledge-base JSON
/// document. Index pages are crawled and every discovered article is
/// extracted; single pages and PDFs are converted directly.
#[derive(Parser, Debug)]
#[command(name = "kb-harvester")]
#[command(version = "1.0.0")]
#[command(about = "Harvest technical content into a knowledge base", long_about = None)]
struct Cli {
    /// Path to TOML configuration file (defaults apply when omitted)
    #[arg(short, long, value_name = "CONFIG", global = true)]
    config: Option<PathBuf>,

    /// Increase logging verbosity (-v, -vv, -vvv)
    #[arg(short, long, action = clap::ArgAction::Count, global = true)]
    verbose: u8,

    /// Suppress non-error output
    #[arg(short, long, conflicts_with = "verbose", global = true)]
    quiet: bool,

    /// Page renderer, overriding the configured backend
    #[arg(long, value_enum, global = true)]
    backend: Option<Backend>,

    #[command(subcommand)]
    command: Command,
}

#[derive(Subcommand, Debug)]
enum Command {
    /// Scrape a web page, crawling it first if it is an index page
    Url {
        url: String,

        /// Always crawl the URL as an index page
        #[arg(long, conflicts_with = "single")]
        index: bool,

        /// Never crawl; extract just this page
        #[arg(long)]
        single: bool,

        /// Team id written into the export
        #[arg(long)]
        team_id: Option<String>,

        /// Write the JSON export to this file instead of stdout
        #[arg(short, long)]
        output: Option<PathBuf>,
    },

    /// Convert a PDF file or URL into knowledge items
    Pdf {
        #[arg(value_name = "PATH|URL")]
        input: String,

        /// Team id written into the export
        #[arg(long)]
        team_id: Option<String>,

        /// Emit one item per chapter instead of a single merged item
        #[arg(long)]
        split_chapters: bool,

        /// Write the JSON export to this file instead of stdout
        #[arg(short, long)]
        output: Option<PathBuf>,
    },

    /// Crawl from a URL and list the article URLs found
    Crawl {
        url: String,

        /// Number of BFS layers to fetch
        #[arg(long)]
        max_depth: Option<u32>,

        /// Also write a markdown crawl summary to this file
        #[arg(long)]
        summary: Option<PathBuf>,
    },

    /// Validate the configuration and print the effective settings
    CheckConfig,
}

#[derive(ValueEnum, Clone, Copy, Debug)]
enum Backend {
    Webdriver,
    Http,
}

impl From<Backend> for RendererBackend {
    fn from(backend: Backend) -> Self {
        match backend {
            Backend::Webdriver => RendererBackend::Webdriver,
            Backend::Http => RendererBackend::Http,
        }
    }
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    let cli = Cli::parse();

    // Setup logging based on verbosity
    setup_logging(cli.verbose, cli.quiet);

    let mut config = load(&cli)?;
    if let Some(backend) = cli.backend {
        config.browser.backend = backend.into();
    }

    match cli.command {
        Command::Url {
            url,
            index,
            single,
            team_id,
            output,
        } => {
            let mode = if index {
                UrlMode::Index
            } else if single {
                UrlMode::Single
            } else {
                UrlMode::Auto
            };
            handle_url(config, &url, mode, team_id, output).await
        }
        Command::Pdf {
            input,
            team_id,
            split_chapters,
            output,
        } => handle_pdf(config, &input, split_chapters, team_id, output).await,
        Command::Crawl {
            url,
            max_depth,
            summary,
        } => handle_crawl(config, &url, max_depth, summary).await,
        Command::CheckConfig => handle_check_config(&config),
    }
}

/// Sets up the logging/tracing subscriber based on verbosity level
///
/// Logs go to stderr so the JSON export on stdout stays clean.
fn setup_logging(verbose: u8, quiet: bool) {
    let filter = if quiet {
        // Only show errors
        EnvFilter::new("error")
    } else {
        match verbose {
            0 => EnvFilter::new("kb_harvester=info,warn"),
            1 => EnvFilter::new("kb_harvester=debug,info"),
            2 => EnvFilter::new("kb_harvester=trace,debug"),
            _ => EnvFilter::new("trace"),
        }
    };

    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(std::io::stderr)
        .with_target(false)
        .with_thread_ids(false)
        .with_file(false)
        .init();
}

/// Loads the configuration file, or the defaults when none is given
fn load(cli: &Cli) -> anyhow::Result<Config> {
    let Some(path) = &cli.config else {
        tracing::debug!("No configuration file given, using defaults");
        return Ok(Config::default());
    };

    tracing::info!("Loading configuration from: {}", path.display());
    let (config, hash) = load_config_with_hash(path)
        .with_context(|| format!("Failed to load configuration from {}", path.display()))?;
    tracing::info!("Configuration loaded successfully (hash: {})", hash);

    Ok(config)
}

fn resolve_team_id(config: &Config, team_id: Option<String>) -> String {
    team_id.unwrap_or_else(|| config.output.team_id.clone())
}

/// Handles the `url` command: scrape and export
async fn handle_url(
    config: Config,
    url: &str,
    mode: UrlMode,
    team_id: Option<String>,
    output: Option<PathBuf>,
) -> anyhow::Result<()> {
    let team_id = resolve_team_id(&config, team_id);
    let harvester = Harvester::new(config)?;

    let items = harvester
        .harvest_url(url, mode)
        .await
        .with_context(|| format!("Error during scraping of {}", url))?;

    let export = KnowledgeBaseExport::new(team_id, &items);
    write_export(&export, output.as_deref())?;

    tracing::info!("Exported {} items", export.len());
    Ok(())
}

/// Handles the `pdf` command: parse and export
async fn handle_pdf(
    config: Config,
    input: &str,
    split_chapters: bool,
    team_id: Option<String>,
    output: Option<PathBuf>,
) -> anyhow::Result<()> {
    let team_id = resolve_team_id(&config, team_id);
    let harvester = Harvester::new(config)?;

    let split = if split_chapters { Some(true) } else { None };
    let items = harvester
        .harvest_pdf(input, split)
        .await
        .with_context(|| format!("Failed to read PDF {}", input))?;

    if let Some(failed) = items.iter().find(|item| item.is_error()) {
        bail!("{}", failed.content());
    }

    let export = KnowledgeBaseExport::new(team_id, &items);
    write_export(&export, output.as_deref())?;

    tracing::info!("Exported {} items", export.len());
    Ok(())
}

/// Handles the `crawl` command: discover article URLs and print the report
async fn handle_crawl(
    config: Config,
    url: &str,
    max_depth: Option<u32>,
    summary: Option<PathBuf>,
) -> anyhow::Result<()> {
    let harvester = Harvester::new(config)?;

    let report = match harvester.crawl(url, max_depth).await {
        Ok(report) => report,
        Err(e) => {
            tracing::error!("Crawl failed: {}", e);
            return Err(e.into());
        }
    };

    print_crawl_report(&report);

    if let Some(path) = summary {
        write_crawl_summary(&report, url, &path)?;
        println!("\n✓ Summary exported to: {}", path.display());
    }

    Ok(())
}

/// Handles the `check-config` command: validates config and shows the effective settings
fn handle_check_config(config: &Config) -> anyhow::Result<()> {
    validate(config)?;

    println!("=== kb-harvester Configuration ===\n");

    println!("Crawler:");
    println!("  Max depth: {}", config.crawler.max_depth);
    println!("  Max pages: {}", config.crawler.max_pages);
    println!("  Filter links at: {:?}", config.crawler.filter_links_at);
    println!(
        "  Content patterns ({}): {}",
        config.crawler.content_patterns.len(),
        config.crawler.content_patterns.join(", ")
    );
    println!(
        "  Index patterns ({}): {}",
        config.crawler.index_patterns.len(),
        config.crawler.index_patterns.join(", ")
    );

    println!("\nBrowser:");
    println!("  Backend: {:?}", config.browser.backend);
    println!("  WebDriver URL: {}", config.browser.webdriver_url);
    println!("  Headless: {}", config.browser.headless);
    println!("  User agent: {}", config.browser.user_agent);
    println!(
        "  Navigation timeout: {}s (extraction: {}s)",
        config.browser.navigation_timeout_secs, config.browser.extract_navigation_timeout_secs
    );
    println!(
        "  Ready selector: {} (timeout: {}s)",
        config.browser.ready_selector, config.browser.ready_timeout_secs
    );

    println!("\nPDF:");
    println!("  Min chapter length: {}", config.pdf.min_chapter_length);
    println!("  Default author: {}", config.pdf.default_author);
    println!("  Split chapters: {}", config.pdf.split_chapters);

    println!("\nOutput:");
    println!("  Team id: {}", config.output.team_id);

    println!("\nClassification Rules ({}):", config.classification.len());
    for rule in &config.classification {
        println!("  - {} -> {}", rule.pattern, rule.content_type);
    }

    println!("\n✓ Configuration is valid");

    Ok(())
}
