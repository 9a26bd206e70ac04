//! CLI administration tool for short-urls.
//!
//! Provides commands for managing short URLs, viewing click counts, and
//! performing database operations without requiring HTTP API access.
//!
//! # Usage
//!
//! ```bash
//! # List all short URLs
//! cargo run --bin admin -- list
//!
//! # Create a short URL
//! cargo run --bin admin -- create https://www.cloudflare.com --slug cf
//!
//! # Delete a short URL and its clicks
//! cargo run --bin admin -- delete cf
//!
//! # Click count for the past week
//! cargo run --bin admin -- clicks cf --period 1_WEEK
//!
//! # Remove expired short URLs now
//! cargo run --bin admin -- sweep
//!
//! # Check database connection
//! cargo run --bin admin -- db check
//! ```
//!
//! # Environment Variables
//!
//! - `DATABASE_URL` or `POSTGRES_*`: PostgreSQL connection
//!
//! # Features
//!
//! - **Short URL Management**: Create, list, and delete short URLs
//! - **Click Counts**: Per-slug counts over the supported time windows
//! - **Database Tools**: Connection checks, info queries and manual sweeps
//! - **Interactive Prompts**: Confirmation before deleting
//! - **Colored Output**: Terminal-friendly formatting using `colored` crate

use short_urls::application::expiry_sweeper::ExpirySweeper;
use short_urls::application::services::{
    ClickService, CreationResult, DeleteResult, GetClicksResult, ShortUrlService,
};
use short_urls::config::{Config, mask_connection_string};
use short_urls::domain::clock::{Clock, SystemClock};
use short_urls::domain::entities::{ShortUrl, TimePeriod};
use short_urls::infrastructure::persistence::{PgClickRepository, PgShortUrlRepository};
use short_urls::server::connect_database;
use short_urls::utils::slug_generator::validate_custom_slug;

use anyhow::Result;
use chrono::{DateTime, Utc};
use clap::{Parser, Subcommand};
use colored::*;
use dialoguer::Confirm;
use sqlx::PgPool;
use std::sync::Arc;
use std::time::Duration;
use tokio::sync::mpsc;

/// CLI tool for managing short-urls.
#[derive(Parser)]
#[command(name = "admin")]
#[command(author, version, about, long_about = None)]
struct Cli {
    #[command(subcommand)]
    command: Commands,
}

/// Top-level commands.
#[derive(Subcommand)]
enum Commands {
    /// List all short URLs
    List,

    /// Create a short URL
    Create {
        /// Target URL (http or https)
        long_url: String,

        /// Custom slug (random if omitted)
        #[arg(short, long)]
        slug: Option<String>,

        /// Expiry timestamp, RFC 3339 (e.g. 2030-01-01T00:00:00Z)
        #[arg(short, long)]
        expires_on: Option<DateTime<Utc>>,
    },

    /// Delete a short URL and its clicks
    Delete {
        slug: String,

        /// Skip confirmation prompt
        #[arg(short = 'y', long)]
        yes: bool,
    },

    /// Show the click count of a short URL
    Clicks {
        slug: String,

        /// ALL_TIME, 1_WEEK or 24_HOURS
        #[arg(short, long, default_value = "ALL_TIME")]
        period: TimePeriod,
    },

    /// Delete expired short URLs once
    Sweep,

    /// Database operations
    Db {
        #[command(subcommand)]
        action: DbAction,
    },
}

/// Database operation subcommands.
#[derive(Subcommand)]
enum DbAction {
    /// Check database connection
    Check,

    /// Show database info
    Info,
}

/// Services wired over PostgreSQL.
struct Services {
    short_urls: ShortUrlService,
    clicks: ClickService,
    sweeper: ExpirySweeper,
    // Resolution is never called from the CLI; the receiver only keeps the
    // queue open.
    _click_rx: mpsc::Receiver<short_urls::domain::click_event::ClickEvent>,
}

impl Services {
    fn new(pool: PgPool) -> Self {
        let pool = Arc::new(pool);
        let clock: Arc<dyn Clock> = Arc::new(SystemClock);
        let short_url_repository = Arc::new(PgShortUrlRepository::new(pool.clone()));
        let click_repository = Arc::new(PgClickRepository::new(pool));
        let (click_tx, click_rx) = mpsc::channel(1);

        Self {
            short_urls: ShortUrlService::new(
                short_url_repository.clone(),
                clock.clone(),
                click_tx,
            ),
            clicks: ClickService::new(click_repository, clock.clone()),
            sweeper: ExpirySweeper::new(short_url_repository, clock, Duration::from_secs(5)),
            _click_rx: click_rx,
        }
    }
}

#[tokio::main]
async fn main() -> Result<()> {
    dotenvy::dotenv().ok();

    let cli = Cli::parse();

    let config = Config::from_env()?;
    let pool = connect_database(&config).await?;
    let services = Services::new(pool.clone());

    match cli.command {
        Commands::List => list_short_urls(&services).await?,
        Commands::Create {
            long_url,
            slug,
            expires_on,
        } => create_short_url(&services, long_url, slug, expires_on).await?,
        Commands::Delete { slug, yes } => delete_short_url(&services, &slug, yes).await?,
        Commands::Clicks { slug, period } => show_clicks(&services, &slug, period).await?,
        Commands::Sweep => sweep(&services).await?,
        Commands::Db { action } => handle_db_action(action, &pool, &config).await?,
    }

    Ok(())
}

/// Lists all short URLs, oldest first.
///
/// # Output Format
///
/// ```text
/// 📋 Short URLs
///
///   Slug         Long URL                                 Created           Expires
///   ──────────────────────────────────────────────────────────────────────────────────
///   cf           https://www.cloudflare.com               2024-01-15 10:30  never
/// ```
async fn list_short_urls(services: &Services) -> Result<()> {
    println!("{}", "📋 Short URLs".bright_blue().bold());
    println!();

    let short_urls = services.short_urls.list_short_urls().await?;

    if short_urls.is_empty() {
        println!("{}", "  No short URLs found".yellow());
        println!();
        println!(
            "  Create one with: {} admin create <long_url>",
            "cargo run --bin".bright_cyan()
        );
        return Ok(());
    }

    println!(
        "  {:<12} {:<40} {:<17} {:<17}",
        "Slug".bright_white().bold(),
        "Long URL".bright_white().bold(),
        "Created".bright_white().bold(),
        "Expires".bright_white().bold()
    );
    println!("  {}", "─".repeat(88).bright_black());

    let now = Utc::now();
    for short_url in &short_urls {
        println!(
            "  {:<12} {:<40} {:<17} {}",
            short_url.slug.cyan(),
            truncate(&short_url.long_url, 40),
            short_url
                .created_at
                .format("%Y-%m-%d %H:%M")
                .to_string()
                .bright_black(),
            expiry_label(short_url, now)
        );
    }

    println!();
    println!(
        "  Total: {}",
        short_urls.len().to_string().bright_white().bold()
    );
    println!();

    Ok(())
}

/// Creates a short URL, reporting whether it was new or already present.
async fn create_short_url(
    services: &Services,
    long_url: String,
    slug: Option<String>,
    expires_on: Option<DateTime<Utc>>,
) -> Result<()> {
    println!("{}", "🔗 Create Short URL".bright_blue().bold());
    println!();

    if let Some(ref slug) = slug {
        validate_custom_slug(slug)?;
    }

    match services
        .short_urls
        .create_short_url(long_url, slug, expires_on)
        .await?
    {
        CreationResult::Created(short_url) => {
            println!("{}", "✅ Short URL created".green().bold());
            print_short_url(&short_url);
        }
        CreationResult::AlreadyExists(short_url) => {
            println!("{}", "ℹ️  This long URL is already shortened".yellow());
            print_short_url(&short_url);
        }
        CreationResult::DuplicateSlug => {
            anyhow::bail!("Slug is already used by another long URL");
        }
        CreationResult::InvalidLongUrl(e) => {
            anyhow::bail!("Invalid long URL: {e}");
        }
    }

    Ok(())
}

/// Deletes a short URL after confirmation (default: No).
async fn delete_short_url(services: &Services, slug: &str, skip_confirm: bool) -> Result<()> {
    println!("{}", "🗑️  Delete Short URL".bright_blue().bold());
    println!();

    let Some(short_url) = services.short_urls.get_short_url(slug).await? else {
        anyhow::bail!("Short URL '{slug}' not found");
    };

    print_short_url(&short_url);

    if !skip_confirm {
        let confirmed = Confirm::new()
            .with_prompt("Delete this short URL and all its clicks?")
            .default(false)
            .interact()?;

        if !confirmed {
            println!("{}", "❌ Cancelled".red());
            return Ok(());
        }
    }

    match services.short_urls.delete_short_url(slug).await? {
        DeleteResult::Successful => {
            println!();
            println!("{}", "✅ Short URL deleted".green().bold());
            println!();
        }
        DeleteResult::NotFound => {
            println!("{}", "⚠️  Short URL was already gone".yellow());
        }
    }

    Ok(())
}

/// Shows the click count of a slug within `period`.
async fn show_clicks(services: &Services, slug: &str, period: TimePeriod) -> Result<()> {
    println!("{}", "📊 Clicks".bright_blue().bold());
    println!();

    match services.clicks.get_clicks(slug, period).await? {
        GetClicksResult::Successful { count } => {
            println!("  Slug:   {}", slug.cyan());
            println!("  Period: {}", period.to_string().bright_black());
            println!("  Clicks: {}", count.to_string().bright_green().bold());
            println!();
        }
        GetClicksResult::NotFound => {
            anyhow::bail!("Short URL '{slug}' not found");
        }
    }

    Ok(())
}

/// Runs one expiry sweep.
async fn sweep(services: &Services) -> Result<()> {
    println!("{}", "🧹 Sweeping expired short URLs...".bright_blue());

    let deleted = services.sweeper.sweep_once().await?;

    println!(
        "{} {}",
        "✅ Deleted:".green().bold(),
        deleted.to_string().bright_white().bold()
    );

    Ok(())
}

/// Handles database diagnostic commands.
async fn handle_db_action(action: DbAction, pool: &PgPool, config: &Config) -> Result<()> {
    match action {
        DbAction::Check => {
            println!("{}", "🔍 Checking database connection...".bright_blue());

            sqlx::query("SELECT 1").fetch_one(pool).await?;

            println!("{}", "✅ Database connection OK".green().bold());
        }
        DbAction::Info => {
            println!("{}", "ℹ️  Database Information".bright_blue().bold());
            println!();

            let version: String = sqlx::query_scalar("SELECT version()")
                .fetch_one(pool)
                .await?;

            let short_urls: i64 = sqlx::query_scalar("SELECT COUNT(*) FROM short_urls")
                .fetch_one(pool)
                .await?;

            let clicks: i64 = sqlx::query_scalar("SELECT COUNT(*) FROM clicks")
                .fetch_one(pool)
                .await?;

            if let Some(ref url) = config.database_url {
                println!("  Database:   {}", mask_connection_string(url).bright_black());
            }
            println!("  PostgreSQL: {}", version.bright_white());
            println!(
                "  Short URLs: {}",
                short_urls.to_string().bright_green().bold()
            );
            println!("  Clicks:     {}", clicks.to_string().bright_green().bold());
            println!();
        }
    }

    Ok(())
}

fn print_short_url(short_url: &ShortUrl) {
    println!();
    println!("  Slug:     {}", short_url.slug.cyan());
    println!("  Long URL: {}", short_url.long_url.bright_white());
    println!(
        "  Created:  {}",
        short_url
            .created_at
            .format("%Y-%m-%d %H:%M:%S")
            .to_string()
            .bright_black()
    );
    println!("  Expires:  {}", expiry_label(short_url, Utc::now()));
    println!();
}

fn expiry_label(short_url: &ShortUrl, now: DateTime<Utc>) -> ColoredString {
    match short_url.expires_on {
        None => "never".bright_black(),
        Some(_) if short_url.is_expired_at(now) => "expired".red(),
        Some(at) => at.format("%Y-%m-%d %H:%M").to_string().normal(),
    }
}

/// Shortens `s` to at most `max` characters, marking the cut with `…`.
fn truncate(s: &str, max: usize) -> String {
    if s.chars().count() <= max {
        return s.to_string();
    }
    let mut out: String = s.chars().take(max.saturating_sub(1)).collect();
    out.push('…');
    out
}
