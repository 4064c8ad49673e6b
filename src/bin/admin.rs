//! CLI administration tool for tinylink.
//!
//! Provides commands for inspecting and removing links, viewing statistics,
//! and checking the database without going through the HTTP API.
//!
//! # Usage
//!
//! ```bash
//! # List the newest links, optionally filtered
//! cargo run --bin admin -- links list --search docs --limit 20
//!
//! # Show one link with its visit statistics
//! cargo run --bin admin -- links show promo24
//!
//! # Delete a link (asks for confirmation)
//! cargo run --bin admin -- links delete promo24
//!
//! # View statistics
//! cargo run --bin admin -- stats
//!
//! # Check database connection
//! cargo run --bin admin -- db check
//! ```
//!
//! # Environment Variables
//!
//! - `DATABASE_URL`: PostgreSQL connection string, or
//! - `DB_HOST`, `DB_PORT`, `DB_USER`, `DB_PASSWORD`, `DB_NAME` as with the server

use tinylink::config;
use tinylink::domain::entities::{Link, LinkFilter};
use tinylink::domain::repositories::LinkRepository;
use tinylink::infrastructure::persistence::PgLinkRepository;

use anyhow::{Context, Result};
use clap::{Parser, Subcommand};
use colored::*;
use dialoguer::Confirm;
use sqlx::PgPool;
use std::sync::Arc;

/// CLI tool for managing tinylink.
#[derive(Parser)]
#[command(name = "admin")]
#[command(author, version, about, long_about = None)]
struct Cli {
    #[command(subcommand)]
    command: Commands,
}

/// Top-level command groups.
#[derive(Subcommand)]
enum Commands {
    /// Inspect and remove links
    Links {
        #[command(subcommand)]
        action: LinkAction,
    },

    /// Show statistics
    Stats,

    /// Database operations
    Db {
        #[command(subcommand)]
        action: DbAction,
    },
}

/// Link management subcommands.
#[derive(Subcommand)]
enum LinkAction {
    /// List links, newest first
    List {
        /// Case-insensitive substring of the code or target URL
        #[arg(short, long)]
        search: Option<String>,

        /// Maximum number of links to show
        #[arg(short, long, default_value_t = 25)]
        limit: i64,
    },

    /// Show one link with its visit statistics
    Show {
        /// Short code
        code: String,
    },

    /// Delete a link permanently
    Delete {
        /// Short code
        code: String,

        /// Skip confirmation prompt
        #[arg(short = 'y', long)]
        yes: bool,
    },
}

/// Database operation subcommands.
#[derive(Subcommand)]
enum DbAction {
    /// Check database connection
    Check,
}

#[tokio::main]
async fn main() -> Result<()> {
    dotenvy::dotenv().ok();

    let cli = Cli::parse();

    let database_url = config::database_url_from_env()?;

    let pool = PgPool::connect(&database_url)
        .await
        .context("Failed to connect to database")?;

    match cli.command {
        Commands::Links { action } => handle_link_action(action, &pool).await?,
        Commands::Stats => handle_stats(&pool).await?,
        Commands::Db { action } => handle_db_action(action, &pool).await?,
    }

    Ok(())
}

/// Dispatches link management commands.
async fn handle_link_action(action: LinkAction, pool: &PgPool) -> Result<()> {
    let repo = PgLinkRepository::new(Arc::new(pool.clone()));

    match action {
        LinkAction::List { search, limit } => list_links(&repo, search, limit).await?,
        LinkAction::Show { code } => show_link(&repo, &code).await?,
        LinkAction::Delete { code, yes } => delete_link(&repo, &code, yes).await?,
    }

    Ok(())
}

/// Lists links as a table.
///
/// ```text
/// 🔗 Links
///
///   Code      Clicks   Created            Target
///   ────────────────────────────────────────────────────────────────
///   promo24   12       2025-01-15 10:30   https://example.com/sale
/// ```
async fn list_links(repo: &PgLinkRepository, search: Option<String>, limit: i64) -> Result<()> {
    println!("{}", "🔗 Links".bright_blue().bold());
    println!();

    let filter = LinkFilter {
        search,
        offset: 0,
        limit: limit.clamp(1, 1000),
    };

    let links = repo
        .list(&filter)
        .await
        .map_err(|e| anyhow::anyhow!("Failed to list links: {}", e))?;
    let total = repo
        .count(&filter)
        .await
        .map_err(|e| anyhow::anyhow!("Failed to count links: {}", e))?;

    if links.is_empty() {
        println!("{}", "  No links found".yellow());
        return Ok(());
    }

    println!(
        "  {:<9} {:<8} {:<18} {}",
        "Code".bright_white().bold(),
        "Clicks".bright_white().bold(),
        "Created".bright_white().bold(),
        "Target".bright_white().bold()
    );
    println!("  {}", "─".repeat(75).bright_black());

    for link in &links {
        println!(
            "  {:<9} {:<8} {:<18} {}",
            link.code.cyan(),
            link.clicks.to_string().bright_green(),
            link.created_at
                .format("%Y-%m-%d %H:%M")
                .to_string()
                .bright_black(),
            link.target_url
        );
    }

    println!();
    println!(
        "  Showing {} of {}",
        links.len().to_string().bright_white().bold(),
        total.to_string().bright_white().bold()
    );
    println!();

    Ok(())
}

async fn find_link(repo: &PgLinkRepository, code: &str) -> Result<Link> {
    repo.find_by_code(code)
        .await
        .map_err(|e| anyhow::anyhow!("Database error: {}", e))?
        .with_context(|| format!("Link '{code}' not found"))
}

/// Prints one link with its visit statistics.
async fn show_link(repo: &PgLinkRepository, code: &str) -> Result<()> {
    let link = find_link(repo, code).await?;

    println!("{}", "🔗 Link".bright_blue().bold());
    println!();
    print_link(&link);
    println!();

    Ok(())
}

fn print_link(link: &Link) {
    let last_clicked = match link.last_clicked {
        Some(t) if link.has_visits() => t.format("%Y-%m-%d %H:%M:%S").to_string(),
        _ => "never".to_string(),
    };

    println!("  Code:         {}", link.code.cyan());
    println!("  Target:       {}", link.target_url.bright_white());
    println!("  Clicks:       {}", link.clicks.to_string().bright_green().bold());
    println!("  Last clicked: {}", last_clicked.bright_black());
    println!(
        "  Created:      {}",
        link.created_at
            .format("%Y-%m-%d %H:%M:%S")
            .to_string()
            .bright_black()
    );
}

/// Deletes a link after confirmation.
///
/// Deletion is permanent: the code becomes free for reuse.
async fn delete_link(repo: &PgLinkRepository, code: &str, skip_confirm: bool) -> Result<()> {
    println!("{}", "🗑️  Delete Link".bright_blue().bold());
    println!();

    let link = find_link(repo, code).await?;
    print_link(&link);
    println!();

    if !skip_confirm {
        let confirmed = Confirm::new()
            .with_prompt("Delete this link?")
            .default(false)
            .interact()?;

        if !confirmed {
            println!("{}", "❌ Cancelled".red());
            return Ok(());
        }
    }

    let deleted = repo
        .delete_by_code(code)
        .await
        .map_err(|e| anyhow::anyhow!("Failed to delete link: {}", e))?;

    println!();
    if deleted {
        println!("{}", "✅ Link deleted".green().bold());
    } else {
        println!("{}", "⚠️  Link was already gone".yellow());
    }
    println!();

    Ok(())
}

/// Displays system statistics.
///
/// Shows:
/// - Total number of links
/// - Total number of recorded visits
/// - The most-clicked link
async fn handle_stats(pool: &PgPool) -> Result<()> {
    println!("{}", "📊 Statistics".bright_blue().bold());
    println!();

    let links_count: i64 = sqlx::query_scalar("SELECT COUNT(*) FROM links")
        .fetch_one(pool)
        .await?;

    let clicks_count: i64 = sqlx::query_scalar("SELECT COALESCE(SUM(clicks), 0)::BIGINT FROM links")
        .fetch_one(pool)
        .await?;

    let top: Option<(String, i64)> =
        sqlx::query_as("SELECT code, clicks FROM links ORDER BY clicks DESC, id ASC LIMIT 1")
            .fetch_optional(pool)
            .await?;

    println!(
        "  Links:        {}",
        links_count.to_string().bright_green().bold()
    );
    println!(
        "  Clicks:       {}",
        clicks_count.to_string().bright_green().bold()
    );
    match top {
        Some((code, clicks)) => println!(
            "  Most clicked: {} ({} clicks)",
            code.cyan(),
            clicks.to_string().bright_green()
        ),
        None => println!("  Most clicked: {}", "-".bright_black()),
    }
    println!();

    Ok(())
}

/// Handles database diagnostic commands.
async fn handle_db_action(action: DbAction, pool: &PgPool) -> Result<()> {
    match action {
        DbAction::Check => {
            println!("{}", "🔍 Checking database connection...".bright_blue());

            sqlx::query("SELECT 1").fetch_one(pool).await?;

            let version: String = sqlx::query_scalar("SELECT version()")
                .fetch_one(pool)
                .await?;

            println!("{}", "✅ Database connection OK".green().bold());
            println!("  PostgreSQL: {}", version.bright_white());
        }
    }

    Ok(())
}
