//! CLI administration tool for shorten.
//!
//! Inspects mappings and checks the database without going through HTTP.
//!
//! # Usage
//!
//! ```bash
//! # Show a mapping by code
//! cargo run --bin admin -- show AbXyZq
//!
//! # Find the code assigned to a URL
//! cargo run --bin admin -- find https://example.com/very/long/path
//!
//! # Totals and most visited codes
//! cargo run --bin admin -- stats --top 5
//!
//! # Check database connection
//! cargo run --bin admin -- db check
//! ```
//!
//! # Environment Variables
//!
//! Uses the same database configuration as the server (`DATABASE_URL` or
//! the `DB_*` components).

use shorten::application::services::MappingService;
use shorten::config::{Config, mask_connection_string};
use shorten::domain::hit_event::HitEvent;
use shorten::domain::repositories::MappingRepository;
use shorten::error::AppError;
use shorten::infrastructure::persistence::PgMappingRepository;
use shorten::server::connect_pool;
use shorten::utils::code_generator::RandomCodeGenerator;

use anyhow::Result;
use clap::{Parser, Subcommand};
use colored::*;
use sqlx::PgPool;
use std::sync::Arc;
use tokio::sync::mpsc;

/// CLI tool for managing shorten.
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
    /// Show the mapping behind a code
    Show {
        /// Six-letter short code
        code: String,
    },

    /// Find the code assigned to a URL (exact match)
    Find {
        /// Original URL
        url: String,
    },

    /// Show totals and the most visited codes
    Stats {
        /// Number of codes to list
        #[arg(short, long, default_value_t = 10)]
        top: i64,
    },

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

#[tokio::main]
async fn main() -> Result<()> {
    dotenvy::dotenv().ok();

    let cli = Cli::parse();

    let config = Config::from_env()?;
    let pool = connect_pool(&config).await?;

    match cli.command {
        Commands::Show { code } => handle_show(&pool, &code).await?,
        Commands::Find { url } => handle_find(&pool, &url).await?,
        Commands::Stats { top } => handle_stats(&pool, top).await?,
        Commands::Db { action } => handle_db_action(action, &pool, &config).await?,
    }

    Ok(())
}

/// Builds a read-only service; lookups never enqueue hits, so the receiver is dropped.
fn mapping_service(pool: &PgPool) -> MappingService {
    let repository = Arc::new(PgMappingRepository::new(Arc::new(pool.clone())));
    let (hit_tx, _) = mpsc::channel::<HitEvent>(1);
    MappingService::new(repository, Arc::new(RandomCodeGenerator::from_time()), hit_tx)
}

/// Prints every field of a mapping.
async fn handle_show(pool: &PgPool, code: &str) -> Result<()> {
    let service = mapping_service(pool);

    match service.get_mapping(code).await {
        Ok(mapping) => {
            println!("{}", "🔗 Mapping".bright_blue().bold());
            println!();
            println!("  Code:    {}", mapping.code.cyan().bold());
            println!("  URL:     {}", mapping.url.bright_white());
            println!(
                "  Created: {}",
                mapping.created_at.to_rfc3339().bright_black()
            );
            println!("  Author:  {}", mapping.author.bright_black());
            println!(
                "  Hits:    {}",
                mapping.hits.to_string().bright_green().bold()
            );
            println!();
        }
        Err(AppError::NotFound { .. }) => {
            println!("{}", format!("❌ No mapping for code '{code}'").red());
        }
        Err(e) => return Err(anyhow::anyhow!("Database error: {}", e)),
    }

    Ok(())
}

/// Looks up the code for an exact URL.
async fn handle_find(pool: &PgPool, url: &str) -> Result<()> {
    let repository = PgMappingRepository::new(Arc::new(pool.clone()));

    let code = repository
        .find_by_url(url.trim())
        .await
        .map_err(|e| anyhow::anyhow!("Database error: {}", e))?;

    match code {
        Some(code) => println!("{} {}", "✅".green(), code.cyan().bold()),
        None => println!("{}", "❌ URL has not been shortened".red()),
    }

    Ok(())
}

/// Displays mapping totals and the most visited codes.
async fn handle_stats(pool: &PgPool, top: i64) -> Result<()> {
    println!("{}", "📊 Statistics".bright_blue().bold());
    println!();

    let (mappings, hits): (i64, i64) =
        sqlx::query_as("SELECT COUNT(*), COALESCE(SUM(hits), 0)::BIGINT FROM urls")
            .fetch_one(pool)
            .await?;

    println!(
        "  Mappings: {}",
        mappings.to_string().bright_green().bold()
    );
    println!("  Hits:     {}", hits.to_string().bright_green().bold());
    println!();

    let rows: Vec<(String, i64, String)> =
        sqlx::query_as("SELECT code, hits, url FROM urls ORDER BY hits DESC, code LIMIT $1")
            .bind(top.max(0))
            .fetch_all(pool)
            .await?;

    if !rows.is_empty() {
        println!("{}", "  Most visited:".bright_white());
        for (code, hits, url) in rows {
            println!(
                "    {}  {:>8}  {}",
                code.cyan(),
                hits.to_string().bright_green(),
                url.bright_black()
            );
        }
        println!();
    }

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

            println!(
                "  Connection: {}",
                mask_connection_string(&config.database_url).bright_white()
            );
            println!("  PostgreSQL: {}", version.bright_white());
            println!();
        }
    }

    Ok(())
}
