use anyhow::{Context, Result};
use clap::Parser;
use std::path::PathBuf;
use tokio::sync::mpsc;

use drip::app::{build_http_client, App, AppEvent};
use drip::cache::OfflineCache;
use drip::config::Config;
use drip::digest::{export, ExportOptions};
use drip::storage::{Database, DatabaseError};
use drip::ui;

/// Get the config directory path (~/.config/drip/)
fn get_config_dir() -> Result<PathBuf> {
    let home = std::env::var("HOME").context("HOME environment variable not set")?;
    Ok(PathBuf::from(home).join(".config").join("drip"))
}

#[derive(Parser, Debug)]
#[command(
    name = "drip",
    about = "Terminal dashboard for coffee futures prices and industry news"
)]
struct Args {
    /// Run the digest exporter instead of the dashboard, writing news.json
    /// to FILE
    #[arg(
        long,
        value_name = "FILE",
        num_args = 0..=1,
        default_missing_value = "public/news.json"
    )]
    export: Option<PathBuf>,

    /// Exporter: widen the recency window from 24 hours to 7 days
    #[arg(long)]
    weekly: bool,

    /// Exporter: assemble the document but print it instead of writing
    #[arg(long)]
    dry_run: bool,

    /// Delete the offline cache database and start fresh
    #[arg(long)]
    reset_cache: bool,
}

#[tokio::main]
async fn main() -> Result<()> {
    // Initialize tracing for debug logging
    tracing_subscriber::fmt()
        .with_env_filter(tracing_subscriber::EnvFilter::from_default_env())
        .init();

    let args = Args::parse();

    // Set up config directory
    let config_dir = get_config_dir()?;
    if !config_dir.exists() {
        std::fs::create_dir_all(&config_dir).context("Failed to create config directory")?;
        println!("Created config directory: {}", config_dir.display());
    }

    // User-only access on Unix: the cache records reading habits
    #[cfg(unix)]
    {
        use std::os::unix::fs::PermissionsExt;
        match std::fs::metadata(&config_dir) {
            Ok(metadata) => {
                let mut perms = metadata.permissions();
                perms.set_mode(0o700);
                if let Err(e) = std::fs::set_permissions(&config_dir, perms) {
                    tracing::warn!(
                        path = %config_dir.display(),
                        error = %e,
                        "Failed to set config directory permissions to 0700"
                    );
                }
            }
            Err(e) => {
                tracing::warn!(
                    path = %config_dir.display(),
                    error = %e,
                    "Failed to read config directory metadata"
                );
            }
        }
    }

    let config_path = config_dir.join("config.toml");
    let db_path = config_dir.join("cache.db");

    let config = Config::load(&config_path).context("Failed to load configuration")?;

    // Handle --reset-cache flag
    if args.reset_cache && db_path.exists() {
        std::fs::remove_file(&db_path).context("Failed to delete cache database")?;
        println!("Offline cache reset.");
    }

    // Open the offline cache store
    let db_path_str = db_path
        .to_str()
        .ok_or_else(|| anyhow::anyhow!("Invalid UTF-8 in database path"))?;
    let db = match Database::open(db_path_str).await {
        Ok(db) => db,
        Err(DatabaseError::InstanceLocked) => {
            eprintln!(
                "Error: Another instance of drip appears to be running. Please close it and try again."
            );
            std::process::exit(1);
        }
        Err(e) => {
            return Err(anyhow::anyhow!("Failed to open cache database: {}", e));
        }
    };

    let client = build_http_client();
    let cache = OfflineCache::new(db, client.clone());

    // Service-worker lifecycle at startup: install the precache list for
    // the current version, then sweep every other version.
    cache.install(&config.precache).await;
    cache
        .activate()
        .await
        .context("Failed to sweep stale cache versions")?;

    // Headless export mode
    if let Some(output) = args.export {
        let options = ExportOptions {
            weekly: args.weekly,
            dry_run: args.dry_run,
            output,
        };
        let outcome = export(&client, &cache, &config, &options)
            .await
            .context("Export failed")?;

        match outcome.written {
            Some(path) => println!(
                "Exported {} articles to {}",
                outcome.document.articles.len(),
                path.display()
            ),
            None => {
                println!("{}", serde_json::to_string_pretty(&outcome.document)?);
            }
        }
        return Ok(());
    }

    // Dashboard mode
    let mut app = App::new(config, cache, client);

    let (event_tx, event_rx) = mpsc::channel::<AppEvent>(32);

    ui::run(&mut app, event_tx, event_rx).await?;

    println!("Goodbye!");
    Ok(())
}
