use std::path::PathBuf;
use std::time::Duration;

use clap::Parser;
use tracing::{info, warn};

use token_keeper::cache::token_cache::TokenCache;
use token_keeper::config::loader::load_config;
use token_keeper::utils::logging::{self, LogLevel};

#[derive(Debug, Parser)]
#[command(name = "token-keeper", about = "Self-refreshing access token cache daemon")]
struct Args {
    /// Path to the YAML configuration file
    #[arg(short, long, env = "TOKEN_KEEPER_CONFIG", default_value = "config.yaml")]
    config: PathBuf,

    /// Override the configured log level
    #[arg(long, value_enum)]
    log_level: Option<LogLevel>,
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    let args = Args::parse();

    // 1. Load YAML config
    let cfg = load_config(&args.config)?;

    // 2. Initialize logging
    logging::run(&cfg, args.log_level);

    // 3. Build the cache; the initial fetch runs here
    let cache = TokenCache::from_config(&cfg).await?;
    match cache.get_token().await {
        Ok(_) => info!("initial token fetched"),
        Err(err) => warn!(error = %err, "initial token fetch failed, retrying in background"),
    }

    // 4. Report status until shutdown
    let mut status_interval =
        tokio::time::interval(Duration::from_secs(cfg.settings.status_interval_seconds));
    status_interval.tick().await; // first tick fires immediately

    loop {
        tokio::select! {
            _ = status_interval.tick() => {
                let status = cache.status().await;
                let refreshed_at = status
                    .refreshed_at
                    .map(|ts| ts.to_rfc3339())
                    .unwrap_or_default();
                match &status.last_error {
                    None => info!(%refreshed_at, "token available"),
                    Some(err) => warn!(%refreshed_at, error = %err, "token unavailable"),
                }
            }
            _ = tokio::signal::ctrl_c() => {
                info!("shutting down");
                cache.shutdown();
                break;
            }
        }
    }

    Ok(())
}
