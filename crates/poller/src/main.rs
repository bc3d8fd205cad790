use clap::Parser;

use herald_common::config::AppConfig;
use herald_poller::poller::ReviewPoller;

/// Relay freshly updated review requests from the tracker to the chat webhook.
#[derive(Debug, Parser)]
#[command(name = "herald-poller", version, about)]
struct Cli {
    /// Incoming-webhook authentication token
    webhook_token: String,
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    // Initialize tracing
    tracing_subscriber::fmt()
        .with_env_filter(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| "herald_poller=info,herald_notifier=info,herald_common=info".into()),
        )
        .json()
        .init();

    let cli = Cli::parse();

    tracing::info!("ReviewHerald poller starting...");

    // Load configuration
    let config = AppConfig::from_env(cli.webhook_token)?;

    // Initial fetch, watermark seeding, allowlist load — fatal on failure
    let mut poller = ReviewPoller::initialize(&config).await?;

    // Run with graceful shutdown on Ctrl+C
    tokio::select! {
        _ = poller.run() => {}
        _ = tokio::signal::ctrl_c() => {
            tracing::info!("Received shutdown signal, stopping gracefully...");
        }
    }

    tracing::info!("ReviewHerald poller stopped.");
    Ok(())
}
