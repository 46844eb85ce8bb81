//! Sova - Valorant statistics bot for Discord
//!
//! Answers chat commands with player and match data from the Henrik
//! Valorant API. Match ids are shortened to small numbers that persist in
//! a key-value store so users can refer back to them.

mod api;
mod commands;
mod common;
mod config;
mod discord;
mod shortener;
mod store;

use std::sync::Arc;

use anyhow::Result;
use tokio::signal;
use tokio::sync::watch;
use tracing::{error, info, warn};

use api::HenrikClient;
use commands::CommandHandler;
use config::{env::get_config_path, load_and_validate};
use discord::DiscordBotBuilder;
use shortener::Shortener;

#[tokio::main]
async fn main() -> Result<()> {
    // Initialize logging
    tracing_subscriber::fmt()
        .with_env_filter(
            tracing_subscriber::EnvFilter::from_default_env()
                .add_directive(tracing::Level::INFO.into()),
        )
        .init();

    info!("Sova v{} starting...", env!("CARGO_PKG_VERSION"));

    // Load configuration
    let config_path = get_config_path();
    info!("Loading configuration from {}...", config_path);

    let config = load_and_validate(&config_path).map_err(|e| {
        error!("Failed to load configuration: {}", e);
        error!("Please ensure {} exists and is properly formatted.", config_path);
        e
    })?;

    info!("Configuration loaded successfully");
    info!("  API: {}", config.api.base_url);
    info!("  Default region: {}", config.api.region);
    info!("  Store: {:?}", config.store.backend);
    info!("  Command prefix: {}", config.discord.prefix);
    if config.api.token.is_empty() {
        warn!("No Henrik API token configured - requests are limited to the anonymous rate");
    }

    // ============================================================
    // Wire up store, shortener, API client and commands
    // ============================================================
    let store = store::open(&config.store).await.map_err(|e| {
        error!("Failed to open cache store: {}", e);
        e
    })?;
    let shortener = Arc::new(Shortener::new(store));
    let api = Arc::new(HenrikClient::new(&config.api)?);
    let commands = Arc::new(CommandHandler::new(api, shortener, &config));

    // ============================================================
    // Start Discord bot
    // ============================================================
    let (shutdown_tx, shutdown_rx) = watch::channel(false);

    let discord_bot = DiscordBotBuilder::new(config.discord.token.clone(), commands, shutdown_rx)
        .build()
        .await?;

    info!("Starting Discord bot...");
    let mut discord_task = tokio::spawn(discord_bot.run());

    let shutdown = tokio::select! {
        biased;
        _ = shutdown_signal() => {
            info!("Shutdown signal received - disconnecting...");
            true
        }
        _ = &mut discord_task => false,
    };

    if shutdown {
        if let Err(e) = shutdown_tx.send(true) {
            warn!("Shutdown channel closed (Discord task already exited): {}", e);
        }
        match tokio::time::timeout(std::time::Duration::from_secs(5), discord_task).await {
            Ok(Ok(())) => info!("Discord client shut down gracefully"),
            Ok(Err(e)) => warn!("Discord task panicked: {}", e),
            Err(_) => warn!("Discord shutdown timed out"),
        }
    }

    info!("Exiting...");
    Ok(())
}

async fn shutdown_signal() {
    let ctrl_c = async {
        signal::ctrl_c()
            .await
            .expect("Failed to install Ctrl+C handler");
    };

    #[cfg(unix)]
    let terminate = async {
        signal::unix::signal(signal::unix::SignalKind::terminate())
            .expect("Failed to install SIGTERM handler")
            .recv()
            .await;
    };

    #[cfg(not(unix))]
    let terminate = std::future::pending::<()>();

    tokio::select! {
        _ = ctrl_c => info!("Received Ctrl+C"),
        _ = terminate => info!("Received SIGTERM"),
    }
}
