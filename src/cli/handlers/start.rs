use crate::bot::COMMANDS;
use crate::config::BotConfig;
use crate::scheduler::Reminder;
use crate::server::{self, AppState};
use crate::telegram::{MenuLanguage, Messenger, TelegramClient, menu};
use anyhow::{Context, Result};
use std::path::Path;
use std::sync::Arc;
use tokio_util::sync::CancellationToken;

use super::CommandContext;

pub fn handle_start(config_path: &Path) -> Result<()> {
    let config = BotConfig::load(config_path)
        .with_context(|| format!("Failed to load config {}", config_path.display()))?;
    let ctx = CommandContext::new(config)?;

    // reqwest is built without a default TLS crypto provider
    let _ = rustls::crypto::ring::default_provider().install_default();

    tokio::runtime::Runtime::new()?.block_on(run(ctx))
}

async fn run(ctx: CommandContext) -> Result<()> {
    let telegram = &ctx.config.telegram;
    let client = Arc::new(TelegramClient::new(&telegram.token, telegram.verbose)?);

    let me = client.get_me().await.context("Failed to connect to Telegram")?;
    client
        .set_webhook(&telegram.webhook_url)
        .await
        .context("Failed to set webhook")?;
    client
        .set_my_commands(&menu(COMMANDS, MenuLanguage::Russian), MenuLanguage::Russian)
        .await
        .context("Failed to set ru commands")?;
    client
        .set_my_commands(&menu(COMMANDS, MenuLanguage::Default), MenuLanguage::Default)
        .await
        .context("Failed to set default commands")?;
    tracing::info!(
        username = me.username.as_deref().unwrap_or(""),
        "Connected to Telegram API"
    );

    let cancel = CancellationToken::new();
    let messenger: Arc<dyn Messenger> = client;

    let reminder = Reminder::new(
        ctx.router.clone(),
        messenger.clone(),
        ctx.config.server.reminder_at()?,
        ctx.config.server.offset()?,
    );
    let reminder_task = tokio::spawn(reminder.run(cancel.clone()));

    let shutdown = cancel.clone();
    tokio::spawn(async move {
        if tokio::signal::ctrl_c().await.is_ok() {
            tracing::info!("Shutting down");
        }
        shutdown.cancel();
    });

    let state = AppState {
        router: ctx.router.clone(),
        messenger,
        cancel: cancel.clone(),
    };
    let served = server::serve(&ctx.config.listen_addr(), state).await;

    cancel.cancel();
    reminder_task.await?;
    served?;
    Ok(())
}
