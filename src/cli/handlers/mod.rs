mod local;
mod start;

pub use local::{handle_command, handle_commands, handle_message, handle_remind};
pub use start::handle_start;

use crate::assistant::Assistant;
use crate::bot::Router;
use crate::config::BotConfig;
use crate::storage::FsVault;
use anyhow::{Context, Result};
use std::path::Path;
use std::sync::Arc;

/// Common context passed to all command handlers
pub struct CommandContext {
    pub config: BotConfig,
    pub router: Arc<Router>,
}

impl CommandContext {
    pub fn new(config: BotConfig) -> Result<Self> {
        let offset = config.server.offset()?;
        let vault = Arc::new(FsVault::new(config.server.vault_root()));
        let assistant = Assistant::new(vault, &config.server.inbox_template, offset);
        let router = Arc::new(Router::new(Arc::new(assistant), config.server.user_id));
        Ok(Self { config, router })
    }

    /// Load a config that only needs to describe the vault.
    pub fn for_vault(config_path: &Path) -> Result<Self> {
        let config = BotConfig::load_for_vault(config_path)
            .with_context(|| format!("Failed to load config {}", config_path.display()))?;
        Self::new(config)
    }
}
