//! # vaultbot - a chat assistant for a Markdown vault
//!
//! vaultbot answers Telegram messages from a single owner by editing plain
//! Markdown files in a note-taking vault: a shopping list, a wish list,
//! inbox notes, per-day action logs and reading/watching progress reports.
//!
//! ## Quick Start
//!
//! ```bash
//! # Run the webhook server and the daily reminder
//! vaultbot start --config configs/config.yaml
//!
//! # Try a message against the vault without Telegram
//! vaultbot message --config configs/config.yaml "#shopping\nmilk\nbread"
//! vaultbot command --config configs/config.yaml remove_item 1
//! ```
//!
//! ## Modules
//!
//! - [`assistant`]: Message parsing and vault operations
//! - [`bot`]: Command routing and the owner check
//! - [`cli`]: Command-line interface definitions
//! - [`config`]: YAML configuration
//! - [`error`]: Error types and result aliases
//! - [`scheduler`]: Daily reminder
//! - [`server`]: Telegram webhook endpoint
//! - [`storage`]: File access relative to the vault root
//! - [`telegram`]: Telegram Bot API client

/// Message parsing and vault operations.
///
/// Interprets `#inbox`, `#shopping` and `#action` messages and edits the
/// matching vault files.
pub mod assistant;

/// Command routing, owner check and error rendering.
pub mod bot;

/// Command-line interface definitions using clap.
pub mod cli;

/// Configuration loading and validation.
pub mod config;

/// Error types and result aliases.
///
/// Defines `BotError` enum and `Result<T>` type alias.
pub mod error;

pub mod logging;
pub mod scheduler;

/// Telegram webhook HTTP server.
pub mod server;

/// File access for the vault.
///
/// Every path is relative to the configured vault root.
pub mod storage;

pub mod telegram;
