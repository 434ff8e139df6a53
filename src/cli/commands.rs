use clap::{Parser, Subcommand};
use std::path::PathBuf;

const DEFAULT_CONFIG: &str = "configs/config.yaml";

#[derive(Parser)]
#[command(name = "vaultbot")]
#[command(
    author,
    version,
    about = "A Telegram assistant that keeps shopping lists, inbox notes and action logs in a Markdown vault"
)]
#[command(propagate_version = true)]
pub struct Cli {
    #[command(subcommand)]
    pub command: Commands,

    /// Enable debug logging
    #[arg(short, long, global = true)]
    pub verbose: bool,

    /// Also write JSON logs to this file (rotated daily)
    #[arg(long, global = true)]
    pub log_file: Option<PathBuf>,
}

#[derive(Subcommand)]
pub enum Commands {
    /// Start the webhook server and the daily reminder
    Start {
        /// Path to config file
        #[arg(long, default_value = DEFAULT_CONFIG)]
        config: PathBuf,
    },

    /// Handle one free-text message against the vault and print the reply
    #[command(visible_alias = "msg")]
    Message {
        /// Path to config file
        #[arg(long, default_value = DEFAULT_CONFIG)]
        config: PathBuf,

        /// Message text, e.g. "#shopping\nmilk"
        text: String,
    },

    /// Run one bot command against the vault and print the reply
    #[command(visible_alias = "cmd")]
    Command {
        /// Path to config file
        #[arg(long, default_value = DEFAULT_CONFIG)]
        config: PathBuf,

        /// Command name, with or without the leading '/'
        name: String,

        /// Command arguments, e.g. "1, 3" for remove_item
        #[arg(trailing_var_arg = true, allow_hyphen_values = true)]
        args: Vec<String>,
    },

    /// List the bot commands
    Commands,

    /// Print the inbox reminder
    Remind,
}
