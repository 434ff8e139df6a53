use anyhow::Result;
use clap::Parser;

use vaultbot::cli::handlers::{self, CommandContext};
use vaultbot::cli::{Cli, Commands};
use vaultbot::logging;

fn main() -> Result<()> {
    let cli = Cli::parse();
    logging::init(cli.verbose, cli.log_file);

    match cli.command {
        Commands::Start { config } => handlers::handle_start(&config),
        Commands::Message { config, text } => {
            let ctx = CommandContext::for_vault(&config)?;
            handlers::handle_message(&ctx, &text)
        }
        Commands::Command { config, name, args } => {
            let ctx = CommandContext::for_vault(&config)?;
            handlers::handle_command(&ctx, &name, &args)
        }
        Commands::Commands => handlers::handle_commands(),
        Commands::Remind => handlers::handle_remind(),
    }
}
