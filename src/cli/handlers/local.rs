use crate::assistant::REMINDER_MESSAGE;
use crate::bot::COMMANDS;
use anyhow::Result;
use tokio_util::sync::CancellationToken;

use super::CommandContext;

pub fn handle_message(ctx: &CommandContext, text: &str) -> Result<()> {
    // Escaped newlines let multi-line messages be typed on one shell line
    let text = text.replace("\\n", "\n");
    let reply = ctx.router.run_message(&CancellationToken::new(), &text)?;
    println!("{}", reply.trim_end());
    Ok(())
}

pub fn handle_command(ctx: &CommandContext, name: &str, args: &[String]) -> Result<()> {
    let name = name.trim_start_matches('/');
    let reply = ctx
        .router
        .run_command(&CancellationToken::new(), name, &args.join(" "))?;
    println!("{}", reply.trim_end());
    Ok(())
}

pub fn handle_commands() -> Result<()> {
    for command in COMMANDS {
        println!("/{:<22} {}", command.name, command.description_en);
    }
    Ok(())
}

pub fn handle_remind() -> Result<()> {
    println!("{}", REMINDER_MESSAGE);
    Ok(())
}
