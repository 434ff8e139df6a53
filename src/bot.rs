//! Chat routing: sender check, `/command` dispatch and error rendering.

use crate::assistant::Assistant;
use crate::error::{BotError, Result};
use std::sync::Arc;
use tokio_util::sync::CancellationToken;

pub const NOT_ALLOWED_MESSAGE: &str = "**You are not allowed to use this bot.**";

type Handler = fn(&Assistant, &str) -> Result<String>;

/// A bot menu entry.
pub struct Command {
    pub name: &'static str,
    pub description_ru: &'static str,
    pub description_en: &'static str,
    handler: Handler,
}

/// Menu commands, sorted by name.
pub static COMMANDS: &[Command] = &[
    Command {
        name: "clear_shopping_list",
        description_ru: "Очистить список покупок",
        description_en: "Clear shopping list",
        handler: |assistant, _| assistant.clear_shopping_list(),
    },
    Command {
        name: "reading_list",
        description_ru: "Показать список книг",
        description_en: "Get reading list",
        handler: |assistant, _| assistant.get_reading_list(),
    },
    Command {
        name: "remove_item",
        description_ru: "Удалить из списка покупок",
        description_en: "Remove item from shopping list",
        handler: |assistant, args| assistant.remove_items_from_shopping_list(args),
    },
    Command {
        name: "shopping_list",
        description_ru: "Показать весь список покупок",
        description_en: "Get shopping list",
        handler: |assistant, _| assistant.get_shopping_list(),
    },
    Command {
        name: "watching_list",
        description_ru: "Показать список фильмов",
        description_en: "Get watching list",
        handler: |assistant, _| assistant.get_watching_list(),
    },
    Command {
        name: "wishing_list",
        description_ru: "Показать весь список желаний",
        description_en: "Get wishing list",
        handler: |assistant, _| assistant.get_wish_list(),
    },
];

pub fn find_command(name: &str) -> Option<&'static Command> {
    COMMANDS.iter().find(|c| c.name == name)
}

/// Split `/name@bot args` into `("name", "args")`.
pub fn parse_command(text: &str) -> Option<(&str, &str)> {
    let rest = text.trim_start().strip_prefix('/')?;
    let (head, args) = match rest.find(char::is_whitespace) {
        Some(idx) => (&rest[..idx], rest[idx..].trim()),
        None => (rest, ""),
    };
    let name = head.split('@').next().unwrap_or(head);
    Some((name, args))
}

pub struct Router {
    assistant: Arc<Assistant>,
    user_id: i64,
}

impl Router {
    pub fn new(assistant: Arc<Assistant>, user_id: i64) -> Self {
        Self { assistant, user_id }
    }

    pub fn user_id(&self) -> i64 {
        self.user_id
    }

    pub fn is_allowed(&self, sender_id: i64) -> bool {
        sender_id == self.user_id
    }

    /// Produce the reply for one inbound message.
    ///
    /// Never fails: errors are logged and turned into a user-visible reply.
    pub fn handle_text(&self, cancel: &CancellationToken, sender_id: i64, text: &str) -> String {
        if !self.is_allowed(sender_id) {
            tracing::warn!(sender_id, "Rejected message from unknown sender");
            return NOT_ALLOWED_MESSAGE.to_string();
        }

        match parse_command(text) {
            Some((name, args)) => match self.run_command(cancel, name, args) {
                Ok(reply) => reply,
                Err(e) => {
                    tracing::error!(command = name, error = %e, "Command failed");
                    format!("**Error occurred in command \"{}\".**\n\n{}", name, e)
                }
            },
            None => match self.run_message(cancel, text) {
                Ok(reply) => reply,
                Err(e) => {
                    tracing::error!(error = %e, "Message processing failed");
                    format!("**Error occurred in processing message.**\n\n{}", e)
                }
            },
        }
    }

    pub fn run_command(&self, cancel: &CancellationToken, name: &str, args: &str) -> Result<String> {
        let command = find_command(name).ok_or_else(|| BotError::UnknownCommand(name.to_string()))?;
        if cancel.is_cancelled() {
            return Err(BotError::Cancelled);
        }
        tracing::info!(command = name, "Running command");
        (command.handler)(&self.assistant, args)
    }

    pub fn run_message(&self, cancel: &CancellationToken, text: &str) -> Result<String> {
        if cancel.is_cancelled() {
            return Err(BotError::Cancelled);
        }
        self.assistant.parse_message(text)
    }

    pub fn reminder(&self) -> String {
        self.assistant.remember_about_inbox()
    }
}
