//! Minimal Telegram Bot API client.
//!
//! Only the calls the bot needs: identity, webhook registration, the command
//! menu and sending Markdown messages.

use crate::bot::Command;
use crate::error::{BotError, Result};
use async_trait::async_trait;
use serde::de::DeserializeOwned;
use serde::{Deserialize, Serialize};

const API_BASE: &str = "https://api.telegram.org";

#[derive(Debug, Clone, Deserialize)]
pub struct Update {
    pub update_id: i64,
    #[serde(default)]
    pub message: Option<Message>,
}

#[derive(Debug, Clone, Deserialize)]
pub struct Message {
    pub message_id: i64,
    #[serde(default)]
    pub from: Option<User>,
    pub chat: Chat,
    #[serde(default)]
    pub text: Option<String>,
}

#[derive(Debug, Clone, Deserialize)]
pub struct User {
    pub id: i64,
    #[serde(default)]
    pub username: Option<String>,
}

#[derive(Debug, Clone, Deserialize)]
pub struct Chat {
    pub id: i64,
}

#[derive(Debug, Clone, Serialize, PartialEq, Eq)]
pub struct BotCommand {
    pub command: String,
    pub description: String,
}

/// Menu language for [`TelegramClient::set_my_commands`].
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum MenuLanguage {
    Russian,
    /// Shown to users whose language has no dedicated menu
    Default,
}

impl MenuLanguage {
    fn code(self) -> Option<&'static str> {
        match self {
            MenuLanguage::Russian => Some("ru"),
            MenuLanguage::Default => None,
        }
    }
}

pub fn menu(commands: &[Command], language: MenuLanguage) -> Vec<BotCommand> {
    commands
        .iter()
        .map(|c| BotCommand {
            command: c.name.to_string(),
            description: match language {
                MenuLanguage::Russian => c.description_ru,
                MenuLanguage::Default => c.description_en,
            }
            .to_string(),
        })
        .collect()
}

#[derive(Debug, Deserialize)]
struct ApiResponse<T> {
    ok: bool,
    result: Option<T>,
    description: Option<String>,
}

impl<T> ApiResponse<T> {
    fn into_result(self, method: &str) -> Result<T> {
        match (self.ok, self.result) {
            (true, Some(result)) => Ok(result),
            (true, None) => Err(BotError::Telegram(format!("{}: empty result", method))),
            (false, _) => Err(BotError::Telegram(format!(
                "{}: {}",
                method,
                self.description.unwrap_or_else(|| "unknown error".to_string())
            ))),
        }
    }
}

/// Outbound side of the chat transport.
#[async_trait]
pub trait Messenger: Send + Sync {
    async fn send_message(&self, chat_id: i64, text: &str) -> Result<()>;
}

pub struct TelegramClient {
    http: reqwest::Client,
    base_url: String,
    verbose: bool,
}

impl TelegramClient {
    pub fn new(token: &str, verbose: bool) -> Result<Self> {
        Self::with_base_url(&format!("{}/bot{}", API_BASE, token), verbose)
    }

    pub fn with_base_url(base_url: &str, verbose: bool) -> Result<Self> {
        let http = reqwest::Client::builder()
            .timeout(std::time::Duration::from_secs(30))
            .build()?;
        Ok(Self {
            http,
            base_url: base_url.trim_end_matches('/').to_string(),
            verbose,
        })
    }

    async fn call<T: DeserializeOwned>(&self, method: &str, body: &serde_json::Value) -> Result<T> {
        if self.verbose {
            tracing::debug!(method, %body, "Telegram API request");
        }

        let response: ApiResponse<T> = self
            .http
            .post(format!("{}/{}", self.base_url, method))
            .json(body)
            .send()
            .await?
            .json()
            .await?;

        response.into_result(method)
    }

    pub async fn get_me(&self) -> Result<User> {
        self.call("getMe", &serde_json::json!({})).await
    }

    pub async fn set_webhook(&self, url: &str) -> Result<()> {
        let _: bool = self
            .call("setWebhook", &serde_json::json!({ "url": url }))
            .await?;
        Ok(())
    }

    pub async fn set_my_commands(&self, commands: &[BotCommand], language: MenuLanguage) -> Result<()> {
        let mut body = serde_json::json!({ "commands": commands });
        if let Some(code) = language.code() {
            body["language_code"] = serde_json::Value::from(code);
        }
        let _: bool = self.call("setMyCommands", &body).await?;
        Ok(())
    }
}

#[async_trait]
impl Messenger for TelegramClient {
    async fn send_message(&self, chat_id: i64, text: &str) -> Result<()> {
        let _: serde_json::Value = self
            .call(
                "sendMessage",
                &serde_json::json!({
                    "chat_id": chat_id,
                    "text": text,
                    "parse_mode": "Markdown",
                }),
            )
            .await?;
        Ok(())
    }
}
