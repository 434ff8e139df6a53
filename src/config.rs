use crate::error::{BotError, Result};
use chrono::{FixedOffset, NaiveTime};
use serde::{Deserialize, Serialize};
use std::path::{Path, PathBuf};
use std::str::FromStr;

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct BotConfig {
    #[serde(default)]
    pub server: ServerSettings,

    #[serde(default, alias = "tg_bot")]
    pub telegram: TelegramSettings,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ServerSettings {
    #[serde(default = "default_host")]
    pub host: String,

    #[serde(default, deserialize_with = "port_from_number_or_string")]
    pub port: u16,

    #[serde(default)]
    pub user_id: i64,

    #[serde(default, alias = "obsidian_absolute_path")]
    pub vault_path: String,

    #[serde(default = "default_inbox_template")]
    pub inbox_template: String,

    #[serde(default = "default_utc_offset")]
    pub utc_offset: String,

    #[serde(default = "default_reminder_time")]
    pub reminder_time: String,
}

/// Older configs quote the port (`port: "8080"`).
fn port_from_number_or_string<'de, D>(deserializer: D) -> std::result::Result<u16, D::Error>
where
    D: serde::Deserializer<'de>,
{
    #[derive(Deserialize)]
    #[serde(untagged)]
    enum Port {
        Number(u16),
        Text(String),
    }

    match Port::deserialize(deserializer)? {
        Port::Number(port) => Ok(port),
        Port::Text(text) => text.trim().parse().map_err(serde::de::Error::custom),
    }
}

fn default_host() -> String {
    "0.0.0.0".to_string()
}

fn default_inbox_template() -> String {
    "Templates/Inbox.md".to_string()
}

/// Europe/Moscow has stayed on UTC+3 without DST since 2014.
fn default_utc_offset() -> String {
    "+03:00".to_string()
}

fn default_reminder_time() -> String {
    "06:00".to_string()
}

impl Default for ServerSettings {
    fn default() -> Self {
        Self {
            host: default_host(),
            port: 0,
            user_id: 0,
            vault_path: String::new(),
            inbox_template: default_inbox_template(),
            utc_offset: default_utc_offset(),
            reminder_time: default_reminder_time(),
        }
    }
}

impl ServerSettings {
    pub fn offset(&self) -> Result<FixedOffset> {
        FixedOffset::from_str(&self.utc_offset).map_err(|e| {
            BotError::Config(format!(
                "server.utc_offset must look like +03:00, got {:?}: {}",
                self.utc_offset, e
            ))
        })
    }

    pub fn reminder_at(&self) -> Result<NaiveTime> {
        NaiveTime::parse_from_str(&self.reminder_time, "%H:%M").map_err(|e| {
            BotError::Config(format!(
                "server.reminder_time must look like 06:00, got {:?}: {}",
                self.reminder_time, e
            ))
        })
    }

    pub fn vault_root(&self) -> PathBuf {
        PathBuf::from(&self.vault_path)
    }

    fn validate(&self) -> Result<()> {
        if self.port == 0 {
            return Err(BotError::Config("server.port is required".to_string()));
        }
        if self.user_id == 0 {
            return Err(BotError::Config("server.user_id is required".to_string()));
        }
        if self.vault_path.is_empty() {
            return Err(BotError::Config("server.vault_path is required".to_string()));
        }
        self.offset()?;
        self.reminder_at()?;
        Ok(())
    }
}

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct TelegramSettings {
    #[serde(default)]
    pub token: String,

    #[serde(default)]
    pub webhook_url: String,

    #[serde(default)]
    pub verbose: bool,
}

impl TelegramSettings {
    fn validate(&self) -> Result<()> {
        if self.token.is_empty() {
            return Err(BotError::Config("telegram.token is required".to_string()));
        }
        if self.webhook_url.is_empty() {
            return Err(BotError::Config("telegram.webhook_url is required".to_string()));
        }
        url::Url::parse(&self.webhook_url).map_err(|e| {
            BotError::Config(format!("telegram.webhook_url is not a valid URL: {}", e))
        })?;
        Ok(())
    }
}

impl BotConfig {
    fn parse(path: &Path) -> Result<Self> {
        let content = std::fs::read_to_string(path).map_err(|e| {
            BotError::Config(format!("Failed to read {}: {}", path.display(), e))
        })?;
        Ok(serde_yaml::from_str(&content)?)
    }

    pub fn load(path: &Path) -> Result<Self> {
        let config = Self::parse(path)?;
        config.validate()?;
        Ok(config)
    }

    /// Checks only what local vault commands need; no Telegram credentials.
    pub fn load_for_vault(path: &Path) -> Result<Self> {
        let config = Self::parse(path)?;
        if config.server.vault_path.is_empty() {
            return Err(BotError::Config("server.vault_path is required".to_string()));
        }
        config.server.offset()?;
        Ok(config)
    }

    pub fn validate(&self) -> Result<()> {
        self.server.validate()?;
        self.telegram.validate()
    }

    pub fn listen_addr(&self) -> String {
        format!("{}:{}", self.server.host, self.server.port)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::TempDir;

    const FULL: &str = r#"
server:
  port: 8080
  user_id: 42
  vault_path: /tmp/vault
telegram:
  token: "123:abc"
  webhook_url: https://example.com/bot
"#;

    fn write_config(content: &str) -> (TempDir, PathBuf) {
        let temp_dir = TempDir::new().unwrap();
        let path = temp_dir.path().join("config.yaml");
        std::fs::write(&path, content).unwrap();
        (temp_dir, path)
    }

    #[test]
    fn test_load_applies_defaults() {
        let (_temp_dir, path) = write_config(FULL);
        let config = BotConfig::load(&path).unwrap();

        assert_eq!(config.server.host, "0.0.0.0");
        assert_eq!(config.server.inbox_template, "Templates/Inbox.md");
        assert_eq!(config.server.offset().unwrap().local_minus_utc(), 3 * 3600);
        assert_eq!(
            config.server.reminder_at().unwrap(),
            NaiveTime::from_hms_opt(6, 0, 0).unwrap()
        );
        assert_eq!(config.listen_addr(), "0.0.0.0:8080");
    }

    #[test]
    fn test_missing_user_id_is_rejected() {
        let (_temp_dir, path) = write_config(&FULL.replace("  user_id: 42\n", ""));
        let err = BotConfig::load(&path).unwrap_err();
        assert!(err.to_string().contains("user_id"));
    }

    #[test]
    fn test_invalid_webhook_url_is_rejected() {
        let (_temp_dir, path) =
            write_config(&FULL.replace("https://example.com/bot", "not a url"));
        let err = BotConfig::load(&path).unwrap_err();
        assert!(err.to_string().contains("webhook_url"));
    }

    #[test]
    fn test_invalid_offset_is_rejected() {
        let (_temp_dir, path) =
            write_config(&FULL.replace("  port: 8080", "  port: 8080\n  utc_offset: moscow"));
        let err = BotConfig::load(&path).unwrap_err();
        assert!(err.to_string().contains("utc_offset"));
    }

    #[test]
    fn test_vault_only_config_skips_telegram() {
        let (_temp_dir, path) = write_config("server:\n  vault_path: /tmp/vault\n");
        let config = BotConfig::load_for_vault(&path).unwrap();
        assert_eq!(config.server.vault_root(), PathBuf::from("/tmp/vault"));
        assert!(BotConfig::load(&path).is_err());
    }

    #[test]
    fn test_legacy_keys_and_quoted_port_are_accepted() {
        let (_temp_dir, path) = write_config(
            r#"
server:
  port: "8080"
  user_id: 42
  obsidian_absolute_path: /tmp/vault
tg_bot:
  token: "123:abc"
  webhook_url: https://example.com/bot
"#,
        );
        let config = BotConfig::load(&path).unwrap();

        assert_eq!(config.server.port, 8080);
        assert_eq!(config.server.vault_root(), PathBuf::from("/tmp/vault"));
        assert_eq!(config.telegram.token, "123:abc");
    }

    #[test]
    fn test_non_numeric_port_is_rejected() {
        let (_temp_dir, path) = write_config("server:\n  port: eighty\n");
        assert!(BotConfig::load_for_vault(&path).is_err());
    }
}
