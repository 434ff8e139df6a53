use thiserror::Error;

#[derive(Error, Debug)]
pub enum BotError {
    #[error("Configuration error: {0}")]
    Config(String),

    #[error("No tag found in the message")]
    NoTagFound,

    #[error("Unknown tag: {0:?}")]
    UnknownTag(String),

    #[error("Unknown command: /{0}")]
    UnknownCommand(String),

    #[error("Invalid line index: {0}")]
    InvalidIndex(String),

    #[error("Should be provided minimum one id")]
    MissingArguments,

    #[error("Message text is empty")]
    EmptyMessage,

    #[error("Note title can not contain path separators: {0:?}")]
    InvalidTitle(String),

    #[error("Template error: {0}")]
    Template(String),

    #[error("Invalid vault path: {0}")]
    InvalidPath(String),

    #[error("Storage error: {0}")]
    Storage(String),

    #[error("Request cancelled")]
    Cancelled,

    #[error("Message handler failed: {0}")]
    Handler(String),

    #[error("Telegram API error: {0}")]
    Telegram(String),

    #[error("HTTP error: {0}")]
    Http(#[from] reqwest::Error),

    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    #[error("YAML error: {0}")]
    Yaml(#[from] serde_yaml::Error),
}

pub type Result<T> = std::result::Result<T, BotError>;
