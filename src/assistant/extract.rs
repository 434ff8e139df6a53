//! Message classification and shopping-list text normalization.

use crate::error::{BotError, Result};
use regex::Regex;
use std::sync::LazyLock;
use std::{fmt, str::FromStr};

static TAG_PATTERN: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r"\A#[ \t]*(\w+)[ \t]*\r?\n(?s:(.*))").expect("tag pattern is valid")
});

static PLACEHOLDER_PATTERN: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r"\{\{\s*([a-zA-Z0-9_]+)\s*\}\}").expect("placeholder pattern is valid")
});

/// Prefix of a canonical bullet line.
pub const BULLET: &str = "- ";

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Tag {
    Inbox,
    Shopping,
    Action,
}

impl fmt::Display for Tag {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Tag::Inbox => write!(f, "inbox"),
            Tag::Shopping => write!(f, "shopping"),
            Tag::Action => write!(f, "action"),
        }
    }
}

impl FromStr for Tag {
    type Err = BotError;

    fn from_str(s: &str) -> Result<Self> {
        match s.to_lowercase().as_str() {
            "inbox" => Ok(Tag::Inbox),
            "shopping" => Ok(Tag::Shopping),
            "action" => Ok(Tag::Action),
            _ => Err(BotError::UnknownTag(s.to_string())),
        }
    }
}

/// Split `#tag\nbody` into the tag word and everything after the first line.
pub fn extract_tag_and_text(message: &str) -> Result<(&str, &str)> {
    let caps = TAG_PATTERN
        .captures(message)
        .ok_or(BotError::NoTagFound)?;

    match (caps.get(1), caps.get(2)) {
        (Some(tag), Some(body)) => Ok((tag.as_str(), body.as_str())),
        _ => Err(BotError::NoTagFound),
    }
}

pub fn is_single_line(message: &str) -> bool {
    !message.contains(['\n', '\r'])
}

/// Uppercase the first letter of every word, leaving the rest untouched.
///
/// Anything other than a letter, digit, underscore or apostrophe separates
/// words, so `"buy milk-and-eggs"` becomes `"Buy Milk-And-Eggs"` while
/// `"don't"` stays one word.
pub fn title_case(text: &str) -> String {
    let mut result = String::with_capacity(text.len());
    let mut at_word_start = true;

    for ch in text.chars() {
        if at_word_start {
            result.extend(ch.to_uppercase());
        } else {
            result.push(ch);
        }
        at_word_start = !(ch.is_alphanumeric() || ch == '_' || ch == '\'');
    }

    result
}

/// Rewrite `{{ key }}` placeholders into the `{{Key}}` field references
/// understood by [`render_template`](super::template::render_template).
pub fn transform_placeholders(template: &str) -> String {
    PLACEHOLDER_PATTERN
        .replace_all(template, |caps: &regex::Captures| {
            format!("{{{{{}}}}}", field_name(&caps[1]))
        })
        .into_owned()
}

fn field_name(key: &str) -> String {
    let mut chars = key.chars();
    match chars.next() {
        Some(first) => first
            .to_uppercase()
            .chain(chars.flat_map(char::to_lowercase))
            .collect(),
        None => String::new(),
    }
}

/// Normalize free-form list text into canonical `"- item"` lines.
///
/// Blank lines and lines holding only a dash are dropped. Everything else
/// keeps its order.
pub fn extract_items(text: &str) -> Vec<String> {
    text.lines()
        .filter_map(|line| {
            let line = line.trim();
            // "-  x" is re-bulleted too, so no item keeps whitespace after its dash.
            let item = match line.strip_prefix('-') {
                Some(rest) => rest.trim(),
                None => line,
            };
            if item.is_empty() {
                None
            } else {
                Some(format!("{}{}", BULLET, item))
            }
        })
        .collect()
}
