//! Vault operations behind every chat message and command.
//!
//! [`Assistant`] owns no state between calls. Each operation reads the files
//! it needs through a [`Vault`], transforms the text and writes it back, then
//! returns the reply to show the user.
//!
//! ## Message tags
//!
//! ```text
//! #shopping        #action               #inbox
//! milk             went for a run        Call the plumber
//! - bread
//! ```
//!
//! An untagged single-line message is treated as `#inbox`.

pub mod extract;
pub mod report;
pub mod template;

use crate::error::{BotError, Result};
use crate::storage::Vault;
use chrono::{DateTime, FixedOffset, Utc};
use extract::{BULLET, Tag, extract_items, extract_tag_and_text, is_single_line, title_case};
use std::collections::BTreeSet;
use std::path::{Path, PathBuf};
use std::sync::Arc;

pub const SHOPPING_LIST_FILE: &str = "Shopping List.md";
pub const WISH_LIST_FILE: &str = "Wish List.md";
pub const TIMESTAMPS_DIR: &str = "Timestamps";
pub const BOOKS_DIR: &str = "Books";
pub const FILMS_DIR: &str = "Films";

pub const NOTE_EXISTS_MESSAGE: &str = "Note with such name already exists.";
pub const EMPTY_SHOPPING_LIST_MESSAGE: &str = "Shopping list is empty!";
pub const EMPTY_WISH_LIST_MESSAGE: &str = "Wish list is empty!";
pub const REMINDER_MESSAGE: &str = "👉🏼 **Please** _sort inbox_ 👈🏼";

pub struct Assistant {
    vault: Arc<dyn Vault>,
    inbox_template: PathBuf,
    offset: FixedOffset,
}

impl Assistant {
    pub fn new(vault: Arc<dyn Vault>, inbox_template: impl Into<PathBuf>, offset: FixedOffset) -> Self {
        Self {
            vault,
            inbox_template: inbox_template.into(),
            offset,
        }
    }

    /// Route a free-text message by its tag.
    pub fn parse_message(&self, message: &str) -> Result<String> {
        let (tag, text) = match extract_tag_and_text(message) {
            Ok(found) => found,
            Err(BotError::NoTagFound) if is_single_line(message) => {
                return self.create_new_note_to_inbox(message);
            }
            Err(e) => return Err(e),
        };

        let tag: Tag = tag.parse()?;
        tracing::debug!(%tag, "Dispatching tagged message");

        match tag {
            Tag::Inbox => self.create_new_note_to_inbox(text),
            Tag::Shopping => self.add_items_to_shopping_list(text),
            Tag::Action => self.add_action(text),
        }
    }

    pub fn create_new_note_to_inbox(&self, text: &str) -> Result<String> {
        let template = self.vault.read(&self.inbox_template)?;
        let template = extract::transform_placeholders(&template);

        let title = title_case(text.trim());
        if title.is_empty() {
            return Err(BotError::EmptyMessage);
        }
        if title.contains(['/', '\\']) {
            return Err(BotError::InvalidTitle(title));
        }
        let content = template::render_template(&template, &[("Title", &title)])?;

        let note_path = PathBuf::from(format!("{}.md", title));
        if self.vault.exists(&note_path)? {
            tracing::info!(note = %note_path.display(), "Inbox note already exists");
            return Ok(NOTE_EXISTS_MESSAGE.to_string());
        }

        self.vault.create(&note_path, &content)?;
        tracing::info!(note = %note_path.display(), "Created inbox note");

        Ok(format!(
            "Successfully created note \"{}\" with inbox tag.",
            title
        ))
    }

    pub fn add_action(&self, text: &str) -> Result<String> {
        self.add_action_at(text, Utc::now())
    }

    pub fn add_action_at(&self, text: &str, now: DateTime<Utc>) -> Result<String> {
        let local = now.with_timezone(&self.offset);
        let entry = format!("\n{} - {}", local.format("%H:%M"), text.trim());

        let path = Path::new(TIMESTAMPS_DIR).join(format!("{}.md", local.format("%Y-%m-%d")));
        self.vault.append(&path, &entry)?;
        tracing::info!(file = %path.display(), "Added action");

        Ok(format!("Successfully added action to file {}", path.display()))
    }

    pub fn get_wish_list(&self) -> Result<String> {
        let data = self.vault.read(Path::new(WISH_LIST_FILE))?;
        if data.trim().is_empty() {
            return Ok(EMPTY_WISH_LIST_MESSAGE.to_string());
        }
        Ok(data)
    }

    pub fn get_reading_list(&self) -> Result<String> {
        report::generate_report(self.vault.as_ref(), Path::new(BOOKS_DIR))
    }

    pub fn get_watching_list(&self) -> Result<String> {
        report::generate_report(self.vault.as_ref(), Path::new(FILMS_DIR))
    }

    fn read_shopping_list(&self) -> Result<Vec<String>> {
        let data = self.vault.read(Path::new(SHOPPING_LIST_FILE))?;
        Ok(extract_items(&data))
    }

    fn write_shopping_list(&self, items: &[String]) -> Result<()> {
        self.vault
            .write(Path::new(SHOPPING_LIST_FILE), &items.join("\n"))
    }

    pub fn get_shopping_list(&self) -> Result<String> {
        let items = self.read_shopping_list()?;
        if items.is_empty() {
            return Ok(EMPTY_SHOPPING_LIST_MESSAGE.to_string());
        }

        Ok(items
            .iter()
            .enumerate()
            .map(|(i, item)| format!("{}. {}\n", i + 1, item_text(item)))
            .collect())
    }

    pub fn add_items_to_shopping_list(&self, text: &str) -> Result<String> {
        let mut items = self.read_shopping_list()?;
        let new_items = extract_items(text);
        tracing::info!(existing = items.len(), added = new_items.len(), "Adding shopping items");

        items.extend(new_items);
        self.write_shopping_list(&items)?;

        Ok("Successfully added items to shopping list. You can check it by /shopping_list".to_string())
    }

    pub fn clear_shopping_list(&self) -> Result<String> {
        self.vault.write(Path::new(SHOPPING_LIST_FILE), "")?;
        tracing::info!("Cleared shopping list");
        Ok("Successfully cleared shopping list.".to_string())
    }

    /// Remove the items at the given comma-separated 1-based positions.
    ///
    /// Positions refer to the list as it is before anything is removed. If
    /// any position is invalid nothing is written.
    pub fn remove_items_from_shopping_list(&self, args: &str) -> Result<String> {
        let positions = parse_positions(args)?;
        let items = self.read_shopping_list()?;

        let mut indices = BTreeSet::new();
        for position in positions {
            if position < 1 || position as usize > items.len() {
                return Err(BotError::InvalidIndex(position.to_string()));
            }
            indices.insert(position as usize - 1);
        }

        let (removed, kept): (Vec<_>, Vec<_>) = items
            .into_iter()
            .enumerate()
            .partition(|(i, _)| indices.contains(i));
        let removed: Vec<String> = removed.into_iter().map(|(_, item)| item).collect();
        let kept: Vec<String> = kept.into_iter().map(|(_, item)| item).collect();

        self.write_shopping_list(&kept)?;
        tracing::info!(removed = removed.len(), remaining = kept.len(), "Removed shopping items");

        Ok(format!(
            "Successfully deleted items from shopping list. Items:\n\n{}",
            removed.join("\n")
        ))
    }

    pub fn remember_about_inbox(&self) -> String {
        REMINDER_MESSAGE.to_string()
    }
}

fn parse_positions(args: &str) -> Result<Vec<i64>> {
    let args = args.trim();
    if args.is_empty() {
        return Err(BotError::MissingArguments);
    }

    args.split(',')
        .map(|token| {
            let token = token.trim();
            token
                .parse::<i64>()
                .map_err(|_| BotError::InvalidIndex(format!("{:?} is not a number", token)))
        })
        .collect()
}

/// Display form of a canonical item, without the bullet.
pub fn item_text(item: &str) -> &str {
    item.strip_prefix(BULLET).unwrap_or(item)
}
