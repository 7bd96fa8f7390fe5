//! # Command Layer
//!
//! Every board operation lives here as plain functions over an [`AppDocument`].
//! Commands never touch storage and never fail: an unknown id or a day that does
//! not exist is a no-op, reported through an informational [`CmdMessage`] so a
//! client can mention it if it wants to. Persisting the result is the API layer's
//! job; it looks at [`CmdResult::changed`] to decide whether there is anything to
//! write.

use crate::config::BoardConfig;
use crate::error::Result;
use crate::model::{Card, Position};
use std::path::{Path, PathBuf};

pub mod config;
pub mod create;
pub mod delete;
pub mod describe;
pub mod export;
pub mod find;
pub mod import;
pub mod move_card;
pub mod notes;
pub mod status;

/// On-disk layout of the local data directory.
#[derive(Debug, Clone)]
pub struct BoardPaths {
    pub data_dir: PathBuf,
}

impl BoardPaths {
    pub fn new(data_dir: impl Into<PathBuf>) -> Self {
        Self {
            data_dir: data_dir.into(),
        }
    }

    pub fn config_dir(&self) -> &Path {
        &self.data_dir
    }

    pub fn cache_dir(&self) -> PathBuf {
        self.data_dir.join("cache")
    }

    pub fn log_dir(&self) -> PathBuf {
        self.data_dir.join("logs")
    }

    pub fn load_config(&self) -> Result<BoardConfig> {
        BoardConfig::load(self.config_dir())
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum MessageLevel {
    Info,
    Success,
    Warning,
    Error,
}

#[derive(Debug, Clone)]
pub struct CmdMessage {
    pub level: MessageLevel,
    pub content: String,
}

impl CmdMessage {
    pub fn info(content: impl Into<String>) -> Self {
        Self {
            level: MessageLevel::Info,
            content: content.into(),
        }
    }

    pub fn success(content: impl Into<String>) -> Self {
        Self {
            level: MessageLevel::Success,
            content: content.into(),
        }
    }

    pub fn warning(content: impl Into<String>) -> Self {
        Self {
            level: MessageLevel::Warning,
            content: content.into(),
        }
    }

    pub fn error(content: impl Into<String>) -> Self {
        Self {
            level: MessageLevel::Error,
            content: content.into(),
        }
    }
}

#[derive(Debug, Default)]
pub struct CmdResult {
    /// Cards the command touched, as they are after the command.
    pub affected_cards: Vec<Card>,
    /// Set by lookups.
    pub found: Option<(Card, Position)>,
    pub config: Option<BoardConfig>,
    pub messages: Vec<CmdMessage>,
    /// Whether the document was modified.
    pub changed: bool,
}

impl CmdResult {
    pub fn add_message(&mut self, message: CmdMessage) {
        self.messages.push(message);
    }

    pub fn with_affected_cards(mut self, cards: Vec<Card>) -> Self {
        self.affected_cards = cards;
        self
    }

    pub fn with_found(mut self, card: Card, position: Position) -> Self {
        self.found = Some((card, position));
        self
    }

    pub fn with_config(mut self, config: BoardConfig) -> Self {
        self.config = Some(config);
        self
    }

    pub fn mark_changed(mut self) -> Self {
        self.changed = true;
        self
    }

    /// Result of an operation that found nothing to do.
    pub fn noop(message: impl Into<String>) -> Self {
        let mut result = Self::default();
        result.add_message(CmdMessage::info(message));
        result
    }
}

/// Display text for a card: its description, or a placeholder when empty.
pub fn card_title(card: &Card) -> &str {
    if card.description.trim().is_empty() {
        "(untitled)"
    } else {
        &card.description
    }
}
