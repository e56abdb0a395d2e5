//! Compiled output: batches of key-definition entries

use std::fmt;

use serde::{Deserialize, Serialize};

use super::element::Element;
use super::settings::Settings;

/// One entry handed to the binder
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(tag = "form", rename_all = "snake_case")]
pub enum KeyDefEntry {
    /// A key followed by its definition
    Plain { key: Element, definition: Element },
    /// A list literal passed through verbatim
    Extended { literal: Element },
}

impl KeyDefEntry {
    pub fn plain(key: Element, definition: Element) -> Self {
        KeyDefEntry::Plain { key, definition }
    }

    pub fn extended(literal: Element) -> Self {
        KeyDefEntry::Extended { literal }
    }

    pub fn is_extended(&self) -> bool {
        matches!(self, KeyDefEntry::Extended { .. })
    }
}

impl fmt::Display for KeyDefEntry {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            KeyDefEntry::Plain { key, definition } => write!(f, "{} -> {}", key, definition),
            KeyDefEntry::Extended { literal } => write!(f, "ext {}", literal),
        }
    }
}

/// A settings snapshot plus the entries bound under it
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Batch {
    settings: Settings,
    entries: Vec<KeyDefEntry>,
}

impl Batch {
    pub fn new(settings: Settings, entries: Vec<KeyDefEntry>) -> Self {
        Self { settings, entries }
    }

    pub fn settings(&self) -> &Settings {
        &self.settings
    }

    pub fn entries(&self) -> &[KeyDefEntry] {
        &self.entries
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }
}
