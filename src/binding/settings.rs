//! Settings context carried across sections of a binding form

use std::collections::BTreeMap;
use std::fmt;
use std::str::FromStr;

use serde::{Deserialize, Serialize};

use super::element::Element;
use super::options::{KEYMAPS, STATES};

/// Option name → value, last write wins
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct Settings {
    values: BTreeMap<String, Element>,
}

impl Settings {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn set(&mut self, name: impl Into<String>, value: Element) {
        self.values.insert(name.into(), value);
    }

    pub fn get(&self, name: &str) -> Option<&Element> {
        self.values.get(name)
    }

    pub fn remove(&mut self, name: &str) -> Option<Element> {
        self.values.remove(name)
    }

    pub fn keymaps(&self) -> Option<&Element> {
        self.get(KEYMAPS)
    }

    pub fn states(&self) -> Option<&Element> {
        self.get(STATES)
    }

    pub fn len(&self) -> usize {
        self.values.len()
    }

    pub fn is_empty(&self) -> bool {
        self.values.is_empty()
    }

    pub fn iter(&self) -> impl Iterator<Item = (&str, &Element)> {
        self.values.iter().map(|(k, v)| (k.as_str(), v))
    }

    /// A copy of `self` with every value of `other` written over it
    pub fn merged(&self, other: &Settings) -> Settings {
        let mut result = self.clone();
        for (name, value) in other.iter() {
            result.set(name, value.clone());
        }
        result
    }

    /// Builder used mostly by tests
    pub fn with(mut self, name: impl Into<String>, value: Element) -> Self {
        self.set(name, value);
        self
    }
}

impl fmt::Display for Settings {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{{")?;
        for (i, (name, value)) in self.iter().enumerate() {
            if i > 0 {
                write!(f, " ")?;
            }
            write!(f, ":{} {}", name, value)?;
        }
        write!(f, "}}")
    }
}

/// What a clearing separator resets the live settings to
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum ClearPolicy {
    /// Back to the settings in effect when the leading default section ended
    #[default]
    PreserveDefaults,
    /// Back to nothing at all
    All,
}

impl ClearPolicy {
    pub fn as_str(self) -> &'static str {
        match self {
            ClearPolicy::PreserveDefaults => "preserve-defaults",
            ClearPolicy::All => "all",
        }
    }
}

impl fmt::Display for ClearPolicy {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.as_str())
    }
}

impl FromStr for ClearPolicy {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_lowercase().as_str() {
            "preserve-defaults" | "preserve_defaults" | "defaults" => {
                Ok(ClearPolicy::PreserveDefaults)
            }
            "all" => Ok(ClearPolicy::All),
            _ => Err(format!("unknown clear policy: {}", s)),
        }
    }
}
