//! Registry of recognized option names
//!
//! Option names are never guessed: a keyword that is not registered is an
//! error, so a typo cannot be mistaken for a context value. External code can
//! extend the set with [`OptionRegistry::register`].

use std::collections::BTreeMap;
use std::fmt;
use std::str::FromStr;

use serde::{Deserialize, Serialize};
use thiserror::Error;

use super::element::Element;

/// Option names the compiler itself relies on
pub const KEYMAPS: &str = "keymaps";
pub const STATES: &str = "states";
pub const EXTENDED: &str = "ext";

/// Expected shape of an option's value
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum ValueShape {
    /// Identifier or list of identifiers; normalized to a list
    Targets,
    /// String or vector
    KeyLiteral,
    /// Identifier
    Symbol,
    /// `t` or `nil`
    Boolean,
    /// Anything, passed through
    Any,
}

impl ValueShape {
    pub fn accepts(self, value: &Element) -> bool {
        match self {
            ValueShape::Targets => value.is_target(),
            ValueShape::KeyLiteral => value.is_key_literal() || value.is_nil(),
            ValueShape::Symbol => matches!(value, Element::Symbol(_)),
            ValueShape::Boolean => value.is_true() || value.is_nil(),
            ValueShape::Any => !value.is_separator(),
        }
    }

    pub fn describe(self) -> &'static str {
        match self {
            ValueShape::Targets => "an identifier or a non-empty list of identifiers",
            ValueShape::KeyLiteral => "a string or vector key",
            ValueShape::Symbol => "an identifier",
            ValueShape::Boolean => "t or nil",
            ValueShape::Any => "a value",
        }
    }
}

impl fmt::Display for ValueShape {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = match self {
            ValueShape::Targets => "targets",
            ValueShape::KeyLiteral => "key-literal",
            ValueShape::Symbol => "symbol",
            ValueShape::Boolean => "boolean",
            ValueShape::Any => "any",
        };
        write!(f, "{}", name)
    }
}

impl FromStr for ValueShape {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_lowercase().as_str() {
            "targets" => Ok(ValueShape::Targets),
            "key-literal" | "key_literal" | "key" => Ok(ValueShape::KeyLiteral),
            "symbol" => Ok(ValueShape::Symbol),
            "boolean" | "bool" => Ok(ValueShape::Boolean),
            "any" => Ok(ValueShape::Any),
            _ => Err(format!("unknown value shape: {}", s)),
        }
    }
}

/// What an option does when it is encountered
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum OptionKind {
    /// Written into the live settings
    Setting,
    /// The extended-entry marker; controls entry shape, never stored
    ExtendedMarker,
}

/// Descriptor of one recognized option
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct OptionSpec {
    pub name: String,
    pub shape: ValueShape,
    pub kind: OptionKind,
    pub doc: String,
}

impl OptionSpec {
    pub fn setting(name: impl Into<String>, shape: ValueShape, doc: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            shape,
            kind: OptionKind::Setting,
            doc: doc.into(),
        }
    }

    /// Check a value against this option's shape
    pub fn check_value(&self, value: &Element) -> Result<(), String> {
        if self.kind == OptionKind::ExtendedMarker {
            if value.is_true() || value.is_nil() || value.is_list() {
                return Ok(());
            }
            return Err(format!(
                ":{} expects t, nil or a list literal, got {}",
                self.name,
                value.shape_name()
            ));
        }

        if !self.shape.accepts(value) {
            return Err(format!(
                ":{} expects {}, got {}",
                self.name,
                self.shape.describe(),
                value.shape_name()
            ));
        }
        Ok(())
    }

    /// The value as it is stored in the settings
    pub fn normalize(&self, value: &Element) -> Element {
        match self.shape {
            ValueShape::Targets => value.clone().into_targets(),
            _ => value.clone(),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum RegistryError {
    #[error("option :{0} is already registered")]
    Duplicate(String),
    #[error("invalid option name {0:?}")]
    InvalidName(String),
}

/// Name → descriptor mapping consulted by the classifier
#[derive(Debug, Clone, Default)]
pub struct OptionRegistry {
    specs: BTreeMap<String, OptionSpec>,
}

impl OptionRegistry {
    /// A registry with no options at all
    pub fn empty() -> Self {
        Self::default()
    }

    /// The built-in option set
    pub fn builtin() -> Self {
        let mut registry = Self::empty();
        let builtins = [
            OptionSpec::setting(KEYMAPS, ValueShape::Targets, "Keymaps the bindings go into"),
            OptionSpec::setting(STATES, ValueShape::Targets, "Editing states the bindings apply in"),
            OptionSpec::setting("prefix", ValueShape::KeyLiteral, "Key prepended to every key"),
            OptionSpec::setting(
                "non-normal-prefix",
                ValueShape::KeyLiteral,
                "Prefix used in insert-like states",
            ),
            OptionSpec::setting(
                "global-prefix",
                ValueShape::KeyLiteral,
                "Prefix used in every state",
            ),
            OptionSpec::setting("infix", ValueShape::KeyLiteral, "Key inserted after the prefix"),
            OptionSpec::setting(
                "prefix-command",
                ValueShape::Symbol,
                "Command created for the prefix key",
            ),
            OptionSpec::setting("prefix-map", ValueShape::Symbol, "Keymap created for the prefix key"),
            OptionSpec::setting("prefix-name", ValueShape::Any, "Menu name of the prefix keymap"),
            OptionSpec::setting("predicate", ValueShape::Any, "Condition the bindings depend on"),
            OptionSpec::setting(
                "major-modes",
                ValueShape::Targets,
                "Major modes the keymaps belong to",
            ),
            OptionSpec::setting(
                "wk-full-keys",
                ValueShape::Boolean,
                "Whether descriptions match full key sequences",
            ),
            OptionSpec {
                name: EXTENDED.to_string(),
                shape: ValueShape::Any,
                kind: OptionKind::ExtendedMarker,
                doc: "t switches the section to extended entries; a list is one extended entry"
                    .to_string(),
            },
        ];

        for spec in builtins {
            registry.specs.insert(spec.name.clone(), spec);
        }
        registry
    }

    /// Add an option; names must be unique
    pub fn register(&mut self, spec: OptionSpec) -> Result<(), RegistryError> {
        if spec.name.is_empty() || spec.name.starts_with(':') || spec.name.contains(char::is_whitespace) {
            return Err(RegistryError::InvalidName(spec.name));
        }
        if self.specs.contains_key(&spec.name) {
            return Err(RegistryError::Duplicate(spec.name));
        }
        tracing::debug!("Registered option :{} ({})", spec.name, spec.shape);
        self.specs.insert(spec.name.clone(), spec);
        Ok(())
    }

    /// Builder-style [`register`](Self::register)
    pub fn with_option(mut self, spec: OptionSpec) -> Result<Self, RegistryError> {
        self.register(spec)?;
        Ok(self)
    }

    pub fn get(&self, name: &str) -> Option<&OptionSpec> {
        self.specs.get(name)
    }

    pub fn contains(&self, name: &str) -> bool {
        self.specs.contains_key(name)
    }

    pub fn names(&self) -> impl Iterator<Item = &str> {
        self.specs.keys().map(String::as_str)
    }

    pub fn specs(&self) -> impl Iterator<Item = &OptionSpec> {
        self.specs.values()
    }

    pub fn len(&self) -> usize {
        self.specs.len()
    }

    pub fn is_empty(&self) -> bool {
        self.specs.is_empty()
    }

    /// Closest registered name to a misspelled one
    pub fn suggest(&self, name: &str) -> Option<String> {
        self.names()
            .min_by_key(|known| strsim::levenshtein(name, known))
            .filter(|known| strsim::levenshtein(name, known) <= 3)
            .map(str::to_string)
    }
}
