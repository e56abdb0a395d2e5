//! Raw input elements of a binding form
//!
//! A binding form is one flat sequence of heterogeneous elements. The
//! classifier only looks at the *shape* of each element; payloads are passed
//! through to the binder untouched.

use std::fmt;

use serde::{Deserialize, Serialize};

/// A single raw element of a binding form
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Element {
    /// Identifier, e.g. `normal`, `global-map`, `t`, `nil`
    Symbol(String),
    /// Option-name shaped token, written `:name` (stored without the colon)
    Keyword(String),
    /// String literal, the usual key description shape
    Str(String),
    /// Vector literal, a key-sequence shape
    Vector(Vec<Element>),
    /// List literal, opaque payload
    List(Vec<Element>),
    /// Callable reference, written `#'name`
    Function(String),
    /// Section separator, written `|`
    Separator,
    /// Clearing separator, written `||`
    ClearingSeparator,
}

impl Element {
    pub fn symbol(name: impl Into<String>) -> Self {
        Element::Symbol(name.into())
    }

    pub fn keyword(name: impl Into<String>) -> Self {
        Element::Keyword(name.into())
    }

    pub fn string(text: impl Into<String>) -> Self {
        Element::Str(text.into())
    }

    pub fn function(name: impl Into<String>) -> Self {
        Element::Function(name.into())
    }

    /// Shapes reserved for keys: strings and vectors
    pub fn is_key_literal(&self) -> bool {
        matches!(self, Element::Str(_) | Element::Vector(_))
    }

    /// A keymap/state target: an identifier or a non-empty list of identifiers
    pub fn is_target(&self) -> bool {
        match self {
            Element::Symbol(_) => true,
            Element::List(items) => {
                !items.is_empty() && items.iter().all(|item| matches!(item, Element::Symbol(_)))
            }
            _ => false,
        }
    }

    pub fn is_separator(&self) -> bool {
        matches!(self, Element::Separator | Element::ClearingSeparator)
    }

    pub fn is_list(&self) -> bool {
        matches!(self, Element::List(_))
    }

    /// The `t` sentinel
    pub fn is_true(&self) -> bool {
        matches!(self, Element::Symbol(s) if s == "t")
    }

    /// The `nil` sentinel (also accepts the empty list)
    pub fn is_nil(&self) -> bool {
        match self {
            Element::Symbol(s) => s == "nil",
            Element::List(items) => items.is_empty(),
            _ => false,
        }
    }

    /// Normalize a target element into a list of identifiers
    ///
    /// `normal` becomes `(normal)`; lists are kept as they are.
    pub fn into_targets(self) -> Element {
        match self {
            Element::List(items) => Element::List(items),
            other => Element::List(vec![other]),
        }
    }

    /// Short human-readable name of the element's shape, used in diagnostics
    pub fn shape_name(&self) -> &'static str {
        match self {
            Element::Symbol(_) => "identifier",
            Element::Keyword(_) => "option name",
            Element::Str(_) => "string",
            Element::Vector(_) => "vector",
            Element::List(_) => "list",
            Element::Function(_) => "function reference",
            Element::Separator => "separator",
            Element::ClearingSeparator => "clearing separator",
        }
    }
}

fn write_seq(f: &mut fmt::Formatter<'_>, open: char, items: &[Element], close: char) -> fmt::Result {
    write!(f, "{}", open)?;
    for (i, item) in items.iter().enumerate() {
        if i > 0 {
            write!(f, " ")?;
        }
        write!(f, "{}", item)?;
    }
    write!(f, "{}", close)
}

impl fmt::Display for Element {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Element::Symbol(s) => write!(f, "{}", s),
            Element::Keyword(k) => write!(f, ":{}", k),
            Element::Str(s) => {
                write!(f, "\"")?;
                for c in s.chars() {
                    match c {
                        '"' => write!(f, "\\\"")?,
                        '\\' => write!(f, "\\\\")?,
                        '\n' => write!(f, "\\n")?,
                        '\t' => write!(f, "\\t")?,
                        c => write!(f, "{}", c)?,
                    }
                }
                write!(f, "\"")
            }
            Element::Vector(items) => write_seq(f, '[', items, ']'),
            Element::List(items) => write_seq(f, '(', items, ')'),
            Element::Function(name) => write!(f, "#'{}", name),
            Element::Separator => write!(f, "|"),
            Element::ClearingSeparator => write!(f, "||"),
        }
    }
}
