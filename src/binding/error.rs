//! Errors produced while compiling a binding form

use thiserror::Error;

use super::element::Element;

/// A compilation failure; compilation is all-or-nothing
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum CompileError {
    /// An element cannot be classified in its position
    #[error("malformed input at element {index}: {message}{}", hint_suffix(.hint))]
    MalformedInput {
        index: usize,
        message: String,
        hint: Option<String>,
    },

    /// An option-name shaped element that is not registered
    #[error("unknown option :{name} at element {index}{}", suggestion_suffix(.suggestion))]
    UnknownOption {
        index: usize,
        name: String,
        suggestion: Option<String>,
    },

    /// A key/definition run ended on a key
    #[error("key {key} at element {index} has no definition")]
    UnpairedKey { index: usize, key: Element },
}

impl CompileError {
    pub(crate) fn malformed(index: usize, message: impl Into<String>) -> Self {
        CompileError::MalformedInput {
            index,
            message: message.into(),
            hint: None,
        }
    }

    pub(crate) fn malformed_with_hint(
        index: usize,
        message: impl Into<String>,
        hint: impl Into<String>,
    ) -> Self {
        CompileError::MalformedInput {
            index,
            message: message.into(),
            hint: Some(hint.into()),
        }
    }

    /// Position of the offending element in the input sequence
    pub fn index(&self) -> usize {
        match self {
            CompileError::MalformedInput { index, .. }
            | CompileError::UnknownOption { index, .. }
            | CompileError::UnpairedKey { index, .. } => *index,
        }
    }

    pub fn hint(&self) -> Option<&str> {
        match self {
            CompileError::MalformedInput { hint, .. } => hint.as_deref(),
            _ => None,
        }
    }
}

fn hint_suffix(hint: &Option<String>) -> String {
    match hint {
        Some(hint) => format!(" ({})", hint),
        None => String::new(),
    }
}

fn suggestion_suffix(suggestion: &Option<String>) -> String {
    match suggestion {
        Some(name) => format!("; did you mean :{}?", name),
        None => String::new(),
    }
}
