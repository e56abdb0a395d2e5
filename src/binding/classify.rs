//! Token classification for binding forms
//!
//! The classifier walks the raw elements strictly left to right and assigns
//! every element exactly one [`TokenKind`]. The only part that depends on the
//! heuristic flag is the leading section (before the key section starts); it
//! is delegated to a [`PrefixStrategy`] so the heuristic can be switched off
//! without touching the separator-driven path.

use super::element::Element;
use super::error::CompileError;
use super::options::{OptionKind, OptionRegistry, OptionSpec};

const SEPARATOR_REQUIRED: &str = "heuristic mode disabled; separator required here";

/// Classification of a single input element
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum TokenKind {
    /// Positional keymap/state target in the leading section
    ContextValue,
    /// A registered option name
    OptionName,
    /// The element following an option name or extended marker
    OptionValue,
    SectionSeparator,
    ClearingSeparator,
    /// The `:ext` option name
    ExtendedMarker,
    /// A list literal passed through as one entry
    ExtendedEntry,
    KeyAtom,
    DefinitionAtom,
}

/// A classified element, borrowing its payload from the input
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Token<'a> {
    pub kind: TokenKind,
    /// Position of the element in the input sequence
    pub index: usize,
    pub element: &'a Element,
    /// Descriptor of the option this token names or belongs to
    pub option: Option<&'a OptionSpec>,
}

/// Outcome of classifying one element of the leading section
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum PrefixClass {
    ContextValue,
    /// The key section starts at this element
    KeySectionStart,
}

/// How elements before the key section are told apart from keys
pub trait PrefixStrategy {
    fn classify(&self, index: usize, element: &Element) -> Result<PrefixClass, CompileError>;

    /// Whether input may end before any key section was opened
    fn allows_open_end(&self) -> bool;
}

/// Context values end only at an explicit separator
#[derive(Debug, Clone, Copy)]
pub struct ExplicitStrategy {
    /// Whether the input contains any separator at all
    pub has_separator: bool,
}

impl PrefixStrategy for ExplicitStrategy {
    fn classify(&self, index: usize, element: &Element) -> Result<PrefixClass, CompileError> {
        if !self.has_separator {
            return Err(CompileError::malformed_with_hint(
                index,
                format!("cannot tell whether {} is a context value or a key", element),
                SEPARATOR_REQUIRED,
            ));
        }
        if element.is_target() {
            return Ok(PrefixClass::ContextValue);
        }
        if element.is_key_literal() {
            return Err(CompileError::malformed_with_hint(
                index,
                format!("key {} appears before the first separator", element),
                "end the context values with | before the keys",
            ));
        }
        Err(CompileError::malformed(
            index,
            format!("{} {} cannot be a keymap or state", element.shape_name(), element),
        ))
    }

    fn allows_open_end(&self) -> bool {
        false
    }
}

/// Best-effort: target-shaped elements are context values, the first
/// key-literal element opens the key section
#[derive(Debug, Clone, Copy, Default)]
pub struct HeuristicStrategy;

impl PrefixStrategy for HeuristicStrategy {
    fn classify(&self, index: usize, element: &Element) -> Result<PrefixClass, CompileError> {
        if element.is_key_literal() {
            return Ok(PrefixClass::KeySectionStart);
        }
        if element.is_target() {
            return Ok(PrefixClass::ContextValue);
        }
        Err(CompileError::malformed_with_hint(
            index,
            format!(
                "cannot infer whether {} {} is a context value or a key",
                element.shape_name(),
                element
            ),
            "add a | separator after the context values",
        ))
    }

    fn allows_open_end(&self) -> bool {
        true
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum Phase {
    Prefix,
    Keys,
}

/// Streaming classifier over a borrowed element sequence
pub struct Classifier<'a> {
    elements: &'a [Element],
    registry: &'a OptionRegistry,
    strategy: Box<dyn PrefixStrategy + 'a>,
    pos: usize,
    phase: Phase,
    /// Option awaiting its value: (index of the name, descriptor)
    awaiting_value: Option<(usize, &'a OptionSpec)>,
    extended_only: bool,
    /// Elements seen so far in the current key/definition run
    run_len: usize,
    done: bool,
}

impl<'a> Classifier<'a> {
    /// Pick the strategy for `elements`: separators always win, the heuristic
    /// only applies to input without any separator
    pub fn new(elements: &'a [Element], registry: &'a OptionRegistry, heuristic: bool) -> Self {
        let has_separator = elements.iter().any(Element::is_separator);
        let strategy: Box<dyn PrefixStrategy + 'a> = if heuristic && !has_separator {
            Box::new(HeuristicStrategy)
        } else {
            Box::new(ExplicitStrategy { has_separator })
        };
        Self::with_strategy(elements, registry, strategy)
    }

    pub fn with_strategy(
        elements: &'a [Element],
        registry: &'a OptionRegistry,
        strategy: Box<dyn PrefixStrategy + 'a>,
    ) -> Self {
        Self {
            elements,
            registry,
            strategy,
            pos: 0,
            phase: Phase::Prefix,
            awaiting_value: None,
            extended_only: false,
            run_len: 0,
            done: false,
        }
    }

    /// Whether the current section only accepts extended entries
    pub fn extended_only(&self) -> bool {
        self.extended_only
    }

    fn token(&self, kind: TokenKind, index: usize, option: Option<&'a OptionSpec>) -> Token<'a> {
        let elements = self.elements;
        Token {
            kind,
            index,
            element: &elements[index],
            option,
        }
    }

    fn classify_end(&mut self) -> Option<Result<Token<'a>, CompileError>> {
        self.done = true;

        if let Some((index, spec)) = self.awaiting_value {
            return Some(Err(CompileError::malformed(
                index,
                format!("option :{} is missing its value", spec.name),
            )));
        }

        if self.phase == Phase::Prefix && !self.strategy.allows_open_end() {
            return Some(Err(CompileError::malformed_with_hint(
                self.elements.len(),
                "no key section reachable",
                SEPARATOR_REQUIRED,
            )));
        }

        None
    }

    fn classify_value(
        &mut self,
        index: usize,
        element: &'a Element,
        name_index: usize,
        spec: &'a OptionSpec,
    ) -> Result<Token<'a>, CompileError> {
        if element.is_separator() {
            return Err(CompileError::malformed(
                name_index,
                format!("option :{} is missing its value", spec.name),
            ));
        }

        spec.check_value(element).map_err(|reason| {
            CompileError::malformed_with_hint(
                index,
                format!("invalid value {} for :{}", element, spec.name),
                reason,
            )
        })?;

        if spec.kind == OptionKind::ExtendedMarker {
            if self.phase == Phase::Prefix {
                return Err(CompileError::malformed_with_hint(
                    name_index,
                    format!(":{} in the leading default section", spec.name),
                    "place :ext after the first separator",
                ));
            }
            // `()` reads as nil here, never as an empty entry
            if element.is_list() && !element.is_nil() {
                return Ok(self.token(TokenKind::ExtendedEntry, index, Some(spec)));
            }
            self.extended_only = element.is_true();
            tracing::trace!(extended_only = self.extended_only, "extended mode toggled");
        }

        Ok(self.token(TokenKind::OptionValue, index, Some(spec)))
    }

    fn classify_keyword(&mut self, index: usize, name: &str) -> Result<Token<'a>, CompileError> {
        let registry = self.registry;
        let spec = registry
            .get(name)
            .ok_or_else(|| CompileError::UnknownOption {
                index,
                name: name.to_string(),
                suggestion: registry.suggest(name),
            })?;

        self.awaiting_value = Some((index, spec));
        self.run_len = 0;

        let kind = match spec.kind {
            OptionKind::Setting => TokenKind::OptionName,
            OptionKind::ExtendedMarker => TokenKind::ExtendedMarker,
        };
        Ok(self.token(kind, index, Some(spec)))
    }

    fn classify_entry(&mut self, index: usize, element: &'a Element) -> Result<Token<'a>, CompileError> {
        if self.extended_only {
            if matches!(element, Element::List(items) if items.is_empty()) {
                return Err(CompileError::malformed(
                    index,
                    "empty extended entry () has no key",
                ));
            }
            if element.is_list() {
                return Ok(self.token(TokenKind::ExtendedEntry, index, None));
            }
            return Err(CompileError::malformed_with_hint(
                index,
                format!("expected an extended entry, found {} {}", element.shape_name(), element),
                "this section is in extended-only mode (:ext t)",
            ));
        }

        if element.is_list() {
            return Err(CompileError::malformed_with_hint(
                index,
                format!("list literal {} in key/definition position", element),
                "lists are reserved here; write :ext before an extended entry",
            ));
        }

        let is_key = self.run_len % 2 == 0;
        self.run_len += 1;

        if is_key {
            if !element.is_key_literal() {
                return Err(CompileError::malformed(
                    index,
                    format!("expected a key, found {} {}", element.shape_name(), element),
                ));
            }
            Ok(self.token(TokenKind::KeyAtom, index, None))
        } else {
            Ok(self.token(TokenKind::DefinitionAtom, index, None))
        }
    }

    fn classify_next(&mut self, index: usize) -> Result<Token<'a>, CompileError> {
        let elements = self.elements;
        let element = &elements[index];

        if let Some((name_index, spec)) = self.awaiting_value.take() {
            return self.classify_value(index, element, name_index, spec);
        }

        match element {
            Element::Separator | Element::ClearingSeparator => {
                self.phase = Phase::Keys;
                self.extended_only = false;
                self.run_len = 0;
                let kind = if matches!(element, Element::ClearingSeparator) {
                    TokenKind::ClearingSeparator
                } else {
                    TokenKind::SectionSeparator
                };
                Ok(self.token(kind, index, None))
            }
            Element::Keyword(name) => self.classify_keyword(index, name),
            _ if self.phase == Phase::Prefix => match self.strategy.classify(index, element)? {
                PrefixClass::ContextValue => Ok(self.token(TokenKind::ContextValue, index, None)),
                PrefixClass::KeySectionStart => {
                    self.phase = Phase::Keys;
                    self.classify_entry(index, element)
                }
            },
            _ => self.classify_entry(index, element),
        }
    }
}

impl<'a> Iterator for Classifier<'a> {
    type Item = Result<Token<'a>, CompileError>;

    fn next(&mut self) -> Option<Self::Item> {
        if self.done {
            return None;
        }

        if self.pos >= self.elements.len() {
            return self.classify_end();
        }

        let index = self.pos;
        self.pos += 1;

        let result = self.classify_next(index);
        match &result {
            Ok(token) => tracing::trace!(index, kind = ?token.kind, element = %token.element, "classified"),
            Err(_) => self.done = true,
        }
        Some(result)
    }
}
