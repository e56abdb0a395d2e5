//! Batch compiler: classified tokens → ordered binding batches
//!
//! One compilation run owns a single `ParseState`; nothing is shared between
//! runs, so a [`Compiler`] can be used from several threads at once.

use std::mem;

use super::batch::{Batch, KeyDefEntry};
use super::classify::{Classifier, Token, TokenKind};
use super::element::Element;
use super::error::CompileError;
use super::options::{OptionKind, OptionRegistry, OptionSpec, KEYMAPS, STATES};
use super::settings::{ClearPolicy, Settings};

/// Per-call compilation flags
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct CompileOptions {
    /// Infer the end of the context values when there is no separator
    pub heuristic: bool,
    /// What a clearing separator resets the settings to
    pub clear_policy: ClearPolicy,
}

impl CompileOptions {
    pub fn heuristic(mut self, enabled: bool) -> Self {
        self.heuristic = enabled;
        self
    }

    pub fn clear_policy(mut self, policy: ClearPolicy) -> Self {
        self.clear_policy = policy;
        self
    }
}

/// Compiles binding forms against an option registry
#[derive(Debug, Clone)]
pub struct Compiler {
    registry: OptionRegistry,
    options: CompileOptions,
}

impl Default for Compiler {
    fn default() -> Self {
        Self::new(OptionRegistry::builtin(), CompileOptions::default())
    }
}

impl Compiler {
    pub fn new(registry: OptionRegistry, options: CompileOptions) -> Self {
        Self { registry, options }
    }

    pub fn registry(&self) -> &OptionRegistry {
        &self.registry
    }

    pub fn options(&self) -> CompileOptions {
        self.options
    }

    /// Classify without compiling
    pub fn classify<'a>(&'a self, elements: &'a [Element]) -> Classifier<'a> {
        Classifier::new(elements, &self.registry, self.options.heuristic)
    }

    /// Compile a whole binding form
    ///
    /// Either every batch is returned or nothing is: the first error aborts
    /// the run.
    pub fn compile(&self, elements: &[Element]) -> Result<Vec<Batch>, CompileError> {
        let mut state = ParseState::new(self.options);

        for token in self.classify(elements) {
            state.apply(token?)?;
        }

        let batches = state.finish()?;
        tracing::debug!(
            elements = elements.len(),
            batches = batches.len(),
            heuristic = self.options.heuristic,
            "compiled binding form"
        );
        Ok(batches)
    }
}

/// Compile with the built-in option registry
pub fn compile(elements: &[Element], options: CompileOptions) -> Result<Vec<Batch>, CompileError> {
    Compiler::new(OptionRegistry::builtin(), options).compile(elements)
}

/// Mutable state of one compilation run
struct ParseState<'a> {
    options: CompileOptions,
    /// Settings applied to the batch under construction
    live: Settings,
    /// Snapshot taken when the leading default section ended
    defaults: Option<Settings>,
    /// Positional keymap/state targets seen in the leading section
    positional: Vec<Element>,
    /// Entries of the batch under construction
    entries: Vec<KeyDefEntry>,
    /// A key waiting for its definition
    pending_key: Option<(usize, &'a Element)>,
    /// An option name waiting for its value
    pending_option: Option<&'a OptionSpec>,
    batches: Vec<Batch>,
}

impl<'a> ParseState<'a> {
    fn new(options: CompileOptions) -> Self {
        Self {
            options,
            live: Settings::new(),
            defaults: None,
            positional: Vec::new(),
            entries: Vec::new(),
            pending_key: None,
            pending_option: None,
            batches: Vec::new(),
        }
    }

    fn in_defaults(&self) -> bool {
        self.defaults.is_none()
    }

    fn apply(&mut self, token: Token<'a>) -> Result<(), CompileError> {
        match token.kind {
            TokenKind::ContextValue => self.push_context_value(token),
            TokenKind::OptionName | TokenKind::ExtendedMarker => {
                self.check_unpaired()?;
                self.pending_option = token.option;
                Ok(())
            }
            TokenKind::OptionValue => {
                self.set_option(token);
                Ok(())
            }
            TokenKind::SectionSeparator => self.separator(false),
            TokenKind::ClearingSeparator => self.separator(true),
            TokenKind::KeyAtom => {
                self.end_defaults();
                self.pending_key = Some((token.index, token.element));
                Ok(())
            }
            TokenKind::DefinitionAtom => {
                let (_, key) = self.pending_key.take().ok_or_else(|| {
                    CompileError::malformed(token.index, "definition without a key")
                })?;
                self.entries
                    .push(KeyDefEntry::plain(key.clone(), token.element.clone()));
                Ok(())
            }
            TokenKind::ExtendedEntry => {
                self.check_unpaired()?;
                self.end_defaults();
                self.pending_option = None;
                self.entries.push(KeyDefEntry::extended(token.element.clone()));
                Ok(())
            }
        }
    }

    /// One positional value targets keymaps; two target states, then keymaps
    fn push_context_value(&mut self, token: Token<'a>) -> Result<(), CompileError> {
        if self.positional.len() == 2 {
            return Err(CompileError::malformed_with_hint(
                token.index,
                format!("unexpected third context value {}", token.element),
                "at most a state and a keymap may precede the keys",
            ));
        }
        self.positional.push(token.element.clone().into_targets());

        match self.positional.as_slice() {
            [keymaps] => {
                self.live.set(KEYMAPS, keymaps.clone());
            }
            [states, keymaps] => {
                self.live.set(STATES, states.clone());
                self.live.set(KEYMAPS, keymaps.clone());
            }
            _ => {}
        }
        Ok(())
    }

    fn set_option(&mut self, token: Token<'a>) {
        let Some(spec) = self.pending_option.take().or(token.option) else {
            return;
        };

        match spec.kind {
            OptionKind::Setting => {
                self.live.set(spec.name.clone(), spec.normalize(token.element));
            }
            // Extended-only mode only changes classification
            OptionKind::ExtendedMarker => {
                tracing::trace!(value = %token.element, "extended marker");
            }
        }
    }

    fn check_unpaired(&self) -> Result<(), CompileError> {
        match self.pending_key {
            Some((index, key)) => Err(CompileError::UnpairedKey {
                index,
                key: key.clone(),
            }),
            None => Ok(()),
        }
    }

    /// Close the leading default section, remembering what it established
    fn end_defaults(&mut self) {
        if self.in_defaults() {
            tracing::trace!(settings = %self.live, "default section closed");
            self.defaults = Some(self.live.clone());
            self.positional.clear();
        }
    }

    fn separator(&mut self, clearing: bool) -> Result<(), CompileError> {
        self.check_unpaired()?;
        self.end_defaults();
        self.flush();

        if clearing {
            self.live = match self.options.clear_policy {
                ClearPolicy::PreserveDefaults => self.defaults.clone().unwrap_or_default(),
                ClearPolicy::All => Settings::new(),
            };
            tracing::debug!(policy = %self.options.clear_policy, settings = %self.live, "settings cleared");
        }
        Ok(())
    }

    fn flush(&mut self) {
        if self.entries.is_empty() {
            return;
        }
        let entries = mem::take(&mut self.entries);
        tracing::debug!(
            batch = self.batches.len(),
            entries = entries.len(),
            settings = %self.live,
            "flushed batch"
        );
        self.batches.push(Batch::new(self.live.clone(), entries));
    }

    fn finish(mut self) -> Result<Vec<Batch>, CompileError> {
        self.check_unpaired()?;
        self.flush();
        Ok(self.batches)
    }
}
