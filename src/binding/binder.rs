//! Hand-off of compiled batches to a low-level binder

use thiserror::Error;

use super::batch::{Batch, KeyDefEntry};
use super::compiler::Compiler;
use super::element::Element;
use super::error::CompileError;
use super::settings::Settings;

/// Performs one bind call per entry; implemented outside this crate
pub trait Binder {
    type Error;

    fn bind(&mut self, settings: &Settings, entry: &KeyDefEntry) -> Result<(), Self::Error>;
}

/// Bind every entry of every batch in order, stopping at the first failure
pub fn apply<B: Binder>(batches: &[Batch], binder: &mut B) -> Result<usize, B::Error> {
    let mut bound = 0;
    for batch in batches {
        for entry in batch.entries() {
            binder.bind(batch.settings(), entry)?;
            bound += 1;
        }
    }
    Ok(bound)
}

#[derive(Debug, Error)]
pub enum DefineError<E> {
    #[error(transparent)]
    Compile(#[from] CompileError),
    #[error("bind failed: {0}")]
    Bind(E),
}

/// Compile `elements` and, only if that succeeds, bind the result
///
/// Returns the number of entries bound.
pub fn define<B: Binder>(
    compiler: &Compiler,
    elements: &[Element],
    binder: &mut B,
) -> Result<usize, DefineError<B::Error>> {
    let batches = compiler.compile(elements)?;
    apply(&batches, binder).map_err(DefineError::Bind)
}

/// Binder that records every call; handy for previews and tests
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct RecordingBinder {
    pub calls: Vec<(Settings, KeyDefEntry)>,
}

impl RecordingBinder {
    pub fn new() -> Self {
        Self::default()
    }
}

impl Binder for RecordingBinder {
    type Error = std::convert::Infallible;

    fn bind(&mut self, settings: &Settings, entry: &KeyDefEntry) -> Result<(), Self::Error> {
        self.calls.push((settings.clone(), entry.clone()));
        Ok(())
    }
}
