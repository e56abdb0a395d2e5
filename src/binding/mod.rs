//! Binding form compiler
//!
//! Turns one flat argument stream of context values, options, separators and
//! key/definition entries into independent batches, each with a fully
//! resolved settings snapshot:
//!
//! # Architecture
//!
//! ```text
//! text → reader::read() → [Element] → Classifier → [Token] → Compiler → [Batch] → Binder
//! ```
//!
//! # Example
//!
//! ```ignore
//! let elements = read(r#"normal global-map | :prefix "SPC" "f" find-file"#)?;
//! let batches = Compiler::default().compile(&elements)?;
//! ```

mod batch;
mod binder;
mod classify;
mod compiler;
mod element;
mod error;
mod options;
mod reader;
mod settings;

pub use batch::{Batch, KeyDefEntry};
pub use binder::{apply, define, Binder, DefineError, RecordingBinder};
pub use classify::{
    Classifier, ExplicitStrategy, HeuristicStrategy, PrefixClass, PrefixStrategy, Token, TokenKind,
};
pub use compiler::{compile, CompileOptions, Compiler};
pub use element::Element;
pub use error::CompileError;
pub use options::{
    OptionKind, OptionRegistry, OptionSpec, RegistryError, ValueShape, EXTENDED, KEYMAPS, STATES,
};
pub use reader::{read, ReadError};
pub use settings::{ClearPolicy, Settings};

#[cfg(test)]
mod tests;
