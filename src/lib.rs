//! bindform - key-binding form compiler
//!
//! This crate parses one flat binding form (context values, options,
//! separators and key/definition entries) into independent binding batches,
//! each carrying a fully resolved settings snapshot, ready for a low-level
//! binder.

pub mod binding;
pub mod cli;
pub mod config;
pub mod config_paths;
pub mod output;
pub mod tracing;

// Re-export commonly used types
pub use binding::{
    compile, read, Batch, CompileError, CompileOptions, Compiler, Element, KeyDefEntry, Settings,
};
pub use config::CompilerConfig;
