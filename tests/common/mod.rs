//! Shared test helpers for integration tests
//!
//! Note: Functions may appear unused because each test file compiles separately.

#![allow(dead_code)]

use bindform::binding::{
    read, Batch, ClearPolicy, CompileError, CompileOptions, Compiler, Element, OptionRegistry,
};

/// Parse a binding form, panicking on reader errors
pub fn elements(src: &str) -> Vec<Element> {
    read(src).unwrap_or_else(|e| panic!("failed to read {:?}: {}", src, e))
}

/// Compile with the built-in registry and the given switches
pub fn compile_src(
    src: &str,
    heuristic: bool,
    policy: ClearPolicy,
) -> Result<Vec<Batch>, CompileError> {
    let options = CompileOptions::default()
        .heuristic(heuristic)
        .clear_policy(policy);
    Compiler::new(OptionRegistry::builtin(), options).compile(&elements(src))
}

/// Compile with default options, panicking on compile errors
pub fn compile_ok(src: &str) -> Vec<Batch> {
    Compiler::default()
        .compile(&elements(src))
        .unwrap_or_else(|e| panic!("failed to compile {:?}: {}", src, e))
}

/// `(name)` as a target list
pub fn list(names: &[&str]) -> Element {
    Element::List(names.iter().map(|n| Element::symbol(*n)).collect())
}
