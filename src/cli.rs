//! Command-line argument parsing for the compiler
//!
//! Supports:
//! - Reading a binding form from a file or stdin
//! - Overriding heuristic mode and clear policy from the config file
//! - Text, JSON and YAML output, or a listing of bind calls

use clap::{Parser, ValueEnum};
use std::fmt;
use std::io::Read;
use std::path::PathBuf;

use crate::binding::{ClearPolicy, CompileOptions};
use crate::config::CompilerConfig;

/// Compile key-binding forms into binding batches
#[derive(Parser, Debug)]
#[command(name = "bindform", version, about = "Compile key-binding forms into binding batches")]
pub struct CliArgs {
    /// Binding form to compile; reads stdin when omitted or `-`
    #[arg(value_name = "FILE")]
    pub input: Option<PathBuf>,

    /// Infer where context values end when there is no separator
    #[arg(long, overrides_with = "no_heuristic")]
    pub heuristic: bool,

    /// Require a separator even if the config file enables the heuristic
    #[arg(long, overrides_with = "heuristic")]
    pub no_heuristic: bool,

    /// What `||` resets the settings to (preserve-defaults or all)
    #[arg(long, value_name = "POLICY")]
    pub clear_policy: Option<ClearPolicy>,

    /// Output format
    #[arg(long, value_enum, default_value_t = OutputFormat::Text)]
    pub format: OutputFormat,

    /// List one line per bind call instead of batches
    #[arg(long)]
    pub bind: bool,

    /// Config file to use instead of ~/.config/bindform/config.yaml
    #[arg(long, value_name = "PATH")]
    pub config: Option<PathBuf>,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, ValueEnum)]
pub enum OutputFormat {
    Text,
    Json,
    Yaml,
}

/// Where the binding form comes from
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum InputSource {
    Stdin,
    File(PathBuf),
}

impl InputSource {
    pub fn read_to_string(&self) -> std::io::Result<String> {
        match self {
            InputSource::Stdin => {
                let mut content = String::new();
                std::io::stdin().read_to_string(&mut content)?;
                Ok(content)
            }
            InputSource::File(path) => std::fs::read_to_string(path),
        }
    }
}

impl fmt::Display for InputSource {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            InputSource::Stdin => write!(f, "<stdin>"),
            InputSource::File(path) => write!(f, "{}", path.display()),
        }
    }
}

/// Configuration derived from CLI arguments and the config file
#[derive(Debug, Clone)]
pub struct RunConfig {
    pub input: InputSource,
    pub compile: CompileOptions,
    pub format: OutputFormat,
    pub bind: bool,
}

impl CliArgs {
    /// Merge parsed CLI args over the file configuration; flags win
    pub fn into_config(self, file: &CompilerConfig) -> RunConfig {
        let input = match self.input {
            Some(path) if path.as_os_str() != "-" => InputSource::File(path),
            _ => InputSource::Stdin,
        };

        let heuristic = match (self.heuristic, self.no_heuristic) {
            (true, _) => true,
            (_, true) => false,
            _ => file.heuristic,
        };

        let compile = file
            .compile_options()
            .heuristic(heuristic)
            .clear_policy(self.clear_policy.unwrap_or(file.clear_policy));

        RunConfig {
            input,
            compile,
            format: self.format,
            bind: self.bind,
        }
    }
}
