//! Compiler configuration persistence
//!
//! Stores compiler defaults in `~/.config/bindform/config.yaml`:
//!
//! ```yaml
//! heuristic: true
//! clear_policy: preserve-defaults
//! options:
//!   - name: repeat
//!     shape: boolean
//!     doc: Make the keys repeatable
//! ```

use std::path::{Path, PathBuf};

use serde::{Deserialize, Serialize};
use thiserror::Error;

use crate::binding::{
    ClearPolicy, CompileOptions, Compiler, OptionRegistry, OptionSpec, RegistryError, ValueShape,
};

/// An extra option made known to the classifier
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct OptionConfig {
    pub name: String,
    #[serde(default = "default_shape")]
    pub shape: ValueShape,
    #[serde(default)]
    pub doc: String,
}

fn default_shape() -> ValueShape {
    ValueShape::Any
}

/// Compiler configuration that persists across runs
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct CompilerConfig {
    /// Infer the end of the context values when no separator is given
    #[serde(default)]
    pub heuristic: bool,

    /// What a clearing separator resets the settings to
    #[serde(default)]
    pub clear_policy: ClearPolicy,

    /// Options registered on top of the built-in set
    #[serde(default)]
    pub options: Vec<OptionConfig>,
}

#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("failed to read config at {}: {source}", .path.display())]
    Io {
        path: PathBuf,
        source: std::io::Error,
    },
    #[error("failed to parse config: {0}")]
    Parse(#[from] serde_yaml::Error),
    #[error(transparent)]
    Registry(#[from] RegistryError),
}

impl CompilerConfig {
    /// Load config from the default location, or return defaults if not found
    pub fn load() -> Self {
        let Some(path) = crate::config_paths::config_file() else {
            tracing::debug!("No config directory available, using defaults");
            return Self::default();
        };

        if !path.exists() {
            tracing::debug!(
                "Config file not found at {}, using defaults",
                path.display()
            );
            return Self::default();
        }

        match Self::load_from(&path) {
            Ok(config) => {
                tracing::info!("Loaded config from {}", path.display());
                config
            }
            Err(e) => {
                tracing::warn!("{}; using defaults", e);
                Self::default()
            }
        }
    }

    /// Load config from an explicit path
    pub fn load_from(path: &Path) -> Result<Self, ConfigError> {
        let content = std::fs::read_to_string(path).map_err(|source| ConfigError::Io {
            path: path.to_path_buf(),
            source,
        })?;
        Self::from_yaml(&content)
    }

    /// Parse config from a YAML string
    pub fn from_yaml(yaml: &str) -> Result<Self, ConfigError> {
        Ok(serde_yaml::from_str(yaml)?)
    }

    /// Built-in registry extended with the configured options
    pub fn registry(&self) -> Result<OptionRegistry, ConfigError> {
        let mut registry = OptionRegistry::builtin();
        for option in &self.options {
            registry.register(OptionSpec::setting(
                option.name.clone(),
                option.shape,
                option.doc.clone(),
            ))?;
        }
        Ok(registry)
    }

    pub fn compile_options(&self) -> CompileOptions {
        CompileOptions::default()
            .heuristic(self.heuristic)
            .clear_policy(self.clear_policy)
    }

    /// A compiler set up from this configuration
    pub fn compiler(&self) -> Result<Compiler, ConfigError> {
        Ok(Compiler::new(self.registry()?, self.compile_options()))
    }
}
