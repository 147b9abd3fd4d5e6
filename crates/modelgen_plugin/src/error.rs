//! Generator runtime errors.

use std::path::{Path, PathBuf};

use thiserror::Error;

/// Errors that can occur while loading or running generator modules.
#[derive(Debug, Error)]
pub enum PluginError {
    /// The module could not be instantiated or does not look like a generator.
    #[error("Failed to load generator module {}: {message}", module.display())]
    LoadError { module: PathBuf, message: String },

    /// The module could not be read from disk.
    #[error("Failed to read generator module {}: {source}", module.display())]
    Io {
        module: PathBuf,
        #[source]
        source: std::io::Error,
    },

    /// `get_manifest` returned something that is not a generator manifest.
    #[error("Invalid manifest in {}: {message}", module.display())]
    InvalidManifest { module: PathBuf, message: String },

    /// Two modules of one classpath declare the same generator name.
    #[error(
        "Generator '{name}' is provided by both {} and {}",
        first.display(),
        second.display()
    )]
    DuplicateGenerator {
        name: String,
        first: PathBuf,
        second: PathBuf,
    },

    /// The generator trapped, timed out or exhausted its memory.
    #[error("Generator '{generator}' failed: {message}")]
    CallError { generator: String, message: String },

    /// The request or response could not be encoded.
    #[error("Generator '{generator}' exchanged a malformed message: {message}")]
    Protocol { generator: String, message: String },

    /// No loaded generator has this name or alias.
    #[error("Generator not found: {0}")]
    NotFound(String),

    /// The host was released and can no longer run generators.
    #[error("Generator host has been released")]
    Released,
}

impl PluginError {
    pub fn load(module: impl AsRef<Path>, message: impl Into<String>) -> Self {
        Self::LoadError {
            module: module.as_ref().to_path_buf(),
            message: message.into(),
        }
    }

    pub fn io(module: impl AsRef<Path>, source: std::io::Error) -> Self {
        Self::Io {
            module: module.as_ref().to_path_buf(),
            source,
        }
    }

    pub fn invalid_manifest(module: impl AsRef<Path>, message: impl Into<String>) -> Self {
        Self::InvalidManifest {
            module: module.as_ref().to_path_buf(),
            message: message.into(),
        }
    }

    pub fn call(generator: impl Into<String>, message: impl Into<String>) -> Self {
        Self::CallError {
            generator: generator.into(),
            message: message.into(),
        }
    }

    pub fn protocol(generator: impl Into<String>, message: impl Into<String>) -> Self {
        Self::Protocol {
            generator: generator.into(),
            message: message.into(),
        }
    }

    pub fn not_found(name: impl Into<String>) -> Self {
        Self::NotFound(name.into())
    }

    /// Returns the module a load-time error refers to.
    pub fn module(&self) -> Option<&Path> {
        match self {
            Self::LoadError { module, .. }
            | Self::Io { module, .. }
            | Self::InvalidManifest { module, .. } => Some(module),
            Self::DuplicateGenerator { second, .. } => Some(second),
            _ => None,
        }
    }
}
