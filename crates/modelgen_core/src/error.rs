//! Generation error types.

use thiserror::Error;

/// Errors that can occur while running generators.
#[derive(Debug, Error)]
pub enum GenerateError {
    /// Configuration error.
    #[error("Configuration error: {0}")]
    Config(String),

    /// A model or output file could not be read or written.
    #[error("File error: {0}")]
    File(String),

    /// A generator produced an output the host refuses to write.
    #[error("Invalid generator output: {0}")]
    Output(String),

    /// Plugin error.
    #[error("Plugin error: {0}")]
    Plugin(#[from] modelgen_plugin::PluginError),

    /// Cache error.
    #[error("Cache error: {0}")]
    Cache(#[from] modelgen_cache::CacheError),

    /// I/O error.
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),
}

impl GenerateError {
    /// Creates a configuration error.
    pub fn config(message: impl Into<String>) -> Self {
        Self::Config(message.into())
    }

    /// Creates a file error.
    pub fn file(message: impl Into<String>) -> Self {
        Self::File(message.into())
    }

    /// Creates an output error.
    pub fn output(message: impl Into<String>) -> Self {
        Self::Output(message.into())
    }
}
