//! Messages exchanged with the `generate` export.

use serde::{Deserialize, Serialize};

/// A model file handed to a generator.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ModelSource {
    /// Path of the model file as given on the command line.
    pub path: String,
    /// File content.
    pub content: String,
}

impl ModelSource {
    /// Creates a new model source.
    pub fn new(path: impl Into<String>, content: impl Into<String>) -> Self {
        Self {
            path: path.into(),
            content: content.into(),
        }
    }
}

/// Request sent to a generator's `generate` function.
#[derive(Debug, Serialize)]
pub struct GenerateRequest<'a> {
    /// Command-line style arguments, passed through unchanged.
    pub args: &'a [String],
    /// Models to generate from.
    pub models: &'a [ModelSource],
}

impl<'a> GenerateRequest<'a> {
    /// Creates a new request.
    pub fn new(args: &'a [String], models: &'a [ModelSource]) -> Self {
        Self { args, models }
    }
}

/// A file produced by a generator.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct GeneratedFile {
    /// Path relative to the generation directory.
    pub path: String,
    /// File content.
    pub content: String,
}

/// Response from a generator's `generate` function.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct GenerateResponse {
    /// Files to write into the generation directory.
    #[serde(default)]
    pub files: Vec<GeneratedFile>,
    /// Informational messages reported by the generator.
    #[serde(default)]
    pub messages: Vec<String>,
}
