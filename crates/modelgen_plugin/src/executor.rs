//! Generator executor abstraction.
//!
//! This module provides the `GeneratorExecutor` trait which abstracts
//! the WASM runtime implementation behind the host.

use std::collections::BTreeMap;
use std::path::Path;

use crate::{GeneratorManifest, PluginError};

/// Options for configuring a WASM module at load time.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct PluginOptions {
    /// Initial configuration variables for the generator.
    pub config: BTreeMap<String, String>,
    /// Limit on memory pages (each page is 64KB).
    pub memory_max_pages: Option<u32>,
    /// Execution timeout in milliseconds.
    pub timeout_ms: Option<u64>,
}

/// Result from loading a WASM generator.
#[derive(Debug)]
pub struct LoadResult {
    /// The generator name extracted from the manifest.
    pub name: String,
    /// The generator manifest.
    pub manifest: GeneratorManifest,
}

/// Trait for WASM generator execution.
pub trait GeneratorExecutor {
    /// Loads a WASM generator from bytes.
    ///
    /// # Arguments
    ///
    /// * `module` - Where the bytes came from, reported in errors
    /// * `wasm_bytes` - The WASM binary content
    /// * `options` - Plugin execution options
    ///
    /// # Returns
    ///
    /// The generator name and manifest on success.
    fn load(
        &mut self,
        module: &Path,
        wasm_bytes: &[u8],
        options: PluginOptions,
    ) -> Result<LoadResult, PluginError>;

    /// Loads a WASM generator from a file path.
    fn load_file(&mut self, path: &Path, options: PluginOptions) -> Result<LoadResult, PluginError> {
        let wasm_bytes = std::fs::read(path).map_err(|e| PluginError::io(path, e))?;
        self.load(path, &wasm_bytes, options)
    }

    /// Calls the `generate` function of a loaded generator.
    ///
    /// # Arguments
    ///
    /// * `name` - Name of the generator to call
    /// * `input_bytes` - Msgpack-serialized GenerateRequest
    ///
    /// # Returns
    ///
    /// Msgpack-serialized GenerateResponse on success.
    fn call_generate(&mut self, name: &str, input_bytes: &[u8]) -> Result<Vec<u8>, PluginError>;

    /// Unloads a generator.
    ///
    /// Returns `true` if the generator was unloaded, `false` if it wasn't loaded.
    fn unload(&mut self, name: &str) -> bool;

    /// Unloads all generators.
    fn unload_all(&mut self);

    /// Returns the names of all loaded generators.
    fn loaded_generators(&self) -> Vec<&str>;

    /// Checks if a generator is loaded.
    fn is_loaded(&self, name: &str) -> bool {
        self.loaded_generators().contains(&name)
    }
}
