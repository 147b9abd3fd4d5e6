//! Extism-based WASM executor.
//!
//! This module runs generator modules with Extism, which internally uses
//! wasmtime for JIT compilation.

use std::collections::HashMap;
use std::path::{Path, PathBuf};

use extism::{Manifest, Plugin, Wasm};
// We need MemoryOptions from extism-manifest to configure memory limits
use extism_manifest::MemoryOptions;
use tracing::{debug, info};

use crate::executor::{GeneratorExecutor, LoadResult, PluginOptions};
use crate::{GeneratorManifest, PluginError};

/// Default memory limit for WASM instances (128 MB = 2048 pages).
/// Each WASM page is 64KB.
pub const DEFAULT_MEMORY_MAX_PAGES: u32 = 2048;

/// Default timeout for a single generator call (60 s).
pub const DEFAULT_TIMEOUT_MS: u64 = 60_000;

const MANIFEST_EXPORT: &str = "get_manifest";
const GENERATE_EXPORT: &str = "generate";

/// A loaded generator using Extism.
struct LoadedGenerator {
    /// The Extism plugin instance.
    plugin: Plugin,
    /// Module the generator was loaded from.
    module: PathBuf,
}

/// Extism-based executor.
///
/// Each loaded module gets its own plugin instance, keyed by the generator
/// name from its manifest.
pub struct ExtismExecutor {
    /// Loaded generators by name.
    generators: HashMap<String, LoadedGenerator>,
}

impl ExtismExecutor {
    /// Creates a new Extism executor.
    pub fn new() -> Self {
        Self {
            generators: HashMap::new(),
        }
    }

    /// Configures the manifest with security limits.
    fn configure_manifest(mut manifest: Manifest, options: PluginOptions) -> Manifest {
        // Set execution timeout to prevent infinite loops
        manifest.timeout_ms = Some(options.timeout_ms.unwrap_or(DEFAULT_TIMEOUT_MS));

        // Set memory limits to prevent DoS via memory exhaustion
        manifest.memory = MemoryOptions {
            max_pages: Some(options.memory_max_pages.unwrap_or(DEFAULT_MEMORY_MAX_PAGES)),
            max_http_response_bytes: None,
            max_var_bytes: None,
        };

        manifest.config = options.config;
        manifest
    }
}

impl Default for ExtismExecutor {
    fn default() -> Self {
        Self::new()
    }
}

impl GeneratorExecutor for ExtismExecutor {
    fn load(
        &mut self,
        module: &Path,
        wasm_bytes: &[u8],
        options: PluginOptions,
    ) -> Result<LoadResult, PluginError> {
        info!(
            "Loading WASM generator {} ({} bytes)",
            module.display(),
            wasm_bytes.len()
        );

        let wasm = Wasm::data(wasm_bytes.to_vec());
        let manifest = Self::configure_manifest(Manifest::new([wasm]), options);

        // Create the plugin with WASI support
        let mut plugin = Plugin::new(&manifest, [], true)
            .map_err(|e| PluginError::load(module, format!("Failed to create plugin: {}", e)))?;

        if !plugin.function_exists(GENERATE_EXPORT) {
            return Err(PluginError::load(
                module,
                format!("Module does not export '{}'", GENERATE_EXPORT),
            ));
        }

        let manifest_json: String = plugin.call(MANIFEST_EXPORT, "").map_err(|e| {
            PluginError::load(module, format!("'{}' failed: {}", MANIFEST_EXPORT, e))
        })?;

        let generator_manifest: GeneratorManifest = serde_json::from_str(&manifest_json)
            .map_err(|e| PluginError::invalid_manifest(module, e.to_string()))?;

        let name = generator_manifest.name.clone();
        if let Some(existing) = self.generators.get(&name) {
            return Err(PluginError::DuplicateGenerator {
                name,
                first: existing.module.clone(),
                second: module.to_path_buf(),
            });
        }

        debug!(
            "Loaded generator: {} v{}",
            generator_manifest.name, generator_manifest.version
        );

        self.generators.insert(
            name.clone(),
            LoadedGenerator {
                plugin,
                module: module.to_path_buf(),
            },
        );

        Ok(LoadResult {
            name,
            manifest: generator_manifest,
        })
    }

    fn call_generate(&mut self, name: &str, input_bytes: &[u8]) -> Result<Vec<u8>, PluginError> {
        let generator = self
            .generators
            .get_mut(name)
            .ok_or_else(|| PluginError::not_found(name))?;

        let output: Vec<u8> = generator
            .plugin
            .call(GENERATE_EXPORT, input_bytes)
            .map_err(|e| PluginError::call(name, e.to_string()))?;

        Ok(output)
    }

    fn unload(&mut self, name: &str) -> bool {
        self.generators.remove(name).is_some()
    }

    fn unload_all(&mut self) {
        self.generators.clear();
    }

    fn loaded_generators(&self) -> Vec<&str> {
        self.generators.keys().map(|s| s.as_str()).collect()
    }
}
