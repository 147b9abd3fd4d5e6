//! Plugin host for running WASM generators.
//!
//! This module provides the `GeneratorHost` which loads the modules of one
//! classpath and runs the generators they provide.

use std::collections::HashMap;
use std::path::Path;

use tracing::{debug, warn};

use crate::executor::GeneratorExecutor;
use crate::{
    ExtismExecutor, GenerateRequest, GenerateResponse, GeneratorManifest, PluginError,
    PluginOptions,
};

/// Host for loading and executing WASM generator modules.
///
/// # Example
///
/// ```rust,ignore
/// use modelgen_plugin::{GenerateRequest, GeneratorHost, PluginOptions};
///
/// let mut host = GeneratorHost::new();
/// host.load_module("./generators/c.wasm", PluginOptions::default())?;
///
/// let response = host.run("etrice-c", &GenerateRequest::new(&args, &models))?;
/// ```
pub struct GeneratorHost {
    /// The WASM executor.
    executor: ExtismExecutor,
    /// Generator manifests by name.
    manifests: HashMap<String, GeneratorManifest>,
    /// Aliases mapping (alias -> real_name).
    aliases: HashMap<String, String>,
}

impl GeneratorHost {
    /// Creates a new, empty generator host.
    pub fn new() -> Self {
        Self {
            executor: ExtismExecutor::new(),
            manifests: HashMap::new(),
            aliases: HashMap::new(),
        }
    }

    /// Loads a generator module from a WASM file.
    ///
    /// # Returns
    ///
    /// The generator manifest on success.
    pub fn load_module(
        &mut self,
        path: impl AsRef<Path>,
        options: PluginOptions,
    ) -> Result<GeneratorManifest, PluginError> {
        let path = path.as_ref();
        debug!("Loading generator module from {}", path.display());
        let result = self.executor.load_file(path, options)?;
        Ok(self.register(result.manifest))
    }

    /// Loads a generator module from WASM bytes; `module` only labels errors.
    pub fn load_module_bytes(
        &mut self,
        module: impl AsRef<Path>,
        wasm_bytes: &[u8],
        options: PluginOptions,
    ) -> Result<GeneratorManifest, PluginError> {
        let result = self.executor.load(module.as_ref(), wasm_bytes, options)?;
        Ok(self.register(result.manifest))
    }

    fn register(&mut self, manifest: GeneratorManifest) -> GeneratorManifest {
        for alias in &manifest.aliases {
            if self.manifests.contains_key(alias) {
                warn!(
                    "Alias '{}' of '{}' shadows a generator name and is ignored",
                    alias, manifest.name
                );
                continue;
            }
            if let Some(previous) = self.aliases.insert(alias.clone(), manifest.name.clone()) {
                warn!(
                    "Alias '{}' now refers to '{}' instead of '{}'",
                    alias, manifest.name, previous
                );
            }
        }

        self.manifests
            .insert(manifest.name.clone(), manifest.clone());
        manifest
    }

    /// Resolves a generator name or alias to the loaded generator's name.
    pub fn resolve<'a>(&'a self, name: &'a str) -> Result<&'a str, PluginError> {
        if self.manifests.contains_key(name) {
            return Ok(name);
        }

        self.aliases
            .get(name)
            .map(String::as_str)
            .ok_or_else(|| PluginError::not_found(name))
    }

    /// Gets the manifest for a loaded generator (by name or alias).
    pub fn get_manifest(&self, name: &str) -> Option<&GeneratorManifest> {
        let real_name = self.resolve(name).ok()?;
        self.manifests.get(real_name)
    }

    /// Returns the manifests of all loaded generators.
    pub fn manifests(&self) -> impl Iterator<Item = &GeneratorManifest> {
        self.manifests.values()
    }

    /// Returns the names of all loaded generators.
    pub fn loaded_generators(&self) -> impl Iterator<Item = &String> {
        self.manifests.keys()
    }

    /// Returns true if no generator is loaded.
    pub fn is_empty(&self) -> bool {
        self.manifests.is_empty()
    }

    /// Runs a generator.
    ///
    /// # Arguments
    ///
    /// * `name` - Generator name or alias
    /// * `request` - Arguments and models for the run
    ///
    /// # Returns
    ///
    /// The files and messages produced by the generator.
    pub fn run(
        &mut self,
        name: &str,
        request: &GenerateRequest<'_>,
    ) -> Result<GenerateResponse, PluginError> {
        let real_name = self.resolve(name)?.to_string();

        let request_bytes = rmp_serde::to_vec_named(request)
            .map_err(|e| PluginError::protocol(&real_name, format!("invalid request: {}", e)))?;

        let response_bytes = self.executor.call_generate(&real_name, &request_bytes)?;

        rmp_serde::from_slice(&response_bytes)
            .map_err(|e| PluginError::protocol(&real_name, format!("invalid response: {}", e)))
    }

    /// Unloads all generators.
    pub fn unload_all(&mut self) {
        self.manifests.clear();
        self.aliases.clear();
        self.executor.unload_all();
    }
}

impl Default for GeneratorHost {
    fn default() -> Self {
        Self::new()
    }
}
