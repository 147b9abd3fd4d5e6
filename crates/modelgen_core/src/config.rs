//! Generator configuration.

use std::collections::BTreeMap;
use std::fs;
use std::path::{Path, PathBuf};
use std::sync::OnceLock;

use jsonc_parser::ParseOptions;
use jsonschema::Validator;
use modelgen_cache::DEFAULT_CAPACITY;
use modelgen_plugin::PluginOptions;
use serde::{Deserialize, Serialize};

use crate::GenerateError;
use crate::task::TaskDefinition;

// Embed the schema
const SCHEMA_JSON: &str = include_str!("../../../schemas/v1/config.json");
static CONFIG_SCHEMA: OnceLock<Result<Validator, String>> = OnceLock::new();

/// Configuration for modelgen.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ModelgenConfig {
    /// Number of classpaths whose generator modules stay loaded.
    ///
    /// Kept signed so that a negative value reaches the cache and is
    /// rejected there.
    #[serde(default = "default_cache_size")]
    pub cache_size: i64,

    /// Memory limit for each generator module, in 64KB pages.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub memory_max_pages: Option<u32>,

    /// Timeout for a single generator call in milliseconds.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub timeout_ms: Option<u64>,

    /// Generators that tasks may refer to, keyed by registry name.
    #[serde(default)]
    pub generators: BTreeMap<String, GeneratorDefinition>,

    /// Generation tasks run by `mgen generate`.
    #[serde(default)]
    pub tasks: Vec<TaskDefinition>,

    /// Base directory for resolving relative paths.
    /// This is usually the directory containing the configuration file.
    #[serde(skip)]
    pub base_dir: Option<PathBuf>,
}

fn default_cache_size() -> i64 {
    DEFAULT_CAPACITY as i64
}

/// A generator entry in the `generators` section.
#[derive(Debug, Clone, Default, Serialize, Deserialize, PartialEq, Eq)]
pub struct GeneratorDefinition {
    /// Name of the generator in the module manifest. Defaults to the key.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub export: Option<String>,

    /// Additional names the generator can be requested by.
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub aliases: Vec<String>,
}

impl ModelgenConfig {
    /// Configuration file names, in lookup order.
    pub const CONFIG_FILES: &'static [&'static str] = &[".modelgen.jsonc", ".modelgen.json"];

    /// Creates a new empty configuration.
    pub fn new() -> Self {
        Self {
            cache_size: default_cache_size(),
            memory_max_pages: None,
            timeout_ms: None,
            generators: BTreeMap::new(),
            tasks: Vec::new(),
            base_dir: None,
        }
    }

    /// Loads configuration from a file.
    ///
    /// Comments and trailing commas are accepted in both `.jsonc` and
    /// `.json` files.
    pub fn from_file(path: impl AsRef<Path>) -> Result<Self, GenerateError> {
        let path = path.as_ref();
        let content = fs::read_to_string(path).map_err(|e| {
            GenerateError::config(format!("Failed to read {}: {}", path.display(), e))
        })?;

        let mut config = Self::from_jsonc(&content)?;

        if let Some(parent) = path.parent() {
            config.base_dir = Some(parent.to_path_buf());
        }

        Ok(config)
    }

    /// Parses configuration from a JSONC string with schema validation.
    pub fn from_jsonc(content: &str) -> Result<Self, GenerateError> {
        let value = jsonc_parser::parse_to_serde_value(content, &ParseOptions::default())
            .map_err(|e| GenerateError::config(format!("Invalid JSON: {}", e)))?
            .unwrap_or(serde_json::Value::Object(serde_json::Map::new()));

        Self::from_value(value)
    }

    /// Parses configuration from a strict JSON string with schema validation.
    pub fn from_json(json: &str) -> Result<Self, GenerateError> {
        let value: serde_json::Value = serde_json::from_str(json)
            .map_err(|e| GenerateError::config(format!("Invalid JSON: {}", e)))?;

        Self::from_value(value)
    }

    fn from_value(value: serde_json::Value) -> Result<Self, GenerateError> {
        let schema = CONFIG_SCHEMA
            .get_or_init(|| {
                let schema_json: serde_json::Value = serde_json::from_str(SCHEMA_JSON)
                    .map_err(|e| format!("Invalid embedded config schema: {}", e))?;
                Validator::new(&schema_json)
                    .map_err(|e| format!("Invalid config schema compilation: {}", e))
            })
            .as_ref()
            .map_err(|e| GenerateError::config(e.clone()))?;

        if let Err(e) = schema.validate(&value) {
            return Err(GenerateError::config(format!(
                "Config validation failed: {} at {}",
                e,
                e.instance_path()
            )));
        }

        serde_json::from_value(value)
            .map_err(|e| GenerateError::config(format!("Invalid config: {}", e)))
    }

    /// Finds a configuration file in `dir`.
    pub fn find_in(dir: impl AsRef<Path>) -> Option<PathBuf> {
        let dir = dir.as_ref();
        Self::CONFIG_FILES
            .iter()
            .map(|name| dir.join(name))
            .find(|path| path.is_file())
    }

    /// Resolves a configured path against the base directory.
    pub fn resolve_path(&self, path: impl AsRef<Path>) -> PathBuf {
        let path = path.as_ref();
        match &self.base_dir {
            Some(base) if path.is_relative() => base.join(path),
            _ => path.to_path_buf(),
        }
    }

    /// Returns the load options for generator modules.
    pub fn plugin_options(&self) -> PluginOptions {
        PluginOptions {
            memory_max_pages: self.memory_max_pages,
            timeout_ms: self.timeout_ms,
            ..PluginOptions::default()
        }
    }

    /// Returns the name a generator is exported under in its module.
    pub fn export_name<'a>(&'a self, name: &'a str) -> &'a str {
        self.generators
            .get(name)
            .and_then(|definition| definition.export.as_deref())
            .unwrap_or(name)
    }
}

impl Default for ModelgenConfig {
    fn default() -> Self {
        Self::new()
    }
}
