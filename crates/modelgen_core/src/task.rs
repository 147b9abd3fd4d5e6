//! Generation tasks.

use std::collections::BTreeMap;
use std::path::PathBuf;

use modelgen_cache::ResourceSet;
use serde::{Deserialize, Serialize};

use crate::arguments::{OPTION_CLEAN, OptionValue};
use crate::config::ModelgenConfig;
use crate::model_finder::ModelFinder;
use crate::GenerateError;

/// A task entry in the `tasks` section of the configuration.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
#[serde(rename_all = "camelCase")]
pub struct TaskDefinition {
    /// Registry name (or alias) of the generator.
    pub generator: String,

    /// Generator modules to load.
    pub classpath: Vec<String>,

    /// Directory receiving the generated files.
    pub gen_dir: String,

    /// Directories searched for referenced models.
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub modelpath: Vec<String>,

    /// Model files passed explicitly.
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub sources: Vec<String>,

    /// Glob patterns selecting model files.
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub include: Vec<String>,

    /// Glob patterns removing files from the selection.
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub exclude: Vec<String>,

    /// Generator options, passed as `-key [value]`.
    #[serde(default, skip_serializing_if = "BTreeMap::is_empty")]
    pub options: BTreeMap<String, OptionValue>,
}

impl TaskDefinition {
    /// Resolves the task's paths against the configuration and discovers
    /// its model files.
    pub fn resolve(&self, config: &ModelgenConfig) -> Result<GenerateTask, GenerateError> {
        let classpath = self
            .classpath
            .iter()
            .map(|path| config.resolve_path(path))
            .collect();

        let mut sources: Vec<PathBuf> = self
            .sources
            .iter()
            .map(|path| config.resolve_path(path))
            .collect();

        if !self.include.is_empty() {
            let finder = ModelFinder::new(&self.include, &self.exclude)?;
            let base_dir = config
                .base_dir
                .clone()
                .unwrap_or_else(|| PathBuf::from("."));
            for path in finder.discover(&base_dir)? {
                if !sources.contains(&path) {
                    sources.push(path);
                }
            }
        }

        Ok(GenerateTask {
            generator: self.generator.clone(),
            classpath,
            gen_dir: config.resolve_path(&self.gen_dir),
            modelpath: self
                .modelpath
                .iter()
                .map(|path| config.resolve_path(path))
                .collect(),
            options: self.options.clone(),
            sources,
        })
    }
}

/// A single generator run.
#[derive(Debug, Clone, PartialEq)]
pub struct GenerateTask {
    /// Registry name (or alias) of the generator.
    pub generator: String,
    /// Generator modules the generator is loaded from.
    pub classpath: ResourceSet,
    /// Directory receiving the generated files.
    pub gen_dir: PathBuf,
    /// Directories searched for referenced models.
    pub modelpath: Vec<PathBuf>,
    /// Generator options in key order.
    pub options: BTreeMap<String, OptionValue>,
    /// Model files to generate from.
    pub sources: Vec<PathBuf>,
}

impl GenerateTask {
    pub fn new(
        generator: impl Into<String>,
        classpath: ResourceSet,
        gen_dir: impl Into<PathBuf>,
    ) -> Self {
        Self {
            generator: generator.into(),
            classpath,
            gen_dir: gen_dir.into(),
            modelpath: Vec::new(),
            options: BTreeMap::new(),
            sources: Vec::new(),
        }
    }

    pub fn with_modelpath(mut self, modelpath: Vec<PathBuf>) -> Self {
        self.modelpath = modelpath;
        self
    }

    pub fn with_option(mut self, key: impl Into<String>, value: impl Into<OptionValue>) -> Self {
        self.options.insert(key.into(), value.into());
        self
    }

    pub fn with_sources(mut self, sources: Vec<PathBuf>) -> Self {
        self.sources = sources;
        self
    }

    /// Returns true if the generation directory is emptied before the run.
    pub fn clean(&self) -> bool {
        self.options
            .get(OPTION_CLEAN)
            .is_some_and(OptionValue::is_enabled)
    }
}
