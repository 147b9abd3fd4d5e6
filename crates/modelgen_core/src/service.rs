//! Running generation tasks against the shared workspace cache.

use std::fs;
use std::path::{Component, Path, PathBuf};
use std::sync::Arc;
use std::time::Instant;

use modelgen_cache::{ContextLoader, WorkspaceCache};
use modelgen_plugin::{GeneratedFile, ModelSource, PluginError};
use rayon::prelude::*;
use serde::Serialize;
use tracing::{debug, info, warn};

use crate::arguments::collect_arguments;
use crate::config::ModelgenConfig;
use crate::generator::{Generator, GeneratorRegistry, ModelGenerator};
use crate::loader::WasmContextLoader;
use crate::task::GenerateTask;
use crate::GenerateError;

/// How often a run is attempted when its workspace was released under it.
const MAX_RUN_ATTEMPTS: usize = 8;

/// Cache of WASM generator workspaces.
pub type WasmGeneratorCache = WorkspaceCache<WasmContextLoader, Generator>;

/// Service running WASM generators.
pub type WasmGeneratorService = GeneratorService<WasmContextLoader, Generator>;

/// Successful and failed tasks of a batch, failures keyed by generation directory.
pub type GenerateAllResult = (Vec<GenerateOutcome>, Vec<(PathBuf, GenerateError)>);

/// Creates the generator cache described by the configuration.
pub fn create_cache(
    config: &ModelgenConfig,
    registry: GeneratorRegistry,
) -> Result<Arc<WasmGeneratorCache>, GenerateError> {
    let loader = WasmContextLoader::new(config.plugin_options());
    let cache = WorkspaceCache::new(config.cache_size, loader, registry)?;
    Ok(Arc::new(cache))
}

/// The result of one generator run.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct GenerateOutcome {
    /// Generator that ran.
    pub generator: String,
    /// Directory the files were written to.
    pub gen_dir: PathBuf,
    /// Written files, in the order the generator returned them.
    pub files: Vec<PathBuf>,
    /// Messages reported by the generator.
    pub messages: Vec<String>,
}

/// Runs generation tasks.
///
/// The cache is injected so that every consumer shares the same loaded
/// classpaths.
pub struct GeneratorService<L: ContextLoader, W> {
    cache: Arc<WorkspaceCache<L, W>>,
}

impl<L, W> GeneratorService<L, W>
where
    L: ContextLoader,
    W: ModelGenerator,
{
    pub fn new(cache: Arc<WorkspaceCache<L, W>>) -> Self {
        Self { cache }
    }

    pub fn cache(&self) -> &Arc<WorkspaceCache<L, W>> {
        &self.cache
    }

    /// Runs one task and writes the generated files.
    ///
    /// With the `clean` option the generation directory is emptied after the
    /// generator was found and before it runs. If a parallel task evicts the
    /// workspace before the generator starts, the worker is looked up again.
    pub fn generate(&self, task: &GenerateTask) -> Result<GenerateOutcome, GenerateError> {
        let start = Instant::now();
        let args = collect_arguments(task)?;
        let models = read_models(&task.sources)?;

        let mut worker = self.cache.get_worker(&task.classpath, &task.generator)?;

        if task.clean() {
            clean_dir(&task.gen_dir)?;
        }
        fs::create_dir_all(&task.gen_dir).map_err(|e| {
            GenerateError::file(format!(
                "Failed to create {}: {}",
                task.gen_dir.display(),
                e
            ))
        })?;

        debug!("Running '{}' with {:?}", worker.name(), args);
        let mut attempt = 1;
        let response = loop {
            match worker.generate(&args, &models) {
                // Evicted by a parallel task between lookup and run
                Err(GenerateError::Plugin(PluginError::Released))
                    if attempt < MAX_RUN_ATTEMPTS =>
                {
                    attempt += 1;
                    debug!(
                        "Workspace of '{}' was released before the run; retrying (attempt {})",
                        worker.name(),
                        attempt
                    );
                    worker = self.cache.get_worker(&task.classpath, &task.generator)?;
                }
                result => break result?,
            }
        };

        for message in &response.messages {
            info!("[{}] {}", worker.name(), message);
        }

        let files = write_files(&task.gen_dir, &response.files)?;

        info!(
            "'{}' generated {} files into {} in {:?}",
            worker.name(),
            files.len(),
            task.gen_dir.display(),
            start.elapsed()
        );

        Ok(GenerateOutcome {
            generator: worker.name().to_string(),
            gen_dir: task.gen_dir.clone(),
            files,
            messages: response.messages,
        })
    }

    /// Runs tasks in parallel over the shared cache.
    ///
    /// A failing task does not stop the others.
    pub fn generate_all(&self, tasks: &[GenerateTask]) -> GenerateAllResult {
        let results: Vec<Result<GenerateOutcome, (PathBuf, GenerateError)>> = tasks
            .par_iter()
            .map(|task| {
                self.generate(task)
                    .map_err(|e| (task.gen_dir.clone(), e))
            })
            .collect();

        let mut successes = Vec::new();
        let mut failures = Vec::new();
        for result in results {
            match result {
                Ok(outcome) => successes.push(outcome),
                Err((gen_dir, error)) => {
                    warn!("Failed to generate {}: {}", gen_dir.display(), error);
                    failures.push((gen_dir, error));
                }
            }
        }

        (successes, failures)
    }
}

fn read_models(sources: &[PathBuf]) -> Result<Vec<ModelSource>, GenerateError> {
    sources
        .iter()
        .map(|path| {
            let content = fs::read_to_string(path).map_err(|e| {
                GenerateError::file(format!("Failed to read model {}: {}", path.display(), e))
            })?;
            Ok(ModelSource::new(path.display().to_string(), content))
        })
        .collect()
}

fn clean_dir(dir: &Path) -> Result<(), GenerateError> {
    let metadata = match fs::symlink_metadata(dir) {
        Ok(metadata) => metadata,
        Err(e) if e.kind() == std::io::ErrorKind::NotFound => return Ok(()),
        Err(e) => return Err(e.into()),
    };

    if !metadata.is_dir() {
        return Err(GenerateError::file(format!(
            "Refusing to clean {} because it is not a directory",
            dir.display()
        )));
    }

    debug!("Cleaning {}", dir.display());
    fs::remove_dir_all(dir).map_err(|e| {
        GenerateError::file(format!("Failed to clean {}: {}", dir.display(), e))
    })
}

/// Checks that a generated path stays inside the generation directory.
fn output_path(gen_dir: &Path, relative: &str) -> Result<PathBuf, GenerateError> {
    let path = Path::new(relative);
    if relative.is_empty() {
        return Err(GenerateError::output("empty file path"));
    }

    for component in path.components() {
        match component {
            Component::Normal(_) | Component::CurDir => {}
            Component::ParentDir => {
                return Err(GenerateError::output(format!(
                    "'{}' escapes the generation directory",
                    relative
                )));
            }
            Component::RootDir | Component::Prefix(_) => {
                return Err(GenerateError::output(format!(
                    "'{}' is an absolute path",
                    relative
                )));
            }
        }
    }

    Ok(gen_dir.join(path))
}

fn write_files(gen_dir: &Path, files: &[GeneratedFile]) -> Result<Vec<PathBuf>, GenerateError> {
    // Validate everything before touching the file system
    let targets = files
        .iter()
        .map(|file| output_path(gen_dir, &file.path))
        .collect::<Result<Vec<PathBuf>, GenerateError>>()?;

    for (target, file) in targets.iter().zip(files) {
        if fs::symlink_metadata(target).is_ok_and(|m| m.file_type().is_symlink()) {
            return Err(GenerateError::output(format!(
                "Refusing to overwrite symbolic link {}",
                target.display()
            )));
        }

        if let Some(parent) = target.parent() {
            fs::create_dir_all(parent)?;
        }
        fs::write(target, &file.content).map_err(|e| {
            GenerateError::file(format!("Failed to write {}: {}", target.display(), e))
        })?;
    }

    Ok(targets)
}
