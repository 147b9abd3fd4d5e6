//! Generate command implementation

use std::path::{Path, PathBuf};

use miette::{IntoDiagnostic, Result};
use modelgen_cache::ResourceSet;
use modelgen_core::{
    GenerateTask, GeneratorService, ModelgenConfig, OptionValue, build_registry, create_cache,
    register_generator,
};
use tracing::{info, warn};

use super::load_config;
use crate::cli::{Cli, OutputFormat};
use crate::output::output_results;

/// Ad-hoc task given on the command line.
pub struct GenerateArgs<'a> {
    pub generator: Option<&'a str>,
    pub classpath: &'a [PathBuf],
    pub gen_dir: Option<&'a Path>,
    pub modelpath: &'a [PathBuf],
    pub options: &'a [(String, OptionValue)],
    pub sources: &'a [PathBuf],
}

pub fn run_generate(cli: &Cli, args: GenerateArgs<'_>, format: OutputFormat) -> Result<bool> {
    let config = load_config(cli)?;
    let mut registry = build_registry(&config).into_diagnostic()?;

    let tasks = match (args.generator, args.gen_dir) {
        (Some(generator), Some(gen_dir)) => {
            // Generators unknown to the configuration are looked up by their manifest name
            if !registry.contains(generator) {
                register_generator(&mut registry, generator, generator);
            }
            vec![ad_hoc_task(generator, gen_dir, &args)]
        }
        (None, None) => configured_tasks(&config)?,
        (Some(generator), None) => {
            return Err(miette::miette!(
                "--generator {} needs --gen-dir to run without the configuration",
                generator
            ));
        }
        (None, Some(gen_dir)) => {
            return Err(miette::miette!(
                "--gen-dir {} needs --generator to run without the configuration",
                gen_dir.display()
            ));
        }
    };

    if tasks.is_empty() {
        warn!("No generation tasks configured");
        return Ok(false);
    }

    let cache = create_cache(&config, registry).into_diagnostic()?;
    let service = GeneratorService::new(cache);

    info!("Running {} generation tasks", tasks.len());
    let (outcomes, failures) = service.generate_all(&tasks);

    let stats = service.cache().stats();
    info!(
        "Generator cache: {} hits, {} misses, {} evictions",
        stats.hits, stats.misses, stats.evictions
    );
    if let Err(e) = service.cache().clear() {
        warn!("{}", e);
    }

    output_results(&outcomes, &failures, format)?;

    Ok(!failures.is_empty())
}

fn ad_hoc_task(generator: &str, gen_dir: &Path, args: &GenerateArgs<'_>) -> GenerateTask {
    let classpath: ResourceSet = args.classpath.iter().cloned().collect();
    let mut task = GenerateTask::new(generator, classpath, gen_dir)
        .with_modelpath(args.modelpath.to_vec())
        .with_sources(args.sources.to_vec());

    for (key, value) in args.options {
        task = task.with_option(key.clone(), value.clone());
    }

    task
}

fn configured_tasks(config: &ModelgenConfig) -> Result<Vec<GenerateTask>> {
    config
        .tasks
        .iter()
        .map(|definition| definition.resolve(config))
        .collect::<std::result::Result<Vec<_>, _>>()
        .into_diagnostic()
}
