//! List command implementation

use std::path::PathBuf;

use miette::{IntoDiagnostic, Result};
use modelgen_cache::{ContextLoader, ExecutionContext, ResourceSet};
use modelgen_core::WasmContextLoader;

use super::load_config;
use crate::cli::Cli;

pub fn run_list(cli: &Cli, classpath: &[PathBuf]) -> Result<()> {
    let config = load_config(cli)?;
    let resources: ResourceSet = classpath
        .iter()
        .map(|path| std::path::absolute(path).unwrap_or_else(|_| path.clone()))
        .collect();

    let loader = WasmContextLoader::new(config.plugin_options());
    let context = loader.load(&resources).into_diagnostic()?;
    let manifests = context.manifests().into_diagnostic()?;

    for manifest in &manifests {
        let mut line = format!("{} {}", manifest.name, manifest.version);
        if !manifest.aliases.is_empty() {
            line.push_str(&format!(" (aliases: {})", manifest.aliases.join(", ")));
        }
        println!("{}", line);
        if let Some(description) = &manifest.description {
            println!("    {}", description);
        }
    }

    context.release().into_diagnostic()
}
