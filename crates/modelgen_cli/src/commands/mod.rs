//! Command implementations

mod generate;
mod init;
mod list;

pub use generate::{GenerateArgs, run_generate};
pub use init::run_init;
pub use list::run_list;

use miette::{IntoDiagnostic, Result};
use modelgen_core::ModelgenConfig;
use tracing::info;

use crate::cli::Cli;

/// Loads the configuration given with `--config`, or the one in the
/// current directory, or the defaults.
pub fn load_config(cli: &Cli) -> Result<ModelgenConfig> {
    if let Some(ref path) = cli.config {
        return ModelgenConfig::from_file(path).into_diagnostic();
    }

    if let Some(path) = ModelgenConfig::find_in(".") {
        info!("Using config: {}", path.display());
        return ModelgenConfig::from_file(&path).into_diagnostic();
    }

    info!("No config file found, using defaults");
    Ok(ModelgenConfig::new())
}
