//! modelgen CLI
//!
//! Runs WASM code generators against model files.

mod cli;
mod commands;
mod output;

use std::process::ExitCode;

use clap::Parser;
use miette::Result;
use tracing::error;
use tracing_subscriber::EnvFilter;

use crate::cli::{Cli, Commands};
use crate::commands::{GenerateArgs, run_generate, run_init, run_list};

fn main() -> ExitCode {
    let cli = Cli::parse();

    // Initialize logging
    let filter = if cli.verbose {
        EnvFilter::new("debug")
    } else {
        EnvFilter::new("info")
    };

    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_target(false)
        .with_writer(std::io::stderr)
        .init();

    match run(cli) {
        Ok(has_failures) => {
            if has_failures {
                ExitCode::from(1)
            } else {
                ExitCode::SUCCESS
            }
        }
        Err(e) => {
            error!("{:?}", e);
            ExitCode::from(2)
        }
    }
}

fn run(cli: Cli) -> Result<bool> {
    match &cli.command {
        Commands::Generate {
            generator,
            classpath,
            gen_dir,
            modelpath,
            options,
            sources,
            format,
        } => run_generate(
            &cli,
            GenerateArgs {
                generator: generator.as_deref(),
                classpath,
                gen_dir: gen_dir.as_deref(),
                modelpath,
                options,
                sources,
            },
            *format,
        ),
        Commands::List { classpath } => run_list(&cli, classpath).map(|_| false),
        Commands::Init { force } => run_init(*force).map(|_| false),
    }
}
