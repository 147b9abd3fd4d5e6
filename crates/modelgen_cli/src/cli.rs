//! CLI argument definitions

use std::path::PathBuf;

use clap::{Parser, Subcommand, ValueEnum};
use modelgen_core::OptionValue;

/// modelgen - Runs WASM code generators against model files
#[derive(Parser)]
#[command(name = "mgen")]
#[command(author, version, about, long_about = None)]
pub struct Cli {
    #[command(subcommand)]
    pub command: Commands,

    /// Configuration file path
    #[arg(short, long, global = true)]
    pub config: Option<PathBuf>,

    /// Enable verbose output
    #[arg(short, long, global = true)]
    pub verbose: bool,
}

#[derive(Subcommand)]
pub enum Commands {
    /// Run generators
    ///
    /// Without --generator every task of the configuration file runs.
    Generate {
        /// Generator to run instead of the configured tasks
        #[arg(short, long, requires = "classpath", requires = "gen_dir")]
        generator: Option<String>,

        /// Generator modules (.wasm) to load
        #[arg(long, num_args = 1.., requires = "generator")]
        classpath: Vec<PathBuf>,

        /// Directory receiving the generated files
        #[arg(long, requires = "generator")]
        gen_dir: Option<PathBuf>,

        /// Directories searched for referenced models
        #[arg(long, num_args = 1.., requires = "generator")]
        modelpath: Vec<PathBuf>,

        /// Generator option as key=value, or key for a flag
        #[arg(short, long = "option", value_name = "KEY[=VALUE]", value_parser = parse_option, requires = "generator")]
        options: Vec<(String, OptionValue)>,

        /// Model files
        #[arg(requires = "generator")]
        sources: Vec<PathBuf>,

        /// Output format
        #[arg(short, long, value_enum, default_value_t = OutputFormat::Text)]
        format: OutputFormat,
    },

    /// List the generators provided by a set of modules
    List {
        /// Generator modules (.wasm) to inspect
        #[arg(long, num_args = 1.., required = true)]
        classpath: Vec<PathBuf>,
    },

    /// Initialize configuration
    Init {
        /// Force overwrite existing config
        #[arg(long)]
        force: bool,
    },
}

#[derive(Clone, Copy, Debug, PartialEq, Eq, ValueEnum)]
pub enum OutputFormat {
    Text,
    Json,
}

/// Parses `key=value` (or a bare `key`, meaning an enabled flag).
fn parse_option(raw: &str) -> Result<(String, OptionValue), String> {
    let (key, value) = match raw.split_once('=') {
        Some((key, value)) => (key, OptionValue::parse(value)),
        None => (raw, OptionValue::Flag(true)),
    };

    let key = key.trim_start_matches('-');
    if key.is_empty() {
        return Err(format!("missing option name in '{}'", raw));
    }

    Ok((key.to_string(), value))
}
