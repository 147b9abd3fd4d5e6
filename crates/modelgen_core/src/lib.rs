//! # modelgen_core
//!
//! Generation engine for modelgen.
//!
//! This crate provides:
//! - Configuration loading
//! - Model discovery and argument assembly
//! - The WASM context loader and generator workers for the workspace cache
//! - The `GeneratorService` that runs tasks, in parallel if asked to
//!
//! ## Example
//!
//! ```rust,ignore
//! use modelgen_core::{GeneratorService, ModelgenConfig, build_registry, create_cache};
//!
//! let config = ModelgenConfig::from_file(".modelgen.jsonc")?;
//! let cache = create_cache(&config, build_registry(&config)?)?;
//! let service = GeneratorService::new(cache);
//!
//! let tasks = config
//!     .tasks
//!     .iter()
//!     .map(|task| task.resolve(&config))
//!     .collect::<Result<Vec<_>, _>>()?;
//! let (outcomes, failures) = service.generate_all(&tasks);
//! ```

pub mod arguments;
mod config;
mod error;
mod generator;
mod loader;
pub mod model_finder;
mod service;
mod task;

pub use arguments::{OptionValue, collect_arguments};
pub use config::{GeneratorDefinition, ModelgenConfig};
pub use error::GenerateError;
pub use generator::{
    Generator, GeneratorRegistry, ModelGenerator, build_registry, register_generator,
};
pub use loader::{WasmContext, WasmContextLoader};
pub use service::{
    GenerateAllResult, GenerateOutcome, GeneratorService, WasmGeneratorCache,
    WasmGeneratorService, create_cache,
};
pub use task::{GenerateTask, TaskDefinition};
