//! Generator workers.
//!
//! A worker is one generator bound to the context of the classpath it was
//! loaded from. Workers are built by the factories of a [`WorkerRegistry`]
//! when the cache first asks for them.

use std::sync::Arc;

use modelgen_cache::{CacheError, WorkerRegistry};
use modelgen_plugin::{GenerateRequest, GenerateResponse, ModelSource};
use tracing::debug;

use crate::config::ModelgenConfig;
use crate::loader::WasmContext;
use crate::GenerateError;

/// Something that turns models into generated files.
pub trait ModelGenerator: Send + Sync {
    /// Registry name of the generator.
    fn name(&self) -> &str;

    /// Runs the generator.
    ///
    /// # Arguments
    ///
    /// * `args` - Command line style arguments, see [`crate::collect_arguments`]
    /// * `models` - Contents of the model sources named in `args`
    fn generate(
        &self,
        args: &[String],
        models: &[ModelSource],
    ) -> Result<GenerateResponse, GenerateError>;
}

impl<T: ModelGenerator + ?Sized> ModelGenerator for Box<T> {
    fn name(&self) -> &str {
        (**self).name()
    }

    fn generate(
        &self,
        args: &[String],
        models: &[ModelSource],
    ) -> Result<GenerateResponse, GenerateError> {
        (**self).generate(args, models)
    }
}

/// A generator exported by a WASM module.
pub struct Generator {
    name: String,
    export: String,
    context: Arc<WasmContext>,
}

impl Generator {
    /// Binds the generator `export` of `context` under the registry name `name`.
    ///
    /// # Errors
    ///
    /// Returns [`CacheError::WorkerCreation`] if no module of the context
    /// provides `export`.
    pub fn bind(context: &Arc<WasmContext>, name: &str, export: &str) -> Result<Self, CacheError> {
        let export = context
            .resolve(export)
            .map_err(|e| CacheError::worker_creation(name, e.to_string()))?;

        debug!(
            "Bound generator '{}' to '{}' in [{}]",
            name,
            export,
            context.resources()
        );

        Ok(Self {
            name: name.to_string(),
            export,
            context: Arc::clone(context),
        })
    }

    /// Name of the generator inside its module.
    pub fn export(&self) -> &str {
        &self.export
    }

    pub fn context(&self) -> &Arc<WasmContext> {
        &self.context
    }
}

impl ModelGenerator for Generator {
    fn name(&self) -> &str {
        &self.name
    }

    fn generate(
        &self,
        args: &[String],
        models: &[ModelSource],
    ) -> Result<GenerateResponse, GenerateError> {
        let request = GenerateRequest::new(args, models);
        Ok(self.context.run(&self.export, &request)?)
    }
}

/// Registry of WASM generators.
pub type GeneratorRegistry = WorkerRegistry<WasmContext, Generator>;

/// Registers a generator exported as `export` under `name`.
pub fn register_generator(
    registry: &mut GeneratorRegistry,
    name: impl Into<String>,
    export: impl Into<String>,
) {
    let name = name.into();
    let export = export.into();
    registry.register(name.clone(), move |context, _| {
        Generator::bind(context, &name, &export)
    });
}

/// Builds the registry from the `generators` section of the configuration.
///
/// Each generator is registered under its key, together with its aliases.
pub fn build_registry(config: &ModelgenConfig) -> Result<GeneratorRegistry, GenerateError> {
    let mut registry = GeneratorRegistry::new();

    for name in config.generators.keys() {
        register_generator(&mut registry, name, config.export_name(name));
    }

    for (name, definition) in &config.generators {
        for alias in &definition.aliases {
            registry.alias(alias, name)?;
        }
    }

    Ok(registry)
}
