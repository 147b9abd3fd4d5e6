//! Execution contexts backed by WASM generator modules.

use std::sync::atomic::{AtomicBool, Ordering};

use modelgen_cache::{CacheError, ContextLoader, ExecutionContext, ResourceSet};
use modelgen_plugin::{
    GenerateRequest, GenerateResponse, GeneratorHost, GeneratorManifest, PluginError,
    PluginOptions,
};
use parking_lot::{Mutex, MutexGuard};
use tracing::{debug, info};

/// The generator modules of one classpath, loaded into a single host.
///
/// Runs are serialized per context. Releasing marks the context released
/// at once; the modules are unloaded immediately when idle, otherwise by
/// the run in progress when it returns. Later calls fail with
/// [`PluginError::Released`].
pub struct WasmContext {
    resources: ResourceSet,
    host: Mutex<Option<GeneratorHost>>,
    released: AtomicBool,
}

impl WasmContext {
    /// Wraps an already populated host.
    pub fn new(resources: ResourceSet, host: GeneratorHost) -> Self {
        Self {
            resources,
            host: Mutex::new(Some(host)),
            released: AtomicBool::new(false),
        }
    }

    pub fn resources(&self) -> &ResourceSet {
        &self.resources
    }

    pub fn is_released(&self) -> bool {
        self.released.load(Ordering::Acquire)
    }

    /// Resolves a generator name or alias to the name it was loaded under.
    pub fn resolve(&self, name: &str) -> Result<String, PluginError> {
        let guard = self.lock_host()?;
        let host = guard.as_ref().ok_or(PluginError::Released)?;
        host.resolve(name).map(str::to_string)
    }

    /// Returns the manifests of all loaded generators, sorted by name.
    pub fn manifests(&self) -> Result<Vec<GeneratorManifest>, PluginError> {
        let guard = self.lock_host()?;
        let host = guard.as_ref().ok_or(PluginError::Released)?;
        let mut manifests: Vec<GeneratorManifest> = host.manifests().cloned().collect();
        manifests.sort_by(|a, b| a.name.cmp(&b.name));
        Ok(manifests)
    }

    /// Runs a generator inside this context.
    ///
    /// A run that already started completes even if the context is released
    /// meanwhile.
    pub fn run(
        &self,
        name: &str,
        request: &GenerateRequest<'_>,
    ) -> Result<GenerateResponse, PluginError> {
        let mut guard = self.lock_host()?;
        let host = guard.as_mut().ok_or(PluginError::Released)?;
        let result = host.run(name, request);

        if self.is_released() {
            self.unload(&mut guard);
        }
        result
    }

    fn lock_host(&self) -> Result<MutexGuard<'_, Option<GeneratorHost>>, PluginError> {
        if self.is_released() {
            return Err(PluginError::Released);
        }
        let guard = self.host.lock();
        // Released while waiting for the lock
        if self.is_released() {
            return Err(PluginError::Released);
        }
        Ok(guard)
    }

    fn unload(&self, host: &mut Option<GeneratorHost>) {
        if let Some(mut host) = host.take() {
            host.unload_all();
            debug!("Unloaded generator modules [{}]", self.resources);
        }
    }
}

impl ExecutionContext for WasmContext {
    fn release(&self) -> Result<(), CacheError> {
        self.released.store(true, Ordering::Release);

        // A busy host is unloaded by the run holding it, or on drop.
        if let Some(mut guard) = self.host.try_lock() {
            self.unload(&mut guard);
        } else {
            debug!(
                "Generator modules [{}] are busy; unloading after the current run",
                self.resources
            );
        }
        Ok(())
    }
}

/// Loads a [`WasmContext`] from a set of `.wasm` files.
#[derive(Debug, Clone, Default)]
pub struct WasmContextLoader {
    options: PluginOptions,
}

impl WasmContextLoader {
    pub fn new(options: PluginOptions) -> Self {
        Self { options }
    }

    pub fn options(&self) -> &PluginOptions {
        &self.options
    }
}

impl ContextLoader for WasmContextLoader {
    type Context = WasmContext;

    fn load(&self, resources: &ResourceSet) -> Result<WasmContext, CacheError> {
        if resources.is_empty() {
            return Err(CacheError::resource_unavailable(
                resources,
                "classpath is empty",
            ));
        }

        let mut host = GeneratorHost::new();
        for path in resources {
            if !path.is_file() {
                return Err(CacheError::resource_unavailable(
                    resources,
                    format!("{} is not a file", path.display()),
                ));
            }
            if path.extension().is_none_or(|ext| ext != "wasm") {
                return Err(CacheError::resource_unavailable(
                    resources,
                    format!("{} is not a .wasm module", path.display()),
                ));
            }

            let manifest = host
                .load_module(path, self.options.clone())
                .map_err(|e| CacheError::resource_unavailable(resources, e.to_string()))?;
            info!(
                "Loaded generator '{}' v{} from {}",
                manifest.name,
                manifest.version,
                path.display()
            );
        }

        Ok(WasmContext::new(resources.clone(), host))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use modelgen_plugin::ModelSource;
    use std::fs;
    use std::sync::{mpsc, Arc};
    use std::thread;
    use std::time::{Duration, Instant};

    #[test]
    fn test_empty_classpath_is_unavailable() {
        let loader = WasmContextLoader::default();
        let result = loader.load(&ResourceSet::new());
        assert!(matches!(result, Err(CacheError::ResourceUnavailable { .. })));
    }

    #[test]
    fn test_missing_module_is_unavailable() {
        let dir = tempfile::tempdir().unwrap();
        let resources: ResourceSet = [dir.path().join("absent.wasm")].into_iter().collect();

        let result = WasmContextLoader::default().load(&resources);
        assert!(matches!(result, Err(CacheError::ResourceUnavailable { .. })));
    }

    #[test]
    fn test_wrong_extension_is_unavailable() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("generator.jar");
        fs::write(&path, b"PK").unwrap();
        let resources: ResourceSet = [path].into_iter().collect();

        let error = WasmContextLoader::default().load(&resources).err().unwrap();
        assert!(error.to_string().contains(".wasm"), "{}", error);
    }

    #[test]
    fn test_directory_is_unavailable() {
        let dir = tempfile::tempdir().unwrap();
        let module_dir = dir.path().join("gen.wasm");
        fs::create_dir(&module_dir).unwrap();
        let resources: ResourceSet = [module_dir].into_iter().collect();

        let result = WasmContextLoader::default().load(&resources);
        assert!(matches!(result, Err(CacheError::ResourceUnavailable { .. })));
    }

    #[test]
    fn test_malformed_module_is_unavailable() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("broken.wasm");
        fs::write(&path, b"not wasm").unwrap();
        let resources: ResourceSet = [path].into_iter().collect();

        let error = WasmContextLoader::default().load(&resources).err().unwrap();
        assert!(matches!(error, CacheError::ResourceUnavailable { .. }));
        assert!(error.to_string().contains("broken.wasm"), "{}", error);
    }

    #[test]
    fn test_released_context_refuses_calls() {
        let context = WasmContext::new(ResourceSet::new(), GeneratorHost::new());
        assert!(!context.is_released());

        context.release().unwrap();
        assert!(context.is_released());
        // Releasing again is a no-op
        context.release().unwrap();

        let args: Vec<String> = Vec::new();
        let models: Vec<ModelSource> = Vec::new();
        let result = context.run("c", &GenerateRequest::new(&args, &models));
        assert!(matches!(result, Err(PluginError::Released)));
        assert!(matches!(context.resolve("c"), Err(PluginError::Released)));
        assert!(matches!(context.manifests(), Err(PluginError::Released)));
    }

    #[test]
    fn test_release_does_not_wait_for_busy_host() {
        let context = Arc::new(WasmContext::new(ResourceSet::new(), GeneratorHost::new()));
        let (locked_tx, locked_rx) = mpsc::channel();

        let busy = {
            let context = Arc::clone(&context);
            thread::spawn(move || {
                let guard = context.host.lock();
                locked_tx.send(()).unwrap();
                thread::sleep(Duration::from_secs(2));
                drop(guard);
            })
        };
        locked_rx.recv().unwrap();

        let start = Instant::now();
        context.release().unwrap();
        assert!(start.elapsed() < Duration::from_millis(500));
        assert!(context.is_released());
        assert!(matches!(context.resolve("c"), Err(PluginError::Released)));

        busy.join().unwrap();
    }

    #[test]
    fn test_idle_release_unloads_immediately() {
        let context = WasmContext::new(ResourceSet::new(), GeneratorHost::new());
        context.release().unwrap();
        assert!(context.host.lock().is_none());
    }
}
