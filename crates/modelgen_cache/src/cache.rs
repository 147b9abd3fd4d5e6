//! Bounded LRU cache of workspaces.

use std::collections::VecDeque;
use std::sync::Arc;

use parking_lot::Mutex;
use tracing::{debug, info, warn};

use crate::{
    CacheError, ContextLoader, ExecutionContext, ResourceSet, WorkerRegistry, Workspace,
};

/// Default number of workspaces kept alive.
pub const DEFAULT_CAPACITY: usize = 8;

/// Lookup counters of a [`WorkspaceCache`].
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct CacheStats {
    /// Lookups served by an existing workspace.
    pub hits: u64,
    /// Lookups that had to build a new workspace.
    pub misses: u64,
    /// Workspaces evicted because the capacity was exceeded.
    pub evictions: u64,
}

struct CacheState<C, W> {
    /// Most recently used first.
    workspaces: VecDeque<Workspace<C, W>>,
    stats: CacheStats,
}

/// Thread-safe cache of workspaces keyed by resource set.
///
/// The cache is meant to be created once and shared by `Arc` with every
/// consumer. All bookkeeping happens under a single lock; workers are handed
/// out as `Arc` handles so their (long-running) work happens outside it.
///
/// # Example
///
/// ```ignore
/// use std::sync::Arc;
/// use modelgen_cache::WorkspaceCache;
///
/// let cache = Arc::new(WorkspaceCache::new(2, loader, registry)?);
///
/// // In parallel threads:
/// let worker = cache.get_worker(&classpath, "gen")?;
/// worker.run(&args)?;
/// ```
pub struct WorkspaceCache<L: ContextLoader, W> {
    capacity: usize,
    loader: L,
    registry: WorkerRegistry<L::Context, W>,
    state: Mutex<CacheState<L::Context, W>>,
}

impl<L: ContextLoader, W> WorkspaceCache<L, W> {
    /// Creates a new cache holding at most `capacity` workspaces.
    ///
    /// A capacity of zero disables retention: every lookup builds a
    /// transient workspace whose context lives as long as the returned
    /// worker.
    ///
    /// # Errors
    ///
    /// Returns [`CacheError::InvalidConfiguration`] if `capacity` is negative.
    pub fn new(
        capacity: i64,
        loader: L,
        registry: WorkerRegistry<L::Context, W>,
    ) -> Result<Self, CacheError> {
        let capacity = usize::try_from(capacity).map_err(|_| {
            CacheError::invalid_configuration(format!("negative cache size: {}", capacity))
        })?;

        Ok(Self::with_capacity(capacity, loader, registry))
    }

    /// Creates a new cache from an already validated capacity.
    pub fn with_capacity(
        capacity: usize,
        loader: L,
        registry: WorkerRegistry<L::Context, W>,
    ) -> Self {
        Self {
            capacity,
            loader,
            registry,
            state: Mutex::new(CacheState {
                workspaces: VecDeque::new(),
                stats: CacheStats::default(),
            }),
        }
    }

    /// Returns the worker `name` for a workspace serving `resources`.
    ///
    /// Reuses the first cached workspace whose resource set contains all of
    /// `resources`; otherwise builds a new one scoped exactly to `resources`
    /// and evicts the least recently used workspace if the capacity is
    /// exceeded. Either way the workspace becomes the most recently used.
    ///
    /// # Errors
    ///
    /// - [`CacheError::WorkerNotFound`] if `name` is not registered.
    /// - [`CacheError::ResourceUnavailable`] if the context cannot be built;
    ///   the cache is left unchanged.
    /// - [`CacheError::ReleaseFailure`] if releasing an evicted workspace
    ///   failed. The new workspace stays cached.
    pub fn get_worker(&self, resources: &ResourceSet, name: &str) -> Result<Arc<W>, CacheError> {
        let (canonical, factory) = self.registry.resolve(name)?;

        let mut guard = self.state.lock();
        let state = &mut *guard;

        let position = state
            .workspaces
            .iter()
            .position(|workspace| workspace.resources().is_superset(resources));

        if let Some(mut workspace) = position.and_then(|index| state.workspaces.remove(index)) {
            state.stats.hits += 1;
            debug!(
                "Reusing workspace [{}] for [{}]",
                workspace.resources(),
                resources
            );
            let worker = workspace.worker(canonical, factory);
            state.workspaces.push_front(workspace);
            return worker;
        }

        state.stats.misses += 1;
        debug!("Building workspace for [{}]", resources);

        let context = self.loader.load(resources)?;
        let mut workspace = Workspace::new(resources.clone(), context);

        let worker = match workspace.worker(canonical, factory) {
            Ok(worker) => worker,
            Err(e) => {
                if let Err(release_error) = workspace.release() {
                    warn!("Failed to discard workspace: {}", release_error);
                }
                return Err(e);
            }
        };

        if self.capacity == 0 {
            debug!("Cache capacity is zero; workspace [{}] is not retained", resources);
            return Ok(worker);
        }

        state.workspaces.push_front(workspace);

        let mut evicted = Vec::new();
        while state.workspaces.len() > self.capacity
            && let Some(workspace) = state.workspaces.pop_back()
        {
            state.stats.evictions += 1;
            debug!("Evicting workspace [{}]", workspace.resources());
            evicted.push(workspace);
        }
        drop(guard);

        // Release outside the lock; a busy context may take a while.
        release_all(evicted).map(|()| worker)
    }

    /// Releases every workspace and empties the cache.
    ///
    /// All workspaces are released even if some releases fail; the first
    /// failure is returned afterwards. Clearing an empty cache is a no-op.
    pub fn clear(&self) -> Result<(), CacheError> {
        let drained: Vec<_> = self.state.lock().workspaces.drain(..).collect();
        let count = drained.len();

        let result = release_all(drained);
        if count > 0 {
            info!("Released {} cached workspaces", count);
        }
        result
    }

    /// Returns the maximum number of retained workspaces.
    pub fn capacity(&self) -> usize {
        self.capacity
    }

    /// Returns the number of cached workspaces.
    pub fn len(&self) -> usize {
        self.state.lock().workspaces.len()
    }

    /// Returns true if no workspace is cached.
    pub fn is_empty(&self) -> bool {
        self.state.lock().workspaces.is_empty()
    }

    /// Returns the cached resource sets, most recently used first.
    pub fn resource_sets(&self) -> Vec<ResourceSet> {
        self.state
            .lock()
            .workspaces
            .iter()
            .map(|workspace| workspace.resources().clone())
            .collect()
    }

    /// Returns the lookup counters.
    pub fn stats(&self) -> CacheStats {
        self.state.lock().stats
    }

    /// Returns the context loader.
    pub fn loader(&self) -> &L {
        &self.loader
    }

    /// Returns the worker registry.
    pub fn registry(&self) -> &WorkerRegistry<L::Context, W> {
        &self.registry
    }
}

/// Releases every workspace, returning the first failure.
fn release_all<C: ExecutionContext, W>(
    workspaces: Vec<Workspace<C, W>>,
) -> Result<(), CacheError> {
    let mut first_error = None;
    for mut workspace in workspaces {
        if let Err(e) = workspace.release() {
            warn!("{}", e);
            first_error.get_or_insert(e);
        }
    }

    match first_error {
        Some(e) => Err(e),
        None => Ok(()),
    }
}

impl<L: ContextLoader, W> Drop for WorkspaceCache<L, W> {
    fn drop(&mut self) {
        if let Err(e) = self.clear() {
            warn!("Failed to release workspaces on drop: {}", e);
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;
    use std::sync::atomic::{AtomicBool, AtomicUsize, Ordering};

    struct TestContext {
        id: usize,
        released: AtomicBool,
    }

    impl ExecutionContext for TestContext {
        fn release(&self) -> Result<(), CacheError> {
            self.released.store(true, Ordering::SeqCst);
            Ok(())
        }
    }

    #[derive(Default)]
    struct TestLoader {
        loads: AtomicUsize,
    }

    impl ContextLoader for TestLoader {
        type Context = TestContext;

        fn load(&self, resources: &ResourceSet) -> Result<TestContext, CacheError> {
            if resources.iter().any(|p| p.to_string_lossy().starts_with("missing")) {
                return Err(CacheError::resource_unavailable(resources, "no such file"));
            }
            let id = self.loads.fetch_add(1, Ordering::SeqCst);
            Ok(TestContext {
                id,
                released: AtomicBool::new(false),
            })
        }
    }

    struct TestWorker {
        context: Arc<TestContext>,
    }

    fn cache(capacity: i64) -> WorkspaceCache<TestLoader, TestWorker> {
        let mut registry = WorkerRegistry::new();
        registry.register("gen", |context, _| {
            Ok(TestWorker {
                context: Arc::clone(context),
            })
        });
        WorkspaceCache::new(capacity, TestLoader::default(), registry).unwrap()
    }

    fn set(paths: &[&str]) -> ResourceSet {
        paths.iter().copied().collect()
    }

    #[test]
    fn test_negative_capacity_is_rejected() {
        let result = WorkspaceCache::<TestLoader, TestWorker>::new(
            -1,
            TestLoader::default(),
            WorkerRegistry::new(),
        );
        assert!(matches!(result, Err(CacheError::InvalidConfiguration(_))));
    }

    #[test]
    fn test_new_cache_is_empty() {
        let cache = cache(2);
        assert!(cache.is_empty());
        assert_eq!(cache.capacity(), 2);
        assert_eq!(cache.stats(), CacheStats::default());
    }

    #[test]
    fn test_unknown_worker_leaves_cache_untouched() {
        let cache = cache(2);
        let result = cache.get_worker(&set(&["a.wasm"]), "unknown");

        assert!(matches!(result, Err(CacheError::WorkerNotFound(_))));
        assert!(cache.is_empty());
        assert_eq!(cache.loader.loads.load(Ordering::SeqCst), 0);
    }

    #[test]
    fn test_unavailable_resources_leave_cache_untouched() {
        let cache = cache(2);
        cache.get_worker(&set(&["a.wasm"]), "gen").unwrap();

        let result = cache.get_worker(&set(&["missing.wasm"]), "gen");

        assert!(matches!(result, Err(CacheError::ResourceUnavailable { .. })));
        assert_eq!(cache.resource_sets(), vec![set(&["a.wasm"])]);
    }

    #[test]
    fn test_eviction_releases_context() {
        let cache = cache(1);
        let first = cache.get_worker(&set(&["a.wasm"]), "gen").unwrap();
        cache.get_worker(&set(&["b.wasm"]), "gen").unwrap();

        assert!(first.context.released.load(Ordering::SeqCst));
        assert_eq!(cache.stats().evictions, 1);
        assert_eq!(cache.len(), 1);
    }

    #[test]
    fn test_zero_capacity_retains_nothing() {
        let cache = cache(0);
        let first = cache.get_worker(&set(&["a.wasm"]), "gen").unwrap();
        let second = cache.get_worker(&set(&["a.wasm"]), "gen").unwrap();

        assert!(cache.is_empty());
        assert_ne!(first.context.id, second.context.id);
        assert!(!first.context.released.load(Ordering::SeqCst));
    }

    #[test]
    fn test_clear_is_idempotent() {
        let cache = cache(2);
        let worker = cache.get_worker(&set(&["a.wasm"]), "gen").unwrap();

        cache.clear().unwrap();
        cache.clear().unwrap();

        assert!(cache.is_empty());
        assert!(worker.context.released.load(Ordering::SeqCst));
    }

    #[test]
    fn test_drop_releases_workspaces() {
        let cache = cache(2);
        let worker = cache.get_worker(&set(&["a.wasm"]), "gen").unwrap();
        drop(cache);

        assert!(worker.context.released.load(Ordering::SeqCst));
    }
}
