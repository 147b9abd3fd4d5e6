//! Cache entries.

use std::collections::HashMap;
use std::sync::Arc;

use crate::{CacheError, ExecutionContext, ResourceSet, WorkerFactory};

/// A resource set paired with its execution context and the workers built
/// inside it.
pub struct Workspace<C, W> {
    resources: ResourceSet,
    context: Arc<C>,
    /// Workers by canonical name.
    workers: HashMap<String, Arc<W>>,
    released: bool,
}

impl<C: ExecutionContext, W> Workspace<C, W> {
    /// Creates a workspace owning `context`.
    pub fn new(resources: ResourceSet, context: C) -> Self {
        Self {
            resources,
            context: Arc::new(context),
            workers: HashMap::new(),
            released: false,
        }
    }

    /// Returns the resource set this workspace was built from.
    pub fn resources(&self) -> &ResourceSet {
        &self.resources
    }

    /// Returns the execution context.
    pub fn context(&self) -> &Arc<C> {
        &self.context
    }

    /// Returns the number of workers created so far.
    pub fn worker_count(&self) -> usize {
        self.workers.len()
    }

    /// Returns true once the context has been released.
    pub fn is_released(&self) -> bool {
        self.released
    }

    /// Returns the worker `name`, building it with `factory` on first use.
    pub fn worker(
        &mut self,
        name: &str,
        factory: &WorkerFactory<C, W>,
    ) -> Result<Arc<W>, CacheError> {
        if let Some(worker) = self.workers.get(name) {
            return Ok(Arc::clone(worker));
        }

        let worker = Arc::new(factory(&self.context, name)?);
        self.workers.insert(name.to_string(), Arc::clone(&worker));
        Ok(worker)
    }

    /// Drops all workers and releases the execution context.
    ///
    /// Releasing twice is a no-op.
    pub fn release(&mut self) -> Result<(), CacheError> {
        if self.released {
            return Ok(());
        }
        self.released = true;
        self.workers.clear();
        self.context.release()
    }
}
