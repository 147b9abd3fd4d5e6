//! Execution context abstraction.
//!
//! The cache never builds execution contexts itself. A [`ContextLoader`]
//! turns a [`ResourceSet`] into an [`ExecutionContext`], and the cache only
//! decides when to build, reuse and release them.

use crate::{CacheError, ResourceSet};

/// An isolated environment built from a resource set, in which workers run.
pub trait ExecutionContext: Send + Sync {
    /// Releases the resources held by this context.
    ///
    /// The cache calls this at most once per context, on eviction or clear,
    /// after the context has left the cache and outside the cache lock.
    /// Workers still holding the context must fail afterwards instead of
    /// running against released resources.
    fn release(&self) -> Result<(), CacheError>;
}

/// Builds execution contexts from resource sets.
pub trait ContextLoader: Send + Sync {
    /// The context type produced by this loader.
    type Context: ExecutionContext;

    /// Materializes `resources` into a new execution context.
    ///
    /// Returns [`CacheError::ResourceUnavailable`] if a location cannot be
    /// resolved.
    fn load(&self, resources: &ResourceSet) -> Result<Self::Context, CacheError>;
}
