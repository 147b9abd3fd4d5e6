//! # modelgen_cache
//!
//! Bounded cache of generator execution contexts for modelgen.
//!
//! Loading a set of generator modules (a *classpath*) into an execution
//! context is expensive, while the generators that run inside a context are
//! cheap. This crate keeps one [`Workspace`] per distinct [`ResourceSet`],
//! hands out named workers built inside it, and evicts the least recently
//! used workspace once the configured capacity is exceeded.
//!
//! ## Lookup rules
//!
//! - A request is served by any cached workspace whose resource set is a
//!   superset of (or equal to) the requested one.
//! - Every successful lookup promotes the workspace to most recently used.
//! - Workers are created lazily through a [`WorkerRegistry`] and shared by
//!   `Arc` until their workspace is evicted or the cache is cleared.
//!
//! ## Example
//!
//! ```rust,ignore
//! use std::sync::Arc;
//! use modelgen_cache::{ResourceSet, WorkerRegistry, WorkspaceCache};
//!
//! let mut registry = WorkerRegistry::new();
//! registry.register("gen", |context, name| Ok(MyWorker::new(context, name)));
//!
//! let cache = Arc::new(WorkspaceCache::new(8, MyLoader::default(), registry)?);
//! let classpath: ResourceSet = ["gen/c.wasm"].into_iter().collect();
//! let worker = cache.get_worker(&classpath, "gen")?;
//! // The cache lock is not held while the worker runs.
//! worker.run(&args)?;
//! ```

mod cache;
mod context;
mod error;
mod registry;
mod resource;
mod workspace;

pub use cache::{CacheStats, DEFAULT_CAPACITY, WorkspaceCache};
pub use context::{ContextLoader, ExecutionContext};
pub use error::CacheError;
pub use registry::{WorkerFactory, WorkerRegistry};
pub use resource::ResourceSet;
pub use workspace::Workspace;
