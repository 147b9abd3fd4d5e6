//! Worker registry.
//!
//! Maps worker names to the factories that build them inside an execution
//! context. Aliases let older names resolve to a registered worker.

use std::collections::HashMap;
use std::sync::Arc;

use crate::CacheError;

/// Builds a worker inside an execution context.
///
/// The second argument is the canonical worker name.
pub type WorkerFactory<C, W> = Box<dyn Fn(&Arc<C>, &str) -> Result<W, CacheError> + Send + Sync>;

/// Registry of worker factories keyed by name.
pub struct WorkerRegistry<C, W> {
    factories: HashMap<String, WorkerFactory<C, W>>,
    /// Aliases mapping (alias -> canonical name).
    aliases: HashMap<String, String>,
}

impl<C, W> WorkerRegistry<C, W> {
    /// Creates an empty registry.
    pub fn new() -> Self {
        Self {
            factories: HashMap::new(),
            aliases: HashMap::new(),
        }
    }

    /// Registers a factory under `name`, replacing any previous one.
    pub fn register<F>(&mut self, name: impl Into<String>, factory: F) -> &mut Self
    where
        F: Fn(&Arc<C>, &str) -> Result<W, CacheError> + Send + Sync + 'static,
    {
        self.factories.insert(name.into(), Box::new(factory));
        self
    }

    /// Registers `alias` as another name for the worker `target`.
    ///
    /// Fails if `target` is not registered.
    pub fn alias(
        &mut self,
        alias: impl Into<String>,
        target: impl Into<String>,
    ) -> Result<&mut Self, CacheError> {
        let target = target.into();
        // Resolve chained aliases to the canonical name
        let canonical = self
            .aliases
            .get(&target)
            .cloned()
            .unwrap_or(target);

        if !self.factories.contains_key(&canonical) {
            return Err(CacheError::worker_not_found(canonical));
        }

        self.aliases.insert(alias.into(), canonical);
        Ok(self)
    }

    /// Resolves `name` (or an alias) to its canonical name and factory.
    pub fn resolve(&self, name: &str) -> Result<(&str, &WorkerFactory<C, W>), CacheError> {
        let canonical = self.aliases.get(name).map(String::as_str).unwrap_or(name);

        self.factories
            .get_key_value(canonical)
            .map(|(key, factory)| (key.as_str(), factory))
            .ok_or_else(|| CacheError::worker_not_found(name))
    }

    /// Checks if `name` resolves to a registered worker.
    pub fn contains(&self, name: &str) -> bool {
        self.resolve(name).is_ok()
    }

    /// Returns the canonical names of all registered workers.
    pub fn names(&self) -> impl Iterator<Item = &str> {
        self.factories.keys().map(String::as_str)
    }

    /// Returns the number of registered workers (aliases excluded).
    pub fn len(&self) -> usize {
        self.factories.len()
    }

    /// Returns true if no worker is registered.
    pub fn is_empty(&self) -> bool {
        self.factories.is_empty()
    }
}

impl<C, W> Default for WorkerRegistry<C, W> {
    fn default() -> Self {
        Self::new()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    struct Context;

    fn registry() -> WorkerRegistry<Context, String> {
        let mut registry = WorkerRegistry::new();
        registry.register("gen", |_, name| Ok(format!("worker:{name}")));
        registry
    }

    #[test]
    fn test_registry_new_is_empty() {
        let registry: WorkerRegistry<Context, String> = WorkerRegistry::new();
        assert!(registry.is_empty());
        assert!(!registry.contains("gen"));
    }

    #[test]
    fn test_resolve_registered_name() {
        let registry = registry();
        let (canonical, factory) = registry.resolve("gen").unwrap();

        assert_eq!(canonical, "gen");
        assert_eq!(factory(&Arc::new(Context), canonical).unwrap(), "worker:gen");
    }

    #[test]
    fn test_resolve_unknown_name() {
        let registry = registry();
        let result = registry.resolve("missing");
        assert!(matches!(result, Err(CacheError::WorkerNotFound(name)) if name == "missing"));
    }

    #[test]
    fn test_alias_resolves_to_canonical_name() {
        let mut registry = registry();
        registry.alias("org.example.Gen", "gen").unwrap();
        registry.alias("legacy", "org.example.Gen").unwrap();

        let (canonical, _) = registry.resolve("org.example.Gen").unwrap();
        assert_eq!(canonical, "gen");
        let (canonical, _) = registry.resolve("legacy").unwrap();
        assert_eq!(canonical, "gen");
        assert_eq!(registry.len(), 1);
    }

    #[test]
    fn test_alias_to_unknown_target_fails() {
        let mut registry = registry();
        let result = registry.alias("other", "missing");
        assert!(matches!(result, Err(CacheError::WorkerNotFound(_))));
        assert!(!registry.contains("other"));
    }
}
