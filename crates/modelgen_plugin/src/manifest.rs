//! Generator manifest definition.

use serde::{Deserialize, Serialize};

/// Manifest for a WASM generator module.
///
/// Every generator must export a `get_manifest` function that returns
/// this structure serialized as JSON.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct GeneratorManifest {
    /// Unique generator identifier (e.g., "etrice-c").
    pub name: String,

    /// Generator version (semver).
    pub version: String,

    /// Human-readable description.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub description: Option<String>,

    /// Former names the generator still answers to.
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub aliases: Vec<String>,
}

impl GeneratorManifest {
    /// Creates a new generator manifest.
    pub fn new(name: impl Into<String>, version: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            version: version.into(),
            description: None,
            aliases: Vec::new(),
        }
    }

    /// Sets the description.
    pub fn with_description(mut self, description: impl Into<String>) -> Self {
        self.description = Some(description.into());
        self
    }

    /// Sets the aliases.
    pub fn with_aliases(mut self, aliases: Vec<String>) -> Self {
        self.aliases = aliases;
        self
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_manifest_new() {
        let manifest = GeneratorManifest::new("etrice-c", "1.0.0");

        assert_eq!(manifest.name, "etrice-c");
        assert_eq!(manifest.version, "1.0.0");
        assert!(manifest.description.is_none());
        assert!(manifest.aliases.is_empty());
    }

    #[test]
    fn test_manifest_builder() {
        let manifest = GeneratorManifest::new("etrice-c", "1.0.0")
            .with_description("C code generator")
            .with_aliases(vec!["org.eclipse.etrice.generator.c.Main".to_string()]);

        assert_eq!(manifest.description.as_deref(), Some("C code generator"));
        assert_eq!(manifest.aliases, vec!["org.eclipse.etrice.generator.c.Main"]);
    }

    #[test]
    fn test_manifest_serialization_skips_empty_fields() {
        let manifest = GeneratorManifest::new("gen", "0.1.0");
        let json = serde_json::to_string(&manifest).unwrap();

        assert_eq!(json, r#"{"name":"gen","version":"0.1.0"}"#);
    }

    #[test]
    fn test_manifest_deserialization_defaults() {
        let json = r#"{ "name": "gen", "version": "0.1.0" }"#;

        let manifest: GeneratorManifest = serde_json::from_str(json).unwrap();
        assert!(manifest.aliases.is_empty());
    }

    #[test]
    fn test_manifest_deserialization_with_aliases() {
        let json = r#"{
            "name": "gen",
            "version": "0.1.0",
            "description": "test",
            "aliases": ["old-gen"]
        }"#;

        let manifest: GeneratorManifest = serde_json::from_str(json).unwrap();
        assert_eq!(manifest.aliases, vec!["old-gen"]);
        assert_eq!(manifest.description.as_deref(), Some("test"));
    }
}
