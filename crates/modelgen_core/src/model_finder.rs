use crate::error::GenerateError;
use globset::{Glob, GlobSet, GlobSetBuilder};
use std::path::{Path, PathBuf};
use tracing::debug;
use walkdir::WalkDir;

/// Discovers model files below a directory.
///
/// Patterns are matched against paths relative to the search root.
pub struct ModelFinder {
    include_globs: Option<GlobSet>,
    exclude_globs: Option<GlobSet>,
}

impl ModelFinder {
    pub fn new(include: &[String], exclude: &[String]) -> Result<Self, GenerateError> {
        let include_globs = Self::build_globset(include)?;
        let exclude_globs = Self::build_globset(exclude)?;

        Ok(Self {
            include_globs,
            exclude_globs,
        })
    }

    fn build_globset(patterns: &[String]) -> Result<Option<GlobSet>, GenerateError> {
        if patterns.is_empty() {
            return Ok(None);
        }

        let mut builder = GlobSetBuilder::new();
        for pattern in patterns {
            let glob = Glob::new(pattern).map_err(|e| {
                GenerateError::config(format!("Invalid pattern '{}': {}", pattern, e))
            })?;
            builder.add(glob);
        }

        let globset = builder
            .build()
            .map_err(|e| GenerateError::config(format!("Failed to build globset: {}", e)))?;

        Ok(Some(globset))
    }

    /// Checks if a relative path is selected by the include and exclude patterns.
    ///
    /// Without include patterns nothing is selected.
    pub fn is_model(&self, relative: &Path) -> bool {
        let included = self
            .include_globs
            .as_ref()
            .is_some_and(|includes| includes.is_match(relative));
        let excluded = self
            .exclude_globs
            .as_ref()
            .is_some_and(|excludes| excludes.is_match(relative));

        included && !excluded
    }

    /// Returns the sorted model files below `base_dir`.
    pub fn discover(&self, base_dir: &Path) -> Result<Vec<PathBuf>, GenerateError> {
        if self.include_globs.is_none() {
            return Ok(Vec::new());
        }

        let mut files = Vec::new();
        for entry in WalkDir::new(base_dir).into_iter().filter_map(|e| e.ok()) {
            if !entry.file_type().is_file() {
                continue;
            }

            let path = entry.path();
            let Ok(relative) = path.strip_prefix(base_dir) else {
                continue;
            };

            if self.is_model(relative) {
                files.push(path.to_path_buf());
            }
        }

        files.sort();
        files.dedup();

        debug!(
            "Discovered {} model files below {}",
            files.len(),
            base_dir.display()
        );
        Ok(files)
    }
}
