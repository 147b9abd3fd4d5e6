//! Cache error types.

use thiserror::Error;

/// Errors that can occur while looking up or releasing workspaces.
#[derive(Debug, Error)]
pub enum CacheError {
    /// The cache was constructed with an unusable configuration.
    #[error("Invalid cache configuration: {0}")]
    InvalidConfiguration(String),

    /// A resource set could not be turned into an execution context.
    #[error("Resources unavailable [{resources}]: {message}")]
    ResourceUnavailable { resources: String, message: String },

    /// Releasing an execution context failed.
    #[error("Failed to release context [{resources}]: {message}")]
    ReleaseFailure { resources: String, message: String },

    /// No worker factory is registered under the requested name.
    #[error("Worker not found: {0}")]
    WorkerNotFound(String),

    /// A registered worker factory failed.
    #[error("Failed to create worker '{name}': {message}")]
    WorkerCreation { name: String, message: String },
}

impl CacheError {
    /// Creates an invalid configuration error.
    pub fn invalid_configuration(message: impl Into<String>) -> Self {
        Self::InvalidConfiguration(message.into())
    }

    /// Creates a resource unavailable error.
    pub fn resource_unavailable(resources: impl ToString, message: impl Into<String>) -> Self {
        Self::ResourceUnavailable {
            resources: resources.to_string(),
            message: message.into(),
        }
    }

    /// Creates a release failure error.
    pub fn release(resources: impl ToString, message: impl Into<String>) -> Self {
        Self::ReleaseFailure {
            resources: resources.to_string(),
            message: message.into(),
        }
    }

    /// Creates a worker not found error.
    pub fn worker_not_found(name: impl Into<String>) -> Self {
        Self::WorkerNotFound(name.into())
    }

    /// Creates a worker creation error.
    pub fn worker_creation(name: impl Into<String>, message: impl Into<String>) -> Self {
        Self::WorkerCreation {
            name: name.into(),
            message: message.into(),
        }
    }
}
