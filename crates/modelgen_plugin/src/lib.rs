//! # modelgen_plugin
//!
//! WASM generator runtime for modelgen.
//!
//! This crate provides:
//! - Loading generator modules and reading their manifests
//! - A host that indexes generators by name and alias
//! - The request/response protocol between host and generator
//!
//! ## Architecture
//!
//! Generators are compiled to WASM and run in a sandboxed Extism/wasmtime
//! instance with memory and time limits. Each module exports:
//!
//! - `get_manifest`: returns a JSON [`GeneratorManifest`]
//! - `generate`: takes a MessagePack [`GenerateRequest`] and returns a
//!   MessagePack [`GenerateResponse`]
//!
//! ## Example
//!
//! ```rust,ignore
//! use modelgen_plugin::{GenerateRequest, GeneratorHost, PluginOptions};
//!
//! let mut host = GeneratorHost::new();
//! host.load_module("./generators/c.wasm", PluginOptions::default())?;
//!
//! let request = GenerateRequest::new(&args, &models);
//! let response = host.run("etrice-c", &request)?;
//! ```

mod error;
mod executor;
mod executor_extism;
mod host;
mod manifest;
mod protocol;

#[cfg(any(test, feature = "test-utils"))]
pub mod test_utils;

pub use error::PluginError;
pub use executor::{GeneratorExecutor, LoadResult, PluginOptions};
pub use executor_extism::ExtismExecutor;
pub use host::GeneratorHost;
pub use manifest::GeneratorManifest;
pub use protocol::{GenerateRequest, GenerateResponse, GeneratedFile, ModelSource};
