//! Version-resolution oracle
//!
//! This module provides:
//! - The `VersionOracle` trait consumed by the suggestion resolver
//! - A single-attempt HTTP client with registry error context
//! - An npm registry oracle

mod client;
mod npm;

pub use client::HttpClient;
pub use npm::{NpmOracle, Packument, DEFAULT_REGISTRY_URL};

use crate::error::RegistryError;
use async_trait::async_trait;

/// Tag resolving to the newest published release
pub const LATEST_TAG: &str = "latest";

/// Resolves a dependency and a target range expression to a version
#[async_trait]
pub trait VersionOracle: Send + Sync {
    /// Get the registry name, for diagnostics
    fn registry_name(&self) -> &'static str;

    /// Resolve `range` (a semver range or a dist-tag such as `latest`) for a
    /// package. `Ok(None)` means the registry has no matching version.
    async fn resolve(&self, package: &str, range: &str) -> Result<Option<String>, RegistryError>;
}
