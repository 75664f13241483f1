//! npm registry oracle
//!
//! Resolves dist-tags and semver ranges against the npm registry.
//! API endpoint: {registry}/{package} (abbreviated packument)

use crate::error::RegistryError;
use crate::range::{parse_version, NpmRange};
use crate::registry::{HttpClient, VersionOracle};
use async_trait::async_trait;
use serde::de::IgnoredAny;
use serde::Deserialize;
use std::collections::HashMap;
use std::sync::Arc;
use tokio::sync::{Mutex, OnceCell};
use tracing::{debug, trace};

/// Public npm registry base URL
pub const DEFAULT_REGISTRY_URL: &str = "https://registry.npmjs.org";

/// Media type of the abbreviated metadata document
const ABBREVIATED_ACCEPT: &str = "application/vnd.npm.install-v1+json";

/// The subset of a packument needed to resolve ranges
#[derive(Debug, Default, Deserialize)]
pub struct Packument {
    /// Tag name to version, e.g. `latest` -> `4.17.21`
    #[serde(rename = "dist-tags", default)]
    pub dist_tags: HashMap<String, String>,
    /// Published versions (manifests are not needed)
    #[serde(default)]
    pub versions: HashMap<String, IgnoredAny>,
}

impl Packument {
    /// Resolve a tag or a range to a published version
    pub fn resolve(&self, range: &str) -> Option<String> {
        let range = range.trim();
        if let Some(version) = self.dist_tags.get(range) {
            return Some(version.clone());
        }

        let range = NpmRange::parse(range)?;
        self.versions
            .keys()
            .filter_map(|raw| parse_version(raw).map(|v| (v, raw)))
            .filter(|(version, _)| range.matches(version))
            .max_by(|(a, _), (b, _)| a.cmp(b))
            .map(|(_, raw)| raw.clone())
    }
}

/// Outcome of the one fetch made per package; failures are remembered too
type PackumentCell = Arc<OnceCell<Result<Arc<Packument>, RegistryError>>>;

/// npm registry oracle
pub struct NpmOracle {
    client: HttpClient,
    registry_url: String,
    cache: Mutex<HashMap<String, PackumentCell>>,
}

impl NpmOracle {
    /// Create an oracle against the public registry
    pub fn new(client: HttpClient) -> Self {
        Self::with_registry(client, DEFAULT_REGISTRY_URL)
    }

    /// Create an oracle against a custom registry
    pub fn with_registry(client: HttpClient, registry_url: impl Into<String>) -> Self {
        let registry_url = registry_url.into().trim_end_matches('/').to_string();
        Self {
            client,
            registry_url,
            cache: Mutex::new(HashMap::new()),
        }
    }

    /// Build the URL for a package; the scope separator is escaped
    fn build_url(&self, package: &str) -> String {
        format!("{}/{}", self.registry_url, package.replace('/', "%2f"))
    }

    /// Fetch a packument once per package, sharing the outcome between callers
    async fn packument(&self, package: &str) -> Result<Arc<Packument>, RegistryError> {
        let cell = {
            let mut cache = self.cache.lock().await;
            cache.entry(package.to_string()).or_default().clone()
        };

        cell.get_or_init(|| async {
            let url = self.build_url(package);
            debug!(package, url = %url, "fetching packument");
            let result = self
                .client
                .get_json::<Packument>(&url, ABBREVIATED_ACCEPT, package, self.registry_name())
                .await
                .map(Arc::new);
            if let Err(e) = &result {
                debug!(package, error = %e, "packument unavailable for this run");
            }
            result
        })
        .await
        .clone()
    }
}

#[async_trait]
impl VersionOracle for NpmOracle {
    fn registry_name(&self) -> &'static str {
        "npm"
    }

    async fn resolve(&self, package: &str, range: &str) -> Result<Option<String>, RegistryError> {
        let packument = self.packument(package).await?;
        let resolved = packument.resolve(range);
        trace!(package, range, resolved = ?resolved, "resolved range");
        Ok(resolved)
    }
}
