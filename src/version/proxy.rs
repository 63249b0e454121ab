//! Module proxy protocol client.
//!
//! Speaks the `GOPROXY` protocol: `<mirror>/<module>/@v/list` for the
//! known versions, `<version>.info` for publication metadata, and
//! `<version>.mod` for the manifest at that version.

use crate::fetch;
use crate::version::error::CatalogError;
use crate::version::modfile::{self, RetractionRange};
use crate::version::types::VersionRecord;

/// Client for a single proxy mirror.
pub struct ProxyClient {
    client: reqwest::Client,
    base_url: String,
}

impl ProxyClient {
    pub fn new(client: reqwest::Client, base_url: &str) -> Self {
        Self {
            client,
            base_url: base_url.trim_end_matches('/').to_string(),
        }
    }

    fn module_url(&self, module: &str, rest: &str) -> String {
        format!(
            "{}/{}/@v/{}",
            self.base_url,
            escape_module_path(module),
            rest
        )
    }

    /// Fetches the newline-delimited list of versions the mirror knows
    /// for `module`.
    pub async fn versions(&self, module: &str) -> Result<Vec<String>, CatalogError> {
        let url = self.module_url(module, "list");
        let body = fetch::get_body(&self.client, &url).await?;
        Ok(body
            .lines()
            .filter(|line| !line.is_empty())
            .map(str::to_string)
            .collect())
    }

    /// Fetches the `.info` document for one version.
    pub async fn info(&self, module: &str, version: &str) -> Result<VersionRecord, CatalogError> {
        let url = self.module_url(module, &format!("{version}.info"));
        let body = fetch::get_body(&self.client, &url).await?;
        serde_json::from_str(&body).map_err(|e| CatalogError::Decode {
            url,
            reason: e.to_string(),
        })
    }

    /// Fetches the `.mod` manifest for one version and extracts its
    /// retraction directives.
    pub async fn retractions(
        &self,
        module: &str,
        version: &str,
    ) -> Result<Vec<RetractionRange>, CatalogError> {
        let url = self.module_url(module, &format!("{version}.mod"));
        let body = fetch::get_body(&self.client, &url).await?;
        modfile::parse_retractions(&body).map_err(|e| CatalogError::Decode {
            url,
            reason: e.to_string(),
        })
    }
}

/// Escapes a module path for use in proxy URLs. Uppercase letters
/// become `!` followed by the lowercase letter, so two modules differing
/// only in case cannot collide on a case-insensitive mirror filesystem.
pub fn escape_module_path(path: &str) -> String {
    let mut result = String::with_capacity(path.len());
    for c in path.chars() {
        if c.is_ascii_uppercase() {
            result.push('!');
            result.push(c.to_ascii_lowercase());
        } else {
            result.push(c);
        }
    }
    result
}
