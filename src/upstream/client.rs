//! # Metadata Service Client
//!
//! Issues GET requests to the upstream metadata API with the API key and the
//! configured locale merged under caller-supplied query parameters. Callers
//! may override the locale, but never the API key.
//!
//! The client does not inspect HTTP status codes: a non-2xx JSON body is
//! passed through for handlers and the validator to deal with, matching the
//! reference behavior of the service this gateway fronts.

use crate::core::config::UpstreamConfig;
use crate::core::error::GatewayResult;
use serde_json::Value;
use std::collections::{BTreeMap, HashMap};
use tracing::debug;

/// Client for the upstream metadata API
pub struct MetadataClient {
    http: reqwest::Client,
    base_url: String,
    api_key: String,
    language: String,
}

impl MetadataClient {
    /// Create a new client from upstream configuration
    pub fn new(config: &UpstreamConfig) -> Self {
        Self {
            http: reqwest::Client::new(),
            base_url: config.base_url.trim_end_matches('/').to_string(),
            api_key: config.api_key.clone(),
            language: config.language.clone(),
        }
    }

    /// Issue a GET to `path` (relative to the base URL) and parse the body
    /// as JSON
    ///
    /// Transport failures map to `UpstreamUnreachable`, unparsable bodies to
    /// `UpstreamMalformed` (via the `From<reqwest::Error>` classification).
    pub async fn get_json(
        &self,
        path: &str,
        params: &HashMap<String, String>,
    ) -> GatewayResult<Value> {
        let url = format!("{}/{}", self.base_url, path.trim_start_matches('/'));
        let query = self.merged_query(params);

        debug!(%url, "fetching upstream");

        let response = self
            .http
            .get(&url)
            .query(&query)
            .send()
            .await?;

        let payload = response.json::<Value>().await?;
        Ok(payload)
    }

    /// Merge caller parameters with the injected defaults
    ///
    /// The locale default can be overridden by callers; the API key is
    /// re-applied last so it always wins.
    fn merged_query(&self, params: &HashMap<String, String>) -> BTreeMap<String, String> {
        let mut query = BTreeMap::new();
        query.insert("language".to_string(), self.language.clone());

        for (key, value) in params {
            query.insert(key.clone(), value.clone());
        }

        query.insert("api_key".to_string(), self.api_key.clone());
        query
    }
}
