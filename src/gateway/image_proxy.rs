//! # Image Proxy
//!
//! Rewrites inbound `/image/*` paths to the image CDN's path convention and
//! streams the CDN response back unchanged. Stateless and uncached: every
//! request reaches the CDN, whose responses are cacheable by intermediate
//! HTTP caches anyway.

use crate::core::config::UpstreamConfig;
use crate::core::error::{GatewayError, GatewayResult};
use crate::gateway::server::AppState;
use axum::body::Body;
use axum::extract::{Path, State};
use axum::http::{HeaderName, HeaderValue, StatusCode};
use axum::response::Response;
use tracing::debug;

/// Fixed CDN path template: poster tier `w500`
const CDN_PATH_PREFIX: &str = "/t/p/w500";

/// Streaming proxy for the image CDN
pub struct ImageProxy {
    http: reqwest::Client,
    base_url: String,
}

impl ImageProxy {
    /// Create a proxy from upstream configuration
    pub fn new(config: &UpstreamConfig) -> Self {
        Self {
            http: reqwest::Client::new(),
            base_url: config.image_base_url.trim_end_matches('/').to_string(),
        }
    }

    /// Translate an inbound image path (mount prefix already stripped by the
    /// router) into the full CDN URL
    pub fn rewrite(&self, path: &str) -> String {
        format!(
            "{}{}/{}",
            self.base_url,
            CDN_PATH_PREFIX,
            path.trim_start_matches('/')
        )
    }

    /// Fetch the rewritten URL, failing with `ImageUpstream` on transport
    /// errors
    async fn fetch(&self, path: &str) -> GatewayResult<reqwest::Response> {
        let url = self.rewrite(path);
        debug!(%url, "proxying image");

        self.http
            .get(&url)
            .send()
            .await
            .map_err(|e| GatewayError::image_upstream(e.to_string()))
    }
}

/// GET `/image/*path`: stream the CDN response back to the caller
///
/// Status and headers are copied over (hop-by-hop headers excluded) and the
/// body is streamed without buffering.
pub async fn proxy_image(
    State(state): State<AppState>,
    Path(path): Path<String>,
) -> GatewayResult<Response> {
    let upstream = state.images.fetch(&path).await?;

    let status = StatusCode::from_u16(upstream.status().as_u16())
        .unwrap_or(StatusCode::BAD_GATEWAY);
    let mut builder = Response::builder().status(status);

    for (name, value) in upstream.headers() {
        if is_hop_by_hop(name.as_str()) {
            continue;
        }
        // reqwest and axum sit on different `http` major versions, so header
        // names and values are converted through their byte representations
        if let (Ok(name), Ok(value)) = (
            HeaderName::from_bytes(name.as_str().as_bytes()),
            HeaderValue::from_bytes(value.as_bytes()),
        ) {
            builder = builder.header(name, value);
        }
    }

    builder
        .body(Body::from_stream(upstream.bytes_stream()))
        .map_err(|e| GatewayError::image_upstream(e.to_string()))
}

/// Hop-by-hop headers that must not be forwarded
fn is_hop_by_hop(name: &str) -> bool {
    matches!(
        name,
        "connection"
            | "keep-alive"
            | "proxy-authenticate"
            | "proxy-authorization"
            | "te"
            | "trailer"
            | "transfer-encoding"
            | "upgrade"
    )
}

#[cfg(test)]
mod tests {
    use super::*;

    fn proxy(base: &str) -> ImageProxy {
        ImageProxy::new(&UpstreamConfig {
            api_key: "k".to_string(),
            base_url: "https://api.example.test/3".to_string(),
            image_base_url: base.to_string(),
            language: "ru-RU".to_string(),
        })
    }

    #[test]
    fn test_rewrite_applies_cdn_template() {
        let proxy = proxy("https://image.tmdb.org");
        assert_eq!(
            proxy.rewrite("abc.jpg"),
            "https://image.tmdb.org/t/p/w500/abc.jpg"
        );
    }

    #[test]
    fn test_rewrite_normalizes_slashes() {
        let proxy = proxy("https://image.tmdb.org/");
        assert_eq!(
            proxy.rewrite("/abc.jpg"),
            "https://image.tmdb.org/t/p/w500/abc.jpg"
        );
    }

    #[test]
    fn test_hop_by_hop_headers_filtered() {
        assert!(is_hop_by_hop("transfer-encoding"));
        assert!(is_hop_by_hop("connection"));
        assert!(!is_hop_by_hop("content-type"));
        assert!(!is_hop_by_hop("cache-control"));
    }
}
