//! # Configuration Module
//!
//! Environment-driven configuration for the gateway. Every value has a
//! default except the upstream API key, which is required.
//!
//! ## Environment variables
//!
//! | Variable | Default |
//! |---|---|
//! | `TMDB_KEY` | required |
//! | `PORT` | `3000` |
//! | `BIND_ADDRESS` | `0.0.0.0` |
//! | `TMDB_BASE_URL` | `https://api.themoviedb.org/3` |
//! | `TMDB_IMAGE_BASE_URL` | `https://image.tmdb.org` |
//! | `TMDB_LANGUAGE` | `ru-RU` |
//! | `CACHE_TTL` | `24h` (humantime format) |
//! | `FAVORITES_PATH` | `favorites.json` |

use crate::core::error::{GatewayError, GatewayResult};
use serde::{Deserialize, Serialize};
use std::net::SocketAddr;
use std::path::PathBuf;
use std::time::Duration;

/// Main gateway configuration structure
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct GatewayConfig {
    /// Server configuration (bind address, port)
    pub server: ServerConfig,

    /// Upstream metadata service configuration
    pub upstream: UpstreamConfig,

    /// Response cache configuration
    pub cache: CacheConfig,

    /// Favorites store configuration
    pub favorites: FavoritesConfig,
}

/// Listener configuration
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ServerConfig {
    /// Address to bind the listener to
    pub bind_address: String,

    /// HTTP port
    pub port: u16,
}

impl Default for ServerConfig {
    fn default() -> Self {
        Self {
            bind_address: "0.0.0.0".to_string(),
            port: 3000,
        }
    }
}

/// Upstream metadata service configuration
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct UpstreamConfig {
    /// API key injected into every upstream request
    pub api_key: String,

    /// Base URL of the metadata API
    pub base_url: String,

    /// Base URL of the image CDN
    pub image_base_url: String,

    /// Locale parameter injected into every metadata request
    pub language: String,
}

impl Default for UpstreamConfig {
    fn default() -> Self {
        Self {
            api_key: String::new(),
            base_url: "https://api.themoviedb.org/3".to_string(),
            image_base_url: "https://image.tmdb.org".to_string(),
            language: "ru-RU".to_string(),
        }
    }
}

/// Response cache configuration
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct CacheConfig {
    /// Time-to-live applied to every cache entry
    #[serde(with = "humantime_serde")]
    pub ttl: Duration,
}

impl Default for CacheConfig {
    fn default() -> Self {
        Self {
            ttl: Duration::from_secs(24 * 3600),
        }
    }
}

/// Favorites store configuration
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct FavoritesConfig {
    /// Path of the persisted JSON document
    pub path: PathBuf,
}

impl Default for FavoritesConfig {
    fn default() -> Self {
        Self {
            path: PathBuf::from("favorites.json"),
        }
    }
}

impl GatewayConfig {
    /// Load configuration from environment variables
    ///
    /// Starts from defaults, applies overrides, then validates the result.
    pub fn from_env() -> GatewayResult<Self> {
        use std::env;

        let mut config = Self {
            server: ServerConfig::default(),
            upstream: UpstreamConfig::default(),
            cache: CacheConfig::default(),
            favorites: FavoritesConfig::default(),
        };

        if let Ok(key) = env::var("TMDB_KEY") {
            config.upstream.api_key = key;
        }

        if let Ok(port) = env::var("PORT") {
            config.server.port = port
                .parse()
                .map_err(|e| GatewayError::config(format!("Invalid PORT: {}", e)))?;
        }

        if let Ok(addr) = env::var("BIND_ADDRESS") {
            config.server.bind_address = addr;
        }

        if let Ok(url) = env::var("TMDB_BASE_URL") {
            config.upstream.base_url = url;
        }

        if let Ok(url) = env::var("TMDB_IMAGE_BASE_URL") {
            config.upstream.image_base_url = url;
        }

        if let Ok(language) = env::var("TMDB_LANGUAGE") {
            config.upstream.language = language;
        }

        if let Ok(ttl) = env::var("CACHE_TTL") {
            config.cache.ttl = humantime::parse_duration(&ttl)
                .map_err(|e| GatewayError::config(format!("Invalid CACHE_TTL: {}", e)))?;
        }

        if let Ok(path) = env::var("FAVORITES_PATH") {
            config.favorites.path = PathBuf::from(path);
        }

        config.validate()?;
        Ok(config)
    }

    /// Configuration validation with collected error messages
    pub fn validate(&self) -> GatewayResult<()> {
        let mut errors = Vec::new();

        if self.upstream.api_key.is_empty() {
            errors.push("TMDB_KEY must be set to a non-empty API key".to_string());
        }

        if self.server.bind_address.is_empty() {
            errors.push("bind_address cannot be empty".to_string());
        }

        if self.server.port == 0 {
            errors.push("port must be greater than 0".to_string());
        }

        if self.upstream.base_url.is_empty() {
            errors.push("upstream base_url cannot be empty".to_string());
        }

        if self.upstream.image_base_url.is_empty() {
            errors.push("image_base_url cannot be empty".to_string());
        }

        if self.cache.ttl.as_secs() == 0 && self.cache.ttl.subsec_nanos() == 0 {
            errors.push("cache ttl must be greater than 0".to_string());
        }

        if self.favorites.path.as_os_str().is_empty() {
            errors.push("favorites path cannot be empty".to_string());
        }

        if errors.is_empty() {
            Ok(())
        } else {
            Err(GatewayError::config(errors.join("; ")))
        }
    }

    /// Resolve the configured bind address and port into a socket address
    pub fn socket_addr(&self) -> GatewayResult<SocketAddr> {
        format!("{}:{}", self.server.bind_address, self.server.port)
            .parse()
            .map_err(|e| GatewayError::config(format!("Invalid bind address: {}", e)))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn valid_config() -> GatewayConfig {
        GatewayConfig {
            upstream: UpstreamConfig {
                api_key: "test-key".to_string(),
                ..Default::default()
            },
            server: ServerConfig::default(),
            cache: CacheConfig::default(),
            favorites: FavoritesConfig::default(),
        }
    }

    #[test]
    fn test_valid_config_passes_validation() {
        assert!(valid_config().validate().is_ok());
    }

    #[test]
    fn test_missing_api_key_rejected() {
        let mut config = valid_config();
        config.upstream.api_key.clear();

        let err = config.validate().unwrap_err();
        assert!(err.to_string().contains("TMDB_KEY"));
    }

    #[test]
    fn test_zero_ttl_rejected() {
        let mut config = valid_config();
        config.cache.ttl = Duration::from_secs(0);

        assert!(config.validate().is_err());
    }

    #[test]
    fn test_default_ttl_is_24_hours() {
        assert_eq!(CacheConfig::default().ttl, Duration::from_secs(86400));
    }

    #[test]
    fn test_socket_addr_resolution() {
        let config = valid_config();
        let addr = config.socket_addr().unwrap();
        assert_eq!(addr.port(), 3000);
    }
}
