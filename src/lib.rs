//! # TMDb Gateway Library
//!
//! A caching API gateway fronting the TMDb movie metadata service. It reduces
//! upstream call volume with a time-bounded response cache, validates
//! upstream payload shapes before trusting them, rewrites and streams image
//! CDN requests, and persists per-user favorite-movie lists.
//!
//! Control flow for metadata requests:
//! inbound request → handler → cache hit? return : fetch upstream →
//! validate → cache → return. Favorites and image requests bypass the cache.

/// Core functionality: error types and configuration
pub mod core;

/// TTL response cache and cache-key derivation
pub mod caching;

/// Metadata API client and payload validation
pub mod upstream;

/// Persisted per-user favorites
pub mod favorites;

/// HTTP surface: router, handlers, image proxy, server loop
pub mod gateway;

/// Main error and result types, re-exported for convenience
pub use crate::core::error::{GatewayError, GatewayResult};

/// Main configuration structure
pub use crate::core::config::GatewayConfig;

/// Server entry points
pub use crate::gateway::server::{build_router, AppState, GatewayServer};
