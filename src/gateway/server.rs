//! # HTTP Server Module
//!
//! Builds the Axum application (routes, CORS, request tracing) and runs it.
//! All shared components (cache, upstream client, image proxy, favorites
//! store) are constructed once at startup and dependency-injected into
//! handlers through the application state; there is no process-global state.

use crate::caching::ResponseCache;
use crate::core::config::GatewayConfig;
use crate::core::error::GatewayResult;
use crate::favorites::FavoritesStore;
use crate::gateway::handlers;
use crate::gateway::image_proxy::{self, ImageProxy};
use crate::upstream::MetadataClient;
use axum::routing::{delete, get};
use axum::Router as AxumRouter;
use std::net::SocketAddr;
use std::sync::Arc;
use tokio::net::TcpListener;
use tower_http::cors::CorsLayer;
use tower_http::trace::TraceLayer;
use tracing::info;

/// Shared application state, cloned into every handler
#[derive(Clone)]
pub struct AppState {
    /// TTL response cache, empty at startup
    pub cache: Arc<ResponseCache>,

    /// Client for the metadata API
    pub metadata: Arc<MetadataClient>,

    /// Streaming proxy for the image CDN
    pub images: Arc<ImageProxy>,

    /// Persisted favorites store
    pub favorites: Arc<FavoritesStore>,
}

impl AppState {
    /// Construct all components from configuration
    pub fn new(config: &GatewayConfig) -> Self {
        Self {
            cache: Arc::new(ResponseCache::new(config.cache.ttl)),
            metadata: Arc::new(MetadataClient::new(&config.upstream)),
            images: Arc::new(ImageProxy::new(&config.upstream)),
            favorites: Arc::new(FavoritesStore::new(&config.favorites.path)),
        }
    }
}

/// Build the Axum router with all gateway routes and middleware layers
///
/// CORS is permissive, matching the reference deployment where browser
/// clients call the gateway directly from any origin.
pub fn build_router(state: AppState) -> AxumRouter {
    AxumRouter::new()
        .route("/", get(handlers::liveness))
        .route("/genre/movie/list", get(handlers::genre_list))
        .route("/discover/movie", get(handlers::discover))
        .route("/movie/:id", get(handlers::movie_detail))
        .route("/image/*path", get(image_proxy::proxy_image))
        .route(
            "/favorites/:user_id",
            get(handlers::favorites_list).post(handlers::favorites_upsert),
        )
        .route(
            "/favorites/:user_id/:movie_id",
            delete(handlers::favorites_remove),
        )
        .layer(TraceLayer::new_for_http())
        .layer(CorsLayer::permissive())
        .with_state(state)
}

/// The gateway server: a bound address and the application to serve on it
pub struct GatewayServer {
    bind_addr: SocketAddr,
    app: AxumRouter,
}

impl GatewayServer {
    /// Create a server from configuration
    pub fn new(config: &GatewayConfig) -> GatewayResult<Self> {
        let bind_addr = config.socket_addr()?;
        let state = AppState::new(config);

        Ok(Self {
            bind_addr,
            app: build_router(state),
        })
    }

    /// The address the server will bind to
    pub fn bind_addr(&self) -> SocketAddr {
        self.bind_addr
    }

    /// Bind and serve until `shutdown` resolves
    pub async fn start<F>(self, shutdown: F) -> GatewayResult<()>
    where
        F: std::future::Future<Output = ()> + Send + 'static,
    {
        let listener = TcpListener::bind(self.bind_addr).await?;
        info!("🚀 Gateway listening on http://{}", self.bind_addr);

        axum::serve(listener, self.app)
            .with_graceful_shutdown(shutdown)
            .await?;

        Ok(())
    }
}
