//! # Gateway Module
//!
//! The HTTP surface of the gateway: router construction, the per-resource
//! caching handlers, and the image proxy.

pub mod handlers;
pub mod image_proxy;
pub mod server;

pub use server::{build_router, AppState, GatewayServer};
