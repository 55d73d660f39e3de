//! # Upstream Module
//!
//! HTTP client for the movie metadata service and structural validation of
//! its payloads. The client fetches and parses; the validator decides whether
//! a parsed payload can be trusted and cached. Neither caches; that is the
//! handlers' job.

pub mod client;
pub mod validate;

pub use client::MetadataClient;
