//! # Favorites Module
//!
//! Persisted per-user favorite-movie lists, stored as a single JSON document
//! mapping user identifier to a deduplicated list of movies.

pub mod store;

pub use store::{FavoritesStore, Movie};
