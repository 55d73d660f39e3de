//! # Cache Key Derivation
//!
//! Deterministic string keys for each cacheable logical request.
//!
//! Discovery keys are built from the full query-parameter mapping with the
//! parameter names sorted first, so that logically identical queries produce
//! identical keys regardless of the order clients supply parameters in.
//! Movie-detail keys are derived from the identifier only; the locale
//! parameter is deliberately not part of the key, so a detail cached under
//! one language is served for all languages until it expires. That staleness
//! risk is a documented limitation, not an error.

use std::collections::HashMap;

/// Constant key for the genre list
pub const GENRES_KEY: &str = "genres";

/// Prefix for discovery keys
const DISCOVER_PREFIX: &str = "discover_";

/// Prefix for movie-detail keys
const MOVIE_PREFIX: &str = "movie_";

/// Build the cache key for a discovery request from its query parameters
///
/// Canonicalization: parameters are sorted by name and joined as `k=v` pairs
/// with `&`, so the key is order-insensitive but value-sensitive.
pub fn discover_key(params: &HashMap<String, String>) -> String {
    let mut pairs: Vec<(&str, &str)> = params
        .iter()
        .map(|(k, v)| (k.as_str(), v.as_str()))
        .collect();
    pairs.sort();

    let canonical = pairs
        .iter()
        .map(|(k, v)| format!("{}={}", k, v))
        .collect::<Vec<_>>()
        .join("&");

    format!("{}{}", DISCOVER_PREFIX, canonical)
}

/// Build the cache key for a movie-detail request
pub fn movie_key(id: &str) -> String {
    format!("{}{}", MOVIE_PREFIX, id)
}

#[cfg(test)]
mod tests {
    use super::*;

    fn params(pairs: &[(&str, &str)]) -> HashMap<String, String> {
        pairs
            .iter()
            .map(|(k, v)| (k.to_string(), v.to_string()))
            .collect()
    }

    #[test]
    fn test_discover_key_is_order_insensitive() {
        let a = params(&[("page", "2"), ("with_genres", "18"), ("year", "1972")]);
        let b = params(&[("year", "1972"), ("page", "2"), ("with_genres", "18")]);

        assert_eq!(discover_key(&a), discover_key(&b));
    }

    #[test]
    fn test_discover_key_is_value_sensitive() {
        let a = params(&[("page", "1")]);
        let b = params(&[("page", "2")]);

        assert_ne!(discover_key(&a), discover_key(&b));
    }

    #[test]
    fn test_discover_key_canonical_form() {
        let q = params(&[("year", "1972"), ("page", "2")]);
        assert_eq!(discover_key(&q), "discover_page=2&year=1972");
    }

    #[test]
    fn test_discover_key_empty_query() {
        assert_eq!(discover_key(&HashMap::new()), "discover_");
    }

    #[test]
    fn test_movie_key() {
        assert_eq!(movie_key("603"), "movie_603");
    }
}
