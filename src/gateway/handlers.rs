//! # Gateway Handlers
//!
//! One handler per logical resource. The three metadata handlers share the
//! same skeleton:
//!
//! 1. compute the cache key from the request parameters
//! 2. on a cache hit, return the cached value immediately with no upstream
//!    call and no re-validation
//! 3. on a miss, fetch from the metadata service; transport/parse failures
//!    become a 500 and nothing is cached
//! 4. validate the payload shape where required; a violation becomes a 502
//!    and nothing is cached
//! 5. store the payload under the key and return it
//!
//! Repeated calls with identical parameters inside the TTL window therefore
//! return identical bodies and issue no additional upstream calls.
//!
//! The favorites handlers bypass the cache entirely and go straight to the
//! persisted store.

use crate::caching::keys;
use crate::core::error::GatewayResult;
use crate::favorites::Movie;
use crate::gateway::server::AppState;
use crate::upstream::validate;
use axum::extract::{Path, Query, State};
use axum::http::StatusCode;
use axum::Json;
use serde_json::{json, Value};
use std::collections::HashMap;
use tracing::debug;

/// GET `/`: liveness probe
pub async fn liveness() -> &'static str {
    "TMDb proxy is up"
}

/// GET `/genre/movie/list`: cached genre list
///
/// Only the genre array itself is cached; the response rewraps it so the
/// body shape stays `{"genres": [...]}` for hits and misses alike.
pub async fn genre_list(State(state): State<AppState>) -> GatewayResult<Json<Value>> {
    if let Some(genres) = state.cache.get(keys::GENRES_KEY) {
        debug!(key = keys::GENRES_KEY, "cache hit");
        return Ok(Json(json!({ "genres": genres })));
    }

    let payload = state
        .metadata
        .get_json("genre/movie/list", &HashMap::new())
        .await?;
    let genres = Value::Array(validate::require_array(&payload, "genres")?.clone());

    state.cache.set(keys::GENRES_KEY, genres.clone());
    Ok(Json(json!({ "genres": genres })))
}

/// GET `/discover/movie`: cached discovery/search
///
/// The full upstream object is cached and returned so clients keep the
/// pagination metadata (`total_pages` etc.) alongside `results`.
pub async fn discover(
    State(state): State<AppState>,
    Query(params): Query<HashMap<String, String>>,
) -> GatewayResult<Json<Value>> {
    let key = keys::discover_key(&params);

    if let Some(cached) = state.cache.get(&key) {
        debug!(%key, "cache hit");
        return Ok(Json(cached));
    }

    let payload = state.metadata.get_json("discover/movie", &params).await?;
    validate::require_array(&payload, "results")?;

    state.cache.set(&key, payload.clone());
    Ok(Json(payload))
}

/// GET `/movie/:id`: cached movie detail, passthrough (no shape check)
///
/// The key is derived from the identifier only; the locale parameter is not
/// part of it, so details cached under one language serve all languages
/// until expiry (documented limitation).
pub async fn movie_detail(
    State(state): State<AppState>,
    Path(id): Path<String>,
) -> GatewayResult<Json<Value>> {
    let key = keys::movie_key(&id);

    if let Some(cached) = state.cache.get(&key) {
        debug!(%key, "cache hit");
        return Ok(Json(cached));
    }

    let payload = state
        .metadata
        .get_json(&format!("movie/{}", id), &HashMap::new())
        .await?;

    state.cache.set(&key, payload.clone());
    Ok(Json(payload))
}

/// GET `/favorites/:user_id`: list a user's favorites
pub async fn favorites_list(
    State(state): State<AppState>,
    Path(user_id): Path<String>,
) -> GatewayResult<Json<Vec<Movie>>> {
    let movies = state.favorites.list(&user_id).await?;
    Ok(Json(movies))
}

/// POST `/favorites/:user_id`: upsert one favorite by id
pub async fn favorites_upsert(
    State(state): State<AppState>,
    Path(user_id): Path<String>,
    Json(movie): Json<Movie>,
) -> GatewayResult<(StatusCode, Json<Value>)> {
    state.favorites.upsert(&user_id, movie).await?;
    Ok((StatusCode::CREATED, Json(json!({ "success": true }))))
}

/// DELETE `/favorites/:user_id/:movie_id`: remove one favorite by id
pub async fn favorites_remove(
    State(state): State<AppState>,
    Path((user_id, movie_id)): Path<(String, String)>,
) -> GatewayResult<Json<Value>> {
    state.favorites.remove(&user_id, &movie_id).await?;
    Ok(Json(json!({ "success": true })))
}
