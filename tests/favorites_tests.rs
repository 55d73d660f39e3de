//! # Favorites Concurrency Tests
//!
//! Stress tests for the favorites store's serialized-writer discipline: the
//! whole-file read-modify-write cycle must not lose updates when many writers
//! run concurrently against the same document.

use futures::future::join_all;
use serde_json::json;
use serde_json::Map;
use std::sync::Arc;
use tmdb_gateway::favorites::{FavoritesStore, Movie};

fn movie(id: u64, title: &str) -> Movie {
    let mut extra = Map::new();
    extra.insert("title".to_string(), json!(title));
    Movie {
        id: json!(id),
        extra,
    }
}

#[tokio::test]
async fn test_concurrent_upserts_for_distinct_users_all_land() {
    let dir = tempfile::tempdir().unwrap();
    let store = Arc::new(FavoritesStore::new(dir.path().join("favorites.json")));

    let writers = 16;
    let tasks: Vec<_> = (0..writers)
        .map(|i| {
            let store = store.clone();
            tokio::spawn(async move {
                let user = format!("user-{}", i);
                store.upsert(&user, movie(i, "concurrent")).await
            })
        })
        .collect();

    for result in join_all(tasks).await {
        result.unwrap().unwrap();
    }

    // Every writer's update must have survived the whole-file rewrites
    for i in 0..writers {
        let user = format!("user-{}", i);
        let list = store.list(&user).await.unwrap();
        assert_eq!(list.len(), 1, "lost update for {}", user);
        assert_eq!(list[0].id_text(), i.to_string());
    }
}

#[tokio::test]
async fn test_concurrent_upserts_for_one_user_dedup_by_id() {
    let dir = tempfile::tempdir().unwrap();
    let store = Arc::new(FavoritesStore::new(dir.path().join("favorites.json")));

    let tasks: Vec<_> = (0..8)
        .map(|_| {
            let store = store.clone();
            tokio::spawn(async move { store.upsert("alice", movie(42, "same id")).await })
        })
        .collect();

    for result in join_all(tasks).await {
        result.unwrap().unwrap();
    }

    let list = store.list("alice").await.unwrap();
    assert_eq!(list.len(), 1);
    assert_eq!(list[0].id_text(), "42");
}

#[tokio::test]
async fn test_concurrent_mixed_upsert_and_remove_keeps_document_consistent() {
    let dir = tempfile::tempdir().unwrap();
    let store = Arc::new(FavoritesStore::new(dir.path().join("favorites.json")));

    for id in 0..8u64 {
        store.upsert("alice", movie(id, "seed")).await.unwrap();
    }

    let mut tasks = Vec::new();
    for id in 0..8u64 {
        let store = store.clone();
        tasks.push(tokio::spawn(async move {
            if id % 2 == 0 {
                store.remove("alice", &id.to_string()).await
            } else {
                store.upsert("alice", movie(id, "rewritten")).await
            }
        }));
    }

    for result in join_all(tasks).await {
        result.unwrap().unwrap();
    }

    let list = store.list("alice").await.unwrap();
    let ids: Vec<String> = list.iter().map(Movie::id_text).collect();
    assert_eq!(ids, ["1", "3", "5", "7"]);
    for entry in &list {
        assert_eq!(entry.extra.get("title"), Some(&json!("rewritten")));
    }
}
