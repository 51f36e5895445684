//! Tests for opening the store selected on the command line

#![allow(clippy::unwrap_used)]

use graphscraper_core::store::GraphStore;
use tempfile::TempDir;

use crate::commands::store::{open, open_existing};
use crate::StoreArgs;

fn sqlite_args(dir: &TempDir) -> StoreArgs {
    StoreArgs {
        database: dir.path().join("nested").join("graph.db"),
        neo4j_uri: None,
        neo4j_user: "neo4j".to_string(),
        neo4j_password: None,
    }
}

#[tokio::test]
async fn test_open_creates_sqlite_file() {
    let dir = TempDir::new().unwrap();
    let args = sqlite_args(&dir);

    let store = open(&args, false).await.unwrap();
    store.insert_node("a", None).await.unwrap();

    assert!(args.database.exists());
}

#[tokio::test]
async fn test_reopen_keeps_data_unless_reset() {
    let dir = TempDir::new().unwrap();
    let args = sqlite_args(&dir);
    open(&args, false)
        .await
        .unwrap()
        .insert_node("kept", None)
        .await
        .unwrap();

    let store = open(&args, false).await.unwrap();
    assert!(store.find_node("kept").await.unwrap().is_some());

    let store = open(&args, true).await.unwrap();
    assert!(store.find_node("kept").await.unwrap().is_none());
}

#[tokio::test]
async fn test_neo4j_requires_password() {
    let dir = TempDir::new().unwrap();
    let args = StoreArgs {
        neo4j_uri: Some("bolt://localhost:7687".to_string()),
        ..sqlite_args(&dir)
    };

    let err = open(&args, false).await.err().unwrap();
    assert!(err.to_string().contains("--neo4j-password"));
}

#[tokio::test]
async fn test_open_existing_requires_file() {
    let dir = TempDir::new().unwrap();
    let args = sqlite_args(&dir);

    assert!(open_existing(&args).await.is_err());
    assert!(!args.database.exists());

    open(&args, false)
        .await
        .unwrap()
        .insert_node("kept", None)
        .await
        .unwrap();
    let store = open_existing(&args).await.unwrap();
    assert!(store.find_node("kept").await.unwrap().is_some());
}
