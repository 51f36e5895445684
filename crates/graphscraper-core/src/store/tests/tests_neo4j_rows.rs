//! Tests for decoding Neo4j node properties

#![allow(clippy::unwrap_used)]

use chrono::NaiveDate;

use crate::store::neo4j::stored_node;
use crate::store::StoreError;

#[test]
fn test_empty_external_id_is_none() {
    let node = stored_node("a".to_string(), Some(String::new()), Some(true), "2024-03-01").unwrap();

    assert_eq!(node.external_id, None);
    assert!(node.are_neighbors_cached);
    assert_eq!(node.creation_date, NaiveDate::from_ymd_opt(2024, 3, 1).unwrap());
}

#[test]
fn test_null_properties_use_defaults() {
    let node = stored_node("a".to_string(), None, None, "2024-03-01").unwrap();

    assert_eq!(node.external_id, None);
    assert!(!node.are_neighbors_cached);
}

#[test]
fn test_external_id_is_kept() {
    let node = stored_node("a".to_string(), Some("ext".to_string()), Some(false), "2024-03-01").unwrap();

    assert_eq!(node.external_id.as_deref(), Some("ext"));
}

#[test]
fn test_bad_creation_date() {
    let result = stored_node("a".to_string(), None, None, "yesterday");

    assert!(matches!(result, Err(StoreError::Decode(_))));
}
