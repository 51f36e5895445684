//! Tests for Neo4jConfig

use crate::store::Neo4jConfig;

#[test]
fn test_new_with_string_slices() {
    let config = Neo4jConfig::new("bolt://localhost:7687", "neo4j", "password");

    assert_eq!(config.uri, "bolt://localhost:7687");
    assert_eq!(config.user, "neo4j");
    assert_eq!(config.password, "password");
    assert_eq!(config.database, None);
}

#[test]
fn test_new_with_owned_strings() {
    let config = Neo4jConfig::new(
        String::from("bolt://graph:7687"),
        String::from("scraper"),
        String::from("secret"),
    );

    assert_eq!(config.uri, "bolt://graph:7687");
    assert_eq!(config.user, "scraper");
    assert_eq!(config.password, "secret");
}

#[test]
fn test_with_database() {
    let config =
        Neo4jConfig::new("bolt://localhost:7687", "neo4j", "password").with_database("artists");

    assert_eq!(config.database.as_deref(), Some("artists"));
}

#[test]
fn test_with_database_overrides_previous() {
    let config = Neo4jConfig::new("bolt://localhost:7687", "neo4j", "password")
        .with_database("first")
        .with_database("second");

    assert_eq!(config.database.as_deref(), Some("second"));
}

#[test]
fn test_clone_preserves_fields() {
    let config = Neo4jConfig::new("bolt://localhost:7687", "neo4j", "password")
        .with_database("neo4j");
    let cloned = config.clone();

    assert_eq!(config.uri, cloned.uri);
    assert_eq!(config.user, cloned.user);
    assert_eq!(config.password, cloned.password);
    assert_eq!(config.database, cloned.database);
}

#[test]
fn test_debug_output() {
    let config = Neo4jConfig::new("bolt://localhost:7687", "neo4j", "password");
    let debug_output = format!("{:?}", config);

    assert!(debug_output.contains("Neo4jConfig"));
    assert!(debug_output.contains("bolt://localhost:7687"));
}
