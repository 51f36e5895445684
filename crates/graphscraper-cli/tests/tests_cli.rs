//! Tests for graphscraper CLI argument parsing
//!
//! These tests validate argument parsing and command structure through
//! clap's `Parser::try_parse_from`.

#![allow(clippy::unwrap_used, clippy::panic)]

use std::path::PathBuf;

use clap::Parser;
use graphscraper_cli::{Cli, Commands};

fn parse(args: &[&str]) -> Result<Cli, clap::Error> {
    Cli::try_parse_from(args)
}

#[test]
fn test_demo_defaults() {
    let cli = parse(&["graphscraper", "demo"]).unwrap();

    assert!(!cli.verbose);
    match cli.command {
        Commands::Demo {
            nodes,
            probability,
            named,
            seed,
            vertex,
        } => {
            assert_eq!(nodes, 50);
            assert!((probability - 0.2).abs() < f64::EPSILON);
            assert!(!named);
            assert_eq!(seed, None);
            assert_eq!(vertex, 5);
        }
        other => panic!("unexpected command: {other:?}"),
    }
}

#[test]
fn test_demo_with_all_args() {
    let cli = parse(&[
        "graphscraper",
        "demo",
        "--nodes",
        "12",
        "--probability",
        "0.5",
        "--named",
        "--seed",
        "7",
        "--vertex",
        "3",
        "-v",
    ])
    .unwrap();

    assert!(cli.verbose);
    match cli.command {
        Commands::Demo {
            nodes,
            named,
            seed,
            vertex,
            ..
        } => {
            assert_eq!(nodes, 12);
            assert!(named);
            assert_eq!(seed, Some(7));
            assert_eq!(vertex, 3);
        }
        other => panic!("unexpected command: {other:?}"),
    }
}

#[test]
fn test_spotify_command() {
    let cli = parse(&[
        "graphscraper",
        "spotify",
        "Nina Simone",
        "Odetta",
        "--client-id",
        "id",
        "--client-secret",
        "secret",
        "--neighbors",
        "3",
        "--database",
        "/tmp/spotify.db",
        "--reset",
    ])
    .unwrap();

    match cli.command {
        Commands::Spotify {
            artists,
            client_id,
            client_secret,
            neighbors,
            reset,
            store,
        } => {
            assert_eq!(artists, vec!["Nina Simone", "Odetta"]);
            assert_eq!(client_id, "id");
            assert_eq!(client_secret, "secret");
            assert_eq!(neighbors, 3);
            assert!(reset);
            assert_eq!(store.database, PathBuf::from("/tmp/spotify.db"));
            assert!(store.neo4j_uri.is_none());
        }
        other => panic!("unexpected command: {other:?}"),
    }
}

#[test]
fn test_spotify_requires_an_artist() {
    let result = parse(&[
        "graphscraper",
        "spotify",
        "--client-id",
        "id",
        "--client-secret",
        "secret",
    ]);

    assert!(result.is_err());
}

#[test]
fn test_neighbors_default_database() {
    let cli = parse(&["graphscraper", "neighbors", "Nina Simone"]).unwrap();

    match cli.command {
        Commands::Neighbors { name, store } => {
            assert_eq!(name, "Nina Simone");
            assert_eq!(store.database, PathBuf::from("graphscraper.db"));
            assert_eq!(store.neo4j_user, "neo4j");
        }
        other => panic!("unexpected command: {other:?}"),
    }
}

#[test]
fn test_neighbors_on_neo4j() {
    let cli = parse(&[
        "graphscraper",
        "neighbors",
        "a",
        "--neo4j-uri",
        "bolt://localhost:7687",
        "--neo4j-user",
        "admin",
        "--neo4j-password",
        "pw",
    ])
    .unwrap();

    match cli.command {
        Commands::Neighbors { store, .. } => {
            assert_eq!(store.neo4j_uri.as_deref(), Some("bolt://localhost:7687"));
            assert_eq!(store.neo4j_user, "admin");
            assert_eq!(store.neo4j_password.as_deref(), Some("pw"));
        }
        other => panic!("unexpected command: {other:?}"),
    }
}

#[test]
fn test_database_conflicts_with_neo4j() {
    let result = parse(&[
        "graphscraper",
        "neighbors",
        "a",
        "--database",
        "x.db",
        "--neo4j-uri",
        "bolt://localhost:7687",
        "--neo4j-password",
        "pw",
    ]);

    assert!(result.is_err());
}

#[test]
fn test_unknown_command() {
    assert!(parse(&["graphscraper", "crawl"]).is_err());
}
