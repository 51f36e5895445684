//! Tests for the demo command

#![allow(clippy::unwrap_used)]

use crate::commands::demo::{build_report, run, DemoOptions};

fn options(nodes: usize, probability: f64, named: bool) -> DemoOptions {
    DemoOptions {
        nodes,
        probability,
        named,
        seed: Some(11),
        vertex: 5,
    }
}

#[tokio::test]
async fn test_named_graph_lookups() {
    let report = build_report(&options(20, 0.3, true)).await.unwrap();

    assert_eq!(
        report.lookups,
        vec![
            ("Joe".to_string(), None),
            ("1".to_string(), Some("Node-1".to_string())),
            ("Node-22".to_string(), None),
        ]
    );
    assert_eq!(report.vertex_name.as_deref(), Some("Node-5"));
}

#[tokio::test]
async fn test_unnamed_graph_uses_indices() {
    let report = build_report(&options(30, 0.3, false)).await.unwrap();

    assert_eq!(report.lookups[1].1.as_deref(), Some("1"));
    assert_eq!(report.lookups[2].1, None);
    assert_eq!(report.vertex_name.as_deref(), Some("5"));
}

#[tokio::test]
async fn test_cached_neighbors_match_random_graph() {
    for named in [true, false] {
        let report = build_report(&options(40, 0.25, named)).await.unwrap();
        assert_eq!(report.raw_neighbors, report.cached_neighbors);
    }
}

#[tokio::test]
async fn test_complete_graph() {
    let report = build_report(&options(8, 1.0, true)).await.unwrap();

    assert_eq!(report.cached_neighbors.len(), 7);
    assert!(!report.cached_neighbors.contains(&"Node-5".to_string()));
}

#[tokio::test]
async fn test_missing_vertex() {
    let report = build_report(&options(3, 0.5, false)).await.unwrap();

    assert!(report.vertex_name.is_none());
    assert!(report.raw_neighbors.is_empty());
    assert!(report.cached_neighbors.is_empty());
    assert!(run(&options(3, 0.5, false)).await.is_ok());
}

#[tokio::test]
async fn test_run_prints_report() {
    assert!(run(&options(10, 0.5, true)).await.is_ok());
}
