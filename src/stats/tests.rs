// src/stats/tests.rs

use super::handlers::is_recordable_path;

#[test]
fn test_site_relative_paths_accepted() {
    assert!(is_recordable_path("/"));
    assert!(is_recordable_path("/projects"));
    assert!(is_recordable_path("/blog/2026/hello-world"));
}

#[test]
fn test_non_relative_paths_rejected() {
    assert!(!is_recordable_path(""));
    assert!(!is_recordable_path("projects"));
    assert!(!is_recordable_path("https://evil.example/phish"));
}

#[test]
fn test_oversized_path_rejected() {
    let long = format!("/{}", "a".repeat(600));
    assert!(!is_recordable_path(&long));
}
