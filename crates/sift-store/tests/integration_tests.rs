//! Integration tests for sift-store
//!
//! These tests exercise the directory-backed source and store on a real
//! temporary filesystem.

use sift_domain::{Category, CategoryStore, DocumentSource};
use sift_store::{DirectorySource, DirectoryStore};
use std::fs;

#[test]
fn test_source_lists_only_text_files_sorted() {
    let dir = tempfile::tempdir().unwrap();
    fs::write(dir.path().join("b_report.txt"), "second").unwrap();
    fs::write(dir.path().join("a_report.txt"), "first").unwrap();
    fs::write(dir.path().join("notes.pdf"), "binary").unwrap();
    fs::create_dir(dir.path().join("nested.txt")).unwrap();

    let source = DirectorySource::new(dir.path());
    let ids = source.document_ids().unwrap();

    assert_eq!(ids, vec!["a_report", "b_report"]);
    assert_eq!(source.read("a_report").unwrap(), "first");
}

#[test]
fn test_read_missing_document_fails() {
    let dir = tempfile::tempdir().unwrap();
    let source = DirectorySource::new(dir.path());
    assert!(source.read("missing").is_err());
}

#[test]
fn test_store_writes_chunks_into_category_dirs() {
    let dir = tempfile::tempdir().unwrap();
    let mut store = DirectoryStore::new(dir.path());

    store.write(Category::Financials, "deckers", 3, "net income rose").unwrap();
    store.write(Category::Narrative, "deckers", 1, "Dear Stockholders").unwrap();

    let written = fs::read_to_string(dir.path().join("financials/deckers_chunk_0003.txt")).unwrap();
    assert_eq!(written, "net income rose");
    assert!(dir.path().join("narrative/deckers_chunk_0001.txt").is_file());
    assert!(!dir.path().join("operations").exists());
}

#[test]
fn test_store_writes_aggregate_per_document() {
    let dir = tempfile::tempdir().unwrap();
    let mut store = DirectoryStore::new(dir.path());

    store
        .write_aggregate(Category::Financials, "deckers", "one\n\ntwo")
        .unwrap();
    store
        .write_aggregate(Category::Financials, "deckers", "replaced")
        .unwrap();

    let written = fs::read_to_string(dir.path().join("financials/deckers.txt")).unwrap();
    assert_eq!(written, "replaced");
}

#[test]
fn test_chunk_export_goes_under_root() {
    let dir = tempfile::tempdir().unwrap();
    let store = DirectoryStore::new(dir.path().join("chunks"));

    let path = store.write_chunk_file("report", 7, "text").unwrap();

    assert_eq!(path, dir.path().join("chunks/report_chunk_0007.txt"));
    assert_eq!(fs::read_to_string(path).unwrap(), "text");
}
