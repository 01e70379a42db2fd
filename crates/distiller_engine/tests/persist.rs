use std::fs;

use distiller_engine::write_atomic;
use tempfile::TempDir;

#[test]
fn atomic_write_creates_and_replaces() {
    let temp = TempDir::new().unwrap();
    let target = temp.path().join("doc.md");

    write_atomic(&target, "hello").unwrap();
    assert_eq!(fs::read_to_string(&target).unwrap(), "hello");

    write_atomic(&target, "world").unwrap();
    assert_eq!(fs::read_to_string(&target).unwrap(), "world");
}

#[test]
fn no_partial_file_when_directory_is_missing() {
    let temp = TempDir::new().unwrap();
    let target = temp.path().join("missing").join("doc.md");
    assert!(write_atomic(&target, "data").is_err());
    assert!(!target.exists());
}
