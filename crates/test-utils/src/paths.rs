//! Path utilities for test directories.
//!
//! Tests never touch the repository's `public/` directory; they build a
//! scratch public root instead and point the configuration at it.

use std::path::{Path, PathBuf};

use crate::fixtures::template_document;

/// Returns the workspace root directory.
///
/// Walks up from the test-utils manifest directory (`crates/test-utils`).
pub fn workspace_root() -> PathBuf {
    let manifest_dir = env!("CARGO_MANIFEST_DIR");
    PathBuf::from(manifest_dir)
        .parent() // crates/
        .and_then(|p| p.parent()) // workspace root
        .map(|p| p.to_path_buf())
        .unwrap_or_else(|| PathBuf::from(manifest_dir))
}

/// Creates a temporary directory for test output.
///
/// The directory is automatically cleaned up when the returned `TempDir` is dropped.
pub fn temp_test_dir() -> tempfile::TempDir {
    tempfile::tempdir().expect("Failed to create temporary test directory")
}

/// Path of `<public>/v6/details/<aggregate>/<zone>.json`.
pub fn snapshot_file(public_dir: &Path, aggregate: &str, zone: &str) -> PathBuf {
    public_dir
        .join("v6/details")
        .join(aggregate)
        .join(format!("{}.json", zone))
}

/// Writes a JSON document to `path`, creating parent directories.
pub fn write_json(path: &Path, value: &serde_json::Value) {
    if let Some(parent) = path.parent() {
        std::fs::create_dir_all(parent).expect("Failed to create parent directory");
    }
    let bytes = serde_json::to_vec_pretty(value).expect("Failed to encode JSON");
    std::fs::write(path, bytes).expect("Failed to write JSON file");
}

/// Reads and parses a JSON file.
pub fn read_json(path: &Path) -> serde_json::Value {
    let bytes = std::fs::read(path)
        .unwrap_or_else(|e| panic!("Failed to read {}: {}", path.display(), e));
    serde_json::from_slice(&bytes)
        .unwrap_or_else(|e| panic!("{} is not valid JSON: {}", path.display(), e))
}

/// Creates a scratch public directory holding the default `DE` template
/// at `v6/details/hourly/DE.json`.
pub fn seeded_public_dir() -> tempfile::TempDir {
    let dir = temp_test_dir();
    write_json(
        &snapshot_file(dir.path(), "hourly", "DE"),
        &template_document(),
    );
    dir
}
