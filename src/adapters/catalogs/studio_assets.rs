//! Embedded scenario catalog and prompt layouts.
//!
//! These assets are resolved at runtime from the binary. Custom templates
//! live on disk and are merged by the template store.

use include_dir::{Dir, include_dir};

static CATALOG_DIR: Dir = include_dir!("$CARGO_MANIFEST_DIR/src/assets/catalog");
static LAYOUT_DIR: Dir = include_dir!("$CARGO_MANIFEST_DIR/src/assets/layouts");

/// Read a catalog file by name (e.g. `"scenarios.yml"`, `"couple.yml"`).
pub fn read_catalog_asset(path: &str) -> Option<String> {
    CATALOG_DIR.get_file(path).and_then(|file| file.contents_utf8()).map(|s| s.to_string())
}

/// Read a layout template by name (e.g. `"family.j2"`).
pub fn read_layout_asset(name: &str) -> Option<String> {
    LAYOUT_DIR.get_file(name).and_then(|file| file.contents_utf8()).map(|s| s.to_string())
}
