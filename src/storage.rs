// ABOUTME: Output tree layout and file writes for exported markdown
// ABOUTME: Directories are created on demand; files are blindly overwritten

use crate::util::sanitize_filename;
use crate::Result;
use std::fs;
use std::path::{Path, PathBuf};

pub const INDEX_FILE: &str = "index.md";

pub fn ensure_dir(dir: &Path) -> Result<()> {
    fs::create_dir_all(dir)?;
    Ok(())
}

/// Directory for a doc, or for a page that has children.
pub fn node_dir(parent: &Path, title: &str) -> PathBuf {
    parent.join(sanitize_filename(title))
}

/// File for a page without children, placed next to its siblings.
pub fn leaf_file(parent: &Path, title: &str) -> PathBuf {
    parent.join(format!("{}.md", sanitize_filename(title)))
}

pub fn write_file(path: &Path, content: &str) -> Result<()> {
    fs::write(path, content)?;
    Ok(())
}
