//! File system scanner for discovering source images.
//!
//! Recursively scans a directory tree and groups image files
//! (`.png`, `.jpg`, `.jpeg`) by the directory that contains them.

use std::collections::BTreeMap;
use std::path::{Path, PathBuf};

use walkdir::WalkDir;

use crate::config::PressConfig;

/// Recognised source image extensions (compared case-insensitively).
pub const IMAGE_EXTENSIONS: &[&str] = &["png", "jpg", "jpeg"];

/// A directory holding at least one source image.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ImageDir {
    /// Absolute (or root-joined) directory path.
    pub path: PathBuf,
    /// Path relative to the scan root; empty for the root itself.
    pub relative: PathBuf,
    /// Image files in name order.
    pub files: Vec<PathBuf>,
}

impl ImageDir {
    /// Name used for this directory's spritesheet.
    ///
    /// Falls back to `root` for the scan root when it has no usable name.
    pub fn sheet_name(&self) -> String {
        self.path
            .file_name()
            .and_then(|n| n.to_str())
            .filter(|n| !n.is_empty() && *n != "." && *n != "..")
            .unwrap_or("root")
            .to_string()
    }
}

/// Result of scanning a directory for images.
#[derive(Debug, Default)]
pub struct ScanResult {
    /// Directories with images, in path order.
    pub dirs: Vec<ImageDir>,
}

impl ScanResult {
    /// Create a new empty scan result.
    pub fn new() -> Self {
        Self::default()
    }

    /// Get the total number of discovered files.
    pub fn total(&self) -> usize {
        self.dirs.iter().map(|d| d.files.len()).sum()
    }

    /// Check if no files were discovered.
    pub fn is_empty(&self) -> bool {
        self.total() == 0
    }
}

/// Scan a directory tree for source images.
pub fn scan_directory(root: &Path, config: &PressConfig) -> ScanResult {
    let mut result = ScanResult::new();

    if !root.exists() {
        return result;
    }

    let mut groups: BTreeMap<PathBuf, Vec<PathBuf>> = BTreeMap::new();

    for entry in WalkDir::new(root)
        .follow_links(true)
        .sort_by_file_name()
        .into_iter()
        .filter_map(|e| e.ok())
    {
        let path = entry.path();

        if !entry.file_type().is_file() {
            continue;
        }

        // Patterns apply below the root only.
        let relative = path.strip_prefix(root).unwrap_or(path);
        if config.is_excluded(relative) {
            continue;
        }

        if is_image(path) {
            let parent = path.parent().unwrap_or(root).to_path_buf();
            groups.entry(parent).or_default().push(path.to_path_buf());
        }
    }

    for (path, files) in groups {
        let relative = path.strip_prefix(root).unwrap_or(Path::new("")).to_path_buf();
        result.dirs.push(ImageDir {
            path,
            relative,
            files,
        });
    }

    result
}

/// Check whether a path has a recognised image extension.
pub fn is_image(path: &Path) -> bool {
    path.extension()
        .and_then(|e| e.to_str())
        .map(|ext| {
            IMAGE_EXTENSIONS
                .iter()
                .any(|known| ext.eq_ignore_ascii_case(known))
        })
        .unwrap_or(false)
}
