//! # Scanner Module
//!
//! Lists one directory at a time and labels every child.
//!
//! ## Entry Kinds
//! - **Directory** - recursed into by the walkers
//! - **Image** - clustered by perceptual hash
//! - **Generic** - clustered by byte size
//! - **Ignored** - sidecar files, hidden files, the report file
//!
//! ## Example
//! ```rust,ignore
//! use duplicate_folder_cleaner::core::scanner::{read_directory, EntryClassifier, ScanConfig};
//!
//! let classifier = EntryClassifier::new(&ScanConfig::default());
//! let listing = read_directory(Path::new("/photos/trip"), &classifier)?;
//! ```

mod classifier;
mod walker;

pub use classifier::{extension_of, EntryClassifier};
pub use walker::{folder_name, read_directory, DirectoryListing};

use serde::{Deserialize, Serialize};
use std::path::PathBuf;

/// What an entry is, as far as duplicate resolution is concerned
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum EntryKind {
    Directory,
    Image,
    Generic,
    Ignored,
}

/// A child of a listed directory
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Entry {
    /// Position in the natural-order listing of the parent directory.
    ///
    /// This is the entry's identity within one pass.
    pub index: usize,
    /// Full path on disk at listing time
    pub path: PathBuf,
    /// File name as displayed in reports
    pub name: String,
    /// Size in bytes (0 for directories)
    pub size: u64,
    /// Lowercased extension without the dot, empty when absent
    pub extension: String,
    pub kind: EntryKind,
}

impl Entry {
    /// Extension with a leading dot, or an empty string
    pub fn dotted_extension(&self) -> String {
        if self.extension.is_empty() {
            String::new()
        } else {
            format!(".{}", self.extension)
        }
    }

    pub fn is_file(&self) -> bool {
        matches!(self.kind, EntryKind::Image | EntryKind::Generic)
    }
}

/// Configuration for listing and classifying entries
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct ScanConfig {
    /// Extensions (no dot, any case) hashed as images
    pub image_extensions: Vec<String>,
    /// Extensions (no dot, any case) never touched
    pub ignored_extensions: Vec<String>,
    /// Name of the report file, always ignored
    pub report_file_name: String,
    /// Whether to consider hidden files (starting with .)
    pub include_hidden: bool,
    /// Whether symbolic links to directories are walked
    pub follow_symlinks: bool,
}

impl Default for ScanConfig {
    fn default() -> Self {
        Self {
            image_extensions: ["jpg", "jpeg", "png", "gif", "tif", "tiff"]
                .iter()
                .map(|e| e.to_string())
                .collect(),
            ignored_extensions: vec!["xmp".to_string(), "dll".to_string()],
            report_file_name: "__report.txt".to_string(),
            include_hidden: false,
            follow_symlinks: false,
        }
    }
}
