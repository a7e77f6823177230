//! Entry classification.

use super::{EntryKind, ScanConfig};
use std::collections::HashSet;
use std::path::Path;

/// Lowercased extension without the dot, empty when the name has none
pub fn extension_of(path: &Path) -> String {
    path.extension()
        .map(|e| e.to_string_lossy().to_lowercase())
        .unwrap_or_default()
}

/// Labels directory children as directories, images, generic files or
/// ignored entries
#[derive(Debug, Clone)]
pub struct EntryClassifier {
    images: HashSet<String>,
    ignored: HashSet<String>,
    report_file_name: String,
    include_hidden: bool,
    follow_symlinks: bool,
}

impl EntryClassifier {
    pub fn new(config: &ScanConfig) -> Self {
        let normalize = |list: &[String]| {
            list.iter()
                .map(|e| e.trim_start_matches('.').to_lowercase())
                .collect::<HashSet<_>>()
        };

        Self {
            images: normalize(&config.image_extensions),
            ignored: normalize(&config.ignored_extensions),
            report_file_name: config.report_file_name.clone(),
            include_hidden: config.include_hidden,
            follow_symlinks: config.follow_symlinks,
        }
    }

    /// Classify an entry.
    ///
    /// `is_dir` reports whether the path (after following a link) is a
    /// directory; `is_symlink` whether the entry itself is a link.
    pub fn classify(&self, path: &Path, is_dir: bool, is_symlink: bool) -> EntryKind {
        let name = path
            .file_name()
            .map(|n| n.to_string_lossy())
            .unwrap_or_default();

        if !self.include_hidden && name.starts_with('.') {
            return EntryKind::Ignored;
        }

        if is_dir {
            if is_symlink && !self.follow_symlinks {
                return EntryKind::Ignored;
            }
            return EntryKind::Directory;
        }

        if name == self.report_file_name.as_str() {
            return EntryKind::Ignored;
        }

        let extension = extension_of(path);
        if self.ignored.contains(&extension) {
            EntryKind::Ignored
        } else if self.images.contains(&extension) {
            EntryKind::Image
        } else {
            EntryKind::Generic
        }
    }
}

impl Default for EntryClassifier {
    fn default() -> Self {
        Self::new(&ScanConfig::default())
    }
}
