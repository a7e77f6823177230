//! Single-directory listing using walkdir.

use super::{classifier::extension_of, Entry, EntryClassifier, EntryKind};
use crate::core::ordering::sort_natural;
use crate::error::ScanError;
use std::fs;
use std::io;
use std::path::{Path, PathBuf};
use tracing::warn;
use walkdir::WalkDir;

/// Snapshot of one directory, in natural order
#[derive(Debug)]
pub struct DirectoryListing {
    pub directory: PathBuf,
    /// Name used for ordering and for new file names
    pub folder_name: String,
    pub entries: Vec<Entry>,
    /// Entries that could not be stat'ed (non-fatal)
    pub errors: Vec<ScanError>,
}

impl DirectoryListing {
    pub fn subdirectories(&self) -> impl Iterator<Item = &Entry> {
        self.entries
            .iter()
            .filter(|e| e.kind == EntryKind::Directory)
    }

    pub fn of_kind(&self, kind: EntryKind) -> impl Iterator<Item = &Entry> {
        self.entries.iter().filter(move |e| e.kind == kind)
    }
}

/// Name of a folder as used for ordering and naming.
///
/// Paths such as `.` have no final component, so those are resolved first.
pub fn folder_name(dir: &Path) -> String {
    if let Some(name) = dir.file_name() {
        return name.to_string_lossy().into_owned();
    }

    fs::canonicalize(dir)
        .ok()
        .and_then(|p| p.file_name().map(|n| n.to_string_lossy().into_owned()))
        .unwrap_or_default()
}

/// List the direct children of `dir`, classify them and sort them.
///
/// Failing to open `dir` itself is an error; failing to stat a child only
/// drops that child.
pub fn read_directory(
    dir: &Path,
    classifier: &EntryClassifier,
) -> Result<DirectoryListing, ScanError> {
    let folder = folder_name(dir);
    let mut entries = Vec::new();
    let mut errors = Vec::new();

    for entry_result in WalkDir::new(dir).min_depth(1).max_depth(1).follow_links(false) {
        match entry_result {
            Ok(dent) => {
                let path = dent.path().to_path_buf();
                let is_symlink = dent.path_is_symlink();

                // Links are judged by their target
                let metadata = if is_symlink {
                    fs::metadata(&path)
                } else {
                    dent.metadata().map_err(io::Error::from)
                };

                let metadata = match metadata {
                    Ok(metadata) => metadata,
                    Err(source) => {
                        warn!(path = %path.display(), error = %source, "Skipping entry");
                        errors.push(ScanError::Stat { path, source });
                        continue;
                    }
                };

                let is_dir = metadata.is_dir();
                let kind = classifier.classify(&path, is_dir, is_symlink);

                entries.push(Entry {
                    index: 0,
                    name: dent.file_name().to_string_lossy().into_owned(),
                    size: if is_dir { 0 } else { metadata.len() },
                    extension: if is_dir { String::new() } else { extension_of(&path) },
                    kind,
                    path,
                });
            }
            Err(e) if e.depth() == 0 || e.path() == Some(dir) => {
                let path = e.path().map(Path::to_path_buf).unwrap_or_else(|| dir.to_path_buf());
                let permission_denied = e.io_error().map(|io| io.kind())
                    == Some(io::ErrorKind::PermissionDenied);

                return Err(if permission_denied {
                    ScanError::PermissionDenied { path }
                } else {
                    ScanError::ReadDirectory {
                        path,
                        source: io::Error::other(e.to_string()),
                    }
                });
            }
            Err(e) => {
                let path = e.path().map(Path::to_path_buf).unwrap_or_default();
                warn!(path = %path.display(), error = %e, "Skipping entry");
                errors.push(ScanError::Stat {
                    path,
                    source: io::Error::other(e.to_string()),
                });
            }
        }
    }

    sort_natural(&mut entries, &folder, |e: &Entry| e.name.as_str());
    for (index, entry) in entries.iter_mut().enumerate() {
        entry.index = index;
    }

    Ok(DirectoryListing {
        directory: dir.to_path_buf(),
        folder_name: folder,
        entries,
        errors,
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::fs::File;
    use std::io::Write;
    use tempfile::TempDir;

    fn create_file(dir: &Path, name: &str, bytes: usize) -> PathBuf {
        let path = dir.join(name);
        let mut file = File::create(&path).unwrap();
        file.write_all(&vec![b'x'; bytes]).unwrap();
        path
    }

    #[test]
    fn empty_directory_lists_nothing() {
        let temp_dir = TempDir::new().unwrap();
        let listing = read_directory(temp_dir.path(), &EntryClassifier::default()).unwrap();

        assert!(listing.entries.is_empty());
        assert!(listing.errors.is_empty());
    }

    #[test]
    fn entries_are_sorted_and_indexed() {
        let temp_dir = TempDir::new().unwrap();
        create_file(temp_dir.path(), "img10.jpg", 1);
        create_file(temp_dir.path(), "img2.jpg", 1);
        create_file(temp_dir.path(), "img1.jpg", 1);

        let listing = read_directory(temp_dir.path(), &EntryClassifier::default()).unwrap();
        let names: Vec<_> = listing.entries.iter().map(|e| e.name.as_str()).collect();

        assert_eq!(names, vec!["img1.jpg", "img2.jpg", "img10.jpg"]);
        let indices: Vec<_> = listing.entries.iter().map(|e| e.index).collect();
        assert_eq!(indices, vec![0, 1, 2]);
    }

    #[test]
    fn records_size_extension_and_kind() {
        let temp_dir = TempDir::new().unwrap();
        create_file(temp_dir.path(), "Photo.JPG", 42);
        create_file(temp_dir.path(), "notes.txt", 7);
        create_file(temp_dir.path(), "Photo.xmp", 3);
        fs::create_dir(temp_dir.path().join("sub")).unwrap();

        let listing = read_directory(temp_dir.path(), &EntryClassifier::default()).unwrap();

        let photo = listing.entries.iter().find(|e| e.name == "Photo.JPG").unwrap();
        assert_eq!(photo.size, 42);
        assert_eq!(photo.extension, "jpg");
        assert_eq!(photo.kind, EntryKind::Image);

        let notes = listing.entries.iter().find(|e| e.name == "notes.txt").unwrap();
        assert_eq!(notes.kind, EntryKind::Generic);

        let sidecar = listing.entries.iter().find(|e| e.name == "Photo.xmp").unwrap();
        assert_eq!(sidecar.kind, EntryKind::Ignored);

        assert_eq!(listing.subdirectories().count(), 1);
    }

    #[test]
    fn listing_does_not_descend() {
        let temp_dir = TempDir::new().unwrap();
        let sub = temp_dir.path().join("sub");
        fs::create_dir(&sub).unwrap();
        create_file(&sub, "nested.jpg", 1);

        let listing = read_directory(temp_dir.path(), &EntryClassifier::default()).unwrap();

        assert_eq!(listing.entries.len(), 1);
        assert_eq!(listing.entries[0].kind, EntryKind::Directory);
    }

    #[test]
    fn missing_directory_is_an_error() {
        let result = read_directory(
            Path::new("/nonexistent/path/12345"),
            &EntryClassifier::default(),
        );
        assert!(result.is_err());
    }

    #[cfg(unix)]
    #[test]
    fn dangling_link_is_skipped_and_recorded() {
        let temp_dir = TempDir::new().unwrap();
        create_file(temp_dir.path(), "a.txt", 3);
        std::os::unix::fs::symlink(
            temp_dir.path().join("gone.txt"),
            temp_dir.path().join("dangling.txt"),
        )
        .unwrap();

        let listing = read_directory(temp_dir.path(), &EntryClassifier::default()).unwrap();

        let names: Vec<_> = listing.entries.iter().map(|e| e.name.as_str()).collect();
        assert_eq!(names, vec!["a.txt"]);
        assert_eq!(listing.errors.len(), 1);
        match &listing.errors[0] {
            ScanError::Stat { path, .. } => assert!(path.ends_with("dangling.txt")),
            other => panic!("unexpected error: {other}"),
        }
    }

    #[test]
    fn folder_name_uses_last_component() {
        assert_eq!(folder_name(Path::new("/photos/Trip")), "Trip");
    }
}
