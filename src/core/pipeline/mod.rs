//! # Pipeline Module
//!
//! Walks a folder tree and runs the engine on every directory.
//!
//! ## Walkers
//! 1. **Cleaner** - cluster, keep the best copy, quarantine the rest
//! 2. **DuplicateFinder** - cluster tree-wide and only report
//! 3. **Renumberer** - give every file a sequential name
//!
//! ## Per-directory Stages (Cleaner)
//! 1. **List** - snapshot and classify the directory
//! 2. **Hash** - perceptual hash of every image
//! 3. **Cluster** - group duplicates, select representatives
//! 4. **Plan** - compute every new name up front
//! 5. **Report** - render the section
//! 6. **Execute** - apply the plan (live runs only)
//!
//! ## Parallelism
//! With `parallel` set, sibling subdirectories are processed on the rayon
//! pool. Each directory's own pass stays sequential.

mod cleaner;
mod config;
mod finder;
mod renumber;

pub use cleaner::{CleanResult, Cleaner, CleanerBuilder};
pub use config::CleanConfig;
pub use finder::{DuplicateFinder, FindResult};
pub use renumber::{ConfirmFn, RenumberResult, Renumberer};

use crate::core::comparator::{DecodeFailure, HashedImage};
use crate::core::hasher::{HasherConfig, ImageHasher};
use crate::core::scanner::Entry;
use crate::error::{HashError, ScanError};
use crate::events::{EntryEvent, Event, EventSender, RunSummary, WalkEvent};
use std::fs;
use std::path::{Path, PathBuf};
use tracing::{debug, warn};

/// Fail early when the root is missing or not a directory
pub(crate) fn validate_root(root: &Path) -> Result<(), ScanError> {
    if !root.exists() {
        return Err(ScanError::PathNotFound {
            path: root.to_path_buf(),
        });
    }
    if !root.is_dir() {
        return Err(ScanError::NotADirectory {
            path: root.to_path_buf(),
        });
    }
    Ok(())
}

pub(crate) fn default_hasher(config: &CleanConfig) -> Box<dyn ImageHasher> {
    HasherConfig::new()
        .algorithm(config.algorithm)
        .hash_size(config.hash_size)
        .build()
}

/// Hash a single image, turning failures into a reportable record
pub(crate) fn hash_entry(
    hasher: &dyn ImageHasher,
    entry: &Entry,
    events: &EventSender,
) -> Result<HashedImage, DecodeFailure> {
    match hasher.hash_file(&entry.path) {
        Ok(hash) => {
            debug!(path = %entry.path.display(), hash = %hash.to_hex(), "Hashed image");
            events.send(Event::Entry(EntryEvent::Hashed {
                path: entry.path.clone(),
            }));
            Ok(HashedImage {
                entry: entry.clone(),
                hash,
            })
        }
        Err(error) => {
            warn!("Failed to parse image {}: {}", entry.path.display(), error);
            events.send(Event::Entry(EntryEvent::DecodeFailed {
                path: entry.path.clone(),
                message: error.to_string(),
            }));
            Err(DecodeFailure {
                entry: entry.clone(),
                reason: failure_reason(&error),
            })
        }
    }
}

/// Short reason for the report's Failed line
fn failure_reason(error: &HashError) -> String {
    match error {
        HashError::DecodeError { reason, .. } => reason.clone(),
        HashError::UnsupportedFormat { format } => format!("unsupported format {format}"),
        HashError::IoError { source, .. } => source.to_string(),
    }
}

/// Resolved directories from the walk root down to the current directory.
///
/// With `follow_symlinks` a link may lead back to one of these; entering it
/// again would never end.
#[derive(Debug, Clone)]
pub(crate) struct Ancestors(Vec<PathBuf>);

impl Ancestors {
    pub(crate) fn root(dir: &Path) -> Self {
        Self(vec![resolve(dir)])
    }

    /// The chain for `dir` one level down, or `None` when `dir` resolves to a
    /// directory already on the chain
    pub(crate) fn enter(&self, dir: &Path) -> Option<Self> {
        let resolved = resolve(dir);
        if self.0.contains(&resolved) {
            return None;
        }
        let mut chain = self.0.clone();
        chain.push(resolved);
        Some(Self(chain))
    }

    /// Like [`Ancestors::enter`], but logs and reports a skipped loop
    pub(crate) fn enter_or_skip(&self, dir: &Path, events: &EventSender) -> Option<Self> {
        let entered = self.enter(dir);
        if entered.is_none() {
            warn!("Skipping {}: links back to a parent folder", dir.display());
            events.send(Event::Walk(WalkEvent::DirectorySkipped {
                path: dir.to_path_buf(),
            }));
        }
        entered
    }
}

fn resolve(dir: &Path) -> PathBuf {
    fs::canonicalize(dir).unwrap_or_else(|_| dir.to_path_buf())
}

/// Add the counters of `other` to `total`, leaving the duration alone
pub(crate) fn accumulate(total: &mut RunSummary, other: &RunSummary) {
    total.directories += other.directories;
    total.files += other.files;
    total.duplicate_clusters += other.duplicate_clusters;
    total.duplicates += other.duplicates;
    total.duplicate_bytes += other.duplicate_bytes;
    total.decode_failures += other.decode_failures;
}
