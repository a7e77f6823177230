//! Report-only duplicate search across a whole tree.

use super::{default_hasher, hash_entry, validate_root, Ancestors, CleanConfig};
use crate::core::comparator::{cluster_entries, Cluster, DecodeFailure};
use crate::core::hasher::ImageHasher;
use crate::core::reporter::{finder_report, Report, ReportWriter};
use crate::core::scanner::{read_directory, Entry, EntryClassifier, EntryKind};
use crate::error::FolderCleanerError;
use crate::events::{null_sender, Event, EventSender, RunEvent, RunSummary, WalkEvent};
use rayon::prelude::*;
use std::path::{Path, PathBuf};
use std::time::Instant;
use tracing::{info, warn};

/// Result of a find run
#[derive(Debug)]
pub struct FindResult {
    pub report: Report,
    /// Every cluster, singletons included
    pub clusters: Vec<Cluster>,
    pub summary: RunSummary,
    pub errors: Vec<String>,
    pub report_path: Option<PathBuf>,
}

/// Clusters images and files of a whole tree at once and reports them.
///
/// Nothing is renamed or moved. Unlike the cleaner, duplicates in different
/// folders are found.
pub struct DuplicateFinder {
    root: PathBuf,
    config: CleanConfig,
    classifier: EntryClassifier,
    hasher: Box<dyn ImageHasher>,
}

impl DuplicateFinder {
    pub fn new(root: impl Into<PathBuf>, config: CleanConfig) -> Self {
        Self {
            root: root.into(),
            classifier: EntryClassifier::new(&config.scan),
            hasher: default_hasher(&config),
            config,
        }
    }

    pub fn with_hasher(mut self, hasher: Box<dyn ImageHasher>) -> Self {
        self.hasher = hasher;
        self
    }

    pub fn run(&self) -> Result<FindResult, FolderCleanerError> {
        self.run_with_events(&null_sender())
    }

    pub fn run_with_events(&self, events: &EventSender) -> Result<FindResult, FolderCleanerError> {
        let start = Instant::now();
        self.config.validate()?;
        validate_root(&self.root)?;

        info!(
            "Collecting information in {} ({})",
            self.root.display(),
            self.hasher.kind()
        );
        events.send(Event::Run(RunEvent::Started {
            root: self.root.clone(),
            make_changes: false,
        }));

        let mut collected = Vec::new();
        let mut errors = Vec::new();
        let mut directories = 0;
        self.collect(
            &self.root,
            &Ancestors::root(&self.root),
            events,
            &mut collected,
            &mut errors,
            &mut directories,
        );

        // Identity must be unique across the whole tree.
        for (index, entry) in collected.iter_mut().enumerate() {
            entry.index = index;
        }

        let (image_entries, files): (Vec<Entry>, Vec<Entry>) = collected
            .into_iter()
            .partition(|e| e.kind == EntryKind::Image);

        let hashed: Vec<_> = image_entries
            .par_iter()
            .map(|entry| hash_entry(self.hasher.as_ref(), entry, events))
            .collect();
        let mut images = Vec::with_capacity(hashed.len());
        let mut failures: Vec<DecodeFailure> = Vec::new();
        for outcome in hashed {
            match outcome {
                Ok(image) => images.push(image),
                Err(failure) => failures.push(failure),
            }
        }
        for failure in &failures {
            errors.push(format!(
                "Failed to parse image {}: {}",
                failure.entry.path.display(),
                failure.reason
            ));
        }

        let considered = images.len() + files.len() + failures.len();
        let clusters = cluster_entries(images, files, self.config.cutoff);
        let report = finder_report(&self.root, &clusters);

        let mut report_path = None;
        if self.config.make_changes && self.config.write_report {
            match ReportWriter::new(&self.config.scan.report_file_name).write(&self.root, &report) {
                Ok(path) => report_path = path,
                Err(error) => {
                    warn!("{}", error);
                    errors.push(error.to_string());
                }
            }
        }

        let summary = RunSummary {
            directories,
            files: considered,
            duplicate_clusters: clusters.iter().filter(|c| c.has_duplicates()).count(),
            duplicates: clusters.iter().map(|c| c.duplicate_count()).sum(),
            duplicate_bytes: clusters.iter().map(|c| c.duplicate_size_bytes()).sum(),
            decode_failures: failures.len(),
            duration_ms: start.elapsed().as_millis() as u64,
        };
        events.send(Event::Run(RunEvent::Completed {
            summary: summary.clone(),
        }));

        Ok(FindResult {
            report,
            clusters,
            summary,
            errors,
            report_path,
        })
    }

    /// Gather files in listing order, descending into folders where they appear
    fn collect(
        &self,
        dir: &Path,
        ancestors: &Ancestors,
        events: &EventSender,
        collected: &mut Vec<Entry>,
        errors: &mut Vec<String>,
        directories: &mut usize,
    ) {
        events.send(Event::Walk(WalkEvent::DirectoryStarted {
            path: dir.to_path_buf(),
        }));
        let listing = match read_directory(dir, &self.classifier) {
            Ok(listing) => listing,
            Err(error) => {
                warn!("Skipping {}: {}", dir.display(), error);
                events.send(Event::Walk(WalkEvent::DirectoryFailed {
                    path: dir.to_path_buf(),
                    message: error.to_string(),
                }));
                errors.push(error.to_string());
                return;
            }
        };
        *directories += 1;
        errors.extend(listing.errors.iter().map(|e| e.to_string()));

        for entry in listing.entries {
            match entry.kind {
                EntryKind::Directory if entry.name == self.config.quarantine_dir_name => {
                    events.send(Event::Walk(WalkEvent::DirectorySkipped { path: entry.path }));
                }
                EntryKind::Directory => {
                    if let Some(chain) = ancestors.enter_or_skip(&entry.path, events) {
                        self.collect(&entry.path, &chain, events, collected, errors, directories);
                    }
                }
                _ if entry.is_file() => collected.push(entry),
                _ => {}
            }
        }
    }
}
