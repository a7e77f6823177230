//! Tree walker that resolves duplicates directory by directory.

use super::{accumulate, default_hasher, hash_entry, validate_root, Ancestors, CleanConfig};
use crate::core::comparator::cluster_entries;
use crate::core::hasher::ImageHasher;
use crate::core::organize::{DiskProbe, NamingPlanner, PlanExecutor};
use crate::core::reporter::{clean_section, Report, ReportWriter};
use crate::core::scanner::{read_directory, EntryClassifier, EntryKind};
use crate::error::FolderCleanerError;
use crate::events::{
    null_sender, EntryEvent, Event, EventSender, RunEvent, RunSummary, WalkEvent,
};
use rayon::prelude::*;
use std::path::{Path, PathBuf};
use std::time::Instant;
use tracing::{debug, info, warn};

/// Result of a clean run
#[derive(Debug)]
pub struct CleanResult {
    /// Report text, identical for dry and live runs
    pub report: Report,
    pub summary: RunSummary,
    /// Non-fatal problems, in the order they happened
    pub errors: Vec<String>,
    /// Where the report file was written, if it was
    pub report_path: Option<PathBuf>,
}

/// Builder for a [`Cleaner`]
pub struct CleanerBuilder {
    root: PathBuf,
    config: CleanConfig,
    hasher: Option<Box<dyn ImageHasher>>,
}

impl CleanerBuilder {
    pub fn new(root: impl Into<PathBuf>) -> Self {
        Self {
            root: root.into(),
            config: CleanConfig::default(),
            hasher: None,
        }
    }

    /// Replace the whole configuration
    pub fn config(mut self, config: CleanConfig) -> Self {
        self.config = config;
        self
    }

    /// Plan and report without touching the filesystem
    pub fn dry_run(mut self, dry_run: bool) -> Self {
        self.config.make_changes = !dry_run;
        self
    }

    pub fn cutoff(mut self, cutoff: u32) -> Self {
        self.config.cutoff = cutoff;
        self
    }

    pub fn parallel(mut self, parallel: bool) -> Self {
        self.config.parallel = parallel;
        self
    }

    /// Use a custom hasher instead of the configured algorithm
    pub fn hasher(mut self, hasher: Box<dyn ImageHasher>) -> Self {
        self.hasher = Some(hasher);
        self
    }

    pub fn build(self) -> Cleaner {
        let hasher = self.hasher.unwrap_or_else(|| default_hasher(&self.config));
        Cleaner {
            classifier: EntryClassifier::new(&self.config.scan),
            root: self.root,
            config: self.config,
            hasher,
        }
    }
}

/// Outcome of one directory and everything below it
#[derive(Default)]
struct DirectoryOutcome {
    report: Report,
    summary: RunSummary,
    errors: Vec<String>,
}

impl DirectoryOutcome {
    fn absorb(&mut self, other: DirectoryOutcome) {
        self.report.extend(other.report);
        accumulate(&mut self.summary, &other.summary);
        self.errors.extend(other.errors);
    }
}

/// Cleans a folder tree, one directory at a time
pub struct Cleaner {
    root: PathBuf,
    config: CleanConfig,
    classifier: EntryClassifier,
    hasher: Box<dyn ImageHasher>,
}

impl Cleaner {
    pub fn builder(root: impl Into<PathBuf>) -> CleanerBuilder {
        CleanerBuilder::new(root)
    }

    pub fn config(&self) -> &CleanConfig {
        &self.config
    }

    /// Run without events
    pub fn run(&self) -> Result<CleanResult, FolderCleanerError> {
        self.run_with_events(&null_sender())
    }

    /// Run with event reporting.
    ///
    /// Only an invalid root or configuration fails the run; everything else
    /// is recorded in [`CleanResult::errors`].
    pub fn run_with_events(&self, events: &EventSender) -> Result<CleanResult, FolderCleanerError> {
        let start = Instant::now();
        self.config.validate()?;
        validate_root(&self.root)?;

        info!(
            "Cleaning {} ({}, {})",
            self.root.display(),
            if self.config.make_changes { "live" } else { "dry run" },
            self.hasher.kind()
        );
        events.send(Event::Run(RunEvent::Started {
            root: self.root.clone(),
            make_changes: self.config.make_changes,
        }));

        let outcome = self.clean_directory(&self.root, &Ancestors::root(&self.root), events);
        let DirectoryOutcome {
            report,
            mut summary,
            mut errors,
        } = outcome;

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

        summary.duration_ms = start.elapsed().as_millis() as u64;
        events.send(Event::Run(RunEvent::Completed {
            summary: summary.clone(),
        }));

        Ok(CleanResult {
            report,
            summary,
            errors,
            report_path,
        })
    }

    /// Post-order: subdirectories first, then this directory's own files
    fn clean_directory(
        &self,
        dir: &Path,
        ancestors: &Ancestors,
        events: &EventSender,
    ) -> DirectoryOutcome {
        let mut outcome = DirectoryOutcome::default();
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
                outcome.errors.push(error.to_string());
                return outcome;
            }
        };

        for error in &listing.errors {
            events.send(Event::Entry(EntryEvent::Skipped {
                path: dir.to_path_buf(),
                message: error.to_string(),
            }));
            outcome.errors.push(error.to_string());
        }

        let subdirectories: Vec<(&Path, Ancestors)> = listing
            .subdirectories()
            .filter_map(|sub| {
                if sub.name == self.config.quarantine_dir_name {
                    debug!("Skipping quarantine folder {}", sub.path.display());
                    events.send(Event::Walk(WalkEvent::DirectorySkipped {
                        path: sub.path.clone(),
                    }));
                    return None;
                }
                let chain = ancestors.enter_or_skip(&sub.path, events)?;
                Some((sub.path.as_path(), chain))
            })
            .collect();

        // Collected in listing order, so the merged report matches a sequential walk.
        let children: Vec<DirectoryOutcome> = if self.config.parallel {
            subdirectories
                .par_iter()
                .map(|(sub, chain)| self.clean_directory(sub, chain, events))
                .collect()
        } else {
            subdirectories
                .iter()
                .map(|(sub, chain)| self.clean_directory(sub, chain, events))
                .collect()
        };
        for child in children {
            outcome.absorb(child);
        }

        let mut images = Vec::new();
        let mut failures = Vec::new();
        for entry in listing.of_kind(EntryKind::Image) {
            match hash_entry(self.hasher.as_ref(), entry, events) {
                Ok(image) => images.push(image),
                Err(failure) => failures.push(failure),
            }
        }
        let files: Vec<_> = listing.of_kind(EntryKind::Generic).cloned().collect();
        let considered = images.len() + files.len() + failures.len();

        let clusters = cluster_entries(images, files, self.config.cutoff);
        let plan = NamingPlanner::new(&DiskProbe, &self.config.quarantine_dir_name).plan(
            dir,
            &listing.folder_name,
            &clusters,
        );
        outcome.report.push(clean_section(&plan, &failures));

        let duplicate_clusters = clusters.iter().filter(|c| c.has_duplicates()).count();
        let duplicates: usize = clusters.iter().map(|c| c.duplicate_count()).sum();
        let summary = RunSummary {
            directories: 1,
            files: considered,
            duplicate_clusters,
            duplicates,
            duplicate_bytes: clusters.iter().map(|c| c.duplicate_size_bytes()).sum(),
            decode_failures: failures.len(),
            duration_ms: 0,
        };
        accumulate(&mut outcome.summary, &summary);

        if self.config.make_changes {
            let result = PlanExecutor::new(events).execute(&plan);
            outcome.errors.extend(result.errors);
        }

        if duplicates > 0 {
            info!(
                "Found {} duplicates in {} ({} clusters)",
                duplicates,
                dir.display(),
                duplicate_clusters
            );
        } else {
            debug!("No duplicates in {}", dir.display());
        }
        events.send(Event::Walk(WalkEvent::DirectoryCompleted {
            path: dir.to_path_buf(),
            clusters: clusters.len(),
            duplicates,
        }));

        outcome
    }
}
