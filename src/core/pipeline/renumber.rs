//! Sequential renaming of every file in a tree.

use super::{validate_root, Ancestors, CleanConfig};
use crate::core::organize::{plan_renumber, PlanExecutor};
use crate::core::reporter::{renumber_section, Report, ReportWriter};
use crate::core::scanner::{read_directory, Entry, EntryClassifier, EntryKind};
use crate::error::FolderCleanerError;
use crate::events::{null_sender, Event, EventSender, RunEvent, RunSummary, WalkEvent};
use std::path::{Path, PathBuf};
use std::time::Instant;
use tracing::{info, warn};

/// Asked once per directory with the files about to be renamed, in order.
/// Returning false leaves the directory untouched.
pub type ConfirmFn = Box<dyn Fn(&Path, &[Entry]) -> bool + Send + Sync>;

/// Result of a renumber run
#[derive(Debug)]
pub struct RenumberResult {
    pub report: Report,
    pub summary: RunSummary,
    /// Files renamed (or that would be, in a dry run)
    pub renamed: usize,
    /// Directories the confirmation callback declined
    pub skipped: Vec<PathBuf>,
    pub errors: Vec<String>,
    pub report_path: Option<PathBuf>,
}

/// Renames the files of every folder to `{folder}_{n}{.ext}`.
///
/// Images come first, then other files, each group in natural order.
pub struct Renumberer {
    root: PathBuf,
    config: CleanConfig,
    classifier: EntryClassifier,
    confirm: ConfirmFn,
}

impl Renumberer {
    pub fn new(root: impl Into<PathBuf>, config: CleanConfig) -> Self {
        Self {
            root: root.into(),
            classifier: EntryClassifier::new(&config.scan),
            config,
            confirm: Box::new(|_, _| true),
        }
    }

    pub fn with_confirm(mut self, confirm: ConfirmFn) -> Self {
        self.confirm = confirm;
        self
    }

    pub fn run(&self) -> Result<RenumberResult, FolderCleanerError> {
        self.run_with_events(&null_sender())
    }

    pub fn run_with_events(
        &self,
        events: &EventSender,
    ) -> Result<RenumberResult, FolderCleanerError> {
        let start = Instant::now();
        self.config.validate()?;
        validate_root(&self.root)?;

        info!("Renumbering {}", self.root.display());
        events.send(Event::Run(RunEvent::Started {
            root: self.root.clone(),
            make_changes: self.config.make_changes,
        }));

        let mut result = RenumberResult {
            report: Report::new(),
            summary: RunSummary::default(),
            renamed: 0,
            skipped: Vec::new(),
            errors: Vec::new(),
            report_path: None,
        };
        self.renumber_directory(&self.root, &Ancestors::root(&self.root), events, &mut result);

        if self.config.make_changes && self.config.write_report {
            match ReportWriter::new(&self.config.scan.report_file_name)
                .write(&self.root, &result.report)
            {
                Ok(path) => result.report_path = path,
                Err(error) => {
                    warn!("{}", error);
                    result.errors.push(error.to_string());
                }
            }
        }

        result.summary.duration_ms = start.elapsed().as_millis() as u64;
        events.send(Event::Run(RunEvent::Completed {
            summary: result.summary.clone(),
        }));
        Ok(result)
    }

    fn renumber_directory(
        &self,
        dir: &Path,
        ancestors: &Ancestors,
        events: &EventSender,
        result: &mut RenumberResult,
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
                result.errors.push(error.to_string());
                return;
            }
        };
        result
            .errors
            .extend(listing.errors.iter().map(|e| e.to_string()));

        for sub in listing.subdirectories() {
            if sub.name == self.config.quarantine_dir_name {
                events.send(Event::Walk(WalkEvent::DirectorySkipped {
                    path: sub.path.clone(),
                }));
                continue;
            }
            if let Some(chain) = ancestors.enter_or_skip(&sub.path, events) {
                self.renumber_directory(&sub.path, &chain, events, result);
            }
        }

        let files: Vec<Entry> = listing
            .of_kind(EntryKind::Image)
            .chain(listing.of_kind(EntryKind::Generic))
            .cloned()
            .collect();
        if files.is_empty() {
            return;
        }

        if !(self.confirm)(dir, &files) {
            info!("Skipped {}", dir.display());
            events.send(Event::Walk(WalkEvent::DirectorySkipped {
                path: dir.to_path_buf(),
            }));
            result.skipped.push(dir.to_path_buf());
            return;
        }

        let plan = plan_renumber(dir, &listing.folder_name, &files);
        let section = renumber_section(&plan);
        let changes = section.lines.len();
        result.report.push(section);
        result.renamed += changes;
        result.summary.directories += 1;
        result.summary.files += files.len();

        if self.config.make_changes {
            let execution = PlanExecutor::new(events).execute_renumber(&plan);
            result.errors.extend(execution.errors);
        }

        info!("Renumbered {} files in {}", changes, dir.display());
        events.send(Event::Walk(WalkEvent::DirectoryCompleted {
            path: dir.to_path_buf(),
            clusters: 0,
            duplicates: 0,
        }));
    }
}
