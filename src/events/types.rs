//! Event type definitions for progress reporting.

use serde::{Deserialize, Serialize};
use std::path::PathBuf;

/// All events emitted while a tree is processed
#[derive(Debug, Clone, Serialize, Deserialize)]
pub enum Event {
    /// Directory traversal events
    Walk(WalkEvent),
    /// Per-entry hashing and stat events
    Entry(EntryEvent),
    /// Rename and quarantine events
    Move(MoveEvent),
    /// Run-level events
    Run(RunEvent),
}

/// Events while walking the tree
#[derive(Debug, Clone, Serialize, Deserialize)]
pub enum WalkEvent {
    /// A directory is about to be processed
    DirectoryStarted { path: PathBuf },
    /// A quarantine folder was skipped
    DirectorySkipped { path: PathBuf },
    /// A directory finished; counts describe its own files only
    DirectoryCompleted {
        path: PathBuf,
        clusters: usize,
        duplicates: usize,
    },
    /// A directory could not be listed; its subtree is skipped
    DirectoryFailed { path: PathBuf, message: String },
}

/// Events about single entries
#[derive(Debug, Clone, Serialize, Deserialize)]
pub enum EntryEvent {
    /// An image was hashed successfully
    Hashed { path: PathBuf },
    /// An image could not be decoded and is left alone
    DecodeFailed { path: PathBuf, message: String },
    /// An entry could not be stat'ed and is left alone
    Skipped { path: PathBuf, message: String },
}

/// Events while executing a naming plan
#[derive(Debug, Clone, Serialize, Deserialize)]
pub enum MoveEvent {
    /// A file was renamed or quarantined
    Moved { from: PathBuf, to: PathBuf },
    /// A planned move did not happen
    Failed {
        from: PathBuf,
        to: PathBuf,
        message: String,
    },
}

/// Run-level events
#[derive(Debug, Clone, Serialize, Deserialize)]
pub enum RunEvent {
    Started { root: PathBuf, make_changes: bool },
    Completed { summary: RunSummary },
}

/// Summary of a finished run
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct RunSummary {
    /// Directories that produced a report section
    pub directories: usize,
    /// Files considered for clustering
    pub files: usize,
    /// Clusters with at least two members
    pub duplicate_clusters: usize,
    /// Files planned for quarantine
    pub duplicates: usize,
    /// Bytes held by quarantined files
    pub duplicate_bytes: u64,
    /// Images that could not be decoded
    pub decode_failures: usize,
    /// Duration in milliseconds
    pub duration_ms: u64,
}
