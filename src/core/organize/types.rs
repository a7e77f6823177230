//! Types for the organize module.

use serde::{Deserialize, Serialize};
use std::path::{Path, PathBuf};

/// Why a file is being moved
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq)]
#[serde(rename_all = "snake_case")]
pub enum MoveKind {
    /// Representative renamed in place
    Keep,
    /// Duplicate moved into the quarantine folder
    Quarantine,
    /// Sequential rename by the renumberer
    Renumber,
}

/// A single rename
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
pub struct PlannedMove {
    pub from: PathBuf,
    pub to: PathBuf,
    pub kind: MoveKind,
    pub size_bytes: u64,
}

impl PlannedMove {
    /// Source and target are the same path
    pub fn is_noop(&self) -> bool {
        self.from == self.to
    }

    pub fn from_name(&self) -> String {
        file_name(&self.from)
    }

    pub fn to_name(&self) -> String {
        file_name(&self.to)
    }
}

/// Planned moves for one cluster
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ClusterPlan {
    /// Rename of the representative (may be a no-op)
    pub keep: PlannedMove,
    /// Whether the cluster has more than one member
    pub has_duplicates: bool,
    /// Quarantine moves, one per duplicate in natural order
    pub remove: Vec<PlannedMove>,
}

/// All renames for one directory, computed before anything is touched
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct NamingPlan {
    pub directory: PathBuf,
    /// Folder receiving quarantined duplicates
    pub quarantine_dir: PathBuf,
    pub clusters: Vec<ClusterPlan>,
}

impl NamingPlan {
    /// Every planned move, no-ops included, in execution order
    pub fn moves(&self) -> impl Iterator<Item = &PlannedMove> {
        self.clusters
            .iter()
            .flat_map(|c| std::iter::once(&c.keep).chain(c.remove.iter()))
    }

    pub fn has_quarantine_moves(&self) -> bool {
        self.clusters.iter().any(|c| !c.remove.is_empty())
    }

    pub fn has_duplicates(&self) -> bool {
        self.clusters.iter().any(|c| c.has_duplicates)
    }
}

/// Result of executing a plan
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct ExecutionResult {
    pub files_moved: usize,
    pub files_failed: usize,
    pub folders_created: usize,
    pub duration_ms: u64,
    pub errors: Vec<String>,
}

fn file_name(path: &Path) -> String {
    path.file_name()
        .map(|n| n.to_string_lossy().into_owned())
        .unwrap_or_default()
}
