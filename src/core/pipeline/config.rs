//! Run configuration shared by the cleaner, finder and renumberer.

use crate::core::hasher::HashAlgorithmKind;
use crate::core::scanner::ScanConfig;
use crate::error::FolderCleanerError;
use serde::{Deserialize, Serialize};
use std::fs;
use std::path::Path;

/// Configuration for a run
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct CleanConfig {
    /// Listing and classification options
    #[serde(flatten)]
    pub scan: ScanConfig,
    /// Folder that receives duplicates; never scanned
    pub quarantine_dir_name: String,
    /// Images join a cluster when their distance is below this value
    pub cutoff: u32,
    pub algorithm: HashAlgorithmKind,
    /// Hash grid size
    pub hash_size: u32,
    /// False for a dry run: plan and report, touch nothing
    pub make_changes: bool,
    /// Write the report file at the root (live runs only)
    pub write_report: bool,
    /// Process sibling subdirectories on the rayon pool
    pub parallel: bool,
}

impl Default for CleanConfig {
    fn default() -> Self {
        Self {
            scan: ScanConfig::default(),
            quarantine_dir_name: "__remove".to_string(),
            cutoff: 1,
            algorithm: HashAlgorithmKind::Average,
            hash_size: 8,
            make_changes: true,
            write_report: true,
            parallel: false,
        }
    }
}

impl CleanConfig {
    /// Load a configuration from a JSON file. Missing fields keep their
    /// defaults.
    pub fn from_json_file(path: &Path) -> Result<Self, FolderCleanerError> {
        let text = fs::read_to_string(path).map_err(|e| {
            FolderCleanerError::Config(format!("cannot read {}: {}", path.display(), e))
        })?;
        let config: Self = serde_json::from_str(&text).map_err(|e| {
            FolderCleanerError::Config(format!("invalid {}: {}", path.display(), e))
        })?;
        config.validate()?;
        Ok(config)
    }

    /// Reject values that would make a run meaningless
    pub fn validate(&self) -> Result<(), FolderCleanerError> {
        let reserved = &self.quarantine_dir_name;
        if reserved.is_empty() || reserved.contains(['/', '\\']) || reserved == "." || reserved == ".." {
            return Err(FolderCleanerError::Config(format!(
                "quarantine folder name must be a plain folder name, got {reserved:?}"
            )));
        }
        if self.scan.report_file_name.is_empty() || self.scan.report_file_name.contains(['/', '\\']) {
            return Err(FolderCleanerError::Config(format!(
                "report file name must be a plain file name, got {:?}",
                self.scan.report_file_name
            )));
        }
        if self.cutoff == 0 {
            return Err(FolderCleanerError::Config(
                "cutoff must be at least 1, otherwise no image ever matches".to_string(),
            ));
        }
        Ok(())
    }
}
