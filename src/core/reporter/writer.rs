//! Writes the report file at the scanned root.

use super::Report;
use crate::error::ReportError;
use std::fs::File;
use std::io::{BufWriter, Write};
use std::path::{Path, PathBuf};
use tracing::info;

/// Writes reports under a fixed file name
pub struct ReportWriter {
    file_name: String,
}

impl ReportWriter {
    pub fn new(file_name: impl Into<String>) -> Self {
        Self {
            file_name: file_name.into(),
        }
    }

    /// Write `report` to `{root}/{file_name}`, replacing an older report.
    ///
    /// Returns the path written. An empty report writes nothing and
    /// returns `None`.
    pub fn write(&self, root: &Path, report: &Report) -> Result<Option<PathBuf>, ReportError> {
        if report.is_empty() {
            return Ok(None);
        }

        let path = root.join(&self.file_name);
        write_report(&path, report)?;
        info!("Wrote report to {}", path.display());
        Ok(Some(path))
    }
}

/// Write a report to an explicit path
pub fn write_report(path: &Path, report: &Report) -> Result<(), ReportError> {
    let to_error = |source| ReportError::Write {
        path: path.to_path_buf(),
        source,
    };

    let file = File::create(path).map_err(to_error)?;
    let mut writer = BufWriter::new(file);
    report.write_to(&mut writer).map_err(to_error)?;
    writer.flush().map_err(to_error)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::core::reporter::ReportSection;
    use std::fs;
    use tempfile::TempDir;

    #[test]
    fn writes_report_at_root() {
        let temp = TempDir::new().unwrap();
        let mut report = Report::new();
        report.push(ReportSection {
            directory: temp.path().to_path_buf(),
            heading: "Found no duplicates in x:".to_string(),
            lines: Vec::new(),
        });

        let path = ReportWriter::new("__report.txt")
            .write(temp.path(), &report)
            .unwrap()
            .unwrap();

        assert_eq!(path, temp.path().join("__report.txt"));
        assert_eq!(fs::read_to_string(path).unwrap(), "Found no duplicates in x:\n\n");
    }

    #[test]
    fn empty_report_is_not_written() {
        let temp = TempDir::new().unwrap();

        let written = ReportWriter::new("__report.txt")
            .write(temp.path(), &Report::new())
            .unwrap();

        assert!(written.is_none());
        assert!(!temp.path().join("__report.txt").exists());
    }

    #[test]
    fn unwritable_location_is_an_error() {
        let temp = TempDir::new().unwrap();
        let mut report = Report::new();
        report.push(ReportSection {
            directory: temp.path().to_path_buf(),
            heading: "h".to_string(),
            lines: Vec::new(),
        });

        let result = write_report(&temp.path().join("missing/dir/report.txt"), &report);

        assert!(matches!(result, Err(ReportError::Write { .. })));
    }
}
