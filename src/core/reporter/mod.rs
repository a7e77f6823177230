//! # Reporter Module
//!
//! Plain-text reports describing what a run decided.
//!
//! A report is an ordered list of sections. The cleaner and the renumberer
//! produce one section per visited directory; the finder produces one
//! section per entry kind. Rendering is independent of whether the plan was
//! executed, so a dry run reports exactly what a live run would.

mod sections;
mod writer;

pub use sections::{clean_section, finder_report, renumber_section};
pub use writer::{write_report, ReportWriter};

use serde::{Deserialize, Serialize};
use std::fmt;
use std::io::{self, Write};
use std::path::PathBuf;

/// One block of the report: a heading, its lines, then a blank line
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ReportSection {
    /// Directory the section describes
    pub directory: PathBuf,
    pub heading: String,
    pub lines: Vec<String>,
}

/// Ordered, append-only collection of sections
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct Report {
    pub sections: Vec<ReportSection>,
}

impl Report {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn push(&mut self, section: ReportSection) {
        self.sections.push(section);
    }

    /// Append every section of another report, keeping its order
    pub fn extend(&mut self, other: Report) {
        self.sections.extend(other.sections);
    }

    pub fn is_empty(&self) -> bool {
        self.sections.is_empty()
    }

    /// Write the report text to any writer
    pub fn write_to<W: Write>(&self, mut writer: W) -> io::Result<()> {
        write!(writer, "{}", self)
    }

    pub fn render(&self) -> String {
        self.to_string()
    }
}

impl fmt::Display for Report {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        for section in &self.sections {
            writeln!(f, "{}", section.heading)?;
            for line in &section.lines {
                writeln!(f, "{}", line)?;
            }
            writeln!(f)?;
        }
        Ok(())
    }
}

/// Human-readable byte count
pub fn format_bytes(bytes: u64) -> String {
    const KB: u64 = 1024;
    const MB: u64 = KB * 1024;
    const GB: u64 = MB * 1024;

    if bytes >= GB {
        format!("{:.1} GB", bytes as f64 / GB as f64)
    } else if bytes >= MB {
        format!("{:.1} MB", bytes as f64 / MB as f64)
    } else if bytes >= KB {
        format!("{:.1} KB", bytes as f64 / KB as f64)
    } else {
        format!("{} B", bytes)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn section(dir: &str, heading: &str, lines: &[&str]) -> ReportSection {
        ReportSection {
            directory: PathBuf::from(dir),
            heading: heading.to_string(),
            lines: lines.iter().map(|l| l.to_string()).collect(),
        }
    }

    #[test]
    fn every_section_ends_with_blank_line() {
        let mut report = Report::new();
        report.push(section("/a", "Found no duplicates in /a:", &[]));
        report.push(section("/b", "Found duplicate files in /b:", &["  x"]));

        assert_eq!(
            report.render(),
            "Found no duplicates in /a:\n\nFound duplicate files in /b:\n  x\n\n"
        );
    }

    #[test]
    fn write_to_matches_render() {
        let mut report = Report::new();
        report.push(section("/a", "Heading", &["  one", "  two"]));
        let mut output = Vec::new();

        report.write_to(&mut output).unwrap();

        assert_eq!(String::from_utf8(output).unwrap(), report.render());
    }

    #[test]
    fn extend_keeps_order() {
        let mut first = Report::new();
        first.push(section("/a", "A", &[]));
        let mut second = Report::new();
        second.push(section("/b", "B", &[]));
        second.push(section("/c", "C", &[]));

        first.extend(second);

        let dirs: Vec<_> = first.sections.iter().map(|s| s.heading.as_str()).collect();
        assert_eq!(dirs, vec!["A", "B", "C"]);
    }

    #[test]
    fn format_bytes_handles_all_sizes() {
        assert_eq!(format_bytes(500), "500 B");
        assert_eq!(format_bytes(1024), "1.0 KB");
        assert_eq!(format_bytes(1024 * 1024), "1.0 MB");
        assert_eq!(format_bytes(5_000_000), "4.8 MB");
    }
}
