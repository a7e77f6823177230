//! Section builders for each kind of run.

use super::{Report, ReportSection};
use crate::core::comparator::{Cluster, ClusterKind, DecodeFailure};
use crate::core::organize::{NamingPlan, RenumberPlan};
use std::path::Path;

/// Section describing one directory of a clean run.
///
/// A representative gets a Keep line when it is renamed, or when its
/// cluster has duplicates. Unchanged singletons are not mentioned.
pub fn clean_section(plan: &NamingPlan, failures: &[DecodeFailure]) -> ReportSection {
    let dir = plan.directory.display();
    let heading = if plan.has_duplicates() {
        format!("Found duplicate files in {dir}:")
    } else {
        format!("Found no duplicates in {dir}:")
    };

    let mut lines = Vec::new();
    for cluster in &plan.clusters {
        let keep = &cluster.keep;
        if !keep.is_noop() {
            lines.push(format!(
                "  Keep:     '{}' -> '{}'  ({} bytes)",
                keep.from_name(),
                keep.to_name(),
                keep.size_bytes
            ));
        } else if cluster.has_duplicates {
            lines.push(format!(
                "  Keep:     '{}'  ({} bytes)",
                keep.from_name(),
                keep.size_bytes
            ));
        }

        for removed in &cluster.remove {
            lines.push(format!(
                "    Remove: '{}' -> '{}' ({} bytes)",
                removed.from_name(),
                removed.to_name(),
                removed.size_bytes
            ));
        }
    }

    for failure in failures {
        lines.push(format!(
            "  Failed:   '{}' ({})",
            failure.entry.name, failure.reason
        ));
    }

    ReportSection {
        directory: plan.directory.clone(),
        heading,
        lines,
    }
}

/// Report listing every tree-wide cluster with more than one member
pub fn finder_report(root: &Path, clusters: &[Cluster]) -> Report {
    let mut report = Report::new();
    for (kind, heading) in [
        (ClusterKind::Image, "Similar images:"),
        (ClusterKind::Generic, "Similar files:"),
    ] {
        let mut lines = Vec::new();
        for cluster in clusters
            .iter()
            .filter(|c| c.kind == kind && c.has_duplicates())
        {
            lines.push("  Possible similarity:".to_string());
            for member in &cluster.members {
                lines.push(format!("    {}", member.path.display()));
            }
        }

        report.push(ReportSection {
            directory: root.to_path_buf(),
            heading: heading.to_string(),
            lines,
        });
    }
    report
}

/// Section describing one renumbered directory
pub fn renumber_section(plan: &RenumberPlan) -> ReportSection {
    let lines = plan
        .moves
        .iter()
        .filter(|m| !m.is_noop())
        .map(|m| format!("    Rename: '{}' -> '{}'", m.from_name(), m.to_name()))
        .collect();

    ReportSection {
        directory: plan.directory.clone(),
        heading: format!("Renamed files in {}:", plan.directory.display()),
        lines,
    }
}
