//! Plan generator for renames.
//!
//! Plans are computed in full before any file is touched, so a dry run and a
//! live run see the same names.

use super::types::*;
use crate::core::comparator::Cluster;
use crate::core::scanner::Entry;
use std::collections::HashSet;
use std::path::{Path, PathBuf};
use tracing::debug;

/// Answers whether a path is already taken
pub trait PathProbe {
    fn exists(&self, path: &Path) -> bool;
}

/// Probes the real filesystem
pub struct DiskProbe;

impl PathProbe for DiskProbe {
    fn exists(&self, path: &Path) -> bool {
        // Broken symlinks still occupy their name.
        path.symlink_metadata().is_ok()
    }
}

impl PathProbe for HashSet<PathBuf> {
    fn exists(&self, path: &Path) -> bool {
        self.contains(path)
    }
}

/// Base for generated names: folder name lowercased, spaces as underscores.
///
/// Leading dots are dropped so generated names are never hidden files.
pub fn name_stem(folder_name: &str) -> String {
    folder_name
        .trim_start_matches('.')
        .to_lowercase()
        .replace(' ', "_")
}

/// Generates naming plans for one directory at a time
pub struct NamingPlanner<'a, P: PathProbe + ?Sized> {
    probe: &'a P,
    quarantine_dir_name: &'a str,
}

impl<'a, P: PathProbe + ?Sized> NamingPlanner<'a, P> {
    pub fn new(probe: &'a P, quarantine_dir_name: &'a str) -> Self {
        Self {
            probe,
            quarantine_dir_name,
        }
    }

    /// Plan the kept name of every representative and the quarantine name
    /// of every duplicate.
    ///
    /// Kept names share one counter across all clusters of the directory;
    /// quarantine names count from 0 within each cluster. A candidate is
    /// skipped if it exists or was already handed out, unless it is the
    /// representative's own path.
    pub fn plan(&self, directory: &Path, folder_name: &str, clusters: &[Cluster]) -> NamingPlan {
        let stem = name_stem(folder_name);
        let quarantine_dir = directory.join(self.quarantine_dir_name);
        let mut claimed: HashSet<PathBuf> = HashSet::new();
        let mut index = 0usize;
        let mut planned = Vec::with_capacity(clusters.len());

        for cluster in clusters {
            let rep = cluster.representative();
            let extension = rep.dotted_extension();

            let (kept_stem, target) = loop {
                let candidate_stem = format!("{stem}_{index}");
                let candidate = directory.join(format!("{candidate_stem}{extension}"));
                index += 1;
                if candidate == rep.path || self.is_free(&candidate, &claimed) {
                    break (candidate_stem, candidate);
                }
            };
            claimed.insert(target.clone());

            let keep = PlannedMove {
                from: rep.path.clone(),
                to: target,
                kind: MoveKind::Keep,
                size_bytes: rep.size,
            };
            if !keep.is_noop() {
                debug!("Plan keep {} -> {}", keep.from.display(), keep.to.display());
            }

            let mut remove = Vec::with_capacity(cluster.duplicate_count());
            let mut duplicate_index = 0usize;
            for duplicate in cluster.duplicates() {
                let extension = duplicate.dotted_extension();
                let target = loop {
                    let candidate = quarantine_dir
                        .join(format!("{kept_stem}_{duplicate_index}{extension}"));
                    duplicate_index += 1;
                    if self.is_free(&candidate, &claimed) {
                        break candidate;
                    }
                };
                claimed.insert(target.clone());

                debug!(
                    "Plan quarantine {} -> {}",
                    duplicate.path.display(),
                    target.display()
                );
                remove.push(PlannedMove {
                    from: duplicate.path.clone(),
                    to: target,
                    kind: MoveKind::Quarantine,
                    size_bytes: duplicate.size,
                });
            }

            planned.push(ClusterPlan {
                keep,
                has_duplicates: cluster.has_duplicates(),
                remove,
            });
        }

        NamingPlan {
            directory: directory.to_path_buf(),
            quarantine_dir,
            clusters: planned,
        }
    }

    fn is_free(&self, candidate: &Path, claimed: &HashSet<PathBuf>) -> bool {
        !claimed.contains(candidate) && !self.probe.exists(candidate)
    }
}

/// Sequential renames for one directory
#[derive(Debug, Clone)]
pub struct RenumberPlan {
    pub directory: PathBuf,
    pub moves: Vec<PlannedMove>,
}

/// Plan `{folder}_{n}{.ext}` names, `n` from 1, for files in the given order.
///
/// Targets may overlap current names; the executor stages such batches.
pub fn plan_renumber(directory: &Path, folder_name: &str, files: &[Entry]) -> RenumberPlan {
    let stem = name_stem(folder_name);
    let moves = files
        .iter()
        .enumerate()
        .map(|(position, file)| PlannedMove {
            from: file.path.clone(),
            to: directory.join(format!(
                "{stem}_{}{}",
                position + 1,
                file.dotted_extension()
            )),
            kind: MoveKind::Renumber,
            size_bytes: file.size,
        })
        .collect();

    RenumberPlan {
        directory: directory.to_path_buf(),
        moves,
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::core::comparator::{cluster_entries, HashedImage};
    use crate::core::hasher::ImageHashValue;
    use crate::core::scanner::EntryKind;

    const DIR: &str = "/photos/Trip";

    fn entry(index: usize, name: &str, size: u64, kind: EntryKind) -> Entry {
        Entry {
            index,
            path: Path::new(DIR).join(name),
            name: name.to_string(),
            size,
            extension: Path::new(name)
                .extension()
                .map(|e| e.to_string_lossy().to_lowercase())
                .unwrap_or_default(),
            kind,
        }
    }

    fn image(index: usize, name: &str, size: u64, hash: u8) -> HashedImage {
        HashedImage {
            entry: entry(index, name, size, EntryKind::Image),
            hash: ImageHashValue::new(vec![hash]),
        }
    }

    fn on_disk(names: &[&str]) -> HashSet<PathBuf> {
        names.iter().map(|n| Path::new(DIR).join(n)).collect()
    }

    fn targets(plan: &NamingPlan) -> Vec<String> {
        plan.moves()
            .map(|m| {
                m.to.strip_prefix(DIR)
                    .unwrap()
                    .to_string_lossy()
                    .replace('\\', "/")
            })
            .collect()
    }

    #[test]
    fn stem_lowercases_and_replaces_spaces() {
        assert_eq!(name_stem("Summer Trip"), "summer_trip");
        assert_eq!(name_stem("Trip"), "trip");
        assert_eq!(name_stem(".Hidden Album"), "hidden_album");
    }

    #[test]
    fn trip_example() {
        let clusters = cluster_entries(
            vec![
                image(0, "photoA.jpg", 500_000, 1),
                image(1, "photoB.jpg", 480_000, 1),
            ],
            Vec::new(),
            1,
        );
        let probe = on_disk(&["photoA.jpg", "photoB.jpg"]);

        let plan = NamingPlanner::new(&probe, "__remove").plan(Path::new(DIR), "Trip", &clusters);

        assert_eq!(targets(&plan), vec!["trip_0.jpg", "__remove/trip_0_0.jpg"]);
        assert_eq!(plan.clusters[0].keep.from_name(), "photoA.jpg");
        assert_eq!(plan.clusters[0].remove[0].from_name(), "photoB.jpg");
    }

    #[test]
    fn counter_is_shared_across_clusters() {
        let clusters = cluster_entries(
            vec![image(0, "a.png", 1, 1), image(1, "b.JPG", 1, 2)],
            vec![entry(2, "notes.txt", 5, EntryKind::Generic)],
            1,
        );
        let probe = on_disk(&["a.png", "b.JPG", "notes.txt"]);

        let plan = NamingPlanner::new(&probe, "__remove").plan(Path::new(DIR), "Trip", &clusters);

        assert_eq!(targets(&plan), vec!["trip_0.png", "trip_1.jpg", "trip_2.txt"]);
    }

    #[test]
    fn existing_names_are_skipped() {
        let clusters = cluster_entries(vec![image(1, "new.jpg", 1, 9)], Vec::new(), 1);
        let probe = on_disk(&["trip_0.jpg", "new.jpg"]);

        let plan = NamingPlanner::new(&probe, "__remove").plan(Path::new(DIR), "Trip", &clusters);

        assert_eq!(targets(&plan), vec!["trip_1.jpg"]);
    }

    #[test]
    fn already_named_representative_is_a_noop() {
        let clusters = cluster_entries(vec![image(0, "trip_0.jpg", 1, 9)], Vec::new(), 1);
        let probe = on_disk(&["trip_0.jpg"]);

        let plan = NamingPlanner::new(&probe, "__remove").plan(Path::new(DIR), "Trip", &clusters);

        assert!(plan.clusters[0].keep.is_noop());
    }

    #[test]
    fn quarantine_names_skip_existing_and_restart_per_cluster() {
        let clusters = cluster_entries(
            vec![
                image(0, "a.jpg", 10, 1),
                image(1, "b.jpg", 5, 1),
                image(2, "c.jpg", 10, 2),
                image(3, "d.png", 5, 2),
            ],
            Vec::new(),
            1,
        );
        let mut probe = on_disk(&["a.jpg", "b.jpg", "c.jpg", "d.png"]);
        probe.insert(Path::new(DIR).join("__remove/trip_0_0.jpg"));

        let plan = NamingPlanner::new(&probe, "__remove").plan(Path::new(DIR), "Trip", &clusters);

        assert_eq!(
            targets(&plan),
            vec![
                "trip_0.jpg",
                "__remove/trip_0_1.jpg",
                "trip_1.jpg",
                "__remove/trip_1_0.png",
            ]
        );
    }

    #[test]
    fn extensionless_files_get_no_dot() {
        let clusters = cluster_entries(
            Vec::new(),
            vec![
                entry(0, "README", 3, EntryKind::Generic),
                entry(1, "LICENSE", 3, EntryKind::Generic),
            ],
            1,
        );
        let probe = on_disk(&["README", "LICENSE"]);

        let plan = NamingPlanner::new(&probe, "__remove").plan(Path::new(DIR), "Trip", &clusters);

        assert_eq!(targets(&plan), vec!["trip_0", "__remove/trip_0_0"]);
    }

    #[test]
    fn targets_are_unique() {
        let images: Vec<_> = (0..12)
            .map(|i| image(i, &format!("img{i}.jpg"), i as u64, (i % 3) as u8))
            .collect();
        let files: Vec<_> = (12..20)
            .map(|i| entry(i, &format!("f{i}.txt"), (i % 2) as u64, EntryKind::Generic))
            .collect();
        let clusters = cluster_entries(images, files, 1);
        let mut probe: HashSet<PathBuf> = (0..20)
            .map(|i| Path::new(DIR).join(format!("trip_{i}.jpg")))
            .collect();
        probe.insert(Path::new(DIR).join("__remove/trip_20_0.jpg"));

        let plan = NamingPlanner::new(&probe, "__remove").plan(Path::new(DIR), "Trip", &clusters);

        let all: Vec<_> = plan.moves().map(|m| m.to.clone()).collect();
        let unique: HashSet<_> = all.iter().cloned().collect();
        assert_eq!(all.len(), unique.len());
        assert!(all.iter().all(|t| !probe.contains(t)));
    }

    #[test]
    fn renumber_counts_from_one() {
        let files = vec![
            entry(0, "b.jpg", 1, EntryKind::Image),
            entry(1, "a.PNG", 1, EntryKind::Image),
            entry(2, "notes", 1, EntryKind::Generic),
        ];

        let plan = plan_renumber(Path::new(DIR), "My Trip", &files);

        let names: Vec<_> = plan.moves.iter().map(|m| m.to_name()).collect();
        assert_eq!(names, vec!["my_trip_1.jpg", "my_trip_2.png", "my_trip_3"]);
        assert!(plan.moves.iter().all(|m| m.kind == MoveKind::Renumber));
    }
}
