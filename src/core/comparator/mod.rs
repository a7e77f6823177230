//! # Comparator Module
//!
//! Groups the files of one directory into duplicate clusters.
//!
//! ## Rules
//! | Entries        | Rule                                               |
//! |----------------|----------------------------------------------------|
//! | Images         | first-fit: join the first cluster whose key hash is closer than the cutoff |
//! | Generic files  | identical byte size                                |
//!
//! Images and generic files never share a cluster. Size matching is a cheap
//! heuristic: two different files of the same size are reported as
//! duplicates.
//!
//! Every cluster gets a representative, the strictly largest member (ties
//! go to the earliest member in natural order).

mod grouper;
mod selector;

pub use grouper::{FirstFitGrouper, SizeGrouper};
pub use selector::select_representative;

use crate::core::hasher::ImageHashValue;
use crate::core::scanner::Entry;
use serde::{Deserialize, Serialize};

/// An image together with its hash
#[derive(Debug, Clone)]
pub struct HashedImage {
    pub entry: Entry,
    pub hash: ImageHashValue,
}

/// An image left out of clustering because it could not be hashed
#[derive(Debug, Clone)]
pub struct DecodeFailure {
    pub entry: Entry,
    pub reason: String,
}

/// Which rule formed a cluster
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum ClusterKind {
    Image,
    Generic,
}

/// A set of entries considered duplicates of one another
#[derive(Debug, Clone)]
pub struct Cluster {
    pub kind: ClusterKind,
    /// Members in natural order
    pub members: Vec<Entry>,
    /// Position of the representative in `members`
    pub representative: usize,
    /// Hash of the first member (image clusters only)
    pub key: Option<ImageHashValue>,
}

impl Cluster {
    fn new(kind: ClusterKind, first: Entry, key: Option<ImageHashValue>) -> Self {
        Self {
            kind,
            members: vec![first],
            representative: 0,
            key,
        }
    }

    pub fn representative(&self) -> &Entry {
        &self.members[self.representative]
    }

    /// Members other than the representative, in natural order
    pub fn duplicates(&self) -> impl Iterator<Item = &Entry> {
        let keep = self.representative().index;
        self.members.iter().filter(move |e| e.index != keep)
    }

    pub fn has_duplicates(&self) -> bool {
        self.members.len() > 1
    }

    pub fn duplicate_count(&self) -> usize {
        self.members.len().saturating_sub(1)
    }

    pub fn duplicate_size_bytes(&self) -> u64 {
        self.duplicates().map(|e| e.size).sum()
    }

    fn elect(&mut self) {
        self.representative = select_representative(&self.members);
    }
}

/// Cluster one directory's files.
///
/// Image clusters come first, in creation order, followed by generic
/// clusters in order of their first member. Representatives are selected.
pub fn cluster_entries(images: Vec<HashedImage>, files: Vec<Entry>, cutoff: u32) -> Vec<Cluster> {
    let mut clusters = FirstFitGrouper::new(cutoff).group(images);
    clusters.extend(SizeGrouper::new().group(files));

    for cluster in &mut clusters {
        cluster.elect();
    }
    clusters
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::core::scanner::EntryKind;
    use std::path::PathBuf;

    fn entry(index: usize, name: &str, size: u64, kind: EntryKind) -> Entry {
        Entry {
            index,
            path: PathBuf::from("/trip").join(name),
            name: name.to_string(),
            size,
            extension: name.rsplit('.').next().unwrap_or_default().to_string(),
            kind,
        }
    }

    fn image(index: usize, name: &str, size: u64, hash: u8) -> HashedImage {
        HashedImage {
            entry: entry(index, name, size, EntryKind::Image),
            hash: ImageHashValue::new(vec![hash]),
        }
    }

    #[test]
    fn images_come_before_files() {
        let clusters = cluster_entries(
            vec![image(1, "b.jpg", 10, 0)],
            vec![entry(0, "a.txt", 5, EntryKind::Generic)],
            1,
        );

        assert_eq!(clusters.len(), 2);
        assert_eq!(clusters[0].kind, ClusterKind::Image);
        assert_eq!(clusters[1].kind, ClusterKind::Generic);
    }

    #[test]
    fn images_and_files_never_mix_even_with_equal_sizes() {
        let clusters = cluster_entries(
            vec![image(0, "a.jpg", 10, 0)],
            vec![entry(1, "a.txt", 10, EntryKind::Generic)],
            1,
        );

        assert_eq!(clusters.len(), 2);
        assert!(clusters.iter().all(|c| !c.has_duplicates()));
    }

    #[test]
    fn largest_member_is_representative() {
        let clusters = cluster_entries(
            vec![image(0, "photoB.jpg", 480_000, 7), image(1, "photoA.jpg", 500_000, 7)],
            Vec::new(),
            1,
        );

        assert_eq!(clusters.len(), 1);
        assert_eq!(clusters[0].representative().name, "photoA.jpg");
        let duplicates: Vec<_> = clusters[0].duplicates().map(|e| e.name.as_str()).collect();
        assert_eq!(duplicates, vec!["photoB.jpg"]);
        assert_eq!(clusters[0].duplicate_size_bytes(), 480_000);
    }

    #[test]
    fn representative_dominates_every_member() {
        let files = vec![
            entry(0, "a.bin", 100, EntryKind::Generic),
            entry(1, "b.bin", 100, EntryKind::Generic),
            entry(2, "c.bin", 100, EntryKind::Generic),
        ];
        let images = vec![
            image(3, "a.jpg", 3, 1),
            image(4, "b.jpg", 9, 1),
            image(5, "c.jpg", 9, 1),
            image(6, "d.jpg", 1, 1),
        ];

        for cluster in cluster_entries(images, files, 1) {
            let rep = cluster.representative();
            assert!(cluster.members.iter().all(|m| rep.size >= m.size));
        }
    }

    #[test]
    fn singleton_has_no_duplicates() {
        let clusters = cluster_entries(vec![image(0, "a.jpg", 1, 0)], Vec::new(), 1);
        assert!(!clusters[0].has_duplicates());
        assert_eq!(clusters[0].duplicates().count(), 0);
        assert_eq!(clusters[0].duplicate_count(), 0);
    }
}
