//! Cluster builders.
//!
//! Both groupers expect their input in natural order; the order decides
//! cluster keys and therefore which images end up together.

use super::{Cluster, ClusterKind, HashedImage};
use crate::core::scanner::Entry;
use std::collections::HashMap;

/// Greedy first-fit clustering over image hashes.
///
/// Each cluster is keyed by the hash of its first member. A new image joins
/// the first cluster (in creation order) whose key is closer than `cutoff`,
/// otherwise it opens a cluster of its own. This is not globally optimal:
/// A may match B and B match C while A and C land in different clusters.
pub struct FirstFitGrouper {
    cutoff: u32,
}

impl FirstFitGrouper {
    pub fn new(cutoff: u32) -> Self {
        Self { cutoff }
    }

    pub fn group(&self, images: Vec<HashedImage>) -> Vec<Cluster> {
        let mut clusters: Vec<Cluster> = Vec::new();

        for image in images {
            let home = clusters.iter_mut().find(|cluster| {
                cluster
                    .key
                    .as_ref()
                    .is_some_and(|key| key.distance(&image.hash) < self.cutoff)
            });

            match home {
                Some(cluster) => cluster.members.push(image.entry),
                None => clusters.push(Cluster::new(
                    ClusterKind::Image,
                    image.entry,
                    Some(image.hash),
                )),
            }
        }

        clusters
    }
}

/// Exact grouping by byte size
pub struct SizeGrouper;

impl SizeGrouper {
    pub fn new() -> Self {
        Self
    }

    pub fn group(&self, files: Vec<Entry>) -> Vec<Cluster> {
        let mut clusters: Vec<Cluster> = Vec::new();
        let mut by_size: HashMap<u64, usize> = HashMap::new();

        for file in files {
            match by_size.get(&file.size) {
                Some(&slot) => clusters[slot].members.push(file),
                None => {
                    by_size.insert(file.size, clusters.len());
                    clusters.push(Cluster::new(ClusterKind::Generic, file, None));
                }
            }
        }

        clusters
    }
}

impl Default for SizeGrouper {
    fn default() -> Self {
        Self::new()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::core::hasher::ImageHashValue;
    use crate::core::scanner::EntryKind;
    use std::path::PathBuf;

    fn entry(index: usize, name: &str, size: u64, kind: EntryKind) -> Entry {
        Entry {
            index,
            path: PathBuf::from("/album").join(name),
            name: name.to_string(),
            size,
            extension: String::new(),
            kind,
        }
    }

    fn image(index: usize, hash: u8) -> HashedImage {
        HashedImage {
            entry: entry(index, &format!("img{index}.jpg"), 1, EntryKind::Image),
            hash: ImageHashValue::new(vec![hash]),
        }
    }

    fn names(cluster: &Cluster) -> Vec<usize> {
        cluster.members.iter().map(|e| e.index).collect()
    }

    #[test]
    fn empty_input_returns_empty() {
        assert!(FirstFitGrouper::new(1).group(Vec::new()).is_empty());
        assert!(SizeGrouper::new().group(Vec::new()).is_empty());
    }

    #[test]
    fn cutoff_one_groups_identical_hashes_only() {
        let clusters = FirstFitGrouper::new(1).group(vec![
            image(0, 0b0000_0000),
            image(1, 0b0000_0001),
            image(2, 0b0000_0000),
        ]);

        assert_eq!(clusters.len(), 2);
        assert_eq!(names(&clusters[0]), vec![0, 2]);
        assert_eq!(names(&clusters[1]), vec![1]);
    }

    #[test]
    fn first_matching_cluster_wins() {
        // 0b11 is within 2 of both keys; it joins the older cluster.
        let clusters = FirstFitGrouper::new(3).group(vec![
            image(0, 0b0000_0000),
            image(1, 0b0000_1111),
            image(2, 0b0000_0011),
        ]);

        assert_eq!(clusters.len(), 2);
        assert_eq!(names(&clusters[0]), vec![0, 2]);
        assert_eq!(names(&clusters[1]), vec![1]);
    }

    #[test]
    fn membership_is_judged_against_the_key_not_the_chain() {
        // 1 is near 0, 2 is near 1 but not near 0's key: not transitive.
        let clusters = FirstFitGrouper::new(2).group(vec![
            image(0, 0b0000_0000),
            image(1, 0b0000_0001),
            image(2, 0b0000_0011),
        ]);

        assert_eq!(clusters.len(), 2);
        assert_eq!(names(&clusters[0]), vec![0, 1]);
        assert_eq!(names(&clusters[1]), vec![2]);
    }

    #[test]
    fn members_are_within_cutoff_of_their_key() {
        let hashes = [0x00u8, 0x01, 0x03, 0x07, 0xF0, 0xF1, 0xFF, 0x0F];
        let images: Vec<_> = hashes.iter().enumerate().map(|(i, h)| image(i, *h)).collect();
        let lookup: Vec<_> = images.iter().map(|i| i.hash.clone()).collect();
        let cutoff = 3;

        let clusters = FirstFitGrouper::new(cutoff).group(images);

        for (position, cluster) in clusters.iter().enumerate() {
            let key = cluster.key.as_ref().unwrap();
            for member in &cluster.members {
                let hash = &lookup[member.index];
                assert!(key.distance(hash) < cutoff);
                // No earlier cluster would have accepted this member.
                for earlier in &clusters[..position] {
                    assert!(earlier.key.as_ref().unwrap().distance(hash) >= cutoff);
                }
            }
        }
    }

    #[test]
    fn equal_sizes_cluster_regardless_of_content() {
        let clusters = SizeGrouper::new().group(vec![
            entry(0, "notes.txt", 12, EntryKind::Generic),
            entry(1, "other.txt", 30, EntryKind::Generic),
            entry(2, "copy.txt", 12, EntryKind::Generic),
        ]);

        assert_eq!(clusters.len(), 2);
        assert_eq!(names(&clusters[0]), vec![0, 2]);
        assert_eq!(names(&clusters[1]), vec![1]);
        assert!(clusters[0].key.is_none());
    }
}
