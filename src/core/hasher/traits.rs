//! Trait definitions for perceptual hashing.

use super::fast_decode::FastDecoder;
use crate::error::HashError;
use image::DynamicImage;
use serde::{Deserialize, Serialize};
use std::path::Path;

/// Available hash algorithms
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum HashAlgorithmKind {
    /// Average Hash (aHash) - coarse, matches near-identical copies
    #[default]
    Average,
    /// Difference Hash (dHash) - compares brightness gradients
    Difference,
    /// Perceptual Hash (pHash) - DCT-based, tolerates light edits
    Perceptual,
}

impl std::fmt::Display for HashAlgorithmKind {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            HashAlgorithmKind::Average => write!(f, "aHash"),
            HashAlgorithmKind::Difference => write!(f, "dHash"),
            HashAlgorithmKind::Perceptual => write!(f, "pHash"),
        }
    }
}

/// Turns images into fixed-width codes.
///
/// Implement this trait to plug in another hash (tests use one keyed on
/// file contents).
pub trait ImageHasher: Send + Sync {
    /// Compute a hash from an already-loaded image
    fn hash_image(&self, image: &DynamicImage) -> Result<ImageHashValue, HashError>;

    /// Decode a file and hash it
    fn hash_file(&self, path: &Path) -> Result<ImageHashValue, HashError> {
        let image = FastDecoder::decode(path)?;
        self.hash_image(&image)
    }

    fn kind(&self) -> HashAlgorithmKind;
}

/// A fixed-width perceptual code
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct ImageHashValue {
    bytes: Vec<u8>,
}

impl ImageHashValue {
    pub fn new(bytes: Vec<u8>) -> Self {
        Self { bytes }
    }

    pub fn as_bytes(&self) -> &[u8] {
        &self.bytes
    }

    /// Hamming distance: the number of differing bits.
    ///
    /// Codes of different widths count the missing bits as differing.
    pub fn distance(&self, other: &Self) -> u32 {
        let shared: u32 = self
            .bytes
            .iter()
            .zip(other.bytes.iter())
            .map(|(a, b)| (a ^ b).count_ones())
            .sum();
        let width_gap = self.bytes.len().abs_diff(other.bytes.len()) as u32 * 8;
        shared + width_gap
    }

    pub fn to_hex(&self) -> String {
        self.bytes.iter().map(|b| format!("{:02x}", b)).collect()
    }
}
