//! # Hasher Module
//!
//! Decodes images and computes fixed-width perceptual hashes.
//!
//! ## Supported Algorithms
//! - **aHash (Average Hash)** - default; on an 8x8 grid with cutoff 1 it
//!   only groups visually identical copies
//! - **dHash (Difference Hash)** - compares neighbouring brightness
//! - **pHash (Perceptual Hash)** - DCT-based, more tolerant of edits
//!
//! Hashes compare with the Hamming distance ([`ImageHashValue::distance`]).
//!
//! ## Example
//! ```rust,ignore
//! use duplicate_folder_cleaner::core::hasher::{HasherConfig, HashAlgorithmKind};
//!
//! let hasher = HasherConfig::new()
//!     .algorithm(HashAlgorithmKind::Average)
//!     .hash_size(8)
//!     .build();
//!
//! let hash = hasher.hash_file(&path)?;
//! ```

mod algorithms;
pub mod fast_decode;
mod traits;

pub use algorithms::AlgorithmHasher;
pub use traits::{HashAlgorithmKind, ImageHashValue, ImageHasher};

/// Configuration builder for hashers
#[derive(Debug, Clone)]
pub struct HasherConfig {
    /// Hash grid size (8 gives a 64-bit code)
    hash_size: u32,
    algorithm: HashAlgorithmKind,
}

impl HasherConfig {
    pub fn new() -> Self {
        Self {
            hash_size: 8,
            algorithm: HashAlgorithmKind::Average,
        }
    }

    /// Set the hash grid size.
    ///
    /// Larger grids tell more images apart but make a fixed cutoff stricter.
    pub fn hash_size(mut self, size: u32) -> Self {
        self.hash_size = size.max(2);
        self
    }

    pub fn algorithm(mut self, algorithm: HashAlgorithmKind) -> Self {
        self.algorithm = algorithm;
        self
    }

    pub fn build(self) -> Box<dyn ImageHasher> {
        Box::new(AlgorithmHasher::new(self.algorithm, self.hash_size))
    }
}

impl Default for HasherConfig {
    fn default() -> Self {
        Self::new()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn config_defaults_to_ahash() {
        let config = HasherConfig::new();
        assert_eq!(config.algorithm, HashAlgorithmKind::Average);
        assert_eq!(config.hash_size, 8);
    }

    #[test]
    fn config_builder_works() {
        let config = HasherConfig::new()
            .algorithm(HashAlgorithmKind::Perceptual)
            .hash_size(16);

        assert_eq!(config.algorithm, HashAlgorithmKind::Perceptual);
        assert_eq!(config.hash_size, 16);
    }

    #[test]
    fn build_creates_hasher_of_requested_kind() {
        let hasher = HasherConfig::new()
            .algorithm(HashAlgorithmKind::Difference)
            .build();
        assert_eq!(hasher.kind(), HashAlgorithmKind::Difference);
    }
}
