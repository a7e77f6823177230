//! Hash algorithm implementations backed by the image_hasher crate.
//!
//! | Kind       | image_hasher setup          |
//! |------------|-----------------------------|
//! | Average    | `HashAlg::Mean`             |
//! | Difference | `HashAlg::Gradient`         |
//! | Perceptual | `HashAlg::Mean` + DCT       |

use super::traits::{HashAlgorithmKind, ImageHashValue, ImageHasher};
use crate::error::HashError;
use image::DynamicImage;
use image_hasher::{HashAlg, HasherConfig as ImageHasherConfig};

/// An image_hasher hasher tagged with the algorithm it implements
pub struct AlgorithmHasher {
    kind: HashAlgorithmKind,
    inner: image_hasher::Hasher,
}

impl AlgorithmHasher {
    pub fn new(kind: HashAlgorithmKind, hash_size: u32) -> Self {
        let config = ImageHasherConfig::new().hash_size(hash_size, hash_size);
        let config = match kind {
            HashAlgorithmKind::Average => config.hash_alg(HashAlg::Mean),
            HashAlgorithmKind::Difference => config.hash_alg(HashAlg::Gradient),
            HashAlgorithmKind::Perceptual => config.hash_alg(HashAlg::Mean).preproc_dct(),
        };

        Self {
            kind,
            inner: config.to_hasher(),
        }
    }
}

impl ImageHasher for AlgorithmHasher {
    fn hash_image(&self, image: &DynamicImage) -> Result<ImageHashValue, HashError> {
        let hash = self.inner.hash_image(image);
        Ok(ImageHashValue::new(hash.as_bytes().to_vec()))
    }

    fn kind(&self) -> HashAlgorithmKind {
        self.kind
    }
}
