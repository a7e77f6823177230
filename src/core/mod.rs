//! # Core Module
//!
//! The duplicate resolution engine, independent of any front end.
//!
//! ## Modules
//! - `ordering` - Natural ordering of file names
//! - `scanner` - Lists and classifies directory entries
//! - `hasher` - Computes perceptual hashes
//! - `comparator` - Clusters duplicates and picks the copy to keep
//! - `organize` - Plans and applies collision-free renames
//! - `reporter` - Renders and writes the text report
//! - `pipeline` - Walks the tree and runs everything per directory

pub mod comparator;
pub mod hasher;
pub mod ordering;
pub mod organize;
pub mod pipeline;
pub mod reporter;
pub mod scanner;

// Re-export commonly used types
pub use comparator::{Cluster, ClusterKind};
pub use hasher::{HashAlgorithmKind, ImageHasher};
pub use pipeline::{CleanConfig, CleanResult, Cleaner, DuplicateFinder, Renumberer};
pub use reporter::Report;
pub use scanner::{Entry, EntryKind};
