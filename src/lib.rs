//! # Duplicate Folder Cleaner
//!
//! Cleans a folder tree one directory at a time: duplicate photos and files
//! are detected, the best copy is kept under a predictable name and every
//! other copy is moved into a quarantine folder next to it.
//!
//! ## Core Philosophy
//! - **Never delete** - duplicates are quarantined, not removed
//! - **Never overwrite** - every target path is checked before a rename
//! - **Be predictable** - the same tree always produces the same plan
//!
//! ## Architecture
//! - `core` - ordering, scanning, hashing, clustering, planning and walking
//! - `events` - Event-driven progress reporting
//! - `error` - User-friendly error types
//! - `cli` - Command-line interface (binary only)

pub mod core;
pub mod error;
pub mod events;

// Re-export commonly used types at the crate root
pub use error::{FolderCleanerError, Result};

/// Initialize tracing for the library
///
/// This should be called by the application entry point. `RUST_LOG` wins
/// over `default_level` when it is set.
pub fn init_tracing(default_level: &str) {
    let filter = tracing_subscriber::EnvFilter::try_from_default_env()
        .unwrap_or_else(|_| tracing_subscriber::EnvFilter::new(default_level));

    // A second initialisation (e.g. from tests) is not an error worth surfacing.
    let _ = tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(std::io::stderr)
        .try_init();
}
