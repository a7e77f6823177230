//! # folder-dedup CLI
//!
//! Command-line interface for the duplicate folder cleaner.
//!
//! ## Usage
//! ```bash
//! folder-dedup clean ~/Photos/Trip --dry-run
//! folder-dedup find ~/Photos --output json
//! folder-dedup renumber ~/Photos/Trip --yes
//! ```

mod cli;

use duplicate_folder_cleaner::Result;

fn main() -> Result<()> {
    cli::run()
}
