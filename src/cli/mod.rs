//! # CLI Module
//!
//! Command-line interface for the duplicate folder cleaner.
//!
//! ## Usage
//! ```bash
//! # Keep the best copy of every duplicate, quarantine the rest
//! folder-dedup clean ~/Photos
//!
//! # See what would happen without touching anything
//! folder-dedup clean ~/Photos --dry-run
//!
//! # Only list duplicates across the whole tree
//! folder-dedup find ~/Photos
//!
//! # Rename every file to {folder}_{n}, asking per folder
//! folder-dedup renumber ~/Photos
//!
//! # JSON output
//! folder-dedup clean ~/Photos --output json
//! ```

use clap::{Args, Parser, Subcommand, ValueEnum};
use console::{style, Term};
use duplicate_folder_cleaner::core::hasher::HashAlgorithmKind;
use duplicate_folder_cleaner::core::pipeline::{
    CleanConfig, CleanResult, Cleaner, DuplicateFinder, FindResult, RenumberResult, Renumberer,
};
use duplicate_folder_cleaner::core::reporter::{format_bytes, Report};
use duplicate_folder_cleaner::core::scanner::Entry;
use duplicate_folder_cleaner::error::Result;
use duplicate_folder_cleaner::events::{Event, EventChannel, EventReceiver, RunEvent, WalkEvent};
use duplicate_folder_cleaner::init_tracing;
use indicatif::{ProgressBar, ProgressStyle};
use std::path::{Path, PathBuf};
use std::thread;
use std::time::Duration;

/// Duplicate Folder Cleaner - keep one copy, quarantine the rest
#[derive(Parser, Debug)]
#[command(name = "folder-dedup")]
#[command(author, version, about, long_about = None)]
pub struct Cli {
    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand, Debug)]
enum Commands {
    /// Resolve duplicates folder by folder
    Clean {
        #[command(flatten)]
        common: CommonArgs,

        /// Process sibling folders in parallel
        #[arg(long)]
        parallel: bool,
    },
    /// Report duplicates across the whole tree without changing anything
    Find {
        #[command(flatten)]
        common: CommonArgs,
    },
    /// Rename every file to {folder}_{n}
    Renumber {
        #[command(flatten)]
        common: CommonArgs,

        /// Do not ask before renaming a folder
        #[arg(short, long)]
        yes: bool,
    },
}

#[derive(Args, Debug)]
struct CommonArgs {
    /// Folder to process
    path: String,

    /// JSON configuration file; flags override its values
    #[arg(short, long)]
    config: Option<PathBuf>,

    /// Plan and report only
    #[arg(short = 'n', long)]
    dry_run: bool,

    /// Images closer than this are duplicates (1 = identical hashes only)
    #[arg(long)]
    cutoff: Option<u32>,

    /// Hash algorithm to use
    #[arg(short, long)]
    algorithm: Option<Algorithm>,

    /// Name of the quarantine folder
    #[arg(long)]
    quarantine: Option<String>,

    /// Name of the report file
    #[arg(long)]
    report_name: Option<String>,

    /// Do not write the report file
    #[arg(long)]
    no_report: bool,

    /// Include hidden files
    #[arg(long)]
    include_hidden: bool,

    /// Walk symbolic links to folders
    #[arg(long)]
    follow_symlinks: bool,

    /// Output format
    #[arg(short, long, default_value = "pretty")]
    output: OutputFormat,

    /// Verbose output
    #[arg(short, long)]
    verbose: bool,
}

#[derive(Debug, Clone, Copy, ValueEnum)]
enum Algorithm {
    /// Average Hash - exact duplicates (default)
    Average,
    /// Difference Hash - brightness gradients
    Difference,
    /// Perceptual Hash - most robust to edits
    Perceptual,
}

impl From<Algorithm> for HashAlgorithmKind {
    fn from(algo: Algorithm) -> Self {
        match algo {
            Algorithm::Average => HashAlgorithmKind::Average,
            Algorithm::Difference => HashAlgorithmKind::Difference,
            Algorithm::Perceptual => HashAlgorithmKind::Perceptual,
        }
    }
}

#[derive(Debug, Clone, Copy, ValueEnum, PartialEq, Eq)]
enum OutputFormat {
    /// Human-readable output with colors
    Pretty,
    /// JSON output for scripting
    Json,
    /// Report text only
    Minimal,
}

impl CommonArgs {
    /// Windows shells leave a trailing quote on paths ending in a backslash.
    fn root(&self) -> PathBuf {
        PathBuf::from(self.path.strip_suffix('"').unwrap_or(&self.path))
    }

    fn load_config(&self) -> Result<CleanConfig> {
        let mut config = match &self.config {
            Some(path) => CleanConfig::from_json_file(path)?,
            None => CleanConfig::default(),
        };

        if self.dry_run {
            config.make_changes = false;
        }
        if let Some(cutoff) = self.cutoff {
            config.cutoff = cutoff;
        }
        if let Some(algorithm) = self.algorithm {
            config.algorithm = algorithm.into();
        }
        if let Some(name) = &self.quarantine {
            config.quarantine_dir_name = name.clone();
        }
        if let Some(name) = &self.report_name {
            config.scan.report_file_name = name.clone();
        }
        if self.no_report {
            config.write_report = false;
        }
        if self.include_hidden {
            config.scan.include_hidden = true;
        }
        if self.follow_symlinks {
            config.scan.follow_symlinks = true;
        }

        config.validate()?;
        Ok(config)
    }
}

/// Run the CLI
pub fn run() -> Result<()> {
    let cli = Cli::parse();

    match cli.command {
        Commands::Clean { common, parallel } => run_clean(&common, parallel),
        Commands::Find { common } => run_find(&common),
        Commands::Renumber { common, yes } => run_renumber(&common, yes),
    }
}

fn start(common: &CommonArgs, title: &str) -> Term {
    init_tracing(if common.verbose { "debug" } else { "warn" });

    let term = Term::stderr();
    if common.output == OutputFormat::Pretty {
        term.write_line(&format!(
            "{} {}",
            style(title).bold().cyan(),
            style(format!("v{}", env!("CARGO_PKG_VERSION"))).dim()
        ))
        .ok();
        term.write_line("").ok();
    }
    term
}

/// Drive a spinner from walk events until the run completes
fn spawn_progress(receiver: EventReceiver, enabled: bool) -> thread::JoinHandle<()> {
    thread::spawn(move || {
        let spinner = if enabled {
            let pb = ProgressBar::new_spinner();
            if let Ok(spinner_style) = ProgressStyle::default_spinner().template("{spinner:.green} {msg}") {
                pb.set_style(spinner_style);
            }
            pb.enable_steady_tick(Duration::from_millis(100));
            Some(pb)
        } else {
            None
        };

        for event in receiver.iter() {
            let Some(pb) = spinner.as_ref() else { continue };
            match event {
                Event::Walk(WalkEvent::DirectoryStarted { path }) => {
                    pb.set_message(format!("{}", path.display()));
                }
                Event::Run(RunEvent::Completed { .. }) => pb.finish_and_clear(),
                _ => {}
            }
        }

        if let Some(pb) = spinner {
            pb.finish_and_clear();
        }
    })
}

fn run_clean(common: &CommonArgs, parallel: bool) -> Result<()> {
    let term = start(common, "Duplicate Folder Cleaner");
    let mut config = common.load_config()?;
    config.parallel |= parallel;

    let cleaner = Cleaner::builder(common.root()).config(config).build();

    let (sender, receiver) = EventChannel::new();
    let progress = spawn_progress(receiver, common.output == OutputFormat::Pretty);
    let result = cleaner.run_with_events(&sender);
    drop(sender);
    progress.join().ok();
    let result = result?;

    match common.output {
        OutputFormat::Pretty => print_clean_pretty(&term, &result, !cleaner.config().make_changes),
        OutputFormat::Json => print_json(&serde_json::json!({
            "summary": result.summary,
            "report": result.report,
            "report_path": result.report_path,
            "errors": result.errors,
        })),
        OutputFormat::Minimal => print!("{}", result.report),
    }

    Ok(())
}

fn run_find(common: &CommonArgs) -> Result<()> {
    let term = start(common, "Duplicate Finder");
    let config = common.load_config()?;

    let finder = DuplicateFinder::new(common.root(), config);

    let (sender, receiver) = EventChannel::new();
    let progress = spawn_progress(receiver, common.output == OutputFormat::Pretty);
    let result = finder.run_with_events(&sender);
    drop(sender);
    progress.join().ok();
    let result = result?;

    match common.output {
        OutputFormat::Pretty => print_find_pretty(&term, &result),
        OutputFormat::Json => print_json(&serde_json::json!({
            "summary": result.summary,
            "clusters": result.clusters.iter().filter(|c| c.has_duplicates()).map(|c| {
                serde_json::json!({
                    "kind": c.kind,
                    "keep": c.representative().path,
                    "members": c.members.iter().map(|m| &m.path).collect::<Vec<_>>(),
                    "duplicate_size_bytes": c.duplicate_size_bytes(),
                })
            }).collect::<Vec<_>>(),
            "report_path": result.report_path,
            "errors": result.errors,
        })),
        OutputFormat::Minimal => print!("{}", result.report),
    }

    Ok(())
}

fn run_renumber(common: &CommonArgs, yes: bool) -> Result<()> {
    let term = start(common, "Folder Renumberer");
    let config = common.load_config()?;
    let make_changes = config.make_changes;

    let mut renumberer = Renumberer::new(common.root(), config);
    if !yes && make_changes {
        renumberer = renumberer.with_confirm(Box::new(confirm_on_terminal));
    }

    // Prompts and a spinner do not mix.
    let (sender, receiver) = EventChannel::new();
    let progress = spawn_progress(receiver, common.output == OutputFormat::Pretty && (yes || !make_changes));
    let result = renumberer.run_with_events(&sender);
    drop(sender);
    progress.join().ok();
    let result = result?;

    match common.output {
        OutputFormat::Pretty => print_renumber_pretty(&term, &result, !make_changes),
        OutputFormat::Json => print_json(&serde_json::json!({
            "summary": result.summary,
            "renamed": result.renamed,
            "skipped": result.skipped,
            "report": result.report,
            "errors": result.errors,
        })),
        OutputFormat::Minimal => print!("{}", result.report),
    }

    Ok(())
}

/// Lists the files and asks; an empty answer means yes
fn confirm_on_terminal(dir: &Path, files: &[Entry]) -> bool {
    let term = Term::stderr();
    term.write_line("").ok();
    term.write_line(&format!("{}", style("Files:").bold())).ok();
    for file in files {
        term.write_line(&format!("  {}", file.name)).ok();
    }
    term.write_str(&format!("Rename files in: {}? Y/n: ", dir.display()))
        .ok();

    let answer = term.read_line().unwrap_or_default();
    let answer = answer.trim().to_lowercase();
    let accepted = answer.is_empty() || answer.starts_with('y');
    if !accepted {
        term.write_line(&format!("  {}", style("Skipped").dim())).ok();
    }
    accepted
}

fn print_json(value: &serde_json::Value) {
    match serde_json::to_string_pretty(value) {
        Ok(text) => println!("{}", text),
        Err(e) => eprintln!("Failed to serialize output: {}", e),
    }
}

fn print_errors(term: &Term, errors: &[String]) {
    if errors.is_empty() {
        return;
    }
    term.write_line("").ok();
    term.write_line(&format!(
        "{} {} problem(s):",
        style("!").yellow().bold(),
        errors.len()
    ))
    .ok();
    for error in errors {
        term.write_line(&format!("  {}", style(error).yellow())).ok();
    }
}

fn print_report(report: &Report) {
    print!("{}", report);
}

fn print_clean_pretty(term: &Term, result: &CleanResult, dry_run: bool) {
    print_report(&result.report);

    let summary = &result.summary;
    term.write_line(&format!(
        "{} {}",
        style("✓").green().bold(),
        if dry_run { "Dry run complete" } else { "Clean complete" }
    ))
    .ok();
    term.write_line(&format!(
        "  {} folders, {} files in {:.1}s",
        style(summary.directories).cyan(),
        style(summary.files).cyan(),
        summary.duration_ms as f64 / 1000.0
    ))
    .ok();
    term.write_line(&format!(
        "  {} duplicates in {} clusters ({})",
        style(summary.duplicates).cyan(),
        style(summary.duplicate_clusters).cyan(),
        style(format_bytes(summary.duplicate_bytes)).yellow()
    ))
    .ok();
    if summary.decode_failures > 0 {
        term.write_line(&format!(
            "  {} images could not be read",
            style(summary.decode_failures).red()
        ))
        .ok();
    }
    if let Some(path) = &result.report_path {
        term.write_line(&format!("  Report written to {}", path.display()))
            .ok();
    }
    print_errors(term, &result.errors);

    if dry_run {
        term.write_line(&format!(
            "{}",
            style("No files were changed. Run without --dry-run to apply.").dim()
        ))
        .ok();
    } else {
        term.write_line(&format!(
            "{}",
            style("Nothing was deleted. Review the quarantine folders before removing them.").dim()
        ))
        .ok();
    }
}

fn print_find_pretty(term: &Term, result: &FindResult) {
    print_report(&result.report);

    let summary = &result.summary;
    term.write_line(&format!("{} Search complete", style("✓").green().bold()))
        .ok();
    term.write_line(&format!(
        "  {} files in {} folders",
        style(summary.files).cyan(),
        style(summary.directories).cyan()
    ))
    .ok();
    if summary.duplicate_clusters == 0 {
        term.write_line("  No duplicates found").ok();
    } else {
        term.write_line(&format!(
            "  {} possible similarities ({} reclaimable)",
            style(summary.duplicate_clusters).cyan(),
            style(format_bytes(summary.duplicate_bytes)).yellow()
        ))
        .ok();
    }
    if let Some(path) = &result.report_path {
        term.write_line(&format!("  Report written to {}", path.display()))
            .ok();
    }
    print_errors(term, &result.errors);
}

fn print_renumber_pretty(term: &Term, result: &RenumberResult, dry_run: bool) {
    print_report(&result.report);

    term.write_line(&format!(
        "{} {} {} files",
        style("✓").green().bold(),
        if dry_run { "Would rename" } else { "Renamed" },
        style(result.renamed).cyan()
    ))
    .ok();
    if !result.skipped.is_empty() {
        term.write_line(&format!(
            "  {} folders skipped",
            style(result.skipped.len()).dim()
        ))
        .ok();
    }
    print_errors(term, &result.errors);
}
