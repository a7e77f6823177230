//! Executor for naming plans.

use super::planner::{DiskProbe, PathProbe, RenumberPlan};
use super::types::*;
use crate::error::MoveError;
use crate::events::{Event, EventSender, MoveEvent};
use std::collections::HashSet;
use std::fs;
use std::path::{Path, PathBuf};
use std::time::Instant;
use tracing::warn;

const TEMP_PREFIX: &str = "__temp__";
const MAX_TEMP_ATTEMPTS: usize = 1000;

/// Applies plans to the filesystem.
///
/// A failing move is logged, recorded and reported as an event; the rest of
/// the plan still runs.
pub struct PlanExecutor<'a> {
    events: &'a EventSender,
}

impl<'a> PlanExecutor<'a> {
    pub fn new(events: &'a EventSender) -> Self {
        Self { events }
    }

    /// Execute a directory's naming plan
    pub fn execute(&self, plan: &NamingPlan) -> ExecutionResult {
        let start = Instant::now();
        let mut result = ExecutionResult::default();
        let mut moves: Vec<&PlannedMove> = plan.moves().filter(|m| !m.is_noop()).collect();

        if plan.has_quarantine_moves() && !plan.quarantine_dir.is_dir() {
            match fs::create_dir_all(&plan.quarantine_dir) {
                Ok(()) => result.folders_created += 1,
                Err(source) => {
                    let error = MoveError::CreateDir {
                        path: plan.quarantine_dir.clone(),
                        source,
                    };
                    warn!("{}", error);
                    result.errors.push(error.to_string());

                    // Quarantine moves cannot happen; renames in place still can.
                    moves.retain(|m| {
                        if m.kind == MoveKind::Quarantine {
                            self.fail(m, &error.to_string(), &mut result);
                            false
                        } else {
                            true
                        }
                    });
                }
            }
        }

        self.apply(&moves, &mut result);
        result.duration_ms = start.elapsed().as_millis() as u64;
        result
    }

    /// Execute a renumbering plan
    pub fn execute_renumber(&self, plan: &RenumberPlan) -> ExecutionResult {
        let start = Instant::now();
        let mut result = ExecutionResult::default();
        let moves: Vec<&PlannedMove> = plan.moves.iter().filter(|m| !m.is_noop()).collect();

        self.apply(&moves, &mut result);
        result.duration_ms = start.elapsed().as_millis() as u64;
        result
    }

    fn apply(&self, moves: &[&PlannedMove], result: &mut ExecutionResult) {
        let sources: HashSet<&Path> = moves.iter().map(|m| m.from.as_path()).collect();
        let overlapping = moves.iter().any(|m| sources.contains(m.to.as_path()));

        if overlapping {
            self.apply_staged(moves, result);
        } else {
            for planned in moves {
                match rename_checked(&planned.from, &planned.to) {
                    Ok(()) => self.succeed(planned, result),
                    Err(error) => self.fail(planned, &error.to_string(), result),
                }
            }
        }
    }

    /// Two-phase rename: every source to a temporary name, then every
    /// temporary name to its target.
    fn apply_staged(&self, moves: &[&PlannedMove], result: &mut ExecutionResult) {
        let mut reserved: HashSet<PathBuf> = HashSet::new();
        let mut staged: Vec<(&PlannedMove, PathBuf)> = Vec::with_capacity(moves.len());

        for (position, planned) in moves.iter().enumerate() {
            let directory = planned.from.parent().unwrap_or_else(|| Path::new("."));
            let temp = match temp_path(directory, position, &reserved, &DiskProbe) {
                Ok(temp) => temp,
                Err(error) => {
                    self.fail(planned, &error.to_string(), result);
                    continue;
                }
            };

            match rename_checked(&planned.from, &temp) {
                Ok(()) => {
                    reserved.insert(temp.clone());
                    staged.push((*planned, temp));
                }
                Err(error) => self.fail(planned, &error.to_string(), result),
            }
        }

        for (planned, temp) in staged {
            match rename_checked(&temp, &planned.to) {
                Ok(()) => self.succeed(planned, result),
                Err(error) => {
                    // Put the file back under its old name when that is still free.
                    let restored = !DiskProbe.exists(&planned.from)
                        && fs::rename(&temp, &planned.from).is_ok();
                    let message = if restored {
                        error.to_string()
                    } else {
                        format!("{} (file left at {})", error, temp.display())
                    };
                    self.fail(planned, &message, result);
                }
            }
        }
    }

    fn succeed(&self, planned: &PlannedMove, result: &mut ExecutionResult) {
        result.files_moved += 1;
        self.events.send(Event::Move(MoveEvent::Moved {
            from: planned.from.clone(),
            to: planned.to.clone(),
        }));
    }

    fn fail(&self, planned: &PlannedMove, message: &str, result: &mut ExecutionResult) {
        warn!("Move failed: {}", message);
        result.files_failed += 1;
        result.errors.push(message.to_string());
        self.events.send(Event::Move(MoveEvent::Failed {
            from: planned.from.clone(),
            to: planned.to.clone(),
            message: message.to_string(),
        }));
    }
}

/// Rename `from` to `to`, refusing to replace an existing file
fn rename_checked(from: &Path, to: &Path) -> Result<(), MoveError> {
    if DiskProbe.exists(to) {
        return Err(MoveError::TargetExists {
            from: from.to_path_buf(),
            to: to.to_path_buf(),
        });
    }

    fs::rename(from, to).map_err(|source| MoveError::Rename {
        from: from.to_path_buf(),
        to: to.to_path_buf(),
        source,
    })
}

/// `__temp__{position}`, bumped with `_{n}` while taken
fn temp_path<P: PathProbe>(
    directory: &Path,
    position: usize,
    reserved: &HashSet<PathBuf>,
    probe: &P,
) -> Result<PathBuf, MoveError> {
    let base = format!("{TEMP_PREFIX}{position}");
    let mut candidate = directory.join(&base);

    for n in 1..=MAX_TEMP_ATTEMPTS {
        if !reserved.contains(&candidate) && !probe.exists(&candidate) {
            return Ok(candidate);
        }
        candidate = directory.join(format!("{base}_{n}"));
    }

    Err(MoveError::Staging {
        path: directory.join(base),
        directory: directory.to_path_buf(),
    })
}
