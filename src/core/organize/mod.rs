//! Rename planning and execution.
//!
//! The planner decides every name for a directory up front; the executor
//! applies the plan without ever overwriting an existing file.

mod executor;
mod planner;
mod types;

pub use executor::PlanExecutor;
pub use planner::{name_stem, plan_renumber, DiskProbe, NamingPlanner, PathProbe, RenumberPlan};
pub use types::*;
