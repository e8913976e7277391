//! Reviewer request workflow
//!
//! Drives a single run: event check, base revision fetch, manifest diff,
//! owner resolution and the reviewer request.

mod outcome;
mod runner;

pub use outcome::RunOutcome;
pub use runner::ReviewWorkflow;
