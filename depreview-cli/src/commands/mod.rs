//! CLI command implementations

pub mod diff;
pub mod run;

pub use diff::DiffArgs;
pub use run::RunArgs;
