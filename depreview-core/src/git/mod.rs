//! Git operations for depreview
//!
//! Retrieves the dependency manifest as it exists on the pull request's base
//! branch by shelling out to the git executable.

mod revision;

pub use revision::{GitRevisionFetcher, RevisionFetcher};
