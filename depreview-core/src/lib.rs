//! depreview core - request reviewers for dependency changes
//!
//! This crate holds everything a run needs apart from the GitHub client:
//! the event payload model, the manifest diff, base revision retrieval,
//! manifest loaders, owner resolution and the workflow that ties them
//! together.

pub mod config;
pub mod dependency;
pub mod error;
pub mod event;
pub mod git;
pub mod loader;
pub mod output;
pub mod owners;
pub mod review;
pub mod workflow;

pub use config::ActionConfig;
pub use dependency::{diff, Dependency, DependencyDiff};
pub use error::{Error, Result};
pub use event::{Event, PullRequestRef, RepoRef};
pub use git::{GitRevisionFetcher, RevisionFetcher};
pub use loader::{DependencyLoader, LoaderRegistry};
pub use output::ActionOutput;
pub use owners::{ConfigOwnerResolver, OwnerMap, OwnerResolver, ResolveRequest};
pub use review::{filter_reviewers, ReviewerRequester};
pub use workflow::{ReviewWorkflow, RunOutcome};
