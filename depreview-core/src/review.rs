//! Reviewer selection and requests

use std::collections::{BTreeSet, HashSet};

use async_trait::async_trait;

use crate::event::PullRequestRef;
use crate::Result;

/// Adds reviewers to a pull request
#[async_trait]
pub trait ReviewerRequester: Send + Sync {
    /// Request `reviewers` on `pull_request`; called only with a non-empty list
    async fn request_reviewers(&self, pull_request: &PullRequestRef, reviewers: &[String])
        -> Result<()>;
}

/// Candidates that are not excluded, sorted
pub fn filter_reviewers<I>(candidates: I, excluded: &HashSet<String>) -> Vec<String>
where
    I: IntoIterator<Item = String>,
{
    candidates
        .into_iter()
        .filter(|reviewer| !excluded.contains(reviewer))
        .collect::<BTreeSet<_>>()
        .into_iter()
        .collect()
}
