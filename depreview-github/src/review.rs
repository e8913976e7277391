//! Pull request reviewer requests

use async_trait::async_trait;
use depreview_core::{PullRequestRef, ReviewerRequester};
use tracing::debug;

use crate::{Error, GitHubClient, Result};

impl GitHubClient {
    /// Request `reviewers` on a pull request
    ///
    /// Users only; team reviewers are never requested.
    pub async fn request_reviewers(
        &self,
        pull_request: &PullRequestRef,
        reviewers: &[String],
    ) -> Result<()> {
        debug!(
            pull_request = %pull_request,
            ?reviewers,
            "Requesting reviewers"
        );

        self.client()
            .pulls(&pull_request.owner, &pull_request.repo)
            .request_reviews(pull_request.number, reviewers.to_vec(), Vec::<String>::new())
            .await
            .map_err(|e| classify(pull_request, e))?;

        Ok(())
    }
}

/// Map API failures onto the errors callers act on
fn classify(pull_request: &PullRequestRef, err: octocrab::Error) -> Error {
    let mapped = match &err {
        octocrab::Error::GitHub { source, .. } => classify_message(pull_request, &source.message),
        _ => None,
    };
    mapped.unwrap_or(Error::Api(err))
}

fn classify_message(pull_request: &PullRequestRef, message: &str) -> Option<Error> {
    if message.contains("Not Found") {
        Some(Error::PrNotFound(pull_request.to_string()))
    } else if message.contains("Bad credentials") {
        Some(Error::Auth("Invalid GitHub token".to_string()))
    } else if message.contains("Validation Failed") || message.contains("Reviews may only") {
        Some(Error::Rejected {
            pull_request: pull_request.to_string(),
            message: message.to_string(),
        })
    } else {
        None
    }
}

#[async_trait]
impl ReviewerRequester for GitHubClient {
    async fn request_reviewers(
        &self,
        pull_request: &PullRequestRef,
        reviewers: &[String],
    ) -> depreview_core::Result<()> {
        GitHubClient::request_reviewers(self, pull_request, reviewers)
            .await
            .map_err(Into::into)
    }
}
