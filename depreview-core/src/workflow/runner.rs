//! Single-run orchestration

use std::sync::Arc;

use tracing::{debug, info};

use super::RunOutcome;
use crate::config::ActionConfig;
use crate::event::{Event, PullRequestRef, RepoRef};
use crate::git::RevisionFetcher;
use crate::loader::DependencyLoader;
use crate::owners::{flatten_owners, OwnerResolver, ResolveRequest};
use crate::review::{filter_reviewers, ReviewerRequester};
use crate::{DependencyDiff, Error, Result};

/// Requests reviewers for the dependency changes in a pull request
///
/// Every external capability is injected, so the workflow itself never
/// touches the environment, the filesystem lookup for loaders, or the network.
pub struct ReviewWorkflow {
    fetcher: Arc<dyn RevisionFetcher>,
    loader: Arc<dyn DependencyLoader>,
    resolver: Arc<dyn OwnerResolver>,
    requester: Arc<dyn ReviewerRequester>,
}

impl ReviewWorkflow {
    pub fn new(
        fetcher: Arc<dyn RevisionFetcher>,
        loader: Arc<dyn DependencyLoader>,
        resolver: Arc<dyn OwnerResolver>,
        requester: Arc<dyn ReviewerRequester>,
    ) -> Self {
        Self {
            fetcher,
            loader,
            resolver,
            requester,
        }
    }

    /// Run once for `event`
    ///
    /// The first failing step aborts the run; nothing is retried.
    pub async fn run(&self, config: &ActionConfig, event: &Event) -> Result<RunOutcome> {
        let Some(pr) = event.pull_request.as_ref() else {
            info!("Event is not a pull request, skipping");
            return Ok(RunOutcome::NotAPullRequest);
        };

        let repo = match event.repo_ref() {
            Some(repo) => repo,
            None => match config.repository.as_deref() {
                Some(slug) => RepoRef::parse(slug)?,
                None => {
                    return Err(Error::Config(
                        "Event has no repository and GITHUB_REPOSITORY is not set".to_string(),
                    ))
                }
            },
        };
        let target = PullRequestRef::new(repo, pr.number);

        info!(
            pull_request = %target,
            base = %pr.base.ref_name,
            manifest = %config.dependency_file.display(),
            loader = self.loader.name(),
            "Checking dependency changes"
        );

        let base_file = self
            .fetcher
            .fetch_base(&pr.base.ref_name, &config.dependency_file)
            .await?;

        let current = self.loader.load(&config.dependency_file).await?;
        let base = self.loader.load(&base_file).await?;

        let diff = DependencyDiff::compute(&base, &current);
        if diff.is_empty() {
            info!("No dependency changes");
            return Ok(RunOutcome::NoChangedDependencies);
        }

        info!(
            count = diff.len(),
            added = ?diff.added,
            removed = ?diff.removed,
            changed = ?diff.changed,
            "Dependencies changed"
        );

        let changed = diff.names();
        let owners = self
            .resolver
            .resolve(ResolveRequest {
                config_file: config.config_file.as_deref(),
                dependencies: &changed,
                dependency_file: &config.dependency_file,
                loader: self.loader.as_ref(),
            })
            .await?;
        debug!(?owners, "Resolved owners");

        let excluded = pr.excluded_reviewers();
        let reviewers = filter_reviewers(flatten_owners(&owners), &excluded);

        if reviewers.is_empty() {
            info!(excluded = ?excluded, "No reviewers left to request");
            return Ok(RunOutcome::NoReviewers {
                changed: changed.len(),
            });
        }

        if config.dry_run {
            info!(?reviewers, "Dry run, not requesting reviewers");
            return Ok(RunOutcome::DryRun {
                changed: changed.len(),
                reviewers,
            });
        }

        self.requester
            .request_reviewers(&target, &reviewers)
            .await?;
        info!(pull_request = %target, ?reviewers, "Requested reviewers");

        Ok(RunOutcome::Requested {
            changed: changed.len(),
            reviewers,
        })
    }
}

impl std::fmt::Debug for ReviewWorkflow {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("ReviewWorkflow")
            .field("loader", &self.loader.name())
            .finish_non_exhaustive()
    }
}
