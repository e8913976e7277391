//! Triggering event payload
//!
//! Only the fields needed to diff and request reviewers are modelled; unknown
//! fields in the payload are ignored.

use std::collections::HashSet;
use std::path::Path;

use serde::Deserialize;
use tracing::debug;

use crate::{Error, Result};

/// A GitHub user reference
#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
pub struct User {
    pub login: String,
}

/// Base branch of a pull request
#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
pub struct BaseRef {
    #[serde(rename = "ref")]
    pub ref_name: String,
}

/// Pull request section of the event payload
#[derive(Debug, Clone, Deserialize)]
pub struct PullRequest {
    pub base: BaseRef,
    pub number: u64,
    #[serde(default)]
    pub requested_reviewers: Vec<User>,
    pub user: User,
}

impl PullRequest {
    /// Identities that must not be requested again: the author and anyone
    /// already requested
    pub fn excluded_reviewers(&self) -> HashSet<String> {
        self.requested_reviewers
            .iter()
            .map(|u| u.login.clone())
            .chain(std::iter::once(self.user.login.clone()))
            .collect()
    }
}

/// Repository section of the event payload
#[derive(Debug, Clone, Deserialize)]
pub struct Repository {
    pub name: String,
    pub owner: User,
}

/// The triggering event
#[derive(Debug, Clone, Default, Deserialize)]
pub struct Event {
    pub pull_request: Option<PullRequest>,
    pub repository: Option<Repository>,
}

impl Event {
    /// Read the event payload from a JSON file
    pub fn load(path: &Path) -> Result<Self> {
        debug!(path = %path.display(), "Reading event payload");
        let contents = std::fs::read_to_string(path).map_err(|e| {
            Error::Config(format!(
                "Failed to read event payload {}: {}",
                path.display(),
                e
            ))
        })?;
        Self::parse(&contents)
    }

    /// Parse an event payload
    pub fn parse(contents: &str) -> Result<Self> {
        Ok(serde_json::from_str(contents)?)
    }

    /// The repository the event belongs to, if present in the payload
    pub fn repo_ref(&self) -> Option<RepoRef> {
        self.repository.as_ref().map(|r| RepoRef {
            owner: r.owner.login.clone(),
            repo: r.name.clone(),
        })
    }
}

/// Repository owner and name
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RepoRef {
    pub owner: String,
    pub repo: String,
}

impl RepoRef {
    /// Parse an `owner/repo` slug, as found in `GITHUB_REPOSITORY`
    pub fn parse(slug: &str) -> Result<Self> {
        let slug = slug.trim();
        match slug.split_once('/') {
            Some((owner, repo)) if !owner.is_empty() && !repo.is_empty() && !repo.contains('/') => {
                Ok(Self {
                    owner: owner.to_string(),
                    repo: repo.trim_end_matches(".git").to_string(),
                })
            }
            _ => Err(Error::Config(format!(
                "Invalid repository format: {}. Expected owner/repo",
                slug
            ))),
        }
    }
}

impl std::fmt::Display for RepoRef {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}/{}", self.owner, self.repo)
    }
}

/// Identifies a pull request for the reviewer request call
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PullRequestRef {
    pub owner: String,
    pub repo: String,
    pub number: u64,
}

impl PullRequestRef {
    pub fn new(repo: RepoRef, number: u64) -> Self {
        Self {
            owner: repo.owner,
            repo: repo.repo,
            number,
        }
    }
}

impl std::fmt::Display for PullRequestRef {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}/{}#{}", self.owner, self.repo, self.number)
    }
}
