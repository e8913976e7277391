//! Run configuration
//!
//! All inputs are gathered once at the entry point into an [`ActionConfig`]
//! and passed down by reference. Nothing below the entry point reads the
//! process environment.

use std::path::PathBuf;

use crate::{Error, Result};

/// Default git executable
pub const DEFAULT_GIT: &str = "git";

/// Owners config used when no config file is given, next to the manifest
pub const DEFAULT_OWNERS_FILE: &str = "dependency-owners.json";

/// Inputs for a single run
#[derive(Clone)]
pub struct ActionConfig {
    /// Owners config file; `None` selects the default next to the manifest
    pub config_file: Option<PathBuf>,
    /// Manifest to diff, relative to the working directory
    pub dependency_file: PathBuf,
    /// GitHub token used for the reviewer request
    pub github_token: String,
    /// Loader identifier (built-in name or executable path)
    pub loader: String,
    /// Path to the triggering event's JSON payload
    pub event_path: PathBuf,
    /// Workspace root, searched for loader executables
    pub workspace: Option<PathBuf>,
    /// Root directory for staging the base revision
    pub temp_dir: PathBuf,
    /// File that receives step outputs
    pub output_file: Option<PathBuf>,
    /// GitHub API base URL (GitHub Enterprise)
    pub api_url: Option<String>,
    /// `owner/repo` fallback when the payload has no repository
    pub repository: Option<String>,
    /// git executable
    pub git_path: String,
    /// Compute reviewers without requesting them
    pub dry_run: bool,
}

impl std::fmt::Debug for ActionConfig {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("ActionConfig")
            .field("config_file", &self.config_file)
            .field("dependency_file", &self.dependency_file)
            .field("github_token", &"<redacted>")
            .field("loader", &self.loader)
            .field("event_path", &self.event_path)
            .field("workspace", &self.workspace)
            .field("temp_dir", &self.temp_dir)
            .field("output_file", &self.output_file)
            .field("api_url", &self.api_url)
            .field("repository", &self.repository)
            .field("git_path", &self.git_path)
            .field("dry_run", &self.dry_run)
            .finish()
    }
}

impl ActionConfig {
    /// Create a configuration with the required inputs and defaults for the rest
    pub fn new(
        dependency_file: impl Into<PathBuf>,
        loader: impl Into<String>,
        github_token: impl Into<String>,
        event_path: impl Into<PathBuf>,
    ) -> Self {
        Self {
            config_file: None,
            dependency_file: dependency_file.into(),
            github_token: github_token.into(),
            loader: loader.into(),
            event_path: event_path.into(),
            workspace: None,
            temp_dir: std::env::temp_dir(),
            output_file: None,
            api_url: None,
            repository: None,
            git_path: DEFAULT_GIT.to_string(),
            dry_run: false,
        }
    }

    /// Set the owners config file; an empty path keeps the default
    pub fn with_config_file(mut self, path: Option<PathBuf>) -> Self {
        self.config_file = path.filter(|p| !p.as_os_str().is_empty());
        self
    }

    pub fn with_workspace(mut self, workspace: Option<PathBuf>) -> Self {
        self.workspace = workspace.filter(|p| !p.as_os_str().is_empty());
        self
    }

    /// Set the staging root; `None` keeps the OS temp dir
    pub fn with_temp_dir(mut self, temp_dir: Option<PathBuf>) -> Self {
        if let Some(dir) = temp_dir.filter(|p| !p.as_os_str().is_empty()) {
            self.temp_dir = dir;
        }
        self
    }

    pub fn with_output_file(mut self, path: Option<PathBuf>) -> Self {
        self.output_file = path.filter(|p| !p.as_os_str().is_empty());
        self
    }

    pub fn with_api_url(mut self, url: Option<String>) -> Self {
        self.api_url = url.filter(|u| !u.trim().is_empty());
        self
    }

    pub fn with_repository(mut self, repository: Option<String>) -> Self {
        self.repository = repository.filter(|r| !r.trim().is_empty());
        self
    }

    pub fn with_git_path(mut self, git_path: impl Into<String>) -> Self {
        self.git_path = git_path.into();
        self
    }

    pub fn with_dry_run(mut self, dry_run: bool) -> Self {
        self.dry_run = dry_run;
        self
    }

    /// Check required inputs
    pub fn validate(&self) -> Result<()> {
        if self.dependency_file.as_os_str().is_empty() {
            return Err(Error::Config("Input 'dependency-file' is required".to_string()));
        }

        if self.loader.trim().is_empty() {
            return Err(Error::Config("Input 'loader' is required".to_string()));
        }

        if self.github_token.trim().is_empty() && !self.dry_run {
            return Err(Error::Config("Input 'github-token' is required".to_string()));
        }

        if self.event_path.as_os_str().is_empty() {
            return Err(Error::Config(
                "GITHUB_EVENT_PATH is not set; run inside a GitHub Actions job".to_string(),
            ));
        }

        if self.git_path.trim().is_empty() {
            return Err(Error::Config("git executable must not be empty".to_string()));
        }

        Ok(())
    }
}
