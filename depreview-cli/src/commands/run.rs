//! Run command - request reviewers for the triggering pull request

use std::path::PathBuf;
use std::sync::Arc;

use async_trait::async_trait;
use clap::Args;
use depreview_core::{
    ActionConfig, ActionOutput, ConfigOwnerResolver, Event, GitRevisionFetcher, LoaderRegistry,
    PullRequestRef, ReviewWorkflow, ReviewerRequester, RunOutcome,
};
use depreview_github::GitHubClient;

/// Arguments for the run command
///
/// Every flag falls back to the variable the Actions runner sets for it.
#[derive(Args, Debug)]
pub struct RunArgs {
    /// Owners config file (defaults to dependency-owners.json next to the manifest)
    #[arg(long, env = "INPUT_CONFIG-FILE")]
    pub config_file: Option<PathBuf>,

    /// Dependency manifest to diff
    #[arg(long, env = "INPUT_DEPENDENCY-FILE")]
    pub dependency_file: Option<PathBuf>,

    /// Token used to request reviewers
    #[arg(long, env = "INPUT_GITHUB-TOKEN", hide_env_values = true)]
    pub github_token: Option<String>,

    /// Loader: a built-in name (npm, cargo, pip) or the path of a loader executable
    #[arg(long, env = "INPUT_LOADER")]
    pub loader: Option<String>,

    /// Triggering event payload
    #[arg(long, env = "GITHUB_EVENT_PATH")]
    pub event_path: Option<PathBuf>,

    /// Workspace root, searched for loader executables after the current directory
    #[arg(long, env = "GITHUB_WORKSPACE")]
    pub workspace: Option<PathBuf>,

    /// Directory used to stage the base revision
    #[arg(long, env = "RUNNER_TEMP")]
    pub temp_dir: Option<PathBuf>,

    /// File receiving step outputs
    #[arg(long, env = "GITHUB_OUTPUT")]
    pub output_file: Option<PathBuf>,

    /// GitHub API base URL
    #[arg(long, env = "GITHUB_API_URL")]
    pub api_url: Option<String>,

    /// Repository (owner/repo) used when the payload has none
    #[arg(long, env = "GITHUB_REPOSITORY")]
    pub repository: Option<String>,

    /// Path to the git executable
    #[arg(long, env = "DEPREVIEW_GIT", default_value = "git")]
    pub git: String,

    /// Compute reviewers without requesting them
    #[arg(long)]
    pub dry_run: bool,
}

impl RunArgs {
    /// Build the run configuration from the parsed arguments
    pub fn to_config(&self) -> ActionConfig {
        ActionConfig::new(
            self.dependency_file.clone().unwrap_or_default(),
            self.loader.clone().unwrap_or_default(),
            self.github_token.clone().unwrap_or_default(),
            self.event_path.clone().unwrap_or_default(),
        )
        .with_config_file(self.config_file.clone())
        .with_workspace(self.workspace.clone())
        .with_temp_dir(self.temp_dir.clone())
        .with_output_file(self.output_file.clone())
        .with_api_url(self.api_url.clone())
        .with_repository(self.repository.clone())
        .with_git_path(self.git.clone())
        .with_dry_run(self.dry_run)
    }

    /// Execute the run command
    pub async fn execute(&self, verbose: bool) -> anyhow::Result<()> {
        let config = self.to_config();
        config.validate()?;

        if verbose {
            tracing::debug!(?config, "Run configuration");
        }

        let output = ActionOutput::new(config.output_file.clone());
        let event = Event::load(&config.event_path)?;

        if event.pull_request.is_none() {
            let outcome = RunOutcome::NotAPullRequest;
            output.set_reviewers(outcome.reviewers())?;
            tracing::info!(%outcome, "Done");
            return Ok(());
        }

        let workdir = std::env::current_dir()?;
        let mut search_dirs = vec![workdir.clone()];
        search_dirs.extend(config.workspace.clone());

        let loader = LoaderRegistry::with_defaults().resolve(&config.loader, &search_dirs)?;
        let fetcher = GitRevisionFetcher::new(&workdir, &config.temp_dir)
            .with_git_path(config.git_path.clone());

        let requester: Arc<dyn ReviewerRequester> = if config.github_token.trim().is_empty() {
            Arc::new(DisabledRequester)
        } else {
            Arc::new(GitHubClient::new(
                config.github_token.clone(),
                config.api_url.as_deref(),
            )?)
        };

        let workflow = ReviewWorkflow::new(
            Arc::new(fetcher),
            loader,
            Arc::new(ConfigOwnerResolver::new()),
            requester,
        );

        let outcome = workflow.run(&config, &event).await?;
        output.set_reviewers(outcome.reviewers())?;

        tracing::info!(%outcome, changed = outcome.changed(), "Done");
        Ok(())
    }
}

/// Stands in for the GitHub client when no token is configured (dry runs)
struct DisabledRequester;

#[async_trait]
impl ReviewerRequester for DisabledRequester {
    async fn request_reviewers(
        &self,
        pull_request: &PullRequestRef,
        _reviewers: &[String],
    ) -> depreview_core::Result<()> {
        Err(depreview_core::Error::Config(format!(
            "Cannot request reviewers on {} without a GitHub token",
            pull_request
        )))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::TempDir;

    fn args() -> RunArgs {
        RunArgs {
            config_file: Some(PathBuf::new()),
            dependency_file: Some(PathBuf::from("package.json")),
            github_token: Some(String::new()),
            loader: Some("npm".to_string()),
            event_path: None,
            workspace: None,
            temp_dir: None,
            output_file: None,
            api_url: None,
            repository: None,
            git: "git".to_string(),
            dry_run: true,
        }
    }

    #[test]
    fn test_to_config_treats_empty_inputs_as_unset() {
        let config = args().to_config();
        assert!(config.config_file.is_none());
        assert_eq!(config.dependency_file, PathBuf::from("package.json"));
        assert_eq!(config.loader, "npm");
        assert!(config.dry_run);
    }

    #[tokio::test]
    async fn test_missing_event_path_fails_validation() {
        let err = args().execute(false).await.unwrap_err();
        assert!(err.to_string().contains("GITHUB_EVENT_PATH"));
    }

    #[tokio::test]
    async fn test_non_pull_request_event_reports_empty_reviewers() {
        let temp = TempDir::new().unwrap();
        let event_path = temp.path().join("event.json");
        let output_path = temp.path().join("output");
        std::fs::write(&event_path, r#"{ "ref": "refs/heads/main" }"#).unwrap();

        let args = RunArgs {
            event_path: Some(event_path),
            output_file: Some(output_path.clone()),
            loader: Some("not-a-loader".to_string()),
            ..args()
        };
        args.execute(false).await.unwrap();

        assert_eq!(
            std::fs::read_to_string(&output_path).unwrap(),
            "reviewers=[]\n"
        );
    }

    #[tokio::test]
    async fn test_disabled_requester_refuses() {
        let target = PullRequestRef {
            owner: "acme".to_string(),
            repo: "widgets".to_string(),
            number: 1,
        };
        let err = DisabledRequester
            .request_reviewers(&target, &["x".to_string()])
            .await
            .unwrap_err();
        assert!(err.to_string().contains("without a GitHub token"));
    }
}
