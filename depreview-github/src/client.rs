//! GitHub API client using octocrab

use crate::{Error, Result};
use octocrab::Octocrab;
use tracing::info;

/// Public GitHub API endpoint
pub const DEFAULT_API_URL: &str = "https://api.github.com";

/// GitHub API client for pull request operations
pub struct GitHubClient {
    client: Octocrab,
    api_url: String,
}

impl GitHubClient {
    /// Create a client authenticated with `token`
    ///
    /// `api_url` selects a GitHub Enterprise endpoint; `None` uses github.com.
    pub fn new(token: impl Into<String>, api_url: Option<&str>) -> Result<Self> {
        let token = token.into();
        let token = token.trim();
        if token.is_empty() {
            return Err(Error::Auth(
                "GitHub token is empty. Pass the 'github-token' input".to_string(),
            ));
        }

        let api_url = normalize_api_url(api_url.unwrap_or(DEFAULT_API_URL))?;

        let client = Octocrab::builder()
            .personal_token(token.to_string())
            .base_uri(api_url.as_str())
            .map_err(|e| Error::Parse(format!("Invalid GitHub API URL {}: {}", api_url, e)))?
            .build()
            .map_err(|e| Error::Auth(format!("Failed to create GitHub client: {}", e)))?;

        info!(api_url = %api_url, "Created GitHub client");

        Ok(Self { client, api_url })
    }

    /// API endpoint this client talks to
    pub fn api_url(&self) -> &str {
        &self.api_url
    }

    /// Get the underlying octocrab client
    pub fn client(&self) -> &Octocrab {
        &self.client
    }
}

impl std::fmt::Debug for GitHubClient {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("GitHubClient")
            .field("api_url", &self.api_url)
            .finish_non_exhaustive()
    }
}

/// Validate an API base URL and strip any trailing slash
fn normalize_api_url(raw: &str) -> Result<String> {
    let url = url::Url::parse(raw.trim())
        .map_err(|e| Error::Parse(format!("Invalid GitHub API URL {}: {}", raw, e)))?;

    if url.scheme() != "https" && url.scheme() != "http" {
        return Err(Error::Parse(format!(
            "GitHub API URL must be http(s): {}",
            raw
        )));
    }

    Ok(url.as_str().trim_end_matches('/').to_string())
}
