//! Base revision retrieval

use std::path::{Component, Path, PathBuf};

use async_trait::async_trait;
use tokio::process::Command;
use tracing::{debug, info};

use crate::config::DEFAULT_GIT;
use crate::{Error, Result};

/// Directory under the staging root that holds base revisions
const STAGING_SUBDIR: &str = "depreview";

/// Retrieves a file as of the tip of a base branch
#[async_trait]
pub trait RevisionFetcher: Send + Sync {
    /// Fetch `base_ref` and stage `dependency_file` as it exists there
    ///
    /// Returns the path of the staged copy, which never coincides with the
    /// working copy of `dependency_file`.
    async fn fetch_base(&self, base_ref: &str, dependency_file: &Path) -> Result<PathBuf>;
}

/// [`RevisionFetcher`] backed by the git executable
#[derive(Debug, Clone)]
pub struct GitRevisionFetcher {
    git_path: String,
    workdir: PathBuf,
    staging_root: PathBuf,
    remote: String,
}

impl GitRevisionFetcher {
    /// Create a fetcher operating in `workdir` and staging under `staging_root`
    pub fn new(workdir: impl Into<PathBuf>, staging_root: impl Into<PathBuf>) -> Self {
        Self {
            git_path: DEFAULT_GIT.to_string(),
            workdir: workdir.into(),
            staging_root: staging_root.into(),
            remote: "origin".to_string(),
        }
    }

    /// Set a custom path to the git executable
    pub fn with_git_path(mut self, path: impl Into<String>) -> Self {
        self.git_path = path.into();
        self
    }

    /// Path the base revision of `dependency_file` is staged at
    pub fn staged_path(&self, dependency_file: &Path) -> Result<PathBuf> {
        let file_name = dependency_file.file_name().ok_or_else(|| {
            Error::Config(format!(
                "Dependency file has no file name: {}",
                dependency_file.display()
            ))
        })?;

        // The prefix keeps the staged name distinct from the manifest even
        // when the staging root is the working directory.
        let mut staged_name = std::ffi::OsString::from("base-");
        staged_name.push(file_name);

        Ok(self
            .absolute(&self.staging_root)
            .join(STAGING_SUBDIR)
            .join(staged_name))
    }

    /// Spelling of `path` for `git show <rev>:<path>`
    ///
    /// git reads a bare path from the repository root but a `./` path from
    /// the current directory, and `workdir` may be a subdirectory.
    fn show_path(&self, path: &Path) -> Result<String> {
        let relative = if path.is_absolute() {
            path.strip_prefix(&self.workdir).map_err(|_| {
                Error::Config(format!(
                    "Dependency file {} is outside the working directory {}",
                    path.display(),
                    self.workdir.display()
                ))
            })?
        } else {
            path
        };

        let mut parts = Vec::new();
        for component in relative.components() {
            match component {
                Component::Normal(part) => parts.push(part.to_string_lossy().into_owned()),
                Component::CurDir => {}
                _ => {
                    return Err(Error::Config(format!(
                        "Dependency file {} must stay inside the repository",
                        path.display()
                    )))
                }
            }
        }

        if parts.is_empty() {
            return Err(Error::Config("Dependency file path is empty".to_string()));
        }

        Ok(format!("./{}", parts.join("/")))
    }

    fn absolute(&self, path: &Path) -> PathBuf {
        if path.is_absolute() {
            path.to_path_buf()
        } else {
            self.workdir.join(path)
        }
    }

    async fn git(&self, args: &[&str]) -> Result<Vec<u8>> {
        debug!(git = %self.git_path, ?args, "Running git");

        let output = Command::new(&self.git_path)
            .args(args)
            .current_dir(&self.workdir)
            .output()
            .await
            .map_err(|e| {
                if e.kind() == std::io::ErrorKind::NotFound {
                    Error::Git(format!("git executable not found at '{}'", self.git_path))
                } else {
                    Error::Git(format!("Failed to run git {}: {}", args.join(" "), e))
                }
            })?;

        if !output.status.success() {
            let stderr = String::from_utf8_lossy(&output.stderr);
            return Err(Error::Git(format!(
                "git {} failed ({}): {}",
                args.join(" "),
                output.status,
                stderr.trim()
            )));
        }

        Ok(output.stdout)
    }
}

#[async_trait]
impl RevisionFetcher for GitRevisionFetcher {
    async fn fetch_base(&self, base_ref: &str, dependency_file: &Path) -> Result<PathBuf> {
        let staged = self.staged_path(dependency_file)?;
        let show_path = self.show_path(dependency_file)?;

        self.git(&["fetch", self.remote.as_str(), base_ref]).await?;

        let spec = format!("{}/{}:{}", self.remote, base_ref, show_path);
        let contents = self.git(&["show", spec.as_str()]).await?;

        if let Some(parent) = staged.parent() {
            tokio::fs::create_dir_all(parent).await?;
        }
        tokio::fs::write(&staged, &contents).await?;

        info!(
            base_ref,
            file = %show_path,
            staged = %staged.display(),
            bytes = contents.len(),
            "Staged base revision"
        );

        Ok(staged)
    }
}
