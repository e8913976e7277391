//! Executable loader
//!
//! Runs an external program with the manifest path as its only argument. The
//! program prints a JSON array of `{"name": ..., "version": ...}` objects to
//! stdout and exits 0.

use std::path::{Path, PathBuf};

use async_trait::async_trait;
use tokio::process::Command;
use tracing::debug;

use super::{dedupe, DependencyLoader};
use crate::{Dependency, Error, Result};

/// Loader backed by an external executable
#[derive(Debug, Clone)]
pub struct CommandLoader {
    program: PathBuf,
    name: String,
}

impl CommandLoader {
    pub fn new(program: impl Into<PathBuf>) -> Self {
        let program = program.into();
        let name = program.to_string_lossy().into_owned();
        Self { program, name }
    }
}

#[async_trait]
impl DependencyLoader for CommandLoader {
    fn name(&self) -> &str {
        &self.name
    }

    async fn load(&self, path: &Path) -> Result<Vec<Dependency>> {
        debug!(program = %self.name, manifest = %path.display(), "Running loader");

        let output = Command::new(&self.program)
            .arg(path)
            .output()
            .await
            .map_err(|e| Error::load(path, format!("failed to run loader {}: {}", self.name, e)))?;

        if !output.status.success() {
            let stderr = String::from_utf8_lossy(&output.stderr);
            return Err(Error::load(
                path,
                format!(
                    "loader {} exited with {}: {}",
                    self.name,
                    output.status,
                    stderr.trim()
                ),
            ));
        }

        let deps: Vec<Dependency> = serde_json::from_slice(&output.stdout).map_err(|e| {
            Error::load(path, format!("loader {} printed invalid output: {}", self.name, e))
        })?;

        Ok(dedupe(path, deps))
    }
}

#[cfg(all(test, unix))]
mod tests {
    use super::*;
    use std::os::unix::fs::PermissionsExt;
    use tempfile::TempDir;

    fn script(dir: &Path, body: &str) -> PathBuf {
        let path = dir.join("loader");
        std::fs::write(&path, format!("#!/bin/sh\n{}\n", body)).unwrap();
        std::fs::set_permissions(&path, std::fs::Permissions::from_mode(0o755)).unwrap();
        path
    }

    #[tokio::test]
    async fn test_load_parses_stdout() {
        let temp = TempDir::new().unwrap();
        let program = script(
            temp.path(),
            r#"echo "[{\"name\": \"$1\", \"version\": \"1\"}, {\"name\": \"b\", \"version\": \"2\"}]""#,
        );

        let deps = CommandLoader::new(program)
            .load(Path::new("deps.lock"))
            .await
            .unwrap();
        assert_eq!(
            deps,
            vec![Dependency::new("deps.lock", "1"), Dependency::new("b", "2")]
        );
    }

    #[tokio::test]
    async fn test_nonzero_exit_is_load_error() {
        let temp = TempDir::new().unwrap();
        let program = script(temp.path(), "echo 'cannot parse' >&2\nexit 3");

        let err = CommandLoader::new(program)
            .load(Path::new("deps.lock"))
            .await
            .unwrap_err();
        assert!(matches!(err, Error::Load { .. }));
        assert!(err.to_string().contains("cannot parse"));
    }

    #[tokio::test]
    async fn test_invalid_output_is_load_error() {
        let temp = TempDir::new().unwrap();
        let program = script(temp.path(), "echo 'not json'");

        let err = CommandLoader::new(program)
            .load(Path::new("deps.lock"))
            .await
            .unwrap_err();
        assert!(err.to_string().contains("invalid output"));
    }
}
