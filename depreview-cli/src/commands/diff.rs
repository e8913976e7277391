//! Diff command - compare two local manifests

use std::path::PathBuf;

use clap::Args;
use depreview_core::{DependencyDiff, LoaderRegistry};

/// Arguments for the diff command
#[derive(Args, Debug)]
pub struct DiffArgs {
    /// Loader: a built-in name (npm, cargo, pip) or the path of a loader executable
    #[arg(short, long)]
    pub loader: String,

    /// Manifest before the change
    pub base: PathBuf,

    /// Manifest after the change
    pub current: PathBuf,

    /// Print the diff as JSON
    #[arg(long)]
    pub json: bool,
}

impl DiffArgs {
    /// Execute the diff command
    pub async fn execute(&self) -> anyhow::Result<()> {
        let diff = self.compute().await?;

        if self.json {
            println!("{}", serde_json::to_string_pretty(&diff)?);
        } else {
            print!("{}", render(&diff));
        }

        Ok(())
    }

    async fn compute(&self) -> anyhow::Result<DependencyDiff> {
        let workdir = std::env::current_dir()?;
        let loader = LoaderRegistry::with_defaults().resolve(&self.loader, &[workdir])?;

        let base = loader.load(&self.base).await?;
        let current = loader.load(&self.current).await?;

        Ok(DependencyDiff::compute(&base, &current))
    }
}

fn render(diff: &DependencyDiff) -> String {
    if diff.is_empty() {
        return "No dependency changes\n".to_string();
    }

    let mut out = String::new();
    for name in &diff.added {
        out.push_str(&format!("+ {}\n", name));
    }
    for name in &diff.removed {
        out.push_str(&format!("- {}\n", name));
    }
    for name in &diff.changed {
        out.push_str(&format!("~ {}\n", name));
    }
    out
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::TempDir;

    #[test]
    fn test_render() {
        let diff = DependencyDiff {
            added: vec!["c".to_string()],
            removed: vec!["b".to_string()],
            changed: vec!["a".to_string()],
        };
        assert_eq!(render(&diff), "+ c\n- b\n~ a\n");
        assert_eq!(render(&DependencyDiff::default()), "No dependency changes\n");
    }

    #[tokio::test]
    async fn test_compute_with_builtin_loader() {
        let temp = TempDir::new().unwrap();
        let base = temp.path().join("base.json");
        let current = temp.path().join("current.json");
        std::fs::write(&base, r#"{ "dependencies": { "a": "1", "b": "1" } }"#).unwrap();
        std::fs::write(&current, r#"{ "dependencies": { "a": "2", "c": "1" } }"#).unwrap();

        let args = DiffArgs {
            loader: "npm".to_string(),
            base,
            current,
            json: false,
        };
        let diff = args.compute().await.unwrap();

        assert_eq!(diff.added, vec!["c"]);
        assert_eq!(diff.removed, vec!["b"]);
        assert_eq!(diff.changed, vec!["a"]);
    }
}
