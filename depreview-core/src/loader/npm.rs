//! `package.json` loader

use std::path::Path;

use async_trait::async_trait;
use serde_json::Value;
use tracing::warn;

use super::{dedupe, read_manifest, DependencyLoader};
use crate::{Dependency, Error, Result};

/// Sections read from `package.json`, in declaration priority
const SECTIONS: [&str; 4] = [
    "dependencies",
    "devDependencies",
    "peerDependencies",
    "optionalDependencies",
];

/// Loads npm `package.json` manifests
#[derive(Debug, Clone, Copy, Default)]
pub struct NpmLoader;

impl NpmLoader {
    /// Parse the contents of a `package.json`
    pub fn parse(path: &Path, contents: &str) -> Result<Vec<Dependency>> {
        let manifest: Value =
            serde_json::from_str(contents).map_err(|e| Error::load(path, e.to_string()))?;
        let manifest = manifest
            .as_object()
            .ok_or_else(|| Error::load(path, "expected a JSON object"))?;

        let mut deps = Vec::new();
        for section in SECTIONS {
            let Some(entries) = manifest.get(section) else {
                continue;
            };
            let entries = entries
                .as_object()
                .ok_or_else(|| Error::load(path, format!("'{}' must be an object", section)))?;

            for (name, version) in entries {
                match version.as_str() {
                    Some(version) => deps.push(Dependency::new(name, version)),
                    None => warn!(
                        manifest = %path.display(),
                        section,
                        name = %name,
                        "Skipping dependency with non-string version"
                    ),
                }
            }
        }

        Ok(dedupe(path, deps))
    }
}

#[async_trait]
impl DependencyLoader for NpmLoader {
    fn name(&self) -> &str {
        "npm"
    }

    async fn load(&self, path: &Path) -> Result<Vec<Dependency>> {
        let contents = read_manifest(path).await?;
        Self::parse(path, &contents)
    }
}
