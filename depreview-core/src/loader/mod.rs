//! Dependency manifest loaders
//!
//! A loader turns a manifest file into a list of [`Dependency`] records. The
//! workflow only sees the [`DependencyLoader`] trait; the [`LoaderRegistry`]
//! maps a loader identifier to a concrete implementation at the entry point.

use std::collections::{HashMap, HashSet};
use std::path::{Path, PathBuf};
use std::sync::Arc;

use async_trait::async_trait;
use tracing::{debug, warn};

use crate::{Dependency, Error, Result};

mod cargo;
mod command;
mod npm;
mod pip;

pub use cargo::CargoLoader;
pub use command::CommandLoader;
pub use npm::NpmLoader;
pub use pip::PipLoader;

/// Parses a dependency manifest
#[async_trait]
pub trait DependencyLoader: Send + Sync {
    /// Identifier of this loader
    fn name(&self) -> &str;

    /// Load the dependencies declared in the manifest at `path`
    async fn load(&self, path: &Path) -> Result<Vec<Dependency>>;
}

/// Registry of loaders addressable by identifier
pub struct LoaderRegistry {
    loaders: HashMap<String, Arc<dyn DependencyLoader>>,
}

impl LoaderRegistry {
    /// Create a new empty registry
    pub fn new() -> Self {
        Self {
            loaders: HashMap::new(),
        }
    }

    /// Create a registry with the built-in loaders
    pub fn with_defaults() -> Self {
        let mut registry = Self::new();
        registry.register(Arc::new(NpmLoader));
        registry.register(Arc::new(CargoLoader));
        registry.register(Arc::new(PipLoader));
        registry
    }

    /// Register a loader under its own name
    pub fn register(&mut self, loader: Arc<dyn DependencyLoader>) {
        self.loaders.insert(loader.name().to_string(), loader);
    }

    /// Get a registered loader by name
    pub fn get(&self, name: &str) -> Option<Arc<dyn DependencyLoader>> {
        self.loaders.get(name).cloned()
    }

    /// Names of all registered loaders, sorted
    pub fn list_registered(&self) -> Vec<&str> {
        let mut names: Vec<&str> = self.loaders.keys().map(|s| s.as_str()).collect();
        names.sort_unstable();
        names
    }

    /// Resolve a loader identifier
    ///
    /// Registered names win. Otherwise the identifier is taken as the path of
    /// an executable loader and looked up in each of `search_dirs` in order.
    pub fn resolve(
        &self,
        identifier: &str,
        search_dirs: &[PathBuf],
    ) -> Result<Arc<dyn DependencyLoader>> {
        let identifier = identifier.trim();

        if let Some(loader) = self.get(identifier) {
            debug!(loader = identifier, "Using built-in loader");
            return Ok(loader);
        }

        let mut searched = Vec::new();
        let candidates: Vec<PathBuf> = if Path::new(identifier).is_absolute() {
            vec![PathBuf::from(identifier)]
        } else {
            search_dirs.iter().map(|dir| dir.join(identifier)).collect()
        };

        for candidate in candidates {
            if candidate.is_file() {
                debug!(path = %candidate.display(), "Using executable loader");
                return Ok(Arc::new(CommandLoader::new(candidate)));
            }
            searched.push(candidate);
        }

        Err(Error::LoaderNotFound {
            identifier: identifier.to_string(),
            searched,
        })
    }
}

impl Default for LoaderRegistry {
    fn default() -> Self {
        Self::with_defaults()
    }
}

/// Drop repeated names, keeping the first declaration
pub(crate) fn dedupe(path: &Path, deps: Vec<Dependency>) -> Vec<Dependency> {
    let mut seen = HashSet::new();
    deps.into_iter()
        .filter(|dep| {
            let first = seen.insert(dep.name.clone());
            if !first {
                warn!(
                    manifest = %path.display(),
                    name = %dep.name,
                    "Dependency declared more than once, keeping first declaration"
                );
            }
            first
        })
        .collect()
}

pub(crate) async fn read_manifest(path: &Path) -> Result<String> {
    tokio::fs::read_to_string(path)
        .await
        .map_err(|e| Error::load(path, e.to_string()))
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::TempDir;

    #[test]
    fn test_registry_defaults() {
        let registry = LoaderRegistry::with_defaults();
        assert_eq!(registry.list_registered(), vec!["cargo", "npm", "pip"]);
    }

    #[test]
    fn test_registry_register() {
        let mut registry = LoaderRegistry::new();
        assert!(registry.get("npm").is_none());

        registry.register(Arc::new(NpmLoader));
        assert_eq!(registry.get("npm").unwrap().name(), "npm");
    }

    #[test]
    fn test_resolve_builtin() {
        let registry = LoaderRegistry::with_defaults();
        let loader = registry.resolve(" cargo ", &[]).unwrap();
        assert_eq!(loader.name(), "cargo");
    }

    #[test]
    fn test_resolve_executable_in_first_matching_dir() {
        let cwd = TempDir::new().unwrap();
        let workspace = TempDir::new().unwrap();
        std::fs::create_dir_all(workspace.path().join("tools")).unwrap();
        std::fs::write(workspace.path().join("tools/loader.sh"), "#!/bin/sh\n").unwrap();

        let registry = LoaderRegistry::with_defaults();
        let loader = registry
            .resolve(
                "tools/loader.sh",
                &[cwd.path().to_path_buf(), workspace.path().to_path_buf()],
            )
            .unwrap();

        assert_eq!(
            loader.name(),
            workspace.path().join("tools/loader.sh").to_string_lossy()
        );
    }

    #[test]
    fn test_resolve_prefers_current_dir() {
        let cwd = TempDir::new().unwrap();
        let workspace = TempDir::new().unwrap();
        std::fs::write(cwd.path().join("loader"), "").unwrap();
        std::fs::write(workspace.path().join("loader"), "").unwrap();

        let registry = LoaderRegistry::new();
        let loader = registry
            .resolve(
                "loader",
                &[cwd.path().to_path_buf(), workspace.path().to_path_buf()],
            )
            .unwrap();

        assert_eq!(loader.name(), cwd.path().join("loader").to_string_lossy());
    }

    #[test]
    fn test_resolve_unknown_is_config_error() {
        let cwd = TempDir::new().unwrap();
        let registry = LoaderRegistry::with_defaults();
        let err = registry
            .resolve("gradle", &[cwd.path().to_path_buf()])
            .err()
            .unwrap();

        match err {
            Error::LoaderNotFound {
                identifier,
                searched,
            } => {
                assert_eq!(identifier, "gradle");
                assert_eq!(searched, vec![cwd.path().join("gradle")]);
            }
            other => panic!("unexpected error: {other}"),
        }
    }

    #[test]
    fn test_resolve_ignores_directories() {
        let cwd = TempDir::new().unwrap();
        std::fs::create_dir(cwd.path().join("loader")).unwrap();

        let registry = LoaderRegistry::new();
        assert!(registry
            .resolve("loader", &[cwd.path().to_path_buf()])
            .is_err());
    }

    #[test]
    fn test_dedupe_keeps_first() {
        let deps = vec![
            Dependency::new("a", "1"),
            Dependency::new("b", "1"),
            Dependency::new("a", "2"),
        ];
        let deps = dedupe(Path::new("package.json"), deps);
        assert_eq!(
            deps,
            vec![Dependency::new("a", "1"), Dependency::new("b", "1")]
        );
    }
}
