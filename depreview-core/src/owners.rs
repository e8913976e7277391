//! Dependency owner resolution
//!
//! An [`OwnerResolver`] maps changed dependency names to the people who own
//! them. The workflow only flattens the returned map into a reviewer set, so
//! the grouping key is up to the resolver.
//!
//! [`ConfigOwnerResolver`] reads an owners file that maps each reviewer login
//! to the dependency name patterns they own:
//!
//! ```json
//! {
//!   "alice": ["react", "react-*"],
//!   "bob": ["@acme/*"]
//! }
//! ```
//!
//! `*` matches any run of characters. Files ending in `.toml` are read as
//! TOML with the same shape.

use std::collections::{BTreeMap, BTreeSet, HashMap};
use std::path::{Path, PathBuf};

use async_trait::async_trait;
use regex::Regex;
use tracing::{debug, info};

use crate::config::DEFAULT_OWNERS_FILE;
use crate::loader::DependencyLoader;
use crate::{Error, Result};

/// Owner grouping key to reviewer logins
pub type OwnerMap = BTreeMap<String, Vec<String>>;

/// Input to an owner resolution
#[derive(Clone, Copy)]
pub struct ResolveRequest<'a> {
    /// Owners config; `None` lets the resolver pick its default
    pub config_file: Option<&'a Path>,
    /// Changed dependency names
    pub dependencies: &'a [String],
    /// Manifest the dependencies were read from
    pub dependency_file: &'a Path,
    /// Loader that parsed the manifest
    pub loader: &'a dyn DependencyLoader,
}

impl std::fmt::Debug for ResolveRequest<'_> {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("ResolveRequest")
            .field("config_file", &self.config_file)
            .field("dependencies", &self.dependencies)
            .field("dependency_file", &self.dependency_file)
            .field("loader", &self.loader.name())
            .finish()
    }
}

/// Resolves dependency names to reviewer identities
#[async_trait]
pub trait OwnerResolver: Send + Sync {
    async fn resolve(&self, request: ResolveRequest<'_>) -> Result<OwnerMap>;
}

/// Every reviewer named anywhere in `owners`
pub fn flatten_owners(owners: &OwnerMap) -> BTreeSet<String> {
    owners.values().flatten().cloned().collect()
}

/// Owners file contents: reviewer login to owned dependency patterns
#[derive(Debug, Clone)]
pub struct OwnersConfig {
    rules: Vec<(String, Vec<Regex>)>,
}

impl OwnersConfig {
    /// Load an owners file, choosing the format by extension
    pub async fn load(path: &Path) -> Result<Self> {
        let contents = tokio::fs::read_to_string(path).await.map_err(|e| {
            Error::Resolve(format!(
                "Failed to read owners config {}: {}",
                path.display(),
                e
            ))
        })?;

        let raw: HashMap<String, Vec<String>> =
            if path.extension().and_then(|e| e.to_str()) == Some("toml") {
                toml::from_str(&contents).map_err(|e| {
                    Error::Resolve(format!("Invalid owners config {}: {}", path.display(), e))
                })?
            } else {
                serde_json::from_str(&contents).map_err(|e| {
                    Error::Resolve(format!("Invalid owners config {}: {}", path.display(), e))
                })?
            };

        Self::from_patterns(raw)
    }

    /// Build from reviewer login to pattern lists
    pub fn from_patterns(raw: HashMap<String, Vec<String>>) -> Result<Self> {
        let mut rules = Vec::with_capacity(raw.len());
        for (reviewer, patterns) in raw {
            let compiled = patterns
                .iter()
                .map(|p| compile_pattern(p))
                .collect::<Result<Vec<_>>>()?;
            rules.push((reviewer, compiled));
        }
        rules.sort_by(|a, b| a.0.cmp(&b.0));
        Ok(Self { rules })
    }

    /// Reviewers owning `dependency`, sorted
    pub fn owners_of(&self, dependency: &str) -> Vec<String> {
        self.rules
            .iter()
            .filter(|(_, patterns)| patterns.iter().any(|p| p.is_match(dependency)))
            .map(|(reviewer, _)| reviewer.clone())
            .collect()
    }
}

/// Compile a `*` glob into an anchored regex
fn compile_pattern(pattern: &str) -> Result<Regex> {
    let regex_pattern = regex::escape(pattern).replace(r"\*", ".*");
    Regex::new(&format!("^{}$", regex_pattern))
        .map_err(|e| Error::Resolve(format!("Invalid owner pattern '{}': {}", pattern, e)))
}

/// [`OwnerResolver`] backed by an owners file
#[derive(Debug, Clone, Default)]
pub struct ConfigOwnerResolver;

impl ConfigOwnerResolver {
    pub fn new() -> Self {
        Self
    }

    /// Config used when the request names none: next to the manifest
    pub fn default_config_path(dependency_file: &Path) -> PathBuf {
        dependency_file
            .parent()
            .unwrap_or_else(|| Path::new(""))
            .join(DEFAULT_OWNERS_FILE)
    }
}

#[async_trait]
impl OwnerResolver for ConfigOwnerResolver {
    async fn resolve(&self, request: ResolveRequest<'_>) -> Result<OwnerMap> {
        let config_path = match request.config_file {
            Some(path) => path.to_path_buf(),
            None => Self::default_config_path(request.dependency_file),
        };

        debug!(
            config = %config_path.display(),
            loader = request.loader.name(),
            dependencies = request.dependencies.len(),
            "Resolving dependency owners"
        );

        let config = OwnersConfig::load(&config_path).await?;

        let mut owners = OwnerMap::new();
        for dependency in request.dependencies {
            if owners.contains_key(dependency) {
                continue;
            }
            let reviewers = config.owners_of(dependency);
            if !reviewers.is_empty() {
                owners.insert(dependency.clone(), reviewers);
            }
        }

        info!(
            owned = owners.len(),
            changed = request.dependencies.len(),
            "Resolved dependency owners"
        );

        Ok(owners)
    }
}
