//! Declared dependencies and the base/current diff

use std::collections::HashMap;

use serde::{Deserialize, Serialize};

/// A named, versioned entry from a dependency manifest
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct Dependency {
    /// Dependency name, unique within one manifest
    pub name: String,
    /// Declared version or version requirement
    pub version: String,
}

impl Dependency {
    /// Create a new dependency
    pub fn new(name: impl Into<String>, version: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            version: version.into(),
        }
    }
}

/// Dependencies that differ between the base and current manifests
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
pub struct DependencyDiff {
    /// Present in current only, in current order
    pub added: Vec<String>,
    /// Present in base only, in base order
    pub removed: Vec<String>,
    /// Present in both with a different version, in current order
    pub changed: Vec<String>,
}

impl DependencyDiff {
    /// Compare two dependency lists
    ///
    /// Names are expected to be unique within each list. Duplicates are not
    /// collapsed, so a malformed list can yield a name more than once.
    pub fn compute(base: &[Dependency], current: &[Dependency]) -> Self {
        let base_by_name: HashMap<&str, &Dependency> =
            base.iter().map(|d| (d.name.as_str(), d)).collect();
        let current_by_name: HashMap<&str, &Dependency> =
            current.iter().map(|d| (d.name.as_str(), d)).collect();

        let mut diff = Self::default();

        for dep in current {
            match base_by_name.get(dep.name.as_str()) {
                None => diff.added.push(dep.name.clone()),
                Some(old) if old.version != dep.version => diff.changed.push(dep.name.clone()),
                Some(_) => {}
            }
        }

        diff.removed = base
            .iter()
            .filter(|d| !current_by_name.contains_key(d.name.as_str()))
            .map(|d| d.name.clone())
            .collect();

        diff
    }

    /// True when nothing changed
    pub fn is_empty(&self) -> bool {
        self.added.is_empty() && self.removed.is_empty() && self.changed.is_empty()
    }

    /// Total number of entries across all categories
    pub fn len(&self) -> usize {
        self.added.len() + self.removed.len() + self.changed.len()
    }

    /// Added, then removed, then changed names
    pub fn names(&self) -> Vec<String> {
        self.added
            .iter()
            .chain(&self.removed)
            .chain(&self.changed)
            .cloned()
            .collect()
    }
}

/// Names of dependencies added, removed, or changed between `base` and `current`
pub fn diff(base: &[Dependency], current: &[Dependency]) -> Vec<String> {
    DependencyDiff::compute(base, current).names()
}

#[cfg(test)]
mod tests {
    use super::*;

    fn deps(pairs: &[(&str, &str)]) -> Vec<Dependency> {
        pairs.iter().map(|(n, v)| Dependency::new(*n, *v)).collect()
    }

    #[test]
    fn test_added_only() {
        assert_eq!(diff(&[], &deps(&[("a", "1")])), vec!["a"]);
    }

    #[test]
    fn test_removed_only() {
        assert_eq!(diff(&deps(&[("a", "1")]), &[]), vec!["a"]);
    }

    #[test]
    fn test_version_changed() {
        assert_eq!(diff(&deps(&[("a", "1")]), &deps(&[("a", "2")])), vec!["a"]);
    }

    #[test]
    fn test_identical_lists_are_empty() {
        let list = deps(&[("a", "1"), ("b", "2"), ("c", "3")]);
        assert!(diff(&list, &list).is_empty());
        assert!(DependencyDiff::compute(&list, &list).is_empty());
    }

    #[test]
    fn test_empty_inputs() {
        assert!(diff(&[], &[]).is_empty());
    }

    #[test]
    fn test_mixed_categories_in_order() {
        let base = deps(&[("a", "1"), ("b", "1")]);
        let current = deps(&[("a", "2"), ("c", "1")]);

        let result = DependencyDiff::compute(&base, &current);
        assert_eq!(result.added, vec!["c"]);
        assert_eq!(result.removed, vec!["b"]);
        assert_eq!(result.changed, vec!["a"]);
        assert_eq!(result.len(), 3);
        assert_eq!(result.names(), vec!["c", "b", "a"]);
    }

    #[test]
    fn test_unchanged_entries_never_reported() {
        let base = deps(&[("keep", "1.0"), ("bump", "1.0"), ("drop", "0.1")]);
        let current = deps(&[("bump", "1.1"), ("keep", "1.0"), ("new", "2.0")]);

        let names = diff(&base, &current);
        assert!(!names.contains(&"keep".to_string()));
        assert_eq!(names, vec!["new", "drop", "bump"]);
    }

    #[test]
    fn test_preserves_source_order() {
        let base = deps(&[("z", "1"), ("y", "1")]);
        let current = deps(&[("c", "1"), ("b", "1"), ("a", "1")]);
        assert_eq!(diff(&base, &current), vec!["c", "b", "a", "z", "y"]);
    }

    #[test]
    fn test_duplicate_names_are_not_collapsed() {
        let base = deps(&[("a", "1")]);
        let current = deps(&[("a", "2"), ("a", "3")]);
        assert_eq!(diff(&base, &current), vec!["a", "a"]);
    }
}
