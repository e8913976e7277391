//! `Cargo.toml` loader

use std::path::Path;

use async_trait::async_trait;
use toml::{Table, Value};
use tracing::warn;

use super::{dedupe, read_manifest, DependencyLoader};
use crate::{Dependency, Error, Result};

const SECTIONS: [&str; 3] = ["dependencies", "dev-dependencies", "build-dependencies"];

/// Loads Cargo manifests, including target-specific tables
#[derive(Debug, Clone, Copy, Default)]
pub struct CargoLoader;

impl CargoLoader {
    /// Parse the contents of a `Cargo.toml`
    pub fn parse(path: &Path, contents: &str) -> Result<Vec<Dependency>> {
        let manifest: Table = contents
            .parse()
            .map_err(|e: toml::de::Error| Error::load(path, e.to_string()))?;

        let mut deps = Vec::new();
        collect_sections(path, &manifest, &mut deps)?;

        if let Some(targets) = manifest.get("target").and_then(Value::as_table) {
            for target in targets.values().filter_map(Value::as_table) {
                collect_sections(path, target, &mut deps)?;
            }
        }

        if let Some(workspace) = manifest.get("workspace").and_then(Value::as_table) {
            if let Some(table) = workspace.get("dependencies") {
                collect_table(path, "workspace.dependencies", table, &mut deps)?;
            }
        }

        Ok(dedupe(path, deps))
    }
}

fn collect_sections(path: &Path, table: &Table, deps: &mut Vec<Dependency>) -> Result<()> {
    for section in SECTIONS {
        if let Some(entries) = table.get(section) {
            collect_table(path, section, entries, deps)?;
        }
    }
    Ok(())
}

fn collect_table(
    path: &Path,
    section: &str,
    entries: &Value,
    deps: &mut Vec<Dependency>,
) -> Result<()> {
    let entries = entries
        .as_table()
        .ok_or_else(|| Error::load(path, format!("[{}] must be a table", section)))?;

    for (name, spec) in entries {
        match version_of(spec) {
            Some(version) => deps.push(Dependency::new(name, version)),
            None => warn!(
                manifest = %path.display(),
                section,
                name = %name,
                "Skipping dependency without a version or source"
            ),
        }
    }
    Ok(())
}

/// Version string of a dependency spec, or its source when unversioned
fn version_of(spec: &Value) -> Option<String> {
    match spec {
        Value::String(version) => Some(version.clone()),
        Value::Table(table) => {
            let field = |key: &str| table.get(key).and_then(Value::as_str);

            if let Some(version) = field("version") {
                return Some(version.to_string());
            }
            if let Some(git) = field("git") {
                let reference = field("rev").or_else(|| field("tag")).or_else(|| field("branch"));
                return Some(match reference {
                    Some(r) => format!("git+{}#{}", git, r),
                    None => format!("git+{}", git),
                });
            }
            if let Some(path) = field("path") {
                return Some(format!("path:{}", path));
            }
            if table.get("workspace").and_then(Value::as_bool) == Some(true) {
                return Some("workspace".to_string());
            }
            None
        }
        _ => None,
    }
}

#[async_trait]
impl DependencyLoader for CargoLoader {
    fn name(&self) -> &str {
        "cargo"
    }

    async fn load(&self, path: &Path) -> Result<Vec<Dependency>> {
        let contents = read_manifest(path).await?;
        Self::parse(path, &contents)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn parse(contents: &str) -> Result<Vec<Dependency>> {
        CargoLoader::parse(Path::new("Cargo.toml"), contents)
    }

    #[test]
    fn test_parse_version_forms() {
        let deps = parse(
            r#"
[package]
name = "app"
version = "0.1.0"

[dependencies]
serde = "1.0"
tokio = { version = "1.41", features = ["full"] }
local = { path = "../local" }
forked = { git = "https://github.com/acme/forked", rev = "abc123" }
shared = { workspace = true }

[dev-dependencies]
tempfile = "3.15"

[build-dependencies]
cc = "1"
"#,
        )
        .unwrap();

        assert_eq!(deps.len(), 7);
        assert!(deps.contains(&Dependency::new("serde", "1.0")));
        assert!(deps.contains(&Dependency::new("tokio", "1.41")));
        assert!(deps.contains(&Dependency::new("local", "path:../local")));
        assert!(deps.contains(&Dependency::new(
            "forked",
            "git+https://github.com/acme/forked#abc123"
        )));
        assert!(deps.contains(&Dependency::new("shared", "workspace")));
        assert!(deps.contains(&Dependency::new("tempfile", "3.15")));
        assert!(deps.contains(&Dependency::new("cc", "1")));
    }

    #[test]
    fn test_target_and_workspace_tables() {
        let deps = parse(
            r#"
[workspace.dependencies]
anyhow = "1.0"

[target.'cfg(unix)'.dependencies]
libc = "0.2"
"#,
        )
        .unwrap();

        assert!(deps.contains(&Dependency::new("anyhow", "1.0")));
        assert!(deps.contains(&Dependency::new("libc", "0.2")));
    }

    #[test]
    fn test_dependency_without_version_skipped() {
        let deps = parse("[dependencies]\nodd = { features = [\"x\"] }\nok = \"1\"\n").unwrap();
        assert_eq!(deps, vec![Dependency::new("ok", "1")]);
    }

    #[test]
    fn test_invalid_manifest() {
        assert!(parse("[dependencies\n").is_err());
        assert!(parse("dependencies = 3\n").is_err());
    }
}
