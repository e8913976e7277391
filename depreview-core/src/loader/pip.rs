//! `requirements.txt` loader

use std::path::Path;
use std::sync::LazyLock;

use async_trait::async_trait;
use regex::Regex;
use tracing::warn;

use super::{dedupe, read_manifest, DependencyLoader};
use crate::{Dependency, Result};

/// Loads pip requirements files
///
/// Names are normalized the way package indexes compare them (lowercase,
/// runs of `-`, `_` and `.` collapsed to `-`). Pinned requirements report the
/// pinned version; anything else reports the specifier verbatim, or `*`.
#[derive(Debug, Clone, Copy, Default)]
pub struct PipLoader;

static REQUIREMENT: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r"^(?P<name>[A-Za-z0-9][A-Za-z0-9._-]*)\s*(?:\[[^\]]*\])?\s*(?P<spec>[^;]*)")
        .expect("static regex")
});

static NAME_SEPARATORS: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"[-_.]+").expect("static regex"));

impl PipLoader {
    /// Parse the contents of a requirements file
    pub fn parse(path: &Path, contents: &str) -> Vec<Dependency> {
        let mut deps = Vec::new();

        for (line_number, joined) in logical_lines(contents) {
            let line = strip_comment(&joined).trim();
            if line.is_empty() || line.starts_with('-') {
                continue;
            }
            let line = strip_options(line).trim();

            let Some(caps) = REQUIREMENT.captures(line) else {
                warn!(
                    manifest = %path.display(),
                    line = line_number,
                    "Skipping unrecognized requirement"
                );
                continue;
            };

            let name = NAME_SEPARATORS
                .replace_all(&caps["name"], "-")
                .to_lowercase();
            let spec = caps["spec"].trim();
            let version = match spec.strip_prefix("==") {
                Some(pinned) if !pinned.contains(',') => pinned.trim().to_string(),
                _ if spec.is_empty() => "*".to_string(),
                _ => spec.to_string(),
            };

            deps.push(Dependency::new(name, version));
        }

        dedupe(path, deps)
    }
}

/// Join `\`-continued lines, keeping the number of the first physical line
fn logical_lines(contents: &str) -> Vec<(usize, String)> {
    let mut lines = Vec::new();
    let mut pending: Option<(usize, String)> = None;

    for (index, raw) in contents.lines().enumerate() {
        let (start, mut buf) = pending.take().unwrap_or_else(|| (index + 1, String::new()));
        match raw.trim_end().strip_suffix('\\') {
            Some(head) => {
                buf.push_str(head);
                buf.push(' ');
                pending = Some((start, buf));
            }
            None => {
                buf.push_str(raw);
                lines.push((start, buf));
            }
        }
    }

    lines.extend(pending);
    lines
}

/// Drop per-requirement options such as `--hash=...`
fn strip_options(line: &str) -> &str {
    let bytes = line.as_bytes();
    for i in 1..bytes.len().saturating_sub(1) {
        if bytes[i - 1].is_ascii_whitespace() && bytes[i] == b'-' && bytes[i + 1] == b'-' {
            return &line[..i];
        }
    }
    line
}

/// Remove a trailing `#` comment; `#` only starts a comment at line start or
/// after whitespace
fn strip_comment(line: &str) -> &str {
    let bytes = line.as_bytes();
    for (i, b) in bytes.iter().enumerate() {
        if *b == b'#' && (i == 0 || bytes[i - 1].is_ascii_whitespace()) {
            return &line[..i];
        }
    }
    line
}

#[async_trait]
impl DependencyLoader for PipLoader {
    fn name(&self) -> &str {
        "pip"
    }

    async fn load(&self, path: &Path) -> Result<Vec<Dependency>> {
        let contents = read_manifest(path).await?;
        Ok(Self::parse(path, &contents))
    }
}
