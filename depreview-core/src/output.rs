//! Step outputs and workflow commands

use std::io::Write;
use std::path::PathBuf;
use std::time::{SystemTime, UNIX_EPOCH};

use tracing::debug;

use crate::Result;

/// Name of the output listing requested reviewers
pub const REVIEWERS_OUTPUT: &str = "reviewers";

/// Writes step outputs
///
/// Outputs are appended to the file named by `GITHUB_OUTPUT` when the runner
/// provides one, and printed as `::set-output` commands otherwise.
#[derive(Debug, Clone, Default)]
pub struct ActionOutput {
    output_file: Option<PathBuf>,
}

impl ActionOutput {
    pub fn new(output_file: Option<PathBuf>) -> Self {
        Self { output_file }
    }

    /// Set a named output
    pub fn set(&self, name: &str, value: &str) -> Result<()> {
        debug!(name, value, "Setting output");

        match &self.output_file {
            Some(path) => {
                let mut file = std::fs::OpenOptions::new()
                    .create(true)
                    .append(true)
                    .open(path)?;
                file.write_all(file_command(name, value).as_bytes())?;
            }
            None => {
                let mut stdout = std::io::stdout().lock();
                writeln!(
                    stdout,
                    "::set-output name={}::{}",
                    name,
                    escape_data(value)
                )?;
            }
        }

        Ok(())
    }

    /// Set the `reviewers` output as a JSON array
    pub fn set_reviewers(&self, reviewers: &[String]) -> Result<()> {
        self.set(REVIEWERS_OUTPUT, &serde_json::to_string(reviewers)?)
    }
}

/// Entry appended to the output file
fn file_command(name: &str, value: &str) -> String {
    if !value.contains('\n') && !value.contains('\r') {
        return format!("{}={}\n", name, value);
    }

    let nanos = SystemTime::now()
        .duration_since(UNIX_EPOCH)
        .map(|d| d.as_nanos())
        .unwrap_or_default();
    let delimiter = format!("depreview_{}_{}", std::process::id(), nanos);
    format!("{}<<{}\n{}\n{}\n", name, delimiter, value, delimiter)
}

/// `::error::` workflow command marking the step as failed
pub fn error_command(message: &str) -> String {
    format!("::error::{}", escape_data(message))
}

fn escape_data(value: &str) -> String {
    value
        .replace('%', "%25")
        .replace('\r', "%0D")
        .replace('\n', "%0A")
}
