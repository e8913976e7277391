//! depreview CLI - request reviewers for dependency changes
//!
//! Runs as a single CI step: diffs the dependency manifest of a pull request
//! against its base branch and requests reviews from the owners of whatever
//! changed. Without a subcommand the binary behaves as `depreview run`.

mod commands;

use std::process::ExitCode;

use clap::{Parser, Subcommand};
use depreview_core::output::error_command;
use tracing_subscriber::{fmt, prelude::*, EnvFilter};

use commands::{DiffArgs, RunArgs};

/// depreview: request reviewers for dependency changes
#[derive(Parser, Debug)]
#[command(name = "depreview")]
#[command(author, version, about, long_about = None)]
struct Cli {
    /// Enable verbose output
    #[arg(short, long, global = true)]
    verbose: bool,

    #[command(subcommand)]
    command: Option<Commands>,

    /// Run arguments used when no subcommand is given
    #[command(flatten)]
    run: RunArgs,
}

#[derive(Subcommand, Debug)]
enum Commands {
    /// Show version information
    Version,

    /// Request reviewers for the triggering pull request (default)
    #[command(visible_alias = "r")]
    Run(RunArgs),

    /// Show the dependency changes between two manifests
    #[command(visible_alias = "d")]
    Diff(DiffArgs),
}

#[tokio::main]
async fn main() -> ExitCode {
    let cli = Cli::parse();

    // stdout is reserved for workflow commands
    let default_level = if cli.verbose { "debug" } else { "info" };
    tracing_subscriber::registry()
        .with(fmt::layer().with_writer(std::io::stderr))
        .with(
            EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(default_level)),
        )
        .init();

    if cli.verbose {
        tracing::info!("Verbose mode enabled");
    }

    match execute(cli).await {
        Ok(()) => ExitCode::SUCCESS,
        Err(e) => {
            tracing::error!(error = %format!("{:#}", e), "Run failed");
            println!("{}", error_command(&format!("{:#}", e)));
            ExitCode::FAILURE
        }
    }
}

async fn execute(cli: Cli) -> anyhow::Result<()> {
    match cli.command {
        Some(Commands::Version) => {
            println!("depreview {}", env!("CARGO_PKG_VERSION"));
        }
        Some(Commands::Run(args)) => {
            args.execute(cli.verbose).await?;
        }
        Some(Commands::Diff(args)) => {
            args.execute().await?;
        }
        None => {
            cli.run.execute(cli.verbose).await?;
        }
    }

    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use clap::CommandFactory;
    use tempfile::TempDir;

    #[test]
    fn test_cli_definition_is_valid() {
        Cli::command().debug_assert();
    }

    #[test]
    fn test_parse_diff() {
        let cli = Cli::try_parse_from([
            "depreview",
            "--verbose",
            "diff",
            "--loader",
            "cargo",
            "old/Cargo.toml",
            "Cargo.toml",
        ])
        .unwrap();

        assert!(cli.verbose);
        match cli.command {
            Some(Commands::Diff(args)) => {
                assert_eq!(args.loader, "cargo");
                assert_eq!(args.base.to_str(), Some("old/Cargo.toml"));
                assert!(!args.json);
            }
            other => panic!("unexpected command: {:?}", other),
        }
    }

    #[test]
    fn test_parse_run_flags() {
        let cli = Cli::try_parse_from([
            "depreview",
            "run",
            "--dependency-file",
            "web/package.json",
            "--loader",
            "npm",
            "--dry-run",
        ])
        .unwrap();

        match cli.command {
            Some(Commands::Run(args)) => {
                let config = args.to_config();
                assert_eq!(config.dependency_file.to_str(), Some("web/package.json"));
                assert_eq!(config.loader, "npm");
                assert!(config.dry_run);
            }
            other => panic!("unexpected command: {:?}", other),
        }
    }

    #[test]
    fn test_no_subcommand_defaults_to_run() {
        let cli = Cli::try_parse_from([
            "depreview",
            "--dependency-file",
            "package.json",
            "--loader",
            "npm",
            "--dry-run",
        ])
        .unwrap();

        assert!(cli.command.is_none());
        let config = cli.run.to_config();
        assert_eq!(config.loader, "npm");
        assert!(config.dry_run);
    }

    #[test]
    fn test_verbose_before_default_and_explicit_run() {
        let cli = Cli::try_parse_from(["depreview", "--verbose"]).unwrap();
        assert!(cli.verbose);
        assert!(cli.command.is_none());

        let cli = Cli::try_parse_from(["depreview", "--verbose", "run", "--dry-run"]).unwrap();
        assert!(cli.verbose);
        assert!(matches!(cli.command, Some(Commands::Run(ref args)) if args.dry_run));
    }

    #[tokio::test]
    async fn test_bare_invocation_runs_and_reports_reviewers() {
        let temp = TempDir::new().unwrap();
        let event_path = temp.path().join("event.json");
        let output_path = temp.path().join("output");
        std::fs::write(&event_path, r#"{ "ref": "refs/heads/main" }"#).unwrap();

        let cli = Cli::try_parse_from([
            "depreview",
            "--dependency-file",
            "package.json",
            "--loader",
            "npm",
            "--dry-run",
            "--event-path",
            event_path.to_str().unwrap(),
            "--output-file",
            output_path.to_str().unwrap(),
        ])
        .unwrap();
        assert!(cli.command.is_none());

        execute(cli).await.unwrap();

        assert_eq!(
            std::fs::read_to_string(&output_path).unwrap(),
            "reviewers=[]\n"
        );
    }
}
