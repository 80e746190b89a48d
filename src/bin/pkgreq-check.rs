use std::path::PathBuf;

use anyhow::{Context, Result};
use clap::{Parser, ValueEnum};
use serde::Serialize;

use pkgreq_language_server::archive::ArchiveManager;
use pkgreq_language_server::config::{Args, Config};
use pkgreq_language_server::core::{setup, CheckerRegistry, SourceDocument, EMACS_LISP_MODE};
use pkgreq_language_server::validation::{Diagnostic, Severity};

#[derive(Debug, Clone, Copy, ValueEnum)]
enum OutputFormat {
    Text,
    Json,
}

/// Check Package-Requires headers of Emacs Lisp files
#[derive(Debug, Parser)]
#[command(name = "pkgreq-check")]
#[command(version)]
struct CheckArgs {
    /// Emacs Lisp files to check
    #[arg(required = true)]
    files: Vec<PathBuf>,

    #[arg(long = "archive", value_name = "FILE", help = "Package archive TOML file (repeatable)")]
    archives: Vec<PathBuf>,

    #[arg(long, help = "Directory containing package archive TOML files")]
    archive_dir: Option<PathBuf>,

    #[arg(long, value_enum, default_value_t = OutputFormat::Text)]
    format: OutputFormat,

    #[arg(long, default_value = "warn")]
    log_level: String,
}

#[derive(Serialize)]
struct FileDiagnostic<'a> {
    path: String,
    #[serde(flatten)]
    diagnostic: &'a Diagnostic,
}

#[tokio::main(flavor = "current_thread")]
async fn main() -> Result<()> {
    let args = CheckArgs::parse();
    let config = Config::from_args(Args {
        archives: args.archives,
        archive_dir: args.archive_dir,
        log_level: args.log_level,
    })?;
    config.init_logging();

    let manager = ArchiveManager::new(&config);
    manager.reload().await;
    let packages = manager.snapshot().await;

    let mut checkers = CheckerRegistry::new();
    setup(&mut checkers);

    let mut results = Vec::new();
    for path in &args.files {
        let content = tokio::fs::read_to_string(path)
            .await
            .with_context(|| format!("Failed to read {}", path.display()))?;
        let diagnostics =
            checkers.run_checks(EMACS_LISP_MODE, &SourceDocument::new(content), &packages);
        results.push((path.display().to_string(), diagnostics));
    }

    match args.format {
        OutputFormat::Text => {
            for (path, diagnostics) in &results {
                for d in diagnostics {
                    let severity = match d.severity {
                        Severity::Error => "error",
                        Severity::Warning => "warning",
                    };
                    println!("{}:{}:{}: {}: {}", path, d.line, d.column, severity, d.message);
                }
            }
        }
        OutputFormat::Json => {
            let flat: Vec<_> = results
                .iter()
                .flat_map(|(path, diagnostics)| {
                    diagnostics.iter().map(move |diagnostic| FileDiagnostic {
                        path: path.clone(),
                        diagnostic,
                    })
                })
                .collect();
            println!("{}", serde_json::to_string_pretty(&flat)?);
        }
    }

    let has_errors = results
        .iter()
        .flat_map(|(_, diagnostics)| diagnostics)
        .any(|d| d.severity == Severity::Error);
    if has_errors {
        std::process::exit(1);
    }

    Ok(())
}
