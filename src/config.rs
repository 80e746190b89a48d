//! Configuration management for the Package-Requires checker.
//!
//! Handles:
//! - Command-line argument parsing
//! - Archive directory configuration
//! - Logger setup

use anyhow::Result;
use clap::Parser;
use std::path::PathBuf;

/// Command-line arguments shared by the language server and the CLI checker
#[derive(Debug, Default, Parser)]
#[command(name = "pkgreq-ls")]
#[command(about = "Language server checking Package-Requires headers in Emacs Lisp files")]
#[command(version)]
pub struct Args {
    /// Package archive files to load, in increasing priority
    #[arg(long = "archive", value_name = "FILE", help = "Package archive TOML file (repeatable)")]
    pub archives: Vec<PathBuf>,

    /// Custom archive directory to search for archive files
    #[arg(long, help = "Directory containing package archive TOML files")]
    pub archive_dir: Option<PathBuf>,

    /// Log level
    #[arg(
        long,
        default_value = "info",
        help = "Log level (trace, debug, info, warn, error)"
    )]
    pub log_level: String,
}

/// Combined configuration from all sources
#[derive(Debug, Clone)]
pub struct Config {
    /// Archive files named explicitly, highest priority
    pub archive_files: Vec<PathBuf>,
    /// Archive directories, lowest priority first
    pub archive_dirs: Vec<PathBuf>,
    /// Log level
    pub log_level: String,
}

impl Config {
    /// Create configuration from command-line arguments
    pub fn from_args_and_env() -> Result<Self> {
        Self::from_args(Args::parse())
    }

    /// Create configuration from explicit arguments (useful for testing)
    pub fn from_args(args: Args) -> Result<Self> {
        let mut archive_dirs = Vec::new();

        // User-global directory: ~/.config/pkgreq-ls/archives/
        if let Some(config_dir) = dirs::config_dir() {
            archive_dirs.push(config_dir.join("pkgreq-ls").join("archives"));
        }

        // Workspace directory: ./.pkgreq-ls/archives/
        archive_dirs.push(std::env::current_dir()?.join(".pkgreq-ls").join("archives"));

        if let Some(custom_dir) = args.archive_dir {
            archive_dirs.push(custom_dir);
        }

        let log_level = if args.log_level.is_empty() {
            "info".to_string()
        } else {
            args.log_level
        };

        Ok(Config {
            archive_files: args.archives,
            archive_dirs,
            log_level,
        })
    }

    /// Initialise `env_logger`; `RUST_LOG` overrides the configured level
    pub fn init_logging(&self) {
        let env = env_logger::Env::default().default_filter_or(self.log_level.as_str());
        // A logger may already be installed (tests, embedding hosts)
        let _ = env_logger::Builder::from_env(env).try_init();
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_explicit_dir_comes_last() {
        let config = Config::from_args(Args {
            archives: vec![PathBuf::from("melpa.toml")],
            archive_dir: Some(PathBuf::from("/srv/archives")),
            log_level: "debug".to_string(),
        })
        .unwrap();

        assert_eq!(config.archive_files, vec![PathBuf::from("melpa.toml")]);
        assert_eq!(config.archive_dirs.last(), Some(&PathBuf::from("/srv/archives")));
        assert_eq!(config.log_level, "debug");
    }

    #[test]
    fn test_workspace_dir_is_included() {
        let config = Config::from_args(Args::default()).unwrap();
        assert!(config
            .archive_dirs
            .iter()
            .any(|dir| dir.ends_with(".pkgreq-ls/archives")));
        assert_eq!(config.log_level, "info");
    }

    #[test]
    fn test_parse_command_line() {
        let args = Args::parse_from([
            "pkgreq-ls",
            "--archive",
            "a.toml",
            "--archive",
            "b.toml",
            "--log-level",
            "warn",
        ]);
        assert_eq!(args.archives.len(), 2);
        assert_eq!(args.log_level, "warn");
        assert!(args.archive_dir.is_none());
    }
}
