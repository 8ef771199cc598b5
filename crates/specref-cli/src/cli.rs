//! Command-line interface argument parsing and definitions
//!
//! This module defines the CLI structure using clap's derive API,
//! providing a type-safe and well-documented command interface.

use clap::{Parser, Subcommand, ValueEnum};
use std::io::IsTerminal;
use std::path::PathBuf;

/// Specref CLI - Resolve `$ref` pointers in JSON and YAML specifications
///
/// Reads an API specification, follows its local, file and remote
/// references, and prints a single self-contained document.
#[derive(Parser, Debug)]
#[command(
    name = "specref",
    version,
    author,
    about,
    long_about = None,
    propagate_version = true,
    arg_required_else_help = true
)]
pub struct Cli {
    /// Enable verbose output (can be used multiple times for increased verbosity)
    #[arg(short, long, action = clap::ArgAction::Count, global = true)]
    pub verbose: u8,

    /// Suppress all non-essential output
    #[arg(short, long, global = true, conflicts_with = "verbose")]
    pub quiet: bool,

    /// Path to configuration file
    #[arg(short, long, global = true, env = "SPECREF_CONFIG")]
    pub config: Option<PathBuf>,

    /// Output format for results
    #[arg(short, long, value_enum, global = true, default_value = "human")]
    pub output: OutputFormat,

    /// Disable colored output
    #[arg(long, global = true)]
    pub no_color: bool,

    /// The subcommand to run
    #[command(subcommand)]
    pub command: Commands,
}

/// Available subcommands
#[derive(Subcommand, Debug)]
pub enum Commands {
    /// Resolve every reference in a document and print the result
    Resolve(ResolveArgs),

    /// List the references found in a document without resolving them
    Refs(RefsArgs),

    /// Generate shell completions for the specified shell
    Completions(CompletionsArgs),
}

/// Arguments for the resolve command
#[derive(Parser, Debug)]
pub struct ResolveArgs {
    /// Path to the specification file (JSON or YAML)
    #[arg(value_name = "FILE")]
    pub file: PathBuf,

    /// Directory that top-level relative file references resolve against
    #[arg(long, value_name = "DIR")]
    pub base_dir: Option<PathBuf>,

    /// Fail on http(s) references instead of fetching them
    #[arg(long)]
    pub no_remote: bool,

    /// Timeout in seconds for remote fetches
    #[arg(long, value_name = "SECS")]
    pub timeout: Option<u64>,

    /// Write the resolved document to a file (stdout if not specified)
    #[arg(long = "save-to", value_name = "OUTPUT_FILE")]
    pub save_to: Option<PathBuf>,
}

/// Arguments for the refs command
#[derive(Parser, Debug)]
pub struct RefsArgs {
    /// Path to the specification file (JSON or YAML)
    #[arg(value_name = "FILE")]
    pub file: PathBuf,
}

/// Arguments for generating shell completions
#[derive(Parser, Debug)]
pub struct CompletionsArgs {
    /// Shell to generate completions for
    #[arg(value_enum)]
    pub shell: Shell,
}

/// Output format options
#[derive(Copy, Clone, Debug, PartialEq, Eq, ValueEnum, serde::Serialize, serde::Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum OutputFormat {
    /// Human-readable formatted output
    Human,
    /// JSON output
    Json,
    /// YAML output
    Yaml,
    /// Pretty-printed JSON output
    JsonPretty,
}

/// Supported shells for completion generation
#[derive(Copy, Clone, Debug, PartialEq, Eq, ValueEnum)]
pub enum Shell {
    /// Bash shell
    Bash,
    /// Zsh shell
    Zsh,
    /// Fish shell
    Fish,
    /// PowerShell
    PowerShell,
    /// Elvish shell
    Elvish,
}

impl Cli {
    /// Parse command-line arguments
    pub fn parse_args() -> Self {
        Self::parse()
    }

    /// Get the effective verbosity level (considering quiet flag)
    pub fn verbosity_level(&self) -> u8 {
        if self.quiet {
            0
        } else {
            self.verbose
        }
    }

    /// Check if colored output should be used
    pub fn use_color(&self) -> bool {
        !self.no_color && std::io::stdout().is_terminal()
    }
}

impl Shell {
    /// Convert to clap_complete shell type
    pub fn to_clap_shell(self) -> clap_complete::Shell {
        match self {
            Shell::Bash => clap_complete::Shell::Bash,
            Shell::Zsh => clap_complete::Shell::Zsh,
            Shell::Fish => clap_complete::Shell::Fish,
            Shell::PowerShell => clap_complete::Shell::PowerShell,
            Shell::Elvish => clap_complete::Shell::Elvish,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use clap::CommandFactory;

    #[test]
    fn verify_cli() {
        Cli::command().debug_assert();
    }

    #[test]
    fn test_verbosity_level() {
        let cli = Cli {
            verbose: 2,
            quiet: false,
            config: None,
            output: OutputFormat::Human,
            no_color: false,
            command: Commands::Refs(RefsArgs {
                file: PathBuf::from("asyncapi.yaml"),
            }),
        };
        assert_eq!(cli.verbosity_level(), 2);

        let quiet_cli = Cli {
            verbose: 2,
            quiet: true,
            ..cli
        };
        assert_eq!(quiet_cli.verbosity_level(), 0);
    }

    #[test]
    fn test_resolve_args() {
        let cli = Cli::parse_from([
            "specref",
            "-o",
            "json-pretty",
            "resolve",
            "spec.yaml",
            "--base-dir",
            "specs",
            "--no-remote",
            "--timeout",
            "10",
        ]);
        assert_eq!(cli.output, OutputFormat::JsonPretty);

        match cli.command {
            Commands::Resolve(args) => {
                assert_eq!(args.file, PathBuf::from("spec.yaml"));
                assert_eq!(args.base_dir, Some(PathBuf::from("specs")));
                assert!(args.no_remote);
                assert_eq!(args.timeout, Some(10));
                assert!(args.save_to.is_none());
            }
            other => panic!("unexpected command: {other:?}"),
        }
    }

    #[test]
    fn test_quiet_conflicts_with_verbose() {
        let result = Cli::try_parse_from(["specref", "-q", "-v", "refs", "spec.json"]);
        assert!(result.is_err());
    }

    #[test]
    fn test_completions_shell() {
        let cli = Cli::parse_from(["specref", "completions", "zsh"]);
        match cli.command {
            Commands::Completions(args) => {
                assert_eq!(args.shell.to_clap_shell(), clap_complete::Shell::Zsh)
            }
            other => panic!("unexpected command: {other:?}"),
        }
    }
}
