//! CLI command definitions and argument parsing.

use clap::{ArgAction, Parser, Subcommand};
use plagscan_engine::UnreadablePolicy;
use std::path::PathBuf;

/// plagscan - Find similar submissions in a batch of documents.
#[derive(Debug, Parser)]
#[command(name = "plagscan")]
#[command(version, about, long_about = None)]
pub struct Cli {
    /// Output format
    #[arg(short, long, value_enum, global = true)]
    pub format: Option<CliFormat>,

    /// Disable colored output
    #[arg(long, global = true)]
    pub no_color: bool,

    /// Configuration file path
    #[arg(short, long, global = true, env = "PLAGSCAN_CONFIG")]
    pub config: Option<PathBuf>,

    /// Increase log verbosity (-v info, -vv debug)
    #[arg(short, long, action = ArgAction::Count, global = true)]
    pub verbose: u8,

    #[command(subcommand)]
    pub command: Command,
}

impl Cli {
    /// Default log filter for the requested verbosity
    pub fn log_level(&self) -> &'static str {
        match self.verbose {
            0 => "warn",
            1 => "info",
            _ => "debug",
        }
    }
}

/// Output format options.
#[derive(Debug, Clone, Copy, clap::ValueEnum)]
pub enum CliFormat {
    /// Table format (default)
    Table,
    /// JSON format
    Json,
    /// Quiet format (suspect pairs only)
    Quiet,
}

/// CLI commands.
#[derive(Debug, Subcommand)]
pub enum Command {
    /// Compare every pair of documents and report the matrix and suspects
    Analyze(AnalyzeArgs),

    /// List only the suspect pairs
    Suspects(SuspectsArgs),

    /// Show one pair side by side with the regions they share
    Fragments(FragmentsArgs),

    /// Show the risk tier of a score
    Classify(ClassifyArgs),

    /// Inspect or create the configuration file
    Config(ConfigArgs),
}

/// Arguments for the analyze command.
#[derive(Debug, Parser)]
pub struct AnalyzeArgs {
    /// Documents to compare (subject = file name without extension)
    #[arg(required = true)]
    pub files: Vec<PathBuf>,

    /// Suspect threshold (0-100)
    #[arg(short, long)]
    pub threshold: Option<f64>,

    /// Header marker; body starts on the line after it
    #[arg(short, long)]
    pub marker: Option<String>,

    /// What to do with unreadable documents
    #[arg(long, value_enum)]
    pub on_unreadable: Option<PolicyArg>,
}

/// Arguments for the suspects command.
#[derive(Debug, Parser)]
pub struct SuspectsArgs {
    /// Documents to compare
    #[arg(required = true)]
    pub files: Vec<PathBuf>,

    /// Suspect threshold (0-100)
    #[arg(short, long)]
    pub threshold: Option<f64>,
}

/// Arguments for the fragments command.
#[derive(Debug, Parser)]
pub struct FragmentsArgs {
    /// Documents to load
    #[arg(required = true)]
    pub files: Vec<PathBuf>,

    /// The pair to show
    #[arg(short, long, num_args = 2, value_names = ["A", "B"], required = true)]
    pub pair: Vec<String>,

    /// Header marker; body starts on the line after it
    #[arg(short, long)]
    pub marker: Option<String>,

    /// Shortest shared region to list, in characters
    #[arg(long, default_value = "8")]
    pub min_len: usize,
}

/// Arguments for the classify command.
#[derive(Debug, Parser)]
pub struct ClassifyArgs {
    /// Similarity score (0-100)
    #[arg(allow_negative_numbers = true)]
    pub score: f64,
}

/// Arguments for configuration management.
#[derive(Debug, Parser)]
pub struct ConfigArgs {
    #[command(subcommand)]
    pub action: ConfigAction,
}

/// Configuration actions.
#[derive(Debug, Subcommand)]
pub enum ConfigAction {
    /// Print the effective configuration
    Show,

    /// Write a default configuration file
    Init {
        /// Overwrite an existing file
        #[arg(long)]
        force: bool,
    },

    /// Print the configuration file location
    Path,
}

/// Unreadable-document policy argument.
#[derive(Debug, Clone, Copy, clap::ValueEnum)]
pub enum PolicyArg {
    /// Leave the document out and report it
    Skip,
    /// Keep the document with failed cells
    Include,
    /// Stop the run
    Abort,
}

impl From<CliFormat> for crate::config::OutputFormat {
    fn from(format: CliFormat) -> Self {
        match format {
            CliFormat::Table => crate::config::OutputFormat::Table,
            CliFormat::Json => crate::config::OutputFormat::Json,
            CliFormat::Quiet => crate::config::OutputFormat::Quiet,
        }
    }
}

impl From<PolicyArg> for UnreadablePolicy {
    fn from(policy: PolicyArg) -> Self {
        match policy {
            PolicyArg::Skip => UnreadablePolicy::Skip,
            PolicyArg::Include => UnreadablePolicy::Include,
            PolicyArg::Abort => UnreadablePolicy::Abort,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_analyze_command() {
        let cli = Cli::parse_from([
            "plagscan",
            "analyze",
            "alice.py",
            "bob.py",
            "--threshold",
            "75",
            "--on-unreadable",
            "include",
        ]);
        match cli.command {
            Command::Analyze(args) => {
                assert_eq!(args.files.len(), 2);
                assert_eq!(args.threshold, Some(75.0));
                assert!(matches!(args.on_unreadable, Some(PolicyArg::Include)));
            }
            _ => panic!("Expected Analyze command"),
        }
    }

    #[test]
    fn test_analyze_requires_files() {
        assert!(Cli::try_parse_from(["plagscan", "analyze"]).is_err());
    }

    #[test]
    fn test_fragments_pair() {
        let cli = Cli::parse_from([
            "plagscan", "fragments", "a.py", "b.py", "--pair", "a", "b", "--min-len", "4",
        ]);
        match cli.command {
            Command::Fragments(args) => {
                assert_eq!(args.pair, vec!["a", "b"]);
                assert_eq!(args.min_len, 4);
            }
            _ => panic!("Expected Fragments command"),
        }
    }

    #[test]
    fn test_global_flags_after_subcommand() {
        let cli = Cli::parse_from(["plagscan", "classify", "85", "--format", "json", "-vv"]);
        assert!(matches!(cli.format, Some(CliFormat::Json)));
        assert_eq!(cli.log_level(), "debug");
    }

    #[test]
    fn test_default_log_level() {
        let cli = Cli::parse_from(["plagscan", "config", "path"]);
        assert_eq!(cli.log_level(), "warn");
    }

    #[test]
    fn test_policy_conversion() {
        let policy: UnreadablePolicy = PolicyArg::Abort.into();
        assert_eq!(policy, UnreadablePolicy::Abort);
    }
}
