//! CLI argument definitions using clap derive
//!
//! Defines all command-line arguments and subcommands.

use crate::domain::IdentifierKind;

use clap::{CommandFactory, Parser, Subcommand, ValueEnum};
use clap_complete::Shell;
use std::path::PathBuf;

/// Switch management IP checker for Mist
///
/// Compare the management addressing Mist is configured to push against a
/// CSV baseline or against what the switches report.
#[derive(Parser, Debug)]
#[command(name = "switch-ip-check")]
#[command(author, version, about, long_about = None)]
#[command(propagate_version = true)]
pub struct Cli {
    /// Mist organization ID
    #[arg(short, long, global = true, env = "MIST_ORG_ID")]
    pub org: Option<String>,

    /// Mist API token
    #[arg(short, long, global = true, env = "MIST_API_TOKEN", hide_env_values = true)]
    pub token: Option<String>,

    /// Mist API host or base URL [default: api.mist.com]
    #[arg(long, global = true, env = "MIST_HOST")]
    pub host: Option<String>,

    /// Path to configuration file
    #[arg(short, long, global = true, env = "SWITCH_IP_CHECK_CONFIG")]
    pub config: Option<PathBuf>,

    /// Field used to match switches across sources
    #[arg(long, global = true, value_enum)]
    pub key: Option<KeyArg>,

    /// Output format
    #[arg(long, global = true, value_enum, default_value = "table")]
    pub format: OutputFormat,

    /// Only log errors
    #[arg(short, long, global = true, conflicts_with_all = ["debug", "level"])]
    pub quiet: bool,

    /// Log debug messages
    #[arg(short, long, global = true, conflicts_with = "level")]
    pub debug: bool,

    /// Log level
    #[arg(short, long, global = true, value_enum)]
    pub level: Option<LogLevel>,

    /// Do not print the results table
    #[arg(long, global = true)]
    pub hide: bool,

    #[command(subcommand)]
    pub command: Commands,
}

impl Cli {
    /// Log filter selected on the command line, if any
    pub fn log_filter(&self) -> Option<log::LevelFilter> {
        if self.quiet {
            Some(log::LevelFilter::Error)
        } else if self.debug {
            Some(log::LevelFilter::Debug)
        } else {
            self.level.map(log::LevelFilter::from)
        }
    }
}

/// Available subcommands
#[derive(Subcommand, Debug)]
pub enum Commands {
    /// Compare Mist configuration against a CSV baseline
    Reconcile(ReconcileArgs),

    /// Compare Mist configuration against what the switches report
    Check(CheckArgs),

    /// List switches managed by Mist
    List,

    /// Generate shell completions
    Completions {
        /// Shell to generate completions for
        #[arg(value_enum)]
        shell: Shell,
    },
}

/// Arguments for the reconcile command
#[derive(Parser, Debug)]
pub struct ReconcileArgs {
    /// Baseline CSV [default: ./switches.csv]
    #[arg(short, long, value_name = "CSV")]
    pub input: Option<PathBuf>,

    #[command(flatten)]
    pub export: ExportArgs,
}

/// Arguments for the check command
#[derive(Parser, Debug)]
pub struct CheckArgs {
    /// CSV selecting which switches to check [default: ./switches.csv]
    #[arg(short, long, value_name = "CSV", conflicts_with = "all")]
    pub input: Option<PathBuf>,

    /// Check every switch in the organization
    #[arg(short, long)]
    pub all: bool,

    #[command(flatten)]
    pub export: ExportArgs,
}

/// Export options shared by the comparison commands
#[derive(clap::Args, Debug, Default)]
pub struct ExportArgs {
    /// Export results to CSV
    #[arg(short = 'x', long)]
    pub export: bool,

    /// Export CSV path, implies --export [default: ./checked_switches.csv]
    #[arg(short = 'O', long, value_name = "CSV")]
    pub outfile: Option<PathBuf>,
}

/// Identifier argument
#[derive(ValueEnum, Debug, Clone, Copy)]
pub enum KeyArg {
    /// Match on MAC address
    Mac,
    /// Match on switch name
    Name,
}

impl From<KeyArg> for IdentifierKind {
    fn from(key: KeyArg) -> Self {
        match key {
            KeyArg::Mac => IdentifierKind::Mac,
            KeyArg::Name => IdentifierKind::Name,
        }
    }
}

/// Log level argument
#[derive(ValueEnum, Debug, Clone, Copy)]
pub enum LogLevel {
    Error,
    Warn,
    Info,
    Debug,
    Trace,
}

impl From<LogLevel> for log::LevelFilter {
    fn from(level: LogLevel) -> Self {
        match level {
            LogLevel::Error => log::LevelFilter::Error,
            LogLevel::Warn => log::LevelFilter::Warn,
            LogLevel::Info => log::LevelFilter::Info,
            LogLevel::Debug => log::LevelFilter::Debug,
            LogLevel::Trace => log::LevelFilter::Trace,
        }
    }
}

/// Output format
#[derive(ValueEnum, Debug, Clone, Copy, Default)]
pub enum OutputFormat {
    /// Human-readable table format
    #[default]
    Table,
    /// JSON format for machine parsing
    Json,
    /// Compact single-line format
    Compact,
}

/// Generate shell completions and print to stdout
pub fn generate_completions(shell: Shell) {
    let mut cmd = Cli::command();
    let name = cmd.get_name().to_string();
    clap_complete::generate(shell, &mut cmd, name, &mut std::io::stdout());
}

#[cfg(test)]
mod tests {
    use super::*;

    fn parse(args: &[&str]) -> Result<Cli, clap::Error> {
        Cli::try_parse_from(std::iter::once("switch-ip-check").chain(args.iter().copied()))
    }

    #[test]
    fn test_cli_definition() {
        Cli::command().debug_assert();
    }

    #[test]
    fn test_cli_parse_list() {
        let args = parse(&["list"]).unwrap();
        assert!(matches!(args.command, Commands::List));
    }

    #[test]
    fn test_cli_parse_connection() {
        let args = parse(&["-o", "org-1", "--token", "abc", "--host", "api.eu.mist.com", "list"])
            .unwrap();
        assert_eq!(args.org.as_deref(), Some("org-1"));
        assert_eq!(args.token.as_deref(), Some("abc"));
        assert_eq!(args.host.as_deref(), Some("api.eu.mist.com"));
    }

    #[test]
    fn test_cli_parse_reconcile() {
        let args = parse(&["reconcile", "-i", "in.csv", "-O", "out.csv", "--key", "name"]).unwrap();
        assert!(matches!(args.key, Some(KeyArg::Name)));
        if let Commands::Reconcile(rec) = args.command {
            assert_eq!(rec.input, Some(PathBuf::from("in.csv")));
            assert_eq!(rec.export.outfile, Some(PathBuf::from("out.csv")));
            assert!(!rec.export.export);
        } else {
            panic!("Expected Reconcile command");
        }
    }

    #[test]
    fn test_cli_parse_check_all() {
        let args = parse(&["check", "-a", "-x"]).unwrap();
        if let Commands::Check(check) = args.command {
            assert!(check.all);
            assert!(check.export.export);
            assert!(check.input.is_none());
        } else {
            panic!("Expected Check command");
        }
    }

    #[test]
    fn test_check_input_conflicts_with_all() {
        assert!(parse(&["check", "-a", "-i", "in.csv"]).is_err());
    }

    #[test]
    fn test_log_flags() {
        assert_eq!(parse(&["list"]).unwrap().log_filter(), None);
        assert_eq!(
            parse(&["-q", "list"]).unwrap().log_filter(),
            Some(log::LevelFilter::Error)
        );
        assert_eq!(
            parse(&["-d", "list"]).unwrap().log_filter(),
            Some(log::LevelFilter::Debug)
        );
        assert_eq!(
            parse(&["-l", "info", "list"]).unwrap().log_filter(),
            Some(log::LevelFilter::Info)
        );
    }

    #[test]
    fn test_log_flags_are_exclusive() {
        assert!(parse(&["-q", "-d", "list"]).is_err());
        assert!(parse(&["-d", "-l", "info", "list"]).is_err());
        assert!(parse(&["-q", "--level", "trace", "list"]).is_err());
    }

    #[test]
    fn test_invalid_key() {
        assert!(parse(&["--key", "serial", "list"]).is_err());
    }
}
