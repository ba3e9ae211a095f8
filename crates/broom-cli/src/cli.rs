//! CLI argument parsing.

use clap::Parser;
use std::path::PathBuf;

/// Broom - delete, shred or trash files that have not changed in a while.
#[derive(Debug, Parser)]
#[command(name = "broom")]
#[command(version, about, long_about = None)]
pub struct Cli {
    /// Configuration file path
    #[arg(short, long, env = "BROOM_CONFIG")]
    pub config: Option<PathBuf>,

    /// Log every action to the console
    #[arg(short, long)]
    pub verbose: bool,

    /// Report what would be done without touching anything
    #[arg(short = 'n', long)]
    pub dry_run: bool,

    /// Fail when no job could be run
    #[arg(long)]
    pub strict: bool,

    /// Keep running, sweeping every MINUTES minutes
    #[arg(long, value_name = "MINUTES", value_parser = clap::value_parser!(u64).range(1..))]
    pub every: Option<u64>,

    /// Stop periodic mode after N cycles
    #[arg(long, value_name = "N", requires = "every")]
    pub cycles: Option<usize>,

    /// Print a run summary
    #[arg(long, value_enum)]
    pub summary: Option<CliFormat>,

    /// Disable colored output
    #[arg(long)]
    pub no_color: bool,
}

/// Summary format options.
#[derive(Debug, Clone, Copy, PartialEq, Eq, clap::ValueEnum)]
pub enum CliFormat {
    /// Table format
    Table,
    /// JSON format
    Json,
}

impl Cli {
    /// Whether the console should show info-level messages.
    pub fn console_verbose(&self) -> bool {
        self.verbose || self.dry_run
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_defaults() {
        let cli = Cli::parse_from(["broom"]);
        assert!(!cli.verbose);
        assert!(!cli.dry_run);
        assert!(!cli.strict);
        assert!(cli.every.is_none());
        assert!(cli.summary.is_none());
        assert!(!cli.console_verbose());
    }

    #[test]
    fn test_dry_run_implies_console_verbose() {
        let cli = Cli::parse_from(["broom", "-n", "-c", "/tmp/broom.toml"]);
        assert!(cli.dry_run);
        assert!(cli.console_verbose());
        assert_eq!(cli.config, Some(PathBuf::from("/tmp/broom.toml")));
    }

    #[test]
    fn test_periodic_flags() {
        let cli = Cli::parse_from(["broom", "--every", "15", "--cycles", "3", "--summary", "json"]);
        assert_eq!(cli.every, Some(15));
        assert_eq!(cli.cycles, Some(3));
        assert_eq!(cli.summary, Some(CliFormat::Json));
    }

    #[test]
    fn test_cycles_requires_every() {
        assert!(Cli::try_parse_from(["broom", "--cycles", "3"]).is_err());
    }

    #[test]
    fn test_zero_interval_rejected() {
        assert!(Cli::try_parse_from(["broom", "--every", "0"]).is_err());
    }
}
