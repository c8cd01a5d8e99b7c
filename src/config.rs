//! Command-line configuration

use clap::{Args, Parser, Subcommand};
use std::path::PathBuf;
use std::time::Duration;

/// Formula proved when none is given
pub const DEFAULT_FORMULA: &str = r"\Box ( a \to b ) \to  ( \Box a \to \Box b )";

#[derive(Debug, Parser)]
#[command(name = "provetty")]
#[command(about = "Terminal front end for a remote sequent prover")]
#[command(version)]
pub struct Cli {
    #[command(flatten)]
    pub connection: ConnectionArgs,

    /// Log file (the terminal UI owns stdout and stderr)
    #[arg(long, default_value = "provetty.log", global = true)]
    pub log_file: PathBuf,

    /// Switch for debug logging
    #[arg(short, long, global = true)]
    pub verbose: bool,

    #[command(subcommand)]
    pub command: Option<Command>,
}

#[derive(Debug, Clone, Args)]
pub struct ConnectionArgs {
    /// Base URL of the prover service
    #[arg(long, default_value = "http://127.0.0.1:4000", global = true)]
    pub server: String,

    /// Request timeout in seconds
    #[arg(long, default_value_t = 30, global = true)]
    pub timeout: u64,
}

impl ConnectionArgs {
    pub fn timeout(&self) -> Duration {
        Duration::from_secs(self.timeout)
    }
}

#[derive(Debug, Clone, Subcommand)]
pub enum Command {
    /// Interactive terminal page (the default)
    Tui,

    /// Prove a single formula and print the derivation
    Prove {
        /// Formula in TeX notation
        #[arg(default_value = DEFAULT_FORMULA)]
        formula: String,
    },

    /// Solve a list of sequents and print the derivation
    Solve {
        /// A sequent as its left and right side; repeat for more
        #[arg(long = "sequent", num_args = 2, value_names = ["LEFT", "RIGHT"], required = true)]
        sequents: Vec<String>,
    },
}

impl Cli {
    pub fn command(&self) -> Command {
        self.command.clone().unwrap_or(Command::Tui)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_defaults() {
        let cli = Cli::parse_from(["provetty"]);
        assert_eq!(cli.connection.server, "http://127.0.0.1:4000");
        assert_eq!(cli.connection.timeout(), Duration::from_secs(30));
        assert!(matches!(cli.command(), Command::Tui));
    }

    #[test]
    fn test_prove_default_formula() {
        let cli = Cli::parse_from(["provetty", "prove"]);
        match cli.command() {
            Command::Prove { formula } => assert_eq!(formula, DEFAULT_FORMULA),
            other => panic!("Expected prove, got {:?}", other),
        }
    }

    #[test]
    fn test_solve_sequent_pairs() {
        let cli = Cli::parse_from([
            "provetty", "solve", "--sequent", "a", "b", "--sequent", "", "c", "--server",
            "http://prover:9000",
        ]);
        assert_eq!(cli.connection.server, "http://prover:9000");
        match cli.command() {
            Command::Solve { sequents } => assert_eq!(sequents, vec!["a", "b", "", "c"]),
            other => panic!("Expected solve, got {:?}", other),
        }
    }
}
