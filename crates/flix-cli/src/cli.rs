//! Command-line surface (§6 "CLI").

use std::path::PathBuf;

use clap::{Parser, Subcommand};

use crate::style::ColorMode;

/// The Flix front-end driver.
#[derive(Parser)]
#[command(name = "flix")]
#[command(about = "Front end and analysis core for Flix", long_about = None)]
#[command(version)]
pub struct Cli {
    #[command(subcommand)]
    pub command: Commands,

    /// Also discharge law obligations, whatever the subcommand.
    #[arg(long, global = true)]
    pub verify: bool,

    /// Elevate verifier counter-examples and `Unknown` outcomes to fatal.
    #[arg(long, global = true)]
    pub strict_verify: bool,

    /// Report phase timings to stderr.
    #[arg(long, global = true)]
    pub xmonitor: bool,

    /// Directory the SMT backend's shared library is loaded from.
    #[arg(long, value_name = "DIR", global = true)]
    pub library_path: Option<PathBuf>,

    /// Maximum semi-naive rounds before the Solver gives up.
    #[arg(long, value_name = "N", global = true)]
    pub iteration_cap: Option<usize>,

    /// Raise the log filter one level per occurrence.
    #[arg(short, long, action = clap::ArgAction::Count, global = true)]
    pub verbose: u8,

    /// Whether to emit ANSI color on stderr.
    #[arg(long, value_name = "auto|always|never", default_value = "auto", global = true)]
    pub color: ColorMode,
}

/// Subcommands, each a prefix of the pipeline (§2 "Data flow").
#[derive(Subcommand)]
pub enum Commands {
    /// Weed, resolve, type-check, and simplify the given sources.
    Check {
        /// One or more Flix source paths.
        #[arg(required = true)]
        sources: Vec<PathBuf>,
    },

    /// `check`, then run the semi-naive Datalog-with-lattices solver.
    Run {
        #[arg(required = true)]
        sources: Vec<PathBuf>,
    },

    /// `check`, then discharge every applicable law obligation.
    Verify {
        #[arg(required = true)]
        sources: Vec<PathBuf>,
    },
}

impl Commands {
    pub fn sources(&self) -> &[PathBuf] {
        match self {
            Commands::Check { sources } | Commands::Run { sources } | Commands::Verify { sources } => sources,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn check_requires_at_least_one_source() {
        let result = Cli::try_parse_from(["flix", "check"]);
        assert!(result.is_err());
    }

    #[test]
    fn run_collects_multiple_sources() {
        let cli = Cli::try_parse_from(["flix", "run", "a.json", "b.json"]).unwrap();
        assert_eq!(cli.command.sources().len(), 2);
    }

    #[test]
    fn global_flags_parse_after_subcommand() {
        let cli = Cli::try_parse_from(["flix", "verify", "a.json", "--strict-verify", "--iteration-cap", "10"]).unwrap();
        assert!(cli.strict_verify);
        assert_eq!(cli.iteration_cap, Some(10));
    }

    #[test]
    fn color_defaults_to_auto() {
        let cli = Cli::try_parse_from(["flix", "check", "a.json"]).unwrap();
        assert_eq!(cli.color, ColorMode::Auto);
    }
}
